//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::publisher::PublisherSummary;

/// Book row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub epoch: Option<String>,
    pub genre: Option<String>,
    pub kind: Option<String>,
    pub language: Option<String>,
    pub publication_year: Option<String>,
    pub category: Option<String>,
    pub publisher_id: i32,
    /// Currently available copies; mutated by lend/return only
    pub quantity: i32,
    /// Lifetime borrow counter, never decremented
    pub borrowed_count: i32,
    pub is_deleted: bool,
}

/// Book with its publisher embedded, as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookDetails {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub epoch: Option<String>,
    pub genre: Option<String>,
    pub kind: Option<String>,
    pub language: Option<String>,
    pub publication_year: Option<String>,
    pub category: Option<String>,
    pub publisher: PublisherSummary,
    pub quantity: i32,
    pub borrowed_count: i32,
    pub is_deleted: bool,
}

/// Compact book snapshot used in user lend history
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub category: Option<String>,
    pub publication_year: Option<String>,
    pub language: Option<String>,
}

/// Create/update book request; publisher attribution comes from the
/// authenticated identity, never from the client
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BookIn {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: String,
    pub epoch: Option<String>,
    pub genre: Option<String>,
    pub kind: Option<String>,
    pub language: Option<String>,
    pub publication_year: Option<String>,
    pub category: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

/// Per-book availability report
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookAvailability {
    pub book_id: i32,
    pub title: String,
    /// Copies on the shelf right now
    pub available: i32,
    /// Copies currently out on active loans
    pub borrowed: i64,
    /// available + borrowed
    pub total_stock: i64,
    pub borrowed_count: i32,
}
