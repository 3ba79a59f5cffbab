//! Lend transaction model and history types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::book::{BookDetails, BookSummary};
use super::user::UserSummary;

/// Loan state machine: no-loan -> borrowed -> returned (terminal).
/// A re-borrow always creates a new transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lend_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LendStatus {
    Borrowed,
    Returned,
}

impl LendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LendStatus::Borrowed => "borrowed",
            LendStatus::Returned => "returned",
        }
    }
}

impl std::fmt::Display for LendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lend transaction row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LendTransaction {
    pub id: i32,
    /// NULL for ledger rows whose book was hard-removed (FK nullifies)
    pub book_id: Option<i32>,
    pub user_id: Uuid,
    pub borrowed_date: NaiveDate,
    pub returned_date: Option<NaiveDate>,
    pub status: LendStatus,
}

/// Create lend request; user id is resolved from the bearer token
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLend {
    pub book_id: i32,
    pub borrowed_date: NaiveDate,
}

/// Return request; user id is resolved from the bearer token
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReturnBook {
    pub book_id: i32,
    pub return_date: NaiveDate,
}

/// One ledger entry in a book's history, with the borrower snapshot
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookHistoryEntry {
    pub lend_id: i32,
    pub user: UserSummary,
    pub borrowed_date: NaiveDate,
    pub returned_date: Option<NaiveDate>,
    pub status: LendStatus,
}

/// Full lend history of a book
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookLendHistory {
    pub book: BookDetails,
    pub history: Vec<BookHistoryEntry>,
}

/// One ledger entry in a user's history, with the book snapshot.
/// The book is None when the underlying row was orphaned by a hard delete.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserHistoryEntry {
    pub lend_id: i32,
    pub book: Option<BookSummary>,
    pub borrowed_date: NaiveDate,
    pub returned_date: Option<NaiveDate>,
    pub status: LendStatus,
}

/// Full lend history of a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserLendHistory {
    pub user: UserSummary,
    pub history: Vec<UserHistoryEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&LendStatus::Borrowed).unwrap(), "\"borrowed\"");
        assert_eq!(serde_json::to_string(&LendStatus::Returned).unwrap(), "\"returned\"");
    }

    #[test]
    fn status_deserializes_lowercase() {
        let s: LendStatus = serde_json::from_str("\"returned\"").unwrap();
        assert_eq!(s, LendStatus::Returned);
        assert_eq!(s.to_string(), "returned");
    }
}
