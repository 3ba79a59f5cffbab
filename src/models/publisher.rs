//! Publisher model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Publisher model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Publisher {
    pub id: i32,
    pub company_name: String,
    pub contact_email: Option<String>,
    /// Owning user; one user owns at most one publisher
    pub user_id: Uuid,
}

/// Publisher embedded in book responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublisherSummary {
    pub id: i32,
    pub company_name: String,
    pub contact_email: Option<String>,
}

impl From<Publisher> for PublisherSummary {
    fn from(p: Publisher) -> Self {
        PublisherSummary {
            id: p.id,
            company_name: p.company_name,
            contact_email: p.contact_email,
        }
    }
}

/// Create/update publisher request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PublisherIn {
    #[validate(length(min = 1, message = "Company name must not be empty"))]
    pub company_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub contact_email: Option<String>,
}
