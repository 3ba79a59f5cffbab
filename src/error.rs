//! Error types for Librarium server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes exposed in JSON error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchUser = 4,
    NoSuchBook = 5,
    NoSuchPublisher = 6,
    NoSuchLend = 7,
    OutOfStock = 8,
    DuplicateActiveLoan = 9,
    AlreadyReturned = 10,
    NoActiveLoan = 11,
    EmailAlreadyExists = 12,
    PublisherAlreadyExists = 13,
    BadValue = 14,
    NoData = 15,
    UserHasLendings = 16,
    PublisherHasBooks = 17,
}

/// Main application error type. NotFound and Conflict carry the
/// specific code so the HTTP layer never has to guess the subject.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {1}")]
    NotFound(ErrorCode, String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {1}")]
    Conflict(ErrorCode, String),

    #[error("Out of stock: {0}")]
    OutOfStock(String),

    #[error("No data: {0}")]
    NoData(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::Authorization(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::NotFound(code, msg) => (StatusCode::NOT_FOUND, *code, msg.clone()),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Conflict(code, msg) => (StatusCode::CONFLICT, *code, msg.clone()),
            AppError::OutOfStock(msg) => {
                (StatusCode::CONFLICT, ErrorCode::OutOfStock, msg.clone())
            }
            AppError::NoData(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoData, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coded_variants_display_their_message() {
        let conflict = AppError::Conflict(
            ErrorCode::DuplicateActiveLoan,
            "User already has an active loan for book 7".to_string(),
        );
        assert_eq!(
            conflict.to_string(),
            "Conflict: User already has an active loan for book 7"
        );

        let missing = AppError::NotFound(ErrorCode::NoSuchBook, "Book 7 not found".to_string());
        assert_eq!(missing.to_string(), "Not found: Book 7 not found");
    }

    #[test]
    fn not_found_keeps_its_code() {
        let err = AppError::NotFound(ErrorCode::NoSuchUser, "gone".to_string());
        match err {
            AppError::NotFound(code, _) => assert_eq!(code, ErrorCode::NoSuchUser),
            _ => panic!("wrong variant"),
        }
    }
}
