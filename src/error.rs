//! Error types for the Libris server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub const MSG_ISBN_ALREADY_EXISTS: &str = "Isbn already exists";
pub const MSG_BOOK_NOT_FOUND_FOR_ISBN: &str = "Book not found for passed ISBN";
pub const MSG_BOOK_ALREADY_LOANED: &str = "Book already loaned.";
pub const MSG_LOAN_ID_NOT_FOUND: &str = "Loan not found for passed id";

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Field-level validation failures, all reported at once.
    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("{}", MSG_ISBN_ALREADY_EXISTS)]
    DuplicateIsbn,

    #[error("{}", MSG_BOOK_NOT_FOUND_FOR_ISBN)]
    BookNotFound,

    #[error("{}", MSG_BOOK_ALREADY_LOANED)]
    BookAlreadyLoaned,

    #[error("{}", MSG_LOAN_ID_NOT_FOUND)]
    LoanNotFound,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body: a flat list of messages.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub errors: Vec<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, errors) = match self {
            AppError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, vec![msg]),
            AppError::Validation(errors) => (StatusCode::BAD_REQUEST, errors),
            AppError::DuplicateIsbn => (
                StatusCode::BAD_REQUEST,
                vec![MSG_ISBN_ALREADY_EXISTS.to_string()],
            ),
            AppError::BookNotFound => (
                StatusCode::BAD_REQUEST,
                vec![MSG_BOOK_NOT_FOUND_FOR_ISBN.to_string()],
            ),
            AppError::BookAlreadyLoaned => (
                StatusCode::BAD_REQUEST,
                vec![MSG_BOOK_ALREADY_LOANED.to_string()],
            ),
            AppError::LoanNotFound => (
                StatusCode::NOT_FOUND,
                vec![MSG_LOAN_ID_NOT_FOUND.to_string()],
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, vec![msg]),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec!["Database error".to_string()],
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec!["Internal server error".to_string()],
                )
            }
        };

        (status, Json(ErrorResponse { errors })).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
