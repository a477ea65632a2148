//! Error handling for the quiz API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use quiz_core::{BankError, JumpError, SessionError, StoreError};
use serde::Serialize;
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("No question bank loaded")]
    NoBank,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Filtered out: {0}")]
    FilteredOut(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Jump(e @ JumpError::NotFound { .. }) => ApiError::NotFound(e.to_string()),
            SessionError::Jump(e @ JumpError::FilteredOut { .. }) => {
                ApiError::FilteredOut(e.to_string())
            }
            SessionError::Store(e) => ApiError::Storage(e),
            e @ SessionError::AlreadyAnswered { .. } => ApiError::Conflict(e.to_string()),
            e @ (SessionError::EmptySelection
            | SessionError::MultipleSelection { .. }
            | SessionError::WrongKind { .. }
            | SessionError::IndexOutOfRange { .. }) => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl From<BankError> for ApiError {
    fn from(err: BankError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::FilteredOut(_) => (StatusCode::CONFLICT, "filtered_out"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::NoBank => (StatusCode::SERVICE_UNAVAILABLE, "no_bank"),
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
