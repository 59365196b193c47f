use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Domain error taxonomy. Expected conditions map to 4xx responses;
/// storage and hashing faults are logged and turned into a generic 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing a required field")]
    MissingField,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Email is already in use")]
    DuplicateEmail,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Authentication required")]
    Unauthenticated,
    #[error("No entries recorded yet")]
    EmptyHistory,
    #[error("Satisfaction is outside the allowed range")]
    OutOfRange,
    #[error("Internal server error")]
    Storage(#[from] sqlx::Error),
    #[error("Internal server error")]
    PasswordHash(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField
            | ApiError::PasswordMismatch
            | ApiError::InvalidEmail
            | ApiError::OutOfRange => StatusCode::BAD_REQUEST,
            ApiError::DuplicateEmail => StatusCode::CONFLICT,
            ApiError::InvalidCredentials | ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::EmptyHistory => StatusCode::NOT_FOUND,
            ApiError::Storage(_) | ApiError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Storage(e) => error!(error = %e, "storage failure"),
            ApiError::PasswordHash(e) => error!(error = %e, "password hashing failure"),
            _ => {}
        }
        // Display strings are user-facing; driver messages never leak here.
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
