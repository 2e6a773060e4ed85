//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::media::MediaError;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request shape or content failed validation
    #[error("{0}")]
    Validation(String),

    /// Missing, invalid, or expired session
    #[error("Unauthorized")]
    Unauthorized,

    /// The requested record does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The operation conflicts with existing state
    #[error("{0}")]
    Conflict(String),

    /// Storage failure; detail is logged, never returned to the client
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),

    /// Internal server error
    #[error("Internal server error")]
    Internal,
}

impl From<MediaError> for ApiError {
    fn from(e: MediaError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Database(e) => {
                tracing::error!("Storage failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
