//! Relay Error Types
//!
//! Defines error types for the relay layer and implements conversion
//! to HTTP responses with appropriate status codes.
//!
//! Upstream failures keep the upstream status code. Anything that goes
//! wrong on the relay side becomes a 500 with a JSON error body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Relay error types
#[derive(Error, Debug)]
pub enum RelayError {
    /// Path did not carry an identifier
    #[error("Invalid request")]
    InvalidRequest,

    /// Upstream answered with a non-success status
    #[error("Upstream error: {0}")]
    Upstream(u16),

    /// Upstream could not be reached or the body could not be read
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// Upstream body is not what the relay promises to return
    #[error("Invalid upstream body: {0}")]
    InvalidBody(String),

    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub request_id: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match &self {
            RelayError::InvalidRequest => {
                return (StatusCode::BAD_REQUEST, self.to_string()).into_response();
            }
            RelayError::Upstream(code) => {
                let status = StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_GATEWAY);
                tracing::warn!(upstream_status = code, "Upstream returned an error");
                return (status, self.to_string()).into_response();
            }
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::NotFound(_) => StatusCode::NOT_FOUND,
            RelayError::Network(_)
            | RelayError::InvalidBody(_)
            | RelayError::Internal(_)
            | RelayError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            status = status.as_u16(),
            error_message = %self,
            "Relay error occurred"
        );

        let body = ErrorResponse {
            error: self.to_string(),
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for relay handlers
pub type RelayResult<T> = Result<T, RelayError>;
