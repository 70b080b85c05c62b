//! # Application Error
//!
//! Maps domain errors to structured HTTP responses with proper
//! status codes and error bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gallery_core::RegistryError;
use thiserror::Error;

/// Application-level error type that maps to HTTP responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed request: bad body, bad query parameter, stale marker.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Policy denial, read-only field in a body, protected record.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource not found or not visible to the caller.
    #[error("not found: {0}")]
    NotFound(String),

    /// State conflict, e.g. a duplicate client-supplied identifier.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::BadRequest(msg) => Self::BadRequest(msg),
            RegistryError::Forbidden(msg) => Self::Forbidden(msg),
            RegistryError::NotFound(msg) => Self::NotFound(msg),
            RegistryError::Conflict(msg) => Self::Conflict(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "message": self.to_string(),
            }
        });
        (status, axum::Json(body)).into_response()
    }
}
