//! Error types for Cinegate
//!
//! This module defines custom error types used throughout the application.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, malformed, forged or expired credentials. Deliberately carries
    /// no detail so callers cannot tell the cases apart.
    #[error("Invalid or missing credentials")]
    InvalidCredential,

    #[error("Already exists: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::UpstreamUnavailable("request timed out".to_string())
        } else {
            AppError::UpstreamUnavailable(err.to_string())
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl AppError {
    /// HTTP status and stable machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidCredential => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::DuplicateEntry(_) => (StatusCode::CONFLICT, "DUPLICATE_ENTRY"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::UpstreamUnavailable(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE"),
            AppError::RedisError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
            AppError::JsonError(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::InvalidCredential => self.to_string(),
            AppError::DuplicateEntry(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::UpstreamUnavailable(msg) => msg.clone(),
            AppError::RedisError(e) => {
                error!(error = %e, "Library store failure");
                "Library store error".to_string()
            }
            AppError::JsonError(e) => {
                error!(error = %e, "Serialization failure");
                "Internal server error".to_string()
            }
            AppError::Internal(e) => {
                error!(error = %e, "Internal failure");
                "Internal server error".to_string()
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
