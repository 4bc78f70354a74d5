//! Error types for the Hikmah server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Library service error: {0}")]
    Service(#[from] ServiceError),
}

/// Durable slot errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on slot '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode slot '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Slot store unavailable: {0}")]
    Unavailable(String),
}

/// Rejected input at the core boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("chapter id must be a positive integer")]
    InvalidChapterId,

    #[error("chapter title must not be empty")]
    EmptyChapterTitle,

    #[error("chapter content must not be empty")]
    EmptyChapterContent,

    #[error("note content must not be empty")]
    EmptyNoteContent,

    #[error("bookmark position {0} is outside 0-100")]
    PositionOutOfRange(f64),

    #[error("rating {0} is outside 1-5")]
    RatingOutOfRange(u8),

    #[error("testimonial name must not be empty")]
    EmptyTestimonialName,

    #[error("testimonial text must not be empty")]
    EmptyTestimonialText,

    #[error("unsupported image type: {0}")]
    UnsupportedImage(String),
}

/// The library owner thread is gone
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("library service has stopped")]
    Stopped,
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    "Failed to persist changes".to_string(),
                )
            }
            AppError::Service(e) => {
                tracing::error!("Service error: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    "Library service is not running".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}
