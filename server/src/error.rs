//! Unified error handling for the server.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Error response body, mirroring the success reply's `success` flag.
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: &'static str,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Io(e) => {
                tracing::error!("Storage error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::BadRequest(msg) => {
                tracing::warn!("Rejected submission: {}", msg);
                StatusCode::BAD_REQUEST
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            message: "Error submitting form",
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;
