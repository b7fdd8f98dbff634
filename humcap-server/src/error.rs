//! Error types for humcap-server
//!
//! Expected verification failures (tiny uploads, unknown tunes, bad
//! durations) are not errors: they are returned as a normal verification
//! result with `success: false`. `ApiError` only covers malformed requests
//! and faults.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Message returned for every internal fault; details only go to the log
pub const INTERNAL_ERROR_MESSAGE: &str = "Verification system error. Please try again.";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Required form field absent (400)
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Request body could not be interpreted (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// WAV rendering failed (500)
    #[error("Audio synthesis error: {0}")]
    Audio(#[from] hound::Error),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status().is_client_error() {
            ApiError::BadRequest(err.body_text())
        } else {
            ApiError::Internal(err.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::MissingField(_) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                "Missing recording or tune ID".to_string(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Audio(ref err) => {
                error!(error = %err, "Audio synthesis failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
            ApiError::Internal(ref detail) => {
                error!(detail = %detail, "Internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": error_code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
