//! Error types for goalscore-ga
//!
//! Every API error carries a short machine-readable category plus a
//! human-readable message. Buffered responses serialize both; the
//! streaming endpoint delivers only the message, inside a terminal error
//! event on the already-open stream.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or non-file `file` field, or a non-spreadsheet filename
    #[error("{0}")]
    InvalidFile(String),

    /// Decoded workbook contains no data rows
    #[error("{0}")]
    EmptyFile(String),

    /// Uploaded bytes are not a readable workbook
    #[error("{0}")]
    ParseError(String),

    /// Oracle credential missing from the environment and config
    #[error("{0}")]
    Configuration(String),

    /// Internal server error
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Machine-readable error category
    pub fn category(&self) -> &'static str {
        match self {
            ApiError::InvalidFile(_) => "Invalid File",
            ApiError::EmptyFile(_) => "Empty File",
            ApiError::ParseError(_) => "Parse Error",
            ApiError::Configuration(_) => "Configuration Error",
            ApiError::Internal(_) => "Internal Error",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidFile(_) | ApiError::EmptyFile(_) | ApiError::ParseError(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Configuration(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.category(),
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
