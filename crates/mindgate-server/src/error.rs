//! Error handling for the HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use mindgate_core::error::MindgateError;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

// Core error codes are passed through as-is
impl From<MindgateError> for ApiError {
    fn from(err: MindgateError) -> Self {
        let status = match &err {
            MindgateError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            MindgateError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            MindgateError::Network { .. } => StatusCode::BAD_GATEWAY,
            MindgateError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MindgateError::Configuration(_) => StatusCode::BAD_REQUEST,
            MindgateError::Persistence { .. }
            | MindgateError::Io(_)
            | MindgateError::Serialization(_)
            | MindgateError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.code().as_str(), err.to_string())
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
