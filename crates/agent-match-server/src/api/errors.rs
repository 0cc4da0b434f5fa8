//! Error handling for the agent matching API
//!
//! Every failure leaves the server as `{"detail": ..., "error_code": ...}`
//! with a status derived from the error kind. Extractor rejections are
//! folded into the same shape.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use agent_match_core::{CoreError, ErrorKind};

/// Body of every error response
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub detail: String,
    pub error_code: String,
}

/// API Error type for returning standard error responses
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request that never reached the matching service (422)
    InvalidRequest(String),
    /// Error raised by the matching service or its components
    Core(CoreError),
    /// The request did not finish within the configured timeout (408)
    Timeout,
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Core(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::Core(err) => write!(f, "{}", err),
            ApiError::Timeout => write!(f, "Request timed out"),
        }
    }
}

/// Status and stable error code for an error kind
pub fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::Validation => (StatusCode::UNPROCESSABLE_ENTITY, "ERR_VALIDATION"),
        ErrorKind::DuplicateId => (StatusCode::CONFLICT, "ERR_DUPLICATE_ID"),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "ERR_NOT_FOUND"),
        ErrorKind::StorageUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "ERR_STORAGE_UNAVAILABLE"),
        ErrorKind::Embedding => (StatusCode::INTERNAL_SERVER_ERROR, "ERR_EMBEDDING"),
        ErrorKind::DimensionMismatch => (StatusCode::INTERNAL_SERVER_ERROR, "ERR_DIMENSION_MISMATCH"),
        ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "ERR_INTERNAL"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            ApiError::InvalidRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "ERR_VALIDATION"),
            ApiError::Core(err) => status_for(err.kind()),
            ApiError::Timeout => (StatusCode::REQUEST_TIMEOUT, "ERR_TIMEOUT"),
        };
        let detail = match &self {
            ApiError::InvalidRequest(msg) => msg.clone(),
            ApiError::Core(err) => err.to_string(),
            ApiError::Timeout => self.to_string(),
        };

        if status.is_server_error() {
            error!(status = %status, error_code, detail = %detail, "Request failed");
        } else {
            warn!(status = %status, error_code, detail = %detail, "Request rejected");
        }

        let body = Json(ErrorBody {
            detail,
            error_code: error_code.to_string(),
        });
        (status, body).into_response()
    }
}
