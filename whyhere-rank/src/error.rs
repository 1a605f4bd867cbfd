//! Error types for whyhere-rank

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::BackendRequestError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// `/data/pois` request failed (502)
    #[error("Backend request failed: {0}")]
    Backend(#[from] BackendRequestError),

    /// whyhere-common error
    #[error("Common error: {0}")]
    Common(#[from] whyhere_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use whyhere_common::Error as CommonError;

        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Backend(ref err) => (StatusCode::BAD_GATEWAY, "BACKEND_ERROR", err.to_string()),
            ApiError::Common(ref err) => match err {
                CommonError::InvalidFeatureKey(_)
                | CommonError::InvalidPriorityList(_)
                | CommonError::ScoreOutOfRange { .. }
                | CommonError::InvalidRank(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string()),
                CommonError::Config(_) | CommonError::Io(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "COMMON_ERROR", err.to_string())
                }
            },
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
