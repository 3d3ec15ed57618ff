use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Service-level error, classified by who is at fault and how it maps to a
/// response status. Timeout and unreachable stay separate kinds even though
/// both render 503 today.
#[derive(Debug, Error, PartialEq)]
pub enum BffError {
    /// Malformed or out-of-range input. The client's fault.
    #[error("{0}")]
    Validation(String),

    /// The backend did not answer within the configured timeout.
    #[error("backend timed out: {0}")]
    UpstreamTimeout(String),

    /// The backend could not be reached at all.
    #[error("backend unreachable: {0}")]
    UpstreamUnreachable(String),

    /// The backend answered with a non-success status or a body this layer
    /// could not decode.
    #[error("{0}")]
    Upstream(String),

    /// Unexpected decode/serialize failure inside this layer.
    #[error("{0}")]
    Internal(String),
}

impl BffError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BffError::Validation(_) => StatusCode::BAD_REQUEST,
            BffError::UpstreamTimeout(_) | BffError::UpstreamUnreachable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            BffError::Upstream(_) | BffError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body shape shared by every error response.
#[derive(Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
    pub message: String,
    pub timestamp: String,
}

impl IntoResponse for BffError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        let body = ErrorResponse {
            error: message.clone(),
            status: status.as_u16(),
            message,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(json!(body))).into_response()
    }
}
