//! API error envelope
//!
//! Every failing endpoint responds with the same JSON shape:
//! `{"error": {"code": <status>, "message": "..."}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// Body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Error detail
    pub error: ErrorDetail,
}

/// Error code and message
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    /// HTTP status code, repeated in the body
    pub code: u16,
    /// Human-readable description
    pub message: String,
}

/// Error returned from API handlers
///
/// Converts into the envelope response via [`IntoResponse`]. Routing errors
/// map onto statuses in [`From<notelm_llm::Error>`]: validation failures are
/// client errors, missing credentials are 503, upstream failures are 502.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Create an error with an explicit status
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 503 Service Unavailable
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// Response status
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Client-facing message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.status.as_u16(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<notelm_llm::Error> for ApiError {
    fn from(err: notelm_llm::Error) -> Self {
        let status = match &err {
            notelm_llm::Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            notelm_llm::Error::ProviderUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            // Api, InvalidResponse, Network, Timeout: the upstream call failed
            _ => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, err.to_string())
    }
}
