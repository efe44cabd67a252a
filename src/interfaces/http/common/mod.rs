//! Common API DTOs and error mapping

mod json_body;

pub use json_body::{JsonBody, JsonBodyRejection};

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Error envelope shared by every failing endpoint:
/// `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Error half of every handler's `Result`
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(message)))
}

/// Map a domain error to its HTTP status.
///
/// Storage details are logged but not returned to the client.
pub fn domain_error(e: DomainError) -> ApiError {
    match e {
        DomainError::Validation(msg) => api_error(StatusCode::BAD_REQUEST, msg),
        e @ DomainError::NotFound { .. } => api_error(StatusCode::NOT_FOUND, e.to_string()),
        DomainError::Storage(msg) => {
            error!("Storage failure: {}", msg);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal storage error")
        }
    }
}
