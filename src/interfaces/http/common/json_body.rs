//! JSON body extractor for Axum
//!
//! `JsonBody<T>` works like `axum::Json<T>`, but every rejection (bad syntax,
//! wrong field types, missing content type) becomes a `400` with the
//! standard error envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;

use super::ErrorResponse;

/// An extractor that deserializes a JSON request body.
///
/// ```ignore
/// async fn handler(JsonBody(body): JsonBody<CreateUserRequest>) {
///     // `body` decoded successfully
/// }
/// ```
pub struct JsonBody<T>(pub T);

/// Error type for `JsonBody` extraction failures.
pub struct JsonBodyRejection(JsonRejection);

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        let body = ErrorResponse::new(format!("Invalid JSON body: {}", self.0.body_text()));
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(JsonBodyRejection)?;

        Ok(JsonBody(value))
    }
}

// ── Tests ──────────────────────────────────────────────────────
