//! File upload handler

use std::sync::Arc;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use tracing::warn;

use super::dto::{UploadForm, UploadResponse};
use crate::application::uploads::{UploadError, UploadService};
use crate::interfaces::http::common::{api_error, ApiError, ErrorResponse};
use crate::interfaces::http::modules::metrics::record_upload;

/// Name of the multipart field carrying the file
pub const FILE_FIELD: &str = "file";

#[derive(Clone)]
pub struct UploadHandlerState {
    pub upload_service: Arc<UploadService>,
}

fn upload_error(e: UploadError) -> ApiError {
    let status = match &e {
        UploadError::MalformedForm(_)
        | UploadError::MissingFile
        | UploadError::InvalidFilename(_) => StatusCode::BAD_REQUEST,
        UploadError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        UploadError::CreateFile(_) | UploadError::Copy(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        warn!("Upload failed: {}", e);
    }
    api_error(status, e.to_string())
}

/// The body limit layer surfaces as a multipart read error with status 413.
fn multipart_error(e: MultipartError, limit: usize) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        upload_error(UploadError::TooLarge { limit })
    } else {
        upload_error(UploadError::MalformedForm(e.body_text()))
    }
}

#[utoipa::path(
    post,
    path = "/uploadfile",
    tag = "Uploads",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Malformed form, missing `file` field or bad filename", body = ErrorResponse),
        (status = 405, description = "Method other than POST"),
        (status = 413, description = "Upload exceeds the size limit", body = ErrorResponse),
        (status = 500, description = "File could not be written", body = ErrorResponse)
    )
)]
pub async fn upload_file(
    State(state): State<UploadHandlerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let limit = state.upload_service.max_bytes();
    let mut multipart =
        multipart.map_err(|e| upload_error(UploadError::MalformedForm(e.body_text())))?;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let raw_name = field.file_name().unwrap_or_default().to_string();
        let mut session = state
            .upload_service
            .begin(&raw_name)
            .await
            .map_err(upload_error)?;

        while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, limit))? {
            session.write(&chunk).await.map_err(upload_error)?;
        }

        let stored = session.finish().await.map_err(upload_error)?;
        record_upload(stored.size);
        return Ok(Json(UploadResponse::from(stored)));
    }

    Err(upload_error(UploadError::MissingFile))
}
