//! Upload DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::uploads::StoredUpload;

pub const UPLOAD_SUCCESS: &str = "File uploaded successfully";

/// Confirmation returned after a successful upload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    /// Name the file was stored under
    pub filename: String,
    /// Percent-encoded path the file can be downloaded from
    pub url: String,
    /// Stored size in bytes
    pub size: u64,
}

impl From<StoredUpload> for UploadResponse {
    fn from(s: StoredUpload) -> Self {
        Self {
            message: UPLOAD_SUCCESS.to_string(),
            filename: s.filename,
            url: s.url,
            size: s.size,
        }
    }
}

/// Multipart form accepted by `POST /uploadfile` (documentation only)
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
