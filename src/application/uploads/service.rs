//! File upload service
//!
//! Receives a file chunk by chunk and stores it under its client-supplied
//! name in the upload directory. Nothing appears under the final name until
//! the whole file has been received.

use std::io;

use thiserror::Error;
use tracing::info;

use crate::infrastructure::storage::{LocalFileStore, PendingFile};

/// URL prefix uploaded files are served under.
pub const STATIC_PREFIX: &str = "/static";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Error parsing multipart form: {0}")]
    MalformedForm(String),

    #[error("Error retrieving file from form: missing field 'file'")]
    MissingFile,

    #[error("Invalid filename '{0}'")]
    InvalidFilename(String),

    #[error("Upload exceeds the maximum size of {limit} bytes")]
    TooLarge { limit: usize },

    #[error("Error creating file: {0}")]
    CreateFile(#[source] io::Error),

    #[error("Error copying file data: {0}")]
    Copy(#[source] io::Error),
}

/// Result of a completed upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    pub filename: String,
    pub size: u64,
    pub url: String,
}

pub struct UploadService {
    store: LocalFileStore,
    max_bytes: usize,
}

impl UploadService {
    pub fn new(store: LocalFileStore, max_bytes: usize) -> Self {
        Self { store, max_bytes }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn store(&self) -> &LocalFileStore {
        &self.store
    }

    /// Open a new upload for the client-supplied `raw_filename`.
    pub async fn begin(&self, raw_filename: &str) -> Result<UploadSession, UploadError> {
        let filename = sanitize_filename(raw_filename)?;
        let pending = self
            .store
            .create(&filename)
            .await
            .map_err(UploadError::CreateFile)?;

        Ok(UploadSession {
            pending,
            filename,
            limit: self.max_bytes,
        })
    }
}

/// An upload in progress. Dropping it discards everything written so far.
pub struct UploadSession {
    pending: PendingFile,
    filename: String,
    limit: usize,
}

impl UploadSession {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub async fn write(&mut self, chunk: &[u8]) -> Result<(), UploadError> {
        let total = self.pending.written() + chunk.len() as u64;
        if total > self.limit as u64 {
            return Err(UploadError::TooLarge { limit: self.limit });
        }
        self.pending
            .write_chunk(chunk)
            .await
            .map_err(UploadError::Copy)
    }

    pub async fn finish(self) -> Result<StoredUpload, UploadError> {
        let size = self.pending.written();
        let path = self.pending.commit().await.map_err(UploadError::Copy)?;
        info!(filename = %self.filename, size, path = %path.display(), "File uploaded");

        Ok(StoredUpload {
            url: format!("{}/{}", STATIC_PREFIX, encode_path_segment(&self.filename)),
            filename: self.filename,
            size,
        })
    }
}

/// Reduce a client filename to a single safe path component.
///
/// Browsers on Windows may send full paths, so both `/` and `\` separate
/// components. Hidden names are refused because temporary files share the
/// directory.
pub fn sanitize_filename(raw: &str) -> Result<String, UploadError> {
    let name = raw
        .rsplit(&['/', '\\'][..])
        .next()
        .unwrap_or_default()
        .trim();

    let invalid = name.is_empty()
        || name.starts_with('.')
        || name.chars().any(|c| c.is_control());

    if invalid {
        return Err(UploadError::InvalidFilename(raw.to_string()));
    }
    Ok(name.to_string())
}

/// Percent-encode `segment` for use as one URL path segment. Only RFC 3986
/// unreserved characters pass through unchanged.
fn encode_path_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}
