//! File uploads

pub mod service;

pub use service::{sanitize_filename, StoredUpload, UploadError, UploadService, UploadSession, STATIC_PREFIX};
