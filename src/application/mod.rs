//! Application layer: use-cases orchestrating domain ports and infrastructure

pub mod uploads;
pub mod users;

pub use uploads::{UploadError, UploadService};
pub use users::UserService;
