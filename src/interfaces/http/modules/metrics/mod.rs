//! Prometheus endpoint and request metrics middleware

pub mod handlers;
pub mod middleware;

pub use handlers::*;
pub use middleware::{http_metrics_middleware, record_upload};
