//! # Users Service
//!
//! HTTP CRUD over a relational `users` table, plus a multipart file upload
//! endpoint whose files are served back under `/static/`.
//!
//! ## Architecture
//!
//! - **domain**: the `User` entity and the repository contract
//! - **application**: user and upload use cases
//! - **infrastructure**: SeaORM data store, migrations, repositories, local file storage
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: startup, serving and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

#[cfg(test)]
mod test_support;

pub use config::{default_config_path, AppConfig};
pub use infrastructure::{DataStore, DatabaseConfig};
pub use interfaces::{create_api_router, ApiContext};
pub use server::{init_tracing, ServerHandle, ServerOptions};
pub use shared::AppError;
