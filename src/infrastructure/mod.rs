//! Infrastructure layer - external concerns

pub mod database;
pub mod storage;

pub use database::{DataStore, DatabaseConfig};
pub use storage::{InMemoryUserRepository, LocalFileStore};
