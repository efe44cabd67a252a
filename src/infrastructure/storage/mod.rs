//! Storage implementations outside the relational database

mod local_fs;
mod memory;

pub use local_fs::{LocalFileStore, PendingFile};
pub use memory::InMemoryUserRepository;
