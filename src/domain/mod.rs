pub mod user;

pub use user::{parse_user_id, CreateUserDto, User, UserRepositoryInterface};

// Re-export DomainError from shared for convenience
pub use crate::shared::{DomainError, DomainResult};
