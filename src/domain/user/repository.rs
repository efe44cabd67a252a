use async_trait::async_trait;

use super::{CreateUserDto, User};
use crate::shared::DomainResult;

/// Persistence port for the `users` table.
///
/// `delete_user` reports `DomainError::NotFound` when no row matched.
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn list_users(&self) -> DomainResult<Vec<User>>;
    async fn get_user_by_id(&self, id: i32) -> DomainResult<Option<User>>;
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;
    async fn delete_user(&self, id: i32) -> DomainResult<()>;
}
