//! Shared helpers for unit tests. Only compiled under `cfg(test)`.

use async_trait::async_trait;
use sea_orm_migration::MigratorTrait;

use crate::domain::{CreateUserDto, DomainError, DomainResult, User, UserRepositoryInterface};
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{DataStore, DatabaseConfig};

/// Repository whose every call fails like a dropped database connection.
pub struct BrokenRepository;

fn reset() -> DomainError {
    DomainError::Storage("connection reset".into())
}

#[async_trait]
impl UserRepositoryInterface for BrokenRepository {
    async fn list_users(&self) -> DomainResult<Vec<User>> {
        Err(reset())
    }
    async fn get_user_by_id(&self, _id: i32) -> DomainResult<Option<User>> {
        Err(reset())
    }
    async fn create_user(&self, _dto: CreateUserDto) -> DomainResult<User> {
        Err(reset())
    }
    async fn delete_user(&self, _id: i32) -> DomainResult<()> {
        Err(reset())
    }
}

/// Fresh in-memory SQLite store with the `users` table in place.
pub async fn migrated_store() -> DataStore {
    let store = DataStore::open(&DatabaseConfig::sqlite_memory())
        .await
        .expect("open in-memory sqlite");
    Migrator::up(store.connection(), None)
        .await
        .expect("apply migrations");
    store
}
