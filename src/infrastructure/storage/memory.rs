//! In-memory user repository for development and testing

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{CreateUserDto, DomainError, DomainResult, User, UserRepositoryInterface};

/// In-memory stand-in for the `users` table.
///
/// Ids come from a monotonically increasing counter and are never reused.
pub struct InMemoryUserRepository {
    users: DashMap<i32, User>,
    id_counter: AtomicI32,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            id_counter: AtomicI32::new(1),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUserRepository {
    async fn list_users(&self) -> DomainResult<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|e| e.value().clone()).collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn get_user_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        Ok(self.users.get(&id).map(|e| e.value().clone()))
    }

    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let id = self.id_counter.fetch_add(1, Ordering::SeqCst);
        let user = User {
            id,
            name: dto.name,
            age: dto.age,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: i32) -> DomainResult<()> {
        self.users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("User", "id", id))
    }
}
