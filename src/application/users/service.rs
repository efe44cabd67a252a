//! User use-cases
//!
//! HTTP handlers are thin wrappers that delegate here. Path ids arrive as raw
//! strings and are parsed once, so handlers never see a half-validated id.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{
    parse_user_id, CreateUserDto, DomainError, DomainResult, User, UserRepositoryInterface,
};

pub struct UserService {
    repo: Arc<dyn UserRepositoryInterface>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepositoryInterface>) -> Self {
        Self { repo }
    }

    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        let users = self.repo.list_users().await?;
        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    /// Fetch one user; unknown ids are `NotFound`, malformed ones `Validation`.
    pub async fn get_user(&self, raw_id: &str) -> DomainResult<User> {
        let id = parse_user_id(raw_id)?;
        self.repo
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", id))
    }

    pub async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let user = self.repo.create_user(dto).await?;
        info!(user_id = user.id, "User created");
        Ok(user)
    }

    pub async fn delete_user(&self, raw_id: &str) -> DomainResult<()> {
        let id = parse_user_id(raw_id)?;
        self.repo.delete_user(id).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }
}
