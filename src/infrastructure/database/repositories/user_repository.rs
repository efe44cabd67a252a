use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, Set};

use crate::domain::{CreateUserDto, DomainError, DomainResult, User, UserRepositoryInterface};
use crate::infrastructure::database::entities::user;
use crate::infrastructure::database::DataStore;

/// SeaORM-backed repository for the `users` table.
///
/// Every statement is built by the SeaORM query builder, so caller-supplied
/// values always travel as bound parameters.
pub struct UserRepository {
    store: DataStore,
}

impl UserRepository {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        name: model.name,
        age: model.age,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn list_users(&self) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .all(self.store.connection())
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn get_user_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(self.store.connection())
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let new_user = user::ActiveModel {
            id: NotSet,
            name: Set(dto.name),
            age: Set(dto.age),
        };

        let created = new_user
            .insert(self.store.connection())
            .await
            .map_err(db_err)?;

        Ok(user_model_to_domain(created))
    }

    async fn delete_user(&self, id: i32) -> DomainResult<()> {
        let result = user::Entity::delete_by_id(id)
            .exec(self.store.connection())
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("User", "id", id));
        }

        Ok(())
    }
}
