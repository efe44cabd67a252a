//! User DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CreateUserDto, User};

/// User API representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub age: i32,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            age: u.age,
        }
    }
}

/// Create user request. An `id` in the body is ignored; the store assigns it.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub age: i32,
}

impl From<CreateUserRequest> for CreateUserDto {
    fn from(r: CreateUserRequest) -> Self {
        Self {
            name: r.name,
            age: r.age,
        }
    }
}
