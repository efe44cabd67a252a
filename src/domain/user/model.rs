use crate::shared::{DomainError, DomainResult};

/// User model
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub age: i32,
}

/// Parse a user id taken from a request path.
pub fn parse_user_id(raw: &str) -> DomainResult<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| DomainError::Validation(format!("Malformed user id '{}'", raw)))
}
