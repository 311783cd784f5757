//! User repository trait for dependency injection and testing.
//!
//! Use `MockUserRepository` in tests to mock the behavior.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::user::User;
use crate::types::UserId;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by login name.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Find a user by ID.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AppError>;
}
