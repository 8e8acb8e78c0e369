//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get several users at once; unknown IDs are skipped
    async fn get_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError>;

    /// Get a user by (normalized) email
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Get a user by username
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user; duplicate username or email is a conflict
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Count all users
    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if an email is taken
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }

    /// Check if a username is taken
    async fn username_exists(&self, username: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_username(username).await?.is_some())
    }
}
