//! Storage-backed user repository implementation

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::storage::{DocumentFilter, Storage};
use crate::domain::user::{
    normalize_email, User, UserId, UserRepository, EMAIL_FIELD, USERNAME_FIELD,
};
use crate::domain::DomainError;

/// Storage-backed implementation of UserRepository
#[derive(Debug)]
pub struct StorageUserRepository {
    storage: Arc<dyn Storage<User>>,
}

impl StorageUserRepository {
    pub fn new(storage: Arc<dyn Storage<User>>) -> Self {
        Self { storage }
    }

    async fn find_one(&self, filter: DocumentFilter) -> Result<Option<User>, DomainError> {
        Ok(self.storage.find(&filter).await?.into_iter().next())
    }
}

#[async_trait]
impl UserRepository for StorageUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.storage.get(id).await
    }

    async fn get_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let filter = DocumentFilter::one_of("id", ids.iter().map(|id| id.as_str().to_string()));
        self.storage.find(&filter).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_one(DocumentFilter::equals(EMAIL_FIELD, normalize_email(email)))
            .await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.find_one(DocumentFilter::equals(USERNAME_FIELD, username.trim()))
            .await
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        if self.email_exists(user.email()).await? {
            return Err(DomainError::conflict("Email is already registered"));
        }

        if self.username_exists(user.username()).await? {
            return Err(DomainError::conflict("Username is already taken"));
        }

        self.storage.create(user).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.storage.count().await
    }
}
