//! User service for registration and authentication

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{
    normalize_email, validate_email, validate_password, validate_username, User, UserId,
    UserRepository,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for registering a new account
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// User service for registration and authentication
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new user
    ///
    /// Every field is validated before the password is hashed. A username or
    /// email that is already taken is a conflict.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, DomainError> {
        let username = request.username.trim();
        validate_username(username).map_err(|e| DomainError::validation(e.to_string()))?;

        let email = normalize_email(&request.email);
        validate_email(&email).map_err(|e| DomainError::validation(e.to_string()))?;

        validate_password(&request.password)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if self.repository.email_exists(&email).await? {
            return Err(DomainError::conflict("Email is already registered"));
        }

        if self.repository.username_exists(username).await? {
            return Err(DomainError::conflict("Username is already taken"));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let user = User::new(username, &email, password_hash)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let user = self.repository.create(user).await?;
        info!(user_id = %user.id(), username = %user.username(), "Registered user");

        Ok(user)
    }

    /// Check an email/password pair
    ///
    /// Returns `None` for an unknown email and for a wrong password alike.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let Some(user) = self.repository.get_by_email(email).await? else {
            debug!("Login attempt for unknown email");
            return Ok(None);
        };

        if !self.hasher.verify(password, user.password_hash()) {
            debug!(user_id = %user.id(), "Login attempt with wrong password");
            return Ok(None);
        }

        Ok(Some(user))
    }

    pub async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }
}
