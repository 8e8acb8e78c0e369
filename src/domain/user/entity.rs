//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{
    normalize_email, validate_email, validate_user_id, validate_username, UserValidationError,
};
use crate::domain::storage::{StorageEntity, StorageKey};

/// User identifier (UUID v4, text form)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Parse a UserId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        validate_user_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for UserId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// A stored password hash. Its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash([hidden])")
    }
}

/// Serialized field holding the normalized email
pub const EMAIL_FIELD: &str = "email";

/// Serialized field holding the username
pub const USERNAME_FIELD: &str = "username";

/// User entity as persisted
///
/// The persisted document carries the password hash; anything leaving the
/// process goes through [`UserSummary`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: String,
    /// Always lowercase
    email: String,
    password_hash: PasswordHash,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a generated identifier
    ///
    /// The username is trimmed and the email normalized before validation.
    pub fn new(
        username: impl AsRef<str>,
        email: impl AsRef<str>,
        password_hash: PasswordHash,
    ) -> Result<Self, UserValidationError> {
        Self::with_id(UserId::generate(), username, email, password_hash)
    }

    /// Create a user with a known identifier
    pub fn with_id(
        id: UserId,
        username: impl AsRef<str>,
        email: impl AsRef<str>,
        password_hash: PasswordHash,
    ) -> Result<Self, UserValidationError> {
        let username = username.as_ref().trim().to_string();
        validate_username(&username)?;

        let email = normalize_email(email.as_ref());
        validate_email(&email)?;

        let now = Utc::now();

        Ok(Self {
            id,
            username,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Public projection of this user
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

impl StorageEntity for User {
    type Key = UserId;

    const UNIQUE_FIELDS: &'static [&'static str] = &[EMAIL_FIELD, USERNAME_FIELD];

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

/// The user fields other users may see
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash() -> PasswordHash {
        PasswordHash::new("$argon2id$stub")
    }

    #[test]
    fn test_user_id_generate_is_valid() {
        let id = UserId::generate();
        assert!(UserId::new(id.as_str()).is_ok());
    }

    #[test]
    fn test_user_id_rejects_garbage() {
        assert!(UserId::new("admin").is_err());
    }

    #[test]
    fn test_user_creation_normalizes() {
        let user = User::new("  alice ", "Alice@Example.COM", hash()).unwrap();

        assert_eq!(user.username(), "alice");
        assert_eq!(user.email(), "alice@example.com");
    }

    #[test]
    fn test_user_creation_invalid_email() {
        let result = User::new("alice", "not-an-email", hash());
        assert_eq!(result.unwrap_err(), UserValidationError::InvalidEmail);
    }

    #[test]
    fn test_user_creation_short_username() {
        let result = User::new(" al ", "al@example.com", hash());
        assert_eq!(
            result.unwrap_err(),
            UserValidationError::UsernameTooShort(3)
        );
    }

    #[test]
    fn test_password_hash_debug_is_redacted() {
        let user = User::new("alice", "alice@example.com", hash()).unwrap();
        let debug = format!("{:?}", user);
        assert!(!debug.contains("argon2id"));
    }

    #[test]
    fn test_unique_fields_are_serialized() {
        let user = User::new("alice", "Alice@Example.com", PasswordHash::new("h")).unwrap();
        let doc = serde_json::to_value(&user).unwrap();

        assert_eq!(User::UNIQUE_FIELDS, [EMAIL_FIELD, USERNAME_FIELD]);
        assert_eq!(doc[EMAIL_FIELD], "alice@example.com");
        assert_eq!(doc[USERNAME_FIELD], "alice");
    }

    #[test]
    fn test_summary_excludes_password_hash() {
        let user = User::new("alice", "alice@example.com", hash()).unwrap();
        let json = serde_json::to_string(&user.summary()).unwrap();

        assert!(json.contains("alice@example.com"));
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
    }
}
