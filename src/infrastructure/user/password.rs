//! Password hashing with Argon2

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash as ParsedHash, PasswordHasher as _, PasswordVerifier,
        SaltString,
    },
    Argon2,
};
use std::fmt::Debug;

use crate::domain::user::PasswordHash;
use crate::domain::DomainError;

/// Hashes and verifies user passwords
pub trait PasswordHasher: Send + Sync + Debug {
    fn hash(&self, password: &str) -> Result<PasswordHash, DomainError>;

    /// False for a wrong password and for an unreadable stored hash alike
    fn verify(&self, password: &str, hash: &PasswordHash) -> bool;
}

/// Argon2id with the crate's default parameters and a random salt per hash
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| PasswordHash::new(hash.to_string()))
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        let Ok(parsed) = ParsedHash::new(hash.as_str()) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
