//! User validation utilities

use thiserror::Error;
use validator::ValidateEmail;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Invalid user ID: '{0}'")]
    InvalidId(String),

    #[error("Please provide a username")]
    EmptyUsername,

    #[error("Username must be at least {0} characters long")]
    UsernameTooShort(usize),

    #[error("Username cannot be more than {0} characters")]
    UsernameTooLong(usize),

    #[error("Username cannot contain whitespace or control characters")]
    InvalidUsernameCharacter,

    #[error("Please provide an email")]
    EmptyEmail,

    #[error("Please provide a valid email")]
    InvalidEmail,

    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),

    #[error("Password cannot be more than {0} characters")]
    PasswordTooLong(usize),
}

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 20;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Validate a user ID (UUID text form)
pub fn validate_user_id(id: &str) -> Result<(), UserValidationError> {
    uuid::Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| UserValidationError::InvalidId(id.to_string()))
}

/// Validate an already-trimmed username
///
/// Rules:
/// - 3 to 20 characters
/// - No whitespace or control characters
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    let length = username.chars().count();

    if length < MIN_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooShort(MIN_USERNAME_LENGTH));
    }

    if length > MAX_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    if username
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(UserValidationError::InvalidUsernameCharacter);
    }

    Ok(())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if !email.validate_email() {
        return Err(UserValidationError::InvalidEmail);
    }

    Ok(())
}

/// Canonical form of an email: trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate a password
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user_id() {
        assert!(validate_user_id("6f1c2b0e-2f64-4c55-9d57-2d4f1f7c1a10").is_ok());
        assert!(validate_user_id("not-a-uuid").is_err());
        assert!(validate_user_id("").is_err());
    }

    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("bob").is_ok());
        assert!(validate_username("alice_smith").is_ok());
        assert!(validate_username("a".repeat(20).as_str()).is_ok());
    }

    #[test]
    fn test_username_length_bounds() {
        assert_eq!(
            validate_username(""),
            Err(UserValidationError::EmptyUsername)
        );
        assert_eq!(
            validate_username("ab"),
            Err(UserValidationError::UsernameTooShort(3))
        );
        assert_eq!(
            validate_username(&"a".repeat(21)),
            Err(UserValidationError::UsernameTooLong(20))
        );
    }

    #[test]
    fn test_username_whitespace() {
        assert_eq!(
            validate_username("bob smith"),
            Err(UserValidationError::InvalidUsernameCharacter)
        );
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("bob@example.com").is_ok());
        assert_eq!(validate_email(""), Err(UserValidationError::EmptyEmail));
        assert_eq!(
            validate_email("bob-at-example"),
            Err(UserValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Bob@Example.COM "), "bob@example.com");
    }

    #[test]
    fn test_password_bounds() {
        assert!(validate_password("secret").is_ok());
        assert_eq!(
            validate_password("12345"),
            Err(UserValidationError::PasswordTooShort(6))
        );
        assert_eq!(
            validate_password(&"a".repeat(129)),
            Err(UserValidationError::PasswordTooLong(128))
        );
    }
}
