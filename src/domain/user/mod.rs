//! User domain
//!
//! Registered accounts. Users are referenced by teams (administrator,
//! members) and tasks (creator, assignee).

mod entity;
mod repository;
mod validation;

pub use entity::{PasswordHash, User, UserId, UserSummary, EMAIL_FIELD, USERNAME_FIELD};
pub use repository::UserRepository;
pub use validation::{
    normalize_email, validate_email, validate_password, validate_user_id, validate_username,
    UserValidationError, MAX_PASSWORD_LENGTH, MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH,
    MIN_USERNAME_LENGTH,
};
