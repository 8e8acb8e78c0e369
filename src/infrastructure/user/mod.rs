//! User infrastructure module
//!
//! Storage-backed user repository, Argon2 password hashing and the user
//! service behind registration and login.

mod directory;
mod password;
mod repository;
mod service;

pub use directory::load_summaries;
pub use password::{Argon2Hasher, PasswordHasher};
pub use repository::StorageUserRepository;
pub use service::{RegisterRequest, UserService};
