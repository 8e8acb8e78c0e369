//! Domain layer - Core business logic and entities

pub mod access;
pub mod error;
pub mod storage;
pub mod task;
pub mod team;
pub mod user;

pub use access::{AuthorizationGate, Decision, Denial, DenialKind, MembershipOracle};
pub use error::DomainError;
pub use storage::{Storage, StorageEntity, StorageKey};
