//! Storage entity traits

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

use crate::domain::DomainError;

/// Trait for types that can be used as document keys
pub trait StorageKey: Clone + Debug + Send + Sync + Eq + std::hash::Hash {
    /// Returns the key as a string for backends keyed by text
    fn as_str(&self) -> &str;
}

/// Trait for documents that can be persisted
///
/// Entities are stored as JSON documents; their serialized field names are
/// what a [`DocumentFilter`](super::DocumentFilter) matches against.
pub trait StorageEntity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    /// The key type for this entity
    type Key: StorageKey;

    /// Serialized top-level fields whose values must be unique across the
    /// store; every backend rejects a write that would duplicate one
    const UNIQUE_FIELDS: &'static [&'static str] = &[];

    /// Returns the entity's key
    fn key(&self) -> &Self::Key;
}

/// Conflict for a write that would duplicate a unique field
pub fn duplicate_field(field: &str) -> DomainError {
    DomainError::conflict(format!("Another record already uses this {}", field))
}
