//! Storage domain - Document store abstraction used by the repositories

mod entity;
mod filter;
mod repository;

pub use entity::{duplicate_field, StorageEntity, StorageKey};
pub use filter::DocumentFilter;
pub use repository::{Mutation, Storage};

#[cfg(test)]
pub use repository::mock;
