//! In-memory storage implementation

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::storage::{
    duplicate_field, DocumentFilter, Mutation, Storage, StorageEntity, StorageKey,
};
use crate::domain::DomainError;

/// Thread-safe in-memory document store
///
/// The default backend. Data is lost when the process terminates.
#[derive(Debug)]
pub struct InMemoryStorage<E>
where
    E: StorageEntity,
{
    entities: RwLock<HashMap<String, E>>,
}

impl<E> Default for InMemoryStorage<E>
where
    E: StorageEntity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryStorage<E>
where
    E: StorageEntity,
{
    /// Creates a new empty in-memory storage
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
        }
    }

    /// Creates storage pre-populated with entities
    pub fn with_entities(entities: Vec<E>) -> Self {
        let map = entities
            .into_iter()
            .map(|entity| (entity.key().as_str().to_string(), entity))
            .collect();

        Self {
            entities: RwLock::new(map),
        }
    }
}

fn read_lock_error(e: impl std::fmt::Display) -> DomainError {
    DomainError::storage(format!("Failed to acquire read lock: {}", e))
}

fn write_lock_error(e: impl std::fmt::Display) -> DomainError {
    DomainError::storage(format!("Failed to acquire write lock: {}", e))
}

fn to_document<E: StorageEntity>(entity: &E) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(entity)
        .map_err(|e| DomainError::storage(format!("Failed to serialize entity: {}", e)))
}

/// Rejects `entity` if another document already holds one of its unique
/// field values. Callers hold the write lock across check and insert.
fn check_unique<E: StorageEntity>(
    entities: &HashMap<String, E>,
    entity: &E,
) -> Result<(), DomainError> {
    if E::UNIQUE_FIELDS.is_empty() {
        return Ok(());
    }

    let key = entity.key().as_str();
    let document = to_document(entity)?;

    for other in entities.values().filter(|other| other.key().as_str() != key) {
        let other = to_document(other)?;

        for field in E::UNIQUE_FIELDS {
            match document.get(*field) {
                Some(value) if !value.is_null() && other.get(*field) == Some(value) => {
                    return Err(duplicate_field(field));
                }
                _ => {}
            }
        }
    }

    Ok(())
}

#[async_trait]
impl<E> Storage<E> for InMemoryStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let entities = self.entities.read().map_err(read_lock_error)?;
        Ok(entities.get(key.as_str()).cloned())
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let entities = self.entities.read().map_err(read_lock_error)?;
        Ok(entities.values().cloned().collect())
    }

    async fn find(&self, filter: &DocumentFilter) -> Result<Vec<E>, DomainError> {
        let entities = self.entities.read().map_err(read_lock_error)?;
        let mut found = Vec::new();

        for entity in entities.values() {
            if filter.matches(&to_document(entity)?) {
                found.push(entity.clone());
            }
        }

        Ok(found)
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let mut entities = self.entities.write().map_err(write_lock_error)?;

        if entities.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "Entity with key '{}' already exists",
                key
            )));
        }

        check_unique(&entities, &entity)?;
        entities.insert(key, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let mut entities = self.entities.write().map_err(write_lock_error)?;

        if !entities.contains_key(&key) {
            return Err(DomainError::not_found(format!(
                "Entity with key '{}' not found",
                key
            )));
        }

        check_unique(&entities, &entity)?;
        entities.insert(key, entity.clone());
        Ok(entity)
    }

    async fn modify(&self, key: &E::Key, mutation: Mutation<E>) -> Result<Option<E>, DomainError> {
        // The write lock is held for the whole read-modify-write
        let mut entities = self.entities.write().map_err(write_lock_error)?;

        let Some(mut updated) = entities.get(key.as_str()).cloned() else {
            return Ok(None);
        };

        mutation(&mut updated)?;
        check_unique(&entities, &updated)?;
        entities.insert(key.as_str().to_string(), updated.clone());

        Ok(Some(updated))
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        let mut entities = self.entities.write().map_err(write_lock_error)?;
        Ok(entities.remove(key.as_str()).is_some())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut entities = self.entities.write().map_err(write_lock_error)?;
        entities.clear();
        Ok(())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let entities = self.entities.read().map_err(read_lock_error)?;
        Ok(entities.len())
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        let entities = self.entities.read().map_err(read_lock_error)?;
        Ok(entities.contains_key(key.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    struct BoardId(String);

    impl StorageKey for BoardId {
        fn as_str(&self) -> &str {
            &self.0
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Board {
        id: BoardId,
        owner: String,
        watchers: Vec<String>,
    }

    impl StorageEntity for Board {
        type Key = BoardId;

        fn key(&self) -> &Self::Key {
            &self.id
        }
    }

    fn board(id: &str, owner: &str, watchers: &[&str]) -> Board {
        Board {
            id: BoardId(id.to_string()),
            owner: owner.to_string(),
            watchers: watchers.iter().map(|w| w.to_string()).collect(),
        }
    }

    fn key(id: &str) -> BoardId {
        BoardId(id.to_string())
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let storage: InMemoryStorage<Board> = InMemoryStorage::new();
        let b = board("1", "ana", &[]);

        storage.create(b.clone()).await.unwrap();

        let result = storage.get(&key("1")).await.unwrap();
        assert_eq!(result, Some(b));
    }

    #[tokio::test]
    async fn test_create_conflict() {
        let storage: InMemoryStorage<Board> = InMemoryStorage::new();
        let b = board("1", "ana", &[]);

        storage.create(b.clone()).await.unwrap();
        let result = storage.create(b).await;

        assert!(matches!(result.unwrap_err(), DomainError::Conflict { .. }));
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Handle {
        id: BoardId,
        slug: String,
    }

    impl StorageEntity for Handle {
        type Key = BoardId;

        const UNIQUE_FIELDS: &'static [&'static str] = &["slug"];

        fn key(&self) -> &Self::Key {
            &self.id
        }
    }

    fn handle(id: &str, slug: &str) -> Handle {
        Handle {
            id: key(id),
            slug: slug.to_string(),
        }
    }

    #[tokio::test]
    async fn test_unique_field_rejected_on_create() {
        let storage: InMemoryStorage<Handle> = InMemoryStorage::new();
        storage.create(handle("1", "ana")).await.unwrap();

        let result = storage.create(handle("2", "ana")).await;

        assert!(matches!(result.unwrap_err(), DomainError::Conflict { .. }));
        assert_eq!(storage.count().await.unwrap(), 1);
        storage.create(handle("3", "ben")).await.unwrap();
    }

    #[tokio::test]
    async fn test_unique_field_checked_on_update_and_modify() {
        let storage: InMemoryStorage<Handle> = InMemoryStorage::new();
        storage.create(handle("1", "ana")).await.unwrap();
        storage.create(handle("2", "ben")).await.unwrap();

        // Rewriting a document with its own value is fine
        storage.update(handle("1", "ana")).await.unwrap();

        let result = storage.update(handle("2", "ana")).await;
        assert!(matches!(result.unwrap_err(), DomainError::Conflict { .. }));

        let result = storage
            .modify(
                &key("2"),
                Box::new(|h: &mut Handle| {
                    h.slug = "ana".to_string();
                    Ok(())
                }),
            )
            .await;
        assert!(matches!(result.unwrap_err(), DomainError::Conflict { .. }));
        assert_eq!(storage.get(&key("2")).await.unwrap().unwrap().slug, "ben");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_keep_field_unique() {
        let storage = Arc::new(InMemoryStorage::<Handle>::new());

        let attempts: Vec<_> = (0..16)
            .map(|i| {
                let storage = storage.clone();
                tokio::spawn(async move { storage.create(handle(&i.to_string(), "same")).await })
            })
            .collect();

        let mut created = 0;
        for attempt in attempts {
            if attempt.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(storage.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let storage: InMemoryStorage<Board> = InMemoryStorage::new();

        let result = storage.update(board("1", "ana", &[])).await;
        assert!(matches!(result.unwrap_err(), DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_save_creates_then_updates() {
        let storage: InMemoryStorage<Board> = InMemoryStorage::new();

        storage.save(board("1", "ana", &[])).await.unwrap();
        storage.save(board("1", "ben", &[])).await.unwrap();

        let stored = storage.get(&key("1")).await.unwrap().unwrap();
        assert_eq!(stored.owner, "ben");
        assert_eq!(storage.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let storage = InMemoryStorage::with_entities(vec![board("1", "ana", &[])]);

        assert!(storage.delete(&key("1")).await.unwrap());
        assert!(!storage.delete(&key("1")).await.unwrap());
        assert!(!storage.exists(&key("1")).await.unwrap());
    }

    #[tokio::test]
    async fn test_clear() {
        let storage =
            InMemoryStorage::with_entities(vec![board("1", "ana", &[]), board("2", "ben", &[])]);

        storage.clear().await.unwrap();
        assert_eq!(storage.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_by_array_membership() {
        let storage = InMemoryStorage::with_entities(vec![
            board("1", "ana", &["ben", "cy"]),
            board("2", "ben", &["ana"]),
            board("3", "cy", &[]),
        ]);

        let mut found = storage
            .find(&DocumentFilter::contains("watchers", "ana"))
            .await
            .unwrap();
        found.sort_by(|a, b| a.id.0.cmp(&b.id.0));

        assert_eq!(found, vec![board("2", "ben", &["ana"])]);
    }

    #[tokio::test]
    async fn test_find_one_of() {
        let storage = InMemoryStorage::with_entities(vec![
            board("1", "ana", &[]),
            board("2", "ben", &[]),
            board("3", "cy", &[]),
        ]);

        let found = storage
            .find(&DocumentFilter::one_of("owner", ["ana", "cy"]))
            .await
            .unwrap();
        assert_eq!(found.len(), 2);

        let none = storage
            .find(&DocumentFilter::one_of("owner", Vec::<String>::new()))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_modify_missing_key() {
        let storage: InMemoryStorage<Board> = InMemoryStorage::new();

        let result = storage
            .modify(&key("1"), Box::new(|b: &mut Board| {
                b.owner = "ana".to_string();
                Ok(())
            }))
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(storage.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_modify_rejected_mutation_writes_nothing() {
        let storage = InMemoryStorage::with_entities(vec![board("1", "ana", &[])]);

        let result = storage
            .modify(&key("1"), Box::new(|b: &mut Board| {
                b.owner = "ben".to_string();
                Err(DomainError::validation("rejected"))
            }))
            .await;
        assert!(result.is_err());

        let stored = storage.get(&key("1")).await.unwrap().unwrap();
        assert_eq!(stored.owner, "ana");
    }

    #[tokio::test]
    async fn test_concurrent_modify_keeps_every_write() {
        let storage = Arc::new(InMemoryStorage::with_entities(vec![board("1", "ana", &[])]));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let storage = storage.clone();
                tokio::spawn(async move {
                    storage
                        .modify(&key("1"), Box::new(move |b: &mut Board| {
                            b.watchers.push(format!("w{i}"));
                            Ok(())
                        }))
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = storage.get(&key("1")).await.unwrap().unwrap();
        assert_eq!(stored.watchers.len(), 16);
    }
}
