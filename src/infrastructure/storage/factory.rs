//! Storage factory for runtime backend selection

use std::sync::Arc;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::domain::storage::{Storage, StorageEntity};
use crate::domain::DomainError;

use super::in_memory::InMemoryStorage;
use super::postgres::{PostgresConfig, PostgresStorage};

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (development and tests)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    pub fn postgres_url(url: impl Into<String>) -> Self {
        Self::Postgres(PostgresConfig::new(url))
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Hands out one document store per entity type
///
/// For PostgreSQL every store shares a single connection pool.
#[derive(Debug, Clone)]
pub enum StorageFactory {
    InMemory,
    Postgres(PgPool),
}

impl StorageFactory {
    /// Connect to the configured backend
    pub async fn connect(config: &StorageConfig) -> Result<Self, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory storage");
                Ok(Self::InMemory)
            }
            StorageConfig::Postgres(pg) => {
                let pool = PgPoolOptions::new()
                    .max_connections(pg.max_connections)
                    .min_connections(pg.min_connections)
                    .acquire_timeout(std::time::Duration::from_secs(pg.connect_timeout_secs))
                    .idle_timeout(std::time::Duration::from_secs(pg.idle_timeout_secs))
                    .connect(&pg.url)
                    .await
                    .map_err(|e| {
                        DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e))
                    })?;

                info!(max_connections = pg.max_connections, "Connected to PostgreSQL");
                Ok(Self::Postgres(pool))
            }
        }
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }

    /// Store for entity type `E`, creating its table if needed
    pub async fn create<E>(&self, table_name: &str) -> Result<Arc<dyn Storage<E>>, DomainError>
    where
        E: StorageEntity + 'static,
    {
        match self {
            Self::InMemory => Ok(Arc::new(InMemoryStorage::<E>::new())),
            Self::Postgres(pool) => {
                let storage = PostgresStorage::<E>::new(pool.clone(), table_name);
                storage.ensure_table().await?;
                Ok(Arc::new(storage))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::team::{Team, TeamId};
    use crate::domain::user::UserId;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!(StorageType::from_str("memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("In-Memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("postgres"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("pg"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("mongodb"), None);
    }

    #[test]
    fn test_storage_config_types() {
        assert_eq!(StorageConfig::in_memory().storage_type(), StorageType::InMemory);
        assert_eq!(
            StorageConfig::postgres_url("postgres://localhost/taskflow").storage_type(),
            StorageType::Postgres
        );
    }

    #[tokio::test]
    async fn test_in_memory_factory_creates_independent_stores() {
        let factory = StorageFactory::connect(&StorageConfig::in_memory())
            .await
            .unwrap();
        assert_eq!(factory.storage_type(), StorageType::InMemory);

        let first = factory.create::<Team>("teams").await.unwrap();
        let second = factory.create::<Team>("teams").await.unwrap();

        let team = Team::new("Platform", UserId::generate()).unwrap();
        first.create(team.clone()).await.unwrap();

        assert!(first.exists(team.id()).await.unwrap());
        assert!(!second.exists(&TeamId::generate()).await.unwrap());
        assert_eq!(second.count().await.unwrap(), 0);
    }
}
