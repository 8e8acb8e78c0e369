//! PostgreSQL storage implementation with connection pooling

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::Row;

use crate::domain::storage::{
    duplicate_field, DocumentFilter, Mutation, Storage, StorageEntity, StorageKey,
};
use crate::domain::DomainError;

/// PostgreSQL storage configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/taskflow".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// PostgreSQL document store
///
/// One table per entity type with (key, data JSONB) columns. Document
/// filters are translated to JSONB operators so scoped queries run in the
/// database.
pub struct PostgresStorage<E>
where
    E: StorageEntity,
{
    pool: PgPool,
    table_name: String,
    _phantom: PhantomData<E>,
}

impl<E> Debug for PostgresStorage<E>
where
    E: StorageEntity,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStorage")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl<E> PostgresStorage<E>
where
    E: StorageEntity,
{
    /// Creates a new PostgreSQL storage with the given pool and table name
    pub fn new(pool: PgPool, table_name: impl Into<String>) -> Self {
        Self {
            pool,
            table_name: table_name.into(),
            _phantom: PhantomData,
        }
    }

    /// Ensures the storage table exists
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                key VARCHAR(255) PRIMARY KEY,
                data JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.table_name
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create table: {}", e)))?;

        // Serves the whole-document containment built by `find_sql`
        let mut indexes = vec![format!(
            "CREATE INDEX IF NOT EXISTS {0}_data_gin ON {0} USING GIN (data jsonb_path_ops)",
            self.table_name
        )];

        for field in E::UNIQUE_FIELDS {
            indexes.push(format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {} ((data->>'{}'))",
                self.unique_index_name(field),
                self.table_name,
                field
            ));
        }

        for index in indexes {
            sqlx::query(&index)
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to create index: {}", e)))?;
        }

        Ok(())
    }

    fn unique_index_name(&self, field: &str) -> String {
        format!("{}_{}_unique", self.table_name, field)
    }

    /// Maps unique violations to conflicts, naming the duplicated field when
    /// the violated index is one of ours
    fn write_error(&self, action: &str, key: &str, e: sqlx::Error) -> DomainError {
        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                let field = db.constraint().and_then(|constraint| {
                    E::UNIQUE_FIELDS
                        .iter()
                        .find(|field| self.unique_index_name(field) == constraint)
                });

                return match field {
                    Some(field) => duplicate_field(field),
                    None => {
                        DomainError::conflict(format!("Entity with key '{}' already exists", key))
                    }
                };
            }
        }

        DomainError::storage(format!("Failed to {} entity: {}", action, e))
    }
}

/// SELECT for a document filter; `$1` is the field name and `$2` the value(s)
///
/// Containment is written against the whole document so the GIN index on
/// `data` can serve it.
fn find_sql(table_name: &str, filter: &DocumentFilter) -> String {
    let condition = match filter {
        DocumentFilter::Equals { .. } => "data->>$1 = $2",
        DocumentFilter::Contains { .. } => {
            "data @> jsonb_build_object($1::text, jsonb_build_array($2::text))"
        }
        DocumentFilter::In { .. } => "data->>$1 = ANY($2)",
    };

    format!(
        "SELECT data FROM {} WHERE {} ORDER BY created_at",
        table_name, condition
    )
}

fn decode<E: StorageEntity>(row: &sqlx::postgres::PgRow) -> Result<E, DomainError> {
    let data: serde_json::Value = row.get("data");
    serde_json::from_value(data)
        .map_err(|e| DomainError::storage(format!("Failed to deserialize entity: {}", e)))
}

fn encode<E: StorageEntity>(entity: &E) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(entity)
        .map_err(|e| DomainError::storage(format!("Failed to serialize entity: {}", e)))
}

#[async_trait]
impl<E> Storage<E> for PostgresStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let query = format!(
            "SELECT data FROM {} WHERE key = $1",
            self.table_name
        );

        let result = sqlx::query(&query)
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get entity: {}", e)))?;

        result.as_ref().map(decode).transpose()
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let query = format!(
            "SELECT data FROM {} ORDER BY created_at",
            self.table_name
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list entities: {}", e)))?;

        rows.iter().map(decode).collect()
    }

    async fn find(&self, filter: &DocumentFilter) -> Result<Vec<E>, DomainError> {
        let query = find_sql(&self.table_name, filter);

        let statement = sqlx::query(&query).bind(filter.field());
        let statement = match filter {
            DocumentFilter::Equals { value, .. } | DocumentFilter::Contains { value, .. } => {
                statement.bind(value.as_str())
            }
            DocumentFilter::In { values, .. } => statement.bind(values.as_slice()),
        };

        let rows = statement
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to query entities: {}", e)))?;

        rows.iter().map(decode).collect()
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let data = encode(&entity)?;

        let query = format!(
            r#"
            INSERT INTO {} (key, data)
            VALUES ($1, $2)
            "#,
            self.table_name
        );

        sqlx::query(&query)
            .bind(&key)
            .bind(&data)
            .execute(&self.pool)
            .await
            .map_err(|e| self.write_error("create", &key, e))?;

        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let data = encode(&entity)?;

        let query = format!(
            r#"
            UPDATE {}
            SET data = $2, updated_at = NOW()
            WHERE key = $1
            "#,
            self.table_name
        );

        let result = sqlx::query(&query)
            .bind(&key)
            .bind(&data)
            .execute(&self.pool)
            .await
            .map_err(|e| self.write_error("update", &key, e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Entity with key '{}' not found",
                key
            )));
        }

        Ok(entity)
    }

    async fn modify(&self, key: &E::Key, mutation: Mutation<E>) -> Result<Option<E>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let select = format!(
            "SELECT data FROM {} WHERE key = $1 FOR UPDATE",
            self.table_name
        );
        let row = sqlx::query(&select)
            .bind(key.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to lock entity: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        // Returning early drops `tx`, which rolls back and releases the lock
        let mut entity: E = decode(&row)?;
        mutation(&mut entity)?;
        let data = encode(&entity)?;

        let update = format!(
            "UPDATE {} SET data = $2, updated_at = NOW() WHERE key = $1",
            self.table_name
        );
        sqlx::query(&update)
            .bind(key.as_str())
            .bind(&data)
            .execute(&mut *tx)
            .await
            .map_err(|e| self.write_error("update", key.as_str(), e))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))?;

        Ok(Some(entity))
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        let query = format!(
            "DELETE FROM {} WHERE key = $1",
            self.table_name
        );

        let result = sqlx::query(&query)
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete entity: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let query = format!("DELETE FROM {}", self.table_name);

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to clear storage: {}", e)))?;

        Ok(())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let query = format!("SELECT COUNT(*) as count FROM {}", self.table_name);

        let row = sqlx::query(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count entities: {}", e)))?;

        let count: i64 = row.get("count");
        Ok(count as usize)
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        let query = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE key = $1) as exists",
            self.table_name
        );

        let row = sqlx::query(&query)
            .bind(key.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check existence: {}", e)))?;

        let exists: bool = row.get("exists");
        Ok(exists)
    }
}
