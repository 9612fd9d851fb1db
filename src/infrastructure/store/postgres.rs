//! PostgreSQL bill store with connection pooling
//!
//! Documents are stored as JSONB alongside the columns the two query
//! shapes need: congress + update timestamp for the recency scan, and a
//! TEXT[] of normalized subject labels under a GIN index for the
//! "contains any" filter.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;

use crate::domain::cache::{BillStore, CachedBill, IngestionMetadata};
use crate::domain::{BillId, DomainError, Subject};

/// PostgreSQL store configuration
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
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/legisfeed".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
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

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }
}

/// PostgreSQL-backed document store for cached bills
#[derive(Debug)]
pub struct PostgresBillStore {
    pool: PgPool,
}

impl PostgresBillStore {
    /// Creates a store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a new pool and creates the store
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Ok(Self::new(pool))
    }

    /// Ensures tables and indexes exist
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS bill_cache (
                bill_key VARCHAR(64) PRIMARY KEY,
                congress INT NOT NULL,
                update_date TIMESTAMPTZ NOT NULL,
                subjects TEXT[] NOT NULL DEFAULT '{}',
                cached_at TIMESTAMPTZ NOT NULL,
                source VARCHAR(32) NOT NULL,
                document JSONB NOT NULL
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_bill_cache_recency \
             ON bill_cache (congress, update_date DESC)",
            "CREATE INDEX IF NOT EXISTS idx_bill_cache_subjects \
             ON bill_cache USING GIN (subjects)",
            r#"
            CREATE TABLE IF NOT EXISTS ingestion_metadata (
                target VARCHAR(64) PRIMARY KEY,
                document JSONB NOT NULL
            )
            "#,
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to create schema: {}", e)))?;
        }

        Ok(())
    }

    fn decode_entry(row: &sqlx::postgres::PgRow) -> Result<CachedBill, DomainError> {
        let document: serde_json::Value = row.get("document");
        serde_json::from_value(document)
            .map_err(|e| DomainError::storage(format!("Failed to deserialize cached bill: {}", e)))
    }

    fn subject_labels(entry: &CachedBill) -> Vec<String> {
        entry
            .bill
            .subjects
            .iter()
            .map(|s| s.label().to_string())
            .collect()
    }
}

#[async_trait]
impl BillStore for PostgresBillStore {
    async fn upsert(&self, entry: CachedBill) -> Result<(), DomainError> {
        let document = serde_json::to_value(&entry)
            .map_err(|e| DomainError::storage(format!("Failed to serialize cached bill: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO bill_cache
                (bill_key, congress, update_date, subjects, cached_at, source, document)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (bill_key) DO UPDATE SET
                congress = EXCLUDED.congress,
                update_date = EXCLUDED.update_date,
                subjects = EXCLUDED.subjects,
                cached_at = EXCLUDED.cached_at,
                source = EXCLUDED.source,
                document = EXCLUDED.document
            "#,
        )
        .bind(entry.bill.id.key())
        .bind(i32::from(entry.bill.id.congress()))
        .bind(entry.bill.update_date)
        .bind(Self::subject_labels(&entry))
        .bind(entry.cached_at)
        .bind(entry.source.to_string())
        .bind(document)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to upsert bill: {}", e)))?;

        Ok(())
    }

    async fn get(&self, id: &BillId) -> Result<Option<CachedBill>, DomainError> {
        let row = sqlx::query("SELECT document FROM bill_cache WHERE bill_key = $1")
            .bind(id.key())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get bill: {}", e)))?;

        row.as_ref().map(Self::decode_entry).transpose()
    }

    async fn recent(
        &self,
        congress: Option<u16>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CachedBill>, DomainError> {
        let rows = match congress {
            Some(congress) => {
                sqlx::query(
                    "SELECT document FROM bill_cache WHERE congress = $1 \
                     ORDER BY update_date DESC LIMIT $2 OFFSET $3",
                )
                .bind(i32::from(congress))
                .bind(limit as i64)
                .bind(offset as i64)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    "SELECT document FROM bill_cache \
                     ORDER BY update_date DESC LIMIT $1 OFFSET $2",
                )
                .bind(limit as i64)
                .bind(offset as i64)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to query recent bills: {}", e)))?;

        rows.iter().map(Self::decode_entry).collect()
    }

    async fn with_any_subject(
        &self,
        subjects: &[Subject],
        limit: usize,
    ) -> Result<Vec<CachedBill>, DomainError> {
        let labels: Vec<String> = subjects.iter().map(|s| s.label().to_string()).collect();

        let rows = sqlx::query(
            "SELECT document FROM bill_cache WHERE subjects && $1 \
             ORDER BY update_date DESC LIMIT $2",
        )
        .bind(&labels)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to query bills by subject: {}", e)))?;

        rows.iter().map(Self::decode_entry).collect()
    }

    async fn put_metadata(&self, meta: IngestionMetadata) -> Result<(), DomainError> {
        let document = serde_json::to_value(&meta)
            .map_err(|e| DomainError::storage(format!("Failed to serialize metadata: {}", e)))?;

        sqlx::query(
            "INSERT INTO ingestion_metadata (target, document) VALUES ($1, $2) \
             ON CONFLICT (target) DO UPDATE SET document = EXCLUDED.document",
        )
        .bind(&meta.target)
        .bind(document)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to write metadata: {}", e)))?;

        Ok(())
    }

    async fn metadata(&self, target: &str) -> Result<Option<IngestionMetadata>, DomainError> {
        let row = sqlx::query("SELECT document FROM ingestion_metadata WHERE target = $1")
            .bind(target)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get metadata: {}", e)))?;

        match row {
            Some(row) => {
                let document: serde_json::Value = row.get("document");
                let meta = serde_json::from_value(document).map_err(|e| {
                    DomainError::storage(format!("Failed to deserialize metadata: {}", e))
                })?;
                Ok(Some(meta))
            }
            None => Ok(None),
        }
    }

    async fn clear(&self) -> Result<(), DomainError> {
        sqlx::query("TRUNCATE bill_cache, ingestion_metadata")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to clear store: {}", e)))?;

        Ok(())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM bill_cache")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count bills: {}", e)))?;

        let count: i64 = row.get("count");
        Ok(count as usize)
    }
}
