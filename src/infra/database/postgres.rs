//! PostgreSQL transaction log implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

use crate::config::{DatabaseOptions, MigrationMode, StoragePlatform};
use crate::domain::{
    ClientError, NewTransactionRecord, StoreError, TransactionLog, TransactionRecord,
};

/// PostgreSQL connection pool configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(3),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

/// PostgreSQL-backed transaction log with connection pooling.
#[derive(Debug)]
pub struct PostgresTransactionLog {
    pool: PgPool,
}

impl PostgresTransactionLog {
    /// Create a new log with custom pool configuration.
    pub async fn new(database_url: &str, config: PostgresConfig) -> Result<Self, ClientError> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect(database_url)
            .await
            .map_err(|e| ClientError::Store(StoreError::Connection(e.to_string())))?;
        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Create a new log with default pool configuration.
    pub async fn with_defaults(database_url: &str) -> Result<Self, ClientError> {
        Self::new(database_url, PostgresConfig::default()).await
    }

    /// Build a log from [`DatabaseOptions`], honoring platform and
    /// migration mode. `MigrationMode::Automatic` applies pending schema
    /// migrations before the log is handed out; `MigrationMode::None`
    /// leaves the schema untouched.
    pub async fn connect(options: &DatabaseOptions) -> Result<Self, ClientError> {
        if options.platform != StoragePlatform::Postgres {
            return Err(ClientError::NotSupported(format!(
                "storage platform '{}'",
                options.platform
            )));
        }

        let log = Self::with_defaults(&options.connection_url).await?;
        if options.migration == MigrationMode::Automatic {
            log.run_migrations().await?;
        }
        Ok(log)
    }

    /// Run database migrations using sqlx migrate
    pub async fn run_migrations(&self) -> Result<(), ClientError> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ClientError::Store(StoreError::Migration(e.to_string())))?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the underlying connection pool (for testing)
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_to_record(row: &sqlx::postgres::PgRow) -> TransactionRecord {
        TransactionRecord {
            id: row.get("id"),
            chain_name: row.get("chain_name"),
            method: row.get("method"),
            txid: row.get("txid"),
            created_by: row.get("created_by"),
            last_modified_by: row.get("last_modified_by"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl TransactionLog for PostgresTransactionLog {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), ClientError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| ClientError::Store(StoreError::Connection(e.to_string())))?;
        Ok(())
    }

    #[instrument(skip(self, record), fields(chain = %record.chain_name, method = %record.method))]
    async fn create(&self, record: &NewTransactionRecord) -> Result<TransactionRecord, ClientError> {
        let id = format!("txn_{}", uuid::Uuid::new_v4());
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO transaction_records (id, chain_name, method, txid,
                                             created_by, last_modified_by,
                                             created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&id)
        .bind(&record.chain_name)
        .bind(&record.method)
        .bind(&record.txid)
        .bind(&record.actor)
        .bind(&record.actor)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| ClientError::Store(StoreError::from(e)))?;

        Ok(TransactionRecord {
            id,
            chain_name: record.chain_name.clone(),
            method: record.method.clone(),
            txid: record.txid.clone(),
            created_by: record.actor.clone(),
            last_modified_by: record.actor.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    #[instrument(skip(self))]
    async fn find(
        &self,
        chain_name: &str,
        method: &str,
        txid: &str,
    ) -> Result<Option<TransactionRecord>, ClientError> {
        let row = sqlx::query(
            r#"
            SELECT id, chain_name, method, txid,
                   created_by, last_modified_by, created_at, updated_at
            FROM transaction_records
            WHERE chain_name = $1 AND method = $2 AND txid = $3
            "#,
        )
        .bind(chain_name)
        .bind(method)
        .bind(txid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ClientError::Store(StoreError::Query(e.to_string())))?;

        Ok(row.as_ref().map(Self::row_to_record))
    }

    #[instrument(skip(self))]
    async fn recent(&self, limit: i64) -> Result<Vec<TransactionRecord>, ClientError> {
        let limit = limit.clamp(1, 500);

        let rows = sqlx::query(
            r#"
            SELECT id, chain_name, method, txid,
                   created_by, last_modified_by, created_at, updated_at
            FROM transaction_records
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ClientError::Store(StoreError::Query(e.to_string())))?;

        Ok(rows.iter().map(Self::row_to_record).collect())
    }
}
