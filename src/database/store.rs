use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the license store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Connection handle for the embedded license store.
///
/// Queries check a connection out of the pool and return it when the result
/// is dropped, so release is guaranteed on both the normal-return and the
/// error path.
#[derive(Debug, Clone)]
pub struct LicenseStore {
    pool: SqlitePool,
}

impl LicenseStore {
    /// Open (creating if missing) the store file named by the configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        if config.store_path.is_empty() {
            return Err(StoreError::ConfigMissing("store_path"));
        }

        let options = SqliteConnectOptions::new()
            .filename(&config.store_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_with(options)
            .await?;

        info!("Opened license store at: {}", config.store_path);
        Ok(Self { pool })
    }

    /// In-memory store with the schema applied, for tests and local
    /// experiments. Single connection: each new in-memory connection would
    /// otherwise see its own empty database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Bootstrap the license table if an out-of-band process has not created
    /// it yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS licencas (
                lice_docu TEXT PRIMARY KEY,
                lice_nome TEXT NOT NULL,
                lice_bloq BOOLEAN NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Pings the store to ensure connectivity
    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed license store pool");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_rejects_empty_store_path() {
        let config = DatabaseConfig {
            store_path: String::new(),
            max_connections: 1,
            connection_timeout: 5,
            enable_query_logging: false,
        };
        let result = tokio::runtime::Runtime::new()
            .expect("runtime")
            .block_on(LicenseStore::connect(&config));
        assert!(matches!(result, Err(StoreError::ConfigMissing("store_path"))));
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let store = LicenseStore::in_memory().await.expect("store");
        // in_memory already applied the schema once
        store.ensure_schema().await.expect("second apply");
        store.health_check().await.expect("healthy");
    }
}
