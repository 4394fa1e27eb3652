//! SQLite-backed forecast store.
//!
//! Wraps a `SqlitePool`. Every operation acquires its own connection from the
//! pool and hands it back when the operation finishes, whether it succeeded
//! or not, so no connection outlives the request that needed it.
//!
//! The schema is managed by the embedded migrations in `migrations/`.

mod record;
pub mod seed;

pub use record::{celsius_to_fahrenheit, ForecastRecord};
pub use seed::{default_forecasts, seed_if_empty, SeedOutcome};

use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Store errors, tagged with the operation that failed.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to open forecast store: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("Schema migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Store operation '{operation}' failed: {source}")]
    Query {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl StoreError {
    fn query(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| StoreError::Query { operation, source }
    }

    /// Name of the operation that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            StoreError::Connect(_) => "connect",
            StoreError::Migrate(_) => "initialize_schema",
            StoreError::Query { operation, .. } => *operation,
        }
    }
}

/// Handle to the forecast table. Cheap to clone; clones share one pool.
#[derive(Clone, Debug)]
pub struct ForecastStore {
    pool: SqlitePool,
}

impl ForecastStore {
    /// Open a connection pool for the configured database, creating the file if needed.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(StoreError::Connect)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect_with(options)
            .await
            .map_err(StoreError::Connect)?;

        tracing::info!(
            url = %config.url,
            max_connections = config.max_connections,
            "Connected to forecast store"
        );

        Ok(Self { pool })
    }

    /// Create the forecast table if it does not exist yet. Safe to call repeatedly.
    pub async fn initialize_schema(&self) -> Result<(), StoreError> {
        MIGRATOR.run(&self.pool).await?;
        tracing::debug!("Forecast store schema is up to date");
        Ok(())
    }

    /// True iff the forecast table holds no rows.
    pub async fn is_empty(&self) -> Result<bool, StoreError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(StoreError::query("is_empty"))?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM weather_forecasts")
            .fetch_one(&mut *conn)
            .await
            .map_err(StoreError::query("is_empty"))?;

        Ok(count == 0)
    }

    /// Insert all records in one transaction; either every row commits or none do.
    pub async fn insert_all(&self, records: &[ForecastRecord]) -> Result<usize, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(StoreError::query("insert_all"))?;

        for record in records {
            sqlx::query(
                "INSERT INTO weather_forecasts (date, temperature_c, summary) VALUES (?, ?, ?)",
            )
            .bind(record.date)
            .bind(record.temperature_c)
            .bind(record.summary.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(StoreError::query("insert_all"))?;
        }

        // Dropping `tx` without committing rolls back any rows inserted above
        tx.commit().await.map_err(StoreError::query("insert_all"))?;

        Ok(records.len())
    }

    /// All stored forecasts in insertion order.
    pub async fn list_all(&self) -> Result<Vec<ForecastRecord>, StoreError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(StoreError::query("list_all"))?;

        sqlx::query_as::<_, ForecastRecord>(
            "SELECT date, temperature_c, summary FROM weather_forecasts ORDER BY id",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(StoreError::query("list_all"))
    }

    /// Round-trip a trivial query to prove the store is reachable.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(StoreError::query("ping"))?;

        sqlx::query("SELECT 1")
            .execute(&mut *conn)
            .await
            .map_err(StoreError::query("ping"))?;

        Ok(())
    }

    /// Close the pool. Every later operation fails with a query error.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    async fn temp_store(dir: &tempfile::TempDir) -> ForecastStore {
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("test.db").display()),
            ..DatabaseConfig::default()
        };
        let store = ForecastStore::connect(&config).await.unwrap();
        store.initialize_schema().await.unwrap();
        store
    }

    fn sample(day: u32, temperature_c: i32, summary: &str) -> ForecastRecord {
        ForecastRecord::new(
            NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            temperature_c,
            summary,
        )
    }

    #[tokio::test]
    async fn test_new_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;

        assert!(store.is_empty().await.unwrap());
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_and_list_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;

        let records = vec![sample(1, 10, "Mild"), sample(2, -3, "Snow")];
        assert_eq!(store.insert_all(&records).await.unwrap(), 2);

        assert!(!store.is_empty().await.unwrap());
        assert_eq!(store.list_all().await.unwrap(), records);
    }

    #[tokio::test]
    async fn test_null_summary_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;

        let record = ForecastRecord {
            summary: None,
            ..sample(3, 5, "")
        };
        store.insert_all(std::slice::from_ref(&record)).await.unwrap();

        assert_eq!(store.list_all().await.unwrap(), vec![record]);
    }

    #[tokio::test]
    async fn test_failed_batch_leaves_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;
        sqlx::query(
            "CREATE TRIGGER reject_boom BEFORE INSERT ON weather_forecasts \
             WHEN NEW.summary = 'boom' BEGIN SELECT RAISE(ABORT, 'boom'); END",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let err = store
            .insert_all(&[sample(1, 10, "Mild"), sample(2, 11, "boom")])
            .await
            .unwrap_err();

        assert_eq!(err.operation(), "insert_all");
        assert!(store.is_empty().await.unwrap());
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_schema_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;
        store.insert_all(&[sample(1, 1, "Fog")]).await.unwrap();

        store.initialize_schema().await.unwrap();

        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_closed_store_reports_operation() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;
        store.close().await;

        let err = store.list_all().await.unwrap_err();
        assert_eq!(err.operation(), "list_all");
        assert!(store.ping().await.is_err());
    }
}
