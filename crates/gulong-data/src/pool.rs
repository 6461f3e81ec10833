//! # Database Pool Management
//!
//! Connection pool for the pricing snapshot store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Snapshot Store                                     │
//! │                                                                         │
//! │  CLI startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DataConfig::new(path) ← pool settings                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← pool + migrations                       │
//! │       │                                                                 │
//! │       ├──► SqliteSource::acquire()   read transaction → snapshot       │
//! │       │                                                                 │
//! │       └──► Database::replace_catalog() write transaction ← CSV import  │
//! │                                                                         │
//! │  A reader never sees half of an import: both sides run in one          │
//! │  transaction each, and WAL lets the read proceed during a write.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{AcquisitionError, DataResult};
use crate::migrations;
use crate::repository::{
    competitor, sku, updates, CompetitorRepository, CompetitorRow, SkuRepository, SkuRow, UpdateRepository,
    FEED_BACKEND, FEED_COMPETITORS,
};

const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DataConfig::new("./data/gulong.db")
///     .max_connections(4)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// Path to the SQLite file, or `:memory:`.
    pub database_path: PathBuf,

    /// Default: 4
    pub max_connections: u32,

    /// Default: 1
    pub min_connections: u32,

    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Default: true
    pub run_migrations: bool,
}

impl DataConfig {
    /// Configuration for a file-backed store; the file is created if missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DataConfig {
            database_path: path.into(),
            max_connections: 4,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// An isolated in-memory store (tests, dry runs).
    pub fn in_memory() -> Self {
        DataConfig {
            database_path: PathBuf::from(IN_MEMORY),
            // Each connection to :memory: is its own database
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(IN_MEMORY)
    }

    fn connect_options(&self) -> DataResult<SqliteConnectOptions> {
        if self.is_in_memory() {
            return SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| AcquisitionError::ConnectionFailed(e.to_string()));
        }

        Ok(SqliteConnectOptions::new()
            .filename(&self.database_path)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true))
    }
}

// =============================================================================
// Catalog Replacement
// =============================================================================

/// A full backend export, written in one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogReplacement {
    pub skus: Vec<SkuRow>,
    pub competitors: Vec<CompetitorRow>,
    pub backend_date: NaiveDate,
    pub competitor_date: NaiveDate,
}

/// Health and freshness of the store, for `gulong-pricing status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStatus {
    pub healthy: bool,
    pub migrations_embedded: usize,
    pub migrations_applied: usize,
    pub skus: i64,
    pub competitor_prices: i64,
    pub backend_last_update: Option<String>,
    pub competitor_last_update: Option<String>,
}

impl StoreStatus {
    /// True once every embedded migration has been applied.
    pub fn is_current(&self) -> bool {
        self.migrations_applied == self.migrations_embedded
    }
}

/// What a replacement wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceSummary {
    pub skus: u64,
    pub competitor_prices: u64,
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the snapshot store.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, if configured, runs migrations.
    pub async fn new(config: DataConfig) -> DataResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening pricing snapshot store"
        );

        let connect_options = config.connect_options()?;
        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| AcquisitionError::ConnectionFailed(e.to_string()))?;

        info!(max_connections = config.max_connections, "Database pool created");

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations.
    pub async fn run_migrations(&self) -> DataResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn skus(&self) -> SkuRepository {
        SkuRepository::new(self.pool.clone())
    }

    pub fn competitors(&self) -> CompetitorRepository {
        CompetitorRepository::new(self.pool.clone())
    }

    pub fn updates(&self) -> UpdateRepository {
        UpdateRepository::new(self.pool.clone())
    }

    /// Replaces the catalog, competitor prices and both update stamps.
    ///
    /// All or nothing: on any error the transaction rolls back and the
    /// previous snapshot stays in place.
    pub async fn replace_catalog(&self, batch: &CatalogReplacement) -> DataResult<ReplaceSummary> {
        info!(
            skus = batch.skus.len(),
            competitor_prices = batch.competitors.len(),
            backend_date = %batch.backend_date,
            competitor_date = %batch.competitor_date,
            "Replacing catalog"
        );

        let mut tx = self.pool.begin().await?;

        let skus = sku::replace_all_in(&mut tx, &batch.skus).await?;
        let competitor_prices = competitor::replace_all_in(&mut tx, &batch.competitors).await?;
        updates::set_in(&mut tx, FEED_BACKEND, batch.backend_date).await?;
        updates::set_in(&mut tx, FEED_COMPETITORS, batch.competitor_date).await?;

        tx.commit().await?;

        let summary = ReplaceSummary {
            skus,
            competitor_prices,
        };
        info!(?summary, "Catalog replaced");
        Ok(summary)
    }

    /// Closes the pool; later operations fail with `ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// True when the store answers a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Row counts, update stamps and migration state.
    ///
    /// An unreachable store returns `Ok` with `healthy = false` and nothing
    /// else filled in.
    pub async fn status(&self) -> DataResult<StoreStatus> {
        let migrations_embedded = migrations::embedded_count();
        if !self.health_check().await {
            warn!("Snapshot store did not answer the health check");
            return Ok(StoreStatus {
                healthy: false,
                migrations_embedded,
                migrations_applied: 0,
                skus: 0,
                competitor_prices: 0,
                backend_last_update: None,
                competitor_last_update: None,
            });
        }

        let (_, migrations_applied) = migrations::migration_status(&self.pool).await?;
        let updates = self.updates();
        let status = StoreStatus {
            healthy: true,
            migrations_embedded,
            migrations_applied,
            skus: self.skus().count().await?,
            competitor_prices: self.competitors().count().await?,
            backend_last_update: updates.get(FEED_BACKEND).await?,
            competitor_last_update: updates.get(FEED_COMPETITORS).await?,
        };
        debug!(?status, "Store status");
        Ok(status)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::migration_status;

    async fn stored_models(db: &Database) -> DataResult<Vec<String>> {
        let mut conn = db.pool().acquire().await?;
        let rows = sku::list_in(&mut conn).await?;
        Ok(rows.into_iter().map(|row| row.model).collect())
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn row(model: &str, cost: &str) -> SkuRow {
        SkuRow {
            model: model.to_string(),
            sku_name: format!("{} tire", model),
            make: "Yokohama".to_string(),
            pattern: "BluEarth".to_string(),
            dimensions: "205/55 R16".to_string(),
            year: Some("2024".to_string()),
            supplier_max_price: Some(cost.to_string()),
            sale_tag: false,
            listed_price: None,
            selection_max_price: None,
            qty_tiremanila: None,
        }
    }

    fn batch(models: &[&str]) -> CatalogReplacement {
        CatalogReplacement {
            skus: models.iter().map(|m| row(m, "1000")).collect(),
            competitors: models
                .iter()
                .map(|m| CompetitorRow::new(*m, "GoGulong", Some("1290")))
                .collect(),
            backend_date: date(8),
            competitor_date: date(7),
        }
    }

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DataConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);

        let (total, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DataConfig::new("/tmp/gulong.db").max_connections(8).min_connections(2);

        assert_eq!(config.max_connections, 8);
        assert_eq!(config.min_connections, 2);
        assert!(!config.is_in_memory());
        assert!(DataConfig::in_memory().is_in_memory());
    }

    #[tokio::test]
    async fn test_replace_catalog_replaces_wholesale() {
        let db = Database::new(DataConfig::in_memory()).await.unwrap();

        db.replace_catalog(&batch(&["M1", "M2", "M3"])).await.unwrap();
        let summary = db.replace_catalog(&batch(&["M9"])).await.unwrap();

        assert_eq!(summary.skus, 1);
        assert_eq!(summary.competitor_prices, 1);
        assert_eq!(db.skus().count().await.unwrap(), 1);
        assert_eq!(stored_models(&db).await.unwrap(), vec!["M9"]);
        assert_eq!(
            db.updates().get(FEED_BACKEND).await.unwrap().as_deref(),
            Some("2024-05-08")
        );
    }

    #[tokio::test]
    async fn test_failed_replacement_keeps_previous_snapshot() {
        let db = Database::new(DataConfig::in_memory()).await.unwrap();
        db.replace_catalog(&batch(&["M1"])).await.unwrap();

        let mut bad = batch(&["M2"]);
        bad.competitors.push(CompetitorRow::new("M2", "GoGulong", Some("1300")));

        let err = db.replace_catalog(&bad).await.unwrap_err();
        assert!(matches!(err, AcquisitionError::Malformed { .. }));

        assert_eq!(stored_models(&db).await.unwrap(), vec!["M1"]);
    }

    #[tokio::test]
    async fn test_closed_pool_fails() {
        let db = Database::new(DataConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
        assert!(stored_models(&db).await.is_err());
        assert!(!db.status().await.unwrap().healthy);
    }

    #[tokio::test]
    async fn test_status_reports_counts_and_stamps() {
        let db = Database::new(DataConfig::in_memory()).await.unwrap();

        let empty = db.status().await.unwrap();
        assert!(empty.healthy);
        assert!(empty.is_current());
        assert_eq!(empty.skus, 0);
        assert_eq!(empty.backend_last_update, None);

        db.replace_catalog(&batch(&["M1", "M2"])).await.unwrap();
        let status = db.status().await.unwrap();
        assert_eq!(status.skus, 2);
        assert_eq!(status.competitor_prices, 2);
        assert_eq!(status.backend_last_update.as_deref(), Some("2024-05-08"));
        assert_eq!(status.competitor_last_update.as_deref(), Some("2024-05-07"));
    }
}
