//! # Database Migrations
//!
//! Embedded SQL migrations for the pricing snapshot store.
//!
//! ## Directory Structure
//! ```text
//! migrations/sqlite/
//! └── 001_pricing_schema.sql  # skus, competitor_prices, data_updates
//! ```
//!
//! Never edit an applied migration; add the next `NNN_description.sql`.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DataResult;

/// Migrations embedded at compile time from `migrations/sqlite`.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending migrations. Idempotent.
pub async fn run_migrations(pool: &SqlitePool) -> DataResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Number of migrations compiled into this binary.
pub fn embedded_count() -> usize {
    MIGRATOR.migrations.len()
}

/// Returns `(embedded, applied)` migration counts.
///
/// A store that was never migrated reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DataResult<(usize, usize)> {
    let total = embedded_count();

    let tracked: Option<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'")
            .fetch_optional(pool)
            .await?;
    if tracked.is_none() {
        return Ok((total, 0));
    }

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}
