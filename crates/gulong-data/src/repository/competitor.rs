//! # Competitor Repository
//!
//! Competitor prices in long form: one row per (model, competitor).

use serde::Deserialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DataResult;

/// One `competitor_prices` row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, sqlx::FromRow)]
pub struct CompetitorRow {
    pub model: String,
    pub competitor: String,
    pub price: Option<String>,
}

impl CompetitorRow {
    pub fn new(model: impl Into<String>, competitor: impl Into<String>, price: Option<&str>) -> Self {
        CompetitorRow {
            model: model.into(),
            competitor: competitor.into(),
            price: price.map(str::to_string),
        }
    }
}

const SELECT_PRICES: &str = "SELECT model, competitor, price FROM competitor_prices ORDER BY id";

/// Repository for competitor prices.
#[derive(Debug, Clone)]
pub struct CompetitorRepository {
    pool: SqlitePool,
}

impl CompetitorRepository {
    /// Creates a new CompetitorRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CompetitorRepository { pool }
    }

    /// Number of stored (model, competitor) prices.
    pub async fn count(&self) -> DataResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM competitor_prices")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

pub(crate) async fn list_in(conn: &mut SqliteConnection) -> DataResult<Vec<CompetitorRow>> {
    let rows = sqlx::query_as::<_, CompetitorRow>(SELECT_PRICES)
        .fetch_all(&mut *conn)
        .await?;
    debug!(count = rows.len(), "Read competitor prices");
    Ok(rows)
}

/// Replaces every competitor price. A repeated (model, competitor) pair
/// violates the UNIQUE constraint and surfaces as `Malformed`.
pub(crate) async fn replace_all_in(conn: &mut SqliteConnection, rows: &[CompetitorRow]) -> DataResult<u64> {
    sqlx::query("DELETE FROM competitor_prices")
        .execute(&mut *conn)
        .await?;

    let mut written = 0;
    for row in rows {
        let result = sqlx::query("INSERT INTO competitor_prices (model, competitor, price) VALUES (?1, ?2, ?3)")
            .bind(&row.model)
            .bind(&row.competitor)
            .bind(&row.price)
            .execute(&mut *conn)
            .await?;
        written += result.rows_affected();
    }

    Ok(written)
}
