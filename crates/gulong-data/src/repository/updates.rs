//! # Update Stamps
//!
//! The last-update date of each feed, shown with every pass.

use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::DataResult;

/// Feed name for the catalog export.
pub const FEED_BACKEND: &str = "backend";

/// Feed name for the competitor price scrape.
pub const FEED_COMPETITORS: &str = "competitors";

/// Stored date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Repository for `data_updates`.
#[derive(Debug, Clone)]
pub struct UpdateRepository {
    pool: SqlitePool,
}

impl UpdateRepository {
    /// Creates a new UpdateRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UpdateRepository { pool }
    }

    /// Raw stamp for a feed, if one was ever recorded.
    pub async fn get(&self, feed: &str) -> DataResult<Option<String>> {
        let mut conn = self.pool.acquire().await?;
        get_in(&mut conn, feed).await
    }
}

pub(crate) async fn get_in(conn: &mut SqliteConnection, feed: &str) -> DataResult<Option<String>> {
    let stamp: Option<String> = sqlx::query_scalar("SELECT updated_at FROM data_updates WHERE source = ?1")
        .bind(feed)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(stamp)
}

/// Records `date` for a feed, replacing any earlier stamp.
pub(crate) async fn set_in(conn: &mut SqliteConnection, feed: &str, date: NaiveDate) -> DataResult<()> {
    sqlx::query(
        r#"
        INSERT INTO data_updates (source, updated_at) VALUES (?1, ?2)
        ON CONFLICT(source) DO UPDATE SET updated_at = excluded.updated_at
        "#,
    )
    .bind(feed)
    .bind(date.format(DATE_FORMAT).to_string())
    .execute(&mut *conn)
    .await?;
    Ok(())
}
