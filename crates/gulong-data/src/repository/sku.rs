//! # SKU Repository
//!
//! Catalog rows exactly as the backend exports them.
//!
//! Prices stay TEXT in storage; [`crate::source`] parses them when it builds
//! a snapshot, so one bad cell only blanks that value.

use serde::Deserialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DataResult;

/// One `skus` row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, sqlx::FromRow)]
pub struct SkuRow {
    pub model: String,
    #[serde(default)]
    pub sku_name: String,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub dimensions: String,
    pub year: Option<String>,
    pub supplier_max_price: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub sale_tag: bool,
    pub listed_price: Option<String>,
    pub selection_max_price: Option<String>,
    pub qty_tiremanila: Option<String>,
}

/// Backend exports write the sale tag as `1`/`0`, `true`/`false` or blank.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim).map(str::to_ascii_lowercase).as_deref() {
        None | Some("") | Some("0") | Some("false") | Some("no") => Ok(false),
        Some("1") | Some("true") | Some("yes") => Ok(true),
        Some(other) => Err(serde::de::Error::custom(format!("invalid sale_tag '{}'", other))),
    }
}

const SELECT_SKUS: &str = r#"
    SELECT
        model,
        sku_name,
        make,
        pattern,
        dimensions,
        year,
        supplier_max_price,
        sale_tag,
        listed_price,
        selection_max_price,
        qty_tiremanila
    FROM skus
    ORDER BY id
"#;

/// Repository for catalog rows.
#[derive(Debug, Clone)]
pub struct SkuRepository {
    pool: SqlitePool,
}

impl SkuRepository {
    /// Creates a new SkuRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SkuRepository { pool }
    }

    /// Number of catalog rows.
    pub async fn count(&self) -> DataResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM skus")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Reads all rows on an open connection (inside a snapshot transaction).
pub(crate) async fn list_in(conn: &mut SqliteConnection) -> DataResult<Vec<SkuRow>> {
    let rows = sqlx::query_as::<_, SkuRow>(SELECT_SKUS)
        .fetch_all(&mut *conn)
        .await?;
    debug!(count = rows.len(), "Read catalog rows");
    Ok(rows)
}

/// Replaces the whole catalog. Returns the number of rows written.
pub(crate) async fn replace_all_in(conn: &mut SqliteConnection, rows: &[SkuRow]) -> DataResult<u64> {
    sqlx::query("DELETE FROM skus").execute(&mut *conn).await?;

    let mut written = 0;
    for row in rows {
        let result = sqlx::query(
            r#"
            INSERT INTO skus (
                model, sku_name, make, pattern, dimensions, year,
                supplier_max_price, sale_tag, listed_price,
                selection_max_price, qty_tiremanila
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&row.model)
        .bind(&row.sku_name)
        .bind(&row.make)
        .bind(&row.pattern)
        .bind(&row.dimensions)
        .bind(&row.year)
        .bind(&row.supplier_max_price)
        .bind(row.sale_tag)
        .bind(&row.listed_price)
        .bind(&row.selection_max_price)
        .bind(&row.qty_tiremanila)
        .execute(&mut *conn)
        .await?;
        written += result.rows_affected();
    }

    Ok(written)
}
