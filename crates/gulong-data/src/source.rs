//! # Snapshot Source
//!
//! Acquires one consistent [`CatalogSnapshot`] for a pricing pass.
//!
//! ```text
//! ┌──────────────┐   BEGIN    ┌───────────────────────────────┐
//! │ SqliteSource │ ─────────► │ skus                          │
//! │   acquire()  │            │ competitor_prices             │──► rows
//! │              │ ◄───────── │ data_updates (2 stamps)       │
//! └──────┬───────┘   COMMIT   └───────────────────────────────┘
//!        │
//!        ▼
//!  build_snapshot(rows)
//!    • text prices → Money (bad cell: warn, value undefined)
//!    • stamps → NaiveDate  (missing/bad: whole acquisition fails)
//!    • snapshot.validate() (blank/duplicate model: Malformed)
//! ```
//!
//! Any failure here aborts the pass; there is no partial snapshot.

use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use gulong_core::table::columns;
use gulong_core::validation::{parse_optional_money, parse_optional_quantity};
use gulong_core::{CatalogSnapshot, CompetitorPrices, InputError, SkuRecord, BASE_COMPETITORS};

use crate::error::{AcquisitionError, DataResult};
use crate::pool::Database;
use crate::repository::updates::DATE_FORMAT;
use crate::repository::{competitor, sku, updates, CompetitorRow, SkuRow, FEED_BACKEND, FEED_COMPETITORS};

/// Anything that can hand a pricing pass a complete snapshot.
#[allow(async_fn_in_trait)]
pub trait DataSource {
    async fn acquire(&self) -> DataResult<CatalogSnapshot>;
}

/// Snapshot source backed by the SQLite store.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    db: Database,
}

impl SqliteSource {
    pub fn new(db: Database) -> Self {
        SqliteSource { db }
    }
}

impl DataSource for SqliteSource {
    async fn acquire(&self) -> DataResult<CatalogSnapshot> {
        debug!("Acquiring catalog snapshot");

        let mut tx = self.db.pool().begin().await?;
        let skus = sku::list_in(&mut tx).await?;
        let competitors = competitor::list_in(&mut tx).await?;
        let backend_stamp = updates::get_in(&mut tx, FEED_BACKEND).await?;
        let competitor_stamp = updates::get_in(&mut tx, FEED_COMPETITORS).await?;
        tx.commit().await?;

        let snapshot = build_snapshot(skus, competitors, backend_stamp, competitor_stamp)?;
        info!(
            skus = snapshot.skus.len(),
            competitor_models = snapshot.competitors.len(),
            backend_last_update = %snapshot.backend_last_update,
            competitor_last_update = %snapshot.competitor_last_update,
            "Catalog snapshot acquired"
        );
        Ok(snapshot)
    }
}

// =============================================================================
// Row Conversion
// =============================================================================

/// Builds a validated snapshot from stored rows and update stamps.
pub fn build_snapshot(
    skus: Vec<SkuRow>,
    competitors: Vec<CompetitorRow>,
    backend_stamp: Option<String>,
    competitor_stamp: Option<String>,
) -> DataResult<CatalogSnapshot> {
    let backend_last_update = parse_stamp(FEED_BACKEND, backend_stamp)?;
    let competitor_last_update = parse_stamp(FEED_COMPETITORS, competitor_stamp)?;

    let skus: Vec<SkuRecord> = skus.into_iter().map(sku_record).collect();
    let competitors = group_competitors(competitors);

    let mut snapshot = CatalogSnapshot {
        skus,
        competitors,
        column_options: Vec::new(),
        backend_last_update,
        competitor_last_update,
    };
    snapshot.column_options = column_options(&snapshot.competitor_names());

    snapshot
        .validate()
        .map_err(|e| AcquisitionError::malformed(e.to_string()))?;

    Ok(snapshot)
}

fn parse_stamp(feed: &str, stamp: Option<String>) -> DataResult<NaiveDate> {
    let stamp = stamp.ok_or_else(|| AcquisitionError::MissingUpdateStamp {
        feed: feed.to_string(),
    })?;
    NaiveDate::parse_from_str(stamp.trim(), DATE_FORMAT)
        .map_err(|e| AcquisitionError::malformed(format!("{} update date '{}': {}", feed, stamp, e)))
}

/// Keeps the value when it parses, otherwise logs and leaves it undefined.
fn lenient<T>(model: &str, parsed: Result<Option<T>, InputError>) -> Option<T> {
    match parsed {
        Ok(value) => value,
        Err(err) => {
            warn!(model = %model, error = %err, "Unusable backend value");
            None
        }
    }
}

fn sku_record(row: SkuRow) -> SkuRecord {
    let model = row.model.trim().to_string();
    let supplier_max_price = lenient(
        &model,
        parse_optional_money(columns::SUPPLIER_MAX_PRICE, row.supplier_max_price.as_deref()),
    );
    let listed_price = lenient(&model, parse_optional_money("GulongPH", row.listed_price.as_deref()));
    let selection_max_price = lenient(
        &model,
        parse_optional_money(columns::SELECTION_MAX_PRICE, row.selection_max_price.as_deref()),
    );
    let qty_tiremanila = lenient(
        &model,
        parse_optional_quantity(columns::QTY_TIREMANILA, row.qty_tiremanila.as_deref()),
    );

    let year = row.year.map(|y| y.trim().to_string()).filter(|y| !y.is_empty());

    SkuRecord {
        model,
        sku_name: row.sku_name,
        make: row.make,
        pattern: row.pattern,
        dimensions: row.dimensions,
        year,
        supplier_max_price,
        sale_tag: row.sale_tag,
        listed_price,
        selection_max_price,
        qty_tiremanila,
    }
}

/// Long rows → one [`CompetitorPrices`] per model, in first-seen order.
/// Blank or unparseable prices are dropped.
fn group_competitors(rows: Vec<CompetitorRow>) -> Vec<CompetitorPrices> {
    let mut grouped: Vec<CompetitorPrices> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let model = row.model.trim().to_string();
        let competitor = row.competitor.trim().to_string();
        let price = lenient(&model, parse_optional_money(&competitor, row.price.as_deref()));

        let slot = *index.entry(model.clone()).or_insert_with(|| {
            grouped.push(CompetitorPrices::new(model.clone()));
            grouped.len() - 1
        });
        if let Some(price) = price {
            grouped[slot].prices.insert(competitor, price);
        }
    }

    grouped
}

/// Toggleable columns: the two backend reference prices, then any
/// competitor outside the base set.
fn column_options(competitor_names: &[String]) -> Vec<String> {
    let mut options = vec![
        columns::SELECTION_MAX_PRICE.to_string(),
        columns::GULONGPH_BACKEND.to_string(),
    ];
    options.extend(
        competitor_names
            .iter()
            .filter(|name| !BASE_COMPETITORS.contains(&name.as_str()))
            .cloned(),
    );
    options
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{CatalogReplacement, DataConfig};
    use gulong_core::Money;

    fn row(model: &str, cost: Option<&str>) -> SkuRow {
        SkuRow {
            model: model.to_string(),
            sku_name: String::new(),
            make: "Michelin".to_string(),
            pattern: "Primacy 4".to_string(),
            dimensions: "215/60 R16".to_string(),
            year: Some(" ".to_string()),
            supplier_max_price: cost.map(str::to_string),
            sale_tag: true,
            listed_price: Some("5390".to_string()),
            selection_max_price: None,
            qty_tiremanila: Some("12".to_string()),
        }
    }

    fn stamps() -> (Option<String>, Option<String>) {
        (Some("2024-05-08".to_string()), Some("2024-05-07".to_string()))
    }

    #[test]
    fn test_build_snapshot_parses_values() {
        let (b, c) = stamps();
        let snapshot = build_snapshot(
            vec![row("M1", Some("4200.50")), row("M2", Some("n/a"))],
            vec![
                CompetitorRow::new("M1", "GoGulong", Some("5100")),
                CompetitorRow::new("M1", "Gulong Express", Some("")),
                CompetitorRow::new("M2", "Gulong Express", Some("4999")),
            ],
            b,
            c,
        )
        .unwrap();

        let m1 = &snapshot.skus[0];
        assert_eq!(m1.supplier_max_price, Some(Money::from_cents(420_050)));
        assert_eq!(m1.listed_price, Some(Money::from_pesos(5390)));
        assert_eq!(m1.qty_tiremanila, Some(12));
        assert_eq!(m1.year, None);
        assert!(m1.sale_tag);

        // Unparseable cost leaves the value undefined
        assert_eq!(snapshot.skus[1].supplier_max_price, None);

        assert_eq!(snapshot.competitors.len(), 2);
        assert_eq!(snapshot.competitors[0].get("GoGulong"), Some(Money::from_pesos(5100)));
        assert_eq!(snapshot.competitors[0].get("Gulong Express"), None);
        assert_eq!(
            snapshot.column_options,
            vec!["selection_max_price", "GulongPH_backend", "Gulong Express"]
        );
        assert_eq!(snapshot.backend_last_update, NaiveDate::from_ymd_opt(2024, 5, 8).unwrap());
    }

    #[test]
    fn test_missing_stamp_fails() {
        let err = build_snapshot(vec![], vec![], None, Some("2024-05-07".to_string())).unwrap_err();
        assert!(matches!(err, AcquisitionError::MissingUpdateStamp { ref feed } if feed == "backend"));

        let err = build_snapshot(vec![], vec![], Some("08/05/2024".to_string()), Some("2024-05-07".to_string()))
            .unwrap_err();
        assert!(matches!(err, AcquisitionError::Malformed { .. }));
    }

    #[test]
    fn test_duplicate_model_is_malformed() {
        let (b, c) = stamps();
        let err = build_snapshot(vec![row("M1", Some("1")), row("M1", Some("2"))], vec![], b, c).unwrap_err();
        assert!(matches!(err, AcquisitionError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_acquire_round_trip() {
        let db = Database::new(DataConfig::in_memory()).await.unwrap();
        db.replace_catalog(&CatalogReplacement {
            skus: vec![row("M1", Some("1000")), row("M2", None)],
            competitors: vec![CompetitorRow::new("M1", "TireManila", Some("1250"))],
            backend_date: NaiveDate::from_ymd_opt(2024, 5, 8).unwrap(),
            competitor_date: NaiveDate::from_ymd_opt(2024, 5, 7).unwrap(),
        })
        .await
        .unwrap();

        let snapshot = SqliteSource::new(db).acquire().await.unwrap();
        assert_eq!(snapshot.skus.len(), 2);
        assert_eq!(snapshot.skus[0].model, "M1");
        assert_eq!(snapshot.skus[1].supplier_max_price, None);
        assert_eq!(snapshot.competitors[0].get("TireManila"), Some(Money::from_pesos(1250)));
        assert_eq!(snapshot.competitor_last_update, NaiveDate::from_ymd_opt(2024, 5, 7).unwrap());
    }

    #[tokio::test]
    async fn test_empty_store_has_no_stamps() {
        let db = Database::new(DataConfig::in_memory()).await.unwrap();
        let err = SqliteSource::new(db).acquire().await.unwrap_err();
        assert!(matches!(err, AcquisitionError::MissingUpdateStamp { .. }));
    }
}
