//! # Status Command
//!
//! Prints the snapshot store's health, row counts and last-update dates as
//! JSON, so the operator can tell how fresh a pricing pass will be before
//! running one.

use tracing::{info, warn};

use gulong_data::{Database, StoreStatus};

use crate::error::AppResult;

pub async fn run(db: &Database) -> AppResult<StoreStatus> {
    let status = db.status().await?;

    if !status.healthy {
        warn!("Snapshot store is not reachable");
    } else if !status.is_current() {
        warn!(
            embedded = status.migrations_embedded,
            applied = status.migrations_applied,
            "Snapshot store has pending migrations"
        );
    }
    info!(skus = status.skus, competitor_prices = status.competitor_prices, "Store status");

    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gulong_data::{CatalogReplacement, CompetitorRow, DataConfig, SkuRow};

    #[tokio::test]
    async fn test_status_after_import() {
        let db = Database::new(DataConfig::in_memory()).await.unwrap();
        let sku = SkuRow {
            model: "M1".to_string(),
            sku_name: "M1 tire".to_string(),
            make: "Yokohama".to_string(),
            pattern: "BluEarth".to_string(),
            dimensions: "205/55 R16".to_string(),
            year: None,
            supplier_max_price: Some("1000".to_string()),
            sale_tag: false,
            listed_price: None,
            selection_max_price: None,
            qty_tiremanila: None,
        };
        db.replace_catalog(&CatalogReplacement {
            skus: vec![sku],
            competitors: vec![CompetitorRow::new("M1", "GoGulong", Some("1290"))],
            backend_date: NaiveDate::from_ymd_opt(2024, 5, 8).unwrap(),
            competitor_date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
        })
        .await
        .unwrap();

        let status = run(&db).await.unwrap();
        assert!(status.healthy);
        assert!(status.is_current());
        assert_eq!((status.skus, status.competitor_prices), (1, 1));
        assert_eq!(status.competitor_last_update.as_deref(), Some("2024-05-06"));
    }
}
