//! # Import Command
//!
//! Replaces the backend catalog and competitor prices from CSV exports in
//! one transaction, then stamps both update dates.

use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use gulong_data::import::{load_competitor_rows_file, load_sku_rows_file};
use gulong_data::{CatalogReplacement, Database, ReplaceSummary};

use crate::error::AppResult;

#[derive(Debug, Clone, Args)]
pub struct ImportArgs {
    /// Backend SKU export
    #[arg(long, value_name = "FILE")]
    pub skus: PathBuf,

    /// Competitor price grid (`model` + one column per competitor)
    #[arg(long, value_name = "FILE")]
    pub competitors: PathBuf,

    /// Backend export date, YYYY-MM-DD (default: today)
    #[arg(long, value_name = "DATE")]
    pub backend_date: Option<NaiveDate>,

    /// Competitor scrape date, YYYY-MM-DD (default: today)
    #[arg(long, value_name = "DATE")]
    pub competitor_date: Option<NaiveDate>,
}

/// Loads both files before touching the store: a bad file leaves the
/// current snapshot as it was.
pub async fn run(db: &Database, args: &ImportArgs) -> AppResult<ReplaceSummary> {
    let skus = load_sku_rows_file(&args.skus)?;
    let competitors = load_competitor_rows_file(&args.competitors)?;

    let today = Local::now().date_naive();
    let batch = CatalogReplacement {
        skus,
        competitors,
        backend_date: args.backend_date.unwrap_or(today),
        competitor_date: args.competitor_date.unwrap_or(today),
    };

    let summary = db.replace_catalog(&batch).await?;
    info!(
        skus = summary.skus,
        competitor_prices = summary.competitor_prices,
        "Import complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gulong_data::DataConfig;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("gulong-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_import_replaces_snapshot() {
        let db = Database::new(DataConfig::in_memory()).await.unwrap();
        let args = ImportArgs {
            skus: write_temp("skus.csv", "model,make,pattern,dimensions,supplier_max_price\nM1,A,B,C,1000\nM2,A,B,D,\n"),
            competitors: write_temp("comps.csv", "model,GoGulong\nM1,1100\n"),
            backend_date: NaiveDate::from_ymd_opt(2024, 5, 8),
            competitor_date: None,
        };

        let summary = run(&db, &args).await.unwrap();
        std::fs::remove_file(&args.skus).unwrap();
        std::fs::remove_file(&args.competitors).unwrap();

        assert_eq!(summary.skus, 2);
        assert_eq!(summary.competitor_prices, 1);
        assert_eq!(
            db.updates().get("backend").await.unwrap().as_deref(),
            Some("2024-05-08")
        );
    }

    #[tokio::test]
    async fn test_bad_file_leaves_store_untouched() {
        let db = Database::new(DataConfig::in_memory()).await.unwrap();
        let args = ImportArgs {
            skus: write_temp("dup.csv", "model\nM1\nM1\n"),
            competitors: write_temp("dup-comps.csv", "model,GoGulong\n"),
            backend_date: None,
            competitor_date: None,
        };

        assert!(run(&db, &args).await.is_err());
        std::fs::remove_file(&args.skus).unwrap();
        std::fs::remove_file(&args.competitors).unwrap();

        assert_eq!(db.skus().count().await.unwrap(), 0);
    }
}
