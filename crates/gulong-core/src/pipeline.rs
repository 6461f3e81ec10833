//! # Pricing Pass
//!
//! One full, pure recomputation from an acquired snapshot.
//!
//! ## Pass Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  PricingConfig ──► validate ──✗──► CoreError (pass halted, no output)  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  CatalogSnapshot ──► price_catalog ──► reconcile_catalog                │
//! │                          │                   │                          │
//! │                     row_errors          alerts/adjustments              │
//! │                                              │                          │
//! │                                              ▼                          │
//! │          Option<&[SupplierOffer]> ──► match_supplier_offers             │
//! │                                              │  mismatches              │
//! │                                              ▼                          │
//! │                                  only_adjusted (if toggled)             │
//! │                                              │                          │
//! │                                              ▼                          │
//! │                 selected_columns ──► Table ──► annotate(Table, raw)     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Same snapshot + config + options + offers ⇒ identical [`PricingOutput`].

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::annotate::{annotate, AnnotationMatrix};
use crate::catalog::{
    match_supplier_offers, only_adjusted, selected_columns, without_offers, ColumnSelection, JoinedRow,
};
use crate::competitor::{reconcile_catalog, CompetitorAlert, TierAdjustment};
use crate::config::PricingConfig;
use crate::error::{CoreResult, JoinMismatch};
use crate::table::{columns, Cell, Table};
use crate::tiers::price_catalog;
use crate::types::{CatalogSnapshot, CompetitorPrices, PriceStatus, SkuRecord, SupplierOffer, Tier};

// =============================================================================
// Options & Output
// =============================================================================

/// Operator toggles for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassOptions {
    /// Move prices toward competitors (otherwise flag only).
    pub auto_adjust: bool,
    /// Drop rows whose promo equals the backend's live price.
    pub adjusted_only: bool,
    pub selection: ColumnSelection,
}

/// A SKU that could not be priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct RowError {
    pub model: String,
    pub status: PriceStatus,
}

/// Headline numbers for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct PassCounts {
    pub skus: usize,
    pub priced: usize,
    pub unpriced: usize,
    pub rows: usize,
    pub alerts: usize,
    pub adjustments: usize,
    pub mismatches: usize,
}

/// Everything the presentation layer needs from one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingOutput {
    pub table: Table,
    /// Backend values the table is compared against.
    pub raw: Table,
    pub annotations: AnnotationMatrix,
    pub alerts: Vec<CompetitorAlert>,
    pub adjustments: Vec<TierAdjustment>,
    pub mismatches: Vec<JoinMismatch>,
    pub row_errors: Vec<RowError>,
    pub backend_last_update: NaiveDate,
    pub competitor_last_update: NaiveDate,
    pub counts: PassCounts,
}

// =============================================================================
// Run
// =============================================================================

/// Runs one pricing pass.
///
/// ## Errors
/// Returns `CoreError::Validation` for an invalid config or snapshot.
/// Row-level problems never fail the pass; they land in `row_errors`,
/// `mismatches` and the annotation matrix.
pub fn run_pass(
    snapshot: &CatalogSnapshot,
    config: &PricingConfig,
    options: &PassOptions,
    offers: Option<&[SupplierOffer]>,
) -> CoreResult<PricingOutput> {
    config.validate()?;
    snapshot.validate()?;

    let priced = price_catalog(&snapshot.skus, config);
    let row_errors: Vec<RowError> = priced
        .iter()
        .filter(|row| !row.is_priced())
        .map(|row| RowError {
            model: row.sku.model.clone(),
            status: row.status,
        })
        .collect();

    let competitors = snapshot.competitor_index();
    let reconciled = reconcile_catalog(&priced, &competitors, config, options.auto_adjust);

    let offers = offers.unwrap_or(&[]);
    let (rows, mismatches) = if offers.is_empty() {
        (without_offers(reconciled.rows), Vec::new())
    } else {
        let report = match_supplier_offers(&reconciled.rows, offers);
        (report.rows, report.mismatches)
    };
    let rows = if options.adjusted_only { only_adjusted(rows) } else { rows };

    let mut table = Table::new(selected_columns(&snapshot.column_options, offers, &options.selection));
    for row in &rows {
        let comps = competitors.get(row.priced.model()).copied();
        let cells = table.columns.iter().map(|column| cell_for(column, row, comps)).collect();
        table.push_row(cells);
    }

    let raw = raw_table(snapshot, &competitors);
    let annotations = annotate(&table, &raw, &config.competitors);

    let counts = PassCounts {
        skus: snapshot.skus.len(),
        priced: snapshot.skus.len() - row_errors.len(),
        unpriced: row_errors.len(),
        rows: table.len(),
        alerts: reconciled.alerts.len(),
        adjustments: reconciled.adjustments.len(),
        mismatches: mismatches.len(),
    };

    Ok(PricingOutput {
        table,
        raw,
        annotations,
        alerts: reconciled.alerts,
        adjustments: reconciled.adjustments,
        mismatches,
        row_errors,
        backend_last_update: snapshot.backend_last_update,
        competitor_last_update: snapshot.competitor_last_update,
        counts,
    })
}

fn text(value: &str) -> Cell {
    Cell::Text(value.to_string())
}

fn cell_for(column: &str, row: &JoinedRow, competitors: Option<&CompetitorPrices>) -> Cell {
    let sku = &row.priced.sku;
    let prices = row.priced.prices;

    if let Some(tier) = Tier::from_column(column) {
        return prices.map(|p| p.get(tier)).into();
    }

    match column {
        columns::MODEL => text(&sku.model),
        columns::SKU_NAME => text(&sku.sku_name),
        columns::MAKE => text(&sku.make),
        columns::PATTERN => text(&sku.pattern),
        columns::DIMENSIONS => text(&sku.dimensions),
        columns::YEAR => sku.year.as_deref().map_or(Cell::Empty, text),
        columns::SUPPLIER_MAX_PRICE => sku.supplier_max_price.into(),
        columns::PROMO_3PLUS1 => prices.map(|p| p.promo_3plus1).into(),
        columns::QTY_TIREMANILA => sku.qty_tiremanila.into(),
        columns::SELECTION_MAX_PRICE => sku.selection_max_price.into(),
        columns::GULONGPH_BACKEND => sku.listed_price.into(),
        _ => supplier_cell(column, row)
            .unwrap_or_else(|| competitors.and_then(|c| c.get(column)).into()),
    }
}

/// `qty_<supplier>` / `price_<supplier>` for the row's own supplier.
fn supplier_cell(column: &str, row: &JoinedRow) -> Option<Cell> {
    let offer = row.offer.as_ref();
    if let Some(supplier) = column.strip_prefix(columns::QTY_PREFIX) {
        let qty = offer.filter(|o| o.supplier == supplier).and_then(|o| o.qty);
        return Some(qty.into());
    }
    if let Some(supplier) = column.strip_prefix(columns::PRICE_PREFIX) {
        let price = offer.filter(|o| o.supplier == supplier).and_then(|o| o.price);
        return Some(price.into());
    }
    None
}

/// Backend values as acquired: live promo price, cost and competitors.
fn raw_table(snapshot: &CatalogSnapshot, competitors: &BTreeMap<&str, &CompetitorPrices>) -> Table {
    let names = snapshot.competitor_names();
    let mut header = vec![
        columns::MODEL.to_string(),
        columns::SUPPLIER_MAX_PRICE.to_string(),
        Tier::Promo.column().to_string(),
        columns::SELECTION_MAX_PRICE.to_string(),
    ];
    header.extend(names.iter().cloned());

    let mut table = Table::new(header);
    for sku in &snapshot.skus {
        table.push_row(raw_row(sku, &names, competitors.get(sku.model.as_str()).copied()));
    }
    table
}

fn raw_row(sku: &SkuRecord, names: &[String], competitors: Option<&CompetitorPrices>) -> Vec<Cell> {
    let mut row = vec![
        text(&sku.model),
        sku.supplier_max_price.into(),
        sku.listed_price.into(),
        sku.selection_max_price.into(),
    ];
    row.extend(names.iter().map(|name| competitors.and_then(|c| c.get(name)).into()));
    row
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::Annotation;
    use crate::config::GpTarget;
    use crate::error::CoreError;
    use crate::gp::GpRate;
    use crate::money::Money;

    fn snapshot() -> CatalogSnapshot {
        let date = NaiveDate::from_ymd_opt(2024, 5, 8).unwrap();
        let mut on_sale = SkuRecord::new("M1", "Bridgestone", "Ecopia EP150", "185/65 R15")
            .with_cost(Money::from_pesos(1000))
            .on_sale(true);
        on_sale.listed_price = Some(Money::from_pesos(1053));
        let full = SkuRecord::new("M2", "Michelin", "Primacy 4", "205/55 R16").with_cost(Money::from_pesos(1000));
        let no_cost = SkuRecord::new("M3", "Yokohama", "BluEarth", "195/55 R16");

        CatalogSnapshot {
            skus: vec![on_sale, full, no_cost],
            competitors: vec![CompetitorPrices::new("M2").with_price("GoGulong", Money::from_pesos(1100))],
            column_options: vec!["selection_max_price".to_string(), "GulongPH_backend".to_string()],
            backend_last_update: date,
            competitor_last_update: date,
        }
    }

    #[test]
    fn test_pass_without_adjust_flags_only() {
        let out = run_pass(&snapshot(), &PricingConfig::default(), &PassOptions::default(), None).unwrap();

        assert_eq!(out.table.len(), 3);
        assert_eq!(out.counts.unpriced, 1);
        assert_eq!(out.row_errors[0].model, "M3");
        assert_eq!(out.alerts.len(), 1);
        assert!(out.adjustments.is_empty());
        assert_eq!(
            out.table.get(1, "GulongPH").and_then(Cell::as_money),
            Some(Money::from_pesos(1176))
        );
        assert_eq!(out.annotations.get(1, "GoGulong"), &[Annotation::AboveCompetitor]);
        assert!(out.table.get(2, "GulongPH").unwrap().is_empty());
    }

    #[test]
    fn test_pass_with_adjust() {
        let options = PassOptions {
            auto_adjust: true,
            ..PassOptions::default()
        };
        let out = run_pass(&snapshot(), &PricingConfig::default(), &options, None).unwrap();
        assert_eq!(
            out.table.get(1, "GulongPH").and_then(Cell::as_money),
            Some(Money::from_pesos(1100))
        );
        assert_eq!(
            out.table.get(1, "GulongPH_slashed").and_then(Cell::as_money),
            Some(Money::from_pesos(1176))
        );
    }

    #[test]
    fn test_adjusted_only_drops_unchanged_rows() {
        let options = PassOptions {
            adjusted_only: true,
            ..PassOptions::default()
        };
        let out = run_pass(&snapshot(), &PricingConfig::default(), &options, None).unwrap();
        // M1 promo 1053 matches its listed price; M3 has neither value
        assert_eq!(out.table.len(), 1);
        assert_eq!(out.table.get(0, "model").and_then(Cell::as_text), Some("M2"));
    }

    #[test]
    fn test_invalid_config_halts_pass() {
        let config = PricingConfig::default().with_target(GpTarget::Gp15, GpRate::from_whole_percent(100));
        let result = run_pass(&snapshot(), &config, &PassOptions::default(), None);
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_supplier_columns() {
        let offers = vec![SupplierOffer {
            supplier: "Hi-Q".to_string(),
            brand: "Michelin".to_string(),
            similar_pattern: "Primacy 4".to_string(),
            correct_specs: "205/55 R16".to_string(),
            qty: Some(12),
            price: Some(Money::from_pesos(980)),
        }];
        let out = run_pass(&snapshot(), &PricingConfig::default(), &PassOptions::default(), Some(&offers)).unwrap();

        assert_eq!(out.table.get(1, "qty_Hi-Q"), Some(&Cell::Int(12)));
        assert_eq!(out.table.get(1, "price_Hi-Q").and_then(Cell::as_money), Some(Money::from_pesos(980)));
        assert!(out.table.get(0, "qty_Hi-Q").unwrap().is_empty());
    }

    #[test]
    fn test_pass_is_idempotent() {
        let snap = snapshot();
        let config = PricingConfig::default();
        let options = PassOptions {
            auto_adjust: true,
            ..PassOptions::default()
        };
        let a = run_pass(&snap, &config, &options, None).unwrap();
        let b = run_pass(&snap, &config, &options, None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.table.to_csv_bytes().unwrap(), b.table.to_csv_bytes().unwrap());
    }
}
