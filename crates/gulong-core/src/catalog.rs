//! # Catalog Reconciler
//!
//! Left-joins priced SKUs with uploaded supplier offers and decides which
//! columns the output table shows.
//!
//! ## Join
//! ```text
//! ┌────────────────────────────┐          ┌─────────────────────────────┐
//! │ PricedSku                  │          │ SupplierOffer               │
//! │  pattern    ───────────────┼── key ───┼── similar_pattern           │
//! │  dimensions ───────────────┼── key ───┼── correct_specs             │
//! │  make       ───────────────┼── key ───┼── brand                     │
//! └────────────────────────────┘          └─────────────────────────────┘
//!
//!   SKU with 0 offers  → 1 row, offer = None      (left join)
//!   SKU with N offers  → N rows, one per supplier
//!   offer → 0 SKUs     → JoinMismatch::Unmatched   (excluded)
//!   offer → 2+ SKUs    → JoinMismatch::Ambiguous   (excluded, never guessed)
//!   same supplier+key  → JoinMismatch::Duplicate   (first row wins)
//! ```

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use ts_rs::TS;

use crate::error::JoinMismatch;
use crate::table::columns;
use crate::types::{MatchKey, PricedSku, SupplierOffer};

// =============================================================================
// Join
// =============================================================================

/// One output row: a priced SKU and at most one supplier offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct JoinedRow {
    pub priced: PricedSku,
    pub offer: Option<SupplierOffer>,
}

/// Result of joining offers onto the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinReport {
    pub rows: Vec<JoinedRow>,
    pub mismatches: Vec<JoinMismatch>,
}

/// Left-joins `offers` onto `priced`, preserving SKU order, then offer order.
///
/// ## Example
/// ```rust
/// use gulong_core::catalog::match_supplier_offers;
/// use gulong_core::tiers::price_catalog;
/// use gulong_core::{PricingConfig, SkuRecord, SupplierOffer};
///
/// let priced = price_catalog(&[SkuRecord::new("M1", "C", "A", "B")], &PricingConfig::default());
/// let offer = |supplier: &str| SupplierOffer {
///     supplier: supplier.to_string(),
///     brand: "C".to_string(),
///     similar_pattern: "A".to_string(),
///     correct_specs: "B".to_string(),
///     qty: Some(4),
///     price: None,
/// };
///
/// let report = match_supplier_offers(&priced, &[offer("Sup 1"), offer("Sup 2")]);
/// assert_eq!(report.rows.len(), 2);
/// assert!(report.mismatches.is_empty());
/// ```
pub fn match_supplier_offers(priced: &[PricedSku], offers: &[SupplierOffer]) -> JoinReport {
    let mut by_key: BTreeMap<MatchKey, Vec<usize>> = BTreeMap::new();
    for (i, row) in priced.iter().enumerate() {
        by_key.entry(row.sku.match_key()).or_default().push(i);
    }

    let mut mismatches = Vec::new();
    let mut per_sku: Vec<Vec<&SupplierOffer>> = vec![Vec::new(); priced.len()];
    let mut seen: HashSet<(&str, MatchKey)> = HashSet::new();

    for offer in offers {
        let key = offer.match_key();
        if !seen.insert((offer.supplier.as_str(), key.clone())) {
            mismatches.push(JoinMismatch::Duplicate {
                supplier: offer.supplier.clone(),
                key: key.to_string(),
            });
            continue;
        }

        match by_key.get(&key).map(Vec::as_slice) {
            None | Some([]) => mismatches.push(JoinMismatch::Unmatched {
                supplier: offer.supplier.clone(),
                key: key.to_string(),
            }),
            Some([only]) => per_sku[*only].push(offer),
            Some(many) => mismatches.push(JoinMismatch::Ambiguous {
                supplier: offer.supplier.clone(),
                key: key.to_string(),
                models: many.iter().map(|&i| priced[i].sku.model.clone()).collect(),
            }),
        }
    }

    let mut rows = Vec::with_capacity(priced.len());
    for (row, matched) in priced.iter().zip(per_sku) {
        if matched.is_empty() {
            rows.push(JoinedRow {
                priced: row.clone(),
                offer: None,
            });
        } else {
            rows.extend(matched.into_iter().map(|offer| JoinedRow {
                priced: row.clone(),
                offer: Some(offer.clone()),
            }));
        }
    }

    JoinReport { rows, mismatches }
}

/// Rows without an offer, for a pass with no supplier upload.
pub fn without_offers(priced: Vec<PricedSku>) -> Vec<JoinedRow> {
    priced
        .into_iter()
        .map(|priced| JoinedRow { priced, offer: None })
        .collect()
}

/// Distinct supplier names in first-seen order.
pub fn distinct_suppliers(offers: &[SupplierOffer]) -> Vec<String> {
    let mut seen = HashSet::new();
    offers
        .iter()
        .filter(|offer| seen.insert(offer.supplier.as_str()))
        .map(|offer| offer.supplier.clone())
        .collect()
}

/// Keeps rows whose promo price differs from the backend's live price
/// ("show adjusted prices only").
pub fn only_adjusted(rows: Vec<JoinedRow>) -> Vec<JoinedRow> {
    rows.into_iter()
        .filter(|row| row.priced.prices.map(|p| p.promo) != row.priced.sku.listed_price)
        .collect()
}

// =============================================================================
// Column Selection
// =============================================================================

/// Which optional columns the operator toggled on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColumnSelection {
    /// Base columns only.
    #[default]
    Base,
    /// Every optional column ("Select all").
    All,
    /// These optional columns.
    Named(Vec<String>),
}

/// Output column set: base columns, selected optional columns (in option
/// order), then `qty_<supplier>` and `price_<supplier>` per supplier.
///
/// Unknown names in a [`ColumnSelection::Named`] are ignored, and no column
/// appears twice.
pub fn selected_columns(
    column_options: &[String],
    offers: &[SupplierOffer],
    selection: &ColumnSelection,
) -> Vec<String> {
    let mut out: Vec<String> = columns::BASE.iter().map(|c| c.to_string()).collect();

    for option in column_options {
        let wanted = match selection {
            ColumnSelection::Base => false,
            ColumnSelection::All => true,
            ColumnSelection::Named(names) => names.contains(option),
        };
        if wanted && !out.contains(option) {
            out.push(option.clone());
        }
    }

    let suppliers = distinct_suppliers(offers);
    for prefix in [columns::QTY_PREFIX, columns::PRICE_PREFIX] {
        for supplier in &suppliers {
            let column = format!("{}{}", prefix, supplier);
            if !out.contains(&column) {
                out.push(column);
            }
        }
    }

    out
}

// =============================================================================
// Unit Tests
// =============================================================================
