//! # Domain Types
//!
//! Core domain types used throughout the pricing engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   SkuRecord     │   │   PricedSku     │   │  SupplierOffer  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  model (key)    │──►│  sku            │◄ ─│  supplier       │       │
//! │  │  make/pattern/  │   │  prices?        │   │  brand/pattern/ │       │
//! │  │  dimensions     │   │  status         │   │  specs (key)    │       │
//! │  │  supplier_max_  │   └─────────────────┘   │  qty, price     │       │
//! │  │  price (cost)   │                         └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Tier       │   │   TierPrices    │   │ CatalogSnapshot │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Slashed        │   │  one Money per  │   │  skus           │       │
//! │  │  Promo          │   │  tier + 3+1     │   │  competitors    │       │
//! │  │  B2b/Affiliate/ │   │  bundle price   │   │  column_options │       │
//! │  │  Marketplace    │   └─────────────────┘   │  update dates   │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! `model` is the SKU key everywhere: competitor prices, the raw comparison
//! table and annotation lookups all join on it. Supplier offers join on the
//! (pattern, dimensions, make) [`MatchKey`] instead.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use ts_rs::TS;

use crate::error::{DomainError, ValidationError};
use crate::money::Money;

// =============================================================================
// Tier
// =============================================================================

/// A named outbound price channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Tier {
    /// Full, pre-discount listed price.
    Slashed,
    /// Currently active price; equals slashed when not on sale.
    Promo,
    B2b,
    Affiliate,
    Marketplace,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Slashed,
        Tier::Promo,
        Tier::B2b,
        Tier::Affiliate,
        Tier::Marketplace,
    ];

    /// Canonical output column for this tier.
    pub const fn column(&self) -> &'static str {
        match self {
            Tier::Slashed => "GulongPH_slashed",
            Tier::Promo => "GulongPH",
            Tier::B2b => "b2b",
            Tier::Affiliate => "affiliate",
            Tier::Marketplace => "marketplace",
        }
    }

    pub fn from_column(column: &str) -> Option<Tier> {
        Tier::ALL.into_iter().find(|tier| tier.column() == column)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// =============================================================================
// SKU Record
// =============================================================================

/// One catalog row as acquired from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SkuRecord {
    /// SKU identifier.
    pub model: String,

    pub sku_name: String,
    pub make: String,
    pub pattern: String,
    pub dimensions: String,
    pub year: Option<String>,

    /// Cost floor. `None` when the backend value is missing or unparseable.
    pub supplier_max_price: Option<Money>,

    /// On sale: the promo tier uses `gp_20a` instead of the slashed price.
    pub sale_tag: bool,

    /// Promo price currently live on the website (raw comparison value).
    pub listed_price: Option<Money>,

    /// Highest price seen across supplier selections.
    pub selection_max_price: Option<Money>,

    /// Stock reported by TireManila.
    pub qty_tiremanila: Option<i64>,
}

impl SkuRecord {
    /// Creates a record with only the key attributes set.
    pub fn new(
        model: impl Into<String>,
        make: impl Into<String>,
        pattern: impl Into<String>,
        dimensions: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            sku_name: String::new(),
            make: make.into(),
            pattern: pattern.into(),
            dimensions: dimensions.into(),
            year: None,
            supplier_max_price: None,
            sale_tag: false,
            listed_price: None,
            selection_max_price: None,
            qty_tiremanila: None,
        }
    }

    pub fn with_cost(mut self, cost: Money) -> Self {
        self.supplier_max_price = Some(cost);
        self
    }

    pub fn on_sale(mut self, sale_tag: bool) -> Self {
        self.sale_tag = sale_tag;
        self
    }

    /// Key used to match supplier offers to this SKU.
    pub fn match_key(&self) -> MatchKey {
        MatchKey::new(&self.pattern, &self.dimensions, &self.make)
    }
}

// =============================================================================
// Competitor Prices
// =============================================================================

/// Competitor benchmark prices for one model.
///
/// A competitor with no entry places no constraint on the row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompetitorPrices {
    pub model: String,
    pub prices: BTreeMap<String, Money>,
}

impl CompetitorPrices {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prices: BTreeMap::new(),
        }
    }

    pub fn with_price(mut self, competitor: impl Into<String>, price: Money) -> Self {
        self.prices.insert(competitor.into(), price);
        self
    }

    pub fn get(&self, competitor: &str) -> Option<Money> {
        self.prices.get(competitor).copied()
    }
}

// =============================================================================
// Tier Prices
// =============================================================================

/// Every derived price for one SKU, in whole pesos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TierPrices {
    pub slashed: Money,
    pub promo: Money,
    pub b2b: Money,
    pub affiliate: Money,
    pub marketplace: Money,

    /// Per-tire list price of a "buy 3, get 1" bundle.
    pub promo_3plus1: Money,
}

impl TierPrices {
    pub fn get(&self, tier: Tier) -> Money {
        match tier {
            Tier::Slashed => self.slashed,
            Tier::Promo => self.promo,
            Tier::B2b => self.b2b,
            Tier::Affiliate => self.affiliate,
            Tier::Marketplace => self.marketplace,
        }
    }

    pub fn set(&mut self, tier: Tier, price: Money) {
        match tier {
            Tier::Slashed => self.slashed = price,
            Tier::Promo => self.promo = price,
            Tier::B2b => self.b2b = price,
            Tier::Affiliate => self.affiliate = price,
            Tier::Marketplace => self.marketplace = price,
        }
    }
}

// =============================================================================
// Priced SKU
// =============================================================================

/// Why a row has (or lacks) derived prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "status", rename_all = "snake_case")]
#[ts(export)]
pub enum PriceStatus {
    Priced,
    /// `supplier_max_price` absent or not a number.
    MissingCost,
    /// Negative `supplier_max_price`.
    InvalidCost,
    /// GP math undefined for this row.
    Domain { error: DomainError },
}

/// A SKU after the tier engine ran.
///
/// `prices` is `None` whenever `status` is not `Priced`; such rows are
/// excluded from competitor comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct PricedSku {
    pub sku: SkuRecord,
    pub prices: Option<TierPrices>,
    pub status: PriceStatus,
}

impl PricedSku {
    pub fn model(&self) -> &str {
        &self.sku.model
    }

    pub fn is_priced(&self) -> bool {
        self.prices.is_some()
    }
}

// =============================================================================
// Supplier Offer
// =============================================================================

/// One row of an uploaded supplier price list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupplierOffer {
    pub supplier: String,
    pub brand: String,
    pub similar_pattern: String,
    pub correct_specs: String,
    pub qty: Option<i64>,
    pub price: Option<Money>,
}

impl SupplierOffer {
    pub fn match_key(&self) -> MatchKey {
        MatchKey::new(&self.similar_pattern, &self.correct_specs, &self.brand)
    }
}

/// Normalized (pattern, dimensions, make) join key.
///
/// Trimmed and upper-cased, so `" ecopia "` and `"ECOPIA"` match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchKey {
    pub pattern: String,
    pub dimensions: String,
    pub make: String,
}

impl MatchKey {
    pub fn new(pattern: &str, dimensions: &str, make: &str) -> Self {
        Self {
            pattern: normalize(pattern),
            dimensions: normalize(dimensions),
            make: normalize(make),
        }
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {}", self.pattern, self.dimensions, self.make)
    }
}

// =============================================================================
// Catalog Snapshot
// =============================================================================

/// Complete, self-consistent result of one acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSnapshot {
    pub skus: Vec<SkuRecord>,
    pub competitors: Vec<CompetitorPrices>,
    /// Optional display columns the operator may toggle on.
    pub column_options: Vec<String>,
    pub backend_last_update: NaiveDate,
    pub competitor_last_update: NaiveDate,
}

impl CatalogSnapshot {
    /// Checks the snapshot before it is used for a pass.
    ///
    /// ## Rules
    /// - Every SKU has a non-blank model
    /// - Models are unique across SKUs
    /// - Competitor rows are unique per model
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for sku in &self.skus {
            if sku.model.trim().is_empty() {
                return Err(ValidationError::Required {
                    field: "model".to_string(),
                });
            }
            if !seen.insert(sku.model.as_str()) {
                return Err(ValidationError::Duplicate {
                    field: "model".to_string(),
                    value: sku.model.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for row in &self.competitors {
            if !seen.insert(row.model.as_str()) {
                return Err(ValidationError::Duplicate {
                    field: "competitor model".to_string(),
                    value: row.model.clone(),
                });
            }
        }
        Ok(())
    }

    /// Competitor prices keyed by model.
    pub fn competitor_index(&self) -> BTreeMap<&str, &CompetitorPrices> {
        self.competitors
            .iter()
            .map(|row| (row.model.as_str(), row))
            .collect()
    }

    /// Every competitor name present in the snapshot, sorted.
    pub fn competitor_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .competitors
            .iter()
            .flat_map(|row| row.prices.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(skus: Vec<SkuRecord>) -> CatalogSnapshot {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        CatalogSnapshot {
            skus,
            competitors: vec![],
            column_options: vec![],
            backend_last_update: date,
            competitor_last_update: date,
        }
    }

    #[test]
    fn test_tier_columns_round_trip() {
        for tier in Tier::ALL {
            assert_eq!(Tier::from_column(tier.column()), Some(tier));
        }
        assert_eq!(Tier::from_column("model"), None);
    }

    #[test]
    fn test_match_key_normalizes() {
        let sku = SkuRecord::new("M1", "bridgestone", " Ecopia EP150 ", "185/65 R15");
        let offer = SupplierOffer {
            supplier: "Sup A".to_string(),
            brand: "BRIDGESTONE".to_string(),
            similar_pattern: "ECOPIA EP150".to_string(),
            correct_specs: "185/65 r15".to_string(),
            qty: Some(4),
            price: None,
        };
        assert_eq!(sku.match_key(), offer.match_key());
        assert_eq!(
            sku.match_key().to_string(),
            "ECOPIA EP150 | 185/65 R15 | BRIDGESTONE"
        );
    }

    #[test]
    fn test_snapshot_validate() {
        let ok = snapshot(vec![SkuRecord::new("M1", "A", "B", "C"), SkuRecord::new("M2", "A", "B", "C")]);
        assert!(ok.validate().is_ok());

        let dup = snapshot(vec![SkuRecord::new("M1", "A", "B", "C"), SkuRecord::new("M1", "X", "Y", "Z")]);
        assert!(matches!(dup.validate(), Err(ValidationError::Duplicate { .. })));

        let blank = snapshot(vec![SkuRecord::new("  ", "A", "B", "C")]);
        assert!(matches!(blank.validate(), Err(ValidationError::Required { .. })));
    }

    #[test]
    fn test_tier_prices_get_set() {
        let mut prices = TierPrices {
            slashed: Money::from_pesos(1176),
            promo: Money::from_pesos(1176),
            b2b: Money::from_pesos(1333),
            affiliate: Money::from_pesos(1370),
            marketplace: Money::from_pesos(1333),
            promo_3plus1: Money::from_pesos(1777),
        };
        prices.set(Tier::Promo, Money::from_pesos(1100));
        assert_eq!(prices.get(Tier::Promo), Money::from_pesos(1100));
        assert_eq!(prices.get(Tier::Slashed), Money::from_pesos(1176));
    }

    #[test]
    fn test_price_status_serializes_tagged() {
        let json = serde_json::to_string(&PriceStatus::MissingCost).unwrap();
        assert_eq!(json, r#"{"status":"missing_cost"}"#);
    }
}
