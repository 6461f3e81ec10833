//! # Competitor Reconciliation
//!
//! Flags SKUs priced above a competitor and, when auto-adjust is on, pulls
//! tier prices down toward the competitor without crossing the GP floor.
//!
//! ## Reconciliation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PricedSku (promo ₱1176)      CompetitorPrices {GoGulong: ₱1100}        │
//! │           │                              │                              │
//! │           └──────────────┬───────────────┘                              │
//! │                          ▼                                              │
//! │        promo > competitor? ── no ──► unchanged, no alert               │
//! │                          │ yes                                          │
//! │                          ▼                                              │
//! │              CompetitorAlert (GulongPH + GoGulong cells)                │
//! │                          │                                              │
//! │           auto_adjust? ──┴── no ──► alert only, prices untouched       │
//! │                          │ yes                                          │
//! │                          ▼                                              │
//! │   per tier: binding = min{ c : c < price, c ≥ floor } else floor        │
//! │             price  = min(price, binding)         (never upward)         │
//! │                          │                                              │
//! │                          ▼                                              │
//! │               promo = min(promo, slashed)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tier Floors
//! | Tier        | Floor GP        |
//! |-------------|-----------------|
//! | slashed     | `gp_15`         |
//! | promo       | `gp_20b`        |
//! | b2b         | `d_b2b`         |
//! | marketplace | `d_marketplace` |
//! | affiliate   | not reconciled  |

use serde::Serialize;
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::config::PricingConfig;
use crate::money::Money;
use crate::tiers::floor_price;
use crate::types::{CompetitorPrices, PricedSku, Tier};

/// Tiers auto-adjust may move, in the order they are processed.
pub const ADJUSTABLE_TIERS: [Tier; 4] = [Tier::Slashed, Tier::Promo, Tier::B2b, Tier::Marketplace];

// =============================================================================
// Result Types
// =============================================================================

/// The promo price is above a competitor's price for the same model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct CompetitorAlert {
    pub model: String,
    pub competitor: String,
    pub competitor_price: Money,
    pub promo: Money,
}

/// What set an adjusted tier price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum Binding {
    /// Matched to this competitor's price.
    Competitor { name: String, price: Money },
    /// Every undercutting competitor was below the GP floor.
    Floor { price: Money },
}

/// One tier price moved by auto-adjust.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct TierAdjustment {
    pub model: String,
    pub tier: Tier,
    pub from: Money,
    pub to: Money,
    pub binding: Binding,
}

/// One reconciled row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub priced: PricedSku,
    pub alerts: Vec<CompetitorAlert>,
    pub adjustments: Vec<TierAdjustment>,
}

/// A reconciled catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub rows: Vec<PricedSku>,
    pub alerts: Vec<CompetitorAlert>,
    pub adjustments: Vec<TierAdjustment>,
}

// =============================================================================
// Reconciliation
// =============================================================================

/// Reconciles one row against its competitor prices.
///
/// Only the competitors named in `config.competitors` are considered.
/// Unpriced rows pass through with no alerts.
///
/// ## Example
/// ```rust
/// use gulong_core::competitor::reconcile;
/// use gulong_core::money::Money;
/// use gulong_core::tiers::price_sku;
/// use gulong_core::{CompetitorPrices, PricingConfig, SkuRecord};
///
/// let config = PricingConfig::default();
/// let sku = SkuRecord::new("M1", "Yokohama", "BluEarth", "195/55 R16")
///     .with_cost(Money::from_pesos(1000));
/// let competitors = CompetitorPrices::new("M1").with_price("GoGulong", Money::from_pesos(1100));
///
/// let out = reconcile(&price_sku(&sku, &config), Some(&competitors), &config, true);
/// let prices = out.priced.prices.unwrap();
///
/// assert_eq!(out.alerts.len(), 1);
/// assert_eq!(prices.slashed, Money::from_pesos(1176)); // floor wins
/// assert_eq!(prices.promo, Money::from_pesos(1100));   // matched
/// ```
pub fn reconcile(
    priced: &PricedSku,
    competitors: Option<&CompetitorPrices>,
    config: &PricingConfig,
    auto_adjust: bool,
) -> Reconciled {
    let mut out = Reconciled {
        priced: priced.clone(),
        alerts: Vec::new(),
        adjustments: Vec::new(),
    };

    let (Some(mut prices), Some(cost), Some(competitors)) =
        (priced.prices, priced.sku.supplier_max_price, competitors)
    else {
        return out;
    };

    let benchmarks: Vec<(&str, Money)> = config
        .competitors
        .iter()
        .filter_map(|name| competitors.get(name).map(|price| (name.as_str(), price)))
        .collect();

    for (name, price) in &benchmarks {
        if prices.promo > *price {
            out.alerts.push(CompetitorAlert {
                model: priced.sku.model.clone(),
                competitor: name.to_string(),
                competitor_price: *price,
                promo: prices.promo,
            });
        }
    }

    if !auto_adjust || out.alerts.is_empty() {
        return out;
    }

    for tier in ADJUSTABLE_TIERS {
        let Some(floor_gp) = config.floor_gp(tier) else {
            continue;
        };
        // Undefined floor: leave the tier where it is
        let Ok(floor) = floor_price(cost, floor_gp) else {
            continue;
        };

        let current = prices.get(tier);
        if let Some(binding) = binding_price(current, floor, &benchmarks) {
            let target = binding_amount(&binding).min(current);
            if target != current {
                prices.set(tier, target);
                out.adjustments.push(TierAdjustment {
                    model: priced.sku.model.clone(),
                    tier,
                    from: current,
                    to: target,
                    binding,
                });
            }
        }
    }

    if prices.promo > prices.slashed {
        prices.promo = prices.slashed;
    }

    out.priced.prices = Some(prices);
    out
}

/// Reconciles a priced catalog, preserving row order.
pub fn reconcile_catalog(
    priced: &[PricedSku],
    competitors: &BTreeMap<&str, &CompetitorPrices>,
    config: &PricingConfig,
    auto_adjust: bool,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    for row in priced {
        let reconciled = reconcile(row, competitors.get(row.model()).copied(), config, auto_adjust);
        report.rows.push(reconciled.priced);
        report.alerts.extend(reconciled.alerts);
        report.adjustments.extend(reconciled.adjustments);
    }

    report
}

/// Picks the price a tier should move to, if any competitor undercuts it.
///
/// The lowest undercutting price that respects `floor` binds. When every
/// undercutting price is below the floor, the floor binds. `None` when
/// nothing undercuts `current`.
fn binding_price(current: Money, floor: Money, benchmarks: &[(&str, Money)]) -> Option<Binding> {
    let undercutting: Vec<&(&str, Money)> = benchmarks.iter().filter(|(_, price)| *price < current).collect();
    if undercutting.is_empty() {
        return None;
    }

    let respecting = undercutting
        .iter()
        .filter(|(_, price)| *price >= floor)
        .min_by_key(|(_, price)| *price);

    Some(match respecting {
        Some((name, price)) => Binding::Competitor {
            name: name.to_string(),
            price: *price,
        },
        None => Binding::Floor { price: floor },
    })
}

fn binding_amount(binding: &Binding) -> Money {
    match binding {
        Binding::Competitor { price, .. } => *price,
        Binding::Floor { price } => *price,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
