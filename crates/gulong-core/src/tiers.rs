//! # Tier Pricing Engine
//!
//! Derives every outbound price for a SKU from its supplier cost.
//!
//! ## Pricing Flow
//! ```text
//! supplier_max_price ──┬─► gp_15 ──────────────► GulongPH_slashed
//!                      │
//!                      ├─► sale_tag? ─ yes ─► gp_20a ─┐
//!                      │              └ no ──► slashed ┴─► min(·, slashed) ─► GulongPH
//!                      │
//!                      ├─► d_b2b ──────────────► b2b
//!                      ├─► d_affiliate ────────► affiliate
//!                      ├─► d_marketplace ──────► marketplace
//!                      └─► gp_promo_3plus1 × 4/3 ► 3+1_promo_per_tire
//!
//! Every output is then clamped to ≥ cost (rounded up to the whole peso).
//! ```
//!
//! ## Unpriceable Rows
//! A missing, negative or GP-undefined cost leaves `prices = None` with a
//! [`PriceStatus`] explaining why. The row stays in the catalog but is
//! never treated as zero-cost.

use crate::config::PricingConfig;
use crate::error::DomainError;
use crate::gp::{selling_price_from_gp, GpRate};
use crate::money::Money;
use crate::types::{PriceStatus, PricedSku, SkuRecord, Tier, TierPrices};

/// Prices one SKU. Pure and idempotent.
///
/// ## Example
/// ```rust
/// use gulong_core::money::Money;
/// use gulong_core::tiers::price_sku;
/// use gulong_core::{PricingConfig, SkuRecord};
///
/// let sku = SkuRecord::new("M1", "Bridgestone", "Ecopia", "185/65 R15")
///     .with_cost(Money::from_pesos(1000));
/// let priced = price_sku(&sku, &PricingConfig::default());
///
/// let prices = priced.prices.unwrap();
/// assert_eq!(prices.slashed, Money::from_pesos(1176));
/// assert_eq!(prices.promo, prices.slashed); // not on sale
/// ```
pub fn price_sku(sku: &SkuRecord, config: &PricingConfig) -> PricedSku {
    let (prices, status) = match sku.supplier_max_price {
        None => (None, PriceStatus::MissingCost),
        Some(cost) if cost.is_negative() => (None, PriceStatus::InvalidCost),
        Some(cost) => match derive_prices(cost, sku.sale_tag, config) {
            Ok(prices) => (Some(prices), PriceStatus::Priced),
            Err(error) => (None, PriceStatus::Domain { error }),
        },
    };

    PricedSku {
        sku: sku.clone(),
        prices,
        status,
    }
}

/// Prices every SKU, preserving input order.
pub fn price_catalog(skus: &[SkuRecord], config: &PricingConfig) -> Vec<PricedSku> {
    skus.iter().map(|sku| price_sku(sku, config)).collect()
}

/// Price at `gp` over `cost`, never below the cost itself.
///
/// Reconciliation uses the same function for its per-tier floors.
pub fn floor_price(cost: Money, gp: GpRate) -> Result<Money, DomainError> {
    Ok(selling_price_from_gp(cost, gp)?.max(cost.ceil_to_peso()))
}

fn derive_prices(cost: Money, sale_tag: bool, config: &PricingConfig) -> Result<TierPrices, DomainError> {
    let at = |tier: Tier| floor_price(cost, config.tier_gp(tier));
    let slashed = at(Tier::Slashed)?;

    // "Implement sale": only tagged SKUs get the lower promo GP
    let promo = if sale_tag {
        at(Tier::Promo)?.min(slashed)
    } else {
        slashed
    };

    let bundle = selling_price_from_gp(cost, config.gp_promo_3plus1)?
        .scale(4, 3)
        .round_to_peso()
        .max(cost.ceil_to_peso());

    Ok(TierPrices {
        slashed,
        promo,
        b2b: at(Tier::B2b)?,
        affiliate: at(Tier::Affiliate)?,
        marketplace: at(Tier::Marketplace)?,
        promo_3plus1: bundle,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GpTarget;

    fn sku(cost: Option<Money>, sale_tag: bool) -> SkuRecord {
        let mut sku = SkuRecord::new("M1", "Bridgestone", "Ecopia", "185/65 R15").on_sale(sale_tag);
        sku.supplier_max_price = cost;
        sku
    }

    #[test]
    fn test_default_tiers_for_cost_1000() {
        let priced = price_sku(&sku(Some(Money::from_pesos(1000)), true), &PricingConfig::default());
        assert_eq!(priced.status, PriceStatus::Priced);

        let prices = priced.prices.unwrap();
        assert_eq!(prices.slashed, Money::from_pesos(1176));
        assert_eq!(prices.promo, Money::from_pesos(1053));
        assert_eq!(prices.b2b, Money::from_pesos(1333));
        assert_eq!(prices.affiliate, Money::from_pesos(1370));
        assert_eq!(prices.marketplace, Money::from_pesos(1333));
        assert_eq!(prices.promo_3plus1, Money::from_pesos(1777));
    }

    #[test]
    fn test_no_sale_promo_equals_slashed() {
        let priced = price_sku(&sku(Some(Money::from_pesos(2450)), false), &PricingConfig::default());
        let prices = priced.prices.unwrap();
        assert_eq!(prices.promo, prices.slashed);
    }

    #[test]
    fn test_promo_capped_at_slashed() {
        // Sale GP above slashed GP would otherwise invert the tiers
        let config = PricingConfig::default().with_target(GpTarget::Gp20a, GpRate::from_whole_percent(40));
        let prices = price_sku(&sku(Some(Money::from_pesos(1000)), true), &config)
            .prices
            .unwrap();
        assert_eq!(prices.promo, prices.slashed);
    }

    #[test]
    fn test_prices_never_below_cost() {
        let config = PricingConfig::default().with_target(GpTarget::Gp15, GpRate::from_whole_percent(0));
        let cost = Money::from_cents(100_040);
        let prices = price_sku(&sku(Some(cost), false), &config).prices.unwrap();
        assert_eq!(prices.slashed, Money::from_pesos(1001));
        assert!(prices.promo >= cost);
    }

    #[test]
    fn test_missing_and_negative_cost() {
        let config = PricingConfig::default();

        let missing = price_sku(&sku(None, false), &config);
        assert_eq!(missing.status, PriceStatus::MissingCost);
        assert!(missing.prices.is_none());

        let negative = price_sku(&sku(Some(Money::from_pesos(-5)), false), &config);
        assert_eq!(negative.status, PriceStatus::InvalidCost);
        assert!(negative.prices.is_none());
    }

    #[test]
    fn test_domain_error_is_localized() {
        let config = PricingConfig::default().with_target(GpTarget::B2b, GpRate::from_whole_percent(100));
        let skus = vec![
            sku(Some(Money::from_pesos(1000)), false),
            sku(None, false),
        ];
        let priced = price_catalog(&skus, &config);
        assert_eq!(priced.len(), 2);
        assert_eq!(
            priced[0].status,
            PriceStatus::Domain {
                error: DomainError::GpNotBelowHundred { gp_bps: 10_000 }
            }
        );
        assert_eq!(priced[1].status, PriceStatus::MissingCost);
    }

    #[test]
    fn test_zero_cost_prices_at_zero() {
        let prices = price_sku(&sku(Some(Money::zero()), true), &PricingConfig::default())
            .prices
            .unwrap();
        assert_eq!(prices.slashed, Money::zero());
        assert_eq!(prices.marketplace, Money::zero());
    }

    #[test]
    fn test_idempotent() {
        let config = PricingConfig::default();
        let record = sku(Some(Money::from_cents(345_678)), true);
        assert_eq!(price_sku(&record, &config), price_sku(&record, &config));
    }
}
