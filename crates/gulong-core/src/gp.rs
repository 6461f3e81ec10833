//! # GP Calculator
//!
//! Pure conversions between supplier price, selling price and gross-profit
//! percentage.
//!
//! ## Formulas
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  selling  = supplier / (1 - gp/100)        gp ≥ 100%  → DomainError     │
//! │  supplier = selling  / (1 + gp/100)        gp ≤ -100% → DomainError     │
//! │  gp       = (selling - supplier) / selling × 100                        │
//! │                                            selling = 0 → DomainError    │
//! │                                                                         │
//! │  Prices round to the whole peso, GP rounds to the basis point.          │
//! │  All intermediate math is i128 over centavos × basis points.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use gulong_core::gp::{gp_from_prices, selling_price_from_gp, GpRate};
//! use gulong_core::money::Money;
//!
//! let selling = selling_price_from_gp(Money::from_pesos(1000), GpRate::from_percentage(30.0)).unwrap();
//! assert_eq!(selling, Money::from_pesos(1429));
//!
//! let gp = gp_from_prices(Money::from_pesos(1000), Money::from_pesos(1500)).unwrap();
//! assert_eq!(gp.bps(), 3333);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;
use crate::money::{round_div, Money, CENTS_PER_PESO};

/// Basis points in 100%.
pub const BPS_SCALE: i64 = 10_000;

// =============================================================================
// GP Rate
// =============================================================================

/// A GP (or channel discount) percentage in basis points.
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%. `GP_15` is stored as 1500, so every formula in
/// this module stays in integer arithmetic.
///
/// Config files and JSON carry the plain percentage (`gp_15 = 15`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct GpRate(i64);

impl GpRate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: i64) -> Self {
        GpRate(bps)
    }

    /// Creates a rate from a percentage, rounded to the basis point.
    pub fn from_percentage(pct: f64) -> Self {
        GpRate((pct * 100.0).round() as i64)
    }

    /// Creates a rate from whole percent.
    #[inline]
    pub const fn from_whole_percent(pct: i64) -> Self {
        GpRate(pct * 100)
    }

    #[inline]
    pub const fn bps(&self) -> i64 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for GpRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}%", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

impl From<GpRate> for f64 {
    fn from(rate: GpRate) -> f64 {
        rate.percentage()
    }
}

impl TryFrom<f64> for GpRate {
    type Error = String;

    fn try_from(pct: f64) -> Result<Self, Self::Error> {
        if !pct.is_finite() {
            return Err(format!("GP percentage must be finite, got {}", pct));
        }
        Ok(GpRate::from_percentage(pct))
    }
}

// =============================================================================
// Conversions
// =============================================================================

/// Selling price that yields `gp` over `supplier`, rounded to the peso.
///
/// ## User Workflow
/// ```text
/// Supplier Max Price: ₱1000      GP_15: 15%
///      │
///      ▼
/// selling_price_from_gp ← THIS FUNCTION
///      │    100000 × 10000 / (8500 × 100) = 1176.47
///      ▼
/// GulongPH_slashed: ₱1176
/// ```
pub fn selling_price_from_gp(supplier: Money, gp: GpRate) -> Result<Money, DomainError> {
    let denominator = BPS_SCALE as i128 - gp.bps() as i128;
    if denominator <= 0 {
        return Err(DomainError::GpNotBelowHundred { gp_bps: gp.bps() });
    }
    let pesos = round_div(
        supplier.cents() as i128 * BPS_SCALE as i128,
        denominator * CENTS_PER_PESO as i128,
    );
    pesos_to_money(pesos)
}

/// Supplier price implied by `selling` at `gp` markup, rounded to the peso.
pub fn supplier_price_from_gp(selling: Money, gp: GpRate) -> Result<Money, DomainError> {
    let denominator = BPS_SCALE as i128 + gp.bps() as i128;
    if denominator <= 0 {
        return Err(DomainError::GpNotAboveMinusHundred { gp_bps: gp.bps() });
    }
    let pesos = round_div(
        selling.cents() as i128 * BPS_SCALE as i128,
        denominator * CENTS_PER_PESO as i128,
    );
    pesos_to_money(pesos)
}

/// GP% earned when buying at `supplier` and selling at `selling`.
///
/// Negative when selling below cost.
pub fn gp_from_prices(supplier: Money, selling: Money) -> Result<GpRate, DomainError> {
    if selling.is_zero() {
        return Err(DomainError::ZeroSellingPrice);
    }
    let margin = selling.cents() as i128 - supplier.cents() as i128;
    let bps = round_div(margin * BPS_SCALE as i128, selling.cents() as i128);
    i64::try_from(bps)
        .map(GpRate::from_bps)
        .map_err(|_| DomainError::OutOfRange)
}

fn pesos_to_money(pesos: i128) -> Result<Money, DomainError> {
    pesos
        .checked_mul(CENTS_PER_PESO as i128)
        .and_then(|cents| i64::try_from(cents).ok())
        .map(Money::from_cents)
        .ok_or(DomainError::OutOfRange)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selling_price_defaults() {
        let cost = Money::from_pesos(1000);
        let at = |pct| selling_price_from_gp(cost, GpRate::from_whole_percent(pct)).unwrap();

        assert_eq!(at(15), Money::from_pesos(1176));
        assert_eq!(at(5), Money::from_pesos(1053));
        assert_eq!(at(3), Money::from_pesos(1031));
        assert_eq!(at(25), Money::from_pesos(1333));
        assert_eq!(at(27), Money::from_pesos(1370));
        assert_eq!(at(0), cost);
    }

    #[test]
    fn test_selling_price_rejects_gp_at_or_above_hundred() {
        let cost = Money::from_pesos(1000);
        assert_eq!(
            selling_price_from_gp(cost, GpRate::from_whole_percent(100)),
            Err(DomainError::GpNotBelowHundred { gp_bps: 10_000 })
        );
        assert!(selling_price_from_gp(cost, GpRate::from_whole_percent(150)).is_err());
        assert!(selling_price_from_gp(cost, GpRate::from_bps(9_999)).is_ok());
    }

    #[test]
    fn test_supplier_price() {
        let selling = Money::from_pesos(1000);
        assert_eq!(
            supplier_price_from_gp(selling, GpRate::from_whole_percent(30)).unwrap(),
            Money::from_pesos(769)
        );
        assert!(supplier_price_from_gp(selling, GpRate::from_whole_percent(-100)).is_err());
    }

    #[test]
    fn test_gp_from_prices() {
        let gp = gp_from_prices(Money::from_pesos(1000), Money::from_pesos(1176)).unwrap();
        assert_eq!(gp.bps(), 1497);

        let loss = gp_from_prices(Money::from_pesos(1200), Money::from_pesos(1000)).unwrap();
        assert_eq!(loss.bps(), -2000);
    }

    #[test]
    fn test_gp_from_zero_selling_price_is_domain_error() {
        assert_eq!(
            gp_from_prices(Money::from_pesos(1000), Money::zero()),
            Err(DomainError::ZeroSellingPrice)
        );
    }

    #[test]
    fn test_extreme_rates_are_domain_errors() {
        let price = Money::from_pesos(1000);
        let huge = GpRate::from_percentage(1e17);
        assert_eq!(huge.bps(), i64::MAX);

        assert_eq!(
            supplier_price_from_gp(price, GpRate::from_bps(i64::MIN)),
            Err(DomainError::GpNotAboveMinusHundred { gp_bps: i64::MIN })
        );
        assert_eq!(
            selling_price_from_gp(price, huge),
            Err(DomainError::GpNotBelowHundred { gp_bps: i64::MAX })
        );
        assert_eq!(supplier_price_from_gp(price, huge), Ok(Money::zero()));
        assert_eq!(
            selling_price_from_gp(Money::from_cents(i64::MAX), GpRate::from_bps(9_999)),
            Err(DomainError::OutOfRange)
        );
        assert_eq!(
            gp_from_prices(Money::from_cents(i64::MAX), Money::from_cents(1)),
            Err(DomainError::OutOfRange)
        );
    }

    #[test]
    fn test_gp_rate_display_and_percentage() {
        assert_eq!(GpRate::from_percentage(15.0).to_string(), "15.00%");
        assert_eq!(GpRate::from_bps(3333).to_string(), "33.33%");
        assert_eq!(GpRate::from_bps(-2050).to_string(), "-20.50%");
        assert_eq!(GpRate::from_bps(1250).percentage(), 12.5);
    }

    #[test]
    fn test_gp_rate_serde_is_plain_percentage() {
        let rate: GpRate = serde_json::from_str("27.5").unwrap();
        assert_eq!(rate.bps(), 2750);
        assert_eq!(serde_json::to_string(&GpRate::from_whole_percent(15)).unwrap(), "15.0");
    }
}
