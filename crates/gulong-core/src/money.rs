//! # Money Module
//!
//! Provides the `Money` type for handling peso amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  1000 / (1 - 0.15) in f64 = 1176.4705882352941                          │
//! │  Round-tripping through f64 GP math drifts by fractions of a centavo    │
//! │  and two runs of the same catalog can disagree on the last digit.       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos + Basis Points                          │
//! │    100000 centavos × 10000 / 8500 bps  (exact i128 math)                │
//! │    then ONE explicit rounding step to the whole peso                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use gulong_core::money::Money;
//!
//! let cost = Money::from_pesos(1000);
//! let with_fee = cost + Money::from_cents(2550); // ₱1025.50
//! assert_eq!(with_fee.round_to_peso(), Money::from_pesos(1026));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use ts_rs::TS;

/// Centavos per peso.
pub const CENTS_PER_PESO: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A peso amount in centavos (the smallest currency unit).
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  SkuRecord.supplier_max_price ──► gp::selling_price_from_gp ──┐         │
/// │                                                               ▼         │
/// │  CompetitorPrices ──► competitor::reconcile ◄── TierPrices (5 tiers)    │
/// │                                                               │         │
/// │                                          Table cell ◄─────────┘         │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole pesos.
    ///
    /// ```rust
    /// use gulong_core::money::Money;
    ///
    /// assert_eq!(Money::from_pesos(1176).cents(), 117_600);
    /// ```
    #[inline]
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos * CENTS_PER_PESO)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-peso portion (truncated toward zero).
    #[inline]
    pub const fn pesos(&self) -> i64 {
        self.0 / CENTS_PER_PESO
    }

    /// Returns the centavo portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % CENTS_PER_PESO).abs()
    }

    /// Returns zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Rounds to the nearest whole peso, halves away from zero.
    ///
    /// ```rust
    /// use gulong_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(117_647).round_to_peso(), Money::from_pesos(1176));
    /// assert_eq!(Money::from_cents(117_650).round_to_peso(), Money::from_pesos(1177));
    /// assert_eq!(Money::from_cents(-150).round_to_peso(), Money::from_pesos(-2));
    /// ```
    pub fn round_to_peso(&self) -> Money {
        let pesos = round_div(self.0 as i128, CENTS_PER_PESO as i128);
        Money::from_pesos(pesos as i64)
    }

    /// Rounds up to the next whole peso (for non-negative amounts).
    ///
    /// Used as the hard cost floor: a tier price rounded to the nearest
    /// peso must never land below what the supplier charges.
    ///
    /// ```rust
    /// use gulong_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(100_040).ceil_to_peso(), Money::from_pesos(1001));
    /// assert_eq!(Money::from_pesos(1000).ceil_to_peso(), Money::from_pesos(1000));
    /// ```
    pub fn ceil_to_peso(&self) -> Money {
        let pesos = self.0.div_euclid(CENTS_PER_PESO);
        if self.0.rem_euclid(CENTS_PER_PESO) == 0 {
            Money::from_pesos(pesos)
        } else {
            Money::from_pesos(pesos + 1)
        }
    }

    /// Multiplies by `numerator / denominator`, rounding to the nearest
    /// centavo (halves away from zero).
    ///
    /// ## Panics
    /// Never; a zero denominator returns the amount unchanged.
    pub fn scale(&self, numerator: i64, denominator: i64) -> Money {
        if denominator == 0 {
            return *self;
        }
        let cents = round_div(self.0 as i128 * numerator as i128, denominator as i128);
        Money::from_cents(cents as i64)
    }

    /// Plain decimal rendering without currency symbol, for CSV cells.
    ///
    /// ```rust
    /// use gulong_core::money::Money;
    ///
    /// assert_eq!(Money::from_pesos(1176).to_plain_string(), "1176.00");
    /// assert_eq!(Money::from_cents(-550).to_plain_string(), "-5.50");
    /// ```
    pub fn to_plain_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.pesos().abs(), self.cents_part())
    }
}

/// Divides with rounding half away from zero. `den` may be negative.
pub(crate) fn round_div(num: i128, den: i128) -> i128 {
    let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
    if num >= 0 {
        (2 * num + den) / (2 * den)
    } else {
        -((2 * -num + den) / (2 * den))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly peso rendering. The dashboard does its own localization.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₱{}.{:02}", sign, self.pesos().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
