//! # Quick Calculator
//!
//! The sidebar calculator: three GP conversions over raw text input.
//!
//! ```text
//! Find: ( ) Selling Price   ( ) Supplier Price   ( ) GP(%)
//!
//!   "1000.00", "30.00" ──► parse ──► gp math ──► CalcOutcome
//!                            │           │            │
//!                       InputError   DomainError   Value
//!                            └───────────┴──► "Input Error"
//! ```
//!
//! Every path returns a value; nothing here panics or aborts the caller.

use serde::Serialize;
use std::fmt;

use crate::error::{DomainError, InputError};
use crate::gp::{self, GpRate};
use crate::money::Money;
use crate::validation::{parse_gp, parse_money};

/// What the dashboard shows when a calculation cannot be made.
pub const INPUT_ERROR_SENTINEL: &str = "Input Error";

/// A successful calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CalcValue {
    Price(Money),
    Gp(GpRate),
}

/// Result of one quick calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalcOutcome {
    Value(CalcValue),
    Input(InputError),
    Domain(DomainError),
}

impl CalcOutcome {
    pub fn value(&self) -> Option<CalcValue> {
        match self {
            CalcOutcome::Value(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, CalcOutcome::Value(_))
    }
}

impl From<Result<CalcValue, DomainError>> for CalcOutcome {
    fn from(result: Result<CalcValue, DomainError>) -> Self {
        match result {
            Ok(value) => CalcOutcome::Value(value),
            Err(err) => CalcOutcome::Domain(err),
        }
    }
}

impl fmt::Display for CalcOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcOutcome::Value(CalcValue::Price(price)) => write!(f, "{}", price.pesos()),
            CalcOutcome::Value(CalcValue::Gp(rate)) => write!(f, "{}", rate),
            CalcOutcome::Input(_) | CalcOutcome::Domain(_) => f.write_str(INPUT_ERROR_SENTINEL),
        }
    }
}

/// Selling price for a supplier price at a GP.
///
/// ```rust
/// use gulong_core::calculator::quick_selling_price;
///
/// assert_eq!(quick_selling_price("1000.00", "30.00").to_string(), "1429");
/// assert_eq!(quick_selling_price("1000.00", "abc").to_string(), "Input Error");
/// ```
pub fn quick_selling_price(supplier: &str, gp_pct: &str) -> CalcOutcome {
    let inputs = parse_money("supplier price", supplier).and_then(|s| Ok((s, parse_gp("GP", gp_pct)?)));
    match inputs {
        Ok((supplier, rate)) => gp::selling_price_from_gp(supplier, rate).map(CalcValue::Price).into(),
        Err(err) => CalcOutcome::Input(err),
    }
}

/// Supplier price implied by a selling price at a GP markup.
pub fn quick_supplier_price(selling: &str, gp_pct: &str) -> CalcOutcome {
    let inputs = parse_money("selling price", selling).and_then(|s| Ok((s, parse_gp("GP", gp_pct)?)));
    match inputs {
        Ok((selling, rate)) => gp::supplier_price_from_gp(selling, rate).map(CalcValue::Price).into(),
        Err(err) => CalcOutcome::Input(err),
    }
}

/// GP% earned selling at `selling` after buying at `supplier`.
///
/// A zero selling price is a [`DomainError`], rendered as "Input Error".
pub fn quick_gp(selling: &str, supplier: &str) -> CalcOutcome {
    let inputs =
        parse_money("selling price", selling).and_then(|s| Ok((s, parse_money("supplier price", supplier)?)));
    match inputs {
        Ok((selling, supplier)) => gp::gp_from_prices(supplier, selling).map(CalcValue::Gp).into(),
        Err(err) => CalcOutcome::Input(err),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_selling_price() {
        assert_eq!(
            quick_selling_price("1000.00", "30.00"),
            CalcOutcome::Value(CalcValue::Price(Money::from_pesos(1429)))
        );
        assert!(matches!(
            quick_selling_price("1000", "100"),
            CalcOutcome::Domain(DomainError::GpNotBelowHundred { .. })
        ));
    }

    #[test]
    fn test_quick_supplier_price() {
        assert_eq!(quick_supplier_price("1000.00", "30.00").to_string(), "769");
        assert!(matches!(quick_supplier_price("", "30"), CalcOutcome::Input(InputError::Empty { .. })));
    }

    #[test]
    fn test_quick_gp() {
        assert_eq!(quick_gp("1500.00", "1000.00").to_string(), "33.33%");
        assert_eq!(
            quick_gp("0", "1000"),
            CalcOutcome::Domain(DomainError::ZeroSellingPrice)
        );
        assert_eq!(quick_gp("0", "1000").to_string(), INPUT_ERROR_SENTINEL);
    }

    #[test]
    fn test_input_error_is_distinct_from_domain_error() {
        let input = quick_gp("abc", "1000");
        assert!(matches!(input, CalcOutcome::Input(InputError::NotNumeric { .. })));
        assert!(input.is_error());
        assert_eq!(input.value(), None);
    }
}
