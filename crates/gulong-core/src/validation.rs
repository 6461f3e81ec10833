//! # Validation Module
//!
//! Typed number parsing and configuration rules.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Raw Values Enter                             │
//! │                                                                         │
//! │  Quick calculator text boxes ──┐                                       │
//! │  Manual grid edits ────────────┼──► parse_number / parse_money /       │
//! │  Backend TEXT price columns ───┤    parse_gp  ← THIS MODULE            │
//! │  Supplier CSV cells ───────────┘         │                             │
//! │                                          ▼                             │
//! │                         Ok(typed value) │ Err(InputError)              │
//! │                                                                         │
//! │  PricingConfig ──► validate_gp_target ──► Err(ValidationError) halts   │
//! │                                           the pass before pricing      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use gulong_core::validation::{parse_gp, parse_money};
//! use gulong_core::money::Money;
//!
//! assert_eq!(parse_money("supplier price", " 1000.50 ").unwrap(), Money::from_cents(100_050));
//! assert!(parse_gp("gp", "thirty").is_err());
//! ```

use crate::error::{InputError, ValidationError};
use crate::gp::{GpRate, BPS_SCALE};
use crate::money::Money;
use crate::MAX_AMOUNT_PESOS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Number Parsing
// =============================================================================

/// Parses raw text as a finite number.
///
/// ## Rules
/// - Surrounding whitespace is ignored
/// - Empty text → `InputError::Empty`
/// - `inf` / `NaN` are rejected
/// - Thousands separators are NOT accepted (`"1,000"` is an error)
pub fn parse_number(field: &str, raw: &str) -> Result<f64, InputError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(InputError::Empty {
            field: field.to_string(),
        });
    }

    let value: f64 = trimmed.parse().map_err(|_| InputError::NotNumeric {
        field: field.to_string(),
        value: trimmed.to_string(),
    })?;

    if !value.is_finite() {
        return Err(InputError::NotFinite {
            field: field.to_string(),
            value: trimmed.to_string(),
        });
    }

    Ok(value)
}

/// Parses a peso amount into centavos (rounded to the nearest centavo).
pub fn parse_money(field: &str, raw: &str) -> Result<Money, InputError> {
    let value = parse_number(field, raw)?;

    if value.abs() > MAX_AMOUNT_PESOS as f64 {
        return Err(InputError::OutOfRange {
            field: field.to_string(),
            value: raw.trim().to_string(),
        });
    }

    Ok(Money::from_cents((value * 100.0).round() as i64))
}

/// Parses an optional cell: `None` or blank text is "no value", not an error.
///
/// ## Example
/// ```rust
/// use gulong_core::validation::parse_optional_money;
///
/// assert_eq!(parse_optional_money("GoGulong", Some("  ")).unwrap(), None);
/// assert_eq!(parse_optional_money("GoGulong", None).unwrap(), None);
/// assert!(parse_optional_money("GoGulong", Some("n/a")).is_err());
/// ```
pub fn parse_optional_money(field: &str, raw: Option<&str>) -> Result<Option<Money>, InputError> {
    match raw {
        Some(text) if !text.trim().is_empty() => parse_money(field, text).map(Some),
        _ => Ok(None),
    }
}

/// Parses a GP or discount percentage (`"15"`, `"27.5"`).
pub fn parse_gp(field: &str, raw: &str) -> Result<GpRate, InputError> {
    let value = parse_number(field, raw)?;

    // Anything beyond ±1,000,000% is a typo, not a margin
    if value.abs() > 1_000_000.0 {
        return Err(InputError::OutOfRange {
            field: field.to_string(),
            value: raw.trim().to_string(),
        });
    }

    Ok(GpRate::from_percentage(value))
}

/// Parses an optional integer quantity (supplier stock counts).
pub fn parse_optional_quantity(field: &str, raw: Option<&str>) -> Result<Option<i64>, InputError> {
    match raw {
        Some(text) if !text.trim().is_empty() => {
            let value = parse_number(field, text)?;
            if value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
                return Err(InputError::NotNumeric {
                    field: field.to_string(),
                    value: text.trim().to_string(),
                });
            }
            Ok(Some(value as i64))
        }
        _ => Ok(None),
    }
}

// =============================================================================
// Configuration Rules
// =============================================================================

/// Validates a tier GP / discount target.
///
/// ## Rules
/// - Must be at least 0% (a negative target would price below cost)
/// - Must be below 100% (the selling price formula is undefined at 100%)
pub fn validate_gp_target(field: &str, rate: GpRate) -> ValidationResult<()> {
    if rate.bps() < 0 || rate.bps() >= BPS_SCALE {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

/// Validates the list of competitors used for reconciliation.
///
/// ## Rules
/// - Names must not be blank
/// - Names must be unique
pub fn validate_competitor_names(names: &[String]) -> ValidationResult<()> {
    for (i, name) in names.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "competitor name".to_string(),
            });
        }
        if names[..i].iter().any(|earlier| earlier == name) {
            return Err(ValidationError::Duplicate {
                field: "competitor".to_string(),
                value: name.clone(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
