//! # Error Types
//!
//! Domain-specific error types for gulong-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  gulong-core errors (this file)                                        │
//! │  ├── InputError       - raw text is not a usable number                │
//! │  ├── DomainError      - GP math undefined (GP ≥ 100%, selling = 0)     │
//! │  ├── ValidationError  - configuration / snapshot rule violations       │
//! │  ├── JoinMismatch     - supplier offer could not be placed (non-fatal) │
//! │  └── CoreError        - wraps the above for `?` propagation            │
//! │                                                                         │
//! │  gulong-data errors (separate crate)                                   │
//! │  └── AcquisitionError - snapshot unavailable or malformed              │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── AppError         - what the operator sees                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Which Errors Halt a Pass?
//! - `InputError`, `DomainError`: never. They are returned as values for the
//!   quick calculator and stored on the affected row during a pass.
//! - `JoinMismatch`: never. Collected into the join report.
//! - `ValidationError`: yes. A bad configuration stops the pass before any
//!   row is priced.

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Core Error
// =============================================================================

/// Errors that stop a pricing pass or a single core operation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Raw input could not be read as a number.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The requested GP math is undefined.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Configuration or snapshot rule violated.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Encoding the output table failed.
    #[error("Export failed: {0}")]
    Export(String),
}

// =============================================================================
// Input Error
// =============================================================================

/// A user- or backend-supplied value is not convertible to a number.
///
/// ## User Workflow
/// ```text
/// Quick Calculator: Supplier Price = "1,000"
///      │
///      ▼
/// validation::parse_money("supplier price", "1,000")
///      │
///      ▼
/// InputError::NotNumeric { field: "supplier price", value: "1,000" }
///      │
///      ▼
/// UI shows: "Input Error"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{field} is required")]
    Empty { field: String },

    #[error("{field} is not a number: '{value}'")]
    NotNumeric { field: String, value: String },

    #[error("{field} must be a finite number, got '{value}'")]
    NotFinite { field: String, value: String },

    #[error("{field} is out of range: '{value}'")]
    OutOfRange { field: String, value: String },
}

// =============================================================================
// Domain Error
// =============================================================================

/// The GP formula is undefined for the given inputs.
///
/// Serializable because it is stored on a [`crate::PriceStatus`] and shipped
/// to the dashboard with the row it affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum DomainError {
    /// `supplier / (1 - gp)` with `gp ≥ 100%` divides by zero or flips sign.
    #[error("GP must be below 100% to derive a selling price (got {gp_bps} bps)")]
    GpNotBelowHundred { gp_bps: i64 },

    /// `selling / (1 + gp)` with `gp ≤ -100%`.
    #[error("GP must be above -100% to derive a supplier price (got {gp_bps} bps)")]
    GpNotAboveMinusHundred { gp_bps: i64 },

    /// GP% of a zero selling price.
    #[error("GP is undefined for a zero selling price")]
    ZeroSellingPrice,

    /// Result does not fit in a price or rate.
    #[error("GP result is out of range")]
    OutOfRange,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Rule violations in configuration or in an acquired snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range (percent bounds, exclusive max).
    #[error("{field} must be at least {min}% and below {max}%")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g. two SKUs sharing a model).
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Join Mismatch
// =============================================================================

/// A supplier offer that could not be placed on exactly one SKU.
///
/// Never fatal: the offer is left out of the joined table and reported.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum JoinMismatch {
    /// No SKU carries this (pattern, dimensions, make).
    #[error("{supplier}: no SKU matches {key}")]
    Unmatched { supplier: String, key: String },

    /// More than one SKU carries this key; the offer is excluded.
    #[error("{supplier}: {key} matches {} SKUs ({})", .models.len(), .models.join(", "))]
    Ambiguous {
        supplier: String,
        key: String,
        models: Vec<String>,
    },

    /// Same supplier listed the same key again; the first row wins.
    #[error("{supplier}: duplicate offer for {key} collapsed")]
    Duplicate { supplier: String, key: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
