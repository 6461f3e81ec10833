//! # gulong-core: Pure Pricing Logic for Gulong PH
//!
//! This crate is the **heart** of the pricing engine. It turns a backend
//! snapshot of tire SKUs, supplier cost floors and competitor prices into
//! outbound price tiers, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Gulong Pricing Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Presentation (dashboard / gulong-pricing CLI)        │   │
//! │  │    Quick Calculator ──► Price Grid ──► Highlights ──► CSV       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CatalogSnapshot + PricingConfig        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ gulong-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌────────────┐  ┌─────────────┐    │   │
//! │  │   │   gp    │─►│  tiers  │─►│ competitor │─►│   catalog   │    │   │
//! │  │   │ GP math │  │ 5 tiers │  │ reconcile  │  │ offer join  │    │   │
//! │  │   └─────────┘  └─────────┘  └────────────┘  └──────┬──────┘    │   │
//! │  │                                                    ▼           │   │
//! │  │                       ┌───────────┐    ┌──────────────────┐    │   │
//! │  │                       │ annotate  │◄───│  table (+ CSV)   │    │   │
//! │  │                       └───────────┘    └──────────────────┘    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                ▲                                        │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │                gulong-data (Acquisition Layer)                  │   │
//! │  │           SQLite snapshot, CSV imports, migrations              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer centavo arithmetic
//! - [`gp`] - GP calculator (selling price ⇄ supplier price ⇄ GP%)
//! - [`config`] - Immutable GP configuration and tier labels
//! - [`types`] - Domain types (SkuRecord, PricedSku, SupplierOffer, ...)
//! - [`validation`] - Typed number parsing and config rules
//! - [`tiers`] - Tier pricing engine
//! - [`competitor`] - Competitor reconciliation
//! - [`catalog`] - Supplier offer join and display column selection
//! - [`table`] - Output table and CSV export
//! - [`annotate`] - Cell highlight matrix
//! - [`calculator`] - Quick calculator over raw text input
//! - [`pipeline`] - One full pricing pass
//! - [`error`] - Error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same snapshot + config = same output, byte for byte
//! 2. **No I/O**: acquisition lives in `gulong-data`
//! 3. **Integer Money**: all prices are centavos (i64), GP is basis points
//! 4. **Localized Errors**: a bad row never aborts the batch
//!
//! ## Example Usage
//!
//! ```rust
//! use gulong_core::gp::{selling_price_from_gp, GpRate};
//! use gulong_core::money::Money;
//!
//! let cost = Money::from_pesos(1000);
//! let slashed = selling_price_from_gp(cost, GpRate::from_percentage(15.0)).unwrap();
//!
//! // 1000 / 0.85 = 1176.47 → rounded to the whole peso
//! assert_eq!(slashed, Money::from_pesos(1176));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod annotate;
pub mod calculator;
pub mod catalog;
pub mod competitor;
pub mod config;
pub mod error;
pub mod gp;
pub mod money;
pub mod pipeline;
pub mod table;
pub mod tiers;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::{PricingConfig, TierLabels};
pub use error::{CoreError, CoreResult, DomainError, InputError, JoinMismatch, ValidationError};
pub use gp::GpRate;
pub use money::Money;
pub use pipeline::{run_pass, PassOptions, PricingOutput};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Competitors whose prices are always shown in the base display columns.
pub const BASE_COMPETITORS: [&str; 3] = ["GoGulong", "TireManila", "PartsPro"];

/// Largest amount (in whole pesos) accepted from raw input.
///
/// Keeps every intermediate GP computation comfortably inside i64 once
/// converted back from i128.
pub const MAX_AMOUNT_PESOS: i64 = 1_000_000_000_000;
