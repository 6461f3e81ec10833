//! # gulong-data: Acquisition Layer for Gulong Pricing
//!
//! Everything that reads backend data: the SQLite snapshot store and the CSV
//! files operators supply.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Gulong Pricing Data Flow                         │
//! │                                                                         │
//! │  gulong-pricing import ──► import.rs ──► Database::replace_catalog      │
//! │                                                │                        │
//! │                                                ▼                        │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  gulong-data (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ skus          │    │  (embedded)  │  │   │
//! │  │   │               │    │ competitors   │    │ 001_pricing  │  │   │
//! │  │   │  SqlitePool   │    │ data_updates  │    │   _schema    │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │                                                     │   │
//! │  │           ▼                                                     │   │
//! │  │   SqliteSource::acquire() ──► CatalogSnapshot                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                │                        │
//! │                                                ▼                        │
//! │  gulong-pricing price ──► gulong_core::run_pass(snapshot, config)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool and wholesale catalog replacement
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - Table access (skus, competitor prices, update stamps)
//! - [`source`] - The [`DataSource`] seam and its SQLite implementation
//! - [`import`] - Backend export and supplier upload CSV loaders
//! - [`error`] - Acquisition and import error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gulong_data::{DataConfig, DataSource, Database, SqliteSource};
//!
//! let db = Database::new(DataConfig::new("gulong.db")).await?;
//! let snapshot = SqliteSource::new(db).acquire().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod import;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod source;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{AcquisitionError, DataResult, ImportError, ImportResult};
pub use pool::{CatalogReplacement, DataConfig, Database, ReplaceSummary, StoreStatus};
pub use repository::{CompetitorRow, SkuRow};
pub use source::{DataSource, SqliteSource};
