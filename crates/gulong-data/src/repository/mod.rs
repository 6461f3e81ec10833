//! # Repository Module
//!
//! Table-level access for the pricing snapshot store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SqliteSource::acquire / Database::replace_catalog                     │
//! │       │                                                                 │
//! │       │  one transaction, one &mut SqliteConnection                    │
//! │       ▼                                                                 │
//! │  SkuRepository ──────── skus                                           │
//! │  CompetitorRepository ─ competitor_prices                              │
//! │  UpdateRepository ───── data_updates                                   │
//! │                                                                         │
//! │  `*_in(conn, ..)` functions run inside a caller's transaction;         │
//! │  methods on `&self` use the pool directly.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SkuRepository`] - Catalog rows as exported by the backend
//! - [`CompetitorRepository`] - Competitor prices per model
//! - [`UpdateRepository`] - Last-update stamps per feed

pub mod competitor;
pub mod sku;
pub mod updates;

pub use competitor::{CompetitorRepository, CompetitorRow};
pub use sku::{SkuRepository, SkuRow};
pub use updates::{UpdateRepository, FEED_BACKEND, FEED_COMPETITORS};
