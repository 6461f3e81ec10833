//! # Commands
//!
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── price.rs    ◄─── Pricing pass → CSV (+ annotation JSON)
//! ├── calc.rs     ◄─── Quick GP calculator
//! ├── import.rs   ◄─── Wholesale backend refresh from CSV
//! ├── status.rs   ◄─── Store health and data freshness
//! └── config.rs   ◄─── Show / reset operator config
//! ```
//!
//! Output goes to stdout (or `--out`); logs go to stderr.

pub mod calc;
pub mod config;
pub mod import;
pub mod price;
pub mod status;
