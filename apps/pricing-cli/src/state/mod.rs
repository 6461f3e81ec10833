//! # Session State
//!
//! - [`PricingSession`] - current config, pass toggles and the last good output

pub mod session;

pub use session::PricingSession;
