//! # Pricing Configuration
//!
//! The GP targets and channel discounts that drive one pricing pass.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   PricingConfig::default()  ──►  with_target(GpTarget::Gp15, 18%)       │
//! │            ▲                              │ (new value, old untouched)  │
//! │            │                              ▼                             │
//! │     reset() (fresh defaults)       validate() ──► run_pass(...)         │
//! │                                                                         │
//! │   A config is never mutated inside a pass. Changing a target produces   │
//! │   a new value and triggers a full recomputation.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use gulong_core::config::{GpTarget, PricingConfig};
//! use gulong_core::gp::GpRate;
//!
//! let base = PricingConfig::default();
//! let tuned = base.with_target(GpTarget::Gp15, GpRate::from_whole_percent(18));
//!
//! assert_eq!(base.gp_15.bps(), 1500);
//! assert_eq!(tuned.gp_15.bps(), 1800);
//! assert!(tuned.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, ValidationError};
use crate::gp::GpRate;
use crate::types::Tier;
use crate::validation::{parse_gp, validate_competitor_names, validate_gp_target, ValidationResult};

// =============================================================================
// Pricing Config
// =============================================================================

/// GP targets per tier plus the competitors used for reconciliation.
///
/// Percentages serialize as plain numbers (`gp_15 = 15`), so a `[pricing]`
/// TOML table deserializes straight into this struct. Missing keys take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct PricingConfig {
    /// Slashed (full) price GP. Also the slashed floor during reconciliation.
    #[ts(type = "number")]
    pub gp_15: GpRate,

    /// Promo GP for SKUs on sale.
    #[ts(type = "number")]
    pub gp_20a: GpRate,

    /// Lowest GP the promo price may be pushed to by a competitor.
    #[ts(type = "number")]
    pub gp_20b: GpRate,

    #[ts(type = "number")]
    pub d_b2b: GpRate,

    #[ts(type = "number")]
    pub d_affiliate: GpRate,

    #[ts(type = "number")]
    pub d_marketplace: GpRate,

    /// GP of the "buy 3, get 1" bundle column.
    #[ts(type = "number")]
    pub gp_promo_3plus1: GpRate,

    /// Competitor columns checked during reconciliation, in order.
    pub competitors: Vec<String>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            gp_15: GpRate::from_whole_percent(15),
            gp_20a: GpRate::from_whole_percent(5),
            gp_20b: GpRate::from_whole_percent(3),
            d_b2b: GpRate::from_whole_percent(25),
            d_affiliate: GpRate::from_whole_percent(27),
            d_marketplace: GpRate::from_whole_percent(25),
            gp_promo_3plus1: GpRate::from_whole_percent(25),
            competitors: vec!["GoGulong".to_string(), "TireManila".to_string()],
        }
    }
}

impl PricingConfig {
    /// Fresh defaults ("Reset" in the dashboard).
    pub fn reset() -> Self {
        Self::default()
    }

    /// Returns a copy with one target replaced.
    pub fn with_target(&self, target: GpTarget, rate: GpRate) -> Self {
        let mut next = self.clone();
        *next.target_mut(target) = rate;
        next
    }

    /// Returns a copy reconciling against `competitors` instead.
    pub fn with_competitors(&self, competitors: Vec<String>) -> Self {
        Self {
            competitors,
            ..self.clone()
        }
    }

    /// Reads one target.
    pub fn target(&self, target: GpTarget) -> GpRate {
        match target {
            GpTarget::Gp15 => self.gp_15,
            GpTarget::Gp20a => self.gp_20a,
            GpTarget::Gp20b => self.gp_20b,
            GpTarget::B2b => self.d_b2b,
            GpTarget::Affiliate => self.d_affiliate,
            GpTarget::Marketplace => self.d_marketplace,
            GpTarget::Promo3Plus1 => self.gp_promo_3plus1,
        }
    }

    fn target_mut(&mut self, target: GpTarget) -> &mut GpRate {
        match target {
            GpTarget::Gp15 => &mut self.gp_15,
            GpTarget::Gp20a => &mut self.gp_20a,
            GpTarget::Gp20b => &mut self.gp_20b,
            GpTarget::B2b => &mut self.d_b2b,
            GpTarget::Affiliate => &mut self.d_affiliate,
            GpTarget::Marketplace => &mut self.d_marketplace,
            GpTarget::Promo3Plus1 => &mut self.gp_promo_3plus1,
        }
    }

    /// GP that derives a tier's initial price.
    ///
    /// The promo tier uses `gp_20a`; whether it applies depends on the
    /// SKU's sale tag (see [`crate::tiers::price_sku`]).
    pub fn tier_gp(&self, tier: Tier) -> GpRate {
        match tier {
            Tier::Slashed => self.gp_15,
            Tier::Promo => self.gp_20a,
            Tier::B2b => self.d_b2b,
            Tier::Affiliate => self.d_affiliate,
            Tier::Marketplace => self.d_marketplace,
        }
    }

    /// GP floor a competitor may push a tier down to.
    ///
    /// `None` for tiers reconciliation never touches.
    pub fn floor_gp(&self, tier: Tier) -> Option<GpRate> {
        match tier {
            Tier::Slashed => Some(self.gp_15),
            Tier::Promo => Some(self.gp_20b),
            Tier::B2b => Some(self.d_b2b),
            Tier::Marketplace => Some(self.d_marketplace),
            Tier::Affiliate => None,
        }
    }

    /// Checks every target and the competitor list.
    ///
    /// ## Rules
    /// - Every target is in `[0%, 100%)`
    /// - Competitor names are non-blank and unique
    pub fn validate(&self) -> ValidationResult<()> {
        for target in GpTarget::ALL {
            validate_gp_target(target.key(), self.target(target))?;
        }
        validate_competitor_names(&self.competitors)
    }
}

// =============================================================================
// GP Target
// =============================================================================

/// Names one tunable percentage in [`PricingConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpTarget {
    Gp15,
    Gp20a,
    Gp20b,
    B2b,
    Affiliate,
    Marketplace,
    Promo3Plus1,
}

impl GpTarget {
    pub const ALL: [GpTarget; 7] = [
        GpTarget::Gp15,
        GpTarget::Gp20a,
        GpTarget::Gp20b,
        GpTarget::B2b,
        GpTarget::Affiliate,
        GpTarget::Marketplace,
        GpTarget::Promo3Plus1,
    ];

    /// Key as written in config files and on the command line.
    pub const fn key(&self) -> &'static str {
        match self {
            GpTarget::Gp15 => "gp_15",
            GpTarget::Gp20a => "gp_20a",
            GpTarget::Gp20b => "gp_20b",
            GpTarget::B2b => "d_b2b",
            GpTarget::Affiliate => "d_affiliate",
            GpTarget::Marketplace => "d_marketplace",
            GpTarget::Promo3Plus1 => "gp_promo_3plus1",
        }
    }

    /// Parses a `key=percent` assignment such as `gp_15=18`.
    ///
    /// ```rust
    /// use gulong_core::config::GpTarget;
    ///
    /// let (target, rate) = GpTarget::parse_assignment("d_b2b=22.5").unwrap();
    /// assert_eq!(target, GpTarget::B2b);
    /// assert_eq!(rate.bps(), 2250);
    /// ```
    pub fn parse_assignment(raw: &str) -> Result<(GpTarget, GpRate), CoreError> {
        let (key, value) = raw.split_once('=').ok_or_else(|| ValidationError::Required {
            field: format!("value in '{}'", raw),
        })?;
        let target: GpTarget = key.parse()?;
        let rate = parse_gp(target.key(), value)?;
        Ok((target, rate))
    }
}

impl fmt::Display for GpTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for GpTarget {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        GpTarget::ALL
            .into_iter()
            .find(|target| target.key() == wanted)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "GP target".to_string(),
                allowed: GpTarget::ALL.iter().map(|t| t.key().to_string()).collect(),
            })
    }
}

// =============================================================================
// Tier Labels
// =============================================================================

/// Human-facing names for the tier columns ("Rename Tiers").
///
/// Applied only when exporting; the pricing pass always uses the
/// canonical column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct TierLabels {
    pub slashed: String,
    pub promo: String,
    pub b2b: String,
    pub marketplace: String,
    pub affiliate: String,
}

impl Default for TierLabels {
    fn default() -> Self {
        Self {
            slashed: "Website Slashed Price".to_string(),
            promo: "Website Prices".to_string(),
            b2b: "B2B".to_string(),
            marketplace: "Marketplace".to_string(),
            affiliate: "Affiliates".to_string(),
        }
    }
}

impl TierLabels {
    pub fn label(&self, tier: Tier) -> &str {
        match tier {
            Tier::Slashed => &self.slashed,
            Tier::Promo => &self.promo,
            Tier::B2b => &self.b2b,
            Tier::Affiliate => &self.affiliate,
            Tier::Marketplace => &self.marketplace,
        }
    }

    /// Labels must be non-blank and distinct, or the exported header
    /// would be ambiguous.
    pub fn validate(&self) -> ValidationResult<()> {
        let labels: Vec<String> = Tier::ALL.iter().map(|t| self.label(*t).to_string()).collect();
        for (tier, label) in Tier::ALL.iter().zip(&labels) {
            if label.trim().is_empty() {
                return Err(ValidationError::Required {
                    field: format!("label for {}", tier.column()),
                });
            }
        }
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].contains(label) {
                return Err(ValidationError::Duplicate {
                    field: "tier label".to_string(),
                    value: label.clone(),
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PricingConfig::default();
        assert_eq!(config.gp_15, GpRate::from_whole_percent(15));
        assert_eq!(config.gp_20a, GpRate::from_whole_percent(5));
        assert_eq!(config.gp_20b, GpRate::from_whole_percent(3));
        assert_eq!(config.d_b2b, GpRate::from_whole_percent(25));
        assert_eq!(config.d_affiliate, GpRate::from_whole_percent(27));
        assert_eq!(config.d_marketplace, GpRate::from_whole_percent(25));
        assert_eq!(config.competitors, vec!["GoGulong", "TireManila"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_target_leaves_original_untouched() {
        let base = PricingConfig::default();
        let next = base.with_target(GpTarget::Marketplace, GpRate::from_whole_percent(30));
        assert_eq!(base.d_marketplace.bps(), 2500);
        assert_eq!(next.d_marketplace.bps(), 3000);
        assert_eq!(PricingConfig::reset(), base);
    }

    #[test]
    fn test_validate_rejects_hundred_percent() {
        let bad = PricingConfig::default().with_target(GpTarget::Gp20a, GpRate::from_whole_percent(100));
        assert_eq!(
            bad.validate(),
            Err(ValidationError::OutOfRange {
                field: "gp_20a".to_string(),
                min: 0,
                max: 100
            })
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_competitor() {
        let bad = PricingConfig::default()
            .with_competitors(vec!["PartsPro".to_string(), "PartsPro".to_string()]);
        assert!(matches!(bad.validate(), Err(ValidationError::Duplicate { .. })));
    }

    #[test]
    fn test_parse_assignment() {
        let (target, rate) = GpTarget::parse_assignment(" GP_15 = 18 ").unwrap();
        assert_eq!(target, GpTarget::Gp15);
        assert_eq!(rate.bps(), 1800);

        assert!(GpTarget::parse_assignment("gp_99=1").is_err());
        assert!(GpTarget::parse_assignment("gp_15").is_err());
        assert!(matches!(
            GpTarget::parse_assignment("gp_15=abc"),
            Err(CoreError::Input(_))
        ));
    }

    #[test]
    fn test_tier_gp() {
        let config = PricingConfig::default().with_target(GpTarget::Marketplace, GpRate::from_whole_percent(12));
        assert_eq!(config.tier_gp(Tier::Slashed), config.gp_15);
        assert_eq!(config.tier_gp(Tier::Promo), config.gp_20a);
        assert_eq!(config.tier_gp(Tier::Marketplace), GpRate::from_whole_percent(12));
    }

    #[test]
    fn test_floor_gp() {
        let config = PricingConfig::default();
        assert_eq!(config.floor_gp(Tier::Promo), Some(config.gp_20b));
        assert_eq!(config.floor_gp(Tier::Affiliate), None);
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let config: PricingConfig = toml::from_str("gp_15 = 18\ncompetitors = [\"PartsPro\"]").unwrap();
        assert_eq!(config.gp_15.bps(), 1800);
        assert_eq!(config.d_b2b.bps(), 2500);
        assert_eq!(config.competitors, vec!["PartsPro"]);
    }

    #[test]
    fn test_tier_labels() {
        let labels = TierLabels::default();
        assert_eq!(labels.label(Tier::Promo), "Website Prices");
        assert!(labels.validate().is_ok());

        let clash = TierLabels {
            b2b: "Marketplace".to_string(),
            ..TierLabels::default()
        };
        assert!(clash.validate().is_err());
    }
}
