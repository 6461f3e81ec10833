//! # Operator Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line (--db, price --set gp_15=18)  (highest priority)      │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     GULONG_DB_PATH=./gulong.db                                         │
//! │     GULONG_GP_15=18   GULONG_D_B2B=22                                  │
//! │     GULONG_COMPETITORS=GoGulong,TireManila                             │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/gulong-pricing/gulong.toml (Linux)                       │
//! │     ~/Library/Application Support/ph.gulong.pricing/gulong.toml (macOS)│
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [pricing]
//! gp_15 = 15.0
//! gp_20a = 5.0
//! gp_20b = 3.0
//! d_b2b = 25.0
//! d_affiliate = 27.0
//! d_marketplace = 25.0
//! gp_promo_3plus1 = 25.0
//! competitors = ["GoGulong", "TireManila"]
//!
//! [data]
//! database_path = "/srv/gulong/gulong.db"
//!
//! [export]
//! relabel_tiers = true
//!
//! [export.tier_labels]
//! slashed = "Website Slashed Price"
//! promo = "Website Prices"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use gulong_core::config::GpTarget;
use gulong_core::validation::parse_gp;
use gulong_core::{InputError, PricingConfig, TierLabels, ValidationError};

const CONFIG_FILE: &str = "gulong.toml";
const DATABASE_FILE: &str = "gulong.db";

// =============================================================================
// Sections
// =============================================================================

/// `[data]`: where the snapshot store lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Unset: the platform data directory.
    pub database_path: Option<PathBuf>,
}

/// `[export]`: output location and tier column names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Unset: stdout.
    pub out: Option<PathBuf>,

    /// Write tier columns under `tier_labels` instead of their canonical names.
    pub relabel_tiers: bool,

    pub tier_labels: TierLabels,
}

/// Everything the operator can configure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub data: DataSettings,

    #[serde(default)]
    pub export: ExportSettings,
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Could not determine a config directory")]
    NoConfigDir,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

fn io_error(path: &Path, err: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

// =============================================================================
// Loading
// =============================================================================

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (explicit path, `GULONG_CONFIG`, or the platform default)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match Self::resolve_path(config_path) {
            Some(path) if path.exists() => {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
                toml::from_str(&contents)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Writes this configuration as TOML, creating parent directories.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<PathBuf> {
        let path = Self::resolve_path(config_path).ok_or(ConfigError::NoConfigDir)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| io_error(&path, e))?;

        info!(?path, "Config saved");
        Ok(path)
    }

    /// Rejects GP targets outside [0, 100) and unusable labels.
    pub fn validate(&self) -> ConfigResult<()> {
        self.pricing.validate()?;
        self.export.tier_labels.validate()?;
        Ok(())
    }

    /// Applies `GULONG_*` overrides. `lookup` is `std::env::var` outside tests.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        for target in GpTarget::ALL {
            let key = format!("GULONG_{}", target.key().to_ascii_uppercase());
            if let Some(raw) = lookup(&key) {
                let rate = parse_gp(target.key(), &raw).map_err(|e| invalid_value(&key, e))?;
                debug!(key = %key, %rate, "Overriding GP target from environment");
                self.pricing = self.pricing.with_target(target, rate);
            }
        }

        if let Some(raw) = lookup("GULONG_COMPETITORS") {
            let names = raw
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
            self.pricing = self.pricing.with_competitors(names);
        }

        if let Some(path) = lookup("GULONG_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.data.database_path = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("GULONG_EXPORT_OUT") {
            self.export.out = Some(PathBuf::from(path));
        }

        Ok(())
    }

    /// Store location: configured path, else the platform data directory.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.data.database_path {
            return Ok(path.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Explicit path, then `GULONG_CONFIG`, then the platform default.
    pub fn resolve_path(config_path: Option<PathBuf>) -> Option<PathBuf> {
        config_path
            .or_else(|| std::env::var_os("GULONG_CONFIG").map(PathBuf::from))
            .or_else(Self::default_config_path)
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("ph", "gulong", "pricing")
}

fn invalid_value(key: &str, err: InputError) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: err.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use gulong_core::GpRate;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pricing, PricingConfig::default());
        assert!(!config.export.relabel_tiers);
    }

    #[test]
    fn test_toml_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [pricing]
            gp_15 = 18
            competitors = ["GoGulong"]

            [export.tier_labels]
            b2b = "Dealers"
            "#,
        )
        .unwrap();

        assert_eq!(config.pricing.gp_15, GpRate::from_whole_percent(18));
        assert_eq!(config.pricing.gp_20a, PricingConfig::default().gp_20a);
        assert_eq!(config.pricing.competitors, vec!["GoGulong"]);
        assert_eq!(config.export.tier_labels.b2b, "Dealers");
        assert_eq!(config.export.tier_labels.promo, "Website Prices");
        assert_eq!(config.data.database_path, None);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = AppConfig::default();
        config.data.database_path = Some(PathBuf::from("/srv/gulong.db"));
        config.export.relabel_tiers = true;

        let text = toml::to_string_pretty(&config).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env_overrides(env(&[
                ("GULONG_GP_15", "18"),
                ("GULONG_D_B2B", "22.5"),
                ("GULONG_COMPETITORS", "GoGulong, PartsPro ,"),
                ("GULONG_DB_PATH", "/tmp/g.db"),
            ]))
            .unwrap();

        assert_eq!(config.pricing.gp_15, GpRate::from_whole_percent(18));
        assert_eq!(config.pricing.d_b2b.bps(), 2250);
        assert_eq!(config.pricing.competitors, vec!["GoGulong", "PartsPro"]);
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/g.db"));
    }

    #[test]
    fn test_bad_env_value() {
        let mut config = AppConfig::default();
        let err = config.apply_env_overrides(env(&[("GULONG_GP_20A", "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "GULONG_GP_20A"));
    }

    #[test]
    fn test_out_of_range_target_fails_validation() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(env(&[("GULONG_GP_15", "100")])).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("gulong-config-{}.toml", std::process::id()));
        let mut config = AppConfig::default();
        config.export.tier_labels.marketplace = "Lazada/Shopee".to_string();

        config.save(Some(path.clone())).unwrap();
        let loaded: AppConfig = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, config);
    }
}
