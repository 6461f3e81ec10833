//! # Config Commands
//!
//! `config show` prints the effective configuration as TOML, `config reset`
//! writes the defaults, `config path` prints where the file is read from.

use clap::Subcommand;
use std::path::PathBuf;
use tracing::info;

use crate::config::{AppConfig, ConfigError};
use crate::error::AppResult;

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Overwrite the config file with defaults
    Reset,
    /// Print the config file location
    Path,
}

pub fn show(config: &AppConfig) -> AppResult<()> {
    let text = toml::to_string_pretty(config).map_err(ConfigError::from)?;
    print!("{}", text);
    Ok(())
}

/// Writes the defaults without reading the current file, so a broken
/// file can always be reset.
pub fn reset(config_path: Option<PathBuf>) -> AppResult<PathBuf> {
    let path = AppConfig::default().save(config_path)?;
    info!(?path, "Config reset to defaults");
    println!("{}", path.display());
    Ok(path)
}

pub fn path(config_path: Option<PathBuf>) -> AppResult<()> {
    let path = AppConfig::resolve_path(config_path).ok_or(ConfigError::NoConfigDir)?;
    println!("{}", path.display());
    Ok(())
}
