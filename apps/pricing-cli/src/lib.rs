//! # Gulong Pricing CLI
//!
//! Operator entry point for tier pricing.
//!
//! ## Module Organization
//! ```text
//! gulong_pricing/
//! ├── lib.rs          ◄─── You are here (CLI definition, logging, dispatch)
//! ├── config.rs       ◄─── AppConfig: defaults → gulong.toml → GULONG_* env
//! ├── error.rs        ◄─── AppError for every command
//! ├── state/
//! │   └── session.rs  ◄─── PricingSession (config, toggles, last good output)
//! └── commands/
//!     ├── price.rs    ◄─── Pricing pass → CSV
//!     ├── calc.rs     ◄─── Quick calculator
//!     ├── import.rs   ◄─── Backend refresh
//!     ├── status.rs   ◄─── Store health and freshness
//!     └── config.rs   ◄─── Show / reset config
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize Logging                                                  │
//! │     • tracing-subscriber with env filter, written to stderr             │
//! │     • Default: info,gulong=debug,sqlx=warn; override with RUST_LOG     │
//! │                                                                         │
//! │  2. Parse the command line (clap)                                       │
//! │                                                                         │
//! │  3. Load AppConfig (skipped by `calc` and `config reset`)              │
//! │                                                                         │
//! │  4. Open the snapshot store (`price`, `import`, `status`)              │
//! │     • --db, else [data].database_path, else the platform data dir      │
//! │                                                                         │
//! │  5. Run the command                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gulong_data::{DataConfig, Database, SqliteSource};

use crate::commands::calc::CalcCommand;
use crate::commands::config::ConfigCommand;
use crate::commands::import::ImportArgs;
use crate::commands::price::PriceArgs;
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

#[derive(Debug, Parser)]
#[command(name = "gulong-pricing", version, about = "Tier pricing for the Gulong tire catalog")]
pub struct Cli {
    /// Config file (default: GULONG_CONFIG, else the platform config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Snapshot store, overriding the configured path
    #[arg(long, global = true, value_name = "FILE")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "kebab-case")]
pub enum Command {
    /// Run a pricing pass and write the price table as CSV
    Price(PriceArgs),

    /// Quick GP calculator
    Calc {
        #[command(subcommand)]
        mode: CalcCommand,
    },

    /// Replace the backend catalog and competitor prices from CSV exports
    Import(ImportArgs),

    /// Show snapshot store health, row counts and last-update dates
    Status,

    /// Show or reset the operator config
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=gulong=trace` - Trace for the gulong crates only
/// - Default: `info,gulong=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gulong=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Dispatches one command.
pub async fn run(cli: Cli) -> AppResult<()> {
    match cli.command {
        Command::Calc { mode } => {
            commands::calc::run(&mode);
            Ok(())
        }
        Command::Config { action } => match action {
            ConfigCommand::Show => commands::config::show(&AppConfig::load(cli.config)?),
            ConfigCommand::Reset => commands::config::reset(cli.config).map(|_| ()),
            ConfigCommand::Path => commands::config::path(cli.config),
        },
        Command::Price(args) => {
            let config = AppConfig::load(cli.config)?;
            let db = open_database(&config, cli.db.as_deref()).await?;
            let result = commands::price::run(SqliteSource::new(db.clone()), &config, &args).await;
            db.close().await;
            result
        }
        Command::Import(args) => {
            let config = AppConfig::load(cli.config)?;
            let db = open_database(&config, cli.db.as_deref()).await?;
            let result = commands::import::run(&db, &args).await;
            db.close().await;
            result.map(|_| ())
        }
        Command::Status => {
            let config = AppConfig::load(cli.config)?;
            let db = open_database(&config, cli.db.as_deref()).await?;
            let result = commands::status::run(&db).await;
            db.close().await;
            result.map(|_| ())
        }
    }
}

/// Opens the snapshot store, creating its directory on first use.
async fn open_database(config: &AppConfig, override_path: Option<&Path>) -> AppResult<Database> {
    let path = match override_path {
        Some(path) => path.to_path_buf(),
        None => config.database_path()?,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::new(
                error::ErrorCode::AcquisitionError,
                format!("Cannot create '{}': {}", parent.display(), e),
            )
        })?;
    }

    info!(path = %path.display(), "Using snapshot store");
    Ok(Database::new(DataConfig::new(path)).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_price_flags() {
        let cli = Cli::try_parse_from([
            "gulong-pricing",
            "price",
            "--auto-adjust",
            "--set",
            "gp_15=18",
            "--column",
            "GulongPH_backend",
            "--db",
            "/tmp/g.db",
        ])
        .unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("/tmp/g.db")));
        match cli.command {
            Command::Price(args) => {
                assert!(args.auto_adjust);
                assert_eq!(args.set, vec!["gp_15=18"]);
                assert_eq!(args.columns, vec!["GulongPH_backend"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_import_dates() {
        let cli = Cli::try_parse_from([
            "gulong-pricing",
            "import",
            "--skus",
            "skus.csv",
            "--competitors",
            "comps.csv",
            "--backend-date",
            "2024-05-08",
        ])
        .unwrap();

        match cli.command {
            Command::Import(args) => {
                assert_eq!(args.backend_date, chrono::NaiveDate::from_ymd_opt(2024, 5, 8));
                assert_eq!(args.competitor_date, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_status() {
        let cli = Cli::try_parse_from(["gulong-pricing", "status", "--db", "/tmp/g.db"]).unwrap();
        assert!(matches!(cli.command, Command::Status));
    }

    #[test]
    fn test_all_columns_conflicts_with_column() {
        let result = Cli::try_parse_from([
            "gulong-pricing",
            "price",
            "--all-columns",
            "--column",
            "GulongPH_backend",
        ]);
        assert!(result.is_err());
    }
}
