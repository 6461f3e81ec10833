//! # Price Command
//!
//! One pricing pass from the current snapshot.
//!
//! ```text
//! gulong-pricing price --auto-adjust --offers suppliers.csv --set gp_15=18 --out prices.csv
//!        │
//!        ├─ AppConfig.pricing (or --defaults) + --set / --competitor → PricingConfig
//!        ├─ --auto-adjust / --adjusted-only / --column → PassOptions
//!        ├─ --offers                                   → SupplierOffer[]
//!        ▼
//!  PricingSession::refresh ──► PricingOutput
//!        │
//!        ├─ table (relabelled with --tier-labels) ──► CSV  (--out or stdout)
//!        ├─ annotations ──────────────────────────► JSON (--annotations)
//!        └─ row errors, mismatches, alerts ───────► log (stderr)
//! ```

use clap::Args;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use gulong_core::catalog::ColumnSelection;
use gulong_core::config::GpTarget;
use gulong_core::{PassOptions, PricingOutput, TierLabels};
use gulong_data::import::load_supplier_offers_file;
use gulong_data::DataSource;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::state::PricingSession;

#[derive(Debug, Clone, Default, Args)]
pub struct PriceArgs {
    /// Move tier prices down to undercutting competitors (never below the GP floor)
    #[arg(long)]
    pub auto_adjust: bool,

    /// Supplier offers CSV to join onto the catalog
    #[arg(long, value_name = "FILE")]
    pub offers: Option<PathBuf>,

    /// Optional column to include (repeatable)
    #[arg(long = "column", value_name = "NAME")]
    pub columns: Vec<String>,

    /// Include every optional column
    #[arg(long, conflicts_with = "columns")]
    pub all_columns: bool,

    /// Only rows whose promo price differs from the live backend price
    #[arg(long)]
    pub adjusted_only: bool,

    /// Override a GP target for this pass, e.g. `gp_15=18` (repeatable)
    #[arg(long = "set", value_name = "KEY=PERCENT")]
    pub set: Vec<String>,

    /// Competitor to reconcile against, replacing the configured list (repeatable)
    #[arg(long = "competitor", value_name = "NAME")]
    pub competitors: Vec<String>,

    /// Start from the default GP targets and competitors instead of the configured ones
    #[arg(long)]
    pub defaults: bool,

    /// Write tier columns under the configured tier labels
    #[arg(long)]
    pub tier_labels: bool,

    /// CSV destination (default: config `export.out`, else stdout)
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Write the annotation matrix as JSON
    #[arg(long, value_name = "FILE")]
    pub annotations: Option<PathBuf>,
}

impl PriceArgs {
    pub fn pass_options(&self) -> PassOptions {
        let selection = if self.all_columns {
            ColumnSelection::All
        } else if self.columns.is_empty() {
            ColumnSelection::Base
        } else {
            ColumnSelection::Named(self.columns.clone())
        };

        PassOptions {
            auto_adjust: self.auto_adjust,
            adjusted_only: self.adjusted_only,
            selection,
        }
    }

    /// Applies `--set` and `--competitor` to the session config.
    ///
    /// Each change is validated on its own; the first bad one stops the
    /// pass before anything is acquired.
    pub fn apply_overrides<S: DataSource>(&self, session: &mut PricingSession<S>) -> AppResult<()> {
        for assignment in &self.set {
            let (target, rate) = GpTarget::parse_assignment(assignment)?;
            debug!(%target, %rate, "GP target override");
            session.set_target(target, rate)?;
        }
        if !self.competitors.is_empty() {
            let config = session.config().with_competitors(self.competitors.clone());
            session.set_config(config)?;
        }
        Ok(())
    }
}

/// Runs the pass and writes its outputs.
pub async fn run<S: DataSource>(source: S, config: &AppConfig, args: &PriceArgs) -> AppResult<()> {
    let mut session = PricingSession::new(source, config.pricing.clone())?;
    if args.defaults {
        debug!("Using default GP targets");
        session.reset_config();
    }
    args.apply_overrides(&mut session)?;
    session.set_options(args.pass_options());

    let offers = args
        .offers
        .as_ref()
        .map(load_supplier_offers_file)
        .transpose()?;

    let output = session.refresh(offers.as_deref()).await?;
    report(output);

    let relabel = args.tier_labels || config.export.relabel_tiers;
    let csv = render_csv(output, relabel.then_some(&config.export.tier_labels))?;
    let out = args.out.as_deref().or(config.export.out.as_deref());
    write_bytes(out, &csv)?;

    if let Some(path) = &args.annotations {
        let json = serde_json::to_vec_pretty(&output.annotations)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "Annotations written");
    }

    Ok(())
}

/// Encodes the output table, optionally under operator tier names.
pub fn render_csv(output: &PricingOutput, labels: Option<&TierLabels>) -> AppResult<Vec<u8>> {
    let bytes = match labels {
        Some(labels) => output.table.relabel(labels).to_csv_bytes()?,
        None => output.table.to_csv_bytes()?,
    };
    Ok(bytes)
}

fn write_bytes(out: Option<&Path>, bytes: &[u8]) -> AppResult<()> {
    match out {
        Some(path) => {
            std::fs::write(path, bytes)
                .map_err(|e| AppError::export(format!("Failed to write '{}': {}", path.display(), e)))?;
            info!(path = %path.display(), bytes = bytes.len(), "Price table written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn report(output: &PricingOutput) {
    info!(
        backend = %output.backend_last_update,
        competitors = %output.competitor_last_update,
        "Data last updated"
    );

    for row in &output.row_errors {
        warn!(model = %row.model, status = ?row.status, "SKU not priced");
    }
    for mismatch in &output.mismatches {
        warn!(%mismatch, "Supplier offer not joined");
    }
    for alert in &output.alerts {
        info!(
            model = %alert.model,
            competitor = %alert.competitor,
            competitor_price = %alert.competitor_price,
            promo = %alert.promo,
            "Promo above competitor"
        );
    }
    for adjustment in &output.adjustments {
        debug!(
            model = %adjustment.model,
            tier = ?adjustment.tier,
            from = %adjustment.from,
            to = %adjustment.to,
            binding = ?adjustment.binding,
            "Tier price adjusted"
        );
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
