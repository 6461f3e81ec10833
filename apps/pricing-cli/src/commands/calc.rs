//! # Calc Command
//!
//! ```text
//! gulong-pricing calc selling 1000 30    → 1429
//! gulong-pricing calc supplier 1000 30   → 769
//! gulong-pricing calc gp 1500 1000       → 33.33%
//! gulong-pricing calc gp 0 1000          → Input Error
//! ```

use clap::Subcommand;
use tracing::warn;

use gulong_core::calculator::{quick_gp, quick_selling_price, quick_supplier_price, CalcOutcome};

#[derive(Debug, Clone, Subcommand)]
#[command(rename_all = "kebab-case")]
pub enum CalcCommand {
    /// Selling price from a supplier price and GP%
    Selling {
        supplier: String,
        #[arg(allow_hyphen_values = true)]
        gp: String,
    },
    /// Supplier price from a selling price and GP%
    Supplier {
        selling: String,
        #[arg(allow_hyphen_values = true)]
        gp: String,
    },
    /// GP% from a selling price and a supplier price
    Gp { selling: String, supplier: String },
}

pub fn evaluate(command: &CalcCommand) -> CalcOutcome {
    match command {
        CalcCommand::Selling { supplier, gp } => quick_selling_price(supplier, gp),
        CalcCommand::Supplier { selling, gp } => quick_supplier_price(selling, gp),
        CalcCommand::Gp { selling, supplier } => quick_gp(selling, supplier),
    }
}

/// Prints the result, or "Input Error". Never fails.
pub fn run(command: &CalcCommand) {
    let outcome = evaluate(command);
    match &outcome {
        CalcOutcome::Input(err) => warn!(error = %err, "Calculator input rejected"),
        CalcOutcome::Domain(err) => warn!(error = %err, "Calculation undefined"),
        CalcOutcome::Value(_) => {}
    }
    println!("{}", outcome);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes() {
        let selling = CalcCommand::Selling {
            supplier: "1000".to_string(),
            gp: "30".to_string(),
        };
        assert_eq!(evaluate(&selling).to_string(), "1429");

        let gp = CalcCommand::Gp {
            selling: "0".to_string(),
            supplier: "1000".to_string(),
        };
        assert_eq!(evaluate(&gp).to_string(), "Input Error");
    }
}
