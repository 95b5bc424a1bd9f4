//! # Rates Subcommand
//!
//! Validate rate tables and resolve HSN codes.
//!
//! ```bash
//! dukaan rates check rates/hsn-2025.yaml
//! dukaan rates resolve 6211 1299.00
//! dukaan rates resolve 6211 1299.00 --table rates/hsn-2025.yaml
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use dukaan_core::Paisa;
use dukaan_tax::{GstRateTable, STANDARD_SLABS};

/// Rates subcommand arguments.
#[derive(Args, Debug)]
pub struct RatesArgs {
    #[command(subcommand)]
    pub command: RatesCommand,
}

/// Available rates subcommands.
#[derive(Subcommand, Debug)]
pub enum RatesCommand {
    /// Load a YAML rate table and report problems.
    Check {
        /// Path to the rate table.
        file: PathBuf,
    },

    /// Resolve the GST rate for an HSN code at a unit price.
    Resolve {
        /// HSN code.
        hsn: String,
        /// Unit price in rupees (e.g. `999.00`).
        unit_price: String,
        /// Rate table to use instead of the bundled one.
        #[arg(long)]
        table: Option<PathBuf>,
    },
}

/// Execute the rates subcommand.
pub fn run_rates(args: &RatesArgs) -> Result<u8> {
    match &args.command {
        RatesCommand::Check { file } => run_check(file),
        RatesCommand::Resolve {
            hsn,
            unit_price,
            table,
        } => run_resolve(hsn, unit_price, table.as_deref()),
    }
}

fn load_table(table: Option<&Path>) -> Result<GstRateTable> {
    match table {
        Some(path) => GstRateTable::from_path(path)
            .with_context(|| format!("failed to load rate table {}", path.display())),
        None => GstRateTable::india_standard().context("bundled rate table is invalid"),
    }
}

fn run_check(file: &Path) -> Result<u8> {
    let table = load_table(Some(file))?;
    let thresholds = table.entries().iter().filter(|e| e.threshold.is_some()).count();
    let off_slab = table
        .entries()
        .iter()
        .filter(|e| {
            !STANDARD_SLABS.contains(&e.rate)
                || e.threshold.is_some_and(|t| !STANDARD_SLABS.contains(&t.rate_above))
        })
        .count();

    println!("  file:          {}", file.display());
    println!("  entries:       {}", table.len());
    println!("  thresholds:    {thresholds}");
    println!("  default rate:  {}%", table.default_rate());
    println!("  off-slab:      {off_slab}");
    Ok(0)
}

fn run_resolve(hsn: &str, unit_price: &str, table: Option<&Path>) -> Result<u8> {
    let table = load_table(table)?;
    let unit_price: Paisa = unit_price
        .parse()
        .with_context(|| format!("'{unit_price}' is not a rupee amount"))?;
    let resolved = table.resolve(hsn, unit_price);
    println!("{}", serde_json::to_string_pretty(&serde_json::json!({
        "hsn_code": hsn.trim(),
        "unit_price": unit_price,
        "rate": resolved.rate,
        "source": resolved.source,
    }))?);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_valid_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rates.yaml");
        std::fs::write(
            &path,
            "entries:\n  - hsn_code: \"6211\"\n    rate: 5\n    threshold: 1000\n    rate_above_threshold: 12\n",
        )
        .unwrap();
        assert_eq!(run_check(&path).unwrap(), 0);
    }

    #[test]
    fn check_rejects_duplicate_codes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rates.yaml");
        std::fs::write(
            &path,
            "entries:\n  - hsn_code: \"6211\"\n    rate: 5\n  - hsn_code: \"6211\"\n    rate: 12\n",
        )
        .unwrap();
        let err = run_check(&path).unwrap_err();
        assert!(format!("{err:#}").contains("duplicate HSN code 6211"));
    }

    #[test]
    fn resolve_with_bundled_table() {
        assert_eq!(run_resolve("6211", "1001.00", None).unwrap(), 0);
        assert!(run_resolve("6211", "ten rupees", None).is_err());
    }
}
