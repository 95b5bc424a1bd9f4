//! # Quote Subcommand
//!
//! Price a checkout request from a JSON file.
//!
//! ```bash
//! dukaan quote cart.json
//! dukaan quote cart.json --discounts codes.json --config tax.yaml --at 2025-10-20T09:30:00Z
//! ```
//!
//! `--discounts` is a JSON array of discount records; the request's
//! `discount_code` is looked up in it case-insensitively.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use dukaan_core::Timestamp;
use dukaan_pricing::{CheckoutQuote, DiscountRecord, QuoteRequest};
use dukaan_tax::{TaxConfig, TaxEngine};

use crate::OutputFormat;

/// Quote subcommand arguments.
#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Path to a JSON quote request.
    pub request: PathBuf,

    /// Tax configuration (YAML). The bundled rate table is used if absent.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// JSON array of discount records.
    #[arg(long)]
    pub discounts: Option<PathBuf>,

    /// Price as of this instant (RFC 3339, UTC). Defaults to now.
    #[arg(long)]
    pub at: Option<String>,

    /// Output encoding.
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Execute the quote subcommand.
pub fn run_quote(args: &QuoteArgs) -> Result<u8> {
    let quote = build_quote(args)?;
    println!("{}", args.format.render(&quote)?);
    Ok(0)
}

fn build_quote(args: &QuoteArgs) -> Result<CheckoutQuote> {
    let engine = match &args.config {
        Some(path) => {
            let config = TaxConfig::from_path(path)
                .with_context(|| format!("failed to load tax config {}", path.display()))?;
            TaxEngine::from_config(&config).context("failed to build tax engine")?
        }
        None => TaxEngine::india_standard().context("bundled rate table is invalid")?,
    };

    let request: QuoteRequest = read_json(&args.request)?;
    let discounts: Vec<DiscountRecord> = match &args.discounts {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    let record = request
        .discount_code
        .as_deref()
        .and_then(|code| discounts.iter().find(|d| d.matches(code)));

    let now = match &args.at {
        Some(at) => Timestamp::parse(at).with_context(|| format!("invalid --at '{at}'"))?,
        None => Timestamp::now(),
    };

    CheckoutQuote::compute(&engine, &request, record, now).context("failed to price request")
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}
