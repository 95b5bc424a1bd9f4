//! # dukaan CLI entry point
//!
//! Parses arguments, installs the tracing subscriber and dispatches to the
//! subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dukaan_cli::order::{run_order, OrderArgs};
use dukaan_cli::quote::{run_quote, QuoteArgs};
use dukaan_cli::rates::{run_rates, RatesArgs};

/// Dukaan commerce core operator tool.
///
/// Inspects the order lifecycle, validates GST rate tables and prices
/// checkout requests.
#[derive(Parser, Debug)]
#[command(name = "dukaan", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Order status transitions.
    Order(OrderArgs),

    /// GST rate tables.
    Rates(RatesArgs),

    /// Price a checkout request.
    Quote(QuoteArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let result = match &cli.command {
        Commands::Order(args) => run_order(args),
        Commands::Rates(args) => run_rates(args),
        Commands::Quote(args) => run_quote(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
