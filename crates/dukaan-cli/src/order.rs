//! # Order Subcommand
//!
//! Inspect the order status transition table.
//!
//! ```bash
//! dukaan order transitions shipped
//! dukaan order check delivered refunded
//! dukaan order audit --format yaml
//! ```

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use dukaan_state::{audit_transition_table, validate_transition, OrderStatus};

use crate::OutputFormat;

/// Order subcommand arguments.
#[derive(Args, Debug)]
pub struct OrderArgs {
    #[command(subcommand)]
    pub command: OrderCommand,
}

/// Available order subcommands.
#[derive(Subcommand, Debug)]
pub enum OrderCommand {
    /// Print the statuses an order may move to next.
    Transitions {
        /// Current status (e.g. `shipped`).
        status: String,
    },

    /// Check whether a single transition is legal. Exits 1 if not.
    Check {
        /// Current status.
        from: String,
        /// Proposed status.
        to: String,
    },

    /// Audit the transition table for dead ends and unreachable statuses.
    Audit {
        /// Output encoding.
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

/// Execute the order subcommand.
pub fn run_order(args: &OrderArgs) -> Result<u8> {
    match &args.command {
        OrderCommand::Transitions { status } => run_transitions(status),
        OrderCommand::Check { from, to } => run_check(from, to),
        OrderCommand::Audit { format } => run_audit(*format),
    }
}

fn parse_status(input: &str) -> Result<OrderStatus> {
    input
        .parse()
        .with_context(|| format!("'{input}' is not an order status"))
}

fn run_transitions(status: &str) -> Result<u8> {
    let status = parse_status(status)?;
    let next = status.allowed_transitions();
    if next.is_empty() {
        println!("{status} is terminal");
        return Ok(0);
    }
    for to in next {
        println!("{to}");
    }
    Ok(0)
}

fn run_check(from: &str, to: &str) -> Result<u8> {
    let from = parse_status(from)?;
    let to = parse_status(to)?;
    match validate_transition(from, to) {
        Ok(()) => {
            println!("ok: {from} -> {to}");
            Ok(0)
        }
        Err(e) => {
            println!("rejected: {e}");
            Ok(1)
        }
    }
}

fn run_audit(format: OutputFormat) -> Result<u8> {
    let audit = audit_transition_table().context("transition table failed audit")?;
    println!("{}", format.render(&audit)?);
    Ok(0)
}
