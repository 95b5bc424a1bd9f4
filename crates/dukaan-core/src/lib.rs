//! # dukaan-core — Foundational Types for the Commerce Core
//!
//! Leaf crate of the Dukaan workspace. Every other `dukaan-*` crate depends
//! on it; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Money is integer paisa.** [`Paisa`] wraps an `i64` count of the
//!    currency subunit. Decimal rupee strings exist only at the boundary
//!    (parsing input, rendering output). Floats are rejected on input.
//!
//! 2. **Percentages are basis points.** [`Percent`] stores `12%` as `1200`,
//!    so `0.25%` and `12%` share one exact representation.
//!
//! 3. **One rounding rule.** [`round_half_up_div`] rounds half away from
//!    zero. There is no banker's rounding anywhere in the workspace.
//!
//! 4. **Newtype wrappers for domain identifiers.** `StateCode`, `HsnCode`,
//!    `OrderId` have validated constructors. No bare strings.
//!
//! 5. **UTC-only timestamps.** [`Timestamp`] is UTC with seconds precision.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dukaan-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod money;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::ValidationError;
pub use identity::{HsnCode, OrderId, StateCode};
pub use money::{round_half_up_div, Paisa, Percent};
pub use temporal::Timestamp;
