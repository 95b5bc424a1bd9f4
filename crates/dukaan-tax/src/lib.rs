//! # dukaan-tax — Indian GST Engine
//!
//! Computes Goods and Services Tax for marketplace orders. Pure and
//! deterministic: the same inputs always produce the same breakdown, so
//! cart, checkout and invoice agree to the paisa.
//!
//! ## Modules
//!
//! - **Rates** (`rates.rs`): [`GstRateTable`], a YAML-driven HSN lookup
//!   with unit-price thresholds and an 18% default for unknown codes.
//!
//! - **Split** (`split.rs`): [`split_tax`] divides a tax amount into CGST
//!   and SGST for intra-state supplies or IGST for inter-state supplies.
//!
//! - **Order** (`order.rs`): [`TaxEngine::tax_order`] apportions an
//!   order-level discount across lines and aggregates per-line taxes.
//!
//! - **Summary** (`summary.rs`): [`hsn_summary`] groups line taxes by HSN
//!   code and rate for the invoice.
//!
//! - **Config** (`config.rs`): [`TaxConfig`] selects the rate table and the
//!   fallback rates.
//!
//! ## Money
//!
//! All amounts are [`Paisa`](dukaan_core::Paisa) integers and all rates are
//! basis points. Every rounding step rounds half away from zero, which is
//! the convention on GST invoices.

pub mod config;
pub mod order;
pub mod rates;
pub mod split;
pub mod summary;

pub use config::{ConfigError, TaxConfig};
pub use order::{
    LineItemTax, OrderTaxBreakdown, OrderTaxTotals, TaxEngine, TaxError, TaxableLineItem,
};
pub use rates::{
    GstRateTable, HsnRateEntry, RateSource, RateTableError, RateThreshold, ResolvedRate,
    DEFAULT_GST_RATE, STANDARD_SLABS,
};
pub use split::{is_inter_state, shipping_tax, split_tax, GstSplit, SHIPPING_GST_RATE};
pub use summary::{hsn_summary, HsnSummaryLine};
