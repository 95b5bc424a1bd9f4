//! # dukaan-pricing — Checkout Pricing
//!
//! Turns a cart into an amount payable.
//!
//! - **Discount** (`discount.rs`): [`validate_discount`] checks a shopper's
//!   code against its [`DiscountRecord`] and computes the discount. Refusals
//!   come back as data with a [`DiscountRejection`], not as errors.
//!
//! - **Quote** (`quote.rs`): [`CheckoutQuote::compute`] chains discount
//!   validation, order tax, shipping and shipping tax into one result.
//!
//! Storage of discount records and redemption counting belong to the
//! caller; this crate reads a record and never mutates it.

pub mod discount;
pub mod quote;

pub use discount::{
    validate_discount, DiscountKind, DiscountRecord, DiscountRejection, DiscountValidation,
    DiscountValue,
};
pub use quote::{CheckoutQuote, QuoteError, QuoteRequest};
