//! # Error Types
//!
//! Validation errors raised when boundary input (amounts, rates, state
//! codes, HSN codes, timestamps, status names) fails to parse into a
//! domain type. All errors use `thiserror` for derive-based `Display`
//! and `Error` implementations.
//!
//! Errors include the offending input verbatim so that callers can
//! surface it back to the seller or API client unchanged.

use thiserror::Error;

/// Boundary input could not be converted into a domain type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A monetary amount failed to parse.
    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A percentage failed to parse or was negative.
    #[error("invalid percentage {input:?}: {reason}")]
    InvalidPercent {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Float values are not accepted for money. Amounts must be decimal
    /// strings or whole-rupee integers.
    #[error("float values are not accepted for amounts; use a decimal string: {0}")]
    FloatRejected(String),

    /// A GST state code was not two alphanumeric characters.
    #[error("invalid state code {0:?}: expected two alphanumeric characters")]
    InvalidStateCode(String),

    /// An HSN code was not 4 to 8 ASCII digits.
    #[error("invalid HSN code {0:?}: expected 4 to 8 digits")]
    InvalidHsnCode(String),

    /// A timestamp failed to parse or was not UTC.
    #[error("invalid timestamp {input:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An order status name is not one of the known statuses.
    #[error("unknown order status {0:?}")]
    UnknownOrderStatus(String),
}

impl ValidationError {
    pub(crate) fn amount(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn percent(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPercent {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
