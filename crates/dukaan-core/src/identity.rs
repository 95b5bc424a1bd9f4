//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers the order and tax core works with.
//! These prevent accidental confusion: you cannot pass an HSN code where a
//! GST state code is expected.
//!
//! String-backed identifiers validate on construction and on
//! deserialization (`#[serde(try_from = "String")]`), so a value of these
//! types is always well-formed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Unique identifier for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub Uuid);

impl OrderId {
    /// Generate a new random order identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order:{}", self.0)
    }
}

/// A GST state code (the two-character prefix of a GSTIN, e.g. `"08"`
/// for Rajasthan, `"27"` for Maharashtra).
///
/// Two state codes are the same state iff their normalized strings are
/// equal. Letters are upper-cased on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateCode(String);

impl StateCode {
    /// Validate and normalize a state code.
    pub fn new(code: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = code.as_ref();
        let trimmed = raw.trim();
        if trimmed.len() != 2 || !trimmed.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(ValidationError::InvalidStateCode(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// The normalized code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StateCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StateCode> for String {
    fn from(value: StateCode) -> Self {
        value.0
    }
}

impl std::str::FromStr for StateCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for StateCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Harmonized System of Nomenclature code: India's product tax
/// classification. 4 digits (heading) up to 8 digits (tariff item).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HsnCode(String);

impl HsnCode {
    /// Minimum number of digits in an HSN code.
    pub const MIN_DIGITS: usize = 4;
    /// Maximum number of digits in an HSN code.
    pub const MAX_DIGITS: usize = 8;

    /// Validate an HSN code. Surrounding whitespace is trimmed.
    pub fn new(code: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = code.as_ref();
        let trimmed = raw.trim();
        let len_ok = (Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&trimmed.len());
        if !len_ok || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidHsnCode(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The code digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HsnCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HsnCode> for String {
    fn from(value: HsnCode) -> Self {
        value.0
    }
}

impl std::str::FromStr for HsnCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for HsnCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
