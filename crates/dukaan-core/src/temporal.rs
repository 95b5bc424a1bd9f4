//! # Timestamps
//!
//! [`Timestamp`] is a UTC instant with whole-second precision. Transition
//! records and discount validity windows (`starts_at <= now < ends_at`)
//! compare through it, so a sale scheduled for midnight IST and checked
//! on a UTC server agree on when it opens.
//!
//! Wire input must carry the `Z` suffix. Seller-entered dates with an
//! offset go through [`Timestamp::parse_lenient`].

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A UTC instant, whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current instant.
    pub fn now() -> Self {
        Self(Utc::now().trunc_subsecs(0))
    }

    /// Parse RFC 3339 in UTC (`2025-10-20T09:30:00Z`).
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if !input.trim_end().ends_with('Z') {
            return Err(ValidationError::InvalidTimestamp {
                input: input.to_string(),
                reason: "expected a UTC time with Z suffix".to_string(),
            });
        }
        Self::parse_lenient(input)
    }

    /// Parse RFC 3339 with any offset and convert to UTC.
    pub fn parse_lenient(input: &str) -> Result<Self, ValidationError> {
        DateTime::parse_from_rfc3339(input.trim())
            .map(|dt| Self(dt.with_timezone(&Utc).trunc_subsecs(0)))
            .map_err(|e| ValidationError::InvalidTimestamp {
                input: input.to_string(),
                reason: e.to_string(),
            })
    }

    /// From Unix seconds.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, ValidationError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidTimestamp {
                input: secs.to_string(),
                reason: "outside the representable range".to_string(),
            })
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%SZ"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_only_on_the_wire() {
        assert!(Timestamp::parse("2025-10-20T09:30:00Z").is_ok());
        assert!(Timestamp::parse("2025-10-20T15:00:00+05:30").is_err());
        assert!(Timestamp::parse("20 Oct 2025").is_err());
    }

    #[test]
    fn ist_midnight_is_utc_evening() {
        let ts = Timestamp::parse_lenient("2025-10-20T00:00:00+05:30").unwrap();
        assert_eq!(ts.to_string(), "2025-10-19T18:30:00Z");
    }

    #[test]
    fn subseconds_are_dropped() {
        let ts = Timestamp::parse("2025-10-20T09:30:00.999Z").unwrap();
        assert_eq!(ts, Timestamp::parse("2025-10-20T09:30:00Z").unwrap());
        assert_eq!(Timestamp::now().to_string().len(), 20);
    }

    #[test]
    fn epoch_seconds() {
        assert_eq!(Timestamp::from_epoch_secs(0).unwrap().to_string(), "1970-01-01T00:00:00Z");
        assert!(Timestamp::from_epoch_secs(i64::MAX).is_err());
    }

    #[test]
    fn window_comparison() {
        let opens = Timestamp::parse("2025-10-20T00:00:00Z").unwrap();
        let checked = Timestamp::parse("2025-10-20T00:00:01Z").unwrap();
        assert!(opens <= checked);
    }

    #[test]
    fn serde_string_form() {
        let ts: Timestamp = serde_json::from_str("\"2025-10-01T00:00:00Z\"").unwrap();
        assert_eq!(ts.to_string(), "2025-10-01T00:00:00Z");
    }
}
