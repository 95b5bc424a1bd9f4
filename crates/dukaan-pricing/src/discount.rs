//! # Discount Code Validation
//!
//! Checks a shopper-entered code against its stored [`DiscountRecord`] and
//! computes the discount for an order total. The checks run in a fixed
//! order and the first failure wins:
//!
//! ```text
//! exists → active → started → not expired → under usage limit → meets minimum
//! ```
//!
//! A failed check is a [`DiscountValidation`] with `valid == false` and a
//! message the checkout UI can render inline. It is never an `Err` and
//! never a silent zero discount.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dukaan_core::{Paisa, Percent, Timestamp, ValidationError};

// ─── Records ─────────────────────────────────────────────────────────

/// How a discount is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// A percentage of the order total.
    Percentage,
    /// A fixed amount.
    Flat,
}

/// The discount a code grants, typed by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountValue {
    /// A percentage of the order total.
    Percentage(Percent),
    /// A fixed amount.
    Flat(Paisa),
}

impl DiscountValue {
    /// The kind tag.
    pub fn kind(&self) -> DiscountKind {
        match self {
            Self::Percentage(_) => DiscountKind::Percentage,
            Self::Flat(_) => DiscountKind::Flat,
        }
    }

    /// The raw discount for `order_total`, before any clamping.
    pub fn amount_for(&self, order_total: Paisa) -> Paisa {
        match self {
            Self::Percentage(pct) => pct.of(order_total),
            Self::Flat(amount) => *amount,
        }
    }
}

/// A stored discount code.
///
/// The wire form carries `kind` and `value` as separate fields, with
/// `value` a decimal string or an integer:
///
/// ```json
/// { "code": "DIWALI10", "kind": "percentage", "value": "10",
///   "max_discount": "500.00", "starts_at": "2025-10-01T00:00:00Z" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDiscountRecord", into = "RawDiscountRecord")]
pub struct DiscountRecord {
    /// Code as configured by the seller.
    pub code: String,
    /// What the code grants.
    pub value: DiscountValue,
    /// Minimum order total for the code to apply.
    pub min_order_value: Option<Paisa>,
    /// Cap on the computed discount.
    pub max_discount: Option<Paisa>,
    /// Maximum redemptions; unlimited when absent.
    pub usage_limit: Option<u32>,
    /// Redemptions so far.
    pub used_count: u32,
    /// Whether the seller has the code switched on.
    pub is_active: bool,
    /// Start of validity (inclusive).
    pub starts_at: Timestamp,
    /// End of validity (exclusive); open-ended when absent.
    pub ends_at: Option<Timestamp>,
}

impl DiscountRecord {
    /// An active, unlimited code valid from `starts_at`.
    pub fn new(code: impl Into<String>, value: DiscountValue, starts_at: Timestamp) -> Self {
        Self {
            code: code.into(),
            value,
            min_order_value: None,
            max_discount: None,
            usage_limit: None,
            used_count: 0,
            is_active: true,
            starts_at,
            ends_at: None,
        }
    }

    /// Whether `code` names this record. Case-insensitive, surrounding
    /// whitespace ignored.
    pub fn matches(&self, code: &str) -> bool {
        self.code.trim().eq_ignore_ascii_case(code.trim())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Whole(u32),
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDiscountRecord {
    code: String,
    kind: DiscountKind,
    value: RawValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_order_value: Option<Paisa>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_discount: Option<Paisa>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    usage_limit: Option<u32>,
    #[serde(default)]
    used_count: u32,
    #[serde(default = "default_active")]
    is_active: bool,
    starts_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ends_at: Option<Timestamp>,
}

fn default_active() -> bool {
    true
}

impl TryFrom<RawDiscountRecord> for DiscountRecord {
    type Error = ValidationError;

    fn try_from(raw: RawDiscountRecord) -> Result<Self, Self::Error> {
        let value = match (raw.kind, raw.value) {
            (DiscountKind::Percentage, RawValue::Text(s)) => DiscountValue::Percentage(Percent::parse(&s)?),
            (DiscountKind::Percentage, RawValue::Whole(n)) => DiscountValue::Percentage(Percent::whole(n)),
            (DiscountKind::Flat, RawValue::Text(s)) => DiscountValue::Flat(non_negative(Paisa::parse(&s)?, "value")?),
            (DiscountKind::Flat, RawValue::Whole(n)) => DiscountValue::Flat(Paisa::from_rupees(i64::from(n))),
        };
        Ok(Self {
            code: raw.code,
            value,
            min_order_value: raw.min_order_value.map(|v| non_negative(v, "min_order_value")).transpose()?,
            max_discount: raw.max_discount.map(|v| non_negative(v, "max_discount")).transpose()?,
            usage_limit: raw.usage_limit,
            used_count: raw.used_count,
            is_active: raw.is_active,
            starts_at: raw.starts_at,
            ends_at: raw.ends_at,
        })
    }
}

fn non_negative(amount: Paisa, field: &str) -> Result<Paisa, ValidationError> {
    if amount.is_negative() {
        return Err(ValidationError::InvalidAmount {
            input: amount.to_string(),
            reason: format!("{field} cannot be negative"),
        });
    }
    Ok(amount)
}

impl From<DiscountRecord> for RawDiscountRecord {
    fn from(record: DiscountRecord) -> Self {
        let value = match record.value {
            DiscountValue::Percentage(pct) => RawValue::Text(pct.to_string()),
            DiscountValue::Flat(amount) => RawValue::Text(amount.to_string()),
        };
        Self {
            code: record.code,
            kind: record.value.kind(),
            value,
            min_order_value: record.min_order_value,
            max_discount: record.max_discount,
            usage_limit: record.usage_limit,
            used_count: record.used_count,
            is_active: record.is_active,
            starts_at: record.starts_at,
            ends_at: record.ends_at,
        }
    }
}

// ─── Validation ──────────────────────────────────────────────────────

/// Why a discount code was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DiscountRejection {
    /// No record matches the entered code.
    #[error("discount code {code} does not exist")]
    NotFound {
        /// The code as entered.
        code: String,
    },

    /// The seller has switched the code off.
    #[error("discount code {code} is no longer active")]
    Inactive {
        /// The code.
        code: String,
    },

    /// The validity window has not opened.
    #[error("discount code {code} is not valid until {starts_at}")]
    NotStarted {
        /// The code.
        code: String,
        /// When it opens.
        starts_at: Timestamp,
    },

    /// The validity window has closed.
    #[error("discount code {code} expired at {ends_at}")]
    Expired {
        /// The code.
        code: String,
        /// When it closed.
        ends_at: Timestamp,
    },

    /// Every permitted redemption has been used.
    #[error("discount code {code} has reached its usage limit of {usage_limit}")]
    UsageLimitReached {
        /// The code.
        code: String,
        /// Maximum redemptions.
        usage_limit: u32,
    },

    /// The order total is under the code's minimum.
    #[error("discount code {code} requires a minimum order of {min_order_value}; order total is {order_total}")]
    BelowMinimumOrder {
        /// The code.
        code: String,
        /// Required minimum.
        min_order_value: Paisa,
        /// The order total offered.
        order_total: Paisa,
    },
}

/// Outcome of validating a discount code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountValidation {
    /// Whether the code applies.
    pub valid: bool,
    /// Discount granted; zero when invalid.
    pub amount: Paisa,
    /// Shopper-facing explanation.
    pub message: String,
    /// Structured reason when invalid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection: Option<DiscountRejection>,
}

impl DiscountValidation {
    fn accepted(amount: Paisa) -> Self {
        Self {
            valid: true,
            amount,
            message: format!("discount of {amount} applied"),
            rejection: None,
        }
    }

    fn rejected(rejection: DiscountRejection) -> Self {
        tracing::debug!(reason = %rejection, "discount code rejected");
        Self {
            valid: false,
            amount: Paisa::ZERO,
            message: rejection.to_string(),
            rejection: Some(rejection),
        }
    }
}

/// Validate `code` against `record` for an order worth `order_total`.
///
/// `record` is the stored discount looked up by the caller, or `None` if
/// the lookup found nothing. On success the amount is the flat value or
/// the rounded percentage of `order_total`, capped at `max_discount` and
/// then at `order_total`.
pub fn validate_discount(
    code: &str,
    order_total: Paisa,
    record: Option<&DiscountRecord>,
    now: Timestamp,
) -> DiscountValidation {
    match check(code, order_total, record, now) {
        Ok(amount) => DiscountValidation::accepted(amount),
        Err(rejection) => DiscountValidation::rejected(rejection),
    }
}

fn check(
    code: &str,
    order_total: Paisa,
    record: Option<&DiscountRecord>,
    now: Timestamp,
) -> Result<Paisa, DiscountRejection> {
    let record = record
        .filter(|r| r.matches(code))
        .ok_or_else(|| DiscountRejection::NotFound {
            code: code.trim().to_string(),
        })?;
    let code = record.code.clone();

    if !record.is_active {
        return Err(DiscountRejection::Inactive { code });
    }
    if record.starts_at > now {
        return Err(DiscountRejection::NotStarted {
            code,
            starts_at: record.starts_at,
        });
    }
    if let Some(ends_at) = record.ends_at {
        if ends_at <= now {
            return Err(DiscountRejection::Expired { code, ends_at });
        }
    }
    if let Some(usage_limit) = record.usage_limit {
        if record.used_count >= usage_limit {
            return Err(DiscountRejection::UsageLimitReached { code, usage_limit });
        }
    }
    if let Some(min_order_value) = record.min_order_value {
        if order_total < min_order_value {
            return Err(DiscountRejection::BelowMinimumOrder {
                code,
                min_order_value,
                order_total,
            });
        }
    }

    let mut amount = record.value.amount_for(order_total);
    if let Some(cap) = record.max_discount {
        amount = amount.min(cap);
    }
    Ok(amount.min(order_total).max(Paisa::ZERO))
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn now() -> Timestamp {
        ts("2025-10-20T12:00:00Z")
    }

    fn rupees(r: i64) -> Paisa {
        Paisa::from_rupees(r)
    }

    fn percent_code(pct: u32) -> DiscountRecord {
        DiscountRecord::new(
            "DIWALI10",
            DiscountValue::Percentage(Percent::whole(pct)),
            ts("2025-10-01T00:00:00Z"),
        )
    }

    fn rejection(v: &DiscountValidation) -> &DiscountRejection {
        assert!(!v.valid);
        assert_eq!(v.amount, Paisa::ZERO);
        v.rejection.as_ref().unwrap()
    }

    #[test]
    fn percentage_discount_applies() {
        let v = validate_discount("DIWALI10", rupees(2000), Some(&percent_code(10)), now());
        assert!(v.valid);
        assert_eq!(v.amount, rupees(200));
        assert!(v.rejection.is_none());
        assert_eq!(v.message, "discount of 200.00 applied");
    }

    #[test]
    fn code_match_ignores_case_and_whitespace() {
        let v = validate_discount("  diwali10 ", rupees(100), Some(&percent_code(10)), now());
        assert!(v.valid);
    }

    #[test]
    fn percentage_rounds_half_up() {
        // 10% of 0.05 = 0.005 -> 0.01
        let v = validate_discount("DIWALI10", Paisa::new(5), Some(&percent_code(10)), now());
        assert_eq!(v.amount, Paisa::new(1));
    }

    #[test]
    fn missing_record_is_not_found() {
        let v = validate_discount("NOPE", rupees(100), None, now());
        assert_eq!(rejection(&v), &DiscountRejection::NotFound { code: "NOPE".into() });
        let v = validate_discount("NOPE", rupees(100), Some(&percent_code(10)), now());
        assert!(matches!(rejection(&v), DiscountRejection::NotFound { .. }));
    }

    #[test]
    fn inactive_code_is_rejected() {
        let mut record = percent_code(10);
        record.is_active = false;
        let v = validate_discount("DIWALI10", rupees(100), Some(&record), now());
        assert!(matches!(rejection(&v), DiscountRejection::Inactive { .. }));
        assert_eq!(v.message, "discount code DIWALI10 is no longer active");
    }

    #[test]
    fn validity_window_is_start_inclusive_end_exclusive() {
        let mut record = percent_code(10);
        record.starts_at = now();
        assert!(validate_discount("DIWALI10", rupees(100), Some(&record), now()).valid);

        record.starts_at = ts("2025-10-21T00:00:00Z");
        let v = validate_discount("DIWALI10", rupees(100), Some(&record), now());
        assert!(matches!(rejection(&v), DiscountRejection::NotStarted { .. }));

        record.starts_at = ts("2025-10-01T00:00:00Z");
        record.ends_at = Some(now());
        let v = validate_discount("DIWALI10", rupees(100), Some(&record), now());
        assert!(matches!(rejection(&v), DiscountRejection::Expired { .. }));

        record.ends_at = Some(ts("2025-10-20T12:00:01Z"));
        assert!(validate_discount("DIWALI10", rupees(100), Some(&record), now()).valid);
    }

    #[test]
    fn usage_limit_is_enforced() {
        let mut record = percent_code(10);
        record.usage_limit = Some(100);
        record.used_count = 99;
        assert!(validate_discount("DIWALI10", rupees(100), Some(&record), now()).valid);
        record.used_count = 100;
        let v = validate_discount("DIWALI10", rupees(100), Some(&record), now());
        assert_eq!(
            rejection(&v),
            &DiscountRejection::UsageLimitReached {
                code: "DIWALI10".into(),
                usage_limit: 100
            }
        );
    }

    #[test]
    fn minimum_order_value_is_inclusive() {
        let mut record = percent_code(10);
        record.min_order_value = Some(rupees(500));
        assert!(validate_discount("DIWALI10", rupees(500), Some(&record), now()).valid);
        let v = validate_discount("DIWALI10", Paisa::parse("499.99").unwrap(), Some(&record), now());
        assert!(matches!(rejection(&v), DiscountRejection::BelowMinimumOrder { .. }));
    }

    #[test]
    fn checks_run_in_order() {
        // Inactive and expired and over limit: inactive is reported.
        let mut record = percent_code(10);
        record.is_active = false;
        record.ends_at = Some(ts("2025-10-02T00:00:00Z"));
        record.usage_limit = Some(0);
        let v = validate_discount("DIWALI10", rupees(100), Some(&record), now());
        assert!(matches!(rejection(&v), DiscountRejection::Inactive { .. }));

        record.is_active = true;
        let v = validate_discount("DIWALI10", rupees(100), Some(&record), now());
        assert!(matches!(rejection(&v), DiscountRejection::Expired { .. }));
    }

    #[test]
    fn amount_is_capped_then_clamped_to_total() {
        let mut record = percent_code(50);
        record.max_discount = Some(rupees(300));
        let v = validate_discount("DIWALI10", rupees(2000), Some(&record), now());
        assert_eq!(v.amount, rupees(300));

        let flat = DiscountRecord::new(
            "FLAT500",
            DiscountValue::Flat(rupees(500)),
            ts("2025-10-01T00:00:00Z"),
        );
        let v = validate_discount("FLAT500", rupees(350), Some(&flat), now());
        assert!(v.valid);
        assert_eq!(v.amount, rupees(350));
    }

    #[test]
    fn every_rejection_has_a_distinct_message() {
        let code = "X".to_string();
        let messages = [
            DiscountRejection::NotFound { code: code.clone() },
            DiscountRejection::Inactive { code: code.clone() },
            DiscountRejection::NotStarted { code: code.clone(), starts_at: now() },
            DiscountRejection::Expired { code: code.clone(), ends_at: now() },
            DiscountRejection::UsageLimitReached { code: code.clone(), usage_limit: 1 },
            DiscountRejection::BelowMinimumOrder {
                code,
                min_order_value: rupees(1),
                order_total: Paisa::ZERO,
            },
        ]
        .map(|r| r.to_string());
        let unique: std::collections::BTreeSet<_> = messages.iter().collect();
        assert_eq!(unique.len(), messages.len());
    }

    #[test]
    fn record_deserializes_from_wire_form() {
        let record: DiscountRecord = serde_json::from_str(
            r#"{
                "code": "FLAT50",
                "kind": "flat",
                "value": "50.00",
                "min_order_value": "299.00",
                "usage_limit": 1000,
                "used_count": 12,
                "starts_at": "2025-10-01T00:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(record.value, DiscountValue::Flat(rupees(50)));
        assert_eq!(record.min_order_value, Some(rupees(299)));
        assert!(record.is_active);
        assert_eq!(record.ends_at, None);

        let pct: DiscountRecord = serde_json::from_str(
            r#"{"code": "TEN", "kind": "percentage", "value": 10, "starts_at": "2025-10-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(pct.value, DiscountValue::Percentage(Percent::whole(10)));
    }

    #[test]
    fn record_rejects_malformed_value() {
        let result: Result<DiscountRecord, _> = serde_json::from_str(
            r#"{"code": "BAD", "kind": "flat", "value": "12.345", "starts_at": "2025-10-01T00:00:00Z"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn record_rejects_negative_amounts() {
        for (field, json) in [
            ("value", r#"{"code": "NEG", "kind": "flat", "value": "-50.00", "starts_at": "2025-10-01T00:00:00Z"}"#),
            (
                "max_discount",
                r#"{"code": "NEG", "kind": "percentage", "value": 10, "max_discount": "-1.00", "starts_at": "2025-10-01T00:00:00Z"}"#,
            ),
            (
                "min_order_value",
                r#"{"code": "NEG", "kind": "flat", "value": "50.00", "min_order_value": "-299.00", "starts_at": "2025-10-01T00:00:00Z"}"#,
            ),
        ] {
            let err = serde_json::from_str::<DiscountRecord>(json).unwrap_err();
            assert!(err.to_string().contains(field), "{field}: {err}");
        }

        let zero: DiscountRecord = serde_json::from_str(
            r#"{"code": "ZERO", "kind": "flat", "value": "0.00", "max_discount": "0.00", "starts_at": "2025-10-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(zero.value, DiscountValue::Flat(Paisa::ZERO));
    }

    #[test]
    fn validation_serializes_reason_tag() {
        let v = validate_discount("NOPE", rupees(100), None, now());
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["amount"], "0.00");
        assert_eq!(json["rejection"]["reason"], "not_found");
    }
}
