//! # Money — Integer Paisa and Basis-Point Percentages
//!
//! All monetary values inside the workspace are [`Paisa`]: an `i64` count
//! of the currency subunit (1 rupee = 100 paisa). Decimal rupee strings
//! such as `"49.95"` are accepted and produced only at the boundary.
//!
//! Percentages are [`Percent`]: a `u32` count of basis points
//! (1% = 100 bps). GST slabs such as `0.25%` and `28%` are both exact.
//!
//! ## Rounding
//!
//! Every rounding step goes through [`round_half_up_div`], which rounds
//! half away from zero. `49.945` becomes `49.95`, `-0.005` becomes `-0.01`.
//! Banker's rounding is never used: it under-collects tax on invoices
//! whose halves land on even digits.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Divide `numerator` by `denominator`, rounding half away from zero.
///
/// A negative denominator flips both signs. A zero denominator yields `0`,
/// which is the guard used for zero-subtotal orders.
pub fn round_half_up_div(numerator: i128, denominator: i128) -> i128 {
    if denominator == 0 {
        return 0;
    }
    let (n, d) = if denominator < 0 {
        (-numerator, -denominator)
    } else {
        (numerator, denominator)
    };
    let magnitude = n.unsigned_abs();
    let divisor = d.unsigned_abs();
    let (q, r) = (magnitude / divisor, magnitude % divisor);
    // r < divisor, so comparing r against divisor - r cannot overflow.
    let rounded = if r >= divisor - r { q + 1 } else { q };
    let rounded = i128::try_from(rounded).unwrap_or(i128::MAX);
    if n < 0 {
        -rounded
    } else {
        rounded
    }
}

// ─── Paisa ───────────────────────────────────────────────────────────

/// A monetary amount in paisa (currency minor units).
///
/// Serialized as a two-decimal rupee string (`"1000.00"`). Deserializes
/// from such a string or from a whole-rupee integer; floats are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Paisa(i64);

impl Paisa {
    /// Zero rupees.
    pub const ZERO: Paisa = Paisa(0);

    /// Wrap a raw paisa count.
    pub const fn new(paisa: i64) -> Self {
        Self(paisa)
    }

    /// Whole rupees to paisa, saturating at the `i64` bounds.
    pub const fn from_rupees(rupees: i64) -> Self {
        Self(rupees.saturating_mul(100))
    }

    /// The raw paisa count.
    pub const fn as_paisa(self) -> i64 {
        self.0
    }

    /// Whether the amount is exactly zero.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Whether the amount is below zero.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Convert a wide intermediate back to paisa, or `None` if it does not fit.
    pub fn from_i128(value: i128) -> Option<Self> {
        i64::try_from(value).ok().map(Self)
    }

    /// Convert a wide intermediate back to paisa, clamping at the `i64` bounds.
    pub fn from_i128_saturating(value: i128) -> Self {
        Self(value.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Checked addition.
    pub fn checked_add(self, other: Paisa) -> Option<Paisa> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction.
    pub fn checked_sub(self, other: Paisa) -> Option<Paisa> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Checked multiplication by a quantity.
    pub fn checked_mul(self, quantity: u32) -> Option<Paisa> {
        self.0.checked_mul(i64::from(quantity)).map(Self)
    }

    /// Saturating addition.
    pub fn saturating_add(self, other: Paisa) -> Paisa {
        Self(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction.
    pub fn saturating_sub(self, other: Paisa) -> Paisa {
        Self(self.0.saturating_sub(other.0))
    }

    /// Parse a decimal rupee string (`"999"`, `"49.9"`, `"-0.50"`).
    ///
    /// At most two fractional digits are accepted; a third digit would
    /// require rounding the caller never asked for.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ValidationError::amount(input, "empty amount"));
        }

        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (whole, frac) = match unsigned.split_once('.') {
            Some((_, "")) => {
                return Err(ValidationError::amount(input, "missing digits after decimal point"))
            }
            Some((w, f)) => (w, f),
            None => (unsigned, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::amount(input, "expected decimal digits"));
        }
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::amount(input, "expected decimal digits"));
        }
        let frac_paisa: i64 = match frac.len() {
            0 => 0,
            1 => i64::from(frac.as_bytes()[0] - b'0') * 10,
            2 => i64::from(frac.as_bytes()[0] - b'0') * 10 + i64::from(frac.as_bytes()[1] - b'0'),
            _ => return Err(ValidationError::amount(input, "more than two decimal places")),
        };

        let rupees: i64 = whole
            .parse()
            .map_err(|_| ValidationError::amount(input, "amount out of range"))?;
        let paisa = rupees
            .checked_mul(100)
            .and_then(|v| v.checked_add(frac_paisa))
            .ok_or_else(|| ValidationError::amount(input, "amount out of range"))?;

        Ok(Self(if negative { -paisa } else { paisa }))
    }
}

impl std::fmt::Display for Paisa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl std::str::FromStr for Paisa {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Saturating, matching the accumulation policy of the tax aggregator.
impl std::ops::Add for Paisa {
    type Output = Paisa;

    fn add(self, rhs: Paisa) -> Paisa {
        self.saturating_add(rhs)
    }
}

impl std::ops::AddAssign for Paisa {
    fn add_assign(&mut self, rhs: Paisa) {
        *self = self.saturating_add(rhs);
    }
}

impl std::ops::Sub for Paisa {
    type Output = Paisa;

    fn sub(self, rhs: Paisa) -> Paisa {
        self.saturating_sub(rhs)
    }
}

impl std::iter::Sum for Paisa {
    fn sum<I: Iterator<Item = Paisa>>(iter: I) -> Paisa {
        iter.fold(Paisa::ZERO, Paisa::saturating_add)
    }
}

impl Serialize for Paisa {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Text(String),
    Whole(i64),
    Float(f64),
}

impl<'de> Deserialize<'de> for Paisa {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match AmountRepr::deserialize(deserializer)? {
            AmountRepr::Text(s) => Paisa::parse(&s).map_err(serde::de::Error::custom),
            AmountRepr::Whole(rupees) => rupees
                .checked_mul(100)
                .map(Paisa)
                .ok_or_else(|| serde::de::Error::custom("amount out of range")),
            AmountRepr::Float(f) => Err(serde::de::Error::custom(ValidationError::FloatRejected(f.to_string()))),
        }
    }
}

// ─── Percent ─────────────────────────────────────────────────────────

/// A non-negative percentage stored in basis points.
///
/// `Percent::whole(12)` is 1200 bps. Rendered without trailing zeros:
/// `"12"`, `"12.5"`, `"0.25"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percent(u32);

impl Percent {
    /// Zero percent.
    pub const ZERO: Percent = Percent(0);

    /// One hundred percent.
    pub const HUNDRED: Percent = Percent(10_000);

    /// From basis points.
    pub const fn from_bps(bps: u32) -> Self {
        Self(bps)
    }

    /// From a whole percentage.
    pub const fn whole(percent: u32) -> Self {
        Self(percent.saturating_mul(100))
    }

    /// The value in basis points.
    pub const fn bps(self) -> u32 {
        self.0
    }

    /// Whether this is a whole percentage (no fractional part).
    pub const fn is_whole(self) -> bool {
        self.0 % 100 == 0
    }

    /// `amount × self / 100`, rounded half away from zero.
    ///
    /// Saturates at the `i64` bounds; only reachable with rates far above
    /// 100% on amounts near `i64::MAX` paisa.
    pub fn of(self, amount: Paisa) -> Paisa {
        let scaled = i128::from(amount.as_paisa()) * i128::from(self.0);
        Paisa::from_i128_saturating(round_half_up_div(scaled, 10_000))
    }

    /// Like [`Percent::of`], but `None` when the result does not fit.
    pub fn checked_of(self, amount: Paisa) -> Option<Paisa> {
        let scaled = i128::from(amount.as_paisa()) * i128::from(self.0);
        Paisa::from_i128(round_half_up_div(scaled, 10_000))
    }

    /// Parse `"12"`, `"12.5"` or `"0.25"`. At most two fractional digits.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim().trim_end_matches('%').trim_end();
        if s.starts_with('-') {
            return Err(ValidationError::percent(input, "percentage cannot be negative"));
        }
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::percent(input, "expected decimal digits"));
        }
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::percent(input, "expected decimal digits"));
        }
        let frac_bps: u32 = match frac.len() {
            0 => 0,
            1 => u32::from(frac.as_bytes()[0] - b'0') * 10,
            2 => u32::from(frac.as_bytes()[0] - b'0') * 10 + u32::from(frac.as_bytes()[1] - b'0'),
            _ => return Err(ValidationError::percent(input, "more than two decimal places")),
        };
        let whole: u32 = whole
            .parse()
            .map_err(|_| ValidationError::percent(input, "percentage out of range"))?;
        whole
            .checked_mul(100)
            .and_then(|v| v.checked_add(frac_bps))
            .map(Self)
            .ok_or_else(|| ValidationError::percent(input, "percentage out of range"))
    }

    fn from_float(f: f64) -> Result<Self, ValidationError> {
        let input = f.to_string();
        if !f.is_finite() || f < 0.0 {
            return Err(ValidationError::percent(&input, "percentage must be a non-negative number"));
        }
        let bps = (f * 100.0).round();
        if (f * 100.0 - bps).abs() > 1e-6 || bps > f64::from(u32::MAX) {
            return Err(ValidationError::percent(&input, "more than two decimal places"));
        }
        Ok(Self(bps as u32))
    }
}

impl std::fmt::Display for Percent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{whole}")
        } else if frac % 10 == 0 {
            write!(f, "{whole}.{}", frac / 10)
        } else {
            write!(f, "{whole}.{frac:02}")
        }
    }
}

impl std::str::FromStr for Percent {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PercentRepr {
    Text(String),
    Whole(u32),
    Float(f64),
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match PercentRepr::deserialize(deserializer)? {
            PercentRepr::Text(s) => Percent::parse(&s).map_err(serde::de::Error::custom),
            PercentRepr::Whole(p) => p
                .checked_mul(100)
                .map(Percent)
                .ok_or_else(|| serde::de::Error::custom("percentage out of range")),
            PercentRepr::Float(f) => Percent::from_float(f).map_err(serde::de::Error::custom),
        }
    }
}
