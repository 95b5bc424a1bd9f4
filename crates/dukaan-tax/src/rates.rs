//! # GST Rate Table and Resolver
//!
//! Maps HSN codes to GST rates. Each [`HsnRateEntry`] carries a base rate
//! and, for categories such as apparel and footwear, a price threshold
//! above which a different rate applies:
//!
//! ```text
//! 6211 (garments):  unit price ≤ ₹1000 → 5%,  unit price > ₹1000 → 12%
//! ```
//!
//! The comparison is strictly-greater-than: a ₹1000.00 kurta is taxed at
//! the base rate.
//!
//! ## Data-driven
//!
//! Tables are YAML documents (`default_rate` plus a list of `entries`) so
//! that rates can be audited and updated as tax law changes without
//! touching calculation code. The standard Indian table ships as
//! `data/hsn-rates.yaml` and is compiled into the crate.
//!
//! ## Unknown codes
//!
//! Resolution never fails. A code missing from the table resolves to the
//! table's default rate (18%) and is reported as [`RateSource::Default`] so
//! the seller dashboard can flag the assumption. Checkout must not block on
//! missing tax metadata.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dukaan_core::{HsnCode, Paisa, Percent};

/// Rate applied to HSN codes absent from the table.
pub const DEFAULT_GST_RATE: Percent = Percent::whole(18);

/// The statutory GST slabs. Other rates are accepted with a warning.
pub const STANDARD_SLABS: [Percent; 6] = [
    Percent::whole(0),
    Percent::whole(3),
    Percent::whole(5),
    Percent::whole(12),
    Percent::whole(18),
    Percent::whole(28),
];

const INDIA_STANDARD_RATES: &str = include_str!("../data/hsn-rates.yaml");

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised while loading or validating a rate table.
#[derive(Error, Debug)]
pub enum RateTableError {
    /// An entry has a threshold without an above-threshold rate, or the
    /// reverse.
    #[error("HSN {hsn_code}: {present} is set but {missing} is missing")]
    IncompleteThreshold {
        /// The offending entry.
        hsn_code: String,
        /// The field that is set.
        present: &'static str,
        /// The field that is missing.
        missing: &'static str,
    },

    /// An entry has a negative threshold amount.
    #[error("HSN {hsn_code}: threshold {threshold} is negative")]
    NegativeThreshold {
        /// The offending entry.
        hsn_code: String,
        /// The threshold.
        threshold: Paisa,
    },

    /// Two entries share an HSN code.
    #[error("duplicate HSN code {0} in rate table")]
    DuplicateHsnCode(String),

    /// The YAML document could not be parsed.
    #[error("rate table parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The table file could not be read.
    #[error("cannot read rate table {path}: {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },
}

// ─── Entries ─────────────────────────────────────────────────────────

/// A price threshold on an HSN entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateThreshold {
    /// Unit prices strictly above this amount use `rate_above`.
    pub amount: Paisa,
    /// Rate for unit prices above `amount`.
    pub rate_above: Percent,
}

/// One tax-classification rule.
///
/// The threshold and its rate are a single optional value, so an entry
/// with one but not the other cannot be constructed. The YAML form keeps
/// the flat `threshold` / `rate_above_threshold` fields and is validated
/// on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEntry", into = "RawEntry")]
pub struct HsnRateEntry {
    /// The HSN code this rule applies to.
    pub hsn_code: HsnCode,
    /// Base rate.
    pub rate: Percent,
    /// Optional price-dependent rate switch.
    pub threshold: Option<RateThreshold>,
    /// Human-readable description.
    pub description: Option<String>,
}

impl HsnRateEntry {
    /// A flat-rate entry.
    pub fn flat(hsn_code: HsnCode, rate: Percent) -> Self {
        Self {
            hsn_code,
            rate,
            threshold: None,
            description: None,
        }
    }

    /// A threshold entry: `rate` up to and including `threshold`,
    /// `rate_above` beyond it.
    pub fn with_threshold(
        hsn_code: HsnCode,
        rate: Percent,
        threshold: Paisa,
        rate_above: Percent,
    ) -> Self {
        Self {
            hsn_code,
            rate,
            threshold: Some(RateThreshold {
                amount: threshold,
                rate_above,
            }),
            description: None,
        }
    }

    /// Builder: set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The rate for a given unit price, and whether the threshold fired.
    pub fn rate_for(&self, unit_price: Paisa) -> (Percent, bool) {
        match self.threshold {
            Some(t) if unit_price > t.amount => (t.rate_above, true),
            _ => (self.rate, false),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    hsn_code: HsnCode,
    rate: Percent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    threshold: Option<Paisa>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rate_above_threshold: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl TryFrom<RawEntry> for HsnRateEntry {
    type Error = RateTableError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        let threshold = match (raw.threshold, raw.rate_above_threshold) {
            (None, None) => None,
            (Some(amount), Some(rate_above)) => {
                if amount.is_negative() {
                    return Err(RateTableError::NegativeThreshold {
                        hsn_code: raw.hsn_code.to_string(),
                        threshold: amount,
                    });
                }
                Some(RateThreshold { amount, rate_above })
            }
            (Some(_), None) => {
                return Err(RateTableError::IncompleteThreshold {
                    hsn_code: raw.hsn_code.to_string(),
                    present: "threshold",
                    missing: "rate_above_threshold",
                })
            }
            (None, Some(_)) => {
                return Err(RateTableError::IncompleteThreshold {
                    hsn_code: raw.hsn_code.to_string(),
                    present: "rate_above_threshold",
                    missing: "threshold",
                })
            }
        };
        Ok(Self {
            hsn_code: raw.hsn_code,
            rate: raw.rate,
            threshold,
            description: raw.description,
        })
    }
}

impl From<HsnRateEntry> for RawEntry {
    fn from(entry: HsnRateEntry) -> Self {
        Self {
            hsn_code: entry.hsn_code,
            rate: entry.rate,
            threshold: entry.threshold.map(|t| t.amount),
            rate_above_threshold: entry.threshold.map(|t| t.rate_above),
            description: entry.description,
        }
    }
}

// ─── Resolution ──────────────────────────────────────────────────────

/// Where a resolved rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// The seller set the rate on the product explicitly.
    SellerOverride,
    /// The HSN entry's base rate.
    HsnTable,
    /// The HSN entry's above-threshold rate.
    HsnThreshold,
    /// No HSN entry matched; the default rate was assumed.
    Default,
}

/// A rate together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRate {
    /// The rate to apply.
    pub rate: Percent,
    /// Where it came from.
    pub source: RateSource,
}

// ─── Table ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TableDocument {
    #[serde(default = "default_rate")]
    default_rate: Percent,
    #[serde(default)]
    entries: Vec<HsnRateEntry>,
}

fn default_rate() -> Percent {
    DEFAULT_GST_RATE
}

/// An ordered list of HSN rules indexed by code.
///
/// Immutable after construction; share it freely across request handlers.
#[derive(Debug, Clone)]
pub struct GstRateTable {
    entries: Vec<HsnRateEntry>,
    index: BTreeMap<String, usize>,
    default_rate: Percent,
}

impl GstRateTable {
    /// Build a table, rejecting duplicate codes.
    pub fn new(entries: Vec<HsnRateEntry>, default_rate: Percent) -> Result<Self, RateTableError> {
        let mut index = BTreeMap::new();
        for (position, entry) in entries.iter().enumerate() {
            let code = entry.hsn_code.as_str().to_string();
            if index.insert(code.clone(), position).is_some() {
                return Err(RateTableError::DuplicateHsnCode(code));
            }
            warn_if_off_slab(entry);
        }
        if !STANDARD_SLABS.contains(&default_rate) {
            tracing::warn!(default_rate = %default_rate, "default GST rate is not a statutory slab");
        }
        Ok(Self {
            entries,
            index,
            default_rate,
        })
    }

    /// A table with no entries: every code resolves to `default_rate`.
    pub fn empty(default_rate: Percent) -> Self {
        Self {
            entries: Vec::new(),
            index: BTreeMap::new(),
            default_rate,
        }
    }

    /// Parse a YAML table document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RateTableError> {
        let doc: TableDocument = serde_yaml::from_str(yaml)?;
        Self::new(doc.entries, doc.default_rate)
    }

    /// Read and parse a YAML table file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RateTableError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| RateTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_yaml_str(&yaml)?;
        tracing::debug!(path = %path.display(), entries = table.len(), "loaded GST rate table");
        Ok(table)
    }

    /// The bundled standard Indian rate table.
    pub fn india_standard() -> Result<Self, RateTableError> {
        Self::from_yaml_str(INDIA_STANDARD_RATES)
    }

    /// Replace the default rate.
    pub fn with_default_rate(mut self, default_rate: Percent) -> Self {
        self.default_rate = default_rate;
        self
    }

    /// Entries in table order.
    pub fn entries(&self) -> &[HsnRateEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rate for codes absent from the table.
    pub fn default_rate(&self) -> Percent {
        self.default_rate
    }

    /// The entry for an exact HSN code, if any.
    pub fn get(&self, hsn_code: &str) -> Option<&HsnRateEntry> {
        self.index
            .get(hsn_code.trim())
            .and_then(|&position| self.entries.get(position))
    }

    /// Resolve the rate for an HSN code at a unit price, with provenance.
    pub fn resolve(&self, hsn_code: &str, unit_price: Paisa) -> ResolvedRate {
        match self.get(hsn_code) {
            Some(entry) => {
                let (rate, above) = entry.rate_for(unit_price);
                ResolvedRate {
                    rate,
                    source: if above {
                        RateSource::HsnThreshold
                    } else {
                        RateSource::HsnTable
                    },
                }
            }
            None => {
                tracing::debug!(
                    hsn_code = %hsn_code,
                    default_rate = %self.default_rate,
                    "HSN code not in rate table; assuming default rate"
                );
                ResolvedRate {
                    rate: self.default_rate,
                    source: RateSource::Default,
                }
            }
        }
    }

    /// Resolve the rate for an HSN code at a unit price.
    pub fn resolve_rate(&self, hsn_code: &str, unit_price: Paisa) -> Percent {
        self.resolve(hsn_code, unit_price).rate
    }
}

fn warn_if_off_slab(entry: &HsnRateEntry) {
    let mut rates = vec![entry.rate];
    rates.extend(entry.threshold.map(|t| t.rate_above));
    for rate in rates {
        if !STANDARD_SLABS.contains(&rate) {
            tracing::warn!(
                hsn_code = %entry.hsn_code,
                rate = %rate,
                "GST rate is not a statutory slab; accepting as configured"
            );
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
