//! # Tax Engine Configuration
//!
//! A small YAML document selecting the rate table and the fallback rates:
//!
//! ```yaml
//! rate_table: rates/hsn-2025.yaml   # optional; bundled table if absent
//! default_rate: 18                  # optional; overrides the table's default
//! shipping_rate: 18                 # optional; 18 if absent
//! ```
//!
//! A relative `rate_table` path is resolved against the directory of the
//! config file, not the process working directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dukaan_core::Percent;

use crate::rates::RateTableError;
use crate::split::SHIPPING_GST_RATE;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read tax config {path}: {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// The config document could not be parsed.
    #[error("tax config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The referenced rate table failed to load.
    #[error(transparent)]
    RateTable(#[from] RateTableError),
}

/// Settings for building a [`TaxEngine`](crate::TaxEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxConfig {
    /// Path to a YAML rate table. The bundled table is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_table: Option<PathBuf>,
    /// Overrides the rate table's default rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_rate: Option<Percent>,
    /// Rate applied to shipping charges.
    #[serde(default = "default_shipping_rate")]
    pub shipping_rate: Percent,
}

fn default_shipping_rate() -> Percent {
    SHIPPING_GST_RATE
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            rate_table: None,
            default_rate: None,
            shipping_rate: SHIPPING_GST_RATE,
        }
    }
}

impl TaxConfig {
    /// Parse a config document. Relative paths are left as written.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read a config file and resolve its relative paths against the
    /// file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml_str(&yaml)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.rate_table = config.rate_table.map(|table| resolve_path(base, table));
        tracing::debug!(path = %path.display(), "loaded tax config");
        Ok(config)
    }
}

fn resolve_path(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
