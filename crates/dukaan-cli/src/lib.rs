//! # dukaan-cli — Operator Command-Line Interface
//!
//! Thin wrapper over the library crates for operators and CI:
//!
//! - `order`: print legal next statuses, audit the transition table
//! - `rates`: validate a YAML rate table, resolve an HSN code
//! - `quote`: price a JSON checkout request
//!
//! Handlers parse arguments, call into `dukaan-*` crates and print. No
//! business logic lives here. Each handler returns the process exit code.

pub mod order;
pub mod quote;
pub mod rates;

/// Output encoding for structured results.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// YAML.
    Yaml,
}

impl OutputFormat {
    /// Render `value` in this format.
    pub fn render<T: serde::Serialize>(self, value: &T) -> anyhow::Result<String> {
        Ok(match self {
            Self::Json => serde_json::to_string_pretty(value)?,
            Self::Yaml => serde_yaml::to_string(value)?,
        })
    }
}
