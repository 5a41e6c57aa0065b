//! Output formatting for resolved option values.
//!
//! This module renders a summary of a [`Configuration`] as a human-readable
//! table, JSON, YAML or dotenv lines. Values of sensitive options are masked
//! unless the formatter is created with `reveal`.

mod formatters;

use serde::Serialize;

use crate::configuration::{Configuration, Source};
use crate::option::MASK;
use crate::value::Value;
use crate::Result;

pub use formatters::{DotenvFormatter, HumanFormatter, JsonFormatter, YamlFormatter};

/// One row of a configuration summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
    /// Option key.
    pub key: String,
    /// Resolved value, if any.
    pub value: Option<Value>,
    /// Where the value came from.
    pub source: Source,
    /// Environment variable alias of the option.
    #[serde(skip)]
    pub env_name: Option<String>,
    /// Whether the value must be masked.
    #[serde(skip)]
    pub sensitive: bool,
}

impl SummaryEntry {
    /// The value as it may be shown, masked unless `reveal` is set.
    #[must_use]
    pub fn shown_value(&self, reveal: bool) -> Option<Value> {
        match &self.value {
            Some(_) if self.sensitive && !reveal => Some(Value::from(MASK)),
            other => other.clone(),
        }
    }
}

impl Configuration {
    /// Resolve every option and pair it with its display metadata.
    ///
    /// # Errors
    ///
    /// The errors of [`Configuration::values`].
    pub fn summary(&mut self, ask: bool) -> Result<Vec<SummaryEntry>> {
        let resolutions = self.values(ask)?;

        Ok(resolutions
            .into_iter()
            .map(|resolution| {
                let option = self.option_for_key(&resolution.key);
                SummaryEntry {
                    env_name: option.and_then(|o| o.env_name()).map(str::to_string),
                    sensitive: option.is_some_and(|o| o.is_sensitive()),
                    key: resolution.key,
                    value: resolution.value,
                    source: resolution.source,
                }
            })
            .collect())
    }
}

/// Renders a configuration summary.
pub trait OutputFormatter {
    /// Format the given summary rows into a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn format(&self, entries: &[SummaryEntry]) -> Result<String>;
}

/// Available output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Aligned table.
    #[default]
    Human,
    /// JSON array of `{key, value, source}` objects.
    Json,
    /// YAML mapping of keys to values.
    Yaml,
    /// `NAME=value` lines keyed by environment variable.
    Dotenv,
}

impl OutputFormat {
    /// Create a formatter for this output format.
    ///
    /// With `reveal` set, sensitive values are printed in clear.
    #[must_use]
    pub fn create_formatter(&self, reveal: bool) -> Box<dyn OutputFormatter> {
        match self {
            Self::Human => Box::new(HumanFormatter::new(reveal)),
            Self::Json => Box::new(JsonFormatter::new(reveal)),
            Self::Yaml => Box::new(YamlFormatter::new(reveal)),
            Self::Dotenv => Box::new(DotenvFormatter::new(reveal)),
        }
    }
}
