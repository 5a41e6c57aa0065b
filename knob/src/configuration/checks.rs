//! Construction-time checks.
//!
//! Each check fails fast on the first violation, and they run in the order
//! [`Configuration::new`] calls them.

use std::collections::HashMap;

use super::Configuration;
use crate::error::{DuplicateKind, Error, Result};
use crate::key::TRACE_KEY;

impl Configuration {
    /// Every initial value key is declared. `trace` is always accepted.
    pub(super) fn verify_value_keys(&self) -> Result<()> {
        for key in self.values.keys() {
            if key != TRACE_KEY {
                self.find_option(key)?;
            }
        }
        Ok(())
    }

    /// Every initial value passes its option's validation.
    pub(super) fn verify_values(&self) -> Result<()> {
        for (key, value) in &self.values {
            if let Some(option) = self.option_for_key(key) {
                option.validate(value)?;
            }
        }
        Ok(())
    }

    /// Keys and short options are unique across options.
    pub(super) fn verify_no_duplicates(&self) -> Result<()> {
        let keys = self.options.iter().map(|o| o.key().to_string());
        check_unique(DuplicateKind::Key, keys)?;

        let shorts = self
            .options
            .iter()
            .filter_map(|o| o.short_option())
            .map(String::from);
        check_unique(DuplicateKind::ShortOption, shorts)
    }

    /// Conflict declarations name declared options, and no two conflicting
    /// options both hold an initial value.
    pub(super) fn verify_conflicts(&self) -> Result<()> {
        for option in &self.options {
            if let Some(unknown) = option
                .conflicting_options()
                .iter()
                .find(|k| self.option_for_key(k).is_none())
            {
                return Err(Error::InvalidOption {
                    key: option.key().to_string(),
                    reason: format!("conflicts with undeclared option '{unknown}'"),
                });
            }
        }

        for option in &self.options {
            if !self.values.contains_key(option.key()) {
                continue;
            }
            if let Some(other) = self.stored_conflict(option) {
                return Err(Error::Conflict {
                    key: option.key().to_string(),
                    other,
                });
            }
        }
        Ok(())
    }

    /// Every default of an option with a verify predicate or a choice
    /// list, not overridden by an initial value, passes its own option's
    /// validation.
    pub(super) fn verify_default_values(&self) -> Result<()> {
        let checked = self
            .options
            .iter()
            .filter(|o| o.has_verify() || !o.choices().is_empty());
        for option in checked {
            let Some(default) = option.default_value() else {
                continue;
            };
            if self.values.contains_key(option.key()) {
                continue;
            }
            option.validate(default).map_err(|err| Error::InvalidDefault {
                key: option.key().to_string(),
                reason: err.to_string(),
            })?;
        }
        Ok(())
    }
}

/// Fail on the first name occurring more than once.
fn check_unique(kind: DuplicateKind, names: impl Iterator<Item = String>) -> Result<()> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order = Vec::new();
    for name in names {
        let count = counts.entry(name.clone()).or_insert(0);
        if *count == 0 {
            order.push(name);
        }
        *count += 1;
    }

    match order.into_iter().find(|name| counts[name] > 1) {
        Some(name) => Err(Error::DuplicateOption {
            kind,
            count: counts[&name],
            name,
        }),
        None => Ok(()),
    }
}
