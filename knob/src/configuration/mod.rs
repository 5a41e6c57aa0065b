//! The option resolution engine.
//!
//! A [`Configuration`] owns a declared set of [`OptionSpec`]s and the raw
//! values supplied for them. Values are resolved lazily on
//! [`fetch`](Configuration::fetch) with the following precedence
//! (highest to lowest):
//!
//! 1. A value stored with [`set`](Configuration::set) or passed at construction
//! 2. The option's environment variable
//! 3. The option's default value
//! 4. `false` for boolean options
//! 5. An interactive prompt, when the process is attended
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeMap;
//! use knob::{Configuration, Context, Logger, MapEnvironment, OptionSpec, Value, ValueKind};
//!
//! let options = vec![
//!     OptionSpec::builder("app_id").env_name("APP_ID").build().unwrap(),
//!     OptionSpec::builder("clean").kind(ValueKind::Boolean).optional(true).build().unwrap(),
//! ];
//! let ctx = Context::new(Logger::default(), true)
//!     .with_environment(MapEnvironment::new().with("APP_ID", "com.example.app"));
//!
//! let mut config = Configuration::new(options, BTreeMap::new(), ctx).unwrap();
//! assert_eq!(config.fetch("app_id", true).unwrap(), Some(Value::from("com.example.app")));
//! assert_eq!(config.fetch("clean", true).unwrap(), Some(Value::Bool(false)));
//! ```

mod checks;
mod resolve;

pub use resolve::{Resolution, Source};

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::key::{OptionKey, TRACE_KEY};
use crate::loader::ConfigFileLoader;
use crate::option::OptionSpec;
use crate::value::Value;

/// Declared options plus the values supplied for them.
#[derive(Debug)]
pub struct Configuration {
    options: Vec<OptionSpec>,
    values: BTreeMap<String, Value>,
    resolved: HashMap<String, Resolution>,
    config_file_name: Option<String>,
    config_file_options: Vec<String>,
    context: Context,
}

impl Configuration {
    /// Build a configuration from declared options and initial values.
    ///
    /// Construction checks, in order: every initial key is a symbolic
    /// identifier and (except `trace`) is declared; every initial value
    /// validates; keys and short options are unique; no two conflicting
    /// options both hold values; every default of an option with a verify
    /// predicate or choices and no explicit value validates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyType`], [`Error::UnknownKey`],
    /// [`Error::Validation`], [`Error::DuplicateOption`],
    /// [`Error::InvalidOption`], [`Error::Conflict`] or
    /// [`Error::InvalidDefault`] for the first violated check.
    pub fn new(
        options: Vec<OptionSpec>,
        values: BTreeMap<String, Value>,
        context: Context,
    ) -> Result<Self> {
        for key in values.keys() {
            OptionKey::check(key)?;
        }

        let config = Self {
            options,
            values,
            resolved: HashMap::new(),
            config_file_name: None,
            config_file_options: Vec::new(),
            context,
        };

        config.verify_value_keys()?;
        config.verify_values()?;
        config.verify_no_duplicates()?;
        config.verify_conflicts()?;
        config.verify_default_values()?;

        log::debug!(
            "configuration built with {} options and {} initial values",
            config.options.len(),
            config.values.len()
        );

        Ok(config)
    }

    /// Store a value for `key` after validating it.
    ///
    /// Either the value validates and is stored, or nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyType`] for a non-symbolic key,
    /// [`Error::UnknownKey`] for an undeclared key, [`Error::Validation`]
    /// when the option rejects the value and [`Error::Conflict`] when a
    /// conflicting option already holds a value.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        OptionKey::check(key)?;

        let option = self.find_option(key)?;
        option.validate(&value)?;

        if let Some(other) = self.stored_conflict(option) {
            return Err(Error::Conflict {
                key: key.to_string(),
                other,
            });
        }

        if let Some(message) = option.deprecated() {
            self.context
                .logger()
                .warn(&format!("option '{key}' is deprecated: {message}"));
        }

        log::debug!("storing value for '{key}'");
        self.values.insert(key.to_string(), value);
        self.resolved.remove(key);
        Ok(())
    }

    /// The declared option for `key`, if any.
    #[must_use]
    pub fn option_for_key(&self, key: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.key() == key)
    }

    /// Every declared key, in declaration order.
    #[must_use]
    pub fn all_keys(&self) -> Vec<String> {
        self.options.iter().map(|o| o.key().to_string()).collect()
    }

    /// The declared options.
    #[must_use]
    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    /// Stored values, without any environment, default or prompt fallback.
    #[must_use]
    pub const fn raw_values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    /// The context this configuration resolves with.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// Name of the configuration file loaded into this configuration.
    #[must_use]
    pub fn config_file_name(&self) -> Option<&str> {
        self.config_file_name.as_deref()
    }

    /// Keys whose values came from the configuration file.
    #[must_use]
    pub fn config_file_options(&self) -> &[String] {
        &self.config_file_options
    }

    /// Whether the reserved `trace` key holds a truthy value.
    #[must_use]
    pub fn is_tracing(&self) -> bool {
        self.values.get(TRACE_KEY).is_some_and(Value::is_truthy)
    }

    /// Look for a configuration file called `name` and apply its values.
    ///
    /// `None` is a no-op, and so is a name that matches no file. Values
    /// already stored (for example from the command line) are kept. Only
    /// one file is ever loaded; later requests are ignored with a warning.
    ///
    /// Returns the path of the loaded file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigFile`] when the file cannot be read or parsed,
    /// and any error of [`set`](Self::set) for its entries.
    pub fn load_configuration_file(&mut self, name: Option<&str>) -> Result<Option<PathBuf>> {
        let Some(name) = name else {
            return Ok(None);
        };

        if let Some(ref loaded) = self.config_file_name {
            self.context.logger().warn(&format!(
                "configuration file '{loaded}' already loaded, ignoring '{name}'"
            ));
            return Ok(None);
        }

        let Some(path) = ConfigFileLoader::find(self.context.working_dir(), name) else {
            log::debug!("no configuration file named '{name}' found");
            return Ok(None);
        };

        let keys = ConfigFileLoader::apply(self, &path)?;
        self.context.logger().info(&format!(
            "loaded {} value(s) from {}",
            keys.len(),
            path.display()
        ));

        self.config_file_name = Some(name.to_string());
        self.config_file_options = keys;
        Ok(Some(path))
    }

    /// The declared option for `key`, or [`Error::UnknownKey`].
    fn find_option(&self, key: &str) -> Result<&OptionSpec> {
        self.option_for_key(key).ok_or_else(|| Error::UnknownKey {
            key: key.to_string(),
            valid_keys: self.all_keys(),
        })
    }

    /// A stored option that may not hold a value together with `option`.
    fn stored_conflict(&self, option: &OptionSpec) -> Option<String> {
        let key = option.key();

        let declared = option
            .conflicting_options()
            .iter()
            .find(|other| self.values.contains_key(other.as_str()))
            .cloned();

        declared.or_else(|| {
            self.options
                .iter()
                .filter(|other| other.key() != key && self.values.contains_key(other.key()))
                .find(|other| other.conflicting_options().iter().any(|k| k == key))
                .map(|other| other.key().to_string())
        })
    }
}
