//! Value resolution: fetch, bulk resolution and interactive prompting.

use std::fmt;
use std::io;

use serde::Serialize;

use super::Configuration;
use crate::error::{Error, Result};
use crate::key::OptionKey;
use crate::option::OptionSpec;
use crate::value::{Value, ValueKind};

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Stored through construction, `set` or a configuration file.
    Stored,
    /// Read from the option's environment variable.
    Environment,
    /// The option's default value.
    Default,
    /// `false` for a boolean option with no other source.
    Fallback,
    /// Answered by the operator.
    Prompt,
    /// No source yielded a value.
    Unset,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stored => "stored",
            Self::Environment => "environment",
            Self::Default => "default",
            Self::Fallback => "fallback",
            Self::Prompt => "prompt",
            Self::Unset => "unset",
        };
        f.write_str(name)
    }
}

/// The outcome of resolving one option.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The option key.
    pub key: String,
    /// The resolved value, if any.
    pub value: Option<Value>,
    /// Where the value came from.
    pub source: Source,
}

impl Configuration {
    /// Resolve the value of `key`.
    ///
    /// With `ask` false a required option without any value resolves to
    /// `None` instead of prompting.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidKeyType`] / [`Error::UnknownKey`] for a bad key
    /// - [`Error::Validation`] when the environment value is rejected
    /// - [`Error::MissingValue`] (or the verify rejection of an empty
    ///   answer) when a required value is absent and prompting is not
    ///   possible
    /// - [`Error::Prompt`] when the operator could not be asked
    pub fn fetch(&mut self, key: &str, ask: bool) -> Result<Option<Value>> {
        Ok(self.resolve(key, ask)?.value)
    }

    /// Like [`fetch`](Self::fetch), also reporting where the value came from.
    ///
    /// # Errors
    ///
    /// Same as [`fetch`](Self::fetch).
    pub fn resolve(&mut self, key: &str, ask: bool) -> Result<Resolution> {
        OptionKey::check(key)?;
        let option = self.find_option(key)?;
        let (value, source) = self.lookup(option)?;

        if value.is_some() || option.is_optional() || !ask {
            let resolution = Resolution {
                key: key.to_string(),
                value,
                source,
            };
            self.trace(&resolution);
            return Ok(resolution);
        }

        if self.context.is_non_interactive() {
            return Err(missing_value(option));
        }

        let key = key.to_string();
        let resolution = self.prompt_for(&key)?;
        self.trace(&resolution);
        Ok(resolution)
    }

    /// Resolve every declared option, in declaration order.
    ///
    /// Results for options without a stored value are cached until the
    /// option is [`set`](Self::set); options that resolve to nothing and
    /// are required are looked up again on the next call.
    ///
    /// # Errors
    ///
    /// The first error of [`resolve`](Self::resolve).
    pub fn values(&mut self, ask: bool) -> Result<Vec<Resolution>> {
        let mut resolutions = Vec::with_capacity(self.options.len());

        for key in self.all_keys() {
            if !self.values.contains_key(&key) {
                if let Some(cached) = self.resolved.get(&key) {
                    resolutions.push(cached.clone());
                    continue;
                }
            }

            let resolution = self.resolve(&key, ask)?;
            let optional = self
                .option_for_key(&key)
                .is_some_and(OptionSpec::is_optional);
            if resolution.source != Source::Stored && (resolution.value.is_some() || optional) {
                self.resolved.insert(key, resolution.clone());
            }
            resolutions.push(resolution);
        }

        Ok(resolutions)
    }

    /// Stored, environment, default or fallback value, without prompting.
    fn lookup(&self, option: &OptionSpec) -> Result<(Option<Value>, Source)> {
        if let Some(value) = option.coerce(self.values.get(option.key()).cloned()) {
            return Ok((Some(value), Source::Stored));
        }

        if let Some(env_name) = option.env_name() {
            if let Some(raw) = self.context.environment().var(env_name) {
                let value = Value::String(raw);
                option.validate(&value)?;
                return Ok((option.coerce(Some(value)), Source::Environment));
            }
        }

        if let Some(default) = option.default_value() {
            return Ok((option.coerce(Some(default.clone())), Source::Default));
        }

        if option.kind() == ValueKind::Boolean {
            return Ok((Some(Value::Bool(false)), Source::Fallback));
        }

        Ok((None, Source::Unset))
    }

    /// Ask the operator until a valid answer is stored.
    fn prompt_for(&mut self, key: &str) -> Result<Resolution> {
        let option = self.find_option(key)?.clone();
        self.context.logger().warn(&format!(
            "To not be asked about this value, you can specify it using '{key}'"
        ));

        loop {
            let answer = self.ask(&option).map_err(|source| Error::Prompt {
                key: key.to_string(),
                source,
            })?;

            match self.set(key, answer) {
                Ok(()) => break,
                Err(err) => self.context.logger().error(&err.to_string()),
            }
        }

        Ok(Resolution {
            key: key.to_string(),
            value: option.coerce(self.values.get(key).cloned()),
            source: Source::Prompt,
        })
    }

    fn ask(&self, option: &OptionSpec) -> io::Result<Value> {
        let prompter = self.context.prompter();
        let text = if option.description().is_empty() {
            option.key()
        } else {
            option.description()
        };

        if !option.choices().is_empty() {
            let index = prompter.choose(text, option.choices())?;
            return option
                .choices()
                .get(index)
                .cloned()
                .map(Value::String)
                .ok_or_else(|| {
                    io::Error::new(io::ErrorKind::InvalidInput, "selection out of range")
                });
        }

        let answer = if option.is_sensitive() {
            prompter.prompt_secret(text)?
        } else {
            prompter.prompt(text)?
        };
        Ok(Value::String(answer))
    }

    fn trace(&self, resolution: &Resolution) {
        log::trace!("resolved '{}' from {}", resolution.key, resolution.source);

        if self.is_tracing() {
            self.context
                .logger()
                .resolution(resolution, self.option_for_key(&resolution.key));
        }
    }
}

/// The error for a required value that cannot be prompted for.
///
/// An empty answer is what an unattended run would give, so a verify
/// predicate that rejects it reports its own reason.
fn missing_value(option: &OptionSpec) -> Error {
    let probe = option.kind().coerce(Value::String(String::new()));
    match option.run_verify(&probe) {
        Err(err) => err,
        Ok(()) => Error::MissingValue {
            key: option.key().to_string(),
        },
    }
}
