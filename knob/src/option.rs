//! Option descriptors.
//!
//! An [`OptionSpec`] describes one configurable option: its key, how it is
//! presented to the operator, where a value may come from (environment
//! variable, default) and how values are coerced and validated. Specs are
//! built once through [`OptionSpecBuilder`] and are immutable afterwards.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::key::OptionKey;
use crate::value::{Value, ValueKind};

/// Replacement text for values of sensitive options.
pub const MASK: &str = "********";

/// A verify predicate: `Err(reason)` rejects the value.
pub type Verifier = Arc<dyn Fn(&Value) -> std::result::Result<(), String> + Send + Sync>;

/// Immutable descriptor of one configurable option.
///
/// # Examples
///
/// ```
/// use knob::{OptionSpec, Value, ValueKind};
///
/// let spec = OptionSpec::builder("clean")
///     .description("Clean before building")
///     .kind(ValueKind::Boolean)
///     .optional(true)
///     .build()
///     .unwrap();
///
/// assert!(spec.is_optional());
/// assert!(!spec.is_string_kind());
/// assert_eq!(spec.coerce(Some("yes".into())), Some(Value::Bool(true)));
/// ```
#[derive(Clone)]
pub struct OptionSpec {
    key: OptionKey,
    short_option: Option<char>,
    description: String,
    env_name: Option<String>,
    default_value: Option<Value>,
    optional: bool,
    kind: ValueKind,
    verify: Option<Verifier>,
    sensitive: bool,
    deprecated: Option<String>,
    conflicting_options: Vec<String>,
    choices: Vec<String>,
}

impl OptionSpec {
    /// Start declaring an option with the given key.
    #[must_use]
    pub fn builder(key: impl Into<String>) -> OptionSpecBuilder {
        OptionSpecBuilder::new(key)
    }

    /// The option key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// The single-character alias, if any.
    #[must_use]
    pub const fn short_option(&self) -> Option<char> {
        self.short_option
    }

    /// Human readable description, used as prompt text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Environment variable consulted when no value is stored.
    #[must_use]
    pub fn env_name(&self) -> Option<&str> {
        self.env_name.as_deref()
    }

    /// Value used when no other source yields one.
    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Declared value kind.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Whether resolution may legitimately yield no value.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether absent values stay absent instead of normalizing to `false`.
    #[must_use]
    pub fn is_string_kind(&self) -> bool {
        self.kind == ValueKind::String
    }

    /// Whether values must be masked when displayed.
    #[must_use]
    pub const fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    /// Deprecation message, if the option is deprecated.
    #[must_use]
    pub fn deprecated(&self) -> Option<&str> {
        self.deprecated.as_deref()
    }

    /// Keys that must not hold a value together with this option.
    #[must_use]
    pub fn conflicting_options(&self) -> &[String] {
        &self.conflicting_options
    }

    /// Closed set of accepted values; empty when any value is accepted.
    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Whether a verify predicate is declared.
    #[must_use]
    pub fn has_verify(&self) -> bool {
        self.verify.is_some()
    }

    /// Convert a raw value into the declared kind; absent input stays absent.
    #[must_use]
    pub fn coerce(&self, raw: Option<Value>) -> Option<Value> {
        raw.map(|value| self.kind.coerce(value))
    }

    /// Check a candidate value against this option.
    ///
    /// The value is coerced first, then checked for the declared kind, the
    /// closed choice set and finally the verify predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] carrying the key and the (masked when
    /// sensitive) value.
    ///
    /// # Examples
    ///
    /// ```
    /// use knob::{OptionSpec, ValueKind};
    ///
    /// let jobs = OptionSpec::builder("jobs")
    ///     .kind(ValueKind::Integer)
    ///     .verify(|v| match v.as_f64() {
    ///         Some(n) if n >= 1.0 => Ok(()),
    ///         _ => Err("must be at least 1".into()),
    ///     })
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(jobs.validate(&"4".into()).is_ok());
    /// assert!(jobs.validate(&"0".into()).is_err());
    /// assert!(jobs.validate(&"four".into()).is_err());
    /// ```
    pub fn validate(&self, value: &Value) -> Result<()> {
        let coerced = self.kind.coerce(value.clone());

        if !self.kind.accepts(&coerced) {
            return Err(self.rejection(
                value,
                format!(
                    "'{}' value must be a {}, found {} instead",
                    self.key,
                    self.kind,
                    coerced.kind()
                ),
            ));
        }

        let in_choices = self
            .choices
            .iter()
            .any(|c| coerced.as_str() == Some(c.as_str()));
        if !self.choices.is_empty() && !in_choices {
            return Err(self.rejection(
                value,
                format!("must be one of: {}", self.choices.join(", ")),
            ));
        }

        self.run_verify(&coerced)
    }

    /// Run only the verify predicate, if one is declared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the predicate rejects the value.
    pub fn run_verify(&self, value: &Value) -> Result<()> {
        match &self.verify {
            Some(verify) => verify(value).map_err(|reason| self.rejection(value, reason)),
            None => Ok(()),
        }
    }

    /// Text used to show a value of this option to an operator.
    #[must_use]
    pub fn display_value(&self, value: &Value) -> String {
        if self.sensitive {
            MASK.to_string()
        } else {
            value.to_string()
        }
    }

    fn rejection(&self, value: &Value, reason: String) -> Error {
        Error::Validation {
            key: self.key.to_string(),
            value: self.display_value(value),
            reason,
        }
    }
}

impl fmt::Debug for OptionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSpec")
            .field("key", &self.key)
            .field("short_option", &self.short_option)
            .field("env_name", &self.env_name)
            .field("default_value", &self.default_value)
            .field("optional", &self.optional)
            .field("kind", &self.kind)
            .field("verify", &self.verify.is_some())
            .field("sensitive", &self.sensitive)
            .finish_non_exhaustive()
    }
}

/// Builder for [`OptionSpec`].
///
/// Options are required, string kind and without aliases unless told
/// otherwise.
pub struct OptionSpecBuilder {
    key: String,
    short_option: Option<char>,
    description: String,
    env_name: Option<String>,
    default_value: Option<Value>,
    optional: bool,
    kind: ValueKind,
    verify: Option<Verifier>,
    sensitive: bool,
    deprecated: Option<String>,
    conflicting_options: Vec<String>,
    choices: Vec<String>,
}

impl OptionSpecBuilder {
    fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            short_option: None,
            description: String::new(),
            env_name: None,
            default_value: None,
            optional: false,
            kind: ValueKind::String,
            verify: None,
            sensitive: false,
            deprecated: None,
            conflicting_options: Vec::new(),
            choices: Vec::new(),
        }
    }

    /// Set the description shown when prompting.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the single-character alias.
    #[must_use]
    pub const fn short_option(mut self, short: char) -> Self {
        self.short_option = Some(short);
        self
    }

    /// Set the environment variable used as a fallback source.
    #[must_use]
    pub fn env_name(mut self, name: impl Into<String>) -> Self {
        self.env_name = Some(name.into());
        self
    }

    /// Set the default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set whether the option may resolve to no value.
    #[must_use]
    pub const fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Set the declared value kind.
    #[must_use]
    pub const fn kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the verify predicate.
    #[must_use]
    pub fn verify<F>(mut self, verify: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        self.verify = Some(Arc::new(verify));
        self
    }

    /// Set an already shared verify predicate.
    #[must_use]
    pub fn verifier(mut self, verify: Verifier) -> Self {
        self.verify = Some(verify);
        self
    }

    /// Mark values as sensitive (masked in output and errors).
    #[must_use]
    pub const fn sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    /// Mark the option as deprecated with a message shown when it is set.
    #[must_use]
    pub fn deprecated(mut self, message: impl Into<String>) -> Self {
        self.deprecated = Some(message.into());
        self
    }

    /// Declare keys that must not be set together with this option.
    #[must_use]
    pub fn conflicts_with<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conflicting_options = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict values to a closed set.
    #[must_use]
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Finish the declaration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyType`] for a non-symbolic key and
    /// [`Error::InvalidOption`] for an invalid environment variable name,
    /// a non-alphanumeric short option, a deprecated option that is not
    /// optional, choices on a non-string option, or an option conflicting
    /// with itself.
    pub fn build(self) -> Result<OptionSpec> {
        let key = OptionKey::try_from(self.key)?;
        let invalid = |reason: String| Error::InvalidOption {
            key: key.to_string(),
            reason,
        };

        if let Some(ref env_name) = self.env_name {
            if !is_valid_env_var_name(env_name) {
                return Err(invalid(format!(
                    "invalid environment variable name '{env_name}': must contain only alphanumeric characters and underscores, and start with a letter or underscore"
                )));
            }
        }

        if let Some(short) = self.short_option {
            if !short.is_ascii_alphanumeric() {
                return Err(invalid(format!(
                    "short option '{short}' must be a single ASCII letter or digit"
                )));
            }
        }

        if self.deprecated.is_some() && !self.optional {
            return Err(invalid("deprecated options must be optional".to_string()));
        }

        if !self.choices.is_empty() && self.kind != ValueKind::String {
            return Err(invalid(format!(
                "choices are only supported for string options, not {}",
                self.kind
            )));
        }

        if self.conflicting_options.iter().any(|k| k == key.as_str()) {
            return Err(invalid("an option cannot conflict with itself".to_string()));
        }

        Ok(OptionSpec {
            key,
            short_option: self.short_option,
            description: self.description,
            env_name: self.env_name,
            default_value: self.default_value,
            optional: self.optional,
            kind: self.kind,
            verify: self.verify,
            sensitive: self.sensitive,
            deprecated: self.deprecated,
            conflicting_options: self.conflicting_options,
            choices: self.choices,
        })
    }
}

/// Validates that a string is a valid environment variable name.
///
/// Valid names must:
/// - Start with a letter or underscore
/// - Contain only letters, digits, and underscores
#[must_use]
pub fn is_valid_env_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_id() -> OptionSpec {
        OptionSpec::builder("app_id")
            .description("Bundle identifier")
            .env_name("APP_ID")
            .verify(|v| match v.as_str() {
                Some(s) if s.contains('.') => Ok(()),
                _ => Err("must be a reverse-DNS identifier".into()),
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let spec = OptionSpec::builder("scheme").build().unwrap();
        assert_eq!(spec.key(), "scheme");
        assert!(!spec.is_optional());
        assert!(spec.is_string_kind());
        assert!(spec.short_option().is_none());
        assert!(spec.env_name().is_none());
        assert!(!spec.has_verify());
    }

    #[test]
    fn test_builder_rejects_bad_key() {
        let err = OptionSpec::builder("Scheme").build().unwrap_err();
        assert!(matches!(err, Error::InvalidKeyType { .. }));
    }

    #[test]
    fn test_builder_rejects_bad_env_name() {
        let err = OptionSpec::builder("scheme")
            .env_name("MY-SCHEME")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOption { .. }));
    }

    #[test]
    fn test_builder_rejects_required_deprecated_option() {
        let err = OptionSpec::builder("old")
            .deprecated("use 'new' instead")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("must be optional"));

        assert!(OptionSpec::builder("old")
            .deprecated("use 'new' instead")
            .optional(true)
            .build()
            .is_ok());
    }

    #[test]
    fn test_builder_rejects_self_conflict_and_bad_short_option() {
        assert!(OptionSpec::builder("a").conflicts_with(["a"]).build().is_err());
        assert!(OptionSpec::builder("a").short_option('-').build().is_err());
        assert!(OptionSpec::builder("a")
            .kind(ValueKind::Integer)
            .choices(["1"])
            .build()
            .is_err());
    }

    #[test]
    fn test_coerce_passes_absent_through() {
        assert_eq!(app_id().coerce(None), None);
    }

    #[test]
    fn test_validate_runs_verify() {
        let spec = app_id();
        assert!(spec.validate(&"com.example.app".into()).is_ok());

        let err = spec.validate(&"example".into()).unwrap_err();
        match err {
            Error::Validation { key, value, reason } => {
                assert_eq!(key, "app_id");
                assert_eq!(value, "example");
                assert!(reason.contains("reverse-DNS"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_without_verify_is_noop() {
        let spec = OptionSpec::builder("scheme").build().unwrap();
        assert!(spec.validate(&"".into()).is_ok());
    }

    #[test]
    fn test_validate_checks_kind() {
        let spec = OptionSpec::builder("clean")
            .kind(ValueKind::Boolean)
            .build()
            .unwrap();
        assert!(spec.validate(&"no".into()).is_ok());
        assert!(spec.validate(&Value::Bool(true)).is_ok());
        let err = spec.validate(&"sometimes".into()).unwrap_err();
        assert!(err.to_string().contains("must be a boolean"));
    }

    #[test]
    fn test_validate_checks_choices() {
        let spec = OptionSpec::builder("configuration")
            .choices(["Debug", "Release"])
            .build()
            .unwrap();
        assert!(spec.validate(&"Release".into()).is_ok());
        let err = spec.validate(&"Profile".into()).unwrap_err();
        assert!(err.to_string().contains("Debug, Release"));
    }

    #[test]
    fn test_sensitive_values_are_masked_in_errors() {
        let spec = OptionSpec::builder("api_token")
            .sensitive(true)
            .verify(|v| match v.as_str() {
                Some(s) if s.len() >= 8 => Ok(()),
                _ => Err("too short".into()),
            })
            .build()
            .unwrap();
        let err = spec.validate(&"hunter2".into()).unwrap_err();
        let display = err.to_string();
        assert!(!display.contains("hunter2"));
        assert!(display.contains(MASK));
    }

    #[test]
    fn test_is_valid_env_var_name() {
        assert!(is_valid_env_var_name("APP_ID"));
        assert!(is_valid_env_var_name("_PRIVATE"));
        assert!(is_valid_env_var_name("XCODE14"));
        assert!(!is_valid_env_var_name(""));
        assert!(!is_valid_env_var_name("14XCODE"));
        assert!(!is_valid_env_var_name("APP-ID"));
        assert!(!is_valid_env_var_name("APP ID"));
        assert!(!is_valid_env_var_name("PÖRТ"));
    }
}
