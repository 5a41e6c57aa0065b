//! Declaring options from YAML.
//!
//! A manifest declares options and initial values without writing Rust:
//!
//! ```yaml
//! options:
//!   - key: app_id
//!     description: Bundle identifier
//!     env_name: APP_ID
//!     check: { non_empty: true, max_length: 64 }
//!   - key: clean
//!     kind: boolean
//!     optional: true
//! values:
//!   clean: true
//! ```
//!
//! Documents of the wrong shape fail with [`Error::Construction`] before any
//! option is built.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_yaml::Value as Yaml;

use crate::configuration::Configuration;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::option::{OptionSpec, Verifier};
use crate::value::{Value, ValueKind};

/// One option as written in a manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionDecl {
    /// Option key.
    pub key: String,
    /// Prompt text.
    #[serde(default)]
    pub description: String,
    /// Environment variable alias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_name: Option<String>,
    /// Single-character alias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_option: Option<char>,
    /// Value kind.
    #[serde(default)]
    pub kind: ValueKind,
    /// Whether the option may resolve to nothing.
    #[serde(default)]
    pub optional: bool,
    /// Default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Mask values in output.
    #[serde(default)]
    pub sensitive: bool,
    /// Deprecation message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
    /// Keys that may not be set together with this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts_with: Vec<String>,
    /// Closed set of accepted values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    /// Declarative validation rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<CheckDecl>,
}

/// Declarative validation rules, compiled into a verify predicate.
///
/// Length rules apply to text (characters) and lists (items); range rules
/// apply to numbers. A rule that does not apply to a value is skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckDecl {
    /// Reject empty (or whitespace-only) text and empty lists.
    #[serde(default)]
    pub non_empty: bool,
    /// Minimum length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Maximum length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Minimum number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Maximum number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl CheckDecl {
    /// Whether no rule is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.non_empty
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.min.is_none()
            && self.max.is_none()
    }

    /// Run the rules against a value.
    ///
    /// # Errors
    ///
    /// Returns the reason of the first rule the value breaks.
    pub fn check(&self, value: &Value) -> std::result::Result<(), String> {
        let length = match value {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(items) => Some(items.len()),
            _ => None,
        };

        if self.non_empty {
            let empty = match value {
                Value::String(s) => s.trim().is_empty(),
                Value::Array(items) => items.is_empty(),
                Value::Map(map) => map.is_empty(),
                _ => false,
            };
            if empty {
                return Err("must not be empty".to_string());
            }
        }

        if let Some(length) = length {
            if let Some(min) = self.min_length.filter(|min| length < *min) {
                return Err(format!("must be at least {min} long"));
            }
            if let Some(max) = self.max_length.filter(|max| length > *max) {
                return Err(format!("must be at most {max} long"));
            }
        }

        if let Some(number) = value.as_f64() {
            if let Some(min) = self.min.filter(|min| number < *min) {
                return Err(format!("must be at least {min}"));
            }
            if let Some(max) = self.max.filter(|max| number > *max) {
                return Err(format!("must be at most {max}"));
            }
        }

        Ok(())
    }

    /// Compile into a verify predicate; `None` when no rule is set.
    #[must_use]
    pub fn into_verifier(self) -> Option<Verifier> {
        if self.is_empty() {
            return None;
        }
        let verify: Verifier = Arc::new(move |value: &Value| self.check(value));
        Some(verify)
    }
}

impl OptionDecl {
    /// Build the declared option.
    ///
    /// # Errors
    ///
    /// Returns the error of [`OptionSpecBuilder::build`](crate::OptionSpecBuilder::build).
    pub fn into_spec(self) -> Result<OptionSpec> {
        let mut builder = OptionSpec::builder(self.key)
            .description(self.description)
            .kind(self.kind)
            .optional(self.optional)
            .sensitive(self.sensitive)
            .conflicts_with(self.conflicts_with)
            .choices(self.choices);

        if let Some(env_name) = self.env_name {
            builder = builder.env_name(env_name);
        }
        if let Some(short) = self.short_option {
            builder = builder.short_option(short);
        }
        if let Some(default) = self.default {
            builder = builder.default_value(default);
        }
        if let Some(message) = self.deprecated {
            builder = builder.deprecated(message);
        }
        if let Some(verify) = self.check.and_then(CheckDecl::into_verifier) {
            builder = builder.verifier(verify);
        }

        builder.build()
    }
}

/// Options and initial values read from a manifest document.
#[derive(Debug, Default)]
pub struct Manifest {
    /// Declared options, in document order.
    pub options: Vec<OptionSpec>,
    /// Initial values.
    pub values: BTreeMap<String, Value>,
}

impl Manifest {
    /// Parse a manifest document with `options` and `values` sections.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] for invalid YAML or a document of the
    /// wrong shape, and the error of [`OptionDecl::into_spec`] for an
    /// invalid option.
    ///
    /// # Examples
    ///
    /// ```
    /// use knob::Manifest;
    ///
    /// let manifest = Manifest::parse("options:\n  - key: scheme\nvalues:\n  scheme: App\n").unwrap();
    /// assert_eq!(manifest.options.len(), 1);
    /// assert_eq!(manifest.values["scheme"], knob::Value::from("App"));
    /// ```
    pub fn parse(contents: &str) -> Result<Self> {
        let document: Yaml = serde_yaml::from_str(contents).map_err(|e| Error::Construction {
            reason: format!("invalid manifest YAML: {e}"),
        })?;

        let mut sections = match document {
            Yaml::Mapping(sections) => sections,
            other => {
                return Err(Error::Construction {
                    reason: format!(
                        "manifest must be a mapping with 'options' and 'values', found {}",
                        yaml_type(&other)
                    ),
                })
            }
        };

        let options = sections
            .remove("options")
            .ok_or_else(|| Error::Construction {
                reason: "manifest has no 'options' section".to_string(),
            })?;
        let values = sections.remove("values").unwrap_or(Yaml::Null);

        if let Some(extra) = sections.keys().next() {
            return Err(Error::Construction {
                reason: format!("unexpected manifest section {extra:?}"),
            });
        }

        Ok(Self {
            options: options_from_yaml(&options)?,
            values: values_from_yaml(&values)?,
        })
    }

    /// Read and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read, otherwise the
    /// errors of [`parse`](Self::parse).
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Build a configuration from this manifest.
    ///
    /// # Errors
    ///
    /// The errors of [`Configuration::new`].
    pub fn into_configuration(self, context: Context) -> Result<Configuration> {
        Configuration::new(self.options, self.values, context)
    }
}

impl Configuration {
    /// Build a configuration from untyped option and value documents.
    ///
    /// `options` must be a sequence of option mappings and `values` a
    /// mapping with string keys (or null for none).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] for documents of the wrong shape and
    /// otherwise the errors of [`Configuration::new`].
    ///
    /// # Examples
    ///
    /// ```
    /// use knob::{Configuration, Context, Error, Logger};
    ///
    /// let options: serde_yaml::Value = serde_yaml::from_str("- key: scheme").unwrap();
    /// let values: serde_yaml::Value = serde_yaml::from_str("[scheme]").unwrap();
    ///
    /// let err = Configuration::from_yaml(&options, &values, Context::new(Logger::default(), true))
    ///     .unwrap_err();
    /// assert!(matches!(err, Error::Construction { .. }));
    /// ```
    pub fn from_yaml(options: &Yaml, values: &Yaml, context: Context) -> Result<Self> {
        let options = options_from_yaml(options)?;
        let values = values_from_yaml(values)?;
        Self::new(options, values, context)
    }
}

/// Build options from a sequence of option mappings.
///
/// # Errors
///
/// Returns [`Error::Construction`] when `doc` is not a sequence of mappings
/// or an entry does not describe an option, and the error of
/// [`OptionDecl::into_spec`] for an invalid declaration.
pub fn options_from_yaml(doc: &Yaml) -> Result<Vec<OptionSpec>> {
    let Yaml::Sequence(items) = doc else {
        return Err(Error::Construction {
            reason: format!(
                "options must be a sequence of option declarations, found {}",
                yaml_type(doc)
            ),
        });
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_mapping() {
                return Err(Error::Construction {
                    reason: format!(
                        "option #{} must be a mapping, found {}",
                        index + 1,
                        yaml_type(item)
                    ),
                });
            }
            let decl: OptionDecl =
                serde_yaml::from_value(item.clone()).map_err(|e| Error::Construction {
                    reason: format!("option #{}: {e}", index + 1),
                })?;
            decl.into_spec()
        })
        .collect()
}

/// Build initial values from a mapping of keys to values.
///
/// Null documents and null entries count as absent.
///
/// # Errors
///
/// Returns [`Error::Construction`] when `doc` is not a mapping, a key is
/// not a string, or a value cannot be represented.
pub fn values_from_yaml(doc: &Yaml) -> Result<BTreeMap<String, Value>> {
    let mapping = match doc {
        Yaml::Null => return Ok(BTreeMap::new()),
        Yaml::Mapping(mapping) => mapping,
        other => {
            return Err(Error::Construction {
                reason: format!("values must be a mapping, found {}", yaml_type(other)),
            })
        }
    };

    let mut values = BTreeMap::new();
    for (key, value) in mapping {
        let Yaml::String(key) = key else {
            return Err(Error::Construction {
                reason: format!("value keys must be strings, found {}", yaml_type(key)),
            });
        };
        if value.is_null() {
            continue;
        }
        let value: Value =
            serde_yaml::from_value(value.clone()).map_err(|e| Error::Construction {
                reason: format!("unsupported value for '{key}': {e}"),
            })?;
        values.insert(key.clone(), value);
    }

    Ok(values)
}

const fn yaml_type(doc: &Yaml) -> &'static str {
    match doc {
        Yaml::Null => "null",
        Yaml::Bool(_) => "a boolean",
        Yaml::Number(_) => "a number",
        Yaml::String(_) => "a string",
        Yaml::Sequence(_) => "a sequence",
        Yaml::Mapping(_) => "a mapping",
        Yaml::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, Logger};
    use proptest::prelude::*;

    fn yaml(text: &str) -> Yaml {
        serde_yaml::from_str(text).unwrap()
    }

    fn context() -> Context {
        Context::new(Logger::new(LogLevel::Quiet), true)
    }

    #[test]
    fn test_options_must_be_sequence() {
        let err = options_from_yaml(&yaml("key: scheme")).unwrap_err();
        assert!(matches!(err, Error::Construction { .. }));
        assert!(err.to_string().contains("found a mapping"));
    }

    #[test]
    fn test_option_entries_must_be_mappings() {
        let err = options_from_yaml(&yaml("- scheme")).unwrap_err();
        assert!(err.to_string().contains("option #1 must be a mapping"));
    }

    #[test]
    fn test_option_unknown_field_rejected() {
        let err = options_from_yaml(&yaml("- key: scheme\n  colour: red")).unwrap_err();
        assert!(matches!(err, Error::Construction { .. }));
    }

    #[test]
    fn test_option_bad_key_is_key_type_error() {
        let err = options_from_yaml(&yaml("- key: My-Scheme")).unwrap_err();
        assert!(matches!(err, Error::InvalidKeyType { .. }));
    }

    #[test]
    fn test_values_shape() {
        assert!(values_from_yaml(&Yaml::Null).unwrap().is_empty());
        assert!(matches!(
            values_from_yaml(&yaml("[a, b]")).unwrap_err(),
            Error::Construction { .. }
        ));
        assert!(matches!(
            values_from_yaml(&yaml("1: a")).unwrap_err(),
            Error::Construction { .. }
        ));

        let values = values_from_yaml(&yaml("scheme: App\nclean: ~\njobs: 4")).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values["jobs"], Value::Integer(4));
    }

    #[test]
    fn test_full_declaration() {
        let options = options_from_yaml(&yaml(
            r"
- key: app_id
  description: Bundle identifier
  env_name: APP_ID
  short_option: a
  default: com.example.app
  check: { non_empty: true, max_length: 64 }
- key: configuration
  choices: [Debug, Release]
  optional: true
- key: api_token
  sensitive: true
  optional: true
  conflicts_with: [configuration]
",
        ))
        .unwrap();

        assert_eq!(options.len(), 3);
        assert_eq!(options[0].short_option(), Some('a'));
        assert_eq!(options[0].env_name(), Some("APP_ID"));
        assert!(options[0].has_verify());
        assert_eq!(options[1].choices(), ["Debug", "Release"]);
        assert!(options[2].is_sensitive());
        assert_eq!(options[2].conflicting_options(), ["configuration"]);
    }

    #[test]
    fn test_check_rules() {
        let check = CheckDecl {
            non_empty: true,
            max_length: Some(5),
            min: Some(1.0),
            max: Some(10.0),
            ..CheckDecl::default()
        };

        assert!(check.check(&"abc".into()).is_ok());
        assert_eq!(check.check(&"  ".into()).unwrap_err(), "must not be empty");
        assert!(check.check(&"abcdef".into()).unwrap_err().contains("at most 5"));
        assert!(check.check(&Value::Integer(0)).unwrap_err().contains("at least 1"));
        assert!(check.check(&Value::Float(10.5)).is_err());
        assert!(check.check(&Value::Bool(true)).is_ok());
    }

    #[test]
    fn test_empty_check_has_no_verifier() {
        assert!(CheckDecl::default().into_verifier().is_none());
    }

    #[test]
    fn test_from_yaml_builds_configuration() {
        let mut config = Configuration::from_yaml(
            &yaml("- key: scheme\n- key: jobs\n  kind: integer\n  default: 2"),
            &yaml("scheme: App"),
            context(),
        )
        .unwrap();

        assert_eq!(config.fetch("scheme", true).unwrap(), Some(Value::from("App")));
        assert_eq!(config.fetch("jobs", true).unwrap(), Some(Value::Integer(2)));
    }

    #[test]
    fn test_from_yaml_shape_errors() {
        let err = Configuration::from_yaml(&yaml("key: scheme"), &Yaml::Null, context()).unwrap_err();
        assert!(matches!(err, Error::Construction { .. }));

        let err = Configuration::from_yaml(&yaml("- key: scheme"), &yaml("just text"), context())
            .unwrap_err();
        assert!(matches!(err, Error::Construction { .. }));
    }

    #[test]
    fn test_manifest_parse() {
        let manifest = Manifest::parse("options:\n  - key: scheme\nvalues:\n  scheme: App\n").unwrap();
        assert_eq!(manifest.options.len(), 1);

        let config = manifest.into_configuration(context()).unwrap();
        assert_eq!(config.raw_values().len(), 1);
    }

    #[test]
    fn test_manifest_requires_options() {
        let err = Manifest::parse("values: {}\n").unwrap_err();
        assert!(err.to_string().contains("no 'options' section"));

        let err = Manifest::parse("options: []\nextra: 1\n").unwrap_err();
        assert!(err.to_string().contains("unexpected manifest section"));
    }

    #[test]
    fn test_manifest_load_missing_file() {
        let err = Manifest::load(Path::new("/nonexistent/knob.yaml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    // ========================================================================
    // Property-based tests
    // ========================================================================

    proptest! {
        #[test]
        fn prop_length_rules_match_char_count(text in "\\PC{0,20}", max in 0usize..20) {
            let check = CheckDecl { max_length: Some(max), ..CheckDecl::default() };
            let result = check.check(&Value::String(text.clone()));
            prop_assert_eq!(result.is_ok(), text.chars().count() <= max);
        }

        #[test]
        fn prop_range_rules_ignore_text(text in "[a-z]{0,10}") {
            let check = CheckDecl { min: Some(1.0), max: Some(2.0), ..CheckDecl::default() };
            prop_assert!(check.check(&Value::String(text)).is_ok());
        }
    }
}
