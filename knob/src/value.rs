//! Option values and value kinds.
//!
//! Raw values arrive as text (environment variables, prompts, command-line
//! assignments) or as YAML/JSON scalars and collections. [`ValueKind::coerce`]
//! turns them into the declared kind of an option; [`ValueKind::accepts`]
//! decides whether a coerced value has that kind.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A raw or resolved option value.
///
/// # Examples
///
/// ```
/// use knob::Value;
///
/// let v: Value = serde_yaml::from_str("[a, b]").unwrap();
/// assert_eq!(v, Value::from(vec!["a", "b"]));
/// assert_eq!(Value::from(true).to_string(), "true");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean flag.
    Bool(bool),
    /// A whole number.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// Text.
    String(String),
    /// An ordered list of values.
    Array(Vec<Value>),
    /// A string-keyed map of values.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the text if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the flag if this is a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number as a float if this is a numeric value.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Whether the value counts as "on" for diagnostic switches.
    ///
    /// Booleans are taken as is; text is truthy when it parses as a true
    /// boolean; non-zero numbers and non-empty collections are truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::String(s) => parse_bool(s) == Some(true),
            Self::Array(items) => !items.is_empty(),
            Self::Map(map) => !map.is_empty(),
        }
    }

    /// The kind this value currently has.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Boolean,
            Self::Integer(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
            Self::Array(_) => ValueKind::Array,
            Self::Map(_) => ValueKind::Map,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Array(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(", "))
            }
            Self::Map(map) => {
                let parts: Vec<String> = map.iter().map(|(k, v)| format!("{k}={v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

/// The declared kind of an option's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Free text. Absent string options never normalize to `false`.
    #[default]
    String,
    /// A flag; absent flags resolve to `false`.
    Boolean,
    /// A whole number.
    Integer,
    /// A number that may have a fractional part.
    Float,
    /// A list, written as comma separated text on the command line.
    Array,
    /// A map, written as a JSON object on the command line.
    Map,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Boolean => write!(f, "boolean"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Array => write!(f, "array"),
            Self::Map => write!(f, "map"),
        }
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" => Ok(Self::String),
            "boolean" | "bool" => Ok(Self::Boolean),
            "integer" | "int" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            "array" => Ok(Self::Array),
            "map" | "hash" => Ok(Self::Map),
            _ => Err(format!("unknown value kind: {s}")),
        }
    }
}

impl ValueKind {
    /// Convert a raw value into this kind where a conversion exists.
    ///
    /// Values that cannot be converted are returned unchanged so that
    /// validation can report them.
    ///
    /// # Examples
    ///
    /// ```
    /// use knob::{Value, ValueKind};
    ///
    /// assert_eq!(ValueKind::Boolean.coerce("yes".into()), Value::Bool(true));
    /// assert_eq!(ValueKind::Integer.coerce("42".into()), Value::Integer(42));
    /// assert_eq!(ValueKind::Integer.coerce("4.2".into()), Value::from("4.2"));
    /// assert_eq!(
    ///     ValueKind::Array.coerce("a, b".into()),
    ///     Value::from(vec!["a", "b"])
    /// );
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn coerce(self, raw: Value) -> Value {
        match (self, raw) {
            (Self::String, Value::Bool(b)) => Value::String(b.to_string()),
            (Self::String, Value::Integer(i)) => Value::String(i.to_string()),
            (Self::String, Value::Float(f)) => Value::String(f.to_string()),
            (Self::Boolean, Value::String(s)) => match parse_bool(&s) {
                Some(b) => Value::Bool(b),
                None => Value::String(s),
            },
            (Self::Integer, Value::String(s)) => match s.trim().parse::<i64>() {
                Ok(i) => Value::Integer(i),
                Err(_) => Value::String(s),
            },
            (Self::Float, Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(f) => Value::Float(f),
                Err(_) => Value::String(s),
            },
            (Self::Float, Value::Integer(i)) => Value::Float(i as f64),
            (Self::Array, Value::String(s)) => Value::Array(split_list(&s)),
            (Self::Map, Value::String(s)) => {
                match serde_json::from_str::<BTreeMap<String, Value>>(&s) {
                    Ok(map) => Value::Map(map),
                    Err(_) => Value::String(s),
                }
            }
            (_, raw) => raw,
        }
    }

    /// Whether a (coerced) value has this kind.
    #[must_use]
    pub const fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::String, Value::String(_))
                | (Self::Boolean, Value::Bool(_))
                | (Self::Integer, Value::Integer(_))
                | (Self::Float, Value::Float(_) | Value::Integer(_))
                | (Self::Array, Value::Array(_))
                | (Self::Map, Value::Map(_))
        )
    }
}

/// Parse a boolean value from a string.
///
/// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
///
/// # Examples
///
/// ```
/// use knob::value::parse_bool;
///
/// assert_eq!(parse_bool("YES"), Some(true));
/// assert_eq!(parse_bool("off"), Some(false));
/// assert_eq!(parse_bool("maybe"), None);
/// ```
#[must_use]
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Split comma separated text into trimmed, non-empty string items.
fn split_list(s: &str) -> Vec<Value> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(Value::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_variants() {
        for t in ["true", "TRUE", "1", "yes", "YES", "on", "On"] {
            assert_eq!(parse_bool(t), Some(true), "{t}");
        }
        for f in ["false", "FALSE", "0", "no", "NO", "off"] {
            assert_eq!(parse_bool(f), Some(false), "{f}");
        }
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_coerce_string_kind_stringifies_scalars() {
        assert_eq!(ValueKind::String.coerce(Value::Integer(3)), Value::from("3"));
        assert_eq!(ValueKind::String.coerce(Value::Bool(false)), Value::from("false"));
        assert_eq!(ValueKind::String.coerce(Value::from("x")), Value::from("x"));
    }

    #[test]
    fn test_coerce_boolean_leaves_garbage_untouched() {
        assert_eq!(ValueKind::Boolean.coerce(Value::from("sure")), Value::from("sure"));
        assert!(!ValueKind::Boolean.accepts(&Value::from("sure")));
    }

    #[test]
    fn test_coerce_float_widens_integers() {
        assert_eq!(ValueKind::Float.coerce(Value::Integer(2)), Value::Float(2.0));
        assert_eq!(ValueKind::Float.coerce(Value::from("2.5")), Value::Float(2.5));
    }

    #[test]
    fn test_coerce_array_drops_empty_items() {
        assert_eq!(ValueKind::Array.coerce(Value::from("")), Value::Array(vec![]));
        assert_eq!(
            ValueKind::Array.coerce(Value::from("a,,b ,")),
            Value::from(vec!["a", "b"])
        );
    }

    #[test]
    fn test_coerce_map_from_json() {
        let coerced = ValueKind::Map.coerce(Value::from(r#"{"CONFIG": "Release", "JOBS": 4}"#));
        let Value::Map(map) = coerced else {
            panic!("expected a map");
        };
        assert_eq!(map.get("CONFIG"), Some(&Value::from("Release")));
        assert_eq!(map.get("JOBS"), Some(&Value::Integer(4)));

        assert_eq!(ValueKind::Map.coerce(Value::from("nope")), Value::from("nope"));
    }

    #[test]
    fn test_accepts() {
        assert!(ValueKind::Float.accepts(&Value::Integer(1)));
        assert!(!ValueKind::Integer.accepts(&Value::Float(1.0)));
        assert!(ValueKind::Array.accepts(&Value::Array(vec![])));
        assert!(!ValueKind::String.accepts(&Value::Bool(true)));
    }

    #[test]
    fn test_value_kind_from_str() {
        assert_eq!("BOOL".parse::<ValueKind>().unwrap(), ValueKind::Boolean);
        assert_eq!("hash".parse::<ValueKind>().unwrap(), ValueKind::Map);
        assert!("list".parse::<ValueKind>().is_err());
    }

    #[test]
    fn test_value_deserializes_from_yaml_scalars() {
        let v: Value = serde_yaml::from_str("42").unwrap();
        assert_eq!(v, Value::Integer(42));
        let v: Value = serde_yaml::from_str("1.5").unwrap();
        assert_eq!(v, Value::Float(1.5));
        let v: Value = serde_yaml::from_str("true").unwrap();
        assert_eq!(v, Value::Bool(true));
        let v: Value = serde_yaml::from_str("Release").unwrap();
        assert_eq!(v, Value::from("Release"));
    }

    #[test]
    fn test_truthiness() {
        assert!(Value::from("yes").is_truthy());
        assert!(!Value::from("verbose").is_truthy());
        assert!(Value::Integer(1).is_truthy());
        assert!(!Value::Array(vec![]).is_truthy());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "a, b");
        let map: BTreeMap<String, Value> = [("k".to_string(), Value::Integer(1))].into();
        assert_eq!(Value::Map(map).to_string(), "{k=1}");
    }
}
