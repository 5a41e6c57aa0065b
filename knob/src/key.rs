//! Option key type.
//!
//! Keys are symbolic identifiers: lowercase snake case, starting with a
//! letter or underscore.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Key reserved for diagnostics.
///
/// It may appear among the initial values of a
/// [`Configuration`](crate::Configuration) without a matching option.
pub const TRACE_KEY: &str = "trace";

/// A validated option key.
///
/// # Examples
///
/// ```
/// use knob::OptionKey;
///
/// let key = OptionKey::try_from("app_id").unwrap();
/// assert_eq!(key.as_str(), "app_id");
///
/// assert!(OptionKey::try_from("App-Id").is_err());
/// assert!(OptionKey::try_from("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OptionKey(String);

impl OptionKey {
    /// Returns the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check that `key` is a symbolic identifier without allocating a key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyType`] describing the first problem found.
    pub fn check(key: &str) -> Result<(), Error> {
        let invalid = |reason: &str| Error::InvalidKeyType {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        let mut chars = key.chars();
        let Some(first) = chars.next() else {
            return Err(invalid("key must not be empty"));
        };

        if !first.is_ascii_lowercase() && first != '_' {
            return Err(invalid("key must start with a lowercase letter or underscore"));
        }

        if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
            return Err(invalid(
                "key may only contain lowercase letters, digits and underscores",
            ));
        }

        Ok(())
    }
}

impl TryFrom<&str> for OptionKey {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::check(value)?;
        Ok(Self(value.to_string()))
    }
}

impl TryFrom<String> for OptionKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::check(&value)?;
        Ok(Self(value))
    }
}

impl From<OptionKey> for String {
    fn from(key: OptionKey) -> Self {
        key.0
    }
}

impl AsRef<str> for OptionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys() {
        for key in ["scheme", "app_id", "_private", "xcode_14", TRACE_KEY] {
            assert!(OptionKey::try_from(key).is_ok(), "{key}");
        }
    }

    #[test]
    fn test_invalid_keys() {
        for key in ["", "Scheme", "1st", "app-id", "app id", "schème"] {
            let err = OptionKey::try_from(key).unwrap_err();
            assert!(matches!(err, Error::InvalidKeyType { .. }), "{key}");
        }
    }

    #[test]
    fn test_deserialize_rejects_invalid_key() {
        let key: Result<OptionKey, _> = serde_yaml::from_str("\"Bad Key\"");
        assert!(key.is_err());
        let key: OptionKey = serde_yaml::from_str("scheme").unwrap();
        assert_eq!(key.as_str(), "scheme");
    }
}
