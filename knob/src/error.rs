//! Error types for the knob library.
//!
//! This module provides the error hierarchy for option declaration,
//! construction, resolution and mutation, using `thiserror` for ergonomic
//! error handling.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a knob error.
///
/// # Examples
///
/// ```
/// use knob::{Error, Result};
///
/// fn example_operation() -> Result<bool> {
///     Ok(true)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the knob library.
///
/// Every failure of the engine is reported through one of these variants so
/// callers can branch on the kind instead of matching message text.
#[derive(Debug, Error)]
pub enum Error {
    /// Inputs to a configuration had the wrong shape.
    #[error("invalid configuration input: {reason}")]
    Construction {
        /// What was wrong with the input.
        reason: String,
    },

    /// Two options share a key or a short option.
    #[error("multiple entries for option {kind} '{name}' found ({count} declarations)")]
    DuplicateOption {
        /// Which attribute collided.
        kind: DuplicateKind,
        /// The colliding key or short option.
        name: String,
        /// How many options declare it.
        count: usize,
    },

    /// A default value is rejected by its own option.
    #[error("invalid default value for '{key}': {reason}")]
    InvalidDefault {
        /// The option key.
        key: String,
        /// Why the default was rejected.
        reason: String,
    },

    /// A key is not declared by any option.
    #[error("could not find option '{key}' in the list of available options: {}", valid_keys.join(", "))]
    UnknownKey {
        /// The unknown key.
        key: String,
        /// Every declared key, in declaration order.
        valid_keys: Vec<String>,
    },

    /// A key is not a symbolic identifier.
    #[error("invalid option key '{key}': {reason}")]
    InvalidKeyType {
        /// The rejected key.
        key: String,
        /// Why it is not a symbolic identifier.
        reason: String,
    },

    /// A value was rejected by an option.
    #[error("invalid value '{value}' for '{key}': {reason}")]
    Validation {
        /// The option key.
        key: String,
        /// The offending value (masked for sensitive options).
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A required value could not be resolved and prompting is not allowed.
    #[error("no value found for '{key}'")]
    MissingValue {
        /// The option key.
        key: String,
    },

    /// Two mutually exclusive options both hold values.
    #[error("unresolved conflict between options '{key}' and '{other}'")]
    Conflict {
        /// The option being checked.
        key: String,
        /// The option it conflicts with.
        other: String,
    },

    /// An option declaration is malformed.
    #[error("invalid declaration for option '{key}': {reason}")]
    InvalidOption {
        /// The option key.
        key: String,
        /// What is wrong with the declaration.
        reason: String,
    },

    /// A configuration file could not be read or parsed.
    #[error("invalid configuration file {}: {reason}", path.display())]
    ConfigFile {
        /// Path of the file.
        path: PathBuf,
        /// Why it could not be used.
        reason: String,
    },

    /// Reading an answer from the operator failed.
    #[error("failed to read a value for '{key}': {source}")]
    Prompt {
        /// The option being prompted for.
        key: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Rendering values for output failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The attribute two colliding options share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKind {
    /// The option key.
    Key,
    /// The single-character short option.
    ShortOption,
}

impl fmt::Display for DuplicateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key => write!(f, "key"),
            Self::ShortOption => write!(f, "short option"),
        }
    }
}

impl Error {
    /// Check if error reports an undeclared key.
    ///
    /// # Examples
    ///
    /// ```
    /// use knob::Error;
    ///
    /// let err = Error::UnknownKey { key: "foo".into(), valid_keys: vec!["bar".into()] };
    /// assert!(err.is_unknown_key());
    /// ```
    #[must_use]
    pub fn is_unknown_key(&self) -> bool {
        matches!(self, Self::UnknownKey { .. })
    }

    /// Check if error is a rejected value.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if error is a missing required value.
    #[must_use]
    pub fn is_missing_value(&self) -> bool {
        matches!(self, Self::MissingValue { .. })
    }

    /// The option key this error is about, when there is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use knob::Error;
    ///
    /// let err = Error::MissingValue { key: "scheme".into() };
    /// assert_eq!(err.key(), Some("scheme"));
    /// ```
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::InvalidDefault { key, .. }
            | Self::UnknownKey { key, .. }
            | Self::InvalidKeyType { key, .. }
            | Self::Validation { key, .. }
            | Self::MissingValue { key }
            | Self::Conflict { key, .. }
            | Self::InvalidOption { key, .. }
            | Self::Prompt { key, .. } => Some(key),
            Self::DuplicateOption { name, .. } => Some(name),
            Self::Construction { .. }
            | Self::ConfigFile { .. }
            | Self::Serialization(_)
            | Self::Io(_) => None,
        }
    }
}
