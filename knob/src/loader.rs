//! Configuration file discovery and loading.
//!
//! A configuration file is a YAML mapping from option keys to values:
//!
//! ```yaml
//! app_id: com.example.app
//! scheme: App
//! clean: true
//! ```
//!
//! Files are looked up by name in `knob/`, `.knob/` and the working
//! directory itself, in that order.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value as Yaml;

use crate::configuration::Configuration;
use crate::error::{Error, Result};
use crate::value::Value;

/// Directories searched for configuration files, relative to the working
/// directory, in order.
pub const CANDIDATE_DIRS: &[&str] = &["knob", ".knob", ""];

/// Finds configuration files and applies their values.
///
/// # Examples
///
/// ```no_run
/// use knob::ConfigFileLoader;
/// use std::path::Path;
///
/// if let Some(path) = ConfigFileLoader::find(Path::new("."), "Buildfile") {
///     println!("using {}", path.display());
/// }
/// ```
pub struct ConfigFileLoader;

impl ConfigFileLoader {
    /// First file named `name` in the candidate directories.
    #[must_use]
    pub fn find(working_dir: &Path, name: &str) -> Option<PathBuf> {
        CANDIDATE_DIRS
            .iter()
            .map(|dir| working_dir.join(dir).join(name))
            .find(|path| path.is_file())
    }

    /// Read and parse a configuration file into key/value entries, in file
    /// order. Entries with a null value are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigFile`] if the file cannot be read, is not a
    /// YAML mapping, has a non-string key or a value that is not a
    /// scalar, list or mapping.
    pub fn load_file(path: &Path) -> Result<Vec<(String, Value)>> {
        let invalid = |reason: String| Error::ConfigFile {
            path: path.to_path_buf(),
            reason,
        };

        let contents = fs::read_to_string(path)
            .map_err(|e| invalid(format!("failed to read configuration file: {e}")))?;

        let document: Yaml =
            serde_yaml::from_str(&contents).map_err(|e| invalid(format!("invalid YAML: {e}")))?;

        let mapping = match document {
            Yaml::Null => return Ok(Vec::new()),
            Yaml::Mapping(mapping) => mapping,
            _ => return Err(invalid("expected a mapping of option keys to values".into())),
        };

        let mut entries = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let key = match key {
                Yaml::String(key) => key,
                other => {
                    return Err(invalid(format!("option keys must be strings, found {other:?}")))
                }
            };
            if value.is_null() {
                continue;
            }
            let value: Value = serde_yaml::from_value(value)
                .map_err(|e| invalid(format!("unsupported value for '{key}': {e}")))?;
            entries.push((key, value));
        }

        Ok(entries)
    }

    /// Apply the entries of `path` to `config`.
    ///
    /// Keys that already hold a stored value keep it. Returns the keys that
    /// were set from the file.
    ///
    /// # Errors
    ///
    /// Returns the error of [`load_file`](Self::load_file), or the first
    /// error of [`Configuration::set`] (an unknown key, an invalid value).
    pub fn apply(config: &mut Configuration, path: &Path) -> Result<Vec<String>> {
        let mut applied = Vec::new();

        for (key, value) in Self::load_file(path)? {
            if config.raw_values().contains_key(&key) {
                log::debug!("'{key}' already set, ignoring value from {}", path.display());
                continue;
            }
            config.set(&key, value)?;
            applied.push(key);
        }

        Ok(applied)
    }
}
