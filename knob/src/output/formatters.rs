//! Output formatter implementations.

use serde_json::json;

use crate::value::Value;
use crate::{Error, Result};

use super::{OutputFormatter, SummaryEntry};

/// Converts an option key to an environment variable name.
fn key_to_env_var(key: &str) -> String {
    key.to_uppercase()
}

/// Quote a dotenv value when it contains anything but plain characters.
fn dotenv_value(text: &str) -> String {
    let plain = !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-.,/:@+".contains(c));
    if plain {
        text.to_string()
    } else {
        format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

/// Formatter for an aligned table.
pub struct HumanFormatter {
    reveal: bool,
}

impl HumanFormatter {
    /// Create a new human formatter.
    #[must_use]
    pub const fn new(reveal: bool) -> Self {
        Self { reveal }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format(&self, entries: &[SummaryEntry]) -> Result<String> {
        if entries.is_empty() {
            return Ok("No options declared.".to_string());
        }

        let rows: Vec<(&str, String, String)> = entries
            .iter()
            .map(|entry| {
                let value = entry
                    .shown_value(self.reveal)
                    .map_or_else(|| "-".to_string(), |v| v.to_string());
                (entry.key.as_str(), value, entry.source.to_string())
            })
            .collect();

        let key_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(0).max(3);
        let value_width = rows
            .iter()
            .map(|r| r.1.chars().count())
            .max()
            .unwrap_or(0)
            .max(5);

        let mut lines = vec![format!(
            "{:<key_width$}  {:<value_width$}  SOURCE",
            "KEY", "VALUE"
        )];
        for (key, value, source) in rows {
            lines.push(format!("{key:<key_width$}  {value:<value_width$}  {source}"));
        }

        Ok(lines.join("\n"))
    }
}

/// Formatter for JSON output.
pub struct JsonFormatter {
    reveal: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter.
    #[must_use]
    pub const fn new(reveal: bool) -> Self {
        Self { reveal }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, entries: &[SummaryEntry]) -> Result<String> {
        let rows: Vec<serde_json::Value> = entries
            .iter()
            .map(|entry| {
                json!({
                    "key": entry.key,
                    "value": entry.shown_value(self.reveal),
                    "source": entry.source,
                })
            })
            .collect();

        serde_json::to_string_pretty(&rows)
            .map_err(|e| Error::Serialization(format!("failed to serialize to JSON: {e}")))
    }
}

/// Formatter for YAML output.
pub struct YamlFormatter {
    reveal: bool,
}

impl YamlFormatter {
    /// Create a new YAML formatter.
    #[must_use]
    pub const fn new(reveal: bool) -> Self {
        Self { reveal }
    }
}

impl OutputFormatter for YamlFormatter {
    fn format(&self, entries: &[SummaryEntry]) -> Result<String> {
        let mut mapping = serde_yaml::Mapping::new();
        for entry in entries {
            let value = serde_yaml::to_value(entry.shown_value(self.reveal))
                .map_err(|e| Error::Serialization(format!("failed to serialize to YAML: {e}")))?;
            mapping.insert(serde_yaml::Value::String(entry.key.clone()), value);
        }

        serde_yaml::to_string(&mapping)
            .map(|text| text.trim_end().to_string())
            .map_err(|e| Error::Serialization(format!("failed to serialize to YAML: {e}")))
    }
}

/// Formatter for dotenv (.env file) format.
///
/// Options are named by their environment variable, or by their upper-cased
/// key when they have none. Options without a value are left out.
pub struct DotenvFormatter {
    reveal: bool,
}

impl DotenvFormatter {
    /// Create a new dotenv formatter.
    #[must_use]
    pub const fn new(reveal: bool) -> Self {
        Self { reveal }
    }
}

impl OutputFormatter for DotenvFormatter {
    fn format(&self, entries: &[SummaryEntry]) -> Result<String> {
        let lines: Vec<String> = entries
            .iter()
            .filter_map(|entry| {
                let value = entry.shown_value(self.reveal)?;
                let name = entry
                    .env_name
                    .clone()
                    .unwrap_or_else(|| key_to_env_var(&entry.key));
                let text = match value {
                    Value::Array(_) | Value::Map(_) => serde_json::to_string(&value).ok()?,
                    other => other.to_string(),
                };
                Some(format!("{name}={}", dotenv_value(&text)))
            })
            .collect();

        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::Source;
    use crate::option::MASK;

    fn entry(key: &str, value: Option<Value>, source: Source) -> SummaryEntry {
        SummaryEntry {
            key: key.to_string(),
            value,
            source,
            env_name: None,
            sensitive: false,
        }
    }

    fn create_test_entries() -> Vec<SummaryEntry> {
        let mut app_id = entry("app_id", Some("com.example.app".into()), Source::Environment);
        app_id.env_name = Some("APP_ID".to_string());

        let mut token = entry("api_token", Some("s3cret".into()), Source::Stored);
        token.sensitive = true;

        vec![
            app_id,
            token,
            entry("clean", Some(Value::Bool(false)), Source::Fallback),
            entry("output_name", None, Source::Unset),
        ]
    }

    // ========================================================================
    // Human Formatter Tests
    // ========================================================================

    #[test]
    fn test_human_formatter_table() {
        let output = HumanFormatter::new(false)
            .format(&create_test_entries())
            .unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("KEY"));
        assert!(lines[1].starts_with("app_id"));
        assert!(lines[1].ends_with("environment"));
        assert!(lines[2].contains(MASK));
        assert!(!output.contains("s3cret"));
        assert!(lines[4].contains(" - "));
    }

    #[test]
    fn test_human_formatter_reveal() {
        let output = HumanFormatter::new(true)
            .format(&create_test_entries())
            .unwrap();
        assert!(output.contains("s3cret"));
    }

    #[test]
    fn test_human_formatter_empty() {
        let output = HumanFormatter::new(false).format(&[]).unwrap();
        assert_eq!(output, "No options declared.");
    }

    // ========================================================================
    // JSON Formatter Tests
    // ========================================================================

    #[test]
    fn test_json_formatter() {
        let output = JsonFormatter::new(false)
            .format(&create_test_entries())
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["key"], "app_id");
        assert_eq!(rows[0]["value"], "com.example.app");
        assert_eq!(rows[0]["source"], "environment");
        assert_eq!(rows[1]["value"], MASK);
        assert_eq!(rows[2]["value"], false);
        assert!(rows[3]["value"].is_null());
    }

    // ========================================================================
    // YAML Formatter Tests
    // ========================================================================

    #[test]
    fn test_yaml_formatter_keeps_order() {
        let output = YamlFormatter::new(false)
            .format(&create_test_entries())
            .unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "app_id: com.example.app");
        assert!(lines[1].starts_with("api_token:"));
        assert!(lines[1].contains(MASK));
        assert_eq!(lines[2], "clean: false");
        assert_eq!(lines[3], "output_name: null");
    }

    // ========================================================================
    // Dotenv Formatter Tests
    // ========================================================================

    #[test]
    fn test_dotenv_formatter() {
        let output = DotenvFormatter::new(false)
            .format(&create_test_entries())
            .unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines,
            vec![
                "APP_ID=com.example.app",
                "API_TOKEN=\"********\"",
                "CLEAN=false",
            ]
        );
    }

    #[test]
    fn test_dotenv_quotes_special_values() {
        assert_eq!(dotenv_value("plain.value"), "plain.value");
        assert_eq!(dotenv_value("two words"), "\"two words\"");
        assert_eq!(dotenv_value("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(dotenv_value(""), "\"\"");
    }

    #[test]
    fn test_dotenv_collections_as_json() {
        let entries = vec![entry(
            "targets",
            Some(Value::from(vec!["App", "Tests"])),
            Source::Default,
        )];
        let output = DotenvFormatter::new(false).format(&entries).unwrap();
        assert_eq!(output, "TARGETS=\"[\\\"App\\\",\\\"Tests\\\"]\"");
    }
}
