//! Keys command implementation.
//!
//! Lists the options declared by the manifest without resolving them.

use crate::error::CliError;
use crate::utils::{build_configuration, render_value, GlobalOptions};
use clap::{Args, ValueEnum};
use knob::OptionSpec;
use serde::Serialize;

/// List declared options.
#[derive(Args)]
pub struct KeysCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "table", ignore_case = true)]
    pub format: KeysFormat,
}

/// Output format for the keys command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum KeysFormat {
    /// Aligned table (human-readable)
    Table,
    /// JSON format
    Json,
}

#[derive(Serialize)]
struct KeyRow<'a> {
    key: &'a str,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    env_name: Option<&'a str>,
    optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<String>,
    description: &'a str,
}

impl<'a> KeyRow<'a> {
    fn new(option: &'a OptionSpec) -> Self {
        Self {
            key: option.key(),
            kind: option.kind().to_string(),
            env_name: option.env_name(),
            optional: option.is_optional(),
            default: option.default_value().map(|v| {
                if option.is_sensitive() {
                    option.display_value(v)
                } else {
                    render_value(v)
                }
            }),
            description: option.description(),
        }
    }
}

impl KeysCommand {
    /// Execute the keys command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = build_configuration(global)?;
        let rows: Vec<KeyRow<'_>> = config.options().iter().map(KeyRow::new).collect();

        match self.format {
            KeysFormat::Json => {
                let json = serde_json::to_string_pretty(&rows).map_err(|e| {
                    CliError::Library(knob::Error::Serialization(e.to_string()))
                })?;
                println!("{json}");
            }
            KeysFormat::Table => print!("{}", format_table(&rows)),
        }

        Ok(())
    }
}

fn format_table(rows: &[KeyRow<'_>]) -> String {
    let key_width = rows.iter().map(|r| r.key.len()).max().unwrap_or(0).max(3);
    let kind_width = rows.iter().map(|r| r.kind.len()).max().unwrap_or(0).max(4);
    let env_width = rows
        .iter()
        .map(|r| r.env_name.map_or(1, str::len))
        .max()
        .unwrap_or(0)
        .max(3);

    let mut out = format!(
        "{:<key_width$}  {:<kind_width$}  {:<env_width$}  REQUIRED  DESCRIPTION\n",
        "KEY", "KIND", "ENV"
    );
    for row in rows {
        let required = if row.optional { "no" } else { "yes" };
        out.push_str(&format!(
            "{:<key_width$}  {:<kind_width$}  {:<env_width$}  {:<8}  {}\n",
            row.key,
            row.kind,
            row.env_name.unwrap_or("-"),
            required,
            row.description
        ));
    }
    out
}
