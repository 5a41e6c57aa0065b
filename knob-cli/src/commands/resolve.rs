//! Resolve command implementation.
//!
//! This module implements the `resolve` command, which resolves every
//! declared option and prints the values with their sources.

use crate::error::CliError;
use crate::utils::{build_configuration, GlobalOptions};
use clap::{Args, ValueEnum};

/// Resolve every option and print the result.
#[derive(Args)]
pub struct ResolveCommand {
    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "human",
        env = "KNOB_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: ResolveFormat,

    /// Print sensitive values in clear
    #[arg(long)]
    pub reveal: bool,

    /// Do not prompt for missing required values
    #[arg(long)]
    pub no_prompt: bool,
}

/// Output format for the resolve command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ResolveFormat {
    /// Aligned table with sources
    Human,
    /// JSON array
    Json,
    /// YAML mapping
    Yaml,
    /// NAME=value lines
    Dotenv,
}

impl From<ResolveFormat> for knob::OutputFormat {
    fn from(format: ResolveFormat) -> Self {
        match format {
            ResolveFormat::Human => Self::Human,
            ResolveFormat::Json => Self::Json,
            ResolveFormat::Yaml => Self::Yaml,
            ResolveFormat::Dotenv => Self::Dotenv,
        }
    }
}

impl ResolveCommand {
    /// Execute the resolve command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut config = build_configuration(global)?;

        if let Some(name) = config.config_file_name() {
            config
                .context()
                .logger()
                .info(&format!("Using configuration file {name}"));
        }

        let summary = config.summary(!self.no_prompt)?;
        let formatter = knob::OutputFormat::from(self.format).create_formatter(self.reveal);
        let output = formatter.format(&summary)?;

        if !output.is_empty() {
            println!("{output}");
        }

        Ok(())
    }
}
