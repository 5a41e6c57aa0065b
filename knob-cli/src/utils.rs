//! Utility functions for CLI operations.
//!
//! This module provides the pieces shared across CLI commands: global
//! options, parsing of `--set` assignments and building the configuration
//! from the manifest, the command line and the configuration file.

use crate::error::CliError;
use knob::{init_logger, Configuration, Context, Manifest, Value, TRACE_KEY};
use std::path::PathBuf;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Manifest declaring the options.
    pub manifest: PathBuf,

    /// Name of a configuration file to load.
    pub config_file: Option<String>,

    /// `--set` assignments, in command-line order.
    pub assignments: Vec<(String, String)>,

    /// Never prompt.
    pub non_interactive: bool,

    /// Report where resolved values come from.
    pub trace: bool,
}

/// Parse a `KEY=VALUE` assignment.
///
/// The value may be empty and may itself contain `=`.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, found '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Build the resolution context from the global options.
pub fn build_context(global: &GlobalOptions) -> Context {
    let logger = init_logger(global.verbose, global.quiet);
    let context = Context::detect(logger);
    if global.non_interactive {
        context.non_interactive(true)
    } else {
        context
    }
}

/// Build the configuration.
///
/// Values come from, in decreasing priority: `--set` assignments, the
/// manifest's `values` section, and the configuration file. Assignments
/// join the initial values, so they go through every construction check
/// and mask the defaults of the options they set.
pub fn build_configuration(global: &GlobalOptions) -> Result<Configuration, CliError> {
    if !global.manifest.is_file() {
        return Err(CliError::InvalidArguments(format!(
            "manifest not found: {}",
            global.manifest.display()
        )));
    }

    let mut manifest = Manifest::load(&global.manifest)?;
    let context = build_context(global);

    for (key, value) in &global.assignments {
        let replaced = manifest
            .values
            .insert(key.clone(), Value::String(value.clone()));
        if replaced.is_some() {
            context
                .logger()
                .debug(&format!("'{key}' from --set replaces the manifest value"));
        }
    }

    if global.trace {
        manifest
            .values
            .insert(TRACE_KEY.to_string(), Value::Bool(true));
    }

    let mut config = manifest.into_configuration(context)?;
    config.load_configuration_file(global.config_file.as_deref())?;

    Ok(config)
}

/// Render a single value for plain output.
///
/// Collections are printed as JSON, scalars as text.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Array(_) | Value::Map(_) => {
            serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
        }
        other => other.to_string(),
    }
}
