//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CheckCommand, CompletionsCommand, GetCommand, KeysCommand, ResolveCommand,
};
use crate::utils::parse_assignment;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for resolving build-tool options.
#[derive(Parser)]
#[command(name = "knob")]
#[command(
    version,
    about = "Resolve build-tool options from values, environment, defaults and prompts",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Manifest declaring the options
    #[arg(
        long,
        value_name = "PATH",
        global = true,
        env = "KNOB_MANIFEST",
        default_value = "knob.yaml"
    )]
    pub manifest: PathBuf,

    /// Name of a configuration file to load values from
    #[arg(long, value_name = "NAME", global = true, env = "KNOB_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Set an option value (repeatable)
    #[arg(
        long = "set",
        value_name = "KEY=VALUE",
        global = true,
        value_parser = parse_assignment
    )]
    pub assignments: Vec<(String, String)>,

    /// Never prompt; fail on missing required values instead
    #[arg(long, global = true, env = "KNOB_NON_INTERACTIVE")]
    pub non_interactive: bool,

    /// Report where every resolved value came from
    #[arg(long, global = true)]
    pub trace: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Resolve and print every option
    Resolve(ResolveCommand),

    /// Resolve and print a single option
    Get(GetCommand),

    /// List declared options
    Keys(KeysCommand),

    /// Check the manifest, values and configuration file
    Check(CheckCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
