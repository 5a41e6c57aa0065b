//! Main entry point for the knob CLI.
//!
//! Resolves the options declared in a manifest:
//! - `resolve`: resolve every option and print values with their sources
//! - `get`: print one resolved value
//! - `keys`: list declared options
//! - `check`: validate the manifest, values and configuration file

use clap::Parser;
use knob_cli::{Cli, Command, GlobalOptions};

fn main() {
    let cli = Cli::parse();

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        manifest: cli.manifest,
        config_file: cli.config_file,
        assignments: cli.assignments,
        non_interactive: cli.non_interactive,
        trace: cli.trace,
    };

    let result = match cli.command {
        Command::Resolve(cmd) => cmd.execute(&global),
        Command::Get(cmd) => cmd.execute(&global),
        Command::Keys(cmd) => cmd.execute(&global),
        Command::Check(cmd) => cmd.execute(&global),
        Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
