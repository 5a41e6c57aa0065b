//! Build script for knob-cli.
//!
//! Renders the knob(1) man page into OUT_DIR with clap_mangen. The command
//! is rebuilt here because a build script cannot depend on its own crate.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Keep synchronized with src/cli.rs.
fn build_cli() -> Command {
    Command::new("knob")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Resolve build-tool options from values, environment, defaults and prompts")
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("manifest")
                .long("manifest")
                .help("Manifest declaring the options")
                .value_name("PATH")
                .global(true)
                .env("KNOB_MANIFEST")
                .default_value("knob.yaml"),
        )
        .arg(
            Arg::new("config-file")
                .long("config-file")
                .help("Name of a configuration file to load values from")
                .value_name("NAME")
                .global(true)
                .env("KNOB_CONFIG_FILE"),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .help("Set an option value (repeatable)")
                .value_name("KEY=VALUE")
                .global(true)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("non-interactive")
                .long("non-interactive")
                .help("Never prompt; fail on missing required values instead")
                .global(true)
                .action(ArgAction::SetTrue)
                .env("KNOB_NON_INTERACTIVE"),
        )
        .arg(
            Arg::new("trace")
                .long("trace")
                .help("Report where every resolved value came from")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommands(vec![
            Command::new("resolve").about("Resolve and print every option"),
            Command::new("get").about("Resolve and print a single option"),
            Command::new("keys").about("List declared options"),
            Command::new("check").about("Check the manifest, values and configuration file"),
            Command::new("completions").about("Generate shell completion scripts"),
        ])
}

fn main() -> io::Result<()> {
    let out_dir = std::env::var("OUT_DIR").map_err(io::Error::other)?;
    let man_dir = PathBuf::from(out_dir).join("man");
    fs::create_dir_all(&man_dir)?;

    let mut buffer = Vec::new();
    Man::new(build_cli()).render(&mut buffer)?;
    fs::write(man_dir.join("knob.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    Ok(())
}
