//! Check command implementation.
//!
//! Builds the configuration and reports whether the manifest, the
//! command-line values and the configuration file are consistent.

use crate::error::CliError;
use crate::utils::{build_configuration, GlobalOptions};
use clap::Args;

/// Check the configuration without resolving values.
#[derive(Args)]
pub struct CheckCommand {
    /// Also resolve every option, failing on missing required values
    #[arg(long)]
    pub resolve: bool,
}

impl CheckCommand {
    /// Execute the check command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut config = build_configuration(global)?;

        if self.resolve {
            config.values(false)?;
        }

        if !global.quiet {
            println!(
                "Configuration is valid ({} options, {} values)",
                config.options().len(),
                config.raw_values().len()
            );
            if let Some(name) = config.config_file_name() {
                println!("Loaded {name}: {}", config.config_file_options().join(", "));
            }
        }

        Ok(())
    }
}
