//! Get command implementation.
//!
//! Resolves one option and prints its bare value, for use in scripts.

use crate::error::CliError;
use crate::utils::{build_configuration, render_value, GlobalOptions};
use clap::Args;

/// Resolve a single option.
#[derive(Args)]
pub struct GetCommand {
    /// Option key
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Do not prompt for a missing required value
    #[arg(long)]
    pub no_prompt: bool,
}

impl GetCommand {
    /// Execute the get command.
    ///
    /// An option that resolves to no value is a semantic failure (exit 1).
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut config = build_configuration(global)?;

        match config.fetch(&self.key, !self.no_prompt)? {
            Some(value) => {
                println!("{}", render_value(&value));
                Ok(())
            }
            None => Err(CliError::SemanticFailure(format!(
                "'{}' has no value",
                self.key
            ))),
        }
    }
}
