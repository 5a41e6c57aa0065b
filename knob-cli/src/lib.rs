//! Library half of the knob CLI.
//!
//! Exposes the argument structure and commands so the binary stays a thin
//! dispatcher and tests can exercise commands directly.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::{Cli, Command};
pub use error::CliError;
pub use utils::GlobalOptions;
