//! Command implementations for the knob CLI.
//!
//! Each command lives in its own module and exposes an `execute` method
//! taking the global options.

pub mod check;
pub mod completions;
pub mod get;
pub mod keys;
pub mod resolve;

pub use check::CheckCommand;
pub use completions::CompletionsCommand;
pub use get::GetCommand;
pub use keys::KeysCommand;
pub use resolve::ResolveCommand;
