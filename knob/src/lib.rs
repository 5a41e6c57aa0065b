#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # knob
//!
//! A library for resolving the options of command-line build tooling.
//!
//! Options are declared once as [`OptionSpec`]s. A [`Configuration`] holds
//! the declared options and the values supplied for them, and resolves each
//! option on demand from, in order: the stored value, the option's
//! environment variable, its default, `false` for boolean options, and
//! finally an interactive prompt when the process is attended.
//!
//! ## Core Types
//!
//! - [`OptionSpec`] and [`OptionSpecBuilder`]: Option declarations
//! - [`Configuration`]: Value storage, validation and resolution
//! - [`Context`]: Injected interactivity, logger, prompter and environment
//! - [`Value`] and [`ValueKind`]: Option values and their declared kinds
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use std::collections::BTreeMap;
//! use knob::{Configuration, Context, Logger, OptionSpec, Value};
//!
//! let options = vec![
//!     OptionSpec::builder("scheme").default_value("App").build().unwrap(),
//!     OptionSpec::builder("output_name").optional(true).build().unwrap(),
//! ];
//! let mut config =
//!     Configuration::new(options, BTreeMap::new(), Context::new(Logger::default(), true)).unwrap();
//!
//! assert_eq!(config.fetch("scheme", true).unwrap(), Some(Value::from("App")));
//! assert_eq!(config.fetch("output_name", true).unwrap(), None);
//!
//! config.set("scheme", "Tests").unwrap();
//! assert_eq!(config.fetch("scheme", true).unwrap(), Some(Value::from("Tests")));
//! ```

pub mod configuration;
pub mod context;
pub mod environment;
pub mod error;
pub mod key;
pub mod loader;
pub mod logging;
pub mod manifest;
pub mod option;
pub mod output;
pub mod prompt;
pub mod value;

// Re-export key types at crate root for convenience
pub use configuration::{Configuration, Resolution, Source};
pub use context::Context;
pub use environment::{
    detect_non_interactive, Environment, MapEnvironment, ProcessEnvironment, NON_INTERACTIVE_ENV,
};
pub use error::{DuplicateKind, Error, Result};
pub use key::{OptionKey, TRACE_KEY};
pub use loader::ConfigFileLoader;
pub use logging::{init_logger, LogLevel, Logger};
pub use manifest::{CheckDecl, Manifest, OptionDecl};
pub use option::{OptionSpec, OptionSpecBuilder, Verifier, MASK};
pub use output::{OutputFormat, OutputFormatter, SummaryEntry};
pub use prompt::{Prompter, ScriptedPrompter, TerminalPrompter};
pub use value::{Value, ValueKind};
