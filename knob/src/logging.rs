//! Operator-facing diagnostics.
//!
//! A [`Logger`] travels inside the resolution [`Context`](crate::Context)
//! and writes prefixed lines to stderr. Besides the usual severities it
//! renders resolution traces, masking sensitive values, when a
//! configuration carries a truthy `trace` value.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::configuration::Resolution;
use crate::option::OptionSpec;

/// Environment variable selecting the default log level.
pub const LOG_MODE_ENV: &str = "KNOB_LOG_MODE";

/// How much the logger prints, from least to most.
///
/// # Examples
///
/// ```
/// use knob::LogLevel;
///
/// assert!(LogLevel::Quiet < LogLevel::Normal);
/// assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Verbose);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Nothing but command output.
    Quiet,
    /// Errors, warnings and resolution traces.
    Normal,
    /// Everything, including info and debug lines.
    Verbose,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Quiet => "quiet",
            Self::Normal => "normal",
            Self::Verbose => "verbose",
        })
    }
}

impl FromStr for LogLevel {
    type Err = String;

    /// Case-insensitive; `silent` and `debug` are accepted as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "silent" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" | "debug" => Ok(Self::Verbose),
            _ => Err(format!("unknown log mode '{s}'")),
        }
    }
}

/// Writes diagnostics to stderr according to its [`LogLevel`].
///
/// # Examples
///
/// ```
/// use knob::{Logger, LogLevel};
///
/// let logger = Logger::new(LogLevel::Normal);
/// logger.warn("option 'scheme' is deprecated");
/// logger.debug("not printed below Verbose");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    /// Creates a logger printing at `level`.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// The level this logger prints at.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    fn emit(&self, min: LogLevel, prefix: &str, message: &str) {
        if self.level >= min {
            eprintln!("{prefix}: {message}");
        }
    }

    /// Logs an error; silent only when Quiet.
    pub fn error(&self, message: &str) {
        self.emit(LogLevel::Normal, "ERROR", message);
    }

    /// Logs a warning; silent only when Quiet.
    pub fn warn(&self, message: &str) {
        self.emit(LogLevel::Normal, "WARN", message);
    }

    /// Logs an informational line at Verbose.
    pub fn info(&self, message: &str) {
        self.emit(LogLevel::Verbose, "INFO", message);
    }

    /// Logs a debug line at Verbose.
    pub fn debug(&self, message: &str) {
        self.emit(LogLevel::Verbose, "DEBUG", message);
    }

    /// Reports where a resolved value came from.
    ///
    /// `option` is the declaration of the resolved key; values of
    /// sensitive options are masked.
    pub fn resolution(&self, resolution: &Resolution, option: Option<&OptionSpec>) {
        self.emit(
            LogLevel::Normal,
            "TRACE",
            &resolution_line(resolution, option),
        );
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Normal)
    }
}

/// `key = value (source)`, with `<none>` for an absent value.
fn resolution_line(resolution: &Resolution, option: Option<&OptionSpec>) -> String {
    let shown = match (&resolution.value, option) {
        (Some(value), Some(option)) => option.display_value(value),
        (Some(value), None) => value.to_string(),
        (None, _) => "<none>".to_string(),
    };
    format!("{} = {shown} ({})", resolution.key, resolution.source)
}

/// Picks the logger level from the command-line switches, then
/// `KNOB_LOG_MODE`, then Normal.
///
/// `verbose` wins over `quiet`; an unrecognised `KNOB_LOG_MODE` is ignored.
///
/// # Examples
///
/// ```
/// use knob::{init_logger, LogLevel};
///
/// assert_eq!(init_logger(true, true).level(), LogLevel::Verbose);
/// ```
#[must_use]
pub fn init_logger(verbose: bool, quiet: bool) -> Logger {
    let level = if verbose {
        LogLevel::Verbose
    } else if quiet {
        LogLevel::Quiet
    } else {
        env::var(LOG_MODE_ENV)
            .ok()
            .and_then(|mode| mode.parse().ok())
            .unwrap_or(LogLevel::Normal)
    };
    Logger::new(level)
}
