//! Environment variable access.
//!
//! The engine never reads the process environment directly; it goes through
//! an [`Environment`] held by the [`Context`](crate::Context). This module
//! also decides whether the process runs unattended (CI or test).

use std::collections::HashMap;
use std::env;
use std::io::IsTerminal;

use crate::value::parse_bool;

/// Environment variable forcing non-interactive resolution.
pub const NON_INTERACTIVE_ENV: &str = "KNOB_NON_INTERACTIVE";

/// Variables set by common continuous-integration services.
const CI_VARIABLES: &[&str] = &[
    "CI",
    "CONTINUOUS_INTEGRATION",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "JENKINS_URL",
    "TRAVIS",
    "CIRCLECI",
    "BUILDKITE",
    "TF_BUILD",
    "TEAMCITY_VERSION",
];

/// Source of environment variables.
pub trait Environment {
    /// Value of the variable, or `None` when it is not set.
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

/// A fixed set of variables, for tests and embedding.
///
/// # Examples
///
/// ```
/// use knob::{Environment, MapEnvironment};
///
/// let env = MapEnvironment::new().with("APP_ID", "com.example.app");
/// assert_eq!(env.var("APP_ID").as_deref(), Some("com.example.app"));
/// assert!(env.var("HOME").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl Environment for MapEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Decide whether prompting must be avoided.
///
/// True when `KNOB_NON_INTERACTIVE` is truthy, when a CI service variable
/// is set to anything but a false value, or when stdin is not a terminal.
#[must_use]
pub fn detect_non_interactive(env: &dyn Environment) -> bool {
    if let Some(value) = env.var(NON_INTERACTIVE_ENV) {
        if let Some(flag) = parse_bool(&value) {
            return flag;
        }
    }

    if CI_VARIABLES
        .iter()
        .filter_map(|name| env.var(name))
        .any(|value| !value.is_empty() && parse_bool(&value) != Some(false))
    {
        return true;
    }

    !std::io::stdin().is_terminal()
}
