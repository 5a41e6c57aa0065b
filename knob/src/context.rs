//! Capabilities injected into a [`Configuration`](crate::Configuration).
//!
//! Everything the engine needs from the outside world (is the process
//! attended, where to log, how to prompt, how to read environment variables,
//! where to look for configuration files) is carried by a [`Context`].

use std::fmt;
use std::path::{Path, PathBuf};

use crate::environment::{detect_non_interactive, Environment, ProcessEnvironment};
use crate::logging::Logger;
use crate::prompt::{Prompter, TerminalPrompter};

/// Resolution context.
///
/// # Examples
///
/// ```
/// use knob::{Context, Logger, MapEnvironment, ScriptedPrompter};
///
/// let ctx = Context::new(Logger::default(), true)
///     .with_environment(MapEnvironment::new().with("APP_ID", "com.example.app"))
///     .with_prompter(ScriptedPrompter::new(Vec::<String>::new()));
///
/// assert!(ctx.is_non_interactive());
/// assert_eq!(ctx.environment().var("APP_ID").as_deref(), Some("com.example.app"));
/// ```
pub struct Context {
    non_interactive: bool,
    logger: Logger,
    prompter: Box<dyn Prompter>,
    environment: Box<dyn Environment>,
    working_dir: PathBuf,
}

impl Context {
    /// Creates a context reading the process environment and prompting on
    /// the terminal, rooted at the current directory.
    #[must_use]
    pub fn new(logger: Logger, non_interactive: bool) -> Self {
        Self {
            non_interactive,
            logger,
            prompter: Box::new(TerminalPrompter),
            environment: Box::new(ProcessEnvironment),
            working_dir: PathBuf::from("."),
        }
    }

    /// Creates a context whose interactivity is detected from the process
    /// environment and the terminal.
    #[must_use]
    pub fn detect(logger: Logger) -> Self {
        Self::new(logger, detect_non_interactive(&ProcessEnvironment))
    }

    /// Replaces the prompter.
    #[must_use]
    pub fn with_prompter(mut self, prompter: impl Prompter + 'static) -> Self {
        self.prompter = Box::new(prompter);
        self
    }

    /// Replaces the environment source.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Environment + 'static) -> Self {
        self.environment = Box::new(environment);
        self
    }

    /// Sets the directory configuration files are searched from.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// Overrides interactivity.
    #[must_use]
    pub const fn non_interactive(mut self, non_interactive: bool) -> Self {
        self.non_interactive = non_interactive;
        self
    }

    /// True under automated test or continuous-integration execution.
    #[must_use]
    pub const fn is_non_interactive(&self) -> bool {
        self.non_interactive
    }

    /// The operator-facing logger.
    #[must_use]
    pub const fn logger(&self) -> &Logger {
        &self.logger
    }

    /// The prompter.
    #[must_use]
    pub fn prompter(&self) -> &dyn Prompter {
        self.prompter.as_ref()
    }

    /// The environment source.
    #[must_use]
    pub fn environment(&self) -> &dyn Environment {
        self.environment.as_ref()
    }

    /// Directory configuration files are searched from.
    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("non_interactive", &self.non_interactive)
            .field("logger", &self.logger)
            .field("working_dir", &self.working_dir)
            .finish_non_exhaustive()
    }
}
