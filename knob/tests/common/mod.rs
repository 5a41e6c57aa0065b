//! Common test utilities for integration tests.
//!
//! This module provides fixtures for declaring options and building
//! configurations in the knob library's integration tests.

use std::collections::BTreeMap;
use std::env;

use knob::{
    Configuration, Context, Environment, LogLevel, Logger, MapEnvironment, OptionSpec, Value,
    ValueKind,
};

/// A quiet logger, so test output stays readable.
#[allow(dead_code)]
pub fn quiet() -> Logger {
    Logger::new(LogLevel::Quiet)
}

/// An unattended context reading variables from `env`.
#[allow(dead_code)]
pub fn unattended(env: impl Environment + 'static) -> Context {
    Context::new(quiet(), true).with_environment(env)
}

/// Builds a value map from key/value pairs.
#[allow(dead_code)]
pub fn values<const N: usize>(pairs: [(&str, Value); N]) -> BTreeMap<String, Value> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Options resembling those of an application build action.
///
/// - `app_id`: required, `APP_ID`, must look like a reverse-DNS identifier
/// - `scheme`: required, `KNOB_TEST_SCHEME`, default `App`
/// - `clean`: optional boolean
/// - `jobs`: optional integer between 1 and 64
/// - `output_name`: optional string
#[allow(dead_code)]
pub fn build_options() -> Vec<OptionSpec> {
    vec![
        OptionSpec::builder("app_id")
            .description("Bundle identifier")
            .env_name("APP_ID")
            .short_option('a')
            .verify(|v| match v.as_str() {
                Some(s) if s.contains('.') => Ok(()),
                _ => Err("must be a reverse-DNS identifier".into()),
            })
            .build()
            .unwrap(),
        OptionSpec::builder("scheme")
            .description("Scheme to build")
            .env_name("KNOB_TEST_SCHEME")
            .short_option('s')
            .default_value("App")
            .build()
            .unwrap(),
        OptionSpec::builder("clean")
            .description("Clean before building")
            .kind(ValueKind::Boolean)
            .optional(true)
            .build()
            .unwrap(),
        OptionSpec::builder("jobs")
            .kind(ValueKind::Integer)
            .optional(true)
            .verify(|v| match v.as_f64() {
                Some(n) if (1.0..=64.0).contains(&n) => Ok(()),
                _ => Err("must be between 1 and 64".into()),
            })
            .build()
            .unwrap(),
        OptionSpec::builder("output_name")
            .optional(true)
            .build()
            .unwrap(),
    ]
}

/// An unattended configuration of [`build_options`].
#[allow(dead_code)]
pub fn build_configuration(
    initial: BTreeMap<String, Value>,
    env: impl Environment + 'static,
) -> Configuration {
    Configuration::new(build_options(), initial, unattended(env)).unwrap()
}

/// An empty environment.
#[allow(dead_code)]
pub fn no_env() -> MapEnvironment {
    MapEnvironment::new()
}

/// Sets a process environment variable for the guard's lifetime.
///
/// Tests using this must be `#[serial]`.
#[allow(dead_code)]
pub struct EnvGuard {
    key: String,
    old_value: Option<String>,
}

#[allow(dead_code)]
impl EnvGuard {
    pub fn new(key: &str, value: &str) -> Self {
        let old_value = env::var(key).ok();
        env::set_var(key, value);
        Self {
            key: key.to_string(),
            old_value,
        }
    }

    /// Create a guard that removes the env var.
    pub fn remove(key: &str) -> Self {
        let old_value = env::var(key).ok();
        env::remove_var(key);
        Self {
            key: key.to_string(),
            old_value,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.old_value {
            Some(val) => env::set_var(&self.key, val),
            None => env::remove_var(&self.key),
        }
    }
}
