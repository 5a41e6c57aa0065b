//! Common test utilities for CLI integration tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Manifest used by most CLI tests.
pub const MANIFEST: &str = r"
options:
  - key: app_id
    description: Bundle identifier
    env_name: KNOB_TEST_APP_ID
    check: { non_empty: true }
  - key: scheme
    env_name: KNOB_TEST_SCHEME
    default: App
  - key: configuration
    choices: [Debug, Release]
    default: Release
  - key: clean
    kind: boolean
    optional: true
  - key: api_token
    env_name: KNOB_TEST_API_TOKEN
    sensitive: true
    optional: true
";

/// Variables that would leak the caller's setup into a test run.
const SCRUBBED_VARS: [&str; 8] = [
    "KNOB_MANIFEST",
    "KNOB_CONFIG_FILE",
    "KNOB_OUTPUT_FORMAT",
    "KNOB_LOG_MODE",
    "KNOB_NON_INTERACTIVE",
    "KNOB_TEST_APP_ID",
    "KNOB_TEST_SCHEME",
    "KNOB_TEST_API_TOKEN",
];

/// Isolated working directory holding a manifest.
pub struct TestEnv {
    temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create an environment with the default manifest.
    pub fn new() -> Self {
        Self::with_manifest(MANIFEST)
    }

    /// Create an environment with the given manifest as `knob.yaml`.
    pub fn with_manifest(manifest: &str) -> Self {
        let env = Self {
            temp_dir: tempfile::tempdir().expect("Failed to create temp dir"),
        };
        env.write("knob.yaml", manifest);
        env
    }

    /// The working directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a file relative to the working directory.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// A `knob` command running in the working directory, never prompting.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("knob").expect("Failed to find knob binary");
        for var in SCRUBBED_VARS {
            cmd.env_remove(var);
        }
        cmd.current_dir(self.path()).arg("--non-interactive");
        cmd
    }
}
