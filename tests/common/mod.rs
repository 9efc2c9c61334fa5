//! Common test utilities for docket integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's `~/.local/share/docket/` directory.

#![allow(dead_code)]

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with an isolated data directory.
///
/// The `dk()` method returns a `Command` that sets `DK_DATA_DIR`
/// per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with an isolated data directory.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a new test environment and initialize the task database.
    pub fn init() -> Self {
        let env = Self::new();
        env.dk().arg("init").assert().success();
        env
    }

    /// Get a Command for the dk binary with isolated data directory.
    ///
    /// Sets `DK_DATA_DIR` per-command for parallel safety.
    pub fn dk(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_dk"));
        cmd.env("DK_DATA_DIR", self.data_dir.path());
        cmd
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
