#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// Isolated config and output directories for one test.
pub struct Workspace {
    dir: TempDir,
}

#[allow(dead_code)]
impl Workspace {
    /// Workspace with an empty config file (all defaults).
    pub fn new() -> Self {
        Self::with_config("")
    }

    pub fn with_config(toml: &str) -> Self {
        let dir = tempfile::tempdir().expect("failed to create test workspace");
        std::fs::write(dir.path().join("config.toml"), toml).expect("failed to write config");
        Self { dir }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("dailyupdated")
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// A `radiocat` command pointed at this workspace.
    pub fn cmd(&self) -> Command {
        let mut cmd = radiocat_cmd();
        cmd.env("RADIOCAT_CONFIG", self.config_path());
        cmd.arg("--output").arg(self.output_dir());
        cmd
    }
}

/// Create a configured `radiocat` command suitable for integration tests.
#[allow(dead_code)]
pub fn radiocat_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("radiocat"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env_remove("RADIOCAT_OUTPUT_DIR");
    cmd.env("NO_COLOR", "1");
    cmd
}
