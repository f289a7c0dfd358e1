// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Isolated config + database for one test.
pub struct Sandbox {
    pub temp: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("config.toml"),
            "[api]\nbase_url = \"https://api.example.test/v1\"\ntimeout_secs = 2\n",
        )
        .unwrap();
        Sandbox { temp }
    }

    /// `notesync` pointed at this sandbox, always offline.
    pub fn offline(&self) -> Command {
        let mut cmd = self.online();
        cmd.arg("--offline");
        cmd
    }

    /// `notesync` pointed at this sandbox, with connectivity left on.
    pub fn online(&self) -> Command {
        let mut cmd = self.bare();
        cmd.arg("--config").arg(self.temp.path().join("config.toml"));
        cmd
    }

    /// `notesync` with only the sandbox database set.
    pub fn bare(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("notesync");
        cmd.arg("--db")
            .arg(self.temp.path().join("offline.db"))
            .env_remove("NOTESYNC_CONFIG")
            .env_remove("NOTESYNC_DATA_DIR")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Queue a write while offline and assert it was accepted.
    pub fn queue_write(&self, method: &str, path: &str, body: &str) {
        let mut cmd = self.offline();
        cmd.args(["request", method, path]);
        if !body.is_empty() {
            cmd.args(["-d", body]);
        }
        cmd.assert()
            .success()
            .stdout(predicate::str::contains("HTTP 202 (offline: queued)"));
    }
}
