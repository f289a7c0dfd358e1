// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! The variable name constants are generated by `build.rs` and live in the
//! [`vars`] submodule.

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

/// Returns the value of `NOTESYNC_CONFIG` if set.
pub fn config_path() -> Option<PathBuf> {
    non_empty(vars::NOTESYNC_CONFIG).map(PathBuf::from)
}

/// Returns the value of `NOTESYNC_DATA_DIR` if set.
pub fn data_dir() -> Option<PathBuf> {
    non_empty(vars::NOTESYNC_DATA_DIR).map(PathBuf::from)
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
