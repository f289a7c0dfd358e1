// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! notesync configuration.
//!
//! Configuration is stored as TOML (by default in the user config directory,
//! `notesync/config.toml`) and includes:
//! - `[api]`: `base_url` for relative request URLs, `timeout_secs`, `user_agent`
//! - `[storage]`: `path` to the offline database

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env;
use crate::error::{Error, Result};

const APP_DIR_NAME: &str = "notesync";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "offline.db";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base for relative request URLs (e.g. `https://notes.example.com/api`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("notesync/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: None,
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Local storage settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database path. Defaults to the user data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Config {
    /// Loads and validates the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, else the default location if a file exists there.
    ///
    /// An explicitly named file must exist; a missing default file yields
    /// the default configuration.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Writes the configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Checks values that cannot be expressed in the TOML types.
    pub fn validate(&self) -> Result<()> {
        if let Some(base) = &self.api.base_url {
            notesync_core::normalize_url(None, base, &Default::default())
                .map_err(|e| Error::Config(format!("invalid api.base_url: {}", e)))?;
        }
        if self.api.timeout_secs == 0 {
            return Err(Error::Config("api.timeout_secs must be at least 1".into()));
        }
        Ok(())
    }

    /// Database path from `[storage]`, or the default location.
    pub fn db_path(&self) -> PathBuf {
        self.storage.path.clone().unwrap_or_else(default_db_path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

/// `NOTESYNC_CONFIG`, else `<config dir>/notesync/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    env::config_path().or_else(|| {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    })
}

/// `<data dir>/offline.db`, where the data dir is `NOTESYNC_DATA_DIR` or
/// `<local data dir>/notesync`.
pub fn default_db_path() -> PathBuf {
    let dir = env::data_dir().unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    });
    dir.join(DB_FILE_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
