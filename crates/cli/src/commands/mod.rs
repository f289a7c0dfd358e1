// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod domain;
pub mod flush;
pub mod queue;
pub mod request;
pub mod reset;
pub mod status;

use std::sync::Arc;

use notesync_core::{SqliteStore, Store};

use crate::cli::GlobalArgs;
use crate::config::Config;
use crate::connectivity::{Connectivity, ManualConnectivity};
use crate::error::Result;
use crate::sync::{EngineParts, HttpTransport, SyncEngine, Transport};

/// Everything a command needs: the resolved config and a wired engine.
pub struct Context {
    pub config: Config,
    pub engine: SyncEngine,
}

impl Context {
    /// Resolve configuration, open the store, and build the engine.
    ///
    /// The engine is not initialized; commands that replay call
    /// [`SyncEngine::initialize`] themselves.
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let config = Config::resolve(global.config.as_deref())?;
        let db_path = global.db.clone().unwrap_or_else(|| config.db_path());
        tracing::debug!(db = %db_path.display(), offline = global.offline, "opening offline store");

        let store: Arc<dyn Store> = Arc::new(SqliteStore::open(&db_path)?);
        let transport: Arc<dyn Transport> =
            Arc::new(HttpTransport::new(config.timeout(), &config.api.user_agent)?);
        let connectivity: Arc<dyn Connectivity> = Arc::new(ManualConnectivity::new(!global.offline));

        let engine = SyncEngine::new(EngineParts {
            store,
            transport,
            connectivity,
            base_url: config.api.base_url.clone(),
        });
        Ok(Context { config, engine })
    }
}

/// Pluralize `noun` for `count`.
pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
