// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::FutureExt;
use notesync_core::{SqliteStore, Store};

use super::engine::{EngineParts, SyncEngine};
use super::transport::Transport;
use super::transport_tests::MockTransport;
use crate::connectivity::{Connectivity, ManualConnectivity};
use crate::observers::Subscription;
use crate::status::StatusSnapshot;

/// API base used by every harness.
pub const BASE: &str = "https://api.example.test/v1";

/// Absolute URL under [`BASE`].
pub fn api(path: &str) -> String {
    format!("{BASE}{path}")
}

/// An engine wired to an in-memory store, a mock network, and manual connectivity.
pub struct Harness {
    pub engine: SyncEngine,
    pub store: Arc<SqliteStore>,
    pub transport: Arc<MockTransport>,
    pub connectivity: Arc<ManualConnectivity>,
}

impl Harness {
    pub fn new(online: bool) -> Self {
        Self::with_store(online, Arc::new(SqliteStore::open_in_memory().unwrap()))
    }

    pub fn with_store(online: bool, store: Arc<SqliteStore>) -> Self {
        let transport = Arc::new(MockTransport::new());
        let connectivity = Arc::new(ManualConnectivity::new(online));
        let engine = SyncEngine::new(EngineParts {
            store: Arc::clone(&store) as Arc<dyn Store>,
            transport: Arc::clone(&transport) as Arc<dyn Transport>,
            connectivity: Arc::clone(&connectivity) as Arc<dyn Connectivity>,
            base_url: Some(BASE.to_string()),
        });
        Harness {
            engine,
            store,
            transport,
            connectivity,
        }
    }

    /// Rows in the mutation table, read synchronously.
    pub fn stored_queue_len(&self) -> usize {
        stored_queue_len(&self.store)
    }
}

/// The SQLite store completes its futures eagerly, so this never blocks.
pub fn stored_queue_len(store: &SqliteStore) -> usize {
    store
        .list_mutations()
        .now_or_never()
        .expect("sqlite futures are ready")
        .unwrap()
        .len()
}

/// Subscribe a listener that records every snapshot it receives.
pub fn record_status(engine: &SyncEngine) -> (Arc<Mutex<Vec<StatusSnapshot>>>, Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let inner = Arc::clone(&seen);
    let sub = engine.subscribe_status(move |s| inner.lock().unwrap().push(s.clone()));
    (seen, sub)
}

/// Poll `condition` until it holds, failing after a second.
pub async fn eventually<F: Fn() -> bool>(condition: F) {
    tokio::time::timeout(Duration::from_secs(1), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not met within timeout");
}
