// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync status snapshots and their broadcaster.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::observers::{Observers, Subscription};

/// Point-in-time view of sync health.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub is_online: bool,
    /// Number of unresolved queued mutations.
    pub queue_length: usize,
    pub is_syncing: bool,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Publishes [`StatusSnapshot`]s to any number of subscribers.
///
/// The broadcaster remembers the last published snapshot so a late
/// subscriber receives it immediately instead of waiting for the next change.
pub struct StatusBroadcaster {
    current: Mutex<StatusSnapshot>,
    observers: Observers<StatusSnapshot>,
}

impl StatusBroadcaster {
    /// Create a broadcaster whose current snapshot is `initial`.
    pub fn new(initial: StatusSnapshot) -> Self {
        StatusBroadcaster {
            current: Mutex::new(initial),
            observers: Observers::new(),
        }
    }

    /// Register a listener and deliver the current snapshot to it right away.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&StatusSnapshot) + Send + Sync + 'static,
    {
        self.subscribe_from(self.current(), listener)
    }

    /// Record `current` without notifying anyone, then register `listener`
    /// and deliver `current` to it alone.
    pub fn subscribe_from<F>(&self, current: StatusSnapshot, listener: F) -> Subscription
    where
        F: Fn(&StatusSnapshot) + Send + Sync + 'static,
    {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = current.clone();
        if catch_unwind(AssertUnwindSafe(|| listener(&current))).is_err() {
            tracing::warn!("status listener panicked on initial delivery");
        }
        self.observers.subscribe(listener)
    }

    /// Record `snapshot` as current and deliver it to every subscriber.
    pub fn publish(&self, snapshot: StatusSnapshot) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = snapshot.clone();
        self.observers.notify(&snapshot);
    }

    /// The last published snapshot.
    pub fn current(&self) -> StatusSnapshot {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for StatusBroadcaster {
    fn default() -> Self {
        Self::new(StatusSnapshot::default())
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
