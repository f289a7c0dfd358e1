// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! State shared by the engine, the request gate, and the offline transport.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};

use super::queue::MutationQueue;
use crate::connectivity::Connectivity;
use crate::error::Result;
use crate::observers::Subscription;
use crate::status::{StatusBroadcaster, StatusSnapshot};

/// Mutable sync bookkeeping. Never held across an await.
#[derive(Debug, Clone, Default)]
pub(crate) struct SyncRecord {
    pub queue_length: usize,
    pub is_syncing: bool,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

pub(crate) struct SyncState {
    connectivity: Arc<dyn Connectivity>,
    broadcaster: StatusBroadcaster,
    record: Mutex<SyncRecord>,
    flushing: AtomicBool,
}

impl SyncState {
    pub fn new(connectivity: Arc<dyn Connectivity>) -> Self {
        let initial = StatusSnapshot {
            is_online: connectivity.is_online(),
            ..Default::default()
        };
        SyncState {
            connectivity,
            broadcaster: StatusBroadcaster::new(initial),
            record: Mutex::new(SyncRecord::default()),
            flushing: AtomicBool::new(false),
        }
    }

    pub fn connectivity(&self) -> &dyn Connectivity {
        self.connectivity.as_ref()
    }

    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    /// Apply `f` to the record.
    pub fn update<F: FnOnce(&mut SyncRecord)>(&self, f: F) {
        let mut record = self.record.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut record);
    }

    /// Current state with connectivity read live.
    pub fn snapshot(&self) -> StatusSnapshot {
        let record = self
            .record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        StatusSnapshot {
            is_online: self.is_online(),
            queue_length: record.queue_length,
            is_syncing: record.is_syncing,
            last_synced_at: record.last_synced_at,
            last_error: record.last_error,
        }
    }

    /// Subscribe to status, starting from the live snapshot rather than the
    /// last published one.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&StatusSnapshot) + Send + Sync + 'static,
    {
        self.broadcaster.subscribe_from(self.snapshot(), listener)
    }

    /// Broadcast the current state to status subscribers.
    pub fn publish(&self) {
        self.broadcaster.publish(self.snapshot());
    }

    /// Re-derive the queue length from storage and publish it.
    pub async fn refresh_queue_length(&self, queue: &MutationQueue) -> Result<usize> {
        let length = queue.len().await?;
        self.update(|record| record.queue_length = length);
        self.publish();
        Ok(length)
    }

    /// Claim the single flush slot. `None` if a flush is already running.
    pub fn try_begin_flush(&self) -> Option<FlushGuard<'_>> {
        self.flushing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlushGuard { state: self })
    }

    pub fn is_flushing(&self) -> bool {
        self.flushing.load(Ordering::Acquire)
    }
}

/// Releases the flush slot on drop, including on error paths.
pub(crate) struct FlushGuard<'a> {
    state: &'a SyncState,
}

impl Drop for FlushGuard<'_> {
    fn drop(&mut self) {
        self.state.flushing.store(false, Ordering::Release);
    }
}
