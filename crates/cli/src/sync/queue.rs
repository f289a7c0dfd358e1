// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mutation queue for offline writes.
//!
//! Writes made while offline are appended here and replayed in insertion
//! order once connectivity returns. The queue is a thin view over the
//! store's mutation table: every call reads or writes storage, nothing is
//! cached in memory.

use std::sync::Arc;

use notesync_core::{MutationId, MutationUpdate, NewMutation, QueuedMutation, Store};

use crate::error::Result;

/// Persistent FIFO of pending writes.
#[derive(Clone)]
pub struct MutationQueue {
    store: Arc<dyn Store>,
}

impl MutationQueue {
    /// Create a queue backed by `store`.
    pub fn new(store: Arc<dyn Store>) -> Self {
        MutationQueue { store }
    }

    /// Append a write to the tail of the queue.
    pub async fn append(&self, mutation: NewMutation) -> Result<QueuedMutation> {
        let queued = self.store.cache_mutation(mutation).await?;
        tracing::debug!(id = %queued.id, method = %queued.method, url = %queued.url, "queued mutation");
        Ok(queued)
    }

    /// All pending writes, oldest first.
    pub async fn list(&self) -> Result<Vec<QueuedMutation>> {
        Ok(self.store.list_mutations().await?)
    }

    /// Record bookkeeping for a replay attempt.
    pub async fn update(&self, id: MutationId, update: MutationUpdate) -> Result<()> {
        Ok(self.store.update_mutation(id, update).await?)
    }

    /// Drop a write once the server accepted it.
    pub async fn remove(&self, id: MutationId) -> Result<()> {
        self.store.remove_mutation(id).await?;
        tracing::debug!(%id, "removed mutation");
        Ok(())
    }

    /// Number of pending writes, read fresh from storage.
    pub async fn len(&self) -> Result<usize> {
        Ok(self.list().await?.len())
    }
}
