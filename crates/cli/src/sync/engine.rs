// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The sync engine: owns the queue, the gate, and the flush loop.
//!
//! A [`SyncEngine`] is a cheap, cloneable handle. All clones share one
//! state record, one status broadcaster, and one single-flight flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use chrono::{DateTime, Utc};
use notesync_core::{DomainKind, DomainRecord, MutationId, MutationUpdate, QueuedMutation, Store};
use tokio::sync::mpsc;

use super::gate::RequestGate;
use super::offline::OfflineTransport;
use super::projector::DomainProjector;
use super::queue::MutationQueue;
use super::state::SyncState;
use super::transport::{ApiRequest, ApiResponse, Transport, REPLAY_HEADER, REVISION_HEADER};
use crate::connectivity::Connectivity;
use crate::error::Result;
use crate::observers::Subscription;
use crate::status::StatusSnapshot;

/// Metadata key holding the last completed sync time (RFC 3339).
pub const LAST_SYNCED_AT_KEY: &str = "lastSyncedAt";

/// Collaborators an engine is built from.
pub struct EngineParts {
    pub store: Arc<dyn Store>,
    /// Real network transport, used online and for replay.
    pub transport: Arc<dyn Transport>,
    pub connectivity: Arc<dyn Connectivity>,
    /// Base for relative request URLs.
    pub base_url: Option<String>,
}

/// What started a flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    /// A caller asked for it (manual sync, startup).
    Explicit,
    /// Connectivity came back.
    Reconnect,
}

/// Result of one flush attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Another flush was running; nothing was touched.
    AlreadySyncing,
    /// Writes are pending but there is no connectivity.
    Offline { pending: usize },
    /// The queue was already empty.
    Empty,
    /// Every pending write was accepted.
    Completed { replayed: usize },
    /// A replay failed; later writes were not attempted.
    Halted { replayed: usize, failed: MutationId },
}

struct EngineInner {
    store: Arc<dyn Store>,
    transport: Arc<dyn Transport>,
    state: Arc<SyncState>,
    queue: MutationQueue,
    projector: DomainProjector,
    gate: RequestGate,
    initialized: AtomicBool,
    connectivity_listener: Mutex<Option<Subscription>>,
}

/// Handle to the offline sync engine.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<EngineInner>,
}

impl SyncEngine {
    /// Build an engine. Nothing is read or wired until [`SyncEngine::initialize`].
    pub fn new(parts: EngineParts) -> Self {
        let EngineParts {
            store,
            transport,
            connectivity,
            base_url,
        } = parts;

        let state = Arc::new(SyncState::new(connectivity));
        let queue = MutationQueue::new(Arc::clone(&store));
        let projector = DomainProjector::new(Arc::clone(&store));
        let offline = Arc::new(OfflineTransport::new(
            Arc::clone(&store),
            queue.clone(),
            Arc::clone(&state),
        ));
        let gate = RequestGate::new(
            base_url,
            Arc::clone(&state),
            Arc::clone(&store),
            Arc::clone(&transport),
            offline,
            projector.clone(),
        );

        SyncEngine {
            inner: Arc::new(EngineInner {
                store,
                transport,
                state,
                queue,
                projector,
                gate,
                initialized: AtomicBool::new(false),
                connectivity_listener: Mutex::new(None),
            }),
        }
    }

    /// Load persisted state, start listening for connectivity, and flush if
    /// already online.
    ///
    /// Returns `Ok(true)` when this call did the wiring and `Ok(false)` when
    /// the engine was already initialized. Must run inside a tokio runtime.
    pub async fn initialize(&self) -> Result<bool> {
        if self
            .inner
            .initialized
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("engine already initialized");
            return Ok(false);
        }

        if let Err(e) = self.load_state().await {
            self.inner.initialized.store(false, Ordering::Release);
            return Err(e);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let listener = self
            .inner
            .state
            .connectivity()
            .on_change(Box::new(move |online| {
                // Receiver gone means the engine was dropped.
                let _ = tx.send(online);
            }));
        *self
            .inner
            .connectivity_listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(listener);
        tokio::spawn(connectivity_loop(Arc::downgrade(&self.inner), rx));

        tracing::info!(online = self.inner.state.is_online(), "sync engine initialized");
        if self.inner.state.is_online() {
            self.flush().await?;
        }
        Ok(true)
    }

    /// Read `lastSyncedAt` and the queue length from storage and publish them.
    pub async fn load_state(&self) -> Result<StatusSnapshot> {
        let last_synced_at = self
            .inner
            .store
            .metadata(LAST_SYNCED_AT_KEY.to_string())
            .await?
            .and_then(|raw| parse_synced_at(&raw));
        self.inner
            .state
            .update(|record| record.last_synced_at = last_synced_at);
        self.inner.state.refresh_queue_length(&self.inner.queue).await?;
        Ok(self.status())
    }

    /// Register a status listener. It receives the current snapshot at once.
    pub fn subscribe_status<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&StatusSnapshot) + Send + Sync + 'static,
    {
        self.inner.state.subscribe(listener)
    }

    /// Current status with live connectivity.
    pub fn status(&self) -> StatusSnapshot {
        self.inner.state.snapshot()
    }

    /// The connectivity-aware transport all API calls should go through.
    pub fn gate(&self) -> RequestGate {
        self.inner.gate.clone()
    }

    /// Replay queued writes in order, stopping at the first failure.
    pub async fn flush(&self) -> Result<FlushOutcome> {
        self.run_flush(Trigger::Explicit).await
    }

    async fn run_flush(&self, trigger: Trigger) -> Result<FlushOutcome> {
        let state = &self.inner.state;
        let Some(_guard) = state.try_begin_flush() else {
            tracing::debug!("flush already running");
            return Ok(FlushOutcome::AlreadySyncing);
        };

        let pending = self.inner.queue.list().await?;
        if pending.is_empty() {
            if trigger == Trigger::Reconnect {
                // Nothing was synced; keep the recorded sync time.
                state.update(|record| record.queue_length = 0);
                state.publish();
                return Ok(FlushOutcome::Empty);
            }
            let now = Utc::now();
            self.persist_synced_at(now).await?;
            state.update(|record| {
                record.queue_length = 0;
                record.last_error = None;
                record.last_synced_at = Some(now);
            });
            state.publish();
            return Ok(FlushOutcome::Empty);
        }

        if !state.is_online() {
            let count = pending.len();
            state.update(|record| record.queue_length = count);
            state.publish();
            return Ok(FlushOutcome::Offline { pending: count });
        }

        tracing::info!(pending = pending.len(), "flushing offline queue");
        state.update(|record| {
            record.is_syncing = true;
            record.queue_length = pending.len();
        });
        state.publish();

        let replay = self.replay_all(pending).await;

        let length = self.inner.queue.len().await;
        let now = Utc::now();
        let persisted = self.persist_synced_at(now).await;
        state.update(|record| {
            record.is_syncing = false;
            if let Ok(length) = &length {
                record.queue_length = *length;
            }
            record.last_synced_at = Some(now);
        });
        state.publish();

        let (replayed, failed) = replay?;
        length?;
        persisted?;

        match failed {
            Some(failed) => Ok(FlushOutcome::Halted { replayed, failed }),
            None => {
                tracing::info!(replayed, "offline queue flushed");
                Ok(FlushOutcome::Completed { replayed })
            }
        }
    }

    /// Flush on demand. Does nothing while offline.
    pub async fn trigger_manual_sync(&self) -> Result<Option<FlushOutcome>> {
        if !self.inner.state.is_online() {
            tracing::debug!("manual sync requested while offline; skipping");
            return Ok(None);
        }
        self.flush().await.map(Some)
    }

    /// Erase every queued write, cached response, domain record, and metadata value.
    pub async fn reset_cache(&self) -> Result<()> {
        self.inner.store.clear_database().await?;
        self.inner.state.update(|record| {
            record.queue_length = 0;
            record.last_error = None;
            record.last_synced_at = None;
        });
        self.inner.state.publish();
        tracing::info!("offline cache reset");
        Ok(())
    }

    /// Pending writes, oldest first.
    pub async fn pending_mutations(&self) -> Result<Vec<QueuedMutation>> {
        self.inner.queue.list().await
    }

    /// Projected records of one kind, in first-seen order.
    pub async fn domain_records(&self, kind: DomainKind) -> Result<Vec<DomainRecord>> {
        Ok(self.inner.store.domain_records(kind).await?)
    }

    /// Whether a flush currently holds the single-flight slot.
    pub fn is_flushing(&self) -> bool {
        self.inner.state.is_flushing()
    }

    /// Returns the number replayed and the id that failed, if any.
    async fn replay_all(
        &self,
        pending: Vec<QueuedMutation>,
    ) -> Result<(usize, Option<MutationId>)> {
        let state = &self.inner.state;
        let mut replayed = 0;

        for mutation in pending {
            let request = replay_request(&mutation);
            match self.inner.transport.send(request.clone()).await {
                Ok(response) => {
                    self.inner.queue.remove(mutation.id).await?;
                    state.update(|record| record.last_error = None);
                    state.refresh_queue_length(&self.inner.queue).await?;
                    self.project(&request, &response).await?;
                    replayed += 1;
                }
                Err(e) => {
                    let message = e.to_string();
                    tracing::warn!(id = %mutation.id, error = %message, "replay failed; halting flush");
                    let update = MutationUpdate::failed_attempt(&mutation, &message, Utc::now());
                    self.inner.queue.update(mutation.id, update).await?;
                    state.update(|record| record.last_error = Some(message));
                    state.publish();
                    return Ok((replayed, Some(mutation.id)));
                }
            }
        }
        Ok((replayed, None))
    }

    async fn project(&self, request: &ApiRequest, response: &ApiResponse) -> Result<()> {
        self.inner.projector.project(request, response).await?;
        Ok(())
    }

    async fn persist_synced_at(&self, at: DateTime<Utc>) -> Result<()> {
        self.inner
            .store
            .set_metadata(LAST_SYNCED_AT_KEY.to_string(), at.to_rfc3339())
            .await?;
        Ok(())
    }
}

/// Build the request that replays a queued write.
pub(crate) fn replay_request(mutation: &QueuedMutation) -> ApiRequest {
    let mut request = ApiRequest::new(mutation.method, mutation.url.clone())
        .with_body(mutation.body.clone());
    request.headers = mutation.headers.clone();
    request
        .headers
        .insert(REPLAY_HEADER.to_string(), "1".to_string());
    if let Some(stamp) = &mutation.version_stamp {
        request
            .headers
            .insert(REVISION_HEADER.to_string(), stamp.clone());
    }
    request
}

fn parse_synced_at(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(at) => Some(at.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!(value = raw, error = %e, "ignoring unreadable lastSyncedAt");
            None
        }
    }
}

/// Republish status on every transition and flush when connectivity returns.
///
/// Ends when the engine is dropped, which drops the listener and closes the
/// channel.
async fn connectivity_loop(engine: Weak<EngineInner>, mut events: mpsc::UnboundedReceiver<bool>) {
    while let Some(online) = events.recv().await {
        let Some(inner) = engine.upgrade() else {
            break;
        };
        let engine = SyncEngine { inner };
        engine.inner.state.publish();
        if online {
            if let Err(e) = engine.run_flush(Trigger::Reconnect).await {
                tracing::warn!(error = %e, "flush after reconnect failed");
            }
        }
    }
}
