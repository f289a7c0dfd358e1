// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline sync module.
//!
//! Routes API calls through a connectivity-aware gate, queues writes made
//! while offline, and replays them in order once the network returns.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Caller    │────►│ RequestGate │────►│    HTTP     │ (online)
//! │             │◄────│ (Transport) │◄────│  Transport  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │ (offline)          ▲
//!                            ▼                    │ replay
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │   Offline   │────►│ SyncEngine  │
//!                     │  Transport  │     │   (flush)   │
//!                     └─────────────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ┌─────────────┐
//!                     │ Mutation    │  (SQLite-backed)
//!                     │ Queue/Cache │
//!                     └─────────────┘
//! ```
//!
//! # Features
//!
//! - Cached reads and queued writes while offline
//! - Ordered, single-flight replay that halts on the first failure
//! - Version stamps forwarded as `x-offline-revision` on replay
//! - Notebook and note projection from successful responses
//! - Injectable transport trait for testing

mod engine;
mod gate;
mod offline;
mod projector;
mod queue;
mod state;
mod transport;

pub use engine::{EngineParts, FlushOutcome, SyncEngine, LAST_SYNCED_AT_KEY};
pub use gate::RequestGate;
pub use offline::{OfflineTransport, CACHED_MARKER, QUEUED_MARKER};
pub use projector::DomainProjector;
pub use queue::MutationQueue;
pub use transport::{
    ApiRequest, ApiResponse, HttpTransport, Transport, TransportError, OFFLINE_HEADER,
    REPLAY_HEADER, REVISION_HEADER,
};

#[cfg(test)]
mod test_helpers;




#[cfg(test)]
mod queue_tests;
