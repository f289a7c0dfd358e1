// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! notesync - Offline-first sync engine for a notes API.
//!
//! This crate provides the engine behind the `notesync` CLI: API calls go
//! through a connectivity-aware gate that caches reads and queues writes
//! while offline, and a flush loop replays queued writes in order once the
//! network returns.
//!
//! # Main Components
//!
//! - [`SyncEngine`] - Owns the queue, gate, and flush loop
//! - [`RequestGate`] - Connectivity-aware [`Transport`]
//! - [`StatusBroadcaster`] - Publishes [`StatusSnapshot`]s to subscribers
//! - [`Connectivity`] - Injected online/offline source
//! - [`Config`] - API and storage settings
//! - [`Error`] - Error types for all operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use notesync::{ApiRequest, EngineParts, HttpTransport, ManualConnectivity, SyncEngine};
//!
//! let engine = SyncEngine::new(EngineParts {
//!     store: Arc::new(SqliteStore::open(&path)?),
//!     transport: Arc::new(HttpTransport::new(timeout, "app/1.0")?),
//!     connectivity: Arc::new(ManualConnectivity::new(true)),
//!     base_url: Some("https://notes.example.com/api".into()),
//! });
//! engine.initialize().await?;
//!
//! let _sub = engine.subscribe_status(|s| println!("{} pending", s.queue_length));
//! let response = engine.gate().dispatch(ApiRequest::get("/notebooks")).await?;
//! ```

mod cli;
mod commands;
mod env;

pub mod config;
pub mod connectivity;
pub mod error;
pub mod observers;
pub mod status;
pub mod sync;

pub use cli::{Cli, Command, GlobalArgs};
pub use config::Config;
pub use connectivity::{Connectivity, ManualConnectivity};
pub use error::{Error, Result};
pub use observers::{Observers, Subscription};
pub use status::{StatusBroadcaster, StatusSnapshot};
pub use sync::{
    ApiRequest, ApiResponse, EngineParts, FlushOutcome, HttpTransport, OfflineTransport,
    RequestGate, SyncEngine, Transport, TransportError,
};

use notesync_core::DomainKind;

/// Execute a CLI invocation on a fresh tokio runtime.
///
/// This is the main entry point for the binary and provides a testable way
/// to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(execute(cli))
}

async fn execute(cli: Cli) -> Result<()> {
    let ctx = commands::Context::open(&cli.global)?;
    match cli.command {
        Command::Status { json } => commands::status::run(&ctx, json).await,
        Command::Request {
            method,
            url,
            data,
            headers,
            params,
        } => commands::request::run(&ctx, method, url, data, headers, params).await,
        Command::Flush => commands::flush::run(&ctx).await,
        Command::Queue { json } => commands::queue::run(&ctx, json).await,
        Command::Notebooks { json } => {
            commands::domain::run(&ctx, DomainKind::Notebook, None, json).await
        }
        Command::Notes { notebook, json } => {
            commands::domain::run(&ctx, DomainKind::Note, notebook.as_deref(), json).await
        }
        Command::Reset => commands::reset::run(&ctx).await,
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
