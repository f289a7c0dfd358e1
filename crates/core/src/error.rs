// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for notesync-core operations.

use thiserror::Error;

/// All possible errors that can occur in notesync-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot queue request body: {0}\n  hint: queued bodies must be JSON, text, or text-only forms")]
    Serialization(String),

    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unsupported method for queueing: {0}")]
    UnsupportedMethod(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

/// A specialized Result type for notesync-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
