// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::TransportError;

/// All possible errors that can occur in the notesync library.
///
/// Replay failures never surface here: the flush loop records them on the
/// queued entry and reports them through the status snapshot instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot queue request: {0}\n  hint: binary bodies and file uploads need a connection")]
    Serialization(String),

    #[error("storage error: {0}")]
    Persistence(notesync_core::Error),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for notesync operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<notesync_core::Error> for Error {
    fn from(e: notesync_core::Error) -> Self {
        match e {
            notesync_core::Error::Serialization(reason) => Error::Serialization(reason),
            notesync_core::Error::InvalidUrl { url, reason } => Error::InvalidUrl { url, reason },
            notesync_core::Error::UnsupportedMethod(method) => {
                Error::InvalidRequest(format!("unsupported method: {method}"))
            }
            other => Error::Persistence(other),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
