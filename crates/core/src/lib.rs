// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! notesync-core: Shared library for the notesync offline engine
//!
//! This crate provides the data model for queued writes, URL normalization,
//! domain record projection, and the persistent store used by the engine.

pub mod domain;
pub mod error;
pub mod mutation;
pub mod normalize;
pub mod store;

pub use domain::{collection_items, DomainKind, DomainRecord};
pub use error::{Error, Result};
pub use mutation::{
    normalize_headers, version_stamp, FormField, FormValue, Method, MutationId, MutationUpdate,
    NewMutation, QueuedMutation, RequestBody,
};
pub use normalize::{normalize_url, path_segments};
pub use store::{CachedResponse, SqliteStore, Store};
