// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Projects successful API responses into the domain record cache.
//!
//! Routes are recognized by their trailing path segments:
//!
//! | Path suffix                 | Effect                               |
//! |-----------------------------|--------------------------------------|
//! | `/notebooks`                | store every notebook in the payload  |
//! | `/notes`                    | store every note in the payload      |
//! | `/notebooks/{id}/notes`     | as `/notes`, tagged with the notebook |
//! | `/notebooks/{id}`, `/notes/{id}` | upsert the single record, or remove it on DELETE |
//!
//! A plain GET of a collection replaces the stored set, so records the
//! server stopped returning are dropped. Anything else is ignored.

use std::sync::Arc;

use notesync_core::{collection_items, path_segments, DomainKind, DomainRecord, Method, Store};
use serde_json::Value;

use super::transport::{ApiRequest, ApiResponse};
use crate::error::Result;

/// What a response means for the domain cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Route {
    /// A collection of records of `kind`, optionally scoped to a notebook.
    Collection {
        kind: DomainKind,
        notebook: Option<String>,
    },
    /// A single record addressed by id.
    Item {
        kind: DomainKind,
        id: String,
        notebook: Option<String>,
    },
}

/// Classify a URL by its trailing path segments.
pub(crate) fn route(url: &str) -> Option<Route> {
    let segments = path_segments(url);
    let n = segments.len();
    let scope = |kind: DomainKind, at: usize| -> Option<String> {
        (kind == DomainKind::Note && at >= 2 && segments[at - 2] == "notebooks")
            .then(|| segments[at - 1].clone())
    };

    if let Some(kind) = segments.last().and_then(|s| DomainKind::from_collection(s)) {
        return Some(Route::Collection {
            kind,
            notebook: scope(kind, n - 1),
        });
    }
    if n >= 2 {
        if let Some(kind) = DomainKind::from_collection(&segments[n - 2]) {
            return Some(Route::Item {
                kind,
                id: segments[n - 1].clone(),
                notebook: scope(kind, n - 2),
            });
        }
    }
    None
}

/// A GET with no query returns the whole collection (or the whole notebook
/// scope); filtered or paged listings only add to what is stored.
fn is_full_listing(request: &ApiRequest) -> bool {
    request.method == Method::Get && !request.url.contains('?')
}

/// Writes domain records derived from responses into the store.
#[derive(Clone)]
pub struct DomainProjector {
    store: Arc<dyn Store>,
}

impl DomainProjector {
    pub fn new(store: Arc<dyn Store>) -> Self {
        DomainProjector { store }
    }

    /// Apply a successful response to the domain cache.
    ///
    /// Returns the number of records written or removed.
    pub async fn project(&self, request: &ApiRequest, response: &ApiResponse) -> Result<usize> {
        if !response.is_success() {
            return Ok(0);
        }
        let Some(route) = route(&request.url) else {
            return Ok(0);
        };

        let written = match route {
            Route::Collection { kind, notebook } => {
                match collection_items(kind, &response.data) {
                    Some(items) => {
                        let records: Vec<_> = items
                            .iter()
                            .filter_map(|item| DomainRecord::from_value(kind, item, notebook.as_deref()))
                            .collect();
                        if is_full_listing(request) {
                            self.replace(kind, notebook, records).await?
                        } else {
                            self.upsert(kind, records).await?
                        }
                    }
                    // A create on a collection echoes the new record.
                    None => self.upsert_single(kind, &response.data, notebook.as_deref()).await?,
                }
            }
            Route::Item { kind, id, notebook } => {
                if request.method == Method::Delete {
                    self.store.remove_domain_record(kind, id.clone()).await?;
                    tracing::debug!(%kind, %id, "removed domain record");
                    1
                } else {
                    self.upsert_single(kind, &response.data, notebook.as_deref()).await?
                }
            }
        };
        Ok(written)
    }

    async fn upsert_single(
        &self,
        kind: DomainKind,
        data: &Value,
        notebook: Option<&str>,
    ) -> Result<usize> {
        let records: Vec<_> = DomainRecord::from_value(kind, data, notebook).into_iter().collect();
        self.upsert(kind, records).await
    }

    async fn replace(
        &self,
        kind: DomainKind,
        notebook: Option<String>,
        records: Vec<DomainRecord>,
    ) -> Result<usize> {
        let count = records.len();
        self.store.replace_domain(kind, notebook, records).await?;
        tracing::debug!(%kind, count, "replaced domain collection");
        Ok(count)
    }

    async fn upsert(&self, kind: DomainKind, records: Vec<DomainRecord>) -> Result<usize> {
        let count = records.len();
        if count > 0 {
            self.store.store_domain(kind, records).await?;
            tracing::debug!(%kind, count, "projected domain records");
        }
        Ok(count)
    }
}
