// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport used while offline.
//!
//! Reads are answered from the response cache. Writes are appended to the
//! mutation queue and acknowledged with a synthetic `202 Accepted`.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use notesync_core::{Method, NewMutation, Store};
use serde_json::json;

use super::queue::MutationQueue;
use super::state::SyncState;
use super::transport::{ApiRequest, ApiResponse, Transport, TransportError};
use crate::error::Result;

/// `x-offline` marker on a response served from the cache.
pub const CACHED_MARKER: &str = "cached";
/// `x-offline` marker on the acknowledgement of a queued write.
pub const QUEUED_MARKER: &str = "queued";

/// Synthetic transport for the offline path.
///
/// Expects `request.url` to be normalized with params already merged.
pub struct OfflineTransport {
    store: Arc<dyn Store>,
    queue: MutationQueue,
    state: Arc<SyncState>,
}

impl OfflineTransport {
    pub(crate) fn new(store: Arc<dyn Store>, queue: MutationQueue, state: Arc<SyncState>) -> Self {
        OfflineTransport {
            store,
            queue,
            state,
        }
    }

    async fn read(&self, request: ApiRequest) -> Result<ApiResponse> {
        match self.store.cached_response(request.url.clone()).await? {
            Some(cached) => {
                tracing::debug!(url = %request.url, "serving cached response");
                Ok(ApiResponse::synthetic(200, CACHED_MARKER, cached.payload))
            }
            None => Err(TransportError::NotCached(request.url).into()),
        }
    }

    async fn enqueue(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mutation = NewMutation::new(request.method, request.url, request.body, &request.headers)?;
        let queued = self.queue.append(mutation).await?;
        self.state.refresh_queue_length(&self.queue).await?;

        Ok(ApiResponse::synthetic(
            202,
            QUEUED_MARKER,
            json!({
                "queued": true,
                "mutationId": queued.id,
                "offline": true,
            }),
        ))
    }
}

impl Transport for OfflineTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>> {
        Box::pin(async move {
            match request.method {
                Method::Get => self.read(request).await,
                _ => self.enqueue(request).await,
            }
        })
    }
}
