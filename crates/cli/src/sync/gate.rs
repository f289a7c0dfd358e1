// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request gate: the single entry point for API calls.
//!
//! Each call is normalized, then routed by the current connectivity:
//!
//! - online: the real transport, with GET responses cached and every
//!   success projected into the domain cache
//! - offline: the [`OfflineTransport`], falling through to the real
//!   transport when a read has nothing cached

use std::sync::Arc;

use futures_util::future::BoxFuture;
use notesync_core::{normalize_url, Method, Store};

use super::offline::OfflineTransport;
use super::projector::DomainProjector;
use super::state::SyncState;
use super::transport::{ApiRequest, ApiResponse, Transport, TransportError};
use crate::error::{Error, Result};

/// Connectivity-aware transport.
///
/// The gate is itself a [`Transport`], so callers hold it the same way they
/// would hold the HTTP transport.
#[derive(Clone)]
pub struct RequestGate {
    base_url: Option<String>,
    state: Arc<SyncState>,
    store: Arc<dyn Store>,
    online: Arc<dyn Transport>,
    offline: Arc<OfflineTransport>,
    projector: DomainProjector,
}

impl RequestGate {
    pub(crate) fn new(
        base_url: Option<String>,
        state: Arc<SyncState>,
        store: Arc<dyn Store>,
        online: Arc<dyn Transport>,
        offline: Arc<OfflineTransport>,
        projector: DomainProjector,
    ) -> Self {
        RequestGate {
            base_url,
            state,
            store,
            online,
            offline,
            projector,
        }
    }

    /// Route a request according to connectivity.
    pub async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse> {
        let request = self.normalize(request)?;

        if self.state.is_online() {
            tracing::debug!(method = %request.method, url = %request.url, "sending online");
            return self.send_online(request).await;
        }

        match self.offline.send(request.clone()).await {
            Err(Error::Transport(TransportError::NotCached(url))) => {
                tracing::debug!(%url, "offline cache miss; trying network");
                self.send_online(request).await
            }
            other => other,
        }
    }

    /// Merge params into the URL and resolve it against the base.
    fn normalize(&self, mut request: ApiRequest) -> Result<ApiRequest> {
        request.url = normalize_url(self.base_url.as_deref(), &request.url, &request.params)?;
        request.params.clear();
        Ok(request)
    }

    async fn send_online(&self, request: ApiRequest) -> Result<ApiResponse> {
        let response = self.online.send(request.clone()).await?;

        if request.method == Method::Get {
            self.store
                .cache_response(request.url.clone(), response.data.clone())
                .await?;
        }
        self.projector.project(&request, &response).await?;
        Ok(response)
    }
}

impl Transport for RequestGate {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>> {
        Box::pin(self.dispatch(request))
    }
}
