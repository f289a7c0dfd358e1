// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for API calls.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTP calls for production ([`HttpTransport`])
//! - Synthetic offline responses ([`super::OfflineTransport`])
//! - Mock transports for unit testing

use std::collections::BTreeMap;
use std::time::Duration;

use futures_util::future::BoxFuture;
use notesync_core::{FormValue, Method, RequestBody};
use serde_json::Value;

use crate::error::{Error, Result};

/// Marker header on synthetic responses (`queued` or `cached`).
pub const OFFLINE_HEADER: &str = "x-offline";
/// Marker header on replayed requests.
pub const REPLAY_HEADER: &str = "x-offline-replay";
/// Concurrency hint header on replayed requests.
pub const REVISION_HEADER: &str = "x-offline-revision";

/// Longest error body kept in a [`TransportError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response could not be read.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Offline read with nothing cached for the URL.
    #[error("offline and no cached response for {0}")]
    NotCached(String),
}

/// Description of an outgoing API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute, or relative to the configured API base.
    pub url: String,
    pub params: BTreeMap<String, String>,
    pub body: RequestBody,
    pub headers: BTreeMap<String, String>,
}

impl ApiRequest {
    /// Create a request with no params, headers, or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        ApiRequest {
            method,
            url: url.into(),
            params: BTreeMap::new(),
            body: RequestBody::Empty,
            headers: BTreeMap::new(),
        }
    }

    /// Shorthand for a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn with_json(self, value: Value) -> Self {
        self.with_body(RequestBody::Json(value))
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Response to an API call, real or synthetic.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub data: Value,
}

impl ApiResponse {
    /// Build a response fabricated by the offline path.
    pub fn synthetic(status: u16, marker: &str, data: Value) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(OFFLINE_HEADER.to_string(), marker.to_string());
        ApiResponse {
            status,
            headers,
            data,
        }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `x-offline` marker, if this response was fabricated.
    pub fn offline_marker(&self) -> Option<&str> {
        self.headers.get(OFFLINE_HEADER).map(String::as_str)
    }
}

/// Something that can carry an [`ApiRequest`] to a response.
///
/// Implementations must be shareable across tasks.
pub trait Transport: Send + Sync {
    /// Send a request. Non-2xx responses are errors.
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>>;
}

/// HTTP transport implementation using reqwest.
///
/// Timeouts are enforced here, not by the engine.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a per-request timeout.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(HttpTransport { client })
    }

    fn build(&self, request: ApiRequest) -> Result<reqwest::RequestBuilder> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Text(text) => builder.body(text),
            RequestBody::Binary(bytes) => builder.body(bytes),
            RequestBody::Form(fields) => {
                let mut form = reqwest::multipart::Form::new();
                for field in fields {
                    form = match field.value {
                        FormValue::Text { value } => form.text(field.name, value),
                        FormValue::File {
                            filename,
                            content_type,
                            bytes,
                        } => {
                            let mut part =
                                reqwest::multipart::Part::bytes(bytes).file_name(filename);
                            if let Some(content_type) = content_type {
                                part = part.mime_str(&content_type).map_err(|e| {
                                    Error::InvalidRequest(format!("bad content type: {e}"))
                                })?;
                            }
                            form.part(field.name, part)
                        }
                    };
                }
                builder.multipart(form)
            }
        };
        Ok(builder)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>> {
        Box::pin(async move {
            let builder = self.build(request)?;
            let response = builder
                .send()
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let bytes = response
                .bytes()
                .await
                .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;

            response_from_parts(status, headers, &bytes)
        })
    }
}

/// Turn raw response parts into an [`ApiResponse`], failing on non-2xx.
///
/// Bodies that are not JSON are kept as a JSON string; empty bodies become null.
pub(crate) fn response_from_parts(
    status: u16,
    headers: BTreeMap<String, String>,
    bytes: &[u8],
) -> Result<ApiResponse> {
    if !(200..300).contains(&status) {
        let mut body = String::from_utf8_lossy(bytes).into_owned();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        return Err(TransportError::Status { status, body }.into());
    }

    let data = if bytes.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        match serde_json::from_slice(bytes) {
            Ok(value) => value,
            Err(_) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        }
    };

    Ok(ApiResponse {
        status,
        headers,
        data,
    })
}
