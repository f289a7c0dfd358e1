// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queued write operations and the request body storage contract.
//!
//! A [`QueuedMutation`] is a write the application attempted while offline.
//! Only bodies with a lossless JSON representation may be queued: binary
//! payloads and multipart file parts are rejected up front with
//! [`Error::Serialization`] instead of being stored in a degraded form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Headers that may carry an optimistic-concurrency token, in priority order.
const REVISION_HEADERS: [&str; 3] = ["x-offline-revision", "x-revision", "if-match"];

/// HTTP method of an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Returns the canonical uppercase verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Returns true for methods that never change server state.
    pub fn is_read(&self) -> bool {
        matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(Error::UnsupportedMethod(s.to_string())),
        }
    }
}

/// Value of a single multipart form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormValue {
    Text { value: String },
    File {
        filename: String,
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
}

/// A named multipart form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub value: FormValue,
}

impl FormField {
    /// Creates a text field.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        FormField {
            name: name.into(),
            value: FormValue::Text {
                value: value.into(),
            },
        }
    }
}

/// Request payload as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Text(String),
    Form(Vec<FormField>),
    Binary(Vec<u8>),
}

impl RequestBody {
    /// Checks that the body survives a round trip through queue storage.
    pub fn ensure_storable(&self) -> Result<()> {
        match self {
            RequestBody::Empty | RequestBody::Json(_) | RequestBody::Text(_) => Ok(()),
            RequestBody::Form(fields) => {
                match fields
                    .iter()
                    .find(|field| matches!(field.value, FormValue::File { .. }))
                {
                    Some(field) => Err(Error::Serialization(format!(
                        "form field '{}' carries a file",
                        field.name
                    ))),
                    None => Ok(()),
                }
            }
            RequestBody::Binary(bytes) => Err(Error::Serialization(format!(
                "binary body of {} bytes",
                bytes.len()
            ))),
        }
    }

    /// Returns the JSON payload, if this is a JSON body.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Store-assigned identifier of a queued mutation.
///
/// Identifiers increase monotonically, so ordering by id is insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MutationId(pub i64);

impl fmt::Display for MutationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated write, ready to be appended to the queue.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMutation {
    pub method: Method,
    pub url: String,
    pub body: RequestBody,
    pub headers: BTreeMap<String, String>,
    pub version_stamp: Option<String>,
}

impl NewMutation {
    /// Builds a queueable mutation from a normalized URL and caller input.
    ///
    /// Fails for read methods and for bodies that are not storable.
    pub fn new(
        method: Method,
        url: impl Into<String>,
        body: RequestBody,
        headers: &BTreeMap<String, String>,
    ) -> Result<Self> {
        if method.is_read() {
            return Err(Error::UnsupportedMethod(method.to_string()));
        }
        body.ensure_storable()?;

        let headers = normalize_headers(headers);
        let version_stamp = version_stamp(&headers, &body);

        Ok(NewMutation {
            method,
            url: url.into(),
            body,
            headers,
            version_stamp,
        })
    }
}

/// A pending write awaiting transmission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedMutation {
    pub id: MutationId,
    pub method: Method,
    pub url: String,
    pub body: RequestBody,
    pub headers: BTreeMap<String, String>,
    pub version_stamp: Option<String>,
    pub attempts: u32,
    pub last_error: Option<String>,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Partial bookkeeping update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationUpdate {
    pub attempts: Option<u32>,
    pub last_error: Option<String>,
    pub last_attempt_at: Option<DateTime<Utc>>,
}

impl MutationUpdate {
    /// Bookkeeping for a replay attempt that just failed.
    pub fn failed_attempt(
        mutation: &QueuedMutation,
        error: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        MutationUpdate {
            attempts: Some(mutation.attempts.saturating_add(1)),
            last_error: Some(error.into()),
            last_attempt_at: Some(at),
        }
    }
}

/// Lowercases header names so lookups are case-insensitive.
pub fn normalize_headers(headers: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.clone()))
        .collect()
}

/// Derives the optimistic-concurrency token for a write.
///
/// Revision headers win over body fields; within the body `revision` wins
/// over `updatedAt`. `headers` must already be normalized.
pub fn version_stamp(headers: &BTreeMap<String, String>, body: &RequestBody) -> Option<String> {
    let from_header = REVISION_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .map(str::to_string);
    if from_header.is_some() {
        return from_header;
    }

    let object = body.as_json()?.as_object()?;
    ["revision", "updatedAt"]
        .iter()
        .filter_map(|field| object.get(*field))
        .find_map(stamp_value)
}

fn stamp_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "mutation_tests.rs"]
mod tests;
