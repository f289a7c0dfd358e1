// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Domain records projected out of API responses.
//!
//! Notebooks and notes are kept in their own storage, keyed by id, so list
//! views can render offline regardless of which query filled the URL cache.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Kind of domain collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainKind {
    Notebook,
    Note,
}

impl DomainKind {
    /// Returns the string representation used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainKind::Notebook => "notebook",
            DomainKind::Note => "note",
        }
    }

    /// Returns the URL path segment naming this collection.
    pub fn collection(&self) -> &'static str {
        match self {
            DomainKind::Notebook => "notebooks",
            DomainKind::Note => "notes",
        }
    }

    /// Maps a URL path segment to the collection it names.
    pub fn from_collection(segment: &str) -> Option<Self> {
        match segment {
            "notebooks" => Some(DomainKind::Notebook),
            "notes" => Some(DomainKind::Note),
            _ => None,
        }
    }
}

impl fmt::Display for DomainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DomainKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "notebook" => Ok(DomainKind::Notebook),
            "note" => Ok(DomainKind::Note),
            _ => Err(Error::CorruptedData(format!("unknown domain kind '{s}'"))),
        }
    }
}

/// A normalized notebook or note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecord {
    pub id: String,
    pub revision: String,
    /// Owning notebook, for notes.
    pub notebook_id: Option<String>,
    /// The object as returned by the API, with `revision` attached.
    pub data: Value,
}

impl DomainRecord {
    /// Normalizes a raw API object.
    ///
    /// The revision prefers `updatedAt` and falls back to `id`. Objects
    /// without a usable `id` are not domain records and yield `None`.
    /// `parent_notebook` is attached to notes that do not name their notebook.
    pub fn from_value(kind: DomainKind, value: &Value, parent_notebook: Option<&str>) -> Option<Self> {
        let object = value.as_object()?;
        let id = scalar_string(object.get("id")?)?;
        let revision = object
            .get("updatedAt")
            .and_then(scalar_string)
            .unwrap_or_else(|| id.clone());

        let notebook_id = match kind {
            DomainKind::Notebook => None,
            DomainKind::Note => object
                .get("notebookId")
                .and_then(scalar_string)
                .or_else(|| parent_notebook.map(str::to_string)),
        };

        let mut data = object.clone();
        data.insert("revision".to_string(), Value::String(revision.clone()));
        if let Some(notebook) = &notebook_id {
            data.entry("notebookId")
                .or_insert_with(|| Value::String(notebook.clone()));
        }

        Some(DomainRecord {
            id,
            revision,
            notebook_id,
            data: Value::Object(data),
        })
    }
}

/// Finds the array of objects in a collection response.
///
/// Accepts a bare array, or an object wrapping the array under the
/// collection name, `items`, or `data`.
pub fn collection_items<'a>(kind: DomainKind, payload: &'a Value) -> Option<&'a Vec<Value>> {
    match payload {
        Value::Array(items) => Some(items),
        Value::Object(object) => [kind.collection(), "items", "data"]
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_array)),
        _ => None,
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "domain_tests.rs"]
mod tests;
