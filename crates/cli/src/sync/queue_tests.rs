// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the mutation queue.

#![allow(clippy::unwrap_used)]

use super::queue::MutationQueue;
use super::test_helpers::api;
use chrono::Utc;
use notesync_core::{Method, MutationUpdate, NewMutation, RequestBody, SqliteStore};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

fn queue() -> MutationQueue {
    MutationQueue::new(Arc::new(SqliteStore::open_in_memory().unwrap()))
}

fn put(path: &str, title: &str) -> NewMutation {
    NewMutation::new(
        Method::Put,
        api(path),
        RequestBody::Json(json!({ "title": title })),
        &BTreeMap::new(),
    )
    .unwrap()
}

#[tokio::test]
async fn new_queue_is_empty() {
    let queue = queue();
    assert!(queue.list().await.unwrap().is_empty());
    assert_eq!(queue.len().await.unwrap(), 0);
}

#[tokio::test]
async fn list_preserves_insertion_order() {
    let queue = queue();
    queue.append(put("/notes/a", "first")).await.unwrap();
    queue.append(put("/notes/b", "second")).await.unwrap();
    queue.append(put("/notes/a", "third")).await.unwrap();

    let urls: Vec<_> = queue
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.body.as_json().unwrap()["title"].clone())
        .collect();
    assert_eq!(urls, vec![json!("first"), json!("second"), json!("third")]);
}

#[tokio::test]
async fn ids_increase_with_insertion() {
    let queue = queue();
    let a = queue.append(put("/notes/a", "a")).await.unwrap();
    let b = queue.append(put("/notes/b", "b")).await.unwrap();
    assert!(a.id < b.id);
    assert_eq!(a.attempts, 0);
    assert!(a.last_error.is_none());
}

#[tokio::test]
async fn update_records_attempt_bookkeeping() {
    let queue = queue();
    let queued = queue.append(put("/notes/a", "a")).await.unwrap();

    let at = Utc::now();
    queue
        .update(queued.id, MutationUpdate::failed_attempt(&queued, "HTTP 500: boom", at))
        .await
        .unwrap();

    let stored = &queue.list().await.unwrap()[0];
    assert_eq!(stored.attempts, 1);
    assert_eq!(stored.last_error.as_deref(), Some("HTTP 500: boom"));
    assert!(stored.last_attempt_at.is_some());
}

#[tokio::test]
async fn remove_drops_only_that_entry() {
    let queue = queue();
    let a = queue.append(put("/notes/a", "a")).await.unwrap();
    let b = queue.append(put("/notes/b", "b")).await.unwrap();

    queue.remove(a.id).await.unwrap();

    let remaining = queue.list().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, b.id);
    assert_eq!(queue.len().await.unwrap(), 1);
}

#[tokio::test]
async fn clones_share_storage() {
    let queue = queue();
    let other = queue.clone();
    queue.append(put("/notes/a", "a")).await.unwrap();
    assert_eq!(other.len().await.unwrap(), 1);
}
