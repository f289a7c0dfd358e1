// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;
use std::sync::Arc;

fn recorder() -> (
    Arc<Mutex<Vec<StatusSnapshot>>>,
    impl Fn(&StatusSnapshot) + Send + Sync + 'static,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let inner = Arc::clone(&seen);
    (seen, move |s: &StatusSnapshot| {
        inner.lock().unwrap().push(s.clone())
    })
}

#[test]
fn subscribe_delivers_current_snapshot_immediately() {
    let broadcaster = StatusBroadcaster::new(StatusSnapshot {
        is_online: true,
        queue_length: 3,
        ..Default::default()
    });
    let (seen, listener) = recorder();

    let _sub = broadcaster.subscribe(listener);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].queue_length, 3);
    assert!(seen[0].is_online);
}

#[test]
fn subscribe_from_replaces_current_without_notifying_others() {
    let broadcaster = StatusBroadcaster::default();
    let (first_seen, first) = recorder();
    let (second_seen, second) = recorder();
    let _first = broadcaster.subscribe(first);

    let live = StatusSnapshot {
        is_online: true,
        ..Default::default()
    };
    let _second = broadcaster.subscribe_from(live.clone(), second);

    assert_eq!(first_seen.lock().unwrap().len(), 1);
    assert_eq!(*second_seen.lock().unwrap(), vec![live.clone()]);
    assert_eq!(broadcaster.current(), live);
}

#[test]
fn late_subscriber_sees_latest_publish() {
    let broadcaster = StatusBroadcaster::default();
    broadcaster.publish(StatusSnapshot {
        queue_length: 2,
        last_error: Some("HTTP 500".into()),
        ..Default::default()
    });

    let (seen, listener) = recorder();
    let _sub = broadcaster.subscribe(listener);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].queue_length, 2);
    assert_eq!(seen[0].last_error.as_deref(), Some("HTTP 500"));
}

#[test]
fn publish_reaches_subscribers_in_order() {
    let broadcaster = StatusBroadcaster::default();
    let (seen, listener) = recorder();
    let _sub = broadcaster.subscribe(listener);

    for n in 1..=3 {
        broadcaster.publish(StatusSnapshot {
            queue_length: n,
            ..Default::default()
        });
    }

    let lengths: Vec<_> = seen.lock().unwrap().iter().map(|s| s.queue_length).collect();
    assert_eq!(lengths, vec![0, 1, 2, 3]);
}

#[test]
fn unsubscribed_listener_stops_receiving() {
    let broadcaster = StatusBroadcaster::default();
    let (seen, listener) = recorder();
    let sub = broadcaster.subscribe(listener);
    sub.unsubscribe();

    broadcaster.publish(StatusSnapshot::default());
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn panicking_subscriber_is_contained() {
    let broadcaster = StatusBroadcaster::default();
    let (seen, listener) = recorder();
    let _bad = broadcaster.subscribe(|s: &StatusSnapshot| {
        if s.queue_length > 0 {
            panic!("render failed");
        }
    });
    let _good = broadcaster.subscribe(listener);

    broadcaster.publish(StatusSnapshot {
        queue_length: 1,
        ..Default::default()
    });

    assert_eq!(seen.lock().unwrap().last().unwrap().queue_length, 1);
    assert_eq!(broadcaster.current().queue_length, 1);
}

#[test]
fn snapshot_serializes_camel_case() {
    let json = serde_json::to_value(StatusSnapshot::default()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "isOnline": false,
            "queueLength": 0,
            "isSyncing": false,
            "lastSyncedAt": null,
            "lastError": null,
        })
    );
}
