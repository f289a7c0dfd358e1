// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use std::sync::{Arc, Mutex};

#[test]
fn initial_state() {
    assert!(ManualConnectivity::new(true).is_online());
    assert!(!ManualConnectivity::new(false).is_online());
    assert!(ManualConnectivity::default().is_online());
}

#[test]
fn transitions_notify_listeners() {
    let connectivity = ManualConnectivity::new(false);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let inner = Arc::clone(&seen);
    let _sub = connectivity.on_change(Box::new(move |online| inner.lock().unwrap().push(online)));

    assert!(connectivity.set_online(true));
    assert!(connectivity.set_online(false));

    assert_eq!(*seen.lock().unwrap(), vec![true, false]);
}

#[test]
fn repeated_state_is_not_a_transition() {
    let connectivity = ManualConnectivity::new(true);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let inner = Arc::clone(&seen);
    let _sub = connectivity.on_change(Box::new(move |online| inner.lock().unwrap().push(online)));

    assert!(!connectivity.set_online(true));
    assert!(seen.lock().unwrap().is_empty());
}
