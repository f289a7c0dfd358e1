// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity providers.
//!
//! The engine never probes the network itself: it asks a [`Connectivity`]
//! implementation whether it is online and listens for transitions.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::observers::{Observers, Subscription};

/// Source of online/offline state.
pub trait Connectivity: Send + Sync {
    /// Current state.
    fn is_online(&self) -> bool;

    /// Register a listener called with the new state on every transition.
    fn on_change(&self, listener: Box<dyn Fn(bool) + Send + Sync>) -> Subscription;
}

/// Connectivity driven explicitly by the host application (or a test).
///
/// Uses an atomic flag for lock-free reads. Listeners fire only when the
/// state actually changes.
pub struct ManualConnectivity {
    online: AtomicBool,
    observers: Observers<bool>,
}

impl ManualConnectivity {
    /// Create a provider with the given initial state.
    pub fn new(online: bool) -> Self {
        ManualConnectivity {
            online: AtomicBool::new(online),
            observers: Observers::new(),
        }
    }

    /// Set the state, notifying listeners if it changed.
    ///
    /// Returns true if this call caused a transition.
    pub fn set_online(&self, online: bool) -> bool {
        let previous = self.online.swap(online, Ordering::AcqRel);
        if previous == online {
            return false;
        }
        tracing::debug!(online, "connectivity changed");
        self.observers.notify(&online);
        true
    }
}

impl Default for ManualConnectivity {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for ManualConnectivity {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    fn on_change(&self, listener: Box<dyn Fn(bool) + Send + Sync>) -> Subscription {
        self.observers.subscribe(move |online: &bool| listener(*online))
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
