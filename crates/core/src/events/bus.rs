// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signal bus for routing signals to subscribers

use super::subscription::{SubscriberId, Subscription};
use crate::signal::Signal;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

/// Sender for signal delivery
pub type SignalSender = mpsc::UnboundedSender<Signal>;
/// Receiver for signal delivery
pub type SignalReceiver = mpsc::UnboundedReceiver<Signal>;

/// Routes published signals to every subscription with a matching pattern
pub struct SignalBus {
    subscribers: Arc<RwLock<HashMap<SubscriberId, (Subscription, SignalSender)>>>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Subscribe to signals matching the given patterns
    pub fn subscribe(&self, subscription: Subscription) -> SignalReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = subscription.id.clone();

        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subs.insert(id, (subscription, tx));

        rx
    }

    pub fn unsubscribe(&self, id: &SubscriberId) {
        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subs.remove(id);
    }

    /// Publish a signal to all matching subscribers.
    ///
    /// Returns the number of subscribers it was delivered to.
    pub fn publish(&self, signal: Signal) -> usize {
        let name = signal.name();
        let subs = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
        let mut delivered = 0;
        for (subscription, tx) in subs.values() {
            if subscription.matches(&name) && tx.send(signal.clone()).is_ok() {
                delivered += 1;
            }
        }
        tracing::trace!(signal = %name, delivered, "signal published");
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn list_subscriptions(&self) -> Vec<SubscriberId> {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect()
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SignalBus {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
