// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Assertion state shared by event monitors.
//!
//! A (source, kind) pair is either asserted or not. An event that would
//! repeat the current state is a duplicate and is not logged.

use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssertionKey {
    /// Object path of the event source
    pub source: String,
    /// Event kind, e.g. "CriticalHigh" or "Enabled"
    pub kind: String,
}

impl AssertionKey {
    pub fn new(source: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            kind: kind.into(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct AssertionTracker {
    asserted: BTreeSet<AssertionKey>,
}

impl AssertionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_asserted(&self, key: &AssertionKey) -> bool {
        self.asserted.contains(key)
    }

    /// Whether applying `assert` to `key` would change the state
    pub fn would_apply(&self, key: &AssertionKey, assert: bool) -> bool {
        self.is_asserted(key) != assert
    }

    /// Record a transition. Returns false for a duplicate.
    pub fn apply(&mut self, key: AssertionKey, assert: bool) -> bool {
        if assert {
            self.asserted.insert(key)
        } else {
            self.asserted.remove(&key)
        }
    }

    pub fn asserted(&self) -> impl Iterator<Item = &AssertionKey> {
        self.asserted.iter()
    }

    pub fn len(&self) -> usize {
        self.asserted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asserted.is_empty()
    }
}

#[cfg(test)]
#[path = "assertion_tests.rs"]
mod tests;
