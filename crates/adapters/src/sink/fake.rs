// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake log sink for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{LogSink, SinkEntry, SinkError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Recorded sink call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    Emit(SinkEntry),
    Reload,
}

#[derive(Default)]
struct FakeSinkState {
    calls: Vec<SinkCall>,
    fail_emit: bool,
}

/// Fake log sink that records every call
#[derive(Clone, Default)]
pub struct FakeLogSink {
    inner: Arc<Mutex<FakeSinkState>>,
}

impl FakeLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<SinkCall> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    /// Entries emitted so far
    pub fn entries(&self) -> Vec<SinkEntry> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SinkCall::Emit(entry) => Some(entry),
                SinkCall::Reload => None,
            })
            .collect()
    }

    pub fn reload_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SinkCall::Reload))
            .count()
    }

    /// Make subsequent emits fail
    pub fn set_fail_emit(&self, fail: bool) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).fail_emit = fail;
    }
}

#[async_trait]
impl LogSink for FakeLogSink {
    async fn emit(&self, entry: &SinkEntry) -> Result<(), SinkError> {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if state.fail_emit {
            return Err(SinkError::Request("fake emit failure".to_string()));
        }
        state.calls.push(SinkCall::Emit(entry.clone()));
        Ok(())
    }

    async fn reload(&self) -> Result<(), SinkError> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .push(SinkCall::Reload);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
