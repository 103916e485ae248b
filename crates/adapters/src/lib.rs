// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external collaborators: log sinks and bus peers

pub mod bus;
pub mod sink;
pub mod traced;

#[cfg(test)]
mod test_logs;

pub use bus::{BusClient, BusError, IpmiResponse, ObjectRegistry};
pub use sink::{
    JournalSink, LogSink, LoggingServiceSink, SelSink, SinkEntry, SinkError, JOURNAL_TARGET,
};
pub use traced::{TracedBusClient, TracedLogSink};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use bus::{BusCall, FakeBusClient};
#[cfg(any(test, feature = "test-support"))]
pub use sink::{FakeLogSink, SinkCall};
