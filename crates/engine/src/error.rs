// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the record pipeline and event monitors

use sel_adapters::{BusError, SinkError};
use sel_core::{EncodeError, ValueError};
use sel_storage::StoreError;
use thiserror::Error;

/// Errors returned to callers of the record pipeline
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{0}")]
    EventData(#[from] EncodeError),
    #[error("{0} is not supported when records are forwarded to a logging service")]
    Unsupported(&'static str),
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),
}

/// Reasons a monitor drops an event
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("malformed {signal} signal: {source}")]
    Decode {
        signal: String,
        #[source]
        source: ValueError,
    },
    #[error("unknown {what}: {value}")]
    Unknown { what: &'static str, value: String },
    #[error("bus query failed: {0}")]
    Bus(#[from] BusError),
    #[error("unexpected property type: {0}")]
    Property(#[from] ValueError),
    #[error("invalid record: {0}")]
    Record(#[from] EncodeError),
}

impl MonitorError {
    pub(crate) fn decode(signal: &sel_core::Signal, source: ValueError) -> Self {
        Self::Decode {
            signal: signal.name(),
            source,
        }
    }
}
