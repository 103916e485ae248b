// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log sinks: where SEL entries are reported

mod journal;
mod service;

pub use journal::{JournalSink, JOURNAL_TARGET};
pub use service::{LoggingServiceSink, ServicePayload, INFORMATIONAL_SEVERITY};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLogSink, SinkCall};

use async_trait::async_trait;
use sel_core::{EventRecord, RecordId};
use thiserror::Error;

/// Errors from sink operations
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("logging service request failed: {0}")]
    Request(String),
    #[error("reload failed: {0}")]
    Reload(String),
}

/// One entry handed to a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEntry {
    /// A SEL record; `id` is `UNASSIGNED` when nothing is stored locally
    Record { id: RecordId, record: EventRecord },
    /// A plain informational log entry with no SEL record
    Informational {
        message: String,
        metadata: Vec<(String, String)>,
    },
}

impl SinkEntry {
    pub fn message(&self) -> &str {
        match self {
            SinkEntry::Record { record, .. } => &record.message,
            SinkEntry::Informational { message, .. } => message,
        }
    }

    pub fn metadata(&self) -> &[(String, String)] {
        match self {
            SinkEntry::Record { record, .. } => &record.metadata,
            SinkEntry::Informational { metadata, .. } => metadata,
        }
    }
}

/// Destination for SEL entries
#[async_trait]
pub trait LogSink: Clone + Send + Sync + 'static {
    /// Report one entry
    async fn emit(&self, entry: &SinkEntry) -> Result<(), SinkError>;

    /// Ask the log rotation machinery to start fresh files after a clear
    async fn reload(&self) -> Result<(), SinkError>;
}

/// Sink selected once at startup from configuration
#[derive(Clone)]
pub enum SelSink {
    Journal(JournalSink),
    LoggingService(LoggingServiceSink),
}

impl SelSink {
    /// Whether records are also persisted to local log files
    pub fn persists_locally(&self) -> bool {
        matches!(self, SelSink::Journal(_))
    }
}

#[async_trait]
impl LogSink for SelSink {
    async fn emit(&self, entry: &SinkEntry) -> Result<(), SinkError> {
        match self {
            SelSink::Journal(sink) => sink.emit(entry).await,
            SelSink::LoggingService(sink) => sink.emit(entry).await,
        }
    }

    async fn reload(&self) -> Result<(), SinkError> {
        match self {
            SelSink::Journal(sink) => sink.reload().await,
            SelSink::LoggingService(sink) => sink.reload().await,
        }
    }
}

fn render_metadata(metadata: &[(String, String)]) -> String {
    metadata
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(" ")
}
