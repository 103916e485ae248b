// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Journal sink: structured log events plus rotation reload

use super::{render_metadata, LogSink, SinkEntry, SinkError};
use async_trait::async_trait;
use sel_core::{Origin, SEL_MESSAGE_ID, SEL_PRIORITY};
use tokio::process::Command;

/// Tracing target every SEL journal entry is emitted on
pub const JOURNAL_TARGET: &str = "sel::journal";

/// Emits SEL entries as structured tracing events on [`JOURNAL_TARGET`]
#[derive(Clone, Debug, Default)]
pub struct JournalSink {
    /// Unit reloaded after a clear so the log forwarder reopens its files
    reload_unit: Option<String>,
}

impl JournalSink {
    pub fn new(reload_unit: Option<String>) -> Self {
        Self { reload_unit }
    }
}

#[async_trait]
impl LogSink for JournalSink {
    async fn emit(&self, entry: &SinkEntry) -> Result<(), SinkError> {
        let message_id = SEL_MESSAGE_ID.simple().to_string();
        let metadata = render_metadata(entry.metadata());
        match entry {
            SinkEntry::Record { id, record } => match &record.origin {
                Origin::System {
                    generator_id,
                    sensor_path,
                    assert,
                } => tracing::info!(
                    target: JOURNAL_TARGET,
                    MESSAGE_ID = %message_id,
                    PRIORITY = SEL_PRIORITY,
                    IPMI_SEL_RECORD_ID = id.0,
                    IPMI_SEL_RECORD_TYPE = %format!("{:x}", record.record_type),
                    IPMI_SEL_GENERATOR_ID = %format!("{generator_id:x}"),
                    IPMI_SEL_SENSOR_PATH = %sensor_path,
                    IPMI_SEL_EVENT_DIR = u8::from(*assert),
                    IPMI_SEL_DATA = %record.data_hex(),
                    metadata = %metadata,
                    "{}",
                    record.message
                ),
                Origin::Oem => tracing::info!(
                    target: JOURNAL_TARGET,
                    MESSAGE_ID = %message_id,
                    PRIORITY = SEL_PRIORITY,
                    IPMI_SEL_RECORD_ID = id.0,
                    IPMI_SEL_RECORD_TYPE = %format!("{:x}", record.record_type),
                    IPMI_SEL_DATA = %record.data_hex(),
                    "{}",
                    record.message
                ),
            },
            SinkEntry::Informational { message, .. } => tracing::info!(
                target: JOURNAL_TARGET,
                metadata = %metadata,
                "{}",
                message
            ),
        }
        Ok(())
    }

    async fn reload(&self) -> Result<(), SinkError> {
        let Some(unit) = &self.reload_unit else {
            return Ok(());
        };
        let output = Command::new("systemctl")
            .args(["reload", unit])
            .output()
            .await
            .map_err(|e| SinkError::Reload(format!("{unit}: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SinkError::Reload(format!("{unit}: {}", stderr.trim())));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
