// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote logging service sink

use super::{LogSink, SinkEntry, SinkError};
use async_trait::async_trait;
use sel_core::Origin;
use serde::Serialize;
use std::collections::BTreeMap;

/// Severity attached to every entry sent to the logging service
pub const INFORMATIONAL_SEVERITY: &str = "xyz.openbmc_project.Logging.Entry.Level.Informational";

/// JSON body posted to the logging service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServicePayload {
    pub message: String,
    pub severity: String,
    pub additional_data: BTreeMap<String, String>,
}

impl ServicePayload {
    pub fn from_entry(entry: &SinkEntry) -> Self {
        let (message, additional_data) = match entry {
            SinkEntry::Record { record, .. } => {
                let data = record.data_hex();
                let (generator_id, path, dir) = match &record.origin {
                    Origin::System {
                        generator_id,
                        sensor_path,
                        assert,
                    } => (*generator_id, sensor_path.as_str(), u8::from(*assert)),
                    Origin::Oem => (0, "", 0),
                };
                let prefix = if path.is_empty() {
                    record.message.clone()
                } else {
                    format!("{} from {path}", record.message)
                };
                let message = format!(
                    "{prefix}:  RecordType={}, GeneratorID={generator_id}, EventDir={dir}, EventData={data}",
                    record.record_type
                );
                let mut fields = BTreeMap::from([
                    ("SENSOR_PATH".to_string(), path.to_string()),
                    ("GENERATOR_ID".to_string(), generator_id.to_string()),
                    ("RECORD_TYPE".to_string(), record.record_type.to_string()),
                    ("EVENT_DIR".to_string(), dir.to_string()),
                    ("SENSOR_DATA".to_string(), data),
                ]);
                fields.extend(record.metadata.iter().cloned());
                (message, fields)
            }
            SinkEntry::Informational { message, metadata } => {
                (message.clone(), metadata.iter().cloned().collect())
            }
        };
        Self {
            message,
            severity: INFORMATIONAL_SEVERITY.to_string(),
            additional_data,
        }
    }
}

/// Forwards entries to an external logging service over HTTP.
///
/// Nothing is stored locally in this mode.
#[derive(Clone, Debug)]
pub struct LoggingServiceSink {
    url: String,
}

impl LoggingServiceSink {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl LogSink for LoggingServiceSink {
    async fn emit(&self, entry: &SinkEntry) -> Result<(), SinkError> {
        let body = serde_json::to_string(&ServicePayload::from_entry(entry))
            .map_err(|e| SinkError::Request(e.to_string()))?;
        let url = self.url.clone();
        // ureq is blocking
        tokio::task::spawn_blocking(move || {
            ureq::post(&url)
                .header("content-type", "application/json")
                .send(body)
                .map(|_| ())
                .map_err(|e| SinkError::Request(format!("{url}: {e}")))
        })
        .await
        .map_err(|e| SinkError::Request(e.to_string()))?
    }

    async fn reload(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
