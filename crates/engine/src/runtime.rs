// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record pipeline: id allocation, persistence and sink emission

use crate::error::RuntimeError;
use crate::monitors::MonitorOutput;
use sel_adapters::{LogSink, SinkEntry};
use sel_core::{Clock, EventRecord, RecordId};
use sel_storage::{AppendError, LogEntry, LogStore, StoreInfo};

/// The SEL record engine.
///
/// With a store, records are persisted locally and get ids. Without one
/// (logging-service mode) records are only forwarded and the returned id
/// is `RecordId::UNASSIGNED`.
pub struct SelRuntime<S, C: Clock> {
    sink: S,
    store: Option<LogStore<C>>,
}

impl<S, C> SelRuntime<S, C>
where
    S: LogSink,
    C: Clock,
{
    pub fn new(sink: S, store: Option<LogStore<C>>) -> Self {
        Self { sink, store }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn store(&self) -> Option<&LogStore<C>> {
        self.store.as_ref()
    }

    /// Add a system record raised against `sensor_path`
    pub async fn add_system(
        &mut self,
        message: &str,
        sensor_path: &str,
        event_data: Vec<u8>,
        assert: bool,
        generator_id: u16,
    ) -> Result<RecordId, RuntimeError> {
        let record = EventRecord::system(message, sensor_path, event_data, assert, generator_id)?;
        self.record(record).await
    }

    pub async fn add_oem(
        &mut self,
        message: &str,
        event_data: Vec<u8>,
        record_type: u8,
    ) -> Result<RecordId, RuntimeError> {
        let record = EventRecord::oem(message, event_data, record_type)?;
        self.record(record).await
    }

    /// Persist and emit a validated record.
    ///
    /// A failed write still consumes the id; the record is emitted to the
    /// sink regardless.
    pub async fn record(&mut self, record: EventRecord) -> Result<RecordId, RuntimeError> {
        let id = match &mut self.store {
            Some(store) => match store.append(&record) {
                Ok(id) => id,
                Err(AppendError::Invalid(e)) => return Err(e.into()),
                Err(AppendError::Write { id, source }) => {
                    tracing::error!(%id, error = %source, "record not persisted");
                    id
                }
            },
            None => RecordId::UNASSIGNED,
        };

        let entry = SinkEntry::Record { id, record };
        if let Err(e) = self.sink.emit(&entry).await {
            if self.store.is_none() {
                return Err(e.into());
            }
            tracing::warn!(%id, error = %e, "sink emit failed");
        }
        Ok(id)
    }

    /// Emit an informational entry with no SEL record
    pub async fn log_informational(
        &self,
        message: String,
        metadata: Vec<(String, String)>,
    ) -> Result<(), RuntimeError> {
        let entry = SinkEntry::Informational { message, metadata };
        self.sink.emit(&entry).await?;
        Ok(())
    }

    /// Hand monitor output to the pipeline. Returns the id of a stored record.
    pub async fn submit(&mut self, output: MonitorOutput) -> Result<Option<RecordId>, RuntimeError> {
        match output {
            MonitorOutput::Record(record) => self.record(record).await.map(Some),
            MonitorOutput::Informational { message, metadata } => {
                self.log_informational(message, metadata).await?;
                Ok(None)
            }
        }
    }

    fn store_mut(&mut self, operation: &'static str) -> Result<&mut LogStore<C>, RuntimeError> {
        self.store.as_mut().ok_or(RuntimeError::Unsupported(operation))
    }

    fn store_ref(&self, operation: &'static str) -> Result<&LogStore<C>, RuntimeError> {
        self.store.as_ref().ok_or(RuntimeError::Unsupported(operation))
    }

    /// Delete every record and restart ids from 1
    pub async fn clear(&mut self) -> Result<(), RuntimeError> {
        self.store_mut("clear")?.clear()?;
        if let Err(e) = self.sink.reload().await {
            tracing::warn!(error = %e, "sink reload after clear failed");
        }
        Ok(())
    }

    /// Delete one record. Returns `id`, or `RecordId::INVALID` if absent.
    pub fn delete(&mut self, id: RecordId) -> Result<RecordId, RuntimeError> {
        let store = self.store_mut("delete")?;
        if !id.is_valid() {
            return Ok(RecordId::INVALID);
        }
        if store.delete_record(id)? {
            Ok(id)
        } else {
            Ok(RecordId::INVALID)
        }
    }

    pub fn info(&self) -> Result<StoreInfo, RuntimeError> {
        Ok(self.store_ref("info")?.info()?)
    }

    pub fn entries(&self) -> Result<Vec<LogEntry>, RuntimeError> {
        Ok(self.store_ref("entries")?.entries()?)
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
