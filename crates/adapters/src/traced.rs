// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::bus::{BusClient, BusError, IpmiResponse};
use crate::sink::{LogSink, SinkEntry, SinkError};
use async_trait::async_trait;
use sel_core::{PropertyMap, Value};
use tracing::Instrument;

/// Wrapper that adds tracing to any LogSink
#[derive(Clone)]
pub struct TracedLogSink<S> {
    inner: S,
}

impl<S> TracedLogSink<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: LogSink> LogSink for TracedLogSink<S> {
    async fn emit(&self, entry: &SinkEntry) -> Result<(), SinkError> {
        let record_id = match entry {
            SinkEntry::Record { id, .. } => Some(id.0),
            SinkEntry::Informational { .. } => None,
        };
        let span = tracing::info_span!("sink.emit", record_id = ?record_id);

        async move {
            let start = std::time::Instant::now();
            let result = self.inner.emit(entry).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::debug!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    "entry emitted"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "emit failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn reload(&self) -> Result<(), SinkError> {
        async move {
            let result = self.inner.reload().await;
            // A failed reload leaves the old files open until the next rotation
            match &result {
                Ok(()) => tracing::info!("reloaded"),
                Err(e) => tracing::warn!(error = %e, "reload failed"),
            }
            result
        }
        .instrument(tracing::info_span!("sink.reload"))
        .await
    }
}

/// Wrapper that adds tracing to any BusClient
#[derive(Clone)]
pub struct TracedBusClient<B> {
    inner: B,
}

impl<B> TracedBusClient<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

#[async_trait]
impl<B: BusClient> BusClient for TracedBusClient<B> {
    async fn get_all(
        &self,
        service: &str,
        path: &str,
        interface: &str,
    ) -> Result<PropertyMap, BusError> {
        let span = tracing::info_span!("bus.get_all", service, path, interface);

        async move {
            let start = std::time::Instant::now();
            let result = self.inner.get_all(service, path, interface).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(props) => tracing::debug!(
                    count = props.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "properties fetched"
                ),
                Err(e) => tracing::warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "get_all failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn get(
        &self,
        service: &str,
        path: &str,
        interface: &str,
        property: &str,
    ) -> Result<Value, BusError> {
        let span = tracing::info_span!("bus.get", service, path, interface, property);

        async move {
            let result = self.inner.get(service, path, interface, property).await;
            match &result {
                Ok(value) => tracing::debug!(value = ?value, "property fetched"),
                Err(e) => tracing::warn!(error = %e, "get failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn ipmi_execute(
        &self,
        netfn: u8,
        lun: u8,
        cmd: u8,
        data: &[u8],
    ) -> Result<IpmiResponse, BusError> {
        let span = tracing::info_span!("bus.ipmi", netfn, cmd);

        async move {
            let start = std::time::Instant::now();
            let result = self.inner.ipmi_execute(netfn, lun, cmd, data).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(rsp) => tracing::debug!(
                    cc = rsp.cc,
                    len = rsp.data.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "ipmi reply"
                ),
                Err(e) => tracing::warn!(error = %e, "ipmi call failed"),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
