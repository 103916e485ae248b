// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Processor host errors (thermal trip, IERR)

use super::{Augmented, EventMonitor, MonitorOutput};
use crate::error::MonitorError;
use async_trait::async_trait;
use sel_adapters::BusClient;
use sel_core::{
    enum_leaf, object_name, AssertionKey, EventRecord, Signal, SignalPattern, PROPERTIES_CHANGED,
    SEL_BMC_GENERATOR_ID, SEL_EVT_DATA_UNSPECIFIED,
};

const PROCESSOR_NAMESPACE: &str = "xyz.openbmc_project.HostErrorMonitor.Processor";
const ERRORS: [&str; 2] = ["ThermalTrip", "IERR"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostErrorEvent {
    pub path: String,
    /// Interface leaf, `ThermalTrip` or `IERR`
    pub error: String,
    pub assert: bool,
}

#[derive(Debug, Default)]
pub struct HostErrorMonitor;

impl HostErrorMonitor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventMonitor for HostErrorMonitor {
    type Event = HostErrorEvent;

    fn name(&self) -> &'static str {
        "host_error"
    }

    fn patterns(&self) -> Vec<SignalPattern> {
        ERRORS
            .iter()
            .map(|e| SignalPattern::exact(PROPERTIES_CHANGED, &format!("{PROCESSOR_NAMESPACE}.{e}")))
            .collect()
    }

    fn decode(&mut self, signal: &Signal) -> Result<Option<HostErrorEvent>, MonitorError> {
        let decode = |e| MonitorError::decode(signal, e);
        let interface = signal.arg(0).and_then(|v| v.as_str()).map_err(decode)?;
        let changed = signal.arg(1).and_then(|v| v.as_dict()).map_err(decode)?;
        let Some(asserted) = changed.get("Asserted") else {
            return Ok(None);
        };
        Ok(Some(HostErrorEvent {
            path: signal.path.clone(),
            error: enum_leaf(interface).to_string(),
            assert: asserted.as_bool().map_err(decode)?,
        }))
    }

    async fn augment<B: BusClient>(
        &mut self,
        event: HostErrorEvent,
        _bus: &B,
    ) -> Result<Option<Augmented>, MonitorError> {
        let name = object_name(&event.path);
        let message = if event.assert {
            format!("{name} Asserted")
        } else {
            format!("{name} De-Asserted")
        };
        let kind = u8::from(event.error == "ThermalTrip");
        let record = EventRecord::system(
            message,
            event.path.clone(),
            vec![kind, SEL_EVT_DATA_UNSPECIFIED, SEL_EVT_DATA_UNSPECIFIED],
            event.assert,
            SEL_BMC_GENERATOR_ID,
        )?;
        Ok(Some(Augmented::tracked(
            Some(MonitorOutput::Record(record)),
            AssertionKey::new(event.path, event.error),
            event.assert,
        )))
    }
}

#[cfg(test)]
#[path = "host_error_tests.rs"]
mod tests;
