// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host DC power transitions, logged as informational entries

use super::{Augmented, EventMonitor, MonitorOutput};
use crate::error::MonitorError;
use async_trait::async_trait;
use sel_adapters::BusClient;
use sel_core::{Signal, SignalPattern, PROPERTIES_CHANGED};

const HOST_INTERFACE: &str = "xyz.openbmc_project.State.Host";
const HOST_OFF: &str = "xyz.openbmc_project.State.Host.HostState.Off";
const HOST_RUNNING: &str = "xyz.openbmc_project.State.Host.HostState.Running";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseEvent {
    PowerOff,
    PowerOn,
}

impl PulseEvent {
    fn message(self) -> &'static str {
        match self {
            PulseEvent::PowerOff => "Host system DC power is off",
            PulseEvent::PowerOn => "Host system DC power is on",
        }
    }

    fn redfish_id(self) -> &'static str {
        match self {
            PulseEvent::PowerOff => "OpenBMC.0.1.DCPowerOff",
            PulseEvent::PowerOn => "OpenBMC.0.1.DCPowerOn",
        }
    }
}

#[derive(Debug, Default)]
pub struct PulseMonitor;

impl PulseMonitor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventMonitor for PulseMonitor {
    type Event = PulseEvent;

    fn name(&self) -> &'static str {
        "pulse"
    }

    fn patterns(&self) -> Vec<SignalPattern> {
        vec![SignalPattern::exact(PROPERTIES_CHANGED, HOST_INTERFACE)]
    }

    fn decode(&mut self, signal: &Signal) -> Result<Option<PulseEvent>, MonitorError> {
        let decode = |e| MonitorError::decode(signal, e);
        let changed = signal.arg(1).and_then(|v| v.as_dict()).map_err(decode)?;
        let Some(state) = changed.get("CurrentHostState") else {
            return Ok(None);
        };
        Ok(match state.as_str().map_err(decode)? {
            HOST_OFF => Some(PulseEvent::PowerOff),
            HOST_RUNNING => Some(PulseEvent::PowerOn),
            _ => None,
        })
    }

    async fn augment<B: BusClient>(
        &mut self,
        event: PulseEvent,
        _bus: &B,
    ) -> Result<Option<Augmented>, MonitorError> {
        Ok(Some(Augmented::untracked(MonitorOutput::Informational {
            message: event.message().to_string(),
            metadata: vec![(
                "REDFISH_MESSAGE_ID".to_string(),
                event.redfish_id().to_string(),
            )],
        })))
    }
}

#[cfg(test)]
#[path = "pulse_tests.rs"]
mod tests;
