// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-threshold alarm signals such as `CriticalHighAlarmAsserted(value)`

use super::threshold::{ThresholdCrossing, ThresholdKind};
use super::{Augmented, EventMonitor, MonitorOutput};
use crate::error::MonitorError;
use async_trait::async_trait;
use sel_adapters::BusClient;
use sel_core::{Signal, SignalPattern};

/// Signal member for a threshold transition, e.g. `WarningLowAlarmAsserted`
fn member(kind: ThresholdKind, assert: bool) -> String {
    let suffix = if assert { "Asserted" } else { "Deasserted" };
    format!("{}Alarm{suffix}", kind.property())
}

/// Handles the eight `{Warning,Critical}{Low,High}Alarm{Asserted,Deasserted}` signals.
///
/// These carry no assertion state of their own; the emitting sensor only
/// signals real transitions.
#[derive(Debug)]
pub struct ThresholdAlarmMonitor {
    members: Vec<(String, ThresholdKind, bool)>,
}

impl Default for ThresholdAlarmMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ThresholdAlarmMonitor {
    pub fn new() -> Self {
        let members = ThresholdKind::ALL
            .into_iter()
            .flat_map(|kind| [true, false].map(|assert| (member(kind, assert), kind, assert)))
            .collect();
        Self { members }
    }
}

#[async_trait]
impl EventMonitor for ThresholdAlarmMonitor {
    type Event = ThresholdCrossing;

    fn name(&self) -> &'static str {
        "threshold_alarm"
    }

    fn patterns(&self) -> Vec<SignalPattern> {
        self.members
            .iter()
            .map(|(member, _, _)| SignalPattern::member(member))
            .collect()
    }

    fn decode(&mut self, signal: &Signal) -> Result<Option<ThresholdCrossing>, MonitorError> {
        let Some(&(_, kind, assert)) = self.members.iter().find(|(m, _, _)| *m == signal.member)
        else {
            return Ok(None);
        };
        let value = signal
            .arg(0)
            .and_then(|v| v.as_f64())
            .map_err(|e| MonitorError::decode(signal, e))?;
        Ok(Some(ThresholdCrossing {
            sender: signal.sender.clone(),
            path: signal.path.clone(),
            sensor_name: signal.object_name().to_string(),
            interface: kind.interface().to_string(),
            kind,
            assert,
            value,
        }))
    }

    async fn augment<B: BusClient>(
        &mut self,
        event: ThresholdCrossing,
        bus: &B,
    ) -> Result<Option<Augmented>, MonitorError> {
        let record = event.record(bus).await?;
        Ok(Some(Augmented::untracked(MonitorOutput::Record(record))))
    }
}

#[cfg(test)]
#[path = "threshold_alarm_tests.rs"]
mod tests;
