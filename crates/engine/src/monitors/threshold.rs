// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sensor threshold crossings reported through `ThresholdAsserted`

use super::{Augmented, EventMonitor, MonitorOutput};
use crate::error::MonitorError;
use async_trait::async_trait;
use sel_adapters::BusClient;
use sel_core::{
    scale_value, AssertionKey, EventRecord, Signal, SignalPattern, SEL_BMC_GENERATOR_ID,
    SEL_EVT_DATA_MAX_SIZE, SEL_EVT_DATA_UNSPECIFIED,
};

pub(crate) const SENSOR_VALUE_INTERFACE: &str = "xyz.openbmc_project.Sensor.Value";
const WARNING_INTERFACE: &str = "xyz.openbmc_project.Sensor.Threshold.Warning";
const CRITICAL_INTERFACE: &str = "xyz.openbmc_project.Sensor.Threshold.Critical";

/// Bytes 2 and 3 of the event data carry trigger reading and threshold
const TRIGGER_READING_BYTES: u8 = 0x40 | 0x10;

/// Which threshold was crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdKind {
    WarningLow,
    CriticalLow,
    WarningHigh,
    CriticalHigh,
}

impl ThresholdKind {
    pub const ALL: [ThresholdKind; 4] = [
        ThresholdKind::WarningLow,
        ThresholdKind::CriticalLow,
        ThresholdKind::WarningHigh,
        ThresholdKind::CriticalHigh,
    ];

    /// Parse a threshold property name such as `CriticalLow`
    pub fn from_property(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.property() == name)
    }

    /// Parse an alarm event name such as `CriticalAlarmLow`
    pub fn from_event(event: &str) -> Option<Self> {
        Self::from_property(&event.replacen("Alarm", "", 1))
    }

    /// Threshold property on the sensor's threshold interface
    pub fn property(self) -> &'static str {
        match self {
            ThresholdKind::WarningLow => "WarningLow",
            ThresholdKind::CriticalLow => "CriticalLow",
            ThresholdKind::WarningHigh => "WarningHigh",
            ThresholdKind::CriticalHigh => "CriticalHigh",
        }
    }

    pub fn interface(self) -> &'static str {
        match self {
            ThresholdKind::WarningLow | ThresholdKind::WarningHigh => WARNING_INTERFACE,
            ThresholdKind::CriticalLow | ThresholdKind::CriticalHigh => CRITICAL_INTERFACE,
        }
    }

    /// IPMI threshold event offset
    pub fn offset(self) -> u8 {
        match self {
            ThresholdKind::WarningLow => 0x00,
            ThresholdKind::CriticalLow => 0x02,
            ThresholdKind::WarningHigh => 0x07,
            ThresholdKind::CriticalHigh => 0x09,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ThresholdKind::WarningLow => "warning low",
            ThresholdKind::CriticalLow => "critical low",
            ThresholdKind::WarningHigh => "warning high",
            ThresholdKind::CriticalHigh => "critical high",
        }
    }

    fn is_low(self) -> bool {
        matches!(self, ThresholdKind::WarningLow | ThresholdKind::CriticalLow)
    }

    /// Direction the reading moved: asserting a low threshold goes low,
    /// deasserting it goes high
    pub fn going_low(self, assert: bool) -> bool {
        self.is_low() == assert
    }
}

/// A decoded threshold transition
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdCrossing {
    pub sender: String,
    pub path: String,
    pub sensor_name: String,
    pub interface: String,
    pub kind: ThresholdKind,
    pub assert: bool,
    pub value: f64,
}

impl ThresholdCrossing {
    /// Build the system record, reading limits and the threshold from the sensor
    pub(crate) async fn record<B: BusClient>(&self, bus: &B) -> Result<EventRecord, MonitorError> {
        let sensor = bus
            .get_all(&self.sender, &self.path, SENSOR_VALUE_INTERFACE)
            .await?;
        let limit = |name: &str| -> Result<f64, MonitorError> {
            match sensor.get(name) {
                Some(v) => Ok(v.as_f64()?),
                None => Ok(0.0),
            }
        };
        let max = limit("MaxValue")?;
        let min = limit("MinValue")?;

        let mut threshold = bus
            .get(&self.sender, &self.path, &self.interface, self.kind.property())
            .await?
            .as_f64()?;
        if let Some(scale) = sensor.get("Scale") {
            threshold *= 10f64.powf(scale.as_f64()?);
        }

        let mut event_data = vec![SEL_EVT_DATA_UNSPECIFIED; SEL_EVT_DATA_MAX_SIZE];
        event_data[0] = self.kind.offset() | TRIGGER_READING_BYTES;
        event_data[1] = scaled_or_unspecified(self.value, min, max);
        event_data[2] = scaled_or_unspecified(threshold, min, max);

        let direction = if self.kind.going_low(self.assert) {
            ("low", "Low")
        } else {
            ("high", "High")
        };
        let message = format!(
            "{} sensor crossed a {} threshold going {}. Reading={:.6} Threshold={:.6}.",
            self.sensor_name,
            self.kind.label(),
            direction.0,
            self.value,
            threshold
        );
        let record = EventRecord::system(
            message,
            self.path.clone(),
            event_data,
            self.assert,
            SEL_BMC_GENERATOR_ID,
        )?
        .with_metadata(
            "REDFISH_MESSAGE_ID",
            format!(
                "OpenBMC.0.1.SensorThreshold{}Going{}",
                self.kind.property(),
                direction.1
            ),
        )
        .with_metadata(
            "REDFISH_MESSAGE_ARGS",
            format!("{},{:.6},{:.6}", self.sensor_name, self.value, threshold),
        );
        Ok(record)
    }
}

fn scaled_or_unspecified(value: f64, min: f64, max: f64) -> u8 {
    match scale_value(value, min, max) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::debug!(value, min, max, error = %e, "reading not representable");
            SEL_EVT_DATA_UNSPECIFIED
        }
    }
}

/// Handles `ThresholdAsserted(sensorName, interface, event, assert, value)`
#[derive(Debug, Default)]
pub struct ThresholdMonitor;

impl ThresholdMonitor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventMonitor for ThresholdMonitor {
    type Event = ThresholdCrossing;

    fn name(&self) -> &'static str {
        "threshold"
    }

    fn patterns(&self) -> Vec<SignalPattern> {
        vec![SignalPattern::member("ThresholdAsserted")]
    }

    fn decode(&mut self, signal: &Signal) -> Result<Option<ThresholdCrossing>, MonitorError> {
        let fields = || -> Result<(String, String, String, bool, f64), sel_core::ValueError> {
            Ok((
                signal.arg(0)?.as_str()?.to_string(),
                signal.arg(1)?.as_str()?.to_string(),
                signal.arg(2)?.as_str()?.to_string(),
                signal.arg(3)?.as_bool()?,
                signal.arg(4)?.as_f64()?,
            ))
        };
        let (sensor_name, interface, event, assert, value) =
            fields().map_err(|e| MonitorError::decode(signal, e))?;
        let kind = ThresholdKind::from_event(&event).ok_or(MonitorError::Unknown {
            what: "threshold event",
            value: event,
        })?;
        Ok(Some(ThresholdCrossing {
            sender: signal.sender.clone(),
            path: signal.path.clone(),
            sensor_name,
            interface,
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
        let key = AssertionKey::new(event.path, event.kind.property());
        Ok(Some(Augmented::tracked(
            Some(MonitorOutput::Record(record)),
            key,
            event.assert,
        )))
    }
}

#[cfg(test)]
#[path = "threshold_tests.rs"]
mod tests;
