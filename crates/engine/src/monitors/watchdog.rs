// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watchdog timeouts and enable/disable transitions

use super::{Augmented, EventMonitor, MonitorOutput};
use crate::error::MonitorError;
use async_trait::async_trait;
use sel_adapters::BusClient;
use sel_core::{
    enum_leaf, AssertionKey, EventRecord, PropertyMap, Signal, SignalPattern,
    PROPERTIES_CHANGED, SEL_BMC_GENERATOR_ID, SEL_EVT_DATA_MAX_SIZE, SEL_EVT_DATA_UNSPECIFIED,
};
use serde::{Deserialize, Serialize};

const TIMEOUT_INTERFACE: &str = "xyz.openbmc_project.Watchdog";
const STATE_INTERFACE: &str = "xyz.openbmc_project.State.Watchdog";

/// IPMI Get Watchdog Timer
const GET_WATCHDOG_NETFN: u8 = 0x06;
const GET_WATCHDOG_CMD: u8 = 0x25;
/// Timer use byte, bit 7: don't log
const NO_LOG_BIT: u8 = 0x80;

const INTERRUPT_SHIFT: u8 = 4;
const TIMER_USE_UNSPECIFIED: u8 = 0x0F;

/// Where the new `Enabled` value is read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchdogEnabledSource {
    /// The value carried by the property change
    #[default]
    Signal,
    /// Re-read `Enabled` from the watchdog object
    Property,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchdogEvent {
    /// The timer expired and `action` was taken
    Timeout {
        sender: String,
        path: String,
        action: String,
    },
    /// `Enabled` changed
    Enabled {
        sender: String,
        path: String,
        enabled: bool,
    },
}

/// Handles `Timeout(action)` and `Enabled` property changes.
///
/// Every accepted enable samples the IPMI "don't log" bit; it stays in
/// force until the next one. Duplicate enables leave it alone.
#[derive(Debug)]
pub struct WatchdogMonitor {
    enabled_source: WatchdogEnabledSource,
    no_log: bool,
}

impl WatchdogMonitor {
    pub fn new(enabled_source: WatchdogEnabledSource) -> Self {
        Self {
            enabled_source,
            no_log: false,
        }
    }

    async fn sample_no_log<B: BusClient>(&mut self, bus: &B) {
        match bus
            .ipmi_execute(GET_WATCHDOG_NETFN, 0, GET_WATCHDOG_CMD, &[])
            .await
        {
            Ok(response) => {
                self.no_log = response.data.first().is_some_and(|b| b & NO_LOG_BIT != 0);
            }
            Err(e) => {
                tracing::warn!(error = %e, "watchdog timer query failed, logging enabled");
                self.no_log = false;
            }
        }
    }
}

fn action_offset(action: &str) -> u8 {
    match action {
        "None" => 0x00,
        "HardReset" => 0x01,
        "PowerOff" => 0x02,
        "PowerCycle" => 0x03,
        _ => SEL_EVT_DATA_UNSPECIFIED,
    }
}

fn interrupt_offset(interrupt: &str) -> Option<u8> {
    match interrupt {
        "None" => Some(0x00),
        "SMI" => Some(0x01),
        "NMI" => Some(0x02),
        "MI" => Some(0x03),
        _ => None,
    }
}

fn timer_use_offset(timer_use: &str) -> u8 {
    match timer_use {
        "BIOSFRB2" => 0x01,
        "BIOSPOST" => 0x02,
        "OSLoad" => 0x03,
        "SMSOS" => 0x04,
        "OEM" => 0x05,
        _ => TIMER_USE_UNSPECIFIED,
    }
}

fn leaf_of<'a>(status: &'a PropertyMap, name: &str) -> Result<&'a str, MonitorError> {
    match status.get(name) {
        Some(v) => Ok(enum_leaf(v.as_str()?)),
        None => Ok(""),
    }
}

/// Event data and message for a watchdog transition
fn describe(
    status: &PropertyMap,
    action: Option<&str>,
    assert: bool,
) -> Result<(Vec<u8>, String), MonitorError> {
    let action = match action {
        Some(a) => a,
        None => leaf_of(status, "ExpireAction")?,
    };
    let interrupt = leaf_of(status, "PreTimeoutInterrupt")?;
    let timer_use = leaf_of(status, "CurrentTimerUse")?;
    let interval = match status.get("Interval") {
        Some(v) => v.as_u64()?,
        None => 0,
    };

    let mut event_data = vec![SEL_EVT_DATA_UNSPECIFIED; SEL_EVT_DATA_MAX_SIZE];
    event_data[0] = action_offset(action);
    // An unknown interrupt leaves the whole byte unspecified
    event_data[1] = match interrupt_offset(interrupt) {
        Some(i) => (i << INTERRUPT_SHIFT) | timer_use_offset(timer_use),
        None => SEL_EVT_DATA_UNSPECIFIED,
    };

    let direction = if assert { "enable" } else { "disable" };
    let message = format!(
        "{timer_use} {direction} watchdog countdown {} seconds {action} action",
        interval / 1000
    );
    Ok((event_data, message))
}

#[async_trait]
impl EventMonitor for WatchdogMonitor {
    type Event = WatchdogEvent;

    fn name(&self) -> &'static str {
        "watchdog"
    }

    fn patterns(&self) -> Vec<SignalPattern> {
        vec![
            SignalPattern::exact("Timeout", TIMEOUT_INTERFACE),
            SignalPattern::exact(PROPERTIES_CHANGED, STATE_INTERFACE),
        ]
    }

    fn decode(&mut self, signal: &Signal) -> Result<Option<WatchdogEvent>, MonitorError> {
        let decode = |e| MonitorError::decode(signal, e);
        if signal.member == PROPERTIES_CHANGED {
            let changed = signal.arg(1).and_then(|v| v.as_dict()).map_err(decode)?;
            let Some(enabled) = changed.get("Enabled") else {
                return Ok(None);
            };
            return Ok(Some(WatchdogEvent::Enabled {
                sender: signal.sender.clone(),
                path: signal.path.clone(),
                enabled: enabled.as_bool().map_err(decode)?,
            }));
        }
        let action = signal.arg(0).and_then(|v| v.as_str()).map_err(decode)?;
        Ok(Some(WatchdogEvent::Timeout {
            sender: signal.sender.clone(),
            path: signal.path.clone(),
            action: enum_leaf(action).to_string(),
        }))
    }

    async fn augment<B: BusClient>(
        &mut self,
        event: WatchdogEvent,
        bus: &B,
    ) -> Result<Option<Augmented>, MonitorError> {
        let (sender, path, action, assert, tracked) = match event {
            WatchdogEvent::Timeout {
                sender,
                path,
                action,
            } => (sender, path, Some(action), true, false),
            WatchdogEvent::Enabled {
                sender,
                path,
                enabled,
            } => {
                let enabled = match self.enabled_source {
                    WatchdogEnabledSource::Signal => enabled,
                    WatchdogEnabledSource::Property => bus
                        .get(&sender, &path, STATE_INTERFACE, "Enabled")
                        .await?
                        .as_bool()?,
                };
                (sender, path, None, enabled, true)
            }
        };

        let status = bus.get_all(&sender, &path, STATE_INTERFACE).await?;
        let (event_data, message) = describe(&status, action.as_deref(), assert)?;

        let record = EventRecord::system(
            message,
            path.clone(),
            event_data,
            assert,
            SEL_BMC_GENERATOR_ID,
        )?
        .with_metadata("REDFISH_MESSAGE_ID", "OpenBMC.0.1.IPMIWatchdog")
        .with_metadata(
            "REDFISH_MESSAGE_ARGS",
            if assert { "Enabled" } else { "Disabled" },
        );
        let output = MonitorOutput::Record(record);

        if tracked {
            Ok(Some(Augmented::tracked(
                Some(output),
                AssertionKey::new(path, "Enabled"),
                assert,
            )))
        } else {
            Ok(Some(Augmented::untracked(output)))
        }
    }

    async fn finalize<B: BusClient>(
        &mut self,
        output: MonitorOutput,
        bus: &B,
    ) -> Result<Option<MonitorOutput>, MonitorError> {
        let MonitorOutput::Record(record) = &output else {
            return Ok(Some(output));
        };
        if record.assert() == Some(true) {
            self.sample_no_log(bus).await;
        }
        if self.no_log {
            tracing::debug!(
                path = ?record.sensor_path(),
                assert = ?record.assert(),
                "watchdog event not logged"
            );
            return Ok(None);
        }
        Ok(Some(output))
    }
}

#[cfg(test)]
#[path = "watchdog_tests.rs"]
mod tests;
