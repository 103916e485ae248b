// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event monitors: bus signals in, SEL records out.
//!
//! Every monitor has the same shape: `decode` turns a signal into a typed
//! event, `augment` queries the signal's sender for whatever else the
//! record needs. The shared [`AssertionTracker`] then decides whether the
//! transition is new, and `finalize` runs only for transitions it accepts.

mod host_error;
mod pulse;
mod threshold;
mod threshold_alarm;
mod watchdog;

pub use host_error::{HostErrorEvent, HostErrorMonitor};
pub use pulse::{PulseEvent, PulseMonitor};
pub use threshold::{ThresholdCrossing, ThresholdKind, ThresholdMonitor};
pub use threshold_alarm::ThresholdAlarmMonitor;
pub use watchdog::{WatchdogEnabledSource, WatchdogEvent, WatchdogMonitor};

use crate::error::MonitorError;
use async_trait::async_trait;
use sel_adapters::BusClient;
use sel_core::{
    AssertionKey, AssertionTracker, EventRecord, Signal, SignalPattern, Subscription,
};
use serde::{Deserialize, Serialize};

/// What a monitor hands to the record pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorOutput {
    Record(EventRecord),
    Informational {
        message: String,
        metadata: Vec<(String, String)>,
    },
}

/// An assert/deassert transition to run through the tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tracked {
    pub key: AssertionKey,
    pub assert: bool,
}

/// Result of augmenting an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Augmented {
    /// `None` when the transition should be tracked but not logged
    pub output: Option<MonitorOutput>,
    pub tracked: Option<Tracked>,
}

impl Augmented {
    pub fn untracked(output: MonitorOutput) -> Self {
        Self {
            output: Some(output),
            tracked: None,
        }
    }

    pub fn tracked(output: Option<MonitorOutput>, key: AssertionKey, assert: bool) -> Self {
        Self {
            output,
            tracked: Some(Tracked { key, assert }),
        }
    }
}

/// One event family
#[async_trait]
pub trait EventMonitor: Send {
    type Event: Send;

    fn name(&self) -> &'static str;

    /// Signal names this monitor consumes
    fn patterns(&self) -> Vec<SignalPattern>;

    /// Extract typed fields. `Ok(None)` means the signal is not relevant.
    fn decode(&mut self, signal: &Signal) -> Result<Option<Self::Event>, MonitorError>;

    /// Fetch auxiliary properties and build the output
    async fn augment<B: BusClient>(
        &mut self,
        event: Self::Event,
        bus: &B,
    ) -> Result<Option<Augmented>, MonitorError>;

    /// Last look at an output the tracker accepted; `None` drops it
    async fn finalize<B: BusClient>(
        &mut self,
        output: MonitorOutput,
        _bus: &B,
    ) -> Result<Option<MonitorOutput>, MonitorError> {
        Ok(Some(output))
    }

    fn accepts(&self, signal_name: &str) -> bool {
        self.patterns().iter().any(|p| p.matches(signal_name))
    }
}

/// Run one signal through a monitor.
///
/// The tracker only changes once augmentation succeeded, so a dropped
/// event leaves the assertion state untouched.
pub async fn process<M, B>(
    monitor: &mut M,
    tracker: &mut AssertionTracker,
    bus: &B,
    signal: &Signal,
) -> Result<Option<MonitorOutput>, MonitorError>
where
    M: EventMonitor,
    B: BusClient,
{
    let Some(event) = monitor.decode(signal)? else {
        return Ok(None);
    };
    let Some(augmented) = monitor.augment(event, bus).await? else {
        return Ok(None);
    };
    if let Some(Tracked { key, assert }) = augmented.tracked {
        if !tracker.apply(key.clone(), assert) {
            tracing::debug!(
                monitor = monitor.name(),
                source = %key.source,
                kind = %key.kind,
                assert,
                "duplicate transition suppressed"
            );
            return Ok(None);
        }
    }
    match augmented.output {
        Some(output) => monitor.finalize(output, bus).await,
        None => Ok(None),
    }
}

/// Which monitors run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub threshold: bool,
    pub threshold_alarm: bool,
    pub watchdog: bool,
    pub host_error: bool,
    pub pulse: bool,
    pub watchdog_enabled_source: WatchdogEnabledSource,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            threshold: true,
            threshold_alarm: true,
            watchdog: true,
            host_error: true,
            pulse: true,
            watchdog_enabled_source: WatchdogEnabledSource::default(),
        }
    }
}

/// The enabled monitors and the assertion state they share
pub struct Monitors {
    tracker: AssertionTracker,
    threshold: Option<ThresholdMonitor>,
    threshold_alarm: Option<ThresholdAlarmMonitor>,
    watchdog: Option<WatchdogMonitor>,
    host_error: Option<HostErrorMonitor>,
    pulse: Option<PulseMonitor>,
}

impl Monitors {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            tracker: AssertionTracker::new(),
            threshold: config.threshold.then(ThresholdMonitor::new),
            threshold_alarm: config.threshold_alarm.then(ThresholdAlarmMonitor::new),
            watchdog: config
                .watchdog
                .then(|| WatchdogMonitor::new(config.watchdog_enabled_source)),
            host_error: config.host_error.then(HostErrorMonitor::new),
            pulse: config.pulse.then(PulseMonitor::new),
        }
    }

    pub fn tracker(&self) -> &AssertionTracker {
        &self.tracker
    }

    /// Names of the enabled monitors
    pub fn enabled(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if let Some(m) = &self.threshold {
            names.push(m.name());
        }
        if let Some(m) = &self.threshold_alarm {
            names.push(m.name());
        }
        if let Some(m) = &self.watchdog {
            names.push(m.name());
        }
        if let Some(m) = &self.host_error {
            names.push(m.name());
        }
        if let Some(m) = &self.pulse {
            names.push(m.name());
        }
        names
    }

    /// Subscription covering every enabled monitor
    pub fn subscription(&self) -> Subscription {
        let mut patterns = Vec::new();
        if let Some(m) = &self.threshold {
            patterns.extend(m.patterns());
        }
        if let Some(m) = &self.threshold_alarm {
            patterns.extend(m.patterns());
        }
        if let Some(m) = &self.watchdog {
            patterns.extend(m.patterns());
        }
        if let Some(m) = &self.host_error {
            patterns.extend(m.patterns());
        }
        if let Some(m) = &self.pulse {
            patterns.extend(m.patterns());
        }
        Subscription::new("monitors", patterns, "SEL event monitors")
    }

    /// Route a signal to every monitor that accepts it.
    ///
    /// Dropped events are logged and produce no output.
    pub async fn dispatch<B: BusClient>(&mut self, signal: &Signal, bus: &B) -> Vec<MonitorOutput> {
        let name = signal.name();
        let mut outputs = Vec::new();
        run(&mut self.threshold, &mut self.tracker, bus, signal, &name, &mut outputs).await;
        run(&mut self.threshold_alarm, &mut self.tracker, bus, signal, &name, &mut outputs).await;
        run(&mut self.watchdog, &mut self.tracker, bus, signal, &name, &mut outputs).await;
        run(&mut self.host_error, &mut self.tracker, bus, signal, &name, &mut outputs).await;
        run(&mut self.pulse, &mut self.tracker, bus, signal, &name, &mut outputs).await;
        outputs
    }
}

async fn run<M, B>(
    monitor: &mut Option<M>,
    tracker: &mut AssertionTracker,
    bus: &B,
    signal: &Signal,
    name: &str,
    outputs: &mut Vec<MonitorOutput>,
) where
    M: EventMonitor,
    B: BusClient,
{
    let Some(monitor) = monitor else {
        return;
    };
    if !monitor.accepts(name) {
        return;
    }
    match process(monitor, tracker, bus, signal).await {
        Ok(Some(output)) => outputs.push(output),
        Ok(None) => {}
        Err(e) => tracing::warn!(
            monitor = monitor.name(),
            path = %signal.path,
            error = %e,
            "event dropped"
        ),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
