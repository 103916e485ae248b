// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::monitors::process;
use sel_adapters::FakeBusClient;
use sel_core::{AssertionTracker, PropertyMap, Value};
use yare::parameterized;

fn host_state(state: Value) -> Signal {
    let mut changed = PropertyMap::new();
    changed.insert("CurrentHostState".to_string(), state);
    Signal::properties_changed(":1.5", "/xyz/openbmc_project/state/host0", HOST_INTERFACE, changed)
}

#[parameterized(
    off = { HOST_OFF, "Host system DC power is off", "OpenBMC.0.1.DCPowerOff" },
    running = { HOST_RUNNING, "Host system DC power is on", "OpenBMC.0.1.DCPowerOn" },
)]
fn power_transitions_are_informational(state: &str, message: &str, redfish: &str) {
    let output = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(async {
            let bus = FakeBusClient::new();
            let mut tracker = AssertionTracker::new();
            process(&mut PulseMonitor::new(), &mut tracker, &bus, &host_state(Value::from(state)))
                .await
        })
        .unwrap();

    assert_eq!(
        output,
        Some(MonitorOutput::Informational {
            message: message.to_string(),
            metadata: vec![("REDFISH_MESSAGE_ID".to_string(), redfish.to_string())],
        })
    );
}

#[test]
fn other_states_are_ignored() {
    let mut monitor = PulseMonitor::new();
    let signal = host_state(Value::from("xyz.openbmc_project.State.Host.HostState.Quiesced"));
    assert_eq!(monitor.decode(&signal).unwrap(), None);

    let mut changed = PropertyMap::new();
    changed.insert("RequestedHostTransition".to_string(), Value::from("On"));
    let signal = Signal::properties_changed(":1.5", "/h", HOST_INTERFACE, changed);
    assert_eq!(monitor.decode(&signal).unwrap(), None);
}

#[tokio::test]
async fn repeated_power_on_is_logged_each_time() {
    let bus = FakeBusClient::new();
    let mut monitor = PulseMonitor::new();
    let mut tracker = AssertionTracker::new();
    let signal = host_state(Value::from(HOST_RUNNING));
    for _ in 0..2 {
        assert!(process(&mut monitor, &mut tracker, &bus, &signal)
            .await
            .unwrap()
            .is_some());
    }
    assert!(bus.calls().is_empty());
}

#[test]
fn non_string_state_fails_decode() {
    let mut monitor = PulseMonitor::new();
    assert!(matches!(
        monitor.decode(&host_state(Value::from(1u64))),
        Err(MonitorError::Decode { .. })
    ));
}
