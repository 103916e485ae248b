// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::monitors::process;
use sel_adapters::FakeBusClient;
use sel_core::{AssertionTracker, PropertyMap, Value};
use yare::parameterized;

const PATH: &str = "/xyz/openbmc_project/host_error_monitor/processor/CPU1_Thermtrip";

fn changed(error: &str, asserted: Option<Value>) -> Signal {
    let mut props = PropertyMap::new();
    if let Some(v) = asserted {
        props.insert("Asserted".to_string(), v);
    }
    Signal::properties_changed(":1.3", PATH, format!("{PROCESSOR_NAMESPACE}.{error}"), props)
}

async fn run(
    monitor: &mut HostErrorMonitor,
    tracker: &mut AssertionTracker,
    signal: &Signal,
) -> Option<EventRecord> {
    let bus = FakeBusClient::new();
    match process(monitor, tracker, &bus, signal).await.unwrap() {
        Some(MonitorOutput::Record(record)) => Some(record),
        Some(other) => panic!("unexpected output {other:?}"),
        None => None,
    }
}

#[parameterized(
    thermal_trip = { "ThermalTrip", 0x01 },
    ierr = { "IERR", 0x00 },
)]
fn first_byte_marks_thermal_trip(error: &str, byte0: u8) {
    let record = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(async {
            let mut monitor = HostErrorMonitor::new();
            let mut tracker = AssertionTracker::new();
            run(&mut monitor, &mut tracker, &changed(error, Some(Value::from(true)))).await
        })
        .unwrap();
    assert_eq!(record.event_data, vec![byte0, 0xFF, 0xFF]);
    assert_eq!(record.generator_id(), Some(SEL_BMC_GENERATOR_ID));
}

#[tokio::test]
async fn assert_and_deassert_messages() {
    let mut monitor = HostErrorMonitor::new();
    let mut tracker = AssertionTracker::new();

    let record = run(&mut monitor, &mut tracker, &changed("ThermalTrip", Some(Value::from(true))))
        .await
        .unwrap();
    assert_eq!(record.message, "CPU1_Thermtrip Asserted");
    assert_eq!(record.sensor_path(), Some(PATH));

    assert!(run(&mut monitor, &mut tracker, &changed("ThermalTrip", Some(Value::from(true))))
        .await
        .is_none());

    let record = run(&mut monitor, &mut tracker, &changed("ThermalTrip", Some(Value::from(false))))
        .await
        .unwrap();
    assert_eq!(record.message, "CPU1_Thermtrip De-Asserted");
    assert_eq!(record.assert(), Some(false));
}

#[tokio::test]
async fn errors_are_tracked_separately() {
    let mut monitor = HostErrorMonitor::new();
    let mut tracker = AssertionTracker::new();
    assert!(run(&mut monitor, &mut tracker, &changed("ThermalTrip", Some(Value::from(true))))
        .await
        .is_some());
    assert!(run(&mut monitor, &mut tracker, &changed("IERR", Some(Value::from(true))))
        .await
        .is_some());
    assert_eq!(tracker.len(), 2);
}

#[test]
fn missing_asserted_is_ignored() {
    let mut monitor = HostErrorMonitor::new();
    assert!(monitor.decode(&changed("IERR", None)).unwrap().is_none());
}

#[test]
fn non_bool_asserted_fails_decode() {
    let mut monitor = HostErrorMonitor::new();
    let signal = changed("IERR", Some(Value::from("yes")));
    assert!(matches!(
        monitor.decode(&signal),
        Err(MonitorError::Decode { .. })
    ));
}

#[test]
fn routes_processor_errors_only() {
    let monitor = HostErrorMonitor::new();
    assert!(monitor.accepts(&changed("ThermalTrip", None).name()));
    assert!(monitor.accepts(&changed("IERR", None).name()));
    assert!(!monitor.accepts(&changed("MCERR", None).name()));
}
