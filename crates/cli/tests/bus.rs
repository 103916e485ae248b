// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI integration tests for signal publication and daemon control

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(deprecated)]

mod common;

use common::FakeDaemon;
use predicates::prelude::*;
use sel_adapters::IpmiResponse;
use sel_core::{PropertyMap, Signal, Value};
use sel_daemon::{Request, Response};

const HOST_ERROR_SIGNAL: &str = r#"{
    "sender": ":1.3",
    "path": "/xyz/openbmc_project/host_error_monitor/processor/CPU0_Thermtrip",
    "interface": "org.freedesktop.DBus.Properties",
    "member": "PropertiesChanged",
    "args": [
        {"type": "str", "value": "xyz.openbmc_project.HostErrorMonitor.Processor.ThermalTrip"},
        {"type": "dict", "value": {"Asserted": {"type": "bool", "value": true}}}
    ]
}"#;

#[test]
fn publish_inline_signal() {
    let daemon = FakeDaemon::start(|_| Response::Published {
        delivered: 1,
        records: vec![4],
    });

    daemon
        .selctl()
        .args(["publish", HOST_ERROR_SIGNAL])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stored record 4"));

    let requests = daemon.requests();
    let [Request::Publish { signal }] = requests.as_slice() else {
        panic!("expected one publish, got {requests:?}");
    };
    let mut changed = PropertyMap::new();
    changed.insert("Asserted".to_string(), Value::Bool(true));
    assert_eq!(
        *signal,
        Signal::properties_changed(
            ":1.3",
            "/xyz/openbmc_project/host_error_monitor/processor/CPU0_Thermtrip",
            "xyz.openbmc_project.HostErrorMonitor.Processor.ThermalTrip",
            changed,
        )
    );
}

#[test]
fn publish_from_file() {
    let daemon = FakeDaemon::start(|_| Response::Published {
        delivered: 1,
        records: vec![],
    });
    let path = daemon.dir().join("signal.json");
    std::fs::write(&path, HOST_ERROR_SIGNAL).unwrap();

    daemon
        .selctl()
        .args(["publish", &format!("@{}", path.display())])
        .assert()
        .success()
        .stdout(predicate::str::contains("Delivered to 1 subscription(s)"));
}

#[test]
fn publish_invalid_json_fails_before_sending() {
    let daemon = FakeDaemon::start(|_| Response::Ok);

    daemon
        .selctl()
        .args(["publish", "{\"path\": 1}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid signal JSON"));
    assert!(daemon.requests().is_empty());
}

#[test]
fn set_properties_and_ipmi_response() {
    let daemon = FakeDaemon::start(|_| Response::Ok);

    daemon
        .selctl()
        .args([
            "set-properties",
            "/xyz/openbmc_project/sensors/temperature/CPU0",
            "xyz.openbmc_project.Sensor.Value",
            r#"{"MaxValue": {"type": "double", "value": 255.0}}"#,
        ])
        .assert()
        .success();
    daemon
        .selctl()
        .args([
            "set-ipmi-response",
            "--netfn",
            "0x06",
            "--cmd",
            "0x25",
            "--data",
            "8000",
        ])
        .assert()
        .success();

    let mut properties = PropertyMap::new();
    properties.insert("MaxValue".to_string(), Value::Double(255.0));
    assert_eq!(
        daemon.requests(),
        vec![
            Request::SetProperties {
                path: "/xyz/openbmc_project/sensors/temperature/CPU0".to_string(),
                interface: "xyz.openbmc_project.Sensor.Value".to_string(),
                properties,
            },
            Request::SetIpmiResponse {
                response: IpmiResponse {
                    netfn: 0x06,
                    lun: 0,
                    cmd: 0x25,
                    cc: 0,
                    data: vec![0x80, 0x00],
                },
            },
        ]
    );
}

#[test]
fn status_and_shutdown() {
    let daemon = FakeDaemon::start(|request| match request {
        Request::Status => Response::Status {
            uptime_secs: 12,
            sink: "journal".to_string(),
            monitors: vec!["threshold".to_string(), "pulse".to_string()],
            asserted: 3,
        },
        _ => Response::ShuttingDown,
    });

    daemon
        .selctl()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Monitors: threshold, pulse"))
        .stdout(predicate::str::contains("Asserted: 3"));
    daemon
        .selctl()
        .arg("shutdown")
        .assert()
        .success()
        .stdout(predicate::str::contains("Daemon stopping"));
}
