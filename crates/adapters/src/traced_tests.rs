// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::bus::{BusCall, FakeBusClient};
use crate::sink::{FakeLogSink, SinkCall};
use crate::test_logs::with_tracing;
use sel_core::{EventRecord, RecordId};

fn record_entry() -> SinkEntry {
    SinkEntry::Record {
        id: RecordId(7),
        record: EventRecord::system("Fan1 Asserted", "/x/Fan1", vec![1], true, 0x20).unwrap(),
    }
}

// =============================================================================
// Tracing output verification tests
// =============================================================================

#[test]
fn traced_sink_emit_logs_completion() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedLogSink::new(FakeLogSink::new());
        traced.emit(&record_entry()).await
    });

    assert!(result.is_ok());
    assert!(logs.contains("sink.emit"), "Should log span name. Logs:\n{logs}");
    assert!(logs.contains("record_id=Some(7)"), "Should log id. Logs:\n{logs}");
    assert!(logs.contains("entry emitted"), "Should log completion. Logs:\n{logs}");
    assert!(logs.contains("elapsed_ms"), "Should log timing. Logs:\n{logs}");
}

#[test]
fn traced_sink_emit_logs_failure() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeLogSink::new();
        fake.set_fail_emit(true);
        TracedLogSink::new(fake).emit(&record_entry()).await
    });

    assert!(result.is_err());
    assert!(logs.contains("emit failed"), "Logs:\n{logs}");
    assert!(logs.contains("fake emit failure"), "Logs:\n{logs}");
}

#[test]
fn traced_sink_reload_logs_operation() {
    let (logs, _) = with_tracing(|| async { TracedLogSink::new(FakeLogSink::new()).reload().await });

    assert!(logs.contains("sink.reload"), "Logs:\n{logs}");
    assert!(logs.contains("reloaded"), "Logs:\n{logs}");
}

#[test]
fn traced_bus_get_all_logs_span_and_count() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeBusClient::new();
        fake.registry()
            .set_property("/x/Fan1", "xyz.openbmc_project.Sensor.Value", "MaxValue", 100.0);
        TracedBusClient::new(fake)
            .get_all(":1.3", "/x/Fan1", "xyz.openbmc_project.Sensor.Value")
            .await
    });

    assert!(result.is_ok());
    assert!(logs.contains("bus.get_all"), "Logs:\n{logs}");
    assert!(logs.contains("/x/Fan1"), "Logs:\n{logs}");
    assert!(logs.contains("count=1"), "Logs:\n{logs}");
}

#[test]
fn traced_bus_failure_is_logged() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeBusClient::new();
        fake.set_unavailable(true);
        TracedBusClient::new(fake).ipmi_execute(0x06, 0, 0x25, &[]).await
    });

    assert!(result.is_err());
    assert!(logs.contains("bus.ipmi"), "Logs:\n{logs}");
    assert!(logs.contains("ipmi call failed"), "Logs:\n{logs}");
}

// =============================================================================
// Delegation tests - verify traced wrapper delegates to inner adapter
// =============================================================================

#[tokio::test]
async fn traced_sink_delegates_to_inner() {
    let fake = FakeLogSink::new();
    let traced = TracedLogSink::new(fake.clone());

    traced.emit(&record_entry()).await.unwrap();
    traced.reload().await.unwrap();

    assert_eq!(fake.calls(), vec![SinkCall::Emit(record_entry()), SinkCall::Reload]);
}

#[tokio::test]
async fn traced_bus_delegates_to_inner() {
    let fake = FakeBusClient::new();
    let traced = TracedBusClient::new(fake.clone());

    let _ = traced
        .get(":1.3", "/x/Fan1", "xyz.openbmc_project.Sensor.Threshold.Critical", "CriticalHigh")
        .await;

    match &fake.calls()[..] {
        [BusCall::Get { property, .. }] => assert_eq!(property, "CriticalHigh"),
        other => panic!("Expected one Get call, got {:?}", other),
    }
}
