// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sel_adapters::{FakeLogSink, SinkCall};
use sel_core::{EncodeError, FakeClock, SEL_BMC_GENERATOR_ID};
use sel_storage::StoreConfig;
use tempfile::TempDir;

const FAN: &str = "/xyz/openbmc_project/sensors/fan_tach/Fan1";

fn local(dir: &TempDir) -> (SelRuntime<FakeLogSink, FakeClock>, FakeLogSink) {
    let config = StoreConfig::new(dir.path().join("log"), dir.path().join("sel_erase_time"));
    let store = LogStore::open(config, FakeClock::new()).unwrap();
    let sink = FakeLogSink::new();
    (SelRuntime::new(sink.clone(), Some(store)), sink)
}

fn forwarding() -> (SelRuntime<FakeLogSink, FakeClock>, FakeLogSink) {
    let sink = FakeLogSink::new();
    (SelRuntime::new(sink.clone(), None), sink)
}

async fn add(runtime: &mut SelRuntime<FakeLogSink, FakeClock>, message: &str) -> RecordId {
    runtime
        .add_system(message, FAN, vec![0x01, 0xFF, 0xFF], true, SEL_BMC_GENERATOR_ID)
        .await
        .unwrap()
}

#[tokio::test]
async fn add_delete_reuses_freed_id() {
    let dir = TempDir::new().unwrap();
    let (mut runtime, _) = local(&dir);

    assert_eq!(add(&mut runtime, "first").await, RecordId(1));
    assert_eq!(add(&mut runtime, "second").await, RecordId(2));
    assert_eq!(runtime.delete(RecordId(1)).unwrap(), RecordId(1));
    assert_eq!(add(&mut runtime, "third").await, RecordId(1));

    let mut ids: Vec<u16> = runtime.entries().unwrap().iter().map(|e| e.id.0).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn records_reach_the_sink_with_their_id() {
    let dir = TempDir::new().unwrap();
    let (mut runtime, sink) = local(&dir);

    let id = add(&mut runtime, "Fan1 Asserted").await;
    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    let SinkEntry::Record { id: emitted, record } = &entries[0] else {
        panic!("expected record entry, got {:?}", entries[0]);
    };
    assert_eq!(*emitted, id);
    assert_eq!(record.message, "Fan1 Asserted");
}

#[tokio::test]
async fn oversized_event_data_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (mut runtime, sink) = local(&dir);

    let err = runtime
        .add_system("too big", FAN, vec![0; 4], true, SEL_BMC_GENERATOR_ID)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::EventData(EncodeError::EventDataTooLarge { len: 4, max: 3 })
    ));

    let err = runtime.add_oem("too big", vec![0; 14], 0xE0).await.unwrap_err();
    assert!(matches!(err, RuntimeError::EventData(_)));

    assert!(sink.entries().is_empty());
    assert_eq!(add(&mut runtime, "ok").await, RecordId(1));
}

#[tokio::test]
async fn separator_in_sensor_path_is_rejected_before_sink() {
    let dir = TempDir::new().unwrap();
    let (mut runtime, sink) = local(&dir);

    let err = runtime
        .add_system("forged", "/x/Fan,1", vec![0x01], true, SEL_BMC_GENERATOR_ID)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::EventData(EncodeError::InvalidSensorPath(_))
    ));

    assert!(sink.entries().is_empty());
    assert!(runtime.entries().unwrap().is_empty());
    assert_eq!(add(&mut runtime, "ok").await, RecordId(1));
}

#[tokio::test]
async fn oem_record_gets_an_id() {
    let dir = TempDir::new().unwrap();
    let (mut runtime, _) = local(&dir);
    let id = runtime
        .add_oem("vendor", vec![0xDE, 0xAD, 0xBE, 0xEF], 0xE0)
        .await
        .unwrap();
    assert_eq!(id, RecordId(1));

    let entries = runtime.entries().unwrap();
    assert_eq!(entries[0].record_type, 0xE0);
    assert_eq!(entries[0].sensor_path, None);
}

#[tokio::test]
async fn clear_restarts_ids_and_reloads_sink() {
    let dir = TempDir::new().unwrap();
    let (mut runtime, sink) = local(&dir);
    add(&mut runtime, "a").await;
    add(&mut runtime, "b").await;

    runtime.clear().await.unwrap();

    let info = runtime.info().unwrap();
    assert_eq!(info.entries, 0);
    assert!(info.last_erase.is_some());
    assert_eq!(sink.reload_count(), 1);
    assert_eq!(add(&mut runtime, "c").await, RecordId(1));
}

#[tokio::test]
async fn delete_of_missing_or_invalid_id_is_invalid() {
    let dir = TempDir::new().unwrap();
    let (mut runtime, _) = local(&dir);
    add(&mut runtime, "a").await;

    assert_eq!(runtime.delete(RecordId(9)).unwrap(), RecordId::INVALID);
    assert_eq!(runtime.delete(RecordId::INVALID).unwrap(), RecordId::INVALID);
    assert_eq!(runtime.info().unwrap().entries, 1);
}

#[tokio::test]
async fn sink_failure_does_not_lose_local_record() {
    let dir = TempDir::new().unwrap();
    let (mut runtime, sink) = local(&dir);
    sink.set_fail_emit(true);

    assert_eq!(add(&mut runtime, "a").await, RecordId(1));
    assert_eq!(runtime.info().unwrap().entries, 1);
}

#[tokio::test]
async fn write_failure_still_consumes_id_and_emits() {
    let dir = TempDir::new().unwrap();
    let (mut runtime, sink) = local(&dir);
    std::fs::remove_dir_all(dir.path().join("log")).unwrap();

    assert_eq!(add(&mut runtime, "lost").await, RecordId(1));
    assert_eq!(sink.entries().len(), 1);

    std::fs::create_dir_all(dir.path().join("log")).unwrap();
    assert_eq!(add(&mut runtime, "kept").await, RecordId(2));
}

#[tokio::test]
async fn forwarding_mode_returns_unassigned_id() {
    let (mut runtime, sink) = forwarding();

    assert_eq!(add(&mut runtime, "a").await, RecordId::UNASSIGNED);
    assert_eq!(sink.entries().len(), 1);
    assert!(runtime.store().is_none());
}

#[tokio::test]
async fn forwarding_mode_rejects_store_operations() {
    let (mut runtime, sink) = forwarding();

    assert!(matches!(
        runtime.clear().await,
        Err(RuntimeError::Unsupported("clear"))
    ));
    assert!(matches!(
        runtime.delete(RecordId(1)),
        Err(RuntimeError::Unsupported("delete"))
    ));
    assert!(matches!(runtime.info(), Err(RuntimeError::Unsupported(_))));
    assert!(matches!(runtime.entries(), Err(RuntimeError::Unsupported(_))));
    assert!(!sink.calls().contains(&SinkCall::Reload));
}

#[tokio::test]
async fn forwarding_mode_surfaces_sink_failure() {
    let (mut runtime, sink) = forwarding();
    sink.set_fail_emit(true);

    let err = runtime
        .add_system("a", FAN, vec![], false, SEL_BMC_GENERATOR_ID)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Sink(_)));
}

#[tokio::test]
async fn informational_output_has_no_id() {
    let dir = TempDir::new().unwrap();
    let (mut runtime, sink) = local(&dir);

    let id = runtime
        .submit(MonitorOutput::Informational {
            message: "Host system DC power is on".to_string(),
            metadata: vec![],
        })
        .await
        .unwrap();
    assert_eq!(id, None);
    assert_eq!(sink.entries()[0].message(), "Host system DC power is on");
    assert_eq!(runtime.info().unwrap().entries, 0);
}

#[tokio::test]
async fn reopened_store_continues_after_highest_id() {
    let dir = TempDir::new().unwrap();
    {
        let (mut runtime, _) = local(&dir);
        for n in 0..3 {
            add(&mut runtime, &format!("r{n}")).await;
        }
        runtime.delete(RecordId(3)).unwrap();
    }
    let (mut runtime, _) = local(&dir);
    assert_eq!(add(&mut runtime, "after restart").await, RecordId(3));
}
