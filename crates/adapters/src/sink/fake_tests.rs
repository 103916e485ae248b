// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn entry(message: &str) -> SinkEntry {
    SinkEntry::Informational {
        message: message.to_string(),
        metadata: vec![],
    }
}

#[tokio::test]
async fn fake_sink_records_calls_in_order() {
    let sink = FakeLogSink::new();
    sink.emit(&entry("one")).await.unwrap();
    sink.reload().await.unwrap();
    sink.emit(&entry("two")).await.unwrap();

    assert_eq!(
        sink.calls(),
        vec![
            SinkCall::Emit(entry("one")),
            SinkCall::Reload,
            SinkCall::Emit(entry("two"))
        ]
    );
    assert_eq!(sink.entries().len(), 2);
    assert_eq!(sink.reload_count(), 1);
}

#[tokio::test]
async fn fake_sink_can_fail_emits() {
    let sink = FakeLogSink::new();
    sink.set_fail_emit(true);
    assert!(sink.emit(&entry("lost")).await.is_err());
    assert!(sink.entries().is_empty());
}

#[tokio::test]
async fn clones_share_calls() {
    let sink = FakeLogSink::new();
    let clone = sink.clone();
    clone.emit(&entry("shared")).await.unwrap();
    assert_eq!(sink.entries()[0].message(), "shared");
}
