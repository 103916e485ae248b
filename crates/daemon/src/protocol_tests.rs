// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Protocol unit tests

use super::*;
use sel_core::Value;

#[test]
fn encode_decode_roundtrip_request() {
    let request = Request::Add {
        message: "Fan1 Asserted".to_string(),
        sensor_path: "/xyz/openbmc_project/sensors/fan_tach/Fan1".to_string(),
        event_data: vec![0x01, 0xFF, 0xFF],
        assert: true,
        generator_id: 0x20,
    };

    let encoded = encode(&request).expect("encode failed");
    let decoded: Request = decode(&encoded).expect("decode failed");

    assert_eq!(request, decoded);
}

#[test]
fn publish_carries_typed_signal() {
    let mut changed = PropertyMap::new();
    changed.insert("Asserted".to_string(), Value::Bool(true));
    let request = Request::Publish {
        signal: Signal::properties_changed(
            ":1.3",
            "/xyz/openbmc_project/host_error_monitor/processor/IERR",
            "xyz.openbmc_project.HostErrorMonitor.Processor.IERR",
            changed,
        ),
    };

    let encoded = encode(&request).expect("encode failed");
    let decoded: Request = decode(&encoded).expect("decode failed");

    assert_eq!(request, decoded);
}

#[test]
fn publish_accepts_handwritten_json() {
    let json = r#"{
        "type": "Publish",
        "signal": {
            "sender": ":1.9",
            "path": "/xyz/openbmc_project/watchdog/host0",
            "interface": "xyz.openbmc_project.Watchdog",
            "member": "Timeout",
            "args": [{"type": "str", "value": "xyz.openbmc_project.State.Watchdog.Action.HardReset"}]
        }
    }"#;
    let decoded: Request = decode(json.as_bytes()).expect("decode failed");
    let Request::Publish { signal } = decoded else {
        panic!("expected Publish, got {decoded:?}");
    };
    assert_eq!(signal.name(), "Timeout:xyz.openbmc_project.Watchdog");
}

#[test]
fn error_response_keeps_kind() {
    let response = Response::Error {
        kind: ErrorKind::EventDataTooLarge,
        message: "event data is 4 bytes, at most 3 allowed".to_string(),
    };

    let encoded = encode(&response).expect("encode failed");
    let json = std::str::from_utf8(&encoded).expect("should be valid UTF-8");
    assert!(json.contains(r#""kind":"EventDataTooLarge""#), "{json}");

    let decoded: Response = decode(&encoded).expect("decode failed");
    assert_eq!(response, decoded);
}

#[test]
fn encode_returns_json_without_length_prefix() {
    let response = Response::Ok;
    let encoded = encode(&response).expect("encode failed");

    // encode() returns raw JSON, no length prefix
    let json_str = std::str::from_utf8(&encoded).expect("should be valid UTF-8");
    assert!(
        json_str.starts_with('{'),
        "should be JSON object: {}",
        json_str
    );
}

#[tokio::test]
async fn read_write_message_roundtrip() {
    let original = b"hello world";

    let mut buffer = Vec::new();
    write_message(&mut buffer, original)
        .await
        .expect("write failed");

    // write_message adds 4-byte length prefix
    assert_eq!(buffer.len(), 4 + original.len());

    let mut cursor = std::io::Cursor::new(buffer);
    let read_back = read_message(&mut cursor).await.expect("read failed");

    assert_eq!(read_back, original);
}

#[tokio::test]
async fn write_message_adds_length_prefix() {
    let data = b"test data";

    let mut buffer = Vec::new();
    write_message(&mut buffer, data)
        .await
        .expect("write failed");

    // First 4 bytes are the length prefix
    let len = u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]) as usize;

    assert_eq!(len, data.len());
    assert_eq!(&buffer[4..], data);
}

#[tokio::test]
async fn empty_stream_is_connection_closed() {
    let mut cursor = std::io::Cursor::new(Vec::<u8>::new());
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::ConnectionClosed));
}

#[tokio::test]
async fn oversized_length_is_rejected() {
    let prefix = u32::try_from(MAX_MESSAGE_SIZE + 1).unwrap().to_be_bytes();
    let mut cursor = std::io::Cursor::new(prefix.to_vec());
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::MessageTooLarge(_)));
}

#[tokio::test]
async fn read_request_decodes_framed_json() {
    let mut buffer = Vec::new();
    write_message(&mut buffer, br#"{"type":"Delete","id":7}"#)
        .await
        .unwrap();
    let mut cursor = std::io::Cursor::new(buffer);
    let request = read_request(&mut cursor, DEFAULT_TIMEOUT).await.unwrap();
    assert_eq!(request, Request::Delete { id: 7 });
}
