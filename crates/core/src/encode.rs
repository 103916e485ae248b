// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binary and hex forms of SEL records

use crate::record::{SEL_EVT_DATA_MAX_SIZE, SEL_EVT_DATA_UNSPECIFIED, SEL_SYSTEM_TYPE};
use thiserror::Error;

/// Direction bit in the event-dir/type byte; set means deassertion
const DEASSERT_BIT: u8 = 0x80;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("event data of {len} bytes exceeds the {max}-byte limit")]
    EventDataTooLarge { len: usize, max: usize },
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    #[error("sensor path {0:?} contains a comma or control character")]
    InvalidSensorPath(String),
}

pub(crate) fn check_len(data: &[u8], max: usize) -> Result<(), EncodeError> {
    if data.len() > max {
        return Err(EncodeError::EventDataTooLarge {
            len: data.len(),
            max,
        });
    }
    Ok(())
}

/// Reject sensor paths that would break the one-line, comma-separated log form
pub fn check_sensor_path(path: &str) -> Result<(), EncodeError> {
    if path.chars().any(|c| c == ',' || c.is_control()) {
        return Err(EncodeError::InvalidSensorPath(path.to_string()));
    }
    Ok(())
}

/// Encode a system event record body.
///
/// Layout: record type, generator id (little-endian), event direction,
/// then exactly three event data bytes padded with `0xFF`.
pub fn encode_system_record(
    event_data: &[u8],
    assert: bool,
    generator_id: u16,
) -> Result<Vec<u8>, EncodeError> {
    check_len(event_data, SEL_EVT_DATA_MAX_SIZE)?;
    let mut out = Vec::with_capacity(4 + SEL_EVT_DATA_MAX_SIZE);
    out.push(SEL_SYSTEM_TYPE);
    out.extend_from_slice(&generator_id.to_le_bytes());
    out.push(if assert { 0 } else { DEASSERT_BIT });
    out.extend_from_slice(event_data);
    out.resize(4 + SEL_EVT_DATA_MAX_SIZE, SEL_EVT_DATA_UNSPECIFIED);
    Ok(out)
}

/// Encode an OEM record body: record type followed by the raw data
pub fn encode_oem_record(event_data: &[u8], record_type: u8) -> Result<Vec<u8>, EncodeError> {
    check_len(event_data, crate::record::SEL_OEM_DATA_MAX_SIZE)?;
    let mut out = Vec::with_capacity(1 + event_data.len());
    out.push(record_type);
    out.extend_from_slice(event_data);
    Ok(out)
}

/// Uppercase hex, two digits per byte
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}

pub fn hex_decode(s: &str) -> Result<Vec<u8>, EncodeError> {
    if s.len() % 2 != 0 || !s.is_ascii() {
        return Err(EncodeError::InvalidHex(s.to_string()));
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| EncodeError::InvalidHex(s.to_string()))
        })
        .collect()
}

#[cfg(test)]
#[path = "encode_tests.rs"]
mod tests;
