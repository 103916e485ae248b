// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted line format.
//!
//! ```text
//! 2026-01-01T00:00:00+00:00 1,02,01FFFF,0020,/x/Fan1,1
//! 2026-01-01T00:00:05+00:00 2,E0,DEAD,,,
//! ```
//!
//! The record id is always the second token when splitting on space and
//! comma.

use chrono::{DateTime, Utc};
use sel_core::{hex_decode, hex_encode, EncodeError, EventRecord, Origin, RecordId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("malformed log line: {0}")]
    Malformed(String),
    #[error("invalid {field} in log line: {value}")]
    InvalidField { field: &'static str, value: String },
    #[error(transparent)]
    Hex(#[from] EncodeError),
}

/// One parsed line of the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub id: RecordId,
    pub record_type: u8,
    pub data: Vec<u8>,
    pub generator_id: Option<u16>,
    pub sensor_path: Option<String>,
    pub assert: Option<bool>,
}

/// Render a record as one log line (without the trailing newline)
pub fn format_line(timestamp: DateTime<Utc>, id: RecordId, record: &EventRecord) -> String {
    let head = format!(
        "{} {},{:02X},{}",
        timestamp.to_rfc3339(),
        id,
        record.record_type,
        hex_encode(&record.event_data)
    );
    match &record.origin {
        Origin::System {
            generator_id,
            sensor_path,
            assert,
        } => format!(
            "{head},{generator_id:04X},{sensor_path},{}",
            u8::from(*assert)
        ),
        Origin::Oem => format!("{head},,,"),
    }
}

/// Record id of a line, if it has one
pub fn record_id_of(line: &str) -> Option<RecordId> {
    line.split([' ', ','])
        .filter(|t| !t.is_empty())
        .nth(1)
        .and_then(|t| t.parse::<u16>().ok())
        .map(RecordId)
}

fn invalid(field: &'static str, value: &str) -> LineError {
    LineError::InvalidField {
        field,
        value: value.to_string(),
    }
}

fn optional(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

impl LogEntry {
    pub fn parse(line: &str) -> Result<Self, LineError> {
        let malformed = || LineError::Malformed(line.to_string());
        let (ts, rest) = line.split_once(' ').ok_or_else(malformed)?;
        let fields: Vec<&str> = rest.split(',').collect();
        let &[id, record_type, data, generator, path, dir] = fields.as_slice() else {
            return Err(malformed());
        };

        let timestamp = DateTime::parse_from_rfc3339(ts)
            .map_err(|_| invalid("timestamp", ts))?
            .with_timezone(&Utc);
        let id = id.parse::<u16>().map(RecordId).map_err(|_| invalid("id", id))?;
        let record_type =
            u8::from_str_radix(record_type, 16).map_err(|_| invalid("record type", record_type))?;
        let data = hex_decode(data)?;
        let generator_id = optional(generator)
            .map(|g| u16::from_str_radix(g, 16).map_err(|_| invalid("generator id", g)))
            .transpose()?;
        let assert = match dir {
            "" => None,
            "1" => Some(true),
            "0" => Some(false),
            other => return Err(invalid("direction", other)),
        };

        Ok(Self {
            timestamp,
            id,
            record_type,
            data,
            generator_id,
            sensor_path: optional(path).map(str::to_string),
            assert,
        })
    }
}

#[cfg(test)]
#[path = "line_tests.rs"]
mod tests;
