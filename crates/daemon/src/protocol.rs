// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request protocol between `selctl` and `seld`.
//!
//! Each message is a 4-byte big-endian length followed by a JSON body.
//! One request and one response per connection.

use std::time::Duration;

use sel_adapters::IpmiResponse;
use sel_core::{PropertyMap, Signal};
use sel_storage::{LogEntry, StoreInfo};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Protocol version reported in the Hello handshake
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for reading a request or writing a response
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound on a single message body
pub const MAX_MESSAGE_SIZE: usize = 4 * 1024 * 1024;

/// Requests understood by the daemon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    Ping,

    Hello {
        version: String,
    },

    /// Add a system record raised against `sensor_path`
    Add {
        message: String,
        sensor_path: String,
        event_data: Vec<u8>,
        assert: bool,
        generator_id: u16,
    },

    /// Add an OEM record
    AddOem {
        message: String,
        event_data: Vec<u8>,
        record_type: u8,
    },

    /// Delete every record
    Clear,

    /// Delete one record
    Delete {
        id: u16,
    },

    Info,

    /// All stored records, oldest first
    Entries,

    /// Deliver a bus signal to the event monitors
    Publish {
        signal: Signal,
    },

    /// Populate properties the monitors query back
    SetProperties {
        path: String,
        interface: String,
        properties: PropertyMap,
    },

    /// Canned reply for an IPMI command
    SetIpmiResponse {
        response: IpmiResponse,
    },

    Status,

    Shutdown,
}

/// Kind of a rejected request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    EventDataTooLarge,
    InvalidSensorPath,
    Unsupported,
    Storage,
    Internal,
}

/// Responses sent by the daemon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    Pong,

    Hello {
        version: String,
    },

    Ok,

    ShuttingDown,

    /// Id of an added record, or the result of a delete.
    /// `0` when records are forwarded, `0xFFFF` when a delete found nothing.
    RecordId {
        id: u16,
    },

    Info {
        info: StoreInfo,
    },

    Entries {
        entries: Vec<LogEntry>,
    },

    /// Result of a published signal
    Published {
        /// Subscriptions the signal was delivered to
        delivered: usize,
        /// Ids of records the monitors stored
        records: Vec<u16>,
    },

    Status {
        uptime_secs: u64,
        sink: String,
        monitors: Vec<String>,
        asserted: usize,
    },

    Error {
        kind: ErrorKind,
        message: String,
    },
}

/// Protocol errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("timed out")]
    Timeout,

    #[error("connection closed")]
    ConnectionClosed,

    #[error("message of {0} bytes exceeds limit")]
    MessageTooLarge(usize),

    #[error("invalid message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize a message body (no length prefix)
pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(message)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Write a length-prefixed message
pub async fn write_message<W>(writer: &mut W, data: &[u8]) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    if data.len() > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge(data.len()));
    }
    let len = u32::try_from(data.len()).map_err(|_| ProtocolError::MessageTooLarge(data.len()))?;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(data).await?;
    writer.flush().await?;
    Ok(())
}

/// Read a length-prefixed message
pub async fn read_message<R>(reader: &mut R) -> Result<Vec<u8>, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(ProtocolError::ConnectionClosed);
        }
        Err(e) => return Err(e.into()),
    }
    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge(len));
    }
    let mut data = vec![0u8; len];
    reader.read_exact(&mut data).await?;
    Ok(data)
}

/// Read and decode a request within `timeout`
pub async fn read_request<R>(reader: &mut R, timeout: Duration) -> Result<Request, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let data = tokio::time::timeout(timeout, read_message(reader))
        .await
        .map_err(|_| ProtocolError::Timeout)??;
    decode(&data)
}

/// Encode and write a response within `timeout`
pub async fn write_response<W>(
    writer: &mut W,
    response: &Response,
    timeout: Duration,
) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    let data = encode(response)?;
    tokio::time::timeout(timeout, write_message(writer, &data))
        .await
        .map_err(|_| ProtocolError::Timeout)?
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
