// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client for CLI commands

use std::path::{Path, PathBuf};
use std::time::Duration;

use sel_adapters::IpmiResponse;
use sel_core::{PropertyMap, Signal};
use sel_daemon::protocol::{self, ProtocolError};
use sel_daemon::{Config, ErrorKind, Request, Response, STARTUP_MARKER_PREFIX};
use sel_storage::{LogEntry, StoreInfo};
use serde::Serialize;
use thiserror::Error;
use tokio::net::UnixStream;

/// Record id the daemon returns when a delete matched nothing
const NOT_FOUND_ID: u16 = 0xFFFF;

// Timeout configuration (env vars in milliseconds)
fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout for IPC requests
pub fn timeout_ipc() -> Duration {
    parse_duration_ms("SEL_TIMEOUT_IPC_MS").unwrap_or(Duration::from_secs(5))
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Daemon not running (no socket at {})", .0.display())]
    DaemonNotRunning(PathBuf),

    #[error("Daemon failed to start: {0}")]
    DaemonStartFailed(String),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Request rejected ({kind:?}): {message}")]
    Rejected { kind: ErrorKind, message: String },

    #[error("Unexpected response from daemon")]
    UnexpectedResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Daemon status as reported by `Status`
#[derive(Debug, Clone, Serialize)]
pub struct DaemonStatus {
    pub uptime_secs: u64,
    pub sink: String,
    pub monitors: Vec<String>,
    pub asserted: usize,
}

/// Outcome of a published signal
#[derive(Debug, Clone, Serialize)]
pub struct Published {
    pub delivered: usize,
    pub records: Vec<u16>,
}

/// Daemon client
pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    /// Connect to a running daemon.
    ///
    /// When the socket is missing the daemon log is checked for a failed
    /// startup, so the reason can be reported instead of "not running".
    pub fn connect(config: &Config) -> Result<Self, ClientError> {
        if !config.socket_path.exists() {
            if let Some(err) = read_startup_error(&config.daemon_log) {
                return Err(ClientError::DaemonStartFailed(err));
            }
            return Err(ClientError::DaemonNotRunning(config.socket_path.clone()));
        }

        Ok(Self {
            socket_path: config.socket_path.clone(),
        })
    }

    /// Send a request and receive a response with specific timeouts
    async fn send_with_timeout(
        &self,
        request: Request,
        read_timeout: Duration,
        write_timeout: Duration,
    ) -> Result<Response, ClientError> {
        let stream = UnixStream::connect(&self.socket_path).await?;
        let (mut reader, mut writer) = stream.into_split();

        // Encode and send request with write timeout
        let data = protocol::encode(&request)?;
        tokio::time::timeout(write_timeout, protocol::write_message(&mut writer, &data))
            .await
            .map_err(|_| ProtocolError::Timeout)??;

        // Read response with read timeout
        let response_bytes =
            tokio::time::timeout(read_timeout, protocol::read_message(&mut reader))
                .await
                .map_err(|_| ProtocolError::Timeout)??;

        Ok(protocol::decode(&response_bytes)?)
    }

    /// Send a request; daemon error responses become [`ClientError::Rejected`]
    pub async fn send(&self, request: Request) -> Result<Response, ClientError> {
        match self
            .send_with_timeout(request, timeout_ipc(), timeout_ipc())
            .await?
        {
            Response::Error { kind, message } => Err(ClientError::Rejected { kind, message }),
            response => Ok(response),
        }
    }

    /// Add a system record, returning its id
    pub async fn add(
        &self,
        message: String,
        sensor_path: String,
        event_data: Vec<u8>,
        assert: bool,
        generator_id: u16,
    ) -> Result<u16, ClientError> {
        self.record_id(Request::Add {
            message,
            sensor_path,
            event_data,
            assert,
            generator_id,
        })
        .await
    }

    /// Add an OEM record, returning its id
    pub async fn add_oem(
        &self,
        message: String,
        event_data: Vec<u8>,
        record_type: u8,
    ) -> Result<u16, ClientError> {
        self.record_id(Request::AddOem {
            message,
            event_data,
            record_type,
        })
        .await
    }

    /// Delete one record. `None` when no record had that id.
    pub async fn delete(&self, id: u16) -> Result<Option<u16>, ClientError> {
        let id = self.record_id(Request::Delete { id }).await?;
        Ok((id != NOT_FOUND_ID).then_some(id))
    }

    pub async fn clear(&self) -> Result<(), ClientError> {
        self.expect_ok(Request::Clear).await
    }

    pub async fn info(&self) -> Result<StoreInfo, ClientError> {
        match self.send(Request::Info).await? {
            Response::Info { info } => Ok(info),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn entries(&self) -> Result<Vec<LogEntry>, ClientError> {
        match self.send(Request::Entries).await? {
            Response::Entries { entries } => Ok(entries),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn publish(&self, signal: Signal) -> Result<Published, ClientError> {
        match self.send(Request::Publish { signal }).await? {
            Response::Published { delivered, records } => Ok(Published { delivered, records }),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn set_properties(
        &self,
        path: String,
        interface: String,
        properties: PropertyMap,
    ) -> Result<(), ClientError> {
        self.expect_ok(Request::SetProperties {
            path,
            interface,
            properties,
        })
        .await
    }

    pub async fn set_ipmi_response(&self, response: IpmiResponse) -> Result<(), ClientError> {
        self.expect_ok(Request::SetIpmiResponse { response }).await
    }

    pub async fn status(&self) -> Result<DaemonStatus, ClientError> {
        match self.send(Request::Status).await? {
            Response::Status {
                uptime_secs,
                sink,
                monitors,
                asserted,
            } => Ok(DaemonStatus {
                uptime_secs,
                sink,
                monitors,
                asserted,
            }),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Request daemon shutdown
    pub async fn shutdown(&self) -> Result<(), ClientError> {
        match self.send(Request::Shutdown).await? {
            Response::Ok | Response::ShuttingDown => Ok(()),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    async fn record_id(&self, request: Request) -> Result<u16, ClientError> {
        match self.send(request).await? {
            Response::RecordId { id } => Ok(id),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    async fn expect_ok(&self, request: Request) -> Result<(), ClientError> {
        match self.send(request).await? {
            Response::Ok => Ok(()),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }
}

/// Read the daemon log from its last startup marker, looking for a
/// startup failure. Returns the error message if found, None otherwise.
pub fn read_startup_error(log_path: &Path) -> Option<String> {
    const FAILED: &str = "Failed to start daemon: ";

    let content = std::fs::read_to_string(log_path).ok()?;

    // Only the most recent start attempt matters
    let start_pos = content.rfind(STARTUP_MARKER_PREFIX)?;
    let startup_log = &content[start_pos..];

    // Written once synchronously and once through tracing
    let mut messages: Vec<&str> = startup_log
        .lines()
        .filter_map(|line| line.split_once(FAILED).map(|(_, msg)| msg.trim()))
        .collect();
    messages.dedup();

    if messages.is_empty() {
        None
    } else {
        Some(messages.join("\n"))
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
