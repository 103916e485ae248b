// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket server and connection handling.

use sel_core::{EncodeError, RecordId};
use sel_daemon::config::SinkConfig;
use sel_daemon::protocol::{
    self, ErrorKind, Request, Response, DEFAULT_TIMEOUT, PROTOCOL_VERSION,
};
use sel_engine::RuntimeError;
use tokio::net::UnixStream;
use tracing::{debug, error};

use crate::lifecycle::DaemonState;

/// Handle a single client connection
pub async fn handle_connection(
    daemon: &mut DaemonState,
    stream: UnixStream,
) -> Result<(), ServerError> {
    // Split stream for reading/writing
    let (mut reader, mut writer) = stream.into_split();

    // Read request with timeout
    let request = match protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await {
        Ok(req) => req,
        Err(protocol::ProtocolError::Timeout) => {
            error!("Request read timeout");
            return Err(ServerError::Timeout);
        }
        Err(protocol::ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected before sending request");
            return Ok(());
        }
        Err(e) => {
            error!("Failed to read request: {}", e);
            return Err(ServerError::Protocol(e));
        }
    };

    debug!("Received request: {:?}", request);

    let response = handle_request(daemon, request).await;

    debug!("Sending response: {:?}", response);

    protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT)
        .await
        .map_err(ServerError::Protocol)?;

    Ok(())
}

/// Handle a single request and return a response
async fn handle_request(daemon: &mut DaemonState, request: Request) -> Response {
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version: _ } => Response::Hello {
            version: PROTOCOL_VERSION.to_string(),
        },

        Request::Add {
            message,
            sensor_path,
            event_data,
            assert,
            generator_id,
        } => record_id(
            daemon
                .runtime
                .add_system(&message, &sensor_path, event_data, assert, generator_id)
                .await,
        ),

        Request::AddOem {
            message,
            event_data,
            record_type,
        } => record_id(
            daemon
                .runtime
                .add_oem(&message, event_data, record_type)
                .await,
        ),

        Request::Clear => match daemon.runtime.clear().await {
            Ok(()) => Response::Ok,
            Err(e) => error_response(e),
        },

        Request::Delete { id } => record_id(daemon.runtime.delete(RecordId(id))),

        Request::Info => match daemon.runtime.info() {
            Ok(info) => Response::Info { info },
            Err(e) => error_response(e),
        },

        Request::Entries => match daemon.runtime.entries() {
            Ok(entries) => Response::Entries { entries },
            Err(e) => error_response(e),
        },

        Request::Publish { signal } => {
            let delivered = daemon.signals.publish(signal);
            let records = daemon.drain_signals().await;
            Response::Published {
                delivered,
                records: records.into_iter().map(|id| id.0).collect(),
            }
        }

        Request::SetProperties {
            path,
            interface,
            properties,
        } => {
            daemon
                .registry
                .set_properties(&path, &interface, properties);
            Response::Ok
        }

        Request::SetIpmiResponse { response } => {
            daemon.registry.set_ipmi_response(response);
            Response::Ok
        }

        Request::Status => Response::Status {
            uptime_secs: daemon.start_time.elapsed().as_secs(),
            sink: match daemon.config.sink {
                SinkConfig::Journal { .. } => "journal".to_string(),
                SinkConfig::LoggingService { .. } => "logging_service".to_string(),
            },
            monitors: daemon
                .monitors
                .enabled()
                .into_iter()
                .map(str::to_string)
                .collect(),
            asserted: daemon.monitors.tracker().len(),
        },

        Request::Shutdown => {
            daemon.shutdown_requested = true;
            Response::ShuttingDown
        }
    }
}

fn record_id(result: Result<RecordId, RuntimeError>) -> Response {
    match result {
        Ok(id) => Response::RecordId { id: id.0 },
        Err(e) => error_response(e),
    }
}

fn error_response(e: RuntimeError) -> Response {
    let kind = match &e {
        RuntimeError::EventData(EncodeError::InvalidSensorPath(_)) => ErrorKind::InvalidSensorPath,
        RuntimeError::EventData(_) => ErrorKind::EventDataTooLarge,
        RuntimeError::Unsupported(_) => ErrorKind::Unsupported,
        RuntimeError::Storage(_) => ErrorKind::Storage,
        RuntimeError::Sink(_) => ErrorKind::Internal,
    };
    Response::Error {
        kind,
        message: e.to_string(),
    }
}

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),

    #[error("Request timeout")]
    Timeout,
}
