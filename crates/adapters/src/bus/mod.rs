// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queries back to bus peers: property reads and IPMI commands

mod registry;

pub use registry::ObjectRegistry;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{BusCall, FakeBusClient};

use async_trait::async_trait;
use sel_core::{PropertyMap, Value};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from bus queries
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    #[error("no object at {path} implements {interface}")]
    UnknownInterface { path: String, interface: String },
    #[error("{interface} at {path} has no property {property}")]
    UnknownProperty {
        path: String,
        interface: String,
        property: String,
    },
    #[error("no response for IPMI netfn {netfn:#04x} cmd {cmd:#04x}")]
    NoIpmiResponse { netfn: u8, cmd: u8 },
    #[error("bus call failed: {0}")]
    CallFailed(String),
}

/// Reply to an IPMI command executed through the host IPMI service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpmiResponse {
    pub netfn: u8,
    pub lun: u8,
    pub cmd: u8,
    /// Completion code
    pub cc: u8,
    pub data: Vec<u8>,
}

/// Synchronous-style queries issued while handling a signal
#[async_trait]
pub trait BusClient: Clone + Send + Sync + 'static {
    /// All properties of `interface` on the object at `path` owned by `service`
    async fn get_all(
        &self,
        service: &str,
        path: &str,
        interface: &str,
    ) -> Result<PropertyMap, BusError>;

    /// One property of `interface` on the object at `path`
    async fn get(
        &self,
        service: &str,
        path: &str,
        interface: &str,
        property: &str,
    ) -> Result<Value, BusError>;

    /// Execute an IPMI command through the host IPMI service
    async fn ipmi_execute(
        &self,
        netfn: u8,
        lun: u8,
        cmd: u8,
        data: &[u8],
    ) -> Result<IpmiResponse, BusError>;
}
