// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake bus client for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{BusClient, BusError, IpmiResponse, ObjectRegistry};
use async_trait::async_trait;
use sel_core::{PropertyMap, Value};
use std::sync::{Arc, Mutex};

/// Recorded bus call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusCall {
    GetAll {
        service: String,
        path: String,
        interface: String,
    },
    Get {
        service: String,
        path: String,
        interface: String,
        property: String,
    },
    IpmiExecute {
        netfn: u8,
        lun: u8,
        cmd: u8,
        data: Vec<u8>,
    },
}

/// Registry-backed bus client that records calls and can simulate outages
#[derive(Clone, Default)]
pub struct FakeBusClient {
    registry: ObjectRegistry,
    calls: Arc<Mutex<Vec<BusCall>>>,
    unavailable: Arc<Mutex<bool>>,
}

impl FakeBusClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry the fake answers from
    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<BusCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make every subsequent call fail
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap_or_else(|e| e.into_inner()) = unavailable;
    }

    fn record(&self, call: BusCall) -> Result<(), BusError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        if *self.unavailable.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(BusError::CallFailed("peer unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BusClient for FakeBusClient {
    async fn get_all(
        &self,
        service: &str,
        path: &str,
        interface: &str,
    ) -> Result<PropertyMap, BusError> {
        self.record(BusCall::GetAll {
            service: service.to_string(),
            path: path.to_string(),
            interface: interface.to_string(),
        })?;
        self.registry.get_all(service, path, interface).await
    }

    async fn get(
        &self,
        service: &str,
        path: &str,
        interface: &str,
        property: &str,
    ) -> Result<Value, BusError> {
        self.record(BusCall::Get {
            service: service.to_string(),
            path: path.to_string(),
            interface: interface.to_string(),
            property: property.to_string(),
        })?;
        self.registry.get(service, path, interface, property).await
    }

    async fn ipmi_execute(
        &self,
        netfn: u8,
        lun: u8,
        cmd: u8,
        data: &[u8],
    ) -> Result<IpmiResponse, BusError> {
        self.record(BusCall::IpmiExecute {
            netfn,
            lun,
            cmd,
            data: data.to_vec(),
        })?;
        self.registry.ipmi_execute(netfn, lun, cmd, data).await
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
