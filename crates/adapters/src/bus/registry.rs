// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory object registry answering bus queries

use super::{BusClient, BusError, IpmiResponse};
use async_trait::async_trait;
use sel_core::{PropertyMap, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Registry {
    /// Properties keyed by (object path, interface)
    objects: BTreeMap<(String, String), PropertyMap>,
    /// Canned replies keyed by (netfn, cmd)
    ipmi: HashMap<(u8, u8), IpmiResponse>,
}

/// Objects and IPMI replies published by peers.
///
/// Queries are answered regardless of the service name asked for; every
/// object lives in one namespace keyed by path.
#[derive(Clone, Default)]
pub struct ObjectRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `properties` into the interface at `path`
    pub fn set_properties(&self, path: &str, interface: &str, properties: PropertyMap) {
        let mut registry = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        registry
            .objects
            .entry((path.to_string(), interface.to_string()))
            .or_default()
            .extend(properties);
    }

    pub fn set_property(&self, path: &str, interface: &str, name: &str, value: impl Into<Value>) {
        self.set_properties(
            path,
            interface,
            PropertyMap::from([(name.to_string(), value.into())]),
        );
    }

    /// Drop every interface of the object at `path`
    pub fn remove_object(&self, path: &str) {
        let mut registry = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        registry.objects.retain(|(p, _), _| p != path);
    }

    /// Reply returned for the (netfn, cmd) pair
    pub fn set_ipmi_response(&self, response: IpmiResponse) {
        let mut registry = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        registry
            .ipmi
            .insert((response.netfn, response.cmd), response);
    }

    pub fn object_count(&self) -> usize {
        let registry = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let mut paths: Vec<_> = registry.objects.keys().map(|(p, _)| p).collect();
        paths.dedup();
        paths.len()
    }
}

#[async_trait]
impl BusClient for ObjectRegistry {
    async fn get_all(
        &self,
        _service: &str,
        path: &str,
        interface: &str,
    ) -> Result<PropertyMap, BusError> {
        let registry = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        registry
            .objects
            .get(&(path.to_string(), interface.to_string()))
            .cloned()
            .ok_or_else(|| BusError::UnknownInterface {
                path: path.to_string(),
                interface: interface.to_string(),
            })
    }

    async fn get(
        &self,
        service: &str,
        path: &str,
        interface: &str,
        property: &str,
    ) -> Result<Value, BusError> {
        let properties = self.get_all(service, path, interface).await?;
        properties
            .get(property)
            .cloned()
            .ok_or_else(|| BusError::UnknownProperty {
                path: path.to_string(),
                interface: interface.to_string(),
                property: property.to_string(),
            })
    }

    async fn ipmi_execute(
        &self,
        netfn: u8,
        _lun: u8,
        cmd: u8,
        _data: &[u8],
    ) -> Result<IpmiResponse, BusError> {
        let registry = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        registry
            .ipmi
            .get(&(netfn, cmd))
            .cloned()
            .ok_or(BusError::NoIpmiResponse { netfn, cmd })
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
