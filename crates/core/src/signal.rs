// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus signals and typed property values

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Member name of the standard property-change notification
pub const PROPERTIES_CHANGED: &str = "PropertiesChanged";

/// Interface carrying the property-change notification
pub const PROPERTIES_INTERFACE: &str = "org.freedesktop.DBus.Properties";

/// A typed bus value. Payload fields are tagged so a mismatched type is
/// a decode failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Byte(u8),
    Int64(i64),
    Uint64(u64),
    Double(f64),
    Str(String),
    Bytes(Vec<u8>),
    Dict(PropertyMap),
}

pub type PropertyMap = BTreeMap<String, Value>;

#[derive(Debug, Error, PartialEq)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("missing argument {0}")]
    MissingArgument(usize),
    #[error("missing property {0}")]
    MissingProperty(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Byte(_) => "byte",
            Value::Int64(_) => "int64",
            Value::Uint64(_) => "uint64",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Dict(_) => "dict",
        }
    }

    fn mismatch(&self, expected: &'static str) -> ValueError {
        ValueError::TypeMismatch {
            expected,
            found: self.type_name(),
        }
    }

    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(other.mismatch("bool")),
        }
    }

    pub fn as_str(&self) -> Result<&str, ValueError> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(other.mismatch("string")),
        }
    }

    pub fn as_u64(&self) -> Result<u64, ValueError> {
        match self {
            Value::Uint64(v) => Ok(*v),
            other => Err(other.mismatch("uint64")),
        }
    }

    pub fn as_bytes(&self) -> Result<&[u8], ValueError> {
        match self {
            Value::Bytes(v) => Ok(v),
            other => Err(other.mismatch("bytes")),
        }
    }

    pub fn as_dict(&self) -> Result<&PropertyMap, ValueError> {
        match self {
            Value::Dict(d) => Ok(d),
            other => Err(other.mismatch("dict")),
        }
    }

    /// Numeric sensor values arrive as either double or int64
    pub fn as_f64(&self) -> Result<f64, ValueError> {
        match self {
            Value::Double(v) => Ok(*v),
            Value::Int64(v) => Ok(*v as f64),
            other => Err(other.mismatch("double or int64")),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<PropertyMap> for Value {
    fn from(v: PropertyMap) -> Self {
        Value::Dict(v)
    }
}

/// A signal observed on the bus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Unique bus name of the emitting service
    pub sender: String,
    /// Object path the signal was emitted from
    pub path: String,
    pub interface: String,
    pub member: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl Signal {
    pub fn new(
        sender: impl Into<String>,
        path: impl Into<String>,
        interface: impl Into<String>,
        member: impl Into<String>,
        args: Vec<Value>,
    ) -> Self {
        Self {
            sender: sender.into(),
            path: path.into(),
            interface: interface.into(),
            member: member.into(),
            args,
        }
    }

    /// A `PropertiesChanged` notification for `interface` on `path`
    pub fn properties_changed(
        sender: impl Into<String>,
        path: impl Into<String>,
        interface: impl Into<String>,
        changed: PropertyMap,
    ) -> Self {
        Self::new(
            sender,
            path,
            PROPERTIES_INTERFACE,
            PROPERTIES_CHANGED,
            vec![Value::Str(interface.into()), Value::Dict(changed)],
        )
    }

    /// Routing name `member:namespace`.
    ///
    /// For property changes the namespace is the changed interface
    /// (argument 0), otherwise the signal's own interface.
    pub fn name(&self) -> String {
        let namespace = if self.member == PROPERTIES_CHANGED {
            self.args
                .first()
                .and_then(|v| v.as_str().ok())
                .unwrap_or(self.interface.as_str())
        } else {
            &self.interface
        };
        format!("{}:{}", self.member, namespace)
    }

    pub fn arg(&self, index: usize) -> Result<&Value, ValueError> {
        self.args.get(index).ok_or(ValueError::MissingArgument(index))
    }

    /// Last path segment, used as a display name
    pub fn object_name(&self) -> &str {
        object_name(&self.path)
    }
}

/// Last segment of an object path
pub fn object_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Text after the last '.' of an enumeration value such as
/// `xyz.openbmc_project.State.Watchdog.Action.HardReset`
pub fn enum_leaf(value: &str) -> &str {
    value.rsplit('.').next().unwrap_or(value)
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
