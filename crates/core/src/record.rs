// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SEL record identifiers and event records

use crate::encode::{self, EncodeError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record type of a fixed-schema system event record
pub const SEL_SYSTEM_TYPE: u8 = 0x02;

/// Generator id for records originated by the BMC itself
pub const SEL_BMC_GENERATOR_ID: u16 = 0x0020;

/// Maximum event data carried by a system record
pub const SEL_EVT_DATA_MAX_SIZE: usize = 3;

/// Maximum event data carried by an OEM record
pub const SEL_OEM_DATA_MAX_SIZE: usize = 13;

/// Event data byte meaning "unspecified"
pub const SEL_EVT_DATA_UNSPECIFIED: u8 = 0xFF;

/// Journal priority used for SEL entries (notice)
pub const SEL_PRIORITY: u8 = 5;

/// MESSAGE_ID attached to every SEL journal entry so they can be filtered
pub const SEL_MESSAGE_ID: Uuid = Uuid::from_u128(0xb370836c_cf2f_4850_ac5b_ee185b77893a);

/// 16-bit handle clients use to reference a stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u16);

impl RecordId {
    /// Reserved maximum value meaning "no valid id"
    pub const INVALID: Self = Self(u16::MAX);
    /// Returned when a record was forwarded without a local id
    pub const UNASSIGNED: Self = Self(0);
    pub const FIRST: Self = Self(1);
    pub const LAST: Self = Self(u16::MAX - 1);

    /// True for ids in [1, 65534]
    pub fn is_valid(self) -> bool {
        self != Self::UNASSIGNED && self != Self::INVALID
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a record came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// System record raised against a source object
    System {
        generator_id: u16,
        sensor_path: String,
        assert: bool,
    },
    /// Vendor-defined record without a source object
    Oem,
}

/// A logged occurrence, before it is given an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub record_type: u8,
    pub message: String,
    pub event_data: Vec<u8>,
    pub origin: Origin,
    /// Extra structured fields forwarded to the sink (e.g. REDFISH_MESSAGE_ID)
    pub metadata: Vec<(String, String)>,
}

impl EventRecord {
    /// Build a system record, rejecting more than 3 bytes of event data and
    /// sensor paths with commas or control characters
    pub fn system(
        message: impl Into<String>,
        sensor_path: impl Into<String>,
        event_data: Vec<u8>,
        assert: bool,
        generator_id: u16,
    ) -> Result<Self, EncodeError> {
        encode::check_len(&event_data, SEL_EVT_DATA_MAX_SIZE)?;
        let sensor_path = sensor_path.into();
        encode::check_sensor_path(&sensor_path)?;
        Ok(Self {
            record_type: SEL_SYSTEM_TYPE,
            message: message.into(),
            event_data,
            origin: Origin::System {
                generator_id,
                sensor_path,
                assert,
            },
            metadata: Vec::new(),
        })
    }

    /// Build an OEM record, rejecting more than 13 bytes of event data
    pub fn oem(
        message: impl Into<String>,
        event_data: Vec<u8>,
        record_type: u8,
    ) -> Result<Self, EncodeError> {
        encode::check_len(&event_data, SEL_OEM_DATA_MAX_SIZE)?;
        Ok(Self {
            record_type,
            message: message.into(),
            event_data,
            origin: Origin::Oem,
            metadata: Vec::new(),
        })
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }

    pub fn sensor_path(&self) -> Option<&str> {
        match &self.origin {
            Origin::System { sensor_path, .. } => Some(sensor_path),
            Origin::Oem => None,
        }
    }

    pub fn generator_id(&self) -> Option<u16> {
        match &self.origin {
            Origin::System { generator_id, .. } => Some(*generator_id),
            Origin::Oem => None,
        }
    }

    /// Event direction; `None` for OEM records
    pub fn assert(&self) -> Option<bool> {
        match &self.origin {
            Origin::System { assert, .. } => Some(*assert),
            Origin::Oem => None,
        }
    }

    /// Event data in the persisted textual form
    pub fn data_hex(&self) -> String {
        encode::hex_encode(&self.event_data)
    }

    /// Binary form of this record
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        match &self.origin {
            Origin::System {
                generator_id,
                assert,
                ..
            } => encode::encode_system_record(&self.event_data, *assert, *generator_id),
            Origin::Oem => encode::encode_oem_record(&self.event_data, self.record_type),
        }
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
