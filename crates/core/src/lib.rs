// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sel-core: System Event Log record engine
//!
//! This crate provides:
//! - Record ids, event records and their binary/hex encodings
//! - The 1-byte sensor reading scaler
//! - Record id allocation and assertion tracking state
//! - Bus signal values and in-process signal routing

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod allocator;
pub mod assertion;
pub mod clock;
pub mod encode;
pub mod events;
pub mod record;
pub mod scale;
pub mod signal;

pub use allocator::RecordIdAllocator;
pub use assertion::{AssertionKey, AssertionTracker};
pub use clock::{Clock, FakeClock, SystemClock};
pub use encode::{
    check_sensor_path, encode_oem_record, encode_system_record, hex_decode, hex_encode, EncodeError,
};
pub use events::{SignalBus, SignalPattern, SignalReceiver, Subscription};
pub use record::{
    EventRecord, Origin, RecordId, SEL_BMC_GENERATOR_ID, SEL_EVT_DATA_MAX_SIZE,
    SEL_EVT_DATA_UNSPECIFIED, SEL_MESSAGE_ID, SEL_OEM_DATA_MAX_SIZE, SEL_PRIORITY,
    SEL_SYSTEM_TYPE,
};
pub use scale::{derive_coefficients, scale_value, Coefficients, ScaleError};
pub use signal::{enum_leaf, object_name, PropertyMap, Signal, Value, ValueError, PROPERTIES_CHANGED};
