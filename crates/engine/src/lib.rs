// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! SEL record engine: the record pipeline and the event monitors feeding it

mod error;
pub mod monitors;
mod runtime;

pub use error::{MonitorError, RuntimeError};
pub use monitors::{
    EventMonitor, MonitorConfig, MonitorOutput, Monitors, ThresholdKind, WatchdogEnabledSource,
};
pub use runtime::SelRuntime;
