// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! SEL daemon library: configuration and the request protocol shared with `selctl`

pub mod config;
pub mod protocol;

pub use config::{Config, ConfigError, SinkConfig};
pub use protocol::{ErrorKind, ProtocolError, Request, Response};

/// Startup marker prefix written to the daemon log before anything else.
/// Full format: "--- seld: starting (pid: 12345)"
pub const STARTUP_MARKER_PREFIX: &str = "--- seld: starting (pid: ";
