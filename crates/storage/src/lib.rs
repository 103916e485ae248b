// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sel-storage: rotating text log of SEL records

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod line;
mod store;

pub use line::{format_line, record_id_of, LineError, LogEntry};
pub use store::{AppendError, LogStore, StoreConfig, StoreError, StoreInfo};
