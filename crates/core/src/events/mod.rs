// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process signal routing
//!
//! This module provides:
//! - `SignalBus` - Route bus signals to matching subscribers using patterns
//! - `SignalPattern` - Pattern matching on `member:namespace` signal names

mod bus;
mod subscription;

pub use bus::{SignalBus, SignalReceiver, SignalSender};
pub use subscription::{SignalPattern, SubscriberId, Subscription};
