// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn key() -> AssertionKey {
    AssertionKey::new("/xyz/openbmc_project/sensors/fan_tach/Fan1", "CriticalHigh")
}

#[test]
fn first_assert_applies() {
    let mut tracker = AssertionTracker::new();
    assert!(tracker.would_apply(&key(), true));
    assert!(tracker.apply(key(), true));
    assert!(tracker.is_asserted(&key()));
}

#[test]
fn repeated_assert_is_duplicate() {
    let mut tracker = AssertionTracker::new();
    tracker.apply(key(), true);
    assert!(!tracker.would_apply(&key(), true));
    assert!(!tracker.apply(key(), true));
    assert_eq!(tracker.len(), 1);
}

#[test]
fn deassert_without_assert_is_duplicate() {
    let mut tracker = AssertionTracker::new();
    assert!(!tracker.would_apply(&key(), false));
    assert!(!tracker.apply(key(), false));
    assert!(tracker.is_empty());
}

#[test]
fn assert_then_deassert_both_apply() {
    let mut tracker = AssertionTracker::new();
    assert!(tracker.apply(key(), true));
    assert!(tracker.apply(key(), false));
    assert!(!tracker.is_asserted(&key()));
}

#[test]
fn kinds_are_tracked_independently() {
    let mut tracker = AssertionTracker::new();
    let high = key();
    let low = AssertionKey::new(high.source.clone(), "CriticalLow");
    tracker.apply(high.clone(), true);
    assert!(tracker.would_apply(&low, true));
    assert_eq!(tracker.asserted().collect::<Vec<_>>(), vec![&high]);
}
