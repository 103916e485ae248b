// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_tracks_wall_time() {
    let clock = SystemClock;
    let before = Utc::now();
    let now = clock.now();
    assert!(now >= before);
}

#[test]
fn fake_clock_starts_at_fixed_time() {
    let clock = FakeClock::new();
    assert_eq!(clock.now().to_rfc3339(), "2026-01-01T00:00:00+00:00");
}

#[test]
fn fake_clock_can_be_advanced() {
    let clock = FakeClock::new();
    let t1 = clock.now();
    clock.advance(Duration::from_secs(60));
    let t2 = clock.now();
    assert_eq!((t2 - t1).num_seconds(), 60);
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    let t1 = clock1.now();
    clock2.advance(Duration::from_secs(30));
    let t2 = clock1.now();
    assert_eq!((t2 - t1).num_seconds(), 30);
}

#[test]
fn fake_clock_can_be_set() {
    let clock = FakeClock::new();
    let target = Utc
        .with_ymd_and_hms(2030, 6, 1, 12, 0, 0)
        .single()
        .unwrap();
    clock.set(target);
    assert_eq!(clock.now(), target);
}
