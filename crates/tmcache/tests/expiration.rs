// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::unreadable_literal)] // Large test constants
#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! Value expiration integration tests.
//!
//! Expiration is detected on read against an injected wall clock; the
//! `Acquired -> Expired` transition is monotone and visible to every holder
//! of the value.

use std::sync::Arc;
use tmcache::{
    AcquisitionStatus, CacheConfig, Clock, ParameterCache, ParameterId, ParameterValue,
    SimulatedClock,
};

fn cache_at(clock: &Arc<SimulatedClock>) -> ParameterCache {
    ParameterCache::with_clock(
        CacheConfig {
            cache_all: true,
            max_duration_ms: 10_000,
            max_num_entries: 64,
        },
        Arc::clone(clock) as Arc<dyn Clock>,
    )
    .expect("valid config")
}

#[test]
fn test_expiration_detected_on_read() {
    let clock = Arc::new(SimulatedClock::new(1_000));
    let cache = cache_at(&clock);
    let a = ParameterId::new("/a");

    let reading = ParameterValue::new(a.clone(), 900, 1_000).with_expire_millis(500);
    cache.update(vec![reading]);

    clock.set(1_499);
    let read = cache.get_last(&a).expect("value");
    assert_eq!(read.acquisition_status(), AcquisitionStatus::Acquired);

    clock.set(1_501);
    let read = cache.get_last(&a).expect("value");
    assert_eq!(read.acquisition_status(), AcquisitionStatus::Expired);

    // Expiration never reverts, even though the clock would allow it.
    clock.set(0);
    let read = cache.get_last(&a).expect("value");
    assert_eq!(read.acquisition_status(), AcquisitionStatus::Expired);
}

#[test]
fn test_expiration_visible_to_prior_readers() {
    let clock = Arc::new(SimulatedClock::new(1_000));
    let cache = cache_at(&clock);
    let a = ParameterId::new("/a");

    cache.update(vec![
        ParameterValue::new(a.clone(), 900, 1_000).with_expire_millis(500)
    ]);

    // A reader that fetched the value while fresh holds the same shared
    // reading; the later transition reaches it too.
    let held = cache.get_last(&a).expect("value");
    assert_eq!(held.acquisition_status(), AcquisitionStatus::Acquired);

    clock.set(2_000);
    let _ = cache.get_last(&a);
    assert_eq!(held.acquisition_status(), AcquisitionStatus::Expired);
}

#[test]
fn test_expiration_in_batch_reads() {
    let clock = Arc::new(SimulatedClock::new(1_000));
    let cache = cache_at(&clock);
    let a = ParameterId::new("/a");
    let b = ParameterId::new("/b");

    cache.update(vec![
        ParameterValue::new(a.clone(), 900, 1_000).with_expire_millis(500),
        ParameterValue::new(b.clone(), 900, 1_000),
    ]);

    clock.set(2_000);
    let values = cache.get_values(&[a, b]);
    assert_eq!(values.len(), 2);
    assert_eq!(values[0].acquisition_status(), AcquisitionStatus::Expired);
    // No time-to-live set: the co-delivered value stays acquired.
    assert_eq!(values[1].acquisition_status(), AcquisitionStatus::Acquired);
}

#[test]
fn test_expiration_in_get_all() {
    let clock = Arc::new(SimulatedClock::new(1_000));
    let cache = cache_at(&clock);
    let a = ParameterId::new("/a");

    cache.update(vec![
        ParameterValue::new(a.clone(), 900, 1_000).with_expire_millis(500)
    ]);
    cache.update(vec![
        ParameterValue::new(a.clone(), 950, 2_000).with_expire_millis(500)
    ]);

    // Only the older reading's window has elapsed.
    clock.set(2_000);
    let all = cache.get_all(&a).expect("values");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].acquisition_status(), AcquisitionStatus::Acquired);
    assert_eq!(all[1].acquisition_status(), AcquisitionStatus::Expired);
}

#[test]
fn test_invalid_status_untouched_by_expiration() {
    let clock = Arc::new(SimulatedClock::new(1_000));
    let cache = cache_at(&clock);
    let a = ParameterId::new("/a");

    cache.update(vec![ParameterValue::new(a.clone(), 900, 1_000)
        .with_expire_millis(500)
        .with_acquisition_status(AcquisitionStatus::Invalid)]);

    clock.set(10_000);
    let read = cache.get_last(&a).expect("value");
    assert_eq!(read.acquisition_status(), AcquisitionStatus::Invalid);
}
