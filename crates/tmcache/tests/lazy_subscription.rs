// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::unreadable_literal)] // Large test constants
#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! Lazy subscription integration tests.
//!
//! With `cache_all` disabled, a parameter is cached only once a reader has
//! asked about it; the first read misses and enrolls the parameter.

use tmcache::{CacheConfig, ParameterCache, ParameterId, ParameterValue};

fn pv(name: &str, gen: i64) -> ParameterValue {
    ParameterValue::new(ParameterId::new(name), gen, gen + 50)
}

fn lazy_cache() -> ParameterCache {
    ParameterCache::new(CacheConfig {
        cache_all: false,
        max_duration_ms: 10_000,
        max_num_entries: 64,
    })
    .expect("valid config")
}

#[test]
fn test_unrequested_parameter_not_cached() {
    let cache = lazy_cache();

    cache.update(vec![pv("/a", 10)]);
    assert!(cache.is_empty());
    assert!(cache.get_last(&ParameterId::new("/a")).is_none());
}

#[test]
fn test_miss_enrolls_for_next_delivery() {
    let cache = lazy_cache();
    let a = ParameterId::new("/a");

    cache.update(vec![pv("/a", 10)]);
    assert!(cache.get_last(&a).is_none());

    cache.update(vec![pv("/a", 20)]);
    let last = cache.get_last(&a).expect("cached after enrollment");
    assert_eq!(last.generation_time(), 20);
}

#[test]
fn test_enrollment_via_get_all_and_get_values() {
    let cache = lazy_cache();
    let a = ParameterId::new("/a");
    let b = ParameterId::new("/b");

    assert!(cache.get_all(&a).is_none());
    assert!(cache.get_values(&[b.clone()]).is_empty());

    cache.update(vec![pv("/a", 100), pv("/b", 100), pv("/c", 100)]);

    // Both requested parameters are now cached; /c was never asked about.
    assert!(cache.get_all(&a).is_some());
    assert_eq!(cache.get_values(&[b]).len(), 1);
    assert_eq!(cache.size(), 2);
}

#[test]
fn test_cache_all_ignores_enrollment() {
    let cache = ParameterCache::new(CacheConfig {
        cache_all: true,
        max_duration_ms: 10_000,
        max_num_entries: 64,
    })
    .expect("valid config");

    // No prior request needed: everything is cached as received.
    cache.update(vec![pv("/a", 10)]);
    assert!(cache.get_last(&ParameterId::new("/a")).is_some());
}

#[test]
fn test_subset_working_set_stays_small() {
    let cache = lazy_cache();
    let watched = ParameterId::new("/bus/0");

    assert!(cache.get_last(&watched).is_none());

    // A large catalog streams through, but only the watched parameter
    // accumulates an entry.
    for round in 0..10 {
        let delivery: Vec<ParameterValue> = (0..100)
            .map(|i| pv(&format!("/bus/{i}"), round * 100))
            .collect();
        cache.update(delivery);
    }

    assert_eq!(cache.size(), 1);
    assert!(cache.get_last(&watched).is_some());
}
