// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cache façade: per-parameter entries plus the subscription policy.
//!
//! One writer (the parameter processing pipeline) calls [`ParameterCache::update`]
//! per delivery; many readers call the `get_*` operations concurrently. The
//! entries map is a lock-free concurrent map; ordering for delivery grouping
//! comes from the per-entry ring lock, not from the map.

use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::delivery::DeliveryList;
use crate::entry::CacheEntry;
use crate::error::Result;
use crate::stats::{CacheStats, StatsSnapshot};
use crate::value::{ParameterId, ParameterValue};
use dashmap::{DashMap, DashSet};
use std::sync::Arc;

/// Concurrent, time-bounded, delivery-preserving cache of the most recent
/// telemetry parameter values.
///
/// Values acquired in the same delivery are served from the same delivery:
/// a batch read returns co-delivered parameters together so downstream
/// consumers (displays, algorithms, command verifiers) can correlate them.
///
/// With `cache_all` disabled, a parameter is cached only after a reader has
/// asked about it at least once; the first read misses and enrolls the
/// parameter for subsequent deliveries.
pub struct ParameterCache {
    entries: DashMap<ParameterId, Arc<CacheEntry>>,
    /// Lazy-mode enrollment set; `None` when every parameter is cached.
    subscribed: Option<DashSet<ParameterId>>,
    time_to_cache: u64,
    max_num_entries: usize,
    clock: Arc<dyn Clock>,
    stats: CacheStats,
}

impl ParameterCache {
    /// Create a cache driven by the system wall clock.
    pub fn new(config: CacheConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a cache with an injected wall-clock source.
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            entries: DashMap::new(),
            subscribed: if config.cache_all {
                None
            } else {
                Some(DashSet::new())
            },
            time_to_cache: config.max_duration_ms,
            max_num_entries: config.max_num_entries,
            clock,
            stats: CacheStats::default(),
        })
    }

    /// Ingest one producer delivery.
    ///
    /// The whole delivery becomes a single shared [`DeliveryList`]; the same
    /// reference lands in the entry of every cached parameter it mentions,
    /// which is what lets batch reads group co-delivered values by pointer
    /// identity. Empty deliveries are legal and never stored.
    pub fn update(&self, values: impl IntoIterator<Item = ParameterValue>) {
        let delivery = DeliveryList::new(values);
        if delivery.is_empty() {
            return;
        }
        let delivery = Arc::new(delivery);

        for pid in delivery.parameter_ids() {
            let entry = match self.entries.get(pid) {
                Some(e) => Arc::clone(e.value()),
                None => {
                    if !self.should_cache(pid) {
                        continue;
                    }
                    let e = self.entries.entry(pid.clone()).or_insert_with(|| {
                        Arc::new(CacheEntry::new(
                            pid.clone(),
                            self.time_to_cache,
                            self.max_num_entries,
                        ))
                    });
                    Arc::clone(e.value())
                }
            };
            if !entry.add(&delivery) {
                self.stats.record_dropped_write();
            }
        }
        self.stats.record_delivery();
    }

    /// Latest value for `pid`, or `None` if the cache holds nothing for it.
    ///
    /// In lazy mode a miss enrolls the parameter so the next delivery that
    /// mentions it is cached.
    pub fn get_last(&self, pid: &ParameterId) -> Option<Arc<ParameterValue>> {
        let Some(entry) = self.entry(pid) else {
            self.enroll(pid);
            self.stats.record_miss();
            return None;
        };

        let pv = entry
            .get_last()
            .and_then(|delivery| delivery.last_inserted(pid).cloned());
        match pv {
            Some(pv) => {
                pv.expire_if_stale(self.clock.wallclock_millis());
                self.stats.record_hit();
                Some(pv)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Every retained value for `pid`, newest first, or `None` if the cache
    /// has no entry for it. Miss behavior mirrors [`get_last`](Self::get_last).
    pub fn get_all(&self, pid: &ParameterId) -> Option<Vec<Arc<ParameterValue>>> {
        let Some(entry) = self.entry(pid) else {
            self.enroll(pid);
            self.stats.record_miss();
            return None;
        };

        let values = entry.get_all();
        let now = self.clock.wallclock_millis();
        for pv in &values {
            pv.expire_if_stale(now);
        }
        self.stats.record_hit();
        Some(values)
    }

    /// Last values for a batch of parameters, grouping parameters that were
    /// acquired in the same delivery consecutively.
    ///
    /// For each still-unresolved parameter, the newest delivery of its entry
    /// is consulted and every other requested parameter present in that same
    /// delivery is resolved from it as well. The result holds at most one
    /// value per requested parameter, in first-found order. Parameters with
    /// no entry are skipped (and enrolled in lazy mode).
    pub fn get_values(&self, pids: &[ParameterId]) -> Vec<Arc<ParameterValue>> {
        let now = self.clock.wallclock_millis();
        let mut remaining = vec![true; pids.len()];
        let mut result = Vec::with_capacity(pids.len());

        for i in 0..pids.len() {
            if !remaining[i] {
                continue;
            }
            let pid = &pids[i];
            let Some(entry) = self.entry(pid) else {
                remaining[i] = false;
                self.enroll(pid);
                self.stats.record_miss();
                continue;
            };
            let Some(delivery) = entry.get_last() else {
                remaining[i] = false;
                self.stats.record_miss();
                continue;
            };
            let Some(pv) = delivery.last_inserted(pid) else {
                // A stored delivery always mentions the entry's parameter.
                remaining[i] = false;
                continue;
            };
            pv.expire_if_stale(now);
            result.push(Arc::clone(pv));
            remaining[i] = false;
            self.stats.record_hit();

            // Resolve every other requested parameter present in the same
            // delivery, so co-delivered values stay together.
            for j in (i + 1)..pids.len() {
                if !remaining[j] {
                    continue;
                }
                if let Some(pv) = delivery.last_inserted(&pids[j]) {
                    pv.expire_if_stale(now);
                    result.push(Arc::clone(pv));
                    remaining[j] = false;
                    self.stats.record_hit();
                }
            }
        }
        result
    }

    /// Number of parameters with a cache entry.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Whether no parameter has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Point-in-time counters snapshot.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    fn entry(&self, pid: &ParameterId) -> Option<Arc<CacheEntry>> {
        self.entries.get(pid).map(|e| Arc::clone(e.value()))
    }

    fn should_cache(&self, pid: &ParameterId) -> bool {
        match &self.subscribed {
            None => true,
            Some(set) => set.contains(pid),
        }
    }

    fn enroll(&self, pid: &ParameterId) {
        if let Some(set) = &self.subscribed {
            set.insert(pid.clone());
        }
    }
}
