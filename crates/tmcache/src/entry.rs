// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-parameter bounded history of deliveries.
//!
//! Each [`CacheEntry`] owns a power-of-two ring of shared
//! [`DeliveryList`](crate::DeliveryList) references written at `tail`. The
//! newest delivery sits at `(tail - 1) & (capacity - 1)`; a populated `tail`
//! slot is the oldest still retained. When an overwrite would shrink the
//! retained generation-time span below the configured window, the ring
//! doubles in place (up to the entry cap) before the write proceeds.

use crate::delivery::DeliveryList;
use crate::value::{ParameterId, ParameterValue};
use parking_lot::RwLock;
use std::sync::Arc;

/// Ring capacity before time-window growth kicks in.
const INITIAL_CAPACITY: usize = 128;

struct Ring {
    slots: Vec<Option<Arc<DeliveryList>>>,
    tail: usize,
}

impl Ring {
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn mask(&self) -> usize {
        self.slots.len() - 1
    }
}

/// Bounded history of the deliveries mentioning one parameter.
///
/// All mutation happens under the write half of the entry lock; readers hold
/// the read half only long enough to snapshot shared references.
pub struct CacheEntry {
    pid: ParameterId,
    time_to_cache: u64,
    max_entries: usize,
    ring: RwLock<Ring>,
}

impl CacheEntry {
    /// Create an entry for `pid` with the given retention window (ms) and
    /// entry cap. The cap is rounded up to a power of two for masking.
    pub fn new(pid: ParameterId, time_to_cache: u64, max_num_entries: usize) -> Self {
        Self::with_initial_capacity(pid, time_to_cache, max_num_entries, INITIAL_CAPACITY)
    }

    /// Create an entry with an explicit initial ring capacity (test hook).
    #[doc(hidden)]
    pub fn with_initial_capacity(
        pid: ParameterId,
        time_to_cache: u64,
        max_num_entries: usize,
        initial_capacity: usize,
    ) -> Self {
        let max_entries = max_num_entries.next_power_of_two();
        let initial = initial_capacity.next_power_of_two().min(max_entries);
        Self {
            pid,
            time_to_cache,
            max_entries,
            ring: RwLock::new(Ring {
                slots: vec![None; initial],
                tail: 0,
            }),
        }
    }

    /// The parameter this entry retains history for.
    pub fn parameter(&self) -> &ParameterId {
        &self.pid
    }

    /// Insert a delivery that mentions this entry's parameter.
    ///
    /// Deliveries whose generation time is behind the newest retained one
    /// are dropped, as are deliveries that do not actually mention the
    /// parameter. Returns whether the delivery was stored.
    pub fn add(&self, delivery: &Arc<DeliveryList>) -> bool {
        let incoming_gen = match delivery.first_inserted(&self.pid) {
            Some(pv) => pv.generation_time(),
            None => {
                log::warn!(
                    "[CacheEntry::add] delivery does not mention {}, dropping",
                    self.pid
                );
                return false;
            }
        };

        let mut ring = self.ring.write();
        let tail = ring.tail;
        let mask = ring.mask();

        let newest_gen = ring.slots[tail.wrapping_sub(1) & mask]
            .as_ref()
            .and_then(|d| d.last_inserted(&self.pid))
            .map(|pv| pv.generation_time());
        if let Some(newest_gen) = newest_gen {
            if incoming_gen < newest_gen {
                log::debug!(
                    "[CacheEntry::add] out-of-order delivery for {}: {} < {}, dropping",
                    self.pid,
                    incoming_gen,
                    newest_gen
                );
                return false;
            }
        }

        if ring.slots[tail].is_some() {
            let oldest_gen = ring.slots[tail]
                .as_ref()
                .and_then(|d| d.first_inserted(&self.pid))
                .map(|pv| pv.generation_time());
            let Some(oldest_gen) = oldest_gen else {
                log::warn!(
                    "[CacheEntry::add] retained delivery does not mention {}, dropping write",
                    self.pid
                );
                return false;
            };
            if incoming_gen - oldest_gen < self.time_to_cache as i64 {
                self.grow(&mut ring);
            }
        }

        let tail = ring.tail;
        let mask = ring.mask();
        ring.slots[tail] = Some(Arc::clone(delivery));
        ring.tail = (tail + 1) & mask;
        true
    }

    /// Double the ring, keeping `tail` fixed and shifting the wrapped
    /// segment so the oldest-at-`tail` invariant survives.
    fn grow(&self, ring: &mut Ring) {
        let capacity = ring.capacity();
        if capacity >= self.max_entries {
            return;
        }

        let new_capacity = 2 * capacity;
        let mut slots = vec![None; new_capacity];
        for i in 0..capacity {
            let target = if i < ring.tail { i } else { i + capacity };
            slots[target] = ring.slots[i].take();
        }
        ring.slots = slots;

        log::debug!(
            "[CacheEntry::grow] {} capacity {} -> {}",
            self.pid,
            capacity,
            new_capacity
        );
    }

    /// Newest retained delivery, or `None` if nothing was stored yet.
    pub fn get_last(&self) -> Option<Arc<DeliveryList>> {
        let ring = self.ring.read();
        ring.slots[ring.tail.wrapping_sub(1) & ring.mask()].clone()
    }

    /// Every retained value for this parameter, newest delivery first.
    ///
    /// Deliveries carrying several occurrences of the parameter contribute
    /// every occurrence, in insertion order within the delivery.
    pub fn get_all(&self) -> Vec<Arc<ParameterValue>> {
        let ring = self.ring.read();
        let tail = ring.tail;
        let mask = ring.mask();

        let mut out = Vec::new();
        let mut t = tail;
        loop {
            t = t.wrapping_sub(1) & mask;
            let Some(delivery) = ring.slots[t].as_ref() else {
                break;
            };
            delivery.for_each(&self.pid, |pv| out.push(Arc::clone(pv)));
            if t == tail {
                break;
            }
        }
        out
    }

    /// Number of deliveries currently retained.
    pub fn retained(&self) -> usize {
        self.ring.read().slots.iter().filter(|s| s.is_some()).count()
    }

    /// Current ring capacity (always a power of two).
    pub fn capacity(&self) -> usize {
        self.ring.read().capacity()
    }
}
