// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wall-clock source for value expiration checks.
//!
//! The cache never reads the system clock directly; it goes through the
//! [`Clock`] trait so tests can drive expiration deterministically with a
//! [`SimulatedClock`].

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A wall-clock source returning milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    /// Current wall-clock time in milliseconds since the Unix epoch.
    fn wallclock_millis(&self) -> i64;
}

/// Get current wall-clock time in milliseconds since the Unix epoch.
pub fn current_time_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn wallclock_millis(&self) -> i64 {
        current_time_millis()
    }
}

/// Manually driven clock for deterministic expiration tests.
#[derive(Debug, Default)]
pub struct SimulatedClock {
    millis: AtomicI64,
}

impl SimulatedClock {
    /// Create a simulated clock frozen at `millis`.
    pub fn new(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    /// Jump the clock to an absolute time.
    pub fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::Relaxed);
    }

    /// Advance the clock by `delta_millis`.
    pub fn advance(&self, delta_millis: i64) {
        self.millis.fetch_add(delta_millis, Ordering::Relaxed);
    }
}

impl Clock for SimulatedClock {
    fn wallclock_millis(&self) -> i64 {
        self.millis.load(Ordering::Relaxed)
    }
}
