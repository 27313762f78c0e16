// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # tmcache - Telemetry Parameter Last-Value Cache
//!
//! An in-memory, concurrent, time-bounded cache serving the most recent
//! values of named telemetry parameters to display clients and on-demand
//! consumers (algorithms, command verifiers) in a mission control system.
//!
//! Parameters acquired in the same delivery are returned together on batch
//! lookup, because downstream consumers correlate values across a delivery.
//!
//! ## Quick Start
//!
//! ```rust
//! use tmcache::{CacheConfig, ParameterCache, ParameterId, ParameterValue, Value};
//!
//! fn main() -> tmcache::Result<()> {
//!     let cache = ParameterCache::new(CacheConfig::all_parameters())?;
//!
//!     // The processing pipeline publishes one delivery per update.
//!     let volts = ParameterId::new("/eps/bus_voltage");
//!     let reading = ParameterValue::new(volts.clone(), 1_700_000_000_000, 1_700_000_000_120)
//!         .with_eng_value(Value::Float64(28.4))
//!         .with_expire_millis(5_000);
//!     cache.update(vec![reading]);
//!
//!     // Displays and verifiers read the most recent value back.
//!     if let Some(last) = cache.get_last(&volts) {
//!         println!("{} = {:?}", last.id(), last.eng_value());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |                   ParameterCache (facade)                    |
//! |  cache-all / lazy subscription | batch grouping | expiration |
//! +--------------------------------------------------------------+
//! |                  CacheEntry (per parameter)                  |
//! |  power-of-two delivery ring | time-window growth | rw-lock   |
//! +--------------------------------------------------------------+
//! |                 DeliveryList (per delivery)                  |
//! |  frozen value list | per-parameter insertion chains          |
//! +--------------------------------------------------------------+
//! ```
//!
//! One writer (the parameter processing pipeline) feeds `update`; many
//! readers issue `get_last` / `get_all` / `get_values` concurrently. Rings
//! retain at least `max_duration_ms` of generation time per parameter, up to
//! a hard cap of `max_num_entries` deliveries.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ParameterCache`] | Entry point: ingests deliveries, serves reads |
//! | [`CacheEntry`] | Bounded per-parameter delivery history |
//! | [`DeliveryList`] | One frozen producer delivery |
//! | [`ParameterValue`] | A single reading with acquisition metadata |
//! | [`CacheConfig`] | Cache-all policy, retention window, entry cap |
//! | [`Clock`] | Injectable wall-clock source for expiration checks |

/// Cache façade and subscription policy.
mod cache;
/// Wall-clock sources (system and simulated).
mod clock;
/// Cache configuration and validation.
mod config;
/// Frozen producer deliveries with per-parameter lookup.
mod delivery;
/// Per-parameter bounded delivery rings.
mod entry;
/// Construction-time errors.
mod error;
/// Activity counters.
mod stats;
/// Parameter identities, payloads, and acquisition state.
mod value;

pub use cache::ParameterCache;
pub use clock::{current_time_millis, Clock, SimulatedClock, SystemClock};
pub use config::CacheConfig;
pub use delivery::DeliveryList;
pub use entry::CacheEntry;
pub use error::{Error, Result};
pub use stats::StatsSnapshot;
pub use value::{AcquisitionStatus, ParameterId, ParameterValue, Value};

/// tmcache version string.
pub const VERSION: &str = "0.1.0";
