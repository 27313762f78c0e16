// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Parameter identities, value payloads, and acquisition state.
//!
//! A [`ParameterValue`] is logically immutable once it enters the cache. The
//! single sanctioned mutation is the monotone `Acquired -> Expired` status
//! transition, performed through an atomic status word so every holder of
//! the value observes it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Opaque identity of a telemetry parameter definition.
///
/// Equality and hashing are by qualified name. Clones share the backing
/// storage, so identities spread across cache maps and delivery indexes
/// without allocation.
#[derive(Clone, Debug, Eq)]
pub struct ParameterId {
    name: Arc<str>,
}

impl ParameterId {
    /// Create an identity from a qualified parameter name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// The qualified parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for ParameterId {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Hash for ParameterId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Per-value acquisition state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum AcquisitionStatus {
    /// Value was received and is inside its validity window.
    Acquired = 0,
    /// Value was received but its time-to-live has elapsed.
    Expired = 1,
    /// Value failed validation upstream.
    Invalid = 2,
    /// No value has been received for the parameter.
    NotReceived = 3,
}

impl AcquisitionStatus {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => AcquisitionStatus::Acquired,
            1 => AcquisitionStatus::Expired,
            2 => AcquisitionStatus::Invalid,
            _ => AcquisitionStatus::NotReceived,
        }
    }
}

/// Raw or engineering value payload. Opaque to the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean value
    Boolean(bool),
    /// Signed integer value
    Sint64(i64),
    /// Unsigned integer value
    Uint64(u64),
    /// Floating point value
    Float64(f64),
    /// String value
    Text(String),
    /// Opaque byte payload
    Binary(Vec<u8>),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Sint64(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Binary(v)
    }
}

/// One telemetry reading for one parameter.
///
/// Carries the producer (generation) and ground (acquisition) timestamps in
/// milliseconds since the Unix epoch, an optional time-to-live relative to
/// the acquisition time, and the raw/engineering payloads.
///
/// All fields except the acquisition status are immutable once the value is
/// published to the cache. The status may transition `Acquired -> Expired`
/// exactly once; the store uses release ordering so concurrent readers see
/// the transition and never its reverse.
#[derive(Debug)]
pub struct ParameterValue {
    id: ParameterId,
    raw_value: Option<Value>,
    eng_value: Option<Value>,
    generation_time: i64,
    acquisition_time: i64,
    expire_millis: Option<u64>,
    status: AtomicU8,
}

impl ParameterValue {
    /// Create a reading with `Acquired` status and no payload.
    pub fn new(id: ParameterId, generation_time: i64, acquisition_time: i64) -> Self {
        Self {
            id,
            raw_value: None,
            eng_value: None,
            generation_time,
            acquisition_time,
            expire_millis: None,
            status: AtomicU8::new(AcquisitionStatus::Acquired as u8),
        }
    }

    /// Attach the raw (uncalibrated) payload.
    #[must_use]
    pub fn with_raw_value(mut self, value: Value) -> Self {
        self.raw_value = Some(value);
        self
    }

    /// Attach the engineering (calibrated) payload.
    #[must_use]
    pub fn with_eng_value(mut self, value: Value) -> Self {
        self.eng_value = Some(value);
        self
    }

    /// Set the time-to-live relative to the acquisition time.
    #[must_use]
    pub fn with_expire_millis(mut self, expire_millis: u64) -> Self {
        self.expire_millis = Some(expire_millis);
        self
    }

    /// Set the acquisition status (producer side, before publication).
    #[must_use]
    pub fn with_acquisition_status(self, status: AcquisitionStatus) -> Self {
        self.status.store(status as u8, Ordering::Relaxed);
        self
    }

    /// The owning parameter identity.
    pub fn id(&self) -> &ParameterId {
        &self.id
    }

    /// Raw (uncalibrated) payload, if any.
    pub fn raw_value(&self) -> Option<&Value> {
        self.raw_value.as_ref()
    }

    /// Engineering (calibrated) payload, if any.
    pub fn eng_value(&self) -> Option<&Value> {
        self.eng_value.as_ref()
    }

    /// Producer timestamp in milliseconds since the Unix epoch.
    pub fn generation_time(&self) -> i64 {
        self.generation_time
    }

    /// Ground reception timestamp in milliseconds since the Unix epoch.
    pub fn acquisition_time(&self) -> i64 {
        self.acquisition_time
    }

    /// Time-to-live in milliseconds, `None` meaning the value never expires.
    pub fn expire_millis(&self) -> Option<u64> {
        self.expire_millis
    }

    /// Current acquisition status.
    pub fn acquisition_status(&self) -> AcquisitionStatus {
        AcquisitionStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    /// Overwrite the acquisition status (producer side, before publication).
    ///
    /// Once the value is shared through the cache the only legal transition
    /// is the one performed by [`expire_if_stale`](Self::expire_if_stale).
    pub fn set_acquisition_status(&self, status: AcquisitionStatus) {
        self.status.store(status as u8, Ordering::Release);
    }

    /// Whether the validity window has elapsed at wall-clock time `now`.
    ///
    /// A value without a time-to-live never expires.
    pub fn is_expired(&self, now: i64) -> bool {
        match self.expire_millis {
            Some(ttl) if ttl > 0 => self.acquisition_time + (ttl as i64) < now,
            _ => false,
        }
    }

    /// Transition `Acquired -> Expired` if the validity window has elapsed.
    ///
    /// Idempotent; concurrent callers race on a compare-exchange so exactly
    /// one performs the transition and none can revert it.
    pub fn expire_if_stale(&self, now: i64) {
        if !self.is_expired(now) {
            return;
        }
        let _ = self.status.compare_exchange(
            AcquisitionStatus::Acquired as u8,
            AcquisitionStatus::Expired as u8,
            Ordering::AcqRel,
            Ordering::Relaxed,
        );
    }
}

impl Clone for ParameterValue {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            raw_value: self.raw_value.clone(),
            eng_value: self.eng_value.clone(),
            generation_time: self.generation_time,
            acquisition_time: self.acquisition_time,
            expire_millis: self.expire_millis,
            status: AtomicU8::new(self.status.load(Ordering::Acquire)),
        }
    }
}
