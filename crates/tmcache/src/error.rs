// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Errors returned by cache construction.
//!
//! The hot path never surfaces errors: malformed or late deliveries are
//! dropped, expiry is reported through the returned value's
//! [`AcquisitionStatus`](crate::AcquisitionStatus). Only configuration
//! mistakes fail fast, at construction time.

use std::fmt;

/// Errors returned by tmcache operations.
#[derive(Debug)]
pub enum Error {
    /// Cache configuration is invalid (e.g., an entry cap of zero).
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "invalid cache configuration: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Convenience result alias for tmcache operations.
pub type Result<T> = std::result::Result<T, Error>;
