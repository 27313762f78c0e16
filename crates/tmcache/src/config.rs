// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cache configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for [`ParameterCache`](crate::ParameterCache).
///
/// Validated at cache construction (fail-fast on invalid config).
///
/// # Examples
///
/// ```
/// use tmcache::CacheConfig;
///
/// // Default: lazy subscription, 5 minute window, 4096 deliveries cap.
/// let config = CacheConfig::default();
/// assert!(config.validate().is_ok());
///
/// let custom = CacheConfig {
///     cache_all: true,
///     max_duration_ms: 60_000,
///     ..Default::default()
/// };
/// assert!(custom.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache every incoming parameter. When `false`, only parameters a
    /// reader has previously asked about are cached, which keeps memory
    /// proportional to what displays actually watch.
    pub cache_all: bool,
    /// Minimum history window retained per parameter, in milliseconds of
    /// generation time. The per-parameter ring grows (up to
    /// `max_num_entries`) to guarantee this window.
    pub max_duration_ms: u64,
    /// Hard upper bound on deliveries retained per parameter. Rounded up
    /// internally to a power of two for index masking.
    pub max_num_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_all: false,
            max_duration_ms: 300_000,
            max_num_entries: 4096,
        }
    }
}

impl CacheConfig {
    /// Preset: cache the full parameter catalog as it is received.
    ///
    /// Suits processors feeding many displays or on-demand consumers where
    /// the working set is unpredictable.
    #[must_use]
    pub fn all_parameters() -> Self {
        Self {
            cache_all: true,
            ..Default::default()
        }
    }

    /// Preset: cache only previously requested parameters.
    #[must_use]
    pub fn subscribed_only() -> Self {
        Self::default()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_num_entries < 1 {
            return Err(Error::InvalidConfig(
                "max_num_entries must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}
