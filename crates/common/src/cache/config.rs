//! Cache configuration types and builder patterns
//!
//! This module provides configuration for [`ReclaimableCache`]: capacity
//! bounds, the hash table load factor, and the policy that decides when a
//! stored value is reclaimed.
//!
//! [`ReclaimableCache`]: super::ReclaimableCache

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CommonError, CommonResult};
use crate::utils::duration_millis;

/// Default number of preallocated slots
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Default upper bound on stored entries
pub const DEFAULT_MAX_CAPACITY: usize = 1024;

/// Default hash table load factor
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Decides when a stored value stops being returned by reads.
///
/// A reclaimed value keeps its slot (and counts toward `len()`) until it is
/// overwritten, removed, evicted, or purged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "after_ms", rename_all = "snake_case")]
pub enum ReclaimPolicy {
    /// Values are only reclaimed when forced via `reclaim`
    #[default]
    Never,
    /// The cache holds a weak reference; the value is reclaimed once every
    /// caller-held `Arc` has been dropped
    Weak,
    /// Reclaimed once the value has not been read for the given duration
    Idle(#[serde(with = "duration_millis")] Duration),
    /// Reclaimed once the given duration has passed since the value was written
    Age(#[serde(with = "duration_millis")] Duration),
}

impl ReclaimPolicy {
    fn validate(self) -> CommonResult<()> {
        match self {
            Self::Idle(after) | Self::Age(after) if after.is_zero() => {
                Err(CommonError::config_field("reclaim", "reclaim duration must be > 0"))
            }
            _ => Ok(()),
        }
    }
}

/// Configuration for cache behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Number of slots preallocated up front
    pub initial_capacity: usize,

    /// Maximum number of entries; raised to `initial_capacity` when smaller
    pub max_capacity: usize,

    /// Hash table load factor used to size the initial allocation
    pub load_factor: f32,

    /// When stored values are reclaimed
    pub reclaim: ReclaimPolicy,

    /// Whether to collect hit/miss/eviction counters
    pub track_metrics: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_capacity: DEFAULT_MAX_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            reclaim: ReclaimPolicy::Never,
            track_metrics: false,
        }
    }
}

impl CacheConfig {
    /// Create a new configuration builder
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::default()
    }

    /// Bounded LRU cache holding at most `capacity` strongly referenced values
    ///
    /// # Example
    /// ```
    /// use corekit_common::cache::CacheConfig;
    ///
    /// let config = CacheConfig::bounded(64);
    /// assert_eq!(config.max_capacity, 64);
    /// ```
    pub fn bounded(capacity: usize) -> Self {
        Self {
            initial_capacity: capacity.min(DEFAULT_INITIAL_CAPACITY),
            max_capacity: capacity,
            ..Self::default()
        }
    }

    /// Bounded cache whose values are weakly referenced
    pub fn weak(capacity: usize) -> Self {
        Self { reclaim: ReclaimPolicy::Weak, ..Self::bounded(capacity) }
    }

    /// Bounded cache whose values are reclaimed after `idle` without a read
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    ///
    /// use corekit_common::cache::{CacheConfig, ReclaimPolicy};
    ///
    /// let config = CacheConfig::soft(128, Duration::from_secs(300));
    /// assert_eq!(config.reclaim, ReclaimPolicy::Idle(Duration::from_secs(300)));
    /// ```
    pub fn soft(capacity: usize, idle: Duration) -> Self {
        Self { reclaim: ReclaimPolicy::Idle(idle), ..Self::bounded(capacity) }
    }

    /// Explicit initial/max capacities and load factor
    pub fn with_load_factor(
        initial_capacity: usize,
        max_capacity: usize,
        load_factor: f32,
    ) -> Self {
        Self { initial_capacity, max_capacity, load_factor, ..Self::default() }
    }

    /// Check every field, returning the first problem found
    ///
    /// # Errors
    /// Returns [`CommonError::Config`] for zero capacities, a load factor
    /// outside `(0, 1]`, or a zero reclaim duration.
    pub fn validate(&self) -> CommonResult<()> {
        if self.initial_capacity == 0 {
            return Err(CommonError::config_field("initial_capacity", "must be > 0"));
        }
        if self.max_capacity == 0 {
            return Err(CommonError::config_field("max_capacity", "must be > 0"));
        }
        if !self.load_factor.is_finite() || self.load_factor <= 0.0 || self.load_factor > 1.0 {
            return Err(CommonError::config_field("load_factor", "must be in (0, 1]"));
        }
        self.reclaim.validate()
    }

    /// Upper bound actually enforced after clamping
    pub fn effective_max_capacity(&self) -> usize {
        self.max_capacity.max(self.initial_capacity)
    }

    /// Hash table slots to reserve so `initial_capacity` entries fit under the
    /// load factor
    pub(crate) fn hash_allocation(&self) -> usize {
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let slots = (self.initial_capacity as f64 / f64::from(self.load_factor)).ceil() as usize;
        slots.min(self.effective_max_capacity())
    }
}

/// Builder for CacheConfig with fluent API
#[derive(Debug, Default)]
pub struct CacheConfigBuilder {
    config: CacheConfig,
}

impl CacheConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of preallocated slots
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    /// Set the maximum number of entries
    pub fn max_capacity(mut self, capacity: usize) -> Self {
        self.config.max_capacity = capacity;
        self
    }

    /// Set the hash table load factor
    pub fn load_factor(mut self, load_factor: f32) -> Self {
        self.config.load_factor = load_factor;
        self
    }

    /// Set the reclaim policy
    pub fn reclaim(mut self, policy: ReclaimPolicy) -> Self {
        self.config.reclaim = policy;
        self
    }

    /// Enable or disable metrics tracking
    pub fn track_metrics(mut self, enabled: bool) -> Self {
        self.config.track_metrics = enabled;
        self
    }

    /// Build the configuration without validating it
    pub fn build(self) -> CacheConfig {
        self.config
    }

    /// Build and validate the configuration
    ///
    /// # Errors
    /// See [`CacheConfig::validate`].
    pub fn try_build(self) -> CommonResult<CacheConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
