//! Shared formatter cache
//!
//! [`DateFormatter`]s are immutable, so one instance per pattern can serve
//! every thread. Construction happens outside the cache lock; two threads
//! missing on the same pattern may both build a formatter and the later
//! store wins. Both results format identically.

use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::trace;

use super::formatter::DateFormatter;
use crate::cache::{CacheConfig, CacheStats, ReclaimableCache};
use crate::error::CommonResult;
use crate::time::SystemClock;

/// Default number of patterns kept by [`SharedFormatters::new`]
pub const DEFAULT_SHARED_FORMATTERS: usize = 256;

static SHARED: Lazy<SharedFormatters> = Lazy::new(SharedFormatters::new);

/// Process-wide shared formatter cache
pub fn shared() -> &'static SharedFormatters {
    &SHARED
}

/// Pattern to [`DateFormatter`] cache safe to use from any thread
#[derive(Debug, Clone)]
pub struct SharedFormatters {
    cache: ReclaimableCache<String, DateFormatter>,
}

impl SharedFormatters {
    /// Cache holding up to [`DEFAULT_SHARED_FORMATTERS`] patterns
    pub fn new() -> Self {
        let config = CacheConfig::bounded(DEFAULT_SHARED_FORMATTERS);
        Self { cache: ReclaimableCache::from_valid_config(config, SystemClock) }
    }

    /// Cache built from `config`
    ///
    /// # Errors
    /// Returns a config error when `config` is invalid.
    pub fn with_config(config: CacheConfig) -> CommonResult<Self> {
        Ok(Self { cache: ReclaimableCache::new(config)? })
    }

    /// Shared formatter for `pattern`, built on a miss
    ///
    /// # Errors
    /// Returns a validation error when `pattern` is invalid; nothing is
    /// cached.
    pub fn get_or_create(&self, pattern: &str) -> CommonResult<Arc<DateFormatter>> {
        if let Some(formatter) = self.cache.get(pattern) {
            return Ok(formatter);
        }

        let formatter = DateFormatter::new(pattern)?;
        trace!(pattern, "created shared formatter");
        Ok(self.cache.put(pattern.to_owned(), formatter))
    }

    /// Number of cached patterns
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns `true` when no patterns are cached
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drop every cached formatter
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Statistics of the underlying cache
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl Default for SharedFormatters {
    fn default() -> Self {
        Self::new()
    }
}
