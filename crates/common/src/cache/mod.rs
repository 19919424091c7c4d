//! Reclaimable-value cache built on a bounded LRU map
//!
//! Each stored value sits behind a handle that can be cleared independently
//! of the LRU eviction order. A cleared value reads as a miss; callers are
//! expected to recompute it.
//!
//! # Features
//!
//! - **Thread-safe**: a `parking_lot::Mutex` guards the underlying map; clones
//!   share storage
//! - **Bounded**: least-recently-used slots are evicted past `max_capacity`
//! - **Reclamation policies**: weak references, idle windows, or age windows
//!   (see [`ReclaimPolicy`])
//! - **Metrics tracking**: optional hit/miss/eviction/reclamation counters
//! - **Testable**: clock abstraction for deterministic time-based testing
//!
//! # Examples
//!
//! ## Bounded cache
//! ```
//! use corekit_common::cache::ReclaimableCache;
//!
//! let cache: ReclaimableCache<String, i32> = ReclaimableCache::with_capacity(100).unwrap();
//! cache.put("key".to_string(), 42);
//! assert_eq!(cache.get("key").as_deref(), Some(&42));
//! ```
//!
//! ## Soft values
//! ```
//! use std::time::Duration;
//!
//! use corekit_common::cache::{CacheConfig, ReclaimableCache};
//!
//! let cache: ReclaimableCache<String, Vec<u8>> =
//!     ReclaimableCache::new(CacheConfig::soft(1000, Duration::from_secs(300))).unwrap();
//! cache.put("blob".to_string(), vec![0; 16]);
//! ```
//!
//! ## Forced reclamation
//! ```
//! use corekit_common::cache::ReclaimableCache;
//!
//! let cache: ReclaimableCache<&str, i32> = ReclaimableCache::with_capacity(4).unwrap();
//! cache.put("key", 1);
//! cache.reclaim(&"key");
//!
//! assert!(cache.get(&"key").is_none());
//! assert_eq!(cache.len(), 1); // slot kept until purged
//! assert_eq!(cache.purge_reclaimed(), 1);
//! ```
//!
//! ## Cache Statistics
//! ```
//! use corekit_common::cache::{CacheConfig, ReclaimableCache};
//!
//! let config = CacheConfig::builder().max_capacity(100).track_metrics(true).build();
//! let cache: ReclaimableCache<String, i32> = ReclaimableCache::new(config).unwrap();
//!
//! cache.put("key1".to_string(), 1);
//! let _ = cache.get("key1");
//!
//! let stats = cache.stats();
//! println!("Hit rate: {:.2}%", stats.hit_rate() * 100.0);
//! println!("Cache size: {}/{}", stats.size, stats.max_size);
//! ```

mod config;
mod core;
mod handle;
mod stats;

// Re-export public API
pub use core::ReclaimableCache;

pub use config::{
    CacheConfig, CacheConfigBuilder, ReclaimPolicy, DEFAULT_INITIAL_CAPACITY, DEFAULT_LOAD_FACTOR,
    DEFAULT_MAX_CAPACITY,
};
pub use handle::ReclaimableHandle;
pub use stats::CacheStats;
