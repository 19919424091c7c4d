//! Caching and single-initialization primitives shared across Corekit crates.
//!
//! - [`collections::LruMap`]: bounded map with least-recently-used eviction
//! - [`cache::ReclaimableCache`]: LRU cache whose values can be reclaimed
//!   independently of eviction
//! - [`registry::SingletonRegistry`]: lazily built, shared singletons with
//!   single-flight construction per key
//! - [`format`]: thread-confined and shared date formatter caches
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: errors, collections, serde helpers
//! - `observability`: `tracing` events (implied by `runtime`)
//! - `runtime`: cache, registry, formatters, time (default)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod collections;
#[cfg(feature = "foundation")]
pub mod error;
#[cfg(feature = "foundation")]
pub mod utils;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod cache;
#[cfg(feature = "runtime")]
pub mod format;
#[cfg(feature = "runtime")]
pub mod registry;
#[cfg(feature = "runtime")]
pub mod time;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use cache::{CacheConfig, CacheConfigBuilder, CacheStats, ReclaimPolicy, ReclaimableCache};
#[cfg(feature = "foundation")]
pub use collections::LruMap;
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult, ErrorClassification, ErrorSeverity};
#[cfg(feature = "runtime")]
pub use format::{
    format_with_pattern, get_or_create_shared_formatter, get_or_create_thread_local_formatter,
    DateFormatter, ScratchFormatter, SharedFormatters,
};
#[cfg(feature = "runtime")]
pub use registry::{RegistryError, RegistryResult, Singleton, SingletonRegistry};
#[cfg(feature = "runtime")]
pub use time::{Clock, MockClock, SystemClock};
#[cfg(feature = "foundation")]
pub use utils::serde::duration_millis;
