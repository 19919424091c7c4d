//! Specialized data structures
//!
//! - **[`lru_map`]**: bounded map with least-recently-used eviction, the
//!   storage layer underneath [`crate::cache::ReclaimableCache`]
//!
//! ## Usage
//!
//! ```rust
//! use corekit_common::collections::LruMap;
//!
//! let mut map = LruMap::new(4, 16).unwrap();
//! map.put("pattern", "yyyy-MM-dd");
//! assert_eq!(map.get(&"pattern"), Some(&"yyyy-MM-dd"));
//! ```

pub mod lru_map;

pub use lru_map::LruMap;
