//! Single-flight singleton registry
//!
//! Exactly one live instance per key, built lazily and shared by every caller.
//! Construction for a key is serialized by a per-key lock; lookups that hit
//! the cache never touch that lock.
//!
//! # Keys
//!
//! - Typed lookups ([`SingletonRegistry::get`]) key instances by type name plus
//!   the canonical JSON of the constructor arguments, so distinct arguments
//!   give distinct singletons of the same type.
//! - Named lookups ([`SingletonRegistry::get_by_name`]) decode JSON arguments
//!   for a type registered with [`SingletonRegistry::register_as`] and land on
//!   the same key as the typed lookup.
//! - String lookups ([`SingletonRegistry::get_or_init`]) use the key as given.
//!
//! # Failure
//!
//! A failing constructor returns [`RegistryError::Construction`] to the caller
//! that ran it and caches nothing. Callers blocked on the same key retry the
//! construction themselves once they acquire the lock. A panicking
//! constructor unwinds through the lock guard, releasing it.
//!
//! # Example
//! ```
//! use corekit_common::registry::SingletonRegistry;
//!
//! let registry = SingletonRegistry::new();
//! let first = registry.get_or_init("settings", || vec!["a", "b"]).unwrap();
//! let second = registry.get_or_init("settings", Vec::<&str>::new).unwrap();
//! assert!(std::sync::Arc::ptr_eq(&first, &second));
//!
//! registry.destroy();
//! assert!(registry.is_empty());
//! ```

mod core;
mod error;
mod key;

use once_cell::sync::Lazy;

pub use self::core::{Instance, Singleton, SingletonRegistry};
pub use self::error::{BoxError, RegistryError, RegistryResult};
pub use self::key::{key_for_name, singleton_key, ARGS_SEPARATOR};

static GLOBAL: Lazy<SingletonRegistry> = Lazy::new(SingletonRegistry::new);

/// Process-wide registry, created on first use
///
/// Prefer an owned [`SingletonRegistry`] where callers can be handed one;
/// the global instance is shared by everything in the process.
pub fn global() -> &'static SingletonRegistry {
    &GLOBAL
}
