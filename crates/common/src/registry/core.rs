//! Single-flight singleton registry
//!
//! Lookups take a fast path through the instance cache. On a miss the caller
//! acquires the lock for that key, checks the cache again, and only then
//! runs the constructor. Concurrent callers for the same absent key block on
//! the lock and find the finished instance on their second check.

use std::any::{type_name, Any};
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::{BoxError, RegistryError, RegistryResult};
use super::key::{key_for_name, singleton_key, validate_key};
use crate::cache::{CacheConfig, ReclaimableCache};
use crate::error::CommonResult;

/// Type-erased instance as stored in the registry
pub type Instance = Arc<dyn Any + Send + Sync>;

type KeyLock = Arc<Mutex<()>>;
type Factory = dyn Fn(&SingletonRegistry, &Value) -> RegistryResult<Instance> + Send + Sync;

/// A type the registry can construct from serializable arguments
///
/// # Example
/// ```
/// use corekit_common::registry::{BoxError, Singleton, SingletonRegistry};
///
/// struct Greeter {
///     greeting: String,
/// }
///
/// impl Singleton for Greeter {
///     type Args = String;
///
///     fn construct(greeting: String) -> Result<Self, BoxError> {
///         Ok(Self { greeting })
///     }
/// }
///
/// let registry = SingletonRegistry::new();
/// let hello = registry.get::<Greeter>("hello".to_string()).unwrap();
/// let again = registry.get::<Greeter>("hello".to_string()).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&hello, &again));
/// assert_eq!(hello.greeting, "hello");
/// ```
pub trait Singleton: Any + Send + Sync + Sized {
    /// Constructor arguments; part of the registry key
    type Args: Serialize + DeserializeOwned;

    /// Build the instance. Errors propagate to the caller that ran it.
    ///
    /// # Errors
    /// Any error the constructor wants to report.
    fn construct(args: Self::Args) -> Result<Self, BoxError>;
}

/// Process-wide key to instance store with per-key construction locks
///
/// Use one registry per context, or [`global`](super::global) when a single
/// process-wide instance is wanted.
pub struct SingletonRegistry {
    instances: ReclaimableCache<String, dyn Any + Send + Sync>,
    locks: DashMap<String, KeyLock>,
    factories: DashMap<String, Arc<Factory>>,
}

impl SingletonRegistry {
    /// Registry backed by a cache with the default configuration
    pub fn new() -> Self {
        Self::from_cache(ReclaimableCache::default())
    }

    /// Registry backed by a cache built from `config`
    ///
    /// Instances evicted or reclaimed by the cache are rebuilt on the next
    /// lookup.
    ///
    /// # Errors
    /// Returns a config error when `config` is invalid.
    pub fn with_config(config: CacheConfig) -> CommonResult<Self> {
        Ok(Self::from_cache(ReclaimableCache::new(config)?))
    }

    fn from_cache(instances: ReclaimableCache<String, dyn Any + Send + Sync>) -> Self {
        Self { instances, locks: DashMap::new(), factories: DashMap::new() }
    }

    /// Shared instance of `T` for `args`, constructing it on first use
    ///
    /// # Errors
    /// - [`RegistryError::Construction`] when `T::construct` fails
    /// - [`RegistryError::TypeMismatch`] when the key holds another type
    /// - [`RegistryError::Common`] when `args` cannot be serialized
    pub fn get<T: Singleton>(&self, args: T::Args) -> RegistryResult<Arc<T>> {
        let key = singleton_key::<T, _>(&args)?;
        self.try_get_or_init(&key, || T::construct(args))
    }

    /// Shared instance for a type registered under `name`, with JSON arguments
    ///
    /// The arguments are decoded into the type's `Args`, so the instance is
    /// the same one [`get`](Self::get) returns for equal arguments.
    ///
    /// # Errors
    /// - [`RegistryError::UnknownType`] when nothing is registered as `name`
    /// - [`RegistryError::InvalidArguments`] when `args` do not decode
    /// - any error [`get`](Self::get) can return
    pub fn get_by_name(&self, name: &str, args: &Value) -> RegistryResult<Instance> {
        let factory = self
            .factories
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| RegistryError::UnknownType { name: name.to_owned() })?;
        factory(self, args)
    }

    /// Make `T` available to [`get_by_name`](Self::get_by_name) under its
    /// type name
    pub fn register<T: Singleton>(&self) {
        self.register_as::<T>(type_name::<T>());
    }

    /// Make `T` available to [`get_by_name`](Self::get_by_name) under `alias`
    ///
    /// A later registration under the same alias replaces the earlier one.
    pub fn register_as<T: Singleton>(&self, alias: impl Into<String>) {
        let factory: Arc<Factory> =
            Arc::new(|registry: &Self, args: &Value| -> RegistryResult<Instance> {
                let args = serde_json::from_value::<T::Args>(args.clone()).map_err(|err| {
                    RegistryError::InvalidArguments {
                        name: type_name::<T>().to_owned(),
                        message: err.to_string(),
                    }
                })?;
                let instance: Instance = registry.get::<T>(args)?;
                Ok(instance)
            });
        self.factories.insert(alias.into(), factory);
    }

    /// Shared instance stored under `key`, built by `init` on first use
    ///
    /// # Errors
    /// - [`RegistryError::TypeMismatch`] when `key` holds another type
    /// - [`RegistryError::Common`] when `key` is empty
    pub fn get_or_init<T, F>(&self, key: &str, init: F) -> RegistryResult<Arc<T>>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        self.try_get_or_init(key, || Ok::<_, Infallible>(init()))
    }

    /// Fallible variant of [`get_or_init`](Self::get_or_init)
    ///
    /// When `init` fails nothing is cached and the error is returned to this
    /// caller only; the next caller runs `init` again.
    ///
    /// # Errors
    /// - [`RegistryError::Construction`] wrapping the error from `init`
    /// - any error [`get_or_init`](Self::get_or_init) can return
    pub fn try_get_or_init<T, F, E>(&self, key: &str, init: F) -> RegistryResult<Arc<T>>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> Result<T, E>,
        E: Into<BoxError>,
    {
        validate_key(key)?;
        if let Some(instance) = self.lookup::<T>(key)? {
            return Ok(instance);
        }

        let lock = self.key_lock(key);
        let _guard = lock.lock();

        // Another caller may have finished while we waited for the lock.
        if let Some(instance) = self.lookup::<T>(key)? {
            return Ok(instance);
        }

        debug!(key, singleton = type_name::<T>(), "constructing singleton");
        let instance = match init() {
            Ok(value) => Arc::new(value),
            Err(err) => {
                let source: BoxError = err.into();
                warn!(key, error = %source, "singleton construction failed");
                return Err(RegistryError::Construction { key: key.to_owned(), source });
            }
        };

        let erased: Instance = instance.clone();
        self.instances.put_arc(key.to_owned(), erased);
        debug!(key, "singleton constructed");
        Ok(instance)
    }

    /// Store `instance` under its type name, replacing any previous one
    pub fn put<T: Any + Send + Sync>(&self, instance: T) -> Arc<T> {
        let instance = Arc::new(instance);
        let erased: Instance = instance.clone();
        self.instances.put_arc(type_name::<T>().to_owned(), erased);
        instance
    }

    /// Store `instance` under `key`, replacing any previous one
    ///
    /// # Errors
    /// Returns a validation error when `key` is empty.
    pub fn put_keyed<T: Any + Send + Sync>(
        &self,
        key: &str,
        instance: T,
    ) -> RegistryResult<Arc<T>> {
        validate_key(key)?;
        let instance = Arc::new(instance);
        let erased: Instance = instance.clone();
        self.instances.put_arc(key.to_owned(), erased);
        Ok(instance)
    }

    /// Drop the instance stored under `key`; returns `true` if one was live
    pub fn remove(&self, key: &str) -> bool {
        self.instances.remove(key).is_some()
    }

    /// Drop the argument-less instance of `T`
    ///
    /// Instances of `T` built with arguments live under their own keys; see
    /// [`key_for_name`] to address them with [`remove`](Self::remove).
    pub fn remove_type<T: ?Sized>(&self) -> bool {
        self.remove(type_name::<T>())
    }

    /// Returns `true` if a live instance is stored under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.instances.contains_key(key)
    }

    /// Key under which `get::<T>(args)` stores its instance
    ///
    /// # Errors
    /// Returns a serialization error when `args` cannot be rendered.
    pub fn key_of<T: Singleton>(args: &T::Args) -> CommonResult<String> {
        singleton_key::<T, _>(args)
    }

    /// Key for a type registered under `name` with JSON arguments
    ///
    /// # Errors
    /// Returns a serialization error when `args` cannot be rendered.
    pub fn key_of_name(name: &str, args: &Value) -> CommonResult<String> {
        key_for_name(name, args)
    }

    /// Number of stored instances
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns `true` when no instances are stored
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Drop every instance; the lock table and registrations are kept
    pub fn destroy(&self) {
        let dropped = self.instances.len();
        self.instances.clear();
        debug!(dropped, "singleton registry destroyed");
    }

    fn lookup<T: Any + Send + Sync>(&self, key: &str) -> RegistryResult<Option<Arc<T>>> {
        let Some(instance) = self.instances.get(key) else {
            return Ok(None);
        };
        instance
            .downcast::<T>()
            .map(Some)
            .map_err(|_| RegistryError::TypeMismatch {
                key: key.to_owned(),
                expected: type_name::<T>(),
            })
    }

    /// Lock for `key`, created on first use and never removed, so every caller
    /// for a key contends on the same mutex.
    fn key_lock(&self, key: &str) -> KeyLock {
        if let Some(lock) = self.locks.get(key) {
            return Arc::clone(lock.value());
        }
        Arc::clone(self.locks.entry(key.to_owned()).or_default().value())
    }
}

impl Default for SingletonRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SingletonRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingletonRegistry")
            .field("instances", &self.instances.len())
            .field("locks", &self.locks.len())
            .field("factories", &self.factories.len())
            .finish()
    }
}
