//! Core reclaimable cache implementation
//!
//! [`ReclaimableCache`] layers [`ReclaimableHandle`]s over an [`LruMap`]. The
//! map decides which slot is evicted when capacity is exceeded; the handle
//! decides whether a slot still yields its value.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::config::CacheConfig;
use super::handle::ReclaimableHandle;
use super::stats::{CacheStats, MetricsCollector};
use crate::collections::LruMap;
use crate::error::CommonResult;
use crate::time::{Clock, SystemClock};

type Storage<K, V> = LruMap<K, ReclaimableHandle<V>>;

/// Thread-safe LRU cache whose values may be reclaimed independently of
/// eviction
///
/// Values are handed out as `Arc<V>`. A reclaimed value reads as a miss but
/// its slot still counts toward [`len`](Self::len) until it is overwritten,
/// removed, evicted, or purged with
/// [`purge_reclaimed`](Self::purge_reclaimed).
///
/// Clones share storage, configuration, and counters.
///
/// # Type Parameters
/// - `K`: Key type (must be `Eq + Hash + Clone`)
/// - `V`: Value type, possibly unsized (e.g. `dyn Any + Send + Sync`)
/// - `C`: Clock used for time-based reclamation (defaults to `SystemClock`)
///
/// # Example
/// ```
/// use corekit_common::cache::ReclaimableCache;
///
/// let cache: ReclaimableCache<String, i32> = ReclaimableCache::with_capacity(2).unwrap();
/// cache.put("a".to_string(), 1);
/// cache.put("b".to_string(), 2);
/// assert_eq!(cache.get("a").as_deref(), Some(&1));
///
/// cache.put("c".to_string(), 3); // evicts "b"
/// assert!(cache.get("b").is_none());
/// ```
pub struct ReclaimableCache<K, V, C = SystemClock>
where
    K: Eq + Hash + Clone,
    V: ?Sized,
    C: Clock,
{
    storage: Arc<Mutex<Storage<K, V>>>,
    config: CacheConfig,
    metrics: MetricsCollector,
    clock: C,
}

impl<K, V> ReclaimableCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
    V: ?Sized,
{
    /// Create a cache from a validated configuration using the system clock
    ///
    /// # Errors
    /// Returns [`CommonError::Config`](crate::error::CommonError::Config) when
    /// the configuration is invalid.
    pub fn new(config: CacheConfig) -> CommonResult<Self> {
        Self::with_clock(config, SystemClock)
    }

    /// Bounded cache holding at most `capacity` entries
    ///
    /// # Errors
    /// Returns a config error when `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> CommonResult<Self> {
        Self::new(CacheConfig::bounded(capacity))
    }

    /// Cache with explicit initial and maximum capacity and hash load factor
    ///
    /// # Errors
    /// Returns a config error for zero capacities or a load factor outside
    /// `(0, 1]`.
    pub fn with_load_factor(
        initial_capacity: usize,
        max_capacity: usize,
        load_factor: f32,
    ) -> CommonResult<Self> {
        Self::new(CacheConfig::with_load_factor(initial_capacity, max_capacity, load_factor))
    }
}

impl<K, V, C> ReclaimableCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: ?Sized,
    C: Clock,
{
    /// Create a cache with a custom clock (useful for testing)
    ///
    /// # Errors
    /// Returns a config error when the configuration is invalid.
    pub fn with_clock(config: CacheConfig, clock: C) -> CommonResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config, clock))
    }

    pub(crate) fn from_valid_config(config: CacheConfig, clock: C) -> Self {
        let mut map = LruMap::from_bounds(config.initial_capacity, config.max_capacity);
        map.reserve(config.hash_allocation().saturating_sub(config.initial_capacity));

        Self { storage: Arc::new(Mutex::new(map)), config, metrics: MetricsCollector::new(), clock }
    }

    /// Look up a value, promoting its slot on a hit
    ///
    /// Returns `None` when the key is absent or its value has been reclaimed.
    /// A reclaimed slot is left in place.
    pub fn get<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let policy = self.config.reclaim;
        let mut storage = self.storage.lock();

        let Some(handle) = storage.get_mut(key) else {
            self.record(MetricsCollector::record_miss);
            return None;
        };

        let was_cleared = handle.is_cleared();
        match handle.read(policy, now) {
            Some(value) => {
                self.record(MetricsCollector::record_hit);
                Some(value)
            }
            None => {
                if !was_cleared {
                    debug!(?policy, "cached value reclaimed");
                    self.record(|metrics| metrics.record_reclamations(1));
                }
                self.record(MetricsCollector::record_miss);
                None
            }
        }
    }

    /// Store a value, replacing any previous one, and return it
    ///
    /// Under [`ReclaimPolicy::Weak`](super::ReclaimPolicy::Weak) the returned
    /// `Arc` is what keeps the value alive.
    pub fn put(&self, key: K, value: V) -> Arc<V>
    where
        V: Sized,
    {
        self.put_arc(key, Arc::new(value))
    }

    /// Store an already shared value, replacing any previous one
    pub fn put_arc(&self, key: K, value: Arc<V>) -> Arc<V> {
        let handle = ReclaimableHandle::new(&value, self.config.reclaim, self.clock.now());
        let displaced = {
            let mut storage = self.storage.lock();
            self.store(&mut storage, key, handle)
        };
        drop(displaced);
        value
    }

    /// Store `value` only when no live value exists for `key`
    ///
    /// Returns `Ok` with the stored value after inserting, or `Err` with the
    /// live value already present, leaving the cache unchanged. The check and
    /// the insert happen under one lock acquisition.
    ///
    /// Under [`ReclaimPolicy::Weak`](super::ReclaimPolicy::Weak) the `Arc`
    /// returned in `Ok` is what keeps the inserted value alive.
    ///
    /// # Errors
    /// Returns the existing value when one is live.
    pub fn put_if_absent(&self, key: K, value: V) -> Result<Arc<V>, Arc<V>>
    where
        V: Sized,
    {
        let now = self.clock.now();
        let policy = self.config.reclaim;
        let value = Arc::new(value);

        let displaced = {
            let mut storage = self.storage.lock();
            let existing = storage.get_mut(&key).and_then(|handle| handle.read(policy, now));
            if let Some(existing) = existing {
                return Err(existing);
            }
            self.store(&mut storage, key, ReclaimableHandle::new(&value, policy, now))
        };
        drop(displaced);
        Ok(value)
    }

    /// Return the cached value, or compute, store, and return it on a miss
    ///
    /// `supplier` runs without the cache lock held. Two threads missing on
    /// the same key may both run it; the later write wins.
    ///
    /// # Example
    /// ```
    /// use corekit_common::cache::ReclaimableCache;
    ///
    /// let cache: ReclaimableCache<&str, String> = ReclaimableCache::with_capacity(8).unwrap();
    /// let first = cache.compute_if_absent("greeting", || "hello".to_string());
    /// let second = cache.compute_if_absent("greeting", || unreachable!());
    /// assert!(std::sync::Arc::ptr_eq(&first, &second));
    /// ```
    pub fn compute_if_absent<F>(&self, key: K, supplier: F) -> Arc<V>
    where
        V: Sized,
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }
        trace!("computing value for cache miss");
        self.put_arc(key, Arc::new(supplier()))
    }

    /// Keyed variant of [`compute_if_absent`](Self::compute_if_absent)
    ///
    /// When `function` yields `None` nothing is stored and the miss is
    /// returned unchanged.
    pub fn compute_if_absent_with<F>(&self, key: K, function: F) -> Option<Arc<V>>
    where
        V: Sized,
        F: FnOnce(&K) -> Option<V>,
    {
        if let Some(value) = self.get(&key) {
            return Some(value);
        }
        let value = function(&key)?;
        Some(self.put_arc(key, Arc::new(value)))
    }

    /// Remove a slot, returning its value if it was still live
    pub fn remove<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let handle = self.storage.lock().remove(key)?;
        handle.peek(self.config.reclaim, now)
    }

    /// Force the value for `key` to be reclaimed, as memory pressure would
    ///
    /// The slot stays in place and keeps its recency position. Returns `true`
    /// if a live value was cleared.
    pub fn reclaim<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let policy = self.config.reclaim;
        let mut storage = self.storage.lock();

        let Some(handle) = storage.peek_mut(key) else {
            return false;
        };
        let was_live = handle.is_live(policy, now);
        let was_cleared = handle.is_cleared();
        handle.clear();

        if !was_cleared {
            self.record(|metrics| metrics.record_reclamations(1));
        }
        was_live
    }

    /// Drop every slot whose value has been reclaimed
    ///
    /// Returns the number of slots removed.
    pub fn purge_reclaimed(&self) -> usize {
        let now = self.clock.now();
        let policy = self.config.reclaim;
        let mut newly_reclaimed = 0_u64;

        let removed = self.storage.lock().retain(|_, handle| {
            if handle.is_live(policy, now) {
                return true;
            }
            if !handle.is_cleared() {
                newly_reclaimed += 1;
            }
            false
        });

        if newly_reclaimed > 0 {
            self.record(|metrics| metrics.record_reclamations(newly_reclaimed));
        }
        if removed > 0 {
            debug!(removed, "purged reclaimed cache slots");
        }
        removed
    }

    /// Returns `true` if a read of `key` would hit
    ///
    /// Does not record statistics or alter the recency order.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        self.storage.lock().peek(key).is_some_and(|handle| handle.is_live(self.config.reclaim, now))
    }

    /// Clear all entries from the cache
    pub fn clear(&self) {
        self.storage.lock().clear();

        if self.config.track_metrics {
            self.metrics.reset();
        }
    }

    /// Number of occupied slots, including reclaimed ones
    pub fn len(&self) -> usize {
        self.storage.lock().len()
    }

    /// Check if the cache has no slots
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of slots after clamping
    pub fn capacity(&self) -> usize {
        self.config.effective_max_capacity()
    }

    /// Configuration this cache was built with
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get cache statistics
    ///
    /// Counters stay at zero unless `track_metrics` is enabled.
    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot(self.len(), self.capacity())
    }

    /// Insert `handle`, returning whatever left the map so the caller can drop
    /// it after releasing the lock.
    fn store(
        &self,
        storage: &mut Storage<K, V>,
        key: K,
        handle: ReclaimableHandle<V>,
    ) -> Option<(K, ReclaimableHandle<V>)> {
        let replacing = storage.contains_key(&key);
        let displaced = storage.push(key, handle);

        self.record(MetricsCollector::record_insert);
        if !replacing && displaced.is_some() {
            self.record(MetricsCollector::record_eviction);
        }
        displaced
    }

    fn record<F>(&self, update: F)
    where
        F: FnOnce(&MetricsCollector),
    {
        if self.config.track_metrics {
            update(&self.metrics);
        }
    }
}

impl<K, V> Default for ReclaimableCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
    V: ?Sized,
{
    fn default() -> Self {
        Self::from_valid_config(CacheConfig::default(), SystemClock)
    }
}

impl<K, V, C> Clone for ReclaimableCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: ?Sized,
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: self.config.clone(),
            metrics: self.metrics.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<K, V, C> fmt::Debug for ReclaimableCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: ?Sized,
    C: Clock,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReclaimableCache")
            .field("len", &self.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for cache::core.
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::cache::ReclaimPolicy;
    use crate::error::CommonError;
    use crate::time::MockClock;

    fn tracked(capacity: usize) -> ReclaimableCache<String, i32> {
        let config = CacheConfig::builder()
            .initial_capacity(capacity)
            .max_capacity(capacity)
            .track_metrics(true)
            .build();
        ReclaimableCache::new(config).expect("valid config")
    }

    fn with_mock_clock(
        policy: ReclaimPolicy,
    ) -> (ReclaimableCache<String, i32, MockClock>, MockClock) {
        let clock = MockClock::new();
        let config =
            CacheConfig::builder().max_capacity(8).reclaim(policy).track_metrics(true).build();
        let cache = ReclaimableCache::with_clock(config, clock.clone()).expect("valid config");
        (cache, clock)
    }

    /// Validates `ReclaimableCache::new` behavior for the cache new scenario.
    ///
    /// Assertions:
    /// - Confirms `cache.len()` equals `0`.
    /// - Ensures `cache.is_empty()` evaluates to true.
    /// - Confirms the default capacity is `1024`.
    #[test]
    fn test_cache_new() {
        let cache: ReclaimableCache<String, i32> =
            ReclaimableCache::new(CacheConfig::default()).expect("valid config");
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 1024);
        assert_eq!(ReclaimableCache::<String, i32>::default().config(), cache.config());
    }

    /// Validates the rejection of zero capacity and bad load factors.
    ///
    /// Assertions:
    /// - Ensures each constructor returns `CommonError::Config`.
    #[test]
    fn test_cache_rejects_invalid_config() {
        let zero = ReclaimableCache::<String, i32>::with_capacity(0).unwrap_err();
        assert!(matches!(zero, CommonError::Config { .. }));

        let load = ReclaimableCache::<String, i32>::with_load_factor(4, 8, 0.0).unwrap_err();
        assert!(matches!(load, CommonError::Config { .. }));
    }

    /// Validates `ReclaimableCache::put` behavior for the put and get scenario.
    ///
    /// Assertions:
    /// - Confirms `put` returns the stored value.
    /// - Confirms `get("key1")` equals `Some(42)` and `get("key3")` is `None`.
    /// - Confirms `cache.len()` equals `2`.
    #[test]
    fn test_cache_put_and_get() {
        let cache = tracked(10);

        assert_eq!(*cache.put("key1".to_string(), 42), 42);
        cache.put("key2".to_string(), 84);

        assert_eq!(cache.get("key1").as_deref(), Some(&42));
        assert_eq!(cache.get("key2").as_deref(), Some(&84));
        assert_eq!(cache.get("key3"), None);
        assert_eq!(cache.len(), 2);
    }

    /// Validates the LRU eviction order through the cache layer.
    ///
    /// Assertions:
    /// - Confirms that after A, B, read A, put C the contents are {A, C}.
    /// - Confirms one eviction is counted and the replacement is not.
    #[test]
    fn test_cache_lru_eviction() {
        let cache = tracked(2);
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);
        assert!(cache.get("a").is_some());
        cache.put("c".to_string(), 3);
        cache.put("c".to_string(), 30);

        assert!(cache.contains_key("a"));
        assert!(!cache.contains_key("b"));
        assert!(cache.contains_key("c"));
        assert_eq!(cache.stats().evictions, 1);
        assert_eq!(cache.stats().inserts, 4);
    }

    /// Validates the miss-on-clear scenario.
    ///
    /// Assertions:
    /// - Confirms `reclaim` reports a live value was cleared.
    /// - Confirms the key reads as a miss while still counting toward `len()`.
    /// - Confirms a fresh `put` makes the key readable again.
    #[test]
    fn test_cache_miss_on_forced_reclaim() {
        let cache = tracked(4);
        cache.put("key".to_string(), 1);

        assert!(cache.reclaim("key"));
        assert!(!cache.reclaim("key"));
        assert_eq!(cache.get("key"), None);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().reclamations, 1);

        cache.put("key".to_string(), 2);
        assert_eq!(cache.get("key").as_deref(), Some(&2));
    }

    /// Validates `put_if_absent` against live, missing, and reclaimed slots.
    ///
    /// Assertions:
    /// - Confirms inserting into an empty slot returns `Ok` with the value.
    /// - Confirms a live value is returned in `Err` and not replaced.
    /// - Confirms a reclaimed slot is treated as absent.
    #[test]
    fn test_cache_put_if_absent() {
        let cache = tracked(4);

        assert_eq!(cache.put_if_absent("key".to_string(), 1).as_deref(), Ok(&1));
        let second = cache.put_if_absent("key".to_string(), 2);
        assert!(matches!(second, Err(existing) if *existing == 1));
        assert_eq!(cache.get("key").as_deref(), Some(&1));

        cache.reclaim("key");
        assert_eq!(cache.put_if_absent("key".to_string(), 3).as_deref(), Ok(&3));
        assert_eq!(cache.get("key").as_deref(), Some(&3));
    }

    /// Validates `put_if_absent` when values are weakly held.
    ///
    /// Assertions:
    /// - Confirms the inserted value is readable while the returned `Arc` is
    ///   held.
    /// - Confirms a second insert sees the live value.
    /// - Ensures dropping the returned `Arc` lets the value be reclaimed.
    #[test]
    fn test_cache_put_if_absent_weak() {
        let cache: ReclaimableCache<&str, u32> =
            ReclaimableCache::new(CacheConfig::weak(4)).expect("valid config");

        let held = cache.put_if_absent("k", 1).expect("slot was empty");
        assert_eq!(cache.get(&"k").as_deref(), Some(&1));
        assert!(matches!(cache.put_if_absent("k", 2), Err(existing) if *existing == 1));

        drop(held);
        assert_eq!(cache.get(&"k"), None);
        assert_eq!(cache.put_if_absent("k", 3).as_deref(), Ok(&3));
    }

    /// Validates the compute-if-absent idempotence scenario.
    ///
    /// Assertions:
    /// - Confirms the supplier runs exactly once.
    /// - Ensures both calls return the same `Arc`.
    #[test]
    fn test_cache_compute_if_absent_runs_once() {
        let cache = tracked(4);
        let calls = AtomicUsize::new(0);

        let first = cache.compute_if_absent("key".to_string(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            7
        });
        let second = cache.compute_if_absent("key".to_string(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            8
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    /// Validates the keyed compute variant.
    ///
    /// Assertions:
    /// - Confirms a `None` result stores nothing.
    /// - Confirms the function receives the key.
    #[test]
    fn test_cache_compute_if_absent_with() {
        let cache: ReclaimableCache<String, usize> =
            ReclaimableCache::with_capacity(4).expect("capacity");

        assert_eq!(cache.compute_if_absent_with("skip".to_string(), |_| None), None);
        assert!(cache.is_empty());

        let len = cache.compute_if_absent_with("four".to_string(), |key| Some(key.len()));
        assert_eq!(len.as_deref(), Some(&4));
        assert_eq!(cache.get("four").as_deref(), Some(&4));
    }

    /// Validates `remove` and `clear`.
    ///
    /// Assertions:
    /// - Confirms `remove` returns the live value and `None` afterwards.
    /// - Confirms `clear` empties the cache and resets counters.
    #[test]
    fn test_cache_remove_and_clear() {
        let cache = tracked(4);
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);

        assert_eq!(cache.remove("a").as_deref(), Some(&1));
        assert_eq!(cache.remove("a"), None);

        let _ = cache.get("b");
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().total_accesses(), 0);
    }

    /// Validates the idle reclamation policy with a mock clock.
    ///
    /// Assertions:
    /// - Confirms reads inside the idle window keep the value alive.
    /// - Confirms the value is a miss after a full idle window.
    /// - Confirms `purge_reclaimed` then frees the slot.
    #[test]
    fn test_cache_idle_reclamation() {
        let (cache, clock) = with_mock_clock(ReclaimPolicy::Idle(Duration::from_secs(60)));
        cache.put("session".to_string(), 1);

        clock.advance(Duration::from_secs(45));
        assert!(cache.get("session").is_some());
        clock.advance(Duration::from_secs(45));
        assert!(cache.get("session").is_some());

        clock.advance(Duration::from_secs(60));
        assert!(!cache.contains_key("session"));
        assert_eq!(cache.get("session"), None);
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.purge_reclaimed(), 1);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().reclamations, 1);
    }

    /// Validates the age reclamation policy with a mock clock.
    ///
    /// Assertions:
    /// - Confirms reads do not extend the age window.
    /// - Confirms `purge_reclaimed` counts expired slots it finds itself.
    #[test]
    fn test_cache_age_reclamation() {
        let (cache, clock) = with_mock_clock(ReclaimPolicy::Age(Duration::from_secs(10)));
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);

        clock.advance(Duration::from_secs(9));
        assert!(cache.get("a").is_some());
        clock.advance(Duration::from_secs(1));

        assert_eq!(cache.purge_reclaimed(), 2);
        assert_eq!(cache.stats().reclamations, 2);
    }

    /// Validates the weak reclamation policy.
    ///
    /// Assertions:
    /// - Confirms the value is readable while the caller holds the `Arc`.
    /// - Confirms the value is a miss once every `Arc` is dropped.
    #[test]
    fn test_cache_weak_reclamation() {
        let cache: ReclaimableCache<&str, Vec<u8>> =
            ReclaimableCache::new(CacheConfig::weak(4)).expect("valid config");

        let held = cache.put("buffer", vec![1, 2, 3]);
        let read = cache.get(&"buffer").expect("held value is live");
        assert!(Arc::ptr_eq(&held, &read));

        drop(held);
        drop(read);
        assert_eq!(cache.get(&"buffer"), None);
    }

    /// Validates hit/miss accounting.
    ///
    /// Assertions:
    /// - Confirms `stats.hits` equals `2` and `stats.misses` equals `1`.
    /// - Confirms `stats.size` and `stats.max_size`.
    #[test]
    fn test_cache_stats() {
        let cache = tracked(4);
        cache.put("key".to_string(), 1);
        let _ = cache.get("key");
        let _ = cache.get("key");
        let _ = cache.get("missing");

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
        assert_eq!(stats.max_size, 4);
    }

    /// Validates that clones share storage across threads.
    ///
    /// Assertions:
    /// - Confirms all writes from worker threads are visible.
    /// - Ensures `len()` never exceeds capacity.
    #[test]
    fn test_cache_concurrent_access() {
        let cache = tracked(64);

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..8 {
                        cache.put(format!("key-{worker}-{i}"), worker * 8 + i);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("worker panicked");
        }

        assert_eq!(cache.len(), 64);
        assert_eq!(cache.get("key-3-4").as_deref(), Some(&28));
    }

    /// Validates unsized values.
    ///
    /// Assertions:
    /// - Confirms a `dyn Any` value can be stored with `put_arc` and downcast.
    #[test]
    fn test_cache_unsized_values() {
        let cache: ReclaimableCache<String, dyn std::any::Any + Send + Sync> =
            ReclaimableCache::with_capacity(4).expect("capacity");

        cache.put_arc("answer".to_string(), Arc::new(42_u32));
        let value = cache.get("answer").expect("present");
        assert_eq!(value.downcast_ref::<u32>(), Some(&42));
    }
}
