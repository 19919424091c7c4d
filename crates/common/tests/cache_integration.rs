//! Integration tests for cache module
//!
//! Tests LRU eviction through the cache layer, reclamation policies, metrics,
//! and concurrent access patterns

#![cfg(feature = "runtime")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use corekit_common::cache::{CacheConfig, ReclaimPolicy, ReclaimableCache};
use corekit_common::time::MockClock;
use corekit_common::CommonError;

/// Verifies LRU eviction order with capacity 2.
///
/// Reading a key promotes it, so the unread key is the one evicted.
///
/// # Test Steps
/// 1. Insert A and B into a cache of capacity 2
/// 2. Read A
/// 3. Insert C
/// 4. Verify the contents are {A, C}
#[test]
fn test_lru_eviction_prefers_unread_entry() {
    let cache: ReclaimableCache<&str, i32> = ReclaimableCache::with_capacity(2).unwrap();

    cache.put("A", 1);
    cache.put("B", 2);
    assert_eq!(cache.get(&"A").as_deref(), Some(&1));
    cache.put("C", 3);

    assert!(cache.contains_key(&"A"));
    assert!(!cache.contains_key(&"B"));
    assert!(cache.contains_key(&"C"));
    assert_eq!(cache.len(), 2);
}

/// Verifies that `len()` never exceeds capacity for a long insert sequence.
///
/// # Test Steps
/// 1. Insert 1,000 keys drawn from a larger key space
/// 2. Verify `len() <= capacity()` after every insert
#[test]
fn test_capacity_invariant() {
    let cache: ReclaimableCache<u64, u64> = ReclaimableCache::with_load_factor(4, 32, 0.5).unwrap();

    for i in 0..1_000_u64 {
        cache.put((i * 7919) % 97, i);
        assert!(cache.len() <= cache.capacity());
    }
    assert_eq!(cache.len(), 32);
}

/// Verifies that a forcibly reclaimed value reads as a miss while its slot
/// still counts toward `len()`.
///
/// # Test Steps
/// 1. Store a value and reclaim it
/// 2. Verify `get` misses and `len()` is unchanged
/// 3. Purge and verify the slot is gone
#[test]
fn test_miss_on_clear() {
    let cache: ReclaimableCache<String, String> = ReclaimableCache::with_capacity(4).unwrap();
    cache.put("k".to_string(), "v".to_string());

    assert!(cache.reclaim("k"));
    assert_eq!(cache.get("k"), None);
    assert_eq!(cache.len(), 1);

    assert_eq!(cache.purge_reclaimed(), 1);
    assert_eq!(cache.len(), 0);
}

/// Verifies `compute_if_absent` never reruns the supplier for a present key.
///
/// # Test Steps
/// 1. Compute a value twice for the same key
/// 2. Verify the supplier ran once and both results are the same `Arc`
#[test]
fn test_compute_if_absent_idempotent() {
    let cache: ReclaimableCache<String, Vec<u32>> = ReclaimableCache::with_capacity(8).unwrap();
    let calls = AtomicUsize::new(0);
    let supplier = || {
        calls.fetch_add(1, Ordering::SeqCst);
        vec![1, 2, 3]
    };

    let first = cache.compute_if_absent("k".to_string(), supplier);
    let second = cache.compute_if_absent("k".to_string(), supplier);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));
}

/// Verifies a reclaimed value is recomputed by `compute_if_absent`.
///
/// # Test Steps
/// 1. Compute a value, then reclaim it
/// 2. Compute again and verify the supplier ran a second time
#[test]
fn test_compute_after_reclaim_recomputes() {
    let cache: ReclaimableCache<&str, u32> = ReclaimableCache::with_capacity(8).unwrap();

    let first = cache.compute_if_absent("k", || 1);
    cache.reclaim(&"k");
    let second = cache.compute_if_absent("k", || 2);

    assert_eq!((*first, *second), (1, 2));
    assert_eq!(cache.len(), 1);
}

/// Verifies soft-value reclamation driven by a mock clock.
///
/// # Test Steps
/// 1. Build a cache with a 5 minute idle window
/// 2. Keep one key warm with reads and let another go idle
/// 3. Verify only the idle key is reclaimed and purged
#[test]
fn test_idle_reclamation_with_mock_clock() {
    let clock = MockClock::new();
    let config = CacheConfig::soft(16, Duration::from_secs(300));
    let cache: ReclaimableCache<&str, u32, MockClock> =
        ReclaimableCache::with_clock(config, clock.clone()).unwrap();

    cache.put("warm", 1);
    cache.put("cold", 2);

    for _ in 0..4 {
        clock.advance(Duration::from_secs(120));
        assert!(cache.get(&"warm").is_some());
    }

    assert!(!cache.contains_key(&"cold"));
    assert_eq!(cache.purge_reclaimed(), 1);
    assert_eq!(cache.len(), 1);
    assert!(cache.contains_key(&"warm"));
}

/// Verifies weakly held values live exactly as long as a caller's `Arc`.
///
/// # Test Steps
/// 1. Store a value in a weak cache and keep the returned `Arc`
/// 2. Verify reads hit while the `Arc` is alive
/// 3. Drop it and verify the next read misses
#[test]
fn test_weak_values_follow_caller_lifetime() {
    let config = CacheConfig::builder().max_capacity(4).reclaim(ReclaimPolicy::Weak).build();
    let cache: ReclaimableCache<u8, String> = ReclaimableCache::new(config).unwrap();

    let held = cache.put(1_u8, "session".to_string());
    assert_eq!(cache.get(&1_u8).as_deref().map(String::as_str), Some("session"));

    drop(held);
    assert_eq!(cache.get(&1_u8), None);
}

/// Verifies configuration loaded from TOML drives the cache.
///
/// # Test Steps
/// 1. Parse a config with an age policy and metrics enabled
/// 2. Build a cache and exercise it
/// 3. Verify the statistics reflect the activity
#[test]
fn test_cache_from_toml_config() {
    let config: CacheConfig = toml::from_str(
        r#"
        initial_capacity = 2
        max_capacity = 2
        track_metrics = true

        [reclaim]
        kind = "age"
        after_ms = 60000
        "#,
    )
    .unwrap();
    let cache: ReclaimableCache<&str, i32> = ReclaimableCache::new(config).unwrap();

    cache.put("a", 1);
    cache.put("b", 2);
    cache.put("c", 3);
    let _ = cache.get(&"a");
    let _ = cache.get(&"c");

    let stats = cache.stats();
    assert_eq!(stats.inserts, 3);
    assert_eq!(stats.evictions, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    assert!((stats.fill_percentage() - 1.0).abs() < f64::EPSILON);
}

/// Verifies invalid configurations are rejected up front.
///
/// # Test Steps
/// 1. Build caches with zero capacity and an out-of-range load factor
/// 2. Verify both fail with configuration errors
#[test]
fn test_invalid_configuration_rejected() {
    assert!(matches!(
        ReclaimableCache::<u8, u8>::with_capacity(0),
        Err(CommonError::Config { .. })
    ));
    assert!(matches!(
        ReclaimableCache::<u8, u8>::with_load_factor(8, 16, 1.5),
        Err(CommonError::Config { .. })
    ));
}

/// Verifies concurrent writers and readers through shared clones.
///
/// # Test Steps
/// 1. Start 8 threads at a barrier, each writing and reading 100 keys
/// 2. Verify the cache never exceeds capacity and keeps recent writes
#[test]
fn test_concurrent_access() {
    let cache: ReclaimableCache<String, usize> = ReclaimableCache::with_capacity(256).unwrap();
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let cache = cache.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..100 {
                    let key = format!("{worker}-{i}");
                    cache.put(key.clone(), i);
                    let _ = cache.get(&key);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 256);
    assert!(cache.len() <= cache.capacity());
}

/// Verifies that racing `compute_if_absent` callers all observe a value.
///
/// Atomicity is not promised, so the supplier may run more than once; every
/// caller must still get a value and the cache ends with exactly one slot.
///
/// # Test Steps
/// 1. Race 4 threads on the same missing key
/// 2. Verify all results equal and one slot is stored
#[test]
fn test_compute_if_absent_race_is_benign() {
    let cache: ReclaimableCache<&'static str, u64> = ReclaimableCache::with_capacity(4).unwrap();
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = cache.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                *cache.compute_if_absent("answer", || 42)
            })
        })
        .collect();

    let results: Vec<u64> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();
    assert!(results.iter().all(|&value| value == 42));
    assert_eq!(cache.len(), 1);
}
