//! A bounded map ordered by access recency.
//!
//! # Complexity
//! - `new`, `capacity`, `len`, `is_empty`: `O(1)`.
//! - `put`, `push`, `get`, `get_mut`, `peek`, `peek_mut`, `contains_key`, `remove`:
//!   `O(1)` amortized.
//! - `retain`, `clear`, `iter`: `O(n)`.
//!
//! # Thread Safety
//! - `LruMap` performs no internal synchronization. Reads mutate the recency
//!   order, so even `get` needs `&mut self`; wrap the map in a lock to share
//!   it across threads.
//!
//! # Eviction Policy
//! - A successful `put`, `push`, `get`, or `get_mut` promotes the entry to the
//!   most recently used (MRU) position. `peek` does not.
//! - When an insert takes the map above `max_capacity`, exactly one entry is
//!   evicted: the least recently used one other than the key just inserted.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;

use crate::error::{CommonError, CommonResult};

type NodeSlot<K, V> = Option<Node<K, V>>;

/// Fixed-capacity key/value map with least-recently-used eviction.
///
/// Entries live in an index-linked doubly linked list stored in a `Vec`, so
/// promotion and eviction never allocate.
///
/// # Examples
///
/// ```
/// use corekit_common::collections::LruMap;
///
/// let mut map = LruMap::new(2, 2).unwrap();
/// map.put("a", 1);
/// map.put("b", 2);
/// assert_eq!(map.get(&"a"), Some(&1));
/// map.put("c", 3); // Evicts "b"
/// assert!(map.get(&"b").is_none());
/// assert_eq!(map.len(), 2);
/// ```
pub struct LruMap<K, V>
where
    K: Eq + Hash + Clone,
{
    initial_capacity: usize,
    max_capacity: usize,
    map: HashMap<K, usize>,
    nodes: Vec<NodeSlot<K, V>>,
    free_list: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<K, V> LruMap<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a map that preallocates `initial_capacity` slots and never holds
    /// more than `max_capacity` entries.
    ///
    /// `max_capacity` is raised to `initial_capacity` when smaller.
    ///
    /// # Errors
    /// Returns [`CommonError::Config`] when either capacity is zero.
    pub fn new(initial_capacity: usize, max_capacity: usize) -> CommonResult<Self> {
        if initial_capacity == 0 {
            return Err(CommonError::config_field("initial_capacity", "must be > 0"));
        }
        if max_capacity == 0 {
            return Err(CommonError::config_field("max_capacity", "must be > 0"));
        }
        Ok(Self::from_bounds(initial_capacity, max_capacity))
    }

    /// Builds a map from capacities the caller has already validated.
    pub(crate) fn from_bounds(initial_capacity: usize, max_capacity: usize) -> Self {
        let max_capacity = max_capacity.max(initial_capacity);

        Self {
            initial_capacity,
            max_capacity,
            map: HashMap::with_capacity(initial_capacity),
            nodes: Vec::with_capacity(initial_capacity),
            free_list: Vec::new(),
            head: None,
            tail: None,
        }
    }

    /// Creates a map whose initial and maximum capacity are both `capacity`.
    ///
    /// # Errors
    /// Returns [`CommonError::Config`] when `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> CommonResult<Self> {
        Self::new(capacity, capacity)
    }

    /// Returns the maximum number of entries held without evicting.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_capacity
    }

    /// Returns the number of slots preallocated at construction.
    #[must_use]
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Returns the number of entries currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` when the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Reserves hash table room for at least `additional` more keys.
    pub fn reserve(&mut self, additional: usize) {
        self.map.reserve(additional);
    }

    /// Removes all entries, keeping the configured capacities.
    pub fn clear(&mut self) {
        self.map.clear();
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
    }

    /// Inserts or updates a key-value pair, returning the previous value for
    /// `key` when present.
    ///
    /// Any entry evicted to make room is dropped; use [`LruMap::push`] to
    /// observe it.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&index) = self.map.get(&key) {
            let previous = self.replace_value(index, value);
            self.promote(index);
            return previous;
        }
        let _ = self.insert_new(key, value);
        None
    }

    /// Inserts or updates a key-value pair and returns whichever entry left the
    /// map as a result.
    ///
    /// - Updating an existing key returns that key with its old value.
    /// - Inserting past `max_capacity` returns the evicted LRU entry.
    /// - Otherwise returns `None`.
    pub fn push(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&index) = self.map.get(&key) {
            let previous = self.replace_value(index, value);
            self.promote(index);
            return previous.map(|old| (key, old));
        }
        self.insert_new(key, value)
    }

    /// Retrieves a value by key, promoting the entry to MRU when found.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let &index = self.map.get(key)?;
        self.promote(index);
        self.nodes.get(index).and_then(Option::as_ref).map(|node| &node.value)
    }

    /// Retrieves a mutable value reference by key, promoting the entry to MRU
    /// when found.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let &index = self.map.get(key)?;
        self.promote(index);
        self.nodes.get_mut(index).and_then(Option::as_mut).map(|node| &mut node.value)
    }

    /// Reads a value by key without altering the recency order.
    #[must_use]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let &index = self.map.get(key)?;
        self.nodes.get(index).and_then(Option::as_ref).map(|node| &node.value)
    }

    /// Mutable counterpart of [`LruMap::peek`].
    pub fn peek_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let &index = self.map.get(key)?;
        self.nodes.get_mut(index).and_then(Option::as_mut).map(|node| &mut node.value)
    }

    /// Returns `true` when `key` is present. Does not alter the recency order.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Removes and returns the value associated with `key`, if present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.map.remove(key)?;
        self.release(index).map(|node| node.value)
    }

    /// Keeps only the entries for which `keep` returns `true`, preserving the
    /// relative recency order of survivors. Returns the number removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        let doomed: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Some(node) if !keep(&node.key, &node.value) => Some(index),
                _ => None,
            })
            .collect();

        for &index in &doomed {
            if let Some(node) = self.release(index) {
                self.map.remove(&node.key);
            }
        }
        doomed.len()
    }

    /// Returns an iterator that yields entries from MRU to LRU.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { map: self, current: self.head, remaining: self.len() }
    }

    fn insert_new(&mut self, key: K, value: V) -> Option<(K, V)> {
        let index = self.allocate_slot(key.clone(), value);
        self.attach_front(index);
        self.map.insert(key, index);

        if self.map.len() > self.max_capacity {
            return self.evict_lru();
        }
        None
    }

    fn replace_value(&mut self, index: usize, value: V) -> Option<V> {
        self.nodes
            .get_mut(index)
            .and_then(Option::as_mut)
            .map(|node| std::mem::replace(&mut node.value, value))
    }

    fn allocate_slot(&mut self, key: K, value: V) -> usize {
        if let Some(index) = self.free_list.pop() {
            self.nodes[index] = Some(Node::new(key, value));
            index
        } else {
            self.nodes.push(Some(Node::new(key, value)));
            self.nodes.len() - 1
        }
    }

    /// Unlinks the slot at `index`, frees it, and returns its node. The caller
    /// is responsible for the hash index.
    fn release(&mut self, index: usize) -> Option<Node<K, V>> {
        self.detach(index);
        let node = self.nodes.get_mut(index).and_then(Option::take)?;
        self.free_list.push(index);
        Some(node)
    }

    fn promote(&mut self, index: usize) {
        if self.head == Some(index) {
            return;
        }
        self.detach(index);
        self.attach_front(index);
    }

    fn evict_lru(&mut self) -> Option<(K, V)> {
        let index = self.tail?;
        let node = self.release(index)?;
        self.map.remove(&node.key);

        #[cfg(feature = "observability")]
        tracing::trace!(len = self.map.len(), capacity = self.max_capacity, "evicted LRU entry");

        Some((node.key, node.value))
    }

    fn detach(&mut self, index: usize) {
        let (prev, next) = match self.nodes.get(index).and_then(Option::as_ref) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_index) => {
                if let Some(prev_node) = self.nodes.get_mut(prev_index).and_then(Option::as_mut) {
                    prev_node.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_index) => {
                if let Some(next_node) = self.nodes.get_mut(next_index).and_then(Option::as_mut) {
                    next_node.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }

        if let Some(node) = self.nodes.get_mut(index).and_then(Option::as_mut) {
            node.prev = None;
            node.next = None;
        }
    }

    fn attach_front(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index).and_then(Option::as_mut) {
            node.prev = None;
            node.next = self.head;
        }

        if let Some(head_index) = self.head {
            if let Some(head_node) = self.nodes.get_mut(head_index).and_then(Option::as_mut) {
                head_node.prev = Some(index);
            }
        } else {
            self.tail = Some(index);
        }

        self.head = Some(index);
    }
}

impl<K, V> fmt::Debug for LruMap<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruMap")
            .field("len", &self.len())
            .field("initial_capacity", &self.initial_capacity)
            .field("max_capacity", &self.max_capacity)
            .finish()
    }
}

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Self {
        Self { key, value, prev: None, next: None }
    }
}

/// Iterator over map entries from MRU to LRU.
pub struct Iter<'a, K, V>
where
    K: Eq + Hash + Clone,
{
    map: &'a LruMap<K, V>,
    current: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: Eq + Hash + Clone,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.current?;
        let node = self.map.nodes.get(index).and_then(Option::as_ref)?;
        self.current = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> where K: Eq + Hash + Clone {}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> where K: Eq + Hash + Clone {}
