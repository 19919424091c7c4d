//! Reclaimable handles: the indirection between a cache slot and its value
//!
//! A handle may become empty independently of the LRU order. Once cleared it
//! stays cleared; a new write replaces the whole handle.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Instant;

use super::config::ReclaimPolicy;

enum Referent<V: ?Sized> {
    Strong(Arc<V>),
    Weak(Weak<V>),
    Cleared,
}

/// Wraps a cached value so it can be cleared without removing its slot.
pub struct ReclaimableHandle<V: ?Sized> {
    referent: Referent<V>,
    written_at: Instant,
    last_read: Instant,
}

impl<V: ?Sized> ReclaimableHandle<V> {
    /// Wrap `value` according to `policy`. Under [`ReclaimPolicy::Weak`] the
    /// handle does not keep the value alive.
    pub fn new(value: &Arc<V>, policy: ReclaimPolicy, now: Instant) -> Self {
        let referent = match policy {
            ReclaimPolicy::Weak => Referent::Weak(Arc::downgrade(value)),
            _ => Referent::Strong(Arc::clone(value)),
        };
        Self { referent, written_at: now, last_read: now }
    }

    /// Returns `true` once the handle has been cleared.
    ///
    /// A handle whose reclaim deadline has passed but which has not been read
    /// since is not yet marked; use [`ReclaimableHandle::is_live`] for that.
    pub fn is_cleared(&self) -> bool {
        matches!(self.referent, Referent::Cleared)
    }

    /// Returns `true` if a read at `now` would produce the value.
    pub fn is_live(&self, policy: ReclaimPolicy, now: Instant) -> bool {
        self.peek(policy, now).is_some()
    }

    /// Returns the value if still live, without recording a read.
    pub fn peek(&self, policy: ReclaimPolicy, now: Instant) -> Option<Arc<V>> {
        if self.deadline_passed(policy, now) {
            return None;
        }
        match &self.referent {
            Referent::Strong(value) => Some(Arc::clone(value)),
            Referent::Weak(value) => value.upgrade(),
            Referent::Cleared => None,
        }
    }

    /// Returns the value if still live and records the read; otherwise clears
    /// the handle and returns `None`.
    pub fn read(&mut self, policy: ReclaimPolicy, now: Instant) -> Option<Arc<V>> {
        match self.peek(policy, now) {
            Some(value) => {
                self.last_read = now;
                Some(value)
            }
            None => {
                self.clear();
                None
            }
        }
    }

    /// Drop the reference, simulating reclamation under memory pressure.
    pub fn clear(&mut self) {
        self.referent = Referent::Cleared;
    }

    fn deadline_passed(&self, policy: ReclaimPolicy, now: Instant) -> bool {
        match policy {
            ReclaimPolicy::Idle(after) => now.duration_since(self.last_read) >= after,
            ReclaimPolicy::Age(after) => now.duration_since(self.written_at) >= after,
            ReclaimPolicy::Never | ReclaimPolicy::Weak => false,
        }
    }
}

impl<V: ?Sized> fmt::Debug for ReclaimableHandle<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.referent {
            Referent::Strong(_) => "strong",
            Referent::Weak(_) => "weak",
            Referent::Cleared => "cleared",
        };
        f.debug_struct("ReclaimableHandle")
            .field("state", &state)
            .field("written_at", &self.written_at)
            .field("last_read", &self.last_read)
            .finish()
    }
}
