//! Set of items compared by identity key rather than by value.

use std::collections::HashSet;
use std::marker::PhantomData;

use super::dedup_queue::KeyFn;

/// Stores only identity keys; two different values with the same key are
/// the same member. Values are resolved back by whoever owns them.
#[derive(Clone)]
pub struct IdentitySet<T> {
    keys: HashSet<String>,
    key_fn: KeyFn<T>,
    _marker: PhantomData<fn(&T)>,
}

impl<T> IdentitySet<T> {
    pub fn new(key_fn: KeyFn<T>) -> Self {
        Self {
            keys: HashSet::new(),
            key_fn,
            _marker: PhantomData,
        }
    }

    /// Adds the item's key. Returns true if it was not already a member.
    pub fn add(&mut self, item: &T) -> bool {
        self.keys.insert((self.key_fn)(item))
    }

    /// Removes the item's key. Returns true if it was a member.
    pub fn remove(&mut self, item: &T) -> bool {
        self.keys.remove(&(self.key_fn)(item))
    }

    pub fn contains(&self, item: &T) -> bool {
        self.keys.contains(&(self.key_fn)(item))
    }

    /// Flips membership and returns the new state (true = member)
    pub fn toggle(&mut self, item: &T) -> bool {
        let key = (self.key_fn)(item);
        if self.keys.remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    /// Inserts a raw key, as read back from persisted state
    pub fn insert_key(&mut self, key: impl Into<String>) -> bool {
        self.keys.insert(key.into())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Member keys in sorted order
    pub fn to_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.keys.iter().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

impl<T> std::fmt::Debug for IdentitySet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.keys.iter()).finish()
    }
}
