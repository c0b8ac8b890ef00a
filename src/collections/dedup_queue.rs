//! Fixed-capacity, newest-first queue that deduplicates by identity key.

use std::collections::VecDeque;

/// Extracts the identity key of an item
pub type KeyFn<T> = fn(&T) -> String;

/// Ordered sequence of at most `max_size` items, newest at the front.
///
/// No two items share an identity key: pushing an item whose key is already
/// present moves it to the front instead of duplicating it.
#[derive(Clone)]
pub struct BoundedDedupQueue<T> {
    items: VecDeque<T>,
    max_size: usize,
    key_fn: KeyFn<T>,
}

impl<T> BoundedDedupQueue<T> {
    /// Creates an empty queue. A `max_size` of zero is raised to one.
    pub fn new(max_size: usize, key_fn: KeyFn<T>) -> Self {
        let max_size = max_size.max(1);
        Self {
            items: VecDeque::with_capacity(max_size + 1),
            max_size,
            key_fn,
        }
    }

    /// Places `item` at the front, removing any item with the same key and
    /// dropping the oldest item if the queue overflows.
    pub fn push_front(&mut self, item: T) {
        let key = (self.key_fn)(&item);
        if let Some(pos) = self.position(&key) {
            self.items.remove(pos);
        }

        self.items.push_front(item);
        self.items.truncate(self.max_size);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Removes the item with the given key, if present
    pub fn remove_key(&mut self, key: &str) -> Option<T> {
        let pos = self.position(key)?;
        self.items.remove(pos)
    }

    /// Newest item, if any
    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|existing| (self.key_fn)(existing) == key)
    }
}

impl<T: Clone> BoundedDedupQueue<T> {
    /// Copy of the contents, newest first
    pub fn to_ordered_sequence(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl<T> std::fmt::Debug for BoundedDedupQueue<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedDedupQueue")
            .field("items", &self.items)
            .field("max_size", &self.max_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        label: &'static str,
    }

    fn item(id: u32, label: &'static str) -> Item {
        Item { id, label }
    }

    fn queue(max_size: usize) -> BoundedDedupQueue<Item> {
        BoundedDedupQueue::new(max_size, |i: &Item| i.id.to_string())
    }

    fn ids(queue: &BoundedDedupQueue<Item>) -> Vec<u32> {
        queue.iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_newest_first() {
        let mut q = queue(5);
        q.push_front(item(1, "a"));
        q.push_front(item(2, "b"));
        q.push_front(item(3, "c"));

        assert_eq!(ids(&q), vec![3, 2, 1]);
        assert_eq!(q.front().map(|i| i.id), Some(3));
    }

    #[test]
    fn test_repush_moves_to_front_without_growing() {
        let mut q = queue(5);
        q.push_front(item(1, "a"));
        q.push_front(item(2, "b"));
        q.push_front(item(3, "c"));

        q.push_front(item(1, "a"));
        assert_eq!(q.len(), 3);
        assert_eq!(ids(&q), vec![1, 3, 2]);
    }

    #[test]
    fn test_repush_keeps_latest_value() {
        let mut q = queue(5);
        q.push_front(item(1, "old"));
        q.push_front(item(1, "new"));

        assert_eq!(q.to_ordered_sequence(), vec![item(1, "new")]);
    }

    #[test]
    fn test_overflow_drops_oldest() {
        let mut q = queue(3);
        for id in 1..=4 {
            q.push_front(item(id, "x"));
        }

        assert_eq!(q.len(), 3);
        assert_eq!(ids(&q), vec![4, 3, 2]);
        assert!(!q.contains_key("1"));
    }

    #[test]
    fn test_repush_at_capacity_drops_nothing() {
        let mut q = queue(3);
        for id in 1..=3 {
            q.push_front(item(id, "x"));
        }
        q.push_front(item(1, "x"));

        assert_eq!(ids(&q), vec![1, 3, 2]);
    }

    #[test]
    fn test_sequence_has_no_duplicate_keys() {
        let mut q = queue(4);
        for id in [1, 2, 1, 3, 2, 2, 4, 1] {
            q.push_front(item(id, "x"));
        }

        let mut seen = ids(&q);
        assert_eq!(seen, vec![1, 4, 2, 3]);
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), q.len());
    }

    #[test]
    fn test_remove_key_and_clear() {
        let mut q = queue(3);
        q.push_front(item(1, "a"));
        q.push_front(item(2, "b"));

        assert_eq!(q.remove_key("1"), Some(item(1, "a")));
        assert_eq!(q.remove_key("1"), None);

        q.clear();
        assert!(q.is_empty());
    }

    #[test]
    fn test_zero_max_size_is_raised_to_one() {
        let mut q = queue(0);
        assert_eq!(q.max_size(), 1);
        q.push_front(item(1, "a"));
        q.push_front(item(2, "b"));
        assert_eq!(ids(&q), vec![2]);
    }
}
