use crate::error::QueueError;
use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Binary min-heap whose entries are addressed by a unique key.
///
/// Alongside the heap array it keeps a map from key to heap slot, so
/// membership and priority lookups are O(1) and re-prioritising a queued
/// key is O(log n). Keys with equal priorities come out in whatever order
/// the heap happens to produce.
#[derive(Debug, Clone)]
pub struct IndexedPriorityQueue<K, P> {
    heap: Vec<(K, P)>,
    index: FxHashMap<K, usize>,
}

impl<K, P> Default for IndexedPriorityQueue<K, P>
where
    K: Hash + Eq + Clone,
    P: PartialOrd,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, P> IndexedPriorityQueue<K, P>
where
    K: Hash + Eq + Clone,
    P: PartialOrd,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        IndexedPriorityQueue {
            heap: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Number of queued keys.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Current priority of `key`, if it is queued.
    pub fn priority(&self, key: &K) -> Option<&P> {
        self.index.get(key).map(|&slot| &self.heap[slot].1)
    }

    /// Inserts `key`, or overwrites its priority if it is already queued.
    /// The new priority may be higher or lower than the old one.
    pub fn enqueue(&mut self, key: K, priority: P) {
        if let Some(&slot) = self.index.get(&key) {
            self.heap[slot].1 = priority;
            let slot = self.sift_up(slot);
            self.sift_down(slot);
        } else {
            let slot = self.heap.len();
            self.index.insert(key.clone(), slot);
            self.heap.push((key, priority));
            self.sift_up(slot);
        }
    }

    /// Removes and returns the key with the lowest priority.
    pub fn dequeue(&mut self) -> Result<K, QueueError> {
        if self.heap.is_empty() {
            return Err(QueueError::Empty);
        }

        let (key, _) = self.heap.swap_remove(0);
        self.index.remove(&key);

        if let Some((moved, _)) = self.heap.first() {
            self.index.insert(moved.clone(), 0);
            self.sift_down(0);
        }

        Ok(key)
    }

    /// The key with the lowest priority, without removing it.
    pub fn peek(&self) -> Result<&K, QueueError> {
        self.heap.first().map(|(key, _)| key).ok_or(QueueError::Empty)
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.index.clear();
    }

    fn less(&self, a: usize, b: usize) -> bool {
        self.heap[a].1 < self.heap[b].1
    }

    fn sift_up(&mut self, mut slot: usize) -> usize {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.less(slot, parent) {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
        slot
    }

    fn sift_down(&mut self, mut slot: usize) -> usize {
        let len = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;

            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == slot {
                return slot;
            }

            self.swap(slot, smallest);
            slot = smallest;
        }
    }

    // Keeps the index map pointing at the slots after the exchange.
    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        if let Some(slot) = self.index.get_mut(&self.heap[a].0) {
            *slot = a;
        }
        if let Some(slot) = self.index.get_mut(&self.heap[b].0) {
            *slot = b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    impl<K, P> IndexedPriorityQueue<K, P>
    where
        K: Hash + Eq + Clone + std::fmt::Debug,
        P: PartialOrd + std::fmt::Debug,
    {
        fn assert_invariants(&self) {
            for i in 1..self.heap.len() {
                let parent = (i - 1) / 2;
                assert!(
                    self.heap[i].1 >= self.heap[parent].1,
                    "slot {} ({:?}) is below its parent {} ({:?})",
                    i,
                    self.heap[i].1,
                    parent,
                    self.heap[parent].1
                );
            }
            assert_eq!(self.index.len(), self.heap.len());
            for (key, &slot) in &self.index {
                assert_eq!(&self.heap[slot].0, key);
            }
        }
    }

    #[test]
    fn dequeue_on_empty_queue_fails() {
        let mut queue: IndexedPriorityQueue<u32, f32> = IndexedPriorityQueue::new();
        assert_eq!(queue.dequeue(), Err(QueueError::Empty));
        assert_eq!(queue.peek(), Err(QueueError::Empty));
    }

    #[test]
    fn extracts_in_priority_order() {
        let mut queue = IndexedPriorityQueue::new();
        for (key, priority) in [('a', 5.0), ('b', 1.0), ('c', 4.0), ('d', 2.0), ('e', 3.0)] {
            queue.enqueue(key, priority);
            queue.assert_invariants();
        }

        assert_eq!(queue.peek(), Ok(&'b'));
        let mut order = Vec::new();
        while !queue.is_empty() {
            order.push(queue.dequeue().unwrap());
            queue.assert_invariants();
        }
        assert_eq!(order, vec!['b', 'd', 'e', 'c', 'a']);
    }

    #[test]
    fn enqueue_existing_key_updates_priority() {
        let mut queue = IndexedPriorityQueue::new();
        queue.enqueue("near", 1.0);
        queue.enqueue("mid", 2.0);
        queue.enqueue("far", 3.0);

        queue.enqueue("far", 0.5);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.priority(&"far"), Some(&0.5));
        queue.assert_invariants();

        queue.enqueue("near", 10.0);
        assert_eq!(queue.len(), 3);
        queue.assert_invariants();

        assert_eq!(queue.dequeue(), Ok("far"));
        assert_eq!(queue.dequeue(), Ok("mid"));
        assert_eq!(queue.dequeue(), Ok("near"));
        assert!(queue.is_empty());
    }

    #[test]
    fn lookups_follow_membership() {
        let mut queue = IndexedPriorityQueue::new();
        queue.enqueue(7, 1.5);
        assert!(queue.contains(&7));
        assert_eq!(queue.priority(&8), None);

        queue.dequeue().unwrap();
        assert!(!queue.contains(&7));
        assert_eq!(queue.priority(&7), None);
    }

    #[test]
    fn clear_makes_queue_reusable() {
        let mut queue = IndexedPriorityQueue::with_capacity(8);
        for i in 0..8 {
            queue.enqueue(i, i as f32);
        }
        queue.clear();
        assert_eq!(queue.len(), 0);
        assert!(!queue.contains(&3));

        queue.enqueue(3, 9.0);
        queue.enqueue(4, 1.0);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dequeue(), Ok(4));
        assert_eq!(queue.dequeue(), Ok(3));
    }

    #[test]
    fn random_operations_keep_heap_and_index_consistent() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut queue = IndexedPriorityQueue::new();

        for _ in 0..2_000 {
            match rng.gen_range(0..10) {
                0..=5 => {
                    let key = rng.gen_range(0..64u32);
                    let priority = rng.gen_range(0.0f32..100.0);
                    queue.enqueue(key, priority);
                }
                6..=8 => {
                    let before = queue.len();
                    let lowest = queue.peek().ok().and_then(|k| queue.priority(k)).copied();
                    match queue.dequeue() {
                        Ok(key) => {
                            assert_eq!(queue.len(), before - 1);
                            assert!(!queue.contains(&key));
                            if let Some(rest) = queue.peek().ok().and_then(|k| queue.priority(k)) {
                                assert!(*rest >= lowest.unwrap());
                            }
                        }
                        Err(QueueError::Empty) => assert_eq!(before, 0),
                    }
                }
                _ => {
                    if rng.gen_bool(0.1) {
                        queue.clear();
                    }
                }
            }
            queue.assert_invariants();
        }
    }
}
