use std::collections::HashSet;
use std::sync::Mutex;

/// Short-term in-batch dedup (§4.3): drops duplicates by content hash before
/// they ever reach storage, independent of the store's own `ON CONFLICT`
/// dedup on URL. Bounded so a long-running pool doesn't grow unboundedly;
/// once `capacity` is exceeded the set is cleared and starts fresh, trading
/// a small dedup window for constant memory.
pub struct BatchDedup {
    seen: Mutex<HashSet<String>>,
    capacity: usize,
}

impl BatchDedup {
    pub fn new(capacity: usize) -> Self {
        Self { seen: Mutex::new(HashSet::new()), capacity }
    }

    /// Returns `true` if `hash` had not been seen before (i.e. it should be
    /// kept), inserting it as a side effect.
    pub fn insert_if_new(&self, hash: &str) -> bool {
        let mut seen = self.seen.lock().expect("dedup mutex poisoned");
        if seen.len() >= self.capacity {
            seen.clear();
        }
        seen.insert(hash.to_string())
    }
}

impl Default for BatchDedup {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_insert_of_same_hash_is_rejected() {
        let dedup = BatchDedup::new(100);
        assert!(dedup.insert_if_new("abc"));
        assert!(!dedup.insert_if_new("abc"));
    }

    #[test]
    fn capacity_overflow_resets_the_set() {
        let dedup = BatchDedup::new(2);
        assert!(dedup.insert_if_new("a"));
        assert!(dedup.insert_if_new("b"));
        // third insert triggers a reset, so "a" is accepted again afterward
        assert!(dedup.insert_if_new("c"));
        assert!(dedup.insert_if_new("a"));
    }
}
