pub use rapier2d_f64::data::arena::Index;
use std::collections::HashMap;

pub trait HasIndex {
    fn index(self) -> Index;
}

/// Set of handles that iterates in insertion order.
///
/// Targeting breaks distance ties by discovery order, so removal keeps the
/// relative order of the remaining handles.
pub struct IndexSet<T: HasIndex> {
    indices: Vec<T>,
    positions: HashMap<T, usize>,
}

impl<T: HasIndex + Eq + std::hash::Hash + Copy> IndexSet<T> {
    pub fn new() -> Self {
        IndexSet::<T> {
            indices: Vec::new(),
            positions: HashMap::new(),
        }
    }

    pub fn insert(self: &mut IndexSet<T>, handle: T) {
        if self.positions.contains_key(&handle) {
            return;
        }
        self.indices.push(handle);
        self.positions.insert(handle, self.indices.len() - 1);
    }

    pub fn remove(self: &mut IndexSet<T>, handle: T) -> bool {
        let pos = match self.positions.remove(&handle) {
            Some(pos) => pos,
            None => return false,
        };
        self.indices.remove(pos);
        for (i, h) in self.indices.iter().enumerate().skip(pos) {
            self.positions.insert(*h, i);
        }
        true
    }

    /// Keeps the handles for which `f` returns true and returns the rest.
    /// Rebuilds positions once, unlike repeated calls to `remove`.
    pub fn retain<F: FnMut(T) -> bool>(&mut self, mut f: F) -> Vec<T> {
        let mut removed = vec![];
        self.indices.retain(|&handle| {
            let keep = f(handle);
            if !keep {
                removed.push(handle);
            }
            keep
        });
        if !removed.is_empty() {
            self.positions.clear();
            for (i, &handle) in self.indices.iter().enumerate() {
                self.positions.insert(handle, i);
            }
        }
        removed
    }

    pub fn contains(self: &IndexSet<T>, handle: T) -> bool {
        self.positions.contains_key(&handle)
    }

    pub fn iter(self: &IndexSet<T>) -> std::slice::Iter<T> {
        self.indices.iter()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl<T: HasIndex + Eq + std::hash::Hash + Copy> Default for IndexSet<T> {
    fn default() -> IndexSet<T> {
        IndexSet::new()
    }
}

#[cfg(test)]
mod test {
    use super::{HasIndex, Index, IndexSet};
    use test_log::test;

    fn list<T: HasIndex + Eq + std::hash::Hash + Copy>(index_set: &IndexSet<T>) -> Vec<T> {
        index_set.iter().copied().collect::<Vec<T>>()
    }

    #[derive(Hash, PartialEq, Eq, Copy, Clone, Debug)]
    pub struct TestHandle(pub Index);

    impl HasIndex for TestHandle {
        fn index(self) -> Index {
            self.0
        }
    }

    #[test]
    fn test_index_set() {
        let mut index_set: IndexSet<TestHandle> = IndexSet::new();
        let handle0 = TestHandle(Index::from_raw_parts(2, 1));
        let handle1 = TestHandle(Index::from_raw_parts(1, 20));
        let handle2 = TestHandle(Index::from_raw_parts(5, 0));

        assert_eq!(list(&index_set), vec![]);

        index_set.insert(handle0);
        index_set.insert(handle1);
        index_set.insert(handle2);
        assert_eq!(list(&index_set), vec![handle0, handle1, handle2]);

        assert!(index_set.remove(handle0));
        assert_eq!(list(&index_set), vec![handle1, handle2]);
        assert!(!index_set.remove(handle0));

        index_set.insert(handle0);
        assert_eq!(list(&index_set), vec![handle1, handle2, handle0]);

        assert!(index_set.remove(handle2));
        assert_eq!(list(&index_set), vec![handle1, handle0]);
        assert!(index_set.contains(handle0));
        assert!(!index_set.contains(handle2));
        assert_eq!(index_set.len(), 2);
    }

    #[test]
    fn test_retain() {
        let mut index_set: IndexSet<TestHandle> = IndexSet::new();
        let handles: Vec<TestHandle> = (0..5)
            .map(|i| TestHandle(Index::from_raw_parts(i, 0)))
            .collect();
        for &handle in handles.iter() {
            index_set.insert(handle);
        }

        let removed = index_set.retain(|h| h.0.into_raw_parts().0 % 2 == 0);
        assert_eq!(removed, vec![handles[1], handles[3]]);
        assert_eq!(list(&index_set), vec![handles[0], handles[2], handles[4]]);
        assert!(!index_set.contains(handles[1]));

        // Positions stay consistent for later removals.
        assert!(index_set.remove(handles[2]));
        assert_eq!(list(&index_set), vec![handles[0], handles[4]]);
        assert!(index_set.contains(handles[4]));
    }
}
