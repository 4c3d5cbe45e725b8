//! Insertion-ordered containers with FIFO eviction at a fixed capacity.

use std::{
    borrow::Borrow,
    collections::{HashSet, VecDeque},
    hash::Hash,
};

/// Ordered sequence that drops its oldest items once `capacity` is exceeded.
#[derive(Debug, Clone)]
pub struct BoundedSeq<T> {
    cap: usize,
    items: VecDeque<T>,
}

impl<T> BoundedSeq<T> {
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            cap,
            items: VecDeque::with_capacity(cap.saturating_add(1)),
        }
    }

    /// Appends `item` and returns whatever fell off the front, oldest first.
    pub fn push_back(&mut self, item: T) -> Vec<T> {
        self.items.push_back(item);
        let mut evicted = Vec::new();
        while self.items.len() > self.cap {
            let Some(removed) = self.items.pop_front() else {
                break;
            };
            evicted.push(removed);
        }
        evicted
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

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Set with insertion-ordered eviction. Re-inserting a present value does not
/// refresh its position.
#[derive(Debug, Clone)]
pub struct BoundedFifoSet<T> {
    order: BoundedSeq<T>,
    index: HashSet<T>,
}

impl<T> BoundedFifoSet<T>
where
    T: Eq + Hash + Clone,
{
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            order: BoundedSeq::with_capacity(cap),
            index: HashSet::new(),
        }
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.index.contains(value)
    }

    /// Returns `false` when `value` was already present.
    pub fn insert(&mut self, value: T) -> bool {
        if self.index.contains(&value) {
            return false;
        }
        self.index.insert(value.clone());
        for removed in self.order.push_back(value) {
            self.index.remove(&removed);
        }
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.order.capacity()
    }
}
