//! Concurrent frontier buffer for level-synchronous BFS

use crate::common::NodeId;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One BFS distance layer: a fixed-capacity, append-only list of vertices.
///
/// Appends go through `&self` and may race freely: each appender reserves a
/// slot with a fetch-add on the length and then owns that slot. Reads happen
/// only after the parallel step that filled the buffer has joined.
///
/// Capacity is the vertex count, since a vertex enters at most one frontier
/// per run.
pub struct Frontier {
    slots: Box<[AtomicUsize]>,
    len: AtomicUsize,
}

impl Frontier {
    /// Allocate a frontier with room for `capacity` vertices.
    pub fn new(capacity: usize) -> Self {
        Frontier {
            slots: (0..capacity).map(|_| AtomicUsize::new(0)).collect(),
            len: AtomicUsize::new(0),
        }
    }

    /// A frontier holding only `vertex`.
    pub fn singleton(capacity: usize, vertex: NodeId) -> Self {
        let frontier = Self::new(capacity);
        frontier.push(vertex);
        frontier
    }

    /// Append a vertex. Safe to call from many workers at once.
    ///
    /// # Panics
    ///
    /// Panics if the frontier is already full.
    #[inline]
    pub fn push(&self, vertex: NodeId) {
        let slot = self.len.fetch_add(1, Ordering::Relaxed);
        assert!(
            slot < self.slots.len(),
            "frontier overflow: capacity {}",
            self.slots.len()
        );
        self.slots[slot].store(vertex, Ordering::Relaxed);
    }

    /// Reset to empty. Old slot contents are left in place.
    #[inline]
    pub fn clear(&mut self) {
        *self.len.get_mut() = 0;
    }

    /// Number of occupied slots
    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed).min(self.slots.len())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn occupied(&self) -> &[AtomicUsize] {
        &self.slots[..self.len()]
    }

    /// Occupied vertices, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.occupied().iter().map(|slot| slot.load(Ordering::Relaxed))
    }

    /// Occupied vertices as an indexed parallel iterator.
    pub fn par_iter(&self) -> impl IndexedParallelIterator<Item = NodeId> + '_ {
        self.occupied()
            .par_iter()
            .map(|slot| slot.load(Ordering::Relaxed))
    }
}

impl std::fmt::Debug for Frontier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frontier")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_clear() {
        let mut frontier = Frontier::new(4);
        assert!(frontier.is_empty());
        frontier.push(3);
        frontier.push(1);
        assert_eq!(frontier.len(), 2);
        assert_eq!(frontier.iter().collect::<Vec<_>>(), vec![3, 1]);

        frontier.clear();
        assert!(frontier.is_empty());
        assert_eq!(frontier.capacity(), 4);
        assert_eq!(frontier.iter().count(), 0);
    }

    #[test]
    fn test_singleton() {
        let frontier = Frontier::singleton(8, 5);
        assert_eq!(frontier.iter().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn test_concurrent_push_keeps_every_vertex() {
        let n = 10_000;
        let frontier = Frontier::new(n);
        (0..n).into_par_iter().for_each(|v| frontier.push(v));

        assert_eq!(frontier.len(), n);
        let mut seen: Vec<NodeId> = frontier.par_iter().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..n).collect::<Vec<_>>());
    }

    #[test]
    #[should_panic(expected = "frontier overflow")]
    fn test_overflow_panics() {
        let frontier = Frontier::new(1);
        frontier.push(0);
        frontier.push(0);
    }
}
