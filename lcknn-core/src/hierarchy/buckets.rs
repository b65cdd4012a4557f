//! Degree buckets for the minimum-degree elimination heuristic.

use crate::graph::VertexId;

/// Vertices grouped by current degree with O(1) relocation.
///
/// Removal swaps the last member of a bucket into the vacated slot, so each
/// bucket behaves as a stack and ties are broken last-in first-out.
pub(super) struct DegreeBuckets {
    buckets: Vec<Vec<VertexId>>,
    position: Vec<(usize, usize)>,
    min_degree: usize,
}

impl DegreeBuckets {
    pub(super) fn new(vertex_count: usize) -> Self {
        Self {
            buckets: Vec::new(),
            position: vec![(0, 0); vertex_count + 1],
            min_degree: 0,
        }
    }

    pub(super) fn insert(&mut self, vertex: VertexId, degree: usize) {
        if degree >= self.buckets.len() {
            self.buckets.resize_with(degree + 1, Vec::new);
        }
        self.position[vertex] = (degree, self.buckets[degree].len());
        self.buckets[degree].push(vertex);
        self.min_degree = self.min_degree.min(degree);
    }

    pub(super) fn degree(&self, vertex: VertexId) -> usize {
        self.position[vertex].0
    }

    /// Removes and returns a vertex of minimum degree with that degree.
    pub(super) fn pop_min(&mut self) -> Option<(VertexId, usize)> {
        while self
            .buckets
            .get(self.min_degree)
            .is_some_and(Vec::is_empty)
        {
            self.min_degree += 1;
        }
        let degree = self.min_degree;
        self.buckets
            .get_mut(degree)?
            .pop()
            .map(|vertex| (vertex, degree))
    }

    pub(super) fn relocate(&mut self, vertex: VertexId, degree: usize) {
        let (old_degree, slot) = self.position[vertex];
        let bucket = &mut self.buckets[old_degree];
        bucket.swap_remove(slot);
        if let Some(&moved) = bucket.get(slot) {
            self.position[moved].1 = slot;
        }
        self.insert(vertex, degree);
    }
}
