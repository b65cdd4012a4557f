//! Membership set of points of interest.

use crate::graph::VertexId;

/// The set of vertices designated as points of interest.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PoiSet {
    flags: Vec<bool>,
    count: usize,
}

impl PoiSet {
    /// Creates an empty set over vertices `1..=vertex_count`.
    #[must_use]
    pub fn new(vertex_count: usize) -> Self {
        Self {
            flags: vec![false; vertex_count + 1],
            count: 0,
        }
    }

    /// Returns `true` when `vertex` is a point of interest.
    #[must_use]
    pub fn contains(&self, vertex: VertexId) -> bool {
        self.flags.get(vertex).copied().unwrap_or(false)
    }

    /// Returns the number of points of interest.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` when no vertex is a point of interest.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterates over the points of interest in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter_map(|(vertex, &flag)| flag.then_some(vertex))
    }

    /// Returns `Some(vertex)` when `vertex` is a point of interest.
    pub(crate) fn as_option(&self, vertex: VertexId) -> Option<VertexId> {
        self.contains(vertex).then_some(vertex)
    }

    /// Adds `vertex`, returning `false` when it was already present or lies
    /// outside the set's range.
    pub fn insert(&mut self, vertex: VertexId) -> bool {
        match self.flags.get_mut(vertex) {
            Some(flag) if !*flag => {
                *flag = true;
                self.count += 1;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn remove(&mut self, vertex: VertexId) -> bool {
        match self.flags.get_mut(vertex) {
            Some(flag) if *flag => {
                *flag = false;
                self.count -= 1;
                true
            }
            _ => false,
        }
    }
}
