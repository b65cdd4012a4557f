//! Bijection between vertices and their elimination ranks.

use crate::{
    error::{IndexError, Result},
    graph::VertexId,
};

/// A total order over the vertices of a graph; rank 1 is eliminated first.
///
/// # Examples
/// ```
/// use lcknn_core::EliminationOrder;
///
/// let order = EliminationOrder::from_vertices(vec![3, 1, 2], 3).expect("a permutation");
/// assert_eq!(order.vertex_at(1), Some(3));
/// assert_eq!(order.rank_of(2), Some(3));
/// assert!(EliminationOrder::from_vertices(vec![1, 1, 2], 3).is_err());
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EliminationOrder {
    by_rank: Vec<VertexId>,
    rank: Vec<usize>,
}

impl EliminationOrder {
    /// Builds an order from vertices listed in rank order.
    ///
    /// # Errors
    /// Returns [`IndexError::OrderLengthMismatch`] when the list does not
    /// name exactly `vertex_count` vertices, [`IndexError::VertexOutOfRange`]
    /// for ids outside `1..=vertex_count`, and
    /// [`IndexError::OrderRepeatsVertex`] for repeated ids.
    pub fn from_vertices(vertices: Vec<VertexId>, vertex_count: usize) -> Result<Self> {
        if vertices.len() != vertex_count {
            return Err(IndexError::OrderLengthMismatch {
                got: vertices.len(),
                expected: vertex_count,
            });
        }
        let mut rank = vec![0; vertex_count + 1];
        for (position, &vertex) in vertices.iter().enumerate() {
            if vertex == 0 || vertex > vertex_count {
                return Err(IndexError::VertexOutOfRange {
                    vertex,
                    vertex_count,
                });
            }
            if rank[vertex] != 0 {
                return Err(IndexError::OrderRepeatsVertex { vertex });
            }
            rank[vertex] = position + 1;
        }
        let mut by_rank = Vec::with_capacity(vertex_count + 1);
        by_rank.push(0);
        by_rank.extend(vertices);
        Ok(Self { by_rank, rank })
    }

    pub(crate) const fn from_parts(by_rank: Vec<VertexId>, rank: Vec<usize>) -> Self {
        Self { by_rank, rank }
    }

    /// Returns the number of ordered vertices.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.by_rank.len().saturating_sub(1)
    }

    /// Returns `true` for the order of an empty graph.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the vertex eliminated at `rank`.
    #[must_use]
    pub fn vertex_at(&self, rank: usize) -> Option<VertexId> {
        (rank != 0).then(|| self.by_rank.get(rank).copied()).flatten()
    }

    /// Returns the rank of `vertex`.
    #[must_use]
    pub fn rank_of(&self, vertex: VertexId) -> Option<usize> {
        self.rank.get(vertex).copied().filter(|&rank| rank != 0)
    }

    /// Returns the vertices in rank order.
    #[must_use]
    pub fn vertices(&self) -> &[VertexId] {
        self.by_rank.get(1..).unwrap_or(&[])
    }

    pub(crate) fn rank(&self, vertex: VertexId) -> usize {
        self.rank[vertex]
    }

    pub(crate) fn at(&self, rank: usize) -> VertexId {
        self.by_rank[rank]
    }
}
