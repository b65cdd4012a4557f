//! Undirected, edge-labelled, weighted graphs with 1-based vertex ids.

use std::{collections::VecDeque, ops::RangeInclusive};

use crate::{
    compaction::LabelCompaction,
    error::{IndexError, Result},
    label::{LabelSet, MAX_LABELS},
};

/// Identifier of a graph vertex. Valid identifiers are `1..=vertex_count`.
pub type VertexId = usize;

/// One half of an undirected edge as stored in a vertex's adjacency list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphEdge {
    target: VertexId,
    weight: f64,
    label: LabelSet,
}

impl GraphEdge {
    /// Returns the vertex at the far end of the edge.
    #[must_use]
    pub const fn target(&self) -> VertexId {
        self.target
    }

    /// Returns the edge weight.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns the edge's label.
    #[must_use]
    pub const fn label(&self) -> LabelSet {
        self.label
    }
}

/// An edge as read from an external source, labelled with an uncompacted
/// label code.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawEdge {
    source: VertexId,
    target: VertexId,
    weight: f64,
    code: u32,
}

impl RawEdge {
    /// Creates a raw edge between `source` and `target`.
    #[must_use]
    pub const fn new(source: VertexId, target: VertexId, weight: f64, code: u32) -> Self {
        Self {
            source,
            target,
            weight,
            code,
        }
    }

    /// Returns the first endpoint.
    #[must_use]
    pub const fn source(&self) -> VertexId {
        self.source
    }

    /// Returns the second endpoint.
    #[must_use]
    pub const fn target(&self) -> VertexId {
        self.target
    }

    /// Returns the edge weight.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns the uncompacted label code.
    #[must_use]
    pub const fn code(&self) -> u32 {
        self.code
    }
}

/// An undirected graph whose edges carry a weight and a single label.
///
/// Parallel edges are kept; self-loops are accepted and discarded because
/// they never shorten a path.
///
/// # Examples
/// ```
/// use lcknn_core::{LabelSet, LabelledGraph};
///
/// let a = LabelSet::single(0).expect("label 0 exists");
/// let graph = LabelledGraph::from_edges(3, 1, [(1, 2, 1.0, a), (2, 3, 2.5, a)])
///     .expect("valid graph");
/// assert_eq!(graph.vertex_count(), 3);
/// assert_eq!(graph.edges(2).len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct LabelledGraph {
    adjacency: Vec<Vec<GraphEdge>>,
    edge_count: usize,
    label_size: usize,
}

impl LabelledGraph {
    /// Builds a graph from `(source, target, weight, label)` tuples.
    ///
    /// # Errors
    /// Returns [`IndexError::EmptyGraph`] when `vertex_count` is zero,
    /// [`IndexError::InvalidLabelSize`] when `label_size` is outside
    /// `1..=MAX_LABELS`, [`IndexError::VertexOutOfRange`] for endpoints outside
    /// `1..=vertex_count`, [`IndexError::InvalidWeight`] for negative or
    /// non-finite weights, and [`IndexError::InvalidEdgeLabel`] for labels that
    /// are empty or not contained in the universe.
    pub fn from_edges<I>(vertex_count: usize, label_size: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (VertexId, VertexId, f64, LabelSet)>,
    {
        if vertex_count == 0 {
            return Err(IndexError::EmptyGraph);
        }
        if label_size == 0 || label_size > MAX_LABELS {
            return Err(IndexError::InvalidLabelSize {
                got: label_size,
                max: MAX_LABELS,
            });
        }
        let universe = LabelSet::universe(label_size);
        let mut adjacency = vec![Vec::new(); vertex_count + 1];
        let mut edge_count = 0;
        for (source, target, weight, label) in edges {
            for endpoint in [source, target] {
                if endpoint == 0 || endpoint > vertex_count {
                    return Err(IndexError::VertexOutOfRange {
                        vertex: endpoint,
                        vertex_count,
                    });
                }
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(IndexError::InvalidWeight {
                    from: source,
                    to: target,
                });
            }
            if label.is_empty() || !universe.includes(label) {
                return Err(IndexError::InvalidEdgeLabel {
                    from: source,
                    to: target,
                    labels: label,
                    label_size,
                });
            }
            edge_count += 1;
            if source == target {
                continue;
            }
            adjacency[source].push(GraphEdge {
                target,
                weight,
                label,
            });
            adjacency[target].push(GraphEdge {
                target: source,
                weight,
                label,
            });
        }
        Ok(Self {
            adjacency,
            edge_count,
            label_size,
        })
    }

    /// Builds a graph from edges labelled with raw codes, compacting the
    /// codes into at most `requested_label_size` labels.
    ///
    /// # Errors
    /// Returns the errors of [`LabelCompaction::compute`] and
    /// [`LabelledGraph::from_edges`].
    pub fn from_raw_edges(
        vertex_count: usize,
        edges: &[RawEdge],
        requested_label_size: usize,
    ) -> Result<(Self, LabelCompaction)> {
        let compaction =
            LabelCompaction::compute(edges.iter().map(RawEdge::code), requested_label_size)?;
        let labelled = edges.iter().map(|edge| {
            (
                edge.source,
                edge.target,
                edge.weight,
                compaction.label_for(edge.code).unwrap_or(LabelSet::EMPTY),
            )
        });
        let graph = Self::from_edges(vertex_count, compaction.label_size(), labelled)?;
        Ok((graph, compaction))
    }

    /// Returns the number of vertices.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.adjacency.len().saturating_sub(1)
    }

    /// Returns the number of edges supplied at construction, self-loops
    /// included.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns the size of the label universe.
    #[must_use]
    pub const fn label_size(&self) -> usize {
        self.label_size
    }

    /// Returns the set of every label in the universe.
    #[must_use]
    pub const fn universe(&self) -> LabelSet {
        LabelSet::universe(self.label_size)
    }

    /// Returns the valid vertex identifiers.
    #[must_use]
    pub const fn vertices(&self) -> RangeInclusive<VertexId> {
        1..=self.vertex_count()
    }

    /// Returns the adjacency list of `vertex`, or an empty slice for unknown
    /// vertices.
    #[must_use]
    pub fn edges(&self, vertex: VertexId) -> &[GraphEdge] {
        if vertex == 0 {
            return &[];
        }
        self.adjacency.get(vertex).map_or(&[], Vec::as_slice)
    }

    /// Confirms that `vertex` names a vertex of this graph.
    ///
    /// # Errors
    /// Returns [`IndexError::VertexOutOfRange`] otherwise.
    pub fn check_vertex(&self, vertex: VertexId) -> Result<()> {
        if vertex == 0 || vertex > self.vertex_count() {
            return Err(IndexError::VertexOutOfRange {
                vertex,
                vertex_count: self.vertex_count(),
            });
        }
        Ok(())
    }

    /// Counts connected components, ignoring labels.
    #[must_use]
    pub fn connected_components(&self) -> usize {
        let mut seen = vec![false; self.adjacency.len()];
        let mut components = 0;
        let mut queue = VecDeque::new();
        for start in self.vertices() {
            if seen[start] {
                continue;
            }
            components += 1;
            seen[start] = true;
            queue.push_back(start);
            while let Some(vertex) = queue.pop_front() {
                for edge in self.edges(vertex) {
                    if !seen[edge.target] {
                        seen[edge.target] = true;
                        queue.push_back(edge.target);
                    }
                }
            }
        }
        components
    }
}
