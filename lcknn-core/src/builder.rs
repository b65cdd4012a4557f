//! Builder utilities for configuring index construction.
//!
//! Exposes the neighbour count and elimination-order surface and the
//! validation performed before an [`LcIndex`] is constructed.

use tracing::{info, instrument};

use crate::{
    Result,
    error::IndexError,
    graph::{LabelledGraph, VertexId},
    hierarchy::{EliminationOrder, Hierarchy},
    index::LcIndex,
    poi::PoiSet,
    state::IndexState,
};

/// Neighbour count used when none is configured.
pub const DEFAULT_K: usize = 20;

/// Configures and constructs [`LcIndex`] instances.
///
/// # Examples
/// ```
/// use lcknn_core::{EliminationOrder, LabelSet, LabelledGraph, LcIndexBuilder};
///
/// let a: LabelSet = "a".parse().expect("valid labels");
/// let graph = LabelledGraph::from_edges(3, 1, [(1, 2, 1.0, a), (2, 3, 2.0, a)])
///     .expect("valid graph");
/// let order = EliminationOrder::from_vertices(vec![1, 3, 2], 3).expect("a permutation");
/// let index = LcIndexBuilder::new()
///     .with_k(1)
///     .with_order(order.clone())
///     .build(graph, [3])
///     .expect("builder configuration is valid");
/// assert_eq!(index.k(), 1);
/// assert_eq!(index.order(), &order);
/// ```
#[derive(Clone, Debug)]
pub struct LcIndexBuilder {
    k: usize,
    order: Option<EliminationOrder>,
}

impl Default for LcIndexBuilder {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            order: None,
        }
    }
}

impl LcIndexBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use lcknn_core::{DEFAULT_K, LcIndexBuilder};
    ///
    /// let builder = LcIndexBuilder::new();
    /// assert_eq!(builder.k(), DEFAULT_K);
    /// assert!(builder.order().is_none());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of neighbours each query reports.
    #[must_use]
    pub const fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Returns the configured neighbour count.
    #[must_use]
    pub const fn k(&self) -> usize {
        self.k
    }

    /// Supplies an elimination order instead of computing one.
    #[must_use]
    pub fn with_order(mut self, order: EliminationOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Returns the supplied elimination order, if any.
    #[must_use]
    pub const fn order(&self) -> Option<&EliminationOrder> {
        self.order.as_ref()
    }

    /// Validates the configuration and builds the index of `graph` with the
    /// given points of interest. Repeated points of interest are ignored.
    ///
    /// # Errors
    /// Returns [`IndexError::InvalidK`] for a zero neighbour count,
    /// [`IndexError::OrderLengthMismatch`] when a supplied order does not
    /// cover the graph, and [`IndexError::VertexOutOfRange`] for unknown
    /// points of interest.
    #[instrument(
        name = "index.build",
        err,
        skip(self, graph, pois),
        fields(vertices = graph.vertex_count(), edges = graph.edge_count(), k = self.k)
    )]
    pub fn build<I>(self, graph: LabelledGraph, pois: I) -> Result<LcIndex>
    where
        I: IntoIterator<Item = VertexId>,
    {
        validate_k(self.k)?;
        if let Some(order) = &self.order
            && order.len() != graph.vertex_count()
        {
            return Err(IndexError::OrderLengthMismatch {
                got: order.len(),
                expected: graph.vertex_count(),
            });
        }
        let pois = collect_pois(&graph, pois)?;
        let hierarchy = Hierarchy::build(&graph, self.order.as_ref());
        let state = IndexState::constructed(hierarchy, pois, self.k);
        info!(
            roots = state.hierarchy.tree().roots().count(),
            pois = state.pois.len(),
            "index built"
        );
        Ok(LcIndex::from_parts(graph, state))
    }
}

pub(crate) const fn validate_k(k: usize) -> Result<()> {
    if k == 0 {
        return Err(IndexError::InvalidK { got: k });
    }
    Ok(())
}

pub(crate) fn collect_pois<I>(graph: &LabelledGraph, vertices: I) -> Result<PoiSet>
where
    I: IntoIterator<Item = VertexId>,
{
    let mut pois = PoiSet::new(graph.vertex_count());
    for vertex in vertices {
        graph.check_vertex(vertex)?;
        pois.insert(vertex);
    }
    Ok(pois)
}
