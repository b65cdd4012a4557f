//! The public label-constrained kNN index.

use tracing::{debug, instrument};

use crate::{
    error::{IndexError, Result},
    graph::{LabelledGraph, VertexId},
    hierarchy::EliminationOrder,
    label::LabelSet,
    poi::PoiSet,
    profile::{Neighbour, ProfiledIndex},
    state::IndexState,
    telemetry,
    update::{self, UpdateOp, UpdateSummary},
};

/// A label-constrained k-nearest-neighbour index over a [`LabelledGraph`].
///
/// An index only exists once construction or restoration has completed, and
/// every mutating operation validates its input before touching any state.
///
/// # Examples
/// ```
/// use lcknn_core::{LabelSet, LabelledGraph, LcIndexBuilder};
///
/// let a: LabelSet = "a".parse().expect("valid labels");
/// let graph = LabelledGraph::from_edges(
///     5,
///     1,
///     [(1, 2, 1.0, a), (2, 3, 1.0, a), (3, 4, 1.0, a), (4, 5, 1.0, a)],
/// )
/// .expect("valid graph");
/// let mut index = LcIndexBuilder::new()
///     .with_k(2)
///     .build(graph, [1, 5])
///     .expect("valid configuration");
///
/// let nearest = index.query(3, a).expect("vertex 3 exists");
/// assert_eq!(nearest.len(), 2);
///
/// index.delete_poi(5).expect("vertex 5 is a point of interest");
/// let nearest = index.query(3, a).expect("vertex 3 exists");
/// assert_eq!(nearest.len(), 1);
/// assert_eq!(nearest[0].vertex(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct LcIndex {
    graph: LabelledGraph,
    state: IndexState,
}

impl LcIndex {
    pub(crate) const fn from_parts(graph: LabelledGraph, state: IndexState) -> Self {
        Self { graph, state }
    }

    pub(crate) const fn state(&self) -> &IndexState {
        &self.state
    }

    /// Returns the indexed graph.
    #[must_use]
    pub const fn graph(&self) -> &LabelledGraph {
        &self.graph
    }

    /// Returns the number of neighbours each query reports at most.
    #[must_use]
    pub const fn k(&self) -> usize {
        self.state.k
    }

    /// Returns the current points of interest.
    #[must_use]
    pub const fn pois(&self) -> &PoiSet {
        &self.state.pois
    }

    /// Returns `true` when `vertex` is currently a point of interest.
    #[must_use]
    pub fn is_poi(&self, vertex: VertexId) -> bool {
        self.state.pois.contains(vertex)
    }

    /// Returns the elimination order the hierarchy was built from.
    #[must_use]
    pub const fn order(&self) -> &EliminationOrder {
        self.state.hierarchy.order()
    }

    /// Returns the stored profile of `vertex`.
    #[must_use]
    pub fn profile(&self, vertex: VertexId) -> Option<&ProfiledIndex> {
        self.graph
            .check_vertex(vertex)
            .ok()
            .and_then(|()| self.state.profiles.get(vertex))
    }

    /// Returns up to `k` points of interest closest to `vertex` along paths
    /// whose edge labels all belong to `labels`, in ascending distance order.
    ///
    /// A point of interest at `vertex` itself is reported first at distance
    /// zero.
    ///
    /// # Errors
    /// Returns [`IndexError::VertexOutOfRange`] when `vertex` is not in the
    /// graph.
    pub fn query(&self, vertex: VertexId, labels: LabelSet) -> Result<Vec<Neighbour>> {
        self.graph.check_vertex(vertex)?;
        telemetry::record_query();
        Ok(self.state.probe(vertex, labels).results)
    }

    /// Designates `vertex` as a point of interest and repairs the profiles
    /// it improves.
    ///
    /// # Errors
    /// Returns [`IndexError::VertexOutOfRange`] for unknown vertices and
    /// [`IndexError::AlreadyPoi`] when `vertex` is already designated.
    pub fn insert_poi(&mut self, vertex: VertexId) -> Result<UpdateSummary> {
        self.graph.check_vertex(vertex)?;
        if self.is_poi(vertex) {
            return Err(IndexError::AlreadyPoi { vertex });
        }
        let affected = update::insert(&mut self.state, vertex);
        telemetry::record_insert(1, affected);
        Ok(UpdateSummary::new(UpdateOp::Insert(vertex), affected))
    }

    /// Withdraws `vertex`'s designation and rebuilds the profiles that
    /// listed it.
    ///
    /// # Errors
    /// Returns [`IndexError::VertexOutOfRange`] for unknown vertices and
    /// [`IndexError::NotPoi`] when `vertex` is not designated.
    pub fn delete_poi(&mut self, vertex: VertexId) -> Result<UpdateSummary> {
        self.graph.check_vertex(vertex)?;
        if !self.is_poi(vertex) {
            return Err(IndexError::NotPoi { vertex });
        }
        let affected = update::delete(&mut self.state, vertex);
        telemetry::record_delete(1, affected);
        Ok(UpdateSummary::new(UpdateOp::Delete(vertex), affected))
    }

    /// Applies one update operation.
    ///
    /// # Errors
    /// Returns the error of [`Self::insert_poi`] or [`Self::delete_poi`].
    pub fn apply(&mut self, op: UpdateOp) -> Result<UpdateSummary> {
        match op {
            UpdateOp::Insert(vertex) => self.insert_poi(vertex),
            UpdateOp::Delete(vertex) => self.delete_poi(vertex),
        }
    }

    /// Applies an update stream one operation at a time.
    ///
    /// # Errors
    /// Stops at the first rejected operation and returns its error. The
    /// operations before it remain applied; the rejected one changed nothing.
    pub fn apply_stream<I>(&mut self, ops: I) -> Result<Vec<UpdateSummary>>
    where
        I: IntoIterator<Item = UpdateOp>,
    {
        ops.into_iter().map(|op| self.apply(op)).collect()
    }

    /// Designates every vertex of `vertices` at once.
    ///
    /// Returns the number of vertices whose profile was rewritten.
    ///
    /// # Errors
    /// Validates the whole batch first and returns
    /// [`IndexError::VertexOutOfRange`], [`IndexError::DuplicateBatchVertex`],
    /// or [`IndexError::AlreadyPoi`] without changing the index.
    pub fn batch_insert<I>(&mut self, vertices: I) -> Result<usize>
    where
        I: IntoIterator<Item = VertexId>,
    {
        let batch = self.validate_batch(vertices, false)?;
        if batch.is_empty() {
            return Ok(0);
        }
        let affected = update::batch_insert(&mut self.state, &batch);
        telemetry::record_insert(batch.len(), affected);
        Ok(affected)
    }

    /// Withdraws every vertex of `vertices` at once.
    ///
    /// Returns the number of vertices whose profile was rebuilt.
    ///
    /// # Errors
    /// Validates the whole batch first and returns
    /// [`IndexError::VertexOutOfRange`], [`IndexError::DuplicateBatchVertex`],
    /// or [`IndexError::NotPoi`] without changing the index.
    pub fn batch_delete<I>(&mut self, vertices: I) -> Result<usize>
    where
        I: IntoIterator<Item = VertexId>,
    {
        let batch = self.validate_batch(vertices, true)?;
        if batch.is_empty() {
            return Ok(0);
        }
        let affected = update::batch_delete(&mut self.state, &batch);
        telemetry::record_delete(batch.len(), affected);
        Ok(affected)
    }

    /// Discards every profile and reconstructs them for the current points
    /// of interest, keeping the elimination hierarchy.
    #[instrument(name = "index.rebuild", skip(self), fields(pois = self.state.pois.len()))]
    pub fn rebuild(&mut self) {
        self.state.reconstruct();
        debug!("profiles rebuilt");
    }

    fn validate_batch<I>(&self, vertices: I, expect_poi: bool) -> Result<Vec<VertexId>>
    where
        I: IntoIterator<Item = VertexId>,
    {
        let mut seen = vec![false; self.graph.vertex_count() + 1];
        let mut batch = Vec::new();
        for vertex in vertices {
            self.graph.check_vertex(vertex)?;
            if seen[vertex] {
                return Err(IndexError::DuplicateBatchVertex { vertex });
            }
            seen[vertex] = true;
            match (expect_poi, self.is_poi(vertex)) {
                (false, true) => return Err(IndexError::AlreadyPoi { vertex }),
                (true, false) => return Err(IndexError::NotPoi { vertex }),
                _ => batch.push(vertex),
            }
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::LcIndexBuilder;

    fn labels(text: &str) -> LabelSet {
        text.parse().expect("label text must parse")
    }

    /// Path 1-2-3-4-5 with unit `a` edges and points of interest at both ends.
    #[fixture]
    fn path() -> LcIndex {
        let a = labels("a");
        let graph = LabelledGraph::from_edges(
            5,
            1,
            [(1, 2, 1.0, a), (2, 3, 1.0, a), (3, 4, 1.0, a), (4, 5, 1.0, a)],
        )
        .expect("path graph must be valid");
        LcIndexBuilder::new()
            .with_k(2)
            .build(graph, [1, 5])
            .expect("path index must build")
    }

    fn answer(index: &LcIndex, vertex: VertexId, allowed: &str) -> Vec<(VertexId, f64)> {
        index
            .query(vertex, labels(allowed))
            .expect("vertex must exist")
            .into_iter()
            .map(|neighbour| (neighbour.vertex(), neighbour.distance()))
            .collect()
    }

    #[rstest]
    fn centre_of_the_path_sees_both_ends(path: LcIndex) {
        let mut found = answer(&path, 3, "a");
        found.sort_by_key(|&(vertex, _)| vertex);
        assert_eq!(found, vec![(1, 2.0), (5, 2.0)]);
    }

    #[rstest]
    fn deleting_an_end_leaves_the_other(mut path: LcIndex) {
        path.delete_poi(5).expect("vertex 5 is a point of interest");
        assert_eq!(answer(&path, 3, "a"), vec![(1, 2.0)]);
        assert!(!path.is_poi(5));
    }

    #[rstest]
    fn poi_reports_itself_first(path: LcIndex) {
        assert_eq!(answer(&path, 1, "a"), vec![(1, 0.0), (5, 4.0)]);
    }

    #[rstest]
    fn empty_label_set_only_reaches_the_source(path: LcIndex) {
        assert_eq!(answer(&path, 1, "-"), vec![(1, 0.0)]);
        assert!(answer(&path, 3, "-").is_empty());
    }

    fn answers_ignoring_ties(index: &LcIndex) -> Vec<Vec<(VertexId, f64)>> {
        (1..=5)
            .map(|vertex| {
                let mut found = answer(index, vertex, "a");
                found.sort_by(|left, right| left.1.total_cmp(&right.1).then(left.0.cmp(&right.0)));
                found
            })
            .collect()
    }

    #[rstest]
    fn insertion_matches_rebuild(mut path: LcIndex) {
        path.insert_poi(3).expect("vertex 3 is not yet a point of interest");
        let incremental = answers_ignoring_ties(&path);
        assert_eq!(incremental[1], vec![(1, 1.0), (3, 1.0)]);
        assert_eq!(incremental[2].first(), Some(&(3, 0.0)));
        assert_eq!(incremental[2].get(1).map(|&(_, distance)| distance), Some(2.0));
        path.rebuild();
        assert_eq!(incremental, answers_ignoring_ties(&path));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(vec![3, 1, 2]))]
    #[case(Some(vec![3, 2, 1]))]
    fn zero_weight_edges_keep_their_paths(#[case] order: Option<Vec<VertexId>>) {
        let a = labels("a");
        let graph = LabelledGraph::from_edges(3, 1, [(3, 1, 1.0, a), (3, 2, 1.0, a), (2, 1, 0.0, a)])
            .expect("triangle must be valid");
        let mut builder = LcIndexBuilder::new().with_k(1);
        if let Some(vertices) = order {
            builder = builder.with_order(
                EliminationOrder::from_vertices(vertices, 3).expect("a permutation"),
            );
        }
        let index = builder.build(graph, [3]).expect("triangle index must build");
        assert_eq!(answer(&index, 1, "a"), vec![(3, 1.0)]);
        assert_eq!(answer(&index, 2, "a"), vec![(3, 1.0)]);
        assert!(index.verify().is_consistent());
    }

    #[rstest]
    #[case(UpdateOp::Insert(1), IndexError::AlreadyPoi { vertex: 1 })]
    #[case(UpdateOp::Delete(2), IndexError::NotPoi { vertex: 2 })]
    #[case(UpdateOp::Insert(6), IndexError::VertexOutOfRange { vertex: 6, vertex_count: 5 })]
    #[case(UpdateOp::Delete(0), IndexError::VertexOutOfRange { vertex: 0, vertex_count: 5 })]
    fn rejected_updates_change_nothing(
        mut path: LcIndex,
        #[case] op: UpdateOp,
        #[case] expected: IndexError,
    ) {
        let before = path.snapshot();
        assert_eq!(path.apply(op), Err(expected));
        assert_eq!(path.snapshot(), before);
    }

    #[rstest]
    fn batches_are_validated_before_mutation(mut path: LcIndex) {
        let before = path.snapshot();
        assert_eq!(
            path.batch_insert([2, 3, 2]),
            Err(IndexError::DuplicateBatchVertex { vertex: 2 })
        );
        assert_eq!(
            path.batch_delete([1, 4]),
            Err(IndexError::NotPoi { vertex: 4 })
        );
        assert_eq!(path.snapshot(), before);
    }

    #[rstest]
    fn streams_report_one_summary_per_operation(mut path: LcIndex) {
        let summaries = path
            .apply_stream([UpdateOp::Insert(3), UpdateOp::Delete(1)])
            .expect("stream must apply");
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].op(), UpdateOp::Insert(3));
        assert!(summaries.iter().all(|summary| summary.affected() >= 1));
        assert_eq!(answer(&path, 2, "a"), vec![(3, 1.0), (5, 3.0)]);
    }

    #[rstest]
    fn queries_reject_unknown_vertices(path: LcIndex) {
        assert_eq!(
            path.query(9, labels("a")),
            Err(IndexError::VertexOutOfRange {
                vertex: 9,
                vertex_count: 5
            })
        );
        assert!(path.profile(0).is_none());
        assert!(path.profile(5).is_some());
    }
}
