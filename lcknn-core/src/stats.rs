//! Size and shape statistics of a built index.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{index::LcIndex, profile::ProfiledIndex};

/// Tree shape and storage figures of an [`LcIndex`].
#[derive(Clone, Debug, PartialEq)]
pub struct IndexStats {
    /// Number of elimination-tree roots.
    pub roots: usize,
    /// Depth of the deepest vertex, roots counting as one.
    pub max_height: usize,
    /// Mean vertex depth.
    pub mean_height: f64,
    /// Largest refined bag.
    pub max_width: usize,
    /// Mean refined bag size.
    pub mean_width: f64,
    /// Largest number of label sets stored by one vertex.
    pub max_label_sets: usize,
    /// Mean number of label sets stored per vertex.
    pub mean_label_sets: f64,
    /// Total stored label sets.
    pub label_sets: usize,
    /// Total stored candidates.
    pub candidates: usize,
    /// Estimated size of the stored profiles in bytes.
    pub estimated_bytes: usize,
}

fn mean(total: usize, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

fn profile_counts(profile: &ProfiledIndex) -> (usize, usize) {
    (profile.len(), profile.candidate_count())
}

impl LcIndex {
    /// Gathers tree and storage statistics.
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        let state = self.state();
        let tree = state.hierarchy.tree();
        let vertex_count = self.graph().vertex_count();
        let profiles = state.profiles.get(1..).unwrap_or_default();

        let depths = tree.depths();
        let heights = depths.get(1..).unwrap_or_default();
        let widths: Vec<usize> = self.graph().vertices().map(|v| tree.bag(v).len()).collect();

        #[cfg(feature = "parallel")]
        let counts: Vec<(usize, usize)> = profiles.par_iter().map(profile_counts).collect();
        #[cfg(not(feature = "parallel"))]
        let counts: Vec<(usize, usize)> = profiles.iter().map(profile_counts).collect();

        let label_sets: usize = counts.iter().map(|&(sets, _)| sets).sum();
        let candidates: usize = counts.iter().map(|&(_, stored)| stored).sum();
        IndexStats {
            roots: tree.roots().count(),
            max_height: heights.iter().copied().max().unwrap_or(0),
            mean_height: mean(heights.iter().sum(), vertex_count),
            max_width: widths.iter().copied().max().unwrap_or(0),
            mean_width: mean(widths.iter().sum(), vertex_count),
            max_label_sets: counts.iter().map(|&(sets, _)| sets).max().unwrap_or(0),
            mean_label_sets: mean(label_sets, vertex_count),
            label_sets,
            candidates,
            estimated_bytes: 4 * vertex_count + 4 * label_sets + 8 * candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::{
        LcIndexBuilder,
        graph::{LabelledGraph, VertexId},
        hierarchy::EliminationOrder,
        label::LabelSet,
    };

    #[test]
    fn path_statistics() {
        let a: LabelSet = "a".parse().expect("label text must parse");
        let graph = LabelledGraph::from_edges(
            5,
            1,
            [(1, 2, 1.0, a), (2, 3, 1.0, a), (3, 4, 1.0, a), (4, 5, 1.0, a)],
        )
        .expect("path graph must be valid");
        let index = LcIndexBuilder::new()
            .with_k(2)
            .build(graph, [1, 5])
            .expect("path index must build");
        let stats = index.stats();
        assert_eq!(stats.roots, 1);
        assert_eq!(stats.max_height, 5);
        assert_eq!(stats.max_width, 1);
        assert!((stats.mean_width - 0.8).abs() < 1e-12);
        assert_eq!(stats.label_sets, 5);
        assert_eq!(stats.max_label_sets, 1);
        assert_eq!(
            stats.estimated_bytes,
            4 * 5 + 4 * stats.label_sets + 8 * stats.candidates
        );
    }

    #[rstest]
    #[case::two_components(&[(1, 2), (2, 3), (4, 5)], vec![1, 2, 3, 4, 5], 2, 3, 1.8)]
    #[case::star(&[(1, 2), (1, 3), (1, 4)], vec![2, 3, 4, 1], 1, 2, 1.75)]
    fn tree_shape_statistics(
        #[case] edges: &[(VertexId, VertexId)],
        #[case] order: Vec<VertexId>,
        #[case] roots: usize,
        #[case] max_height: usize,
        #[case] mean_height: f64,
    ) {
        let a: LabelSet = "a".parse().expect("label text must parse");
        let vertex_count = order.len();
        let graph = LabelledGraph::from_edges(
            vertex_count,
            1,
            edges.iter().map(|&(source, target)| (source, target, 1.0, a)),
        )
        .expect("graph must be valid");
        let index = LcIndexBuilder::new()
            .with_k(1)
            .with_order(EliminationOrder::from_vertices(order, vertex_count).expect("a permutation"))
            .build(graph, [1])
            .expect("index must build");
        let stats = index.stats();
        assert_eq!(stats.roots, roots);
        assert_eq!(stats.max_height, max_height);
        assert!((stats.mean_height - mean_height).abs() < 1e-12);
        assert_eq!(stats.max_width, 1);
    }
}
