//! Per-vertex shortcut summaries between tree-adjacent vertices.

use std::collections::BTreeMap;

use crate::{
    graph::{LabelledGraph, VertexId},
    summary::PathSummary,
};

static EMPTY_SUMMARY: PathSummary = PathSummary::new();

/// Path summaries keyed by `(vertex, neighbour)`.
///
/// For a vertex `v` and a member `u` of its bag, `get(v, u)` is the refined
/// upward shortcut. The reverse direction `get(u, v)` keeps the summary as it
/// stood when `v` was eliminated.
#[derive(Clone, Debug, Default)]
pub(crate) struct ShortcutTable {
    links: Vec<BTreeMap<VertexId, PathSummary>>,
}

impl ShortcutTable {
    /// Seeds the table with every graph edge, folding parallel edges.
    pub(crate) fn from_graph(graph: &LabelledGraph) -> Self {
        let mut links = vec![BTreeMap::new(); graph.vertex_count() + 1];
        for vertex in graph.vertices() {
            let row: &mut BTreeMap<VertexId, PathSummary> = &mut links[vertex];
            for edge in graph.edges(vertex) {
                row.entry(edge.target())
                    .or_default()
                    .merge(PathSummary::edge(edge.weight(), edge.label()));
            }
        }
        Self { links }
    }

    pub(crate) fn get(&self, vertex: VertexId, neighbour: VertexId) -> &PathSummary {
        self.links
            .get(vertex)
            .and_then(|row| row.get(&neighbour))
            .unwrap_or(&EMPTY_SUMMARY)
    }

    pub(crate) fn get_mut(
        &mut self,
        vertex: VertexId,
        neighbour: VertexId,
    ) -> Option<&mut PathSummary> {
        self.links.get_mut(vertex)?.get_mut(&neighbour)
    }

    pub(crate) fn contains(&self, vertex: VertexId, neighbour: VertexId) -> bool {
        self.links
            .get(vertex)
            .is_some_and(|row| row.contains_key(&neighbour))
    }

    /// Returns the neighbours of `vertex` in ascending id order.
    pub(crate) fn neighbours(&self, vertex: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.links
            .get(vertex)
            .into_iter()
            .flat_map(|row| row.keys().copied())
    }

    pub(crate) fn degree(&self, vertex: VertexId) -> usize {
        self.links.get(vertex).map_or(0, BTreeMap::len)
    }

    /// Merges `via` into the summary between `first` and `second` and mirrors
    /// the result onto the reverse direction.
    pub(crate) fn merge_symmetric(&mut self, first: VertexId, second: VertexId, via: PathSummary) {
        let merged = {
            let summary = self.links[first].entry(second).or_default();
            summary.merge(via);
            summary.clone()
        };
        self.links[second].insert(first, merged);
    }
}
