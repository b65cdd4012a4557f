//! The elimination tree and the bags that drive propagation.

use std::collections::VecDeque;

use crate::graph::VertexId;

/// Parent, children, bag, and descendant links of every vertex.
///
/// Parents come from the bags as they were at elimination time; `bag` and
/// `descendants` reflect the bags after refinement.
#[derive(Clone, Debug, Default)]
pub(crate) struct EliminationTree {
    parent: Vec<Option<VertexId>>,
    children: Vec<Vec<VertexId>>,
    bags: Vec<Vec<VertexId>>,
    descendants: Vec<Vec<VertexId>>,
}

impl EliminationTree {
    /// Derives parents from `bags`: each vertex's parent is its bag member of
    /// lowest rank, and vertices with empty bags are roots.
    pub(crate) fn from_bags(bags: Vec<Vec<VertexId>>, rank: impl Fn(VertexId) -> usize) -> Self {
        let slots = bags.len();
        let mut parent = vec![None; slots];
        let mut children = vec![Vec::new(); slots];
        for (vertex, bag) in bags.iter().enumerate().skip(1) {
            if let Some(&lowest) = bag.iter().min_by_key(|&&member| rank(member)) {
                parent[vertex] = Some(lowest);
                children[lowest].push(vertex);
            }
        }
        Self {
            parent,
            children,
            bags,
            descendants: vec![Vec::new(); slots],
        }
    }

    /// Replaces the bags with their refined versions and rebuilds the
    /// descendant lists from them.
    pub(crate) fn install_refined_bags(&mut self, bags: Vec<Vec<VertexId>>) {
        let mut descendants = vec![Vec::new(); bags.len()];
        for (vertex, bag) in bags.iter().enumerate().skip(1) {
            for &member in bag {
                descendants[member].push(vertex);
            }
        }
        self.bags = bags;
        self.descendants = descendants;
    }

    pub(crate) fn parent(&self, vertex: VertexId) -> Option<VertexId> {
        self.parent.get(vertex).copied().flatten()
    }

    pub(crate) fn bag(&self, vertex: VertexId) -> &[VertexId] {
        self.bags.get(vertex).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn bags(&self) -> &[Vec<VertexId>] {
        &self.bags
    }

    pub(crate) fn descendants(&self, vertex: VertexId) -> &[VertexId] {
        self.descendants.get(vertex).map_or(&[], Vec::as_slice)
    }

    /// Returns `vertex` followed by its ancestors up to the root.
    pub(crate) fn ancestors(&self, vertex: VertexId) -> Vec<VertexId> {
        let mut chain = vec![vertex];
        let mut current = vertex;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    pub(crate) fn roots(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.parent
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(vertex, parent)| parent.is_none().then_some(vertex))
    }

    /// Returns the depth of every vertex, roots at depth 1.
    pub(crate) fn depths(&self) -> Vec<usize> {
        let mut depth = vec![0; self.parent.len()];
        let mut queue: VecDeque<VertexId> = self.roots().collect();
        for &root in &queue {
            depth[root] = 1;
        }
        while let Some(vertex) = queue.pop_front() {
            for &child in &self.children[vertex] {
                depth[child] = depth[vertex] + 1;
                queue.push_back(child);
            }
        }
        depth
    }
}
