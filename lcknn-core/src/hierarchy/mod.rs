//! Vertex elimination hierarchy.
//!
//! Eliminating vertices one at a time, and connecting the remaining
//! neighbours of each eliminated vertex pairwise, yields three things: an
//! [`EliminationOrder`], the shortcut summaries between every pair that
//! became adjacent, and the bag of each vertex (its neighbours still present
//! when it was eliminated). The bags define the elimination tree that index
//! construction and maintenance walk.

mod buckets;
mod order;
mod shortcuts;
mod tree;

use tracing::{debug, info, instrument};

use self::buckets::DegreeBuckets;
pub use self::order::EliminationOrder;
pub(crate) use self::{shortcuts::ShortcutTable, tree::EliminationTree};
use crate::{
    graph::{LabelledGraph, VertexId},
    label::LabelSet,
    summary::{PathEntry, PathSummary},
};

/// Elimination order, tree, and shortcut summaries of a graph.
#[derive(Clone, Debug)]
pub(crate) struct Hierarchy {
    order: EliminationOrder,
    tree: EliminationTree,
    shortcuts: ShortcutTable,
}

impl Hierarchy {
    /// Eliminates the graph, using `order` when supplied and the
    /// minimum-degree heuristic otherwise, then refines the shortcuts.
    pub(crate) fn build(graph: &LabelledGraph, order: Option<&EliminationOrder>) -> Self {
        let mut hierarchy = match order {
            Some(order) => Self::eliminate_in_order(graph, order.clone()),
            None => Self::eliminate_min_degree(graph),
        };
        hierarchy.refine();
        hierarchy
    }

    pub(crate) const fn order(&self) -> &EliminationOrder {
        &self.order
    }

    pub(crate) const fn tree(&self) -> &EliminationTree {
        &self.tree
    }

    pub(crate) const fn shortcuts(&self) -> &ShortcutTable {
        &self.shortcuts
    }

    #[instrument(
        name = "hierarchy.eliminate",
        skip(graph),
        fields(vertices = graph.vertex_count(), strategy = "min_degree")
    )]
    fn eliminate_min_degree(graph: &LabelledGraph) -> Self {
        let vertex_count = graph.vertex_count();
        let mut shortcuts = ShortcutTable::from_graph(graph);
        let mut buckets = DegreeBuckets::new(vertex_count);
        for vertex in graph.vertices() {
            buckets.insert(vertex, shortcuts.degree(vertex));
        }

        let mut rank = vec![0; vertex_count + 1];
        let mut by_rank = vec![0; vertex_count + 1];
        let mut bags = vec![Vec::new(); vertex_count + 1];
        let mut threshold = 0;
        let mut eliminated_at_threshold = 0_usize;
        for id in 1..=vertex_count {
            let Some((vertex, degree)) = buckets.pop_min() else {
                break;
            };
            if degree > threshold {
                if eliminated_at_threshold > 0 {
                    debug!(
                        degree = threshold,
                        eliminated = eliminated_at_threshold,
                        "degree threshold exhausted"
                    );
                }
                threshold = degree;
                eliminated_at_threshold = 0;
            }
            eliminated_at_threshold += 1;
            rank[vertex] = id;
            by_rank[id] = vertex;

            let remaining: Vec<VertexId> = shortcuts
                .neighbours(vertex)
                .filter(|&neighbour| rank[neighbour] == 0)
                .collect();
            let fills = connect_remaining(&mut shortcuts, vertex, &remaining);
            for (&neighbour, &fill) in remaining.iter().zip(&fills) {
                if fill != 1 {
                    let updated = (buckets.degree(neighbour) + fill).saturating_sub(1);
                    buckets.relocate(neighbour, updated);
                }
            }
            bags[vertex] = remaining;
        }

        let order = EliminationOrder::from_parts(by_rank, rank);
        Self::assemble(order, bags, shortcuts)
    }

    #[instrument(
        name = "hierarchy.eliminate",
        skip(graph, order),
        fields(vertices = graph.vertex_count(), strategy = "supplied")
    )]
    fn eliminate_in_order(graph: &LabelledGraph, order: EliminationOrder) -> Self {
        let mut shortcuts = ShortcutTable::from_graph(graph);
        let mut bags = vec![Vec::new(); graph.vertex_count() + 1];
        for (position, &vertex) in order.vertices().iter().enumerate() {
            let id = position + 1;
            let remaining: Vec<VertexId> = shortcuts
                .neighbours(vertex)
                .filter(|&neighbour| order.rank(neighbour) > id)
                .collect();
            connect_remaining(&mut shortcuts, vertex, &remaining);
            bags[vertex] = remaining;
        }
        Self::assemble(order, bags, shortcuts)
    }

    fn assemble(
        order: EliminationOrder,
        bags: Vec<Vec<VertexId>>,
        shortcuts: ShortcutTable,
    ) -> Self {
        let tree = EliminationTree::from_bags(bags, |vertex| order.rank(vertex));
        debug!(roots = tree.roots().count(), "elimination tree assembled");
        Self {
            order,
            tree,
            shortcuts,
        }
    }

    /// Drops upward shortcut entries that a detour through another bag
    /// member already matches, then drops bag members left without entries.
    ///
    /// A single pass from the highest rank down; flagged entries are
    /// rewritten to the detour's cost while the pass runs and removed once it
    /// completes. A detour never starts with an entry already flagged at the
    /// same vertex, so two entries tied through a zero-weight link cannot
    /// remove each other.
    #[instrument(name = "hierarchy.refine", skip(self))]
    fn refine(&mut self) {
        let slots = self.tree.bags().len();
        let mut flags: Vec<Vec<Vec<bool>>> = vec![Vec::new(); slots];
        for rank in (1..=self.order.len()).rev() {
            let vertex = self.order.at(rank);
            let bag = self.tree.bag(vertex).to_vec();
            flags[vertex] = bag
                .iter()
                .map(|&member| vec![false; self.shortcuts.get(vertex, member).len()])
                .collect();
            for (slot, &near) in bag.iter().enumerate() {
                for (far_slot, &far) in bag.iter().enumerate() {
                    if near == far {
                        continue;
                    }
                    let across = self.shortcuts.get(near, far).clone();
                    let direct = self.shortcuts.get(vertex, far).clone();
                    let direct_flags = flags[vertex][far_slot].clone();
                    let Some(summary) = self.shortcuts.get_mut(vertex, near) else {
                        continue;
                    };
                    for (index, entry) in summary.entries_mut().iter_mut().enumerate() {
                        let allowed = entry.labels();
                        let (Some(last), Some(first)) = (
                            across.best_within(allowed),
                            best_unflagged(&direct, &direct_flags, allowed),
                        ) else {
                            continue;
                        };
                        let detour = first.distance() + last.distance();
                        let labels = first.labels() | last.labels();
                        if entry.distance() >= detour && allowed.includes(labels) {
                            *entry = PathEntry::new(detour, labels);
                            flags[vertex][slot][index] = true;
                        }
                    }
                }
            }
        }

        let mut removed_entries = 0_usize;
        let mut dropped_members = 0_usize;
        let mut refined = Vec::with_capacity(slots);
        refined.push(Vec::new());
        for vertex in 1..slots {
            let bag = self.tree.bag(vertex).to_vec();
            for (slot, &member) in bag.iter().enumerate() {
                let Some(summary) = self.shortcuts.get_mut(vertex, member) else {
                    continue;
                };
                let marks = flags[vertex].get(slot).map_or(&[][..], Vec::as_slice);
                let before = summary.len();
                summary.retain_indexed(|index, _| !marks.get(index).copied().unwrap_or(false));
                removed_entries += before - summary.len();
            }
            let kept: Vec<VertexId> = bag
                .into_iter()
                .filter(|&member| !self.shortcuts.get(vertex, member).is_empty())
                .collect();
            dropped_members += self.tree.bag(vertex).len() - kept.len();
            refined.push(kept);
        }
        self.tree.install_refined_bags(refined);
        info!(removed_entries, dropped_members, "shortcuts refined");
    }
}

/// Shortest entry of `summary` allowed by `allowed` that is not flagged for
/// removal.
fn best_unflagged(summary: &PathSummary, flags: &[bool], allowed: LabelSet) -> Option<PathEntry> {
    summary
        .entries()
        .iter()
        .zip(flags)
        .filter(|&(entry, &flagged)| !flagged && allowed.includes(entry.labels()))
        .map(|(entry, _)| *entry)
        .min_by(|left, right| left.distance().total_cmp(&right.distance()))
}

/// Connects every pair of `remaining` neighbours of `vertex` through it and
/// returns, per neighbour, how many of those pairs were not adjacent before.
fn connect_remaining(
    shortcuts: &mut ShortcutTable,
    vertex: VertexId,
    remaining: &[VertexId],
) -> Vec<usize> {
    let mut fills = vec![0; remaining.len()];
    for (first_slot, &first) in remaining.iter().enumerate() {
        for (second_slot, &second) in remaining.iter().enumerate().skip(first_slot + 1) {
            if !shortcuts.contains(first, second) {
                fills[first_slot] += 1;
                fills[second_slot] += 1;
            }
            let via = shortcuts
                .get(vertex, first)
                .concat(shortcuts.get(vertex, second));
            shortcuts.merge_symmetric(first, second, via);
        }
    }
    fills
}

#[cfg(test)]
mod tests;
