//! Withdrawing points of interest and rebuilding the profiles that held them.

use tracing::{debug, instrument};

use crate::{build::absorb, graph::VertexId, state::IndexState};

/// Clears `deleted`'s membership, strips it from every profile that lists
/// it, and returns which vertices must be rebuilt.
///
/// A profile may hold a point of interest that none of its tree neighbours
/// still lists, so every profile is inspected rather than only those
/// reachable through the tree.
fn mark(state: &mut IndexState, deleted: VertexId) -> Vec<bool> {
    let IndexState { profiles, pois, .. } = state;
    pois.remove(deleted);
    let mut held: Vec<bool> = profiles
        .iter_mut()
        .map(|profile| profile.remove_vertex(deleted))
        .collect();
    if let Some(own) = held.get_mut(deleted) {
        *own = true;
    }
    held
}

/// Reruns construction on the flagged vertices: first upward from their
/// descendants, then downward from their bags.
fn repair(state: &mut IndexState, affected: &[bool]) -> usize {
    let IndexState {
        hierarchy,
        profiles,
        pois,
        k,
    } = state;
    let order = hierarchy.order();
    let tree = hierarchy.tree();
    let shortcuts = hierarchy.shortcuts();

    let mut ranks: Vec<usize> = affected
        .iter()
        .enumerate()
        .filter(|(_, flagged)| **flagged)
        .map(|(vertex, _)| order.rank(vertex))
        .collect();
    ranks.sort_unstable();

    for &rank in &ranks {
        let vertex = order.at(rank);
        absorb(profiles, shortcuts, pois, vertex, tree.descendants(vertex), *k);
    }
    for &rank in ranks.iter().rev() {
        let vertex = order.at(rank);
        absorb(profiles, shortcuts, pois, vertex, tree.bag(vertex), *k);
    }
    ranks.len()
}

/// Withdraws `deleted` and repairs every affected profile.
///
/// Returns the number of vertices whose profile was rebuilt.
#[instrument(name = "update.delete", skip(state))]
pub(crate) fn delete(state: &mut IndexState, deleted: VertexId) -> usize {
    let affected = mark(state, deleted);
    let rebuilt = repair(state, &affected);
    debug!(affected = rebuilt, "deletion applied");
    rebuilt
}

/// Withdraws several points of interest and rebuilds the union of their
/// affected vertices once.
#[instrument(name = "update.batch_delete", skip_all, fields(count = deleted.len()))]
pub(crate) fn batch_delete(state: &mut IndexState, deleted: &[VertexId]) -> usize {
    let mut affected = vec![false; state.vertex_count() + 1];
    for &poi in deleted {
        for (flag, held) in affected.iter_mut().zip(mark(state, poi)) {
            *flag |= held;
        }
    }
    let rebuilt = repair(state, &affected);
    debug!(affected = rebuilt, "batch deletion applied");
    rebuilt
}
