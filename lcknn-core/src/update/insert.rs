//! Grafting a new point of interest into the profiles it improves.

use std::{
    collections::{BTreeMap, BinaryHeap},
    mem,
};

use tracing::{debug, instrument};

use crate::{
    graph::VertexId,
    label::LabelSet,
    profile::{Neighbour, ProfileEntry, ProfiledIndex},
    query::Probe,
    state::IndexState,
    summary::{PathEntry, PathSummary},
};

/// Paths from the inserted vertex and the vertices whose profile it changes.
struct Trace {
    paths: Vec<PathSummary>,
    changed: Vec<bool>,
}

/// Follows the inserted vertex up to its root and back down through the
/// descendants of every vertex it improves, without touching any profile.
fn trace(state: &IndexState, inserted: VertexId) -> Trace {
    let vertex_count = state.vertex_count();
    let order = state.hierarchy.order();
    let tree = state.hierarchy.tree();
    let shortcuts = state.hierarchy.shortcuts();
    let mut paths = vec![PathSummary::new(); vertex_count + 1];
    let mut changed = vec![false; vertex_count + 1];
    changed[inserted] = true;

    let ancestors = tree.ancestors(inserted);
    for &vertex in &ancestors {
        if !changed[vertex] {
            continue;
        }
        for &member in tree.bag(vertex) {
            let extended = extend(&paths, inserted, vertex, shortcuts.get(vertex, member));
            paths[member].merge(extended);
            if !changed[member] && admits(state, member, &mut paths[member]) {
                changed[member] = true;
            }
        }
    }

    let mut queued = vec![false; vertex_count + 1];
    let mut queue = BinaryHeap::new();
    for &vertex in &ancestors {
        if changed[vertex] {
            queued[vertex] = true;
            queue.push(order.rank(vertex));
        }
    }
    while let Some(rank) = queue.pop() {
        let vertex = order.at(rank);
        if vertex != inserted {
            for &member in tree.bag(vertex) {
                if changed[member] {
                    let extended = extend(&paths, inserted, member, shortcuts.get(vertex, member));
                    paths[vertex].merge(extended);
                }
            }
            if !changed[vertex] && admits(state, vertex, &mut paths[vertex]) {
                changed[vertex] = true;
            }
            if !changed[vertex] {
                continue;
            }
        }
        for &descendant in tree.descendants(vertex) {
            if !queued[descendant] {
                queued[descendant] = true;
                queue.push(order.rank(descendant));
            }
        }
    }

    Trace { paths, changed }
}

/// Paths from the inserted vertex through `via` and then along `link`.
fn extend(
    paths: &[PathSummary],
    inserted: VertexId,
    via: VertexId,
    link: &PathSummary,
) -> PathSummary {
    if via == inserted {
        link.clone()
    } else {
        paths[via].concat(link)
    }
}

/// Returns `true` when some path could enter `vertex`'s answer for its label
/// set, dropping the shorter paths before it that cannot.
fn admits(state: &IndexState, vertex: VertexId, paths: &mut PathSummary) -> bool {
    let trigger = paths.entries().iter().position(|path| {
        let probe = state.probe(vertex, path.labels());
        path.distance() < probe.last_distance() || probe.count() < state.k
    });
    match trigger {
        Some(skipped) => {
            paths.drain_front(skipped);
            true
        }
        None => false,
    }
}

/// Frees the slot the new point of interest will take in its own answers.
fn trim_own(state: &mut IndexState, vertex: VertexId) {
    let probes: Vec<Probe> = state.profiles[vertex]
        .entries()
        .iter()
        .map(|entry| state.probe(vertex, entry.labels()))
        .collect();
    let k = state.k;
    let entries = state.profiles[vertex].entries_mut();
    for (entry, probe) in entries.iter_mut().zip(&probes) {
        if probe.count() == k && probe.last_labels == entry.labels() {
            entry.knn_mut().pop();
        }
    }
    entries.retain(|entry| !entry.knn().is_empty());
}

/// Drops the paths that lose to a full answer already stored at `vertex`.
fn discard_dominated(state: &IndexState, vertex: VertexId, paths: &mut PathSummary) {
    paths.retain(|path| {
        let probe = state.probe(vertex, path.labels());
        !(path.distance() >= probe.last_distance() && probe.count() == state.k)
    });
}

/// A label set present in the profile, on the paths, or both.
#[derive(Clone, Copy, Debug)]
struct Slot {
    labels: LabelSet,
    in_profile: bool,
    on_path: bool,
    /// Shortest path whose labels the slot's set contains.
    distance: f64,
}

fn slots(profile: &ProfiledIndex, paths: &PathSummary) -> Vec<Slot> {
    let mut sources: BTreeMap<LabelSet, (bool, bool)> = BTreeMap::new();
    for entry in profile.entries() {
        sources.entry(entry.labels()).or_default().0 = true;
    }
    for path in paths.entries() {
        sources.entry(path.labels()).or_default().1 = true;
    }
    sources
        .into_iter()
        .map(|(labels, (in_profile, on_path))| Slot {
            labels,
            in_profile,
            on_path,
            distance: paths
                .entries()
                .iter()
                .filter(|path| labels.includes(path.labels()))
                .map(PathEntry::distance)
                .fold(f64::INFINITY, f64::min),
        })
        .collect()
}

fn insert_sorted(knn: &mut Vec<Neighbour>, candidate: Neighbour) {
    let position = knn.partition_point(|existing| existing.distance() <= candidate.distance());
    knn.insert(position, candidate);
}

/// Inserts the new point of interest into every entry of `vertex` it now
/// belongs to, evicting displaced candidates and adding entries for label
/// sets only the paths use.
fn graft(state: &mut IndexState, inserted: VertexId, vertex: VertexId, paths: &PathSummary) {
    let slots = slots(&state.profiles[vertex], paths);
    let probes: Vec<Option<Probe>> = slots
        .iter()
        .map(|slot| {
            slot.distance
                .is_finite()
                .then(|| state.probe(vertex, slot.labels))
        })
        .collect();

    let k = state.k;
    let mut existing = mem::take(state.profiles[vertex].entries_mut()).into_iter();
    let mut entries = Vec::with_capacity(slots.len());
    for (slot, probe) in slots.iter().zip(probes) {
        let stored = if slot.in_profile {
            existing.next()
        } else {
            None
        };
        let Some(probe) = probe else {
            entries.extend(stored);
            continue;
        };
        let candidate = Neighbour::new(inserted, slot.distance);
        let Some(mut entry) = stored else {
            entries.push(ProfileEntry::new(slot.labels, vec![candidate]));
            continue;
        };
        let owns_last = probe.last_labels == slot.labels;
        let knn = entry.knn_mut();
        if !slot.on_path {
            if probe.count() == k && slot.distance < probe.last_distance() && owns_last {
                knn.pop();
            }
        } else if probe.count() < k {
            insert_sorted(knn, candidate);
        } else if slot.distance < probe.last_distance() {
            insert_sorted(knn, candidate);
            if owns_last {
                knn.pop();
            }
        }
        if !entry.knn().is_empty() {
            entries.push(entry);
        }
    }
    *state.profiles[vertex].entries_mut() = entries;
}

/// Makes `inserted` a point of interest and repairs every affected profile.
///
/// Returns the number of vertices whose profile was rewritten.
#[instrument(name = "update.insert", skip(state))]
pub(crate) fn insert(state: &mut IndexState, inserted: VertexId) -> usize {
    let Trace { mut paths, changed } = trace(state, inserted);
    let mut affected = 0;
    for (vertex, _) in changed.iter().enumerate().filter(|(_, changed)| **changed) {
        affected += 1;
        if vertex == inserted {
            trim_own(state, vertex);
        } else {
            let path = &mut paths[vertex];
            discard_dominated(state, vertex, path);
            graft(state, inserted, vertex, path);
        }
    }
    state.pois.insert(inserted);
    debug!(affected, "insertion applied");
    affected
}

/// Inserts several points of interest, collecting every path before any
/// profile changes and then rewriting each touched profile once.
#[instrument(name = "update.batch_insert", skip_all, fields(count = inserted.len()))]
pub(crate) fn batch_insert(state: &mut IndexState, inserted: &[VertexId]) -> usize {
    let vertex_count = state.vertex_count();
    let k = state.k;
    let mut received = vec![ProfiledIndex::new(); vertex_count + 1];
    for &poi in inserted {
        let Trace { paths, .. } = trace(state, poi);
        for (vertex, path) in paths.iter().enumerate() {
            if vertex != poi && !path.is_empty() {
                received[vertex].combine_path(vertex, path, poi, k);
            }
        }
    }

    let mut touched = vec![false; vertex_count + 1];
    for (vertex, incoming) in received.into_iter().enumerate() {
        if incoming.is_empty() {
            continue;
        }
        touched[vertex] = true;
        let is_poi = state.pois.contains(vertex);
        let profile = &mut state.profiles[vertex];
        profile.combine(vertex, incoming, k);
        profile.compensate(vertex, is_poi, k);
    }
    for &poi in inserted {
        touched[poi] = true;
        trim_own(state, poi);
        state.pois.insert(poi);
    }
    let affected = touched.iter().filter(|touched| **touched).count();
    debug!(affected, "batch insertion applied");
    affected
}
