//! Two-pass construction of every vertex's profile.

use tracing::{debug, instrument};

use crate::{
    graph::VertexId,
    hierarchy::{Hierarchy, ShortcutTable},
    poi::PoiSet,
    profile::ProfiledIndex,
};

/// Builds the profiles of every vertex from scratch.
///
/// The upward pass runs in ascending rank: a vertex's profile is final with
/// respect to its subtree once all lower ranks have pushed into it, so it is
/// compensated and pushed to its bag. The downward pass runs in descending
/// rank and pulls the completed profiles of bag members back down.
#[instrument(
    name = "index.construct",
    skip(hierarchy, pois),
    fields(vertices = hierarchy.order().len(), pois = pois.len())
)]
pub(crate) fn construct(hierarchy: &Hierarchy, pois: &PoiSet, k: usize) -> Vec<ProfiledIndex> {
    let order = hierarchy.order();
    let tree = hierarchy.tree();
    let shortcuts = hierarchy.shortcuts();
    let mut profiles = vec![ProfiledIndex::new(); order.len() + 1];

    for rank in 1..=order.len() {
        let vertex = order.at(rank);
        let poi = pois.as_option(vertex);
        profiles[vertex].compensate(vertex, poi.is_some(), k);
        for &member in tree.bag(vertex) {
            let joined = ProfiledIndex::join(
                member,
                shortcuts.get(vertex, member),
                &profiles[vertex],
                poi,
                k,
            );
            profiles[member].combine(member, joined, k);
        }
    }
    debug!("upward pass complete");

    for rank in (1..=order.len()).rev() {
        let vertex = order.at(rank);
        absorb(&mut profiles, shortcuts, pois, vertex, tree.bag(vertex), k);
    }

    profiles
}

/// Combines into `vertex`'s profile the profiles of `sources` joined with the
/// shortcut from `vertex` to each source, then compensates it.
pub(crate) fn absorb(
    profiles: &mut [ProfiledIndex],
    shortcuts: &ShortcutTable,
    pois: &PoiSet,
    vertex: VertexId,
    sources: &[VertexId],
    k: usize,
) {
    for &source in sources {
        let joined = ProfiledIndex::join(
            vertex,
            shortcuts.get(vertex, source),
            &profiles[source],
            pois.as_option(source),
            k,
        );
        profiles[vertex].combine(vertex, joined, k);
    }
    profiles[vertex].compensate(vertex, pois.contains(vertex), k);
}
