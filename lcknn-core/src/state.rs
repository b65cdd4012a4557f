//! The owned state shared by construction, queries, and updates.

use crate::{
    build::construct,
    graph::VertexId,
    hierarchy::Hierarchy,
    label::LabelSet,
    poi::PoiSet,
    profile::ProfiledIndex,
    query::{Probe, probe},
};

/// Hierarchy, per-vertex profiles, and point-of-interest membership.
#[derive(Clone, Debug)]
pub(crate) struct IndexState {
    pub(crate) hierarchy: Hierarchy,
    pub(crate) profiles: Vec<ProfiledIndex>,
    pub(crate) pois: PoiSet,
    pub(crate) k: usize,
}

impl IndexState {
    pub(crate) fn constructed(hierarchy: Hierarchy, pois: PoiSet, k: usize) -> Self {
        let profiles = construct(&hierarchy, &pois, k);
        Self {
            hierarchy,
            profiles,
            pois,
            k,
        }
    }

    pub(crate) fn vertex_count(&self) -> usize {
        self.hierarchy.order().len()
    }

    /// Merges `vertex`'s profile for `allowed` under the current membership.
    pub(crate) fn probe(&self, vertex: VertexId, allowed: LabelSet) -> Probe {
        probe(
            &self.profiles[vertex],
            vertex,
            self.pois.contains(vertex),
            allowed,
            self.k,
        )
    }

    /// Discards every profile and reruns construction.
    pub(crate) fn reconstruct(&mut self) {
        self.profiles = construct(&self.hierarchy, &self.pois, self.k);
    }
}
