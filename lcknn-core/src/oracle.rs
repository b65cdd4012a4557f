//! Exhaustive label-constrained search used to check index answers.
//!
//! Nothing on the query or update path calls into this module.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::{
    graph::{LabelledGraph, VertexId},
    index::LcIndex,
    label::LabelSet,
    poi::PoiSet,
    profile::Neighbour,
};

/// Largest per-result distance difference accepted by [`LcIndex::verify`].
pub const DISTANCE_TOLERANCE: f64 = 1e-8;

#[derive(Clone, Copy, Debug)]
struct Frontier {
    distance: f64,
    vertex: VertexId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.vertex.cmp(&other.vertex))
    }
}

/// Returns up to `k` points of interest nearest to `source` using only edges
/// whose label `labels` contains, settled in Dijkstra order.
///
/// A point-of-interest source is reported at distance zero.
#[must_use]
pub fn label_constrained_knn(
    graph: &LabelledGraph,
    pois: &PoiSet,
    source: VertexId,
    labels: LabelSet,
    k: usize,
) -> Vec<Neighbour> {
    let mut found = Vec::with_capacity(k);
    if graph.check_vertex(source).is_err() || k == 0 {
        return found;
    }
    let mut distance = vec![f64::INFINITY; graph.vertex_count() + 1];
    let mut settled = vec![false; graph.vertex_count() + 1];
    let mut heap = BinaryHeap::new();
    distance[source] = 0.0;
    heap.push(Reverse(Frontier {
        distance: 0.0,
        vertex: source,
    }));
    while let Some(Reverse(Frontier { distance: reached, vertex })) = heap.pop() {
        if settled[vertex] {
            continue;
        }
        settled[vertex] = true;
        if pois.contains(vertex) {
            found.push(Neighbour::new(vertex, reached));
            if found.len() == k {
                break;
            }
        }
        for edge in graph.edges(vertex) {
            let candidate = reached + edge.weight();
            if labels.includes(edge.label()) && candidate < distance[edge.target()] {
                distance[edge.target()] = candidate;
                heap.push(Reverse(Frontier {
                    distance: candidate,
                    vertex: edge.target(),
                }));
            }
        }
    }
    found
}

/// A query whose index answer disagreed with the exhaustive search.
#[derive(Clone, Debug, PartialEq)]
pub struct Mismatch {
    /// Source vertex of the query.
    pub vertex: VertexId,
    /// Allowed labels of the query.
    pub labels: LabelSet,
    /// Answer of the exhaustive search.
    pub expected: Vec<Neighbour>,
    /// Answer of the index.
    pub found: Vec<Neighbour>,
}

/// Outcome of [`LcIndex::verify`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VerificationReport {
    checked: usize,
    mismatches: Vec<Mismatch>,
}

impl VerificationReport {
    /// Returns the number of `(vertex, label set)` queries compared.
    #[must_use]
    pub const fn checked(&self) -> usize {
        self.checked
    }

    /// Returns the disagreeing queries in vertex then label order.
    #[must_use]
    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    /// Returns `true` when every compared query agreed.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Returns `true` when both answers have the same length and agree on every
/// distance. Vertices at equal distance may appear in either order.
#[must_use]
pub fn answers_agree(expected: &[Neighbour], found: &[Neighbour]) -> bool {
    expected.len() == found.len()
        && expected
            .iter()
            .zip(found)
            .all(|(left, right)| (left.distance() - right.distance()).abs() <= DISTANCE_TOLERANCE)
}

impl LcIndex {
    /// Compares the answer of every vertex under every label set against
    /// [`label_constrained_knn`].
    #[instrument(
        name = "oracle.verify",
        skip(self),
        fields(vertices = self.graph().vertex_count(), label_size = self.graph().label_size())
    )]
    #[must_use]
    pub fn verify(&self) -> VerificationReport {
        let subsets: Vec<LabelSet> = LabelSet::subsets(self.graph().label_size()).collect();
        let check = |vertex: VertexId| -> Vec<Mismatch> {
            subsets
                .iter()
                .filter_map(|&labels| self.check_query(vertex, labels))
                .collect()
        };

        #[cfg(feature = "parallel")]
        let mismatches: Vec<Mismatch> = self
            .graph()
            .vertices()
            .into_par_iter()
            .flat_map_iter(check)
            .collect();
        #[cfg(not(feature = "parallel"))]
        let mismatches: Vec<Mismatch> = self.graph().vertices().flat_map(check).collect();

        let report = VerificationReport {
            checked: self.graph().vertex_count() * subsets.len(),
            mismatches,
        };
        if report.is_consistent() {
            info!(checked = report.checked, "index agrees with exhaustive search");
        } else {
            warn!(
                checked = report.checked,
                mismatches = report.mismatches.len(),
                "index disagrees with exhaustive search"
            );
        }
        report
    }

    fn check_query(&self, vertex: VertexId, labels: LabelSet) -> Option<Mismatch> {
        let found = self.query(vertex, labels).ok()?;
        let expected = label_constrained_knn(self.graph(), self.pois(), vertex, labels, self.k());
        (!answers_agree(&expected, &found)).then(|| Mismatch {
            vertex,
            labels,
            expected,
            found,
        })
    }
}
