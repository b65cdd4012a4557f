//! Answering queries by merging a vertex's allowed profile entries.

use crate::{
    graph::VertexId,
    label::LabelSet,
    profile::{Neighbour, ProfiledIndex},
};

/// The outcome of merging a vertex's profile for one allowed label set.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Probe {
    pub(crate) results: Vec<Neighbour>,
    /// Label set of the entry the final result came from, or the empty set
    /// when nothing beyond the owner was selected.
    pub(crate) last_labels: LabelSet,
}

impl Probe {
    /// Distance of the final result, or infinity when there are none.
    pub(crate) fn last_distance(&self) -> f64 {
        self.results
            .last()
            .map_or(f64::INFINITY, Neighbour::distance)
    }

    pub(crate) fn count(&self) -> usize {
        self.results.len()
    }
}

/// Selects up to `k` points of interest from the entries of `profile` whose
/// label sets `allowed` contains.
///
/// A point-of-interest owner is reported first at distance zero. Each round
/// takes the strictly closest unselected head among the entries; equal heads
/// resolve in favour of the entry with the smaller label set.
pub(crate) fn probe(
    profile: &ProfiledIndex,
    owner: VertexId,
    owner_is_poi: bool,
    allowed: LabelSet,
    k: usize,
) -> Probe {
    let mut results: Vec<Neighbour> = Vec::with_capacity(k);
    let mut last_labels = LabelSet::EMPTY;
    if owner_is_poi && k > 0 {
        results.push(Neighbour::new(owner, 0.0));
    }
    let mut cursors: Vec<(LabelSet, &[Neighbour])> = profile
        .entries()
        .iter()
        .filter(|entry| allowed.includes(entry.labels()))
        .map(|entry| (entry.labels(), entry.knn()))
        .collect();

    while results.len() < k {
        let mut best: Option<(Neighbour, LabelSet)> = None;
        cursors.retain_mut(|(labels, remaining)| {
            while let Some((head, rest)) = remaining.split_first() {
                if !results.iter().any(|chosen| chosen.vertex() == head.vertex()) {
                    break;
                }
                *remaining = rest;
            }
            let Some(&head) = remaining.first() else {
                return false;
            };
            if best.is_none_or(|(current, _)| head.distance() < current.distance()) {
                best = Some((head, *labels));
            }
            true
        });
        let Some((chosen, labels)) = best else {
            break;
        };
        results.push(chosen);
        last_labels = labels;
    }
    Probe {
        results,
        last_labels,
    }
}
