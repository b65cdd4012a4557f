//! Bounded merges of sorted candidate lists.

use serde::{Deserialize, Serialize};

use crate::{graph::VertexId, label::LabelSet};

/// A point of interest together with its distance from a list's owner.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Neighbour {
    vertex: VertexId,
    distance: f64,
}

impl Neighbour {
    /// Creates a neighbour at `distance`.
    #[must_use]
    pub const fn new(vertex: VertexId, distance: f64) -> Self {
        Self { vertex, distance }
    }

    /// Returns the point of interest.
    #[must_use]
    pub const fn vertex(&self) -> VertexId {
        self.vertex
    }

    /// Returns the distance from the list's owner.
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    pub(crate) fn shifted(self, offset: f64) -> Self {
        Self {
            vertex: self.vertex,
            distance: self.distance + offset,
        }
    }
}

/// A neighbour tagged with the label set of the list it came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Tagged {
    pub(crate) neighbour: Neighbour,
    pub(crate) origin: LabelSet,
}

fn holds(list: &[Neighbour], vertex: VertexId) -> bool {
    list.iter().any(|candidate| candidate.vertex == vertex)
}

fn holds_tagged(list: &[Tagged], vertex: VertexId) -> bool {
    list.iter().any(|candidate| candidate.neighbour.vertex == vertex)
}

/// Merges two distance-sorted lists into the `k` closest distinct vertices,
/// never listing `owner`.
///
/// On equal distances the entry from `own` is taken first and the entry from
/// `received` follows when it names a different vertex.
pub(crate) fn merge_knn(
    owner: VertexId,
    own: &[Neighbour],
    received: &[Neighbour],
    k: usize,
) -> Vec<Neighbour> {
    let mut merged: Vec<Neighbour> = Vec::with_capacity(k.min(own.len() + received.len()));
    let mut left = own.iter().copied().peekable();
    let mut right = received.iter().copied().peekable();
    let skip = |merged: &[Neighbour], candidate: Neighbour| {
        candidate.vertex == owner || holds(merged, candidate.vertex)
    };
    while merged.len() < k {
        match (left.peek().copied(), right.peek().copied()) {
            (Some(mine), Some(theirs)) => {
                if skip(&merged, mine) {
                    left.next();
                } else if skip(&merged, theirs) {
                    right.next();
                } else if mine.distance < theirs.distance {
                    merged.push(mine);
                    left.next();
                } else if theirs.distance < mine.distance {
                    merged.push(theirs);
                    right.next();
                } else {
                    merged.push(mine);
                    if merged.len() < k && !holds(&merged, theirs.vertex) {
                        merged.push(theirs);
                    }
                    left.next();
                    right.next();
                }
            }
            (Some(mine), None) => {
                if !skip(&merged, mine) {
                    merged.push(mine);
                }
                left.next();
            }
            (None, Some(theirs)) => {
                if !skip(&merged, theirs) {
                    merged.push(theirs);
                }
                right.next();
            }
            (None, None) => break,
        }
    }
    merged
}

/// Merges a subset list's tagged candidates into a superset list.
///
/// Unlike [`merge_knn`], ties favour the received entry, so a candidate that
/// a subset list already provides wins over the superset's own copy.
pub(crate) fn compensate_knn(
    owner: VertexId,
    own: &[Tagged],
    received: &[Tagged],
    k: usize,
) -> Vec<Tagged> {
    let mut merged: Vec<Tagged> = Vec::with_capacity(k.min(own.len() + received.len()));
    let mut left = own.iter().copied().peekable();
    let mut right = received.iter().copied().peekable();
    let skip = |merged: &[Tagged], candidate: Tagged| {
        candidate.neighbour.vertex == owner || holds_tagged(merged, candidate.neighbour.vertex)
    };
    while merged.len() < k {
        match (left.peek().copied(), right.peek().copied()) {
            (Some(mine), Some(theirs)) => {
                if skip(&merged, mine) {
                    left.next();
                } else if skip(&merged, theirs) {
                    right.next();
                } else if mine.neighbour.distance < theirs.neighbour.distance {
                    merged.push(mine);
                    left.next();
                } else {
                    merged.push(theirs);
                    right.next();
                }
            }
            (Some(mine), None) => {
                if !skip(&merged, mine) {
                    merged.push(mine);
                }
                left.next();
            }
            (None, Some(theirs)) => {
                if !skip(&merged, theirs) {
                    merged.push(theirs);
                }
                right.next();
            }
            (None, None) => break,
        }
    }
    merged
}
