//! Pareto summaries of label-constrained path distances.
//!
//! A [`PathSummary`] records, for a pair of vertices, every non-dominated
//! `(distance, labels)` trade-off among the paths connecting them. An entry is
//! dominated when another entry is no longer and uses a subset of its labels.

use crate::label::LabelSet;

/// One `(distance, labels)` trade-off of a [`PathSummary`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathEntry {
    distance: f64,
    labels: LabelSet,
}

impl PathEntry {
    /// Creates an entry for a path of length `distance` using `labels`.
    #[must_use]
    pub const fn new(distance: f64, labels: LabelSet) -> Self {
        Self { distance, labels }
    }

    /// Returns the path length.
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// Returns the labels the path uses.
    #[must_use]
    pub const fn labels(&self) -> LabelSet {
        self.labels
    }

    fn then(self, next: Self) -> Self {
        Self {
            distance: self.distance + next.distance,
            labels: self.labels | next.labels,
        }
    }
}

/// A normalised list of non-dominated [`PathEntry`] values, sorted by
/// ascending distance and then by label bits.
///
/// # Examples
/// ```
/// use lcknn_core::{LabelSet, PathEntry, PathSummary};
///
/// let a: LabelSet = "a".parse().expect("valid labels");
/// let ab: LabelSet = "ab".parse().expect("valid labels");
/// let summary = PathSummary::from_entries([
///     PathEntry::new(5.0, a),
///     PathEntry::new(2.0, ab),
///     PathEntry::new(7.0, ab),
/// ]);
/// // (7, ab) is dominated by (5, a).
/// assert_eq!(summary.len(), 2);
/// assert_eq!(summary.entries()[0], PathEntry::new(2.0, ab));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathSummary {
    entries: Vec<PathEntry>,
}

impl PathSummary {
    /// Creates an empty summary.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates the summary of a single edge.
    #[must_use]
    pub fn edge(weight: f64, label: LabelSet) -> Self {
        Self {
            entries: vec![PathEntry::new(weight, label)],
        }
    }

    /// Creates a normalised summary from arbitrary entries.
    #[must_use]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = PathEntry>,
    {
        let mut summary = Self {
            entries: entries.into_iter().collect(),
        };
        summary.normalise();
        summary
    }

    /// Returns the entries in ascending distance order.
    #[must_use]
    pub fn entries(&self) -> &[PathEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no path is recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the summary of every path formed by following a path of
    /// `self` and then a path of `next`.
    ///
    /// The result is empty when either side is empty.
    #[must_use]
    pub fn concat(&self, next: &Self) -> Self {
        let entries = self
            .entries
            .iter()
            .flat_map(|&first| next.entries.iter().map(move |&second| first.then(second)));
        Self::from_entries(entries)
    }

    /// Adds every entry of `other` and drops whatever became dominated.
    pub fn merge(&mut self, other: Self) {
        if other.is_empty() {
            return;
        }
        self.entries.extend(other.entries);
        self.normalise();
    }

    /// Returns the shortest entry whose labels are allowed by `allowed`.
    #[must_use]
    pub fn best_within(&self, allowed: LabelSet) -> Option<PathEntry> {
        self.entries
            .iter()
            .copied()
            .find(|entry| allowed.includes(entry.labels))
    }

    /// Returns the entries sorted by label bits instead of distance.
    pub(crate) fn by_labels(&self) -> Vec<PathEntry> {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|entry| entry.labels);
        entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [PathEntry] {
        &mut self.entries
    }

    pub(crate) fn retain_indexed<F>(&mut self, mut keep: F)
    where
        F: FnMut(usize, &PathEntry) -> bool,
    {
        let mut index = 0;
        self.entries.retain(|entry| {
            let kept = keep(index, entry);
            index += 1;
            kept
        });
    }

    pub(crate) fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&PathEntry) -> bool,
    {
        self.entries.retain(keep);
    }

    pub(crate) fn drain_front(&mut self, count: usize) {
        self.entries.drain(..count.min(self.entries.len()));
    }

    fn normalise(&mut self) {
        self.entries.sort_by(|left, right| {
            left.distance
                .total_cmp(&right.distance)
                .then(left.labels.cmp(&right.labels))
        });
        let mut kept: Vec<PathEntry> = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if !kept.iter().any(|prior| entry.labels.includes(prior.labels)) {
                kept.push(entry);
            }
        }
        self.entries = kept;
    }
}
