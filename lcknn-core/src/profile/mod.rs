//! Per-vertex kNN profiles.
//!
//! A vertex's [`ProfiledIndex`] maps label sets to the closest points of
//! interest reachable using exactly those labels' entries. A query for an
//! allowed set `L` merges the lists of every stored set contained in `L`, so
//! a superset list only keeps candidates that its subsets do not already
//! supply (see [`ProfiledIndex::compensate`]).

mod knn;

use std::{cmp::Ordering, collections::BTreeMap, mem};

use serde::{Deserialize, Serialize};

pub use self::knn::Neighbour;
pub(crate) use self::knn::merge_knn;
use self::knn::{Tagged, compensate_knn};
use crate::{
    graph::VertexId,
    label::LabelSet,
    summary::{PathEntry, PathSummary},
};

/// The candidates recorded for one label set.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ProfileEntry {
    labels: LabelSet,
    knn: Vec<Neighbour>,
}

impl ProfileEntry {
    /// Creates an entry from a distance-sorted candidate list.
    #[must_use]
    pub const fn new(labels: LabelSet, knn: Vec<Neighbour>) -> Self {
        Self { labels, knn }
    }

    /// Returns the label set this entry is keyed by.
    #[must_use]
    pub const fn labels(&self) -> LabelSet {
        self.labels
    }

    /// Returns the candidates in ascending distance order.
    #[must_use]
    pub fn knn(&self) -> &[Neighbour] {
        &self.knn
    }

    pub(crate) const fn knn_mut(&mut self) -> &mut Vec<Neighbour> {
        &mut self.knn
    }
}

/// The label-keyed candidate lists of a single vertex, sorted by label bits.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProfiledIndex {
    entries: Vec<ProfileEntry>,
}

impl ProfiledIndex {
    /// Creates an empty profile.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the entries in ascending label order.
    #[must_use]
    pub fn entries(&self) -> &[ProfileEntry] {
        &self.entries
    }

    /// Returns the number of label sets with candidates.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the profile holds no candidates.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the total number of stored candidates.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.knn.len()).sum()
    }

    /// Returns the candidates stored for exactly `labels`.
    #[must_use]
    pub fn get(&self, labels: LabelSet) -> Option<&[Neighbour]> {
        self.entries
            .binary_search_by_key(&labels, |entry| entry.labels)
            .ok()
            .and_then(|position| self.entries.get(position))
            .map(ProfileEntry::knn)
    }

    pub(crate) const fn entries_mut(&mut self) -> &mut Vec<ProfileEntry> {
        &mut self.entries
    }

    /// Returns `true` when entries are strictly ascending by label and every
    /// list is non-empty.
    pub(crate) fn is_well_formed(&self) -> bool {
        self.entries.iter().all(|entry| !entry.knn.is_empty())
            && self
                .entries
                .windows(2)
                .all(|pair| matches!(pair, [left, right] if left.labels < right.labels))
    }

    /// Merges `other` into `self`, combining the lists of equal label sets.
    pub(crate) fn combine(&mut self, owner: VertexId, other: Self, k: usize) {
        if other.is_empty() {
            return;
        }
        if self.entries.is_empty() {
            self.entries = other.entries;
            return;
        }
        let mut merged = Vec::with_capacity(self.entries.len() + other.entries.len());
        let mut left = mem::take(&mut self.entries).into_iter().peekable();
        let mut right = other.entries.into_iter().peekable();
        loop {
            let order = match (left.peek(), right.peek()) {
                (Some(mine), Some(theirs)) => mine.labels.cmp(&theirs.labels),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => break,
            };
            match order {
                Ordering::Less => merged.extend(left.next()),
                Ordering::Greater => merged.extend(right.next()),
                Ordering::Equal => {
                    if let (Some(mine), Some(theirs)) = (left.next(), right.next()) {
                        merged.push(ProfileEntry {
                            labels: mine.labels,
                            knn: merge_knn(owner, &mine.knn, &theirs.knn, k),
                        });
                    }
                }
            }
        }
        self.entries = merged;
    }

    /// Merges the paths to a newly inserted point of interest into `self`.
    pub(crate) fn combine_path(
        &mut self,
        owner: VertexId,
        paths: &PathSummary,
        inserted: VertexId,
        k: usize,
    ) {
        let received = paths
            .by_labels()
            .into_iter()
            .map(|path| ProfileEntry {
                labels: path.labels(),
                knn: vec![Neighbour::new(inserted, path.distance())],
            })
            .collect();
        self.combine(owner, Self { entries: received }, k);
    }

    /// Extends `neighbour`'s profile by the shortcut `summary` leading to it.
    ///
    /// Every pair of a shortcut entry and a neighbour entry contributes to the
    /// union of their label sets. When `neighbour_poi` is set the neighbour is
    /// itself a point of interest and is reachable through the shortcut alone.
    pub(crate) fn join(
        owner: VertexId,
        summary: &PathSummary,
        neighbour: &Self,
        neighbour_poi: Option<VertexId>,
        k: usize,
    ) -> Self {
        let mut sources: BTreeMap<LabelSet, Vec<(PathEntry, Option<&ProfileEntry>)>> =
            BTreeMap::new();
        for &hop in summary.entries().iter().rev() {
            for entry in neighbour.entries.iter().rev() {
                sources
                    .entry(hop.labels() | entry.labels)
                    .or_default()
                    .push((hop, Some(entry)));
            }
            if neighbour_poi.is_some() {
                sources.entry(hop.labels()).or_default().push((hop, None));
            }
        }

        let mut entries = Vec::with_capacity(sources.len());
        for (labels, pairs) in sources {
            let mut knn = Vec::new();
            for (hop, entry) in pairs {
                let received: Vec<Neighbour> = match entry {
                    None => neighbour_poi
                        .map(|poi| Neighbour::new(poi, hop.distance()))
                        .into_iter()
                        .collect(),
                    Some(entry) => neighbour_poi
                        .map(|poi| Neighbour::new(poi, 0.0))
                        .into_iter()
                        .chain(entry.knn.iter().copied())
                        .take(k)
                        .map(|candidate| candidate.shifted(hop.distance()))
                        .collect(),
                };
                knn = merge_knn(owner, &knn, &received, k);
            }
            if !knn.is_empty() {
                entries.push(ProfileEntry { labels, knn });
            }
        }
        Self { entries }
    }

    /// Removes candidates that subset entries already provide.
    ///
    /// Each entry pushes its candidates into the nearest superset entries;
    /// afterwards every list keeps only its own candidates that survived
    /// among the `k` best. A point of interest reserves one slot for itself.
    pub(crate) fn compensate(&mut self, owner: VertexId, owner_is_poi: bool, k: usize) {
        if self.entries.is_empty() {
            return;
        }
        let parents = self.cover_parents();
        let mut tagged: Vec<Vec<Tagged>> = self
            .entries
            .iter()
            .map(|entry| {
                entry
                    .knn
                    .iter()
                    .map(|&neighbour| Tagged {
                        neighbour,
                        origin: entry.labels,
                    })
                    .collect()
            })
            .collect();
        for (child, targets) in parents.iter().enumerate() {
            for &parent in targets {
                let merged = compensate_knn(owner, &tagged[parent], &tagged[child], k);
                tagged[parent] = merged;
            }
        }

        let limit = if owner_is_poi { k.saturating_sub(1) } else { k };
        for (entry, candidates) in self.entries.iter_mut().zip(tagged) {
            entry.knn = candidates
                .into_iter()
                .take(limit)
                .filter(|candidate| candidate.origin == entry.labels)
                .map(|candidate| candidate.neighbour)
                .collect();
        }
        self.entries.retain(|entry| !entry.knn.is_empty());
    }

    /// For every entry, the later entries that cover it without an
    /// intermediate superset already linked.
    fn cover_parents(&self) -> Vec<Vec<usize>> {
        let count = self.entries.len();
        let mut parents: Vec<Vec<usize>> = vec![Vec::new(); count];
        for child in (0..count.saturating_sub(1)).rev() {
            let labels = self.entries[child].labels;
            let mut covered = vec![false; count];
            let mut chosen = Vec::new();
            for candidate in child + 1..count {
                if covered[candidate] || !self.entries[candidate].labels.includes(labels) {
                    continue;
                }
                covered[candidate] = true;
                for &grandparent in &parents[candidate] {
                    covered[grandparent] = true;
                }
                chosen.push(candidate);
            }
            parents[child] = chosen;
        }
        parents
    }

    /// Removes the first occurrence of `vertex` from every list and drops
    /// emptied entries. Returns whether any occurrence was found.
    pub(crate) fn remove_vertex(&mut self, vertex: VertexId) -> bool {
        let mut found = false;
        for entry in &mut self.entries {
            if let Some(position) = entry.knn.iter().position(|c| c.vertex() == vertex) {
                entry.knn.remove(position);
                found = true;
            }
        }
        self.entries.retain(|entry| !entry.knn.is_empty());
        found
    }

    #[cfg(test)]
    pub(crate) fn from_entries(entries: Vec<ProfileEntry>) -> Self {
        Self { entries }
    }
}
