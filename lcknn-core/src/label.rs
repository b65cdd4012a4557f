//! Bitmask label sets over a universe of at most [`MAX_LABELS`] labels.
//!
//! A [`LabelSet`] is the set of edge labels a path is allowed to use. Sets
//! order by their raw bit pattern, which guarantees that a subset always sorts
//! before any of its supersets; the profile and path-summary algorithms rely
//! on that property.

use std::{fmt, ops::BitOr, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest label universe a [`LabelSet`] can represent.
pub const MAX_LABELS: usize = 32;

const LETTERS: &[u8; MAX_LABELS] = b"abcdefghijklmnopqrstuvwxyzABCDEF";

/// A set of labels drawn from `0..MAX_LABELS`.
///
/// # Examples
/// ```
/// use lcknn_core::LabelSet;
///
/// let ab: LabelSet = "ab".parse().expect("valid labels");
/// let a: LabelSet = "a".parse().expect("valid labels");
/// assert!(ab.includes(a));
/// assert!(!a.includes(ab));
/// assert_eq!((a | ab).to_string(), "ab");
/// ```
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct LabelSet(u32);

impl LabelSet {
    /// The empty label set.
    pub const EMPTY: Self = Self(0);

    /// Wraps a raw bit pattern; bit `i` stands for label `i`.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the set containing only `label`, or `None` when `label` is
    /// outside `0..MAX_LABELS`.
    #[must_use]
    pub const fn single(label: usize) -> Option<Self> {
        if label < MAX_LABELS {
            Some(Self(1 << label))
        } else {
            None
        }
    }

    /// Returns the set of every label in a universe of `label_size` labels.
    #[must_use]
    pub const fn universe(label_size: usize) -> Self {
        if label_size >= MAX_LABELS {
            Self(u32::MAX)
        } else {
            Self((1 << label_size) - 1)
        }
    }

    /// Returns the raw bit pattern.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns the union of both sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `true` when every label of `other` is also in `self`.
    #[must_use]
    pub const fn includes(self, other: Self) -> bool {
        other.0 & !self.0 == 0
    }

    /// Returns the number of labels in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` when the set holds no labels.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the label indices in ascending order.
    pub fn labels(self) -> impl Iterator<Item = usize> {
        (0..MAX_LABELS).filter(move |&label| self.0 & (1 << label) != 0)
    }

    /// Iterates over every subset of a universe of `label_size` labels, the
    /// empty set included, in ascending bit order.
    #[must_use]
    pub fn subsets(label_size: usize) -> LabelSubsets {
        LabelSubsets {
            next: 0,
            end: 1_u64 << label_size.min(MAX_LABELS),
        }
    }
}

impl BitOr for LabelSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for label in self.labels() {
            let letter = LETTERS.get(label).copied().map_or('?', char::from);
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}

/// Error returned when parsing a [`LabelSet`] from text fails.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseLabelSetError {
    /// A character did not name any label.
    #[error("`{label}` does not name a label (expected a-z or A-F)")]
    UnknownLabel {
        /// The rejected character.
        label: char,
    },
}

impl FromStr for LabelSet {
    type Err = ParseLabelSetError;

    /// Parses letters `a`..`z` then `A`..`F` as labels 0..31; `-` denotes the
    /// empty set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == "-" {
            return Ok(Self::EMPTY);
        }
        trimmed.chars().try_fold(Self::EMPTY, |acc, label| {
            LETTERS
                .iter()
                .position(|&letter| char::from(letter) == label)
                .and_then(Self::single)
                .map(|single| acc | single)
                .ok_or(ParseLabelSetError::UnknownLabel { label })
        })
    }
}

/// Iterator returned by [`LabelSet::subsets`].
#[derive(Clone, Debug)]
pub struct LabelSubsets {
    next: u64,
    end: u64,
}

impl Iterator for LabelSubsets {
    type Item = LabelSet;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let bits = u32::try_from(self.next).ok()?;
        self.next += 1;
        Some(LabelSet(bits))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.end - self.next).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn set(text: &str) -> LabelSet {
        text.parse().expect("label text must parse")
    }

    #[rstest]
    #[case("", "-")]
    #[case("-", "-")]
    #[case("a", "a")]
    #[case("ca", "ac")]
    #[case("zF", "zF")]
    fn parses_and_renders(#[case] text: &str, #[case] rendered: &str) {
        assert_eq!(set(text).to_string(), rendered);
    }

    #[test]
    fn rejects_unknown_letters() {
        assert_eq!(
            "a1".parse::<LabelSet>(),
            Err(ParseLabelSetError::UnknownLabel { label: '1' })
        );
    }

    #[rstest]
    #[case("ab", "a", true)]
    #[case("ab", "", true)]
    #[case("a", "ab", false)]
    #[case("b", "a", false)]
    #[case("abc", "ac", true)]
    fn inclusion_matches_set_semantics(
        #[case] outer: &str,
        #[case] inner: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(set(outer).includes(set(inner)), expected);
    }

    #[test]
    fn subsets_sort_before_supersets() {
        for outer in LabelSet::subsets(4) {
            for inner in LabelSet::subsets(4) {
                if outer.includes(inner) {
                    assert!(inner <= outer, "{inner} must not sort after {outer}");
                }
            }
        }
    }

    #[test]
    fn subsets_enumerate_the_power_set() {
        let all: Vec<_> = LabelSet::subsets(3).collect();
        assert_eq!(all.len(), 8);
        assert_eq!(all.first(), Some(&LabelSet::EMPTY));
        assert_eq!(all.last(), Some(&LabelSet::universe(3)));
    }

    #[test]
    fn universe_saturates_at_the_bit_width() {
        assert_eq!(LabelSet::universe(MAX_LABELS).bits(), u32::MAX);
        assert_eq!(LabelSet::universe(2).bits(), 0b11);
        assert!(LabelSet::single(MAX_LABELS).is_none());
    }
}
