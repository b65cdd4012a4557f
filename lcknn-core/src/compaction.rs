//! Compaction of raw edge label codes into a small label universe.
//!
//! Road datasets carry many fine-grained edge classes. Queries enumerate
//! subsets of the universe, so the codes are grouped into a handful of
//! labels: codes are ranked by frequency and the rarest codes share the
//! first label, the next rarest the second, and so on.

use std::collections::BTreeMap;

use tracing::warn;

use crate::{
    error::{IndexError, Result},
    label::{LabelSet, MAX_LABELS},
};

/// Mapping from raw label codes to compacted [`LabelSet`]s.
///
/// # Examples
/// ```
/// use lcknn_core::LabelCompaction;
///
/// let compaction = LabelCompaction::compute([7, 7, 7, 3, 3, 9], 2).expect("valid size");
/// assert_eq!(compaction.label_size(), 2);
/// // The rarest code (9) and the next rarest (3) form the first group.
/// assert_eq!(compaction.label_for(9), compaction.label_for(3));
/// assert_ne!(compaction.label_for(9), compaction.label_for(7));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LabelCompaction {
    mapping: BTreeMap<u32, LabelSet>,
    label_size: usize,
    requested: usize,
}

impl LabelCompaction {
    /// Groups the codes produced by `codes` into `requested` labels.
    ///
    /// When fewer distinct codes exist than labels requested, each code keeps
    /// its own label and the universe shrinks to the number of distinct codes.
    /// Otherwise codes are sorted by ascending `(frequency, code)` and label
    /// `i` receives the next `ceil((distinct - i) / requested)` codes.
    ///
    /// # Errors
    /// Returns [`IndexError::InvalidLabelSize`] when `requested` is zero or
    /// exceeds [`MAX_LABELS`].
    pub fn compute<I>(codes: I, requested: usize) -> Result<Self>
    where
        I: IntoIterator<Item = u32>,
    {
        if requested == 0 || requested > MAX_LABELS {
            return Err(IndexError::InvalidLabelSize {
                got: requested,
                max: MAX_LABELS,
            });
        }
        let mut frequency: BTreeMap<u32, usize> = BTreeMap::new();
        for code in codes {
            *frequency.entry(code).or_default() += 1;
        }
        let distinct = frequency.len();
        if distinct == 0 {
            return Ok(Self {
                mapping: BTreeMap::new(),
                label_size: requested,
                requested,
            });
        }
        if distinct < requested {
            warn!(
                requested,
                distinct, "fewer distinct edge labels than requested; shrinking label universe"
            );
            let mapping = frequency
                .keys()
                .zip(0..)
                .filter_map(|(&code, bit)| LabelSet::single(bit).map(|label| (code, label)))
                .collect();
            return Ok(Self {
                mapping,
                label_size: distinct,
                requested,
            });
        }

        let mut ranked: Vec<(usize, u32)> = frequency
            .into_iter()
            .map(|(code, count)| (count, code))
            .collect();
        ranked.sort_unstable();
        let mut mapping = BTreeMap::new();
        let mut remaining = ranked.into_iter();
        for group in 0..requested {
            let Some(label) = LabelSet::single(group) else {
                break;
            };
            let take = (distinct - group).div_ceil(requested);
            for (_, code) in remaining.by_ref().take(take) {
                mapping.insert(code, label);
            }
        }
        Ok(Self {
            mapping,
            label_size: requested,
            requested,
        })
    }

    /// Returns the compacted label for `code`, if the code was seen.
    #[must_use]
    pub fn label_for(&self, code: u32) -> Option<LabelSet> {
        self.mapping.get(&code).copied()
    }

    /// Returns the size of the compacted universe.
    #[must_use]
    pub const fn label_size(&self) -> usize {
        self.label_size
    }

    /// Returns the label count the caller asked for.
    #[must_use]
    pub const fn requested(&self) -> usize {
        self.requested
    }

    /// Returns `true` when the universe had to shrink below the request.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.label_size < self.requested
    }

    /// Iterates over `(code, label)` pairs in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, LabelSet)> + '_ {
        self.mapping.iter().map(|(&code, &label)| (code, label))
    }
}
