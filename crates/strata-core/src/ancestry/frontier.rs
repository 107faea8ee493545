//! Height-ordered max-priority frontier.
//!
//! The dual-BFS in [`super::find_common_ancestor`] needs to explore both
//! sides of the search in lock-step at matching height. The frontier is a
//! sorted multimap keyed by height, supporting the one compound operation
//! that keeps the lock-step invariant: pop *all* references at the current
//! maximum height in one coalesced step.
//!
//! Within a height band, references are deduplicated by target hash —
//! diamond-shaped histories would otherwise enqueue the same parent once
//! per child and dereference it repeatedly.

use std::collections::BTreeMap;

use crate::value::Ref;

/// A max-priority frontier of references, keyed by intrinsic height.
#[derive(Debug, Default)]
pub struct HeightFrontier {
    bands: BTreeMap<u64, Vec<Ref>>,
}

impl HeightFrontier {
    /// Create an empty frontier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a reference. A reference whose target hash is already present
    /// at its height band is dropped.
    pub fn push(&mut self, r: Ref) {
        let band = self.bands.entry(r.height()).or_default();
        if band.iter().all(|held| held.target_hash() != r.target_hash()) {
            band.push(r);
        }
    }

    /// The greatest height currently present, if any.
    #[must_use]
    pub fn max_height(&self) -> Option<u64> {
        self.bands.keys().next_back().copied()
    }

    /// Remove and return every reference at the current maximum height.
    /// Returns an empty vec on an empty frontier.
    pub fn pop_max_band(&mut self) -> Vec<Ref> {
        self.bands
            .pop_last()
            .map(|(_, refs)| refs)
            .unwrap_or_default()
    }

    /// True if no references remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Total number of references across all bands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bands.values().map(Vec::len).sum()
    }
}
