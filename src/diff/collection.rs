//! Diff of two unordered collections of records.

use super::pairwise::{DeltaKind, LeafRow, PairwiseDiff};
use crate::matching::Assignment;
use crate::model::Record;
use serde::Serialize;
use std::collections::BTreeMap;

/// A leaf row tagged with the index of the first-collection record it came
/// from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionLeafRow {
    pub pair: usize,
    #[serde(flatten)]
    pub row: LeafRow,
}

/// Correspondence between two collections plus the diff of every matched
/// pair.
///
/// `pair_diffs` is aligned with `m1`; entry `i` is `None` exactly when record
/// `i` has no counterpart.
#[derive(Debug, Clone)]
pub struct CollectionDiff<'a> {
    m1: Vec<&'a Record>,
    m2: Vec<&'a Record>,
    index_match: Assignment,
    pair_diffs: Vec<Option<PairwiseDiff<'a>>>,
    n_altered: usize,
}

impl<'a> CollectionDiff<'a> {
    pub(super) fn new(
        m1: Vec<&'a Record>,
        m2: Vec<&'a Record>,
        index_match: Assignment,
        pair_diffs: Vec<Option<PairwiseDiff<'a>>>,
    ) -> Self {
        debug_assert_eq!(pair_diffs.len(), m1.len());
        let n_altered = pair_diffs
            .iter()
            .flatten()
            .filter(|diff| diff.distance() > 0.0)
            .count();
        Self {
            m1,
            m2,
            index_match,
            pair_diffs,
            n_altered,
        }
    }

    #[must_use]
    pub fn m1(&self) -> &[&'a Record] {
        &self.m1
    }

    #[must_use]
    pub fn m2(&self) -> &[&'a Record] {
        &self.m2
    }

    /// Counterpart in `m2` of each record in `m1`.
    #[must_use]
    pub fn index_match(&self) -> &[Option<usize>] {
        &self.index_match.matches
    }

    #[must_use]
    pub const fn assignment(&self) -> &Assignment {
        &self.index_match
    }

    #[must_use]
    pub fn pair_diffs(&self) -> &[Option<PairwiseDiff<'a>>] {
        &self.pair_diffs
    }

    /// Matched pairs whose distance is above zero.
    #[must_use]
    pub const fn n_altered(&self) -> usize {
        self.n_altered
    }

    /// First-collection records that cannot have a counterpart.
    #[must_use]
    pub fn n_absent(&self) -> usize {
        self.m1.len().saturating_sub(self.m2.len())
    }

    /// Second-collection records that cannot have a counterpart.
    #[must_use]
    pub fn n_excess(&self) -> usize {
        self.m2.len().saturating_sub(self.m1.len())
    }

    #[must_use]
    pub fn n_matched(&self) -> usize {
        self.index_match.n_matched()
    }

    /// Pair distance for each record in `m1`, `None` when unmatched.
    #[must_use]
    pub fn distances(&self) -> Vec<Option<f64>> {
        self.pair_diffs
            .iter()
            .map(|diff| diff.as_ref().map(PairwiseDiff::distance))
            .collect()
    }

    /// Element-level change counts: excess records count as additions,
    /// absent records as removals and altered pairs as alterations.
    #[must_use]
    pub fn element_counts(&self) -> BTreeMap<DeltaKind, usize> {
        BTreeMap::from([
            (DeltaKind::Addition, self.n_excess()),
            (DeltaKind::Removal, self.n_absent()),
            (DeltaKind::Alteration, self.n_altered),
        ])
    }

    /// Whether every record has an identical counterpart.
    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.m1.len() == self.m2.len()
            && self
                .pair_diffs
                .iter()
                .all(|diff| diff.as_ref().is_some_and(PairwiseDiff::is_identical))
    }

    /// Leaf rows of every matched pair.
    #[must_use]
    pub fn leaf_rows(&self) -> Vec<CollectionLeafRow> {
        self.pair_diffs
            .iter()
            .enumerate()
            .filter_map(|(pair, diff)| diff.as_ref().map(|diff| (pair, diff)))
            .flat_map(|(pair, diff)| {
                diff.leaf_rows()
                    .into_iter()
                    .map(move |row| CollectionLeafRow { pair, row })
            })
            .collect()
    }
}
