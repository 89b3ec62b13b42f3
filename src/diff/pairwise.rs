//! Leaf-level diff of a single pair of records.

use crate::error::{OrdDiffError, Result};
use crate::model::{Leaf, LeafKind, LeafPath, Record, Side};
use crate::tree::{adapt_tree_diff, AdaptedDiff, TreeDiffer};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Category of a leaf-level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaKind {
    /// Leaf only in the second record
    Addition,
    /// Leaf only in the first record
    Removal,
    /// Leaf present in both with a different value
    Alteration,
}

impl DeltaKind {
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Addition, Self::Removal, Self::Alteration]
    }
}

impl std::fmt::Display for DeltaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Addition => write!(f, "addition"),
            Self::Removal => write!(f, "removal"),
            Self::Alteration => write!(f, "alteration"),
        }
    }
}

/// Leaves covered by one altered node.
#[derive(Debug, Clone)]
pub struct Alteration<'a> {
    /// Leaves of the first record
    pub before: Vec<&'a Leaf>,
    /// Leaves of the second record
    pub after: Vec<&'a Leaf>,
}

/// One row of a leaf-level listing.
///
/// Every leaf of the first record gets a row (`change` is `None` when the
/// leaf is unchanged); every added leaf of the second record gets a row too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeafRow {
    pub from: Side,
    pub path: LeafPath,
    pub leaf_kind: LeafKind,
    pub change: Option<DeltaKind>,
}

/// Categorized leaf diff between two records.
#[derive(Debug, Clone)]
pub struct PairwiseDiff<'a> {
    m1: &'a Record,
    m2: &'a Record,
    added: Vec<&'a Leaf>,
    removed: Vec<&'a Leaf>,
    altered: Vec<Alteration<'a>>,
    distance: f64,
}

impl<'a> PairwiseDiff<'a> {
    /// Diff two records with `differ`.
    pub fn compute(m1: &'a Record, m2: &'a Record, differ: &dyn TreeDiffer) -> Result<Self> {
        let adapted = adapt_tree_diff(&differ.diff(m1.tree(), m2.tree()));
        Self::from_adapted(m1, m2, &adapted)
    }

    /// Resolve an adapted diff's paths to the records' leaves.
    ///
    /// A path that names no leaf means the differ and the flattener disagree
    /// on addressing; it fails with `UnknownLeaf`.
    pub fn from_adapted(m1: &'a Record, m2: &'a Record, adapted: &AdaptedDiff) -> Result<Self> {
        let added = resolve_all(m2, Side::Second, adapted.added.iter())?;
        let removed = resolve_all(m1, Side::First, adapted.removed.iter())?;
        // An alteration that covers no leaf on either side carries nothing.
        let altered = adapted
            .altered
            .iter()
            .filter(|alt| !(alt.before.is_empty() && alt.after.is_empty()))
            .map(|alt| {
                Ok(Alteration {
                    before: resolve_all(m1, Side::First, alt.before.iter())?,
                    after: resolve_all(m2, Side::Second, alt.after.iter())?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            m1,
            m2,
            added,
            removed,
            altered,
            distance: adapted.distance,
        })
    }

    #[must_use]
    pub const fn m1(&self) -> &'a Record {
        self.m1
    }

    #[must_use]
    pub const fn m2(&self) -> &'a Record {
        self.m2
    }

    /// Normalized distance in `[0, 1]`.
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    #[must_use]
    pub fn added(&self) -> &[&'a Leaf] {
        &self.added
    }

    #[must_use]
    pub fn removed(&self) -> &[&'a Leaf] {
        &self.removed
    }

    #[must_use]
    pub fn altered(&self) -> &[Alteration<'a>] {
        &self.altered
    }

    /// Leaves of one category. Alterations yield their first-record side.
    #[must_use]
    pub fn leaves(&self, kind: DeltaKind) -> Vec<&'a Leaf> {
        match kind {
            DeltaKind::Addition => self.added.clone(),
            DeltaKind::Removal => self.removed.clone(),
            DeltaKind::Alteration => self
                .altered
                .iter()
                .flat_map(|alt| alt.before.iter().copied())
                .collect(),
        }
    }

    /// Second-record leaves of all alterations.
    #[must_use]
    pub fn altered_after(&self) -> Vec<&'a Leaf> {
        self.altered
            .iter()
            .flat_map(|alt| alt.after.iter().copied())
            .collect()
    }

    #[must_use]
    pub fn paths(&self, kind: DeltaKind) -> Vec<&'a LeafPath> {
        self.leaves(kind).into_iter().map(|leaf| &leaf.path).collect()
    }

    #[must_use]
    pub fn count(&self, kind: DeltaKind) -> usize {
        match kind {
            DeltaKind::Addition => self.added.len(),
            DeltaKind::Removal => self.removed.len(),
            DeltaKind::Alteration => self.altered.iter().map(|alt| alt.before.len()).sum(),
        }
    }

    #[must_use]
    pub fn counts(&self) -> BTreeMap<DeltaKind, usize> {
        DeltaKind::all()
            .iter()
            .map(|&kind| (kind, self.count(kind)))
            .collect()
    }

    /// Whether the records are structurally equal.
    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.altered.is_empty()
    }

    /// One row per first-record leaf, then one per added leaf.
    #[must_use]
    pub fn leaf_rows(&self) -> Vec<LeafRow> {
        let removed: HashSet<&LeafPath> = self.removed.iter().map(|l| &l.path).collect();
        let altered: HashSet<&LeafPath> = self
            .altered
            .iter()
            .flat_map(|alt| alt.before.iter().map(|l| &l.path))
            .collect();

        let first = self.m1.leaves().iter().map(|leaf| {
            let change = if removed.contains(&leaf.path) {
                Some(DeltaKind::Removal)
            } else if altered.contains(&leaf.path) {
                Some(DeltaKind::Alteration)
            } else {
                None
            };
            LeafRow {
                from: Side::First,
                path: leaf.path.clone(),
                leaf_kind: leaf.kind(),
                change,
            }
        });
        let second = self.added.iter().map(|leaf| LeafRow {
            from: Side::Second,
            path: leaf.path.clone(),
            leaf_kind: leaf.kind(),
            change: Some(DeltaKind::Addition),
        });

        first.chain(second).collect()
    }
}

fn resolve_all<'a, 'p>(
    record: &'a Record,
    side: Side,
    paths: impl Iterator<Item = &'p LeafPath>,
) -> Result<Vec<&'a Leaf>> {
    paths
        .map(|path| {
            record
                .leaf(path)
                .ok_or_else(|| OrdDiffError::unknown_leaf(path.clone(), side))
        })
        .collect()
}
