//! Diff of two partitions of records into groups.

use super::collection::CollectionDiff;
use crate::model::Record;
use serde::Serialize;

/// Position of a record inside a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupSlot {
    pub group: usize,
    pub offset: usize,
}

/// Flatten groups into one sequence, keeping each element's slot.
pub(super) fn flatten_groups<'a>(groups: &'a [Vec<Record>]) -> (Vec<&'a Record>, Vec<GroupSlot>) {
    let mut flat = Vec::new();
    let mut slots = Vec::new();
    for (group, members) in groups.iter().enumerate() {
        for (offset, record) in members.iter().enumerate() {
            flat.push(record);
            slots.push(GroupSlot { group, offset });
        }
    }
    (flat, slots)
}

/// Where a first-partition group ended up in the second partition.
///
/// Only [`GroupPlacement::Intact`] counts as correctly placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroupPlacement {
    /// All elements landed in one target group of the same size
    Intact { target: usize },
    /// At least one element has no counterpart
    MissingElement { unmatched: Vec<usize> },
    /// Elements landed in more than one target group
    Split { targets: Vec<usize> },
    /// The target group holds extra elements
    Expanded {
        target: usize,
        source_size: usize,
        target_size: usize,
    },
    /// The target group is smaller than the source group
    Contracted {
        target: usize,
        source_size: usize,
        target_size: usize,
    },
    /// The source group has no elements, so it has no target
    Empty,
}

impl GroupPlacement {
    #[must_use]
    pub const fn is_misplaced(&self) -> bool {
        !matches!(self, Self::Intact { .. })
    }

    /// Classify one source group from the targets of its elements.
    ///
    /// `targets[k]` is the target slot of the group's `k`-th element.
    fn classify(targets: &[Option<GroupSlot>], target_sizes: &[usize]) -> Self {
        if targets.is_empty() {
            return Self::Empty;
        }
        let unmatched: Vec<usize> = targets
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(k, _)| k)
            .collect();
        if !unmatched.is_empty() {
            return Self::MissingElement { unmatched };
        }

        let mut groups: Vec<usize> = targets.iter().flatten().map(|slot| slot.group).collect();
        groups.sort_unstable();
        groups.dedup();
        if groups.len() != 1 {
            return Self::Split { targets: groups };
        }

        let target = groups[0];
        let source_size = targets.len();
        let target_size = target_sizes[target];
        match target_size.cmp(&source_size) {
            std::cmp::Ordering::Equal => Self::Intact { target },
            std::cmp::Ordering::Greater => Self::Expanded {
                target,
                source_size,
                target_size,
            },
            std::cmp::Ordering::Less => Self::Contracted {
                target,
                source_size,
                target_size,
            },
        }
    }
}

/// Group-level view of a matched pair of partitions.
#[derive(Debug, Clone)]
pub struct GroupedCollectionDiff<'a> {
    m1_groups: &'a [Vec<Record>],
    m2_groups: &'a [Vec<Record>],
    elements: CollectionDiff<'a>,
    placements: Vec<GroupPlacement>,
}

impl<'a> GroupedCollectionDiff<'a> {
    pub(super) fn new(
        m1_groups: &'a [Vec<Record>],
        m2_groups: &'a [Vec<Record>],
        elements: CollectionDiff<'a>,
        m1_slots: &[GroupSlot],
        m2_slots: &[GroupSlot],
    ) -> Self {
        let target_sizes: Vec<usize> = m2_groups.iter().map(Vec::len).collect();
        let mut targets: Vec<Vec<Option<GroupSlot>>> =
            m1_groups.iter().map(|g| Vec::with_capacity(g.len())).collect();
        for (flat, matched) in elements.index_match().iter().enumerate() {
            let source = m1_slots[flat];
            targets[source.group].push(matched.map(|j| m2_slots[j]));
        }
        let placements = targets
            .iter()
            .map(|t| GroupPlacement::classify(t, &target_sizes))
            .collect();

        Self {
            m1_groups,
            m2_groups,
            elements,
            placements,
        }
    }

    #[must_use]
    pub const fn m1_groups(&self) -> &'a [Vec<Record>] {
        self.m1_groups
    }

    #[must_use]
    pub const fn m2_groups(&self) -> &'a [Vec<Record>] {
        self.m2_groups
    }

    /// Element-level diff over the flattened partitions.
    #[must_use]
    pub const fn elements(&self) -> &CollectionDiff<'a> {
        &self.elements
    }

    /// Placement of each first-partition group.
    #[must_use]
    pub fn placements(&self) -> &[GroupPlacement] {
        &self.placements
    }

    #[must_use]
    pub fn n_misplaced_groups(&self) -> usize {
        self.placements.iter().filter(|p| p.is_misplaced()).count()
    }

    /// First-partition groups that were not placed intact.
    #[must_use]
    pub fn misplaced_groups(&self) -> Vec<&'a Vec<Record>> {
        self.placements
            .iter()
            .zip(self.m1_groups)
            .filter(|(placement, _)| placement.is_misplaced())
            .map(|(_, group)| group)
            .collect()
    }

    #[must_use]
    pub fn n_ref_groups(&self) -> usize {
        self.m1_groups.len()
    }

    #[must_use]
    pub fn n_act_groups(&self) -> usize {
        self.m2_groups.len()
    }
}
