//! Record diff engine implementation.

use super::collection::CollectionDiff;
use super::cost::CostModel;
use super::grouped::{flatten_groups, GroupedCollectionDiff};
use super::pairwise::PairwiseDiff;
use crate::config::AppConfig;
use crate::error::{ErrorContext, OrdDiffError, Result};
use crate::matching::{match_indices, Assignment, MatchingConfig};
use crate::model::{Record, Side};
use crate::tree::{DeepDiffer, TreeDiffer};
use tracing::{debug, info_span};

/// Diff engine for comparing records, collections and grouped collections.
pub struct DiffEngine {
    differ: Box<dyn TreeDiffer>,
    cost_model: CostModel,
    matching: MatchingConfig,
}

impl std::fmt::Debug for DiffEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffEngine")
            .field("differ", &self.differ.name())
            .field("cost_model", &self.cost_model)
            .field("matching", &self.matching)
            .finish()
    }
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffEngine {
    /// Create a new diff engine with default settings
    pub fn new() -> Self {
        Self {
            differ: Box::new(DeepDiffer::new()),
            cost_model: CostModel::default(),
            matching: MatchingConfig::default(),
        }
    }

    /// Create a diff engine from application configuration
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new()
            .with_differ(Box::new(DeepDiffer::with_config(config.differ.clone())))
            .with_matching_config(config.matching.clone())
    }

    /// Use a custom tree differ
    pub fn with_differ(mut self, differ: Box<dyn TreeDiffer>) -> Self {
        self.differ = differ;
        self
    }

    /// Use a custom cost model
    pub fn with_cost_model(mut self, cost_model: CostModel) -> Self {
        self.cost_model = cost_model;
        self
    }

    /// Set matching configuration; its name weight replaces the cost model's
    pub fn with_matching_config(mut self, config: MatchingConfig) -> Self {
        self.cost_model.name_weight = config.name_weight;
        self.matching = config;
        self
    }

    pub fn differ(&self) -> &dyn TreeDiffer {
        self.differ.as_ref()
    }

    pub const fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    pub const fn matching_config(&self) -> &MatchingConfig {
        &self.matching
    }

    /// Diff a single pair of records
    pub fn diff_records<'a>(&self, m1: &'a Record, m2: &'a Record) -> Result<PairwiseDiff<'a>> {
        PairwiseDiff::compute(m1, m2, self.differ.as_ref())
    }

    /// Matching cost of a pair of records.
    ///
    /// Both records must be named; a missing name is reported at index 0 of
    /// its side.
    pub fn pair_distance(&self, x: &Record, y: &Record) -> Result<f64> {
        let first = x.name().ok_or_else(|| OrdDiffError::missing_name(Side::First, 0))?;
        let second = y.name().ok_or_else(|| OrdDiffError::missing_name(Side::Second, 0))?;
        Ok(self.cost_model.pair_distance(
            self.differ.as_ref(),
            (first, x.tree()),
            (second, y.tree()),
        ))
    }

    /// Minimum-cost correspondence between two collections
    pub fn match_records(&self, xs: &[&Record], ys: &[&Record]) -> Result<Assignment> {
        let left = named(xs, Side::First)?;
        let right = named(ys, Side::Second)?;
        let differ = self.differ.as_ref();

        let assignment = match_indices(&left, &right, &self.matching, |a, b| {
            Ok(self.cost_model.pair_distance(differ, *a, *b))
        })?;
        debug!(
            n = xs.len(),
            m = ys.len(),
            matched = assignment.n_matched(),
            total_cost = assignment.total_cost,
            method = %assignment.method,
            "Matched collections"
        );
        Ok(assignment)
    }

    /// Match two collections and diff every matched pair
    pub fn diff_collection<'a>(
        &self,
        xs: &'a [Record],
        ys: &'a [Record],
    ) -> Result<CollectionDiff<'a>> {
        self.diff_collection_refs(xs.iter().collect(), ys.iter().collect())
    }

    fn diff_collection_refs<'a>(
        &self,
        xs: Vec<&'a Record>,
        ys: Vec<&'a Record>,
    ) -> Result<CollectionDiff<'a>> {
        let _span = info_span!("diff_collection", n = xs.len(), m = ys.len()).entered();

        let assignment = self.match_records(&xs, &ys)?;
        let pair_diffs = assignment
            .matches
            .iter()
            .enumerate()
            .map(|(i, matched)| {
                matched
                    .map(|j| {
                        self.diff_records(xs[i], ys[j])
                            .with_context(|| format!("diffing pair {i} -> {j}"))
                    })
                    .transpose()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CollectionDiff::new(xs, ys, assignment, pair_diffs))
    }

    /// Match two partitions element-wise and report group placement
    pub fn diff_groups<'a>(
        &self,
        groups1: &'a [Vec<Record>],
        groups2: &'a [Vec<Record>],
    ) -> Result<GroupedCollectionDiff<'a>> {
        let _span = info_span!(
            "diff_groups",
            ref_groups = groups1.len(),
            act_groups = groups2.len()
        )
        .entered();

        let (flat1, slots1) = flatten_groups(groups1);
        let (flat2, slots2) = flatten_groups(groups2);
        let elements = self.diff_collection_refs(flat1, flat2)?;
        let grouped = GroupedCollectionDiff::new(groups1, groups2, elements, &slots1, &slots2);

        debug!(
            misplaced = grouped.n_misplaced_groups(),
            "Classified group placement"
        );
        Ok(grouped)
    }
}

/// Pair each record with its name, failing on the first unnamed record.
fn named<'a>(records: &[&'a Record], side: Side) -> Result<Vec<(&'a str, &'a serde_json::Value)>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            record
                .name()
                .map(|name| (name, record.tree()))
                .ok_or_else(|| OrdDiffError::missing_name(side, index))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{DeltaKind, GroupPlacement};
    use crate::error::MatchingErrorKind;
    use crate::matching::OversizeStrategy;
    use serde_json::json;

    fn compound(name: &str, role: &str) -> Record {
        Record::new(json!({
            "identifiers": [{"type": "NAME", "value": name}],
            "reactionRole": role
        }))
    }

    #[test]
    fn test_diff_records_identity() {
        let engine = DiffEngine::new();
        let m = compound("water", "SOLVENT");
        let diff = engine.diff_records(&m, &m).unwrap();
        assert!(diff.is_identical());
        assert_eq!(diff.distance(), 0.0);
    }

    #[test]
    fn test_collection_matches_by_name_over_structure() {
        let engine = DiffEngine::new();
        let xs = vec![compound("water", "SOLVENT"), compound("ethanol", "REACTANT")];
        let ys = vec![compound("ethanol", "SOLVENT"), compound("water", "SOLVENT")];
        let diff = engine.diff_collection(&xs, &ys).unwrap();

        assert_eq!(diff.index_match(), &[Some(1), Some(0)]);
        assert_eq!(diff.n_altered(), 1);
        assert_eq!(diff.n_absent(), 0);
        assert_eq!(diff.n_excess(), 0);
        assert_eq!(diff.distances()[0], Some(0.0));
        assert_eq!(diff.element_counts()[&DeltaKind::Alteration], 1);
    }

    #[test]
    fn test_collection_absent_and_excess() {
        let engine = DiffEngine::new();
        let xs = vec![compound("a", "REACTANT"), compound("b", "REACTANT"), compound("c", "REACTANT")];
        let ys = vec![compound("b", "REACTANT")];
        let diff = engine.diff_collection(&xs, &ys).unwrap();

        assert_eq!(diff.index_match(), &[None, Some(0), None]);
        assert_eq!(diff.n_absent(), 2);
        assert_eq!(diff.n_excess(), 0);
        assert!(diff.pair_diffs()[0].is_none());
        assert!(diff.pair_diffs()[1].is_some());

        let reversed = engine.diff_collection(&ys, &xs).unwrap();
        assert_eq!(reversed.n_excess(), 2);
        assert_eq!(reversed.n_absent(), 0);
    }

    #[test]
    fn test_missing_name_fails_fast() {
        let engine = DiffEngine::new();
        let xs = vec![compound("a", "REACTANT")];
        let ys = vec![compound("a", "REACTANT"), Record::new(json!({"reactionRole": "SOLVENT"}))];
        let err = engine.diff_collection(&xs, &ys).unwrap_err();
        assert!(matches!(
            err,
            OrdDiffError::Matching {
                source: MatchingErrorKind::MissingName {
                    side: Side::Second,
                    index: 1
                },
                ..
            }
        ));
    }

    #[test]
    fn test_pair_distance_requires_names() {
        let engine = DiffEngine::new();
        let named = compound("a", "REACTANT");
        let unnamed = Record::new(json!({"x": 1}));
        assert!(engine.pair_distance(&named, &unnamed).is_err());
        assert_eq!(engine.pair_distance(&named, &named).unwrap(), 0.0);
    }

    #[test]
    fn test_diff_groups_expanded_group() {
        let engine = DiffEngine::new();
        let groups1 = vec![
            vec![compound("A", "REACTANT"), compound("B", "REACTANT")],
            vec![compound("C", "SOLVENT")],
        ];
        let groups2 = vec![
            vec![compound("A", "REACTANT"), compound("B", "REACTANT"), compound("D", "REACTANT")],
            vec![compound("C", "SOLVENT")],
        ];
        let diff = engine.diff_groups(&groups1, &groups2).unwrap();

        assert_eq!(diff.n_misplaced_groups(), 1);
        assert!(matches!(diff.placements()[0], GroupPlacement::Expanded { target: 0, .. }));
        assert_eq!(diff.placements()[1], GroupPlacement::Intact { target: 1 });
        assert_eq!(diff.misplaced_groups().len(), 1);
        assert_eq!(diff.n_ref_groups(), 2);
        assert_eq!(diff.n_act_groups(), 2);
    }

    #[test]
    fn test_diff_groups_split() {
        let engine = DiffEngine::new();
        let groups1 = vec![vec![compound("A", "REACTANT"), compound("B", "REACTANT")]];
        let groups2 = vec![vec![compound("A", "REACTANT")], vec![compound("B", "REACTANT")]];
        let diff = engine.diff_groups(&groups1, &groups2).unwrap();

        assert_eq!(diff.n_misplaced_groups(), 1);
        assert_eq!(diff.placements()[0], GroupPlacement::Split { targets: vec![0, 1] });
    }

    #[test]
    fn test_oversize_refused_by_default() {
        let engine = DiffEngine::new().with_matching_config(MatchingConfig {
            max_exact_size: 1,
            ..MatchingConfig::default()
        });
        let xs = vec![compound("a", "REACTANT"), compound("b", "REACTANT")];
        assert!(engine.diff_collection(&xs, &xs).is_err());

        let lenient = DiffEngine::new().with_matching_config(MatchingConfig {
            max_exact_size: 1,
            oversize: OversizeStrategy::Greedy,
            ..MatchingConfig::default()
        });
        let diff = lenient.diff_collection(&xs, &xs).unwrap();
        assert_eq!(diff.index_match(), &[Some(0), Some(1)]);
        assert!(!diff.assignment().is_exact());
    }

    #[test]
    fn test_matching_config_sets_name_weight() {
        let engine = DiffEngine::new().with_matching_config(MatchingConfig {
            name_weight: 5.0,
            ..MatchingConfig::default()
        });
        assert_eq!(engine.cost_model().name_weight, 5.0);
    }
}
