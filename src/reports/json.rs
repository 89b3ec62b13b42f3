//! JSON report generator.

use super::{DiffReport, ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::diff::{
    CollectionDiff, DeltaKind, GroupPlacement, GroupedCollectionDiff, PairwiseDiff,
};
use crate::matching::AssignmentMethod;
use crate::model::{Leaf, LeafKind};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// JSON report generator
pub struct JsonReporter {
    /// Whether to only include summary
    summary_only: bool,
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self {
            summary_only: false,
            pretty: true,
        }
    }

    /// Create a summary-only reporter
    #[must_use]
    pub const fn summary_only() -> Self {
        Self {
            summary_only: true,
            pretty: true,
        }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate_diff_report(
        &self,
        report: DiffReport<'_, '_>,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let (old_records, new_records) = match report {
            DiffReport::Pairwise(_) => (1, 1),
            DiffReport::Collection(diff) => (diff.m1().len(), diff.m2().len()),
            DiffReport::Grouped(diff) => (diff.elements().m1().len(), diff.elements().m2().len()),
        };

        let document = JsonDiffReport {
            metadata: JsonReportMetadata {
                tool: ToolInfo {
                    name: "ord-diff".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
                generated_at: Utc::now().to_rfc3339(),
                shape: report.shape(),
                old: InputInfo {
                    file_path: config.metadata.old_path.clone(),
                    record_count: old_records,
                },
                new: InputInfo {
                    file_path: config.metadata.new_path.clone(),
                    record_count: new_records,
                },
            },
            summary: JsonSummary::from_report(report),
            details: if self.summary_only {
                None
            } else {
                Some(JsonDetails::from_report(report, config))
            },
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        };
        json.map_err(|e| ReportError::SerializationError(e.to_string()))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

// JSON structures for serialization

#[derive(Serialize)]
struct JsonDiffReport<'a> {
    metadata: JsonReportMetadata,
    summary: JsonSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<JsonDetails<'a>>,
}

#[derive(Serialize)]
struct JsonReportMetadata {
    tool: ToolInfo,
    generated_at: String,
    shape: &'static str,
    old: InputInfo,
    new: InputInfo,
}

#[derive(Serialize)]
struct ToolInfo {
    name: String,
    version: String,
}

#[derive(Serialize)]
struct InputInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    file_path: Option<String>,
    record_count: usize,
}

#[derive(Serialize)]
struct JsonSummary {
    has_changes: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance: Option<f64>,
    leaf_changes: BTreeMap<DeltaKind, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elements: Option<ElementSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    groups: Option<GroupSummary>,
}

impl JsonSummary {
    fn from_report(report: DiffReport<'_, '_>) -> Self {
        let (distance, leaf_changes) = match report {
            DiffReport::Pairwise(diff) => (Some(diff.distance()), diff.counts()),
            DiffReport::Collection(_) | DiffReport::Grouped(_) => (
                None,
                report.elements().map(leaf_totals).unwrap_or_default(),
            ),
        };
        let groups = match report {
            DiffReport::Grouped(diff) => Some(GroupSummary {
                ref_groups: diff.n_ref_groups(),
                act_groups: diff.n_act_groups(),
                misplaced: diff.n_misplaced_groups(),
            }),
            DiffReport::Pairwise(_) | DiffReport::Collection(_) => None,
        };

        Self {
            has_changes: report.has_changes(),
            distance,
            leaf_changes,
            elements: report.elements().map(ElementSummary::from_diff),
            groups,
        }
    }
}

/// Leaf change counts summed over every matched pair.
pub(super) fn leaf_totals(diff: &CollectionDiff<'_>) -> BTreeMap<DeltaKind, usize> {
    let mut totals: BTreeMap<DeltaKind, usize> =
        DeltaKind::all().iter().map(|&kind| (kind, 0)).collect();
    for pair in diff.pair_diffs().iter().flatten() {
        for (kind, count) in pair.counts() {
            *totals.entry(kind).or_default() += count;
        }
    }
    totals
}

#[derive(Serialize)]
struct ElementSummary {
    matched: usize,
    absent: usize,
    excess: usize,
    altered: usize,
    total_cost: f64,
    method: AssignmentMethod,
}

impl ElementSummary {
    fn from_diff(diff: &CollectionDiff<'_>) -> Self {
        Self {
            matched: diff.n_matched(),
            absent: diff.n_absent(),
            excess: diff.n_excess(),
            altered: diff.n_altered(),
            total_cost: diff.assignment().total_cost,
            method: diff.assignment().method,
        }
    }
}

#[derive(Serialize)]
struct GroupSummary {
    ref_groups: usize,
    act_groups: usize,
    misplaced: usize,
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonDetails<'a> {
    Pairwise(PairView<'a>),
    Collection(CollectionView<'a>),
    Grouped(GroupsView<'a>),
}

impl<'a> JsonDetails<'a> {
    fn from_report(report: DiffReport<'a, 'a>, config: &ReportConfig) -> Self {
        match report {
            DiffReport::Pairwise(diff) => Self::Pairwise(PairView::from_diff(diff, config)),
            DiffReport::Collection(diff) => {
                Self::Collection(CollectionView::from_diff(diff, config))
            }
            DiffReport::Grouped(diff) => Self::Grouped(GroupsView::from_diff(diff, config)),
        }
    }
}

#[derive(Serialize)]
struct LeafView<'a> {
    path: String,
    kind: LeafKind,
    value: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_implicit: Option<bool>,
}

impl<'a> LeafView<'a> {
    fn from_leaf(leaf: &'a Leaf) -> Self {
        Self {
            path: leaf.path.to_string(),
            kind: leaf.kind(),
            value: &leaf.value,
            is_implicit: leaf.is_implicit,
        }
    }

    fn all(leaves: &[&'a Leaf], config: &ReportConfig) -> Vec<Self> {
        leaves
            .iter()
            .take(config.limit(leaves.len()))
            .map(|&leaf| Self::from_leaf(leaf))
            .collect()
    }
}

#[derive(Serialize)]
struct AlterationView<'a> {
    before: Vec<LeafView<'a>>,
    after: Vec<LeafView<'a>>,
}

#[derive(Serialize)]
struct PairView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    first: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    second: Option<usize>,
    distance: f64,
    added: Vec<LeafView<'a>>,
    removed: Vec<LeafView<'a>>,
    altered: Vec<AlterationView<'a>>,
}

impl<'a> PairView<'a> {
    fn from_diff(diff: &PairwiseDiff<'a>, config: &ReportConfig) -> Self {
        let altered = diff.altered();
        Self {
            first: None,
            second: None,
            distance: diff.distance(),
            added: LeafView::all(diff.added(), config),
            removed: LeafView::all(diff.removed(), config),
            altered: altered
                .iter()
                .take(config.limit(altered.len()))
                .map(|alt| AlterationView {
                    before: LeafView::all(&alt.before, config),
                    after: LeafView::all(&alt.after, config),
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct CollectionView<'a> {
    index_match: Vec<Option<usize>>,
    distances: Vec<Option<f64>>,
    pairs: Vec<PairView<'a>>,
}

impl<'a> CollectionView<'a> {
    fn from_diff(diff: &CollectionDiff<'a>, config: &ReportConfig) -> Self {
        let pairs = diff
            .index_match()
            .iter()
            .zip(diff.pair_diffs())
            .enumerate()
            .filter_map(|(i, (matched, pair))| {
                let (j, pair) = (*matched).zip(pair.as_ref())?;
                (config.include_unchanged || !pair.is_identical()).then(|| PairView {
                    first: Some(i),
                    second: Some(j),
                    ..PairView::from_diff(pair, config)
                })
            })
            .collect();

        Self {
            index_match: diff.index_match().to_vec(),
            distances: diff.distances(),
            pairs,
        }
    }
}

#[derive(Serialize)]
struct PlacementView<'a> {
    group: usize,
    size: usize,
    #[serde(flatten)]
    placement: &'a GroupPlacement,
}

#[derive(Serialize)]
struct GroupsView<'a> {
    placements: Vec<PlacementView<'a>>,
    elements: CollectionView<'a>,
}

impl<'a> GroupsView<'a> {
    fn from_diff(diff: &'a GroupedCollectionDiff<'a>, config: &ReportConfig) -> Self {
        let placements = diff
            .placements()
            .iter()
            .zip(diff.m1_groups())
            .enumerate()
            .map(|(group, (placement, members))| PlacementView {
                group,
                size: members.len(),
                placement,
            })
            .collect();

        Self {
            placements,
            elements: CollectionView::from_diff(diff.elements(), config),
        }
    }
}
