//! Re-expressing node-level tree diffs as leaf-level path sets.

use super::differ::{NodeChange, TreeDiff};
use super::flatten::{flatten, flatten_at, FlatTree};
use crate::model::LeafPath;
use indexmap::IndexSet;
use serde::Serialize;
use serde_json::Value;

/// One altered node, as the leaves it covers on each side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlteredPaths {
    /// Leaf paths in the first tree
    pub before: Vec<LeafPath>,
    /// Leaf paths in the second tree
    pub after: Vec<LeafPath>,
}

/// Leaf-level view of a [`TreeDiff`].
///
/// `added` paths address the second tree; `removed` paths and the `before`
/// side of each alteration address the first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdaptedDiff {
    pub distance: f64,
    pub added: IndexSet<LeafPath>,
    pub removed: IndexSet<LeafPath>,
    pub altered: Vec<AlteredPaths>,
}

impl AdaptedDiff {
    /// Every first-tree leaf covered by an alteration.
    #[must_use]
    pub fn altered_before(&self) -> IndexSet<LeafPath> {
        self.altered
            .iter()
            .flat_map(|alt| alt.before.iter().cloned())
            .collect()
    }

    /// Every second-tree leaf covered by an alteration.
    #[must_use]
    pub fn altered_after(&self) -> IndexSet<LeafPath> {
        self.altered
            .iter()
            .flat_map(|alt| alt.after.iter().cloned())
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.altered.is_empty()
    }
}

/// Flatten the reported sub-tree of a change, rooted at its reported path.
///
/// A node reported at the root is the whole tree and follows the root rules
/// of [`flatten`]; anywhere else an empty container is a leaf.
fn leaves_of(value: &Value, path: &LeafPath) -> FlatTree {
    if path.is_root() {
        flatten(value)
    } else {
        flatten_at(value, path)
    }
}

/// Convert node-level changes into leaf paths, passing the distance through.
///
/// A changed sub-tree contributes every leaf beneath it to the same category.
#[must_use]
pub fn adapt_tree_diff(diff: &TreeDiff) -> AdaptedDiff {
    let mut adapted = AdaptedDiff {
        distance: diff.distance,
        ..AdaptedDiff::default()
    };

    for change in &diff.changes {
        match change {
            NodeChange::Added { path, value } => {
                adapted.added.extend(leaves_of(value, path).into_keys());
            }
            NodeChange::Removed { path, value } => {
                adapted.removed.extend(leaves_of(value, path).into_keys());
            }
            NodeChange::Altered {
                path,
                path_after,
                before,
                after,
            } => adapted.altered.push(AlteredPaths {
                before: leaves_of(before, path).into_keys().collect(),
                after: leaves_of(after, path_after).into_keys().collect(),
            }),
        }
    }

    adapted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{DeepDiffer, TreeDiffer};
    use serde_json::json;

    fn p(s: &str) -> LeafPath {
        s.parse().unwrap_or_default()
    }

    #[test]
    fn test_subtree_addition_expands_to_leaves() {
        let diff = DeepDiffer::new().diff(
            &json!({"a": 1}),
            &json!({"a": 1, "amount": {"mass": {"value": 2, "units": "GRAM"}}}),
        );
        let adapted = adapt_tree_diff(&diff);
        assert_eq!(
            adapted.added.iter().cloned().collect::<Vec<_>>(),
            vec![p("amount.mass.value"), p("amount.mass.units")]
        );
        assert!(adapted.removed.is_empty());
        assert!(adapted.altered.is_empty());
        assert_eq!(adapted.distance, diff.distance);
    }

    #[test]
    fn test_removed_list_flattens_without_wrapper() {
        let diff = DeepDiffer::new().diff(&json!({"a": 1, "tags": ["x", "y"]}), &json!({"a": 1}));
        let adapted = adapt_tree_diff(&diff);
        assert_eq!(
            adapted.removed.iter().cloned().collect::<Vec<_>>(),
            vec![p("tags.0"), p("tags.1")]
        );
    }

    #[test]
    fn test_altered_sides_keep_their_own_paths() {
        let diff = TreeDiff {
            changes: vec![NodeChange::Altered {
                path: p("ids.0"),
                path_after: p("ids.1"),
                before: json!([]),
                after: json!({"value": "CCO", "type": "SMILES"}),
            }],
            distance: 0.2,
        };
        let adapted = adapt_tree_diff(&diff);
        assert_eq!(
            adapted.altered,
            vec![AlteredPaths {
                before: vec![p("ids.0")],
                after: vec![p("ids.1.value"), p("ids.1.type")],
            }]
        );
        assert_eq!(adapted.altered_before().len(), 1);
        assert_eq!(adapted.altered_after().len(), 2);
    }

    #[test]
    fn test_root_level_change() {
        let diff = DeepDiffer::new().diff(&json!({}), &json!([]));
        let adapted = adapt_tree_diff(&diff);
        assert!(adapted.altered.iter().all(|alt| alt.before.is_empty() && alt.after.is_empty()));
    }
}
