//! Structural tree diffing with an order-insensitive distance.

use super::flatten::leaf_count;
use crate::matching;
use crate::model::LeafPath;
use crate::utils::value_hash;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One differing node between two trees.
///
/// A change always has at least one present side; the enum cannot express a
/// node absent from both trees.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum NodeChange {
    /// Node present only in the second tree
    Added { path: LeafPath, value: Value },
    /// Node present only in the first tree
    Removed { path: LeafPath, value: Value },
    /// Node present in both trees with different values.
    ///
    /// `path` addresses the first tree and `path_after` the second; they
    /// differ when list elements were paired out of position.
    Altered {
        path: LeafPath,
        path_after: LeafPath,
        before: Value,
        after: Value,
    },
}

impl NodeChange {
    /// Path of the node in the tree it was found in (the first tree for
    /// alterations).
    #[must_use]
    pub fn path(&self) -> &LeafPath {
        match self {
            Self::Added { path, .. } | Self::Removed { path, .. } | Self::Altered { path, .. } => {
                path
            }
        }
    }

    /// Contribution of this change to the distance numerator.
    #[must_use]
    pub fn cost(&self) -> f64 {
        match self {
            Self::Added { value, .. } | Self::Removed { value, .. } => leaf_count(value) as f64,
            Self::Altered { before, after, .. } => match (before.as_f64(), after.as_f64()) {
                (Some(x), Some(y)) => {
                    let scale = x.abs() + y.abs();
                    if scale == 0.0 {
                        0.0
                    } else {
                        2.0 * (x - y).abs() / scale
                    }
                }
                _ => (leaf_count(before) + leaf_count(after)) as f64,
            },
        }
    }

    /// Re-root a change found in a sub-tree: first-tree paths under `first`,
    /// second-tree paths under `second`.
    fn rebase(self, first: &LeafPath, second: &LeafPath) -> Self {
        match self {
            Self::Added { path, value } => Self::Added {
                path: second.join(&path),
                value,
            },
            Self::Removed { path, value } => Self::Removed {
                path: first.join(&path),
                value,
            },
            Self::Altered {
                path,
                path_after,
                before,
                after,
            } => Self::Altered {
                path: first.join(&path),
                path_after: second.join(&path_after),
                before,
                after,
            },
        }
    }
}

/// Node-level difference between two trees.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TreeDiff {
    pub changes: Vec<NodeChange>,
    /// Normalized dissimilarity in `[0, 1]`; zero iff the trees are equal
    pub distance: f64,
}

impl TreeDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// A tree-diff primitive.
///
/// Implementations must report each differing node once, use paths that the
/// flattener would produce for the same trees, and return a distance in
/// `[0, 1]` that is zero for equal trees and grows with dissimilarity.
pub trait TreeDiffer: Send + Sync {
    /// Diff two trees.
    fn diff(&self, a: &Value, b: &Value) -> TreeDiff;

    /// Distance between two trees.
    fn distance(&self, a: &Value, b: &Value) -> f64 {
        self.diff(a, b).distance
    }

    /// Name of this differ for logging.
    fn name(&self) -> &str;
}

/// Options for [`DeepDiffer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DifferConfig {
    /// Compare lists as multisets instead of by position
    pub ignore_order: bool,
    /// List elements closer than this are reported as one altered element;
    /// farther pairs are reported as a removal plus an addition
    pub pair_cutoff: f64,
}

impl Default for DifferConfig {
    fn default() -> Self {
        Self {
            ignore_order: true,
            pair_cutoff: 0.3,
        }
    }
}

/// Default recursive differ.
///
/// Mappings are compared key by key. With `ignore_order`, list elements are
/// first paired by exact equality, then the leftovers by minimum-cost
/// assignment over their own distances; pairs at or above `pair_cutoff` are
/// split into a removal and an addition.
///
/// The distance is `cost / (leaves(a) + leaves(b))`, capped at 1, where an
/// added or removed node costs its leaf count, an altered pair of numbers
/// costs their relative difference and any other altered pair costs the leaf
/// counts of both sides.
#[derive(Debug, Clone, Default)]
pub struct DeepDiffer {
    config: DifferConfig,
}

impl DeepDiffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_config(config: DifferConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &DifferConfig {
        &self.config
    }

    /// Changes from `a` to `b`, with paths relative to both roots.
    fn changes(&self, a: &Value, b: &Value, at_root: bool) -> Vec<NodeChange> {
        let mut out = Vec::new();
        self.diff_node(a, b, &LeafPath::root(), &LeafPath::root(), at_root, &mut out);
        out
    }

    fn diff_node(
        &self,
        a: &Value,
        b: &Value,
        pa: &LeafPath,
        pb: &LeafPath,
        at_root: bool,
        out: &mut Vec<NodeChange>,
    ) {
        if values_equal(a, b) {
            return;
        }
        // Empty roots of different kinds hold no leaves to differ on.
        if at_root && leaf_count(a) == 0 && leaf_count(b) == 0 {
            return;
        }
        match (a, b) {
            // An empty container below the root is a leaf of its own, so it
            // is only walked into at the root.
            (Value::Object(ma), Value::Object(mb))
                if at_root || (!ma.is_empty() && !mb.is_empty()) =>
            {
                for (key, va) in ma {
                    match mb.get(key) {
                        Some(vb) => self.diff_node(
                            va,
                            vb,
                            &pa.child(key.as_str()),
                            &pb.child(key.as_str()),
                            false,
                            out,
                        ),
                        None => out.push(NodeChange::Removed {
                            path: pa.child(key.as_str()),
                            value: va.clone(),
                        }),
                    }
                }
                for (key, vb) in mb {
                    if !ma.contains_key(key) {
                        out.push(NodeChange::Added {
                            path: pb.child(key.as_str()),
                            value: vb.clone(),
                        });
                    }
                }
            }
            (Value::Array(la), Value::Array(lb))
                if at_root || (!la.is_empty() && !lb.is_empty()) =>
            {
                if self.config.ignore_order {
                    self.diff_unordered(la, lb, pa, pb, out);
                } else {
                    self.diff_positional(la, lb, pa, pb, out);
                }
            }
            _ => out.push(NodeChange::Altered {
                path: pa.clone(),
                path_after: pb.clone(),
                before: a.clone(),
                after: b.clone(),
            }),
        }
    }

    fn diff_positional(
        &self,
        la: &[Value],
        lb: &[Value],
        pa: &LeafPath,
        pb: &LeafPath,
        out: &mut Vec<NodeChange>,
    ) {
        for (i, (va, vb)) in la.iter().zip(lb).enumerate() {
            self.diff_node(va, vb, &pa.index(i), &pb.index(i), false, out);
        }
        for (i, va) in la.iter().enumerate().skip(lb.len()) {
            out.push(NodeChange::Removed {
                path: pa.index(i),
                value: va.clone(),
            });
        }
        for (j, vb) in lb.iter().enumerate().skip(la.len()) {
            out.push(NodeChange::Added {
                path: pb.index(j),
                value: vb.clone(),
            });
        }
    }

    fn diff_unordered(
        &self,
        la: &[Value],
        lb: &[Value],
        pa: &LeafPath,
        pb: &LeafPath,
        out: &mut Vec<NodeChange>,
    ) {
        // Exact pairs first, bucketed by content hash.
        let mut buckets: HashMap<u64, Vec<usize>> = HashMap::new();
        for (j, vb) in lb.iter().enumerate() {
            buckets.entry(value_hash(vb)).or_default().push(j);
        }
        let mut used_b = vec![false; lb.len()];
        let mut left_a = Vec::new();
        for (i, va) in la.iter().enumerate() {
            let exact = buckets.get_mut(&value_hash(va)).and_then(|candidates| {
                let pos = candidates.iter().position(|&j| values_equal(va, &lb[j]))?;
                Some(candidates.swap_remove(pos))
            });
            match exact {
                Some(j) => used_b[j] = true,
                None => left_a.push(i),
            }
        }
        let left_b: Vec<usize> = (0..lb.len()).filter(|&j| !used_b[j]).collect();

        // Near pairs by assignment over element distances.
        let mut paired_b = vec![false; left_b.len()];
        if !left_a.is_empty() && !left_b.is_empty() {
            let mut sub: Vec<Vec<(Vec<NodeChange>, f64)>> = left_a
                .iter()
                .map(|&i| {
                    left_b
                        .iter()
                        .map(|&j| {
                            let changes = self.changes(&la[i], &lb[j], false);
                            let distance = normalized(&changes, &la[i], &lb[j]);
                            (changes, distance)
                        })
                        .collect()
                })
                .collect();
            // Any pair at or past the cutoff is no better than leaving both unpaired.
            let cutoff = self.config.pair_cutoff;
            let costs: Vec<Vec<f64>> = sub
                .iter()
                .map(|row| row.iter().map(|(_, d)| d.min(cutoff)).collect())
                .collect();
            let assignment = matching::hungarian(&costs, left_b.len())
                .unwrap_or_else(|_| matching::greedy(&costs, left_b.len()));

            for (r, col) in assignment.into_iter().enumerate() {
                let i = left_a[r];
                match col {
                    Some(c) if sub[r][c].1 < cutoff => {
                        paired_b[c] = true;
                        let j = left_b[c];
                        let changes = std::mem::take(&mut sub[r][c].0);
                        out.extend(
                            changes
                                .into_iter()
                                .map(|change| change.rebase(&pa.index(i), &pb.index(j))),
                        );
                    }
                    _ => out.push(NodeChange::Removed {
                        path: pa.index(i),
                        value: la[i].clone(),
                    }),
                }
            }
        } else {
            out.extend(left_a.iter().map(|&i| NodeChange::Removed {
                path: pa.index(i),
                value: la[i].clone(),
            }));
        }

        for (c, &j) in left_b.iter().enumerate() {
            if !paired_b[c] {
                out.push(NodeChange::Added {
                    path: pb.index(j),
                    value: lb[j].clone(),
                });
            }
        }
    }
}

impl TreeDiffer for DeepDiffer {
    fn diff(&self, a: &Value, b: &Value) -> TreeDiff {
        let changes = self.changes(a, b, true);
        let distance = normalized(&changes, a, b);
        TreeDiff { changes, distance }
    }

    fn name(&self) -> &str {
        "deep"
    }
}

fn normalized(changes: &[NodeChange], a: &Value, b: &Value) -> f64 {
    let total = (leaf_count(a) + leaf_count(b)) as f64;
    if total == 0.0 {
        return 0.0;
    }
    let cost: f64 = changes.iter().map(NodeChange::cost).sum();
    (cost / total).min(1.0)
}

/// Equality that treats `1` and `1.0` as the same number.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn p(s: &str) -> LeafPath {
        s.parse().unwrap_or_default()
    }

    #[test]
    fn test_identical_trees() {
        let tree = json!({"a": [1, {"b": "c"}], "d": {}});
        let diff = DeepDiffer::new().diff(&tree, &tree);
        assert!(diff.is_empty());
        assert_eq!(diff.distance, 0.0);
    }

    #[test]
    fn test_empty_roots_of_different_kinds() {
        let diff = DeepDiffer::new().diff(&json!({}), &json!([]));
        assert!(diff.is_empty());
        assert_eq!(diff.distance, 0.0);

        let diff = DeepDiffer::new().diff(&json!({}), &json!([1]));
        assert_eq!(diff.distance, 1.0);
        assert_eq!(diff.changes.len(), 1);
    }

    #[test]
    fn test_added_and_removed_keys() {
        let diff = DeepDiffer::new().diff(&json!({"a": 1, "b": 2}), &json!({"a": 1, "c": {"d": 3}}));
        assert_eq!(
            diff.changes,
            vec![
                NodeChange::Removed { path: p("b"), value: json!(2) },
                NodeChange::Added { path: p("c"), value: json!({"d": 3}) },
            ]
        );
        // cost 2 over 4 leaves
        assert!((diff.distance - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_numeric_alteration_is_relative() {
        let diff = DeepDiffer::new().diff(&json!({"x": 10.0}), &json!({"x": 11.0}));
        assert_eq!(diff.changes.len(), 1);
        let expected = (2.0 / 21.0) / 2.0;
        assert!((diff.distance - expected).abs() < 1e-9);
    }

    #[test]
    fn test_integer_and_float_forms_are_equal() {
        let diff = DeepDiffer::new().diff(&json!({"x": 1}), &json!({"x": 1.0}));
        assert!(diff.is_empty());
    }

    #[test]
    fn test_scalar_roots() {
        let differ = DeepDiffer::new();
        assert_eq!(differ.distance(&json!("water"), &json!("ethanol")), 1.0);
        assert_eq!(differ.distance(&json!("water"), &json!("water")), 0.0);
    }

    #[test]
    fn test_reordered_list_is_unchanged() {
        let a = json!({"ids": [{"t": "A"}, {"t": "B"}, 3]});
        let b = json!({"ids": [3, {"t": "B"}, {"t": "A"}]});
        assert!(DeepDiffer::new().diff(&a, &b).is_empty());
    }

    #[test]
    fn test_near_list_elements_pair_across_positions() {
        let a = json!({"ids": [
            {"type": "NAME", "value": "ethanol", "source": "label", "details": "x"},
            {"type": "SMILES", "value": "CCO", "source": "label", "details": "y"}
        ]});
        let b = json!({"ids": [
            {"type": "SMILES", "value": "CCO", "source": "label", "details": "y"},
            {"type": "NAME", "value": "ethanol", "source": "label", "details": "z"}
        ]});
        let diff = DeepDiffer::new().diff(&a, &b);
        assert_eq!(
            diff.changes,
            vec![NodeChange::Altered {
                path: p("ids.0.details"),
                path_after: p("ids.1.details"),
                before: json!("x"),
                after: json!("z"),
            }]
        );
    }

    #[test]
    fn test_distant_list_elements_split() {
        let a = json!({"ids": [{"type": "NAME", "value": "water"}]});
        let b = json!({"ids": [{"kind": "SMILES", "text": "O"}]});
        let diff = DeepDiffer::new().diff(&a, &b);
        assert_eq!(
            diff.changes,
            vec![
                NodeChange::Removed { path: p("ids.0"), value: json!({"type": "NAME", "value": "water"}) },
                NodeChange::Added { path: p("ids.0"), value: json!({"kind": "SMILES", "text": "O"}) },
            ]
        );
    }

    #[test]
    fn test_positional_lists() {
        let differ = DeepDiffer::with_config(DifferConfig {
            ignore_order: false,
            ..DifferConfig::default()
        });
        let diff = differ.diff(&json!([1, 2, 3]), &json!([2, 1]));
        assert_eq!(
            diff.changes,
            vec![
                NodeChange::Altered { path: p("0"), path_after: p("0"), before: json!(1), after: json!(2) },
                NodeChange::Altered { path: p("1"), path_after: p("1"), before: json!(2), after: json!(1) },
                NodeChange::Removed { path: p("2"), value: json!(3) },
            ]
        );
    }

    #[test]
    fn test_empty_container_versus_content() {
        let diff = DeepDiffer::new().diff(&json!({"prep": []}), &json!({"prep": [{"kind": "DRIED"}]}));
        assert_eq!(
            diff.changes,
            vec![NodeChange::Altered {
                path: p("prep"),
                path_after: p("prep"),
                before: json!([]),
                after: json!([{"kind": "DRIED"}]),
            }]
        );
    }

    #[test]
    fn test_distance_is_bounded() {
        let differ = DeepDiffer::new();
        let d = differ.distance(&json!({"a": [1, 2, 3]}), &json!({"b": "x", "c": [true]}));
        assert!((0.0..=1.0).contains(&d));
        assert_eq!(d, 1.0);
    }
}
