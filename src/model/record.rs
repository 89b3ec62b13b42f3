//! Records: a tree plus its precomputed leaves.

use super::leaf::{Leaf, LeafKind};
use super::path::LeafPath;
use crate::tree::flatten;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Where a record's display name lives in its tree.
///
/// The default targets compound messages: the first entry of `identifiers`
/// whose `type` is `NAME` supplies its `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NameRule {
    /// Top-level list holding identifier entries
    pub list_field: String,
    /// Field of an entry holding its type
    pub type_field: String,
    /// Type marking the name entry
    pub type_value: String,
    /// Field of the name entry holding the name
    pub value_field: String,
}

impl Default for NameRule {
    fn default() -> Self {
        Self {
            list_field: "identifiers".to_string(),
            type_field: "type".to_string(),
            type_value: "NAME".to_string(),
            value_field: "value".to_string(),
        }
    }
}

impl NameRule {
    /// Extract the name from a tree, if the tree has one.
    #[must_use]
    pub fn extract(&self, tree: &Value) -> Option<String> {
        tree.get(&self.list_field)?
            .as_array()?
            .iter()
            .find(|entry| {
                entry.get(&self.type_field).and_then(Value::as_str) == Some(self.type_value.as_str())
            })
            .and_then(|entry| entry.get(&self.value_field))
            .map(|value| match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
    }
}

/// A nested tree with its flattened leaves and derived name.
///
/// Everything is computed once at construction; a record is never mutated
/// afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    tree: Value,
    leaves: Vec<Leaf>,
    #[serde(skip)]
    index: HashMap<LeafPath, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl Record {
    /// Build a record using the default compound [`NameRule`].
    #[must_use]
    pub fn new(tree: Value) -> Self {
        Self::with_name_rule(tree, &NameRule::default())
    }

    /// Build a record, deriving its name with `rule`.
    #[must_use]
    pub fn with_name_rule(tree: Value, rule: &NameRule) -> Self {
        let leaves: Vec<Leaf> = flatten(&tree)
            .into_iter()
            .map(|(path, value)| Leaf::new(path, value))
            .collect();
        let index = leaves
            .iter()
            .enumerate()
            .map(|(i, leaf)| (leaf.path.clone(), i))
            .collect();
        let name = rule.extract(&tree);
        Self {
            tree,
            leaves,
            index,
            name,
        }
    }

    /// Mark the given leaves as implicit and every other leaf as explicit.
    #[must_use]
    pub fn with_implicit_paths(mut self, implicit: &HashSet<LeafPath>) -> Self {
        for leaf in &mut self.leaves {
            leaf.is_implicit = Some(implicit.contains(&leaf.path));
        }
        self
    }

    #[must_use]
    pub const fn tree(&self) -> &Value {
        &self.tree
    }

    #[must_use]
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// Look up the leaf at `path`.
    #[must_use]
    pub fn leaf(&self, path: &LeafPath) -> Option<&Leaf> {
        self.index.get(path).map(|&i| &self.leaves[i])
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of leaves of each kind; every kind is present, possibly zero.
    #[must_use]
    pub fn leaf_kind_counts(&self) -> BTreeMap<LeafKind, usize> {
        let mut counts: BTreeMap<LeafKind, usize> =
            LeafKind::all().iter().map(|&kind| (kind, 0)).collect();
        for leaf in &self.leaves {
            *counts.entry(leaf.kind()).or_default() += 1;
        }
        counts
    }

    /// Paths of every leaf of the given kind, in tree order.
    #[must_use]
    pub fn paths_of_kind(&self, kind: LeafKind) -> Vec<&LeafPath> {
        self.leaves
            .iter()
            .filter(|leaf| leaf.kind() == kind)
            .map(|leaf| &leaf.path)
            .collect()
    }
}

impl From<Value> for Record {
    fn from(tree: Value) -> Self {
        Self::new(tree)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::new)
    }
}
