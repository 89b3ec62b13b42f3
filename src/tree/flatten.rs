//! Flattening nested trees into addressed leaves.

use crate::model::LeafPath;
use indexmap::IndexMap;
use serde_json::Value;

/// Leaf paths mapped to their terminal values, in tree order.
pub type FlatTree = IndexMap<LeafPath, Value>;

/// Flatten `tree` into its terminal positions.
///
/// Non-empty mappings and lists recurse, extending the path with the key or
/// index. An empty mapping or list below the root becomes a single `null`
/// leaf so that emptiness can be diffed; an empty container at the root has
/// no terminal positions. A scalar root is a single leaf at the root path.
///
/// The input must be a tree; `serde_json::Value` cannot express shared or
/// cyclic nodes.
#[must_use]
pub fn flatten(tree: &Value) -> FlatTree {
    let mut out = FlatTree::new();
    if !is_empty_container(tree) {
        flatten_into(tree, &LeafPath::root(), &mut out);
    }
    out
}

/// Flatten a sub-tree whose root sits at `prefix`.
///
/// Unlike [`flatten`], an empty container here is a terminal position of the
/// enclosing tree, so it yields a `null` leaf at `prefix`.
#[must_use]
pub fn flatten_at(value: &Value, prefix: &LeafPath) -> FlatTree {
    let mut out = FlatTree::new();
    flatten_into(value, prefix, &mut out);
    out
}

fn flatten_into(value: &Value, path: &LeafPath, out: &mut FlatTree) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                flatten_into(child, &path.child(key.as_str()), out);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (i, child) in items.iter().enumerate() {
                flatten_into(child, &path.index(i), out);
            }
        }
        Value::Object(_) | Value::Array(_) => {
            out.insert(path.clone(), Value::Null);
        }
        scalar => {
            out.insert(path.clone(), scalar.clone());
        }
    }
}

/// Number of terminal positions under `value`, counting an empty container
/// or a scalar as one.
#[must_use]
pub fn leaf_count(value: &Value) -> usize {
    match value {
        Value::Object(map) if !map.is_empty() => map.values().map(leaf_count).sum(),
        Value::Array(items) if !items.is_empty() => items.iter().map(leaf_count).sum(),
        _ => 1,
    }
}

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
