//! Cost model for matching records.

use crate::tree::TreeDiffer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pair cost used when matching records across collections.
///
/// `cost = name_weight * distance(name1, name2) + distance(tree1, tree2)`.
/// With the default weight of 100 any name mismatch outweighs every
/// structural difference, since tree distances never exceed 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    /// Multiplier on the name distance
    pub name_weight: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self { name_weight: 100.0 }
    }
}

impl CostModel {
    pub const fn new(name_weight: f64) -> Self {
        Self { name_weight }
    }

    /// Cost model that ignores names and matches on structure alone.
    pub const fn structural_only() -> Self {
        Self { name_weight: 0.0 }
    }

    /// Cost of pairing two named trees.
    pub fn pair_distance(
        &self,
        differ: &dyn TreeDiffer,
        first: (&str, &Value),
        second: (&str, &Value),
    ) -> f64 {
        let name_distance = if first.0 == second.0 {
            0.0
        } else {
            differ.distance(
                &Value::String(first.0.to_string()),
                &Value::String(second.0.to_string()),
            )
        };
        self.name_weight * name_distance + differ.distance(first.1, second.1)
    }
}
