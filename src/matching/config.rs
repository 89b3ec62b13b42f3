//! Matching configuration.

use crate::model::NameRule;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What to do when a collection is too large for exact assignment.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum OversizeStrategy {
    /// Fail with a "too large" error
    #[default]
    Refuse,
    /// Greedy ascending-cost assignment
    Greedy,
    /// Greedy assignment refined by pairwise swaps
    GreedyWithSwaps,
}

/// Algorithm that produced an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentMethod {
    /// Kuhn-Munkres; the total cost is minimal
    Exact,
    /// Greedy; the total cost is an upper bound
    Greedy,
    /// Greedy plus swap refinement; the total cost is an upper bound
    GreedyWithSwaps,
}

impl std::fmt::Display for AssignmentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Greedy => write!(f, "greedy"),
            Self::GreedyWithSwaps => write!(f, "greedy-with-swaps"),
        }
    }
}

/// Configuration for matching records across two collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MatchingConfig {
    /// Weight of the name distance in the pair cost
    pub name_weight: f64,
    /// Largest collection matched exactly
    pub max_exact_size: usize,
    /// Behaviour above `max_exact_size`
    pub oversize: OversizeStrategy,
    /// Swap passes for `greedy-with-swaps`
    pub max_swap_iterations: usize,
    /// Cost matrices with more cells than this are filled in parallel
    pub parallel_threshold: usize,
    /// Where record names are found
    pub name_rule: NameRule,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            name_weight: 100.0,
            max_exact_size: 1000,
            oversize: OversizeStrategy::Refuse,
            max_swap_iterations: 100,
            parallel_threshold: 64,
            name_rule: NameRule::default(),
        }
    }
}

impl MatchingConfig {
    /// Config that degrades to greedy matching instead of refusing.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            oversize: OversizeStrategy::GreedyWithSwaps,
            ..Self::default()
        }
    }
}
