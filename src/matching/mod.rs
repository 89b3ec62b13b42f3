//! Minimum-cost matching between two unordered collections.
//!
//! Given `xs` (length `n`), `ys` (length `m`) and a pair distance, the matcher
//! pairs every index of `xs` with a distinct index of `ys` or with nothing,
//! minimizing the summed distance of the matched pairs. Absent counterparts
//! cost zero. When `n > m` the excess indices of `xs` map to `None`.
//!
//! Exact matching is a Kuhn-Munkres assignment over an `n x max(n, m)` cost
//! matrix. Collections larger than [`MatchingConfig::max_exact_size`] are
//! refused or matched greedily, depending on [`OversizeStrategy`].
//!
//! # Example
//!
//! ```
//! use ord_diff::matching::{match_indices, MatchingConfig};
//!
//! let xs = [1.0_f64, 5.0, 9.0];
//! let ys = [9.5_f64, 1.5];
//! let assignment = match_indices(&xs, &ys, &MatchingConfig::default(), |x, y| {
//!     Ok((x - y).abs())
//! })
//! .unwrap();
//!
//! assert_eq!(assignment.matches, vec![Some(1), None, Some(0)]);
//! ```

mod assignment;
mod config;

pub use assignment::{
    cost_scale, greedy, greedy_with_swaps, hungarian, total_cost, COST_SCALE,
};
pub use config::{AssignmentMethod, MatchingConfig, OversizeStrategy};

use crate::error::{MatchingErrorKind, OrdDiffError, Result};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

/// Result of matching two collections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    /// For each index of the first collection, its counterpart in the second
    pub matches: Vec<Option<usize>>,
    /// Summed distance over the matched pairs
    pub total_cost: f64,
    /// Solver that produced the assignment
    pub method: AssignmentMethod,
}

impl Assignment {
    fn empty(rows: usize) -> Self {
        Self {
            matches: vec![None; rows],
            total_cost: 0.0,
            method: AssignmentMethod::Exact,
        }
    }

    /// Matched `(i, j)` pairs in first-collection order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.matches
            .iter()
            .enumerate()
            .filter_map(|(i, j)| j.map(|j| (i, j)))
    }

    #[must_use]
    pub fn n_matched(&self) -> usize {
        self.matches.iter().filter(|j| j.is_some()).count()
    }

    /// Whether the total cost is known to be minimal.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.method == AssignmentMethod::Exact
    }
}

/// Compute the full `n x m` matrix of pair distances.
///
/// Matrices with more than `parallel_threshold` cells are filled with rayon.
/// Every cost must be finite and non-negative.
pub fn cost_matrix<X, Y, F>(
    xs: &[X],
    ys: &[Y],
    parallel_threshold: usize,
    pair_distance: F,
) -> Result<Vec<Vec<f64>>>
where
    X: Sync,
    Y: Sync,
    F: Fn(&X, &Y) -> Result<f64> + Sync,
{
    let row = |x: &X| -> Result<Vec<f64>> {
        ys.iter()
            .map(|y| pair_distance(x, y).and_then(checked_cost))
            .collect()
    };

    if xs.len().saturating_mul(ys.len()) > parallel_threshold {
        xs.par_iter().map(row).collect()
    } else {
        xs.iter().map(row).collect()
    }
}

fn checked_cost(cost: f64) -> Result<f64> {
    if cost.is_finite() && cost >= 0.0 {
        Ok(cost)
    } else {
        Err(OrdDiffError::matching(
            "computing pair distance",
            MatchingErrorKind::InvalidCost(cost),
        ))
    }
}

/// Match `xs` against `ys`, minimizing the summed `pair_distance`.
///
/// Fails with `TooLarge` when `max(n, m)` exceeds the exact limit and the
/// oversize strategy is `Refuse`, with `InvalidCost` for a negative or
/// non-finite distance, and with any error `pair_distance` returns.
pub fn match_indices<X, Y, F>(
    xs: &[X],
    ys: &[Y],
    config: &MatchingConfig,
    pair_distance: F,
) -> Result<Assignment>
where
    X: Sync,
    Y: Sync,
    F: Fn(&X, &Y) -> Result<f64> + Sync,
{
    let (n, m) = (xs.len(), ys.len());
    if n == 0 || m == 0 {
        return Ok(Assignment::empty(n));
    }

    let size = n.max(m);
    let method = if size <= config.max_exact_size {
        AssignmentMethod::Exact
    } else {
        match config.oversize {
            OversizeStrategy::Refuse => {
                return Err(OrdDiffError::matching(
                    "matching collections",
                    MatchingErrorKind::TooLarge {
                        size,
                        limit: config.max_exact_size,
                    },
                ));
            }
            OversizeStrategy::Greedy => AssignmentMethod::Greedy,
            OversizeStrategy::GreedyWithSwaps => AssignmentMethod::GreedyWithSwaps,
        }
    };
    if method != AssignmentMethod::Exact {
        warn!(
            size,
            limit = config.max_exact_size,
            %method,
            "Collection exceeds exact matching limit; result may not be optimal"
        );
    }

    let costs = cost_matrix(xs, ys, config.parallel_threshold, pair_distance)?;
    debug!(rows = n, columns = m, %method, "Solving assignment");

    let matches = match method {
        AssignmentMethod::Exact => hungarian(&costs, m)?,
        AssignmentMethod::Greedy => greedy(&costs, m),
        AssignmentMethod::GreedyWithSwaps => {
            greedy_with_swaps(&costs, m, config.max_swap_iterations)
        }
    };
    let total_cost = total_cost(&costs, &matches);

    Ok(Assignment {
        matches,
        total_cost,
        method,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abs_diff(x: &f64, y: &f64) -> Result<f64> {
        Ok((x - y).abs())
    }

    #[test]
    fn test_match_reordered() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [3.0, 1.0, 2.0];
        let a = match_indices(&xs, &ys, &MatchingConfig::default(), abs_diff).unwrap();
        assert_eq!(a.matches, vec![Some(1), Some(2), Some(0)]);
        assert!(a.total_cost.abs() < 1e-9);
        assert!(a.is_exact());
    }

    #[test]
    fn test_excess_rows_map_to_none() {
        let xs = [0.0, 10.0, 20.0];
        let ys = [19.0];
        let a = match_indices(&xs, &ys, &MatchingConfig::default(), abs_diff).unwrap();
        assert_eq!(a.matches, vec![None, None, Some(0)]);
        assert_eq!(a.n_matched(), 1);
        assert_eq!(a.pairs().collect::<Vec<_>>(), vec![(2, 0)]);
    }

    #[test]
    fn test_every_row_matched_when_columns_suffice() {
        let xs = [5.0, 6.0];
        let ys = [100.0, 200.0, 5.5, 7.0];
        let a = match_indices(&xs, &ys, &MatchingConfig::default(), abs_diff).unwrap();
        assert_eq!(a.n_matched(), 2);
        assert_eq!(a.matches, vec![Some(2), Some(3)]);
    }

    #[test]
    fn test_empty_sides() {
        let none: [f64; 0] = [];
        let cfg = MatchingConfig::default();
        assert_eq!(match_indices(&none, &[1.0], &cfg, abs_diff).unwrap().matches, vec![]);
        assert_eq!(
            match_indices(&[1.0, 2.0], &none, &cfg, abs_diff).unwrap().matches,
            vec![None, None]
        );
    }

    #[test]
    fn test_refuses_oversize() {
        let cfg = MatchingConfig {
            max_exact_size: 2,
            ..MatchingConfig::default()
        };
        let err = match_indices(&[1.0, 2.0, 3.0], &[1.0], &cfg, abs_diff).unwrap_err();
        assert!(matches!(
            err,
            OrdDiffError::Matching {
                source: MatchingErrorKind::TooLarge { size: 3, limit: 2 },
                ..
            }
        ));
    }

    #[test]
    fn test_degrades_when_configured() {
        let cfg = MatchingConfig {
            max_exact_size: 2,
            oversize: OversizeStrategy::Greedy,
            ..MatchingConfig::default()
        };
        let a = match_indices(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0], &cfg, abs_diff).unwrap();
        assert_eq!(a.method, AssignmentMethod::Greedy);
        assert_eq!(a.matches, vec![Some(2), Some(1), Some(0)]);
    }

    #[test]
    fn test_rejects_invalid_costs() {
        let cfg = MatchingConfig::default();
        let negative = match_indices(&[1.0], &[2.0], &cfg, |_, _| Ok(-1.0));
        assert!(matches!(
            negative,
            Err(OrdDiffError::Matching {
                source: MatchingErrorKind::InvalidCost(_),
                ..
            })
        ));
        assert!(match_indices(&[1.0], &[2.0], &cfg, |_, _| Ok(f64::NAN)).is_err());
    }

    #[test]
    fn test_parallel_matrix_matches_sequential() {
        let xs: Vec<f64> = (0..12).map(f64::from).collect();
        let ys: Vec<f64> = (0..12).rev().map(|v| f64::from(v) + 0.25).collect();
        let seq = cost_matrix(&xs, &ys, usize::MAX, abs_diff).unwrap();
        let par = cost_matrix(&xs, &ys, 0, abs_diff).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_pair_distance_errors_propagate() {
        let result = match_indices(&[1.0], &[1.0], &MatchingConfig::default(), |_, _| {
            Err(OrdDiffError::validation("boom"))
        });
        assert!(matches!(result, Err(OrdDiffError::Validation(_))));
    }
}
