//! Assignment solvers over a dense `n x m` cost matrix.
//!
//! Every solver returns one entry per row: the assigned column, or `None`
//! when the row is left unmatched. A column is used at most once. Exact
//! assignment leaves a row unmatched only when there are more rows than
//! columns.

use crate::error::{MatchingErrorKind, OrdDiffError, Result};
use pathfinding::kuhn_munkres::kuhn_munkres_min;
use pathfinding::matrix::Matrix;
use std::cmp::Ordering;

/// Smallest fixed-point scale used to convert float costs to the solver's
/// integers. Matrices with small costs get a finer scale, see [`cost_scale`].
pub const COST_SCALE: f64 = 1_000_000.0;

/// Fixed-point scale for one matrix: as fine as `i64` allows when every
/// assignment sums `rows` cells no larger than `max_cost`, and never coarser
/// than [`COST_SCALE`].
///
/// The largest scaled cell stays at half the solver's cell limit, so float
/// rounding in `max_cost * scale` cannot trip the overflow check.
#[must_use]
pub fn cost_scale(rows: usize, max_cost: f64) -> f64 {
    let cell_limit = (i64::MAX / 8) as f64 / rows.max(1) as f64;
    if max_cost.is_finite() && max_cost > 0.0 {
        (cell_limit / max_cost).max(COST_SCALE)
    } else {
        COST_SCALE
    }
}

/// Sum of the costs of the assigned cells.
#[must_use]
pub fn total_cost(costs: &[Vec<f64>], assignment: &[Option<usize>]) -> f64 {
    assignment
        .iter()
        .enumerate()
        .filter_map(|(i, j)| j.map(|j| costs[i][j]))
        .sum()
}

/// Minimum-cost assignment (Kuhn-Munkres).
///
/// The matrix is padded to `n x max(n, m)` with zero-cost columns, so rows in
/// excess of the real columns land on padding and come back as `None`.
pub fn hungarian(costs: &[Vec<f64>], columns: usize) -> Result<Vec<Option<usize>>> {
    let rows = costs.len();
    if rows == 0 {
        return Ok(Vec::new());
    }
    if columns == 0 {
        return Ok(vec![None; rows]);
    }
    let width = rows.max(columns);

    // Every assignment sums `rows` cells; keep that sum inside i64.
    let cell_limit = (i64::MAX / 4) as f64 / rows as f64;
    let max_cost = costs
        .iter()
        .flat_map(|row| row.iter().take(columns))
        .fold(0.0f64, |acc, &c| acc.max(c.abs()));
    let scale = cost_scale(rows, max_cost);
    let mut weights = Vec::with_capacity(rows);
    for row in costs {
        let mut scaled = Vec::with_capacity(width);
        for &cost in row.iter().take(columns) {
            let cell = (cost * scale).round();
            if cell > cell_limit {
                return Err(OrdDiffError::matching(
                    "scaling cost matrix",
                    MatchingErrorKind::Assignment(format!(
                        "cost {cost} overflows the fixed-point solver for {rows} rows"
                    )),
                ));
            }
            scaled.push(cell as i64);
        }
        scaled.resize(width, 0);
        weights.push(scaled);
    }

    let matrix = Matrix::from_rows(weights).map_err(|e| {
        OrdDiffError::matching(
            "building cost matrix",
            MatchingErrorKind::Assignment(format!("{e:?}")),
        )
    })?;
    let (_, assignment) = kuhn_munkres_min(&matrix);

    Ok(assignment
        .into_iter()
        .map(|j| (j < columns).then_some(j))
        .collect())
}

/// Greedy assignment: cells taken in ascending cost order while both row
/// and column are free.
///
/// Rows stay unmatched only when columns run out.
#[must_use]
pub fn greedy(costs: &[Vec<f64>], columns: usize) -> Vec<Option<usize>> {
    let rows = costs.len();
    let mut cells: Vec<(usize, usize, f64)> = costs
        .iter()
        .enumerate()
        .flat_map(|(i, row)| row.iter().take(columns).enumerate().map(move |(j, &c)| (i, j, c)))
        .collect();
    cells.sort_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(Ordering::Equal));

    let mut result = vec![None; rows];
    let mut used_cols = vec![false; columns];
    let mut remaining = rows.min(columns);

    for (i, j, _) in cells {
        if remaining == 0 {
            break;
        }
        if result[i].is_none() && !used_cols[j] {
            result[i] = Some(j);
            used_cols[j] = true;
            remaining -= 1;
        }
    }

    result
}

/// Greedy assignment refined by local moves.
///
/// Each pass tries, for every pair of rows, exchanging their columns (a 2-opt
/// swap; when one row is unmatched it takes over the other's column), then
/// moving each row onto a cheaper free column. Passes stop when nothing
/// improves or after `max_iterations`.
#[must_use]
pub fn greedy_with_swaps(
    costs: &[Vec<f64>],
    columns: usize,
    max_iterations: usize,
) -> Vec<Option<usize>> {
    let mut result = greedy(costs, columns);
    let rows = result.len();
    if rows == 0 || columns == 0 {
        return result;
    }

    let mut used_cols = vec![false; columns];
    for &j in result.iter().flatten() {
        used_cols[j] = true;
    }

    // An unmatched row contributes nothing.
    let cell = |i: usize, j: Option<usize>| j.map_or(0.0, |j| costs[i][j]);

    let mut improved = true;
    let mut iterations = 0;

    while improved && iterations < max_iterations {
        improved = false;
        iterations += 1;

        for a in 0..rows {
            for b in (a + 1)..rows {
                let (ja, jb) = (result[a], result[b]);
                if ja.is_none() && jb.is_none() {
                    continue;
                }
                let current = cell(a, ja) + cell(b, jb);
                let swapped = cell(a, jb) + cell(b, ja);
                if swapped < current {
                    result[a] = jb;
                    result[b] = ja;
                    improved = true;
                }
            }

            if let Some(ja) = result[a] {
                let cheaper = (0..columns).find(|&j| !used_cols[j] && costs[a][j] < costs[a][ja]);
                if let Some(j) = cheaper {
                    used_cols[ja] = false;
                    used_cols[j] = true;
                    result[a] = Some(j);
                    improved = true;
                }
            }
        }
    }

    result
}
