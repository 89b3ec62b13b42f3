//! Summary and table report generators for shell output.
//!
//! Provides compact, human-readable output for terminal usage.

use super::json::leaf_totals;
use super::{DiffReport, ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::diff::{
    CollectionDiff, DeltaKind, GroupPlacement, GroupedCollectionDiff, LeafRow, PairwiseDiff,
};
use crate::model::{Leaf, Side};
use std::collections::BTreeMap;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn field(&self, label: &str, value: impl std::fmt::Display) -> String {
        let label = format!("{label}:");
        format!("{}{} {value}", self.color(&label, "cyan"), " ".repeat(10 - label.len().min(10)))
    }

    fn leaf_section(&self, lines: &mut Vec<String>, counts: &BTreeMap<DeltaKind, usize>) {
        let count = |kind: DeltaKind| counts.get(&kind).copied().unwrap_or(0);
        lines.push(String::new());
        lines.push(self.color("Leaf changes:", "bold"));
        lines.push(format!("  {} {:>6}", self.color("+ Added:  ", "green"), count(DeltaKind::Addition)));
        lines.push(format!("  {} {:>6}", self.color("- Removed:", "red"), count(DeltaKind::Removal)));
        lines.push(format!("  {} {:>6}", self.color("~ Altered:", "yellow"), count(DeltaKind::Alteration)));
    }

    fn element_section(&self, lines: &mut Vec<String>, diff: &CollectionDiff<'_>) {
        lines.push(self.field("Records", format!("{} → {}", diff.m1().len(), diff.m2().len())));
        lines.push(self.field(
            "Matched",
            format!(
                "{} ({}, total cost {:.4})",
                diff.n_matched(),
                diff.assignment().method,
                diff.assignment().total_cost
            ),
        ));
        lines.push(String::new());
        lines.push(self.color("Elements:", "bold"));
        lines.push(format!("  {} {:>6}", self.color("+ Excess: ", "green"), diff.n_excess()));
        lines.push(format!("  {} {:>6}", self.color("- Absent: ", "red"), diff.n_absent()));
        lines.push(format!("  {} {:>6}", self.color("~ Altered:", "yellow"), diff.n_altered()));
    }

    fn group_section(&self, lines: &mut Vec<String>, diff: &GroupedCollectionDiff<'_>) {
        lines.push(self.field("Groups", format!("{} → {}", diff.n_ref_groups(), diff.n_act_groups())));
        lines.push(self.field("Misplaced", diff.n_misplaced_groups()));
        for (group, (placement, members)) in diff
            .placements()
            .iter()
            .zip(diff.m1_groups())
            .enumerate()
            .filter(|(_, (placement, _))| placement.is_misplaced())
        {
            lines.push(format!(
                "  {} group {group} ({} records): {}",
                self.color("!", "red"),
                members.len(),
                describe_placement(placement)
            ));
        }
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate_diff_report(
        &self,
        report: DiffReport<'_, '_>,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();

        // Header
        let title = match report {
            DiffReport::Pairwise(_) => "Record Diff Summary",
            DiffReport::Collection(_) => "Collection Diff Summary",
            DiffReport::Grouped(_) => "Grouped Diff Summary",
        };
        lines.push(self.color(title, "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        // File info
        if let (Some(old), Some(new)) = (&config.metadata.old_path, &config.metadata.new_path) {
            lines.push(self.field("Files", format!("{old} → {new}")));
        }

        let totals = match report {
            DiffReport::Pairwise(diff) => {
                lines.push(self.field("Distance", format!("{:.4}", diff.distance())));
                diff.counts()
            }
            DiffReport::Collection(diff) => {
                self.element_section(&mut lines, diff);
                leaf_totals(diff)
            }
            DiffReport::Grouped(diff) => {
                self.group_section(&mut lines, diff);
                lines.push(String::new());
                self.element_section(&mut lines, diff.elements());
                leaf_totals(diff.elements())
            }
        };
        self.leaf_section(&mut lines, &totals);

        // Status
        lines.push(String::new());
        let status = if report.has_changes() {
            self.color("changes detected", "yellow")
        } else {
            self.color("identical", "green")
        };
        lines.push(format!("{} {status}", self.color("Status:", "bold")));

        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}

/// Table reporter listing one row per leaf
pub struct TableReporter {
    /// Use colored output
    colored: bool,
}

impl TableReporter {
    /// Create a new table reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    /// Render aligned rows; `tint` picks the color of each body row.
    fn render(&self, headers: &[&str], rows: &[(Vec<String>, &str)]) -> Vec<String> {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
        for (cells, _) in rows {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.width());
            }
        }
        let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);

        let header: Vec<String> = headers.iter().map(|h| (*h).to_string()).collect();
        let mut lines = vec![
            self.color(&align(&header, &widths), "bold"),
            "─".repeat(total),
        ];
        lines.extend(
            rows.iter()
                .map(|(cells, tint)| self.color(&align(cells, &widths), tint)),
        );
        lines
    }

    fn leaf_table(
        &self,
        lines: &mut Vec<String>,
        rows: Vec<(Option<usize>, &Leaf, LeafRow)>,
        config: &ReportConfig,
    ) {
        let with_pair = rows.iter().any(|(pair, _, _)| pair.is_some());
        let visible: Vec<_> = rows
            .into_iter()
            .filter(|(_, _, row)| config.include_unchanged || row.change.is_some())
            .collect();
        if visible.is_empty() {
            lines.push("No leaf changes.".to_string());
            return;
        }

        let mut headers = Vec::new();
        if with_pair {
            headers.push("PAIR");
        }
        headers.extend(["SIDE", "CHANGE", "KIND", "PATH", "VALUE"]);

        let body: Vec<(Vec<String>, &str)> = visible
            .iter()
            .take(config.limit(visible.len()))
            .map(|(pair, leaf, row)| {
                let mut cells = Vec::with_capacity(headers.len());
                if let Some(pair) = pair {
                    cells.push(pair.to_string());
                }
                let (label, tint) = change_label(row.change);
                cells.push(row.from.label().to_string());
                cells.push(label.to_string());
                cells.push(row.leaf_kind.to_string());
                cells.push(row.path.to_string());
                cells.push(truncate(&leaf.value.to_string(), 40));
                (cells, tint)
            })
            .collect();
        lines.extend(self.render(&headers, &body));
    }

    fn placement_table(&self, lines: &mut Vec<String>, diff: &GroupedCollectionDiff<'_>) {
        let body: Vec<(Vec<String>, &str)> = diff
            .placements()
            .iter()
            .zip(diff.m1_groups())
            .enumerate()
            .map(|(group, (placement, members))| {
                let tint = if placement.is_misplaced() { "red" } else { "" };
                (
                    vec![
                        group.to_string(),
                        members.len().to_string(),
                        describe_placement(placement),
                    ],
                    tint,
                )
            })
            .collect();
        lines.extend(self.render(&["GROUP", "SIZE", "PLACEMENT"], &body));
    }
}

impl Default for TableReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for TableReporter {
    fn generate_diff_report(
        &self,
        report: DiffReport<'_, '_>,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();

        match report {
            DiffReport::Pairwise(diff) => {
                self.leaf_table(&mut lines, pair_rows(None, diff), config);
            }
            DiffReport::Collection(diff) => {
                self.leaf_table(&mut lines, collection_rows(diff), config);
            }
            DiffReport::Grouped(diff) => {
                self.placement_table(&mut lines, diff);
                lines.push(String::new());
                self.leaf_table(&mut lines, collection_rows(diff.elements()), config);
            }
        }

        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Table
    }
}

/// Leaf rows of one pair, each with the leaf it describes.
fn pair_rows<'a>(
    pair: Option<usize>,
    diff: &PairwiseDiff<'a>,
) -> Vec<(Option<usize>, &'a Leaf, LeafRow)> {
    diff.leaf_rows()
        .into_iter()
        .filter_map(|row| {
            let record = match row.from {
                Side::First => diff.m1(),
                Side::Second => diff.m2(),
            };
            record.leaf(&row.path).map(|leaf| (pair, leaf, row))
        })
        .collect()
}

fn collection_rows<'a>(diff: &CollectionDiff<'a>) -> Vec<(Option<usize>, &'a Leaf, LeafRow)> {
    diff.pair_diffs()
        .iter()
        .enumerate()
        .filter_map(|(i, pair)| pair.as_ref().map(|pair| pair_rows(Some(i), pair)))
        .flatten()
        .collect()
}

const fn change_label(change: Option<DeltaKind>) -> (&'static str, &'static str) {
    match change {
        Some(DeltaKind::Addition) => ("+ added", "green"),
        Some(DeltaKind::Removal) => ("- removed", "red"),
        Some(DeltaKind::Alteration) => ("~ altered", "yellow"),
        None => ("= same", "dim"),
    }
}

/// One-line description of a group placement.
fn describe_placement(placement: &GroupPlacement) -> String {
    let join = |items: &[usize]| {
        items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    match placement {
        GroupPlacement::Intact { target } => format!("intact in group {target}"),
        GroupPlacement::MissingElement { unmatched } => {
            format!("no counterpart for element(s) {}", join(unmatched))
        }
        GroupPlacement::Split { targets } => format!("split across groups {}", join(targets)),
        GroupPlacement::Expanded {
            target,
            source_size,
            target_size,
        } => format!("expanded in group {target} ({source_size} → {target_size})"),
        GroupPlacement::Contracted {
            target,
            source_size,
            target_size,
        } => format!("contracted in group {target} ({source_size} → {target_size})"),
        GroupPlacement::Empty => "empty group".to_string(),
    }
}

/// Pad every cell but the last to its column width.
fn align(cells: &[String], widths: &[usize]) -> String {
    let last = cells.len().saturating_sub(1);
    cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &width))| {
            if i == last {
                cell.clone()
            } else {
                format!("{cell}{}", " ".repeat(width.saturating_sub(cell.width())))
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Truncate to at most `max_width` display columns.
fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(3);
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}
