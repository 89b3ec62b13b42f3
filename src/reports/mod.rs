//! Report generation for diff results.
//!
//! Three output formats are provided:
//! - JSON: structured data for programmatic integration
//! - Summary: compact shell-friendly counts
//! - Table: one aligned row per leaf
//!
//! Every reporter accepts a [`DiffReport`], which borrows whichever result
//! the comparison produced (a record pair, two collections or two partitions).

mod json;
mod summary;
mod types;

pub use json::JsonReporter;
pub use summary::{SummaryReporter, TableReporter};
pub use types::{ReportConfig, ReportFormat, ReportMetadata};

use crate::diff::{CollectionDiff, GroupedCollectionDiff, PairwiseDiff};
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// A borrowed comparison result of any input shape.
#[derive(Debug, Clone, Copy)]
pub enum DiffReport<'r, 'a> {
    /// Two single records
    Pairwise(&'r PairwiseDiff<'a>),
    /// Two flat collections
    Collection(&'r CollectionDiff<'a>),
    /// Two partitions into groups
    Grouped(&'r GroupedCollectionDiff<'a>),
}

impl<'r, 'a> DiffReport<'r, 'a> {
    /// Input shape label used in report headers.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Pairwise(_) => "record",
            Self::Collection(_) => "collection",
            Self::Grouped(_) => "groups",
        }
    }

    /// Whether the comparison found any difference.
    ///
    /// A grouped comparison also counts misplaced groups.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        match self {
            Self::Pairwise(diff) => !diff.is_identical(),
            Self::Collection(diff) => !diff.is_identical(),
            Self::Grouped(diff) => {
                !diff.elements().is_identical() || diff.n_misplaced_groups() > 0
            }
        }
    }

    /// Element-level collection diff, if the shape has one.
    #[must_use]
    pub fn elements(&self) -> Option<&'r CollectionDiff<'a>> {
        match *self {
            Self::Pairwise(_) => None,
            Self::Collection(diff) => Some(diff),
            Self::Grouped(diff) => Some(diff.elements()),
        }
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report from a comparison result
    fn generate_diff_report(
        &self,
        report: DiffReport<'_, '_>,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Write report to a writer
    fn write_diff_report(
        &self,
        report: DiffReport<'_, '_>,
        config: &ReportConfig,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let report = self.generate_diff_report(report, config)?;
        writer.write_all(report.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    create_reporter_with_options(format, true)
}

/// Create a report generator with color control
#[must_use]
pub fn create_reporter_with_options(
    format: ReportFormat,
    use_color: bool,
) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Summary => {
            if use_color {
                Box::new(SummaryReporter::new())
            } else {
                Box::new(SummaryReporter::new().no_color())
            }
        }
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Table => {
            if use_color {
                Box::new(TableReporter::new())
            } else {
                Box::new(TableReporter::new().no_color())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffEngine;
    use crate::model::Record;
    use serde_json::json;

    #[test]
    fn test_create_reporter_formats() {
        for format in [ReportFormat::Summary, ReportFormat::Json, ReportFormat::Table] {
            assert_eq!(create_reporter(format).format(), format);
        }
    }

    #[test]
    fn test_has_changes() {
        let engine = DiffEngine::new();
        let a = Record::new(json!({"reactionRole": "REACTANT"}));
        let b = Record::new(json!({"reactionRole": "SOLVENT"}));

        let same = engine.diff_records(&a, &a).unwrap();
        assert!(!DiffReport::Pairwise(&same).has_changes());
        let changed = engine.diff_records(&a, &b).unwrap();
        assert!(DiffReport::Pairwise(&changed).has_changes());
        assert_eq!(DiffReport::Pairwise(&changed).shape(), "record");
        assert!(DiffReport::Pairwise(&changed).elements().is_none());
    }

    #[test]
    fn test_write_diff_report_to_buffer() {
        let engine = DiffEngine::new();
        let a = Record::new(json!({"x": 1}));
        let diff = engine.diff_records(&a, &a).unwrap();
        let mut buffer = Vec::new();
        JsonReporter::new()
            .write_diff_report(DiffReport::Pairwise(&diff), &ReportConfig::default(), &mut buffer)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["metadata"]["shape"], "record");
    }
}
