//! Report type definitions.

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Brief summary output
    #[default]
    Summary,
    /// Structured JSON output
    Json,
    /// Leaf rows aligned in columns
    Table,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Summary => write!(f, "summary"),
            Self::Json => write!(f, "json"),
            Self::Table => write!(f, "table"),
        }
    }
}

/// Configuration for report generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// List unchanged leaves alongside changed ones
    pub include_unchanged: bool,
    /// Maximum rows per section
    pub max_items: Option<usize>,
    /// Additional metadata to include
    pub metadata: ReportMetadata,
}

impl ReportConfig {
    /// Keep at most `max_items` of `len` rows.
    pub(crate) fn limit(&self, len: usize) -> usize {
        self.max_items.map_or(len, |max| max.min(len))
    }
}

/// Metadata included in reports
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Reference input path
    pub old_path: Option<String>,
    /// Compared input path
    pub new_path: Option<String>,
    /// Tool version
    pub tool_version: String,
}

impl ReportMetadata {
    pub fn new() -> Self {
        Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_paths(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.old_path = Some(old.into());
        self.new_path = Some(new.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_display_matches_serde() {
        for format in [ReportFormat::Summary, ReportFormat::Json, ReportFormat::Table] {
            let json = serde_json::to_value(format).unwrap();
            assert_eq!(json, serde_json::Value::String(format.to_string()));
        }
    }

    #[test]
    fn test_limit() {
        let mut config = ReportConfig::default();
        assert_eq!(config.limit(7), 7);
        config.max_items = Some(3);
        assert_eq!(config.limit(7), 3);
        assert_eq!(config.limit(2), 2);
    }
}
