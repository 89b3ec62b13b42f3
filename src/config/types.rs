//! Configuration types for ord-diff operations.

use crate::matching::MatchingConfig;
use crate::reports::ReportFormat;
use crate::tree::DifferConfig;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Collection matching (name weight, size ceiling, oversize strategy)
    pub matching: MatchingConfig,
    /// Tree diffing (list order, element pairing cutoff)
    pub differ: DifferConfig,
    /// Output configuration (format, file)
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the weight of the name distance in the pair cost.
    pub const fn name_weight(mut self, weight: f64) -> Self {
        self.config.matching.name_weight = weight;
        self
    }

    /// Set the largest collection matched exactly.
    pub const fn max_exact_size(mut self, size: usize) -> Self {
        self.config.matching.max_exact_size = size;
        self
    }

    /// Set the behaviour for collections above the exact limit.
    pub const fn oversize(mut self, strategy: crate::matching::OversizeStrategy) -> Self {
        self.config.matching.oversize = strategy;
        self
    }

    /// Compare lists by position instead of as multisets.
    pub const fn positional_lists(mut self, positional: bool) -> Self {
        self.config.differ.ignore_order = !positional;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Enable fail-on-change mode.
    pub const fn fail_on_change(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_change = fail;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Command-specific Configuration
// ============================================================================

/// Shape of the documents being compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum InputShape {
    /// One record per file
    #[default]
    Record,
    /// A JSON array of records per file
    Collection,
    /// A JSON array of arrays of records per file
    Groups,
}

impl std::fmt::Display for InputShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Record => write!(f, "record"),
            Self::Collection => write!(f, "collection"),
            Self::Groups => write!(f, "groups"),
        }
    }
}

/// Configuration for diff operations
#[derive(Debug, Clone)]
pub struct DiffConfig {
    /// Paths to compare
    pub paths: DiffPaths,
    /// Shape of both documents
    pub shape: InputShape,
    /// Output configuration
    pub output: OutputConfig,
    /// Matching configuration
    pub matching: MatchingConfig,
    /// Tree diffing configuration
    pub differ: DifferConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl DiffConfig {
    /// Combine paths and shape with an application config.
    #[must_use]
    pub fn new(paths: DiffPaths, shape: InputShape, app: AppConfig) -> Self {
        Self {
            paths,
            shape,
            output: app.output,
            matching: app.matching,
            differ: app.differ,
            behavior: app.behavior,
        }
    }

    /// The engine-facing part of this configuration.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            matching: self.matching.clone(),
            differ: self.differ.clone(),
            output: self.output.clone(),
            behavior: self.behavior.clone(),
        }
    }
}

/// Paths for diff operation
#[derive(Debug, Clone)]
pub struct DiffPaths {
    /// Path to the reference document
    pub old: PathBuf,
    /// Path to the compared document
    pub new: PathBuf,
}

// ============================================================================
// Sub-configurations
// ============================================================================

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// List unchanged leaves in table output
    pub include_unchanged: bool,
}

/// Behavior flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Exit with code 1 if any changes detected
    pub fail_on_change: bool,
    /// Suppress non-essential output
    pub quiet: bool,
}
