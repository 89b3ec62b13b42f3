//! Configuration module for ord-diff.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - Command-line overrides
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ord_diff::config::AppConfig;
//!
//! // Use defaults
//! let config = AppConfig::default();
//!
//! // Use builder
//! let config = AppConfig::builder()
//!     .name_weight(50.0)
//!     .max_exact_size(500)
//!     .fail_on_change(true)
//!     .build();
//!
//! // Load from file
//! use ord_diff::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.ord-diff.yaml` file in your project root or `~/.config/ord-diff/`:
//!
//! ```yaml
//! matching:
//!   name_weight: 100.0
//!   max_exact_size: 1000
//!   oversize: greedy-with-swaps
//! differ:
//!   ignore_order: true
//!   pair_cutoff: 0.3
//! ```

pub mod file;
mod types;
mod validation;

// Re-export main types
pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, DiffConfig, DiffPaths, InputShape, OutputConfig,
};
pub use validation::{ConfigError, Validatable};

// Re-export file utilities
pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError, ConfigOverrides, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.ord-diff.yaml` config files. It can be used by editors for
/// validation and autocompletion.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
