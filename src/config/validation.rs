//! Configuration validation for ord-diff.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{AppConfig, BehaviorConfig, DiffConfig, OutputConfig};
use crate::matching::MatchingConfig;
use crate::model::NameRule;
use crate::tree::DifferConfig;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.matching.validate());
        errors.extend(self.differ.validate());
        errors.extend(self.output.validate());
        errors.extend(self.behavior.validate());
        errors
    }
}

impl Validatable for MatchingConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !self.name_weight.is_finite() || self.name_weight < 0.0 {
            errors.push(ConfigError {
                field: "matching.name_weight".to_string(),
                message: format!(
                    "Name weight must be a finite, non-negative number, got {}",
                    self.name_weight
                ),
            });
        }

        if self.max_exact_size == 0 {
            errors.push(ConfigError {
                field: "matching.max_exact_size".to_string(),
                message: "Exact matching limit must be at least 1".to_string(),
            });
        }

        errors.extend(self.name_rule.validate());
        errors
    }
}

impl Validatable for NameRule {
    fn validate(&self) -> Vec<ConfigError> {
        [
            ("list_field", &self.list_field),
            ("type_field", &self.type_field),
            ("type_value", &self.type_value),
            ("value_field", &self.value_field),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| ConfigError {
            field: format!("matching.name_rule.{name}"),
            message: "Must not be empty".to_string(),
        })
        .collect()
    }
}

impl Validatable for DifferConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !(0.0..=1.0).contains(&self.pair_cutoff) {
            errors.push(ConfigError {
                field: "differ.pair_cutoff".to_string(),
                message: format!(
                    "Pair cutoff must be between 0.0 and 1.0, got {}",
                    self.pair_cutoff
                ),
            });
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        // Validate output file path if specified
        if let Some(parent) = self.file.as_ref().and_then(|file| file.parent()) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                errors.push(ConfigError {
                    field: "output.file".to_string(),
                    message: format!("Parent directory does not exist: {}", parent.display()),
                });
            }
        }

        errors
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        // BehaviorConfig contains only boolean flags that don't need validation
        Vec::new()
    }
}

impl Validatable for DiffConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        // Validate paths exist
        if !self.paths.old.exists() {
            errors.push(ConfigError {
                field: "paths.old".to_string(),
                message: format!("File not found: {}", self.paths.old.display()),
            });
        }
        if !self.paths.new.exists() {
            errors.push(ConfigError {
                field: "paths.new".to_string(),
                message: format!("File not found: {}", self.paths.new.display()),
            });
        }

        // Validate nested configs
        errors.extend(self.matching.validate());
        errors.extend(self.differ.validate());
        errors.extend(self.output.validate());

        errors
    }
}
