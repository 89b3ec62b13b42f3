//! Diff computation stage.
//!
//! Builds the engine from the command configuration.

use crate::config::DiffConfig;
use crate::diff::DiffEngine;

/// Build the diff engine for a command.
pub fn build_engine(config: &DiffConfig) -> DiffEngine {
    let engine = DiffEngine::from_config(&config.app_config());
    if !config.behavior.quiet {
        tracing::info!(
            shape = %config.shape,
            name_weight = config.matching.name_weight,
            max_exact_size = config.matching.max_exact_size,
            ignore_order = config.differ.ignore_order,
            "Computing structural diff"
        );
    }
    engine
}
