//! CLI command handlers.
//!
//! Testable command handlers invoked by main.rs. Each handler implements the
//! logic for one CLI subcommand and returns the process exit code.

mod diff;

pub use diff::run_diff;

// Re-export config types used by handlers
pub use crate::config::{DiffConfig, InputShape};
