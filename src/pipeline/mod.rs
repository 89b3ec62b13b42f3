//! Pipeline orchestration for comparison commands.
//!
//! Shared load -> diff -> report logic used by the CLI command handlers.

mod diff_stage;
mod output;
mod parse;
mod report_stage;

pub use diff_stage::build_engine;
pub use output::{should_use_color, write_output, OutputTarget};
pub use parse::{
    groups_from_value, load_collection, load_groups, load_record, load_value, record_from_value,
    records_from_value,
};
pub use report_stage::{output_report, report_config};

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success - no changes detected (or no --fail-on-change)
    pub const SUCCESS: i32 = 0;
    /// Changes were detected
    pub const CHANGES_DETECTED: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}
