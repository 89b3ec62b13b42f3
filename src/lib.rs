//! **Structural diff and matching of nested reaction records.**
//!
//! `ord-diff` compares tree-shaped records (typically the JSON form of a
//! chemical reaction's compounds, with identifiers, amounts and a reaction
//! role) at the level of individual leaves. It is built for evaluating
//! information extraction: a reference record is compared against an
//! extracted one, and every leaf is reported as added, removed, altered or
//! unchanged.
//!
//! ## Key Features
//!
//! - **Leaf-level record diff**: every terminal value is addressed by its
//!   path, and each change is resolved to the leaves it covers on each side.
//! - **Unordered collection matching**: two lists of records are paired by a
//!   minimum-cost assignment, where the cost is a structural distance plus a
//!   penalty when the records' names differ.
//! - **Grouped collections**: two partitions of records are matched
//!   element-wise and every reference group is checked for being kept intact.
//! - **Reports**: JSON, compact summary and aligned table output.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: [`Record`], [`Leaf`] and [`LeafPath`].
//! - **[`tree`]**: flattening and the [`TreeDiffer`] seam with its default
//!   [`DeepDiffer`].
//! - **[`matching`]**: assignment solvers and the size policy.
//! - **[`diff`]**: [`DiffEngine`] and the pairwise, collection and grouped
//!   results.
//! - **[`reports`]**: generators for the output formats.
//! - **[`pipeline`]**: load -> diff -> report stages used by the CLI.
//!
//! ## Diffing Two Records
//!
//! ```
//! use ord_diff::{DiffEngine, Record};
//! use ord_diff::diff::DeltaKind;
//! use serde_json::json;
//!
//! let reference = Record::new(json!({
//!     "identifiers": [{"type": "NAME", "value": "ethanol"}],
//!     "amount": {"volume": {"value": 5.0, "units": "MILLILITER"}},
//!     "reactionRole": "SOLVENT"
//! }));
//! let extracted = Record::new(json!({
//!     "identifiers": [{"type": "NAME", "value": "ethanol"}],
//!     "amount": {"volume": {"value": 5.0, "units": "MILLILITER"}},
//!     "reactionRole": "REACTANT"
//! }));
//!
//! let engine = DiffEngine::new();
//! let diff = engine.diff_records(&reference, &extracted)?;
//! assert_eq!(diff.count(DeltaKind::Alteration), 1);
//! assert_eq!(diff.paths(DeltaKind::Alteration)[0].to_string(), "reactionRole");
//! # Ok::<(), ord_diff::OrdDiffError>(())
//! ```
//!
//! ## Matching Two Collections
//!
//! ```
//! use ord_diff::{DiffEngine, Record};
//! use serde_json::json;
//!
//! let compound = |name: &str| Record::new(json!({
//!     "identifiers": [{"type": "NAME", "value": name}]
//! }));
//! let reference = vec![compound("water"), compound("ethanol"), compound("acetone")];
//! let extracted = vec![compound("ethanol"), compound("water")];
//!
//! let diff = DiffEngine::new().diff_collection(&reference, &extracted)?;
//! assert_eq!(diff.index_match(), &[Some(1), Some(0), None]);
//! assert_eq!(diff.n_absent(), 1);
//! # Ok::<(), ord_diff::OrdDiffError>(())
//! ```
//!
//! ## Command-Line Interface (CLI)
//!
//! This documentation is for the `ord_diff` library crate. The `ord-diff`
//! binary wraps the same engine with `diff`, `diff-list` and `diff-groups`
//! subcommands.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // usize <-> f64 casts appear in distance and cost arithmetic; sizes are bounded
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools,
    clippy::unused_self,
    // Names like `m1`/`m2` or `old`/`new` are clear in context
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod matching;
pub mod model;
pub mod pipeline;
pub mod reports;
pub mod tree;
pub mod utils;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, BehaviorConfig, DiffConfig, OutputConfig};
pub use config::{ConfigError, Validatable};
pub use diff::{CollectionDiff, DiffEngine, GroupPlacement, GroupedCollectionDiff, PairwiseDiff};
pub use error::{ErrorContext, OrdDiffError, Result};
pub use matching::{Assignment, MatchingConfig, OversizeStrategy};
pub use model::{Leaf, LeafKind, LeafPath, Record, Side};
pub use reports::{DiffReport, ReportFormat, ReportGenerator};
pub use tree::{DeepDiffer, DifferConfig, TreeDiffer};
