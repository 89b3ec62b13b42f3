//! Unified error types for ord-diff.
//!
//! Every failure is local to a single comparison call: a failed comparison
//! aborts that call's result entirely and leaves nothing behind.

use crate::model::{LeafPath, Side};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ord-diff operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum OrdDiffError {
    /// Errors while loading input trees
    #[error("Failed to parse input: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// Errors during pairwise diff computation
    #[error("Diff computation failed: {context}")]
    Diff {
        context: String,
        #[source]
        source: DiffErrorKind,
    },

    /// Errors during collection matching
    #[error("Matching operation failed: {context}")]
    Matching {
        context: String,
        #[source]
        source: MatchingErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Unexpected input shape: expected {expected}, found {found}")]
    UnexpectedShape { expected: String, found: String },
}

/// Specific diff error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DiffErrorKind {
    /// The tree-differ reported a path the flattener never produced.
    #[error("No leaf at path '{path}' in the {side} record")]
    UnknownLeaf { path: LeafPath, side: Side },
}

/// Specific matching error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MatchingErrorKind {
    #[error("Record {index} on the {side} side has no name leaf")]
    MissingName { side: Side, index: usize },

    #[error("Collection of size {size} exceeds the exact matching limit of {limit}")]
    TooLarge { size: usize, limit: usize },

    #[error("Pair distance must be finite and non-negative, got {0}")]
    InvalidCost(f64),

    #[error("Assignment solver failed: {0}")]
    Assignment(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for ord-diff operations
pub type Result<T> = std::result::Result<T, OrdDiffError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl OrdDiffError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a parse error for an input of the wrong shape
    pub fn unexpected_shape(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::parse(
            "input shape",
            ParseErrorKind::UnexpectedShape {
                expected: expected.into(),
                found: found.into(),
            },
        )
    }

    /// Create a diff error
    pub fn diff(context: impl Into<String>, source: DiffErrorKind) -> Self {
        Self::Diff {
            context: context.into(),
            source,
        }
    }

    /// Create a consistency error for a path that resolves to no leaf
    pub fn unknown_leaf(path: LeafPath, side: Side) -> Self {
        Self::diff("resolving leaf", DiffErrorKind::UnknownLeaf { path, side })
    }

    /// Create a matching error
    pub fn matching(context: impl Into<String>, source: MatchingErrorKind) -> Self {
        Self::Matching {
            context: context.into(),
            source,
        }
    }

    /// Create a matching error for a record without a name
    pub fn missing_name(side: Side, index: usize) -> Self {
        Self::matching(
            "checking record names",
            MatchingErrorKind::MissingName { side, index },
        )
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for OrdDiffError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for OrdDiffError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(
            "JSON deserialization",
            ParseErrorKind::InvalidJson(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// ```ignore
/// use ord_diff::error::ErrorContext;
///
/// let diff = engine
///     .diff_records(&m1, &m2)
///     .with_context(|| format!("comparing pair {i}"))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error, prepending it to any existing context.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, only evaluated on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<OrdDiffError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: OrdDiffError, new_ctx: &str) -> OrdDiffError {
    match err {
        OrdDiffError::Parse {
            context: existing,
            source,
        } => OrdDiffError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        OrdDiffError::Diff {
            context: existing,
            source,
        } => OrdDiffError::Diff {
            context: chain_context(new_ctx, &existing),
            source,
        },
        OrdDiffError::Matching {
            context: existing,
            source,
        } => OrdDiffError::Matching {
            context: chain_context(new_ctx, &existing),
            source,
        },
        OrdDiffError::Io {
            path,
            message,
            source,
        } => OrdDiffError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        OrdDiffError::Config(msg) => OrdDiffError::Config(chain_context(new_ctx, &msg)),
        OrdDiffError::Validation(msg) => OrdDiffError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Returns "`new`: `existing`", or just `new` when there is no existing context.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
