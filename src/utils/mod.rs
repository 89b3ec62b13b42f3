//! Shared utilities.

mod hash;

pub use hash::{content_hash, value_hash};
