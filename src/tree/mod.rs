//! Tree flattening and diffing.
//!
//! - [`flatten`] turns a nested tree into addressed leaves
//! - [`TreeDiffer`] reports differing nodes and a normalized distance;
//!   [`DeepDiffer`] is the default implementation
//! - [`adapt_tree_diff`] re-expresses node changes as leaf paths

mod adapter;
mod differ;
mod flatten;

pub use adapter::{adapt_tree_diff, AdaptedDiff, AlteredPaths};
pub use differ::{DeepDiffer, DifferConfig, NodeChange, TreeDiff, TreeDiffer};
pub use flatten::{flatten, flatten_at, leaf_count, FlatTree};
