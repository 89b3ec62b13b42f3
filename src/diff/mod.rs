//! Record, collection and grouped-collection diffs.
//!
//! # Architecture
//!
//! - [`PairwiseDiff`]: leaf-level diff of two records, resolved against the
//!   records' own leaves
//! - [`CollectionDiff`]: minimum-cost correspondence between two collections
//!   plus the pairwise diff of every matched pair
//! - [`GroupedCollectionDiff`]: the same correspondence over two partitions,
//!   with a [`GroupPlacement`] per source group
//!
//! [`DiffEngine`] ties these to a [`TreeDiffer`](crate::tree::TreeDiffer), a
//! [`CostModel`] and a [`MatchingConfig`](crate::matching::MatchingConfig).
//!
//! # Example
//!
//! ```
//! use ord_diff::diff::DiffEngine;
//! use ord_diff::model::Record;
//! use serde_json::json;
//!
//! let water = |ml: f64| Record::new(json!({
//!     "identifiers": [{"type": "NAME", "value": "water"}],
//!     "amount": {"volume": {"value": ml, "units": "MILLILITER"}}
//! }));
//! let old = vec![water(5.0)];
//! let new = vec![water(10.0)];
//!
//! let engine = DiffEngine::new();
//! let diff = engine.diff_collection(&old, &new).unwrap();
//! assert_eq!(diff.index_match(), &[Some(0)]);
//! assert_eq!(diff.n_altered(), 1);
//! ```

mod collection;
mod cost;
mod engine;
mod grouped;
mod pairwise;

pub use collection::{CollectionDiff, CollectionLeafRow};
pub use cost::CostModel;
pub use engine::DiffEngine;
pub use grouped::{GroupPlacement, GroupSlot, GroupedCollectionDiff};
pub use pairwise::{Alteration, DeltaKind, LeafRow, PairwiseDiff};
