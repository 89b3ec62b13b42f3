//! Data model for record comparison.
//!
//! A [`Record`] is a nested tree (a `serde_json::Value`, typically the JSON
//! form of a reaction sub-message such as a compound) together with its
//! flattened [`Leaf`] list. Leaves are addressed by [`LeafPath`]s, and a leaf's
//! identity is its address, not its content.
//!
//! ```
//! use ord_diff::model::{LeafPath, Record};
//! use serde_json::json;
//!
//! let record = Record::new(json!({
//!     "identifiers": [{"type": "NAME", "value": "ethanol"}],
//!     "amount": {"volume": {"value": 5.0, "units": "MILLILITER"}}
//! }));
//!
//! assert_eq!(record.name(), Some("ethanol"));
//! let path: LeafPath = "amount.volume.units".parse().unwrap();
//! assert!(record.leaf(&path).is_some());
//! ```

mod leaf;
mod path;
mod record;

pub use leaf::{Leaf, LeafKind};
pub use path::{LeafPath, PathSegment};
pub use record::{NameRule, Record};

use serde::{Deserialize, Serialize};

/// Which side of a comparison something belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The reference (`m1`) side
    First,
    /// The compared (`m2`) side
    Second,
}

impl Side {
    /// Short label used in reports (`m1` / `m2`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::First => "m1",
            Self::Second => "m2",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::First => write!(f, "first"),
            Self::Second => write!(f, "second"),
        }
    }
}
