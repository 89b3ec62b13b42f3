//! Terminal values of a record tree.

use super::path::{LeafPath, PathSegment};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::hash::{Hash, Hasher};

/// Compound sub-tree a leaf belongs to.
///
/// The kinds are disjoint: a leaf is classified once, from the first segment
/// of its path, when it is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafKind {
    /// Under `reactionRole`
    ReactionRole,
    /// Under `identifiers`
    Identifiers,
    /// Under `amount`
    Amount,
    /// Anything else
    Other,
}

impl LeafKind {
    /// Classify a leaf by its top-level field.
    #[must_use]
    pub fn classify(path: &LeafPath) -> Self {
        match path.first() {
            Some(PathSegment::Key(key)) => match key.as_str() {
                "reactionRole" => Self::ReactionRole,
                "identifiers" => Self::Identifiers,
                "amount" => Self::Amount,
                _ => Self::Other,
            },
            Some(PathSegment::Index(_)) | None => Self::Other,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ReactionRole => "reaction_role",
            Self::Identifiers => "identifiers",
            Self::Amount => "amount",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::ReactionRole, Self::Identifiers, Self::Amount, Self::Other]
    }
}

impl std::fmt::Display for LeafKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A terminal value addressed by its path.
///
/// Equality and hashing consider the path only.
#[derive(Debug, Clone, Serialize)]
pub struct Leaf {
    pub path: LeafPath,
    /// Scalar value, `null` for an empty container
    pub value: Value,
    /// Whether the value was implied rather than stated in the source text.
    /// Only meaningful when evaluating information extraction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_implicit: Option<bool>,
    kind: LeafKind,
}

impl Leaf {
    pub fn new(path: LeafPath, value: Value) -> Self {
        let kind = LeafKind::classify(&path);
        Self {
            path,
            value,
            is_implicit: None,
            kind,
        }
    }

    #[must_use]
    pub const fn with_implicit(mut self, is_implicit: bool) -> Self {
        self.is_implicit = Some(is_implicit);
        self
    }

    #[must_use]
    pub const fn kind(&self) -> LeafKind {
        self.kind
    }
}

impl PartialEq for Leaf {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Leaf {}

impl Hash for Leaf {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_is_the_path() {
        let path = LeafPath::root().child("amount").child("mass").child("value");
        let a = Leaf::new(path.clone(), json!(1.5));
        let b = Leaf::new(path, json!(2.0));
        assert_eq!(a, b);

        let c = Leaf::new(LeafPath::root().child("amount"), json!(1.5));
        assert_ne!(a, c);
    }

    #[test]
    fn test_classify_by_top_level_field() {
        let role = LeafPath::root().child("reactionRole");
        let name = LeafPath::root().child("identifiers").index(0).child("value");
        let nested_amount = LeafPath::root().child("preparations").index(0).child("amount");

        assert_eq!(LeafKind::classify(&role), LeafKind::ReactionRole);
        assert_eq!(LeafKind::classify(&name), LeafKind::Identifiers);
        assert_eq!(LeafKind::classify(&nested_amount), LeafKind::Other);
        assert_eq!(LeafKind::classify(&LeafPath::root()), LeafKind::Other);
    }
}
