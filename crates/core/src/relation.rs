//! Relation types - labeled, directed links between entities

use crate::EntityId;
use serde::{Deserialize, Serialize};

/// Relation label commonly produced by RadGraph extractors
pub const LOCATED_AT: &str = "located_at";
pub const SUGGESTIVE_OF: &str = "suggestive_of";
pub const MODIFY: &str = "modify";

/// A directed relation between two entities of the same report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Source entity (the "from" node)
    pub source: EntityId,

    /// Target entity (the "to" node)
    pub target: EntityId,

    /// Relation label, kept verbatim (e.g. `located_at`)
    #[serde(rename = "type")]
    pub kind: String,
}

impl Relation {
    /// Create a new relation
    pub fn new(source: impl Into<EntityId>, target: impl Into<EntityId>, kind: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: kind.into(),
        }
    }
}
