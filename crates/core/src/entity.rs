//! Entity types - anatomy and observation mentions in a report

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Source-assigned entity identifier, unique within one report.
///
/// Ids order numerically when both sides are unsigned integers (RadGraph
/// numbers its entities `"1"`, `"2"`, ... `"10"`), numeric ids sort before
/// non-numeric ones, and everything else compares lexically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl Ord for EntityId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            // "01" and "1" are distinct ids; fall back to the text to stay consistent with Eq
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for EntityId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Whether an observation is asserted, negated or hedged
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Certainty {
    /// Definitely present
    Present,
    /// Definitely absent
    Absent,
    /// Uncertain
    Uncertain,
}

impl fmt::Display for Certainty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Certainty::Present => write!(f, "present"),
            Certainty::Absent => write!(f, "absent"),
            Certainty::Uncertain => write!(f, "uncertain"),
        }
    }
}

/// The category of an entity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityLabel {
    /// An anatomical structure (`ANAT-DP`)
    Anatomy,
    /// A finding (`OBS-DP`, `OBS-U`, `OBS-DA`)
    Observation(Certainty),
}

impl EntityLabel {
    /// Classify a raw label string. Never fails: anything that is not an
    /// anatomy label is an observation, present unless its qualifier says
    /// otherwise. Spelled-out qualifiers (`absent`, `uncertain`, `present`)
    /// take precedence over the RadGraph codes `DP`, `U` and `DA`.
    pub fn classify(raw: &str) -> Self {
        let upper = raw.trim().to_ascii_uppercase();
        if upper.starts_with("ANAT") {
            return Self::Anatomy;
        }

        let qualifier = upper
            .rsplit_once('-')
            .map(|(_, qualifier)| qualifier)
            .unwrap_or(upper.as_str());
        let certainty = if qualifier.contains("ABSENT") {
            Certainty::Absent
        } else if qualifier.contains("UNCERTAIN") {
            Certainty::Uncertain
        } else if qualifier.contains("PRESENT") || qualifier.contains("DP") {
            Certainty::Present
        } else if qualifier.contains('U') {
            Certainty::Uncertain
        } else if qualifier.contains("DA") {
            Certainty::Absent
        } else {
            Certainty::Present
        };
        Self::Observation(certainty)
    }

    pub fn is_anatomy(&self) -> bool {
        matches!(self, Self::Anatomy)
    }

    pub fn certainty(&self) -> Option<Certainty> {
        match self {
            Self::Anatomy => None,
            Self::Observation(certainty) => Some(*certainty),
        }
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityLabel::Anatomy => write!(f, "anatomy"),
            EntityLabel::Observation(certainty) => write!(f, "observation ({})", certainty),
        }
    }
}

/// Inclusive word-token range of an entity inside the report text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
}

/// An entity extracted from a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,

    /// Surface words, in source order (never empty once parsed)
    pub tokens: Vec<String>,

    pub label: EntityLabel,

    /// The label exactly as the extractor wrote it
    pub raw_label: String,

    /// Position in the report text, when the extractor recorded one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<TokenSpan>,
}

impl Entity {
    /// Create a new entity, classifying its label
    pub fn new(id: impl Into<EntityId>, tokens: Vec<String>, raw_label: impl Into<String>) -> Self {
        let raw_label = raw_label.into();
        Self {
            id: id.into(),
            tokens,
            label: EntityLabel::classify(&raw_label),
            raw_label,
            span: None,
        }
    }

    /// Builder: set token span
    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.span = Some(TokenSpan { start, end });
        self
    }

    /// Tokens joined with single spaces
    pub fn phrase(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn is_anatomy(&self) -> bool {
        self.label.is_anatomy()
    }

    pub fn is_observation(&self) -> bool {
        !self.label.is_anatomy()
    }
}
