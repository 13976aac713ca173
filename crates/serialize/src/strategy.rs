//! The four serialization strategies

use crate::SerializeError;
use std::fmt;
use std::str::FromStr;

/// How a report graph is laid out as text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// One segment per weakly-connected component
    #[default]
    Subgraphs,
    /// Every entity in id order, anatomy and observations interleaved
    NoSep,
    /// Observations first, then a ` | ` and the anatomy list
    WithAnat,
    /// Like `WithAnat`, introduced by ` @ `
    WithAtAnat,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Subgraphs,
        Strategy::NoSep,
        Strategy::WithAnat,
        Strategy::WithAtAnat,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Subgraphs => "subgraphs",
            Strategy::NoSep => "no_sep",
            Strategy::WithAnat => "with_anat",
            Strategy::WithAtAnat => "with_@_anat",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = SerializeError;

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == wanted)
            .ok_or_else(|| SerializeError::UnknownStrategy(s.to_string()))
    }
}
