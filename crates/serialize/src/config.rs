//! Environment configuration for batch runs

use crate::{Result, SerializeOptions, Serializer, Strategy};

const DEFAULT_METHOD: &str = "subgraphs";
const DEFAULT_SEPARATE_SECTIONS: bool = false;
const DEFAULT_MARK_CERTAINTY: bool = false;
/// 0 lets rayon size the pool
const DEFAULT_JOBS: usize = 0;

/// Serializer settings, read from `RADGRAPH_*` variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializerConfig {
    pub method: String,
    pub separate_sections: bool,
    pub mark_certainty: bool,
    pub jobs: usize,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            method: DEFAULT_METHOD.to_string(),
            separate_sections: DEFAULT_SEPARATE_SECTIONS,
            mark_certainty: DEFAULT_MARK_CERTAINTY,
            jobs: DEFAULT_JOBS,
        }
    }
}

impl SerializerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unparseable values fall back to their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str, default: bool| {
            lookup(key)
                .map(|value| {
                    let value = value.trim().to_ascii_lowercase();
                    matches!(value.as_str(), "1" | "true" | "yes" | "on")
                })
                .unwrap_or(default)
        };

        Self {
            method: lookup("RADGRAPH_METHOD")
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| DEFAULT_METHOD.to_string()),
            separate_sections: flag("RADGRAPH_SEPARATE_SECTIONS", DEFAULT_SEPARATE_SECTIONS),
            mark_certainty: flag("RADGRAPH_MARK_CERTAINTY", DEFAULT_MARK_CERTAINTY),
            jobs: lookup("RADGRAPH_JOBS")
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(DEFAULT_JOBS),
        }
    }

    /// Build the serializer, rejecting unknown method names
    pub fn serializer(&self) -> Result<Serializer> {
        let strategy: Strategy = self.method.parse()?;
        Ok(Serializer::new(strategy).with_options(SerializeOptions {
            mark_certainty: self.mark_certainty,
            separate_sections: self.separate_sections,
        }))
    }
}
