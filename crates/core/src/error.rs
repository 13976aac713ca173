//! Error types for the graph model

use thiserror::Error;

/// Graph model errors
#[derive(Error, Debug)]
pub enum CoreError {
    /// Structurally invalid graph: dangling relation endpoints, empty
    /// token lists, duplicate ids or missing entity labels.
    #[error("Malformed graph for report {report_id}: {reason}")]
    MalformedGraph { report_id: String, reason: String },

    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    pub fn malformed(report_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedGraph {
            report_id: report_id.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
