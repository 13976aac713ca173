//! Serializer error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("Unknown serialization strategy: {0} (expected one of subgraphs, no_sep, with_anat, with_@_anat)")]
    UnknownStrategy(String),

    #[error(transparent)]
    Graph(#[from] radgraph_core::CoreError),
}

pub type Result<T> = std::result::Result<T, SerializeError>;
