//! RadGraph serialization engine
//!
//! Turns a [`radgraph_core::ReportGraph`] into canonical prompt text under
//! one of four strategies:
//! - `subgraphs`: one segment per connected component
//! - `no_sep`: every entity in id order
//! - `with_anat`: observations, then ` | ` and the anatomy list
//! - `with_@_anat`: observations, then ` @ ` and the anatomy list

pub mod strategy;
pub mod serializer;
pub mod sections;
pub mod batch;
pub mod config;
pub mod error;
mod render;

pub use strategy::Strategy;
pub use serializer::{serialize, SerializeOptions, Serializer};
pub use sections::{Section, SectionLayout};
pub use batch::{serialize_batch, BatchOutcome, FailurePolicy, OutputRow, RecordFailure};
pub use config::SerializerConfig;
pub use error::{Result, SerializeError};
pub use render::{
    ANATOMY_MARKER, ANATOMY_SEPARATOR, AT_ANATOMY_MARKER, COMPONENT_DELIMITER, ENTITY_SEPARATOR,
    RELATION_SEPARATOR,
};
