//! Core domain types for RadGraph serialization
//!
//! This crate defines the graph model of a single radiology report:
//! entities, relations, the validated report graph, and decoding of the
//! raw extractor output into it.

pub mod entity;
pub mod relation;
pub mod graph;
pub mod record;
pub mod error;

pub use entity::{Certainty, Entity, EntityId, EntityLabel, TokenSpan};
pub use relation::Relation;
pub use graph::{Component, ReportGraph};
pub use record::{parse, read_records, RawReport, ReportRecord};
pub use error::{CoreError, Result};
