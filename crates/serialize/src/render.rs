//! Rendering primitives shared by every strategy

use crate::{Result, SerializeOptions};
use radgraph_core::{Certainty, CoreError, Entity, EntityLabel, ReportGraph};

/// Between the segments of different components
pub const COMPONENT_DELIMITER: &str = ". ";
/// Between rendered entities of one segment or list
pub const ENTITY_SEPARATOR: &str = "; ";
/// Between the relations grouped under one entity
pub const RELATION_SEPARATOR: &str = ", ";
/// Introduces the anatomy list in `with_anat`
pub const ANATOMY_MARKER: &str = " | ";
/// Introduces the anatomy list in `with_@_anat`
pub const AT_ANATOMY_MARKER: &str = " @ ";
/// Between anatomy phrases in the trailing list
pub const ANATOMY_SEPARATOR: &str = ", ";

/// Renders entities of one graph under fixed options
pub(crate) struct Renderer<'g> {
    pub graph: &'g ReportGraph,
    options: SerializeOptions,
}

impl<'g> Renderer<'g> {
    pub fn new(graph: &'g ReportGraph, options: SerializeOptions) -> Self {
        Self { graph, options }
    }

    /// Tokens joined by single spaces, hedged when certainty marking is on
    pub fn phrase(&self, entity: &Entity) -> String {
        let phrase = entity.phrase();
        if !self.options.mark_certainty {
            return phrase;
        }
        match entity.label {
            EntityLabel::Observation(Certainty::Absent) => format!("no {}", phrase),
            EntityLabel::Observation(Certainty::Uncertain) => format!("maybe {}", phrase),
            _ => phrase,
        }
    }

    /// `phrase type target, type target` over outgoing relations in source order
    pub fn grouped(&self, entity: &Entity) -> Result<String> {
        let mut out = self.phrase(entity);

        let mut relations = Vec::new();
        for relation in self.graph.outgoing(&entity.id) {
            let target = self
                .graph
                .entity(&relation.target)
                .ok_or_else(|| CoreError::EntityNotFound(relation.target.to_string()))?;
            relations.push(format!("{} {}", relation.kind, self.phrase(target)));
        }

        if !relations.is_empty() {
            out.push(' ');
            out.push_str(&relations.join(RELATION_SEPARATOR));
        }
        Ok(out)
    }
}
