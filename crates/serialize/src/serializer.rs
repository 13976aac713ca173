//! Graph-to-text serialization

use crate::render::{
    Renderer, ANATOMY_MARKER, ANATOMY_SEPARATOR, AT_ANATOMY_MARKER, COMPONENT_DELIMITER,
    ENTITY_SEPARATOR,
};
use crate::sections::{Section, SectionLayout};
use crate::{Result, Strategy};
use radgraph_core::{Entity, ReportGraph};
use std::collections::BTreeMap;
use tracing::debug;

/// Optional rendering features; the defaults produce the plain output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Prefix absent observations with `no ` and uncertain ones with `maybe `
    pub mark_certainty: bool,
    /// Group output under FINDINGS / IMPRESSION headers located in the report text
    pub separate_sections: bool,
}

/// A strategy plus options, applied to one graph at a time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Serializer {
    strategy: Strategy,
    options: SerializeOptions,
}

/// Rendered text for a set of entities, before joining
struct Piece<'g> {
    members: Vec<&'g Entity>,
    text: String,
}

/// The anatomy list appended by `with_anat` and `with_@_anat`
struct Trailer {
    marker: &'static str,
    text: String,
}

struct Rendering<'g> {
    pieces: Vec<Piece<'g>>,
    joiner: &'static str,
    trailer: Option<Trailer>,
}

impl Serializer {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            options: SerializeOptions::default(),
        }
    }

    /// Builder: set options
    pub fn with_options(mut self, options: SerializeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn options(&self) -> SerializeOptions {
        self.options
    }

    /// Serialize one graph. Pure: the same graph always yields the same text.
    pub fn serialize(&self, graph: &ReportGraph) -> Result<String> {
        let renderer = Renderer::new(graph, self.options);
        let rendering = match self.strategy {
            Strategy::Subgraphs => subgraphs(&renderer)?,
            Strategy::NoSep => no_sep(&renderer)?,
            Strategy::WithAnat => with_anatomy(&renderer, ANATOMY_MARKER)?,
            Strategy::WithAtAnat => with_anatomy(&renderer, AT_ANATOMY_MARKER)?,
        };

        debug!(
            report_id = graph.id(),
            strategy = %self.strategy,
            pieces = rendering.pieces.len(),
            "Rendered report graph"
        );

        Ok(self.assemble(graph, rendering))
    }

    fn assemble(&self, graph: &ReportGraph, rendering: Rendering<'_>) -> String {
        let body = if self.options.separate_sections {
            let layout = SectionLayout::locate(graph.original_text().unwrap_or_default());
            let mut sections: BTreeMap<Section, Vec<&str>> = BTreeMap::new();
            for piece in &rendering.pieces {
                sections
                    .entry(layout.categorize(&piece.members))
                    .or_default()
                    .push(&piece.text);
            }
            sections
                .into_iter()
                .map(|(section, texts)| format!("{}: {}", section.header(), texts.join(rendering.joiner)))
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            rendering
                .pieces
                .iter()
                .map(|piece| piece.text.as_str())
                .collect::<Vec<_>>()
                .join(rendering.joiner)
        };

        match rendering.trailer {
            Some(trailer) if !trailer.text.is_empty() => {
                if body.is_empty() {
                    trailer.text
                } else {
                    format!("{}{}{}", body, trailer.marker, trailer.text)
                }
            }
            _ => body,
        }
    }
}

/// Serialize with a strategy given by name (case-insensitive)
pub fn serialize(graph: &ReportGraph, method: &str) -> Result<String> {
    let strategy: Strategy = method.parse()?;
    Serializer::new(strategy).serialize(graph)
}

/// One segment per component. Entities with outgoing relations carry them
/// inline; pure relation targets are already mentioned and are skipped;
/// isolated entities render bare.
fn subgraphs<'g>(renderer: &Renderer<'g>) -> Result<Rendering<'g>> {
    let graph = renderer.graph;
    let mut pieces = Vec::new();

    for component in graph.connected_components() {
        let mut parts = Vec::new();
        for entity in component.members() {
            let has_outgoing = graph.outgoing(&entity.id).next().is_some();
            if has_outgoing || !graph.has_incoming(&entity.id) {
                parts.push(renderer.grouped(entity)?);
            }
        }
        pieces.push(Piece {
            members: component.members().to_vec(),
            text: parts.join(ENTITY_SEPARATOR),
        });
    }

    Ok(Rendering {
        pieces,
        joiner: COMPONENT_DELIMITER,
        trailer: None,
    })
}

fn no_sep<'g>(renderer: &Renderer<'g>) -> Result<Rendering<'g>> {
    let pieces = entity_pieces(renderer, renderer.graph.entities())?;
    Ok(Rendering {
        pieces,
        joiner: ENTITY_SEPARATOR,
        trailer: None,
    })
}

/// Observations with their relations, then every anatomy phrase, repeated
/// even when it already appeared as a relation target
fn with_anatomy<'g>(renderer: &Renderer<'g>, marker: &'static str) -> Result<Rendering<'g>> {
    let graph = renderer.graph;
    let pieces = entity_pieces(renderer, graph.observation_entities())?;
    let anatomy = graph
        .anatomy_entities()
        .into_iter()
        .map(|entity| renderer.phrase(entity))
        .collect::<Vec<_>>()
        .join(ANATOMY_SEPARATOR);

    Ok(Rendering {
        pieces,
        joiner: ENTITY_SEPARATOR,
        trailer: Some(Trailer {
            marker,
            text: anatomy,
        }),
    })
}

fn entity_pieces<'g>(
    renderer: &Renderer<'g>,
    entities: impl IntoIterator<Item = &'g Entity>,
) -> Result<Vec<Piece<'g>>> {
    entities
        .into_iter()
        .map(|entity| -> Result<Piece<'g>> {
            Ok(Piece {
                members: vec![entity],
                text: renderer.grouped(entity)?,
            })
        })
        .collect()
}
