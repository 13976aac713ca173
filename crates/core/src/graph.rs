//! The per-report knowledge graph and its derived queries

use crate::{CoreError, Entity, EntityId, Relation, Result};
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

/// One report's entities and relations.
///
/// Built once per input record and never mutated afterwards; every
/// constructor validates that ids are unique, token lists are non-empty and
/// relation endpoints exist.
#[derive(Debug, Clone)]
pub struct ReportGraph {
    id: String,
    entities: BTreeMap<EntityId, Entity>,
    /// Source order, which breaks ties during serialization
    relations: Vec<Relation>,
    original_text: Option<String>,
}

/// A weakly-connected component: members sorted by id
#[derive(Debug, Clone)]
pub struct Component<'g> {
    members: Vec<&'g Entity>,
}

impl<'g> Component<'g> {
    pub fn members(&self) -> &[&'g Entity] {
        &self.members
    }

    /// Lowest entity id in the component
    pub fn min_id(&self) -> &'g EntityId {
        &self.members[0].id
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl ReportGraph {
    /// Validate and assemble a report graph
    pub fn new(
        id: impl Into<String>,
        entities: Vec<Entity>,
        relations: Vec<Relation>,
        original_text: Option<String>,
    ) -> Result<Self> {
        let id = id.into();

        let mut by_id = BTreeMap::new();
        for entity in entities {
            if entity.tokens.is_empty() {
                return Err(CoreError::malformed(
                    &id,
                    format!("entity {} has no tokens", entity.id),
                ));
            }
            if by_id.contains_key(&entity.id) {
                return Err(CoreError::malformed(
                    &id,
                    format!("duplicate entity id {}", entity.id),
                ));
            }
            by_id.insert(entity.id.clone(), entity);
        }

        for relation in &relations {
            for endpoint in [&relation.source, &relation.target] {
                if !by_id.contains_key(endpoint) {
                    return Err(CoreError::malformed(
                        &id,
                        format!(
                            "relation {} -{}-> {} references unknown entity {}",
                            relation.source, relation.kind, relation.target, endpoint
                        ),
                    ));
                }
            }
        }

        Ok(Self {
            id,
            entities: by_id,
            relations,
            original_text,
        })
    }

    /// Report key, propagated unchanged to output rows
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn original_text(&self) -> Option<&str> {
        self.original_text.as_deref()
    }

    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// All entities in id order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn anatomy_entities(&self) -> Vec<&Entity> {
        self.entities().filter(|entity| entity.is_anatomy()).collect()
    }

    pub fn observation_entities(&self) -> Vec<&Entity> {
        self.entities().filter(|entity| entity.is_observation()).collect()
    }

    /// Relations leaving `id`, in source order
    pub fn outgoing<'a>(&'a self, id: &'a EntityId) -> impl Iterator<Item = &'a Relation> + 'a {
        self.relations.iter().filter(move |relation| &relation.source == id)
    }

    /// Whether any relation ends at `id`
    pub fn has_incoming(&self, id: &EntityId) -> bool {
        self.relations.iter().any(|relation| &relation.target == id)
    }

    /// Tokens of `id` joined with single spaces
    pub fn phrase(&self, id: &EntityId) -> Result<String> {
        self.entity(id)
            .map(Entity::phrase)
            .ok_or_else(|| CoreError::EntityNotFound(id.to_string()))
    }

    /// Weakly-connected components, isolated entities included.
    ///
    /// A single breadth-first traversal seeded in id order; every seed is
    /// the smallest id of its component, so components come out ordered by
    /// their lowest id.
    pub fn connected_components(&self) -> Vec<Component<'_>> {
        let mut neighbours: BTreeMap<&EntityId, BTreeSet<&EntityId>> = BTreeMap::new();
        for relation in &self.relations {
            neighbours.entry(&relation.source).or_default().insert(&relation.target);
            neighbours.entry(&relation.target).or_default().insert(&relation.source);
        }

        let mut visited: HashSet<&EntityId> = HashSet::new();
        let mut components = Vec::new();

        for seed in self.entities.keys() {
            if !visited.insert(seed) {
                continue;
            }

            let mut queue = VecDeque::from([seed]);
            let mut members = Vec::new();
            while let Some(current) = queue.pop_front() {
                members.push(&self.entities[current]);
                for &next in neighbours.get(current).into_iter().flatten() {
                    if visited.insert(next) {
                        queue.push_back(next);
                    }
                }
            }

            members.sort_by(|a, b| a.id.cmp(&b.id));
            components.push(Component { members });
        }

        components
    }
}
