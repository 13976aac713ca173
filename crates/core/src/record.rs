//! Raw RadGraph records as produced by the extraction model
//!
//! Two entity layouts are accepted: the RadGraph map keyed by entity id
//! (relations nested per source entity as `[type, target]` pairs) and a flat
//! list of entities with a separate top-level relation list. Records
//! annotated by several radiologists carry `labeler_*` keys instead of
//! `entities`; the first labeler in key order is used.

use crate::{CoreError, Entity, EntityId, ReportGraph, Relation, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Entity words, either pre-split or as one space-separated string
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTokens {
    Words(Vec<String>),
    Text(String),
}

impl RawTokens {
    fn into_words(self) -> Vec<String> {
        match self {
            RawTokens::Words(words) => words,
            RawTokens::Text(text) => text.split_whitespace().map(String::from).collect(),
        }
    }
}

/// An entity id as written by the extractor: a string or a bare integer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for EntityId {
    fn from(id: RawId) -> Self {
        match id {
            RawId::Text(text) => EntityId::from(text),
            RawId::Number(number) => EntityId::from(number.to_string()),
        }
    }
}

/// A single entity as written by the extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEntity {
    /// Only present in the list layout; the map layout keys entities by id
    #[serde(default, alias = "entity_id")]
    pub id: Option<RawId>,

    pub tokens: RawTokens,

    pub label: String,

    #[serde(default)]
    pub start_ix: Option<usize>,

    #[serde(default)]
    pub end_ix: Option<usize>,

    /// Outgoing relations as `[type, target_id]`
    #[serde(default)]
    pub relations: Vec<(String, RawId)>,
}

/// A relation from the top-level relation list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRelation {
    #[serde(alias = "source_id")]
    pub source: RawId,

    #[serde(alias = "target_id")]
    pub target: RawId,

    #[serde(rename = "type", alias = "relation_type")]
    pub kind: String,
}

/// Either entity layout. Entities stay undecoded until `into_graph` so a
/// bad one can be reported by position or id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEntities {
    List(Vec<Value>),
    Keyed(Map<String, Value>),
}

/// One labeler's annotation of a multi-labeler record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLabeling {
    pub entities: RawEntities,

    #[serde(default)]
    pub relations: Vec<RawRelation>,
}

/// A complete report record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawReport {
    /// Ground-truth report text
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub entities: Option<RawEntities>,

    #[serde(default)]
    pub relations: Vec<RawRelation>,

    /// Everything else: `labeler_*` annotations, `data_split`, `data_source`, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawReport {
    /// Decode and validate into a [`ReportGraph`]
    pub fn into_graph(self, report_id: impl Into<String>) -> Result<ReportGraph> {
        let report_id = report_id.into();
        let labeling = match self.entities {
            Some(entities) => RawLabeling {
                entities,
                relations: self.relations,
            },
            None => first_labeler(&report_id, &self.extra)?,
        };

        let raw_entities = match labeling.entities {
            RawEntities::List(list) => list
                .into_iter()
                .enumerate()
                .map(|(index, value)| -> Result<(EntityId, RawEntity)> {
                    let entity = RawEntity::deserialize(&value).map_err(|err| {
                        CoreError::malformed(&report_id, format!("entity #{}: {}", index, err))
                    })?;
                    match entity.id.clone() {
                        Some(id) => Ok((EntityId::from(id), entity)),
                        None => Err(CoreError::malformed(&report_id, "entity without an id")),
                    }
                })
                .collect::<Result<Vec<_>>>()?,
            RawEntities::Keyed(map) => map
                .into_iter()
                .map(|(id, value)| {
                    RawEntity::deserialize(&value)
                        .map(|entity| (EntityId::from(id.as_str()), entity))
                        .map_err(|err| CoreError::malformed(&report_id, format!("entity {}: {}", id, err)))
                })
                .collect::<Result<Vec<_>>>()?,
        };

        let mut entities = Vec::with_capacity(raw_entities.len());
        let mut relations = Vec::new();
        for (id, raw) in raw_entities {
            for (kind, target) in raw.relations {
                relations.push(Relation::new(id.clone(), target, kind));
            }
            let mut entity = Entity::new(id, raw.tokens.into_words(), raw.label);
            if let (Some(start), Some(end)) = (raw.start_ix, raw.end_ix) {
                entity = entity.with_span(start, end);
            }
            entities.push(entity);
        }
        relations.extend(
            labeling
                .relations
                .into_iter()
                .map(|raw| Relation::new(raw.source, raw.target, raw.kind)),
        );

        ReportGraph::new(report_id, entities, relations, self.text)
    }
}

fn first_labeler(report_id: &str, extra: &Map<String, Value>) -> Result<RawLabeling> {
    let mut labelers: Vec<&String> = extra.keys().filter(|key| key.contains("labeler")).collect();
    labelers.sort();

    let key = labelers
        .first()
        .ok_or_else(|| CoreError::malformed(report_id, "no entity labels"))?;
    RawLabeling::deserialize(&extra[key.as_str()])
        .map_err(|err| CoreError::malformed(report_id, format!("{}: {}", key, err)))
}

/// One keyed record of an input file, not yet decoded
#[derive(Debug, Clone)]
pub struct ReportRecord {
    pub id: String,
    pub body: Value,
}

impl ReportRecord {
    /// Decode this record into a graph. Failures concern this record only.
    pub fn parse(&self) -> Result<ReportGraph> {
        parse(&self.id, &self.body)
    }
}

/// Decode one raw graph record
pub fn parse(report_id: &str, raw: &Value) -> Result<ReportGraph> {
    let report = RawReport::deserialize(raw)
        .map_err(|err| CoreError::malformed(report_id, err.to_string()))?;
    report.into_graph(report_id)
}

/// Split an input file (a JSON object keyed by report id) into records,
/// keeping file order.
pub fn read_records(json: &str) -> Result<Vec<ReportRecord>> {
    let map: Map<String, Value> = serde_json::from_str(json)?;
    Ok(map
        .into_iter()
        .map(|(id, body)| ReportRecord { id, body })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Certainty, EntityId, EntityLabel, TokenSpan};
    use serde_json::json;

    #[test]
    fn test_parse_radgraph_layout() {
        let raw = json!({
            "text": "FINDINGS : opacity in left lung",
            "data_split": "test",
            "entities": {
                "1": {"tokens": "opacity", "label": "OBS-DP", "start_ix": 2, "end_ix": 2,
                      "relations": [["located_at", "3"]]},
                "3": {"tokens": "left lung", "label": "ANAT-DP", "start_ix": 4, "end_ix": 5,
                      "relations": []}
            }
        });

        let graph = parse("p1", &raw).unwrap();
        assert_eq!(graph.id(), "p1");
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.original_text(), Some("FINDINGS : opacity in left lung"));

        let lung = graph.entity(&EntityId::from("3")).unwrap();
        assert_eq!(lung.tokens, vec!["left", "lung"]);
        assert_eq!(lung.label, EntityLabel::Anatomy);
        assert_eq!(lung.span, Some(TokenSpan { start: 4, end: 5 }));

        assert_eq!(graph.relations(), &[Relation::new("1", "3", "located_at")]);
    }

    #[test]
    fn test_parse_list_layout() {
        let raw = json!({
            "entities": [
                {"id": "e1", "tokens": ["small", "effusion"], "label": "OBS-DA"},
                {"id": "e2", "tokens": ["pleural"], "label": "ANAT-DP"}
            ],
            "relations": [{"source": "e1", "target": "e2", "type": "located_at"}]
        });

        let graph = parse("p2", &raw).unwrap();
        let effusion = graph.entity(&EntityId::from("e1")).unwrap();
        assert_eq!(effusion.phrase(), "small effusion");
        assert_eq!(effusion.label, EntityLabel::Observation(Certainty::Absent));
        assert_eq!(graph.relations().len(), 1);
        assert_eq!(graph.original_text(), None);
    }

    #[test]
    fn test_relation_order_follows_source() {
        let raw = json!({
            "entities": {
                "2": {"tokens": "b", "label": "OBS-DP", "relations": [["modify", "1"]]},
                "1": {"tokens": "a", "label": "OBS-DP", "relations": [["suggestive_of", "3"], ["modify", "2"]]},
                "3": {"tokens": "c", "label": "OBS-U", "relations": []}
            }
        });

        let graph = parse("p3", &raw).unwrap();
        let kinds: Vec<(&str, &str)> = graph
            .relations()
            .iter()
            .map(|r| (r.source.as_str(), r.kind.as_str()))
            .collect();
        assert_eq!(kinds, vec![("2", "modify"), ("1", "suggestive_of"), ("1", "modify")]);
    }

    #[test]
    fn test_first_labeler_is_used() {
        let raw = json!({
            "text": "no effusion",
            "labeler_2": {"entities": {"1": {"tokens": "pneumothorax", "label": "OBS-DA", "relations": []}}},
            "labeler_1": {"entities": {"1": {"tokens": "effusion", "label": "OBS-DA", "relations": []}}}
        });

        let graph = parse("p4", &raw).unwrap();
        assert_eq!(graph.phrase(&EntityId::from("1")).unwrap(), "effusion");
    }

    #[test]
    fn test_missing_labels_is_malformed() {
        let err = parse("p5", &json!({"text": "normal study"})).unwrap_err();
        assert!(matches!(err, CoreError::MalformedGraph { .. }));
        assert!(err.to_string().contains("no entity labels"));
    }

    #[test]
    fn test_dangling_nested_relation_is_malformed() {
        let raw = json!({
            "entities": {"1": {"tokens": "opacity", "label": "OBS-DP", "relations": [["located_at", "7"]]}}
        });
        assert!(matches!(parse("p6", &raw), Err(CoreError::MalformedGraph { .. })));
    }

    #[test]
    fn test_list_entity_without_id_is_malformed() {
        let raw = json!({"entities": [{"tokens": ["opacity"], "label": "OBS-DP"}]});
        let err = parse("p7", &raw).unwrap_err();
        assert!(err.to_string().contains("entity without an id"));
    }

    #[test]
    fn test_numeric_ids_in_radgraph_layout() {
        let raw = json!({
            "entities": {
                "1": {"tokens": "opacity", "label": "OBS-DP", "relations": [["located_at", 2]]},
                "2": {"tokens": "apex", "label": "ANAT-DP", "relations": []}
            }
        });

        let graph = parse("p8", &raw).unwrap();
        assert_eq!(graph.relations(), &[Relation::new("1", "2", "located_at")]);
    }

    #[test]
    fn test_numeric_ids_in_list_layout() {
        let raw = json!({
            "entities": [
                {"id": 10, "tokens": ["effusion"], "label": "OBS-DA"},
                {"id": 2, "tokens": ["pleural"], "label": "ANAT-DP"}
            ],
            "relations": [{"source": 10, "target": "2", "type": "located_at"}]
        });

        let graph = parse("p9", &raw).unwrap();
        let ids: Vec<&str> = graph.entities().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "10"]);
        assert_eq!(graph.relations(), &[Relation::new("10", "2", "located_at")]);
    }

    #[test]
    fn test_bad_list_entity_is_named() {
        let raw = json!({
            "entities": [
                {"id": "e1", "tokens": ["opacity"], "label": "OBS-DP"},
                {"id": "e2", "tokens": ["apex"]}
            ]
        });
        let err = parse("p10", &raw).unwrap_err();
        assert!(matches!(err, CoreError::MalformedGraph { .. }));
        assert!(err.to_string().contains("entity #1"), "{}", err);
    }

    #[test]
    fn test_read_records_keeps_file_order() {
        let json = r#"{"z": {"entities": {}}, "a": {"entities": {}}, "m": {"entities": {}}}"#;
        let records = read_records(json).unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
        assert!(records[0].parse().unwrap().is_empty());
    }
}
