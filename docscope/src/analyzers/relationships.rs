//! Cross-collection relationship inference.
//!
//! A document store has no declared foreign keys, so relationships are
//! guessed from a sample of documents. Each field of the source collection
//! is checked against three rules, in order, and the first rule that fires
//! resolves the field for the rest of the sample:
//!
//! | Rule | Type | Confidence |
//! |------|------|------------|
//! | value is a document reference | `reference` | 1.0 |
//! | non-empty string in a field ending in `Id`, `_id`, `Ref`, `_ref` or `ID` whose stem names a collection | `foreign_key` | 0.85 |
//! | string or number in a field named `{collection}id` / `{collection}_id` | `foreign_key` | 0.7 |

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::analyzers::types::CollectionInfo;
use crate::value::{DocValue, Document};

/// Maximum number of characters kept in a relationship sample value.
pub const SAMPLE_VALUE_MAX_CHARS: usize = 30;

/// Field-name suffixes that mark a foreign key, tried in order.
pub const FOREIGN_KEY_SUFFIXES: &[&str] = &["Id", "_id", "Ref", "_ref", "ID"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Reference,
    ForeignKey,
    /// Part of the vocabulary; no rule produces it.
    Embedded,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Reference => "reference",
            RelationshipType::ForeignKey => "foreign_key",
            RelationshipType::Embedded => "embedded",
        }
    }
}

/// A guessed link from a field of one collection to another collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRelationship {
    pub source_collection: String,
    pub target_collection: String,
    pub source_field: String,
    pub relationship_type: RelationshipType,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_value: Option<String>,
}

/// All relationships found across a database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseRelationships {
    pub relationships: Vec<CollectionRelationship>,
    pub collections: Vec<String>,
    pub relationship_count: usize,
}

impl DatabaseRelationships {
    pub fn new(collections: Vec<String>, relationships: Vec<CollectionRelationship>) -> Self {
        Self {
            relationship_count: relationships.len(),
            relationships,
            collections,
        }
    }
}

/// Detects the relationships of `source` to the other collections.
///
/// Fields are resolved at most once: later documents never add a second
/// relationship for a field that already has one.
pub fn detect_relationships(
    source: &str,
    all_collections: &[String],
    documents: &[Document],
) -> Vec<CollectionRelationship> {
    let mut relationships = Vec::new();
    let mut resolved: HashSet<&str> = HashSet::new();

    for doc in documents {
        for (field, value) in &doc.data {
            if resolved.contains(field.as_str()) {
                continue;
            }
            if let Some(relationship) = detect_field(source, all_collections, field, value) {
                resolved.insert(field.as_str());
                relationships.push(relationship);
            }
        }
    }

    relationships
}

/// Applies the three rules to one field value.
pub fn detect_field(
    source: &str,
    all_collections: &[String],
    field: &str,
    value: &DocValue,
) -> Option<CollectionRelationship> {
    let relationship = |target: &str, relationship_type, confidence, sample: String| {
        CollectionRelationship {
            source_collection: source.to_string(),
            target_collection: target.to_string(),
            source_field: field.to_string(),
            relationship_type,
            confidence,
            sample_value: Some(sample),
        }
    };

    if let Some(path) = value.reference_path() {
        let target = path.split('/').next().unwrap_or_default();
        return Some(relationship(
            target,
            RelationshipType::Reference,
            1.0,
            path.to_string(),
        ));
    }

    if let Some(s) = value.as_str().filter(|s| !s.is_empty()) {
        if let Some(target) = match_foreign_key_suffix(source, all_collections, field) {
            return Some(relationship(
                target,
                RelationshipType::ForeignKey,
                0.85,
                truncate_sample(s),
            ));
        }
    }

    if matches!(value, DocValue::String(_) | DocValue::Number(_)) {
        if let Some(target) = match_field_name(source, all_collections, field) {
            return Some(relationship(
                target,
                RelationshipType::ForeignKey,
                0.7,
                truncate_sample(&value.display_string()),
            ));
        }
    }

    None
}

/// Collection named by the stem of a suffixed field, e.g. `categoryId` → `categories`.
///
/// When a suffix matches but no collection does, the next suffix is tried.
/// A stem naming the source collection itself yields nothing.
fn match_foreign_key_suffix<'a>(
    source: &str,
    all_collections: &'a [String],
    field: &str,
) -> Option<&'a str> {
    for suffix in FOREIGN_KEY_SUFFIXES {
        let Some(stem) = field.strip_suffix(suffix) else {
            continue;
        };
        let base = stem.to_lowercase();
        let found = all_collections.iter().find(|c| {
            let name = c.to_lowercase();
            name == base
                || name == format!("{base}s")
                || name == format!("{base}es")
                || base
                    .strip_suffix('y')
                    .is_some_and(|singular| name == format!("{singular}ies"))
        });

        if let Some(target) = found {
            if target != source {
                return Some(target.as_str());
            }
        }
    }
    None
}

/// Collection whose singular or plural name plus `id`/`_id` equals the field name.
fn match_field_name<'a>(
    source: &str,
    all_collections: &'a [String],
    field: &str,
) -> Option<&'a str> {
    let field_lower = field.to_lowercase();
    all_collections
        .iter()
        .filter(|c| c.as_str() != source)
        .find(|c| {
            let name = c.to_lowercase();
            let singular = name.strip_suffix('s').unwrap_or(&name);
            [singular, name.as_str()]
                .iter()
                .any(|stem| field_lower == format!("{stem}id") || field_lower == format!("{stem}_id"))
        })
        .map(String::as_str)
}

fn truncate_sample(value: &str) -> String {
    value.chars().take(SAMPLE_VALUE_MAX_CHARS).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub label: String,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
}

/// Node/edge view of a set of relationships.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RelationshipGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Builds a graph with one node per collection involved and one edge per
/// relationship. Nodes appear in first-seen order.
pub fn build_relationship_graph(
    relationships: &[CollectionRelationship],
    collection_infos: Option<&[CollectionInfo]>,
) -> RelationshipGraph {
    let mut nodes: IndexMap<&str, GraphNode> = IndexMap::new();
    let mut edges = Vec::with_capacity(relationships.len());

    let count_of = |name: &str| {
        collection_infos
            .and_then(|infos| infos.iter().find(|info| info.name == name))
            .map(|info| info.document_count)
    };

    for rel in relationships {
        for name in [&rel.source_collection, &rel.target_collection] {
            nodes.entry(name.as_str()).or_insert_with(|| GraphNode {
                id: name.clone(),
                label: name.clone(),
                document_count: count_of(name),
            });
        }
        edges.push(GraphEdge {
            source: rel.source_collection.clone(),
            target: rel.target_collection.clone(),
            label: rel.source_field.clone(),
            relationship_type: rel.relationship_type,
        });
    }

    RelationshipGraph {
        nodes: nodes.into_values().collect(),
        edges,
    }
}
