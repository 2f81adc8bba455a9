//! In-memory implementation of [`DocumentStore`] for snapshots, tests and demos.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::error::{DocScopeError, ErrorContext, Result};
use crate::value::{DocValue, Document, FieldMap};

use super::{Direction, DocumentStore, SampleQuery};

/// Serialized form of a whole database.
///
/// ```json
/// {
///   "collections": {
///     "users": [
///       {
///         "id": "alice",
///         "data": {"name": "Alice"},
///         "subcollections": {"orders": [{"id": "o1", "data": {"total": 12}}]}
///       }
///     ]
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub collections: IndexMap<String, Vec<SnapshotDocument>>,
}

/// One document of a [`Snapshot`], with its nested collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub id: String,
    #[serde(default)]
    pub data: FieldMap,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub subcollections: IndexMap<String, Vec<SnapshotDocument>>,
}

#[derive(Debug, Default)]
struct StoreData {
    /// Documents keyed by full collection path, in insertion order.
    collections: IndexMap<String, Vec<Document>>,
    missing_indexes: HashSet<(String, String)>,
    range_queries_unsupported: bool,
    failing_listings: HashSet<String>,
    failing_counts: HashSet<String>,
    failing_samples: HashSet<String>,
}

impl StoreData {
    fn load(&mut self, collection_path: &str, documents: Vec<SnapshotDocument>) {
        self.collections
            .entry(collection_path.to_string())
            .or_default();

        for doc in documents {
            for (name, children) in doc.subcollections {
                let child_path = format!("{collection_path}/{}/{name}", doc.id);
                self.load(&child_path, children);
            }
            if let Some(docs) = self.collections.get_mut(collection_path) {
                docs.push(Document::new(doc.id, doc.data));
            }
        }
    }
}

/// A [`DocumentStore`] holding every document in memory.
///
/// Documents come back in insertion order unless a query asks for an
/// ordering. The builder can also make individual operations fail, which
/// is how the recovery paths of the analyzers are exercised.
///
/// # Example
///
/// ```rust
/// use docscope::store::{DocumentStore, InMemoryStore};
/// use docscope::value::Document;
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() {
/// let store = InMemoryStore::builder()
///     .collection("users", vec![Document::from_json("alice", json!({"age": 31}))])
///     .build();
///
/// assert_eq!(store.count_documents("users").await.unwrap(), 1);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    data: Arc<RwLock<StoreData>>,
}

impl InMemoryStore {
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self::builder().snapshot(snapshot).build()
    }

    /// Parses a JSON snapshot.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Reads a JSON snapshot file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&content)
            .with_context(|| format!("parsing snapshot {}", path.display()))?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Appends a document to a collection, creating the collection if needed.
    pub async fn insert_document(&self, collection_path: &str, document: Document) {
        let mut data = self.data.write().await;
        data.collections
            .entry(collection_path.to_string())
            .or_default()
            .push(document);
    }

    /// Full paths of every collection held, root and nested.
    pub async fn collection_paths(&self) -> Vec<String> {
        self.data.read().await.collections.keys().cloned().collect()
    }
}

/// Builder for [`InMemoryStore`].
#[derive(Debug, Default)]
pub struct InMemoryStoreBuilder {
    data: StoreData,
}

impl InMemoryStoreBuilder {
    /// Adds documents to the collection at `path`.
    pub fn collection(mut self, path: impl Into<String>, documents: Vec<Document>) -> Self {
        self.data
            .collections
            .entry(path.into())
            .or_default()
            .extend(documents);
        self
    }

    pub fn snapshot(mut self, snapshot: Snapshot) -> Self {
        for (name, documents) in snapshot.collections {
            self.data.load(&name, documents);
        }
        self
    }

    /// Makes range counts on `field` of `collection_path` fail with a missing index.
    pub fn missing_index(mut self, collection_path: impl Into<String>, field: impl Into<String>) -> Self {
        self.data
            .missing_indexes
            .insert((collection_path.into(), field.into()));
        self
    }

    /// Makes every range count fail with a missing index.
    pub fn without_range_indexes(mut self) -> Self {
        self.data.range_queries_unsupported = true;
        self
    }

    /// Makes listing the subcollections of one document fail.
    pub fn failing_subcollection_listing(mut self, document_path: impl Into<String>) -> Self {
        self.data.failing_listings.insert(document_path.into());
        self
    }

    /// Makes counting one collection fail.
    pub fn failing_count(mut self, collection_path: impl Into<String>) -> Self {
        self.data.failing_counts.insert(collection_path.into());
        self
    }

    /// Makes sampling one collection fail.
    pub fn failing_sample(mut self, collection_path: impl Into<String>) -> Self {
        self.data.failing_samples.insert(collection_path.into());
        self
    }

    pub fn build(self) -> InMemoryStore {
        InMemoryStore {
            data: Arc::new(RwLock::new(self.data)),
        }
    }
}

/// Rank of a value in the cross-type ordering used by ordered queries.
fn type_rank(value: &DocValue) -> u8 {
    match value {
        DocValue::Null => 0,
        DocValue::Bool(_) => 1,
        DocValue::Number(_) => 2,
        DocValue::Timestamp(_) => 3,
        DocValue::String(_) => 4,
        DocValue::Bytes(_) => 5,
        DocValue::Reference { .. } => 6,
        DocValue::GeoPoint { .. } => 7,
        DocValue::Array(_) => 8,
        DocValue::Map(_) if value.as_timestamp().is_some() => 3,
        DocValue::Map(_) => 9,
    }
}

/// Orders values by type first, then by value within a type.
pub(crate) fn compare_values(a: &DocValue, b: &DocValue) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }

    match (a, b) {
        (DocValue::Bool(x), DocValue::Bool(y)) => x.cmp(y),
        (DocValue::Number(x), DocValue::Number(y)) => x.total_cmp(y),
        (DocValue::String(x), DocValue::String(y)) => x.cmp(y),
        _ => match (a.as_timestamp(), b.as_timestamp()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => a.canonical_key().cmp(&b.canonical_key()),
        },
    }
}

/// Collection name directly under `document_path`, if `collection_path` is one.
fn child_collection<'a>(collection_path: &'a str, document_path: &str) -> Option<&'a str> {
    collection_path
        .strip_prefix(document_path)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|name| !name.is_empty() && !name.contains('/'))
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    #[instrument(skip(self), fields(store = "in_memory"))]
    async fn list_collections(&self) -> Result<Vec<String>> {
        let data = self.data.read().await;
        Ok(data
            .collections
            .keys()
            .filter(|path| !path.contains('/'))
            .cloned()
            .collect())
    }

    #[instrument(skip(self), fields(store = "in_memory"))]
    async fn count_documents(&self, collection_path: &str) -> Result<u64> {
        let data = self.data.read().await;
        if data.failing_counts.contains(collection_path) {
            return Err(DocScopeError::store(
                "count_documents",
                format!("count aggregation unavailable for '{collection_path}'"),
            ));
        }
        Ok(data
            .collections
            .get(collection_path)
            .map_or(0, |docs| docs.len() as u64))
    }

    #[instrument(skip(self), fields(store = "in_memory"))]
    async fn count_in_range(
        &self,
        collection_path: &str,
        field: &str,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> Result<u64> {
        let data = self.data.read().await;
        if data.range_queries_unsupported
            || data
                .missing_indexes
                .contains(&(collection_path.to_string(), field.to_string()))
        {
            return Err(DocScopeError::missing_index(collection_path, field));
        }

        let Some(docs) = data.collections.get(collection_path) else {
            return Ok(0);
        };
        let count = docs
            .iter()
            .filter_map(|doc| doc.get(field).and_then(DocValue::as_timestamp))
            .filter(|ts| *ts >= start && end.map_or(true, |end| *ts < end))
            .count();
        Ok(count as u64)
    }

    #[instrument(skip(self, query), fields(store = "in_memory", limit = query.limit))]
    async fn sample_documents(
        &self,
        collection_path: &str,
        query: &SampleQuery,
    ) -> Result<Vec<Document>> {
        let data = self.data.read().await;
        if data.failing_samples.contains(collection_path) {
            return Err(DocScopeError::store(
                "sample_documents",
                format!("query failed for '{collection_path}'"),
            ));
        }
        let Some(docs) = data.collections.get(collection_path) else {
            return Ok(Vec::new());
        };

        let mut selected: Vec<&Document> = match &query.order_by {
            Some((field, direction)) => {
                let mut ordered: Vec<&Document> =
                    docs.iter().filter(|doc| doc.get(field).is_some()).collect();
                ordered.sort_by(|a, b| {
                    let ord = match (a.get(field), b.get(field)) {
                        (Some(x), Some(y)) => compare_values(x, y),
                        _ => Ordering::Equal,
                    };
                    match direction {
                        Direction::Ascending => ord,
                        Direction::Descending => ord.reverse(),
                    }
                });
                ordered
            }
            None => docs.iter().collect(),
        };

        if let Some(cursor) = &query.start_after {
            let position = selected
                .iter()
                .position(|doc| &doc.id == cursor)
                .ok_or_else(|| {
                    DocScopeError::NotFound(format!(
                        "cursor document '{cursor}' in '{collection_path}'"
                    ))
                })?;
            selected.drain(..=position);
        }

        debug!(
            collection = collection_path,
            returned = selected.len().min(query.limit),
            "Sampled documents"
        );
        Ok(selected.into_iter().take(query.limit).cloned().collect())
    }

    #[instrument(skip(self), fields(store = "in_memory"))]
    async fn list_subcollections(&self, document_path: &str) -> Result<Vec<String>> {
        let data = self.data.read().await;
        if data.failing_listings.contains(document_path) {
            return Err(DocScopeError::store(
                "list_subcollections",
                format!("listing failed for '{document_path}'"),
            ));
        }
        Ok(data
            .collections
            .keys()
            .filter_map(|path| child_collection(path, document_path))
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use std::io::Write;

    fn snapshot_json() -> &'static str {
        r#"{
            "collections": {
                "users": [
                    {
                        "id": "alice",
                        "data": {"name": "Alice", "createdAt": {"_seconds": 1709294400, "_nanoseconds": 0}},
                        "subcollections": {
                            "orders": [{"id": "o1", "data": {"total": 12}}],
                            "carts": [{"id": "c1", "data": {}}]
                        }
                    },
                    {"id": "bob", "data": {"name": "Bob", "createdAt": {"_seconds": 1709380800, "_nanoseconds": 0}}},
                    {"id": "carol", "data": {"name": "Carol"}}
                ],
                "logs": []
            }
        }"#
    }

    #[tokio::test]
    async fn test_snapshot_layout() {
        let store = InMemoryStore::from_json_str(snapshot_json()).unwrap();

        assert_eq!(store.list_collections().await.unwrap(), vec!["users", "logs"]);
        assert_eq!(store.count_documents("users").await.unwrap(), 3);
        assert_eq!(store.count_documents("logs").await.unwrap(), 0);
        assert_eq!(store.count_documents("missing").await.unwrap(), 0);
        assert_eq!(store.count_documents("users/alice/orders").await.unwrap(), 1);

        let subs = store.list_subcollections("users/alice").await.unwrap();
        assert_eq!(subs, vec!["orders", "carts"]);
        assert!(store.list_subcollections("users/bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ordered_sample_skips_documents_without_field() {
        let store = InMemoryStore::from_json_str(snapshot_json()).unwrap();
        let query = SampleQuery::new(10).order_by("createdAt", Direction::Descending);
        let docs = store.sample_documents("users", &query).await.unwrap();

        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["bob", "alice"]);
    }

    #[tokio::test]
    async fn test_limit_and_cursor() {
        let store = InMemoryStore::from_json_str(snapshot_json()).unwrap();

        let first = store
            .sample_documents("users", &SampleQuery::new(1))
            .await
            .unwrap();
        assert_eq!(first[0].id, "alice");

        let next = store
            .sample_documents("users", &SampleQuery::new(5).start_after("alice"))
            .await
            .unwrap();
        let ids: Vec<&str> = next.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["bob", "carol"]);

        let err = store
            .sample_documents("users", &SampleQuery::new(5).start_after("zed"))
            .await
            .unwrap_err();
        assert!(matches!(err, DocScopeError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_count_in_range() {
        let store = InMemoryStore::from_json_str(snapshot_json()).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();

        assert_eq!(
            store.count_in_range("users", "createdAt", start, Some(end)).await.unwrap(),
            1
        );
        assert_eq!(
            store.count_in_range("users", "createdAt", start, None).await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_failure_switches() {
        let store = InMemoryStore::builder()
            .collection("orders", vec![Document::from_json("o1", json!({"a": 1}))])
            .missing_index("orders", "createdAt")
            .failing_subcollection_listing("orders/o1")
            .failing_count("orders")
            .failing_sample("orders")
            .build();

        let err = store
            .count_in_range("orders", "createdAt", Utc::now(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DocScopeError::MissingIndex { .. }));
        assert!(store.list_subcollections("orders/o1").await.is_err());
        assert!(store.count_documents("orders").await.is_err());
        assert!(store
            .sample_documents("orders", &SampleQuery::new(1))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_insert_and_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(snapshot_json().as_bytes()).unwrap();

        let store = InMemoryStore::from_path(file.path()).unwrap();
        store
            .insert_document("logs", Document::from_json("l1", json!({"level": "info"})))
            .await;
        assert_eq!(store.count_documents("logs").await.unwrap(), 1);
        assert!(store
            .collection_paths()
            .await
            .contains(&"users/alice/carts".to_string()));
    }

    #[test]
    fn test_snapshot_load_errors_keep_their_kind() {
        let err = InMemoryStore::from_path("/nonexistent/snapshot.json").unwrap_err();
        assert!(matches!(err, DocScopeError::Io(_)));
        assert!(err.to_string().contains("reading snapshot /nonexistent/snapshot.json"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"collections\": [").unwrap();
        let err = InMemoryStore::from_path(file.path()).unwrap_err();
        assert!(matches!(err, DocScopeError::Serialization(_)));
        assert!(err.to_string().contains("parsing snapshot"));
    }

    #[test]
    fn test_value_ordering() {
        assert_eq!(
            compare_values(&DocValue::from(2.0), &DocValue::from("a")),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&DocValue::from("b"), &DocValue::from("a")),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&DocValue::Null, &DocValue::from(false)),
            Ordering::Less
        );
    }
}
