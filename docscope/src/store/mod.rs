//! Read-only access to a document store.
//!
//! The analyzers never talk to a database client directly. Everything they
//! read goes through the [`DocumentStore`] trait, so the same analysis runs
//! against a hosted document database, a JSON snapshot, or a test fixture.
//!
//! Paths follow the usual document-store layout: a collection path has an
//! odd number of segments (`users`, `users/alice/orders`), a document path an
//! even number (`users/alice`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::error::Result;
use crate::value::Document;

pub mod in_memory;

pub use in_memory::{InMemoryStore, InMemoryStoreBuilder, Snapshot, SnapshotDocument};

/// Sort direction of an ordered sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

/// Parameters of a bounded document fetch.
///
/// # Example
///
/// ```rust
/// use docscope::store::{Direction, SampleQuery};
///
/// let query = SampleQuery::new(10)
///     .order_by("createdAt", Direction::Descending)
///     .start_after("doc-42");
/// assert_eq!(query.limit, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleQuery {
    /// Maximum number of documents returned.
    pub limit: usize,
    /// Optional ordering. Documents lacking the field are left out.
    pub order_by: Option<(String, Direction)>,
    /// Id of the last document of the previous page.
    pub start_after: Option<String>,
}

impl SampleQuery {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            order_by: None,
            start_after: None,
        }
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    pub fn start_after(mut self, document_id: impl Into<String>) -> Self {
        self.start_after = Some(document_id.into());
        self
    }
}

/// The read operations the analytics engine needs from a document store.
///
/// Implementations must be safe to share across tasks; the engine issues
/// independent reads concurrently.
#[async_trait]
pub trait DocumentStore: Debug + Send + Sync {
    /// Names of the root collections, in the store's listing order.
    async fn list_collections(&self) -> Result<Vec<String>>;

    /// Number of documents in a collection. Unknown collections count 0.
    async fn count_documents(&self, collection_path: &str) -> Result<u64>;

    /// Number of documents whose timestamp `field` lies in `[start, end)`.
    ///
    /// # Errors
    ///
    /// Stores that need an index for range queries return
    /// [`DocScopeError::MissingIndex`](crate::error::DocScopeError::MissingIndex)
    /// when it does not exist.
    async fn count_in_range(
        &self,
        collection_path: &str,
        field: &str,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> Result<u64>;

    /// Fetches at most `query.limit` documents of a collection.
    async fn sample_documents(
        &self,
        collection_path: &str,
        query: &SampleQuery,
    ) -> Result<Vec<Document>>;

    /// Names of the subcollections under one document.
    async fn list_subcollections(&self, document_path: &str) -> Result<Vec<String>>;
}
