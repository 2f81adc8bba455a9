//! The analytics facade.
//!
//! [`StoreAnalytics`] ties a [`DocumentStore`](crate::store::DocumentStore)
//! to an [`AnalysisConfig`](crate::config::AnalysisConfig) and exposes every
//! analysis as one async method. The analyzers themselves are plain
//! functions over documents; this layer decides how much to sample, checks
//! user-supplied names and logs what it reads.
//!
//! ## Example
//!
//! ```rust
//! use docscope::core::StoreAnalytics;
//! use docscope::store::InMemoryStore;
//! use docscope::value::Document;
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> docscope::error::Result<()> {
//! let store = InMemoryStore::builder()
//!     .collection(
//!         "users",
//!         vec![Document::from_json("u1", json!({"email": "ada@example.com"}))],
//!     )
//!     .build();
//!
//! let analytics = StoreAnalytics::new(store);
//! let patterns = analytics.collection_patterns("users", None).await?;
//! assert_eq!(patterns.document_count, 1);
//! # Ok(())
//! # }
//! ```

mod analytics;

pub use analytics::{FieldAnalysis, StoreAnalytics};
