//! # DocScope - Read-only Analytics for Document Stores
//!
//! DocScope inspects a schemaless document database and reports what is in
//! it: how big each collection is and how fast it grows, what every field
//! holds, which string fields look like emails or URLs, how collections
//! point at each other and which collections are nested under documents.
//! It never writes to the store.
//!
//! ## Quick Start
//!
//! ```rust
//! use docscope::prelude::*;
//! use docscope::store::InMemoryStore;
//! use docscope::value::Document;
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> docscope::error::Result<()> {
//! let store = InMemoryStore::builder()
//!     .collection(
//!         "users",
//!         vec![
//!             Document::from_json("u1", json!({"email": "ada@example.com", "plan": "pro"})),
//!             Document::from_json("u2", json!({"email": "alan@example.com", "plan": "free"})),
//!         ],
//!     )
//!     .collection(
//!         "orders",
//!         vec![Document::from_json("o1", json!({"userId": "u1", "total": 42.0}))],
//!     )
//!     .build();
//!
//! let analytics = StoreAnalytics::new(store);
//!
//! let stats = analytics.global_stats().await?;
//! assert_eq!(stats.total_documents, 3);
//!
//! let relationships = analytics.all_relationships(None).await?;
//! assert_eq!(relationships.relationship_count, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! StoreAnalytics (core)
//!     ├── DocumentStore (store)      read-only access: list, count, sample
//!     ├── AnalysisConfig (config)    sample sizes, timestamp field, fallbacks
//!     └── analyzers
//!         ├── classifier             value → type tag
//!         ├── field_stats            per-field statistics
//!         ├── patterns               semantic type inference
//!         ├── relationships          cross-collection links
//!         ├── collection_stats       sizes, windows, trends
//!         ├── subcollections         nested collection discovery
//!         └── aggregations           dashboard helpers
//! ```
//!
//! ## Logging
//!
//! The library emits `tracing` events only. Binaries install a subscriber
//! with [`logging::setup::init_logging`]; how much the facade logs is set
//! through [`logging::LogConfig`].

pub mod analyzers;
pub mod config;
pub mod core;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod prelude;
pub mod security;
pub mod store;
pub mod value;
