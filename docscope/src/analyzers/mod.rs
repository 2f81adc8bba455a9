//! Analyzers over sampled documents.
//!
//! Each analyzer is either a pure function over a batch of
//! [`Document`](crate::value::Document)s or a thin async layer that reads
//! what it needs from a [`DocumentStore`](crate::store::DocumentStore).
//!
//! ## Available Analyzers
//!
//! - **Classifier** (`classifier`): one type tag per value
//! - **Field statistics** (`field_stats`): fill rate, cardinality and per-type stats
//! - **Pattern detection** (`patterns`): semantic types such as email or URL, plus
//!   categorical and temporal fields and a primary-key guess
//! - **Relationships** (`relationships`): references and foreign keys between collections
//! - **Collection stats** (`collection_stats`): sizes, recency windows, growth and trends
//! - **Subcollections** (`subcollections`): nested collection discovery
//! - **Aggregations** (`aggregations`): growth, rankings, distributions and weekly rollups
//!
//! ## Example Usage
//!
//! ```rust
//! use docscope::analyzers::{analyze_documents, PatternDetector, SemanticType, InferredType};
//! use docscope::value::Document;
//! use serde_json::json;
//!
//! let docs = vec![
//!     Document::from_json("1", json!({"contact": "ada@example.com", "age": 36})),
//!     Document::from_json("2", json!({"contact": "alan@example.com", "age": 41})),
//! ];
//!
//! let stats = analyze_documents(&docs);
//! assert_eq!(stats.len(), 2);
//!
//! let patterns = PatternDetector::new().analyze_documents("users", 2, &docs);
//! assert_eq!(
//!     patterns.fields["contact"].inferred_type,
//!     InferredType::Semantic(SemanticType::Email)
//! );
//! ```

pub mod aggregations;
pub mod classifier;
pub mod collection_stats;
pub mod field_stats;
pub mod patterns;
pub mod relationships;
pub mod subcollections;
pub mod types;

pub use aggregations::{
    aggregate_to_weekly, calculate_daily_average, calculate_growth, collection_distribution,
    find_peak_day, top_collections, total_documents, DistributionSlice, WeeklyCount,
};
pub use classifier::{classify, classify_value, TypeTag};
pub use collection_stats::{estimate_counts, growth_percent, time_windows, WindowedCounts};
pub use field_stats::{analyze_documents, analyze_field, FieldStatistics, FieldValueSample};
pub use patterns::{
    CollectionPatterns, FieldPattern, InferredType, PatternConfig, PatternDetector, SemanticType,
};
pub use relationships::{
    build_relationship_graph, detect_relationships, CollectionRelationship,
    DatabaseRelationships, RelationshipGraph, RelationshipType,
};
pub use subcollections::{
    build_collection_tree, CollectionHierarchy, CollectionTreeNode, RootCollectionSummary,
    SubcollectionInfo,
};
pub use types::{CollectionInfo, CollectionStats, CollectionTrend, GlobalStats, TrendDataPoint};
