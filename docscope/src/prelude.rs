//! Prelude for commonly used types and traits in docscope.

pub use crate::analyzers::{
    CollectionPatterns, CollectionStats, FieldStatistics, GlobalStats, InferredType,
    RelationshipType, SemanticType, TypeTag,
};
pub use crate::config::{AnalysisConfig, StoreCredentials};
pub use crate::core::{FieldAnalysis, StoreAnalytics};
pub use crate::error::{DocScopeError, ErrorContext, Result};
pub use crate::formatters::{FormatterConfig, HumanFormatter, JsonFormatter, ReportFormatter};
pub use crate::logging::LogConfig;
pub use crate::store::{DocumentStore, SampleQuery};
pub use crate::value::{DocValue, Document};
