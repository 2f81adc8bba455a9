use chrono::Utc;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::analyzers::collection_stats;
use crate::analyzers::field_stats::{self, FieldStatistics, FieldValueSample};
use crate::analyzers::patterns::{CollectionPatterns, PatternDetector};
use crate::analyzers::relationships::{
    build_relationship_graph, detect_relationships, CollectionRelationship,
    DatabaseRelationships, RelationshipGraph,
};
use crate::analyzers::subcollections::{
    self, build_collection_tree, CollectionHierarchy, CollectionTreeNode, SubcollectionInfo,
};
use crate::analyzers::types::{CollectionInfo, CollectionStats, CollectionTrend, GlobalStats};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::security::{InputValidator, PathSecurity};
use crate::store::{DocumentStore, SampleQuery};
use crate::value::Document;
use crate::{log_field_detail, log_store_op, perf_debug};

/// Field statistics and patterns of one collection sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldAnalysis {
    pub collection_name: String,
    pub field_stats: Vec<FieldStatistics>,
    pub patterns: CollectionPatterns,
}

/// Read-only analytics over a [`DocumentStore`].
///
/// Cloning is cheap: clones share the same store.
#[derive(Debug, Clone)]
pub struct StoreAnalytics {
    store: Arc<dyn DocumentStore>,
    config: AnalysisConfig,
    detector: PatternDetector,
}

impl StoreAnalytics {
    /// Wraps `store` with the default configuration.
    pub fn new(store: impl DocumentStore + 'static) -> Self {
        Self::from_shared(Arc::new(store))
    }

    /// Uses a store that is already shared with other components.
    pub fn from_shared(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            config: AnalysisConfig::default(),
            detector: PatternDetector::new(),
        }
    }

    /// Replaces the configuration after validating it.
    pub fn with_config(mut self, config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn with_detector(mut self, detector: PatternDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    fn sample_size(&self, requested: Option<usize>, default: usize) -> Result<usize> {
        match requested {
            Some(size) => {
                InputValidator::validate_sample_size(size, "sample_size")?;
                Ok(size)
            }
            None => Ok(default),
        }
    }

    async fn sample(&self, collection: &str, limit: usize) -> Result<Vec<Document>> {
        let started = Instant::now();
        let documents = self
            .store
            .sample_documents(collection, &SampleQuery::new(limit))
            .await?;
        log_store_op!(
            self.config.log,
            collection = collection,
            requested = limit,
            returned = documents.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Sampled documents"
        );
        Ok(documents)
    }

    /// Names of the root collections.
    #[instrument(skip(self))]
    pub async fn list_collections(&self) -> Result<Vec<String>> {
        let names = self.store.list_collections().await?;
        log_store_op!(self.config.log, count = names.len(), "Listed root collections");
        Ok(names)
    }

    /// Number of documents in one collection.
    #[instrument(skip(self))]
    pub async fn collection_count(&self, collection: &str) -> Result<u64> {
        PathSecurity::validate_collection_path(collection)?;
        let count = self.store.count_documents(collection).await?;
        log_store_op!(self.config.log, collection = collection, count, "Counted documents");
        Ok(count)
    }

    /// Name and size of every root collection.
    #[instrument(skip(self))]
    pub async fn collections_info(&self) -> Result<Vec<CollectionInfo>> {
        collection_stats::collections_info(self.store()).await
    }

    /// Database-wide totals.
    #[instrument(skip(self))]
    pub async fn global_stats(&self) -> Result<GlobalStats> {
        let stats = collection_stats::global_stats(self.store(), Utc::now()).await?;
        info!(
            collections = stats.total_collections,
            documents = stats.total_documents,
            "Computed global stats"
        );
        Ok(stats)
    }

    /// Size, recency windows and growth of one collection.
    #[instrument(skip(self))]
    pub async fn collection_stats(&self, collection: &str) -> Result<CollectionStats> {
        PathSecurity::validate_collection_path(collection)?;
        collection_stats::collection_stats(self.store(), collection, &self.config, Utc::now()).await
    }

    /// Daily counts of one collection over the configured trend window.
    #[instrument(skip(self))]
    pub async fn collection_trends(&self, collection: &str) -> Result<CollectionTrend> {
        PathSecurity::validate_collection_path(collection)?;
        let trend =
            collection_stats::collection_trend(self.store(), collection, &self.config, Utc::now())
                .await?;
        perf_debug!(
            self.config.log,
            collection = collection,
            points = trend.data.len(),
            "Computed trend"
        );
        Ok(trend)
    }

    /// Trends of the first few root collections.
    #[instrument(skip(self))]
    pub async fn all_trends(&self) -> Result<Vec<CollectionTrend>> {
        collection_stats::all_trends(self.store(), &self.config, Utc::now()).await
    }

    /// Newest documents of a collection, paged with `start_after`.
    #[instrument(skip(self))]
    pub async fn recent_documents(
        &self,
        collection: &str,
        limit: Option<usize>,
        start_after: Option<&str>,
    ) -> Result<Vec<Document>> {
        PathSecurity::validate_collection_path(collection)?;
        if let Some(cursor) = start_after {
            PathSecurity::validate_identifier(cursor, "Cursor document id")?;
        }
        let limit = self.sample_size(limit, self.config.recent_documents_limit)?;
        collection_stats::recent_documents(
            self.store(),
            collection,
            limit,
            &self.config.timestamp_field,
            start_after,
        )
        .await
    }

    /// Statistics of one field over a sample of the collection.
    #[instrument(skip(self))]
    pub async fn field_statistics(
        &self,
        collection: &str,
        field: &str,
        sample_size: Option<usize>,
    ) -> Result<FieldStatistics> {
        PathSecurity::validate_collection_path(collection)?;
        PathSecurity::validate_field_name(field)?;
        let limit = self.sample_size(sample_size, self.config.field_stats_sample_size)?;

        let documents = self.sample(collection, limit).await?;
        let stats = field_stats::analyze_field(&FieldValueSample::from_documents(field, &documents));
        log_field_detail!(
            self.config.log,
            collection = collection,
            field = field,
            field_type = %stats.field_type,
            fill_rate = stats.fill_rate,
            "Analyzed field"
        );
        Ok(stats)
    }

    /// Statistics of every field seen in a sample of the collection.
    ///
    /// An empty collection yields an empty list.
    #[instrument(skip(self))]
    pub async fn all_field_statistics(
        &self,
        collection: &str,
        sample_size: Option<usize>,
    ) -> Result<Vec<FieldStatistics>> {
        PathSecurity::validate_collection_path(collection)?;
        let limit = self.sample_size(sample_size, self.config.field_stats_sample_size)?;

        let documents = self.sample(collection, limit).await?;
        let stats = field_stats::analyze_documents(&documents);
        perf_debug!(
            self.config.log,
            collection = collection,
            fields = stats.len(),
            "Analyzed all fields"
        );
        Ok(stats)
    }

    /// Semantic field patterns of a collection.
    #[instrument(skip(self))]
    pub async fn collection_patterns(
        &self,
        collection: &str,
        sample_size: Option<usize>,
    ) -> Result<CollectionPatterns> {
        PathSecurity::validate_collection_path(collection)?;
        let limit = self.sample_size(sample_size, self.config.pattern_sample_size)?;

        let (document_count, documents) = futures::try_join!(
            self.store.count_documents(collection),
            self.sample(collection, limit)
        )?;
        let patterns = self
            .detector
            .analyze_documents(collection, document_count, &documents);

        for (field, pattern) in &patterns.fields {
            log_field_detail!(
                self.config.log,
                collection = collection,
                field = field.as_str(),
                inferred_type = %pattern.inferred_type,
                confidence = pattern.confidence,
                "Field pattern"
            );
        }
        Ok(patterns)
    }

    /// Relationships from one collection to the other root collections.
    #[instrument(skip(self))]
    pub async fn collection_relationships(
        &self,
        collection: &str,
        sample_size: Option<usize>,
    ) -> Result<Vec<CollectionRelationship>> {
        PathSecurity::validate_collection_path(collection)?;
        let limit = self.sample_size(sample_size, self.config.relationship_sample_size)?;

        let (all_collections, documents) = futures::try_join!(
            self.store.list_collections(),
            self.sample(collection, limit)
        )?;
        Ok(detect_relationships(collection, &all_collections, &documents))
    }

    /// Relationships of every root collection.
    ///
    /// A collection whose sample fails is logged and skipped.
    #[instrument(skip(self))]
    pub async fn all_relationships(
        &self,
        sample_size: Option<usize>,
    ) -> Result<DatabaseRelationships> {
        let limit = self.sample_size(sample_size, self.config.relationship_sample_size)?;
        let collections = self.store.list_collections().await?;

        let samples = join_all(
            collections
                .iter()
                .map(|name| async move { (name, self.sample(name, limit).await) }),
        )
        .await;

        let mut relationships = Vec::new();
        for (name, sample) in samples {
            match sample {
                Ok(documents) => {
                    relationships.extend(detect_relationships(name, &collections, &documents))
                }
                Err(e) => warn!(collection = %name, error = %e, "Skipping collection"),
            }
        }

        info!(
            collections = collections.len(),
            relationships = relationships.len(),
            "Inferred relationships"
        );
        Ok(DatabaseRelationships::new(collections, relationships))
    }

    /// Relationship graph annotated with collection sizes.
    #[instrument(skip(self))]
    pub async fn relationship_graph(&self, sample_size: Option<usize>) -> Result<RelationshipGraph> {
        let (relationships, infos) =
            futures::try_join!(self.all_relationships(sample_size), self.collections_info())?;
        Ok(build_relationship_graph(
            &relationships.relationships,
            Some(infos.as_slice()),
        ))
    }

    /// Root collections with their nested collections.
    #[instrument(skip(self))]
    pub async fn collection_hierarchy(&self) -> Result<CollectionHierarchy> {
        let started = Instant::now();
        let hierarchy = subcollections::collection_hierarchy(
            self.store(),
            self.config.max_subcollection_depth,
            self.config.subcollection_sample_size,
        )
        .await?;
        info!(
            roots = hierarchy.root_collections.len(),
            subcollections = hierarchy.total_subcollections,
            depth = hierarchy.total_depth,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Discovered collection hierarchy"
        );
        Ok(hierarchy)
    }

    /// Subcollections below one collection, up to the configured depth.
    #[instrument(skip(self))]
    pub async fn discover_subcollections(&self, collection: &str) -> Result<Vec<SubcollectionInfo>> {
        PathSecurity::validate_collection_path(collection)?;
        subcollections::discover_subcollections(
            self.store(),
            collection,
            self.config.max_subcollection_depth,
            0,
            self.config.subcollection_sample_size,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn has_subcollections(&self, collection: &str) -> Result<bool> {
        PathSecurity::validate_collection_path(collection)?;
        subcollections::has_subcollections(
            self.store(),
            collection,
            self.config.subcollection_sample_size,
        )
        .await
    }

    /// Subcollection names of one document. A failed listing yields an empty list.
    #[instrument(skip(self))]
    pub async fn document_subcollections(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Vec<String>> {
        PathSecurity::validate_collection_path(collection)?;
        PathSecurity::validate_document_path(&format!("{collection}/{document_id}"))?;
        Ok(subcollections::document_subcollections(self.store(), collection, document_id).await)
    }

    /// The hierarchy arranged as a tree of root collections.
    #[instrument(skip(self))]
    pub async fn collection_tree(&self) -> Result<Vec<CollectionTreeNode>> {
        let hierarchy = self.collection_hierarchy().await?;
        Ok(build_collection_tree(
            &hierarchy.root_collections,
            &hierarchy.subcollections,
        ))
    }

    /// Field statistics and patterns from a single sample.
    ///
    /// Patterns use the first `pattern_sample_size` documents of the sample.
    #[instrument(skip(self))]
    pub async fn analyze_collection(
        &self,
        collection: &str,
        sample_size: Option<usize>,
    ) -> Result<FieldAnalysis> {
        PathSecurity::validate_collection_path(collection)?;
        let limit = self.sample_size(sample_size, self.config.field_stats_sample_size)?;

        let (document_count, documents) = futures::try_join!(
            self.store.count_documents(collection),
            self.sample(collection, limit)
        )?;
        let pattern_sample = &documents[..documents.len().min(self.config.pattern_sample_size)];

        Ok(FieldAnalysis {
            collection_name: collection.to_string(),
            field_stats: field_stats::analyze_documents(&documents),
            patterns: self
                .detector
                .analyze_documents(collection, document_count, pattern_sample),
        })
    }
}
