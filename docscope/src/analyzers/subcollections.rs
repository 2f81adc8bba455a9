//! Discovery of nested collections.
//!
//! Stores only list the subcollections of one document at a time, so the
//! hierarchy is found by sampling a few documents per collection and listing
//! theirs, recursing up to a depth limit. Subcollection names are
//! deduplicated per parent collection: `users/a/orders` and `users/b/orders`
//! are reported once, under the first document that had them.

use futures::future::{try_join_all, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::error::{DocScopeError, Result};
use crate::store::{DocumentStore, SampleQuery};

/// One discovered subcollection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcollectionInfo {
    pub name: String,
    /// Full collection path, e.g. `users/alice/orders`.
    pub path: String,
    /// Last segment of the parent collection path.
    pub parent_collection: String,
    pub parent_doc_id: String,
    pub document_count: u64,
    /// 1 for subcollections of root collections.
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootCollectionSummary {
    pub name: String,
    pub document_count: u64,
    pub has_subcollections: bool,
}

/// Root collections plus everything discovered beneath them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionHierarchy {
    pub root_collections: Vec<RootCollectionSummary>,
    pub subcollections: Vec<SubcollectionInfo>,
    pub total_depth: usize,
    pub total_subcollections: usize,
}

/// Tree view of a hierarchy for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionTreeNode {
    pub name: String,
    pub path: String,
    pub document_count: u64,
    pub depth: usize,
    pub children: Vec<CollectionTreeNode>,
}

/// Discovers the subcollections below `collection_path`.
///
/// A document whose subcollections cannot be listed is skipped, and a
/// subcollection whose count fails is reported with 0 documents. A
/// subcollection that cannot be sampled is still reported, without anything
/// below it. Only a failure to sample `collection_path` itself is an error.
pub fn discover_subcollections<'a>(
    store: &'a dyn DocumentStore,
    collection_path: &'a str,
    max_depth: usize,
    current_depth: usize,
    sample_size: usize,
) -> BoxFuture<'a, Result<Vec<SubcollectionInfo>>> {
    async move {
        if current_depth >= max_depth {
            return Ok(Vec::new());
        }

        let documents = store
            .sample_documents(collection_path, &SampleQuery::new(sample_size))
            .await?;
        let parent_collection = collection_path
            .rsplit('/')
            .next()
            .unwrap_or(collection_path)
            .to_string();

        let mut found = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for doc in &documents {
            let document_path = format!("{collection_path}/{}", doc.id);
            let names = match store.list_subcollections(&document_path).await {
                Ok(names) => names,
                Err(e) => {
                    warn!(document = %document_path, error = %e, "Failed to list subcollections");
                    continue;
                }
            };

            for name in names {
                if !seen.insert(name.clone()) {
                    continue;
                }

                let path = format!("{document_path}/{name}");
                let document_count = store.count_documents(&path).await.unwrap_or_else(|e| {
                    debug!(path = %path, error = %e, "Subcollection count failed");
                    0
                });

                let depth = current_depth + 1;
                found.push(SubcollectionInfo {
                    name,
                    path: path.clone(),
                    parent_collection: parent_collection.clone(),
                    parent_doc_id: doc.id.clone(),
                    document_count,
                    depth,
                });

                if depth < max_depth {
                    match discover_subcollections(store, &path, max_depth, depth, sample_size)
                        .await
                    {
                        Ok(nested) => found.extend(nested),
                        Err(e) => {
                            warn!(path = %path, error = %e, "Skipping nested subcollections")
                        }
                    }
                }
            }
        }

        Ok(found)
    }
    .boxed()
}

/// Counts and discovers every root collection, concurrently.
///
/// Results are assembled in root listing order.
pub async fn collection_hierarchy(
    store: &dyn DocumentStore,
    max_depth: usize,
    sample_size: usize,
) -> Result<CollectionHierarchy> {
    let roots = store.list_collections().await?;

    let per_root = try_join_all(roots.iter().map(|name| async move {
        let document_count = store.count_documents(name).await?;
        let subcollections =
            discover_subcollections(store, name, max_depth, 0, sample_size).await?;
        Ok::<_, DocScopeError>((
            RootCollectionSummary {
                name: name.clone(),
                document_count,
                has_subcollections: !subcollections.is_empty(),
            },
            subcollections,
        ))
    }))
    .await?;

    let mut root_collections = Vec::with_capacity(per_root.len());
    let mut subcollections = Vec::new();
    for (summary, subs) in per_root {
        root_collections.push(summary);
        subcollections.extend(subs);
    }

    Ok(CollectionHierarchy {
        total_depth: subcollections.iter().map(|s| s.depth).max().unwrap_or(0),
        total_subcollections: subcollections.len(),
        root_collections,
        subcollections,
    })
}

/// True when any sampled document of the collection has a subcollection.
pub async fn has_subcollections(
    store: &dyn DocumentStore,
    collection_path: &str,
    sample_size: usize,
) -> Result<bool> {
    let documents = store
        .sample_documents(collection_path, &SampleQuery::new(sample_size))
        .await?;

    for doc in &documents {
        match store
            .list_subcollections(&format!("{collection_path}/{}", doc.id))
            .await
        {
            Ok(names) if !names.is_empty() => return Ok(true),
            Ok(_) => {}
            Err(e) => debug!(document = %doc.id, error = %e, "Skipping document"),
        }
    }
    Ok(false)
}

/// Subcollection names of one document. A failed listing yields an empty list.
pub async fn document_subcollections(
    store: &dyn DocumentStore,
    collection_path: &str,
    document_id: &str,
) -> Vec<String> {
    let document_path = format!("{collection_path}/{document_id}");
    store
        .list_subcollections(&document_path)
        .await
        .unwrap_or_else(|e| {
            warn!(document = %document_path, error = %e, "Failed to list subcollections");
            Vec::new()
        })
}

/// Arranges subcollections under their root collections.
///
/// Parents are located by collection name along the path; a subcollection
/// whose intermediate parent is missing attaches to the deepest ancestor
/// found. Subcollections of unknown roots are dropped.
pub fn build_collection_tree(
    roots: &[RootCollectionSummary],
    subcollections: &[SubcollectionInfo],
) -> Vec<CollectionTreeNode> {
    let mut tree: Vec<CollectionTreeNode> = roots
        .iter()
        .map(|root| CollectionTreeNode {
            name: root.name.clone(),
            path: root.name.clone(),
            document_count: root.document_count,
            depth: 0,
            children: Vec::new(),
        })
        .collect();

    let mut sorted: Vec<&SubcollectionInfo> = subcollections.iter().collect();
    sorted.sort_by_key(|sub| sub.path.split('/').count());

    for sub in sorted {
        let parts: Vec<&str> = sub.path.split('/').collect();
        let Some(mut node) = tree.iter_mut().find(|n| n.name == parts[0]) else {
            continue;
        };

        let mut i = 2;
        while i + 1 < parts.len() {
            if let Some(pos) = node.children.iter().position(|c| c.name == parts[i]) {
                node = &mut node.children[pos];
            }
            i += 2;
        }

        node.children.push(CollectionTreeNode {
            name: sub.name.clone(),
            path: sub.path.clone(),
            document_count: sub.document_count,
            depth: sub.depth,
            children: Vec::new(),
        });
    }

    tree
}
