//! Collection-level result types shared by the analyzers and the facade.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Name and size of one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionInfo {
    pub name: String,
    pub document_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl CollectionInfo {
    pub fn new(name: impl Into<String>, document_count: u64) -> Self {
        Self {
            name: name.into(),
            document_count,
            last_updated: None,
        }
    }
}

/// Database-wide totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_documents: u64,
    pub total_collections: usize,
    pub collections_info: Vec<CollectionInfo>,
    pub last_updated: DateTime<Utc>,
}

/// Size and recency figures for one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub name: String,
    pub document_count: u64,
    pub today_count: u64,
    pub week_count: u64,
    pub month_count: u64,
    pub growth_percent: i64,
    pub sample_fields: Vec<String>,
}

/// Document count for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendDataPoint {
    pub date: NaiveDate,
    pub count: u64,
}

impl TrendDataPoint {
    pub fn new(date: NaiveDate, count: u64) -> Self {
        Self { date, count }
    }
}

/// Daily series for one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionTrend {
    pub collection_name: String,
    pub data: Vec<TrendDataPoint>,
}
