//! Collection sizes, recency windows and daily trends.
//!
//! Windowed counts run range queries over the configured timestamp field.
//! Those queries often need an index that does not exist; when any of them
//! fails, or when the collection has no timestamp field at all, the counts
//! are estimated from the total with fixed ratios instead of failing the
//! whole request.

use chrono::{DateTime, Duration, Months, NaiveTime, TimeZone, Utc};
use futures::future::{join_all, try_join_all};
use tracing::{debug, warn};

use crate::analyzers::aggregations::{round_half_up, total_documents};
use crate::analyzers::types::{
    CollectionInfo, CollectionStats, CollectionTrend, GlobalStats, TrendDataPoint,
};
use crate::config::{AnalysisConfig, FallbackRatios};
use crate::error::{DocScopeError, Result};
use crate::store::{Direction, DocumentStore, SampleQuery};
use crate::value::Document;

/// Document counts since the start of today, this week and this month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowedCounts {
    pub today: u64,
    pub week: u64,
    pub month: u64,
}

/// Start instants of the three count windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindows {
    pub today_start: DateTime<Utc>,
    pub week_start: DateTime<Utc>,
    pub month_start: DateTime<Utc>,
}

/// UTC midnight of `now`, seven days before it and one calendar month before it.
pub fn time_windows(now: DateTime<Utc>) -> TimeWindows {
    let today_start = start_of_day(now);
    TimeWindows {
        today_start,
        week_start: today_start - Duration::days(7),
        month_start: today_start
            .checked_sub_months(Months::new(1))
            .unwrap_or(today_start - Duration::days(31)),
    }
}

fn start_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&instant.date_naive().and_time(NaiveTime::MIN))
}

/// Counts derived from the total when real windowed counts are unavailable.
pub fn estimate_counts(total: u64, ratios: &FallbackRatios) -> WindowedCounts {
    let estimate = |ratio: f64| (total as f64 * ratio).floor() as u64;
    WindowedCounts {
        today: estimate(ratios.today),
        week: estimate(ratios.week),
        month: estimate(ratios.month),
    }
}

/// Month-over-previous growth in whole percent.
///
/// The previous period is everything older than a month (`total - month`).
pub fn growth_percent(total: u64, month: u64) -> i64 {
    let previous = total as i64 - month as i64;
    if previous > 0 {
        round_half_up(month as f64 / previous as f64 * 100.0 - 100.0) as i64
    } else if month > 0 {
        100
    } else {
        0
    }
}

async fn first_document(store: &dyn DocumentStore, collection: &str) -> Result<Option<Document>> {
    let mut docs = store
        .sample_documents(collection, &SampleQuery::new(1))
        .await?;
    Ok(if docs.is_empty() {
        None
    } else {
        Some(docs.swap_remove(0))
    })
}

async fn windowed_counts(
    store: &dyn DocumentStore,
    collection: &str,
    field: &str,
    windows: TimeWindows,
) -> Result<WindowedCounts> {
    let (today, week, month) = futures::try_join!(
        store.count_in_range(collection, field, windows.today_start, None),
        store.count_in_range(collection, field, windows.week_start, None),
        store.count_in_range(collection, field, windows.month_start, None),
    )?;
    Ok(WindowedCounts { today, week, month })
}

/// Root collections with their document counts, counted concurrently.
pub async fn collections_info(store: &dyn DocumentStore) -> Result<Vec<CollectionInfo>> {
    let names = store.list_collections().await?;
    try_join_all(names.into_iter().map(|name| async move {
        let count = store.count_documents(&name).await?;
        Ok::<_, DocScopeError>(CollectionInfo::new(name, count))
    }))
    .await
}

/// Database-wide totals as of `now`.
pub async fn global_stats(store: &dyn DocumentStore, now: DateTime<Utc>) -> Result<GlobalStats> {
    let collections_info = collections_info(store).await?;
    Ok(GlobalStats {
        total_documents: total_documents(&collections_info),
        total_collections: collections_info.len(),
        collections_info,
        last_updated: now,
    })
}

/// Size, recency and growth of one collection as of `now`.
pub async fn collection_stats(
    store: &dyn DocumentStore,
    collection: &str,
    config: &AnalysisConfig,
    now: DateTime<Utc>,
) -> Result<CollectionStats> {
    let document_count = store.count_documents(collection).await?;
    let sample_fields: Vec<String> = first_document(store, collection)
        .await?
        .map(|doc| doc.data.keys().cloned().collect())
        .unwrap_or_default();

    let field = config.timestamp_field.as_str();
    let estimated = estimate_counts(document_count, &config.fallback_ratios);
    let counts = if sample_fields.iter().any(|f| f == field) {
        match windowed_counts(store, collection, field, time_windows(now)).await {
            Ok(counts) => counts,
            Err(e) => {
                warn!(
                    collection = collection,
                    field = field,
                    error = %e,
                    "Windowed counts failed, using estimates"
                );
                estimated
            }
        }
    } else {
        debug!(collection = collection, field = field, "No timestamp field, using estimates");
        estimated
    };

    Ok(CollectionStats {
        name: collection.to_string(),
        document_count,
        today_count: counts.today,
        week_count: counts.week,
        month_count: counts.month,
        growth_percent: growth_percent(document_count, counts.month),
        sample_fields,
    })
}

/// Daily document counts for the last `config.trend_days` days, oldest first.
///
/// Collections that are empty or have no timestamp field yield an empty
/// series. A day whose count fails is estimated from the total.
pub async fn collection_trend(
    store: &dyn DocumentStore,
    collection: &str,
    config: &AnalysisConfig,
    now: DateTime<Utc>,
) -> Result<CollectionTrend> {
    let field = config.timestamp_field.as_str();
    let has_field = first_document(store, collection)
        .await?
        .is_some_and(|doc| doc.get(field).is_some());

    if !has_field {
        return Ok(CollectionTrend {
            collection_name: collection.to_string(),
            data: Vec::new(),
        });
    }

    let total = store.count_documents(collection).await?;
    let daily_estimate =
        (total as f64 * config.fallback_ratios.month / f64::from(config.trend_days)).floor() as u64;
    let today_start = start_of_day(now);

    let days = (0..config.trend_days).rev().map(|offset| {
        let day_start = today_start - Duration::days(i64::from(offset));
        let day_end = day_start + Duration::days(1);
        async move {
            let count = match store
                .count_in_range(collection, field, day_start, Some(day_end))
                .await
            {
                Ok(count) => count,
                Err(e) => {
                    debug!(collection = collection, error = %e, "Daily count failed, using estimate");
                    daily_estimate
                }
            };
            TrendDataPoint::new(day_start.date_naive(), count)
        }
    });

    Ok(CollectionTrend {
        collection_name: collection.to_string(),
        data: join_all(days).await,
    })
}

/// Trends of the first `config.trend_collections_limit` root collections.
pub async fn all_trends(
    store: &dyn DocumentStore,
    config: &AnalysisConfig,
    now: DateTime<Utc>,
) -> Result<Vec<CollectionTrend>> {
    let names = store.list_collections().await?;
    try_join_all(
        names
            .iter()
            .take(config.trend_collections_limit)
            .map(|name| collection_trend(store, name, config, now)),
    )
    .await
}

/// Most recent documents, newest first when the collection carries the timestamp field.
pub async fn recent_documents(
    store: &dyn DocumentStore,
    collection: &str,
    limit: usize,
    timestamp_field: &str,
    start_after: Option<&str>,
) -> Result<Vec<Document>> {
    let has_field = first_document(store, collection)
        .await?
        .is_some_and(|doc| doc.get(timestamp_field).is_some());

    let mut query = SampleQuery::new(limit);
    if has_field {
        query = query.order_by(timestamp_field, Direction::Descending);
    }
    if let Some(cursor) = start_after {
        query = query.start_after(cursor);
    }
    store.sample_documents(collection, &query).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use chrono::NaiveDate;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 15, 30, 0).unwrap()
    }

    fn doc_at(id: &str, ts: DateTime<Utc>) -> Document {
        Document::from_json(
            id,
            json!({"createdAt": {"_seconds": ts.timestamp(), "_nanoseconds": 0}, "kind": "event"}),
        )
    }

    fn timed_store() -> InMemoryStore {
        InMemoryStore::builder()
            .collection(
                "events",
                vec![
                    doc_at("e1", Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap()),
                    doc_at("e2", Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()),
                    doc_at("e3", Utc.with_ymd_and_hms(2024, 2, 20, 9, 0, 0).unwrap()),
                    doc_at("e4", Utc.with_ymd_and_hms(2023, 12, 1, 9, 0, 0).unwrap()),
                ],
            )
            .collection(
                "plain",
                (0..100)
                    .map(|i| Document::from_json(format!("p{i}"), json!({"n": i})))
                    .collect(),
            )
            .build()
    }

    #[test]
    fn test_time_windows() {
        let windows = time_windows(now());
        assert_eq!(windows.today_start, Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());
        assert_eq!(windows.week_start, Utc.with_ymd_and_hms(2024, 3, 8, 0, 0, 0).unwrap());
        assert_eq!(windows.month_start, Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_growth_and_estimates() {
        assert_eq!(growth_percent(100, 40), -33);
        assert_eq!(growth_percent(10, 10), 100);
        assert_eq!(growth_percent(0, 0), 0);
        assert_eq!(growth_percent(4, 3), 200);

        let estimate = estimate_counts(100, &FallbackRatios::default());
        assert_eq!(
            estimate,
            WindowedCounts {
                today: 3,
                week: 15,
                month: 40
            }
        );
    }

    #[tokio::test]
    async fn test_collection_stats_with_timestamps() {
        let store = timed_store();
        let stats = collection_stats(&store, "events", &AnalysisConfig::default(), now())
            .await
            .unwrap();

        assert_eq!(stats.document_count, 4);
        assert_eq!(stats.today_count, 1);
        assert_eq!(stats.week_count, 2);
        assert_eq!(stats.month_count, 3);
        assert_eq!(stats.growth_percent, 200);
        assert_eq!(stats.sample_fields, vec!["createdAt", "kind"]);
    }

    #[tokio::test]
    async fn test_collection_stats_without_timestamp_field() {
        let store = timed_store();
        let stats = collection_stats(&store, "plain", &AnalysisConfig::default(), now())
            .await
            .unwrap();

        assert_eq!(stats.today_count, 3);
        assert_eq!(stats.week_count, 15);
        assert_eq!(stats.month_count, 40);
        assert_eq!(stats.growth_percent, -33);
    }

    #[tokio::test]
    async fn test_missing_index_falls_back_to_estimates() {
        let store = InMemoryStore::builder()
            .collection(
                "events",
                (0..10)
                    .map(|i| doc_at(&format!("e{i}"), now()))
                    .collect(),
            )
            .missing_index("events", "createdAt")
            .build();
        let stats = collection_stats(&store, "events", &AnalysisConfig::default(), now())
            .await
            .unwrap();

        assert_eq!(stats.today_count, 0);
        assert_eq!(stats.week_count, 1);
        assert_eq!(stats.month_count, 4);
    }

    #[tokio::test]
    async fn test_empty_collection_stats() {
        let store = InMemoryStore::new();
        let stats = collection_stats(&store, "nothing", &AnalysisConfig::default(), now())
            .await
            .unwrap();
        assert_eq!(stats.document_count, 0);
        assert!(stats.sample_fields.is_empty());
        assert_eq!(stats.growth_percent, 0);
    }

    #[tokio::test]
    async fn test_trend_series() {
        let store = timed_store();
        let trend = collection_trend(&store, "events", &AnalysisConfig::default(), now())
            .await
            .unwrap();

        assert_eq!(trend.data.len(), 30);
        assert_eq!(trend.data[0].date, NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());
        assert_eq!(trend.data[29].date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(trend.data[29].count, 1);
        assert_eq!(trend.data.iter().map(|p| p.count).sum::<u64>(), 3);
    }

    #[tokio::test]
    async fn test_trend_without_timestamps_is_empty() {
        let store = timed_store();
        let config = AnalysisConfig::default();
        assert!(collection_trend(&store, "plain", &config, now())
            .await
            .unwrap()
            .data
            .is_empty());
        assert!(collection_trend(&store, "missing", &config, now())
            .await
            .unwrap()
            .data
            .is_empty());
    }

    #[tokio::test]
    async fn test_trend_failed_days_are_estimated() {
        let store = InMemoryStore::builder()
            .collection(
                "events",
                (0..150).map(|i| doc_at(&format!("e{i}"), now())).collect(),
            )
            .without_range_indexes()
            .build();
        let trend = collection_trend(&store, "events", &AnalysisConfig::default(), now())
            .await
            .unwrap();
        assert!(trend.data.iter().all(|p| p.count == 2));
    }

    #[tokio::test]
    async fn test_recent_documents_ordering() {
        let store = timed_store();
        let recent = recent_documents(&store, "events", 2, "createdAt", None)
            .await
            .unwrap();
        let ids: Vec<&str> = recent.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e2"]);

        let next = recent_documents(&store, "events", 2, "createdAt", Some("e2"))
            .await
            .unwrap();
        let ids: Vec<&str> = next.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["e3", "e4"]);

        let plain = recent_documents(&store, "plain", 3, "createdAt", None)
            .await
            .unwrap();
        assert_eq!(plain[0].id, "p0");
    }

    #[tokio::test]
    async fn test_global_stats() {
        let store = timed_store();
        let stats = global_stats(&store, now()).await.unwrap();
        assert_eq!(stats.total_documents, 104);
        assert_eq!(stats.total_collections, 2);
        assert_eq!(stats.collections_info[0].name, "events");
        assert_eq!(stats.last_updated, now());

        let trends = all_trends(&store, &AnalysisConfig::default(), now())
            .await
            .unwrap();
        assert_eq!(trends.len(), 2);
        assert!(trends[1].data.is_empty());
    }
}
