//! Integration tests for the analytics facade over an in-memory store.

mod common;

use chrono::{Duration, Utc};
use docscope::analyzers::{
    aggregate_to_weekly, calculate_daily_average, find_peak_day, InferredType, SemanticType,
    TypeTag,
};
use docscope::config::{AnalysisConfig, FallbackRatios};
use docscope::core::StoreAnalytics;
use docscope::error::DocScopeError;
use docscope::formatters::{FormatterConfig, HumanFormatter, JsonFormatter, ReportFormatter};
use docscope::store::InMemoryStore;

use common::{events, plain_documents, shop_store};

#[tokio::test]
async fn test_global_stats() {
    let analytics = StoreAnalytics::new(shop_store());
    let stats = analytics.global_stats().await.unwrap();

    assert_eq!(stats.total_collections, 5);
    assert_eq!(stats.total_documents, 11);
    let names: Vec<&str> = stats
        .collections_info
        .iter()
        .map(|info| info.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["users", "categories", "products", "orders", "reviews"]
    );
}

#[tokio::test]
async fn test_collection_stats_with_timestamps() {
    let now = Utc::now();
    let store = InMemoryStore::builder()
        .collection("events", events(now))
        .build();
    let stats = StoreAnalytics::new(store)
        .collection_stats("events")
        .await
        .unwrap();

    assert_eq!(stats.document_count, 4);
    assert_eq!(stats.today_count, 1);
    assert_eq!(stats.week_count, 2);
    assert_eq!(stats.month_count, 3);
    // three recent documents against one older one
    assert_eq!(stats.growth_percent, 200);
    assert_eq!(stats.sample_fields, vec!["createdAt", "kind"]);
}

#[tokio::test]
async fn test_collection_stats_fallback_estimates() {
    let store = InMemoryStore::builder()
        .collection("plain", plain_documents(100))
        .build();
    let stats = StoreAnalytics::new(store)
        .collection_stats("plain")
        .await
        .unwrap();

    assert_eq!(stats.today_count, 3);
    assert_eq!(stats.week_count, 15);
    assert_eq!(stats.month_count, 40);
    assert_eq!(stats.growth_percent, -33);
}

#[tokio::test]
async fn test_missing_index_falls_back() {
    let now = Utc::now();
    let store = InMemoryStore::builder()
        .collection("events", events(now))
        .missing_index("events", "createdAt")
        .build();
    let config = AnalysisConfig::builder()
        .fallback_ratios(FallbackRatios {
            today: 0.25,
            week: 0.5,
            month: 0.75,
        })
        .build()
        .unwrap();
    let stats = StoreAnalytics::new(store)
        .with_config(config)
        .unwrap()
        .collection_stats("events")
        .await
        .unwrap();

    assert_eq!(stats.today_count, 1);
    assert_eq!(stats.week_count, 2);
    assert_eq!(stats.month_count, 3);
}

#[tokio::test]
async fn test_trend_series() {
    let now = Utc::now();
    let store = InMemoryStore::builder()
        .collection("events", events(now))
        .collection("plain", plain_documents(5))
        .build();
    let analytics = StoreAnalytics::new(store);

    let trend = analytics.collection_trends("events").await.unwrap();
    assert_eq!(trend.data.len(), 30);
    assert_eq!(trend.data.last().unwrap().date, now.date_naive());
    assert_eq!(
        trend.data.first().unwrap().date,
        now.date_naive() - Duration::days(29)
    );
    let total: u64 = trend.data.iter().map(|point| point.count).sum();
    assert_eq!(total, 3);
    assert_eq!(find_peak_day(&trend.data).unwrap().count, 1);
    assert_eq!(calculate_daily_average(&trend.data), 0);
    let weekly_total: u64 = aggregate_to_weekly(&trend.data)
        .iter()
        .map(|week| week.count)
        .sum();
    assert_eq!(weekly_total, 3);

    let plain = analytics.collection_trends("plain").await.unwrap();
    assert!(plain.data.is_empty());

    let all = analytics.all_trends().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].collection_name, "events");
}

#[tokio::test]
async fn test_trend_with_failing_range_counts() {
    let now = Utc::now();
    let mut documents = events(now);
    documents.extend(plain_documents(71));
    let store = InMemoryStore::builder()
        .collection("events", documents)
        .without_range_indexes()
        .build();

    let trend = StoreAnalytics::new(store)
        .collection_trends("events")
        .await
        .unwrap();
    // floor(75 * 0.40 / 30) per day
    assert!(trend.data.iter().all(|point| point.count == 1));
}

#[tokio::test]
async fn test_recent_documents_paging() {
    let now = Utc::now();
    let store = InMemoryStore::builder()
        .collection("events", events(now))
        .build();
    let analytics = StoreAnalytics::new(store);

    let first_page = analytics
        .recent_documents("events", Some(2), None)
        .await
        .unwrap();
    let ids: Vec<&str> = first_page.iter().map(|doc| doc.id.as_str()).collect();
    assert_eq!(ids, vec!["e1", "e2"]);

    let second_page = analytics
        .recent_documents("events", Some(2), Some("e2"))
        .await
        .unwrap();
    let ids: Vec<&str> = second_page.iter().map(|doc| doc.id.as_str()).collect();
    assert_eq!(ids, vec!["e3", "e4"]);

    let err = analytics
        .recent_documents("events", Some(2), Some("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, DocScopeError::NotFound(_)));
}

#[tokio::test]
async fn test_recent_documents_without_timestamps() {
    let store = InMemoryStore::builder()
        .collection("plain", plain_documents(20))
        .build();
    let docs = StoreAnalytics::new(store)
        .recent_documents("plain", None, None)
        .await
        .unwrap();

    assert_eq!(docs.len(), 10);
    assert_eq!(docs[0].id, "doc0");
}

#[tokio::test]
async fn test_field_statistics() {
    let analytics = StoreAnalytics::new(shop_store());

    let age = analytics
        .field_statistics("users", "age", None)
        .await
        .unwrap();
    assert_eq!(age.field_type, TypeTag::Number);
    assert_eq!(age.null_count, 1);
    assert_eq!(age.total_count, 3);
    assert_eq!(age.fill_rate, 67);
    let numeric = age.numeric_stats.unwrap();
    assert_eq!(numeric.min, 36.0);
    assert_eq!(numeric.max, 41.0);
    assert_eq!(numeric.avg, 38.5);

    let paid = analytics
        .field_statistics("orders", "paid", None)
        .await
        .unwrap();
    let booleans = paid.boolean_stats.unwrap();
    assert_eq!(booleans.true_count, 1);
    assert_eq!(booleans.false_count, 1);

    let all = analytics
        .all_field_statistics("products", None)
        .await
        .unwrap();
    let names: Vec<&str> = all.iter().map(|s| s.field_name.as_str()).collect();
    assert_eq!(names, vec!["title", "categoryId", "price", "tags"]);
    let tags = all.iter().find(|s| s.field_name == "tags").unwrap();
    assert_eq!(tags.array_stats.as_ref().unwrap().max_length, 2);
}

#[tokio::test]
async fn test_field_statistics_on_empty_collection() {
    let analytics = StoreAnalytics::new(shop_store());
    assert!(analytics
        .all_field_statistics("nothing", None)
        .await
        .unwrap()
        .is_empty());

    let stats = analytics
        .field_statistics("nothing", "x", None)
        .await
        .unwrap();
    assert_eq!(stats.field_type, TypeTag::Unknown);
    assert_eq!(stats.total_count, 0);
}

#[tokio::test]
async fn test_collection_patterns() {
    let analytics = StoreAnalytics::new(shop_store());
    let patterns = analytics
        .collection_patterns("users", None)
        .await
        .unwrap();

    assert_eq!(patterns.document_count, 3);
    let email = &patterns.fields["email"];
    assert_eq!(email.inferred_type, InferredType::Semantic(SemanticType::Email));
    assert_eq!(email.confidence, 1.0);

    let website = &patterns.fields["website"];
    assert_eq!(website.inferred_type, InferredType::Semantic(SemanticType::Url));

    let age = &patterns.fields["age"];
    assert_eq!(age.base_type, TypeTag::Number);
    assert_eq!(age.inferred_type, InferredType::Semantic(SemanticType::Age));
    assert_eq!(age.null_count, 1);
    assert_eq!(patterns.numeric_fields, vec!["age"]);

    let empty = analytics
        .collection_patterns("nothing", None)
        .await
        .unwrap();
    assert_eq!(empty.document_count, 0);
    assert!(empty.fields.is_empty());
}

#[tokio::test]
async fn test_analyze_collection_report() {
    let analytics = StoreAnalytics::new(shop_store());
    let analysis = analytics.analyze_collection("orders", None).await.unwrap();

    let report = HumanFormatter::with_config(FormatterConfig::minimal())
        .format(&analysis)
        .unwrap();
    assert!(report.contains("Collection: orders (2 documents, 4 fields)"));

    let json = JsonFormatter::new().format(&analysis).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["collectionName"], "orders");
    assert_eq!(parsed["patterns"]["fields"]["total"]["inferredType"], "currency");
}

#[tokio::test]
async fn test_store_errors_propagate() {
    let store = common::shop_builder().failing_count("users").build();
    let analytics = StoreAnalytics::new(store);

    let err = analytics.global_stats().await.unwrap_err();
    assert!(matches!(err, DocScopeError::Store { .. }));
    assert!(analytics.collection_count("products").await.is_ok());
}
