//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use docscope::store::{InMemoryStore, InMemoryStoreBuilder};
use docscope::value::Document;
use serde_json::json;
use std::path::PathBuf;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A small shop: users, categories, products, orders and reviews, with
/// nested addresses, devices, items and discounts.
pub fn shop_store() -> InMemoryStore {
    InMemoryStore::from_path(fixture_path("shop_snapshot.json")).unwrap()
}

pub fn shop_builder() -> InMemoryStoreBuilder {
    let snapshot = std::fs::read_to_string(fixture_path("shop_snapshot.json")).unwrap();
    InMemoryStore::builder().snapshot(serde_json::from_str(&snapshot).unwrap())
}

pub fn timestamp(ts: DateTime<Utc>) -> serde_json::Value {
    json!({"_seconds": ts.timestamp(), "_nanoseconds": 0})
}

/// Events created now, 3, 20 and 90 days ago, in insertion order e1..e4.
pub fn events(now: DateTime<Utc>) -> Vec<Document> {
    [0, 3, 20, 90]
        .iter()
        .enumerate()
        .map(|(i, days)| {
            Document::from_json(
                format!("e{}", i + 1),
                json!({
                    "createdAt": timestamp(now - Duration::days(*days)),
                    "kind": "signup",
                }),
            )
        })
        .collect()
}

/// Documents without any timestamp field.
pub fn plain_documents(count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| Document::from_json(format!("doc{i}"), json!({"n": i})))
        .collect()
}
