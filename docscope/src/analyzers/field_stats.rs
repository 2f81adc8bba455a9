//! Per-field statistics over a document sample.
//!
//! For one field across a batch of documents the engine reports the null
//! count, fill rate and cardinality, plus one type-specific block chosen by
//! the base type of the first non-null value:
//!
//! - `number` → [`NumericFieldStats`] (min/max/avg/median/population stdDev/sum)
//! - `string` → [`StringFieldStats`] (length stats and the five most common values)
//! - `boolean` → [`BooleanFieldStats`]
//! - `array` → [`ArrayFieldStats`] (element-count stats)
//!
//! Values of a different type than the selected one are left out of the
//! type-specific block. Array length stats are the exception: non-array
//! values count as length 0.
//!
//! # Example
//!
//! ```rust
//! use docscope::analyzers::field_stats::{analyze_field, FieldValueSample};
//! use docscope::value::DocValue;
//!
//! let sample = FieldValueSample::new(
//!     "status",
//!     vec![Some("a".into()), Some("a".into()), Some("b".into()), Some(DocValue::Null)],
//!     4,
//! );
//! let stats = analyze_field(&sample);
//! assert_eq!(stats.fill_rate, 75);
//! assert_eq!(stats.unique_count, 2);
//! ```

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::analyzers::aggregations::{round2, round_half_up};
use crate::analyzers::classifier::{classify, classify_value, TypeTag};
use crate::value::{DocValue, Document};

/// Number of entries reported in [`StringFieldStats::most_common`].
pub const MOST_COMMON_LIMIT: usize = 5;

/// Longest value shown in [`StringFieldStats::most_common`] before truncation.
pub const MOST_COMMON_MAX_CHARS: usize = 50;

/// Raw values of one field across a document batch.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValueSample {
    pub field_name: String,
    /// One entry per document; `None` when the document lacks the field.
    pub values: Vec<Option<DocValue>>,
    /// Number of documents in the batch.
    pub total_count: usize,
}

impl FieldValueSample {
    pub fn new(
        field_name: impl Into<String>,
        values: Vec<Option<DocValue>>,
        total_count: usize,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            values,
            total_count,
        }
    }

    /// Extracts `field_name` from every document of the batch.
    pub fn from_documents(field_name: &str, documents: &[Document]) -> Self {
        let values = documents
            .iter()
            .map(|doc| doc.get(field_name).cloned())
            .collect();
        Self::new(field_name, values, documents.len())
    }

    /// Values that are neither absent nor null, in document order.
    pub fn non_null(&self) -> impl Iterator<Item = &DocValue> {
        self.values
            .iter()
            .filter(|value| !classify(value.as_ref()).is_missing())
            .filter_map(Option::as_ref)
    }

    pub fn null_count(&self) -> usize {
        self.values
            .iter()
            .filter(|value| classify(value.as_ref()).is_missing())
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericFieldStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub median: f64,
    pub std_dev: f64,
    pub sum: f64,
}

/// A value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringFieldStats {
    pub most_common: Vec<ValueCount>,
    pub avg_length: usize,
    pub min_length: usize,
    pub max_length: usize,
    pub empty_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanFieldStats {
    pub true_count: usize,
    pub false_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayFieldStats {
    pub avg_length: usize,
    pub min_length: usize,
    pub max_length: usize,
}

/// Statistics for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldStatistics {
    pub field_name: String,
    #[serde(rename = "type")]
    pub field_type: TypeTag,
    pub null_count: usize,
    pub total_count: usize,
    pub unique_count: usize,
    /// Percentage of documents holding a non-null value.
    pub fill_rate: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_stats: Option<NumericFieldStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_stats: Option<StringFieldStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean_stats: Option<BooleanFieldStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_stats: Option<ArrayFieldStats>,
}

/// Counts distinct values by their canonical key.
pub fn unique_count<'a>(values: impl IntoIterator<Item = &'a DocValue>) -> usize {
    values
        .into_iter()
        .map(DocValue::canonical_key)
        .collect::<HashSet<_>>()
        .len()
}

/// `round((total - nulls) / total * 100)`, or 0 for an empty batch.
pub fn fill_rate(total_count: usize, null_count: usize) -> u32 {
    if total_count == 0 {
        return 0;
    }
    let filled = total_count.saturating_sub(null_count) as f64;
    round_half_up(filled / total_count as f64 * 100.0) as u32
}

/// Computes [`FieldStatistics`] for one field sample.
pub fn analyze_field(sample: &FieldValueSample) -> FieldStatistics {
    let non_null: Vec<&DocValue> = sample.non_null().collect();
    let null_count = sample.null_count();

    let field_type = non_null
        .first()
        .map(|value| classify_value(value))
        .unwrap_or(TypeTag::Unknown);

    let mut stats = FieldStatistics {
        field_name: sample.field_name.clone(),
        field_type,
        null_count,
        total_count: sample.total_count,
        unique_count: unique_count(non_null.iter().copied()),
        fill_rate: fill_rate(sample.total_count, null_count),
        numeric_stats: None,
        string_stats: None,
        boolean_stats: None,
        array_stats: None,
    };

    match field_type {
        TypeTag::Number => {
            let numbers: Vec<f64> = non_null.iter().filter_map(|v| v.as_f64()).collect();
            stats.numeric_stats = Some(numeric_stats(&numbers));
        }
        TypeTag::String => {
            let strings: Vec<&str> = non_null.iter().filter_map(|v| v.as_str()).collect();
            stats.string_stats = Some(string_stats(&strings));
        }
        TypeTag::Boolean => {
            let booleans: Vec<bool> = non_null.iter().filter_map(|v| v.as_bool()).collect();
            stats.boolean_stats = Some(boolean_stats(&booleans));
        }
        TypeTag::Array => {
            stats.array_stats = Some(array_stats(&non_null));
        }
        TypeTag::Null
        | TypeTag::Undefined
        | TypeTag::Timestamp
        | TypeTag::GeoPoint
        | TypeTag::Reference
        | TypeTag::Map
        | TypeTag::Unknown => {}
    }

    stats
}

/// Field names across a batch, in first-seen order.
pub fn field_names(documents: &[Document]) -> Vec<String> {
    let mut names: IndexMap<&str, ()> = IndexMap::new();
    for doc in documents {
        for key in doc.data.keys() {
            names.entry(key.as_str()).or_insert(());
        }
    }
    names.into_keys().map(str::to_string).collect()
}

/// Statistics for every field seen in the batch. An empty batch yields no fields.
pub fn analyze_documents(documents: &[Document]) -> Vec<FieldStatistics> {
    field_names(documents)
        .iter()
        .map(|name| analyze_field(&FieldValueSample::from_documents(name, documents)))
        .collect()
}

/// Numeric aggregates; all zero for an empty slice.
pub fn numeric_stats(values: &[f64]) -> NumericFieldStats {
    if values.is_empty() {
        return NumericFieldStats {
            min: 0.0,
            max: 0.0,
            avg: 0.0,
            median: 0.0,
            std_dev: 0.0,
            sum: 0.0,
        };
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    let avg = sum / n;
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / n;

    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    };

    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    NumericFieldStats {
        min,
        max,
        avg: round2(avg),
        // rounding must not push the median outside the observed range
        median: round2(median).clamp(min, max),
        std_dev: round2(variance.sqrt()),
        sum: round2(sum),
    }
}

/// Length stats and the most common values of a string field.
pub fn string_stats(values: &[&str]) -> StringFieldStats {
    if values.is_empty() {
        return StringFieldStats {
            most_common: Vec::new(),
            avg_length: 0,
            min_length: 0,
            max_length: 0,
            empty_count: 0,
        };
    }

    let lengths: Vec<usize> = values.iter().map(|s| s.chars().count()).collect();
    let empty_count = values.iter().filter(|s| s.is_empty()).count();

    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for value in values.iter().copied() {
        *counts.entry(value).or_insert(0) += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    // Stable sort keeps first-encountered order among equal counts.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let most_common = ranked
        .into_iter()
        .take(MOST_COMMON_LIMIT)
        .map(|(value, count)| ValueCount {
            value: truncate_chars(value, MOST_COMMON_MAX_CHARS),
            count,
        })
        .collect();

    let total: usize = lengths.iter().sum();
    StringFieldStats {
        most_common,
        avg_length: round_half_up(total as f64 / lengths.len() as f64) as usize,
        min_length: lengths.iter().copied().min().unwrap_or(0),
        max_length: lengths.iter().copied().max().unwrap_or(0),
        empty_count,
    }
}

pub fn boolean_stats(values: &[bool]) -> BooleanFieldStats {
    let true_count = values.iter().filter(|b| **b).count();
    BooleanFieldStats {
        true_count,
        false_count: values.len() - true_count,
    }
}

/// Element-count stats; non-array values count as length 0.
pub fn array_stats(values: &[&DocValue]) -> ArrayFieldStats {
    if values.is_empty() {
        return ArrayFieldStats {
            avg_length: 0,
            min_length: 0,
            max_length: 0,
        };
    }

    let lengths: Vec<usize> = values
        .iter()
        .map(|v| v.as_array().map_or(0, <[DocValue]>::len))
        .collect();
    let total: usize = lengths.iter().sum();

    ArrayFieldStats {
        avg_length: round_half_up(total as f64 / lengths.len() as f64) as usize,
        min_length: lengths.iter().copied().min().unwrap_or(0),
        max_length: lengths.iter().copied().max().unwrap_or(0),
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &value[..byte_idx]),
        None => value.to_string(),
    }
}
