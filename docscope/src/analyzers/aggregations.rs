//! Small numeric helpers used by the analyzers and by presentation code.
//!
//! Everything here is a pure function over already-fetched figures. Rounding
//! is half-up (`floor(x + 0.5)`), so `-2.5` rounds to `-2` and `2.5` to `3`.

use chrono::{Datelike, Duration, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::analyzers::types::{CollectionInfo, TrendDataPoint};

/// Rounds half-up to the nearest integer.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Rounds half-up to two decimal places.
pub fn round2(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}

/// Growth of `current` over `previous` in whole percent.
///
/// A zero baseline reports 100 when anything appeared and 0 otherwise.
pub fn calculate_growth(current: u64, previous: u64) -> i64 {
    if previous == 0 {
        return if current > 0 { 100 } else { 0 };
    }
    let growth = (current as f64 - previous as f64) / previous as f64 * 100.0;
    round_half_up(growth) as i64
}

/// The `limit` largest collections by document count. Ties keep listing order.
pub fn top_collections(collections: &[CollectionInfo], limit: usize) -> Vec<CollectionInfo> {
    let mut sorted = collections.to_vec();
    // sort_by is stable
    sorted.sort_by(|a, b| b.document_count.cmp(&a.document_count));
    sorted.truncate(limit);
    sorted
}

pub fn total_documents(collections: &[CollectionInfo]) -> u64 {
    collections.iter().map(|c| c.document_count).sum()
}

/// One slice of a document-count distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSlice {
    pub name: String,
    pub value: u64,
    pub percentage: i64,
}

/// Share of each collection in the total document count, in whole percent.
pub fn collection_distribution(collections: &[CollectionInfo]) -> Vec<DistributionSlice> {
    let total = total_documents(collections);
    collections
        .iter()
        .map(|c| DistributionSlice {
            name: c.name.clone(),
            value: c.document_count,
            percentage: if total > 0 {
                round_half_up(c.document_count as f64 / total as f64 * 100.0) as i64
            } else {
                0
            },
        })
        .collect()
}

/// Total count for one week, keyed by the Sunday that starts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyCount {
    pub week: NaiveDate,
    pub count: u64,
}

/// Start of the Sunday-based week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Rolls daily counts up into weekly totals, sorted by week.
pub fn aggregate_to_weekly(daily: &[TrendDataPoint]) -> Vec<WeeklyCount> {
    let mut weeks: IndexMap<NaiveDate, u64> = IndexMap::new();
    for point in daily {
        *weeks.entry(week_start(point.date)).or_insert(0) += point.count;
    }

    let mut rolled: Vec<WeeklyCount> = weeks
        .into_iter()
        .map(|(week, count)| WeeklyCount { week, count })
        .collect();
    rolled.sort_by_key(|w| w.week);
    rolled
}

/// Rounded mean of the daily counts, 0 for an empty series.
pub fn calculate_daily_average(data: &[TrendDataPoint]) -> u64 {
    if data.is_empty() {
        return 0;
    }
    let total: u64 = data.iter().map(|p| p.count).sum();
    round_half_up(total as f64 / data.len() as f64) as u64
}

/// The day with the highest count. On ties the earliest point wins.
pub fn find_peak_day(data: &[TrendDataPoint]) -> Option<&TrendDataPoint> {
    let mut iter = data.iter();
    let first = iter.next()?;
    Some(iter.fold(first, |max, point| {
        if point.count > max.count {
            point
        } else {
            max
        }
    }))
}
