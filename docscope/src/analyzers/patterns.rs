//! Semantic pattern detection for document fields.
//!
//! On top of the base [`TypeTag`], the detector infers a finer semantic type
//! (email, url, currency, uuid, ...) for each field with a confidence score:
//!
//! 1. String values are matched against [`PATTERN_TABLE`]. The pattern with
//!    the highest match ratio wins if that ratio exceeds the threshold (0.7).
//! 2. The lowercased field name is scanned against [`FIELD_NAME_HINTS`]
//!    (English and French). The first hint found either sets the type with
//!    confidence 0.85 or boosts a matching regex result by 0.1.
//! 3. Numeric fields are classified by [`NUMERIC_NAME_RULES`], which take
//!    precedence over string inference.
//!
//! # Example
//!
//! ```rust
//! use docscope::analyzers::patterns::{PatternDetector, InferredType, SemanticType};
//!
//! let detector = PatternDetector::new();
//! let values = vec!["a@b.com".into(), "c@d.com".into(), "not-an-email".into()];
//! let pattern = detector.detect("email", &values);
//!
//! assert_eq!(pattern.inferred_type, InferredType::Semantic(SemanticType::Email));
//! assert_eq!(pattern.confidence, 0.85);
//! ```

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analyzers::aggregations::round2;
use crate::analyzers::classifier::{classify_value, TypeTag};
use crate::value::{DocValue, Document};

/// Semantic types the detector can infer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SemanticType {
    Email,
    Url,
    Phone,
    Uuid,
    IsoDate,
    Currency,
    Ipv4,
    Ipv6,
    Slug,
    HexColor,
    CreditCard,
    #[serde(rename = "postalCodeFR")]
    PostalCodeFr,
    Percentage,
    Address,
    Coordinate,
    Age,
    Count,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Email => "email",
            SemanticType::Url => "url",
            SemanticType::Phone => "phone",
            SemanticType::Uuid => "uuid",
            SemanticType::IsoDate => "isoDate",
            SemanticType::Currency => "currency",
            SemanticType::Ipv4 => "ipv4",
            SemanticType::Ipv6 => "ipv6",
            SemanticType::Slug => "slug",
            SemanticType::HexColor => "hexColor",
            SemanticType::CreditCard => "creditCard",
            SemanticType::PostalCodeFr => "postalCodeFR",
            SemanticType::Percentage => "percentage",
            SemanticType::Address => "address",
            SemanticType::Coordinate => "coordinate",
            SemanticType::Age => "age",
            SemanticType::Count => "count",
        }
    }
}

/// Result of inference: either the base type unchanged or a semantic type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InferredType {
    Base(TypeTag),
    Semantic(SemanticType),
}

impl InferredType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InferredType::Base(tag) => tag.as_str(),
            InferredType::Semantic(semantic) => semantic.as_str(),
        }
    }
}

impl fmt::Display for InferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named string patterns, in evaluation order. Ties go to the earlier entry.
#[allow(clippy::expect_used)]
pub static PATTERN_TABLE: Lazy<Vec<(SemanticType, Regex)>> = Lazy::new(|| {
    [
        (SemanticType::Email, r"^[^\s@]+@[^\s@]+\.[^\s@]+$"),
        (SemanticType::Url, r"^https?://[^\s]+$"),
        (SemanticType::Phone, r"^[+]?[(]?[0-9]{1,4}[)]?[-\s./0-9]{6,}$"),
        (
            SemanticType::Uuid,
            r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$",
        ),
        (SemanticType::IsoDate, r"^[0-9]{4}-[0-9]{2}-[0-9]{2}(T[0-9]{2}:[0-9]{2}:[0-9]{2})?"),
        (
            SemanticType::Currency,
            r"^[€$£¥]\s*[0-9,]+\.?[0-9]*$|^[0-9,]+\.?[0-9]*\s*[€$£¥]$",
        ),
        (SemanticType::Ipv4, r"^([0-9]{1,3}\.){3}[0-9]{1,3}$"),
        (SemanticType::Ipv6, r"^([0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}$"),
        (SemanticType::Slug, r"^[a-z0-9]+(-[a-z0-9]+)*$"),
        (SemanticType::HexColor, r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$"),
        (SemanticType::CreditCard, r"^[0-9]{4}[- ]?[0-9]{4}[- ]?[0-9]{4}[- ]?[0-9]{4}$"),
        (SemanticType::PostalCodeFr, r"^[0-9]{5}$"),
        (SemanticType::Percentage, r"^[0-9]+(\.[0-9]+)?%$"),
    ]
    .into_iter()
    .map(|(semantic, pattern)| {
        let regex = Regex::new(pattern).expect("Hard-coded regex pattern should be valid");
        (semantic, regex)
    })
    .collect()
});

/// Substring hints on string field names. Only the first hit is used.
pub const FIELD_NAME_HINTS: &[(&str, SemanticType)] = &[
    ("email", SemanticType::Email),
    ("mail", SemanticType::Email),
    ("courriel", SemanticType::Email),
    ("url", SemanticType::Url),
    ("link", SemanticType::Url),
    ("lien", SemanticType::Url),
    ("website", SemanticType::Url),
    ("site", SemanticType::Url),
    ("phone", SemanticType::Phone),
    ("tel", SemanticType::Phone),
    ("telephone", SemanticType::Phone),
    ("mobile", SemanticType::Phone),
    ("price", SemanticType::Currency),
    ("prix", SemanticType::Currency),
    ("amount", SemanticType::Currency),
    ("montant", SemanticType::Currency),
    ("cost", SemanticType::Currency),
    ("cout", SemanticType::Currency),
    ("total", SemanticType::Currency),
    ("percent", SemanticType::Percentage),
    ("ratio", SemanticType::Percentage),
    ("ip", SemanticType::Ipv4),
    ("address", SemanticType::Address),
    ("adresse", SemanticType::Address),
    ("color", SemanticType::HexColor),
    ("couleur", SemanticType::HexColor),
    ("slug", SemanticType::Slug),
    ("uid", SemanticType::Uuid),
    ("uuid", SemanticType::Uuid),
    ("guid", SemanticType::Uuid),
];

/// A field-name rule for numeric fields.
#[derive(Debug, Clone, Copy)]
pub struct NumericNameRule {
    pub needles: &'static [&'static str],
    pub inferred: SemanticType,
    pub confidence: f64,
}

/// Numeric field-name rules in priority order.
pub const NUMERIC_NAME_RULES: &[NumericNameRule] = &[
    NumericNameRule {
        needles: &["price", "prix", "amount", "montant", "cost", "total"],
        inferred: SemanticType::Currency,
        confidence: 0.9,
    },
    NumericNameRule {
        needles: &["percent", "ratio", "rate", "taux"],
        inferred: SemanticType::Percentage,
        confidence: 0.9,
    },
    NumericNameRule {
        needles: &["lat", "lon", "coord"],
        inferred: SemanticType::Coordinate,
        confidence: 0.85,
    },
    NumericNameRule {
        needles: &["age", "year", "annee"],
        inferred: SemanticType::Age,
        confidence: 0.8,
    },
    NumericNameRule {
        needles: &["count", "nombre"],
        inferred: SemanticType::Count,
        confidence: 0.8,
    },
];

/// First name hint contained in the lowercased field name.
pub fn field_name_hint(field_name: &str) -> Option<SemanticType> {
    let lower = field_name.to_lowercase();
    FIELD_NAME_HINTS
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, semantic)| *semantic)
}

/// First numeric rule whose needle is contained in the lowercased field name.
pub fn numeric_name_rule(field_name: &str) -> Option<&'static NumericNameRule> {
    let lower = field_name.to_lowercase();
    NUMERIC_NAME_RULES
        .iter()
        .find(|rule| rule.needles.iter().any(|needle| lower.contains(needle)))
}

/// Tunables of the detector. Defaults reproduce the dashboard's heuristics.
#[derive(Debug, Clone)]
pub struct PatternConfig {
    /// Minimum (exclusive) share of string values a pattern must match (default: 0.7)
    pub match_threshold: f64,
    /// Confidence assigned by a name hint alone (default: 0.85)
    pub hint_confidence: f64,
    /// Boost when the name hint agrees with the regex match (default: 0.1)
    pub hint_boost: f64,
    /// Unique ratio below which a string field is categorical (default: 0.1)
    pub categorical_ratio: f64,
    /// Maximum distinct values of a categorical field (default: 20)
    pub categorical_max_unique: usize,
    /// Number of sample values kept for display (default: 5)
    pub sample_values: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.7,
            hint_confidence: 0.85,
            hint_boost: 0.1,
            categorical_ratio: 0.1,
            categorical_max_unique: 20,
            sample_values: 5,
        }
    }
}

/// Builder for [`PatternDetector`].
pub struct PatternDetectorBuilder {
    config: PatternConfig,
}

impl PatternDetectorBuilder {
    pub fn match_threshold(mut self, threshold: f64) -> Self {
        self.config.match_threshold = threshold;
        self
    }

    pub fn categorical_max_unique(mut self, max_unique: usize) -> Self {
        self.config.categorical_max_unique = max_unique;
        self
    }

    pub fn sample_values(mut self, count: usize) -> Self {
        self.config.sample_values = count;
        self
    }

    pub fn build(self) -> PatternDetector {
        PatternDetector {
            config: self.config,
        }
    }
}

/// Pattern information for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPattern {
    #[serde(rename = "type")]
    pub base_type: TypeTag,
    pub inferred_type: InferredType,
    pub confidence: f64,
    pub sample_values: Vec<DocValue>,
    pub null_count: usize,
    /// Distinct non-null values over non-null values, rounded to 2 decimals.
    pub unique_ratio: f64,
    /// Low-cardinality string field.
    pub is_categorial: bool,
}

/// Pattern analysis of a whole collection sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPatterns {
    pub collection_name: String,
    pub document_count: u64,
    pub fields: IndexMap<String, FieldPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_primary_key: Option<String>,
    pub temporal_fields: Vec<String>,
    pub categorical_fields: Vec<String>,
    pub numeric_fields: Vec<String>,
}

impl CollectionPatterns {
    /// Result for a collection without documents.
    pub fn empty(collection_name: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
            document_count: 0,
            fields: IndexMap::new(),
            suggested_primary_key: None,
            temporal_fields: Vec::new(),
            categorical_fields: Vec::new(),
            numeric_fields: Vec::new(),
        }
    }
}

/// Infers semantic field types from sampled values.
#[derive(Debug, Clone, Default)]
pub struct PatternDetector {
    config: PatternConfig,
}

impl PatternDetector {
    pub fn builder() -> PatternDetectorBuilder {
        PatternDetectorBuilder {
            config: PatternConfig::default(),
        }
    }

    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    /// Detects the pattern of one field from the values present in the sample.
    pub fn detect(&self, field_name: &str, values: &[DocValue]) -> FieldPattern {
        let non_null: Vec<&DocValue> = values.iter().filter(|v| !v.is_null()).collect();
        let strings: Vec<&str> = non_null.iter().filter_map(|v| v.as_str()).collect();
        let unique = non_null
            .iter()
            .map(|v| v.canonical_key())
            .collect::<HashSet<_>>()
            .len();

        let base_type = non_null
            .first()
            .map(|v| classify_value(v))
            .unwrap_or(TypeTag::Unknown);
        let mut inferred_type = InferredType::Base(base_type);
        let mut confidence = 1.0;

        if !strings.is_empty() {
            if let Some((semantic, ratio)) = self.best_string_match(&strings) {
                inferred_type = InferredType::Semantic(semantic);
                confidence = ratio;
            }

            if let Some(hint) = field_name_hint(field_name) {
                if inferred_type == InferredType::Base(base_type) {
                    inferred_type = InferredType::Semantic(hint);
                    confidence = self.config.hint_confidence;
                } else if inferred_type == InferredType::Semantic(hint) {
                    confidence = f64::min(1.0, confidence + self.config.hint_boost);
                }
            }
        }

        if non_null.iter().any(|v| v.as_f64().is_some()) {
            if let Some(rule) = numeric_name_rule(field_name) {
                inferred_type = InferredType::Semantic(rule.inferred);
                confidence = rule.confidence;
            }
        }

        let unique_ratio = if non_null.is_empty() {
            0.0
        } else {
            unique as f64 / non_null.len() as f64
        };
        let is_categorial = base_type == TypeTag::String
            && unique_ratio < self.config.categorical_ratio
            && unique <= self.config.categorical_max_unique;

        debug!(
            field = field_name,
            base_type = %base_type,
            inferred_type = %inferred_type,
            confidence,
            "Detected field pattern"
        );

        FieldPattern {
            base_type,
            inferred_type,
            confidence,
            sample_values: non_null
                .iter()
                .take(self.config.sample_values)
                .map(|v| (*v).clone())
                .collect(),
            null_count: values.len() - non_null.len(),
            unique_ratio: round2(unique_ratio),
            is_categorial,
        }
    }

    /// Pattern with the highest match ratio above the threshold.
    fn best_string_match(&self, strings: &[&str]) -> Option<(SemanticType, f64)> {
        let mut best: Option<(SemanticType, f64)> = None;
        for (semantic, regex) in PATTERN_TABLE.iter() {
            let matches = strings.iter().filter(|s| regex.is_match(s)).count();
            let ratio = matches as f64 / strings.len() as f64;
            let better = best.map_or(true, |(_, best_ratio)| ratio > best_ratio);
            if ratio > self.config.match_threshold && better {
                best = Some((*semantic, ratio));
            }
        }
        best
    }

    /// Analyzes every field of a document sample.
    ///
    /// Only keys present in a document contribute values; explicit nulls are
    /// counted, absent keys are not.
    pub fn analyze_documents(
        &self,
        collection_name: &str,
        document_count: u64,
        documents: &[Document],
    ) -> CollectionPatterns {
        if documents.is_empty() {
            return CollectionPatterns::empty(collection_name);
        }

        let mut patterns = CollectionPatterns {
            document_count,
            ..CollectionPatterns::empty(collection_name)
        };

        for (field_name, values) in group_present_values(documents) {
            let pattern = self.detect(&field_name, &values);

            if pattern.base_type == TypeTag::Timestamp
                || pattern.inferred_type == InferredType::Semantic(SemanticType::IsoDate)
            {
                patterns.temporal_fields.push(field_name.clone());
            }
            if pattern.is_categorial {
                patterns.categorical_fields.push(field_name.clone());
            }
            if pattern.base_type == TypeTag::Number {
                patterns.numeric_fields.push(field_name.clone());
            }
            patterns.fields.insert(field_name, pattern);
        }

        patterns.suggested_primary_key = suggest_primary_key(&patterns.fields);
        patterns
    }
}

/// Values of every field present in the batch, grouped in first-seen field order.
pub fn group_present_values(documents: &[Document]) -> IndexMap<String, Vec<DocValue>> {
    let mut grouped: IndexMap<String, Vec<DocValue>> = IndexMap::new();
    for doc in documents {
        for (key, value) in &doc.data {
            grouped.entry(key.clone()).or_default().push(value.clone());
        }
    }
    grouped
}

/// First fully-unique field that looks like an identifier.
pub fn suggest_primary_key(fields: &IndexMap<String, FieldPattern>) -> Option<String> {
    fields
        .iter()
        .find(|(name, pattern)| {
            let lower = name.to_lowercase();
            pattern.unique_ratio == 1.0
                && (pattern.inferred_type == InferredType::Semantic(SemanticType::Uuid)
                    || lower.contains("id")
                    || lower.contains("key"))
        })
        .map(|(name, _)| name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(values: &[&str]) -> Vec<DocValue> {
        values.iter().map(|s| DocValue::from(*s)).collect()
    }

    fn pattern_for(semantic: SemanticType) -> &'static Regex {
        &PATTERN_TABLE
            .iter()
            .find(|(s, _)| *s == semantic)
            .unwrap()
            .1
    }

    #[test]
    fn test_pattern_table_order_and_size() {
        let names: Vec<&str> = PATTERN_TABLE.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "email", "url", "phone", "uuid", "isoDate", "currency", "ipv4", "ipv6", "slug",
                "hexColor", "creditCard", "postalCodeFR", "percentage"
            ]
        );
    }

    #[test]
    fn test_individual_patterns() {
        assert!(pattern_for(SemanticType::Email).is_match("jane@example.org"));
        assert!(!pattern_for(SemanticType::Email).is_match("jane at example"));
        assert!(pattern_for(SemanticType::Url).is_match("https://example.org/a?b=c"));
        assert!(pattern_for(SemanticType::Phone).is_match("+33 6 12 34 56 78"));
        assert!(pattern_for(SemanticType::Uuid).is_match("550E8400-e29b-41d4-a716-446655440000"));
        assert!(pattern_for(SemanticType::IsoDate).is_match("2024-03-01T10:00:00Z"));
        assert!(pattern_for(SemanticType::Currency).is_match("€ 12,50"));
        assert!(pattern_for(SemanticType::Currency).is_match("1,200.00 $"));
        assert!(pattern_for(SemanticType::Ipv4).is_match("192.168.0.1"));
        assert!(pattern_for(SemanticType::Ipv6).is_match("2001:0db8:85a3:0000:0000:8a2e:0370:7334"));
        assert!(pattern_for(SemanticType::Slug).is_match("hello-world-2"));
        assert!(pattern_for(SemanticType::HexColor).is_match("#fA0"));
        assert!(pattern_for(SemanticType::CreditCard).is_match("4111-1111-1111-1111"));
        assert!(pattern_for(SemanticType::PostalCodeFr).is_match("75011"));
        assert!(pattern_for(SemanticType::Percentage).is_match("12.5%"));
    }

    #[test]
    fn test_email_name_hint_below_threshold() {
        let detector = PatternDetector::new();
        let pattern = detector.detect("email", &strings(&["a@b.com", "c@d.com", "not-an-email"]));
        assert_eq!(pattern.base_type, TypeTag::String);
        assert_eq!(pattern.inferred_type, InferredType::Semantic(SemanticType::Email));
        assert_eq!(pattern.confidence, 0.85);
    }

    #[test]
    fn test_regex_match_boosted_by_agreeing_hint() {
        let detector = PatternDetector::new();
        let values = strings(&["a@b.com", "c@d.com", "e@f.org", "g@h.io", "nope"]);
        let pattern = detector.detect("contactEmail", &values);
        assert_eq!(pattern.inferred_type, InferredType::Semantic(SemanticType::Email));
        assert!((pattern.confidence - 0.9).abs() < 1e-9);

        let unhinted = detector.detect("contact", &values);
        assert!((unhinted.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_disagreeing_hint_leaves_regex_result() {
        let detector = PatternDetector::new();
        let pattern = detector.detect("website", &strings(&["a@b.com", "c@d.com"]));
        assert_eq!(pattern.inferred_type, InferredType::Semantic(SemanticType::Email));
        assert_eq!(pattern.confidence, 1.0);
    }

    #[test]
    fn test_tie_goes_to_earlier_pattern() {
        // Five digit strings match both slug and postalCodeFR.
        let detector = PatternDetector::new();
        let pattern = detector.detect("zip", &strings(&["75011", "69002"]));
        assert_eq!(pattern.inferred_type, InferredType::Semantic(SemanticType::Slug));
    }

    #[test]
    fn test_no_match_keeps_base_type() {
        let detector = PatternDetector::new();
        let pattern = detector.detect("title", &strings(&["Hello World", "Some Title"]));
        assert_eq!(pattern.inferred_type, InferredType::Base(TypeTag::String));
        assert_eq!(pattern.confidence, 1.0);
    }

    #[test]
    fn test_numeric_rules_priority() {
        let detector = PatternDetector::new();
        let numbers = vec![DocValue::from(1.0), DocValue::from(2.0)];

        let cases = [
            ("totalPrice", SemanticType::Currency, 0.9),
            ("tauxConversion", SemanticType::Percentage, 0.9),
            ("latitude", SemanticType::Coordinate, 0.85),
            ("userAge", SemanticType::Age, 0.8),
            ("viewCount", SemanticType::Count, 0.8),
        ];
        for (name, expected, confidence) in cases {
            let pattern = detector.detect(name, &numbers);
            assert_eq!(pattern.inferred_type, InferredType::Semantic(expected), "{name}");
            assert_eq!(pattern.confidence, confidence, "{name}");
        }

        let plain = detector.detect("score", &numbers);
        assert_eq!(plain.inferred_type, InferredType::Base(TypeTag::Number));
    }

    #[test]
    fn test_categorical_detection() {
        let detector = PatternDetector::new();
        let mut values = Vec::new();
        for i in 0..40 {
            values.push(DocValue::from(if i % 2 == 0 { "active" } else { "inactive" }));
        }
        values.push(DocValue::Null);

        let pattern = detector.detect("status", &values);
        assert!(pattern.is_categorial);
        assert_eq!(pattern.null_count, 1);
        assert_eq!(pattern.unique_ratio, 0.05);
        assert_eq!(pattern.sample_values.len(), 5);

        let numbers: Vec<DocValue> = (0..40).map(|i| DocValue::from((i % 2) as f64)).collect();
        assert!(!detector.detect("flag", &numbers).is_categorial);
    }

    #[test]
    fn test_empty_values() {
        let pattern = PatternDetector::new().detect("anything", &[DocValue::Null]);
        assert_eq!(pattern.base_type, TypeTag::Unknown);
        assert_eq!(pattern.unique_ratio, 0.0);
        assert_eq!(pattern.null_count, 1);
        assert!(pattern.sample_values.is_empty());
    }

    #[test]
    fn test_analyze_documents_derives_field_lists() {
        let docs = vec![
            Document::from_json(
                "1",
                json!({"userId": "u1", "status": "open", "amount": 10, "createdAt": {"_seconds": 1, "_nanoseconds": 0}}),
            ),
            Document::from_json(
                "2",
                json!({"userId": "u2", "status": "open", "amount": 12, "day": "2024-01-02"}),
            ),
        ];
        let patterns = PatternDetector::new().analyze_documents("orders", 2, &docs);

        assert_eq!(patterns.document_count, 2);
        let fields: Vec<&str> = patterns.fields.keys().map(String::as_str).collect();
        assert_eq!(fields, vec!["userId", "status", "amount", "createdAt", "day"]);
        assert_eq!(patterns.temporal_fields, vec!["createdAt", "day"]);
        assert_eq!(patterns.numeric_fields, vec!["amount"]);
        assert_eq!(patterns.suggested_primary_key.as_deref(), Some("userId"));
        assert_eq!(patterns.fields["createdAt"].null_count, 0);
    }

    #[test]
    fn test_serialized_shape() {
        let pattern = PatternDetector::new().detect("zip", &strings(&["75011"]));
        let json = serde_json::to_value(&pattern).unwrap();
        assert_eq!(json["type"], "string");
        assert_eq!(json["inferredType"], "slug");
        assert_eq!(json["isCategorial"], false);

        let back: FieldPattern = serde_json::from_value(json).unwrap();
        assert_eq!(back.inferred_type, InferredType::Semantic(SemanticType::Slug));
        assert_eq!(back.base_type, TypeTag::String);
    }
}
