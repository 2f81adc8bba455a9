//! Display strings and report formatting.
//!
//! The first half of this module holds small presentation helpers (value
//! previews, French labels, colour classes, number formatting) that a
//! dashboard applies to analysis results. The second half formats a whole
//! [`FieldAnalysis`] as JSON or as a console report.
//!
//! # Examples
//!
//! ```rust
//! use docscope::formatters::{format_bytes, format_field_value, format_number_fr};
//! use docscope::value::DocValue;
//!
//! assert_eq!(format_field_value(None, 50), "N/A");
//! assert_eq!(format_number_fr(1234567.0), "1\u{202F}234\u{202F}567");
//! assert_eq!(format_bytes(1536), "1.5 KB");
//! ```

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt::Write;

use crate::analyzers::classifier::TypeTag;
use crate::analyzers::patterns::{InferredType, SemanticType};
use crate::analyzers::relationships::RelationshipType;
use crate::core::FieldAnalysis;
use crate::error::{DocScopeError, Result};
use crate::value::{format_number, DocValue, FieldMap};

/// Group separator used by French number formatting (narrow no-break space).
const FR_GROUP_SEPARATOR: char = '\u{202F}';

/// Chart palette cycled through by [`collection_color`].
pub const COLLECTION_COLORS: [&str; 10] = [
    "#f59e0b", "#3b82f6", "#10b981", "#8b5cf6", "#ec4899", "#f97316", "#06b6d4", "#84cc16",
    "#6366f1", "#14b8a6",
];

const DEFAULT_TYPE_COLOR: &str = "text-zinc-600 dark:text-zinc-400";

const FR_MONTHS_SHORT: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

const FR_MONTHS_LONG: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Short preview of a value for table cells. `None` is an absent field.
pub fn format_field_value(value: Option<&DocValue>, max_length: usize) -> String {
    let Some(value) = value else {
        return "N/A".to_string();
    };

    if let Some(ts) = value.as_timestamp() {
        return ts.to_rfc3339_opts(SecondsFormat::Millis, true);
    }

    match value {
        DocValue::Null => "N/A".to_string(),
        DocValue::Array(items) => format!("[{} items]", items.len()),
        DocValue::GeoPoint {
            latitude,
            longitude,
        } => format!("({}, {})", format_number(*latitude), format_number(*longitude)),
        DocValue::Reference { path, .. } => format!("ref: {path}"),
        DocValue::Map(map) => {
            let coordinate = |key: &str| map.get(key).and_then(DocValue::as_f64);
            if let (Some(lat), Some(lon)) = (coordinate("latitude"), coordinate("longitude")) {
                format!("({}, {})", format_number(lat), format_number(lon))
            } else if let Some(path) = map.get("path").and_then(DocValue::as_str) {
                format!("ref: {path}")
            } else {
                "{...}".to_string()
            }
        }
        DocValue::Bytes(_) => "{...}".to_string(),
        DocValue::Bool(_) | DocValue::Number(_) | DocValue::String(_) | DocValue::Timestamp(_) => {
            let text = value.display_string();
            if text.chars().count() > max_length {
                let truncated: String = text.chars().take(max_length).collect();
                format!("{truncated}...")
            } else {
                text
            }
        }
    }
}

/// French label of a base type.
pub fn type_label(tag: TypeTag) -> &'static str {
    match tag {
        TypeTag::String => "Texte",
        TypeTag::Number => "Nombre",
        TypeTag::Boolean => "Booléen",
        TypeTag::Timestamp => "Date/Heure",
        TypeTag::Array => "Tableau",
        TypeTag::Map => "Objet",
        TypeTag::Reference => "Référence",
        TypeTag::GeoPoint => "Point géo",
        TypeTag::Unknown => "Inconnu",
        TypeTag::Null => "null",
        TypeTag::Undefined => "undefined",
    }
}

/// French label of a semantic type.
pub fn semantic_label(semantic: SemanticType) -> &'static str {
    match semantic {
        SemanticType::Email => "Email",
        SemanticType::Url => "URL",
        SemanticType::Phone => "Téléphone",
        SemanticType::Uuid => "UUID",
        SemanticType::IsoDate => "Date ISO",
        SemanticType::Currency => "Devise",
        SemanticType::Ipv4 => "Adresse IPv4",
        SemanticType::Ipv6 => "Adresse IPv6",
        SemanticType::Slug => "Slug",
        SemanticType::HexColor => "Couleur Hex",
        SemanticType::CreditCard => "Carte bancaire",
        SemanticType::PostalCodeFr => "Code postal",
        SemanticType::Percentage => "Pourcentage",
        SemanticType::Address => "Adresse",
        SemanticType::Coordinate => "Coordonnée",
        SemanticType::Age => "Âge",
        SemanticType::Count => "Compteur",
    }
}

pub fn inferred_type_label(inferred: InferredType) -> &'static str {
    match inferred {
        InferredType::Base(tag) => type_label(tag),
        InferredType::Semantic(semantic) => semantic_label(semantic),
    }
}

/// Text colour class for an inferred type badge.
pub fn inferred_type_color(inferred: InferredType) -> &'static str {
    let InferredType::Semantic(semantic) = inferred else {
        return DEFAULT_TYPE_COLOR;
    };
    match semantic {
        SemanticType::Email => "text-blue-600 dark:text-blue-400",
        SemanticType::Url => "text-cyan-600 dark:text-cyan-400",
        SemanticType::Phone => "text-emerald-600 dark:text-emerald-400",
        SemanticType::Uuid => "text-purple-600 dark:text-purple-400",
        SemanticType::IsoDate => "text-amber-600 dark:text-amber-400",
        SemanticType::Currency => "text-green-600 dark:text-green-400",
        SemanticType::Ipv4 => "text-orange-600 dark:text-orange-400",
        SemanticType::Percentage => "text-pink-600 dark:text-pink-400",
        SemanticType::Coordinate => "text-teal-600 dark:text-teal-400",
        _ => DEFAULT_TYPE_COLOR,
    }
}

pub fn relationship_type_label(relationship_type: RelationshipType) -> &'static str {
    match relationship_type {
        RelationshipType::Reference => "Référence Firestore",
        RelationshipType::ForeignKey => "Clé étrangère",
        RelationshipType::Embedded => "Intégré",
    }
}

pub fn collection_color(index: usize) -> &'static str {
    COLLECTION_COLORS[index % COLLECTION_COLORS.len()]
}

/// Collection name without its leading reserved underscore.
pub fn sanitize_collection_name(name: &str) -> &str {
    name.strip_prefix('_').unwrap_or(name)
}

pub fn is_system_collection(name: &str) -> bool {
    name.starts_with('_')
}

/// Size in bytes of the UTF-8 JSON serialization of a document.
pub fn estimate_document_size(data: &FieldMap) -> usize {
    DocValue::Map(data.clone()).to_json().to_string().len()
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(FR_GROUP_SEPARATOR);
        }
        grouped.push(c);
    }
    grouped
}

/// French decimal formatting with at most `max_fraction` fraction digits.
fn format_decimal_fr(value: f64, max_fraction: usize) -> String {
    let fixed = format!("{:.*}", max_fraction, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if value < 0.0 && (int_part.chars().any(|c| c != '0') || !frac_part.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push(',');
        out.push_str(frac_part);
    }
    out
}

/// Number with French grouping (`1 234 567,5`), at most three fraction digits.
pub fn format_number_fr(value: f64) -> String {
    format_decimal_fr(value, 3)
}

/// Compact French notation: `950`, `1,2 k`, `12 k`, `3,4 M`, `2 Md`.
pub fn format_compact_number(value: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(1e12, "Bn"), (1e9, "Md"), (1e6, "M"), (1e3, "k")];

    for (size, unit) in UNITS {
        if value.abs() >= size {
            let scaled = value / size;
            let digits = if scaled.abs() < 10.0 { 1 } else { 0 };
            return format!("{}{FR_GROUP_SEPARATOR}{unit}", format_decimal_fr(scaled, digits));
        }
    }
    format_decimal_fr(value, 0)
}

/// Percentage in French notation, `value` given in percent (`12.5` → `+12,5 %`).
pub fn format_percentage(value: f64, include_sign: bool) -> String {
    let formatted = format!("{}{FR_GROUP_SEPARATOR}%", format_decimal_fr(value, 1));
    if include_sign && value > 0.0 {
        format!("+{formatted}")
    } else {
        formatted
    }
}

/// Human readable byte size (`0 B`, `1.5 KB`, `3 MB`).
pub fn format_bytes(bytes: u64) -> String {
    const SIZES: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut exponent = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && exponent < SIZES.len() - 1 {
        scaled /= 1024.0;
        exponent += 1;
    }
    let rounded = (scaled * 10.0).round() / 10.0;
    format!("{} {}", format_number(rounded), SIZES[exponent])
}

/// Relative time in French (`à l'instant`, `il y a 5 min`, `il y a 3h`, `il y a 2j`),
/// falling back to a short date after a week.
pub fn format_relative_time(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - date).num_seconds();
    if seconds < 60 {
        return "à l'instant".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("il y a {minutes} min");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("il y a {hours}h");
    }
    let days = hours / 24;
    if days < 7 {
        return format!("il y a {days}j");
    }
    format_short_date(date)
}

/// Day and abbreviated month (`15 janv.`).
pub fn format_short_date(date: DateTime<Utc>) -> String {
    format!("{} {}", date.day(), FR_MONTHS_SHORT[date.month0() as usize])
}

/// Day, month and year (`15 janvier 2024`).
pub fn format_full_date(date: DateTime<Utc>) -> String {
    format!(
        "{} {} {}",
        date.day(),
        FR_MONTHS_LONG[date.month0() as usize],
        date.year()
    )
}

/// Options shared by the report formatters.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Include the sample values of each field
    pub include_samples: bool,
    /// Maximum number of fields to display (None for all)
    pub max_fields: Option<usize>,
    /// Whether to use colorized output (for human formatter)
    pub use_colors: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_samples: true,
            max_fields: None,
            use_colors: true,
        }
    }
}

impl FormatterConfig {
    /// Summary only, no colours.
    pub fn minimal() -> Self {
        Self {
            include_samples: false,
            max_fields: Some(20),
            use_colors: false,
        }
    }

    pub fn with_samples(mut self, include: bool) -> Self {
        self.include_samples = include;
        self
    }

    pub fn with_max_fields(mut self, max: usize) -> Self {
        self.max_fields = Some(max);
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }
}

/// Turns a field analysis into text.
pub trait ReportFormatter {
    fn format(&self, analysis: &FieldAnalysis) -> Result<String>;
}

/// Serializes results as JSON.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Serializes any analysis result.
    pub fn format_value<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        json.map_err(|e| DocScopeError::Serialization(format!("Failed to serialize result to JSON: {e}")))
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, analysis: &FieldAnalysis) -> Result<String> {
        self.format_value(analysis)
    }
}

/// Console report with one line per field.
#[derive(Debug, Clone, Default)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }

    fn write_report(&self, analysis: &FieldAnalysis, output: &mut String) -> std::fmt::Result {
        let patterns = &analysis.patterns;
        let (bold, reset) = if self.config.use_colors {
            ("\x1b[1m", "\x1b[0m")
        } else {
            ("", "")
        };

        writeln!(
            output,
            "{bold}Collection: {}{reset} ({} documents, {} fields)",
            analysis.collection_name,
            format_number_fr(patterns.document_count as f64),
            analysis.field_stats.len()
        )?;
        if let Some(key) = &patterns.suggested_primary_key {
            writeln!(output, "Suggested primary key: {key}")?;
        }
        if !patterns.temporal_fields.is_empty() {
            writeln!(output, "Temporal fields: {}", patterns.temporal_fields.join(", "))?;
        }
        if !patterns.categorical_fields.is_empty() {
            writeln!(
                output,
                "Categorical fields: {}",
                patterns.categorical_fields.join(", ")
            )?;
        }
        writeln!(output)?;

        let limit = self.config.max_fields.unwrap_or(usize::MAX);
        for stats in analysis.field_stats.iter().take(limit) {
            let inferred = patterns
                .fields
                .get(&stats.field_name)
                .map(|p| {
                    format!(
                        "{} ({})",
                        inferred_type_label(p.inferred_type),
                        format_percentage(p.confidence * 100.0, false)
                    )
                })
                .unwrap_or_else(|| type_label(stats.field_type).to_string());

            writeln!(
                output,
                "  {:<24} {:<10} {:<28} fill {:>3}%  unique {}",
                stats.field_name,
                stats.field_type.as_str(),
                inferred,
                stats.fill_rate,
                stats.unique_count
            )?;

            if self.config.include_samples {
                if let Some(pattern) = patterns.fields.get(&stats.field_name) {
                    let samples: Vec<String> = pattern
                        .sample_values
                        .iter()
                        .map(|v| format_field_value(Some(v), 30))
                        .collect();
                    if !samples.is_empty() {
                        writeln!(output, "      e.g. {}", samples.join(" | "))?;
                    }
                }
            }
        }

        if analysis.field_stats.len() > limit {
            writeln!(
                output,
                "  ... and {} more fields",
                analysis.field_stats.len() - limit
            )?;
        }
        Ok(())
    }
}

impl ReportFormatter for HumanFormatter {
    fn format(&self, analysis: &FieldAnalysis) -> Result<String> {
        let mut output = String::new();
        self.write_report(analysis, &mut output)
            .map_err(|e| DocScopeError::Internal(format!("Failed to write report: {e}")))?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::field_stats::analyze_documents;
    use crate::analyzers::patterns::PatternDetector;
    use crate::value::Document;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_format_field_value() {
        assert_eq!(format_field_value(None, 50), "N/A");
        assert_eq!(format_field_value(Some(&DocValue::Null), 50), "N/A");
        assert_eq!(
            format_field_value(Some(&DocValue::from(json!([1, 2, 3]))), 50),
            "[3 items]"
        );
        assert_eq!(
            format_field_value(Some(&DocValue::from(json!({"_seconds": 0, "_nanoseconds": 0}))), 50),
            "1970-01-01T00:00:00.000Z"
        );
        assert_eq!(
            format_field_value(Some(&DocValue::from(json!({"latitude": 48.85, "longitude": 2}))), 50),
            "(48.85, 2)"
        );
        assert_eq!(
            format_field_value(Some(&DocValue::reference("users/u1")), 50),
            "ref: users/u1"
        );
        assert_eq!(format_field_value(Some(&DocValue::from(json!({"a": 1}))), 50), "{...}");
        assert_eq!(format_field_value(Some(&DocValue::from("abcdef")), 3), "abc...");
        assert_eq!(format_field_value(Some(&DocValue::from(3.0)), 50), "3");
    }

    #[test]
    fn test_labels_and_colors() {
        assert_eq!(
            inferred_type_label(InferredType::Semantic(SemanticType::PostalCodeFr)),
            "Code postal"
        );
        assert_eq!(inferred_type_label(InferredType::Base(TypeTag::GeoPoint)), "Point géo");
        assert_eq!(
            inferred_type_color(InferredType::Semantic(SemanticType::Email)),
            "text-blue-600 dark:text-blue-400"
        );
        assert_eq!(
            inferred_type_color(InferredType::Semantic(SemanticType::Slug)),
            DEFAULT_TYPE_COLOR
        );
        assert_eq!(relationship_type_label(RelationshipType::ForeignKey), "Clé étrangère");
        assert_eq!(collection_color(11), "#3b82f6");
    }

    #[test]
    fn test_collection_names() {
        assert_eq!(sanitize_collection_name("_meta"), "meta");
        assert_eq!(sanitize_collection_name("users"), "users");
        assert!(is_system_collection("__stats"));
        assert!(!is_system_collection("users"));
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_number_fr(0.0), "0");
        assert_eq!(format_number_fr(999.0), "999");
        assert_eq!(format_number_fr(1234.5), "1\u{202F}234,5");
        assert_eq!(format_number_fr(-1234567.0), "-1\u{202F}234\u{202F}567");
        assert_eq!(format_compact_number(950.0), "950");
        assert_eq!(format_compact_number(1234.0), "1,2\u{202F}k");
        assert_eq!(format_compact_number(12345.0), "12\u{202F}k");
        assert_eq!(format_compact_number(3_400_000.0), "3,4\u{202F}M");
        assert_eq!(format_percentage(12.5, true), "+12,5\u{202F}%");
        assert_eq!(format_percentage(-3.0, true), "-3\u{202F}%");
        assert_eq!(format_percentage(0.0, true), "0\u{202F}%");
    }

    #[test]
    fn test_bytes_and_sizes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5 MB");

        let doc = Document::from_json("d", json!({"name": "é"}));
        assert_eq!(estimate_document_size(&doc.data), r#"{"name":"é"}"#.len());
    }

    #[test]
    fn test_dates() {
        let now = Utc.with_ymd_and_hms(2024, 1, 20, 12, 0, 0).unwrap();
        assert_eq!(format_relative_time(now, now), "à l'instant");
        assert_eq!(
            format_relative_time(now - chrono::Duration::minutes(5), now),
            "il y a 5 min"
        );
        assert_eq!(format_relative_time(now - chrono::Duration::hours(3), now), "il y a 3h");
        assert_eq!(format_relative_time(now - chrono::Duration::days(2), now), "il y a 2j");

        let date = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        assert_eq!(format_short_date(date), "15 janv.");
        assert_eq!(format_full_date(date), "15 janvier 2024");
        assert_eq!(
            format_relative_time(date - chrono::Duration::days(10), now),
            "5 janv."
        );
    }

    fn analysis() -> FieldAnalysis {
        let docs = vec![
            Document::from_json("1", json!({"id": "a", "email": "a@b.com"})),
            Document::from_json("2", json!({"id": "b", "email": "c@d.com"})),
        ];
        FieldAnalysis {
            collection_name: "users".to_string(),
            field_stats: analyze_documents(&docs),
            patterns: PatternDetector::new().analyze_documents("users", 2, &docs),
        }
    }

    #[test]
    fn test_json_formatter() {
        let output = JsonFormatter::new().with_pretty(false).format(&analysis()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["collectionName"], "users");
        assert_eq!(parsed["patterns"]["suggestedPrimaryKey"], "id");
    }

    #[test]
    fn test_human_formatter() {
        let formatter = HumanFormatter::with_config(FormatterConfig::minimal().with_max_fields(1));
        let output = formatter.format(&analysis()).unwrap();

        assert!(output.contains("Collection: users (2 documents, 2 fields)"));
        assert!(output.contains("Suggested primary key: id"));
        assert!(output.contains("... and 1 more fields"));
        assert!(!output.contains("\x1b["));
    }
}
