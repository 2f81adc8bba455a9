//! Decoded document values.
//!
//! Documents in a schemaless store can hold arbitrarily nested data. Rather
//! than inspecting shapes at runtime everywhere, every value is decoded once
//! into the closed [`DocValue`] enum. JSON objects are kept as [`DocValue::Map`]
//! and the type classifier recognises well-known shapes (timestamps,
//! geopoints, references) from their keys.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// Insertion-ordered field map of a document or nested map value.
pub type FieldMap = IndexMap<String, DocValue>;

/// A single decoded value from a document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    GeoPoint { latitude: f64, longitude: f64 },
    Reference { path: String, id: String },
    Array(Vec<DocValue>),
    Map(FieldMap),
}

impl DocValue {
    /// Creates a reference value from a document path such as `users/alice`.
    pub fn reference(path: impl Into<String>) -> Self {
        let path = path.into();
        let id = path.rsplit('/').next().unwrap_or_default().to_string();
        Self::Reference { path, id }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[DocValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Converts the value to a point in time when it is a native timestamp or
    /// a serialized one (`{_seconds, _nanoseconds}` or `{seconds, nanoseconds}`).
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            Self::Map(map) => {
                let (secs, nanos) = match (map.get("_seconds"), map.get("_nanoseconds")) {
                    (Some(s), Some(n)) => (s, n),
                    _ => (map.get("seconds")?, map.get("nanoseconds")?),
                };
                let secs = secs.as_f64()?;
                let nanos = nanos.as_f64()?;
                if !secs.is_finite() || !nanos.is_finite() || nanos < 0.0 {
                    return None;
                }
                Utc.timestamp_opt(secs as i64, nanos as u32).single()
            }
            _ => None,
        }
    }

    /// True for native geopoints and maps carrying both `latitude` and `longitude`.
    pub fn is_geopoint(&self) -> bool {
        match self {
            Self::GeoPoint { .. } => true,
            Self::Map(map) => map.contains_key("latitude") && map.contains_key("longitude"),
            _ => false,
        }
    }

    /// Returns the document path for native references and maps exposing
    /// both `path` and `id`.
    pub fn reference_path(&self) -> Option<&str> {
        match self {
            Self::Reference { path, .. } => Some(path),
            Self::Map(map) if map.contains_key("path") && map.contains_key("id") => {
                map.get("path").and_then(DocValue::as_str)
            }
            _ => None,
        }
    }

    /// True for arrays, maps and the structured store types.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::Array(_)
                | Self::Map(_)
                | Self::Timestamp(_)
                | Self::GeoPoint { .. }
                | Self::Reference { .. }
        )
    }

    /// Canonical string used to compare values for distinctness.
    ///
    /// Primitives compare by their display form, composite values by their
    /// JSON serialization, so two maps with equal content are one value.
    pub fn canonical_key(&self) -> String {
        if self.is_composite() {
            self.to_json().to_string()
        } else {
            self.display_string()
        }
    }

    /// Plain string form of a value (`1` for `1.0`, `true`, the string itself).
    pub fn display_string(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::String(s) => s.clone(),
            Self::Bytes(bytes) => BASE64.encode(bytes),
            Self::Timestamp(ts) => ts.to_rfc3339(),
            Self::GeoPoint { .. } | Self::Reference { .. } | Self::Array(_) | Self::Map(_) => {
                self.to_json().to_string()
            }
        }
    }

    /// Converts to a JSON value. Structured store types use the shapes the
    /// classifier recognises, so a JSON round trip keeps their type tag.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => number_to_json(*n),
            Self::String(s) => Value::String(s.clone()),
            Self::Bytes(bytes) => Value::String(BASE64.encode(bytes)),
            Self::Timestamp(ts) => serde_json::json!({
                "_seconds": ts.timestamp(),
                "_nanoseconds": ts.timestamp_subsec_nanos(),
            }),
            Self::GeoPoint {
                latitude,
                longitude,
            } => serde_json::json!({
                "latitude": number_to_json(*latitude),
                "longitude": number_to_json(*longitude),
            }),
            Self::Reference { path, id } => serde_json::json!({ "path": path, "id": id }),
            Self::Array(items) => Value::Array(items.iter().map(DocValue::to_json).collect()),
            Self::Map(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

fn number_to_json(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Formats a number the way a dashboard shows it: integral values without a
/// fractional part.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        format!("{n}")
    }
}

impl From<Value> for DocValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(DocValue::from).collect()),
            Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(key, value)| (key, DocValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for DocValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DocValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for DocValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for DocValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for DocValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for DocValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl Serialize for DocValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DocValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Value::deserialize(deserializer).map(DocValue::from)
    }
}

/// A document returned by the store: its id and its top-level fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: FieldMap,
}

impl Document {
    pub fn new(id: impl Into<String>, data: FieldMap) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Builds a document from a JSON object. Non-object JSON yields an empty document.
    pub fn from_json(id: impl Into<String>, value: Value) -> Self {
        let data = match DocValue::from(value) {
            DocValue::Map(map) => map,
            _ => FieldMap::new(),
        };
        Self::new(id, data)
    }

    pub fn get(&self, field: &str) -> Option<&DocValue> {
        self.data.get(field)
    }
}
