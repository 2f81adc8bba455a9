//! Base type classification for decoded document values.
//!
//! [`classify`] maps any value (or its absence) to one [`TypeTag`]. The rules
//! are checked in a fixed order and the first match wins:
//!
//! 1. absent → `undefined`, null → `null`
//! 2. arrays → `array`
//! 3. native timestamps → `timestamp`
//! 4. maps convertible to a date (`_seconds`/`_nanoseconds`) → `timestamp`
//! 5. geopoints, or maps with `latitude` and `longitude` → `geopoint`
//! 6. references, or maps with `path` and `id` → `reference`
//! 7. any other map → `map`
//! 8. primitives → `string`, `number`, `boolean`; bytes → `unknown`

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::DocValue;

/// Base type of a document value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Null,
    Undefined,
    Array,
    Timestamp,
    GeoPoint,
    Reference,
    Map,
    String,
    Number,
    Boolean,
    Unknown,
}

impl TypeTag {
    /// Wire name of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Null => "null",
            TypeTag::Undefined => "undefined",
            TypeTag::Array => "array",
            TypeTag::Timestamp => "timestamp",
            TypeTag::GeoPoint => "geopoint",
            TypeTag::Reference => "reference",
            TypeTag::Map => "map",
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Boolean => "boolean",
            TypeTag::Unknown => "unknown",
        }
    }

    /// True for the two "no value" tags.
    pub fn is_missing(&self) -> bool {
        matches!(self, TypeTag::Null | TypeTag::Undefined)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a value; `None` stands for a field absent from the document.
pub fn classify(value: Option<&DocValue>) -> TypeTag {
    let Some(value) = value else {
        return TypeTag::Undefined;
    };

    match value {
        DocValue::Null => TypeTag::Null,
        DocValue::Array(_) => TypeTag::Array,
        DocValue::Timestamp(_) => TypeTag::Timestamp,
        DocValue::GeoPoint { .. } => TypeTag::GeoPoint,
        DocValue::Reference { .. } => TypeTag::Reference,
        DocValue::Map(_) => {
            if value.as_timestamp().is_some() {
                TypeTag::Timestamp
            } else if value.is_geopoint() {
                TypeTag::GeoPoint
            } else if value.reference_path().is_some() {
                TypeTag::Reference
            } else {
                TypeTag::Map
            }
        }
        DocValue::String(_) => TypeTag::String,
        DocValue::Number(_) => TypeTag::Number,
        DocValue::Bool(_) => TypeTag::Boolean,
        DocValue::Bytes(_) => TypeTag::Unknown,
    }
}

/// Classifies a present value.
pub fn classify_value(value: &DocValue) -> TypeTag {
    classify(Some(value))
}
