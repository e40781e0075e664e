//! Raw and clean records, and the conversions between them.

pub mod date;
pub mod normalize;
pub mod schema;
pub mod validate;

use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::{Map, Value};

pub use normalize::{normalize_field, Conversion};
pub use schema::{FieldSpec, Schema};
pub use validate::validate_all;

/// One row of upstream data, keyed by source column name.
pub type RawRecord = Map<String, Value>;

/// A normalized field value. `Null` stands in for anything missing or unconvertible.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Float(f64),
    Int(i64),
    Date(String),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::Date(s) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_none(),
            FieldValue::Text(s) | FieldValue::Date(s) => serializer.serialize_str(s),
            FieldValue::Float(v) => serializer.serialize_f64(*v),
            FieldValue::Int(v) => serializer.serialize_i64(*v),
        }
    }
}

/// A validated, typed row. Fields keep the order of the schema that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    fields: Vec<(&'static str, FieldValue)>,
}

impl CleanRecord {
    pub(crate) fn new(fields: Vec<(&'static str, FieldValue)>) -> Self {
        CleanRecord { fields }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> &[(&'static str, FieldValue)] {
        &self.fields
    }
}

impl Serialize for CleanRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// -- Tests -------------------------------------------------------------------
