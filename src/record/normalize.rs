//! Field normalization. Every conversion failure degrades to [`FieldValue::Null`].

use serde_json::Value;

use super::{date::normalize_date, FieldValue};

/// Target type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Text,
    Float,
    Int,
    Date,
}

/// Values treated as missing once rendered to a lowercase string.
const MISSING_MARKERS: [&str; 3] = ["", "nan", "none"];

/// Converts a raw value to the requested type, or `Null` if it is missing or unconvertible.
pub fn normalize_field(value: Option<&Value>, conversion: Conversion) -> FieldValue {
    let Some(value) = value.filter(|v| !is_missing(v)) else {
        return FieldValue::Null;
    };

    let converted = match conversion {
        Conversion::Text => Some(FieldValue::Text(render(value))),
        Conversion::Float => to_float(value).map(FieldValue::Float),
        Conversion::Int => to_int(value).map(FieldValue::Int),
        Conversion::Date => normalize_date(&render(value)).map(FieldValue::Date),
    };

    converted.unwrap_or(FieldValue::Null)
}

/// True for absent values and the textual markers upstream uses for them.
pub fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => is_missing_str(s),
        _ => false,
    }
}

pub(crate) fn is_missing_str(s: &str) -> bool {
    let lower = s.to_lowercase();
    MISSING_MARKERS.contains(&lower.as_str())
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn to_float(value: &Value) -> Option<f64> {
    let f = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    f.is_finite().then_some(f)
}

fn to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

// -- Tests -------------------------------------------------------------------
