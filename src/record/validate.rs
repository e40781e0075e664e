//! Turns raw records into clean records, dropping rows without usable coordinates.

use std::collections::BTreeMap;
use std::fmt;

use super::{normalize_field, CleanRecord, RawRecord, Schema};

/// Why a raw record did not produce a clean record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rejection {
    MissingLatitude,
    MissingLongitude,
    OutOfBounds,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::MissingLatitude => "missing latitude",
            Rejection::MissingLongitude => "missing longitude",
            Rejection::OutOfBounds => "coordinates out of bounds",
        };
        f.write_str(reason)
    }
}

/// Output of validating a whole input.
#[derive(Debug, Default)]
pub struct Validated {
    pub records: Vec<CleanRecord>,
    pub rejected: BTreeMap<Rejection, usize>,
}

impl Validated {
    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }
}

/// Builds the clean record for one raw record.
pub fn validate_record(raw: &RawRecord, schema: &Schema) -> Result<CleanRecord, Rejection> {
    let fields = schema
        .fields
        .iter()
        .map(|spec| (spec.target, normalize_field(raw.get(spec.source), spec.conversion)))
        .collect();
    let record = CleanRecord::new(fields);

    let latitude = record
        .get(schema.latitude)
        .and_then(|v| v.as_f64())
        .ok_or(Rejection::MissingLatitude)?;
    let longitude = record
        .get(schema.longitude)
        .and_then(|v| v.as_f64())
        .ok_or(Rejection::MissingLongitude)?;

    if let Some(bounds) = &schema.bounds {
        if !bounds.contains(latitude, longitude) {
            return Err(Rejection::OutOfBounds);
        }
    }

    Ok(record)
}

/// Validates every record, keeping input order.
pub fn validate_all(raw: &[RawRecord], schema: &Schema) -> Validated {
    let mut validated = Validated {
        records: Vec::with_capacity(raw.len()),
        ..Default::default()
    };

    for record in raw {
        match validate_record(record, schema) {
            Ok(clean) => validated.records.push(clean),
            Err(reason) => *validated.rejected.entry(reason).or_default() += 1,
        }
    }

    validated
}

// -- Tests -------------------------------------------------------------------
