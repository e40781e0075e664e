//! Declared mappings from source columns to clean record fields.

use std::collections::BTreeSet;

use tracing::warn;

use super::{Conversion, RawRecord};
use crate::error::SchemaError;

/// Maps one source column onto one target field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub target: &'static str,
    pub source: &'static str,
    pub conversion: Conversion,
    pub required: bool,
}

impl FieldSpec {
    pub const fn new(target: &'static str, source: &'static str, conversion: Conversion) -> Self {
        FieldSpec {
            target,
            source,
            conversion,
            required: false,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Inclusive coordinate bounds a record must fall inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl Bounds {
    pub const WORLD: Bounds = Bounds {
        min_latitude: -90.0,
        max_latitude: 90.0,
        min_longitude: -180.0,
        max_longitude: 180.0,
    };

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&latitude)
            && (self.min_longitude..=self.max_longitude).contains(&longitude)
    }
}

/// The full set of fields of one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
    pub latitude: &'static str,
    pub longitude: &'static str,
    pub bounds: Option<Bounds>,
}

impl Schema {
    /// GBIF occurrence search results.
    pub fn gbif_occurrence() -> Self {
        use Conversion::*;

        Schema {
            name: "gbif occurrence",
            fields: vec![
                FieldSpec::new("scientific_name", "scientificName", Text),
                FieldSpec::new("species", "species", Text),
                FieldSpec::new("genus", "genus", Text),
                FieldSpec::new("family", "family", Text),
                FieldSpec::new("order", "order", Text),
                FieldSpec::new("decimal_latitude", "decimalLatitude", Float).required(),
                FieldSpec::new("decimal_longitude", "decimalLongitude", Float).required(),
                FieldSpec::new("year", "year", Int),
                FieldSpec::new("month", "month", Int),
                FieldSpec::new("day", "day", Int),
                FieldSpec::new("event_date", "eventDate", Date),
            ],
            latitude: "decimal_latitude",
            longitude: "decimal_longitude",
            bounds: None,
        }
    }

    /// HAEDAT harmful algal event spreadsheet export. Column names are kept as-is.
    pub fn haedat_event() -> Self {
        use Conversion::*;

        let text = |name| FieldSpec::new(name, name, Text);

        Schema {
            name: "haedat event",
            fields: vec![
                text("eventName"),
                FieldSpec::new("eventYear", "eventYear", Int),
                FieldSpec::new("eventDate", "eventDate", Date),
                FieldSpec::new("latitude", "latitude", Float).required(),
                FieldSpec::new("longitude", "longitude", Float).required(),
                text("countryName"),
                text("region"),
                text("locationText"),
                text("causativeSpeciesName0"),
                FieldSpec::new("cellsPerLitre0", "cellsPerLitre0", Float),
                text("waterDiscoloration"),
                text("highPhyto"),
                text("seafoodToxin"),
                text("massMortal"),
                text("toxicityDetected"),
                text("toxinType"),
                text("toxin"),
                text("humansAffected"),
                text("fishAffected"),
                text("shellfishAffected"),
                text("birdsAffected"),
                text("syndromeName"),
                text("effectsComments"),
            ],
            latitude: "latitude",
            longitude: "longitude",
            bounds: Some(Bounds::WORLD),
        }
    }

    /// Checks the schema against the columns present in the input.
    ///
    /// Missing required columns are an error. Missing optional columns are
    /// logged and returned; their fields will be null in every record.
    pub fn check_columns<'a, I>(&self, columns: I) -> Result<Vec<&'static str>, SchemaError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let present: BTreeSet<&str> = columns.into_iter().collect();
        let mut missing_optional = Vec::new();

        for field in &self.fields {
            if present.contains(field.source) {
                continue;
            }
            if field.required {
                return Err(SchemaError::MissingColumn {
                    column: field.source.to_string(),
                });
            }
            missing_optional.push(field.source);
        }

        if !missing_optional.is_empty() {
            warn!(
                schema = self.name,
                columns = ?missing_optional,
                "optional columns missing from input, fields will be null"
            );
        }

        Ok(missing_optional)
    }

    /// Checks the column set of a whole input. Empty input has no columns to check.
    pub fn check_input(&self, raw: &[RawRecord]) -> Result<(), SchemaError> {
        if raw.is_empty() {
            return Ok(());
        }

        self.check_columns(columns_of(raw)).map(|_| ())
    }
}

/// The union of keys across all records, in first-seen order.
pub fn columns_of(records: &[RawRecord]) -> Vec<&str> {
    let mut seen = BTreeSet::new();
    let mut columns = Vec::new();

    for key in records.iter().flat_map(|r| r.keys()) {
        if seen.insert(key.as_str()) {
            columns.push(key.as_str());
        }
    }

    columns
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn should_accept_complete_columns() {
        let schema = Schema::gbif_occurrence();
        let columns: Vec<&str> = schema.fields.iter().map(|f| f.source).collect();

        assert_eq!(schema.check_columns(columns), Ok(vec![]));
    }

    #[test]
    fn should_report_missing_optional_columns() {
        let schema = Schema::gbif_occurrence();
        let columns = ["decimalLatitude", "decimalLongitude", "species"];

        let missing = schema.check_columns(columns).unwrap();

        assert_eq!(missing.len(), 8);
        assert!(missing.contains(&"eventDate"));
        assert!(!missing.contains(&"species"));
    }

    #[test]
    fn should_fail_on_missing_required_column() {
        let schema = Schema::haedat_event();
        let columns = ["eventName", "latitude"];

        assert_eq!(
            schema.check_columns(columns),
            Err(SchemaError::MissingColumn {
                column: "longitude".to_string()
            })
        );
    }

    #[test]
    fn should_check_input_rows() {
        let schema = Schema::haedat_event();
        let rows: Vec<RawRecord> = vec![
            json!({"latitude": 1.0}).as_object().unwrap().clone(),
            json!({"longitude": 2.0}).as_object().unwrap().clone(),
        ];

        assert_eq!(schema.check_input(&rows), Ok(()));
        assert_eq!(
            schema.check_input(&rows[..1]),
            Err(SchemaError::MissingColumn {
                column: "longitude".to_string()
            })
        );
        assert_eq!(schema.check_input(&[]), Ok(()));
    }

    #[test]
    fn should_collect_union_of_columns() {
        let records: Vec<RawRecord> = vec![
            json!({"a": 1, "b": 2}).as_object().unwrap().clone(),
            json!({"b": 3, "c": 4}).as_object().unwrap().clone(),
        ];

        let mut columns = columns_of(&records);
        columns.sort();

        assert_eq!(columns, vec!["a", "b", "c"]);
    }

    #[test]
    fn should_check_world_bounds() {
        assert!(Bounds::WORLD.contains(90.0, -180.0));
        assert!(!Bounds::WORLD.contains(90.5, 0.0));
        assert!(!Bounds::WORLD.contains(0.0, 181.0));
    }
}
