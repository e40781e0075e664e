//! Spreadsheet rows keyed by their header row, from a workbook or a CSV export.

use std::{io::Read, path::Path};

use calamine::{open_workbook_auto, Data, DataType, Range, Reader};
use csv::{ReaderBuilder, Trim};
use serde_json::{Number, Value};
use tracing::debug;

use crate::{error::SourceError, record::RawRecord};

const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

/// Reads every row of the file at `file_path`.
///
/// Workbooks (`.xlsx`, `.xlsm`, `.xls`, `.ods`) are read from their first
/// worksheet. Anything else is read as CSV.
pub fn read_rows(file_path: &Path) -> Result<Vec<RawRecord>, SourceError> {
    let is_workbook = file_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| WORKBOOK_EXTENSIONS.iter().any(|w| ext.eq_ignore_ascii_case(w)));

    if is_workbook {
        rows_from_workbook(file_path)
    } else {
        let file = std::fs::File::open(file_path)?;
        rows_from_reader(file)
    }
}

/// Cells are kept as strings; typing is left to the record schema.
pub fn rows_from_reader<R: Read>(reader: R) -> Result<Vec<RawRecord>, SourceError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        let row: RawRecord = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Reads the first worksheet of a workbook.
pub fn rows_from_workbook(file_path: &Path) -> Result<Vec<RawRecord>, SourceError> {
    let mut workbook = open_workbook_auto(file_path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SourceError::NoWorksheet)??;

    debug!(
        "worksheet of {} has {} rows and {} columns",
        file_path.display(),
        range.height(),
        range.width()
    );

    Ok(rows_from_range(&range))
}

/// The first row of `range` names the columns; every later row becomes a record.
fn rows_from_range(range: &Range<Data>) -> Vec<RawRecord> {
    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(header_name).collect(),
        None => return Vec::new(),
    };

    rows.map(|row| {
        headers
            .iter()
            .zip(row.iter())
            .map(|(header, cell)| (header.clone(), cell_value(cell)))
            .collect()
    })
    .collect()
}

fn header_name(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Numbers stay numbers, text stays text, empty and error cells become null.
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Int(v) => Value::Number((*v).into()),
        Data::Float(v) => Number::from_f64(*v).map_or(Value::Null, Value::Number),
        Data::Bool(v) => Value::Bool(*v),
        Data::DateTime(_) => cell.as_datetime().map_or(Value::Null, |dt| {
            Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string())
        }),
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use std::{io::Write, path::PathBuf};

    use calamine::CellErrorType;
    use tempfile::{NamedTempFile, TempDir};

    use super::*;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    #[test]
    fn should_read_rows_keyed_by_header() {
        let csv = "eventName, latitude ,longitude,eventYear\n\
                   Bloom A,57.1,-2.1,2003\n\
                   Bloom B,,10.5,2004\n";

        let rows = rows_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["latitude"], "57.1");
        assert_eq!(rows[0]["eventYear"], "2003");
        assert_eq!(rows[1]["latitude"], "");
    }

    #[test]
    fn should_leave_short_rows_without_trailing_columns() {
        let csv = "eventName,latitude,longitude\nBloom C,1.0\n";

        let rows = rows_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(rows[0].len(), 2);
        assert!(rows[0].get("longitude").is_none());
    }

    #[test]
    fn should_read_rows_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "eventName,latitude,longitude").unwrap();
        writeln!(file, "Bloom D,43.3,5.4").unwrap();

        let rows = read_rows(file.path()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["eventName"], "Bloom D");
    }

    #[test]
    fn should_type_worksheet_cells() {
        let mut range = Range::new((0, 0), (2, 3));
        range.set_value((0, 0), Data::String(" eventName ".to_string()));
        range.set_value((0, 1), Data::String("latitude".to_string()));
        range.set_value((0, 2), Data::String("longitude".to_string()));
        range.set_value((0, 3), Data::String("eventYear".to_string()));
        range.set_value((1, 0), Data::String("Bloom A".to_string()));
        range.set_value((1, 1), Data::Float(57.1));
        range.set_value((1, 2), Data::Float(-2.1));
        range.set_value((1, 3), Data::Int(2003));
        range.set_value((2, 0), Data::String("Bloom B".to_string()));
        range.set_value((2, 2), Data::Error(CellErrorType::NA));

        let rows = rows_from_range(&range);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["eventName"], "Bloom A");
        assert_eq!(rows[0]["latitude"], 57.1);
        assert_eq!(rows[0]["eventYear"], 2003);
        assert_eq!(rows[1]["latitude"], Value::Null);
        assert_eq!(rows[1]["longitude"], Value::Null);
        assert_eq!(rows[1]["eventYear"], Value::Null);
    }

    #[test]
    fn should_return_nothing_for_empty_worksheet() {
        let range: Range<Data> = Range::empty();

        assert!(rows_from_range(&range).is_empty());
    }

    #[test]
    fn should_read_first_worksheet_of_workbook() {
        let rows = read_rows(&fixture("haedat_sample.xlsx")).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["eventName"], "Bloom A");
        assert_eq!(rows[0]["eventYear"], 2003.0);
        assert_eq!(rows[0]["eventDate"], "2003-07-14T00:00:00");
        assert_eq!(rows[0]["latitude"], 57.1);
        assert_eq!(rows[0]["countryName"], "United Kingdom");
        assert_eq!(rows[1]["latitude"], Value::Null);
        assert_eq!(rows[2]["latitude"], -95.0);
    }

    #[test]
    fn should_fail_on_unreadable_workbook() {
        let tmp_dir = TempDir::new().unwrap();
        let file_path = tmp_dir.path().join("broken.xlsx");
        std::fs::write(&file_path, "eventName,latitude\n").unwrap();

        assert!(matches!(read_rows(&file_path), Err(SourceError::Workbook(_))));
    }
}
