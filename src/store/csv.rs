//! Save clean records to a CSV file with a header row.

use std::{fs::File, path::Path};

use csv::Writer;

use super::RecordStore;
use crate::{
    error::StoreError,
    record::{CleanRecord, FieldValue, Schema},
};

pub struct CsvStore {
    writer: Option<Writer<File>>,
}

impl CsvStore {
    pub fn create(file_path: &Path, schema: &Schema) -> Result<Self, StoreError> {
        let mut writer = Writer::from_path(file_path)?;
        writer.write_record(schema.fields.iter().map(|f| f.target))?;

        Ok(CsvStore {
            writer: Some(writer),
        })
    }
}

impl RecordStore for CsvStore {
    async fn insert(&mut self, batch: &[CleanRecord]) -> Result<(), StoreError> {
        let writer = self.writer.as_mut().ok_or(StoreError::Closed)?;

        for record in batch {
            writer.write_record(record.fields().iter().map(|(_, v)| cell(v)))?;
        }
        writer.flush()?;

        Ok(())
    }

    async fn finish(&mut self) -> Result<(), StoreError> {
        let mut writer = self.writer.take().ok_or(StoreError::Closed)?;
        writer.flush()?;

        Ok(())
    }

    async fn abort(&mut self) -> Result<(), StoreError> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }

        Ok(())
    }
}

fn cell(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => String::new(),
        FieldValue::Text(s) | FieldValue::Date(s) => s.clone(),
        FieldValue::Float(v) => v.to_string(),
        FieldValue::Int(v) => v.to_string(),
    }
}

// -- Tests -------------------------------------------------------------------
