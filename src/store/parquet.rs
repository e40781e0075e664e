//! Save clean records to a parquet file, one row group per batch.

use std::{fs::File, path::Path, sync::Arc};

use arrow::{
    array::{ArrayRef, Float64Array, Int64Array, StringArray},
    datatypes::{DataType, Field, Schema as ArrowSchema, SchemaRef},
    record_batch::RecordBatch,
};
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};

use super::RecordStore;
use crate::{
    error::StoreError,
    record::{CleanRecord, Conversion, FieldSpec, FieldValue, Schema},
};

pub struct ParquetStore {
    fields: Vec<FieldSpec>,
    schema: SchemaRef,
    writer: Option<ArrowWriter<File>>,
}

impl ParquetStore {
    pub fn create(file_path: &Path, schema: &Schema) -> Result<Self, StoreError> {
        let file = File::create(file_path)?;
        let arrow_schema = Arc::new(arrow_schema(schema));

        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();

        let writer = ArrowWriter::try_new(file, arrow_schema.clone(), Some(props))?;

        Ok(ParquetStore {
            fields: schema.fields.clone(),
            schema: arrow_schema,
            writer: Some(writer),
        })
    }

    fn record_batch(&self, batch: &[CleanRecord]) -> Result<RecordBatch, StoreError> {
        let columns: Vec<ArrayRef> = self
            .fields
            .iter()
            .map(|spec| column(spec, batch))
            .collect();

        Ok(RecordBatch::try_new(self.schema.clone(), columns)?)
    }
}

impl RecordStore for ParquetStore {
    async fn insert(&mut self, batch: &[CleanRecord]) -> Result<(), StoreError> {
        let record_batch = self.record_batch(batch)?;
        let writer = self.writer.as_mut().ok_or(StoreError::Closed)?;

        writer.write(&record_batch)?;
        writer.flush()?;

        Ok(())
    }

    async fn finish(&mut self) -> Result<(), StoreError> {
        let writer = self.writer.take().ok_or(StoreError::Closed)?;
        writer.close()?;

        Ok(())
    }

    /// Writes the footer so the row groups already flushed can be read back.
    async fn abort(&mut self) -> Result<(), StoreError> {
        if let Some(writer) = self.writer.take() {
            writer.close()?;
        }

        Ok(())
    }
}

fn arrow_schema(schema: &Schema) -> ArrowSchema {
    let fields: Vec<Field> = schema
        .fields
        .iter()
        .map(|spec| {
            let data_type = match spec.conversion {
                Conversion::Text | Conversion::Date => DataType::Utf8,
                Conversion::Float => DataType::Float64,
                Conversion::Int => DataType::Int64,
            };
            Field::new(spec.target, data_type, true)
        })
        .collect();

    ArrowSchema::new(fields)
}

fn column(spec: &FieldSpec, batch: &[CleanRecord]) -> ArrayRef {
    let values = batch.iter().map(|r| r.get(spec.target));

    match spec.conversion {
        Conversion::Text | Conversion::Date => Arc::new(StringArray::from(
            values
                .map(|v| v.and_then(FieldValue::as_str))
                .collect::<Vec<_>>(),
        )),
        Conversion::Float => Arc::new(Float64Array::from(
            values
                .map(|v| v.and_then(FieldValue::as_f64))
                .collect::<Vec<_>>(),
        )),
        Conversion::Int => Arc::new(Int64Array::from(
            values
                .map(|v| v.and_then(FieldValue::as_i64))
                .collect::<Vec<_>>(),
        )),
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use arrow::array::Array;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::record::validate_all;

    #[tokio::test]
    async fn should_write_one_row_group_per_batch() {
        let tmp_dir = TempDir::new().unwrap();
        let file_path = tmp_dir.path().join("events.parquet");
        let schema = Schema::haedat_event();

        let raw: Vec<_> = (0..5)
            .map(|i: i64| {
                let cells = if i == 2 { json!("nan") } else { json!(1500.0) };
                json!({
                    "eventName": format!("event {i}"),
                    "eventYear": 2000 + i,
                    "latitude": 40.0 + i as f64,
                    "longitude": -8.5,
                    "cellsPerLitre0": cells
                })
                .as_object()
                .unwrap()
                .clone()
            })
            .collect();
        let records = validate_all(&raw, &schema).records;

        let mut store = ParquetStore::create(&file_path, &schema).unwrap();
        store.insert(&records[..3]).await.unwrap();
        store.insert(&records[3..]).await.unwrap();
        store.finish().await.unwrap();

        let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(&file_path).unwrap()).unwrap();
        assert_eq!(builder.metadata().num_row_groups(), 2);

        let batches: Vec<RecordBatch> = builder
            .build()
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(rows, 5);

        let first = &batches[0];
        assert_eq!(first.num_columns(), schema.fields.len());
        let cells = first
            .column_by_name("cellsPerLitre0")
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(cells.value(0), 1500.0);
        assert!(cells.is_null(2));
        let years = first
            .column_by_name("eventYear")
            .unwrap()
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap();
        assert_eq!(years.value(1), 2001);
    }

    #[tokio::test]
    async fn should_keep_committed_row_groups_after_abort() {
        let tmp_dir = TempDir::new().unwrap();
        let file_path = tmp_dir.path().join("partial.parquet");
        let schema = Schema::haedat_event();
        let raw = vec![json!({"eventName": "only", "latitude": 12.0, "longitude": 3.0})
            .as_object()
            .unwrap()
            .clone()];
        let records = validate_all(&raw, &schema).records;

        let mut store = ParquetStore::create(&file_path, &schema).unwrap();
        store.insert(&records).await.unwrap();
        store.abort().await.unwrap();
        store.abort().await.unwrap();
        drop(store);

        let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(&file_path).unwrap()).unwrap();
        assert_eq!(builder.metadata().num_row_groups(), 1);
        assert_eq!(builder.metadata().file_metadata().num_rows(), 1);
    }

    #[tokio::test]
    async fn should_refuse_writes_after_finish() {
        let tmp_dir = TempDir::new().unwrap();
        let file_path = tmp_dir.path().join("empty.parquet");

        let mut store = ParquetStore::create(&file_path, &Schema::gbif_occurrence()).unwrap();
        store.finish().await.unwrap();

        assert!(matches!(store.insert(&[]).await, Err(StoreError::Closed)));
    }
}
