//! Decoded batch and record types

use crate::query::{parse_timestamp, CdxField};
use arrow::array::AsArray;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDateTime;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;

/// One response worth of rows, before pagination metadata is split off
pub type Batch = Vec<Vec<String>>;

// ============================================================================
// ParsedBatch
// ============================================================================

/// Data rows of one fetch plus the key that continues the result set.
///
/// `resume_key == None` means the server has nothing after this batch.
#[derive(Debug, Clone)]
pub struct ParsedBatch {
    data: RecordBatch,
    columns: Arc<[String]>,
    resume_key: Option<String>,
}

impl ParsedBatch {
    /// Wrap a record batch whose columns are all Utf8
    pub fn new(data: RecordBatch, resume_key: Option<String>) -> Self {
        let columns: Arc<[String]> = data
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();

        Self {
            data,
            columns,
            resume_key,
        }
    }

    /// Columnar view of the data rows
    pub fn data(&self) -> &RecordBatch {
        &self.data
    }

    /// Column names from the header row
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn resume_key(&self) -> Option<&str> {
        self.resume_key.as_deref()
    }

    /// Whether the server announced another batch
    pub fn has_more(&self) -> bool {
        self.resume_key.is_some()
    }

    pub fn num_rows(&self) -> usize {
        self.data.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Record at `index`, or `None` past the last row
    pub fn record(&self, index: usize) -> Option<CdxRecord> {
        if index >= self.num_rows() {
            return None;
        }

        let values = self
            .data
            .columns()
            .iter()
            .map(|column| {
                column
                    .as_string_opt::<i32>()
                    .map(|strings| strings.value(index).to_string())
            })
            .collect::<Option<Vec<_>>>()?;

        Some(CdxRecord::new(Arc::clone(&self.columns), values))
    }

    /// All records in server order
    pub fn records(&self) -> impl Iterator<Item = CdxRecord> + '_ {
        (0..self.num_rows()).filter_map(|i| self.record(i))
    }
}

// ============================================================================
// CdxRecord
// ============================================================================

/// One archived capture: a data row bound to the batch's column names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdxRecord {
    columns: Arc<[String]>,
    values: Vec<String>,
}

impl CdxRecord {
    pub fn new(columns: Arc<[String]>, values: Vec<String>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a column by name
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    /// Value of a projected CDX field
    pub fn field(&self, field: CdxField) -> Option<&str> {
        self.get(field.as_str())
    }

    /// Capture time, when the `timestamp` column is present and well formed
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.field(CdxField::Timestamp)
            .and_then(|ts| parse_timestamp(ts).ok())
    }

    /// Original URL of the capture
    pub fn original(&self) -> Option<&str> {
        self.field(CdxField::Original)
    }
}

impl Serialize for CdxRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.columns.iter().zip(&self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
