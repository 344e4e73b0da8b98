//! CDX batch parser
//!
//! The server signals "more data" structurally: when `showResumeKey=true`
//! and the result set continues, it appends an empty row followed by a
//! one-element row holding the resume key. Everything here is pure.

use super::types::{Batch, ParsedBatch};
use crate::error::{Error, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::sync::Arc;

/// Decode a JSON response body and parse it.
///
/// A blank body is treated as an empty batch.
pub fn decode_batch(body: &str) -> Result<ParsedBatch> {
    if body.trim().is_empty() {
        return parse_batch(Batch::new());
    }

    let rows: Batch = serde_json::from_str(body)
        .map_err(|e| Error::malformed(format!("expected a list of string rows: {e}")))?;
    parse_batch(rows)
}

/// Split pagination metadata off a batch and bind data rows to the header.
pub fn parse_batch(mut rows: Batch) -> Result<ParsedBatch> {
    let resume_key = split_resume_key(&mut rows)?;

    let mut rows = rows.into_iter();
    let header = rows.next().unwrap_or_default();
    let data: Vec<Vec<String>> = rows.collect();

    let batch = to_record_batch(&header, &data)?;
    Ok(ParsedBatch::new(batch, resume_key))
}

/// Remove the trailing `[]`, `[key]` rows if present.
///
/// Batches shorter than two rows never carry a key. An empty key ends
/// the result set like a missing one.
fn split_resume_key(rows: &mut Batch) -> Result<Option<String>> {
    let n = rows.len();
    if n < 2 || !rows[n - 2].is_empty() {
        return Ok(None);
    }

    let trailer = rows.split_off(n - 2);
    match trailer[1].as_slice() {
        [key] if key.is_empty() => Ok(None),
        [key] => Ok(Some(key.clone())),
        other => Err(Error::malformed(format!(
            "resume key row must hold exactly one value, found {}",
            other.len()
        ))),
    }
}

fn to_record_batch(header: &[String], data: &[Vec<String>]) -> Result<RecordBatch> {
    for (i, row) in data.iter().enumerate() {
        if row.len() != header.len() {
            return Err(Error::malformed(format!(
                "row {} has {} columns, header has {}",
                i + 1,
                row.len(),
                header.len()
            )));
        }
    }

    let schema = Arc::new(Schema::new(
        header
            .iter()
            .map(|name| Field::new(name.as_str(), DataType::Utf8, false))
            .collect::<Vec<_>>(),
    ));

    let columns: Vec<ArrayRef> = (0..header.len())
        .map(|c| {
            Arc::new(StringArray::from_iter_values(
                data.iter().map(|row| row[c].as_str()),
            )) as ArrayRef
        })
        .collect();

    let options = RecordBatchOptions::new().with_row_count(Some(data.len()));
    Ok(RecordBatch::try_new_with_options(schema, columns, &options)?)
}
