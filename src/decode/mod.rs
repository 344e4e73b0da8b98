//! Response decoder module
//!
//! Turns a CDX `output=json` body into a `ParsedBatch`: data rows held as an
//! Arrow `RecordBatch` of Utf8 columns, plus the optional resume key.

mod parser;
mod types;

pub use parser::{decode_batch, parse_batch};
pub use types::{Batch, CdxRecord, ParsedBatch};

#[cfg(test)]
mod tests;
