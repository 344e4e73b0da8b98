//! Tests for decode module

use super::*;
use crate::error::Error;
use crate::query::CdxField;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;

fn rows(raw: &[&[&str]]) -> Batch {
    raw.iter()
        .map(|row| row.iter().map(|v| (*v).to_string()).collect())
        .collect()
}

fn values(batch: &ParsedBatch) -> Vec<Vec<String>> {
    batch.records().map(|r| r.values().to_vec()).collect()
}

// ============================================================================
// Batch Parsing Tests
// ============================================================================

#[test]
fn test_parse_without_trailer() {
    let batch = parse_batch(rows(&[
        &["original", "timestamp"],
        &["http://a.example/", "20200101000000"],
        &["http://b.example/", "20200102000000"],
    ]))
    .unwrap();

    assert_eq!(batch.resume_key(), None);
    assert!(!batch.has_more());
    assert_eq!(batch.columns(), &["original", "timestamp"]);
    assert_eq!(
        values(&batch),
        vec![
            vec!["http://a.example/", "20200101000000"],
            vec!["http://b.example/", "20200102000000"],
        ]
    );
}

#[test]
fn test_parse_with_resume_key() {
    let batch = parse_batch(rows(&[&["hdr"], &["r1"], &[], &["tok"]])).unwrap();

    assert_eq!(batch.resume_key(), Some("tok"));
    assert!(batch.has_more());
    assert_eq!(values(&batch), vec![vec!["r1"]]);
}

#[test]
fn test_parse_header_only() {
    let batch = parse_batch(rows(&[&["urlkey", "timestamp"]])).unwrap();

    assert!(batch.is_empty());
    assert_eq!(batch.resume_key(), None);
    assert_eq!(batch.columns(), &["urlkey", "timestamp"]);
}

#[test]
fn test_parse_no_rows() {
    let batch = parse_batch(Batch::new()).unwrap();

    assert!(batch.is_empty());
    assert!(batch.columns().is_empty());
    assert_eq!(batch.resume_key(), None);
}

#[test]
fn test_parse_header_and_resume_key_only() {
    let batch = parse_batch(rows(&[&["original"], &[], &["tok"]])).unwrap();

    assert!(batch.is_empty());
    assert_eq!(batch.resume_key(), Some("tok"));
    assert_eq!(batch.columns(), &["original"]);
}

#[test]
fn test_parse_empty_resume_key_ends_stream() {
    let batch = parse_batch(rows(&[&["original"], &["a"], &[], &[""]])).unwrap();

    assert_eq!(batch.resume_key(), None);
    assert_eq!(values(&batch), vec![vec!["a"]]);
}

#[test]
fn test_parse_arity_mismatch() {
    let result = parse_batch(rows(&[&["original", "timestamp"], &["only-one"]]));

    match result {
        Err(Error::MalformedResponse { message }) => {
            assert_eq!(message, "row 1 has 1 columns, header has 2");
        }
        other => panic!("Expected MalformedResponse, got {other:?}"),
    }
}

#[test]
fn test_parse_bad_resume_key_row() {
    let result = parse_batch(rows(&[&["original"], &["a"], &[], &["k1", "k2"]]));
    assert!(matches!(result, Err(Error::MalformedResponse { .. })));
}

#[test]
fn test_parsed_batch_is_columnar() {
    let batch = parse_batch(rows(&[
        &["original", "statuscode"],
        &["http://a.example/", "200"],
        &["http://a.example/x", "404"],
    ]))
    .unwrap();

    let data = batch.data();
    assert_eq!(data.num_rows(), 2);
    assert_eq!(data.num_columns(), 2);
    assert_eq!(data.schema().field(1).name(), "statuscode");
}

// ============================================================================
// Body Decoding Tests
// ============================================================================

#[test]
fn test_decode_json_body() {
    let body = json!([
        ["urlkey", "timestamp", "original"],
        ["com,example)/", "20200101000000", "http://example.com/"],
        [],
        ["com,example)/ 20200101000000"]
    ])
    .to_string();

    let batch = decode_batch(&body).unwrap();
    assert_eq!(batch.num_rows(), 1);
    assert_eq!(batch.resume_key(), Some("com,example)/ 20200101000000"));
}

#[test]
fn test_decode_empty_list_body() {
    let batch = decode_batch("[]").unwrap();
    assert!(batch.is_empty());
    assert!(!batch.has_more());
}

#[test]
fn test_decode_blank_body() {
    let batch = decode_batch("  \n").unwrap();
    assert!(batch.is_empty());
    assert!(!batch.has_more());
}

#[test]
fn test_decode_undecodable_body() {
    let err = decode_batch("<html>busy</html>").unwrap_err();
    assert!(err.is_malformed());

    let err = decode_batch(r#"{"rows": []}"#).unwrap_err();
    assert!(err.is_malformed());
}

// ============================================================================
// CdxRecord Tests
// ============================================================================

#[test]
fn test_record_accessors() {
    let batch = parse_batch(rows(&[
        &["timestamp", "original", "statuscode"],
        &["20210304050607", "http://example.com/", "200"],
    ]))
    .unwrap();
    let record = batch.record(0).unwrap();

    assert_eq!(record.len(), 3);
    assert_eq!(record.get("statuscode"), Some("200"));
    assert_eq!(record.get("digest"), None);
    assert_eq!(record.field(CdxField::Original), Some("http://example.com/"));
    assert_eq!(record.original(), Some("http://example.com/"));
    assert_eq!(
        record.timestamp(),
        NaiveDate::from_ymd_opt(2021, 3, 4).and_then(|d| d.and_hms_opt(5, 6, 7))
    );
    assert!(batch.record(1).is_none());
}

#[test]
fn test_record_json() {
    let batch = parse_batch(rows(&[&["original", "length"], &["http://x/", "512"]])).unwrap();
    let record = batch.record(0).unwrap();

    let expected = json!({"original": "http://x/", "length": "512"});
    assert_eq!(serde_json::to_value(&record).unwrap(), expected);
}
