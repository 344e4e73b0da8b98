//! Tests for engine module

use super::*;
use crate::query::{CdxField, MatchType};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CDX_PATH: &str = "/cdx/search/cdx";

/// CDX JSON body for `originals`, with the resume key trailer when given
fn cdx_body(originals: &[&str], resume_key: Option<&str>) -> Value {
    let mut rows = vec![json!(["original"])];
    rows.extend(originals.iter().map(|o| json!([o])));
    if let Some(key) = resume_key {
        rows.push(json!([]));
        rows.push(json!([key]));
    }
    Value::Array(rows)
}

fn query_for(server: &MockServer) -> CdxQuery {
    CdxQuery::new("example.com")
        .with_base(format!("{}/cdx/search", server.uri()))
        .unwrap()
        .with_fields(&[CdxField::Original])
}

async fn drain(cursor: &mut CdxIterator) -> Vec<String> {
    let mut out = Vec::new();
    while let Some(record) = cursor.advance().await.unwrap() {
        out.push(record.original().unwrap().to_string());
    }
    out
}

// ============================================================================
// IteratorConfig / FetchStats Tests
// ============================================================================

#[test]
fn test_iterator_config_default() {
    let config = IteratorConfig::default();
    assert_eq!(config.cache_size, 100);
    assert_eq!(config.http.timeout, Duration::from_secs(10));
    assert!(config.http.rate_limit.is_none());
}

#[test]
fn test_iterator_config_builder() {
    let config = IteratorConfig::new()
        .with_cache_size(25)
        .with_timeout(Duration::from_secs(3));

    assert_eq!(config.cache_size, 25);
    assert_eq!(config.http.timeout, Duration::from_secs(3));
}

#[test]
fn test_fetch_stats_mutations() {
    let mut stats = FetchStats::new();
    stats.add_batch();
    stats.add_record();
    stats.add_record();

    assert_eq!(stats.batches_fetched, 1);
    assert_eq!(stats.records_yielded, 2);
}

#[test]
fn test_engine_rejects_zero_cache_size() {
    let result = CdxIterator::with_config(
        CdxQuery::new("example.com"),
        IteratorConfig::new().with_cache_size(0),
    );
    assert!(matches!(result, Err(Error::Config { .. })));
}

#[test]
fn test_engine_configures_query_for_batches() {
    let query = CdxQuery::new("example.com")
        .with_match_type(MatchType::Prefix)
        .with_offset(10)
        .with_fast_latest(true);
    let cursor =
        CdxIterator::with_config(query, IteratorConfig::new().with_cache_size(50)).unwrap();

    assert_eq!(
        cursor.query().render(),
        "http://web.archive.org/cdx/search/cdx?url=example.com&matchType=prefix&output=json&limit=50"
    );
    assert!(!cursor.is_exhausted());
}

// ============================================================================
// Pagination Tests
// ============================================================================

#[tokio::test]
async fn test_engine_walks_resume_keys() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CDX_PATH))
        .and(query_param("limit", "2"))
        .and(query_param("output", "json"))
        .and(query_param("showResumeKey", "true"))
        .and(query_param_is_missing("resumeKey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cdx_body(&["r1", "r2"], Some("k1"))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(CDX_PATH))
        .and(query_param("resumeKey", "k1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cdx_body(&["r3", "r4"], Some("k2"))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(CDX_PATH))
        .and(query_param("resumeKey", "k2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cdx_body(&["r5"], None)))
        .expect(1)
        .mount(&server)
        .await;

    let mut cursor =
        CdxIterator::with_config(query_for(&server), IteratorConfig::new().with_cache_size(2))
            .unwrap();

    let records = drain(&mut cursor).await;
    assert_eq!(records, vec!["r1", "r2", "r3", "r4", "r5"]);

    // ceil(5 / 2) fetches
    assert_eq!(cursor.stats().batches_fetched, 3);
    assert_eq!(cursor.stats().records_yielded, 5);
    assert!(cursor.is_exhausted());
}

#[tokio::test]
async fn test_engine_exhausted_never_refetches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CDX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(cdx_body(&["only"], None)))
        .expect(1)
        .mount(&server)
        .await;

    let mut cursor = CdxIterator::new(query_for(&server)).unwrap();

    assert_eq!(
        cursor.advance().await.unwrap().unwrap().original(),
        Some("only")
    );
    for _ in 0..3 {
        assert!(cursor.advance().await.unwrap().is_none());
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_engine_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CDX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut cursor = CdxIterator::new(query_for(&server)).unwrap();

    assert!(cursor.advance().await.unwrap().is_none());
    assert!(cursor.advance().await.unwrap().is_none());
    assert!(cursor.is_exhausted());
    assert_eq!(cursor.stats().batches_fetched, 1);
}

#[tokio::test]
async fn test_engine_retry_reuses_resume_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CDX_PATH))
        .and(query_param_is_missing("resumeKey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cdx_body(&["r1"], Some("k1"))))
        .expect(1)
        .mount(&server)
        .await;

    // First attempt on the second page fails, the retry succeeds
    Mock::given(method("GET"))
        .and(path(CDX_PATH))
        .and(query_param("resumeKey", "k1"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(CDX_PATH))
        .and(query_param("resumeKey", "k1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cdx_body(&["r2"], None)))
        .expect(1)
        .mount(&server)
        .await;

    let mut cursor =
        CdxIterator::with_config(query_for(&server), IteratorConfig::new().with_cache_size(1))
            .unwrap();

    assert_eq!(cursor.advance().await.unwrap().unwrap().original(), Some("r1"));

    let err = cursor.advance().await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
    assert!(err.is_transport());
    assert_eq!(cursor.query().resume_key(), Some("k1"));
    assert!(!cursor.is_exhausted());

    assert_eq!(cursor.advance().await.unwrap().unwrap().original(), Some("r2"));
    assert!(cursor.advance().await.unwrap().is_none());
    assert_eq!(cursor.stats().batches_fetched, 2);
}

#[tokio::test]
async fn test_engine_encoding_keeps_server_resume_key() {
    let server = MockServer::start().await;
    let issued_key = "org%2Carchive%29%2F+20080103034018";

    Mock::given(method("GET"))
        .and(path(CDX_PATH))
        .and(query_param("url", "http://archive.org/"))
        .and(query_param_is_missing("resumeKey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cdx_body(&["a"], Some(issued_key))))
        .expect(1)
        .mount(&server)
        .await;

    // The server decodes the key it issued
    Mock::given(method("GET"))
        .and(path(CDX_PATH))
        .and(query_param("resumeKey", "org,archive)/ 20080103034018"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cdx_body(&["b"], None)))
        .expect(1)
        .mount(&server)
        .await;

    let query = CdxQuery::new("http://archive.org/")
        .with_base(format!("{}/cdx/search", server.uri()))
        .unwrap()
        .with_fields(&[CdxField::Original])
        .with_percent_encoding(true);
    let mut cursor =
        CdxIterator::with_config(query, IteratorConfig::new().with_cache_size(1)).unwrap();

    assert_eq!(drain(&mut cursor).await, vec!["a", "b"]);
    assert!(cursor.query().render().ends_with(&format!("&resumeKey={issued_key}")));
}

#[tokio::test]
async fn test_engine_malformed_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CDX_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([["original", "timestamp"], ["x"]])),
        )
        .mount(&server)
        .await;

    let mut cursor = CdxIterator::new(query_for(&server)).unwrap();
    let err = cursor.advance().await.unwrap_err();

    assert!(err.is_malformed());
    assert_eq!(cursor.stats().batches_fetched, 0);
}

#[tokio::test]
async fn test_engine_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CDX_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(cdx_body(&["late"], None))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = IteratorConfig::new().with_timeout(Duration::from_millis(100));
    let mut cursor = CdxIterator::with_config(query_for(&server), config).unwrap();

    let err = cursor.advance().await.unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_ms: 100 }));
    assert!(!cursor.is_exhausted());
}

#[tokio::test]
async fn test_engine_into_stream() {
    use futures::TryStreamExt;

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CDX_PATH))
        .and(query_param_is_missing("resumeKey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cdx_body(&["a", "b", "c"], Some("next"))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(CDX_PATH))
        .and(query_param("resumeKey", "next"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cdx_body(&["d"], None)))
        .mount(&server)
        .await;

    let cursor =
        CdxIterator::with_config(query_for(&server), IteratorConfig::new().with_cache_size(3))
            .unwrap();
    let records: Vec<CdxRecord> = cursor.into_stream().try_collect().await.unwrap();

    let originals: Vec<&str> = records.iter().filter_map(CdxRecord::original).collect();
    assert_eq!(originals, vec!["a", "b", "c", "d"]);
}

#[tokio::test]
async fn test_engine_probe() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CDX_PATH))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cdx_body(&["a"], None)))
        .expect(1)
        .mount(&server)
        .await;

    let cursor = CdxIterator::new(query_for(&server)).unwrap();
    assert!(cursor.probe().await.unwrap());
    // Probing does not touch the cursor
    assert_eq!(cursor.stats().batches_fetched, 0);
}
