//! Integration tests for Sieve.

use std::io::Write;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::NamedTempFile;

use sieve::provider::{MockBehavior, MockProvider};
use sieve::{
    fingerprint, fingerprint_file, normalize_errors, AnalyzeRequest, CacheStore, Environment,
    ErrorType, FileType, FingerprintConfig, InferredType, Inspector, InvalidationController,
    MemoryCacheStore, NormalizedResponse, Severity, SieveConfig, SieveError,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(suffix).expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

// =============================================================================
// Fingerprint Engine
// =============================================================================

#[test]
fn test_json_sample_scenario() {
    let fp = fingerprint(
        FileType::Json,
        r#"[{"a":1},{"a":2,"b":"x"}]"#,
        &FingerprintConfig::default(),
    );

    assert_eq!(fp.record_count, 2);
    assert_eq!(fp.top_level_keys.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(
        fp.types_of("a").unwrap().iter().copied().collect::<Vec<_>>(),
        vec![InferredType::Number]
    );
    assert_eq!(
        fp.types_of("b").unwrap().iter().copied().collect::<Vec<_>>(),
        vec![InferredType::String]
    );
    assert_eq!(fp.issues.len(), 1);
}

#[test]
fn test_json_record_count_ignores_sample_size() {
    let records: Vec<Value> = (0..25).map(|i| json!({"id": i})).collect();
    let content = Value::Array(records).to_string();
    let fp = fingerprint(FileType::Json, &content, &FingerprintConfig::with_sample_size(3));
    assert_eq!(fp.record_count, 25);
}

#[test]
fn test_fingerprint_file_detects_type_from_extension() {
    let file = create_test_file("id,score,flag\n1,2.5,TRUE\n2,,false\n", ".csv");
    let fp = fingerprint_file(file.path(), &FingerprintConfig::default()).expect("fingerprint failed");

    assert_eq!(fp.file_type, FileType::Csv);
    assert_eq!(fp.column_headers, vec!["id", "score", "flag"]);
    assert_eq!(fp.record_count, 2);
    assert!(fp.is_heterogeneous("score"));
    assert!(fp.issues.is_empty());
}

#[test]
fn test_fingerprint_file_detects_type_from_content() {
    let file = create_test_file("<root><item/></root>", ".txt");
    let fp = fingerprint_file(file.path(), &FingerprintConfig::default()).unwrap();
    assert_eq!(fp.file_type, FileType::Xml);
    assert!(fp.tag_names.contains("item"));
}

#[test]
fn test_fingerprint_missing_file() {
    let result = fingerprint_file("/nonexistent/data.json", &FingerprintConfig::default());
    assert!(matches!(result, Err(SieveError::Io { .. })));
}

#[test]
fn test_yaml_sequence_fingerprint() {
    let content = "- name: a\n  port: 80\n- name: b\n";
    let fp = fingerprint(FileType::Yaml, content, &FingerprintConfig::default());
    assert_eq!(fp.record_count, 2);
    assert!(fp.top_level_keys.contains("port"));
    assert_eq!(fp.issues.len(), 1);
}

// =============================================================================
// Normalization
// =============================================================================

#[test]
fn test_unexpected_token_scenario() {
    let errors = normalize_errors(
        &[json!({"message": "Unexpected token at line 4"})],
        &Default::default(),
    );
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error_type, ErrorType::Syntax);
    assert_eq!(errors[0].severity, Severity::High);
    assert_eq!(errors[0].line, Some(4));
    assert_eq!(errors[0].id, "err-1");
}

#[test]
fn test_critical_wins_both_ways() {
    let errors = normalize_errors(
        &[
            json!({"message": "critical failure in header", "type": "structure"}),
            json!({"message": "anything", "severity": "critical"}),
        ],
        &Default::default(),
    );
    assert!(errors.iter().all(|e| e.severity == Severity::Critical));
}

// =============================================================================
// Full Pipeline
// =============================================================================

#[test]
fn test_inspect_serializes_stable_contract() {
    let provider = Arc::new(MockProvider::fixed(
        r#"```json
{"errors": [
  {"message": "Trailing comma", "type": "warning"},
  {"message": "Invalid date in column 3", "category": "validation", "line": 2}
]}
```"#,
    ));
    let inspector = Inspector::new(provider);
    let response = inspector.inspect(AnalyzeRequest::new("a,b\n1,2\n", FileType::Csv));
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["status"], "ok");
    assert_eq!(value["file_type"], "csv");
    assert_eq!(value["total_errors"], 1);
    assert_eq!(value["total_warnings"], 1);
    assert_eq!(value["errors"][1]["type"], "validation");
    assert_eq!(value["errors"][1]["line"], 2);
    assert_eq!(value["errors"][1]["column"], 3);
    assert_eq!(value["errors"][1]["severity"], "high");
    assert_eq!(value["errors"][0]["severity"], "low");
    assert_eq!(value["llm_provider"], "mock");
    assert_eq!(value["cached"], false);
    assert!(value["raw_response"].is_string());
}

#[test]
fn test_production_hides_raw_output() {
    let provider = Arc::new(MockProvider::fixed(r#"{"errors": []}"#));
    let inspector = Inspector::with_config(
        provider,
        SieveConfig::default().with_environment(Environment::Production),
    );
    let value = serde_json::to_value(inspector.inspect(AnalyzeRequest::new("{}", FileType::Json))).unwrap();
    assert_eq!(value["status"], "ok");
    assert!(value.get("raw_response").is_none());
}

#[test]
fn test_truncated_flag() {
    let inspector = Inspector::with_config(
        Arc::new(MockProvider::new()),
        SieveConfig::default().with_max_content_bytes(8),
    );
    let response = inspector.inspect(AnalyzeRequest::new("key: value\nother: 1\n", FileType::Yaml));
    let NormalizedResponse::Ok(ok) = response else {
        panic!("expected ok response");
    };
    assert!(ok.meta.truncated);
}

#[test]
fn test_rate_limited_pipeline() {
    let provider = Arc::new(MockProvider::with_behavior(MockBehavior::RateLimited(Some(12))));
    let response = Inspector::new(provider).inspect(AnalyzeRequest::new("{}", FileType::Json));
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["status"], "error");
    assert_eq!(value["error_type"], "rate_limit_exceeded");
    assert_eq!(value["retry_after"], 12);
    assert_eq!(response.status_code(), 429);
}

#[test]
fn test_request_id_echoed_unchanged() {
    let inspector = Inspector::new(Arc::new(MockProvider::new()));

    let id = "order#42/retry 1";
    let response = inspector.inspect(AnalyzeRequest::new("a,b\n1,2\n", FileType::Csv).with_request_id(id));
    assert_eq!(response.request_id(), Some(id));

    // Validation failures echo the id too.
    let response = inspector.inspect(
        AnalyzeRequest {
            content: Some("a=1".into()),
            file_type: Some("ini".into()),
            request_id: None,
        }
        .with_request_id(id),
    );
    assert_eq!(response.status(), "error");
    assert_eq!(response.request_id(), Some(id));
}

#[test]
fn test_overlong_request_id_is_validation_error() {
    let inspector = Inspector::new(Arc::new(MockProvider::new()));
    let id = "r".repeat(sieve::request::MAX_REQUEST_ID_LEN + 1);

    let response = inspector.inspect(AnalyzeRequest::new("{}", FileType::Json).with_request_id(id.clone()));
    assert_eq!(response.status_code(), 400);
    let request_id = response.request_id().unwrap();
    assert_ne!(request_id, id);
    assert!(request_id.starts_with("req_"));
}

// =============================================================================
// Invalidation
// =============================================================================

#[test]
fn test_invalidation_round_trip() {
    let store = Arc::new(MemoryCacheStore::new());
    let provider = Arc::new(MockProvider::new());
    let inspector = Inspector::new(provider.clone()).with_cache(store.clone());
    let controller = InvalidationController::new(store.clone(), None);

    inspector.inspect(AnalyzeRequest::new("a,b\n1,2\n", FileType::Csv));
    inspector.inspect(AnalyzeRequest::new("{\"k\": 1}", FileType::Json));
    assert_eq!(store.len(), 2);

    let outcome = controller
        .handle(None, &json!({"scope": "file_type", "file_type": "csv"}))
        .unwrap();
    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["file_type"], "csv");
    assert_eq!(value["deleted_entries"], 1);

    // JSON result is still cached, CSV must be recomputed.
    assert!(inspector.inspect(AnalyzeRequest::new("{\"k\": 1}", FileType::Json)).is_cached());
    assert!(!inspector.inspect(AnalyzeRequest::new("a,b\n1,2\n", FileType::Csv)).is_cached());
    assert_eq!(provider.calls(), 3);

    let err = controller
        .handle(None, &json!({"scope": "file_type", "file_type": "ini"}))
        .unwrap_err();
    assert!(matches!(err, SieveError::Validation { .. }));
    assert!(err.to_string().contains("ini"));

    let outcome = controller.handle(None, &json!({"scope": "all"})).unwrap();
    assert_eq!(outcome.deleted_entries, 2);
    assert_eq!(store.clear_all().unwrap(), 0);
}
