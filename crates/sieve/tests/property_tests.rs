//! Property-based tests for Sieve.
//!
//! These tests use proptest to generate random inputs and verify that the
//! fingerprint engine, normalizer and redactor keep their invariants under
//! all conditions.
//!
//! # Testing Philosophy
//!
//! Property-based tests verify:
//! 1. **No panics**: scanners never crash on any input
//! 2. **Determinism**: same input always produces same output
//! 3. **Invariants**: counts, issue reporting and redaction hold their contracts
//!
//! # Running Property Tests
//!
//! ```bash
//! # Run all property tests
//! cargo test -p sieve --test property_tests
//!
//! # Run with more cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p sieve --test property_tests
//! ```

use proptest::prelude::*;
use serde_json::{json, Value};

use sieve::response::AnalysisMetadata;
use sieve::{
    fingerprint, FileType, FingerprintConfig, NormalizedResponse, Redactor, ResponseBuilder,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Free text mixing prose with secret-shaped fragments.
fn text_with_secrets() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        "[a-zA-Z ,.:]{0,40}",
        "[A-Za-z0-9]{32,48}",
        "[a-z]{1,8}@[a-z]{2,8}\\.(com|org|io)",
        "https://[a-z]{1,6}:[a-z0-9]{1,10}@[a-z]{2,8}\\.com/[a-z]{0,6}",
        "eyJ[A-Za-z0-9_-]{4,20}\\.[A-Za-z0-9_-]{4,20}\\.[A-Za-z0-9_-]{4,20}",
        "\\[REDACTED\\]",
    ];
    prop::collection::vec(fragment, 0..12).prop_map(|parts| parts.join(" "))
}

/// Raw upstream error records of assorted shapes.
fn raw_error() -> impl Strategy<Value = Value> {
    let category = prop_oneof![
        Just(None),
        Just(Some("warning")),
        Just(Some("Syntax error")),
        Just(Some("structure")),
        Just(Some("validation warning")),
        Just(Some("semantic")),
        Just(Some("something else")),
    ];
    (category, "[a-zA-Z ]{0,30}", any::<bool>()).prop_map(|(category, message, bare)| {
        if bare {
            Value::String(message)
        } else {
            let mut record = json!({ "message": message });
            if let Some(c) = category {
                record["category"] = json!(c);
            }
            record
        }
    })
}

// =============================================================================
// Redaction
// =============================================================================

proptest! {
    #[test]
    fn redaction_is_idempotent(text in text_with_secrets(), max_len in 16usize..600) {
        let redactor = Redactor::default();
        let once = redactor.redact(&text, max_len);
        let twice = redactor.redact(&once, max_len);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn redaction_respects_limit(text in text_with_secrets(), max_len in 16usize..600) {
        let redacted = Redactor::default().redact(&text, max_len);
        prop_assert!(redacted.chars().count() <= max_len);
    }

    #[test]
    fn redaction_removes_emails(user in "[a-z]{3,8}", domain in "[a-z]{3,8}") {
        let email = format!("{}@{}.com", user, domain);
        let redacted = Redactor::default().redact_details(&format!("contact {} now", email));
        prop_assert!(!redacted.contains(&email));
    }
}

// =============================================================================
// Response Builder
// =============================================================================

proptest! {
    #[test]
    fn totals_partition_the_error_list(raw in prop::collection::vec(raw_error(), 0..30)) {
        let response = ResponseBuilder::default()
            .success(&raw, AnalysisMetadata::new("req", FileType::Json), None);
        let NormalizedResponse::Ok(ok) = response else {
            return Err(TestCaseError::fail("expected ok response"));
        };
        prop_assert_eq!(ok.total_errors + ok.total_warnings, ok.errors.len());
        prop_assert_eq!(ok.errors.len(), raw.len());
        let warnings = ok.errors.iter().filter(|e| e.is_warning()).count();
        prop_assert_eq!(ok.total_warnings, warnings);
    }
}

// =============================================================================
// Fingerprint Engine
// =============================================================================

proptest! {
    #[test]
    fn json_record_count_is_full_length(len in 0usize..60, sample in 1usize..20) {
        let records: Vec<Value> = (0..len).map(|i| json!({ "id": i })).collect();
        let content = Value::Array(records).to_string();
        let fp = fingerprint(FileType::Json, &content, &FingerprintConfig::with_sample_size(sample));
        prop_assert_eq!(fp.record_count, len);
        prop_assert!(fp.issues.is_empty());
    }

    #[test]
    fn csv_width_mismatch_reported_once(
        width in 2usize..6,
        widths in prop::collection::vec(1usize..8, 1..25),
    ) {
        let header: Vec<String> = (0..width).map(|i| format!("c{}", i)).collect();
        let mut content = header.join(",");
        for w in &widths {
            content.push('\n');
            content.push_str(&vec!["x"; *w].join(","));
        }

        let config = FingerprintConfig::default();
        let fp = fingerprint(FileType::Csv, &content, &config);
        let sampled_mismatch = widths.iter().take(config.sample_size).any(|w| *w != width);

        prop_assert_eq!(fp.record_count, widths.len());
        prop_assert_eq!(fp.issues.len(), usize::from(sampled_mismatch));
    }

    #[test]
    fn scanners_never_panic(content in "\\PC{0,200}") {
        let config = FingerprintConfig::default();
        for file_type in FileType::ALL {
            let fp = fingerprint(file_type, &content, &config);
            prop_assert_eq!(fp.file_type, file_type);
            // Deterministic
            prop_assert_eq!(fp.digest(), fingerprint(file_type, &content, &config).digest());
        }
    }
}
