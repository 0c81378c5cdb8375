//! Fuzz target for reading provider output.
//!
//! Arbitrary text must either parse into an error list or yield hints, and
//! whatever parses must normalize without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sieve::normalize::NormalizerConfig;
use sieve::normalize_errors;
use sieve::provider::parse_upstream_output;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    if let Ok(raw) = std::str::from_utf8(data) {
        match parse_upstream_output(raw) {
            Ok(parsed) => {
                let errors = normalize_errors(&parsed.errors, &NormalizerConfig::default());
                assert_eq!(errors.len(), parsed.errors.len());
            }
            Err(hints) => assert!(!hints.is_empty()),
        }
    }
});
