//! Fuzz target for the redactor.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sieve::Redactor;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let redactor = Redactor::default();
        let once = redactor.redact(text, 500);
        assert!(once.chars().count() <= 500);
        assert_eq!(redactor.redact(&once, 500), once);
    }
});
