//! Fuzz target for the fingerprint scanners.
//!
//! Every scanner must absorb malformed input into `issues`, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sieve::{fingerprint, FileType, FingerprintConfig};

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    if let Ok(content) = std::str::from_utf8(data) {
        let config = FingerprintConfig::default();
        for file_type in FileType::ALL {
            let fp = fingerprint(file_type, content, &config);
            let _ = fp.digest();
        }
        let _ = FileType::detect(content);
    }
});
