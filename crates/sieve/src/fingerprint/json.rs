//! JSON fingerprinting.

use indexmap::IndexSet;
use serde_json::Value;

use super::types::{FileType, FingerprintConfig, InferredType, SchemaFingerprint};

/// Fingerprint an already-parsed JSON document.
///
/// Arrays are sampled; a single object is its own sample; any other root
/// shape yields an empty fingerprint.
pub fn fingerprint_json(value: &Value, config: &FingerprintConfig) -> SchemaFingerprint {
    let mut fp = SchemaFingerprint::empty(FileType::Json);

    match value {
        Value::Array(items) => {
            fp.record_count = items.len();
            let sample = &items[..items.len().min(config.sample_size)];
            analyze_records(&mut fp, sample);
        }
        Value::Object(map) => {
            fp.record_count = 1;
            for (key, field) in map {
                fp.top_level_keys.insert(key.clone());
                fp.observe(key, InferredType::of_json(field));
            }
        }
        _ => {}
    }

    fp
}

/// Parse JSON text, then fingerprint it.
pub(super) fn fingerprint_json_text(
    content: &str,
    config: &FingerprintConfig,
) -> crate::Result<SchemaFingerprint> {
    let value: Value = serde_json::from_str(content)?;
    Ok(fingerprint_json(&value, config))
}

fn analyze_records(fp: &mut SchemaFingerprint, sample: &[Value]) {
    for item in sample {
        if let Value::Object(map) = item {
            for (key, field) in map {
                fp.top_level_keys.insert(key.clone());
                fp.observe(key, InferredType::of_json(field));
            }
        }
    }

    if let Some((index, key)) = first_missing_key(&fp.top_level_keys, sample) {
        fp.issues.push(format!(
            "Inconsistent keys: record {} is missing '{}' found in other records",
            index, key
        ));
    }
}

/// First (record index, key) where a sampled record lacks a key seen elsewhere.
fn first_missing_key<'a>(keys: &'a IndexSet<String>, sample: &[Value]) -> Option<(usize, &'a str)> {
    if keys.is_empty() {
        return None;
    }
    sample.iter().enumerate().find_map(|(index, item)| {
        let present = item.as_object();
        keys.iter()
            .find(|k| present.is_none_or(|m| !m.contains_key(k.as_str())))
            .map(|k| (index, k.as_str()))
    })
}
