//! YAML fingerprinting: a shallow, line-oriented scan of the root level.
//!
//! Only the root mapping (or the first level of each root sequence item) is
//! read. Anchors, multi-document streams and flow-style roots are not
//! interpreted beyond what the line shapes reveal.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{FileType, FingerprintConfig, InferredType, SchemaFingerprint};

/// `key: value` or `key:` where key may be quoted.
static KEY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^("[^"]*"|'[^']*'|[^\s#'"\-?\[\{][^:]*?)\s*:(?:\s+(.*))?$"#).unwrap()
});

#[derive(Debug)]
struct Line<'a> {
    indent: usize,
    text: &'a str,
}

pub(super) fn fingerprint_yaml_text(
    content: &str,
    config: &FingerprintConfig,
) -> crate::Result<SchemaFingerprint> {
    let mut fp = SchemaFingerprint::empty(FileType::Yaml);
    let lines = significant_lines(content);

    let Some(first) = lines.first() else {
        return Ok(fp);
    };

    if first.indent == 0 && is_item(first.text) {
        scan_sequence(&mut fp, &lines, config.sample_size);
    } else if KEY_LINE.is_match(first.text) {
        scan_mapping(&mut fp, &lines);
    }

    Ok(fp)
}

fn scan_mapping(fp: &mut SchemaFingerprint, lines: &[Line<'_>]) {
    fp.record_count = 1;
    for (i, line) in lines.iter().enumerate() {
        if line.indent != 0 {
            continue;
        }
        if let Some((key, value)) = split_key(line.text) {
            let ty = value_type(value, lines, i, 0);
            fp.top_level_keys.insert(key.clone());
            fp.observe(&key, ty);
        }
    }
}

fn scan_sequence(fp: &mut SchemaFingerprint, lines: &[Line<'_>], sample_size: usize) {
    let mut items: Vec<IndexSet<String>> = Vec::new();
    let mut key_indent = 0;

    for (i, line) in lines.iter().enumerate() {
        if line.indent == 0 && is_item(line.text) {
            fp.record_count += 1;
            if fp.record_count > sample_size {
                continue;
            }
            items.push(IndexSet::new());

            let rest = &line.text[1..];
            let entry = rest.trim_start();
            key_indent = 1 + rest.len() - entry.len();
            if let Some((key, value)) = split_key(entry) {
                let ty = value_type(value, lines, i, key_indent);
                record_key(fp, items.last_mut(), key, ty);
            }
        } else if fp.record_count <= sample_size && line.indent == key_indent && key_indent > 0 {
            if let Some((key, value)) = split_key(line.text) {
                let ty = value_type(value, lines, i, key_indent);
                record_key(fp, items.last_mut(), key, ty);
            }
        }
    }

    if let Some((index, key)) = items.iter().enumerate().find_map(|(index, keys)| {
        fp.top_level_keys
            .iter()
            .find(|k| !keys.contains(*k))
            .map(|k| (index, k.clone()))
    }) {
        fp.issues.push(format!(
            "Inconsistent keys: record {} is missing '{}' found in other records",
            index, key
        ));
    }
}

fn record_key(
    fp: &mut SchemaFingerprint,
    item: Option<&mut IndexSet<String>>,
    key: String,
    ty: InferredType,
) {
    fp.observe(&key, ty);
    fp.top_level_keys.insert(key.clone());
    if let Some(item) = item {
        item.insert(key);
    }
}

fn significant_lines(content: &str) -> Vec<Line<'_>> {
    content
        .lines()
        .filter_map(|raw| {
            let text = raw.trim_end();
            let trimmed = text.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }
            if text.starts_with("---") || text.starts_with("...") {
                return None;
            }
            Some(Line {
                indent: text.len() - trimmed.len(),
                text: trimmed,
            })
        })
        .collect()
}

fn is_item(text: &str) -> bool {
    text == "-" || text.starts_with("- ")
}

fn split_key(text: &str) -> Option<(String, &str)> {
    let captures = KEY_LINE.captures(text)?;
    let key = captures.get(1)?.as_str();
    let key = key
        .strip_prefix('"')
        .and_then(|k| k.strip_suffix('"'))
        .or_else(|| key.strip_prefix('\'').and_then(|k| k.strip_suffix('\'')))
        .unwrap_or(key);
    let value = captures.get(2).map(|m| m.as_str()).unwrap_or("");
    Some((key.to_string(), value))
}

/// Type of the value on line `i`, looking at the following line for blocks.
fn value_type(value: &str, lines: &[Line<'_>], i: usize, indent: usize) -> InferredType {
    let value = strip_comment(value);
    if value.is_empty() {
        return match lines.get(i + 1) {
            Some(next) if next.indent > indent && is_item(next.text) => InferredType::Array,
            Some(next) if next.indent > indent => InferredType::Object,
            Some(next) if next.indent == indent && is_item(next.text) => InferredType::Array,
            _ => InferredType::Empty,
        };
    }
    match value.chars().next() {
        Some('[') => InferredType::Array,
        Some('{') => InferredType::Object,
        Some('"') | Some('\'') | Some('|') | Some('>') => InferredType::String,
        _ if value == "~" || value.eq_ignore_ascii_case("null") => InferredType::Empty,
        _ => InferredType::of_text(value),
    }
}

fn strip_comment(value: &str) -> &str {
    match value.find(" #") {
        Some(pos) if !value.starts_with('"') && !value.starts_with('\'') => value[..pos].trim(),
        _ => value.trim(),
    }
}
