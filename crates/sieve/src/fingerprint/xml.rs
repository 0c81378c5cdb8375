//! XML fingerprinting: a single regex pass over the raw text.
//!
//! No DOM is built and well-formedness is not checked. Every token right
//! after `<` that looks like a name is collected, whatever its depth.

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{FileType, SchemaFingerprint};

static TAG_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<([A-Za-z][A-Za-z0-9:_-]*)").unwrap());

pub(super) fn fingerprint_xml_text(content: &str) -> crate::Result<SchemaFingerprint> {
    let mut fp = SchemaFingerprint::empty(FileType::Xml);
    for capture in TAG_NAME.captures_iter(content) {
        fp.tag_names.insert(capture[1].to_string());
    }
    Ok(fp)
}
