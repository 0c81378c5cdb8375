//! CSV fingerprinting.
//!
//! Lines are split on every comma: quoting is deliberately ignored, so a
//! quoted value containing a comma spreads over two columns. Blank lines are
//! records like any other, with a single empty field. That keeps the scan
//! cheap and is accepted as an approximation.

use super::types::{FileType, FingerprintConfig, InferredType, SchemaFingerprint};

pub(super) fn fingerprint_csv_text(
    content: &str,
    config: &FingerprintConfig,
) -> crate::Result<SchemaFingerprint> {
    let mut fp = SchemaFingerprint::empty(FileType::Csv);

    // `lines` also strips a trailing `\r`.
    let mut lines = content.lines();

    let header = match lines.next() {
        Some(line) => line,
        None => return Ok(fp),
    };
    fp.column_headers = header.split(',').map(|h| h.trim().to_string()).collect();
    let headers = fp.column_headers.clone();
    let width = headers.len();

    let mut width_mismatch_reported = false;
    for (offset, line) in lines.enumerate() {
        fp.record_count += 1;

        if offset >= config.sample_size {
            continue;
        }

        let cells: Vec<&str> = line.split(',').collect();
        if !width_mismatch_reported && cells.len() != width {
            fp.issues.push(format!(
                "Inconsistent column count: line {} has {} fields, header has {}",
                offset + 2,
                cells.len(),
                width
            ));
            width_mismatch_reported = true;
        }

        for (column, cell) in headers.iter().zip(cells) {
            fp.observe(column, InferredType::of_text(cell));
        }
    }

    Ok(fp)
}
