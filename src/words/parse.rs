//! Tesseract TSV line parsing
//!
//! Converts one word-level row of Tesseract's TSV output into a normalized
//! [`WordRecord`]. The TSV layout is a wire format: exactly 12 tab-separated
//! fields per row (`level page_num block_num par_num line_num word_num left
//! top width height conf text`), matched field-for-field.

use super::types::{
    RawTsvWord, WordRecord, FIELD_CONF, FIELD_HEIGHT, FIELD_LEFT, FIELD_TEXT, FIELD_TOP,
    FIELD_WIDTH, TSV_FIELD_COUNT,
};

/// Split one TSV line into a raw word row.
///
/// Returns `None` when the line does not have exactly 12 fields or when any
/// of the four pixel box fields is not an integer. `level` and `conf` are
/// parsed leniently (defaulting to `0` / `-1.0`) since the line parser
/// ignores them; the ingest layer only consults them when its filters are
/// enabled.
pub fn split_tsv_fields(line: &str) -> Option<RawTsvWord> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != TSV_FIELD_COUNT {
        return None;
    }

    Some(RawTsvWord {
        level: fields[0].parse().unwrap_or(0),
        left: fields[FIELD_LEFT].parse().ok()?,
        top: fields[FIELD_TOP].parse().ok()?,
        width: fields[FIELD_WIDTH].parse().ok()?,
        height: fields[FIELD_HEIGHT].parse().ok()?,
        conf: fields[FIELD_CONF].parse().unwrap_or(-1.0),
        text: fields[FIELD_TEXT].to_string(),
    })
}

/// Parse one Tesseract TSV word line into a normalized word record.
///
/// Coordinates are divided by `page_width` / `page_height`, so callers that
/// pass the true pixel dimensions of the rendered page image get fractions
/// in `[0, 1]`. Passing `1` for a dimension leaves that axis in pixel space.
///
/// Returns `None` for any line that should be skipped:
/// - field count is not exactly 12
/// - a pixel box field is not an integer
/// - the text field is empty or whitespace after trimming
/// - the box covers the entire page exactly (a known Tesseract glitch)
/// - the box's far edge overflows the integer range
///
/// Never panics; a malformed line must not abort the surrounding batch.
pub fn parse_tsv_line(line: &str, page_width: f64, page_height: f64) -> Option<WordRecord> {
    let raw = split_tsv_fields(line)?;
    scale_word(&raw, page_width, page_height)
}

/// Validate and scale a raw word row against the page dimensions.
pub(crate) fn scale_word(raw: &RawTsvWord, page_width: f64, page_height: f64) -> Option<WordRecord> {
    let text = raw.text.trim();
    if text.is_empty() {
        return None;
    }

    // Tesseract occasionally emits a phantom word spanning the entire page.
    if raw.left == 0
        && raw.top == 0
        && raw.width as f64 == page_width
        && raw.height as f64 == page_height
    {
        return None;
    }

    // A box whose far edge is not representable is garbage, not a word.
    let right = raw.left.checked_add(raw.width)?;
    let bottom = raw.top.checked_add(raw.height)?;

    Some(WordRecord {
        text: text.to_string(),
        x1: raw.left as f64 / page_width,
        y1: raw.top as f64 / page_height,
        x2: right as f64 / page_width,
        y2: bottom as f64 / page_height,
    })
}
