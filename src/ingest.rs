//! Document-level OCR ingestion
//!
//! Scans a whole Tesseract TSV job (one word per line) and collects the
//! normalized word records for a page. Invalid lines are skipped and
//! counted; one bad line never aborts the batch.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::annotations::Page;
use crate::words::{self, Result, WordError, WordRecord, TSV_WORD_LEVEL};

// ============================================================
// Constants
// ============================================================

/// Minimum confidence clamp value
const MIN_CONFIDENCE_CLAMP: f32 = 0.0;

/// Maximum confidence clamp value
const MAX_CONFIDENCE_CLAMP: f32 = 100.0;

// ============================================================
// Options
// ============================================================

/// Ingestion options
///
/// Both filters default to off so that plain ingestion accepts exactly the
/// lines the wire-format parser accepts.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Drop words below this Tesseract confidence (field 10)
    pub min_confidence: Option<f32>,
    /// Only accept word-level rows (field 0 == 5)
    pub word_level_only: bool,
}

impl IngestOptions {
    /// Create a new options builder
    pub fn builder() -> IngestOptionsBuilder {
        IngestOptionsBuilder::default()
    }
}

/// Builder for IngestOptions
#[derive(Debug, Default)]
pub struct IngestOptionsBuilder {
    options: IngestOptions,
}

impl IngestOptionsBuilder {
    /// Set the minimum confidence threshold (clamped to 0-100)
    #[must_use]
    pub fn min_confidence(mut self, confidence: f32) -> Self {
        self.options.min_confidence =
            Some(confidence.clamp(MIN_CONFIDENCE_CLAMP, MAX_CONFIDENCE_CLAMP));
        self
    }

    /// Only accept rows whose Tesseract level marks a word
    #[must_use]
    pub fn word_level_only(mut self, only: bool) -> Self {
        self.options.word_level_only = only;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> IngestOptions {
        self.options
    }
}

// ============================================================
// Ingestion
// ============================================================

/// Result of ingesting one TSV document
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Accepted words, in input order
    pub words: Vec<WordRecord>,
    /// Total lines seen, header included
    pub lines_total: usize,
    /// Lines skipped as invalid or filtered out
    pub lines_skipped: usize,
}

impl IngestReport {
    /// Fraction of lines that produced a word
    pub fn accept_rate(&self) -> f64 {
        if self.lines_total == 0 {
            return 0.0;
        }
        self.words.len() as f64 / self.lines_total as f64
    }
}

/// Ingest a Tesseract TSV document for a page of the given pixel dimensions.
///
/// Lines are parsed in parallel; input order is preserved in the report.
/// The TSV header line fails numeric validation and is skipped like any
/// other invalid line.
pub fn ingest_tsv(
    tsv: &str,
    page_width: f64,
    page_height: f64,
    options: &IngestOptions,
) -> Result<IngestReport> {
    if page_width <= 0.0 || page_height <= 0.0 {
        return Err(WordError::InvalidPageDimensions(page_width, page_height));
    }

    let lines: Vec<&str> = tsv.lines().collect();
    let parsed: Vec<Option<WordRecord>> = lines
        .par_iter()
        .map(|line| parse_filtered(line, page_width, page_height, options))
        .collect();

    let mut report = IngestReport {
        lines_total: lines.len(),
        ..Default::default()
    };
    for (i, word) in parsed.into_iter().enumerate() {
        match word {
            Some(word) => report.words.push(word),
            None => {
                debug!(line = i + 1, "skipping unparseable TSV line");
                report.lines_skipped += 1;
            }
        }
    }

    info!(
        words = report.words.len(),
        skipped = report.lines_skipped,
        "ingested OCR TSV document"
    );
    Ok(report)
}

/// Ingest a TSV document and attach the words to a page.
///
/// Scaling uses the page's own pixel dimensions, so the attached boxes are
/// normalized to `[0, 1]`.
pub fn ingest_page(page: &mut Page, tsv: &str, options: &IngestOptions) -> Result<IngestReport> {
    let report = ingest_tsv(tsv, page.width as f64, page.height as f64, options)?;
    page.words = report.words.clone();
    Ok(report)
}

fn parse_filtered(
    line: &str,
    page_width: f64,
    page_height: f64,
    options: &IngestOptions,
) -> Option<WordRecord> {
    let raw = words::split_tsv_fields(line)?;
    if options.word_level_only && raw.level != TSV_WORD_LEVEL {
        return None;
    }
    if let Some(min) = options.min_confidence {
        if raw.conf < min {
            return None;
        }
    }
    words::scale_word(&raw, page_width, page_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
        5\t1\t1\t1\t1\t1\t32\t64\t32\t64\t90\tThe\n\
        5\t1\t1\t1\t1\t2\t0\t0\t64\t128\t90\tGlitch\n\
        4\t1\t1\t1\t1\t0\t0\t64\t64\t32\t-1\t\n\
        5\t1\t1\t1\t1\t3\t16\t32\t16\t32\t40\tquick";

    #[test]
    fn test_ingest_skips_header_and_glitches() {
        let report = ingest_tsv(DOC, 64.0, 128.0, &IngestOptions::default()).unwrap();
        assert_eq!(report.lines_total, 5);
        // header, full-page glitch, empty-text line
        assert_eq!(report.lines_skipped, 3);
        assert_eq!(report.words.len(), 2);
        assert_eq!(report.words[0].text, "The");
        assert_eq!(report.words[1].text, "quick");
    }

    #[test]
    fn test_ingest_preserves_input_order() {
        let tsv = (0..20)
            .map(|i| format!("5\t1\t1\t1\t1\t{i}\t{}\t0\t10\t10\t90\tw{i}", i * 10))
            .collect::<Vec<_>>()
            .join("\n");
        let report = ingest_tsv(&tsv, 1.0, 1.0, &IngestOptions::default()).unwrap();
        let texts: Vec<&str> = report.words.iter().map(|w| w.text.as_str()).collect();
        let expected: Vec<String> = (0..20).map(|i| format!("w{i}")).collect();
        assert_eq!(texts, expected);
    }

    #[test]
    fn test_ingest_min_confidence_filter() {
        let options = IngestOptions::builder().min_confidence(60.0).build();
        let report = ingest_tsv(DOC, 64.0, 128.0, &options).unwrap();
        // "quick" has conf 40 and is filtered out
        assert_eq!(report.words.len(), 1);
        assert_eq!(report.words[0].text, "The");
    }

    #[test]
    fn test_ingest_word_level_filter() {
        let tsv = "3\t1\t1\t1\t1\t0\t10\t10\t10\t10\t95\tParagraph\n\
            5\t1\t1\t1\t1\t1\t10\t10\t10\t10\t95\tHello";
        let options = IngestOptions::builder().word_level_only(true).build();
        let report = ingest_tsv(tsv, 1.0, 1.0, &options).unwrap();
        assert_eq!(report.words.len(), 1);
        assert_eq!(report.words[0].text, "Hello");
    }

    #[test]
    fn test_ingest_rejects_bad_dimensions() {
        let result = ingest_tsv(DOC, 0.0, 128.0, &IngestOptions::default());
        assert!(matches!(result, Err(WordError::InvalidPageDimensions(_, _))));
    }

    #[test]
    fn test_builder_clamping() {
        let options = IngestOptions::builder().min_confidence(150.0).build();
        assert_eq!(options.min_confidence, Some(100.0));

        let options = IngestOptions::builder().min_confidence(-10.0).build();
        assert_eq!(options.min_confidence, Some(0.0));
    }

    #[test]
    fn test_accept_rate() {
        let report = ingest_tsv(DOC, 64.0, 128.0, &IngestOptions::default()).unwrap();
        assert_eq!(report.accept_rate(), 2.0 / 5.0);
        assert_eq!(IngestReport::default().accept_rate(), 0.0);
    }

    #[test]
    fn test_ingest_page_attaches_normalized_words() {
        let mut page = Page::new(1, 1, 64, 128);
        let report = ingest_page(&mut page, DOC, &IngestOptions::default()).unwrap();
        assert_eq!(report.words.len(), 2);
        assert_eq!(page.words[0].x1, 0.5);
        assert_eq!(page.words[0].y1, 0.5);
        assert_eq!(page.words[0].x2, 1.0);
        assert_eq!(page.words[0].y2, 1.0);
    }
}
