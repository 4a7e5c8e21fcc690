//! Word parser core types
//!
//! Data structures for Tesseract TSV word-level output and the normalized
//! word records derived from it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Number of tab-separated fields in a Tesseract word-level TSV line
pub const TSV_FIELD_COUNT: usize = 12;

/// Tesseract hierarchy level that denotes a word entry
pub const TSV_WORD_LEVEL: u32 = 5;

/// Field index of the box left edge (pixels)
pub const FIELD_LEFT: usize = 6;

/// Field index of the box top edge (pixels)
pub const FIELD_TOP: usize = 7;

/// Field index of the box width (pixels)
pub const FIELD_WIDTH: usize = 8;

/// Field index of the box height (pixels)
pub const FIELD_HEIGHT: usize = 9;

/// Field index of the recognition confidence
pub const FIELD_CONF: usize = 10;

/// Field index of the recognized text
pub const FIELD_TEXT: usize = 11;

// ============================================================
// Error Types
// ============================================================

/// Word ingestion error types
#[derive(Debug, Error)]
pub enum WordError {
    #[error("Page dimensions must be positive: {0}x{1}")]
    InvalidPageDimensions(f64, f64),
}

pub type Result<T> = std::result::Result<T, WordError>;

// ============================================================
// Core Data Structures
// ============================================================

/// A single recognized word with its bounding box.
///
/// Coordinates are fractions of the page dimensions in `[0, 1]` when the
/// page size was supplied at parse time, or raw pixels when the caller
/// passed a dimension of `1` to opt out of scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    /// Recognized text, surrounding whitespace trimmed
    pub text: String,
    /// Left edge
    pub x1: f64,
    /// Top edge
    pub y1: f64,
    /// Right edge
    pub x2: f64,
    /// Bottom edge
    pub y2: f64,
}

impl WordRecord {
    /// Box width in the record's coordinate space
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Box height in the record's coordinate space
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Box area
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Center point of the box
    pub fn center(&self) -> (f64, f64) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }
}

/// One raw word row of a Tesseract TSV document, before scaling.
///
/// Intermediate form produced by field validation; `level` and `conf`
/// are retained so the ingest layer can filter on them.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTsvWord {
    pub level: u32,
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
    pub conf: f32,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_record_geometry() {
        let word = WordRecord {
            text: "The".to_string(),
            x1: 0.25,
            y1: 0.5,
            x2: 0.75,
            y2: 1.0,
        };
        assert_eq!(word.width(), 0.5);
        assert_eq!(word.height(), 0.5);
        assert_eq!(word.area(), 0.25);
        assert_eq!(word.center(), (0.5, 0.75));
    }

    #[test]
    fn test_word_record_serde_roundtrip() {
        let word = WordRecord {
            text: "ipsum".to_string(),
            x1: 0.1,
            y1: 0.2,
            x2: 0.3,
            y2: 0.4,
        };
        let json = serde_json::to_string(&word).unwrap();
        let back: WordRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(word, back);
    }

    #[test]
    fn test_error_types() {
        let err = WordError::InvalidPageDimensions(0.0, 600.0);
        assert_eq!(err.to_string(), "Page dimensions must be positive: 0x600");
    }
}
