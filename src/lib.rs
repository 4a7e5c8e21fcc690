//! wordbox
//!
//! Data layer for a publication-annotation application: parses Tesseract
//! word-level TSV output into normalized bounding boxes, ingests whole OCR
//! jobs per page, and filters publications, pages, and annotations.
//!
//! The one wire-format contract is [`words::parse_tsv_line`]: one TSV row
//! in, one normalized [`words::WordRecord`] (or a skip) out. Everything
//! else builds on it.

pub mod annotations;
pub mod ingest;
pub mod words;

// Re-export public API
pub use annotations::{Annotation, AnnotationError, AnnotationStore, Page, Publication};
pub use ingest::{ingest_page, ingest_tsv, IngestOptions, IngestOptionsBuilder, IngestReport};
pub use words::{parse_tsv_line, WordError, WordRecord};
