//! OCR word parsing module
//!
//! Parses Tesseract word-level TSV output into normalized word bounding
//! boxes. The single-line parser is the wire-format contract; document-level
//! scanning lives in [`crate::ingest`].

mod parse;
mod types;

pub use parse::{parse_tsv_line, split_tsv_fields};
pub(crate) use parse::scale_word;
pub use types::{
    RawTsvWord, Result, WordError, WordRecord, FIELD_CONF, FIELD_HEIGHT, FIELD_LEFT, FIELD_TEXT,
    FIELD_TOP, FIELD_WIDTH, TSV_FIELD_COUNT, TSV_WORD_LEVEL,
};
