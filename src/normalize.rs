//! Coordinate normalization for the downstream pdf-lib writer
//!
//! Extracted words carry top-left-origin boxes; pdf-lib draws from the
//! bottom-left corner. Every element therefore carries both systems,
//! rounded to one decimal.

use crate::extractor::{RawPage, Word};
use serde::Serialize;

/// A word plus its derived bottom-left-origin (pdf-lib) coordinates.
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedElement {
    pub text: String,
    /// Left edge
    pub x0: f64,
    /// Right edge
    pub x1: f64,
    /// Top edge (from top of page)
    pub top: f64,
    /// Bottom edge (from top of page)
    pub bottom: f64,
    /// Same as x0; pdf-lib x origin is also the left edge
    pub pdf_lib_x: f64,
    /// Distance from the page bottom up to the word's bottom edge
    pub pdf_lib_y: f64,
}

/// Everything extracted from one page, normalized for inspection.
#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    /// Zero-based page index
    pub page: usize,
    pub width: f64,
    pub height: f64,
    pub elements: Vec<NormalizedElement>,
    pub lines_count: usize,
    pub rects_count: usize,
    pub tables_count: usize,
}

/// Round to one decimal place
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Convert a word's bounding box to both coordinate systems.
///
/// Pure function: `pdf_lib_x = x0`, `pdf_lib_y = page_height - bottom`,
/// all values rounded to one decimal.
pub fn normalize_word(word: &Word, page_height: f32) -> NormalizedElement {
    NormalizedElement {
        text: word.text.clone(),
        x0: round1(word.x0 as f64),
        x1: round1(word.x1 as f64),
        top: round1(word.top as f64),
        bottom: round1(word.bottom as f64),
        pdf_lib_x: round1(word.x0 as f64),
        pdf_lib_y: round1((page_height - word.bottom) as f64),
    }
}

/// Assemble the normalized view of one raw page
pub fn build_page_data(raw: &RawPage) -> PageData {
    PageData {
        page: raw.index,
        width: round1(raw.width as f64),
        height: round1(raw.height as f64),
        elements: raw
            .words
            .iter()
            .map(|w| normalize_word(w, raw.height))
            .collect(),
        lines_count: raw.lines_count,
        rects_count: raw.rects.len(),
        tables_count: raw.tables_count(),
    }
}
