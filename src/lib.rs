//! Coordinate mapping for the care-plan PDF template using lopdf
//!
//! This crate reverse-engineers the fixed care-plan form layout:
//! - Extracts words with bounding boxes from each page
//! - Normalizes them to bottom-left-origin (pdf-lib) coordinates
//! - Locates known form labels and estimates where field data belongs
//! - Emits JSON artifacts and a TypeScript coordinate table for the
//!   downstream PDF-generation module

pub mod codegen;
pub mod extractor;
pub mod locator;
pub mod normalize;
pub mod rows;
pub mod tables;

pub use codegen::{generate_ts_mapping, write_artifacts, Artifacts};
pub use extractor::{extract_pages, RawPage, Word};
pub use locator::{locate_fields, FieldCoordinate, FieldMapping, LABEL_RULES};
pub use normalize::{build_page_data, normalize_word, NormalizedElement, PageData};
pub use rows::print_page_rows;

use std::path::Path;

/// Full analysis of one template: normalized pages plus the field mapping.
#[derive(Debug)]
pub struct FormAnalysis {
    /// One entry per page, in document order
    pub pages: Vec<PageData>,
    /// field_name -> inferred coordinate, insertion order preserved
    pub fields: FieldMapping,
}

/// Run the whole pipeline over one PDF file
///
/// Extracts words per page, normalizes coordinates, and scans for known
/// labels. Fails fast on an unreadable or malformed PDF; produces no
/// partial result.
pub fn analyze_form<P: AsRef<Path>>(path: P) -> Result<FormAnalysis, MapError> {
    let raw_pages = extract_pages(path)?;

    let pages: Vec<PageData> = raw_pages.iter().map(build_page_data).collect();
    let fields = locate_fields(&pages);

    log::debug!(
        "analyzed {} pages, matched {} of {} labels",
        pages.len(),
        fields.len(),
        LABEL_RULES.len()
    );

    Ok(FormAnalysis { pages, fields })
}

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parsing error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
