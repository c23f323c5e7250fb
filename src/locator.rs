//! Label matching and data-coordinate inference
//!
//! Scans the normalized elements of every page for the known form labels
//! and records an estimated data-entry position for each logical field:
//! on the same text row as the label, 5 points past its right edge.
//! Typographic quotes are collapsed to ASCII before matching, since font
//! encodings decode the template's apostrophes to U+2019.
//!
//! A word is the unit of match, so multi-word labels only hit when the
//! extractor kept the whole phrase as one token. Matches are not
//! deduplicated: a later occurrence (later page, or later in stream order
//! on the same page) silently overwrites an earlier one for the same
//! field. The map keeps insertion order, so the generated table reads in
//! first-seen order.

use crate::normalize::{NormalizedElement, PageData};
use indexmap::IndexMap;
use serde::Serialize;

/// Horizontal gap between a label's right edge and its data position
const DATA_X_OFFSET: f64 = 5.0;

/// Known form labels paired with the logical field they introduce.
/// Hand-authored against the care-plan template; matched case-insensitively
/// as substrings.
pub const LABEL_RULES: &[(&str, &str)] = &[
    // Page 1 - Resident Info
    ("Provider's Name:", "providerName"),
    ("Date NCP Started:", "ncpStartDate"),
    ("Moved In Date:", "movedInDate"),
    ("Date Completed:", "dateCompleted"),
    ("Date Discharged:", "dateDischarged"),
    ("Resident's Name:", "residentName"),
    ("Pronouns:", "pronouns"),
    ("Date of Birth/Age:", "dateOfBirth"),
    ("Primary Language:", "primaryLanguage"),
    ("Speaks English?", "speaksEnglish"),
    ("Interpreter needed?", "interpreterNeeded"),
    ("ALLERGIES:", "allergies"),
    ("Legal Documents:", "legalDocuments"),
    ("Specialty Needs:", "specialtyNeeds"),
    // Emergency Evacuation
    ("EVACUATION ASSISTANCE REQUIRED:", "evacuationSection"),
    (
        "RESIDENT'S EVACUATION and SAFETY INSTRUCTIONS:",
        "evacuationInstructions",
    ),
];

/// Where a logical field's data should be written, per the label heuristic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCoordinate {
    /// Zero-based page the label was found on
    pub page: usize,
    /// Full text of the matched element
    pub label_text: String,
    pub label_x: f64,
    pub label_y: f64,
    /// Estimated data position: just right of the label, same row
    pub data_x: f64,
    pub data_y: f64,
    pub page_height: f64,
}

/// field_name -> coordinate, insertion order preserved
pub type FieldMapping = IndexMap<String, FieldCoordinate>;

/// Scan all pages for known labels and infer field coordinates
///
/// Never fails; labels without a match are simply absent from the result,
/// which manual review of the emitted mapping is expected to catch.
pub fn locate_fields(pages: &[PageData]) -> FieldMapping {
    let rules: Vec<(String, &str)> = LABEL_RULES
        .iter()
        .map(|(label, field)| (label.to_lowercase(), *field))
        .collect();

    let mut mapping = FieldMapping::new();

    for page in pages {
        for element in &page.elements {
            let haystack = normalize_quotes(&element.text).to_lowercase();
            for (label_lower, field_name) in &rules {
                if haystack.contains(label_lower.as_str()) {
                    mapping.insert(
                        (*field_name).to_string(),
                        field_coordinate(page, element),
                    );
                }
            }
        }
    }

    mapping
}

/// Collapse typographic quotes to their ASCII forms before matching.
/// Font encodings render the template's apostrophes as U+2019, while the
/// label table holds ASCII.
fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            _ => c,
        })
        .collect()
}

fn field_coordinate(page: &PageData, element: &NormalizedElement) -> FieldCoordinate {
    FieldCoordinate {
        page: page.page,
        label_text: element.text.clone(),
        label_x: element.pdf_lib_x,
        label_y: element.pdf_lib_y,
        data_x: element.x1 + DATA_X_OFFSET,
        data_y: element.pdf_lib_y,
        page_height: page.height,
    }
}
