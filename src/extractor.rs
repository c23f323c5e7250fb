//! Word extraction from the template PDF using lopdf
//!
//! Walks each page's content stream tracking the graphics and text state,
//! and turns every show-text operator into a [`Word`] with a top-left-origin
//! bounding box. Also counts line/rectangle drawing operators, which the
//! table counter uses as form-grid evidence.
//!
//! Glyph widths are estimated from an average advance of 0.5 em; exact
//! right edges would need per-font metrics.

use crate::{tables, MapError};
use lopdf::{Document, Object, ObjectId};
use std::path::Path;

/// Average glyph advance as a fraction of the font size, used to estimate
/// word widths without font metrics.
const AVG_GLYPH_ADVANCE: f32 = 0.5;

/// Ascent/descent as fractions of the font size, used to estimate the
/// vertical extent of a word around its baseline.
const ASCENT: f32 = 0.8;
const DESCENT: f32 = 0.2;

/// A word with its bounding box in top-left-origin page coordinates
/// (y grows downward from the top edge), units in PDF points.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// The text content
    pub text: String,
    /// Left edge
    pub x0: f32,
    /// Right edge (estimated from average glyph advance)
    pub x1: f32,
    /// Distance from the page top to the word's top edge
    pub top: f32,
    /// Distance from the page top to the word's bottom edge
    pub bottom: f32,
}

/// A rectangle drawn on the page, bottom-left-origin PDF coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Raw extraction result for one page, before coordinate normalization.
#[derive(Debug, Clone)]
pub struct RawPage {
    /// Zero-based page index, in document order
    pub index: usize,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Words in content-stream order
    pub words: Vec<Word>,
    /// Count of line-segment drawing operators
    pub lines_count: usize,
    /// Rectangles drawn on the page (borders, cells, checkboxes)
    pub rects: Vec<Rect>,
}

/// Extract all pages from a PDF file, in document order
pub fn extract_pages<P: AsRef<Path>>(path: P) -> Result<Vec<RawPage>, MapError> {
    let doc = Document::load(path)?;
    extract_pages_from_doc(&doc)
}

/// Extract all pages from a PDF already in memory
pub fn extract_pages_mem(buffer: &[u8]) -> Result<Vec<RawPage>, MapError> {
    let doc = Document::load_mem(buffer)?;
    extract_pages_from_doc(&doc)
}

fn extract_pages_from_doc(doc: &Document) -> Result<Vec<RawPage>, MapError> {
    let mut pages = Vec::new();

    // get_pages returns a BTreeMap keyed by 1-based page number,
    // so iteration order is document order.
    for (page_num, &page_id) in doc.get_pages().iter() {
        let index = (*page_num as usize).saturating_sub(1);
        pages.push(extract_page(doc, page_id, index)?);
    }

    Ok(pages)
}

/// Resolve the page's MediaBox, walking up the page tree if it is inherited.
/// Falls back to US Letter when absent; the tool targets a Letter-size form.
fn page_size(doc: &Document, page_id: ObjectId) -> (f32, f32) {
    let mut current = Some(page_id);

    while let Some(id) = current {
        let Ok(dict) = doc.get_dictionary(id) else {
            break;
        };

        if let Ok(obj) = dict.get(b"MediaBox") {
            let obj = match obj.as_reference() {
                Ok(r) => doc.get_object(r).unwrap_or(obj),
                Err(_) => obj,
            };
            if let Ok(arr) = obj.as_array() {
                if arr.len() == 4 {
                    let nums: Vec<f32> = arr.iter().filter_map(get_number).collect();
                    if nums.len() == 4 {
                        return (nums[2] - nums[0], nums[3] - nums[1]);
                    }
                }
            }
        }

        current = dict.get(b"Parent").ok().and_then(|p| p.as_reference().ok());
    }

    log::warn!("page {:?} has no usable MediaBox, assuming US Letter", page_id);
    (612.0, 792.0)
}

/// Multiply two 2D transformation matrices
/// Matrix format: [a, b, c, d, e, f] representing:
/// | a  b  0 |
/// | c  d  0 |
/// | e  f  1 |
fn multiply_matrices(m1: &[f32; 6], m2: &[f32; 6]) -> [f32; 6] {
    [
        m1[0] * m2[0] + m1[1] * m2[2],
        m1[0] * m2[1] + m1[1] * m2[3],
        m1[2] * m2[0] + m1[3] * m2[2],
        m1[2] * m2[1] + m1[3] * m2[3],
        m1[4] * m2[0] + m1[5] * m2[2] + m2[4],
        m1[4] * m2[1] + m1[5] * m2[3] + m2[5],
    ]
}

/// Walk one page's content stream and collect words plus drawn geometry
fn extract_page(doc: &Document, page_id: ObjectId, index: usize) -> Result<RawPage, MapError> {
    use lopdf::content::Content;

    let (page_width, page_height) = page_size(doc, page_id);

    let mut words = Vec::new();
    let mut lines_count = 0usize;
    let mut rects = Vec::new();

    // Fonts for text decoding
    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();

    let content_data = doc.get_page_content(page_id)?;
    let content = Content::decode(&content_data)?;

    // Graphics state tracking
    let mut ctm = [1.0f32, 0.0, 0.0, 1.0, 0.0, 0.0]; // Current Transformation Matrix
    let mut ctm_stack: Vec<[f32; 6]> = Vec::new();

    // Text state tracking
    let mut current_font = String::new();
    let mut current_font_size: f32 = 12.0;
    let mut text_matrix = [1.0f32, 0.0, 0.0, 1.0, 0.0, 0.0];
    let mut line_matrix = [1.0f32, 0.0, 0.0, 1.0, 0.0, 0.0];
    let mut in_text_block = false;

    let mut push_word = |text: String, text_matrix: &[f32; 6], ctm: &[f32; 6], size: f32| {
        if text.trim().is_empty() {
            return;
        }
        let combined = multiply_matrices(text_matrix, ctm);
        let rendered_size = effective_font_size(size, &combined);
        let (x, y) = (combined[4], combined[5]);
        words.push(make_word(text, x, y, rendered_size, page_height));
    };

    for op in &content.operations {
        match op.operator.as_str() {
            "q" => {
                // Save graphics state
                ctm_stack.push(ctm);
            }
            "Q" => {
                // Restore graphics state
                if let Some(saved) = ctm_stack.pop() {
                    ctm = saved;
                }
            }
            "cm" => {
                // Concatenate matrix to CTM
                if op.operands.len() >= 6 {
                    let new_matrix = [
                        get_number(&op.operands[0]).unwrap_or(1.0),
                        get_number(&op.operands[1]).unwrap_or(0.0),
                        get_number(&op.operands[2]).unwrap_or(0.0),
                        get_number(&op.operands[3]).unwrap_or(1.0),
                        get_number(&op.operands[4]).unwrap_or(0.0),
                        get_number(&op.operands[5]).unwrap_or(0.0),
                    ];
                    ctm = multiply_matrices(&new_matrix, &ctm);
                }
            }
            "l" => {
                // Line segment (table borders, underlines for blanks)
                lines_count += 1;
            }
            "re" => {
                // Rectangle (cell borders, checkboxes)
                if op.operands.len() >= 4 {
                    let x = get_number(&op.operands[0]).unwrap_or(0.0);
                    let y = get_number(&op.operands[1]).unwrap_or(0.0);
                    let w = get_number(&op.operands[2]).unwrap_or(0.0);
                    let h = get_number(&op.operands[3]).unwrap_or(0.0);
                    rects.push(transform_rect(x, y, w, h, &ctm));
                }
            }
            "BT" => {
                // Begin text block
                in_text_block = true;
                text_matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
                line_matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
            }
            "ET" => {
                // End text block
                in_text_block = false;
            }
            "Tf" => {
                // Set font and size
                if op.operands.len() >= 2 {
                    if let Ok(name) = op.operands[0].as_name() {
                        current_font = String::from_utf8_lossy(name).to_string();
                    }
                    if let Ok(size) = op.operands[1].as_f32() {
                        current_font_size = size;
                    } else if let Ok(size) = op.operands[1].as_i64() {
                        current_font_size = size as f32;
                    }
                }
            }
            "Td" | "TD" => {
                // Move text position
                if op.operands.len() >= 2 {
                    let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                    line_matrix[4] += tx;
                    line_matrix[5] += ty;
                    text_matrix = line_matrix;
                }
            }
            "Tm" => {
                // Set text matrix
                if op.operands.len() >= 6 {
                    for (i, operand) in op.operands.iter().take(6).enumerate() {
                        text_matrix[i] =
                            get_number(operand).unwrap_or(if i == 0 || i == 3 { 1.0 } else { 0.0 });
                    }
                    line_matrix = text_matrix;
                }
            }
            "T*" => {
                // Move to start of next line
                line_matrix[5] -= current_font_size * 1.2; // Approximate line height
                text_matrix = line_matrix;
            }
            "Tj" => {
                // Show text string
                if in_text_block && !op.operands.is_empty() {
                    if let Some(text) =
                        decode_text_operand(&op.operands[0], doc, &fonts, &current_font)
                    {
                        push_word(text, &text_matrix, &ctm, current_font_size);
                    }
                }
            }
            "TJ" => {
                // Show text with positioning; adjacent strings form one word
                if in_text_block && !op.operands.is_empty() {
                    if let Ok(array) = op.operands[0].as_array() {
                        let mut combined_text = String::new();
                        for item in array {
                            if let Some(text) =
                                decode_text_operand(item, doc, &fonts, &current_font)
                            {
                                combined_text.push_str(&text);
                            }
                        }
                        push_word(combined_text, &text_matrix, &ctm, current_font_size);
                    }
                }
            }
            "'" | "\"" => {
                // Move to next line and show text; the quote variant carries
                // word/char spacing operands before the string
                line_matrix[5] -= current_font_size * 1.2;
                text_matrix = line_matrix;
                if let Some(operand) = op.operands.last() {
                    if let Some(text) = decode_text_operand(operand, doc, &fonts, &current_font) {
                        push_word(text, &text_matrix, &ctm, current_font_size);
                    }
                }
            }
            _ => {}
        }
    }

    log::debug!(
        "page {}: {} words, {} lines, {} rects",
        index + 1,
        words.len(),
        lines_count,
        rects.len()
    );

    Ok(RawPage {
        index,
        width: page_width,
        height: page_height,
        words,
        lines_count,
        rects,
    })
}

/// Build a Word from a baseline position in PDF (bottom-left) space,
/// converting the vertical extent to top-left-origin coordinates.
fn make_word(text: String, x: f32, y: f32, font_size: f32, page_height: f32) -> Word {
    let est_width = text.chars().count() as f32 * font_size * AVG_GLYPH_ADVANCE;
    Word {
        x0: x,
        x1: x + est_width,
        top: page_height - (y + font_size * ASCENT),
        bottom: page_height - (y - font_size * DESCENT),
        text,
    }
}

/// Apply the CTM to a rectangle, ignoring rotation (form grids are axis
/// aligned)
fn transform_rect(x: f32, y: f32, w: f32, h: f32, ctm: &[f32; 6]) -> Rect {
    Rect {
        x: ctm[0] * x + ctm[2] * y + ctm[4],
        y: ctm[1] * x + ctm[3] * y + ctm[5],
        width: w * ctm[0].abs(),
        height: h * ctm[3].abs(),
    }
}

/// Helper to get f32 from Object
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Compute effective font size from base size and combined matrix
/// Matrix is [a, b, c, d, tx, ty] where a,d are scale factors
fn effective_font_size(base_size: f32, matrix: &[f32; 6]) -> f32 {
    let scale_x = (matrix[0].powi(2) + matrix[1].powi(2)).sqrt();
    let scale_y = (matrix[2].powi(2) + matrix[3].powi(2)).sqrt();
    // The larger of the two scales (usually they're equal for non-rotated text)
    let scale = scale_x.max(scale_y);
    base_size * scale
}

/// Extract text from a text operand, handling encoding
fn decode_text_operand(
    obj: &Object,
    doc: &Document,
    fonts: &std::collections::BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    current_font: &str,
) -> Option<String> {
    if let Object::String(bytes, _) = obj {
        // Try to decode using font encoding
        if let Some(font_dict) = fonts.get(current_font.as_bytes()) {
            if let Ok(encoding) = font_dict.get_font_encoding(doc) {
                if let Ok(text) = Document::decode_text(&encoding, bytes) {
                    return Some(text);
                }
            }
        }

        // Fallback: try UTF-16BE then Latin-1
        if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
            let utf16: Vec<u16> = bytes[2..]
                .chunks_exact(2)
                .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
                .collect();
            return Some(String::from_utf16_lossy(&utf16));
        }

        // Latin-1 fallback
        Some(bytes.iter().map(|&b| b as char).collect())
    } else {
        None
    }
}

impl RawPage {
    /// Count of table-like grid regions among this page's rectangles
    pub fn tables_count(&self) -> usize {
        tables::detect_table_regions(&self.rects).len()
    }
}
