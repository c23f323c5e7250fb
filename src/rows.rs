//! Row-by-row page dump for manual coordinate verification
//!
//! Elements are bucketed into visual rows by rounding `pdf_lib_y` to the
//! nearest multiple of 10, which absorbs small vertical jitter from the
//! extractor. Rows print top to bottom, elements left to right.

use crate::codegen::fmt_num;
use crate::normalize::{NormalizedElement, PageData};
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Truncate each word for display
const MAX_TEXT_CHARS: usize = 30;

/// Show at most this many elements per row
const MAX_ROW_ELEMENTS: usize = 5;

/// Print the detailed row analysis for every page
pub fn print_page_rows<W: Write>(out: &mut W, pages: &[PageData]) -> io::Result<()> {
    for page in pages {
        writeln!(out)?;
        writeln!(out, "{}", "=".repeat(80))?;
        writeln!(out, "PAGE {} DETAILED ANALYSIS", page.page + 1)?;
        writeln!(
            out,
            "Page size: {} x {} points",
            fmt_num(page.width),
            fmt_num(page.height)
        )?;
        writeln!(out, "{}", "=".repeat(80))?;

        // Rows print top to bottom: highest y first
        for (row_y, elements) in group_rows(&page.elements).into_iter().rev() {
            let mut sorted = elements;
            sorted.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(std::cmp::Ordering::Equal));

            let row_text: Vec<String> = sorted
                .iter()
                .take(MAX_ROW_ELEMENTS)
                .map(|e| e.text.chars().take(MAX_TEXT_CHARS).collect())
                .collect();
            writeln!(out, "Y={:>4}: {}", row_y, row_text.join(" | "))?;
        }
    }
    Ok(())
}

/// Bucket elements into rows keyed by pdf_lib_y rounded to the nearest 10
fn group_rows(elements: &[NormalizedElement]) -> BTreeMap<i64, Vec<&NormalizedElement>> {
    let mut rows: BTreeMap<i64, Vec<&NormalizedElement>> = BTreeMap::new();
    for element in elements {
        let row_y = (element.pdf_lib_y / 10.0).round() as i64 * 10;
        rows.entry(row_y).or_default().push(element);
    }
    rows
}
