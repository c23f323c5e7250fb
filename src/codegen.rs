//! Artifact emission: JSON dumps plus the generated TypeScript table
//!
//! Pure serialization; every run fully overwrites the three artifacts.

use crate::locator::FieldMapping;
use crate::normalize::PageData;
use crate::MapError;
use std::fs;
use std::path::{Path, PathBuf};

/// File names the downstream module's instructions refer to
pub const COORDINATES_FILE: &str = "ncp-pdf-coordinates.json";
pub const MAPPING_FILE: &str = "ncp-field-mapping.json";
pub const TS_FILE: &str = "ncp-coordinates.ts";

/// Paths of the three artifacts written by [`write_artifacts`].
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub coordinates: PathBuf,
    pub mapping: PathBuf,
    pub typescript: PathBuf,
}

/// Write raw page data, the field mapping, and the TypeScript snippet
/// into `out_dir`
pub fn write_artifacts(
    out_dir: &Path,
    pages: &[PageData],
    fields: &FieldMapping,
) -> Result<Artifacts, MapError> {
    let artifacts = Artifacts {
        coordinates: out_dir.join(COORDINATES_FILE),
        mapping: out_dir.join(MAPPING_FILE),
        typescript: out_dir.join(TS_FILE),
    };

    fs::write(&artifacts.coordinates, serde_json::to_string_pretty(pages)?)?;
    fs::write(&artifacts.mapping, serde_json::to_string_pretty(fields)?)?;
    fs::write(&artifacts.typescript, generate_ts_mapping(pages, fields))?;

    Ok(artifacts)
}

/// Generate the TypeScript constant table for the PDF-generation module.
///
/// Declares page dimensions from the first page and one entry per matched
/// field, in mapping order. Generated text only; never compiled here.
pub fn generate_ts_mapping(pages: &[PageData], fields: &FieldMapping) -> String {
    let mut ts = Vec::new();
    ts.push("// Auto-generated NCP PDF coordinate mapping".to_string());
    ts.push("// Generated from the care-plan template analysis".to_string());
    ts.push(String::new());
    ts.push("// Page dimensions (Letter size)".to_string());

    if let Some(first) = pages.first() {
        ts.push(format!("const PAGE_WIDTH = {};", fmt_num(first.width)));
        ts.push(format!("const PAGE_HEIGHT = {};", fmt_num(first.height)));
    }

    ts.push(String::new());
    ts.push("// Field coordinates (x, y from bottom-left origin)".to_string());
    ts.push("const NCP_FIELD_COORDS = {".to_string());

    for (field_name, coords) in fields {
        ts.push(format!(
            "  {}: {{ page: {}, x: {}, y: {} }},",
            field_name,
            coords.page,
            fmt_num(coords.data_x),
            fmt_num(coords.data_y)
        ));
    }

    ts.push("};".to_string());

    ts.join("\n")
}

/// Format a coordinate the way the mapping has always read: values are
/// pre-rounded to one decimal, and integral values keep a trailing `.0`
pub fn fmt_num(v: f64) -> String {
    if v.fract().abs() < 1e-9 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}
