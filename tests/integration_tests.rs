//! Integration tests for the form coordinate mapper

use form_coordmap::codegen::{COORDINATES_FILE, MAPPING_FILE, TS_FILE};
use form_coordmap::{
    analyze_form, build_page_data, generate_ts_mapping, locate_fields, normalize_word,
    write_artifacts, MapError, NormalizedElement, PageData, Word, LABEL_RULES,
};
use std::path::Path;

// Helper to create synthetic words
fn make_word(text: &str, x0: f32, x1: f32, top: f32, bottom: f32) -> Word {
    Word {
        text: text.to_string(),
        x0,
        x1,
        top,
        bottom,
    }
}

fn make_element(text: &str, x0: f64, x1: f64, pdf_lib_y: f64) -> NormalizedElement {
    NormalizedElement {
        text: text.to_string(),
        x0,
        x1,
        top: 792.0 - pdf_lib_y - 12.0,
        bottom: 792.0 - pdf_lib_y,
        pdf_lib_x: x0,
        pdf_lib_y,
    }
}

fn make_page(index: usize, elements: Vec<NormalizedElement>) -> PageData {
    PageData {
        page: index,
        width: 612.0,
        height: 792.0,
        elements,
        lines_count: 0,
        rects_count: 0,
        tables_count: 0,
    }
}

// Build a one-page Letter PDF with the given text at (x, baseline_y) in
// 12pt Helvetica, plus a 2x2 grid of cell rects and one line segment.
fn build_test_pdf(path: &Path, text: &str, x: i64, baseline_y: i64) {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = vec![
        // A small 2x2 grid of cells and one underline segment
        Operation::new("re", vec![50.into(), 100.into(), 80.into(), 20.into()]),
        Operation::new("re", vec![130.into(), 100.into(), 80.into(), 20.into()]),
        Operation::new("re", vec![50.into(), 120.into(), 80.into(), 20.into()]),
        Operation::new("re", vec![130.into(), 120.into(), 80.into(), 20.into()]),
        Operation::new("S", vec![]),
        Operation::new("m", vec![200.into(), 300.into()]),
        Operation::new("l", vec![400.into(), 300.into()]),
        Operation::new("S", vec![]),
    ];
    operations.extend(vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("Td", vec![x.into(), baseline_y.into()]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]);

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("encode content"),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.save(path).expect("save test PDF");
}

// ============================================================================
// Normalizer properties
// ============================================================================

#[test]
fn test_pdf_lib_y_is_height_minus_bottom() {
    let word = make_word("anything", 10.0, 60.0, 95.5, 107.5);
    let element = normalize_word(&word, 792.0);
    assert_eq!(element.pdf_lib_y, 684.5);
    assert_eq!(element.pdf_lib_x, element.x0);
}

#[test]
fn test_element_count_matches_word_count() {
    let raw = form_coordmap::RawPage {
        index: 0,
        width: 612.0,
        height: 792.0,
        words: (0..37)
            .map(|i| make_word("w", 0.0, 5.0, i as f32 * 15.0, i as f32 * 15.0 + 12.0))
            .collect(),
        lines_count: 0,
        rects: vec![],
    };
    let page = build_page_data(&raw);
    assert_eq!(page.elements.len(), 37);
}

// ============================================================================
// Field locator scenario from the known template geometry
// ============================================================================

#[test]
fn test_single_label_scenario() {
    // One word "Resident's Name:" at x0=50, x1=150, top=100, bottom=112
    // on a 612x792 page: pdf_lib_y = 792 - 112 = 680.
    let word = make_word("Resident's Name:", 50.0, 150.0, 100.0, 112.0);
    let element = normalize_word(&word, 792.0);
    let page = make_page(0, vec![element]);

    let mapping = locate_fields(&[page]);
    let coord = &mapping["residentName"];
    assert_eq!(coord.page, 0);
    assert_eq!(coord.label_x, 50.0);
    assert_eq!(coord.label_y, 680.0);
    assert_eq!(coord.data_x, 155.0);
    assert_eq!(coord.data_y, 680.0);
    assert_eq!(coord.page_height, 792.0);
}

#[test]
fn test_duplicate_label_last_scan_wins() {
    let pages = vec![
        make_page(0, vec![make_element("ALLERGIES:", 50.0, 120.0, 600.0)]),
        make_page(1, vec![make_element("ALLERGIES: none", 70.0, 160.0, 300.0)]),
    ];
    let mapping = locate_fields(&pages);
    assert_eq!(mapping["allergies"].page, 1);
    assert_eq!(mapping["allergies"].label_text, "ALLERGIES: none");
    assert_eq!(mapping["allergies"].data_x, 165.0);
}

#[test]
fn test_every_label_rule_can_match() {
    // A page containing every known label verbatim matches every field once
    let elements: Vec<NormalizedElement> = LABEL_RULES
        .iter()
        .enumerate()
        .map(|(i, (label, _))| make_element(label, 50.0, 200.0, 700.0 - i as f64 * 20.0))
        .collect();
    let mapping = locate_fields(&[make_page(0, elements)]);
    assert_eq!(mapping.len(), LABEL_RULES.len());
    for (_, field_name) in LABEL_RULES {
        assert!(mapping.contains_key(*field_name), "missing {}", field_name);
    }
}

// ============================================================================
// Generated code
// ============================================================================

#[test]
fn test_generated_ts_structure() {
    let page = make_page(0, vec![make_element("Resident's Name:", 50.0, 150.0, 680.0)]);
    let mapping = locate_fields(&[page.clone()]);
    let ts = generate_ts_mapping(&[page], &mapping);

    assert!(ts.contains("const PAGE_WIDTH = 612.0;"));
    assert!(ts.contains("const PAGE_HEIGHT = 792.0;"));
    assert!(ts.contains("residentName: { page: 0, x: 155.0, y: 680.0 },"));
    assert!(ts.ends_with("};"));
}

// ============================================================================
// Error paths
// ============================================================================

#[test]
fn test_analyze_nonexistent_file() {
    assert!(analyze_form("/nonexistent/careplan.pdf").is_err());
}

#[test]
fn test_analyze_malformed_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.pdf");
    std::fs::write(&path, b"not a pdf at all").unwrap();
    let err = analyze_form(&path).unwrap_err();
    assert!(matches!(err, MapError::Pdf(_)), "got {:?}", err);
    assert!(err.to_string().starts_with("PDF parsing error"));
}

// ============================================================================
// End-to-end over a real (generated) PDF
// ============================================================================

#[test]
fn test_end_to_end_generated_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let pdf_path = dir.path().join("form.pdf");
    build_test_pdf(&pdf_path, "Resident's Name:", 50, 692);

    let analysis = analyze_form(&pdf_path).expect("pipeline over generated PDF");

    assert_eq!(analysis.pages.len(), 1);
    let page = &analysis.pages[0];
    assert_eq!(page.page, 0);
    assert_eq!(page.width, 612.0);
    assert_eq!(page.height, 792.0);
    assert_eq!(page.elements.len(), 1);
    assert_eq!(page.lines_count, 1);
    assert_eq!(page.rects_count, 4);
    assert_eq!(page.tables_count, 1);

    let element = &page.elements[0];
    // StandardEncoding decodes 0x27 as quoteright (U+2019); the locator
    // still matches the ASCII label table
    assert_eq!(element.text, "Resident\u{2019}s Name:");
    assert_eq!(element.x0, 50.0);
    // pdf_lib_y sits just under the baseline (descent estimate)
    assert!((element.pdf_lib_y - 692.0).abs() < 5.0);

    let coord = &analysis.fields["residentName"];
    assert_eq!(coord.page, 0);
    assert_eq!(coord.label_x, element.pdf_lib_x);
    assert_eq!(coord.label_y, element.pdf_lib_y);
    assert_eq!(coord.data_x, element.x1 + 5.0);
    assert_eq!(coord.data_y, element.pdf_lib_y);
    assert_eq!(coord.page_height, 792.0);
}

#[test]
fn test_end_to_end_artifacts_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let pdf_path = dir.path().join("form.pdf");
    build_test_pdf(&pdf_path, "Pronouns:", 60, 500);

    let first = analyze_form(&pdf_path).unwrap();
    write_artifacts(dir.path(), &first.pages, &first.fields).unwrap();
    let coords_1 = std::fs::read(dir.path().join(COORDINATES_FILE)).unwrap();
    let mapping_1 = std::fs::read(dir.path().join(MAPPING_FILE)).unwrap();
    let ts_1 = std::fs::read(dir.path().join(TS_FILE)).unwrap();

    let second = analyze_form(&pdf_path).unwrap();
    write_artifacts(dir.path(), &second.pages, &second.fields).unwrap();
    assert_eq!(coords_1, std::fs::read(dir.path().join(COORDINATES_FILE)).unwrap());
    assert_eq!(mapping_1, std::fs::read(dir.path().join(MAPPING_FILE)).unwrap());
    assert_eq!(ts_1, std::fs::read(dir.path().join(TS_FILE)).unwrap());

    // The mapping JSON is keyed by field name
    let mapping: serde_json::Value = serde_json::from_slice(&mapping_1).unwrap();
    assert!(mapping.get("pronouns").is_some());
    assert!(mapping["pronouns"]["data_y"].is_number());
}
