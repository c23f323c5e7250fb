//! CLI: extract label coordinates from the care-plan template
//!
//! Runs the whole pipeline over one PDF and writes the three artifacts
//! (raw coordinates, field mapping, TypeScript table) into the output
//! directory, then prints the row-by-row diagnostic dump for manual
//! coordinate verification.

use form_coordmap::codegen::fmt_num;
use form_coordmap::{analyze_form, print_page_rows, write_artifacts};
use std::env;
use std::io;
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <pdf_file> [output_dir]", args[0]);
        eprintln!();
        eprintln!("Extracts text positions from the care-plan PDF template and");
        eprintln!("derives per-field data-entry coordinates. Writes:");
        eprintln!("  ncp-pdf-coordinates.json  - all words with both coordinate systems");
        eprintln!("  ncp-field-mapping.json    - field name -> inferred coordinate");
        eprintln!("  ncp-coordinates.ts        - constant table for the PDF writer");
        process::exit(1);
    }

    let pdf_path = &args[1];
    let out_dir = args.get(2).map(String::as_str).unwrap_or(".");

    println!("Extracting coordinates from the care-plan PDF...");
    println!("{}", "=".repeat(80));

    let analysis = match analyze_form(pdf_path) {
        Ok(analysis) => analysis,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    println!("PDF has {} pages", analysis.pages.len());
    if let Some(first) = analysis.pages.first() {
        println!(
            "Page size: {} x {} points",
            fmt_num(first.width),
            fmt_num(first.height)
        );
    }
    println!("{}", "-".repeat(80));

    for page in &analysis.pages {
        println!();
        println!("PAGE {}:", page.page + 1);
        println!("  Text elements: {}", page.elements.len());
        println!("  Tables found: {}", page.tables_count);
    }

    let artifacts = match write_artifacts(Path::new(out_dir), &analysis.pages, &analysis.fields) {
        Ok(artifacts) => artifacts,
        Err(e) => {
            eprintln!("Error writing artifacts: {}", e);
            process::exit(1);
        }
    };

    println!();
    println!("Raw coordinate data saved to: {}", artifacts.coordinates.display());
    println!("Field mapping saved to: {} ({} fields)", artifacts.mapping.display(), analysis.fields.len());
    println!("TypeScript mapping saved to: {}", artifacts.typescript.display());

    let stdout = io::stdout();
    if let Err(e) = print_page_rows(&mut stdout.lock(), &analysis.pages) {
        eprintln!("Error printing page analysis: {}", e);
        process::exit(1);
    }

    println!();
    println!("{}", "=".repeat(80));
    println!("COORDINATE EXTRACTION COMPLETE");
    println!("{}", "=".repeat(80));
    println!();
    println!("Next steps:");
    println!("1. Review {} for all text positions", artifacts.coordinates.display());
    println!("2. Review {} for field locations", artifacts.mapping.display());
    println!("3. Copy the generated table into the PDF-generation module");
}
