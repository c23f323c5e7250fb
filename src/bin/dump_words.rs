//! Debug tool: dump raw words with both coordinate systems
//!
//! Usage: dump-words <pdf_file> [max_page | min-max]

use form_coordmap::{build_page_data, extract_pages};
use std::env;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <pdf_file> [max_page | min-max]", args[0]);
        std::process::exit(1);
    }

    let range = args.get(2).map(|s| s.as_str()).unwrap_or("1-3");
    let (min_page, max_page) = if let Some((a, b)) = range.split_once('-') {
        (a.parse().unwrap_or(1), b.parse().unwrap_or(3))
    } else {
        (1usize, range.parse().unwrap_or(3))
    };

    let raw_pages = match extract_pages(&args[1]) {
        Ok(pages) => pages,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    for raw in &raw_pages {
        let page_num = raw.index + 1;
        if page_num < min_page || page_num > max_page {
            continue;
        }

        let page = build_page_data(raw);
        println!(
            "=== PAGE {} ({} words, {} lines, {} rects, {} tables) ===",
            page_num,
            page.elements.len(),
            page.lines_count,
            page.rects_count,
            page.tables_count
        );
        for e in &page.elements {
            println!(
                "  x0={:7.1} x1={:7.1} top={:7.1} bottom={:7.1} | pdf_lib=({:7.1},{:7.1}) text={:?}",
                e.x0, e.x1, e.top, e.bottom, e.pdf_lib_x, e.pdf_lib_y, e.text
            );
        }
        println!();
    }
}
