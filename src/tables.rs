//! Table counting from drawn page geometry
//!
//! The care-plan template draws its tables as grids of cell rectangles.
//! Rectangles are clustered into vertical regions, and a region counts as
//! a table when its cells line up in at least a 2x2 grid.

use crate::extractor::Rect;

/// Vertical gap (points) that splits rectangles into separate regions
const REGION_GAP: f32 = 18.0;

/// Snap tolerance when collapsing near-equal cell edges
const EDGE_TOLERANCE: f32 = 3.0;

/// Cell size limits; rules out hairline strokes and full-page frames
const MIN_CELL_SIZE: f32 = 4.0;
const MAX_CELL_SIZE: f32 = 560.0;

/// A detected grid region
#[derive(Debug, Clone, PartialEq)]
pub struct TableRegion {
    /// Distinct column left edges, ascending
    pub columns: Vec<f32>,
    /// Distinct row bottom edges, ascending
    pub rows: Vec<f32>,
    /// Number of cell rectangles in the region
    pub cell_count: usize,
}

/// Detect table-like grid regions among a page's rectangles
pub fn detect_table_regions(rects: &[Rect]) -> Vec<TableRegion> {
    let cells: Vec<&Rect> = rects.iter().filter(|r| is_cell_like(r)).collect();
    if cells.len() < 4 {
        return vec![];
    }

    let mut regions = Vec::new();
    for group in split_into_regions(&cells) {
        if let Some(region) = validate_region(&group) {
            regions.push(region);
        }
    }
    regions
}

fn is_cell_like(r: &Rect) -> bool {
    r.width >= MIN_CELL_SIZE
        && r.width <= MAX_CELL_SIZE
        && r.height >= MIN_CELL_SIZE
        && r.height <= MAX_CELL_SIZE
}

/// Split cell rects into vertical bands separated by large y-gaps
fn split_into_regions<'a>(cells: &[&'a Rect]) -> Vec<Vec<&'a Rect>> {
    let mut sorted: Vec<&Rect> = cells.to_vec();
    sorted.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal));

    let mut regions: Vec<Vec<&Rect>> = Vec::new();
    let mut current: Vec<&Rect> = Vec::new();
    let mut prev_top: Option<f32> = None;

    for rect in sorted {
        let starts_new = prev_top.map_or(false, |top| rect.y - top > REGION_GAP);
        if starts_new && !current.is_empty() {
            regions.push(std::mem::take(&mut current));
        }
        prev_top = Some(prev_top.unwrap_or(f32::NEG_INFINITY).max(rect.y + rect.height));
        current.push(rect);
    }
    if !current.is_empty() {
        regions.push(current);
    }
    regions
}

/// A region is a table when its cells form at least a 2x2 grid
fn validate_region(cells: &[&Rect]) -> Option<TableRegion> {
    if cells.len() < 4 {
        return None;
    }

    let columns = distinct_edges(cells.iter().map(|r| r.x));
    let rows = distinct_edges(cells.iter().map(|r| r.y));

    if columns.len() >= 2 && rows.len() >= 2 {
        Some(TableRegion {
            columns,
            rows,
            cell_count: cells.len(),
        })
    } else {
        None
    }
}

/// Collapse a set of edge positions into distinct values, ascending
fn distinct_edges(values: impl Iterator<Item = f32>) -> Vec<f32> {
    let mut sorted: Vec<f32> = values.collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut distinct: Vec<f32> = Vec::new();
    for v in sorted {
        if distinct.last().map_or(true, |&last| v - last > EDGE_TOLERANCE) {
            distinct.push(v);
        }
    }
    distinct
}
