// src/math/raster/scanline.rs

//! Scanline-Füllung nach der Even-Odd-Regel.
//!
//! Eine Raster-Zelle gilt als belegt, wenn ihr Zentroid in der Region liegt.
//! Die Kreuzungen werden mit derselben halboffenen Regel berechnet wie
//! `RegionProperties::contains_point`, das Ergebnis ist daher zellgenau identisch.

use crate::math::geometry::region::{Region, RegionPolygon, properties::crossing_x};
use crate::math::raster::mask::RasterFrame;
use crate::math::types::Point2D;

#[derive(Debug, Clone, Copy)]
struct EdgeEntry {
    a: Point2D,
    b: Point2D,
    /// Erste Zeile, die die Kante schneiden kann
    row_start: usize,
    /// Zeile nach der letzten, die die Kante schneiden kann
    row_end: usize,
}

/// Füllt die Region (bereits im gitter-lokalen Raum) in ein neues Belegungsraster.
pub fn fill_even_odd(region: &Region, frame: &RasterFrame) -> Vec<u8> {
    let mut data = vec![0u8; frame.len()];
    let mut active = Vec::new();
    let mut crossings = Vec::new();

    // Region = Vereinigung: jedes Polygon separat füllen und odern
    for polygon in region.polygons() {
        fill_polygon(polygon, frame, &mut data, &mut active, &mut crossings);
    }

    data
}

/// Zeilenbereich (halboffen), in dem die Kante liegen kann, mit einer Zeile
/// Schlupf auf jeder Seite. Die exakte Entscheidung fällt später per `crossing_x`.
fn row_range(a: Point2D, b: Point2D, frame: &RasterFrame) -> Option<(usize, usize)> {
    let lo = a.y.min(b.y);
    let hi = a.y.max(b.y);
    if !(lo < hi) || !a.x.is_finite() || !b.x.is_finite() {
        return None; // horizontal oder nicht endlich
    }

    let to_row = |y: f64| ((y - frame.origin.y) / frame.cell_size - 0.5).ceil();
    let height = frame.height as f64;
    let start = (to_row(lo) - 1.0).clamp(0.0, height) as usize;
    let end = (to_row(hi) + 1.0).clamp(0.0, height) as usize;

    (start < end).then_some((start, end))
}

fn fill_polygon(
    polygon: &RegionPolygon,
    frame: &RasterFrame,
    data: &mut [u8],
    active: &mut Vec<EdgeEntry>,
    crossings: &mut Vec<f64>,
) {
    let mut edges: Vec<EdgeEntry> = polygon
        .edges()
        .filter_map(|(a, b)| {
            let (row_start, row_end) = row_range(a, b, frame)?;
            Some(EdgeEntry {
                a,
                b,
                row_start,
                row_end,
            })
        })
        .collect();
    if edges.is_empty() {
        return;
    }
    edges.sort_by_key(|edge| edge.row_start);

    active.clear();
    let mut next_edge = 0;

    for row in 0..frame.height {
        while next_edge < edges.len() && edges[next_edge].row_start <= row {
            active.push(edges[next_edge]);
            next_edge += 1;
        }
        active.retain(|edge| edge.row_end > row);
        if active.is_empty() {
            if next_edge == edges.len() {
                break;
            }
            continue;
        }

        let y = frame.row_center_y(row);
        crossings.clear();
        crossings.extend(
            active
                .iter()
                .filter_map(|edge| crossing_x(edge.a, edge.b, y))
                .filter(|x| x.is_finite()),
        );
        crossings.sort_by(f64::total_cmp);

        let row_cells = &mut data[row * frame.width..(row + 1) * frame.width];
        for span in crossings.chunks_exact(2) {
            let start = first_column_at_or_after(frame, span[0]);
            let end = first_column_at_or_after(frame, span[1]);
            if start < end {
                row_cells[start..end].fill(1);
            }
        }
    }
}

/// Kleinste Spalte, deren Zentrum `>= x` ist (oder `width`).
fn first_column_at_or_after(frame: &RasterFrame, x: f64) -> usize {
    let estimate = ((x - frame.origin.x) / frame.cell_size - 0.5).ceil();
    let mut column = estimate.clamp(0.0, frame.width as f64) as usize;

    // Rundungsfehler der Schätzung gegen den exakten Vergleich korrigieren
    while column > 0 && frame.column_center_x(column - 1) >= x {
        column -= 1;
    }
    while column < frame.width && frame.column_center_x(column) < x {
        column += 1;
    }
    column
}
