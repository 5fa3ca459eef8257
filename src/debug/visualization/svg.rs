// src/debug/visualization/svg.rs
use crate::math::{
    geometry::Region,
    raster::RasterResult,
    types::{Bounds2D, GridIndex, Point2D},
};
use ::svg::Document;
use ::svg::node::element::{Circle, Group, Path, Polygon, Rectangle, Text};
use bevy::log::info;
use std::path::Path as FsPath;

mod colors {
    pub const BACKGROUND: &str = "#f0f0f0";
    pub const REGION_FILL: &str = "rgba(200, 150, 255, 0.35)";
    pub const REGION_STROKE: &str = "#5500aa";
    pub const INSIDE_CELL: &str = "rgba(150, 255, 150, 0.6)";
    pub const CELL_STROKE: &str = "#00aa00";
    pub const ORIGIN: &str = "#cc0000";
}

/// Region-Umrisse als ein Pfad; Löcher über `fill-rule: evenodd`
fn region_path(region: &Region, stroke_w: f64) -> Path {
    let mut d = String::new();
    for ring in region.polygons().iter().flat_map(|p| p.rings()) {
        if ring.is_degenerate() {
            continue;
        }
        for (i, p) in ring.points().iter().enumerate() {
            let command = if i == 0 { 'M' } else { 'L' };
            d.push_str(&format!("{command}{:.4},{:.4} ", p.x, p.y));
        }
        d.push_str("Z ");
    }

    Path::new()
        .set("d", d.trim_end().to_string())
        .set("fill", colors::REGION_FILL)
        .set("fill-rule", "evenodd")
        .set("stroke", colors::REGION_STROKE)
        .set("stroke-width", stroke_w)
}

fn cell_polygon(result: &RasterResult, index: GridIndex, stroke_w: f64) -> Polygon {
    let points = result
        .pose
        .cell_corners_world(index)
        .iter()
        .map(|p| format!("{:.4},{:.4}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ");

    Polygon::new()
        .set("points", points)
        .set("fill", colors::INSIDE_CELL)
        .set("stroke", colors::CELL_STROKE)
        .set("stroke-width", stroke_w)
}

/// Baut das Dokument: Region, innere Gitterzellen und Gitterursprung in
/// Weltkoordinaten (y nach oben).
pub fn raster_document(region: &Region, result: &RasterResult) -> Document {
    let mut bounds = region
        .bounds()
        .unwrap_or_else(|| Bounds2D::from_points(Point2D::ZERO, Point2D::ONE));
    bounds.expand_to_include_point(result.pose.origin);
    let bounds = bounds.expand(result.grid_spacing);

    let stroke_w = (bounds.width() + bounds.height()) / 2.0 * 0.002;

    // Zellen in Zeilenreihenfolge für eine stabile Ausgabe
    let mut cells: Vec<GridIndex> = result.inside_cells.iter().copied().collect();
    cells.sort_by_key(|c| (c.y, c.x));

    let mut world = Group::new()
        .set("transform", "scale(1,-1)")
        .add(region_path(region, stroke_w * 2.0));
    for index in cells {
        world = world.add(cell_polygon(result, index, stroke_w));
    }
    world = world.add(
        Circle::new()
            .set("cx", result.pose.origin.x)
            .set("cy", result.pose.origin.y)
            .set("r", stroke_w * 4.0)
            .set("fill", colors::ORIGIN),
    );

    let label = Text::new(format!(
        "{} cells, angle {:.3}°",
        result.grid_cell_count,
        result.pose.angle.to_degrees()
    ))
    .set("x", bounds.min.x + stroke_w * 5.0)
    .set("y", -bounds.max.y + stroke_w * 15.0)
    .set("font-family", "monospace")
    .set("font-size", stroke_w * 10.0);

    Document::new()
        .set(
            "viewBox",
            format!(
                "{} {} {} {}",
                bounds.min.x,
                -bounds.max.y,
                bounds.width(),
                bounds.height()
            ),
        )
        .add(
            Rectangle::new()
                .set("x", bounds.min.x)
                .set("y", -bounds.max.y)
                .set("width", bounds.width())
                .set("height", bounds.height())
                .set("fill", colors::BACKGROUND),
        )
        .add(world)
        .add(label)
}

/// Schreibt die Rasterisierung als SVG nach `path`.
pub fn write_raster_svg(
    path: impl AsRef<FsPath>,
    region: &Region,
    result: &RasterResult,
) -> std::io::Result<()> {
    let path = path.as_ref();
    let document = raster_document(region, result);
    ::svg::save(path, &document)?;
    info!(
        "SVG with {} inside cells written to {}",
        result.grid_cell_count,
        path.display()
    );
    Ok(())
}
