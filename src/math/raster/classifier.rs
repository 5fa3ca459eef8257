// src/math/raster/classifier.rs

use crate::math::raster::mask::RasterMask;
use crate::math::types::*;

/// Halboffenes Rechteck `[x0, x1) × [y0, y1)` in Raster-Indizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterRect {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl RasterRect {
    pub fn area(&self) -> u32 {
        ((self.x1 - self.x0) * (self.y1 - self.y0)) as u32
    }
}

/// Erosionstest: Eine Gitterzelle ist genau dann "innen", wenn jede
/// Raster-Zelle unter ihrem Footprint belegt ist. O(1) über die Prefix-Summen.
#[derive(Debug, Clone, Copy)]
pub struct CellClassifier<'a> {
    mask: &'a RasterMask,
    spacing: f64,
    epsilon: f64,
}

impl<'a> CellClassifier<'a> {
    pub fn new(mask: &'a RasterMask, spacing: f64, epsilon: f64) -> Self {
        Self {
            mask,
            spacing,
            epsilon,
        }
    }

    pub fn mask(&self) -> &'a RasterMask {
        self.mask
    }

    /// Raster-Indizes des Footprints (Quadrat der Kantenlänge `spacing` um
    /// `center`). `None`, wenn der Footprint über das Raster hinausragt oder leer ist.
    pub fn footprint(&self, center: Point2D) -> Option<RasterRect> {
        let frame = self.mask.frame();
        let half = self.spacing * 0.5;
        let to_raster_x = |x: f64| (x - frame.origin.x) / frame.cell_size;
        let to_raster_y = |y: f64| (y - frame.origin.y) / frame.cell_size;

        let x0 = (to_raster_x(center.x - half) + self.epsilon).floor();
        let x1 = (to_raster_x(center.x + half) - self.epsilon).ceil();
        let y0 = (to_raster_y(center.y - half) + self.epsilon).floor();
        let y1 = (to_raster_y(center.y + half) - self.epsilon).ceil();

        // NaN scheitert an jedem dieser Vergleiche ebenfalls
        if !(x0 >= 0.0 && y0 >= 0.0 && x1 <= frame.width as f64 && y1 <= frame.height as f64) {
            return None;
        }
        if !(x0 < x1 && y0 < y1) {
            return None;
        }

        Some(RasterRect {
            x0: x0 as usize,
            y0: y0 as usize,
            x1: x1 as usize,
            y1: y1 as usize,
        })
    }

    /// Liegt die Gitterzelle mit Zentrum `center` (gitter-lokal) vollständig in der Region?
    #[inline]
    pub fn is_inside_at(&self, center: Point2D) -> bool {
        match self.footprint(center) {
            Some(rect) => {
                self.mask
                    .prefix_sum()
                    .rect_sum(rect.x0, rect.y0, rect.x1, rect.y1)
                    == rect.area()
            }
            None => false,
        }
    }

    /// Wie `is_inside_at`, für Gitterzelle `index` mit Sub-Zellen-Offset.
    #[inline]
    pub fn is_index_inside(&self, index: GridIndex, offset: Point2D) -> bool {
        self.is_inside_at(Point2D::new(
            (index.x as f64 + 0.5) * self.spacing + offset.x,
            (index.y as f64 + 0.5) * self.spacing + offset.y,
        ))
    }
}
