// src/math/raster/mask.rs

use crate::math::types::*;

/// Lage und Größe des Rasters im gitter-lokalen Raum.
///
/// Raster-Zelle `(x, y)` ist das Quadrat mit linker unterer Ecke
/// `origin + (x, y) · cell_size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterFrame {
    pub origin: Point2D,
    pub cell_size: f64,
    pub width: usize,
    pub height: usize,
}

impl RasterFrame {
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn column_center_x(&self, x: usize) -> f64 {
        self.origin.x + (x as f64 + 0.5) * self.cell_size
    }

    #[inline]
    pub fn row_center_y(&self, y: usize) -> f64 {
        self.origin.y + (y as f64 + 0.5) * self.cell_size
    }

    /// Zentroid der Raster-Zelle `(x, y)`
    pub fn cell_center(&self, x: usize, y: usize) -> Point2D {
        Point2D::new(self.column_center_x(x), self.row_center_y(y))
    }

    /// Ausdehnung des Rasters im gitter-lokalen Raum
    pub fn extent(&self) -> Bounds2D {
        Bounds2D::from_points(
            self.origin,
            self.origin
                + Point2D::new(self.width as f64, self.height as f64) * self.cell_size,
        )
    }
}

/// Summed-Area-Table: `at(x, y)` = Summe über `data[0..y)[0..x)`.
/// Eine zusätzliche Zeile und Spalte aus Nullen dient als Sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixSum {
    stride: usize,
    values: Vec<u32>,
}

impl PrefixSum {
    pub fn build(data: &[u8], width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        let stride = width + 1;
        let mut values = vec![0u32; stride * (height + 1)];

        for y in 0..height {
            let mut row_sum = 0u32;
            let row = &data[y * width..(y + 1) * width];
            for (x, &occupied) in row.iter().enumerate() {
                row_sum += occupied as u32;
                values[(y + 1) * stride + x + 1] = values[y * stride + x + 1] + row_sum;
            }
        }

        Self { stride, values }
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> u32 {
        self.values[y * self.stride + x]
    }

    /// Anzahl belegter Zellen im halboffenen Rechteck `[x0, x1) × [y0, y1)`.
    #[inline]
    pub fn rect_sum(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> u32 {
        (self.at(x1, y1) + self.at(x0, y0)) - (self.at(x1, y0) + self.at(x0, y1))
    }

    pub fn total(&self) -> u32 {
        self.values.last().copied().unwrap_or(0)
    }
}

/// Binäres Belegungsraster samt Prefix-Summen. Nach dem Bau unveränderlich.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterMask {
    frame: RasterFrame,
    data: Vec<u8>,
    prefix: PrefixSum,
}

impl RasterMask {
    pub fn new(frame: RasterFrame, data: Vec<u8>) -> Self {
        let prefix = PrefixSum::build(&data, frame.width, frame.height);
        Self {
            frame,
            data,
            prefix,
        }
    }

    /// Baut die Maske aus bereits berechneten Prefix-Summen zusammen.
    pub(crate) fn from_parts(frame: RasterFrame, data: Vec<u8>, prefix: PrefixSum) -> Self {
        Self {
            frame,
            data,
            prefix,
        }
    }

    pub fn frame(&self) -> &RasterFrame {
        &self.frame
    }

    pub fn width(&self) -> usize {
        self.frame.width
    }

    pub fn height(&self) -> usize {
        self.frame.height
    }

    pub fn cell_size(&self) -> f64 {
        self.frame.cell_size
    }

    /// Linke untere Ecke von Raster-Zelle (0, 0), gitter-lokal
    pub fn origin_grid(&self) -> Point2D {
        self.frame.origin
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn prefix_sum(&self) -> &PrefixSum {
        &self.prefix
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.frame.width && y < self.frame.height && self.data[y * self.frame.width + x] != 0
    }

    pub fn occupied_count(&self) -> u32 {
        self.prefix.total()
    }
}
