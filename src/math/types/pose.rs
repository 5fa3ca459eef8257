// src/math/types/pose.rs

use crate::math::{
    error::{MathError, MathResult},
    geometry::transform,
    types::{GridIndex, Point2D},
};
use serde::{Deserialize, Serialize};

/// Lage eines rotierten, gleichmäßigen Quadratgitters in Weltkoordinaten.
///
/// Die Gitterlinien liegen im gitter-lokalen Raum auf Vielfachen von `spacing`;
/// die Zelle `(gx, gy)` ist das Quadrat `[gx·s, (gx+1)·s] × [gy·s, (gy+1)·s]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPose {
    /// Ursprung des Gitters (Weltkoordinaten)
    pub origin: Point2D,
    /// Drehwinkel in Radiant, gegen den Uhrzeigersinn
    pub angle: f64,
    /// Abstand der Gitterlinien (Welteinheiten)
    pub spacing: f64,
}

impl Default for GridPose {
    fn default() -> Self {
        Self {
            origin: Point2D::ZERO,
            angle: 0.0,
            spacing: 1.0,
        }
    }
}

impl GridPose {
    pub fn new(origin: Point2D, angle: f64, spacing: f64) -> Self {
        Self {
            origin,
            angle,
            spacing,
        }
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn validate(&self) -> MathResult<()> {
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(MathError::InvalidConfiguration {
                message: format!("Grid spacing must be positive and finite, got {}", self.spacing),
            });
        }
        if !self.origin.is_finite() || !self.angle.is_finite() {
            return Err(MathError::InvalidConfiguration {
                message: "Grid origin and angle must be finite".to_string(),
            });
        }
        Ok(())
    }

    /// Welt → gitter-lokal
    pub fn world_to_grid(&self, p: Point2D) -> Point2D {
        transform::world_to_grid(p, self)
    }

    /// Gitter-lokal → Welt
    pub fn grid_to_world(&self, p: Point2D) -> Point2D {
        transform::grid_to_world(p, self)
    }

    /// Zentrum der Zelle `index` im gitter-lokalen Raum, verschoben um `offset`.
    pub fn cell_center(&self, index: GridIndex, offset: Point2D) -> Point2D {
        Point2D::new(
            (index.x as f64 + 0.5) * self.spacing + offset.x,
            (index.y as f64 + 0.5) * self.spacing + offset.y,
        )
    }

    /// Eckpunkte der Zelle `index` in Weltkoordinaten (gegen den Uhrzeigersinn).
    pub fn cell_corners_world(&self, index: GridIndex) -> [Point2D; 4] {
        let x0 = index.x as f64 * self.spacing;
        let y0 = index.y as f64 * self.spacing;
        let x1 = x0 + self.spacing;
        let y1 = y0 + self.spacing;
        [
            self.grid_to_world(Point2D::new(x0, y0)),
            self.grid_to_world(Point2D::new(x1, y0)),
            self.grid_to_world(Point2D::new(x1, y1)),
            self.grid_to_world(Point2D::new(x0, y1)),
        ]
    }

    /// Verschiebt den Weltursprung um einen gitter-lokalen Offset.
    pub fn shifted_local(&self, offset: Point2D) -> Self {
        Self {
            origin: self.origin + transform::rotate(offset, self.angle),
            ..*self
        }
    }
}
