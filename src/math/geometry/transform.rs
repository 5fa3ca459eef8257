// src/math/geometry/transform.rs

//! Umrechnung zwischen Weltkoordinaten und dem gitter-lokalen Raum.
//!
//! Im gitter-lokalen Raum ist das Gitter achsenparallel; dort findet die gesamte
//! Raster- und Zellarithmetik statt.

use crate::math::types::{GridPose, Point2D};

/// Standard-2D-Rotation gegen den Uhrzeigersinn.
pub fn rotate(v: Point2D, angle: f64) -> Point2D {
    let (sin_a, cos_a) = angle.sin_cos();
    Point2D::new(v.x * cos_a - v.y * sin_a, v.x * sin_a + v.y * cos_a)
}

/// Welt → gitter-lokal: Ursprung abziehen, um `-angle` drehen.
pub fn world_to_grid(p: Point2D, pose: &GridPose) -> Point2D {
    rotate(p - pose.origin, -pose.angle)
}

/// Gitter-lokal → Welt: um `angle` drehen, Ursprung addieren.
pub fn grid_to_world(p: Point2D, pose: &GridPose) -> Point2D {
    rotate(p, pose.angle) + pose.origin
}
