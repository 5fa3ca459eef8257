// src/math/geometry/region/properties.rs

use crate::math::geometry::region::{Region, RegionPolygon, Ring};
use crate::math::types::*;

/// X-Koordinate, an der die Kante `a → b` die Horizontale `y` schneidet.
///
/// Halboffene Regel: die Kante zählt nur, wenn genau einer der Endpunkte
/// oberhalb von `y` liegt. Horizontale Kanten schneiden damit nie, und ein
/// Vertex auf `y` wird genau einmal gezählt.
#[inline]
pub fn crossing_x(a: Point2D, b: Point2D, y: f64) -> Option<f64> {
    if (a.y > y) == (b.y > y) {
        return None;
    }
    Some(a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y))
}

/// Trait für Flächen-Eigenschaften von Ringen, Polygonen und Regionen
pub trait RegionProperties {
    /// Punkt-in-Fläche nach der Even-Odd-Regel
    fn contains_point(&self, point: Point2D) -> bool;

    /// Fläche (Shoelace); bei Polygonen Außenring minus Löcher
    fn area(&self) -> f64;
}

impl Ring {
    /// Anzahl der Kanten, die den Strahl von `point` nach +x kreuzen
    pub fn crossings(&self, point: Point2D) -> usize {
        self.edges()
            .filter_map(|(a, b)| crossing_x(a, b, point.y))
            .filter(|&x| point.x < x)
            .count()
    }

    /// Vorzeichenbehaftete Fläche, positiv gegen den Uhrzeigersinn
    pub fn signed_area(&self) -> f64 {
        0.5 * self.edges().map(|(a, b)| a.x * b.y - b.x * a.y).sum::<f64>()
    }
}

impl RegionProperties for Ring {
    fn contains_point(&self, point: Point2D) -> bool {
        self.crossings(point) % 2 == 1
    }

    fn area(&self) -> f64 {
        self.signed_area().abs()
    }
}

impl RegionProperties for RegionPolygon {
    // Kreuzungen über alle eigenen Ringe summiert; Löcher brauchen keine Sonderbehandlung
    fn contains_point(&self, point: Point2D) -> bool {
        let crossings: usize = self.rings().iter().map(|ring| ring.crossings(point)).sum();
        crossings % 2 == 1
    }

    fn area(&self) -> f64 {
        let outer = self.outer().map(Ring::area).unwrap_or(0.0);
        let holes: f64 = self.holes().iter().map(Ring::area).sum();
        (outer - holes).max(0.0)
    }
}

impl RegionProperties for Region {
    fn contains_point(&self, point: Point2D) -> bool {
        self.polygons.iter().any(|poly| poly.contains_point(point))
    }

    // Überlappungen zwischen Polygonen werden doppelt gezählt
    fn area(&self) -> f64 {
        self.polygons.iter().map(RegionPolygon::area).sum()
    }
}
