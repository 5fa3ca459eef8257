// src/math/geometry/region/core.rs

use crate::math::{
    error::{MathError, MathResult},
    types::{Bounds2D, Point2D},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geschlossener Ring. Der Schluss ist implizit: der letzte Punkt wird mit dem
/// ersten verbunden, ein doppelter Schlusspunkt wird beim Erstellen entfernt.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Point2D>", into = "Vec<Point2D>")]
pub struct Ring {
    points: Vec<Point2D>,
}

impl Ring {
    pub fn new(mut points: Vec<Point2D>) -> Self {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        Self { points }
    }

    /// Achsenparalleles Rechteck (gegen den Uhrzeigersinn)
    pub fn rectangle(min: Point2D, max: Point2D) -> Self {
        Self::new(vec![
            Point2D::new(min.x, min.y),
            Point2D::new(max.x, min.y),
            Point2D::new(max.x, max.y),
            Point2D::new(min.x, max.y),
        ])
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Trägt der Ring Kanten bei? Ringe mit weniger als drei Punkten nicht.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3
    }

    /// Alle Kanten inklusive der Schlusskante `(p[n-1], p[0])`.
    pub fn edges(&self) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
        let n = if self.is_degenerate() { 0 } else { self.points.len() };
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    pub fn map_points(&self, f: impl Fn(Point2D) -> Point2D) -> Self {
        Self {
            points: self.points.iter().copied().map(f).collect(),
        }
    }
}

impl From<Vec<Point2D>> for Ring {
    fn from(points: Vec<Point2D>) -> Self {
        Self::new(points)
    }
}

impl From<Ring> for Vec<Point2D> {
    fn from(ring: Ring) -> Self {
        ring.points
    }
}

/// Ein Polygon: Ring 0 ist die Außenkontur, alle weiteren Ringe sind Löcher.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionPolygon {
    rings: Vec<Ring>,
}

impl RegionPolygon {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    /// Polygon ohne Löcher
    pub fn simple(outer: Ring) -> Self {
        Self { rings: vec![outer] }
    }

    pub fn with_hole(mut self, hole: Ring) -> Self {
        self.rings.push(hole);
        self
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn outer(&self) -> Option<&Ring> {
        self.rings.first()
    }

    pub fn holes(&self) -> &[Ring] {
        self.rings.get(1..).unwrap_or(&[])
    }

    pub fn edges(&self) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
        self.rings.iter().flat_map(Ring::edges)
    }

    /// Ein Polygon ohne nicht-degenerierten Ring füllt nichts.
    pub fn is_empty(&self) -> bool {
        self.rings.iter().all(Ring::is_degenerate)
    }
}

/// Vereinigung beliebig vieler Polygone. Wird vom Aufrufer besessen und vom
/// Kern nie verändert.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Region {
    pub polygons: Vec<RegionPolygon>,
}

impl Region {
    pub fn new(polygons: Vec<RegionPolygon>) -> Self {
        Self { polygons }
    }

    /// Region aus einer einzelnen Punktliste (ein Polygon ohne Löcher).
    pub fn from_points(points: Vec<Point2D>) -> MathResult<Self> {
        if points.len() < 3 {
            return Err(MathError::InsufficientPoints {
                expected: 3,
                actual: points.len(),
            });
        }
        Ok(Self::new(vec![RegionPolygon::simple(Ring::new(points))]))
    }

    /// Achsenparalleles Rechteck als Region
    pub fn rectangle(min: Point2D, max: Point2D) -> Self {
        Self::new(vec![RegionPolygon::simple(Ring::rectangle(min, max))])
    }

    pub fn polygons(&self) -> &[RegionPolygon] {
        &self.polygons
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.iter().all(RegionPolygon::is_empty)
    }

    /// Alle Kanten aller Ringe aller Polygone
    pub fn edges(&self) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
        self.polygons.iter().flat_map(RegionPolygon::edges)
    }

    pub fn points(&self) -> impl Iterator<Item = Point2D> + '_ {
        self.polygons
            .iter()
            .flat_map(|poly| poly.rings().iter())
            .flat_map(|ring| ring.points().iter().copied())
    }

    /// Bounding Box über alle endlichen Punkte
    pub fn bounds(&self) -> Option<Bounds2D> {
        Bounds2D::from_points_iter(self.points())
    }

    /// Neue Region mit punktweise transformierten Koordinaten.
    pub fn transformed(&self, f: impl Fn(Point2D) -> Point2D) -> Self {
        Self {
            polygons: self
                .polygons
                .iter()
                .map(|poly| RegionPolygon::new(poly.rings().iter().map(|r| r.map_points(&f)).collect()))
                .collect(),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rings: usize = self.polygons.iter().map(|p| p.rings().len()).sum();
        write!(f, "Region({} polygons, {} rings)", self.polygons.len(), rings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_drops_closing_point() {
        let ring = Ring::new(vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(0.0, 0.0),
        ]);
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.edges().count(), 3);
        assert_eq!(ring.edges().last(), Some((Point2D::new(1.0, 1.0), Point2D::new(0.0, 0.0))));
    }

    #[test]
    fn test_degenerate_ring_has_no_edges() {
        let ring = Ring::new(vec![Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0)]);
        assert!(ring.is_degenerate());
        assert_eq!(ring.edges().count(), 0);

        let region = Region::new(vec![RegionPolygon::simple(ring)]);
        assert!(region.is_empty());
        assert!(Region::default().is_empty());
    }

    #[test]
    fn test_from_points_requires_three() {
        let err = Region::from_points(vec![Point2D::ZERO]).unwrap_err();
        assert_eq!(
            err,
            MathError::InsufficientPoints {
                expected: 3,
                actual: 1
            }
        );
    }

    #[test]
    fn test_region_bounds_and_transform() {
        let region = Region::rectangle(Point2D::new(0.0, 0.0), Point2D::new(4.0, 2.0));
        let moved = region.transformed(|p| p + Point2D::new(1.0, 1.0));
        let bounds = moved.bounds().unwrap();
        assert_eq!(bounds.min, Point2D::new(1.0, 1.0));
        assert_eq!(bounds.max, Point2D::new(5.0, 3.0));
        assert_eq!(moved.edges().count(), 4);
    }

    #[test]
    fn test_region_json_layout() {
        let region = Region::rectangle(Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0));
        let json = serde_json::to_string(&region).unwrap();
        assert_eq!(
            json,
            r#"{"polygons":[[[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,1.0]]]]}"#
        );
        let back: Region = serde_json::from_str(&json).unwrap();
        assert_eq!(back, region);
    }
}
