// src/math/geometry/region/boolean.rs

//! Anbindung an die planare Boolesche Kombination aus `geo`.
//!
//! `geo` interpretiert ein Polygon als Außenring minus Löcher; für gültige,
//! nicht selbstschneidende Eingaben stimmt das mit der Even-Odd-Regel des
//! Rasterizers überein.

use crate::math::geometry::region::{Region, RegionPolygon, Ring};
use crate::math::types::Point2D;
use bevy::log::debug;
use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon};

fn ring_to_line_string(ring: &Ring) -> LineString<f64> {
    ring.points()
        .iter()
        .filter(|p| p.is_finite())
        .map(|p| Coord { x: p.x, y: p.y })
        .collect::<Vec<_>>()
        .into()
}

fn line_string_to_ring(line: &LineString<f64>) -> Ring {
    Ring::new(line.coords().map(|c| Point2D::new(c.x, c.y)).collect())
}

impl From<&Region> for MultiPolygon<f64> {
    fn from(region: &Region) -> Self {
        let polygons = region
            .polygons()
            .iter()
            .filter_map(|poly| {
                let outer = poly.outer().filter(|r| !r.is_degenerate())?;
                let holes = poly
                    .holes()
                    .iter()
                    .filter(|r| !r.is_degenerate())
                    .map(ring_to_line_string)
                    .collect();
                Some(Polygon::new(ring_to_line_string(outer), holes))
            })
            .collect::<Vec<_>>();
        MultiPolygon::new(polygons)
    }
}

impl From<&MultiPolygon<f64>> for Region {
    fn from(multi: &MultiPolygon<f64>) -> Self {
        Region::new(
            multi
                .iter()
                .map(|poly| {
                    let mut rings = vec![line_string_to_ring(poly.exterior())];
                    rings.extend(poly.interiors().iter().map(line_string_to_ring));
                    RegionPolygon::new(rings)
                })
                .collect(),
        )
    }
}

fn normalize(multi: MultiPolygon<f64>) -> Option<Region> {
    let region = Region::from(&multi);
    if region.is_empty() { None } else { Some(region) }
}

/// Vereinigt `addition` mit der (evtl. noch fehlenden) Region `current`.
/// Ein leeres Ergebnis wird zu `None`.
pub fn union(current: Option<&Region>, addition: &Region) -> Option<Region> {
    let addition_geo = MultiPolygon::from(addition);
    let result = match current {
        Some(region) => MultiPolygon::from(region).union(&addition_geo),
        None => addition_geo,
    };
    let normalized = normalize(result);
    debug!(
        "Region union: {} polygons",
        normalized.as_ref().map_or(0, |r| r.polygons().len())
    );
    normalized
}

/// Zieht `removal` von `current` ab. Ein leeres Ergebnis wird zu `None`.
pub fn difference(current: &Region, removal: &Region) -> Option<Region> {
    let result = MultiPolygon::from(current).difference(&MultiPolygon::from(removal));
    let normalized = normalize(result);
    debug!(
        "Region difference: {} polygons",
        normalized.as_ref().map_or(0, |r| r.polygons().len())
    );
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::geometry::region::RegionProperties;
    use approx::assert_relative_eq;

    #[test]
    fn test_union_of_overlapping_rectangles() {
        let a = Region::rectangle(Point2D::new(0.0, 0.0), Point2D::new(4.0, 4.0));
        let b = Region::rectangle(Point2D::new(2.0, 0.0), Point2D::new(6.0, 4.0));
        let merged = union(Some(&a), &b).unwrap();
        assert_eq!(merged.polygons().len(), 1);
        assert_relative_eq!(merged.area(), 24.0, epsilon = 1e-9);
    }

    #[test]
    fn test_union_without_current_region() {
        let b = Region::rectangle(Point2D::new(2.0, 0.0), Point2D::new(6.0, 4.0));
        let merged = union(None, &b).unwrap();
        assert_relative_eq!(merged.area(), 16.0, epsilon = 1e-9);
    }

    #[test]
    fn test_difference_cuts_hole() {
        let outer = Region::rectangle(Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0));
        let inner = Region::rectangle(Point2D::new(3.0, 3.0), Point2D::new(7.0, 7.0));
        let cut = difference(&outer, &inner).unwrap();
        assert_relative_eq!(cut.area(), 84.0, epsilon = 1e-9);
        assert!(!cut.contains_point(Point2D::new(5.0, 5.0)));
        assert!(cut.contains_point(Point2D::new(1.0, 5.0)));
    }

    #[test]
    fn test_difference_to_nothing_is_none() {
        let a = Region::rectangle(Point2D::new(1.0, 1.0), Point2D::new(2.0, 2.0));
        let b = Region::rectangle(Point2D::new(0.0, 0.0), Point2D::new(3.0, 3.0));
        assert!(difference(&a, &b).is_none());
    }
}
