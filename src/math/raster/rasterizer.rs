// src/math/raster/rasterizer.rs

use crate::math::{
    error::MathResult,
    geometry::region::Region,
    raster::{
        classifier::CellClassifier,
        components::ComponentAnalyzer,
        config::RasterConfig,
        mask::{PrefixSum, RasterFrame, RasterMask},
        scanline,
    },
    types::*,
};
use bevy::log::{debug, trace, warn};
use bevy::utils::Instant;
use std::collections::HashSet;
use std::time::Duration;

/// Aufschlüsselung der Rechenzeit eines Rasterisierungsdurchlaufs
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RasterTimings {
    pub bounds: Duration,
    pub fill: Duration,
    pub prefix: Duration,
    pub components: Duration,
}

impl RasterTimings {
    pub fn accumulate(&mut self, other: &RasterTimings) {
        self.bounds += other.bounds;
        self.fill += other.fill;
        self.prefix += other.prefix;
        self.components += other.components;
    }
}

/// Ergebnis einer Rasterisierung für genau eine Gitterlage.
/// Wird bei jeder Änderung von Region oder Lage neu erzeugt.
#[derive(Debug, Clone)]
pub struct RasterResult {
    pub mask: RasterMask,
    /// Lage, für die dieses Ergebnis berechnet wurde
    pub pose: GridPose,
    pub grid_spacing: f64,
    /// Gitterindizes, deren Zellen das Raster berühren können, plus eine Zelle Rand
    pub grid_sample_bounds: LatticeBounds,
    /// Größe der größten zusammenhängenden Komponente innerer Zellen
    pub grid_cell_count: usize,
    pub inside_cells: HashSet<GridIndex>,
    epsilon: f64,
}

impl RasterResult {
    pub fn classifier(&self) -> CellClassifier<'_> {
        CellClassifier::new(&self.mask, self.grid_spacing, self.epsilon)
    }

    /// Erosionstest für einen beliebigen gitter-lokalen Zellmittelpunkt
    pub fn is_cell_inside(&self, grid_point: Point2D) -> bool {
        self.classifier().is_inside_at(grid_point)
    }

    /// Erosionstest für Gitterzelle `index` (ohne Offset)
    pub fn is_index_inside(&self, index: GridIndex) -> bool {
        self.classifier().is_index_inside(index, Point2D::ZERO)
    }

    pub fn occupied_count(&self) -> u32 {
        self.mask.occupied_count()
    }
}

/// Rasterisiert Regionen für eine gegebene Gitterlage.
#[derive(Debug, Clone, Default)]
pub struct Rasterizer {
    config: RasterConfig,
}

impl Rasterizer {
    pub fn new(config: RasterConfig) -> MathResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    pub fn rasterize(&self, region: &Region, pose: &GridPose) -> Option<RasterResult> {
        let mut timings = RasterTimings::default();
        self.rasterize_timed(region, pose, &mut timings)
    }

    /// Vollständige Pipeline inklusive Komponentenanalyse mit Zellmenge.
    pub fn rasterize_timed(
        &self,
        region: &Region,
        pose: &GridPose,
        timings: &mut RasterTimings,
    ) -> Option<RasterResult> {
        let mask = self.build_mask(region, pose, timings)?;
        let grid_sample_bounds = self.sample_bounds(&mask, pose.spacing)?;

        let started = Instant::now();
        let classifier = CellClassifier::new(&mask, pose.spacing, self.config.epsilon);
        let summary = ComponentAnalyzer::new().largest_component(
            &classifier,
            &grid_sample_bounds,
            Point2D::ZERO,
            true,
        );
        timings.components += started.elapsed();

        trace!(
            "Rasterized {}x{} mask, largest component {} cells",
            mask.width(),
            mask.height(),
            summary.count
        );

        Some(RasterResult {
            grid_spacing: pose.spacing,
            grid_sample_bounds,
            grid_cell_count: summary.count,
            inside_cells: summary.cells.unwrap_or_default(),
            pose: *pose,
            epsilon: self.config.epsilon,
            mask,
        })
    }

    /// Schritte 1–5: Transformation, Bounding Box mit Rand, Füllung, Prefix-Summen.
    /// `None` bei leerer Region, ungültiger Lage oder entarteter Bounding Box.
    pub fn build_mask(
        &self,
        region: &Region,
        pose: &GridPose,
        timings: &mut RasterTimings,
    ) -> Option<RasterMask> {
        if region.is_empty() {
            debug!("Rasterize skipped: region is empty");
            return None;
        }
        if let Err(err) = pose.validate() {
            warn!("Rasterize skipped: {}", err);
            return None;
        }

        let started = Instant::now();
        let local = region.transformed(|p| pose.world_to_grid(p));
        let frame = self.frame_for(&local, pose.spacing);
        timings.bounds += started.elapsed();
        let frame = frame?;

        let started = Instant::now();
        let data = scanline::fill_even_odd(&local, &frame);
        timings.fill += started.elapsed();

        let started = Instant::now();
        let prefix = PrefixSum::build(&data, frame.width, frame.height);
        timings.prefix += started.elapsed();

        Some(RasterMask::from_parts(frame, data, prefix))
    }

    /// Bounding Box der lokalen Region, um den Rand erweitert und nach außen
    /// auf ganze Raster-Zellen gerundet.
    fn frame_for(&self, local: &Region, spacing: f64) -> Option<RasterFrame> {
        let Some(bounds) = local.bounds() else {
            debug!("Rasterize skipped: region has no finite points");
            return None;
        };
        if !bounds.is_valid() || !(bounds.area() > 0.0) {
            debug!("Rasterize skipped: degenerate bounds {}", bounds);
            return None;
        }

        let cell_size = self.config.cell_size(spacing);
        let margin = self.config.margin_cells(spacing) as f64;
        let x0 = (bounds.min.x / cell_size).floor() - margin;
        let y0 = (bounds.min.y / cell_size).floor() - margin;
        let x1 = (bounds.max.x / cell_size).ceil() + margin;
        let y1 = (bounds.max.y / cell_size).ceil() + margin;

        let width = x1 - x0;
        let height = y1 - y0;
        if !(width * height <= self.config.max_mask_cells as f64) {
            warn!(
                "Rasterize skipped: mask of {}x{} cells exceeds limit of {}",
                width, height, self.config.max_mask_cells
            );
            return None;
        }

        Some(RasterFrame {
            origin: Point2D::new(x0 * cell_size, y0 * cell_size),
            cell_size,
            width: width as usize,
            height: height as usize,
        })
    }

    /// Gitterindizes (Einheit `spacing`), deren Zellen das Raster überlappen
    /// können, mit einer Zelle Schlupf auf jeder Seite.
    /// `None`, wenn der Bereich samt Nachbarn nicht in `i32` passt.
    pub fn sample_bounds(&self, mask: &RasterMask, spacing: f64) -> Option<LatticeBounds> {
        let extent = mask.frame().extent();
        let min_x = (extent.min.x / spacing).floor() - 1.0;
        let max_x = (extent.max.x / spacing).ceil() + 1.0;
        let min_y = (extent.min.y / spacing).floor() - 1.0;
        let max_y = (extent.max.y / spacing).ceil() + 1.0;

        let lo = i32::MIN as f64 + 1.0;
        let hi = i32::MAX as f64 - 1.0;
        // NaN fällt ebenfalls heraus
        if ![min_x, max_x, min_y, max_y].iter().all(|&v| v >= lo && v <= hi) {
            warn!(
                "Rasterize skipped: grid indices [{}, {}] x [{}, {}] exceed the lattice range",
                min_x, max_x, min_y, max_y
            );
            return None;
        }

        Some(LatticeBounds::new(
            min_x as i32,
            max_x as i32,
            min_y as i32,
            max_y as i32,
        ))
    }
}

/// Rasterisiert mit der Standardkonfiguration.
pub fn rasterize(region: &Region, pose: &GridPose) -> Option<RasterResult> {
    Rasterizer::default().rasterize(region, pose)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::geometry::region::RegionProperties;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn square(size: f64) -> Region {
        Region::rectangle(Point2D::ZERO, Point2D::splat(size))
    }

    #[test]
    fn test_reference_square_yields_25_cells() {
        let pose = GridPose::new(Point2D::ZERO, 0.0, 2.0);
        let result = rasterize(&square(10.0), &pose).unwrap();

        assert_eq!(result.grid_cell_count, 25);
        let expected: HashSet<GridIndex> = (0..5)
            .flat_map(|y| (0..5).map(move |x| GridIndex::new(x, y)))
            .collect();
        assert_eq!(result.inside_cells, expected);
        assert_eq!(result.mask.cell_size(), 0.25);
        assert_eq!(result.occupied_count(), 40 * 40);
    }

    #[test]
    fn test_margin_keeps_boundary_cells_away_from_mask_edge() {
        let pose = GridPose::new(Point2D::ZERO, 0.0, 2.0);
        let result = rasterize(&square(10.0), &pose).unwrap();
        let frame = *result.mask.frame();
        // Rand von 6 Raster-Zellen auf jeder Seite
        assert_eq!(frame.origin, Point2D::new(-1.5, -1.5));
        assert_eq!(frame.width, 52);
        assert_eq!(frame.height, 52);
        assert_eq!(result.grid_sample_bounds, LatticeBounds::new(-2, 7, -2, 7));

        // Zelle über der Randkante liegt noch vollständig im Raster
        assert!(result.classifier().footprint(Point2D::new(0.0, 5.0)).is_some());
        assert!(!result.is_cell_inside(Point2D::new(0.0, 5.0)));
        assert!(!result.is_index_inside(GridIndex::new(-1, 2)));
        assert!(!result.is_index_inside(GridIndex::new(5, 2)));
    }

    #[test]
    fn test_offset_square_loses_a_row_and_column() {
        // Um eine halbe Zelle verschoben: nur noch 4×4 vollständig innen
        let pose = GridPose::new(Point2D::new(1.0, 1.0), 0.0, 2.0);
        let result = rasterize(&square(10.0), &pose).unwrap();
        assert_eq!(result.grid_cell_count, 16);
    }

    #[test]
    fn test_empty_and_degenerate_regions() {
        let pose = GridPose::new(Point2D::ZERO, 0.0, 1.0);
        assert!(rasterize(&Region::default(), &pose).is_none());

        let flat = Region::from_points(vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(5.0, 0.0),
            Point2D::new(10.0, 0.0),
        ])
        .unwrap();
        assert!(rasterize(&flat, &pose).is_none());

        let nan = Region::from_points(vec![Point2D::splat(f64::NAN); 3]).unwrap();
        assert!(rasterize(&nan, &pose).is_none());

        let bad_pose = GridPose::new(Point2D::ZERO, 0.0, 0.0);
        assert!(rasterize(&square(4.0), &bad_pose).is_none());
    }

    #[test]
    fn test_mask_limit() {
        let rasterizer =
            Rasterizer::new(RasterConfig::default().with_max_mask_cells(100)).unwrap();
        let pose = GridPose::new(Point2D::ZERO, 0.0, 1.0);
        assert!(rasterizer.rasterize(&square(10.0), &pose).is_none());
    }

    #[test]
    fn test_region_far_from_grid_origin() {
        let pose = GridPose::new(Point2D::ZERO, 0.0, 1.0);

        let near = Region::rectangle(Point2D::new(1e5, 0.0), Point2D::new(1e5 + 10.0, 10.0));
        let result = rasterize(&near, &pose).unwrap();
        assert_eq!(result.grid_cell_count, 100);
        assert!(result.inside_cells.contains(&GridIndex::new(100_000, 0)));

        // Gitterindizes jenseits von i32: abgelehnt statt Überlauf
        let far = Region::rectangle(Point2D::new(5e9, 0.0), Point2D::new(5e9 + 10.0, 10.0));
        assert!(rasterize(&far, &pose).is_none());
        let below = Region::rectangle(Point2D::new(0.0, -5e9), Point2D::new(10.0, -5e9 + 10.0));
        assert!(rasterize(&below, &pose).is_none());
    }

    #[test]
    fn test_rotated_square_counts_match_grid_angle() {
        // Quadrat um 30° gedreht, Gitter mit demselben Winkel: volle 4×4 Zellen
        let angle = 30f64.to_radians();
        let pose = GridPose::new(Point2D::new(2.0, -1.0), angle, 1.5);
        let corners: Vec<Point2D> = [(0.0, 0.0), (6.0, 0.0), (6.0, 6.0), (0.0, 6.0)]
            .iter()
            .map(|&(x, y)| pose.grid_to_world(Point2D::new(x, y)))
            .collect();
        let region = Region::from_points(corners).unwrap();

        let result = rasterize(&region, &pose).unwrap();
        assert_eq!(result.grid_cell_count, 16);
    }

    #[test]
    fn test_prefix_sum_identity_and_idempotence() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..10 {
            let count = rng.random_range(3..9);
            let points = (0..count)
                .map(|_| Point2D::new(rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0)))
                .collect();
            let region = Region::from_points(points).unwrap();
            let pose = GridPose::new(
                Point2D::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)),
                rng.random_range(0.0..std::f64::consts::TAU),
                rng.random_range(0.5..2.0),
            );

            let Some(result) = rasterize(&region, &pose) else {
                continue;
            };
            let mask = &result.mask;
            let prefix = mask.prefix_sum();
            assert_eq!(prefix.total() as usize, mask.data().iter().filter(|&&v| v != 0).count());
            for _ in 0..50 {
                let x = rng.random_range(0..=mask.width());
                let y = rng.random_range(0..=mask.height());
                let expected: u32 = (0..y)
                    .flat_map(|yy| (0..x).map(move |xx| (xx, yy)))
                    .map(|(xx, yy)| mask.get(xx, yy) as u32)
                    .sum();
                assert_eq!(prefix.at(x, y), expected, "prefix at ({x}, {y})");
            }

            let again = rasterize(&region, &pose).unwrap();
            assert_eq!(again.mask, result.mask);
            assert_eq!(again.grid_cell_count, result.grid_cell_count);
            assert_eq!(again.inside_cells, result.inside_cells);
        }
    }

    #[test]
    fn test_mask_occupancy_matches_region_containment() {
        let region = Region::from_points(vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(7.0, 1.0),
            Point2D::new(3.0, 6.0),
        ])
        .unwrap();
        let pose = GridPose::new(Point2D::new(0.3, 0.2), 0.4, 1.0);
        let result = rasterize(&region, &pose).unwrap();
        let frame = *result.mask.frame();
        let local = region.transformed(|p| pose.world_to_grid(p));
        for y in 0..frame.height {
            for x in 0..frame.width {
                assert_eq!(result.mask.get(x, y), local.contains_point(frame.cell_center(x, y)));
            }
        }
    }

    #[test]
    fn test_inside_cells_are_fully_covered() {
        let region = Region::from_points(vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(9.0, 2.0),
            Point2D::new(8.0, 9.0),
            Point2D::new(1.0, 7.0),
        ])
        .unwrap();
        let pose = GridPose::new(Point2D::ZERO, 0.25, 1.0);
        let result = rasterize(&region, &pose).unwrap();
        let classifier = result.classifier();
        assert!(result.grid_cell_count > 0);

        for index in result.grid_sample_bounds.iter() {
            let center = pose.cell_center(index, Point2D::ZERO);
            let inside = result.is_index_inside(index);
            match classifier.footprint(center) {
                Some(rect) => {
                    let all = (rect.y0..rect.y1)
                        .all(|y| (rect.x0..rect.x1).all(|x| result.mask.get(x, y)));
                    assert_eq!(inside, all, "cell {index}");
                }
                None => assert!(!inside),
            }
            if result.inside_cells.contains(&index) {
                assert!(inside);
            }
        }
    }
}
