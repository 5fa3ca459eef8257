// src/math/alignment/search.rs

use crate::math::{
    alignment::{
        cancel::CancellationToken, candidates::CandidateAngles, config::SearchConfig,
        profile::SearchProfile, yield_point::{NoYield, YieldPoint},
    },
    error::MathResult,
    geometry::region::Region,
    raster::{CellClassifier, ComponentAnalyzer, RasterTimings, Rasterizer},
    types::*,
};
use bevy::log::{debug, info, trace};
use bevy::tasks::futures_lite::future;
use bevy::utils::Instant;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Beste gefundene Gitterlage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    /// Drehwinkel in Radiant, in [0, π/2)
    pub angle: f64,
    /// Weltursprung des Gitters inklusive Sub-Zellen-Offset
    pub origin: Point2D,
    pub cell_count: usize,
}

impl AlignmentResult {
    /// Lage des Ergebnisses mit dem Zellabstand von `base`
    pub fn pose(&self, base: &GridPose) -> GridPose {
        GridPose::new(self.origin, self.angle, base.spacing)
    }
}

impl fmt::Display for AlignmentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cells at {:.3}° origin ({:.4}, {:.4})",
            self.cell_count,
            self.angle.to_degrees(),
            self.origin.x,
            self.origin.y
        )
    }
}

/// Ausgang einer Suche. Ein Abbruch ist kein Fehler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchOutcome {
    /// `None`, wenn keine Orientierung eine gültige Rasterisierung ergab.
    /// Passt keine ganze Zelle hinein, ist das Ergebnis `Some` mit `cell_count == 0`.
    Completed(Option<AlignmentResult>),
    /// Abgebrochen; das bis dahin beste Ergebnis wird nur mitgeliefert
    Cancelled { best_so_far: Option<AlignmentResult> },
}

impl SearchOutcome {
    /// Ergebnis einer vollständig durchlaufenen Suche
    pub fn result(&self) -> Option<AlignmentResult> {
        match self {
            SearchOutcome::Completed(result) => *result,
            SearchOutcome::Cancelled { .. } => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchOutcome::Cancelled { .. })
    }
}

type ProfileSink = Box<dyn FnMut(&SearchProfile) + Send>;

/// Brute-Force-Suche über Kandidatenwinkel × Sub-Zellen-Offsets.
///
/// Pro Winkel wird genau einmal rasterisiert; die `resolution²` Offsets
/// verschieben nur die Zellmittelpunkte gegen dieselbe Maske. Die Suche prüft
/// den Abbruch zu Beginn jedes Winkels und jedes Offsets und gibt nach
/// `yield_budget` ununterbrochener Rechenzeit an den Host ab.
pub struct AlignmentSearch {
    config: SearchConfig,
    rasterizer: Rasterizer,
    analyzer: ComponentAnalyzer,
    profiler: Option<ProfileSink>,
}

impl fmt::Debug for AlignmentSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignmentSearch")
            .field("config", &self.config)
            .field("profiler", &self.profiler.is_some())
            .finish()
    }
}

impl AlignmentSearch {
    pub fn new(config: SearchConfig) -> MathResult<Self> {
        config.validate()?;
        Ok(Self {
            rasterizer: Rasterizer::new(config.raster.clone())?,
            analyzer: ComponentAnalyzer::new(),
            profiler: None,
            config,
        })
    }

    /// Registriert eine Senke für Profiling-Daten. Ohne Senke ändert sich nichts am Ergebnis.
    pub fn with_profiler<F>(mut self, sink: F) -> Self
    where
        F: FnMut(&SearchProfile) + Send + 'static,
    {
        self.profiler = Some(Box::new(sink));
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Führt die Suche für `region` aus. Winkel und Ursprung von `base_pose`
    /// dienen als Ausgangspunkt, der Zellabstand bleibt fest.
    pub async fn run<Y: YieldPoint>(
        &mut self,
        region: &Region,
        base_pose: &GridPose,
        cancel: &CancellationToken,
        yielder: &mut Y,
    ) -> SearchOutcome {
        let started = Instant::now();
        let candidates = CandidateAngles::generate(region, &self.config);
        let resolution = self.config.raster.resolution as usize;
        let step = self.config.raster.cell_size(base_pose.spacing);
        let epsilon = self.config.raster.epsilon;

        let mut profile = SearchProfile {
            candidate_angles: candidates.len(),
            offsets_per_orientation: resolution * resolution,
            ..Default::default()
        };
        let mut best: Option<AlignmentResult> = None;
        let mut slice_started = Instant::now();

        debug!(
            "Alignment search over {} candidate angles, {} offsets each",
            candidates.len(),
            profile.offsets_per_orientation
        );

        for angle in candidates.radians() {
            if cancel.is_cancelled() {
                return self.finish_cancelled(best, profile, started);
            }

            let pose = base_pose.with_angle(angle);
            let mut timings = RasterTimings::default();
            let mask = self.rasterizer.build_mask(region, &pose, &mut timings);
            profile.timings.accumulate(&timings);
            let Some(mask) = mask else {
                trace!("Angle {:.3}° skipped: no rasterization", angle.to_degrees());
                continue;
            };
            profile.orientations += 1;

            let Some(bounds) = self.rasterizer.sample_bounds(&mask, pose.spacing) else {
                trace!("Angle {:.3}° skipped: lattice out of range", angle.to_degrees());
                continue;
            };
            let classifier = CellClassifier::new(&mask, pose.spacing, epsilon);

            for oy in 0..resolution {
                for ox in 0..resolution {
                    if cancel.is_cancelled() {
                        return self.finish_cancelled(best, profile, started);
                    }
                    if slice_started.elapsed() >= self.config.yield_budget {
                        yielder.yield_now().await;
                        profile.yields += 1;
                        if cancel.is_cancelled() {
                            return self.finish_cancelled(best, profile, started);
                        }
                        slice_started = Instant::now();
                    }

                    let offset = Point2D::new(ox as f64 * step, oy as f64 * step);
                    let component_started = Instant::now();
                    let summary =
                        self.analyzer
                            .largest_component(&classifier, &bounds, offset, false);
                    profile.timings.components += component_started.elapsed();
                    profile.offsets_evaluated += 1;

                    // Nur echt größere Werte ersetzen: erster Treffer in Suchreihenfolge gewinnt
                    if best.is_none_or(|b| summary.count > b.cell_count) {
                        best = Some(AlignmentResult {
                            angle,
                            origin: pose.shifted_local(offset).origin,
                            cell_count: summary.count,
                        });
                    }
                }
            }
        }

        profile.elapsed = started.elapsed();
        match &best {
            Some(result) => info!("Alignment search finished: {} ({})", result, profile),
            None => info!("Alignment search found no valid orientation ({})", profile),
        }
        self.report(&profile);
        SearchOutcome::Completed(best)
    }

    fn finish_cancelled(
        &mut self,
        best_so_far: Option<AlignmentResult>,
        mut profile: SearchProfile,
        started: Instant,
    ) -> SearchOutcome {
        profile.elapsed = started.elapsed();
        debug!("Alignment search cancelled after {:?}", profile.elapsed);
        self.report(&profile);
        SearchOutcome::Cancelled { best_so_far }
    }

    fn report(&mut self, profile: &SearchProfile) {
        if let Some(sink) = self.profiler.as_mut() {
            sink(profile);
        }
    }
}

/// Blockierende Suche mit Standardkonfiguration, ohne Abgabe an einen Scheduler.
pub fn find_best_alignment(
    region: &Region,
    base_pose: &GridPose,
    cancel: &CancellationToken,
) -> SearchOutcome {
    let mut search = AlignmentSearch {
        config: SearchConfig::default(),
        rasterizer: Rasterizer::default(),
        analyzer: ComponentAnalyzer::new(),
        profiler: None,
    };
    future::block_on(search.run(region, base_pose, cancel, &mut NoYield))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::geometry::transform::rotate;
    use crate::math::raster::rasterize;
    use approx::assert_relative_eq;
    use std::future::Future;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn square(size: f64) -> Region {
        Region::rectangle(Point2D::ZERO, Point2D::splat(size))
    }

    fn rotated_square(size: f64, angle: f64) -> Region {
        square(size).transformed(|p| rotate(p, angle))
    }

    /// Setzt beim ersten Abgeben den Abbruch
    struct CancelOnYield(CancellationToken);

    impl YieldPoint for CancelOnYield {
        fn yield_now(&mut self) -> impl Future<Output = ()> + Send {
            self.0.cancel();
            std::future::ready(())
        }
    }

    #[test]
    fn test_aligned_square_keeps_unrotated_pose() {
        let pose = GridPose::new(Point2D::ZERO, 0.0, 2.0);
        let outcome = find_best_alignment(&square(10.0), &pose, &CancellationToken::new());

        let result = outcome.result().unwrap();
        assert_eq!(result.cell_count, 25);
        assert_eq!(result.angle, 0.0);
        assert_eq!(result.origin, Point2D::ZERO);
    }

    #[test]
    fn test_misaligned_origin_is_recovered_by_offset() {
        let pose = GridPose::new(Point2D::new(1.0, 1.0), 0.0, 2.0);
        assert_eq!(rasterize(&square(10.0), &pose).unwrap().grid_cell_count, 16);

        let result = find_best_alignment(&square(10.0), &pose, &CancellationToken::new())
            .result()
            .unwrap();
        assert_eq!(result.cell_count, 25);
        assert_eq!(result.angle, 0.0);
        assert_eq!(result.origin, Point2D::new(2.0, 2.0));
    }

    #[test]
    fn test_rotated_square_finds_edge_angle() {
        let angle = 30f64.to_radians();
        let region = rotated_square(10.0, angle);
        let pose = GridPose::new(Point2D::ZERO, 0.0, 2.0);

        let result = find_best_alignment(&region, &pose, &CancellationToken::new())
            .result()
            .unwrap();
        assert_eq!(result.cell_count, 25);
        assert_relative_eq!(result.angle, angle, epsilon = 1e-9);

        // Das Ergebnis ist mit dem Rasterizer reproduzierbar
        let check = rasterize(&region, &result.pose(&pose)).unwrap();
        assert_eq!(check.grid_cell_count, result.cell_count);
    }

    #[test]
    fn test_empty_region_completes_without_result() {
        let pose = GridPose::new(Point2D::ZERO, 0.0, 2.0);
        let outcome = find_best_alignment(&Region::default(), &pose, &CancellationToken::new());
        assert_eq!(outcome, SearchOutcome::Completed(None));
    }

    #[test]
    fn test_region_without_whole_cell_still_reports_pose() {
        // 1×1 bei Zellabstand 2: rasterisierbar, aber keine Zelle passt hinein
        let region = square(1.0);
        let pose = GridPose::new(Point2D::ZERO, 0.0, 2.0);
        assert_eq!(rasterize(&region, &pose).unwrap().grid_cell_count, 0);

        let outcome = find_best_alignment(&region, &pose, &CancellationToken::new());
        assert_eq!(
            outcome,
            SearchOutcome::Completed(Some(AlignmentResult {
                angle: 0.0,
                origin: Point2D::ZERO,
                cell_count: 0,
            }))
        );
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let pose = GridPose::new(Point2D::ZERO, 0.0, 2.0);

        let outcome = find_best_alignment(&square(10.0), &pose, &token);
        assert_eq!(outcome, SearchOutcome::Cancelled { best_so_far: None });
        assert!(outcome.is_cancelled());
        assert_eq!(outcome.result(), None);
    }

    #[test]
    fn test_cancellation_is_checked_after_yield() {
        let token = CancellationToken::new();
        let profile = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&profile);

        let config = SearchConfig::default().with_yield_budget(Duration::ZERO);
        let mut search = AlignmentSearch::new(config)
            .unwrap()
            .with_profiler(move |p: &SearchProfile| *sink.lock().unwrap() = Some(p.clone()));

        let pose = GridPose::new(Point2D::ZERO, 0.0, 2.0);
        let mut yielder = CancelOnYield(token.clone());
        let outcome =
            future::block_on(search.run(&square(10.0), &pose, &token, &mut yielder));

        assert!(outcome.is_cancelled());
        let profile = profile.lock().unwrap().clone().unwrap();
        assert_eq!(profile.yields, 1);
        assert_eq!(profile.offsets_evaluated, 0);
        assert_eq!(profile.orientations, 1);
    }

    #[test]
    fn test_profile_counts_orientations_and_offsets() {
        let profile = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&profile);
        let mut search = AlignmentSearch::new(SearchConfig::default())
            .unwrap()
            .with_profiler(move |p: &SearchProfile| *sink.lock().unwrap() = Some(p.clone()));

        let pose = GridPose::new(Point2D::ZERO, 0.0, 2.0);
        let outcome = future::block_on(search.run(
            &square(10.0),
            &pose,
            &CancellationToken::new(),
            &mut NoYield,
        ));
        assert_eq!(outcome.result().map(|r| r.cell_count), Some(25));

        let profile = profile.lock().unwrap().clone().unwrap();
        // Achsparalleles Quadrat: 0°, 5°, ..., 85°
        assert_eq!(profile.candidate_angles, 18);
        assert_eq!(profile.orientations, 18);
        assert_eq!(profile.offsets_per_orientation, 64);
        assert_eq!(profile.offsets_evaluated, 18 * 64);
    }

    #[test]
    fn test_yield_strategy_does_not_change_result() {
        let region = rotated_square(9.0, 0.3);
        let pose = GridPose::new(Point2D::new(0.4, -0.7), 0.0, 1.5);
        let config = SearchConfig::default().with_yield_budget(Duration::ZERO);
        let token = CancellationToken::new();

        let mut plain = AlignmentSearch::new(SearchConfig::default()).unwrap();
        let mut yielding = AlignmentSearch::new(config).unwrap();

        let a = future::block_on(plain.run(&region, &pose, &token, &mut NoYield));
        let b = future::block_on(yielding.run(
            &region,
            &pose,
            &token,
            &mut crate::math::alignment::CooperativeYield,
        ));
        assert_eq!(a, b);
        assert!(a.result().is_some());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SearchConfig::default().with_bucket_deg(0.0);
        assert!(AlignmentSearch::new(config).is_err());
    }
}
