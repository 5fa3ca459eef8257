// src/math/alignment/profile.rs

use crate::math::raster::RasterTimings;
use std::fmt;
use std::time::Duration;

/// Aggregierte Zähler einer Ausrichtungssuche, z. B. zum Abstimmen von
/// Raster-Auflösung und Bucket-Breite. Beeinflusst das Ergebnis nicht.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchProfile {
    /// Anzahl erzeugter Kandidatenwinkel
    pub candidate_angles: usize,
    /// Tatsächlich rasterisierte Orientierungen
    pub orientations: usize,
    pub offsets_per_orientation: usize,
    pub offsets_evaluated: usize,
    pub yields: usize,
    pub elapsed: Duration,
    /// bounds / fill / prefix / components
    pub timings: RasterTimings,
}

impl fmt::Display for SearchProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} orientations, {} offsets ({} per orientation), {} yields in {:?} \
             [bounds {:?}, fill {:?}, prefix {:?}, components {:?}]",
            self.orientations,
            self.candidate_angles,
            self.offsets_evaluated,
            self.offsets_per_orientation,
            self.yields,
            self.elapsed,
            self.timings.bounds,
            self.timings.fill,
            self.timings.prefix,
            self.timings.components,
        )
    }
}
