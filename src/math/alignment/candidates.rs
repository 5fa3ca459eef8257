// src/math/alignment/candidates.rs

use crate::math::{
    alignment::config::SearchConfig,
    geometry::region::Region,
    utils::{angles, comparison, constants},
};

/// Kandidatenwinkel der Ausrichtungssuche, aufsteigend in [0°, 90°).
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateAngles {
    degrees: Vec<f64>,
}

impl CandidateAngles {
    /// Baut die Kandidaten aus dem Histogramm der Kantenrichtungen.
    ///
    /// Jeder belegte Bucket liefert seinen Startwinkel, ein Bucket mit nur
    /// einer Kantenrichtung zusätzlich genau diese Richtung. Lücken zwischen
    /// aufeinanderfolgenden belegten Buckets (zyklisch, 90° → 0°) werden in
    /// gleichmäßigen Schritten von höchstens `max_angle_step_deg` aufgefüllt.
    /// Ohne Kanten ist 0° der einzige Kandidat.
    pub fn generate(region: &Region, config: &SearchConfig) -> Self {
        let bucket_count = config.bucket_count().max(1);
        let occupied = Self::edge_histogram(region, config.bucket_deg, bucket_count);
        if occupied.is_empty() {
            return Self { degrees: vec![0.0] };
        }

        let mut degrees = Vec::new();
        for (i, &(bucket, hit)) in occupied.iter().enumerate() {
            let next = match occupied.get(i + 1) {
                Some(&(next, _)) => next,
                None => occupied[0].0 + bucket_count,
            };
            let gap_deg = (next - bucket) as f64 * config.bucket_deg;
            let steps = (gap_deg / config.max_angle_step_deg).ceil().max(1.0) as usize;
            let step_deg = gap_deg / steps as f64;

            let start_deg = bucket as f64 * config.bucket_deg;
            for k in 0..steps {
                degrees.push(angles::fold_quarter_deg(start_deg + k as f64 * step_deg));
            }
            if let BucketHit::Single(exact) = hit {
                if !same_direction(exact, start_deg) {
                    degrees.push(exact);
                }
            }
        }

        degrees.sort_by(f64::total_cmp);
        degrees.dedup_by(|a, b| comparison::nearly_equal(*a, *b));
        Self { degrees }
    }

    /// Belegte Buckets in aufsteigender Reihenfolge, jeweils mit ihrer Belegung.
    fn edge_histogram(
        region: &Region,
        bucket_deg: f64,
        bucket_count: usize,
    ) -> Vec<(usize, BucketHit)> {
        let mut hits = vec![BucketHit::Empty; bucket_count];
        for (a, b) in region.edges() {
            let d = b - a;
            // Doppelte Punkte haben keine Richtung
            if !d.is_finite() || comparison::nearly_zero(d.length()) {
                continue;
            }
            let folded = angles::fold_quarter_deg(angles::rad_to_deg(d.y.atan2(d.x)));
            // Kleiner Zuschlag, damit 29.999999999° noch in den 30°-Bucket fällt
            let bucket = ((folded / bucket_deg + 1e-9).floor() as usize) % bucket_count;
            hits[bucket] = hits[bucket].with(folded);
        }

        hits.into_iter()
            .enumerate()
            .filter(|(_, hit)| *hit != BucketHit::Empty)
            .collect()
    }

    pub fn degrees(&self) -> &[f64] {
        &self.degrees
    }

    pub fn radians(&self) -> impl Iterator<Item = f64> + '_ {
        self.degrees.iter().map(|&d| angles::deg_to_rad(d))
    }

    pub fn len(&self) -> usize {
        self.degrees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty()
    }
}

/// Gleiche Richtung unter 90°-Symmetrie (89.999…° ≙ 0°)
fn same_direction(a: f64, b: f64) -> bool {
    let d = (a - b).abs();
    comparison::nearly_zero(d) || comparison::nearly_equal(d, constants::QUARTER_TURN_DEG)
}

/// Belegung eines Histogramm-Buckets
#[derive(Debug, Clone, Copy, PartialEq)]
enum BucketHit {
    Empty,
    /// Alle Kanten des Buckets haben (nahezu) diese Richtung in Grad
    Single(f64),
    Mixed,
}

impl BucketHit {
    fn with(self, degrees: f64) -> Self {
        match self {
            BucketHit::Empty => BucketHit::Single(degrees),
            BucketHit::Single(d) if same_direction(d, degrees) => self,
            _ => BucketHit::Mixed,
        }
    }
}
