// src/math/alignment/config.rs
use crate::math::{
    error::{MathError, MathResult},
    raster::RasterConfig,
    utils::constants,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub raster: RasterConfig,
    /// Breite eines Winkel-Buckets im Histogramm der Kantenrichtungen (Grad)
    pub bucket_deg: f64,
    /// Größter Abstand zwischen zwei Kandidatenwinkeln (Grad)
    pub max_angle_step_deg: f64,
    /// Ununterbrochene Rechenzeit, nach der die Suche an den Host abgibt
    pub yield_budget: Duration,
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raster(mut self, raster: RasterConfig) -> Self {
        self.raster = raster;
        self
    }

    pub fn with_bucket_deg(mut self, bucket_deg: f64) -> Self {
        self.bucket_deg = bucket_deg;
        self
    }

    pub fn with_max_angle_step_deg(mut self, step_deg: f64) -> Self {
        self.max_angle_step_deg = step_deg;
        self
    }

    pub fn with_yield_budget(mut self, budget: Duration) -> Self {
        self.yield_budget = budget;
        self
    }

    /// Anzahl der Buckets über [0°, 90°)
    pub fn bucket_count(&self) -> usize {
        (constants::QUARTER_TURN_DEG / self.bucket_deg).round() as usize
    }

    pub fn validate(&self) -> MathResult<()> {
        self.raster.validate()?;

        if !(self.bucket_deg > 0.0 && self.bucket_deg <= constants::QUARTER_TURN_DEG) {
            return Err(MathError::InvalidConfiguration {
                message: "Angle bucket must be in (0°, 90°]".to_string(),
            });
        }

        let buckets = constants::QUARTER_TURN_DEG / self.bucket_deg;
        if (buckets - buckets.round()).abs() > 1e-9 {
            return Err(MathError::InvalidConfiguration {
                message: format!("Angle bucket {}° does not divide 90°", self.bucket_deg),
            });
        }

        if !(self.max_angle_step_deg >= self.bucket_deg) {
            return Err(MathError::InvalidConfiguration {
                message: "Maximum angle step must be at least one bucket".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            raster: RasterConfig::default(),
            bucket_deg: 1.0,
            max_angle_step_deg: 5.0,
            yield_budget: Duration::from_millis(12),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SearchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bucket_count(), 90);
    }

    #[test]
    fn test_bucket_must_divide_quarter_turn() {
        assert!(SearchConfig::default().with_bucket_deg(0.5).validate().is_ok());
        assert!(SearchConfig::default().with_bucket_deg(7.0).with_max_angle_step_deg(7.0).validate().is_err());
        assert!(SearchConfig::default().with_bucket_deg(0.0).validate().is_err());
    }

    #[test]
    fn test_step_not_below_bucket() {
        let config = SearchConfig::default()
            .with_bucket_deg(10.0)
            .with_max_angle_step_deg(5.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_raster_config_propagates() {
        let config = SearchConfig::default().with_raster(RasterConfig::default().with_resolution(0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_partial_config_uses_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"bucket_deg": 2.0, "raster": {"resolution": 4}}"#).unwrap();
        assert_eq!(config.bucket_deg, 2.0);
        assert_eq!(config.raster.resolution, 4);
        assert_eq!(config.max_angle_step_deg, 5.0);
        assert_eq!(config.yield_budget, Duration::from_millis(12));
    }
}
