// src/math/raster/config.rs
use crate::math::{
    error::{MathError, MathResult},
    utils::constants,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    /// Raster-Zellen pro Gitterzellen-Kante. Bestimmt zugleich die
    /// Auflösung der Sub-Zellen-Offsets in der Ausrichtungssuche.
    pub resolution: u32,
    /// Toleranz beim Runden der Footprint-Kanten auf Raster-Indizes
    pub epsilon: f64,
    /// Minimaler Rand um die Bounding Box (Raster-Zellen)
    pub min_margin_cells: i64,
    /// Obergrenze für width × height; größere Masken werden verworfen
    pub max_mask_cells: usize,
}

impl RasterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_max_mask_cells(mut self, max_cells: usize) -> Self {
        self.max_mask_cells = max_cells;
        self
    }

    /// Kantenlänge einer Raster-Zelle für einen gegebenen Gitterabstand
    pub fn cell_size(&self, spacing: f64) -> f64 {
        spacing / self.resolution as f64
    }

    /// Rand in Raster-Zellen: muss eine halbe Gitterzelle übersteigen, damit
    /// Randzellen nie abgeschnitten werden.
    pub fn margin_cells(&self, spacing: f64) -> i64 {
        let half_cell_in_raster = ((spacing / 2.0) / self.cell_size(spacing)).ceil() as i64;
        self.min_margin_cells.max(half_cell_in_raster + 2)
    }

    pub fn validate(&self) -> MathResult<()> {
        if self.resolution == 0 {
            return Err(MathError::InvalidConfiguration {
                message: "Raster resolution must be at least 1".to_string(),
            });
        }

        if !(0.0..0.5).contains(&self.epsilon) {
            return Err(MathError::InvalidConfiguration {
                message: "Raster epsilon must be in [0.0, 0.5)".to_string(),
            });
        }

        if self.min_margin_cells < 1 {
            return Err(MathError::InvalidConfiguration {
                message: "Raster margin must be at least 1 cell".to_string(),
            });
        }

        if self.max_mask_cells == 0 {
            return Err(MathError::InvalidConfiguration {
                message: "Mask cell limit must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            resolution: 8,
            epsilon: constants::RASTER_EPSILON,
            min_margin_cells: 2,
            max_mask_cells: 1 << 26,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RasterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cell_size(2.0), 0.25);
    }

    #[test]
    fn test_margin_exceeds_half_grid_cell() {
        let config = RasterConfig::default();
        // 8 Raster-Zellen pro Gitterzelle: halbe Zelle = 4, plus 2
        assert_eq!(config.margin_cells(3.0), 6);

        let coarse = RasterConfig::default().with_resolution(1);
        assert_eq!(coarse.margin_cells(1.0), 3);
    }

    #[test]
    fn test_invalid_values() {
        assert!(RasterConfig::default().with_resolution(0).validate().is_err());
        assert!(RasterConfig::default().with_epsilon(0.5).validate().is_err());
        assert!(RasterConfig::default().with_max_mask_cells(0).validate().is_err());
    }
}
