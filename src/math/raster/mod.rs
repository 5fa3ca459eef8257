// src/math/raster/mod.rs

// Rasterisierung einer Region in ein feines Belegungsraster plus
// Summed-Area-Table, Erosionstest pro Gitterzelle und Komponentenanalyse.
pub mod classifier;
pub mod components;
pub mod config;
pub mod mask;
pub mod rasterizer;
pub mod scanline;

pub use self::classifier::{CellClassifier, RasterRect};
pub use self::components::{ComponentAnalyzer, ComponentSummary};
pub use self::config::RasterConfig;
pub use self::mask::{PrefixSum, RasterFrame, RasterMask};
pub use self::rasterizer::{RasterResult, RasterTimings, Rasterizer, rasterize};
