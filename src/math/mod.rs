pub mod alignment;
pub mod error;
pub mod geometry;
pub mod raster;
pub mod types;
pub mod utils;

// Re-exports für einfache Verwendung
pub use error::{MathError, MathResult};
pub use types::*;

// Öffentliche API
pub mod prelude {
    pub use super::{
        alignment::{
            AlignmentResult, AlignmentSearch, CancellationToken, CooperativeYield, NoYield,
            SearchConfig, SearchOutcome, SearchProfile, YieldPoint, find_best_alignment,
        },
        error::{MathError, MathResult},
        geometry::{Region, RegionPolygon, Ring, region::RegionProperties},
        raster::{RasterConfig, RasterResult, Rasterizer, rasterize},
        types::*,
    };
}
