// src/math/geometry/region/mod.rs

// Region = Vereinigung von Polygonen, Polygon = Außenring + Löcher
pub mod boolean;
pub mod core;
pub mod properties;

pub use self::core::{Region, RegionPolygon, Ring};
pub use self::properties::RegionProperties;
