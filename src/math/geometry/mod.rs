// src/math/geometry/mod.rs

pub mod region;
pub mod transform;

pub use self::region::{
    Region, RegionPolygon, Ring,
    boolean::{difference, union},
};
pub use self::transform::{grid_to_world, rotate, world_to_grid};
