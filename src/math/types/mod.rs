// src/math/types/mod.rs
pub mod bounds;
pub mod index;
pub mod pose;

pub use bounds::*;
pub use index::*;
pub use pose::*;

// Re-export häufig verwendete externe Typen
pub use bevy::math::DVec2;

// Einheitlicher Punkttyp für das gesamte Modul (f64, Raster-Arithmetik braucht die Präzision)
pub type Point2D = DVec2;
