// src/lib.rs

// Eigene Module deklarieren
pub mod debug;
pub mod editor;
pub mod math;
