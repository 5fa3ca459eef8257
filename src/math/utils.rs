// src/math/utils.rs

/// Mathematische Konstanten
pub mod constants {
    /// Allgemeine Toleranz für Längen- und Nennervergleiche (Weltkoordinaten)
    pub const EPSILON: f64 = 1e-9;
    /// Toleranz beim Runden von Footprint-Kanten auf Raster-Indizes
    pub const RASTER_EPSILON: f64 = 1e-7;
    pub const PI: f64 = std::f64::consts::PI;
    pub const TAU: f64 = std::f64::consts::TAU;
    /// Eine Vierteldrehung; das Gitter ist unter 90° symmetrisch.
    pub const QUARTER_TURN_DEG: f64 = 90.0;
}

/// Vergleichsfunktionen mit Toleranz
pub mod comparison {
    use super::constants::EPSILON;

    /// Prüft ob zwei Floats (nahezu) gleich sind
    pub fn nearly_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    /// Prüft ob Float (nahezu) Null ist
    pub fn nearly_zero(a: f64) -> bool {
        a.abs() < EPSILON
    }
}

/// Winkel-Hilfsfunktionen
pub mod angles {
    use super::constants::{PI, QUARTER_TURN_DEG, TAU};

    /// Konvertiert Grad zu Radiant
    pub fn deg_to_rad(degrees: f64) -> f64 {
        degrees * PI / 180.0
    }

    /// Konvertiert Radiant zu Grad
    pub fn rad_to_deg(radians: f64) -> f64 {
        radians * 180.0 / PI
    }

    /// Normalisiert einen Winkel auf [0, 2π)
    pub fn normalize_angle(angle: f64) -> f64 {
        let result = angle.rem_euclid(TAU);
        // rem_euclid kann für winzige negative Werte genau TAU liefern
        if result >= TAU { 0.0 } else { result }
    }

    /// Faltet einen Winkel in Grad auf [0°, 90°)
    pub fn fold_quarter_deg(degrees: f64) -> f64 {
        let result = degrees.rem_euclid(QUARTER_TURN_DEG);
        if result >= QUARTER_TURN_DEG { 0.0 } else { result }
    }
}
