// src/math/types/index.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ganzzahliger Index einer Gitterzelle (Einheit: `spacing`, nicht Raster-Zellen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridIndex {
    pub x: i32,
    pub y: i32,
}

impl GridIndex {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Die vier Nachbarn (4-Konnektivität). Am Rand des `i32`-Bereichs
    /// sättigt der Index und liefert die Zelle selbst.
    pub fn neighbors_4(self) -> [GridIndex; 4] {
        [
            GridIndex::new(self.x.saturating_add(1), self.y),
            GridIndex::new(self.x.saturating_sub(1), self.y),
            GridIndex::new(self.x, self.y.saturating_add(1)),
            GridIndex::new(self.x, self.y.saturating_sub(1)),
        ]
    }
}

impl fmt::Display for GridIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Inklusiver Bereich von Gitterindizes, über den die Komponentenanalyse läuft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl LatticeBounds {
    pub fn new(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_y < self.min_y
    }

    pub fn width(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.max_x - self.min_x + 1) as usize
        }
    }

    pub fn height(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.max_y - self.min_y + 1) as usize
        }
    }

    /// Anzahl der Gitterpunkte im Bereich
    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    pub fn contains(&self, index: GridIndex) -> bool {
        index.x >= self.min_x && index.x <= self.max_x && index.y >= self.min_y && index.y <= self.max_y
    }

    /// Dichter Zeilen-Index `(y - min_y) * width + (x - min_x)`; `None` außerhalb des Bereichs.
    pub fn linear_index(&self, index: GridIndex) -> Option<usize> {
        if !self.contains(index) {
            return None;
        }
        let dx = (index.x - self.min_x) as usize;
        let dy = (index.y - self.min_y) as usize;
        Some(dy * self.width() + dx)
    }

    /// Iteriert zeilenweise (y außen, x innen) über alle Gitterpunkte.
    pub fn iter(&self) -> impl Iterator<Item = GridIndex> + '_ {
        (self.min_y..=self.max_y)
            .flat_map(move |y| (self.min_x..=self.max_x).map(move |x| GridIndex::new(x, y)))
    }
}
