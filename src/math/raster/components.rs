// src/math/raster/components.rs

use crate::math::raster::classifier::CellClassifier;
use crate::math::types::*;
use std::collections::{HashSet, VecDeque};

/// Ergebnis der Komponentenanalyse
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentSummary {
    /// Größe der größten 4-zusammenhängenden Komponente innerer Zellen
    pub count: usize,
    /// Zellen dieser Komponente, nur wenn angefordert
    pub cells: Option<HashSet<GridIndex>>,
}

/// Flood-Fill über ein begrenztes Gitter von Zellzentren.
///
/// Die Puffer (visited, Queue, Mitglieder) werden zwischen Aufrufen
/// wiederverwendet; in der Offset-Schleife der Suche fällt damit keine
/// Allokation pro Offset an.
#[derive(Debug, Default)]
pub struct ComponentAnalyzer {
    visited: Vec<bool>,
    queue: VecDeque<GridIndex>,
    members: Vec<GridIndex>,
    best_members: Vec<GridIndex>,
}

impl ComponentAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Größte Komponente der Zellen, die `classifier` mit `offset` als innen einstuft.
    pub fn largest_component(
        &mut self,
        classifier: &CellClassifier<'_>,
        bounds: &LatticeBounds,
        offset: Point2D,
        collect_cells: bool,
    ) -> ComponentSummary {
        self.largest_component_by(bounds, collect_cells, |index| {
            classifier.is_index_inside(index, offset)
        })
    }

    /// Kern der Analyse mit beliebigem Innen-Prädikat.
    ///
    /// Jeder Gitterpunkt wird höchstens einmal klassifiziert. Bei gleich großen
    /// Komponenten gewinnt die in Zeilenreihenfolge zuerst gefundene.
    pub fn largest_component_by<F>(
        &mut self,
        bounds: &LatticeBounds,
        collect_cells: bool,
        mut is_inside: F,
    ) -> ComponentSummary
    where
        F: FnMut(GridIndex) -> bool,
    {
        self.visited.clear();
        self.visited.resize(bounds.len(), false);
        self.queue.clear();
        self.best_members.clear();

        let mut best_count = 0usize;

        for start in bounds.iter() {
            let Some(start_idx) = bounds.linear_index(start) else {
                continue;
            };
            if self.visited[start_idx] {
                continue;
            }
            self.visited[start_idx] = true;
            if !is_inside(start) {
                continue;
            }

            // Breitensuche über die Komponente von `start`
            self.members.clear();
            self.queue.push_back(start);
            let mut count = 0usize;

            while let Some(cell) = self.queue.pop_front() {
                count += 1;
                if collect_cells {
                    self.members.push(cell);
                }

                for neighbor in cell.neighbors_4() {
                    let Some(idx) = bounds.linear_index(neighbor) else {
                        continue;
                    };
                    if self.visited[idx] {
                        continue;
                    }
                    self.visited[idx] = true;
                    if is_inside(neighbor) {
                        self.queue.push_back(neighbor);
                    }
                }
            }

            if count > best_count {
                best_count = count;
                if collect_cells {
                    std::mem::swap(&mut self.best_members, &mut self.members);
                }
            }
        }

        ComponentSummary {
            count: best_count,
            cells: collect_cells.then(|| self.best_members.iter().copied().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Muster aus Zeilen; `#` ist innen. Zeile 0 ist y = 0.
    fn pattern(rows: &[&str]) -> (LatticeBounds, HashSet<GridIndex>) {
        let mut inside = HashSet::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    inside.insert(GridIndex::new(x as i32, y as i32));
                }
            }
        }
        let bounds = LatticeBounds::new(0, rows[0].len() as i32 - 1, 0, rows.len() as i32 - 1);
        (bounds, inside)
    }

    #[test]
    fn test_largest_of_two_components() {
        let (bounds, inside) = pattern(&[
            "##...",
            "##.##",
            "...##",
            "...##",
        ]);
        let mut analyzer = ComponentAnalyzer::new();
        let summary = analyzer.largest_component_by(&bounds, true, |i| inside.contains(&i));
        assert_eq!(summary.count, 6);
        let cells = summary.cells.unwrap();
        assert!(cells.contains(&GridIndex::new(4, 3)));
        assert!(!cells.contains(&GridIndex::new(0, 0)));
    }

    #[test]
    fn test_diagonal_cells_are_not_connected() {
        let (bounds, inside) = pattern(&["#.", ".#"]);
        let mut analyzer = ComponentAnalyzer::new();
        let summary = analyzer.largest_component_by(&bounds, false, |i| inside.contains(&i));
        assert_eq!(summary.count, 1);
        assert!(summary.cells.is_none());
    }

    #[test]
    fn test_tie_resolves_to_first_in_row_major_order() {
        let (bounds, inside) = pattern(&[
            "...##",
            "##...",
        ]);
        let mut analyzer = ComponentAnalyzer::new();
        let summary = analyzer.largest_component_by(&bounds, true, |i| inside.contains(&i));
        assert_eq!(summary.count, 2);
        let expected: HashSet<_> = [GridIndex::new(3, 0), GridIndex::new(4, 0)].into();
        assert_eq!(summary.cells.unwrap(), expected);
    }

    #[test]
    fn test_each_cell_classified_once() {
        let (bounds, inside) = pattern(&[
            "####",
            "#..#",
            "####",
        ]);
        let mut calls = std::collections::HashMap::new();
        let mut analyzer = ComponentAnalyzer::new();
        let summary = analyzer.largest_component_by(&bounds, false, |i| {
            *calls.entry(i).or_insert(0) += 1;
            inside.contains(&i)
        });
        assert_eq!(summary.count, 10);
        assert_eq!(calls.len(), bounds.len());
        assert!(calls.values().all(|&n| n == 1));
    }

    #[test]
    fn test_analyzer_reuse_resets_state() {
        let (bounds, inside) = pattern(&["##", "##"]);
        let mut analyzer = ComponentAnalyzer::new();
        let first = analyzer.largest_component_by(&bounds, true, |i| inside.contains(&i));
        let second = analyzer.largest_component_by(&bounds, true, |i| inside.contains(&i));
        assert_eq!(first, second);

        let empty = analyzer.largest_component_by(&bounds, true, |_| false);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.cells, Some(HashSet::new()));
    }

    #[test]
    fn test_negative_lattice_bounds() {
        let bounds = LatticeBounds::new(-3, -1, -2, 0);
        let mut analyzer = ComponentAnalyzer::new();
        let summary = analyzer.largest_component_by(&bounds, false, |i| i.x >= -2);
        assert_eq!(summary.count, 6);
    }
}
