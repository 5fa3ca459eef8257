// src/editor/resources.rs
use crate::math::{
    alignment::{CancellationToken, SearchConfig, SearchOutcome},
    geometry::Region,
    raster::RasterResult,
    types::GridPose,
};
use bevy::prelude::*;
use bevy::tasks::Task;

/// Einziger veränderlicher Zustand des Editors. Rasterizer und Suche bekommen
/// nur Kopien davon; Ergebnisse schreibt ausschließlich der Host zurück.
#[derive(Resource, Debug, Clone, Default)]
pub struct GridState {
    pub region: Option<Region>,
    pub pose: GridPose,
}

/// Rasterisierung für den aktuellen `GridState`, `None` ohne gültige Region
#[derive(Resource, Debug, Default)]
pub struct RasterOverlay(pub Option<RasterResult>);

impl RasterOverlay {
    pub fn cell_count(&self) -> usize {
        self.0.as_ref().map_or(0, |result| result.grid_cell_count)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct GridFitSettings(pub SearchConfig);

/// Laufende Suche auf dem `AsyncComputeTaskPool`
pub struct RunningSearch {
    pub task: Task<SearchOutcome>,
    pub token: CancellationToken,
}

impl std::fmt::Debug for RunningSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunningSearch")
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

/// Höchstens eine Suche gleichzeitig
#[derive(Resource, Debug, Default)]
pub struct AlignmentJob {
    pub(crate) running: Option<RunningSearch>,
}

impl AlignmentJob {
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Setzt das Abbruchsignal, ohne auf das Ende zu warten
    pub fn request_cancel(&self) {
        if let Some(running) = &self.running {
            running.token.cancel();
        }
    }
}
