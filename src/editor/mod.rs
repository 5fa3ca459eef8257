// src/editor/mod.rs

//! Bevy-Anbindung: hält Region und Gitterlage als Ressourcen, rasterisiert bei
//! jeder Änderung neu und führt die Ausrichtungssuche im Hintergrund aus.

pub mod events;
pub mod resources;
pub mod systems;

use bevy::prelude::*;
pub use events::*;
pub use resources::*;
use systems::*;

/// Systemmenge des Plugins, damit Hosts sich davor oder danach einreihen können
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridFitSystems;

pub struct GridFitPlugin;

impl Plugin for GridFitPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GridState>()
            .init_resource::<RasterOverlay>()
            .init_resource::<AlignmentJob>()
            .init_resource::<GridFitSettings>()
            .add_event::<RegionEdit>()
            .add_event::<RequestAlignment>()
            .add_event::<CancelAlignment>()
            .add_event::<AlignmentFinished>()
            .add_systems(
                Update,
                (
                    apply_region_edits_system,
                    start_alignment_system,
                    cancel_alignment_system,
                    poll_alignment_system,
                    refresh_raster_overlay_system,
                )
                    .chain()
                    .in_set(GridFitSystems),
            );
    }
}
