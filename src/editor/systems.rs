// src/editor/systems.rs
use super::events::{AlignmentFinished, CancelAlignment, RegionEdit, RequestAlignment};
use super::resources::{AlignmentJob, GridFitSettings, GridState, RasterOverlay, RunningSearch};
use crate::math::{
    alignment::{AlignmentSearch, CancellationToken, CooperativeYield, SearchOutcome},
    geometry::{difference, union},
    raster::Rasterizer,
};
use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, futures_lite::future};

/// Wendet Vereinigung / Differenz / Ersetzung auf die Region an
pub fn apply_region_edits_system(mut edits: EventReader<RegionEdit>, mut state: ResMut<GridState>) {
    for edit in edits.read() {
        match edit {
            RegionEdit::Union(addition) => {
                state.region = union(state.region.as_ref(), addition);
            }
            RegionEdit::Subtract(removal) => {
                // Ohne Region gibt es nichts abzuziehen
                let Some(current) = state.region.as_ref() else {
                    continue;
                };
                state.region = difference(current, removal);
            }
            RegionEdit::Replace(region) => {
                state.region = region.clone().filter(|r| !r.is_empty());
            }
        }
        debug!(
            "Region edited, {} polygons",
            state.region.as_ref().map_or(0, |r| r.polygons().len())
        );
    }
}

/// Startet eine neue Suche. Eine noch laufende wird abgebrochen und abgewartet,
/// bevor die neue beginnt, damit nie zwei Suchen denselben Zustand schreiben.
pub fn start_alignment_system(
    mut requests: EventReader<RequestAlignment>,
    state: Res<GridState>,
    settings: Res<GridFitSettings>,
    mut job: ResMut<AlignmentJob>,
    mut finished: EventWriter<AlignmentFinished>,
) {
    if requests.read().count() == 0 {
        return;
    }

    if let Some(previous) = job.running.take() {
        previous.token.cancel();
        let outcome = future::block_on(previous.task);
        debug!("Previous alignment search ended before restart");
        finished.send(AlignmentFinished(outcome));
    }

    let Some(region) = state.region.clone() else {
        info!("Alignment requested without a region");
        finished.send(AlignmentFinished(SearchOutcome::Completed(None)));
        return;
    };

    let mut search = match AlignmentSearch::new(settings.0.clone()) {
        Ok(search) => search,
        Err(err) => {
            warn!("Alignment search not started: {}", err);
            return;
        }
    };

    let token = CancellationToken::new();
    let task_token = token.clone();
    let base_pose = state.pose;
    let task = AsyncComputeTaskPool::get().spawn(async move {
        search
            .run(&region, &base_pose, &task_token, &mut CooperativeYield)
            .await
    });

    info!("Alignment search started");
    job.running = Some(RunningSearch { task, token });
}

pub fn cancel_alignment_system(mut requests: EventReader<CancelAlignment>, job: Res<AlignmentJob>) {
    if requests.read().count() > 0 && job.is_running() {
        debug!("Alignment search cancellation requested");
        job.request_cancel();
    }
}

/// Fragt die laufende Suche ab und übernimmt ein vollständiges Ergebnis in den Zustand.
pub fn poll_alignment_system(
    mut job: ResMut<AlignmentJob>,
    mut state: ResMut<GridState>,
    mut finished: EventWriter<AlignmentFinished>,
) {
    let Some(running) = job.running.as_mut() else {
        return;
    };
    let Some(outcome) = future::block_on(future::poll_once(&mut running.task)) else {
        return;
    };
    job.running = None;

    match outcome {
        SearchOutcome::Completed(Some(result)) => {
            info!("Applying alignment: {}", result);
            state.pose.origin = result.origin;
            state.pose.angle = result.angle;
        }
        SearchOutcome::Completed(None) => info!("Alignment search found no valid orientation"),
        SearchOutcome::Cancelled { .. } => debug!("Alignment search cancelled"),
    }
    finished.send(AlignmentFinished(outcome));
}

/// Rasterisiert neu, sobald sich Region, Lage oder Einstellungen geändert haben
pub fn refresh_raster_overlay_system(
    state: Res<GridState>,
    settings: Res<GridFitSettings>,
    mut overlay: ResMut<RasterOverlay>,
) {
    if !state.is_changed() && !settings.is_changed() {
        return;
    }

    let rasterizer = match Rasterizer::new(settings.0.raster.clone()) {
        Ok(rasterizer) => rasterizer,
        Err(err) => {
            warn!("Raster overlay not updated: {}", err);
            return;
        }
    };

    overlay.0 = state
        .region
        .as_ref()
        .and_then(|region| rasterizer.rasterize(region, &state.pose));
    debug!("Raster overlay: {} grid cells inside", overlay.cell_count());
}
