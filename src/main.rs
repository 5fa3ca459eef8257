// ./src/main.rs
use bevy::app::AppExit;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use grid_fit::{
    debug::visualization::svg::write_raster_svg,
    editor::{
        AlignmentFinished, GridFitPlugin, GridFitSettings, GridFitSystems, GridState,
        RasterOverlay, RequestAlignment,
    },
    math::{
        alignment::{SearchConfig, SearchOutcome},
        geometry::Region,
        raster::RasterConfig,
        types::{GridPose, Point2D},
        utils::angles,
    },
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "grid_fit",
    version,
    about = "Rasterizes a region under a rotated grid and counts fully covered cells"
)]
struct Cli {
    /// Region als JSON: {"polygons": [[[[x, y], ...], ...], ...]}
    #[arg(long)]
    region: PathBuf,
    #[arg(long, default_value_t = 1.0)]
    spacing: f64,
    #[arg(long, default_value_t = 0.0)]
    angle_deg: f64,
    #[arg(long, default_value_t = 0.0)]
    origin_x: f64,
    #[arg(long, default_value_t = 0.0)]
    origin_y: f64,
    /// Sucht Winkel und Ursprung mit der größten zusammenhängenden Zellmenge
    #[arg(long)]
    align: bool,
    #[arg(long)]
    svg: Option<PathBuf>,
    /// Raster-Zellen pro Gitterzellen-Kante
    #[arg(long, default_value_t = 8)]
    resolution: u32,
}

#[derive(Resource, Debug)]
struct CliOptions {
    align: bool,
    svg: Option<PathBuf>,
}

/// Zeile auf stdout am Ende des Laufs
#[derive(Serialize)]
struct Report {
    cell_count: usize,
    pose: GridPose,
    aligned: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let text = std::fs::read_to_string(&cli.region)?;
    let region: Region = serde_json::from_str(&text)?;

    let pose = GridPose::new(
        Point2D::new(cli.origin_x, cli.origin_y),
        angles::normalize_angle(angles::deg_to_rad(cli.angle_deg)),
        cli.spacing,
    );
    pose.validate()?;

    let config = SearchConfig::default()
        .with_raster(RasterConfig::default().with_resolution(cli.resolution));
    config.validate()?;

    App::new()
        .add_plugins((MinimalPlugins, LogPlugin::default(), GridFitPlugin))
        .insert_resource(GridState {
            region: (!region.is_empty()).then_some(region),
            pose,
        })
        .insert_resource(GridFitSettings(config))
        .insert_resource(CliOptions {
            align: cli.align,
            svg: cli.svg,
        })
        .add_systems(Startup, request_alignment_system)
        .add_systems(Update, report_and_exit_system.after(GridFitSystems))
        .run();

    Ok(())
}

fn request_alignment_system(options: Res<CliOptions>, mut requests: EventWriter<RequestAlignment>) {
    if options.align {
        requests.send(RequestAlignment);
    }
}

/// Läuft, sobald das Overlay (und bei `--align` die Suche) fertig ist.
fn report_and_exit_system(
    options: Res<CliOptions>,
    state: Res<GridState>,
    overlay: Res<RasterOverlay>,
    mut finished: EventReader<AlignmentFinished>,
    mut exit: EventWriter<AppExit>,
) {
    if options.align {
        let Some(AlignmentFinished(outcome)) = finished.read().last() else {
            return;
        };
        match outcome {
            SearchOutcome::Completed(Some(result)) => info!("Best alignment: {}", result),
            SearchOutcome::Completed(None) => warn!("No orientation produced a rasterization"),
            SearchOutcome::Cancelled { .. } => info!("Alignment search cancelled"),
        }
    }

    match (&overlay.0, &state.region) {
        (Some(result), Some(region)) => {
            info!(
                "{} grid cells fully inside ({} raster cells occupied)",
                result.grid_cell_count,
                result.occupied_count()
            );
            if let Some(path) = &options.svg {
                if let Err(err) = write_raster_svg(path, region, result) {
                    error!("Failed to write {}: {}", path.display(), err);
                }
            }
        }
        _ => warn!("Region could not be rasterized"),
    }

    let report = Report {
        cell_count: overlay.cell_count(),
        pose: state.pose,
        aligned: options.align,
    };
    match serde_json::to_string(&report) {
        Ok(line) => println!("{line}"),
        Err(err) => error!("Failed to serialize report: {}", err),
    }

    exit.send(AppExit);
}
