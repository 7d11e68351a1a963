use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use wall_canvas::config::ViewConfig;
use wall_canvas::engine::{Outcome, ViewController};
use wall_canvas::scene::{Obstacle, ObstacleKind, Trajectory, Wall};
use wall_canvas::surface::DisplayList;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
    #[error("invalid config {path}: {source}")]
    Config { path: PathBuf, source: serde_json::Error },
    #[error("invalid scene document {path}: {source}")]
    Scene { path: PathBuf, source: serde_json::Error },
    #[error("scene has no wall; the first document must define one")]
    MissingWall,
    #[error("invalid zoom factor {0}; expected a finite value greater than zero")]
    InvalidZoom(f64),
    #[error("renderer rejected the scene")]
    Render,
}

#[derive(Parser, Debug)]
#[command(name = "wallview", about = "Render wall coverage scenes to SVG")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Paint one or more scene documents and write the result as SVG.
    Render(RenderArgs),
    /// Print a summary of a scene document.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Scene document; repeat to apply several in order.
    #[arg(long = "scene", required = true)]
    scenes: Vec<PathBuf>,

    #[arg(long, help = "Output file, or - for stdout", default_value = "-")]
    out: String,

    /// Zoom factor applied after the scene is loaded.
    #[arg(long, env = "WALLVIEW_ZOOM")]
    zoom: Option<f64>,

    /// Keep obstacles from earlier documents when a later one loads a new wall.
    #[arg(long, default_value_t = false)]
    keep_obstacles: bool,

    #[command(flatten)]
    view: ViewArgs,
}

/// Configuration file plus per-field overrides.
#[derive(Args, Debug, Default)]
struct ViewArgs {
    /// JSON view configuration; absent fields take defaults.
    #[arg(long, env = "WALLVIEW_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, env = "WALLVIEW_WIDTH")]
    width: Option<f64>,

    #[arg(long, env = "WALLVIEW_HEIGHT")]
    height: Option<f64>,

    #[arg(long, env = "WALLVIEW_MARGIN")]
    margin: Option<f64>,

    /// Pixels per meter before zoom.
    #[arg(long, env = "WALLVIEW_SCALE")]
    scale: Option<f64>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    #[arg(long)]
    scene: PathBuf,
}

/// A wall, its obstacles, and an optional trajectory, as one JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SceneDocument {
    wall: Option<Wall>,
    obstacles: Vec<Obstacle>,
    trajectory: Option<Trajectory>,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => run_render(args),
        Command::Inspect(args) => run_inspect(&args),
    }
}

fn run_render(args: RenderArgs) -> Result<(), CliError> {
    let config = load_config(&args.view)?;
    let documents = args.scenes.iter().map(|path| load_scene(path)).collect::<Result<Vec<_>, _>>()?;
    let surface = paint(&documents, config, args.zoom, args.keep_obstacles)?;
    let svg = surface.to_svg();

    if args.out == "-" {
        io::stdout().lock().write_all(svg.as_bytes())?;
    } else {
        fs::write(&args.out, svg)?;
        tracing::info!(out = %args.out, "wrote svg");
    }
    Ok(())
}

fn run_inspect(args: &InspectArgs) -> Result<(), CliError> {
    let document = load_scene(&args.scene)?;
    print!("{}", summarize(&document));
    Ok(())
}

fn load_config(view: &ViewArgs) -> Result<ViewConfig, CliError> {
    let mut config = match &view.config {
        Some(path) => {
            let json = read(path)?;
            ViewConfig::from_json(&json).map_err(|source| CliError::Config { path: path.clone(), source })?
        }
        None => ViewConfig::default(),
    };
    if let Some(width) = view.width {
        config.surface_width = width;
    }
    if let Some(height) = view.height {
        config.surface_height = height;
    }
    if let Some(margin) = view.margin {
        config.margin = margin;
    }
    if let Some(scale) = view.scale {
        config.initial_scale = scale;
    }
    Ok(config)
}

fn load_scene(path: &Path) -> Result<SceneDocument, CliError> {
    let json = read(path)?;
    serde_json::from_str(&json).map_err(|source| CliError::Scene { path: path.to_owned(), source })
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_owned(), source })
}

/// Drive a controller through `documents` in order and return the painted surface.
fn paint(
    documents: &[SceneDocument],
    config: ViewConfig,
    zoom: Option<f64>,
    keep_obstacles: bool,
) -> Result<DisplayList, CliError> {
    if documents.first().is_none_or(|doc| doc.wall.is_none()) {
        return Err(CliError::MissingWall);
    }
    if let Some(factor) = zoom {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(CliError::InvalidZoom(factor));
        }
    }

    let surface = DisplayList::new(config.surface_width, config.surface_height);
    let mut view = ViewController::new(surface, config);
    let mut outcome = Outcome::Unchanged;

    for doc in documents {
        if let Some(wall) = doc.wall.clone() {
            outcome = if keep_obstacles { view.load_wall_keeping_obstacles(wall) } else { view.load_wall(wall) };
        }
        for obstacle in &doc.obstacles {
            if view.show_obstacle(obstacle.clone()) == Outcome::Failed {
                outcome = Outcome::Failed;
            }
        }
        if let Some(trajectory) = doc.trajectory.clone() {
            if view.show_trajectory(trajectory) == Outcome::Failed {
                outcome = Outcome::Failed;
            }
        }
    }
    if let Some(factor) = zoom {
        outcome = view.zoom(factor);
    }

    if outcome == Outcome::Failed {
        return Err(CliError::Render);
    }
    tracing::debug!(
        obstacles = view.scene().obstacle_count(),
        scale = view.mapper().scale(),
        "scene painted"
    );
    Ok(view.into_surface())
}

fn summarize(doc: &SceneDocument) -> String {
    let mut out = String::new();
    match &doc.wall {
        Some(wall) => out.push_str(&format!(
            "wall: {} #{} ({}m × {}m, {})\n",
            wall.name, wall.id, wall.width, wall.height, wall.surface_type
        )),
        None => out.push_str("wall: none\n"),
    }

    let count = |kind: ObstacleKind| doc.obstacles.iter().filter(|o| o.kind == kind).count();
    out.push_str(&format!(
        "obstacles: {} (rectangle {}, circle {}, polygon {}, unknown {})\n",
        doc.obstacles.len(),
        count(ObstacleKind::Rectangle),
        count(ObstacleKind::Circle),
        count(ObstacleKind::Polygon),
        count(ObstacleKind::Unknown),
    ));

    match &doc.trajectory {
        Some(t) => out.push_str(&format!(
            "trajectory: {} with {} waypoints, {:.2} m, {:.1}% coverage, planned in {:.3} s\n",
            t.algorithm_type,
            t.waypoints.len(),
            t.total_distance,
            t.coverage_percentage,
            t.planning_time
        )),
        None => out.push_str("trajectory: none\n"),
    }
    out
}
