#![allow(clippy::float_cmp)]

use std::io::Write as _;

use serde_json::json;
use wall_canvas::render::{OBSTACLE_STYLE, WALL_STYLE};
use wall_canvas::surface::DrawOp;

use super::*;

fn document(value: serde_json::Value) -> SceneDocument {
    serde_json::from_value(value).unwrap()
}

fn sample() -> SceneDocument {
    document(json!({
        "wall": { "id": 1, "name": "Lobby", "width": 5.0, "height": 3.0 },
        "obstacles": [
            { "id": 1, "obstacle_type": "rectangle", "x": 1.0, "y": 1.0, "width": 1.2, "height": 0.8, "name": "Window" },
            { "id": 2, "obstacle_type": "circle", "x": 4.0, "y": 1.5, "radius": 0.15 }
        ],
        "trajectory": {
            "algorithm_type": "boustrophedon",
            "total_distance": 19.6,
            "coverage_percentage": null,
            "planning_time": 0.125,
            "waypoints": [
                { "x": 0.1, "y": 0.1 }, { "x": 0.1, "y": 2.9 },
                { "x": 4.9, "y": 2.9 }, { "x": 4.9, "y": 0.1 }
            ]
        }
    }))
}

fn obstacle_shapes(list: &DisplayList) -> usize {
    list.ops()
        .iter()
        .filter(|op| {
            matches!(
                op,
                DrawOp::Rect { style, .. } | DrawOp::Circle { style, .. } if *style == OBSTACLE_STYLE
            )
        })
        .count()
}

fn temp_json(value: &serde_json::Value) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(value.to_string().as_bytes()).unwrap();
    file
}

// =============================================================
// Argument parsing
// =============================================================

#[test]
fn render_requires_scene() {
    assert!(Cli::try_parse_from(["wallview", "render"]).is_err());
}

#[test]
fn render_parses_repeated_scenes_and_overrides() {
    let cli = Cli::try_parse_from([
        "wallview", "render", "--scene", "a.json", "--scene", "b.json", "--zoom", "1.5", "--width", "1024",
        "--keep-obstacles",
    ])
    .unwrap();
    let Command::Render(args) = cli.command else {
        panic!("expected render");
    };
    assert_eq!(args.scenes, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
    assert_eq!(args.zoom, Some(1.5));
    assert_eq!(args.view.width, Some(1024.0));
    assert!(args.keep_obstacles);
    assert_eq!(args.out, "-");
}

// =============================================================
// Configuration
// =============================================================

#[test]
fn config_defaults_without_file() {
    assert_eq!(load_config(&ViewArgs::default()).unwrap(), ViewConfig::default());
}

#[test]
fn config_file_then_flag_overrides() {
    let file = temp_json(&json!({ "margin": 20.0, "initial_scale": 40.0 }));
    let args = ViewArgs { config: Some(file.path().to_owned()), scale: Some(80.0), ..ViewArgs::default() };
    let config = load_config(&args).unwrap();
    assert_eq!(config.margin, 20.0);
    assert_eq!(config.initial_scale, 80.0);
    assert_eq!(config.surface_width, 800.0);
}

#[test]
fn config_file_with_bad_field_is_reported() {
    let file = temp_json(&json!({ "margin": "wide" }));
    let args = ViewArgs { config: Some(file.path().to_owned()), ..ViewArgs::default() };
    assert!(matches!(load_config(&args), Err(CliError::Config { .. })));
}

// =============================================================
// Scene documents
// =============================================================

#[test]
fn missing_scene_file_is_read_error() {
    let result = load_scene(Path::new("/nonexistent/wallview/scene.json"));
    assert!(matches!(result, Err(CliError::Read { .. })));
}

#[test]
fn scene_file_round_trips_through_loader() {
    let file = temp_json(&json!({ "wall": { "id": 3, "name": "Hall", "width": 2.0, "height": 1.0 } }));
    let doc = load_scene(file.path()).unwrap();
    assert_eq!(doc.wall.map(|w| w.name), Some("Hall".to_owned()));
    assert!(doc.obstacles.is_empty());
    assert!(doc.trajectory.is_none());
}

#[test]
fn malformed_scene_is_scene_error() {
    let file = temp_json(&json!({ "wall": { "id": "x" } }));
    assert!(matches!(load_scene(file.path()), Err(CliError::Scene { .. })));
}

// =============================================================
// Painting
// =============================================================

#[test]
fn paint_full_scene() {
    let list = paint(&[sample()], ViewConfig::default(), None, false).unwrap();
    let walls = list.ops().iter().filter(|op| matches!(op, DrawOp::Rect { style, .. } if *style == WALL_STYLE)).count();
    assert_eq!(walls, 1);
    assert_eq!(obstacle_shapes(&list), 2);
    assert!(list.ops().iter().any(|op| matches!(op, DrawOp::Polyline { points, .. } if points.len() == 4)));
    let svg = list.to_svg();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Lobby (5m × 3m)"));
    assert!(svg.contains(">Window</text>"));
}

#[test]
fn paint_applies_zoom_last() {
    let list = paint(&[sample()], ViewConfig::default(), Some(0.5), false).unwrap();
    let rect = list.ops().iter().find_map(|op| match op {
        DrawOp::Rect { rect, style } if *style == WALL_STYLE => Some(*rect),
        _ => None,
    });
    assert_eq!(rect.map(|r| r.width), Some(250.0));
}

#[test]
fn paint_requires_wall_in_first_document() {
    let doc = document(json!({ "obstacles": [] }));
    assert!(matches!(paint(&[doc], ViewConfig::default(), None, false), Err(CliError::MissingWall)));
    assert!(matches!(paint(&[], ViewConfig::default(), None, false), Err(CliError::MissingWall)));
}

#[test]
fn paint_rejects_bad_zoom() {
    assert!(matches!(paint(&[sample()], ViewConfig::default(), Some(0.0), false), Err(CliError::InvalidZoom(_))));
    assert!(matches!(
        paint(&[sample()], ViewConfig::default(), Some(f64::NAN), false),
        Err(CliError::InvalidZoom(_))
    ));
}

#[test]
fn later_wall_drops_obstacles_unless_kept() {
    let next = document(json!({ "wall": { "id": 2, "name": "Annex", "width": 6.0, "height": 3.0 } }));

    let dropped = paint(&[sample(), next.clone()], ViewConfig::default(), None, false).unwrap();
    assert_eq!(obstacle_shapes(&dropped), 0);

    let kept = paint(&[sample(), next], ViewConfig::default(), None, true).unwrap();
    assert_eq!(obstacle_shapes(&kept), 2);
    assert!(!kept.ops().iter().any(|op| matches!(op, DrawOp::Polyline { .. })));
}

#[test]
fn paint_uses_configured_surface_size() {
    let config = ViewConfig { surface_width: 400.0, surface_height: 300.0, ..ViewConfig::default() };
    let list = paint(&[sample()], config, None, false).unwrap();
    assert!(list.to_svg().contains("viewBox=\"0 0 400 300\""));
}

// =============================================================
// Inspect
// =============================================================

#[test]
fn summary_lists_wall_obstacles_and_metrics() {
    let summary = summarize(&sample());
    assert_eq!(
        summary,
        "wall: Lobby #1 (5m × 3m, standard)\n\
         obstacles: 2 (rectangle 1, circle 1, polygon 0, unknown 0)\n\
         trajectory: boustrophedon with 4 waypoints, 19.60 m, 0.0% coverage, planned in 0.125 s\n"
    );
}

#[test]
fn summary_of_empty_document() {
    assert_eq!(summarize(&SceneDocument::default()), "wall: none\nobstacles: 0 (rectangle 0, circle 0, polygon 0, unknown 0)\ntrajectory: none\n");
}
