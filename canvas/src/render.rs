//! Rendering: paints the full scene onto a [`Surface`].
//!
//! This module receives read-only views of the scene and the coordinate
//! mapper and produces draw calls; it does not mutate any application state.
//! The surface is immediate-mode, so [`draw`] always repaints everything, in
//! a fixed layer order (later layers over earlier ones):
//!
//! 1. clear
//! 2. background grid, one line per meter
//! 3. axes with arrowheads, origin marker and meter ticks
//! 4. wall boundary and label
//! 5. obstacles
//! 6. trajectory path, waypoint markers and START / END labels
//!
//! Layers 4–6 need a loaded wall. Shapes with degenerate geometry are
//! skipped but keep their label; obstacles of an unknown kind are skipped
//! entirely. Nothing is reported as an error.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::FRAC_PI_2;

use crate::config::ViewConfig;
use crate::consts::*;
use crate::mapper::{CoordinateMapper, Point};
use crate::scene::{Obstacle, ObstacleKind, SceneState, Trajectory, Wall};
use crate::surface::{Rect, ShapeStyle, Stroke, Surface, SurfaceError, TextAlign, TextStyle};

pub const GRID_STROKE: Stroke = Stroke { color: GRID, width: 1.0, dash: Some(GRID_DASH_PX) };
pub const AXIS_STROKE: Stroke = Stroke::solid(AXIS, 2.0);
pub const TICK_STROKE: Stroke = Stroke::solid(AXIS, 1.0);
pub const AXIS_ARROW_STYLE: ShapeStyle = ShapeStyle { fill: Some(AXIS), stroke: None };
pub const ORIGIN_STYLE: ShapeStyle = ShapeStyle { fill: Some(AXIS), stroke: Some(Stroke::solid(BACKGROUND, 1.0)) };
pub const WALL_STYLE: ShapeStyle = ShapeStyle { fill: Some(WALL_FILL), stroke: Some(Stroke::solid(WALL_STROKE, 3.0)) };
pub const OBSTACLE_STYLE: ShapeStyle =
    ShapeStyle { fill: Some(OBSTACLE_FILL), stroke: Some(Stroke::solid(OBSTACLE_STROKE, 2.0)) };
pub const PATH_STROKE_STYLE: Stroke = Stroke::solid(PATH_STROKE, 2.0);
pub const START_MARKER_STYLE: ShapeStyle =
    ShapeStyle { fill: Some(START_FILL), stroke: Some(Stroke::solid(MARKER_STROKE, 2.0)) };
pub const END_MARKER_STYLE: ShapeStyle =
    ShapeStyle { fill: Some(END_FILL), stroke: Some(Stroke::solid(MARKER_STROKE, 2.0)) };
pub const WAYPOINT_MARKER_STYLE: ShapeStyle = ShapeStyle { fill: Some(WAYPOINT_FILL), stroke: None };

const TICK_LABEL_STYLE: TextStyle = TextStyle { color: AXIS_LABEL, size_px: 11.0, align: TextAlign::Center, bold: false };
const AXIS_TITLE_STYLE: TextStyle = TextStyle { color: AXIS, size_px: 12.0, align: TextAlign::Left, bold: true };
const WALL_LABEL_STYLE: TextStyle = TextStyle { color: WALL_LABEL, size_px: 14.0, align: TextAlign::Center, bold: true };
const OBSTACLE_LABEL_STYLE: TextStyle =
    TextStyle { color: OBSTACLE_LABEL, size_px: 11.0, align: TextAlign::Left, bold: false };
const START_LABEL_STYLE: TextStyle = TextStyle { color: START_FILL, size_px: 12.0, align: TextAlign::Left, bold: true };
const END_LABEL_STYLE: TextStyle = TextStyle { color: END_FILL, size_px: 12.0, align: TextAlign::Left, bold: true };

/// Tick counts along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisTicks {
    pub x: u32,
    pub y: u32,
}

/// One tick per started meter of the wall, or `config.default_ticks` on
/// both axes when no wall is loaded.
#[must_use]
pub fn axis_ticks(wall: Option<&Wall>, config: &ViewConfig) -> AxisTicks {
    match wall {
        Some(w) => AxisTicks { x: ceil_ticks(w.width), y: ceil_ticks(w.height) },
        None => AxisTicks { x: config.default_ticks, y: config.default_ticks },
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn ceil_ticks(meters: f64) -> u32 {
    if meters.is_finite() && meters > 0.0 {
        // Float-to-int casts saturate at u32::MAX.
        meters.ceil() as u32
    } else {
        0
    }
}

/// Meters between drawn ticks: one, doubled until neighbouring ticks sit at
/// least `min_grid_spacing_px` apart, matching the grid pitch.
fn tick_stride(mapper: &CoordinateMapper, config: &ViewConfig) -> u32 {
    let min_px = config.min_grid_spacing_px.max(1.0);
    let mut stride: u32 = 1;
    while mapper.length(f64::from(stride)) < min_px {
        match stride.checked_mul(2) {
            Some(next) => stride = next,
            None => break,
        }
    }
    stride
}

/// Tick values `stride, 2*stride, ...` up to and including `count`.
fn tick_values(stride: u32, count: u32) -> impl Iterator<Item = u32> {
    std::iter::successors(Some(stride), move |&i| i.checked_add(stride)).take_while(move |&i| i <= count)
}

/// Draw the full scene.
///
/// # Errors
///
/// Returns `Err` as soon as the surface rejects a call; the remaining
/// layers are not painted.
pub fn draw<S: Surface + ?Sized>(
    surface: &mut S,
    scene: &SceneState,
    mapper: &CoordinateMapper,
    config: &ViewConfig,
) -> Result<(), SurfaceError> {
    surface.clear()?;
    draw_grid(surface, mapper, config)?;
    draw_axes(surface, scene.wall(), mapper, config)?;

    let Some(wall) = scene.wall() else {
        return Ok(());
    };
    draw_wall(surface, wall, mapper)?;

    for obstacle in scene.sorted_obstacles() {
        draw_obstacle(surface, obstacle, mapper)?;
    }

    if let Some(trajectory) = scene.trajectory() {
        draw_trajectory(surface, trajectory, mapper)?;
    }
    Ok(())
}

// =============================================================
// Grid and axes
// =============================================================

fn draw_grid<S: Surface + ?Sized>(
    surface: &mut S,
    mapper: &CoordinateMapper,
    config: &ViewConfig,
) -> Result<(), SurfaceError> {
    let (width, height) = surface.size();
    let mut step = mapper.scale();
    if !step.is_finite() || step <= 0.0 {
        return Ok(());
    }
    while step < config.min_grid_spacing_px.max(1.0) {
        step *= 2.0;
    }

    let origin = mapper.origin();
    let mut x = origin.x - (origin.x / step).floor() * step;
    while x <= width {
        surface.line(Point::new(x, 0.0), Point::new(x, height), &GRID_STROKE)?;
        x += step;
    }
    let mut y = origin.y - (origin.y / step).floor() * step;
    while y <= height {
        surface.line(Point::new(0.0, y), Point::new(width, y), &GRID_STROKE)?;
        y += step;
    }
    Ok(())
}

fn draw_axes<S: Surface + ?Sized>(
    surface: &mut S,
    wall: Option<&Wall>,
    mapper: &CoordinateMapper,
    config: &ViewConfig,
) -> Result<(), SurfaceError> {
    let ticks = axis_ticks(wall, config);
    let stride = tick_stride(mapper, config);
    let (width, _) = surface.size();
    let origin = mapper.origin();

    let x_tip = Point::new(mapper.to_pixel(f64::from(ticks.x), 0.0).x + AXIS_OVERSHOOT_PX, origin.y);
    let y_tip = Point::new(origin.x, mapper.to_pixel(0.0, f64::from(ticks.y)).y - AXIS_OVERSHOOT_PX);

    surface.line(origin, x_tip, &AXIS_STROKE)?;
    surface.line(origin, y_tip, &AXIS_STROKE)?;
    draw_arrowhead(surface, x_tip, 0.0)?;
    draw_arrowhead(surface, y_tip, -FRAC_PI_2)?;

    surface.circle(origin, ORIGIN_MARKER_PX, &ORIGIN_STYLE)?;
    surface.text(
        "0",
        Point::new(origin.x - TICK_LABEL_GAP_PX, origin.y + TICK_LABEL_GAP_PX),
        &TICK_LABEL_STYLE,
    )?;

    // Ticks past the surface edge are not drawn.
    for i in tick_values(stride, ticks.x) {
        let p = mapper.to_pixel(f64::from(i), 0.0);
        if p.x > width {
            break;
        }
        surface.line(Point::new(p.x, p.y - TICK_HALF_PX), Point::new(p.x, p.y + TICK_HALF_PX), &TICK_STROKE)?;
        surface.text(&i.to_string(), Point::new(p.x, p.y + TICK_LABEL_GAP_PX), &TICK_LABEL_STYLE)?;
    }
    let y_label_style = TextStyle { align: TextAlign::Right, ..TICK_LABEL_STYLE };
    for i in tick_values(stride, ticks.y) {
        let p = mapper.to_pixel(0.0, f64::from(i));
        if p.y < 0.0 {
            break;
        }
        surface.line(Point::new(p.x - TICK_HALF_PX, p.y), Point::new(p.x + TICK_HALF_PX, p.y), &TICK_STROKE)?;
        surface.text(&i.to_string(), Point::new(p.x - TICK_LABEL_GAP_PX, p.y), &y_label_style)?;
    }

    surface.text("X (m)", Point::new(x_tip.x + 6.0, x_tip.y), &AXIS_TITLE_STYLE)?;
    surface.text("Y (m)", Point::new(y_tip.x + 6.0, y_tip.y - 10.0), &AXIS_TITLE_STYLE)?;
    Ok(())
}

/// Filled triangle pointing along `angle` (radians, pixel space) with its tip at `tip`.
fn draw_arrowhead<S: Surface + ?Sized>(surface: &mut S, tip: Point, angle: f64) -> Result<(), SurfaceError> {
    let left = Point::new(
        tip.x - AXIS_ARROW_PX * (angle - AXIS_ARROW_ANGLE).cos(),
        tip.y - AXIS_ARROW_PX * (angle - AXIS_ARROW_ANGLE).sin(),
    );
    let right = Point::new(
        tip.x - AXIS_ARROW_PX * (angle + AXIS_ARROW_ANGLE).cos(),
        tip.y - AXIS_ARROW_PX * (angle + AXIS_ARROW_ANGLE).sin(),
    );
    surface.polygon(&[tip, left, right], &AXIS_ARROW_STYLE)
}

// =============================================================
// Wall
// =============================================================

fn draw_wall<S: Surface + ?Sized>(surface: &mut S, wall: &Wall, mapper: &CoordinateMapper) -> Result<(), SurfaceError> {
    let width = wall.width.max(0.0);
    let height = wall.height.max(0.0);

    let top_left = mapper.to_pixel(0.0, height);
    let rect = Rect { x: top_left.x, y: top_left.y, width: mapper.length(width), height: mapper.length(height) };
    surface.rect(rect, &WALL_STYLE)?;

    let label = format!("{} ({}m × {}m)", wall.name, wall.width, wall.height);
    surface.text(&label, mapper.to_pixel(width / 2.0, height / 2.0), &WALL_LABEL_STYLE)
}

// =============================================================
// Obstacles
// =============================================================

fn draw_obstacle<S: Surface + ?Sized>(
    surface: &mut S,
    obstacle: &Obstacle,
    mapper: &CoordinateMapper,
) -> Result<(), SurfaceError> {
    let center = mapper.to_pixel(obstacle.x, obstacle.y);

    let drawn = match obstacle.kind {
        ObstacleKind::Rectangle => {
            let w = positive(obstacle.width).map(|w| mapper.length(w));
            let h = positive(obstacle.height).map(|h| mapper.length(h));
            match (w, h) {
                (Some(w), Some(h)) => {
                    surface.rect(Rect::centered(center, w, h), &OBSTACLE_STYLE)?;
                    true
                }
                _ => false,
            }
        }
        ObstacleKind::Circle => match positive(obstacle.radius) {
            Some(r) => {
                surface.circle(center, mapper.length(r), &OBSTACLE_STYLE)?;
                true
            }
            None => false,
        },
        ObstacleKind::Polygon => match obstacle.vertices.as_deref() {
            Some(vertices) if vertices.len() >= 3 => {
                let points: Vec<Point> = vertices.iter().map(|&[x, y]| mapper.to_pixel(x, y)).collect();
                surface.polygon(&points, &OBSTACLE_STYLE)?;
                true
            }
            _ => false,
        },
        ObstacleKind::Unknown => false,
    };

    if obstacle.kind == ObstacleKind::Unknown {
        tracing::debug!(id = obstacle.id, "obstacle kind not drawable");
        return Ok(());
    }
    if !drawn {
        tracing::debug!(id = obstacle.id, kind = ?obstacle.kind, "obstacle shape is degenerate");
    }

    match obstacle.name.as_deref() {
        Some(name) if !name.is_empty() => surface.text(
            name,
            Point::new(center.x + OBSTACLE_LABEL_OFFSET_PX, center.y - OBSTACLE_LABEL_OFFSET_PX),
            &OBSTACLE_LABEL_STYLE,
        ),
        _ => Ok(()),
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

// =============================================================
// Trajectory
// =============================================================

fn draw_trajectory<S: Surface + ?Sized>(
    surface: &mut S,
    trajectory: &Trajectory,
    mapper: &CoordinateMapper,
) -> Result<(), SurfaceError> {
    let points: Vec<Point> = trajectory
        .waypoints
        .iter()
        .map(|w| mapper.to_pixel(w.x, w.y))
        .collect();
    let (Some(&start), Some(&end)) = (points.first(), points.last()) else {
        return Ok(());
    };

    if points.len() >= 2 {
        surface.polyline(&points, &PATH_STROKE_STYLE)?;
    }

    // Interior markers first so the start and end markers sit on top.
    for p in points.iter().skip(1).take(points.len().saturating_sub(2)) {
        surface.circle(*p, WAYPOINT_MARKER_PX, &WAYPOINT_MARKER_STYLE)?;
    }
    surface.circle(start, ENDPOINT_MARKER_PX, &START_MARKER_STYLE)?;
    if points.len() >= 2 {
        surface.circle(end, ENDPOINT_MARKER_PX, &END_MARKER_STYLE)?;
    }

    surface.text("START", label_anchor(start), &START_LABEL_STYLE)?;
    if points.len() >= 2 {
        surface.text("END", label_anchor(end), &END_LABEL_STYLE)?;
    }
    Ok(())
}

fn label_anchor(p: Point) -> Point {
    Point::new(p.x + ENDPOINT_LABEL_OFFSET_PX, p.y - ENDPOINT_LABEL_OFFSET_PX)
}
