//! Shared constants for the canvas crate: palette and fixed pixel sizes.

use std::f64::consts::PI;

// ── Geometry ────────────────────────────────────────────────────

/// Arrowhead length on the axes, in pixels.
pub const AXIS_ARROW_PX: f64 = 10.0;

/// Arrowhead half-angle in radians (~30°).
pub const AXIS_ARROW_ANGLE: f64 = PI / 6.0;

/// Gap between the last axis tick and the arrow tip, in pixels.
pub const AXIS_OVERSHOOT_PX: f64 = 30.0;

/// Half-length of a tick mark, in pixels.
pub const TICK_HALF_PX: f64 = 5.0;

/// Distance from the axis to a tick label, in pixels.
pub const TICK_LABEL_GAP_PX: f64 = 15.0;

/// Radius of the origin marker, in pixels.
pub const ORIGIN_MARKER_PX: f64 = 4.0;

/// Label offset from an obstacle center (right, up), in pixels.
pub const OBSTACLE_LABEL_OFFSET_PX: f64 = 10.0;

/// Radius of the start / end waypoint markers, in pixels.
pub const ENDPOINT_MARKER_PX: f64 = 6.0;

/// Radius of interior waypoint markers, in pixels.
pub const WAYPOINT_MARKER_PX: f64 = 2.5;

/// Offset of the START / END labels from their waypoint, in pixels.
pub const ENDPOINT_LABEL_OFFSET_PX: f64 = 12.0;

/// Dash length of the background grid, in pixels.
pub const GRID_DASH_PX: f64 = 2.0;

// ── Palette ─────────────────────────────────────────────────────

pub const BACKGROUND: &str = "#FFFFFF";
pub const GRID: &str = "#E6E6E6";
pub const AXIS: &str = "#333333";
pub const AXIS_LABEL: &str = "#555555";
pub const WALL_FILL: &str = "rgba(210, 180, 140, 0.25)";
pub const WALL_STROKE: &str = "#8B5A2B";
pub const WALL_LABEL: &str = "#5C3A1A";
pub const OBSTACLE_FILL: &str = "rgba(217, 75, 75, 0.55)";
pub const OBSTACLE_STROKE: &str = "#9E1B1B";
pub const OBSTACLE_LABEL: &str = "#1F1A17";
pub const PATH_STROKE: &str = "#1E90FF";
pub const WAYPOINT_FILL: &str = "#1E90FF";
pub const START_FILL: &str = "#2E9E44";
pub const END_FILL: &str = "#D12B2B";
pub const MARKER_STROKE: &str = "#FFFFFF";
