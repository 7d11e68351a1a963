//! Scene model: the wall, its obstacles, one trajectory, and the retained store.
//!
//! The domain types mirror what the planning backend sends over JSON. All
//! geometry is in wall-local meters with the origin at the wall's bottom-left
//! corner. [`SceneState`] is the retained snapshot the renderer repaints from
//! after every change.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Backend identifier for an obstacle.
pub type ObstacleId = i64;

/// The rectangular physical surface being covered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: i64,
    pub name: String,
    /// Width in meters.
    pub width: f64,
    /// Height in meters.
    pub height: f64,
    #[serde(default = "default_surface_type")]
    pub surface_type: String,
}

fn default_surface_type() -> String {
    "standard".to_owned()
}

/// Obstacle shape discriminator.
///
/// Strings the renderer does not know decode as [`ObstacleKind::Unknown`]
/// rather than failing, so newer backends cannot break the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    /// Axis-aligned rectangle centered on `(x, y)`.
    Rectangle,
    /// Circle centered on `(x, y)`.
    Circle,
    /// Closed polygon through `vertices`.
    Polygon,
    #[serde(other)]
    Unknown,
}

/// A region excluded from coverage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    #[serde(rename = "obstacle_type")]
    pub kind: ObstacleKind,
    /// Center X in meters.
    pub x: f64,
    /// Center Y in meters.
    pub y: f64,
    #[serde(default)]
    pub name: Option<String>,
    /// Full width in meters (rectangles).
    #[serde(default)]
    pub width: Option<f64>,
    /// Full height in meters (rectangles).
    #[serde(default)]
    pub height: Option<f64>,
    /// Radius in meters (circles).
    #[serde(default)]
    pub radius: Option<f64>,
    /// `[x, y]` corners in wall-local meters (polygons).
    #[serde(default)]
    pub vertices: Option<Vec<[f64; 2]>>,
}

/// One point on a planned path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    /// Tool height; carried through but not drawn. `null` reads as 0.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub z: f64,
}

impl Waypoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// A planned coverage path plus its summary metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub algorithm_type: String,
    /// Path length in meters.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_distance: f64,
    /// Percentage of free wall area covered, 0–100.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub coverage_percentage: f64,
    /// Planner wall-clock time in seconds.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub planning_time: f64,
    /// Path order: first is the start, last is the end.
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

/// Retained snapshot of everything currently displayed.
#[derive(Debug, Clone, Default)]
pub struct SceneState {
    wall: Option<Wall>,
    obstacles: HashMap<ObstacleId, Obstacle>,
    trajectory: Option<Trajectory>,
}

impl SceneState {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the wall. Obstacles are dropped only when `clear_obstacles` is
    /// set; the trajectory is always dropped since it was planned for the old wall.
    pub fn set_wall(&mut self, wall: Wall, clear_obstacles: bool) {
        self.wall = Some(wall);
        if clear_obstacles {
            self.obstacles.clear();
        }
        self.trajectory = None;
    }

    /// Insert an obstacle. Returns `false` without touching the store if an
    /// obstacle with the same id is already present.
    pub fn add_obstacle(&mut self, obstacle: Obstacle) -> bool {
        if self.obstacles.contains_key(&obstacle.id) {
            return false;
        }
        self.obstacles.insert(obstacle.id, obstacle);
        true
    }

    /// Replace the retained trajectory.
    pub fn set_trajectory(&mut self, trajectory: Trajectory) {
        self.trajectory = Some(trajectory);
    }

    /// Drop the wall, every obstacle, and the trajectory.
    pub fn reset(&mut self) {
        self.wall = None;
        self.obstacles.clear();
        self.trajectory = None;
    }

    #[must_use]
    pub fn wall(&self) -> Option<&Wall> {
        self.wall.as_ref()
    }

    #[must_use]
    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.trajectory.as_ref()
    }

    #[must_use]
    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.get(&id)
    }

    #[must_use]
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// Return all obstacles sorted by id for a stable draw order.
    #[must_use]
    pub fn sorted_obstacles(&self) -> Vec<&Obstacle> {
        let mut obstacles: Vec<&Obstacle> = self.obstacles.values().collect();
        obstacles.sort_by_key(|o| o.id);
        obstacles
    }
}
