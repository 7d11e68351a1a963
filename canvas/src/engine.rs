use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::browser::CanvasSurface;
use crate::config::ViewConfig;
use crate::mapper::CoordinateMapper;
use crate::render;
use crate::scene::{Obstacle, SceneState, Trajectory, Wall};
use crate::surface::Surface;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// What an operation did to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The full scene was repainted.
    Repainted,
    /// Nothing changed; the surface was not touched.
    Unchanged,
    /// The scene was updated but the surface rejected the paint pass.
    Failed,
}

/// Scene orchestration, minus the browser binding.
///
/// Each public operation mutates the retained [`SceneState`] and then runs a
/// full [`render::draw`] pass. Operations never return errors: bad input is
/// ignored and surface failures are logged.
///
/// Callers must serialize operations; the controller holds no locks.
pub struct ViewController<S> {
    scene: SceneState,
    mapper: CoordinateMapper,
    config: ViewConfig,
    surface: S,
}

impl<S: Surface> ViewController<S> {
    /// Create a controller drawing onto `surface`. The surface's size wins
    /// over `config.surface_width` / `surface_height`. Nothing is painted
    /// until the first operation.
    #[must_use]
    pub fn new(surface: S, mut config: ViewConfig) -> Self {
        let (width, height) = surface.size();
        config.surface_width = width;
        config.surface_height = height;
        Self { scene: SceneState::new(), mapper: CoordinateMapper::new(&config), config, surface }
    }

    // --- Operations ---

    /// Forget the wall, obstacles and trajectory; paint grid and axes only.
    pub fn clear(&mut self) -> Outcome {
        tracing::debug!("clear scene");
        self.scene.reset();
        self.repaint()
    }

    /// Display `wall`, dropping all obstacles and any trajectory.
    pub fn load_wall(&mut self, wall: Wall) -> Outcome {
        self.replace_wall(wall, true)
    }

    /// Display `wall` but keep the current obstacles. The trajectory is still dropped.
    pub fn load_wall_keeping_obstacles(&mut self, wall: Wall) -> Outcome {
        self.replace_wall(wall, false)
    }

    fn replace_wall(&mut self, wall: Wall, clear_obstacles: bool) -> Outcome {
        tracing::debug!(id = wall.id, name = %wall.name, width = wall.width, height = wall.height, clear_obstacles, "load wall");
        self.scene.set_wall(wall, clear_obstacles);
        self.repaint()
    }

    /// Add `obstacle` and repaint. Ignored if no wall is loaded or an
    /// obstacle with the same id is already shown.
    pub fn show_obstacle(&mut self, obstacle: Obstacle) -> Outcome {
        if self.scene.wall().is_none() {
            tracing::debug!(id = obstacle.id, "no wall loaded; obstacle ignored");
            return Outcome::Unchanged;
        }
        let id = obstacle.id;
        if !self.scene.add_obstacle(obstacle) {
            tracing::debug!(id, "obstacle already shown");
            return Outcome::Unchanged;
        }
        tracing::debug!(id, count = self.scene.obstacle_count(), "obstacle added");
        self.repaint()
    }

    /// Replace the displayed trajectory and repaint. Ignored if no wall is
    /// loaded or `trajectory` has no waypoints, leaving the surface as it was.
    pub fn show_trajectory(&mut self, trajectory: Trajectory) -> Outcome {
        if self.scene.wall().is_none() {
            tracing::debug!("no wall loaded; trajectory ignored");
            return Outcome::Unchanged;
        }
        if trajectory.waypoints.is_empty() {
            tracing::debug!(algorithm = %trajectory.algorithm_type, "trajectory has no waypoints");
            return Outcome::Unchanged;
        }
        tracing::debug!(
            algorithm = %trajectory.algorithm_type,
            waypoints = trajectory.waypoints.len(),
            distance = trajectory.total_distance,
            coverage = trajectory.coverage_percentage,
            "show trajectory"
        );
        self.scene.set_trajectory(trajectory);
        self.repaint()
    }

    /// Multiply the scale by `factor` and repaint everything at the new scale.
    pub fn zoom(&mut self, factor: f64) -> Outcome {
        if !self.mapper.set_scale(factor) {
            return Outcome::Unchanged;
        }
        tracing::debug!(factor, scale = self.mapper.scale(), "zoom");
        self.repaint()
    }

    /// Adopt a new surface size, re-anchor the origin, and repaint.
    pub fn resize(&mut self, width: f64, height: f64) -> Outcome {
        if !is_valid_size(width, height) {
            tracing::warn!(width, height, "ignoring invalid surface size");
            return Outcome::Unchanged;
        }
        self.surface.set_size(width, height);
        self.config.surface_width = width;
        self.config.surface_height = height;
        self.mapper.resize(height);
        self.repaint()
    }

    /// Run the full paint pipeline from the retained scene.
    pub fn repaint(&mut self) -> Outcome {
        match render::draw(&mut self.surface, &self.scene, &self.mapper, &self.config) {
            Ok(()) => Outcome::Repainted,
            Err(e) => {
                tracing::warn!(error = %e, "paint pass failed");
                Outcome::Failed
            }
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    #[must_use]
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    #[must_use]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Consume the controller and hand back the surface.
    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }
}

/// Browser binding. Owns the `<canvas>` element and forwards JSON payloads
/// from the page to a [`ViewController`].
///
/// Methods return `true` when the canvas was repainted.
#[wasm_bindgen]
pub struct WallView {
    canvas: HtmlCanvasElement,
    view: ViewController<CanvasSurface>,
}

#[wasm_bindgen]
impl WallView {
    /// Bind to `canvas` and paint the empty grid.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the element has no 2D context.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<WallView, JsValue> {
        let surface = CanvasSurface::from_element(&canvas).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let mut view = ViewController::new(surface, ViewConfig::default());
        view.clear();
        Ok(Self { canvas, view })
    }

    pub fn clear(&mut self) -> bool {
        self.view.clear() == Outcome::Repainted
    }

    /// `wall_json` is a backend wall object. `clear_obstacles` chooses
    /// whether the currently shown obstacles survive the reload.
    pub fn load_wall(&mut self, wall_json: &str, clear_obstacles: bool) -> bool {
        let Some(wall) = decode::<Wall>(wall_json, "wall") else {
            return false;
        };
        let outcome = if clear_obstacles {
            self.view.load_wall(wall)
        } else {
            self.view.load_wall_keeping_obstacles(wall)
        };
        outcome == Outcome::Repainted
    }

    pub fn show_obstacle(&mut self, obstacle_json: &str) -> bool {
        decode::<Obstacle>(obstacle_json, "obstacle")
            .is_some_and(|o| self.view.show_obstacle(o) == Outcome::Repainted)
    }

    pub fn show_trajectory(&mut self, trajectory_json: &str) -> bool {
        decode::<Trajectory>(trajectory_json, "trajectory")
            .is_some_and(|t| self.view.show_trajectory(t) == Outcome::Repainted)
    }

    pub fn zoom(&mut self, factor: f64) -> bool {
        self.view.zoom(factor) == Outcome::Repainted
    }

    /// Resize the backing canvas to `width` × `height` device pixels and repaint.
    /// A rejected size leaves the element untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let (w, h) = (f64::from(width), f64::from(height));
        if !is_valid_size(w, h) {
            tracing::warn!(width, height, "ignoring invalid canvas size");
            return false;
        }
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.view.resize(w, h) == Outcome::Repainted
    }

    /// Current pixels per meter.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.view.mapper().scale()
    }
}

/// Whether `width` × `height` pixels is a usable surface size.
#[must_use]
pub fn is_valid_size(width: f64, height: f64) -> bool {
    width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
}

fn decode<T: DeserializeOwned>(json: &str, what: &'static str) -> Option<T> {
    match serde_json::from_str(json) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, what, "rejecting malformed payload");
            None
        }
    }
}
