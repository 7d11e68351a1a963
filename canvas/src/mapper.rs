#[cfg(test)]
#[path = "mapper_test.rs"]
mod mapper_test;

use crate::config::ViewConfig;

/// A point in either pixel or meter space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Transform between wall-local meters and surface pixels.
///
/// Meter `(0, 0)` sits at `origin`, a fixed margin in from the bottom-left
/// corner of the surface. Meter Y grows upward while pixel Y grows downward.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    scale: f64,
    origin: Point,
    margin: f64,
    surface_height: f64,
}

impl CoordinateMapper {
    #[must_use]
    pub fn new(config: &ViewConfig) -> Self {
        let scale = if config.initial_scale.is_finite() && config.initial_scale > 0.0 {
            config.initial_scale
        } else {
            ViewConfig::default().initial_scale
        };
        Self {
            scale,
            origin: anchor(config.margin, config.surface_height),
            margin: config.margin,
            surface_height: config.surface_height,
        }
    }

    /// Pixels per meter.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Pixel position of meter `(0, 0)`.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Convert a wall-local meter position to surface pixels.
    #[must_use]
    pub fn to_pixel(&self, x: f64, y: f64) -> Point {
        Point {
            x: self.origin.x + x * self.scale,
            y: self.origin.y - y * self.scale,
        }
    }

    /// Convert a surface pixel back to wall-local meters.
    #[must_use]
    pub fn to_meters(&self, pixel: Point) -> Point {
        Point {
            x: (pixel.x - self.origin.x) / self.scale,
            y: (self.origin.y - pixel.y) / self.scale,
        }
    }

    /// Convert a length in meters to pixels.
    #[must_use]
    pub fn length(&self, meters: f64) -> f64 {
        meters * self.scale
    }

    /// Multiply the scale by `factor`. Returns `false` (and changes nothing)
    /// for zero, negative, or non-finite factors, or if the result would not
    /// be a usable scale.
    pub fn set_scale(&mut self, factor: f64) -> bool {
        let next = self.scale * factor;
        if !factor.is_finite() || factor <= 0.0 || !next.is_finite() || next <= 0.0 {
            tracing::warn!(factor, scale = self.scale, "ignoring invalid zoom factor");
            return false;
        }
        self.scale = next;
        self.origin = anchor(self.margin, self.surface_height);
        true
    }

    /// Track a new surface height; the origin stays `margin` above the bottom edge.
    pub fn resize(&mut self, surface_height: f64) {
        self.surface_height = surface_height;
        self.origin = anchor(self.margin, surface_height);
    }
}

fn anchor(margin: f64, surface_height: f64) -> Point {
    Point::new(margin, surface_height - margin)
}
