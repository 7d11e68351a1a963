//! View configuration: surface size, axis margin, and zoom baseline.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

/// Static configuration for a [`crate::engine::ViewController`].
///
/// Every field has a default, so a partial JSON document (or `{}`) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Raster surface width in pixels.
    pub surface_width: f64,
    /// Raster surface height in pixels.
    pub surface_height: f64,
    /// Distance from the left and bottom edges to the meter origin, in pixels.
    /// Leaves room for the axis labels.
    pub margin: f64,
    /// Pixels per meter before any zoom.
    pub initial_scale: f64,
    /// Tick count on each axis when no wall is loaded.
    pub default_ticks: u32,
    /// Smallest grid pitch drawn, in pixels. Coarser multiples of one meter
    /// are used when zoomed out past this.
    pub min_grid_spacing_px: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            surface_width: 800.0,
            surface_height: 600.0,
            margin: 50.0,
            initial_scale: 100.0,
            default_ticks: 5,
            min_grid_spacing_px: 8.0,
        }
    }
}

impl ViewConfig {
    /// Parse a configuration from JSON, filling absent fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns the decode error if `json` is not a valid configuration object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
