//! Orbit camera configuration and input sensitivities.

use std::f32::consts::PI;

/// Orbit camera configuration
#[derive(Debug, Clone)]
pub struct OrbitConfig {
    /// Initial heading around the target (radians)
    pub yaw: f32,

    /// Initial elevation above the horizontal plane (radians)
    pub pitch: f32,

    /// Initial eye-to-target distance (world units, one unit = one cell)
    pub distance: f32,

    /// Lowest allowed elevation (radians)
    pub min_pitch: f32,

    /// Highest allowed elevation (radians, kept well below π/2 so the basis never degenerates)
    pub max_pitch: f32,

    /// Distance bounds are `max(floor, grid_size * scale)`
    pub min_distance_floor: f32,
    pub min_distance_per_cell: f32,
    pub max_distance_floor: f32,
    pub max_distance_per_cell: f32,

    /// Drag sensitivity (radians per pixel)
    pub drag_sensitivity: f32,

    /// Zoom sensitivity (log-distance per wheel unit)
    pub zoom_sensitivity: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            yaw: PI * 0.72,
            pitch: 0.55,
            distance: 72.0,
            min_pitch: 0.2,
            max_pitch: 1.25,
            min_distance_floor: 18.0,
            min_distance_per_cell: 0.8,
            max_distance_floor: 120.0,
            max_distance_per_cell: 4.0,
            drag_sensitivity: 0.006,
            zoom_sensitivity: 0.0012,
        }
    }
}

impl OrbitConfig {
    /// Distance bounds that keep a grid of `grid_size` cells framed
    pub fn distance_bounds(&self, grid_size: usize) -> (f32, f32) {
        let n = grid_size as f32;
        (
            self.min_distance_floor.max(n * self.min_distance_per_cell),
            self.max_distance_floor.max(n * self.max_distance_per_cell),
        )
    }
}
