//! Orbit camera around the tank and the pointer controller that steers it.

use glam::{Vec2, Vec3};

use crate::params::OrbitConfig;

/// Orthonormal camera frame for one frame of rendering
///
/// The world is Z-up. The camera never rolls, so `right` always lies in the
/// horizontal plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraBasis {
    pub eye: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

/// Camera orbiting a fixed target at a given yaw, pitch and distance
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    pub yaw: f32,
    pitch: f32,
    distance: f32,
    target: Vec3,
    min_pitch: f32,
    max_pitch: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitCamera {
    /// Create a camera framing a grid of `grid_size` cells around `target`
    pub fn new(config: &OrbitConfig, grid_size: usize, target: Vec3) -> Self {
        let (min_distance, max_distance) = config.distance_bounds(grid_size);

        Self {
            yaw: config.yaw,
            pitch: config.pitch.clamp(config.min_pitch, config.max_pitch),
            distance: config.distance.clamp(min_distance, max_distance),
            target,
            min_pitch: config.min_pitch,
            max_pitch: config.max_pitch,
            min_distance,
            max_distance,
        }
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn pitch_bounds(&self) -> (f32, f32) {
        (self.min_pitch, self.max_pitch)
    }

    pub fn distance_bounds(&self) -> (f32, f32) {
        (self.min_distance, self.max_distance)
    }

    /// Turn by `delta_yaw` and tilt by `delta_pitch` (radians), pitch clamped
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(self.min_pitch, self.max_pitch);
    }

    /// Multiply the orbit distance by `factor`, clamped
    pub fn zoom(&mut self, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
    }

    /// Rescale distance bounds so a grid of `grid_size` cells stays in view
    pub fn fit_grid(&mut self, config: &OrbitConfig, grid_size: usize) {
        let (min_distance, max_distance) = config.distance_bounds(grid_size);
        self.min_distance = min_distance;
        self.max_distance = max_distance;
        self.distance = self.distance.clamp(min_distance, max_distance);
    }

    /// Compute eye position and the forward/right/up frame
    pub fn basis(&self) -> CameraBasis {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();

        let eye = self.target
            + self.distance * Vec3::new(cos_pitch * cos_yaw, cos_pitch * sin_yaw, sin_pitch);

        let forward = (self.target - eye).normalize_or(Vec3::NEG_Z);

        // forward × Z, written out since the camera never rolls
        let right = Vec3::new(forward.y, -forward.x, 0.0).normalize_or(Vec3::X);
        let up = right.cross(forward);

        CameraBasis {
            eye,
            forward,
            right,
            up,
        }
    }
}

/// Converts pointer drags and wheel turns into orbit camera motion
#[derive(Clone, Debug)]
pub struct OrbitController {
    drag_sensitivity: f32,
    zoom_sensitivity: f32,
    dragging: bool,
    last_pointer: Vec2,
}

impl OrbitController {
    pub fn new(config: &OrbitConfig) -> Self {
        Self {
            drag_sensitivity: config.drag_sensitivity,
            zoom_sensitivity: config.zoom_sensitivity,
            dragging: false,
            last_pointer: Vec2::ZERO,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Start a drag at `position` (pixels)
    pub fn pointer_down(&mut self, position: Vec2) {
        self.dragging = true;
        self.last_pointer = position;
    }

    /// Follow the pointer; only moves the camera while a drag is active
    pub fn pointer_move(&mut self, position: Vec2, camera: &mut OrbitCamera) {
        if !self.dragging {
            return;
        }
        let delta = position - self.last_pointer;
        self.last_pointer = position;
        self.drag(delta, camera);
    }

    /// End the drag (pointer up, leave or cancel). No inertia is kept.
    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Apply a pointer delta (pixels) directly
    pub fn drag(&self, delta: Vec2, camera: &mut OrbitCamera) {
        camera.rotate(
            -delta.x * self.drag_sensitivity,
            delta.y * self.drag_sensitivity,
        );
    }

    /// Zoom by a wheel delta; positive values move the camera away
    pub fn wheel(&self, delta_y: f32, camera: &mut OrbitCamera) {
        camera.zoom((delta_y * self.zoom_sensitivity).exp());
    }
}
