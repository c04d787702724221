//! Per-frame façade tying the simulation, camera and scene renderer together.
//!
//! A host loop owns one `Session` and, each frame, forwards input, calls `tick` with
//! the elapsed wall time and hands the list returned by `render` to a painter.

use glam::Vec2;
use log::info;

use crate::camera::{OrbitCamera, OrbitController};
use crate::error::Result;
use crate::params::{
    OrbitConfig, RenderConfig, SceneLayout, SimulationConfig, SimulationParams, DEFAULT_GRID_SIZE,
    SUPPORTED_GRID_SIZES,
};
use crate::scene::{DrawList, SceneRenderer, WorldScale};
use crate::sim::Simulation;

/// Everything needed to start a session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub simulation: SimulationConfig,
    pub orbit: OrbitConfig,
    pub render: RenderConfig,
    pub layout: SceneLayout,
    pub grid_size: usize,
    pub params: SimulationParams,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            orbit: OrbitConfig::default(),
            render: RenderConfig::default(),
            layout: SceneLayout::default(),
            grid_size: DEFAULT_GRID_SIZE,
            params: SimulationParams::default(),
        }
    }
}

/// Discrete user controls a host maps its keys onto
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Flatten the surface
    Reset,
    /// Step to the next smaller supported grid size
    CoarserGrid,
    /// Step to the next larger supported grid size
    FinerGrid,
    /// Add to the mass exponent (log10 kg)
    AdjustMass(f64),
    /// Add to the volume exponent (log10 km³)
    AdjustVolume(f64),
    /// Add to the clearance (km)
    AdjustHeight(f64),
}

/// Simulation, camera and the most recent frame's draw list
pub struct Session {
    sim: Simulation,
    camera: OrbitCamera,
    controller: OrbitController,
    orbit_config: OrbitConfig,
    renderer: SceneRenderer,
    viewport: Vec2,
    draw_list: DrawList,
}

impl Session {
    /// Build a session with a flat surface
    pub fn new(config: SessionConfig) -> Result<Self> {
        let mut sim = Simulation::new(config.simulation.clone(), config.grid_size)?;
        sim.set_params(config.params)?;

        let scale = WorldScale::new(&config.simulation, &config.layout);
        let camera = OrbitCamera::new(&config.orbit, config.grid_size, scale.camera_target());
        let controller = OrbitController::new(&config.orbit);
        let viewport = Vec2::new(
            config.render.window_width as f32,
            config.render.window_height as f32,
        );

        info!(
            "Session started: {}×{} grid, mass 1e{} kg, volume 1e{} km³, clearance {} km",
            config.grid_size,
            config.grid_size,
            config.params.mass_exponent,
            config.params.volume_exponent,
            config.params.height_km
        );

        Ok(Self {
            sim,
            camera,
            controller,
            orbit_config: config.orbit,
            renderer: SceneRenderer::new(config.render, scale),
            viewport,
            draw_list: DrawList::new(),
        })
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn grid_size(&self) -> usize {
        self.sim.grid_size()
    }

    pub fn params(&self) -> SimulationParams {
        self.sim.params()
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Draw list produced by the last `render` call
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    /// Advance the simulation by `elapsed_s` of wall time
    ///
    /// # Returns
    /// Number of fixed steps taken
    pub fn tick(&mut self, elapsed_s: f64) -> usize {
        self.sim.advance(elapsed_s)
    }

    /// Run exactly `count` fixed steps, bypassing the frame accumulator
    pub fn step(&mut self, count: usize) {
        for _ in 0..count {
            self.sim.step();
        }
    }

    /// Compose the current state into the session's draw list
    pub fn render(&mut self) -> &DrawList {
        let body = self.sim.source_body();
        self.renderer.render(
            &mut self.sim.fields,
            &self.camera,
            self.viewport,
            &body,
            &mut self.draw_list,
        );
        &self.draw_list
    }

    /// Replace the live parameters; non-finite or out-of-range values are rejected
    pub fn set_params(&mut self, params: SimulationParams) -> Result<()> {
        self.sim.set_params(params)
    }

    /// Switch grid resolution; the camera's distance bounds follow the new size
    pub fn set_grid_size(&mut self, grid_size: usize) -> Result<()> {
        self.sim.resize(grid_size)?;
        self.camera.fit_grid(&self.orbit_config, grid_size);
        Ok(())
    }

    /// Flatten the surface; parameters and camera are untouched
    pub fn reset(&mut self) {
        self.sim.reset();
    }

    /// New viewport size (pixels); degenerate sizes are ignored
    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        if width.is_finite() && height.is_finite() && width >= 1.0 && height >= 1.0 {
            self.viewport = Vec2::new(width, height);
        }
    }

    /// Apply a discrete control
    ///
    /// Grid steps past either end of the supported set are no-ops. Parameter steps
    /// that would leave a slider range are rejected and change nothing.
    pub fn apply(&mut self, command: Command) -> Result<()> {
        let mut params = self.params();

        match command {
            Command::Reset => {
                self.reset();
                return Ok(());
            }
            Command::CoarserGrid | Command::FinerGrid => {
                let current = SUPPORTED_GRID_SIZES
                    .iter()
                    .position(|&n| n == self.grid_size())
                    .unwrap_or(0);
                let target = if command == Command::FinerGrid {
                    (current + 1).min(SUPPORTED_GRID_SIZES.len() - 1)
                } else {
                    current.saturating_sub(1)
                };
                return self.set_grid_size(SUPPORTED_GRID_SIZES[target]);
            }
            Command::AdjustMass(delta) => {
                params.mass_exponent = snap(params.mass_exponent + delta);
            }
            Command::AdjustVolume(delta) => {
                params.volume_exponent = snap(params.volume_exponent + delta);
            }
            Command::AdjustHeight(delta) => {
                params.height_km = snap(params.height_km + delta);
            }
        }

        self.set_params(params)?;
        let params = self.params();
        info!(
            "Mass 1e{:.1} kg, volume 1e{:.1} km³ (radius {:.0} km), clearance {:.0} km",
            params.mass_exponent,
            params.volume_exponent,
            params.radius_m() / 1000.0,
            params.height_km
        );
        Ok(())
    }

    pub fn pointer_down(&mut self, position: Vec2) {
        self.controller.pointer_down(position);
    }

    pub fn pointer_move(&mut self, position: Vec2) {
        self.controller.pointer_move(position, &mut self.camera);
    }

    /// Pointer released, left the window or was cancelled
    pub fn pointer_up(&mut self) {
        self.controller.pointer_up();
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.controller.wheel(delta_y, &mut self.camera);
    }
}

/// Drop accumulated float error from repeated slider steps
fn snap(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GravitideError;

    #[test]
    fn test_grid_change_refits_camera() {
        let mut session = Session::new(SessionConfig::default()).unwrap();
        assert_eq!(session.camera().distance_bounds(), (48.0, 240.0));

        session.set_grid_size(120).unwrap();
        assert_eq!(session.grid_size(), 120);
        assert_eq!(session.camera().distance_bounds(), (96.0, 480.0));
        assert_eq!(session.camera().distance(), 96.0);
    }

    #[test]
    fn test_rejected_grid_size_keeps_state() {
        let mut session = Session::new(SessionConfig::default()).unwrap();
        session.tick(0.5);
        let heights = session.simulation().fields.heights.clone();
        let camera = session.camera().clone();

        let result = session.set_grid_size(59);

        assert!(matches!(
            result,
            Err(GravitideError::UnsupportedGridSize { requested: 59, .. })
        ));
        assert_eq!(session.simulation().fields.heights, heights);
        assert_eq!(session.camera(), &camera);
    }

    #[test]
    fn test_degenerate_viewport_is_ignored() {
        let mut session = Session::new(SessionConfig::default()).unwrap();
        session.resize_viewport(0.0, 300.0);
        assert_eq!(session.viewport(), Vec2::new(1280.0, 720.0));

        session.resize_viewport(800.0, 600.0);
        assert_eq!(session.viewport(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_pointer_drag_orbits_camera() {
        let mut session = Session::new(SessionConfig::default()).unwrap();
        let yaw = session.camera().yaw;

        session.pointer_down(Vec2::new(10.0, 10.0));
        session.pointer_move(Vec2::new(60.0, 10.0));
        session.pointer_up();
        session.pointer_move(Vec2::new(500.0, 10.0));

        assert!((session.camera().yaw - (yaw - 50.0 * 0.006)).abs() < 1e-5);
    }

    #[test]
    fn test_commands_adjust_state() {
        let config = SessionConfig {
            grid_size: 24,
            ..SessionConfig::default()
        };
        let mut session = Session::new(config).unwrap();

        session.apply(Command::CoarserGrid).unwrap();
        assert_eq!(session.grid_size(), 24);
        session.apply(Command::FinerGrid).unwrap();
        assert_eq!(session.grid_size(), 36);

        session.apply(Command::AdjustMass(0.5)).unwrap();
        assert_eq!(session.params().mass_exponent, 24.5);

        // Below the bottom of the range: rejected, nothing changes
        let result = session.apply(Command::AdjustHeight(-80.0));
        assert!(matches!(
            result,
            Err(GravitideError::ParameterOutOfRange {
                name: "height_km",
                ..
            })
        ));
        assert_eq!(session.params().height_km, 50.0);

        session.tick(1.0);
        session.apply(Command::Reset).unwrap();
        assert_eq!(session.simulation().fields.max_abs_height(), 0.0);
        assert_eq!(session.params().mass_exponent, 24.5);
    }

    #[test]
    fn test_render_fills_draw_list() {
        let config = SessionConfig {
            grid_size: 24,
            ..SessionConfig::default()
        };
        let mut session = Session::new(config).unwrap();
        session.tick(0.2);

        let count = session.render().len();
        assert_eq!(count, 5 + 4 * 24 + 2 * 24 * 24 + 1 + 1);
        assert_eq!(session.draw_list().len(), count);
    }

    #[test]
    fn test_mass_steps_stop_at_the_range_end() {
        let mut session = Session::new(SessionConfig::default()).unwrap();

        for _ in 0..40 {
            session.apply(Command::AdjustMass(0.1)).unwrap();
        }
        assert_eq!(session.params().mass_exponent, 28.0);

        let before = session.params();
        assert!(session.apply(Command::AdjustMass(0.1)).is_err());
        assert_eq!(session.params(), before);

        session.apply(Command::AdjustMass(-0.1)).unwrap();
        assert_eq!(session.params().mass_exponent, 27.9);
    }
}
