//! Gravitide - a fluid surface pulled by the gravity of a hovering mass
//!
//! Drag to orbit, scroll to zoom. Keys: R reset, [ ] grid size, 1/2 mass,
//! 3/4 volume, 5/6 clearance, Esc quit.

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use glam::Vec2;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use gravitide::cli::{prepare_recording, Args, RunMode};
use gravitide::error::{GravitideError, Result};
use gravitide::params::RecordingConfig;
use gravitide::rendering::{FrameCapture, FramePresenter};
use gravitide::session::{Command, Session, SessionConfig};

/// Browser-style wheel units per scroll line
const WHEEL_UNITS_PER_LINE: f32 = 100.0;

/// Main application state
struct App {
    // Window and presentation
    window: Option<Arc<Window>>,
    presenter: Option<FramePresenter>,

    session: Session,
    cursor: Vec2,

    // Time tracking
    last_frame: Instant,
}

impl App {
    fn new(session: Session) -> Self {
        Self {
            window: None,
            presenter: None,
            session,
            cursor: Vec2::ZERO,
            last_frame: Instant::now(),
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        let command = match key {
            KeyCode::Escape => {
                event_loop.exit();
                return;
            }
            KeyCode::KeyR => Command::Reset,
            KeyCode::BracketLeft => Command::CoarserGrid,
            KeyCode::BracketRight => Command::FinerGrid,
            KeyCode::Digit1 => Command::AdjustMass(-0.1),
            KeyCode::Digit2 => Command::AdjustMass(0.1),
            KeyCode::Digit3 => Command::AdjustVolume(-0.1),
            KeyCode::Digit4 => Command::AdjustVolume(0.1),
            KeyCode::Digit5 => Command::AdjustHeight(-5.0),
            KeyCode::Digit6 => Command::AdjustHeight(5.0),
            _ => return,
        };

        if let Err(e) = self.session.apply(command) {
            warn!("{:?} ignored: {}", command, e);
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.session.resize_viewport(width as f32, height as f32);
        if let Some(presenter) = &mut self.presenter {
            presenter.resize(width, height);
        }
    }

    /// Advance, compose and present a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let elapsed_s = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;

        self.session.tick(elapsed_s);

        let Some(presenter) = &mut self.presenter else {
            return;
        };
        match presenter.present(self.session.render()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = presenter.size();
                presenter.resize(width, height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("Out of GPU memory, exiting");
                event_loop.exit();
            }
            Err(e) => warn!("Dropped frame: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let viewport = self.session.viewport();
        let window_attributes = Window::default_attributes()
            .with_title("Gravitide")
            .with_inner_size(winit::dpi::PhysicalSize::new(
                viewport.x as u32,
                viewport.y as u32,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(FramePresenter::new(Arc::clone(&window))) {
            Ok(presenter) => self.presenter = Some(presenter),
            Err(e) => {
                error!("{}", e);
                event_loop.exit();
                return;
            }
        }

        let size = window.inner_size();
        self.window = Some(window);
        self.resize(size.width, size.height);
        self.last_frame = Instant::now();

        info!("Drag to orbit, scroll to zoom, R to reset, Esc to quit");
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(key),
                        ..
                    },
                ..
            } => self.handle_key(event_loop, key),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.session.pointer_down(self.cursor),
                ElementState::Released => self.session.pointer_up(),
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                self.session.pointer_move(self.cursor);
            }
            WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => {
                self.session.pointer_up();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // Positive deltas zoom out, matching a browser wheel
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * WHEEL_UNITS_PER_LINE,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                };
                self.session.wheel(delta_y);
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

/// Render `config.total_frames()` frames at a fixed frame time into PNGs
fn record(mut session: Session, config: &RecordingConfig) -> Result<()> {
    prepare_recording(config)?;

    let viewport = session.viewport();
    let (width, height) = (viewport.x as u32, viewport.y as u32);
    let mut capture = pollster::block_on(FrameCapture::new(width, height))?;
    let frame_time = 1.0 / config.fps as f64;
    let total = config.total_frames();

    info!(
        "Recording {} frames at {} fps into {}",
        total,
        config.fps,
        config.frames_dir()
    );

    for frame in 0..total {
        session.tick(frame_time);
        capture.capture(session.render(), config.frame_path(frame))?;

        if (frame + 1) % config.fps as usize == 0 {
            info!("Recorded {}/{} frames", frame + 1, total);
        }
    }

    info!("Recording complete");
    Ok(())
}

/// Run a fixed number of steps and save one frame
fn snapshot(mut session: Session, path: &std::path::Path, steps: usize) -> Result<()> {
    let viewport = session.viewport();
    let (width, height) = (viewport.x as u32, viewport.y as u32);
    let mut capture = pollster::block_on(FrameCapture::new(width, height))?;

    session.step(steps);
    capture.capture(session.render(), path)?;

    let sim = session.simulation();
    info!(
        "Saved {} after {:.1} s simulated (peak |h| {:.1} m)",
        path.display(),
        sim.simulated_time(),
        sim.fields.max_abs_height()
    );
    Ok(())
}

fn run(config: SessionConfig, mode: RunMode) -> Result<()> {
    let session = Session::new(config)?;

    match mode {
        RunMode::Snapshot { path, steps } => snapshot(session, &path, steps),
        RunMode::Record(recording) => record(session, &recording),
        RunMode::Interactive => {
            let event_loop = EventLoop::new()
                .map_err(|e| GravitideError::Surface(format!("event loop: {}", e)))?;
            let mut app = App::new(session);
            event_loop
                .run_app(&mut app)
                .map_err(|e| GravitideError::Surface(e.to_string()))
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args.session_config(), args.mode()) {
        error!("{}", e);
        std::process::exit(1);
    }
}
