//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::error::Result;
use crate::params::{RecordingConfig, RenderConfig, SimulationParams, DEFAULT_GRID_SIZE};
use crate::session::SessionConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "gravitide")]
#[command(about = "Fluid surface pulled by the gravity of a hovering mass", long_about = None)]
pub struct Args {
    /// Cells per side of the simulation grid (24, 36, 48, 60, 72, 96 or 120)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_GRID_SIZE)]
    pub grid_size: usize,

    /// Mass of the body as a power of ten (kg)
    #[arg(
        long,
        value_name = "LOG10_KG",
        default_value_t = 24.0,
        allow_negative_numbers = true
    )]
    pub mass_exp: f64,

    /// Volume of the body as a power of ten (km³)
    #[arg(
        long,
        value_name = "LOG10_KM3",
        default_value_t = 7.0,
        allow_negative_numbers = true
    )]
    pub volume_exp: f64,

    /// Clearance between the body's underside and the undisturbed surface (km)
    #[arg(long, value_name = "KM", default_value_t = 50.0)]
    pub height_km: f64,

    /// Window or image width (pixels)
    #[arg(long, value_name = "PX", default_value_t = 1280)]
    pub width: u32,

    /// Window or image height (pixels)
    #[arg(long, value_name = "PX", default_value_t = 720)]
    pub height: u32,

    /// Record PNG frames headlessly for this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Frame rate of the recording
    #[arg(long, value_name = "FPS", default_value_t = 30)]
    pub fps: u32,

    /// Directory that receives recorded frames
    #[arg(long, value_name = "DIR", default_value = "recording")]
    pub output_dir: String,

    /// Render a single PNG after `--steps` integrator steps and exit
    #[arg(long, value_name = "PATH", conflicts_with = "record")]
    pub snapshot: Option<PathBuf>,

    /// Integrator steps to run before the snapshot
    #[arg(long, value_name = "N", default_value_t = 500)]
    pub steps: usize,
}

/// What the binary should do with the parsed arguments
#[derive(Debug, Clone)]
pub enum RunMode {
    Interactive,
    Record(RecordingConfig),
    Snapshot { path: PathBuf, steps: usize },
}

impl Args {
    /// Initial session configuration from the command line
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            grid_size: self.grid_size,
            params: SimulationParams {
                mass_exponent: self.mass_exp,
                volume_exponent: self.volume_exp,
                height_km: self.height_km,
            },
            render: RenderConfig {
                window_width: self.width.max(1),
                window_height: self.height.max(1),
                ..RenderConfig::default()
            },
            ..SessionConfig::default()
        }
    }

    pub fn mode(&self) -> RunMode {
        if let Some(path) = &self.snapshot {
            return RunMode::Snapshot {
                path: path.clone(),
                steps: self.steps,
            };
        }

        match self.record {
            Some(duration) => RunMode::Record(RecordingConfig {
                duration_secs: duration,
                output_dir: self.output_dir.clone(),
                fps: self.fps.max(1),
            }),
            None => RunMode::Interactive,
        }
    }
}

/// Create the frame directory for a recording
pub fn prepare_recording(config: &RecordingConfig) -> Result<()> {
    std::fs::create_dir_all(config.frames_dir())?;
    Ok(())
}
