//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Physical units (meters, seconds, radians, etc.)
//! - Documented ranges and meanings
//! - Type safety where possible

mod camera;
mod render;
mod simulation;

// Re-export all types
pub use camera::OrbitConfig;
pub use render::{RecordingConfig, RenderConfig, SceneLayout};
pub use simulation::{
    ParameterRanges, SimulationConfig, SimulationParams, DEFAULT_GRID_SIZE, SUPPORTED_GRID_SIZES,
};
