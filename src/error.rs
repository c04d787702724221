//! Error types for simulation control and frame presentation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GravitideError {
    #[error("Unsupported grid size {requested} (supported: {supported:?})")]
    UnsupportedGridSize {
        requested: usize,
        supported: &'static [usize],
    },

    #[error("Parameter {name} must be finite, got {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },

    #[error("Parameter {name} = {value} is outside {min}..={max}")]
    ParameterOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Failed to create surface: {0}")]
    Surface(String),

    #[error("Failed to find suitable GPU adapter")]
    Adapter,

    #[error("Failed to request device: {0}")]
    Device(String),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GravitideError>;
