//! Gravitide library - gravitational tides on a fluid height field

pub mod camera;
pub mod cli;
pub mod error;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod session;
pub mod sim;

pub use error::{GravitideError, Result};
pub use session::{Command, Session, SessionConfig};
