//! Height-field fluid simulation driven by the gravity of a hovering body.

mod field;
mod gravity;
mod integrator;
mod system;

// Re-export public types
pub use field::FieldStore;
pub use gravity::{compute_gravity, vertical_acceleration};
pub use integrator::{step, surface_energy};
pub use system::Simulation;

use crate::params::SimulationParams;

/// Physical description of the gravitating body for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceBody {
    pub mass_kg: f64,
    pub radius_m: f64,
    /// Height of the body centre above the undisturbed surface (m)
    pub center_height_m: f64,
}

impl SourceBody {
    /// Derive the body from the slider exponents
    pub fn from_params(params: &SimulationParams) -> Self {
        Self {
            mass_kg: params.mass_kg(),
            radius_m: params.radius_m(),
            center_height_m: params.source_height_m(),
        }
    }

    /// A body that exerts no pull (used to let the surface relax)
    pub fn massless() -> Self {
        Self {
            mass_kg: 0.0,
            radius_m: 1.0,
            center_height_m: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_body_tracks_params() {
        let mut params = SimulationParams::default();
        let body = SourceBody::from_params(&params);
        assert_eq!(body.mass_kg, params.mass_kg());
        assert_eq!(body.radius_m, params.radius_m());

        params.volume_exponent += 1.0;
        let bigger = SourceBody::from_params(&params);

        // Ten times the volume -> cbrt(10) times the radius
        let ratio = bigger.radius_m / body.radius_m;
        assert!((ratio - 10f64.cbrt()).abs() < 1e-9);
        assert!(bigger.center_height_m > body.center_height_m);
    }
}
