//! Vertical pull of the hovering body on every cell of the surface.

use super::{FieldStore, SourceBody};
use crate::params::SimulationConfig;

/// Vertical acceleration at a point displaced by `(dx, dy, dz)` from the body centre
///
/// Outside the body radius this is the z-component of the inverse-square field,
/// `G·m·dz / r³`. Inside it the factor is held at the surface value `G·m / R³`
/// (optionally shaped by `interior_falloff_exponent`), which keeps the field bounded
/// as the surface approaches the body.
///
/// # Arguments
/// * `dx`, `dy` - Horizontal offset from the body to the sample point (m)
/// * `dz` - Body centre height minus sample height (m)
pub fn vertical_acceleration(
    body: &SourceBody,
    dx: f64,
    dy: f64,
    dz: f64,
    config: &SimulationConfig,
) -> f64 {
    let r = (dx * dx + dy * dy + dz * dz).sqrt() + config.distance_epsilon_m;

    let factor = if r < body.radius_m {
        interior_factor(body, r, config)
    } else {
        exterior_factor(body, r, config)
    };

    factor * dz
}

fn interior_factor(body: &SourceBody, r: f64, config: &SimulationConfig) -> f64 {
    let radius_cubed = body.radius_m * body.radius_m * body.radius_m;
    let base = config.gravitational_constant * body.mass_kg / radius_cubed;

    if config.interior_falloff_exponent == 0.0 {
        base
    } else {
        base * (r / body.radius_m).powf(config.interior_falloff_exponent)
    }
}

fn exterior_factor(body: &SourceBody, r: f64, config: &SimulationConfig) -> f64 {
    config.gravitational_constant * body.mass_kg / (r * r * r)
}

/// Fill `fields.gravity` with the body's vertical pull at every cell centre
///
/// The body sits above the grid centre; cell centres are half a cell in from
/// their corner, and the vertical offset uses each cell's current height.
pub fn compute_gravity(fields: &mut FieldStore, body: &SourceBody, config: &SimulationConfig) {
    let n = fields.grid_size();
    let half = n as f64 / 2.0;

    for y in 0..n {
        let dy = (y as f64 - half + 0.5) * config.cell_meters;
        for x in 0..n {
            let idx = fields.index(x, y);
            let dx = (x as f64 - half + 0.5) * config.cell_meters;
            let dz = body.center_height_m - fields.heights[idx];

            fields.gravity[idx] = vertical_acceleration(body, dx, dy, dz, config);
        }
    }
}
