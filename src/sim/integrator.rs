//! Fixed-timestep wave integration of the height field.

use super::gravity::compute_gravity;
use super::{FieldStore, SourceBody};
use crate::params::SimulationConfig;

/// Advance heights and velocities by one `config.fixed_dt_s`
///
/// Each cell accelerates under the discrete wave equation (4-neighbour Laplacian,
/// neighbours outside the grid mirror the cell itself) plus the body's pull. Velocity
/// is damped, cells near the border are additionally attenuated, and the new field is
/// shifted to zero mean before it is committed.
pub fn step(fields: &mut FieldStore, body: &SourceBody, config: &SimulationConfig) {
    compute_gravity(fields, body, config);

    let n = fields.grid_size();
    if n == 0 {
        return;
    }

    let dt = config.fixed_dt_s;
    let wave_coeff = wave_coefficient(config);
    let retain = 1.0 - config.damping;
    let margin = config.border_margin_cells;

    let mut sum = 0.0;

    for y in 0..n {
        for x in 0..n {
            let idx = fields.index(x, y);
            let h = fields.heights[idx];

            let left = if x > 0 { fields.heights[idx - 1] } else { h };
            let right = if x + 1 < n { fields.heights[idx + 1] } else { h };
            let up = if y > 0 { fields.heights[idx - n] } else { h };
            let down = if y + 1 < n { fields.heights[idx + n] } else { h };

            let laplacian = left + right + up + down - 4.0 * h;
            let acceleration = wave_coeff * laplacian + fields.gravity[idx];

            let mut v = fields.velocities[idx];
            v += acceleration * dt;
            v *= retain;

            let mut next = h + v * dt;

            if in_border(x, y, n, margin) {
                v *= config.border_velocity_factor;
                next *= config.border_height_factor;
            }

            fields.velocities[idx] = v;
            fields.next_heights[idx] = next;
            sum += next;
        }
    }

    let mean = sum / fields.cell_count() as f64;
    for (h, next) in fields.heights.iter_mut().zip(&fields.next_heights) {
        *h = next - mean;
    }
}

/// c² / Δx², the wave term's weight on the raw neighbour difference (s⁻²)
fn wave_coefficient(config: &SimulationConfig) -> f64 {
    let c = config.wave_speed_m_per_s;
    c * c / (config.cell_meters * config.cell_meters)
}

#[inline]
fn in_border(x: usize, y: usize, n: usize, margin: usize) -> bool {
    x < margin || y < margin || x + margin >= n || y + margin >= n
}

/// Discrete energy of the surface: kinetic plus wave-potential terms (per unit mass)
pub fn surface_energy(fields: &FieldStore, config: &SimulationConfig) -> f64 {
    let n = fields.grid_size();
    let wave_coeff = wave_coefficient(config);

    let kinetic: f64 = fields.velocities.iter().map(|v| 0.5 * v * v).sum();

    let mut potential = 0.0;
    for y in 0..n {
        for x in 0..n {
            let h = fields.heights[fields.index(x, y)];
            if x + 1 < n {
                let d = fields.heights[fields.index(x + 1, y)] - h;
                potential += 0.5 * wave_coeff * d * d;
            }
            if y + 1 < n {
                let d = fields.heights[fields.index(x, y + 1)] - h;
                potential += 0.5 * wave_coeff * d * d;
            }
        }
    }

    kinetic + potential
}
