//! Fluid simulation constants and the live source-body parameters.

use std::f64::consts::PI;
use std::ops::RangeInclusive;

/// Grid resolutions the simulation accepts (cells per side, always even)
pub const SUPPORTED_GRID_SIZES: &[usize] = &[24, 36, 48, 60, 72, 96, 120];

/// Grid resolution used at startup
pub const DEFAULT_GRID_SIZE: usize = 60;

/// Live parameters of the gravitating body, as exposed to sliders
///
/// Only the exponents are stored. Mass, radius and centre height are derived on
/// demand so they can never drift out of sync with each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    /// Body mass as log10 of kilograms
    pub mass_exponent: f64,

    /// Body volume as log10 of cubic kilometers
    pub volume_exponent: f64,

    /// Clearance between the undisturbed surface and the bottom of the body (km)
    pub height_km: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            mass_exponent: 24.0,  // ~ Earth-moon scale body
            volume_exponent: 7.0, // ~134 km radius
            height_km: 50.0,
        }
    }
}

impl SimulationParams {
    /// Body mass (kg)
    pub fn mass_kg(&self) -> f64 {
        10f64.powf(self.mass_exponent)
    }

    /// Body volume (m³)
    pub fn volume_m3(&self) -> f64 {
        10f64.powf(self.volume_exponent) * 1e9
    }

    /// Radius of a sphere with the configured volume (m)
    pub fn radius_m(&self) -> f64 {
        (3.0 * self.volume_m3() / (4.0 * PI)).cbrt()
    }

    /// Height of the body centre above the undisturbed surface (m)
    pub fn source_height_m(&self) -> f64 {
        self.height_km * 1000.0 + self.radius_m()
    }
}

/// Slider ranges for the live parameters
#[derive(Debug, Clone)]
pub struct ParameterRanges {
    /// log10(kg)
    pub mass_exponent: RangeInclusive<f64>,

    /// log10(km³)
    pub volume_exponent: RangeInclusive<f64>,

    /// km
    pub height_km: RangeInclusive<f64>,
}

impl Default for ParameterRanges {
    fn default() -> Self {
        Self {
            mass_exponent: 18.0..=28.0,
            volume_exponent: 3.0..=9.0,
            height_km: 0.0..=500.0,
        }
    }
}

impl ParameterRanges {
    /// First parameter outside its slider range, as `(name, value, range)`
    pub fn out_of_range(
        &self,
        params: &SimulationParams,
    ) -> Option<(&'static str, f64, &RangeInclusive<f64>)> {
        [
            ("mass_exponent", params.mass_exponent, &self.mass_exponent),
            ("volume_exponent", params.volume_exponent, &self.volume_exponent),
            ("height_km", params.height_km, &self.height_km),
        ]
        .into_iter()
        .find(|(_, value, range)| !range.contains(value))
    }
}

/// Numerical and physical constants of the wave simulation
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Horizontal size of one grid cell (meters)
    pub cell_meters: f64,

    /// Gravitational constant (m³ kg⁻¹ s⁻²)
    pub gravitational_constant: f64,

    /// Shallow-wave propagation speed (m/s)
    pub wave_speed_m_per_s: f64,

    /// Fraction of velocity removed each step (dimensionless)
    pub damping: f64,

    /// Simulated time per integrator step (seconds)
    pub fixed_dt_s: f64,

    /// Width of the absorbing border (cells)
    pub border_margin_cells: usize,

    /// Velocity multiplier applied inside the border each step
    pub border_velocity_factor: f64,

    /// Height multiplier applied inside the border each step
    pub border_height_factor: f64,

    /// Floor added to distances to keep the field finite (meters)
    pub distance_epsilon_m: f64,

    /// Shape of the field inside the body: factor scales as (r/R)^p.
    /// 0 gives the uniform-sphere linear field.
    pub interior_falloff_exponent: f64,

    /// Upper bound on integrator steps run by a single `advance` call
    pub max_steps_per_advance: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cell_meters: 10_000.0, // 10 km per cell
            gravitational_constant: 6.674e-11,
            wave_speed_m_per_s: 80.0,
            damping: 0.02,
            fixed_dt_s: 0.035,
            border_margin_cells: 2,
            border_velocity_factor: 0.65,
            border_height_factor: 0.98,
            distance_epsilon_m: 1e-6,
            interior_falloff_exponent: 0.0,
            max_steps_per_advance: 12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_quantities() {
        let params = SimulationParams::default();

        assert!((params.mass_kg() - 1e24).abs() / 1e24 < 1e-12);

        // 10^7 km³ = 10^16 m³ -> r = cbrt(3e16 / 4π) ≈ 133.6 km
        let radius = params.radius_m();
        assert!((radius - 133_650.0).abs() < 100.0, "radius {}", radius);

        let expected_height = 50_000.0 + radius;
        assert!((params.source_height_m() - expected_height).abs() < 1e-6);
    }

    #[test]
    fn test_supported_sizes_are_even() {
        assert!(SUPPORTED_GRID_SIZES.contains(&DEFAULT_GRID_SIZE));
        for &size in SUPPORTED_GRID_SIZES {
            assert!(size > 0 && size % 2 == 0);
        }
    }

    #[test]
    fn test_ranges_report_first_violation() {
        let ranges = ParameterRanges::default();
        assert_eq!(ranges.out_of_range(&SimulationParams::default()), None);

        let edges = SimulationParams {
            mass_exponent: 28.0,
            volume_exponent: 3.0,
            height_km: 0.0,
        };
        assert_eq!(ranges.out_of_range(&edges), None);

        let (name, value, range) = ranges
            .out_of_range(&SimulationParams {
                mass_exponent: 24.0,
                volume_exponent: -3.0,
                height_km: 900.0,
            })
            .unwrap();
        assert_eq!((name, value), ("volume_exponent", -3.0));
        assert_eq!(range, &(3.0..=9.0));
    }
}
