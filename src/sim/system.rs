//! Simulation context: field store, live parameters and the fixed-step accumulator.

use log::{debug, info, warn};

use super::field::FieldStore;
use super::integrator::step;
use super::SourceBody;
use crate::error::{GravitideError, Result};
use crate::params::{ParameterRanges, SimulationConfig, SimulationParams, SUPPORTED_GRID_SIZES};

/// High-level simulation owning every grid array and the time accumulator
pub struct Simulation {
    pub fields: FieldStore,
    pub config: SimulationConfig,
    params: SimulationParams,
    ranges: ParameterRanges,
    /// Wall time not yet consumed by fixed steps (seconds)
    accumulator_s: f64,
    /// Total simulated time since the last reset or resize (seconds)
    simulated_s: f64,
}

impl Simulation {
    /// Create a simulation with a flat surface at one of the supported resolutions
    pub fn new(config: SimulationConfig, grid_size: usize) -> Result<Self> {
        ensure_supported(grid_size)?;

        Ok(Self {
            fields: FieldStore::new(grid_size),
            config,
            params: SimulationParams::default(),
            ranges: ParameterRanges::default(),
            accumulator_s: 0.0,
            simulated_s: 0.0,
        })
    }

    pub fn grid_size(&self) -> usize {
        self.fields.grid_size()
    }

    pub fn params(&self) -> SimulationParams {
        self.params
    }

    /// Simulated time since the last reset or resize (seconds)
    pub fn simulated_time(&self) -> f64 {
        self.simulated_s
    }

    /// Body derived from the current parameters
    pub fn source_body(&self) -> SourceBody {
        SourceBody::from_params(&self.params)
    }

    /// Replace the live parameters
    ///
    /// A non-finite value, or one outside its slider range, is rejected and the
    /// current parameters are kept.
    pub fn set_params(&mut self, params: SimulationParams) -> Result<()> {
        let fields = [
            ("mass_exponent", params.mass_exponent),
            ("volume_exponent", params.volume_exponent),
            ("height_km", params.height_km),
        ];
        if let Some(&(name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            warn!("Ignoring non-finite {}: {}", name, value);
            return Err(GravitideError::NonFiniteParameter { name, value });
        }

        if let Some((name, value, range)) = self.ranges.out_of_range(&params) {
            warn!("Ignoring out-of-range {}: {}", name, value);
            return Err(GravitideError::ParameterOutOfRange {
                name,
                value,
                min: *range.start(),
                max: *range.end(),
            });
        }

        self.params = params;
        Ok(())
    }

    /// Rebuild every field array for a new resolution
    ///
    /// The old arrays are dropped as a whole; heights and velocities restart at zero.
    /// Asking for the current size is a no-op.
    pub fn resize(&mut self, grid_size: usize) -> Result<()> {
        ensure_supported(grid_size)?;
        if grid_size == self.grid_size() {
            return Ok(());
        }

        self.fields = FieldStore::new(grid_size);
        self.accumulator_s = 0.0;
        self.simulated_s = 0.0;
        info!("Grid resized to {}×{}", grid_size, grid_size);
        Ok(())
    }

    /// Flatten the surface without touching parameters
    pub fn reset(&mut self) {
        self.fields.reset();
        self.simulated_s = 0.0;
        info!("Surface reset");
    }

    /// Run one fixed step with the current parameters
    pub fn step(&mut self) {
        let body = self.source_body();
        step(&mut self.fields, &body, &self.config);
        self.simulated_s += self.config.fixed_dt_s;
    }

    /// Consume `elapsed_s` of wall time in fixed steps
    ///
    /// Leftover time smaller than one step carries over to the next call. At most
    /// `max_steps_per_advance` steps run per call; any backlog beyond that is dropped.
    ///
    /// # Returns
    /// Number of integrator steps taken
    pub fn advance(&mut self, elapsed_s: f64) -> usize {
        if !elapsed_s.is_finite() || elapsed_s <= 0.0 {
            return 0;
        }

        self.accumulator_s += elapsed_s;

        // Parameters are snapshotted once per call
        let body = self.source_body();
        let dt = self.config.fixed_dt_s;
        let mut steps = 0;

        while self.accumulator_s >= dt {
            if steps == self.config.max_steps_per_advance {
                debug!(
                    "Dropping {:.3}s of simulation backlog after {} steps",
                    self.accumulator_s, steps
                );
                self.accumulator_s = 0.0;
                break;
            }

            step(&mut self.fields, &body, &self.config);
            self.accumulator_s -= dt;
            self.simulated_s += dt;
            steps += 1;
        }

        steps
    }
}

fn ensure_supported(grid_size: usize) -> Result<()> {
    if SUPPORTED_GRID_SIZES.contains(&grid_size) {
        Ok(())
    } else {
        Err(GravitideError::UnsupportedGridSize {
            requested: grid_size,
            supported: SUPPORTED_GRID_SIZES,
        })
    }
}
