//! Grid-resolution arrays shared by the simulation and the surface renderer.

use glam::Vec2;

/// Every per-cell and per-node array of the simulation, sized for one grid resolution
///
/// Cell arrays hold `grid_size²` entries and node arrays `(grid_size + 1)²`.
/// A store is never resized in place: a resolution change builds a fresh store,
/// so all arrays always agree on `grid_size`.
#[derive(Debug, Clone)]
pub struct FieldStore {
    grid_size: usize,

    /// Surface height offset from sea level per cell (m)
    pub heights: Vec<f64>,
    /// Vertical velocity per cell (m/s)
    pub velocities: Vec<f64>,
    /// Integrator scratch buffer
    pub next_heights: Vec<f64>,
    /// Vertical gravitational acceleration per cell (m/s²)
    pub gravity: Vec<f64>,

    /// Node heights averaged from adjacent cells (m)
    pub node_heights: Vec<f64>,
    /// Projected node positions (pixels)
    pub node_screen: Vec<Vec2>,
    /// Camera-space depth per node (world units)
    pub node_depth: Vec<f32>,

    /// Mean corner depth per cell, only used for ordering
    pub cell_depth: Vec<f32>,
    /// Cell indices sorted far-to-near
    pub cell_order: Vec<u32>,
}

impl FieldStore {
    /// Allocate zeroed arrays for a `grid_size × grid_size` lattice
    pub fn new(grid_size: usize) -> Self {
        let cells = grid_size * grid_size;
        let nodes = (grid_size + 1) * (grid_size + 1);

        Self {
            grid_size,
            heights: vec![0.0; cells],
            velocities: vec![0.0; cells],
            next_heights: vec![0.0; cells],
            gravity: vec![0.0; cells],
            node_heights: vec![0.0; nodes],
            node_screen: vec![Vec2::ZERO; nodes],
            node_depth: vec![0.0; nodes],
            cell_depth: vec![0.0; cells],
            cell_order: (0..cells as u32).collect(),
        }
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Nodes per side
    pub fn node_size(&self) -> usize {
        self.grid_size + 1
    }

    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Linear index of cell (x, y)
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        x + y * self.grid_size
    }

    /// Linear index of node (x, y)
    #[inline]
    pub fn node_index(&self, x: usize, y: usize) -> usize {
        x + y * self.node_size()
    }

    /// Flatten the surface: zero heights and velocities
    pub fn reset(&mut self) {
        self.heights.fill(0.0);
        self.velocities.fill(0.0);
        self.next_heights.fill(0.0);
    }

    pub fn mean_height(&self) -> f64 {
        if self.heights.is_empty() {
            return 0.0;
        }
        self.heights.iter().sum::<f64>() / self.heights.len() as f64
    }

    /// Largest absolute height (m)
    pub fn max_abs_height(&self) -> f64 {
        self.heights.iter().fold(0.0, |acc: f64, h| acc.max(h.abs()))
    }

    /// True when no height or velocity is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.heights.iter().all(|h| h.is_finite()) && self.velocities.iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SUPPORTED_GRID_SIZES;

    #[test]
    fn test_field_store_sizes() {
        for &n in SUPPORTED_GRID_SIZES {
            let fields = FieldStore::new(n);

            assert_eq!(fields.grid_size(), n);
            assert_eq!(fields.heights.len(), n * n);
            assert_eq!(fields.velocities.len(), n * n);
            assert_eq!(fields.next_heights.len(), n * n);
            assert_eq!(fields.gravity.len(), n * n);
            assert_eq!(fields.cell_depth.len(), n * n);
            assert_eq!(fields.cell_order.len(), n * n);
            assert_eq!(fields.node_heights.len(), (n + 1) * (n + 1));
            assert_eq!(fields.node_screen.len(), (n + 1) * (n + 1));
            assert_eq!(fields.node_depth.len(), (n + 1) * (n + 1));

            assert!(fields.heights.iter().all(|&h| h == 0.0));
            assert!(fields.velocities.iter().all(|&v| v == 0.0));
            assert!(fields.node_heights.iter().all(|&h| h == 0.0));
        }
    }

    #[test]
    fn test_indexing() {
        let fields = FieldStore::new(4);
        assert_eq!(fields.index(3, 0), 3);
        assert_eq!(fields.index(0, 1), 4);
        assert_eq!(fields.node_index(0, 1), 5);
        assert_eq!(fields.node_index(4, 4), 24);
    }

    #[test]
    fn test_reset_zeroes_state() {
        let mut fields = FieldStore::new(6);
        fields.heights[7] = 3.0;
        fields.velocities[8] = -1.5;
        fields.gravity[2] = 9.0;

        fields.reset();

        assert_eq!(fields.max_abs_height(), 0.0);
        assert!(fields.velocities.iter().all(|&v| v == 0.0));
        // Gravity is recomputed every step, reset leaves it alone
        assert_eq!(fields.gravity[2], 9.0);
    }
}
