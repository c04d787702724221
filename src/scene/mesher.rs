//! Node heights, node projection and far-to-near cell ordering for the surface mesh.

use super::projector::Projector;
use super::WorldScale;
use crate::sim::FieldStore;

/// Average each node from the (up to four) cells that touch it
pub fn build_surface_nodes(fields: &mut FieldStore) {
    let n = fields.grid_size();

    for y in 0..=n {
        for x in 0..=n {
            let mut sum = 0.0;
            let mut count = 0u32;

            for cy in y.saturating_sub(1)..(y + 1).min(n) {
                for cx in x.saturating_sub(1)..(x + 1).min(n) {
                    sum += fields.heights[fields.index(cx, cy)];
                    count += 1;
                }
            }

            let node = fields.node_index(x, y);
            fields.node_heights[node] = if count > 0 { sum / count as f64 } else { 0.0 };
        }
    }
}

/// Project every node once, filling `node_screen` and `node_depth`
pub fn project_surface_nodes(fields: &mut FieldStore, projector: &Projector, scale: &WorldScale) {
    let n = fields.grid_size();

    for y in 0..=n {
        for x in 0..=n {
            let node = fields.node_index(x, y);
            let world = scale.node_position(x, y, n, fields.node_heights[node]);
            let (screen, depth) = projector.project(world);

            fields.node_screen[node] = screen;
            fields.node_depth[node] = depth;
        }
    }
}

/// Compute each cell's mean corner depth and sort `cell_order` far-to-near
///
/// The sort is stable and starts from the previous frame's order, so cells at equal
/// depth keep their relative order across frames.
pub fn sort_cells_by_depth(fields: &mut FieldStore) {
    let n = fields.grid_size();

    for y in 0..n {
        for x in 0..n {
            let corners = [
                fields.node_index(x, y),
                fields.node_index(x + 1, y),
                fields.node_index(x + 1, y + 1),
                fields.node_index(x, y + 1),
            ];
            let total: f32 = corners.iter().map(|&i| fields.node_depth[i]).sum();
            let cell = fields.index(x, y);
            fields.cell_depth[cell] = total * 0.25;
        }
    }

    let depth = &fields.cell_depth;
    fields
        .cell_order
        .sort_by(|&a, &b| depth[b as usize].total_cmp(&depth[a as usize]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitCamera;
    use crate::params::{OrbitConfig, RenderConfig, SceneLayout, SimulationConfig};
    use glam::Vec2;

    #[test]
    fn test_node_heights_average_adjacent_cells() {
        let mut fields = FieldStore::new(2);
        // Cells laid out row-major: 1 2 / 3 4
        fields.heights.copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);

        build_surface_nodes(&mut fields);

        assert_eq!(fields.node_heights[fields.node_index(0, 0)], 1.0);
        assert_eq!(fields.node_heights[fields.node_index(1, 0)], 1.5);
        assert_eq!(fields.node_heights[fields.node_index(2, 0)], 2.0);
        assert_eq!(fields.node_heights[fields.node_index(0, 1)], 2.0);
        assert_eq!(fields.node_heights[fields.node_index(1, 1)], 2.5);
        assert_eq!(fields.node_heights[fields.node_index(2, 2)], 4.0);
    }

    #[test]
    fn test_cells_sorted_far_to_near() {
        let mut fields = FieldStore::new(24);
        let scale = WorldScale::new(&SimulationConfig::default(), &SceneLayout::default());
        let camera = OrbitCamera::new(&OrbitConfig::default(), 24, scale.camera_target());
        let projector = Projector::new(
            &camera.basis(),
            Vec2::new(640.0, 480.0),
            &RenderConfig::default(),
        );

        build_surface_nodes(&mut fields);
        project_surface_nodes(&mut fields, &projector, &scale);
        sort_cells_by_depth(&mut fields);

        let depths: Vec<f32> = fields
            .cell_order
            .iter()
            .map(|&i| fields.cell_depth[i as usize])
            .collect();
        assert!(depths.windows(2).all(|w| w[0] >= w[1]));

        // Still a permutation
        let mut order = fields.cell_order.clone();
        order.sort_unstable();
        assert!(order.iter().enumerate().all(|(i, &c)| i as u32 == c));
    }
}
