//! Software 3D scene: projection, surface meshing and painter's-order composition.
//!
//! Nothing here touches a GPU. A frame is a `DrawList` of flat polygons, one shaded
//! sphere and an outline, already in back-to-front order; `tessellate` flattens it
//! into the triangle stream the renderer uploads.

mod compositor;
mod draw;
mod mesher;
mod projector;
mod tessellate;

// Re-export public types
pub use compositor::compose;
pub use draw::{
    DrawCommand, DrawList, GradientStop, Layer, RadialGradient, Rgba, Shape, SphereSprite, Stroke,
};
pub use mesher::{build_surface_nodes, project_surface_nodes, sort_cells_by_depth};
pub use projector::Projector;
pub use tessellate::{tessellate, ScreenVertex};

use glam::{Vec2, Vec3};

use crate::camera::OrbitCamera;
use crate::params::{RenderConfig, SceneLayout, SimulationConfig};
use crate::sim::{FieldStore, SourceBody};

/// Conversion from simulation metres to world units
///
/// One horizontal world unit is one grid cell. Vertically the water column is lifted
/// so the seabed top sits at z = 0 and the undisturbed surface at the water depth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldScale {
    /// Horizontal world units per metre
    pub units_per_meter: f64,
    /// Vertical world units per metre (exaggeration applied)
    pub z_units_per_meter: f64,
    pub water_depth_m: f64,
    pub seabed_thickness_m: f64,
}

impl WorldScale {
    pub fn new(config: &SimulationConfig, layout: &SceneLayout) -> Self {
        let units_per_meter = 1.0 / config.cell_meters;

        Self {
            units_per_meter,
            z_units_per_meter: units_per_meter * layout.vertical_exaggeration,
            water_depth_m: layout.water_depth_m,
            seabed_thickness_m: layout.seabed_thickness_m,
        }
    }

    /// World z of a point `height_m` above the undisturbed surface
    #[inline]
    pub fn surface_z(&self, height_m: f64) -> f32 {
        ((height_m + self.water_depth_m) * self.z_units_per_meter) as f32
    }

    /// World z of the seabed bottom face
    pub fn seabed_bottom_z(&self) -> f32 {
        (-self.seabed_thickness_m * self.z_units_per_meter) as f32
    }

    /// Horizontal length in world units
    pub fn horizontal_units(&self, meters: f64) -> f32 {
        (meters * self.units_per_meter) as f32
    }

    /// World position of surface node (x, y) on a grid of `grid_size` cells
    #[inline]
    pub fn node_position(&self, x: usize, y: usize, grid_size: usize, height_m: f64) -> Vec3 {
        let half = grid_size as f32 * 0.5;
        Vec3::new(x as f32 - half, y as f32 - half, self.surface_z(height_m))
    }

    /// Point the orbit camera circles: the centre of the undisturbed surface
    pub fn camera_target(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.surface_z(0.0))
    }
}

/// Turns the simulation state and camera into a draw list each frame
#[derive(Clone, Debug)]
pub struct SceneRenderer {
    config: RenderConfig,
    scale: WorldScale,
}

impl SceneRenderer {
    pub fn new(config: RenderConfig, scale: WorldScale) -> Self {
        Self { config, scale }
    }

    pub fn scale(&self) -> &WorldScale {
        &self.scale
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Mesh, project, sort and compose one frame into `list`
    ///
    /// Writes node heights, node projections, cell depths and the cell order into
    /// `fields`; heights and velocities are only read.
    pub fn render(
        &self,
        fields: &mut FieldStore,
        camera: &OrbitCamera,
        viewport: Vec2,
        body: &SourceBody,
        list: &mut DrawList,
    ) {
        let projector = Projector::new(&camera.basis(), viewport, &self.config);

        build_surface_nodes(fields);
        project_surface_nodes(fields, &projector, &self.scale);
        sort_cells_by_depth(fields);

        let [r, g, b] = self.config.background;
        list.background = Some(Rgba::rgb(r, g, b));
        compose(fields, &projector, &self.scale, body, camera.distance(), list);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_scale_layout() {
        let scale = WorldScale::new(&SimulationConfig::default(), &SceneLayout::default());

        assert_eq!(scale.surface_z(0.0), 2.0);
        assert_eq!(scale.surface_z(-20_000.0), 0.0);
        assert!((scale.seabed_bottom_z() + 0.4).abs() < 1e-6);
        assert_eq!(scale.camera_target(), Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(
            scale.node_position(0, 60, 60, 10_000.0),
            Vec3::new(-30.0, 30.0, 3.0)
        );
    }

    #[test]
    fn test_exaggeration_scales_height_only() {
        let layout = SceneLayout {
            vertical_exaggeration: 3.0,
            ..SceneLayout::default()
        };
        let scale = WorldScale::new(&SimulationConfig::default(), &layout);

        assert_eq!(scale.surface_z(0.0), 6.0);
        assert_eq!(scale.horizontal_units(10_000.0), 1.0);
    }
}
