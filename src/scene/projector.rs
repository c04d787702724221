//! Perspective projection of world points onto the viewport.

use glam::{Vec2, Vec3};

use crate::camera::CameraBasis;
use crate::params::RenderConfig;

/// Pinhole projector for one camera basis and viewport size
#[derive(Clone, Copy, Debug)]
pub struct Projector {
    eye: Vec3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
    focal: f32,
    center: Vec2,
    near: f32,
}

impl Projector {
    /// Build a projector for a `viewport` (pixels)
    ///
    /// The focal length scales with the short side of the viewport so the framing
    /// does not depend on aspect ratio.
    pub fn new(basis: &CameraBasis, viewport: Vec2, config: &RenderConfig) -> Self {
        let half_fov = (config.fov_degrees * 0.5).to_radians();
        let short_side = viewport.x.min(viewport.y).max(1.0);
        let (cx, cy) = config.center_fraction;

        Self {
            eye: basis.eye,
            right: basis.right,
            up: basis.up,
            forward: basis.forward,
            focal: config.focal_scale * short_side / half_fov.tan(),
            center: Vec2::new(viewport.x * cx, viewport.y * cy),
            near: config.near_depth,
        }
    }

    /// Focal length (pixels)
    pub fn focal(&self) -> f32 {
        self.focal
    }

    /// Viewport point onto which the view axis projects (pixels)
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Camera-space depth of `point`, clamped to the near minimum
    #[inline]
    pub fn depth(&self, point: Vec3) -> f32 {
        (point - self.eye).dot(self.forward).max(self.near)
    }

    /// Project a world point
    ///
    /// # Returns
    /// Screen position (pixels, y down) and the clamped camera-space depth
    #[inline]
    pub fn project(&self, point: Vec3) -> (Vec2, f32) {
        let rel = point - self.eye;
        let depth = rel.dot(self.forward).max(self.near);
        let scale = self.focal / depth;

        let screen = self.center + Vec2::new(rel.dot(self.right), -rel.dot(self.up)) * scale;
        (screen, depth)
    }

    /// Screen size (pixels) of a world length seen at `depth`
    pub fn screen_length(&self, length: f32, depth: f32) -> f32 {
        self.focal * length / depth.max(self.near)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitCamera;
    use crate::params::OrbitConfig;

    fn projector(viewport: Vec2) -> (Projector, CameraBasis) {
        let camera = OrbitCamera::new(&OrbitConfig::default(), 60, Vec3::new(0.0, 0.0, 2.0));
        let basis = camera.basis();
        (
            Projector::new(&basis, viewport, &RenderConfig::default()),
            basis,
        )
    }

    #[test]
    fn test_view_axis_hits_center() {
        let viewport = Vec2::new(1280.0, 720.0);
        let (projector, basis) = projector(viewport);

        let (screen, depth) = projector.project(basis.eye + basis.forward);

        assert!((screen - Vec2::new(640.0, 417.6)).length() < 1e-2, "{:?}", screen);
        assert!((depth - 1.0).abs() < 1e-5);
        assert!(depth >= RenderConfig::default().near_depth);
    }

    #[test]
    fn test_focal_length_uses_short_side() {
        let (wide, _) = projector(Vec2::new(1600.0, 600.0));
        let (tall, _) = projector(Vec2::new(600.0, 1600.0));
        assert!((wide.focal() - tall.focal()).abs() < 1e-3);

        let expected = 0.92 * 600.0 / 25f32.to_radians().tan();
        assert!((wide.focal() - expected).abs() < 1e-2);
    }

    #[test]
    fn test_points_behind_are_clamped() {
        let (projector, basis) = projector(Vec2::new(800.0, 800.0));
        let behind = basis.eye - basis.forward * 5.0 + basis.right;

        let (screen, depth) = projector.project(behind);
        assert_eq!(depth, 0.05);
        assert!(screen.is_finite());
        assert_eq!(projector.depth(behind), 0.05);
    }

    #[test]
    fn test_right_and_up_map_to_screen_axes() {
        let (projector, basis) = projector(Vec2::new(800.0, 800.0));
        let ahead = basis.eye + basis.forward * 10.0;

        let (center, _) = projector.project(ahead);
        let (to_right, _) = projector.project(ahead + basis.right);
        let (to_up, _) = projector.project(ahead + basis.up);

        assert!(to_right.x > center.x);
        assert!((to_right.y - center.y).abs() < 1e-3);
        // Screen y grows downward
        assert!(to_up.y < center.y);
        assert!((to_right.x - center.x - projector.screen_length(1.0, 10.0)).abs() < 1e-2);
    }
}
