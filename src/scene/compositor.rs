//! Painter's-algorithm composition of the seabed, water volume, surface and body.
//!
//! Underlay faces (seabed box and the four water walls) are sorted together by mean
//! corner depth. The surface follows in the order prepared by the mesher, and the body
//! is slotted in front of the first cell that is not farther away than it. The
//! surface boundary is stroked last.

use glam::{Vec2, Vec3};

use super::draw::{
    DrawList, GradientStop, Layer, RadialGradient, Rgba, Shape, SphereSprite, Stroke,
};
use super::projector::Projector;
use super::WorldScale;
use crate::sim::{FieldStore, SourceBody};

const SEABED_TOP: Rgba = Rgba::hex(0x4b3a2d);
const SEABED_RIGHT: Rgba = Rgba::hex(0x3a2a1f);
const SEABED_FRONT: Rgba = Rgba::hex(0x2f2218);
const SEABED_LEFT: Rgba = Rgba::hex(0x544031);
const SEABED_BACK: Rgba = Rgba::hex(0x3a2d23);

const WALL_ALPHA: f32 = 0.35;
const WALL_RIGHT: Rgba = Rgba::rgba(110, 195, 225, WALL_ALPHA);
const WALL_LEFT: Rgba = Rgba::rgba(95, 170, 205, WALL_ALPHA);
const WALL_FRONT: Rgba = Rgba::rgba(130, 210, 235, WALL_ALPHA);
const WALL_BACK: Rgba = Rgba::rgba(86, 155, 190, WALL_ALPHA);

const SURFACE_HUE: f32 = 196.0;
const SURFACE_SATURATION: f32 = 62.0;
const SURFACE_ALPHA: f32 = 0.55;
const SURFACE_BASE_LIGHTNESS: f32 = 66.0;
/// Lightness percent gained per metre of height
const SURFACE_HEIGHT_GAIN: f32 = 0.015;
/// Lightness percent lost at full depth shade
const SURFACE_DEPTH_SHADE: f32 = 10.0;
/// Depth shade saturates at this multiple of the camera distance
const SURFACE_SHADE_RANGE: f32 = 1.8;
const SURFACE_LIGHTNESS_MIN: f32 = 50.0;
const SURFACE_LIGHTNESS_MAX: f32 = 74.0;

const SPHERE_HIGHLIGHT: Rgba = Rgba::rgb(255, 224, 190);
const SPHERE_MID: Rgba = Rgba::rgb(230, 160, 88);
const SPHERE_SHADOW: Rgba = Rgba::rgb(120, 66, 28);
const SPHERE_OUTLINE: Stroke = Stroke {
    color: Rgba::rgba(120, 66, 28, 0.65),
    width: 1.2,
};

const SURFACE_OUTLINE: Stroke = Stroke {
    color: Rgba::rgba(180, 230, 245, 0.35),
    width: 1.0,
};

/// Emit the whole frame into `list`, back to front
///
/// Expects `fields` to hold this frame's node projections and sorted cell order.
///
/// # Arguments
/// * `camera_distance` - Orbit distance, used to normalize the surface depth shade
pub fn compose(
    fields: &FieldStore,
    projector: &Projector,
    scale: &WorldScale,
    body: &SourceBody,
    camera_distance: f32,
    list: &mut DrawList,
) {
    list.clear();

    push_seabed_faces(fields.grid_size(), projector, scale, list);
    push_water_walls(fields, projector, scale, list);
    list.sort_tail_by_depth(0);

    let sphere = project_sphere(projector, scale, body);
    push_surface(fields, camera_distance, sphere, list);
    push_surface_outline(fields, list);
}

/// Project four world corners and queue them as an underlay quad
fn push_face(list: &mut DrawList, projector: &Projector, corners: [Vec3; 4], fill: Rgba) {
    let mut points = [Vec2::ZERO; 4];
    let mut depth = 0.0;

    for (point, corner) in points.iter_mut().zip(corners) {
        let (screen, corner_depth) = projector.project(corner);
        *point = screen;
        depth += corner_depth;
    }

    list.push(Layer::Underlay, depth * 0.25, Shape::Quad { points, fill });
}

fn push_seabed_faces(
    grid_size: usize,
    projector: &Projector,
    scale: &WorldScale,
    list: &mut DrawList,
) {
    let half = grid_size as f32 * 0.5;
    let bottom = scale.seabed_bottom_z();

    let p0 = Vec3::new(-half, -half, 0.0);
    let p1 = Vec3::new(half, -half, 0.0);
    let p2 = Vec3::new(half, half, 0.0);
    let p3 = Vec3::new(-half, half, 0.0);
    let [b0, b1, b2, b3] = [p0, p1, p2, p3].map(|p| Vec3::new(p.x, p.y, bottom));

    push_face(list, projector, [p0, p1, p2, p3], SEABED_TOP);
    push_face(list, projector, [p1, p2, b2, b1], SEABED_RIGHT);
    push_face(list, projector, [p0, p3, b3, b0], SEABED_LEFT);
    push_face(list, projector, [p3, p2, b2, b3], SEABED_FRONT);
    push_face(list, projector, [p0, p1, b1, b0], SEABED_BACK);
}

/// One strip of quads per grid edge, from the seabed top up to the edge nodes
fn push_water_walls(
    fields: &FieldStore,
    projector: &Projector,
    scale: &WorldScale,
    list: &mut DrawList,
) {
    let n = fields.grid_size();
    let half = n as f32 * 0.5;
    let z_at = |x: usize, y: usize| {
        scale.surface_z(fields.node_heights[fields.node_index(x, y)])
    };

    for y in 0..n {
        let y0 = y as f32 - half;
        let y1 = y0 + 1.0;

        push_face(
            list,
            projector,
            [
                Vec3::new(half, y0, 0.0),
                Vec3::new(half, y1, 0.0),
                Vec3::new(half, y1, z_at(n, y + 1)),
                Vec3::new(half, y0, z_at(n, y)),
            ],
            WALL_RIGHT,
        );
        push_face(
            list,
            projector,
            [
                Vec3::new(-half, y1, 0.0),
                Vec3::new(-half, y0, 0.0),
                Vec3::new(-half, y0, z_at(0, y)),
                Vec3::new(-half, y1, z_at(0, y + 1)),
            ],
            WALL_LEFT,
        );
    }

    for x in 0..n {
        let x0 = x as f32 - half;
        let x1 = x0 + 1.0;

        push_face(
            list,
            projector,
            [
                Vec3::new(x0, half, 0.0),
                Vec3::new(x1, half, 0.0),
                Vec3::new(x1, half, z_at(x + 1, n)),
                Vec3::new(x0, half, z_at(x, n)),
            ],
            WALL_FRONT,
        );
        push_face(
            list,
            projector,
            [
                Vec3::new(x1, -half, 0.0),
                Vec3::new(x0, -half, 0.0),
                Vec3::new(x0, -half, z_at(x, 0)),
                Vec3::new(x1, -half, z_at(x + 1, 0)),
            ],
            WALL_BACK,
        );
    }
}

/// Projected body together with its ordering depth (nearest point along the view axis)
fn project_sphere(
    projector: &Projector,
    scale: &WorldScale,
    body: &SourceBody,
) -> (SphereSprite, f32) {
    let center_world = Vec3::new(0.0, 0.0, scale.surface_z(body.center_height_m));
    let radius_units = scale.horizontal_units(body.radius_m);

    let (center, center_depth) = projector.project(center_world);
    let radius = projector.screen_length(radius_units, center_depth);

    let fill = RadialGradient {
        start_center: center - Vec2::new(radius * 0.3, radius * 0.4),
        start_radius: radius * 0.3,
        end_center: center,
        end_radius: radius,
        stops: vec![
            GradientStop {
                offset: 0.0,
                color: SPHERE_HIGHLIGHT,
            },
            GradientStop {
                offset: 0.6,
                color: SPHERE_MID,
            },
            GradientStop {
                offset: 1.0,
                color: SPHERE_SHADOW,
            },
        ],
    };

    let sprite = SphereSprite {
        center,
        radius,
        fill,
        outline: SPHERE_OUTLINE,
    };
    (sprite, center_depth - radius_units)
}

fn surface_color(average_height_m: f64, cell_depth: f32, camera_distance: f32) -> Rgba {
    let shade = (cell_depth / (camera_distance * SURFACE_SHADE_RANGE)).min(1.0);
    let lightness = (SURFACE_BASE_LIGHTNESS + average_height_m as f32 * SURFACE_HEIGHT_GAIN
        - shade * SURFACE_DEPTH_SHADE)
        .clamp(SURFACE_LIGHTNESS_MIN, SURFACE_LIGHTNESS_MAX);

    Rgba::from_hsla(SURFACE_HUE, SURFACE_SATURATION, lightness, SURFACE_ALPHA)
}

fn push_surface(
    fields: &FieldStore,
    camera_distance: f32,
    (sphere, sphere_depth): (SphereSprite, f32),
    list: &mut DrawList,
) {
    let n = fields.grid_size();
    let mut sphere = Some(sphere);

    for &cell in &fields.cell_order {
        let cell = cell as usize;
        let depth = fields.cell_depth[cell];

        if depth <= sphere_depth {
            if let Some(sprite) = sphere.take() {
                list.push(Layer::Surface, sphere_depth, Shape::Sphere(sprite));
            }
        }

        let (x, y) = (cell % n, cell / n);
        let i00 = fields.node_index(x, y);
        let i10 = fields.node_index(x + 1, y);
        let i11 = fields.node_index(x + 1, y + 1);
        let i01 = fields.node_index(x, y + 1);

        let average_height = (fields.node_heights[i00]
            + fields.node_heights[i10]
            + fields.node_heights[i11]
            + fields.node_heights[i01])
            * 0.25;
        let fill = surface_color(average_height, depth, camera_distance);

        let screen = &fields.node_screen;
        list.push(
            Layer::Surface,
            depth,
            Shape::Triangle {
                points: [screen[i00], screen[i10], screen[i11]],
                fill,
            },
        );
        list.push(
            Layer::Surface,
            depth,
            Shape::Triangle {
                points: [screen[i00], screen[i11], screen[i01]],
                fill,
            },
        );
    }

    if let Some(sprite) = sphere {
        list.push(Layer::Surface, sphere_depth, Shape::Sphere(sprite));
    }
}

/// Closed polyline around the boundary nodes
fn push_surface_outline(fields: &FieldStore, list: &mut DrawList) {
    let n = fields.grid_size();
    let screen = |x: usize, y: usize| fields.node_screen[fields.node_index(x, y)];

    let mut points = Vec::with_capacity(4 * n);
    points.extend((0..=n).map(|x| screen(x, 0)));
    points.extend((1..=n).map(|y| screen(n, y)));
    points.extend((0..n).rev().map(|x| screen(x, n)));
    points.extend((1..n).rev().map(|y| screen(0, y)));

    list.push(
        Layer::Overlay,
        0.0,
        Shape::Polyline {
            points,
            closed: true,
            stroke: SURFACE_OUTLINE,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitCamera;
    use crate::params::{
        OrbitConfig, RenderConfig, SceneLayout, SimulationConfig, SimulationParams,
    };
    use crate::scene::SceneRenderer;
    use crate::sim::Simulation;

    fn renderer() -> SceneRenderer {
        let scale = WorldScale::new(&SimulationConfig::default(), &SceneLayout::default());
        SceneRenderer::new(RenderConfig::default(), scale)
    }

    fn render(sim: &mut Simulation, body: &SourceBody) -> DrawList {
        let renderer = renderer();
        let n = sim.grid_size();
        let target = renderer.scale().camera_target();
        let camera = OrbitCamera::new(&OrbitConfig::default(), n, target);
        let mut list = DrawList::new();
        renderer.render(
            &mut sim.fields,
            &camera,
            Vec2::new(1280.0, 720.0),
            body,
            &mut list,
        );
        list
    }

    fn sphere_position(list: &DrawList) -> usize {
        let spheres: Vec<usize> = list
            .commands()
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c.shape, Shape::Sphere(_)))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(spheres.len(), 1);
        spheres[0]
    }

    #[test]
    fn test_layers_are_ordered_back_to_front() {
        let mut sim = Simulation::new(SimulationConfig::default(), 24).unwrap();
        for _ in 0..40 {
            sim.step();
        }
        let body = sim.source_body();
        let list = render(&mut sim, &body);

        let commands = list.commands();
        assert!(commands.windows(2).all(|w| w[0].layer <= w[1].layer));

        for pair in commands.windows(2) {
            if pair[0].layer == pair[1].layer {
                assert!(
                    pair[0].depth >= pair[1].depth,
                    "{:?} {} before {}",
                    pair[0].layer,
                    pair[0].depth,
                    pair[1].depth
                );
            }
        }
    }

    #[test]
    fn test_command_counts() {
        let mut sim = Simulation::new(SimulationConfig::default(), 36).unwrap();
        let body = sim.source_body();
        let list = render(&mut sim, &body);

        let count = |layer: Layer| list.commands().iter().filter(|c| c.layer == layer).count();
        // Five seabed faces and one wall quad per edge cell
        assert_eq!(count(Layer::Underlay), 5 + 4 * 36);
        // Two triangles per cell plus the body
        assert_eq!(count(Layer::Surface), 2 * 36 * 36 + 1);
        assert_eq!(count(Layer::Overlay), 1);
        assert_eq!(list.polygons().count(), 5 + 4 * 36 + 2 * 36 * 36);

        match list.commands().last().map(|c| &c.shape) {
            Some(Shape::Polyline { points, closed, .. }) => {
                assert!(*closed);
                assert_eq!(points.len(), 4 * 36);
            }
            other => panic!("expected outline last, got {:?}", other),
        }
    }

    #[test]
    fn test_static_scene_is_stable() {
        let mut sim = Simulation::new(SimulationConfig::default(), 24).unwrap();
        sim.set_params(SimulationParams {
            height_km: 10.0,
            ..SimulationParams::default()
        })
        .unwrap();
        for _ in 0..25 {
            sim.step();
        }
        let body = sim.source_body();

        let first = render(&mut sim, &body);
        let order = sim.fields.cell_order.clone();
        let second = render(&mut sim, &body);

        assert_eq!(first.commands(), second.commands());
        assert_eq!(order, sim.fields.cell_order);
    }

    #[test]
    fn test_sphere_slots_between_far_and_near_cells() {
        let mut sim = Simulation::new(SimulationConfig::default(), 60).unwrap();
        let body = sim.source_body();
        let list = render(&mut sim, &body);

        let at = sphere_position(&list);
        let sphere_depth = list.commands()[at].depth;
        for (i, command) in list.commands().iter().enumerate() {
            if command.layer != Layer::Surface || i == at {
                continue;
            }
            if i < at {
                assert!(command.depth > sphere_depth);
            } else {
                assert!(command.depth <= sphere_depth);
            }
        }
    }

    #[test]
    fn test_sphere_near_the_eye_is_drawn_last() {
        let mut sim = Simulation::new(SimulationConfig::default(), 24).unwrap();
        // Large body high above the surface, its near side in front of every cell
        let body = SourceBody {
            mass_kg: 1e24,
            radius_m: 6.2e5,
            center_height_m: 1.12e6,
        };
        let list = render(&mut sim, &body);

        let at = sphere_position(&list);
        let next = &list.commands()[at + 1];
        assert_eq!(next.layer, Layer::Overlay);
    }

    #[test]
    fn test_sphere_behind_every_cell_is_drawn_first() {
        let mut sim = Simulation::new(SimulationConfig::default(), 24).unwrap();
        // Small body far beneath the surface, so farther from the eye than any cell
        let body = SourceBody {
            mass_kg: 1e24,
            radius_m: 1e4,
            center_height_m: -2.0e6,
        };
        let list = render(&mut sim, &body);

        let first_surface = list
            .commands()
            .iter()
            .position(|c| c.layer == Layer::Surface)
            .unwrap();
        assert_eq!(sphere_position(&list), first_surface);

        let sphere_depth = list.commands()[first_surface].depth;
        assert!(list.commands()[first_surface + 1..]
            .iter()
            .filter(|c| c.layer == Layer::Surface)
            .all(|c| c.depth < sphere_depth));
    }

    #[test]
    fn test_surface_lightness_is_clamped() {
        let bright = surface_color(1e6, 0.0, 72.0);
        let dark = surface_color(-1e6, 500.0, 72.0);

        assert_eq!(bright, Rgba::from_hsla(196.0, 62.0, 74.0, 0.55));
        assert_eq!(dark, Rgba::from_hsla(196.0, 62.0, 50.0, 0.55));
        assert_eq!(
            surface_color(0.0, 0.0, 72.0),
            Rgba::from_hsla(196.0, 62.0, 66.0, 0.55)
        );
    }
}
