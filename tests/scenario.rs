//! End-to-end runs through the public session API

use gravitide::scene::{tessellate, Layer, Shape};
use gravitide::session::{Command, Session, SessionConfig};

fn settled_session(steps: usize) -> Session {
    let mut session = Session::new(SessionConfig::default()).unwrap();
    session.step(steps);
    session
}

#[test]
fn test_tide_forms_under_the_body() {
    let session = settled_session(500);
    let fields = &session.simulation().fields;
    let n = fields.grid_size();

    assert!(fields.is_finite());
    assert!(fields.mean_height().abs() < 1e-6);

    // At 10 km cells the pull under the body outweighs the wave term, so the
    // bulge keeps growing: roughly 48 km after 500 steps
    let peak = fields.max_abs_height();
    let params = session.params();
    assert!(peak < params.height_km * 1000.0, "peak {}", peak);
    assert!(peak < params.source_height_m());

    let (mut peak_x, mut peak_y) = (0, 0);
    for y in 0..n {
        for x in 0..n {
            if fields.heights[fields.index(x, y)] > fields.heights[fields.index(peak_x, peak_y)] {
                (peak_x, peak_y) = (x, y);
            }
        }
    }
    let central = [n / 2 - 1, n / 2];
    assert!(
        central.contains(&peak_x) && central.contains(&peak_y),
        "peak at ({}, {})",
        peak_x,
        peak_y
    );
    assert_eq!(fields.heights[fields.index(peak_x, peak_y)], peak);

    let center = fields.heights[fields.index(n / 2, n / 2)];
    let corner = fields.heights[fields.index(0, 0)];
    assert!(center > corner, "center {} corner {}", center, corner);
}

#[test]
fn test_reset_keeps_camera_and_params() {
    let mut session = settled_session(50);
    session.apply(Command::AdjustMass(1.0)).unwrap();
    session.pointer_down(glam::Vec2::new(0.0, 0.0));
    session.pointer_move(glam::Vec2::new(40.0, 20.0));
    session.pointer_up();

    let camera = session.camera().clone();
    let params = session.params();

    session.apply(Command::Reset).unwrap();

    assert_eq!(session.simulation().fields.max_abs_height(), 0.0);
    assert_eq!(session.camera(), &camera);
    assert_eq!(session.params(), params);
}

#[test]
fn test_frame_is_painted_back_to_front() {
    let mut session = settled_session(200);
    let list = session.render();
    let commands = list.commands();

    assert!(commands.windows(2).all(|w| w[0].layer <= w[1].layer));
    assert_eq!(
        commands.iter().filter(|c| c.layer == Layer::Overlay).count(),
        1
    );

    let underlay: Vec<f32> = commands
        .iter()
        .filter(|c| c.layer == Layer::Underlay)
        .map(|c| c.depth)
        .collect();
    assert!(underlay.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_frame_tessellates_in_paint_order() {
    let mut session = settled_session(100);
    session.resize_viewport(320.0, 180.0);
    let list = session.render();

    let mut vertices = Vec::new();
    tessellate(list, &mut vertices);

    assert!(!vertices.is_empty());
    assert_eq!(vertices.len() % 3, 0);
    assert!(vertices
        .iter()
        .all(|v| v.position.iter().all(|p| p.is_finite())));

    // The farthest underlay face leads the stream
    let (points, fill) = list.commands()[0].polygon().unwrap();
    assert_eq!(vertices[0].position, points[0].to_array());
    assert_eq!(vertices[0].color, fill.to_array());

    // The body is tessellated once, as a fan plus its outline
    assert_eq!(
        list.commands()
            .iter()
            .filter(|c| matches!(c.shape, Shape::Sphere(_)))
            .count(),
        1
    );
}

#[test]
fn test_grid_switch_restarts_flat() {
    let mut session = settled_session(100);
    session.apply(Command::FinerGrid).unwrap();

    assert_eq!(session.grid_size(), 72);
    assert_eq!(session.simulation().fields.max_abs_height(), 0.0);
    assert_eq!(session.simulation().fields.heights.len(), 72 * 72);
}
