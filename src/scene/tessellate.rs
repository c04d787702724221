//! Flattens a draw list into screen-space triangles for the GPU painter.
//!
//! Commands keep their painter's order: the vertex stream is drawn without a
//! depth buffer, so later triangles blend over earlier ones.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::draw::{DrawList, RadialGradient, Rgba, Shape, SphereSprite, Stroke};

/// Pixel-space position with a straight-alpha sRGB colour
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ScreenVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl ScreenVertex {
    fn new(position: Vec2, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            color,
        }
    }
}

/// Replace `out` with the triangle list for `list`, in draw order
pub fn tessellate(list: &DrawList, out: &mut Vec<ScreenVertex>) {
    out.clear();

    for command in list.commands() {
        match &command.shape {
            Shape::Triangle { points, fill } => push_polygon(out, points, *fill),
            Shape::Quad { points, fill } => push_polygon(out, points, *fill),
            Shape::Sphere(sphere) => push_sphere(out, sphere),
            Shape::Polyline {
                points,
                closed,
                stroke,
            } => push_polyline(out, points, *closed, *stroke),
        }
    }
}

/// Convex polygon as a fan around its first vertex
fn push_polygon(out: &mut Vec<ScreenVertex>, points: &[Vec2], fill: Rgba) {
    if points.len() < 3 || !points.iter().all(|p| p.is_finite()) {
        return;
    }
    let color = fill.to_array();

    for i in 1..points.len() - 1 {
        out.push(ScreenVertex::new(points[0], color));
        out.push(ScreenVertex::new(points[i], color));
        out.push(ScreenVertex::new(points[i + 1], color));
    }
}

fn push_quad(out: &mut Vec<ScreenVertex>, corners: [Vec2; 4], colors: [[f32; 4]; 4]) {
    for i in [0, 1, 2, 0, 2, 3] {
        out.push(ScreenVertex::new(corners[i], colors[i]));
    }
}

/// Disc split into rings of wedges, shaded by sampling the gradient at each vertex
fn push_sphere(out: &mut Vec<ScreenVertex>, sphere: &SphereSprite) {
    let SphereSprite {
        center,
        radius,
        fill,
        outline,
    } = sphere;
    if !radius.is_finite() || *radius <= 0.0 || !center.is_finite() {
        return;
    }

    let segments = ((radius * 0.5).ceil() as usize).clamp(24, 128);
    let rings = ((radius / 6.0).ceil() as usize).clamp(4, 16);
    let direction = |j: usize| {
        let angle = j as f32 / segments as f32 * TAU;
        Vec2::new(angle.cos(), angle.sin())
    };
    let point =
        |ring: usize, j: usize| *center + direction(j) * (radius * ring as f32 / rings as f32);
    let shade = |p: Vec2| gradient_color(fill, p);

    let hub = ScreenVertex::new(*center, shade(*center));
    for j in 0..segments {
        let (a, b) = (point(1, j), point(1, j + 1));
        out.push(hub);
        out.push(ScreenVertex::new(a, shade(a)));
        out.push(ScreenVertex::new(b, shade(b)));
    }

    for ring in 1..rings {
        for j in 0..segments {
            let corners = [
                point(ring, j),
                point(ring + 1, j),
                point(ring + 1, j + 1),
                point(ring, j + 1),
            ];
            push_quad(out, corners, corners.map(shade));
        }
    }

    let ring: Vec<Vec2> = (0..segments).map(|j| point(rings, j)).collect();
    push_polyline(out, &ring, true, *outline);
}

fn gradient_color(gradient: &RadialGradient, point: Vec2) -> [f32; 4] {
    gradient.color_at_point(point).to_array()
}

/// One quad per segment; strokes thinner than a pixel are widened and faded
fn push_polyline(out: &mut Vec<ScreenVertex>, points: &[Vec2], closed: bool, stroke: Stroke) {
    if points.len() < 2 || !points.iter().all(|p| p.is_finite()) {
        return;
    }
    if stroke.width.is_nan() || stroke.width <= 0.0 {
        return;
    }

    let mut color = stroke.color.to_array();
    color[3] *= stroke.width.min(1.0);
    let half_width = stroke.width.max(1.0) * 0.5;

    let mut segment = |from: Vec2, to: Vec2| {
        let normal = (to - from).normalize_or_zero().perp() * half_width;
        if normal == Vec2::ZERO {
            return;
        }
        push_quad(
            out,
            [from + normal, to + normal, to - normal, from - normal],
            [color; 4],
        );
    };

    for pair in points.windows(2) {
        segment(pair[0], pair[1]);
    }
    if closed && points.len() > 2 {
        segment(points[points.len() - 1], points[0]);
    }
}
