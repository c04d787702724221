//! Draw commands emitted by the compositor, in painter's order.

use glam::Vec2;

/// Straight (non-premultiplied) sRGB colour with a fractional alpha
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in [0, 1]
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from a `0xRRGGBB` literal
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Convert from HSL
    ///
    /// # Arguments
    /// * `hue` - Degrees, any value (wrapped)
    /// * `saturation` - Percent in [0, 100]
    /// * `lightness` - Percent in [0, 100]
    /// * `alpha` - Opacity in [0, 1]
    pub fn from_hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 360.0;
        let s = (saturation / 100.0).clamp(0.0, 1.0);
        let l = (lightness / 100.0).clamp(0.0, 1.0);

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        let channel = |t: f32| {
            let t = t.rem_euclid(1.0);
            let v = if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            };
            (v * 255.0).round().clamp(0.0, 255.0) as u8
        };

        Self {
            r: channel(h + 1.0 / 3.0),
            g: channel(h),
            b: channel(h - 1.0 / 3.0),
            a: alpha.clamp(0.0, 1.0),
        }
    }

    /// Linear blend towards `other` by `t` in [0, 1]
    pub fn lerp(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;

        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Normalized `[r, g, b, a]` as uploaded in vertex data
    pub fn to_array(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a.clamp(0.0, 1.0),
        ]
    }
}

/// Outline style
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    /// Line width (pixels)
    pub width: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba,
}

/// Two-circle radial gradient (start circle, end circle, colour stops)
///
/// A pixel takes the colour at the largest `t` for which it lies on the circle
/// interpolated between the start and end circles.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    pub start_center: Vec2,
    pub start_radius: f32,
    pub end_center: Vec2,
    pub end_radius: f32,
    /// Sorted by offset
    pub stops: Vec<GradientStop>,
}

impl RadialGradient {
    /// Colour at gradient parameter `t`, clamped to the end stops
    pub fn color_at(&self, t: f32) -> Rgba {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Rgba::rgba(0, 0, 0, 0.0);
        };
        if t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                let f = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
                return a.color.lerp(b.color, f);
            }
        }
        last.color
    }

    /// Largest `t` at which `point` lies on the interpolated gradient circle
    ///
    /// Solves `|p - c(t)| = r(t)` with `c(t) = c0 + t·(c1 - c0)` and `r(t) = r0 + t·(r1 - r0)`,
    /// keeping only roots where `r(t) >= 0`.
    pub fn parameter_at(&self, point: Vec2) -> Option<f32> {
        let cd = self.end_center - self.start_center;
        let pd = point - self.start_center;
        let r0 = self.start_radius;
        let dr = self.end_radius - r0;

        let a = cd.dot(cd) - dr * dr;
        let b = pd.dot(cd) + r0 * dr;
        let c = pd.dot(pd) - r0 * r0;
        let valid = |t: f32| r0 + t * dr >= 0.0;

        if a.abs() < 1e-6 {
            if b.abs() < 1e-12 {
                return None;
            }
            let t = c / (2.0 * b);
            return valid(t).then_some(t);
        }

        let discriminant = b * b - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let t1 = (b + root) / a;
        let t2 = (b - root) / a;
        let (hi, lo) = (t1.max(t2), t1.min(t2));

        if valid(hi) {
            Some(hi)
        } else if valid(lo) {
            Some(lo)
        } else {
            None
        }
    }

    /// Colour painted at `point`, transparent where the gradient is undefined
    pub fn color_at_point(&self, point: Vec2) -> Rgba {
        match self.parameter_at(point) {
            Some(t) => self.color_at(t),
            None => Rgba::rgba(0, 0, 0, 0.0),
        }
    }
}

/// Shaded disc standing in for the gravitating body
#[derive(Clone, Debug, PartialEq)]
pub struct SphereSprite {
    pub center: Vec2,
    /// Projected radius (pixels)
    pub radius: f32,
    pub fill: RadialGradient,
    pub outline: Stroke,
}

/// Paint pass a command belongs to; passes are drawn in declaration order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// Seabed box and water side walls
    Underlay,
    /// Water surface cells and the body
    Surface,
    /// Strokes drawn over everything
    Overlay,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Triangle { points: [Vec2; 3], fill: Rgba },
    Quad { points: [Vec2; 4], fill: Rgba },
    Sphere(SphereSprite),
    Polyline {
        points: Vec<Vec2>,
        closed: bool,
        stroke: Stroke,
    },
}

/// One draw in painter's order
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub layer: Layer,
    /// Camera-space depth used for ordering (world units)
    pub depth: f32,
    pub shape: Shape,
}

impl DrawCommand {
    /// Vertices and fill of a flat polygon, `None` for other shapes
    pub fn polygon(&self) -> Option<(&[Vec2], Rgba)> {
        match &self.shape {
            Shape::Triangle { points, fill } => Some((points.as_slice(), *fill)),
            Shape::Quad { points, fill } => Some((points.as_slice(), *fill)),
            _ => None,
        }
    }
}

/// Back-to-front list of draws for one frame
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    pub background: Option<Rgba>,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all commands, keeping the allocation
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn push(&mut self, layer: Layer, depth: f32, shape: Shape) {
        self.commands.push(DrawCommand { layer, depth, shape });
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Sort the commands from `start` onwards far-to-near (stable)
    pub fn sort_tail_by_depth(&mut self, start: usize) {
        self.commands[start..].sort_by(|a, b| b.depth.total_cmp(&a.depth));
    }

    /// Flat polygons in draw order
    pub fn polygons(&self) -> impl Iterator<Item = (&[Vec2], Rgba)> {
        self.commands.iter().filter_map(DrawCommand::polygon)
    }
}
