//! Colors, gradients and compositing operators
//!
//! Colors are straight (non-premultiplied) RGBA in `[0, 1]`. Blending works
//! on premultiplied values, matching the pixel storage in [`super::Pixmap`].

use glam::Vec2;

/// Straight-alpha RGBA color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 0xRRGGBB
    pub const fn hex(rgb: u32) -> Self {
        Self::rgba(
            ((rgb >> 16) & 0xFF) as f32 / 255.0,
            ((rgb >> 8) & 0xFF) as f32 / 255.0,
            (rgb & 0xFF) as f32 / 255.0,
            1.0,
        )
    }

    /// White with the given alpha
    pub const fn white(alpha: f32) -> Self {
        Self::rgba(1.0, 1.0, 1.0, alpha)
    }

    pub fn premultiplied(&self) -> [f32; 4] {
        [self.r * self.a, self.g * self.a, self.b * self.a, self.a]
    }

    pub fn lerp(&self, other: &Color, t: f32) -> Color {
        Color::rgba(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }
}

/// Ordered color stops, offsets in `[0, 1]`
#[derive(Debug, Clone)]
pub struct Gradient {
    stops: Vec<(f32, Color)>,
}

impl Gradient {
    pub fn new(stops: &[(f32, Color)]) -> Self {
        let mut stops = stops.to_vec();
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { stops }
    }

    /// Color at offset `t`; outside the stop range the end colors extend
    pub fn sample(&self, t: f32) -> Color {
        let Some(&(first_offset, first)) = self.stops.first() else {
            return Color::TRANSPARENT;
        };
        if t <= first_offset {
            return first;
        }
        for pair in self.stops.windows(2) {
            let (o0, c0) = pair[0];
            let (o1, c1) = pair[1];
            if t <= o1 {
                let span = o1 - o0;
                if span <= f32::EPSILON {
                    return c1;
                }
                return c0.lerp(&c1, (t - o0) / span);
            }
        }
        self.stops.last().map(|&(_, c)| c).unwrap_or(first)
    }
}

/// How a shape is colored
#[derive(Debug, Clone)]
pub enum Paint {
    Solid(Color),
    /// Gradient along the segment `start → end`
    Linear {
        start: Vec2,
        end: Vec2,
        gradient: Gradient,
    },
    /// Concentric radial gradient; offset 0 sits at `r0`, offset 1 at `r1`
    Radial {
        center: Vec2,
        r0: f32,
        r1: f32,
        gradient: Gradient,
    },
}

impl Paint {
    pub fn color_at(&self, p: Vec2) -> Color {
        match self {
            Paint::Solid(color) => *color,
            Paint::Linear {
                start,
                end,
                gradient,
            } => {
                let axis = *end - *start;
                let len_sq = axis.length_squared();
                let t = if len_sq > 0.0 {
                    (p - *start).dot(axis) / len_sq
                } else {
                    0.0
                };
                gradient.sample(t)
            }
            Paint::Radial {
                center,
                r0,
                r1,
                gradient,
            } => {
                let span = r1 - r0;
                let t = if span.abs() > 0.0 {
                    ((p - *center).length() - r0) / span
                } else {
                    0.0
                };
                gradient.sample(t)
            }
        }
    }
}

/// Porter-Duff operators used by the bubble pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeOp {
    /// Source drawn over destination
    #[default]
    SourceOver,
    /// Source drawn behind destination
    DestinationOver,
    /// Keep only the parts where exactly one of source and destination is present
    Xor,
}

impl CompositeOp {
    /// Blend premultiplied `src` onto premultiplied `dst`
    pub fn blend(self, src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
        let (src_a, dst_a) = (src[3], dst[3]);
        let (fs, fd) = match self {
            CompositeOp::SourceOver => (1.0, 1.0 - src_a),
            CompositeOp::DestinationOver => (1.0 - dst_a, 1.0),
            CompositeOp::Xor => (1.0 - dst_a, 1.0 - src_a),
        };
        std::array::from_fn(|i| src[i] * fs + dst[i] * fd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_sample_clamps_and_interpolates() {
        let gradient = Gradient::new(&[(0.0, Color::white(0.0)), (1.0, Color::white(1.0))]);
        assert_eq!(gradient.sample(-1.0).a, 0.0);
        assert_eq!(gradient.sample(2.0).a, 1.0);
        assert!((gradient.sample(0.25).a - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_radial_reverse_direction() {
        // Offset 0 on the rim, 1 at the center
        let paint = Paint::Radial {
            center: Vec2::new(10.0, 10.0),
            r0: 10.0,
            r1: 0.0,
            gradient: Gradient::new(&[(0.0, Color::white(0.2)), (1.0, Color::white(1.0))]),
        };
        assert!((paint.color_at(Vec2::new(10.0, 10.0)).a - 1.0).abs() < 1e-6);
        assert!((paint.color_at(Vec2::new(20.0, 10.0)).a - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_linear_projection() {
        let paint = Paint::Linear {
            start: Vec2::ZERO,
            end: Vec2::new(10.0, 0.0),
            gradient: Gradient::new(&[(0.0, Color::hex(0x000000)), (1.0, Color::hex(0xFF0000))]),
        };
        let mid = paint.color_at(Vec2::new(5.0, 7.0));
        assert!((mid.r - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_xor_of_two_opaque_is_empty() {
        let white = Color::WHITE.premultiplied();
        let out = CompositeOp::Xor.blend(white, white);
        assert_eq!(out[3], 0.0);
    }

    #[test]
    fn test_destination_over_keeps_opaque_destination() {
        let red = Color::hex(0xFF0000).premultiplied();
        let blue = Color::hex(0x0000FF).premultiplied();
        assert_eq!(CompositeOp::DestinationOver.blend(blue, red), red);
        assert_eq!(CompositeOp::SourceOver.blend(blue, red), blue);
    }
}
