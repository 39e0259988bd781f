//! Premultiplied RGBA pixel buffer
//!
//! Used both for cached bubble sprites and for the frame that gets presented
//! to the host surface. Row-major, top-left origin, y down.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::paint::{Color, CompositeOp, Paint};
use super::sdf;

/// One premultiplied RGBA pixel
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Rgba8 = Rgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    #[inline]
    fn to_unit(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    #[inline]
    fn from_unit(v: [f32; 4]) -> Self {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            r: q(v[0]),
            g: q(v[1]),
            b: q(v[2]),
            a: q(v[3]),
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl fmt::Debug for Pixmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pixmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Pixmap {
    /// Fully transparent pixmap
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba8::TRANSPARENT; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Raw premultiplied bytes
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Straight-alpha RGBA bytes, the layout canvas `ImageData` expects
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut bytes = self.as_bytes().to_vec();
        for px in bytes.chunks_exact_mut(4) {
            let a = px[3];
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((*c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8;
            }
        }
        bytes
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Rgba8::TRANSPARENT);
    }

    /// Reallocate to a new size; contents are cleared
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels
            .resize(width as usize * height as usize, Rgba8::TRANSPARENT);
    }

    /// Source-over fill of an axis-aligned rectangle, clipped to the pixmap
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        let src = color.premultiplied();
        let (x0, x1) = clip_span(x, w, self.width);
        let (y0, y1) = clip_span(y, h, self.height);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_at(px, py, src, CompositeOp::SourceOver);
            }
        }
    }

    /// Source-over copy of another pixmap with its top-left at `(x, y)`
    pub fn draw_pixmap(&mut self, src: &Pixmap, x: i32, y: i32) {
        let (x0, x1) = clip_span(x, src.width, self.width);
        let (y0, y1) = clip_span(y, src.height, self.height);
        for py in y0..y1 {
            let sy = (py as i64 - y as i64) as u32;
            for px in x0..x1 {
                let sx = (px as i64 - x as i64) as u32;
                let Some(s) = src.pixel(sx, sy) else {
                    continue;
                };
                match s.a {
                    0 => {}
                    255 => self.pixels[py as usize * self.width as usize + px as usize] = s,
                    _ => self.blend_at(px, py, s.to_unit(), CompositeOp::SourceOver),
                }
            }
        }
    }

    /// Fill the shape described by a signed distance function
    pub fn fill_sdf<F>(&mut self, sdf: F, paint: &Paint, op: CompositeOp)
    where
        F: Fn(Vec2) -> f32,
    {
        self.shade(op, |p| {
            let c = sdf::coverage(sdf(p));
            (c > 0.0).then(|| (c, paint.color_at(p)))
        });
    }

    /// Soft halo around a shape, like a canvas shadow with zero offset
    pub fn glow_sdf<F>(&mut self, sdf: F, blur: f32, color: Color, op: CompositeOp)
    where
        F: Fn(Vec2) -> f32,
    {
        self.shade(op, |p| {
            let c = sdf::glow(sdf(p), blur);
            (c > 1.0 / 512.0).then_some((c, color))
        });
    }

    /// Blend a per-pixel `(coverage, color)` over the whole pixmap.
    ///
    /// Pixels for which `source` returns `None` are left untouched.
    fn shade<F>(&mut self, op: CompositeOp, source: F)
    where
        F: Fn(Vec2) -> Option<(f32, Color)>,
    {
        for py in 0..self.height {
            for px in 0..self.width {
                let center = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                if let Some((cov, color)) = source(center) {
                    let src = color.premultiplied().map(|c| c * cov);
                    self.blend_at(px, py, src, op);
                }
            }
        }
    }

    #[inline]
    fn blend_at(&mut self, x: u32, y: u32, src: [f32; 4], op: CompositeOp) {
        let idx = y as usize * self.width as usize + x as usize;
        let dst = self.pixels[idx].to_unit();
        self.pixels[idx] = Rgba8::from_unit(op.blend(src, dst));
    }
}

/// Intersect `[start, start + len)` with `[0, limit)`
fn clip_span(start: i32, len: u32, limit: u32) -> (u32, u32) {
    let lo = (start as i64).clamp(0, limit as i64);
    let hi = (start as i64 + len as i64).clamp(0, limit as i64);
    (lo as u32, hi.max(lo) as u32)
}
