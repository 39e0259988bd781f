//! Bubble sprites and their cache
//!
//! Rendering a bubble means several full-sprite gradient passes, far too much
//! to repeat for every bubble on every frame. Sprites are keyed by
//! [`Bubble`] (whole-pixel radius + highlight state), rendered on first use
//! and shared from then on.

use std::collections::HashMap;
use std::f32::consts::PI;
use std::rc::Rc;

use glam::Vec2;

use super::paint::{Color, CompositeOp, Gradient, Paint};
use super::pixmap::Pixmap;
use super::sdf::{sd_arc, sd_circle};
use crate::sim::Bubble;

/// Gleam arc `(start, end)` angles and dot angle, y-down sprite space
const GLEAM_HIGHLIGHTED: (f32, f32, f32) = (-PI / 8.0, 0.0, -PI * 7.0 / 32.0);
const GLEAM_RESTING: (f32, f32, f32) = (-PI * 5.0 / 32.0, -PI / 32.0, -PI / 4.0);

/// Gleam sits on a circle at this fraction of the radius
const GLEAM_RADIUS_FACTOR: f32 = 0.7;
/// Gleam stroke width (and glow) as a fraction of the radius
const GLEAM_WIDTH_FACTOR: f32 = 0.15;

/// Rendered sprites, one per `(radius, highlighted)` pair
#[derive(Debug, Default)]
pub struct SpriteCache {
    sprites: HashMap<Bubble, Rc<Pixmap>>,
}

impl SpriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached sprite for `bubble`, rendering it first if needed
    pub fn get_image(&mut self, bubble: Bubble) -> Rc<Pixmap> {
        let sprite = self.sprites.entry(bubble).or_insert_with(|| {
            log::trace!(
                "Rendering bubble sprite r={} highlighted={}",
                bubble.radius(),
                bubble.highlighted()
            );
            Rc::new(render_sprite(bubble))
        });
        Rc::clone(sprite)
    }

    /// Cached sprite without rendering
    pub fn get(&self, bubble: &Bubble) -> Option<Rc<Pixmap>> {
        self.sprites.get(bubble).cloned()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
    }
}

/// Paint one bubble into a fresh `2r x 2r` pixmap
pub fn render_sprite(bubble: Bubble) -> Pixmap {
    let diameter = bubble.diameter();
    let r = bubble.radius() as f32;
    let center = Vec2::splat(r);
    let mut pixmap = Pixmap::new(diameter, diameter);
    let circle = |p: Vec2| sd_circle(p, center, r);

    // Inner shading: translucent rim, opaque core
    let shading = Paint::Radial {
        center,
        r0: r,
        r1: 0.0,
        gradient: Gradient::new(&[
            (0.0, Color::white(0.75)),
            (0.25, Color::white(1.0)),
            (1.0, Color::white(1.0)),
        ]),
    };
    pixmap.fill_sdf(circle, &shading, CompositeOp::Xor);

    // Hue ring: xor against the shading leaves color only where it was translucent
    let inset = (r / 4.0).round();
    let hues = Paint::Linear {
        start: Vec2::splat(inset),
        end: Vec2::splat(diameter as f32 - inset),
        gradient: Gradient::new(&[
            (0.0, Color::hex(0xFF0000)),
            (0.2, Color::hex(0xFFFF00)),
            (0.4, Color::hex(0x00FF00)),
            (0.6, Color::hex(0x00FFFF)),
            (0.8, Color::hex(0x0000FF)),
            (1.0, Color::hex(0xFF00FF)),
        ]),
    };
    pixmap.fill_sdf(circle, &hues, CompositeOp::Xor);

    // Base glow behind everything
    let base = Paint::Radial {
        center,
        r0: r,
        r1: 0.0,
        gradient: Gradient::new(&[
            (0.0, Color::white(0.7)),
            (0.15, Color::white(0.3)),
            (0.25, Color::white(0.15)),
            (1.0, Color::white(0.0)),
        ]),
    };
    pixmap.fill_sdf(circle, &base, CompositeOp::DestinationOver);

    if bubble.shows_gleam() {
        paint_gleam(&mut pixmap, bubble, center, r);
    }

    pixmap
}

fn paint_gleam(pixmap: &mut Pixmap, bubble: Bubble, center: Vec2, r: f32) {
    let (start, end, dot_angle) = if bubble.highlighted() {
        GLEAM_HIGHLIGHTED
    } else {
        GLEAM_RESTING
    };
    let gleam_radius = GLEAM_RADIUS_FACTOR * r;
    let width = (GLEAM_WIDTH_FACTOR * r).round().max(1.0);

    stroke_with_glow(
        pixmap,
        |p| sd_arc(p - center, start, end, gleam_radius, width),
        width,
    );

    let dot_center = center + Vec2::new(dot_angle.cos(), dot_angle.sin()) * gleam_radius;
    stroke_with_glow(pixmap, |p| sd_circle(p, dot_center, width * 0.5), width);
}

/// White stroke with a white halo, both tucked behind existing content
fn stroke_with_glow<F>(pixmap: &mut Pixmap, sdf: F, blur: f32)
where
    F: Fn(Vec2) -> f32,
{
    pixmap.glow_sdf(&sdf, blur, Color::WHITE, CompositeOp::DestinationOver);
    pixmap.fill_sdf(
        &sdf,
        &Paint::Solid(Color::WHITE),
        CompositeOp::DestinationOver,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bubble(radius: u32, highlighted: bool) -> Bubble {
        Bubble::new(radius, highlighted).unwrap()
    }

    #[test]
    fn test_cache_returns_same_sprite() {
        let mut cache = SpriteCache::new();
        let first = cache.get_image(bubble(10, true));
        let second = cache.get_image(bubble(10, true));
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_highlight_is_part_of_the_key() {
        let mut cache = SpriteCache::new();
        let lit = cache.get_image(bubble(10, true));
        let resting = cache.get_image(bubble(10, false));
        assert!(!Rc::ptr_eq(&lit, &resting));
        assert_ne!(*lit, *resting);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_get_does_not_render() {
        let mut cache = SpriteCache::new();
        assert!(cache.get(&bubble(8, false)).is_none());
        assert!(cache.is_empty());
        cache.get_image(bubble(8, false));
        assert!(cache.get(&bubble(8, false)).is_some());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_sprite_size_and_transparent_corners() {
        let sprite = render_sprite(bubble(12, false));
        assert_eq!((sprite.width(), sprite.height()), (24, 24));
        assert_eq!(sprite.pixel(0, 0).unwrap().a, 0);
        assert_eq!(sprite.pixel(23, 23).unwrap().a, 0);
    }

    #[test]
    fn test_center_is_see_through() {
        // Shading xor ring cancels out in the core, and the base glow fades to zero
        let sprite = render_sprite(bubble(20, false));
        assert!(sprite.pixel(20, 20).unwrap().a < 16);
    }

    #[test]
    fn test_rim_carries_color() {
        let sprite = render_sprite(bubble(20, false));
        // Left rim, vertically centered: red-to-yellow end of the hue ring
        let px = sprite.pixel(1, 20).unwrap();
        assert!(px.a > 0);
        assert!(px.r > px.b);
    }

    #[test]
    fn test_small_bubbles_have_no_gleam() {
        // Without a gleam the highlight flag changes nothing
        assert_eq!(
            render_sprite(bubble(5, true)),
            render_sprite(bubble(5, false))
        );
        assert_ne!(
            render_sprite(bubble(6, true)),
            render_sprite(bubble(6, false))
        );
    }
}
