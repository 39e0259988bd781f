//! Signed distance functions for sprite rasterization
//!
//! Shapes are rasterized by evaluating their distance at each pixel center,
//! so edges get one pixel of antialiasing for free.

use glam::Vec2;
use std::f32::consts::TAU;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Signed distance to a round-capped stroke along an arc centered at the origin.
///
/// The arc runs counter-clockwise (in the coordinate system of `p`) from
/// `theta_start` to `theta_end`.
pub fn sd_arc(p: Vec2, theta_start: f32, theta_end: f32, radius: f32, thickness: f32) -> f32 {
    let r = p.length();
    let angle = p.y.atan2(p.x);

    let mut angle_diff = angle - theta_start;
    angle_diff -= (angle_diff / TAU).round() * TAU;
    if angle_diff < 0.0 {
        angle_diff += TAU;
    }

    let mut span = theta_end - theta_start;
    span -= (span / TAU).round() * TAU;
    if span <= 0.0 {
        span += TAU;
    }

    let half_thick = thickness * 0.5;

    if angle_diff <= span {
        (r - radius).abs() - half_thick
    } else {
        // Round caps at both ends
        let p1 = Vec2::new(theta_start.cos(), theta_start.sin()) * radius;
        let p2 = Vec2::new(theta_end.cos(), theta_end.sin()) * radius;
        let d1 = (p - p1).length() - half_thick;
        let d2 = (p - p2).length() - half_thick;
        d1.min(d2)
    }
}

/// Antialiased coverage for a signed distance
#[inline]
pub fn coverage(distance: f32) -> f32 {
    (0.5 - distance).clamp(0.0, 1.0)
}

/// Soft falloff outside a shape, used for glows
#[inline]
pub fn glow(distance: f32, blur: f32) -> f32 {
    if distance <= 0.0 {
        return 1.0;
    }
    if blur <= 0.0 {
        return 0.0;
    }
    let sigma = blur * 0.5;
    (-(distance * distance) / (2.0 * sigma * sigma)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_circle_sign() {
        let c = Vec2::new(5.0, 5.0);
        assert!(sd_circle(Vec2::new(5.0, 5.0), c, 3.0) < 0.0);
        assert!((sd_circle(Vec2::new(8.0, 5.0), c, 3.0)).abs() < 1e-6);
        assert!(sd_circle(Vec2::new(10.0, 5.0), c, 3.0) > 0.0);
    }

    #[test]
    fn test_arc_inside_band_and_caps() {
        // Short arc from -π/8 to 0 at radius 10, thickness 2
        let on_arc = Vec2::new((-PI / 16.0).cos(), (-PI / 16.0).sin()) * 10.0;
        assert!(sd_arc(on_arc, -PI / 8.0, 0.0, 10.0, 2.0) < 0.0);

        // Opposite side of the circle is far away
        let far = Vec2::new(-10.0, 0.0);
        assert!(sd_arc(far, -PI / 8.0, 0.0, 10.0, 2.0) > 5.0);

        // Just past the end of the arc, the round cap still covers
        let past_cap = Vec2::new(10.0, 0.5);
        assert!(sd_arc(past_cap, -PI / 8.0, 0.0, 10.0, 2.0) < 0.0);
    }

    #[test]
    fn test_coverage_and_glow() {
        assert_eq!(coverage(-3.0), 1.0);
        assert_eq!(coverage(3.0), 0.0);
        assert_eq!(coverage(0.0), 0.5);
        assert_eq!(glow(-1.0, 2.0), 1.0);
        assert!(glow(1.0, 2.0) < 1.0);
        assert!(glow(1.0, 2.0) > glow(2.0, 2.0));
        assert_eq!(glow(1.0, 0.0), 0.0);
    }
}
