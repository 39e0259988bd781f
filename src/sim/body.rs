//! Bubble bodies and per-frame physics
//!
//! Positions live in field space: origin bottom-left, y up. Conversion to the
//! surface's top-left pixel space only happens when painting.

use std::f64::consts::PI;

use glam::DVec2;
use rand::Rng;

use super::bubble::Bubble;
use super::field::SimParams;
use super::vector::{DirectedVector, Vector};
use crate::consts::{GLEAM_MIN_RADIUS, SPAWN_RADIUS};

/// One live bubble
#[derive(Debug, Clone)]
pub struct BubbleBody {
    /// Current radius; grows toward the field's max radius
    pub radius: f64,
    /// Which gleam preset the sprite shows
    pub highlighted: bool,
    /// Center in field space
    pub position: DVec2,
    /// Displacement per frame at speed multiplier 1
    pub velocity: Vector,
    highlight_counter: u32,
}

impl BubbleBody {
    /// A freshly spawned bubble of radius 1
    pub fn new(position: DVec2, velocity: Vector, highlighted: bool) -> Self {
        Self {
            radius: SPAWN_RADIUS,
            highlighted,
            position,
            velocity,
            highlight_counter: 0,
        }
    }

    /// Random bubble somewhere on a `width x height` surface.
    ///
    /// Direction is drawn from `[0, π)` only, so new bubbles always start out
    /// heading upward (or sideways).
    pub fn spawn<R: Rng>(rng: &mut R, width: f64, height: f64, base_speed: f64) -> Self {
        let position = DVec2::new(width * rng.random::<f64>(), height * rng.random::<f64>());
        let speed = rng.random::<f64>() * base_speed;
        let direction = rng.random::<f64>() * PI;
        let velocity = DirectedVector::new(speed, direction).to_vector();
        Self::new(position, velocity, rng.random_bool(0.5))
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn highlight_counter(&self) -> u32 {
        self.highlight_counter
    }

    /// Sprite key for the current appearance
    pub fn sprite(&self) -> Bubble {
        Bubble::for_body(self.radius, self.highlighted)
    }

    /// Whether `point` lies strictly inside the bubble
    pub fn contains(&self, point: DVec2) -> bool {
        self.position.distance_squared(point) < self.radius * self.radius
    }

    /// Grow toward the max radius and cycle the highlight
    pub fn grow(&mut self, params: &SimParams) {
        let limit = params.max_radius.max(SPAWN_RADIUS);
        if self.radius < limit {
            self.radius = (self.radius + params.growth_step).min(limit);
        } else if self.radius > limit {
            self.radius = limit;
        }

        if self.radius > GLEAM_MIN_RADIUS as f64 {
            if self.highlight_counter > params.highlight_cycle_period {
                self.highlight_counter = 0;
                self.highlighted = !self.highlighted;
            } else {
                self.highlight_counter += 1;
            }
        }
    }

    pub fn advance(&mut self, speed_multiplier: f64) {
        self.position += &self.velocity * speed_multiplier;
    }

    /// Clamp inside `[r, size - r]` on both axes, mirroring the velocity
    /// about each wall that was crossed
    pub fn reflect_off_walls(&mut self, width: f64, height: f64) {
        let r = self.radius;

        if self.position.x < r {
            self.position.x = r;
            self.velocity = self.velocity.flip_x();
        } else if self.position.x > width - r {
            self.position.x = width - r;
            self.velocity = self.velocity.flip_x();
        }

        if self.position.y < r {
            self.position.y = r;
            self.velocity = self.velocity.flip_y();
        } else if self.position.y > height - r {
            self.position.y = height - r;
            self.velocity = self.velocity.flip_y();
        }
    }

    /// Resolve a collision with `other`, if the two touch.
    ///
    /// Along the line of centers each bubble hands back half of its own
    /// momentum and takes half of the other's; the tangential part is kept.
    /// Afterwards the pair is pushed apart until the edges just touch, the
    /// smaller bubble moving further. Returns whether they collided.
    pub fn collide(&mut self, other: &mut BubbleBody) -> bool {
        let offset = Vector::from(self.position - other.position);
        let distance = offset.magnitude();
        let sum_radius = self.radius + other.radius;
        if distance > sum_radius {
            return false;
        }

        let line = match offset.directed() {
            Ok(directed) => directed.direction(),
            Err(err) => {
                log::trace!("Coincident bubble centers, separating along +x: {}", err);
                0.0
            }
        };

        // Zero velocities have no direction of their own; any axis gives zero parts
        let this_moment = self.velocity.directed_or(line).resolve_along(line + PI);
        let other_moment = other.velocity.directed_or(line).resolve_along(line);
        let this_normal = this_moment.parallel();
        let other_normal = other_moment.parallel();

        self.velocity = this_moment.perpendicular().to_vector()
            + this_normal.scaled(-0.5).to_vector()
            + other_normal.scaled(0.5).to_vector();
        other.velocity = other_moment.perpendicular().to_vector()
            + this_normal.scaled(0.5).to_vector()
            + other_normal.scaled(-0.5).to_vector();

        let overlap = sum_radius - distance;
        let normal = DVec2::new(line.cos(), line.sin());
        self.position += normal * (overlap * other.radius / sum_radius);
        other.position -= normal * (overlap * self.radius / sum_radius);

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const EPS: f64 = 1e-9;

    fn params(max_radius: f64) -> SimParams {
        SimParams {
            max_radius,
            growth_step: max_radius / 500.0,
            base_speed: max_radius / 50.0,
            highlight_cycle_period: 10,
        }
    }

    fn body(x: f64, y: f64, vx: f64, vy: f64, radius: f64) -> BubbleBody {
        BubbleBody::new(DVec2::new(x, y), Vector::new(vx, vy), false).with_radius(radius)
    }

    fn kinetic_energy(bodies: &[&BubbleBody]) -> f64 {
        bodies
            .iter()
            .map(|b| b.radius * b.radius * b.velocity.as_dvec2().length_squared())
            .sum()
    }

    fn momentum(bodies: &[&BubbleBody]) -> DVec2 {
        bodies
            .iter()
            .map(|b| b.velocity.as_dvec2() * b.radius * b.radius)
            .sum()
    }

    #[test]
    fn test_growth_clamps_to_max() {
        let mut bubble = body(0.0, 0.0, 0.0, 0.0, 9.99);
        bubble.grow(&params(10.0));
        assert_eq!(bubble.radius, 10.0);
        bubble.grow(&params(10.0));
        assert_eq!(bubble.radius, 10.0);
    }

    #[test]
    fn test_growth_step() {
        let mut bubble = body(0.0, 0.0, 0.0, 0.0, 1.0);
        bubble.grow(&params(50.0));
        assert!((bubble.radius - 1.1).abs() < EPS);
    }

    #[test]
    fn test_shrunk_max_clamps_down() {
        let mut bubble = body(0.0, 0.0, 0.0, 0.0, 30.0);
        bubble.grow(&params(20.0));
        assert_eq!(bubble.radius, 20.0);
    }

    #[test]
    fn test_highlight_cycles_after_period() {
        let mut bubble = body(0.0, 0.0, 0.0, 0.0, 6.0);
        let p = params(6.0);
        // Counter runs 0..=period, the flip happens on the following frame
        for _ in 0..=p.highlight_cycle_period {
            bubble.grow(&p);
            assert!(!bubble.highlighted);
        }
        bubble.grow(&p);
        assert!(bubble.highlighted);
        assert_eq!(bubble.highlight_counter(), 0);
    }

    #[test]
    fn test_small_bubbles_never_cycle() {
        let mut bubble = body(0.0, 0.0, 0.0, 0.0, 5.0);
        for _ in 0..50 {
            bubble.grow(&params(5.0));
        }
        assert!(!bubble.highlighted);
        assert_eq!(bubble.highlight_counter(), 0);
    }

    #[test]
    fn test_advance_uses_speed_multiplier() {
        let mut bubble = body(10.0, 10.0, 1.0, -2.0, 3.0);
        bubble.advance(3.0);
        assert_eq!(bubble.position, DVec2::new(13.0, 4.0));
    }

    #[test]
    fn test_left_wall_reflection() {
        let mut bubble = body(2.0, 50.0, -3.0, 1.5, 5.0);
        bubble.reflect_off_walls(100.0, 100.0);
        assert_eq!(bubble.position, DVec2::new(5.0, 50.0));
        assert_eq!(bubble.velocity, Vector::new(3.0, 1.5));
    }

    #[test]
    fn test_corner_reflection_flips_both_axes() {
        let mut bubble = body(99.0, 99.0, 2.0, 2.0, 5.0);
        bubble.reflect_off_walls(100.0, 100.0);
        assert_eq!(bubble.position, DVec2::new(95.0, 95.0));
        assert_eq!(bubble.velocity, Vector::new(-2.0, -2.0));
    }

    #[test]
    fn test_inside_walls_untouched() {
        let mut bubble = body(50.0, 50.0, 2.0, 2.0, 5.0);
        bubble.reflect_off_walls(100.0, 100.0);
        assert_eq!(bubble.position, DVec2::new(50.0, 50.0));
        assert_eq!(bubble.velocity, Vector::new(2.0, 2.0));
    }

    #[test]
    fn test_apart_bubbles_do_not_collide() {
        let mut a = body(0.0, 0.0, 1.0, 0.0, 5.0);
        let mut b = body(20.0, 0.0, -1.0, 0.0, 5.0);
        assert!(!a.collide(&mut b));
        assert_eq!(a.velocity, Vector::new(1.0, 0.0));
        assert_eq!(b.position, DVec2::new(20.0, 0.0));
    }

    #[test]
    fn test_head_on_collision_conserves_energy_and_momentum() {
        let mut a = body(0.0, 0.0, 1.0, 0.0, 10.0);
        let mut b = body(15.0, 0.0, -1.0, 0.0, 10.0);
        let energy = kinetic_energy(&[&a, &b]);
        let moment = momentum(&[&a, &b]);

        assert!(a.collide(&mut b));

        assert!((kinetic_energy(&[&a, &b]) - energy).abs() < 1e-6);
        assert!((momentum(&[&a, &b]) - moment).length() < 1e-6);
        assert!((a.velocity.as_dvec2() - DVec2::new(-1.0, 0.0)).length() < EPS);
        assert!((b.velocity.as_dvec2() - DVec2::new(1.0, 0.0)).length() < EPS);
        assert!(a.position.distance(b.position) >= 20.0 - 1e-6);
    }

    #[test]
    fn test_oblique_symmetric_collision_conserves() {
        // Mirror-image approach along a diagonal line of centers
        let mut a = body(0.0, 0.0, 1.0, 2.0, 8.0);
        let mut b = body(10.0, 10.0, -1.0, -2.0, 8.0);
        let energy = kinetic_energy(&[&a, &b]);

        assert!(a.collide(&mut b));

        assert!((kinetic_energy(&[&a, &b]) - energy).abs() < 1e-6);
        assert!(momentum(&[&a, &b]).length() < 1e-6);
        assert!(a.position.distance(b.position) >= 16.0 - 1e-6);
    }

    #[test]
    fn test_overlap_separates_to_touching() {
        let mut a = body(0.0, 0.0, 0.0, 0.0, 4.0);
        let mut b = body(3.0, 4.0, 0.0, 0.0, 6.0);
        assert!(a.collide(&mut b));
        assert!((a.position.distance(b.position) - 10.0).abs() < EPS);
    }

    #[test]
    fn test_smaller_bubble_moves_further() {
        let mut small = body(0.0, 0.0, 0.0, 0.0, 2.0);
        let mut large = body(4.0, 0.0, 0.0, 0.0, 8.0);
        small.collide(&mut large);
        // Overlap 6: small moves 6 * 8/10, large 6 * 2/10
        assert!((small.position.x - -4.8).abs() < EPS);
        assert!((large.position.x - 5.2).abs() < EPS);
    }

    #[test]
    fn test_coincident_centers_separate_along_x() {
        let mut a = body(10.0, 10.0, 0.0, 0.0, 3.0);
        let mut b = body(10.0, 10.0, 0.0, 0.0, 3.0);
        assert!(a.collide(&mut b));
        assert!((a.position - DVec2::new(13.0, 10.0)).length() < EPS);
        assert!((b.position - DVec2::new(7.0, 10.0)).length() < EPS);
        assert!(a.velocity.x().is_finite() && b.velocity.y().is_finite());
    }

    #[test]
    fn test_contains_is_strict() {
        let bubble = body(0.0, 0.0, 0.0, 0.0, 5.0);
        assert!(bubble.contains(DVec2::new(3.0, 3.9)));
        assert!(!bubble.contains(DVec2::new(3.0, 4.0)));
    }

    #[test]
    fn test_spawn_ranges() {
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..200 {
            let bubble = BubbleBody::spawn(&mut rng, 300.0, 150.0, 2.0);
            assert_eq!(bubble.radius, 1.0);
            assert!((0.0..300.0).contains(&bubble.position.x));
            assert!((0.0..150.0).contains(&bubble.position.y));
            assert!(bubble.velocity.magnitude() <= 2.0 + EPS);
            // Half-circle spawn direction: never heading downward
            assert!(bubble.velocity.y() >= 0.0);
        }
    }

    #[test]
    fn test_sprite_key() {
        let bubble = body(0.0, 0.0, 0.0, 0.0, 7.6);
        assert_eq!(bubble.sprite(), Bubble::new(7, false).unwrap());
    }
}
