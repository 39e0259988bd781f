//! Vector algebra for bubble velocities
//!
//! Two representations of the same 2D vector: Cartesian (`Vector`) and
//! magnitude + direction (`DirectedVector`). Each lazily derives and caches the
//! other. Collisions are resolved by splitting a directed velocity into the
//! part along the line of centers and the part across it.

use std::cell::OnceCell;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::ops::{Add, Mul};

use glam::DVec2;

use crate::error::{BubbleError, BubbleResult};

/// Immutable Cartesian vector with a memoized directed form
#[derive(Debug, Clone, Default)]
pub struct Vector {
    xy: DVec2,
    directed: OnceCell<DirectedVector>,
}

impl Vector {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            xy: DVec2::new(x, y),
            directed: OnceCell::new(),
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.xy.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.xy.y
    }

    #[inline]
    pub fn as_dvec2(&self) -> DVec2 {
        self.xy
    }

    pub fn magnitude(&self) -> f64 {
        self.xy.length()
    }

    /// Magnitude + direction form, direction in `[0, 2π)`.
    ///
    /// The zero vector has no direction and yields `DivisionByZeroGuard`.
    pub fn directed(&self) -> BubbleResult<&DirectedVector> {
        if let Some(directed) = self.directed.get() {
            return Ok(directed);
        }
        let magnitude = self.magnitude();
        if magnitude == 0.0 || !magnitude.is_finite() {
            return Err(BubbleError::DivisionByZeroGuard {
                context: "Vector::directed",
            });
        }
        Ok(self.directed.get_or_init(|| {
            // acos only covers [0, π]; mirror the lower half-plane
            let mut direction = (self.xy.x / magnitude).clamp(-1.0, 1.0).acos();
            if self.xy.y < 0.0 && direction > 0.0 {
                direction = TAU - direction;
            }
            DirectedVector::new(magnitude, direction)
        }))
    }

    /// Like [`Vector::directed`], but the zero vector gets `fallback_direction`.
    pub fn directed_or(&self, fallback_direction: f64) -> DirectedVector {
        match self.directed() {
            Ok(directed) => directed.clone(),
            Err(_) => DirectedVector::new(0.0, fallback_direction),
        }
    }

    /// Mirror across the vertical axis (left/right walls)
    pub fn flip_x(&self) -> Self {
        Self::new(-self.xy.x, self.xy.y)
    }

    /// Mirror across the horizontal axis (top/bottom walls)
    pub fn flip_y(&self) -> Self {
        Self::new(self.xy.x, -self.xy.y)
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self::from(self.xy * factor)
    }
}

impl From<DVec2> for Vector {
    fn from(xy: DVec2) -> Self {
        Self {
            xy,
            directed: OnceCell::new(),
        }
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.xy == other.xy
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::from(self.xy + rhs.xy)
    }
}

impl Mul<f64> for &Vector {
    type Output = DVec2;

    fn mul(self, rhs: f64) -> DVec2 {
        self.xy * rhs
    }
}

/// Vector stored as magnitude and direction (radians)
///
/// Components produced by [`DirectionalResolution`] may carry a negative
/// magnitude, meaning they point against `direction`.
#[derive(Debug, Clone)]
pub struct DirectedVector {
    magnitude: f64,
    direction: f64,
    cartesian: OnceCell<DVec2>,
}

impl DirectedVector {
    pub fn new(magnitude: f64, direction: f64) -> Self {
        Self {
            magnitude,
            direction,
            cartesian: OnceCell::new(),
        }
    }

    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    #[inline]
    pub fn direction(&self) -> f64 {
        self.direction
    }

    pub fn to_dvec2(&self) -> DVec2 {
        *self.cartesian.get_or_init(|| {
            DVec2::new(
                self.magnitude * self.direction.cos(),
                self.magnitude * self.direction.sin(),
            )
        })
    }

    pub fn to_vector(&self) -> Vector {
        Vector::from(self.to_dvec2())
    }

    /// Same direction, magnitude multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.magnitude * factor, self.direction)
    }

    /// Split into components parallel and perpendicular to `direction`.
    pub fn resolve_along(&self, direction: f64) -> DirectionalResolution {
        DirectionalResolution::new(self.clone(), direction)
    }
}

impl PartialEq for DirectedVector {
    fn eq(&self, other: &Self) -> bool {
        self.magnitude == other.magnitude && self.direction == other.direction
    }
}

/// A directed vector decomposed against a reference direction
#[derive(Debug, Clone)]
pub struct DirectionalResolution {
    vector: DirectedVector,
    direction: f64,
    parallel: OnceCell<DirectedVector>,
    perpendicular: OnceCell<DirectedVector>,
}

impl DirectionalResolution {
    pub fn new(vector: DirectedVector, direction: f64) -> Self {
        Self {
            vector,
            direction,
            parallel: OnceCell::new(),
            perpendicular: OnceCell::new(),
        }
    }

    #[inline]
    pub fn direction(&self) -> f64 {
        self.direction
    }

    #[inline]
    fn delta_angle(&self) -> f64 {
        self.direction - self.vector.direction
    }

    /// Component along the reference direction
    pub fn parallel(&self) -> &DirectedVector {
        self.parallel.get_or_init(|| {
            DirectedVector::new(
                self.vector.magnitude * self.delta_angle().cos(),
                self.direction,
            )
        })
    }

    /// Component at a right angle to the reference direction
    pub fn perpendicular(&self) -> &DirectedVector {
        self.perpendicular.get_or_init(|| {
            DirectedVector::new(
                self.vector.magnitude * self.delta_angle().sin(),
                self.direction - FRAC_PI_2,
            )
        })
    }
}
