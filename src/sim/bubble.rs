//! Bubble appearance key
//!
//! A `Bubble` is what a bubble looks like at one instant: its whole-pixel
//! radius and which gleam it shows. It doubles as the sprite cache key.

use crate::consts::GLEAM_MIN_RADIUS;
use crate::error::{BubbleError, BubbleResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bubble {
    radius: u32,
    highlighted: bool,
}

impl Bubble {
    pub fn new(radius: u32, highlighted: bool) -> BubbleResult<Self> {
        if radius < 1 {
            return Err(BubbleError::InvalidRadius { radius });
        }
        Ok(Self {
            radius,
            highlighted,
        })
    }

    /// Key for a body of fractional `radius`: whole pixels, never below 1
    pub(crate) fn for_body(radius: f64, highlighted: bool) -> Self {
        Self {
            radius: (radius.floor() as u32).max(1),
            highlighted,
        }
    }

    #[inline]
    pub fn radius(&self) -> u32 {
        self.radius
    }

    #[inline]
    pub fn highlighted(&self) -> bool {
        self.highlighted
    }

    /// Whether the sprite carries a gleam arc
    #[inline]
    pub fn shows_gleam(&self) -> bool {
        self.radius > GLEAM_MIN_RADIUS
    }

    /// Just-spawned bubbles are painted as a plain 2x2 dot
    #[inline]
    pub fn is_dot(&self) -> bool {
        self.radius == 1
    }

    /// Sprite edge length in pixels
    #[inline]
    pub fn diameter(&self) -> u32 {
        self.radius * 2
    }
}
