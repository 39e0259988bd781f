//! Bubble simulation module
//!
//! Pure state and physics, no platform dependencies:
//! - Field space is y-up with the origin at the bottom-left
//! - Seeded RNG only
//! - Stable iteration order (by index)

pub mod body;
pub mod bubble;
pub mod field;
pub mod vector;

pub use body::BubbleBody;
pub use bubble::Bubble;
pub use field::{Field, RunState, SimParams};
pub use vector::{DirectedVector, DirectionalResolution, Vector};
