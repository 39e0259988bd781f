//! Soap Bubbles - bubbles drifting, growing and colliding on a 2D canvas
//!
//! Core modules:
//! - `sim`: Vectors, bubble bodies, collisions and the field that owns them
//! - `renderer`: CPU sprite rasterizer and the per-appearance sprite cache
//! - `platform`: Surface abstraction for headless and browser hosts
//! - `settings`: Field options, loadable from JSON

pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{BubbleError, BubbleResult};
pub use settings::FieldOptions;
pub use sim::Field;

/// Simulation constants
pub mod consts {
    /// Radius of a freshly spawned bubble
    pub const SPAWN_RADIUS: f64 = 1.0;
    /// Sprites at or below this radius carry no gleam
    pub const GLEAM_MIN_RADIUS: u32 = 5;
    /// Frames between highlight flips
    pub const DEFAULT_HIGHLIGHT_CYCLE_PERIOD: u32 = 10;
    /// Share of the per-bubble area a full-grown bubble covers
    pub const DEFAULT_DENSITY: f64 = 0.64;

    /// max radius = floor(sqrt(area / count / AREA_DIVISOR) * density)
    pub const AREA_DIVISOR: f64 = 5.0;
    /// Frames a bubble takes to grow to the max radius
    pub const GROWTH_FRAMES: f64 = 500.0;
    /// base speed = max radius / BASE_SPEED_DIVISOR
    pub const BASE_SPEED_DIVISOR: f64 = 50.0;
    /// The speed multiplier steps up once per this many pops
    pub const REMOVALS_PER_SPEED_STEP: u64 = 5;
}
