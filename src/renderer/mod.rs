//! CPU rendering module
//!
//! Bubble sprites are rasterized from signed distance fields into premultiplied
//! RGBA pixmaps and cached per appearance.

pub mod paint;
pub mod pixmap;
pub mod sdf;
pub mod sprite;

pub use paint::{Color, CompositeOp, Gradient, Paint};
pub use pixmap::{Pixmap, Rgba8};
pub use sprite::{SpriteCache, render_sprite};
