//! Platform abstraction layer
//!
//! The field only knows how to paint into a [`Pixmap`]. Getting pixels on
//! screen, the device pixel ratio and the surface size belong to an adapter
//! implementing [`Surface`]:
//! - `HeadlessSurface`: in-memory, for native runs and tests
//! - the browser canvas adapter lives in the wasm32 entry point

use crate::renderer::Pixmap;
use crate::sim::Field;

/// What the field needs from the surface it is shown on
pub trait Surface {
    /// Drawable size in device pixels
    fn size(&self) -> (u32, u32);

    /// Device pixels per CSS pixel
    fn pixel_ratio(&self) -> f64;

    /// Show a finished frame
    fn present(&mut self, frame: &Pixmap);
}

/// Device pixel size for a CSS size at the given pixel ratio
pub fn device_size(css_width: f64, css_height: f64, pixel_ratio: f64) -> (u32, u32) {
    let scale = |v: f64| (v * pixel_ratio).max(0.0).round() as u32;
    (scale(css_width), scale(css_height))
}

/// One driver tick: follow surface resizes, then advance and present the
/// field if it is running. Returns whether a frame was presented.
pub fn tick<S: Surface + ?Sized>(field: &mut Field, surface: &mut S) -> bool {
    let (width, height) = surface.size();
    if (width, height) != (field.width(), field.height()) {
        field.resize(width, height);
    }
    if !field.is_running() {
        return false;
    }
    field.update_frame();
    surface.present(field.frame());
    true
}

/// Forward a click at CSS pixel `(x, y)` on `surface` to the field
pub fn pick<S: Surface + ?Sized>(field: &mut Field, surface: &S, x: f64, y: f64) -> usize {
    field.click(x, y, surface.pixel_ratio())
}

/// Surface that keeps the last presented frame in memory
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    width: u32,
    height: u32,
    pixel_ratio: f64,
    frame: Vec<u8>,
    presented: u64,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
            frame: Vec::new(),
            presented: 0,
        }
    }

    /// Change the surface size, as a window resize would
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Straight-alpha RGBA bytes of the last frame
    pub fn last_frame(&self) -> &[u8] {
        &self.frame
    }

    /// Number of frames presented so far
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Surface for HeadlessSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn present(&mut self, frame: &Pixmap) {
        self.frame = frame.to_straight_rgba();
        self.presented += 1;
    }
}
