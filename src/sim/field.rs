//! The bubble field: population, frame update and run state
//!
//! The field owns every live bubble, the sprite cache and the frame it paints
//! into. It never schedules itself; a driver calls [`Field::update_frame`]
//! once per tick while [`Field::is_running`] says so.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::body::BubbleBody;
use crate::consts::{AREA_DIVISOR, BASE_SPEED_DIVISOR, GROWTH_FRAMES, REMOVALS_PER_SPEED_STEP};
use crate::error::{BubbleError, BubbleResult};
use crate::renderer::{Color, Pixmap, SpriteCache};
use crate::settings::FieldOptions;

/// Whether the driver should keep requesting frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Stopped,
    Running,
}

/// Size-dependent simulation parameters, recomputed on every resize
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimParams {
    /// Radius bubbles grow toward
    pub max_radius: f64,
    /// Radius added per frame while growing
    pub growth_step: f64,
    /// Upper bound of a new bubble's speed
    pub base_speed: f64,
    /// Frames between highlight flips
    pub highlight_cycle_period: u32,
}

impl SimParams {
    pub fn for_surface(width: u32, height: u32, options: &FieldOptions) -> Self {
        let mut params = Self {
            highlight_cycle_period: options.highlight_cycle_period,
            ..Self::default()
        };
        if options.target_count == 0 {
            return params;
        }
        let area = width as f64 * height as f64;
        params.max_radius =
            ((area / options.target_count as f64 / AREA_DIVISOR).sqrt() * options.density).floor();
        params.growth_step = params.max_radius / GROWTH_FRAMES;
        params.base_speed = params.max_radius / BASE_SPEED_DIVISOR;
        params
    }
}

#[derive(Debug)]
pub struct Field {
    options: FieldOptions,
    width: u32,
    height: u32,
    params: SimParams,
    bubbles: Vec<BubbleBody>,
    speed_multiplier: f64,
    removed_total: u64,
    state: RunState,
    sprites: SpriteCache,
    frame: Pixmap,
    rng: Pcg32,
}

impl Field {
    /// Size the field for a `width x height` surface and fill it to the target
    pub fn new(width: u32, height: u32, options: FieldOptions) -> BubbleResult<Self> {
        options.validate()?;
        let seed = options.seed.unwrap_or_else(rand::random);
        let params = SimParams::for_surface(width, height, &options);

        let mut field = Self {
            options,
            width,
            height,
            params,
            bubbles: Vec::new(),
            speed_multiplier: 1.0,
            removed_total: 0,
            state: RunState::Stopped,
            sprites: SpriteCache::new(),
            frame: Pixmap::new(width, height),
            rng: Pcg32::seed_from_u64(seed),
        };
        field.fill_to_target();

        log::info!(
            "Bubble field {}x{} created: {} bubbles, max radius {}, seed {}",
            width,
            height,
            field.bubbles.len(),
            field.params.max_radius,
            seed
        );
        Ok(field)
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn bubbles(&self) -> &[BubbleBody] {
        &self.bubbles
    }

    /// Mutable access for drivers that place bubbles themselves
    pub fn bubbles_mut(&mut self) -> &mut Vec<BubbleBody> {
        &mut self.bubbles
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    pub fn removed_total(&self) -> u64 {
        self.removed_total
    }

    /// Last painted frame, top-left origin
    pub fn frame(&self) -> &Pixmap {
        &self.frame
    }

    pub fn sprite_cache(&self) -> &SpriteCache {
        &self.sprites
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn start(&mut self) -> BubbleResult<()> {
        if self.state == RunState::Running {
            return Err(BubbleError::AlreadyRunning);
        }
        self.state = RunState::Running;
        log::info!("Bubble animation started");
        Ok(())
    }

    pub fn stop(&mut self) -> BubbleResult<()> {
        if self.state == RunState::Stopped {
            return Err(BubbleError::NotRunning);
        }
        self.state = RunState::Stopped;
        log::info!("Bubble animation stopped");
        Ok(())
    }

    /// Recompute sizing for a new surface size, carrying bubbles over
    /// proportionally
    pub fn resize(&mut self, width: u32, height: u32) {
        let (old_width, old_height) = (self.width, self.height);
        let old_base_speed = self.params.base_speed;

        self.width = width;
        self.height = height;
        self.params = SimParams::for_surface(width, height, &self.options);
        self.frame.resize(width, height);

        let scale = DVec2::new(
            if old_width > 0 {
                width as f64 / old_width as f64
            } else {
                1.0
            },
            if old_height > 0 {
                height as f64 / old_height as f64
            } else {
                1.0
            },
        );
        let speed_ratio = if old_base_speed > 0.0 && self.params.base_speed > 0.0 {
            Some(self.params.base_speed / old_base_speed)
        } else {
            None
        };

        for bubble in &mut self.bubbles {
            bubble.position *= scale;
            if let Some(ratio) = speed_ratio {
                bubble.velocity = bubble.velocity.scale(ratio);
            }
        }

        log::info!(
            "Bubble field resized {}x{} -> {}x{}: max radius {}, base speed {}",
            old_width,
            old_height,
            width,
            height,
            self.params.max_radius,
            self.params.base_speed
        );
    }

    /// Spawn bubbles until the target count is reached
    pub fn fill_to_target(&mut self) -> usize {
        let missing = self.options.target_count.saturating_sub(self.bubbles.len());
        for _ in 0..missing {
            let bubble = BubbleBody::spawn(
                &mut self.rng,
                self.width as f64,
                self.height as f64,
                self.params.base_speed,
            );
            self.bubbles.push(bubble);
        }
        if missing > 0 {
            log::debug!("Spawned {} bubbles", missing);
        }
        missing
    }

    /// Pop every bubble containing `point` (field space), then refill.
    ///
    /// Returns how many bubbles were removed.
    pub fn remove_at(&mut self, point: DVec2) -> usize {
        let before = self.bubbles.len();
        self.bubbles.retain(|bubble| !bubble.contains(point));
        let removed = before - self.bubbles.len();

        self.removed_total += removed as u64;
        if self.removed_total > 0 {
            let multiplier = self.removed_total.div_ceil(REMOVALS_PER_SPEED_STEP) as f64;
            if multiplier != self.speed_multiplier {
                log::debug!("Speed multiplier {} -> {}", self.speed_multiplier, multiplier);
            }
            self.speed_multiplier = multiplier;
        }
        if removed > 0 {
            log::debug!(
                "Removed {} bubbles at ({:.1}, {:.1}), {} in total",
                removed,
                point.x,
                point.y,
                self.removed_total
            );
        }

        self.fill_to_target();
        removed
    }

    /// Surface pick point (CSS pixels, top-left origin) into field space
    pub fn to_field_space(&self, x: f64, y: f64, pixel_ratio: f64) -> DVec2 {
        DVec2::new(x * pixel_ratio, self.height as f64 - y * pixel_ratio)
    }

    /// Handle a click at CSS pixel `(x, y)`
    pub fn click(&mut self, x: f64, y: f64, pixel_ratio: f64) -> usize {
        let point = self.to_field_space(x, y, pixel_ratio);
        self.remove_at(point)
    }

    /// Paint the current state, then advance the simulation by one frame.
    ///
    /// Pairs are resolved in index order `(i, j), i < j`, each exactly once.
    /// Later pairs see the result of earlier ones within the same frame.
    pub fn update_frame(&mut self) {
        self.paint();

        let (width, height) = (self.width as f64, self.height as f64);
        for i in 0..self.bubbles.len() {
            let (head, tail) = self.bubbles.split_at_mut(i + 1);
            let bubble = &mut head[i];
            bubble.grow(&self.params);
            bubble.advance(self.speed_multiplier);
            for other in tail.iter_mut() {
                bubble.collide(other);
            }
            bubble.reflect_off_walls(width, height);
        }
    }

    fn paint(&mut self) {
        self.frame.clear();
        let height = self.height as f64;
        for bubble in &self.bubbles {
            let sprite = bubble.sprite();
            let r = sprite.radius() as f64;
            // Field space is y-up, the frame is y-down
            let x = (bubble.position.x - r).round() as i32;
            let y = (height - bubble.position.y - r).round() as i32;
            if sprite.is_dot() {
                self.frame.fill_rect(x, y, 2, 2, Color::WHITE);
            } else {
                let image = self.sprites.get_image(sprite);
                self.frame.draw_pixmap(&image, x, y);
            }
        }
    }
}
