//! The player-controlled flyer: kinematics, flap animation and growth.

use tracing::debug;

use crate::constants::game;
use crate::sim::{growth_factor, sprite::Sprite};

/// Sprite width per row of height, taken from the base art. Terminal cells
/// are taller than wide, so the art is wider than it is tall.
const ASPECT: f32 = 5.0 / 4.0;

#[derive(Debug, Clone)]
pub struct Flyer {
    x: f32,
    y: f32,
    velocity: f32,
    size: f32,
    gravity: f32,
    jump_impulse: f32,
    flap_timer: f32,
    base_size: f32,
    base_gravity: f32,
    base_glide: Sprite,
    base_flap: Sprite,
    glide: Sprite,
    flap: Sprite,
}

impl Flyer {
    /// Initial kinematic state for a fresh session: centered at (x, y),
    /// velocity zero, flap timer expired, sprites scaled to the base size.
    pub fn new(x: f32, y: f32, size: f32, gravity: f32, jump_impulse: f32) -> Self {
        let base_glide = Sprite::from_text(game::FLYER_GLIDE_TEXT);
        let base_flap = Sprite::from_text(game::FLYER_FLAP_TEXT);
        let (width, height) = Self::sprite_dims(size);
        let glide = base_glide.scaled(width, height);
        let flap = base_flap.scaled(width, height);

        Flyer {
            x,
            y,
            velocity: 0.0,
            size,
            gravity,
            jump_impulse,
            flap_timer: 0.0,
            base_size: size,
            base_gravity: gravity,
            base_glide,
            base_flap,
            glide,
            flap,
        }
    }

    fn sprite_dims(size: f32) -> (u16, u16) {
        let height = size.round().max(1.0) as u16;
        let width = (size * ASPECT).round().max(1.0) as u16;
        (width, height)
    }

    /// Sets the upward impulse and restarts the flap animation. Repeated
    /// calls always retrigger both; there is no cooldown.
    pub fn jump(&mut self) {
        self.velocity = self.jump_impulse;
        self.flap_timer = game::FLAP_DURATION;
    }

    /// Integrates one step: `velocity += gravity * dt; y += velocity * dt`.
    /// The flap timer counts down and clamps at zero.
    pub fn update(&mut self, dt: f32) {
        self.velocity += self.gravity * dt;
        self.y += self.velocity * dt;
        self.flap_timer = (self.flap_timer - dt).max(0.0);
    }

    /// Rescales size and gravity from their base values after a pair has been
    /// passed: `base * (1 + percent/100)^pipes_passed`. Sprites (and with
    /// them the collision masks) are regenerated only when the cell
    /// dimensions actually change.
    pub fn apply_growth(&mut self, pipes_passed: u32, growth_percent: f32) {
        let factor = growth_factor(pipes_passed, growth_percent);
        self.size = self.base_size * factor;
        self.gravity = self.base_gravity * factor;

        let (width, height) = Self::sprite_dims(self.size);
        if (width, height) != (self.glide.width(), self.glide.height()) {
            self.glide = self.base_glide.scaled(width, height);
            self.flap = self.base_flap.scaled(width, height);
            debug!(size = self.size, width, height, "flyer grew");
        }
    }

    /// True while the flap animation runs; selects the sprite variant.
    pub fn is_flapping(&self) -> bool {
        self.flap_timer > 0.0
    }

    pub fn sprite(&self) -> &Sprite {
        if self.is_flapping() {
            &self.flap
        } else {
            &self.glide
        }
    }

    /// Top-left cell of the current sprite, for rendering and mask tests.
    pub fn cell_origin(&self) -> (i32, i32) {
        let sprite = self.sprite();
        let col = (self.x - sprite.width() as f32 / 2.0).round() as i32;
        let row = (self.y - sprite.height() as f32 / 2.0).round() as i32;
        (col, row)
    }

    /// Bounding box leaves the playfield vertically: top above the ceiling or
    /// bottom below the floor.
    pub fn is_out_of_bounds(&self, viewport_height: f32) -> bool {
        let half = self.size / 2.0;
        self.y - half < 0.0 || self.y + half > viewport_height
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn flyer() -> Flyer {
        Flyer::new(20.0, 18.0, 4.0, 38.0, -16.0)
    }

    #[test]
    fn test_free_fall_scenario() {
        // gravity 1800 u/s², no input, 60 ticks at 1/60 s.
        let mut flyer = Flyer::new(50.0, 100.0, 30.0, 1800.0, -480.0);
        let mut last_y = flyer.y();
        for _ in 0..60 {
            flyer.update(DT);
            assert!(flyer.y() > last_y, "falling flyer must descend every tick");
            last_y = flyer.y();
        }
        assert!((flyer.velocity() - 1800.0).abs() < 1e-3);
    }

    #[test]
    fn test_update_is_deterministic() {
        let mut a = flyer();
        let mut b = flyer();
        for tick in 0..120 {
            if tick % 17 == 0 {
                a.jump();
                b.jump();
            }
            a.update(DT);
            b.update(DT);
        }
        assert_eq!(a.y(), b.y());
        assert_eq!(a.velocity(), b.velocity());
    }

    #[test]
    fn test_jump_retriggers_without_cooldown() {
        let mut flyer = flyer();
        flyer.jump();
        flyer.update(DT);
        flyer.jump();
        // Impulse and timer both reset, no double-jump limiting.
        assert_eq!(flyer.velocity(), -16.0);
        assert!((flyer.flap_timer - game::FLAP_DURATION).abs() < 1e-6);
    }

    #[test]
    fn test_flap_timer_expires() {
        let mut flyer = flyer();
        flyer.jump();
        assert!(flyer.is_flapping());
        for _ in 0..10 {
            flyer.update(DT);
        }
        assert!(!flyer.is_flapping());
    }

    #[test]
    fn test_growth_is_exponential_from_base() {
        let mut flyer = flyer();
        flyer.apply_growth(10, 2.0);
        assert!((flyer.size() - 4.0 * 1.02_f32.powi(10)).abs() < 1e-4);
        assert!((flyer.gravity() - 38.0 * 1.02_f32.powi(10)).abs() < 1e-3);
        // Re-applying the same pass count is idempotent: growth does not
        // compound per call, only per pair passed.
        let size = flyer.size();
        flyer.apply_growth(10, 2.0);
        assert_eq!(flyer.size(), size);
    }

    #[test]
    fn test_growth_monotonic() {
        let mut flyer = flyer();
        let mut last = (flyer.size(), flyer.gravity());
        for passed in 1..=25 {
            flyer.apply_growth(passed, 5.0);
            assert!(flyer.size() >= last.0);
            assert!(flyer.gravity() >= last.1);
            last = (flyer.size(), flyer.gravity());
        }
    }

    #[test]
    fn test_growth_rescales_sprite() {
        let mut flyer = flyer();
        let before = flyer.sprite().height();
        flyer.apply_growth(20, 10.0);
        assert!(flyer.sprite().height() > before);
    }

    #[test]
    fn test_out_of_bounds_floor() {
        let mut flyer = Flyer::new(50.0, 599.0, 30.0, 1800.0, -480.0);
        assert!(flyer.is_out_of_bounds(600.0));
        flyer.y = 300.0;
        assert!(!flyer.is_out_of_bounds(600.0));
    }

    #[test]
    fn test_out_of_bounds_ceiling() {
        let flyer = Flyer::new(50.0, 10.0, 30.0, 1800.0, -480.0);
        assert!(flyer.is_out_of_bounds(600.0));
    }

    #[test]
    fn test_sprite_variant_follows_flap() {
        let mut flyer = flyer();
        let glide_rows = flyer.sprite().rows().to_vec();
        flyer.jump();
        assert_ne!(flyer.sprite().rows(), glide_rows.as_slice());
    }
}
