//! Half-pipe obstacles and the stream that spawns, moves and retires them.

use std::collections::VecDeque;

use rand::Rng;
use tracing::trace;

use crate::constants::game;
use crate::sim::sprite::Sprite;

/// Which half of a gap pair an obstacle is. The top half doubles as the
/// scoring token: a pair counts exactly once, through its `Top` member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Top,
    Bottom,
}

#[derive(Debug, Clone)]
pub struct Obstacle {
    x: f32,
    row: u16,
    orientation: Orientation,
    passed: bool,
    sprite: Sprite,
}

impl Obstacle {
    /// Builds one pipe half. The sprite (cap + inset body) and its collision
    /// mask are composed here, once, and never rebuilt afterwards; motion
    /// only changes the x offset.
    fn new(orientation: Orientation, x: f32, row: u16, height: u16) -> Self {
        let sprite = Sprite::from_text(&pipe_text(orientation, height.max(1)));
        Obstacle { x, row, orientation, passed: false, sprite }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    /// Top row of the sprite in canvas coordinates.
    pub fn row(&self) -> u16 {
        self.row
    }

    pub fn right_edge(&self) -> f32 {
        self.x + self.sprite.width() as f32
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_passed(&self) -> bool {
        self.passed
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    pub fn cell_origin(&self) -> (i32, i32) {
        (self.x.round() as i32, self.row as i32)
    }
}

/// Pipe art: a full-width cap on the gap-facing end, body rows inset by one
/// cell on each side. The inset is what makes the silhouette non-rectangular,
/// so the mask test differs from a plain bounding-box check.
fn pipe_text(orientation: Orientation, height: u16) -> String {
    let width = game::PIPE_WIDTH as usize;
    let cap_rows = (game::PIPE_CAP_HEIGHT).min(height);
    let body_rows = height - cap_rows;

    let cap = "█".repeat(width);
    let body = format!(" {} ", "█".repeat(width.saturating_sub(2)));

    let mut rows = Vec::with_capacity(height as usize);
    match orientation {
        Orientation::Top => {
            rows.extend(std::iter::repeat(body.clone()).take(body_rows as usize));
            rows.extend(std::iter::repeat(cap).take(cap_rows as usize));
        },
        Orientation::Bottom => {
            rows.extend(std::iter::repeat(cap).take(cap_rows as usize));
            rows.extend(std::iter::repeat(body.clone()).take(body_rows as usize));
        },
    }
    rows.join("\n")
}

/// The ordered set of live obstacles plus the distance accumulator that
/// drives spawning. Uniform speed keeps insertion order equal to
/// left-to-right order.
#[derive(Debug, Clone)]
pub struct ObstacleStream {
    obstacles: VecDeque<Obstacle>,
    distance: f32,
    spawn_spacing: f32,
}

impl ObstacleStream {
    pub fn new(spawn_spacing: f32) -> Self {
        ObstacleStream { obstacles: VecDeque::new(), distance: 0.0, spawn_spacing }
    }

    /// Moves every obstacle left by `speed * dt` and retires those fully off
    /// the left edge.
    pub fn advance(&mut self, dt: f32, speed: f32) {
        let step = speed * dt;
        for obstacle in self.obstacles.iter_mut() {
            obstacle.x -= step;
        }
        self.obstacles.retain(|obstacle| obstacle.right_edge() > 0.0);
    }

    /// Accumulates travel distance and spawns one gap pair at the right edge
    /// once the spawn spacing has been covered. Returns true when a pair was
    /// created.
    ///
    /// Degenerate geometry (gap taller than the canvas allows) is clamped to
    /// the widest valid gap instead of failing; a canvas too small for any
    /// gap spawns nothing.
    pub fn maybe_spawn(
        &mut self,
        dt: f32,
        speed: f32,
        gap_height: f32,
        viewport_width: u16,
        viewport_height: u16,
        rng: &mut impl Rng,
    ) -> bool {
        self.distance += speed * dt;
        if self.distance < self.spawn_spacing {
            return false;
        }
        self.distance = 0.0;

        let margin = game::GAP_MARGIN;
        if viewport_height <= 2 * margin + 1 {
            trace!(viewport_height, "canvas too small for any gap, skipping spawn");
            return false;
        }
        let max_gap = viewport_height - 2 * margin - 1;
        let gap = (gap_height.round().max(1.0) as u16).min(max_gap);

        let gap_top = rng.gen_range(margin..=viewport_height - gap - margin);
        let x = viewport_width as f32;

        self.obstacles.push_back(Obstacle::new(Orientation::Top, x, 0, gap_top));
        self.obstacles.push_back(Obstacle::new(
            Orientation::Bottom,
            x,
            gap_top + gap,
            viewport_height - gap_top - gap,
        ));
        trace!(gap_top, gap, x, "spawned pipe pair");
        true
    }

    /// Flags obstacles whose right edge has crossed the flyer's fixed x and
    /// returns the number of newly passed pairs (top halves only, so each
    /// pair scores once).
    pub fn mark_passed(&mut self, flyer_x: f32) -> u32 {
        let mut pairs = 0;
        for obstacle in self.obstacles.iter_mut() {
            if !obstacle.passed && obstacle.right_edge() < flyer_x {
                obstacle.passed = true;
                if obstacle.orientation == Orientation::Top {
                    pairs += 1;
                }
            }
        }
        pairs
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}
