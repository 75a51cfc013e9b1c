//! The game session: tunables, the title/playing/game-over/debug state
//! machine, and the per-tick orchestration of flyer, obstacles and collision.

use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{info, warn};

use crate::constants::game;
use crate::sim::collision::{self, CollisionCause};
use crate::sim::flyer::Flyer;
use crate::sim::obstacle::ObstacleStream;
use crate::sim::growth_factor;

/// Every tunable the debug screen can adjust. Values are snapshotted into the
/// session at start; editing them mid-run affects the next session only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    /// Downward acceleration, cells/s².
    pub gravity: f32,
    /// Velocity set by a jump; negative is up.
    pub jump_impulse: f32,
    /// Flyer bounding-box height in rows.
    pub flyer_size: f32,
    /// Leftward obstacle speed, cells/s.
    pub pipe_speed: f32,
    /// Vertical gap between a pair's halves, rows.
    pub pipe_gap: f32,
    /// Travel distance between spawns, cells.
    pub spawn_spacing: f32,
    /// Growth per pair passed, percent.
    pub growth_percent: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Tunables {
            gravity: 38.0,
            jump_impulse: -16.0,
            flyer_size: 4.0,
            pipe_speed: 12.0,
            pipe_gap: 9.0,
            spawn_spacing: 32.0,
            growth_percent: 4.0,
        }
    }
}

impl Tunables {
    /// Replaces invalid fields with their defaults so bad configuration can
    /// never reach the simulation as NaN, zero or a wrong-signed value.
    pub fn sanitized(self) -> Self {
        let defaults = Tunables::default();
        let field = |name: &str, value: f32, valid: bool, fallback: f32| {
            if valid {
                value
            } else {
                warn!(name, value, fallback, "ignoring invalid tunable");
                fallback
            }
        };

        Tunables {
            gravity: field("gravity", self.gravity, self.gravity.is_finite() && self.gravity > 0.0, defaults.gravity),
            jump_impulse: field(
                "jump_impulse",
                self.jump_impulse,
                self.jump_impulse.is_finite() && self.jump_impulse < 0.0,
                defaults.jump_impulse,
            ),
            flyer_size: field(
                "flyer_size",
                self.flyer_size,
                self.flyer_size.is_finite() && self.flyer_size > 0.0,
                defaults.flyer_size,
            ),
            pipe_speed: field(
                "pipe_speed",
                self.pipe_speed,
                self.pipe_speed.is_finite() && self.pipe_speed > 0.0,
                defaults.pipe_speed,
            ),
            pipe_gap: field("pipe_gap", self.pipe_gap, self.pipe_gap.is_finite() && self.pipe_gap > 0.0, defaults.pipe_gap),
            spawn_spacing: field(
                "spawn_spacing",
                self.spawn_spacing,
                self.spawn_spacing.is_finite() && self.spawn_spacing > 0.0,
                defaults.spawn_spacing,
            ),
            growth_percent: field(
                "growth_percent",
                self.growth_percent,
                self.growth_percent.is_finite() && self.growth_percent >= 0.0,
                defaults.growth_percent,
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SessionState {
    Title,
    Playing,
    GameOver,
    Debug,
}

/// Discrete input collected over one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub jump: bool,
}

/// Edge signals produced by one tick, for the UI and persistence layers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Pairs passed this tick (score increased by the same amount).
    pub scored: u32,
    /// The run ended this tick.
    pub collided: bool,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    state: SessionState,
    score: u32,
    pipes_passed: u32,
    tunables: Tunables,
    pipe_speed: f32,
    flyer: Flyer,
    stream: ObstacleStream,
    viewport: (u16, u16),
}

impl GameSession {
    pub fn new() -> Self {
        let tunables = Tunables::default();
        GameSession {
            state: SessionState::Title,
            score: 0,
            pipes_passed: 0,
            flyer: Flyer::new(0.0, 0.0, tunables.flyer_size, tunables.gravity, tunables.jump_impulse),
            stream: ObstacleStream::new(tunables.spawn_spacing),
            pipe_speed: tunables.pipe_speed,
            tunables,
            viewport: (0, 0),
        }
    }

    /// Title → Playing: snapshots the tunables and resets flyer, stream,
    /// score and the pipes-passed counter for a fresh run.
    pub fn start(&mut self, tunables: Tunables, viewport_width: u16, viewport_height: u16) {
        if self.state != SessionState::Title {
            warn!(state = %self.state, "start ignored outside the title state");
            return;
        }

        let tunables = tunables.sanitized();
        let x = (viewport_width as f32 * game::FLYER_X_RATIO).round();
        let y = viewport_height as f32 / 2.0;

        self.flyer = Flyer::new(x, y, tunables.flyer_size, tunables.gravity, tunables.jump_impulse);
        self.stream = ObstacleStream::new(tunables.spawn_spacing);
        self.pipe_speed = tunables.pipe_speed;
        self.score = 0;
        self.pipes_passed = 0;
        self.viewport = (viewport_width, viewport_height);
        self.tunables = tunables;
        self.state = SessionState::Playing;
        info!(?tunables, viewport_width, viewport_height, "session started");
    }

    /// Advances the simulation by `dt` seconds. A no-op outside Playing, so
    /// Title, Debug and GameOver all freeze the world without touching dt.
    ///
    /// Tick order: input, flyer integration, spawn, obstacle motion,
    /// collision judgement, then pass/score/growth bookkeeping.
    pub fn tick(&mut self, dt: f32, input: &TickInput, rng: &mut impl Rng) -> TickReport {
        if self.state != SessionState::Playing {
            return TickReport::default();
        }

        if input.jump {
            self.flyer.jump();
        }
        self.flyer.update(dt);

        self.stream.maybe_spawn(dt, self.pipe_speed, self.tunables.pipe_gap, self.viewport.0, self.viewport.1, rng);
        self.stream.advance(dt, self.pipe_speed);

        let result = collision::test(&self.flyer, &self.stream, self.viewport.1 as f32);
        if let Some(cause) = result.cause {
            self.state = SessionState::GameOver;
            info!(
                score = self.score,
                out_of_bounds = cause == CollisionCause::OutOfBounds,
                "run ended"
            );
            return TickReport { scored: 0, collided: true };
        }

        let scored = self.stream.mark_passed(self.flyer.x());
        if scored > 0 {
            self.score += scored;
            self.pipes_passed += scored;
            self.flyer.apply_growth(self.pipes_passed, self.tunables.growth_percent);
            self.pipe_speed = self.tunables.pipe_speed * growth_factor(self.pipes_passed, self.tunables.growth_percent);
            info!(score = self.score, pipe_speed = self.pipe_speed, "pair passed");
        }

        TickReport { scored, collided: false }
    }

    /// Debug is reachable from the title screen only; the attempt is refused
    /// (and reported) anywhere else.
    pub fn enter_debug(&mut self) -> bool {
        if self.state == SessionState::Title {
            self.state = SessionState::Debug;
            true
        } else {
            warn!(state = %self.state, "debug is only reachable from the title screen");
            false
        }
    }

    pub fn leave_debug(&mut self) {
        if self.state == SessionState::Debug {
            self.state = SessionState::Title;
        }
    }

    /// GameOver → Title.
    pub fn back_to_title(&mut self) {
        if self.state == SessionState::GameOver {
            self.state = SessionState::Title;
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn pipes_passed(&self) -> u32 {
        self.pipes_passed
    }

    pub fn pipe_speed(&self) -> f32 {
        self.pipe_speed
    }

    pub fn flyer(&self) -> &Flyer {
        &self.flyer
    }

    pub fn obstacles(&self) -> &ObstacleStream {
        &self.stream
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    fn playing_session() -> GameSession {
        let mut session = GameSession::new();
        session.start(Tunables::default(), 100, 36);
        session
    }

    #[test]
    fn test_start_snapshots_and_resets() {
        let mut session = GameSession::new();
        let tunables = Tunables { pipe_speed: 20.0, ..Tunables::default() };
        session.start(tunables, 100, 36);
        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(session.score(), 0);
        assert_eq!(session.pipe_speed(), 20.0);
        assert!(session.obstacles().is_empty());
    }

    #[test]
    fn test_start_requires_title_state() {
        let mut session = playing_session();
        let flyer_y = session.flyer().y();
        session.start(Tunables::default(), 50, 20);
        // Still the original run.
        assert_eq!(session.viewport, (100, 36));
        assert_eq!(session.flyer().y(), flyer_y);
    }

    #[test]
    fn test_tick_is_noop_outside_playing() {
        let mut session = GameSession::new();
        let report = session.tick(DT, &TickInput { jump: true }, &mut rng());
        assert_eq!(report, TickReport::default());
        assert_eq!(session.state(), SessionState::Title);
    }

    #[test]
    fn test_debug_only_from_title() {
        let mut session = GameSession::new();
        assert!(session.enter_debug());
        assert_eq!(session.state(), SessionState::Debug);
        session.leave_debug();
        assert_eq!(session.state(), SessionState::Title);

        let mut session = playing_session();
        assert!(!session.enter_debug());
        assert_eq!(session.state(), SessionState::Playing);
    }

    #[test]
    fn test_debug_freezes_simulation() {
        let mut session = GameSession::new();
        session.enter_debug();
        let y = session.flyer().y();
        for _ in 0..60 {
            session.tick(DT, &TickInput::default(), &mut rng());
        }
        assert_eq!(session.flyer().y(), y);
    }

    #[test]
    fn test_falling_without_input_ends_run_once() {
        let mut session = playing_session();
        let mut rng = rng();
        let mut collisions = 0;
        for _ in 0..2000 {
            let report = session.tick(DT, &TickInput::default(), &mut rng);
            if report.collided {
                collisions += 1;
            }
        }
        // The flyer fell through the floor exactly once, then froze.
        assert_eq!(collisions, 1);
        assert_eq!(session.state(), SessionState::GameOver);
    }

    #[test]
    fn test_score_monotonic_and_matches_reports() {
        let mut session = playing_session();
        let mut rng = rng();
        let mut reported = 0;
        let mut last_score = 0;
        for tick in 0..6000 {
            // Periodic hops roughly hold altitude around mid-screen.
            let jump = tick % 24 == 0 && session.flyer().y() > 14.0;
            let report = session.tick(DT, &TickInput { jump }, &mut rng);
            reported += report.scored;
            assert!(session.score() >= last_score);
            last_score = session.score();
            if report.collided {
                break;
            }
        }
        assert_eq!(reported, last_score);
    }

    #[test]
    fn test_growth_raises_pipe_speed() {
        let mut session = playing_session();
        // Drive the bookkeeping directly through a fake passed pair.
        session.pipes_passed = 4;
        session.flyer.apply_growth(5, 4.0);
        session.pipe_speed = session.tunables.pipe_speed * growth_factor(5, 4.0);
        assert!(session.pipe_speed() > Tunables::default().pipe_speed);
        assert!((session.pipe_speed() - 12.0 * 1.04_f32.powi(5)).abs() < 1e-3);
    }

    #[test]
    fn test_back_to_title_only_after_game_over() {
        let mut session = playing_session();
        session.back_to_title();
        assert_eq!(session.state(), SessionState::Playing);
        session.state = SessionState::GameOver;
        session.back_to_title();
        assert_eq!(session.state(), SessionState::Title);
    }

    #[test]
    fn test_sanitize_rejects_bad_values() {
        let bad = Tunables {
            gravity: f32::NAN,
            jump_impulse: 5.0,
            flyer_size: -3.0,
            pipe_speed: 0.0,
            pipe_gap: f32::INFINITY,
            spawn_spacing: 40.0,
            growth_percent: -1.0,
        };
        let clean = bad.sanitized();
        let defaults = Tunables::default();
        assert_eq!(clean.gravity, defaults.gravity);
        assert_eq!(clean.jump_impulse, defaults.jump_impulse);
        assert_eq!(clean.flyer_size, defaults.flyer_size);
        assert_eq!(clean.pipe_speed, defaults.pipe_speed);
        assert_eq!(clean.pipe_gap, defaults.pipe_gap);
        assert_eq!(clean.growth_percent, defaults.growth_percent);
        // Valid fields survive.
        assert_eq!(clean.spawn_spacing, 40.0);
    }

    #[test]
    fn test_sanitize_keeps_valid_values() {
        let tunables = Tunables { gravity: 70.0, growth_percent: 0.0, ..Tunables::default() };
        assert_eq!(tunables.sanitized(), tunables);
    }
}
