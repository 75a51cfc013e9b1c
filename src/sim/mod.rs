//! The simulation core: pure, renderer-independent game logic.
//!
//! Everything here advances as `rate * dt` with the elapsed time supplied by
//! the caller, and randomness only enters through an explicit `Rng`.

pub mod collision;
pub mod flyer;
pub mod obstacle;
pub mod session;
pub mod sprite;

pub use flyer::Flyer;
pub use obstacle::{Obstacle, ObstacleStream, Orientation};
pub use session::{GameSession, SessionState, TickInput, TickReport, Tunables};
pub use sprite::Sprite;

/// Compounded growth multiplier after `pipes_passed` pairs at `growth_percent`
/// per pass. Exponential from the base value, so it never depends on call
/// order and resets cleanly with the session.
pub fn growth_factor(pipes_passed: u32, growth_percent: f32) -> f32 {
    (1.0 + growth_percent / 100.0).powi(pipes_passed as i32)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_growth_factor_compounds() {
        let factor = growth_factor(10, 2.0);
        assert!((factor - 1.02_f32.powi(10)).abs() < 1e-6);
        assert!((factor - 1.2190).abs() < 1e-3);
    }

    #[test]
    fn test_growth_factor_identity() {
        assert_eq!(growth_factor(0, 5.0), 1.0);
        assert_eq!(growth_factor(7, 0.0), 1.0);
    }

    #[test]
    fn test_growth_factor_monotonic() {
        for passed in 0..32 {
            assert!(growth_factor(passed, 3.0) <= growth_factor(passed + 1, 3.0));
        }
    }
}
