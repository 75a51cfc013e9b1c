//! Silhouette-accurate collision judgement between the flyer, the obstacle
//! stream and the playfield bounds.

use crate::sim::flyer::Flyer;
use crate::sim::obstacle::ObstacleStream;
use crate::sim::sprite::Sprite;

/// What ended the run, carried with the per-tick result for logging and UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionCause {
    Obstacle,
    OutOfBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionResult {
    pub cause: Option<CollisionCause>,
}

impl CollisionResult {
    pub fn collided(&self) -> bool {
        self.cause.is_some()
    }
}

/// Evaluates the flyer against every live obstacle and the vertical bounds.
/// Call once per tick, after both the flyer and the stream have advanced.
pub fn test(flyer: &Flyer, obstacles: &ObstacleStream, viewport_height: f32) -> CollisionResult {
    let origin = flyer.cell_origin();
    let sprite = flyer.sprite();

    for obstacle in obstacles.iter() {
        if masks_overlap(sprite, origin, obstacle.sprite(), obstacle.cell_origin()) {
            return CollisionResult { cause: Some(CollisionCause::Obstacle) };
        }
    }

    if flyer.is_out_of_bounds(viewport_height) {
        return CollisionResult { cause: Some(CollisionCause::OutOfBounds) };
    }

    CollisionResult::default()
}

/// Per-cell silhouette intersection of two sprites at the given top-left cell
/// offsets. The bounding-box intersection is only a pre-pass; a hit requires
/// a cell that is solid in both masks.
pub fn masks_overlap(a: &Sprite, a_origin: (i32, i32), b: &Sprite, b_origin: (i32, i32)) -> bool {
    let left = a_origin.0.max(b_origin.0);
    let right = (a_origin.0 + a.width() as i32).min(b_origin.0 + b.width() as i32);
    let top = a_origin.1.max(b_origin.1);
    let bottom = (a_origin.1 + a.height() as i32).min(b_origin.1 + b.height() as i32);
    if left >= right || top >= bottom {
        return false;
    }

    for row in top..bottom {
        for col in left..right {
            let a_solid = a.is_solid((col - a_origin.0) as u16, (row - a_origin.1) as u16);
            let b_solid = b.is_solid((col - b_origin.0) as u16, (row - b_origin.1) as u16);
            if a_solid && b_solid {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    const BLOCK: &str = "##\n##\n";
    // Solid in the top-left cell only.
    const CORNER: &str = "# \n  \n";

    #[test]
    fn test_disjoint_boxes_never_collide() {
        let a = Sprite::from_text(BLOCK);
        let b = Sprite::from_text(BLOCK);
        assert!(!masks_overlap(&a, (0, 0), &b, (5, 0)));
        assert!(!masks_overlap(&a, (0, 0), &b, (0, 5)));
        // Touching edges do not overlap.
        assert!(!masks_overlap(&a, (0, 0), &b, (2, 0)));
    }

    #[test]
    fn test_single_shared_cell_collides() {
        let a = Sprite::from_text(BLOCK);
        let b = Sprite::from_text(BLOCK);
        assert!(masks_overlap(&a, (0, 0), &b, (1, 1)));
    }

    #[test]
    fn test_transparent_cells_do_not_collide() {
        let a = Sprite::from_text(CORNER);
        let b = Sprite::from_text(CORNER);
        // Bounding boxes overlap but the solid corners never meet.
        assert!(!masks_overlap(&a, (0, 0), &b, (1, 0)));
        assert!(!masks_overlap(&a, (0, 0), &b, (0, 1)));
        assert!(masks_overlap(&a, (0, 0), &b, (0, 0)));
    }

    #[test]
    fn test_negative_origins() {
        let a = Sprite::from_text(BLOCK);
        let b = Sprite::from_text(BLOCK);
        assert!(masks_overlap(&a, (-1, -1), &b, (0, 0)));
        assert!(!masks_overlap(&a, (-4, -4), &b, (0, 0)));
    }

    fn spawned_stream() -> (ObstacleStream, u16) {
        let mut stream = ObstacleStream::new(1.0);
        let mut rng = StdRng::seed_from_u64(3);
        while !stream.maybe_spawn(1.0 / 60.0, 600.0, 9.0, 60, 36, &mut rng) {}
        let gap_top = stream.iter().next().unwrap().sprite().height();
        (stream, gap_top)
    }

    #[test]
    fn test_flyer_in_gap_is_safe() {
        let (stream, gap_top) = spawned_stream();
        let flyer = Flyer::new(63.0, gap_top as f32 + 4.5, 4.0, 38.0, -16.0);
        assert_eq!(test(&flyer, &stream, 36.0).cause, None);
    }

    #[test]
    fn test_flyer_into_pipe_collides() {
        let (stream, gap_top) = spawned_stream();
        // Centered on the bottom pipe, two rows below its cap.
        let flyer = Flyer::new(63.0, (gap_top + 9) as f32 + 2.0, 4.0, 38.0, -16.0);
        assert_eq!(test(&flyer, &stream, 36.0).cause, Some(CollisionCause::Obstacle));
    }

    #[test]
    fn test_bounds_reported_without_obstacles() {
        let stream = ObstacleStream::new(100.0);
        let flyer = Flyer::new(20.0, 35.5, 4.0, 38.0, -16.0);
        assert_eq!(test(&flyer, &stream, 36.0).cause, Some(CollisionCause::OutOfBounds));
        assert!(test(&flyer, &stream, 36.0).collided());
    }
}
