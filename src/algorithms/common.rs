use crate::algorithms::weighted_a_star::{DIAGONAL_COST, STRAIGHT_COST};
use crate::error::QueueError;
use crate::grid::{ObstacleClassifier, Position};

pub trait PathfindingAlgorithm {
    fn name(&self) -> &'static str;

    /// Returns the cells to walk from `start` to `goal`, excluding `start`.
    /// An empty path means there is nothing to do.
    fn find_path(
        &mut self,
        start: Position,
        goal: Position,
        obstacles: &dyn ObstacleClassifier,
    ) -> Result<Vec<Position>, QueueError>;

    /// Drop anything remembered about the obstacle layout.
    fn clear_cache(&mut self) {}
}

/// Total step cost of walking `path` from `start`.
pub fn path_cost(start: Position, path: &[Position]) -> f32 {
    let mut prev = start;
    let mut cost = 0.0;
    for &step in path {
        cost += if step.x != prev.x && step.y != prev.y {
            DIAGONAL_COST
        } else {
            STRAIGHT_COST
        };
        prev = step;
    }
    cost
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_cost_mixes_step_kinds() {
        let path = [Position::new(1, 1), Position::new(2, 1), Position::new(3, 2)];
        assert!((path_cost(Position::new(0, 0), &path) - 3.8).abs() < 1e-5);
        assert_eq!(path_cost(Position::new(0, 0), &[]), 0.0);
    }
}
