use crate::algorithms::common::PathfindingAlgorithm;
use crate::algorithms::weighted_a_star::NEIGHBOR_OFFSETS;
use crate::error::QueueError;
use crate::grid::{ObstacleClassifier, Position};
use pathfinding::prelude::astar;

// Integer step costs in tenths so the `pathfinding` crate can order them.
const STRAIGHT: u64 = 10;
const DIAGONAL: u64 = 14;

/// Admissible octile A* using the `pathfinding` crate. It keeps no state
/// between queries and is only used as a yardstick for the weighted search.
#[derive(Default)]
pub struct ReferenceAStar;

impl ReferenceAStar {
    pub fn new() -> Self {
        ReferenceAStar
    }
}

impl PathfindingAlgorithm for ReferenceAStar {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn find_path(
        &mut self,
        start: Position,
        goal: Position,
        obstacles: &dyn ObstacleClassifier,
    ) -> Result<Vec<Position>, QueueError> {
        if start == goal {
            return Ok(Vec::new());
        }

        let result = astar(
            &start,
            |p| {
                let p = *p;
                NEIGHBOR_OFFSETS
                    .iter()
                    .filter_map(move |&(dx, dy)| {
                        let cost = if dx != 0 && dy != 0 { DIAGONAL } else { STRAIGHT };
                        Some((p.offset(dx, dy)?, cost))
                    })
                    .filter(|(next, _)| !obstacles.is_blocked(*next))
                    .collect::<Vec<_>>()
            },
            |p| octile(*p, goal),
            |p| *p == goal,
        );

        // `astar` includes the start cell; callers never want it.
        Ok(result
            .map(|(path, _)| path.into_iter().skip(1).collect())
            .unwrap_or_default())
    }
}

fn octile(from: Position, to: Position) -> u64 {
    let dx = u64::from(from.x.abs_diff(to.x));
    let dy = u64::from(from.y.abs_diff(to.y));
    STRAIGHT * dx.max(dy) + (DIAGONAL - STRAIGHT) * dx.min(dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::common::path_cost;

    #[test]
    fn finds_optimal_octile_path() {
        let mut reference = ReferenceAStar::new();
        let path = reference
            .find_path(Position::new(0, 0), Position::new(3, 1), &|_: Position| false)
            .unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.last(), Some(&Position::new(3, 1)));
        assert!((path_cost(Position::new(0, 0), &path) - 3.4).abs() < 1e-5);
    }

    #[test]
    fn handles_cells_at_the_coordinate_limit() {
        let mut reference = ReferenceAStar::new();
        let start = Position::new(i32::MAX, i32::MIN);
        let goal = Position::new(i32::MAX - 1, i32::MIN + 1);
        let path = reference.find_path(start, goal, &|_: Position| false).unwrap();
        assert_eq!(path, vec![goal]);
        assert_eq!(
            octile(Position::new(i32::MIN, 0), Position::new(i32::MAX, 0)),
            10 * u64::from(u32::MAX)
        );
    }

    #[test]
    fn octile_distance_is_admissible_on_open_ground() {
        assert_eq!(octile(Position::new(0, 0), Position::new(3, 1)), 34);
        assert_eq!(octile(Position::new(2, 2), Position::new(2, 2)), 0);
    }
}
