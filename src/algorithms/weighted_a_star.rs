use crate::algorithms::common::PathfindingAlgorithm;
use crate::algorithms::priority_queue::IndexedPriorityQueue;
use crate::error::QueueError;
use crate::grid::{ObstacleClassifier, Position};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// Weight applied to the Manhattan heuristic. Values above 1 make the search
/// greedier; with diagonal steps this makes it inadmissible.
pub const HEURISTIC_WEIGHT: f32 = 1.5;
pub const STRAIGHT_COST: f32 = 1.0;
pub const DIAGONAL_COST: f32 = 1.4;

/// Neighbour offsets in expansion order.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Weighted A* over an implicit, unbounded 8-connected grid.
///
/// Obstacle classifications are memoised for the lifetime of the instance.
/// The cache is never invalidated on its own: after changing the obstacle
/// layout, call [`GridPathfinder::clear_obstacle_cache`] or later searches
/// will keep using the old answers.
#[derive(Debug, Default, Clone)]
pub struct GridPathfinder {
    obstacle_cache: FxHashMap<Position, bool>,
    max_expansions: Option<usize>,
}

impl GridPathfinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop a query after `limit` cells have been closed, reporting no path.
    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }

    pub fn max_expansions(&self) -> Option<usize> {
        self.max_expansions
    }

    /// Finds a path from `start` to `end`.
    ///
    /// The returned cells run from the step after `start` up to and
    /// including `end`. An empty path means either `start == end` or that
    /// `end` cannot be reached; the two are not distinguished.
    ///
    /// # Errors
    ///
    /// Only an internal queue underflow, which the loop guards against.
    pub fn find_path<C>(
        &mut self,
        start: Position,
        end: Position,
        obstacles: &C,
    ) -> Result<Vec<Position>, QueueError>
    where
        C: ObstacleClassifier + ?Sized,
    {
        if start == end {
            return Ok(Vec::new());
        }

        let mut open = IndexedPriorityQueue::new();
        let mut closed: FxHashSet<Position> = FxHashSet::default();
        let mut came_from: FxHashMap<Position, Position> = FxHashMap::default();
        let mut g_score: FxHashMap<Position, f32> = FxHashMap::default();

        // The caller is standing on the start cell.
        self.obstacle_cache.insert(start, false);
        g_score.insert(start, 0.0);
        open.enqueue(start, HEURISTIC_WEIGHT * heuristic(start, end));

        while !open.is_empty() {
            let current = open.dequeue()?;
            if current == end {
                return Ok(build_path(&came_from, start, end));
            }

            if self
                .max_expansions
                .is_some_and(|limit| closed.len() >= limit)
            {
                return Ok(Vec::new());
            }
            closed.insert(current);

            let current_g = g_score[&current];
            for (dx, dy) in NEIGHBOR_OFFSETS {
                // Cells past the end of the coordinate range count as blocked.
                let Some(neighbor) = current.offset(dx, dy) else {
                    continue;
                };
                if self.is_obstacle(neighbor, obstacles) || closed.contains(&neighbor) {
                    continue;
                }

                let step = if dx != 0 && dy != 0 {
                    DIAGONAL_COST
                } else {
                    STRAIGHT_COST
                };
                let tentative = current_g + step;

                if g_score.get(&neighbor).map_or(true, |&known| tentative < known) {
                    g_score.insert(neighbor, tentative);
                    came_from.insert(neighbor, current);
                    open.enqueue(
                        neighbor,
                        tentative + HEURISTIC_WEIGHT * heuristic(neighbor, end),
                    );
                }
            }
        }

        Ok(Vec::new())
    }

    /// Forget every memoised classification.
    pub fn clear_obstacle_cache(&mut self) {
        debug!(entries = self.obstacle_cache.len(), "clearing obstacle cache");
        self.obstacle_cache.clear();
    }

    pub fn cached_obstacle(&self, cell: Position) -> Option<bool> {
        self.obstacle_cache.get(&cell).copied()
    }

    pub fn obstacle_cache_len(&self) -> usize {
        self.obstacle_cache.len()
    }

    fn is_obstacle<C>(&mut self, cell: Position, obstacles: &C) -> bool
    where
        C: ObstacleClassifier + ?Sized,
    {
        *self
            .obstacle_cache
            .entry(cell)
            .or_insert_with(|| obstacles.is_blocked(cell))
    }
}

impl PathfindingAlgorithm for GridPathfinder {
    fn name(&self) -> &'static str {
        "weighted"
    }

    fn find_path(
        &mut self,
        start: Position,
        goal: Position,
        obstacles: &dyn ObstacleClassifier,
    ) -> Result<Vec<Position>, QueueError> {
        GridPathfinder::find_path(self, start, goal, obstacles)
    }

    fn clear_cache(&mut self) {
        self.clear_obstacle_cache();
    }
}

fn heuristic(from: Position, to: Position) -> f32 {
    from.manhattan(to) as f32
}

fn build_path(
    came_from: &FxHashMap<Position, Position>,
    start: Position,
    end: Position,
) -> Vec<Position> {
    let mut path = Vec::new();
    let mut current = end;
    while current != start {
        path.push(current);
        current = came_from[&current];
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::common::path_cost;
    use crate::grid::CountingClassifier;

    fn open_field(_: Position) -> bool {
        false
    }

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn same_cell_needs_no_movement() {
        let mut finder = GridPathfinder::new();
        let classifier = CountingClassifier::new(open_field);
        assert_eq!(finder.find_path(p(4, -2), p(4, -2), &classifier), Ok(vec![]));
        assert_eq!(classifier.calls(), 0);
    }

    #[test]
    fn straight_line_on_open_field() {
        let mut finder = GridPathfinder::new();
        let path = finder.find_path(p(0, 0), p(3, 0), &open_field).unwrap();
        assert_eq!(path, vec![p(1, 0), p(2, 0), p(3, 0)]);
        assert!((path_cost(p(0, 0), &path) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn prefers_diagonal_steps() {
        let mut finder = GridPathfinder::new();
        let path = finder.find_path(p(0, 0), p(2, 2), &open_field).unwrap();
        assert_eq!(path, vec![p(1, 1), p(2, 2)]);
        assert!((path_cost(p(0, 0), &path) - 2.8).abs() < 1e-5);
    }

    #[test]
    fn enclosed_start_has_no_path() {
        let start = p(10, 10);
        let walls = |c: Position| c != start && (c.x - start.x).abs() <= 1 && (c.y - start.y).abs() <= 1;

        let mut finder = GridPathfinder::new();
        assert_eq!(finder.find_path(start, p(20, 20), &walls), Ok(vec![]));

        for (dx, dy) in NEIGHBOR_OFFSETS {
            assert_eq!(finder.cached_obstacle(start.offset(dx, dy).unwrap()), Some(true));
        }
        assert_eq!(finder.cached_obstacle(start), Some(false));
        assert_eq!(finder.obstacle_cache_len(), 9);
    }

    #[test]
    fn walled_in_start_cannot_reach_goal() {
        // A ring of walls at distance 2 keeps the reachable area finite.
        let start = p(0, 0);
        let ring = |c: Position| c.x.abs().max(c.y.abs()) == 2;
        let mut finder = GridPathfinder::new();
        assert_eq!(finder.find_path(start, p(5, 0), &ring), Ok(vec![]));
    }

    #[test]
    fn routes_around_a_wall() {
        // Vertical wall at x = 1 from y = -1 to y = 1.
        let wall = |c: Position| c.x == 1 && (-1..=1).contains(&c.y);
        let mut finder = GridPathfinder::new();
        let path = finder.find_path(p(0, 0), p(2, 0), &wall).unwrap();

        assert_eq!(path.last(), Some(&p(2, 0)));
        assert!(path.iter().all(|&c| !wall(c)));
        let mut prev = p(0, 0);
        for &step in &path {
            assert!((step.x - prev.x).abs() <= 1 && (step.y - prev.y).abs() <= 1);
            prev = step;
        }
    }

    #[test]
    fn second_query_uses_the_cache() {
        let wall = |c: Position| c.x == 3 && c.y != 5;
        let classifier = CountingClassifier::new(wall);
        let mut finder = GridPathfinder::new().with_max_expansions(500);

        let first = finder.find_path(p(0, 0), p(6, 0), &classifier).unwrap();
        let calls_after_first = classifier.calls();
        assert!(calls_after_first > 0);

        let second = finder.find_path(p(0, 0), p(6, 0), &classifier).unwrap();
        assert_eq!(first, second);
        assert_eq!(classifier.calls(), calls_after_first);
    }

    #[test]
    fn stale_cache_survives_until_cleared() {
        let mut finder = GridPathfinder::new();
        finder.find_path(p(0, 0), p(2, 0), &open_field).unwrap();
        assert_eq!(finder.cached_obstacle(p(1, 0)), Some(false));

        let everything = |c: Position| c != p(0, 0);
        // The cached answers still say the route is open.
        assert_eq!(
            finder.find_path(p(0, 0), p(2, 0), &everything).unwrap(),
            vec![p(1, 0), p(2, 0)]
        );

        finder.clear_obstacle_cache();
        assert_eq!(finder.obstacle_cache_len(), 0);
        assert_eq!(finder.find_path(p(0, 0), p(2, 0), &everything), Ok(vec![]));
    }

    #[test]
    fn search_next_to_the_coordinate_limit() {
        let corridor = |c: Position| c.y.abs() > 1;
        let mut finder = GridPathfinder::new();
        let path = finder
            .find_path(p(i32::MAX, 0), p(i32::MAX - 2, 0), &corridor)
            .unwrap();
        assert_eq!(path, vec![p(i32::MAX - 1, 0), p(i32::MAX - 2, 0)]);
    }

    #[test]
    fn start_and_goal_at_opposite_ends_of_the_range() {
        let mut finder = GridPathfinder::new().with_max_expansions(5);
        assert_eq!(
            finder.find_path(p(i32::MIN, 0), p(i32::MAX, 0), &open_field),
            Ok(vec![])
        );
    }

    #[test]
    fn expansion_cap_gives_up() {
        let mut finder = GridPathfinder::new().with_max_expansions(10);
        let unreachable = |c: Position| c == p(50, 50);
        assert_eq!(finder.find_path(p(0, 0), p(50, 50), &unreachable), Ok(vec![]));
        assert_eq!(finder.max_expansions(), Some(10));
    }
}
