use rustc_hash::FxHashSet;
use std::fmt;

/// A discrete grid coordinate. Coordinates are unbounded; only [`Grid`]
/// imposes a size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// The cell `(dx, dy)` away, or `None` if it falls outside the `i32` range.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Position {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    pub fn manhattan(self, other: Position) -> u64 {
        u64::from(self.x.abs_diff(other.x)) + u64::from(self.y.abs_diff(other.y))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Answers whether a cell can be entered.
pub trait ObstacleClassifier {
    fn is_blocked(&self, cell: Position) -> bool;
}

impl<F> ObstacleClassifier for F
where
    F: Fn(Position) -> bool,
{
    fn is_blocked(&self, cell: Position) -> bool {
        self(cell)
    }
}

/// A named set of occupied tiles, the equivalent of one tilemap.
#[derive(Debug, Clone, Default)]
pub struct ObstacleLayer {
    pub name: String,
    tiles: FxHashSet<Position>,
}

impl ObstacleLayer {
    pub fn new(name: impl Into<String>) -> Self {
        ObstacleLayer {
            name: name.into(),
            tiles: FxHashSet::default(),
        }
    }

    pub fn with_tiles(name: impl Into<String>, tiles: impl IntoIterator<Item = Position>) -> Self {
        let mut layer = Self::new(name);
        layer.tiles.extend(tiles);
        layer
    }

    pub fn has_tile(&self, cell: Position) -> bool {
        self.tiles.contains(&cell)
    }

    pub fn insert(&mut self, cell: Position) -> bool {
        self.tiles.insert(cell)
    }

    pub fn remove(&mut self, cell: Position) -> bool {
        self.tiles.remove(&cell)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Ordered collection of obstacle layers. A slot holding `None` is a
/// registered layer that was never assigned; it blocks every cell.
#[derive(Debug, Clone, Default)]
pub struct LayeredObstacles {
    layers: Vec<Option<ObstacleLayer>>,
}

impl LayeredObstacles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_layer(&mut self, layer: ObstacleLayer) -> usize {
        self.layers.push(Some(layer));
        self.layers.len() - 1
    }

    pub fn push_unset(&mut self) -> usize {
        self.layers.push(None);
        self.layers.len() - 1
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut ObstacleLayer> {
        self.layers.get_mut(index).and_then(Option::as_mut)
    }

    pub fn layers(&self) -> &[Option<ObstacleLayer>] {
        &self.layers
    }

    pub fn has_unset_layer(&self) -> bool {
        self.layers.iter().any(Option::is_none)
    }
}

impl ObstacleClassifier for LayeredObstacles {
    fn is_blocked(&self, cell: Position) -> bool {
        self.layers.iter().any(|layer| match layer {
            Some(layer) => layer.has_tile(cell),
            None => true,
        })
    }
}

/// Wraps a classifier and counts how often it is consulted.
pub struct CountingClassifier<C> {
    inner: C,
    calls: std::cell::Cell<usize>,
}

impl<C: ObstacleClassifier> CountingClassifier<C> {
    pub fn new(inner: C) -> Self {
        CountingClassifier {
            inner,
            calls: std::cell::Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn reset(&self) {
        self.calls.set(0);
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: ObstacleClassifier> ObstacleClassifier for CountingClassifier<C> {
    fn is_blocked(&self, cell: Position) -> bool {
        self.calls.set(self.calls.get() + 1);
        self.inner.is_blocked(cell)
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Cell {
    Empty,
    Wall,
    Unset,
}

/// A bounded square world used by the simulation. Everything outside
/// `0..size` on either axis is blocked.
#[derive(Debug, Clone)]
pub struct Grid {
    pub size: usize,
    pub obstacles: LayeredObstacles,
    pub start: Position,
    pub goal: Position,
}

impl Grid {
    pub fn new(size: usize, obstacles: LayeredObstacles, start: Position, goal: Position) -> Self {
        Grid {
            size,
            obstacles,
            start,
            goal,
        }
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        let size = self.size as i32;
        pos.x >= 0 && pos.x < size && pos.y >= 0 && pos.y < size
    }

    pub fn cell_at(&self, pos: Position) -> Cell {
        if self.obstacles.has_unset_layer() {
            return Cell::Unset;
        }
        if self.obstacles.is_blocked(pos) {
            Cell::Wall
        } else {
            Cell::Empty
        }
    }

    /// Print a visual representation of the grid, marking the agent and
    /// the cells of its remaining path.
    pub fn print_grid(&self, agent_pos: Option<Position>, path: &[Position]) {
        println!("Legend: S=Start, G=Goal, A=Agent, *=Path, #=Wall, ?=Unset layer, .=Empty");

        print!("   ");
        for x in 0..self.size {
            print!("{:2}", x % 10);
        }
        println!();

        for y in 0..self.size as i32 {
            print!("{:2} ", y);

            for x in 0..self.size as i32 {
                let pos = Position { x, y };
                let c = if Some(pos) == agent_pos {
                    'A'
                } else if pos == self.start {
                    'S'
                } else if pos == self.goal {
                    'G'
                } else if path.contains(&pos) {
                    '*'
                } else {
                    match self.cell_at(pos) {
                        Cell::Wall => '#',
                        Cell::Unset => '?',
                        Cell::Empty => '.',
                    }
                };
                print!("{} ", c);
            }
            println!();
        }
        println!();
    }
}

impl ObstacleClassifier for Grid {
    fn is_blocked(&self, cell: Position) -> bool {
        !self.in_bounds(cell) || self.obstacles.is_blocked(cell)
    }
}
