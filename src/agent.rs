use crate::grid::Position;
use std::collections::VecDeque;

/// Walks a path handed to it by a pathfinder, one cell per step. The path
/// is an owned snapshot; the agent never reaches back into the search.
pub struct Agent {
    pub position: Position,
    path: VecDeque<Position>,
    steps_taken: usize,
}

impl Agent {
    pub fn new(start_pos: Position) -> Self {
        Agent {
            position: start_pos,
            path: VecDeque::new(),
            steps_taken: 0,
        }
    }

    /// Replace whatever the agent was following with `path`.
    pub fn follow(&mut self, path: Vec<Position>) {
        self.path = path.into();
    }

    /// Move to the next cell of the current path. Returns `None` once the
    /// path is used up.
    pub fn step(&mut self) -> Option<Position> {
        let next = self.path.pop_front()?;
        self.position = next;
        self.steps_taken += 1;
        Some(next)
    }

    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn remaining_path(&self) -> impl Iterator<Item = &Position> {
        self.path.iter()
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }
}
