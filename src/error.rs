use thiserror::Error;

/// Raised by queue operations that need at least one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("queue is empty")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid size must be at least 2, got {0}")]
    GridTooSmall(usize),

    #[error("unknown algorithm '{0}', expected 'weighted', 'reference' or 'all'")]
    UnknownAlgorithm(String),

    #[error("{walls} walls do not fit on a {size}x{size} grid")]
    TooManyWalls { walls: usize, size: usize },
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("no connected start/goal pair found after {0} attempts")]
    NoConnectedLayout(usize),

    #[error(transparent)]
    Queue(#[from] QueueError),
}
