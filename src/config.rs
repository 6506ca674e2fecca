use crate::error::ConfigError;
use clap::Parser;

pub const ALGORITHMS: [&str; 3] = ["weighted", "reference", "all"];

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(long, default_value_t = 20)]
    pub grid_size: usize,

    #[arg(long, default_value_t = 60)]
    pub num_walls: usize,

    /// Obstacle layers the walls are spread across.
    #[arg(long, default_value_t = 2)]
    pub num_layers: usize,

    /// Layers that are registered but never assigned. Each blocks every cell.
    #[arg(long, default_value_t = 0)]
    pub unset_layers: usize,

    #[arg(long, default_value = "weighted")]
    pub algorithm: String,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    /// Give up a search after this many expanded cells.
    #[arg(long)]
    pub max_expansions: Option<usize>,

    /// Re-run the search every N moves; 0 only replans when the path runs out.
    #[arg(long, default_value_t = 0)]
    pub replan_interval: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            grid_size: 20,
            num_walls: 60,
            num_layers: 2,
            unset_layers: 0,
            algorithm: "weighted".to_string(),
            seed: None,
            delay_ms: 50,
            no_visualization: true,
            max_expansions: None,
            replan_interval: 0,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 2 {
            return Err(ConfigError::GridTooSmall(self.grid_size));
        }
        if !ALGORITHMS.contains(&self.algorithm.as_str()) {
            return Err(ConfigError::UnknownAlgorithm(self.algorithm.clone()));
        }
        // Start and goal always stay free.
        if self.num_walls > self.grid_size * self.grid_size - 2 {
            return Err(ConfigError::TooManyWalls {
                walls: self.num_walls,
                size: self.grid_size,
            });
        }
        Ok(())
    }
}
