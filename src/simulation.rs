use crate::agent::Agent;
use crate::algorithms::common::{path_cost, PathfindingAlgorithm};
use crate::algorithms::reference::ReferenceAStar;
use crate::algorithms::weighted_a_star::GridPathfinder;
use crate::config::Config;
use crate::error::{ConfigError, SimulationError};
use crate::grid::{CountingClassifier, Grid, LayeredObstacles, ObstacleLayer, Position};
use crate::statistics::{Statistics, TimingData};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const MAX_LAYOUT_ATTEMPTS: usize = 20;

#[derive(Debug, Clone)]
pub struct EnvironmentSetup {
    pub grid_size: usize,
    pub seed: u64,
    pub start: Position,
    pub goal: Position,
    /// Wall tiles, one list per obstacle layer.
    pub layers: Vec<Vec<Position>>,
    pub unset_layers: usize,
}

impl EnvironmentSetup {
    /// Generate walls and a start/goal pair that the walls do not separate.
    /// Unset layers are added on top and are not considered when checking
    /// connectivity.
    pub fn generate(config: &Config) -> Result<Self, SimulationError> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let num_layers = config.num_layers.max(1);

        for attempt in 1..=MAX_LAYOUT_ATTEMPTS {
            let setup = Self::draw(config, seed, num_layers, &mut rng);
            let walls_only = Self {
                unset_layers: 0,
                ..setup.clone()
            }
            .create_grid();

            let reachable = !ReferenceAStar::new()
                .find_path(setup.start, setup.goal, &walls_only)?
                .is_empty();
            if reachable {
                info!(
                    seed,
                    attempt,
                    start = %setup.start,
                    goal = %setup.goal,
                    walls = setup.wall_count(),
                    "generated environment"
                );
                return Ok(setup);
            }
            debug!(attempt, "walls separate start and goal, redrawing");
        }

        Err(SimulationError::NoConnectedLayout(MAX_LAYOUT_ATTEMPTS))
    }

    fn draw(config: &Config, seed: u64, num_layers: usize, rng: &mut StdRng) -> Self {
        let size = config.grid_size;
        let start = Position {
            x: rng.gen_range(0..size / 2) as i32,
            y: rng.gen_range(0..size / 2) as i32,
        };
        let goal = Position {
            x: rng.gen_range(size / 2..size) as i32,
            y: rng.gen_range(size / 2..size) as i32,
        };

        let mut layers = vec![Vec::new(); num_layers];
        let mut taken = FxHashSet::default();
        let mut attempts = 0;
        while taken.len() < config.num_walls && attempts < config.num_walls * 3 {
            let pos = Position {
                x: rng.gen_range(0..size) as i32,
                y: rng.gen_range(0..size) as i32,
            };

            if pos != start && pos != goal && taken.insert(pos) {
                layers[taken.len() % num_layers].push(pos);
            }
            attempts += 1;
        }

        EnvironmentSetup {
            grid_size: size,
            seed,
            start,
            goal,
            layers,
            unset_layers: config.unset_layers,
        }
    }

    pub fn wall_count(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    pub fn create_grid(&self) -> Grid {
        let mut obstacles = LayeredObstacles::new();
        for (i, tiles) in self.layers.iter().enumerate() {
            obstacles.push_layer(ObstacleLayer::with_tiles(
                format!("walls-{}", i),
                tiles.iter().copied(),
            ));
        }
        for _ in 0..self.unset_layers {
            obstacles.push_unset();
        }

        Grid::new(self.grid_size, obstacles, self.start, self.goal)
    }
}

#[derive(Debug, Clone)]
pub struct AlgorithmResult {
    pub name: String,
    pub statistics: Statistics,
    pub timing_data: TimingData,
    pub success: bool,
    pub final_position: Position,
}

pub fn make_algorithm(config: &Config) -> Result<Box<dyn PathfindingAlgorithm>, ConfigError> {
    match config.algorithm.as_str() {
        "weighted" => {
            let limit = config
                .max_expansions
                .unwrap_or(config.grid_size * config.grid_size);
            Ok(Box::new(GridPathfinder::new().with_max_expansions(limit)))
        }
        "reference" => Ok(Box::new(ReferenceAStar::new())),
        other => Err(ConfigError::UnknownAlgorithm(other.to_string())),
    }
}

pub struct Simulation {
    world: CountingClassifier<Grid>,
    agent: Agent,
    algorithm: Box<dyn PathfindingAlgorithm>,
    config: Config,
    optimal_cost: f32,
    num_walls: usize,
}

impl Simulation {
    pub fn new(config: Config) -> Result<Self, SimulationError> {
        let environment = EnvironmentSetup::generate(&config)?;
        let algorithm = make_algorithm(&config)?;
        Ok(Self::new_with_environment(config, &environment, algorithm))
    }

    pub fn new_with_environment(
        config: Config,
        environment: &EnvironmentSetup,
        algorithm: Box<dyn PathfindingAlgorithm>,
    ) -> Self {
        let grid = environment.create_grid();
        let optimal_cost = Self::calculate_optimal_cost(&grid);

        Simulation {
            agent: Agent::new(grid.start),
            world: CountingClassifier::new(grid),
            algorithm,
            config,
            optimal_cost,
            num_walls: environment.wall_count(),
        }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn grid(&self) -> &Grid {
        self.world.inner()
    }

    pub fn reached_goal(&self) -> bool {
        self.agent.position == self.grid().goal
    }

    /// Run all algorithms against one shared environment and compare them.
    pub fn run_all_algorithms(config: Config) -> Result<Vec<AlgorithmResult>, SimulationError> {
        let environment = EnvironmentSetup::generate(&config)?;

        println!("Running comparison of weighted and reference searches...");
        println!("Environment seed: {} (for reproducibility)", environment.seed);
        println!(
            "Environment: Grid {}x{}, Walls: {}, Unset layers: {}",
            environment.grid_size,
            environment.grid_size,
            environment.wall_count(),
            environment.unset_layers
        );
        println!("Start: {}, Goal: {}", environment.start, environment.goal);
        println!();

        let mut results = Vec::new();
        for name in ["weighted", "reference"] {
            let algorithm_config = Config {
                algorithm: name.to_string(),
                no_visualization: true,
                ..config.clone()
            };
            let algorithm = make_algorithm(&algorithm_config)?;
            let mut simulation =
                Simulation::new_with_environment(algorithm_config, &environment, algorithm);

            let (statistics, timing_data) = simulation.run()?;
            let result = AlgorithmResult {
                name: name.to_string(),
                statistics,
                timing_data,
                success: simulation.reached_goal(),
                final_position: simulation.agent.position,
            };
            println!(
                "Completed: {} - Success: {}, Moves: {}",
                result.name, result.success, result.statistics.total_moves
            );
            results.push(result);
        }

        Ok(results)
    }

    pub fn print_comparison_results(results: &[AlgorithmResult]) {
        println!("\n=== ALGORITHM COMPARISON RESULTS ===");
        println!();
        println!(
            "{:<12} {:<8} {:<8} {:<10} {:<10} {:<12} {:<15} {:<12} {:<12}",
            "Algorithm",
            "Success",
            "Moves",
            "Cost",
            "Optimal",
            "Efficiency",
            "Avg Find Path",
            "Classifier",
            "Final"
        );
        println!("{}", "-".repeat(105));

        for result in results {
            let success_str = if result.success { "✓" } else { "✗" };
            println!(
                "{:<12} {:<8} {:<8} {:<10.1} {:<10.1} {:<12.3} {:<15} {:<12} {:<12}",
                result.name,
                success_str,
                result.statistics.total_moves,
                result.statistics.path_cost,
                result.statistics.optimal_cost,
                result.statistics.route_efficiency,
                format!("{:.2?}", result.timing_data.average_find_path_time()),
                result.statistics.classifier_calls,
                result.final_position.to_string()
            );
        }
        println!();
    }

    pub fn run(&mut self) -> Result<(Statistics, TimingData), SimulationError> {
        let mut stats = Statistics::new(self.num_walls, self.optimal_cost);
        let mut timing_data = TimingData::new();

        let goal = self.grid().goal;
        let max_iterations = self.grid().size * self.grid().size * 4;
        let mut iterations = 0;
        let mut moves_since_replan = 0;

        self.render(&stats, 0);

        while self.agent.position != goal && iterations < max_iterations {
            iterations += 1;

            let interval_elapsed =
                self.config.replan_interval > 0 && moves_since_replan >= self.config.replan_interval;
            if !self.agent.has_path() || interval_elapsed {
                let find_path_start = Instant::now();
                let path = self
                    .algorithm
                    .find_path(self.agent.position, goal, &self.world)?;
                timing_data.find_path_times.push(find_path_start.elapsed());
                stats.replans += 1;
                moves_since_replan = 0;

                // The layout never changes during a run, so asking again
                // would give the same answer.
                if path.is_empty() {
                    warn!(position = %self.agent.position, "no route to the goal, agent stays put");
                    break;
                }

                debug!(
                    algorithm = self.algorithm.name(),
                    from = %self.agent.position,
                    len = path.len(),
                    "replanned"
                );
                self.agent.follow(path);
            }

            let from = self.agent.position;
            if let Some(next) = self.agent.step() {
                stats.total_moves += 1;
                stats.path_cost += path_cost(from, &[next]);
                moves_since_replan += 1;
                self.render(&stats, iterations);
            }
        }

        stats.classifier_calls = self.world.calls();
        stats.calculate_efficiency();

        if self.reached_goal() {
            info!(
                algorithm = self.algorithm.name(),
                moves = stats.total_moves,
                cost = stats.path_cost,
                "agent reached the goal"
            );
        } else {
            info!(
                algorithm = self.algorithm.name(),
                position = %self.agent.position,
                "agent did not reach the goal"
            );
        }

        if !self.config.no_visualization {
            self.clear_screen();
            println!("=== SIMULATION COMPLETE ===");
            if self.reached_goal() {
                println!("SUCCESS: Agent reached the goal!");
            } else {
                println!("FAILED: Agent did not reach the goal");
            }
            println!("Algorithm: {}", self.algorithm.name());
            println!("Final position: {}", self.agent.position);
            println!("Total steps: {} | Total moves: {}", iterations, stats.total_moves);
            println!("Average find_path time: {:.2?}", timing_data.average_find_path_time());
            self.grid().print_grid(Some(self.agent.position), &[]);
        }

        Ok((stats, timing_data))
    }

    fn render(&self, stats: &Statistics, step: usize) {
        if self.config.no_visualization {
            return;
        }

        self.clear_screen();
        println!("=== PATHFINDING SIMULATION ===");
        println!(
            "Algorithm: {} | Step: {} | Moves: {} | Cost: {:.1}",
            self.algorithm.name(),
            step,
            stats.total_moves,
            stats.path_cost
        );
        println!("Agent position: {}", self.agent.position);
        println!("Goal position: {}", self.grid().goal);
        println!("Optimal cost: {:.1}", self.optimal_cost);

        let remaining: Vec<Position> = self.agent.remaining_path().copied().collect();
        self.grid().print_grid(Some(self.agent.position), &remaining);
        thread::sleep(Duration::from_millis(self.config.delay_ms));
    }

    /// Clear the terminal screen (only used when visualization is enabled)
    fn clear_screen(&self) {
        print!("\x1B[2J\x1B[1;1H");
    }

    fn calculate_optimal_cost(grid: &Grid) -> f32 {
        ReferenceAStar::new()
            .find_path(grid.start, grid.goal, grid)
            .map(|path| path_cost(grid.start, &path))
            .unwrap_or(0.0)
    }
}
