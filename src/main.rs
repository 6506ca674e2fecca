use clap::Parser;

use grid_pathing::config::Config;
use grid_pathing::error::SimulationError;
use grid_pathing::simulation::Simulation;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();

    println!("Starting pathfinding simulation...");
    println!("Grid size: {}x{}", config.grid_size, config.grid_size);
    println!(
        "Walls: {}, Layers: {}, Unset layers: {}",
        config.num_walls, config.num_layers, config.unset_layers
    );
    println!("Algorithm: {}", config.algorithm);

    if config.no_visualization {
        println!("Visualization disabled - running in fast mode");
    } else {
        println!("Visualization enabled with {}ms delay", config.delay_ms);
        println!("Press Ctrl+C to stop the simulation");
    }
    println!();

    if let Err(e) = run(config) {
        eprintln!("Simulation failed: {}", e);
        std::process::exit(1);
    }
}

fn run(config: Config) -> Result<(), SimulationError> {
    if config.algorithm == "all" {
        let results = Simulation::run_all_algorithms(config)?;
        Simulation::print_comparison_results(&results);
        return Ok(());
    }

    let mut simulation = Simulation::new(config)?;
    let (stats, timing_data) = simulation.run()?;

    println!("\n=== FINAL STATISTICS ===");
    print!("{}", stats);
    println!("Pathfinding calls: {}", timing_data.total_calls());
    println!(
        "Average find_path time: {:.2?}",
        timing_data.average_find_path_time()
    );
    Ok(())
}
