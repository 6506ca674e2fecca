use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Statistics {
    pub total_moves: usize,
    pub num_walls: usize,
    pub path_cost: f32,
    pub optimal_cost: f32,
    pub route_efficiency: f64,
    pub replans: usize,
    pub classifier_calls: usize,
}

impl Statistics {
    pub fn new(num_walls: usize, optimal_cost: f32) -> Self {
        Statistics {
            total_moves: 0,
            num_walls,
            path_cost: 0.0,
            optimal_cost,
            route_efficiency: 0.0,
            replans: 0,
            classifier_calls: 0,
        }
    }

    /// Ratio of walked cost to the optimal cost; 1.0 is a perfect route.
    pub fn calculate_efficiency(&mut self) {
        if self.path_cost > 0.0 && self.optimal_cost > 0.0 {
            self.route_efficiency = f64::from(self.path_cost) / f64::from(self.optimal_cost);
        } else {
            self.route_efficiency = 0.0;
        }
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Moves: {}", self.total_moves)?;
        writeln!(f, "Walked Cost: {:.1}", self.path_cost)?;
        writeln!(f, "Optimal Cost: {:.1}", self.optimal_cost)?;
        writeln!(f, "Number of Walls: {}", self.num_walls)?;
        writeln!(f, "Replans: {}", self.replans)?;
        writeln!(f, "Classifier Calls: {}", self.classifier_calls)?;
        writeln!(f, "Route Efficiency: {:.3}", self.route_efficiency)?;

        if self.route_efficiency > 1.0 {
            let overshoot = (self.route_efficiency - 1.0) * 100.0;
            writeln!(f, "Note: route is {:.1}% longer than optimal", overshoot)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TimingData {
    pub find_path_times: Vec<Duration>,
}

impl TimingData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn average_find_path_time(&self) -> Duration {
        if self.find_path_times.is_empty() {
            Duration::from_nanos(0)
        } else {
            let total: Duration = self.find_path_times.iter().sum();
            total / self.find_path_times.len() as u32
        }
    }

    pub fn total_calls(&self) -> usize {
        self.find_path_times.len()
    }
}
