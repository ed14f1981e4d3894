//! Diagnostics and statistics
//!
//! This module provides statistics collection for evolution runs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::genome::genome::Genome;
use crate::population::population::Population;

/// Statistics for a single generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number
    pub generation: usize,
    /// Total fitness evaluations so far
    pub evaluations: usize,
    /// Best fitness in this generation
    pub best_fitness: f32,
    /// Worst fitness in this generation
    pub worst_fitness: f32,
    /// Mean fitness
    pub mean_fitness: f32,
    /// Median fitness
    pub median_fitness: f32,
    /// Fitness standard deviation
    pub fitness_std: f32,
    /// Whether the mean fitness stagnated
    pub stale: bool,
    /// Mean node count after breeding
    pub mean_node_count: f32,
    /// Largest node count after breeding
    pub max_node_count: usize,
    /// Mean number of nonzero connections after breeding
    pub mean_connection_count: f32,
    /// Timing information
    pub timing: TimingStats,
}

/// Timing statistics
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingStats {
    /// Time spent scoring, selecting and breeding (ms)
    pub update_ms: f64,
    /// Total generation time including bookkeeping (ms)
    pub total_ms: f64,
}

impl TimingStats {
    /// Create new timing stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Set update time
    pub fn with_update(mut self, duration: Duration) -> Self {
        self.update_ms = duration.as_secs_f64() * 1000.0;
        self
    }

    /// Set total time
    pub fn with_total(mut self, duration: Duration) -> Self {
        self.total_ms = duration.as_secs_f64() * 1000.0;
        self
    }
}

impl GenerationStats {
    /// Compute statistics from a population right after an update.
    ///
    /// Breeding moves genomes between slots but children keep the score of
    /// the slot they overwrite, so the fitness values still describe the
    /// generation that was just scored.
    pub fn from_population(population: &Population, evaluations: usize) -> Self {
        let genomes = population.genomes();
        let mut fitnesses: Vec<f32> = genomes.iter().map(Genome::fitness).collect();
        fitnesses.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let count = fitnesses.len().max(1) as f32;
        let best = fitnesses.last().copied().unwrap_or(f32::NEG_INFINITY);
        let worst = fitnesses.first().copied().unwrap_or(f32::INFINITY);
        let mean = fitnesses.iter().sum::<f32>() / count;
        let median = match fitnesses.len() {
            0 => 0.0,
            n if n % 2 == 0 => (fitnesses[n / 2 - 1] + fitnesses[n / 2]) / 2.0,
            n => fitnesses[n / 2],
        };
        let variance = if fitnesses.len() > 1 {
            fitnesses.iter().map(|f| (f - mean).powi(2)).sum::<f32>()
                / (fitnesses.len() - 1) as f32
        } else {
            0.0
        };

        let node_counts = genomes.iter().map(Genome::node_count);
        let mean_node_count = node_counts.clone().sum::<usize>() as f32 / count;
        let max_node_count = node_counts.max().unwrap_or(0);
        let mean_connection_count =
            genomes.iter().map(Genome::connection_count).sum::<usize>() as f32 / count;

        Self {
            generation: population.generation(),
            evaluations,
            best_fitness: best,
            worst_fitness: worst,
            mean_fitness: mean,
            median_fitness: median,
            fitness_std: variance.sqrt(),
            stale: population.last_report().map_or(false, |r| r.stale),
            mean_node_count,
            max_node_count,
            mean_connection_count,
            timing: TimingStats::default(),
        }
    }

    /// Set timing information
    pub fn with_timing(mut self, timing: TimingStats) -> Self {
        self.timing = timing;
        self
    }
}

/// Statistics collector for an entire evolution run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Statistics per generation
    pub generations: Vec<GenerationStats>,
    /// Total runtime in milliseconds
    pub total_runtime_ms: f64,
    /// Reason for termination
    pub termination_reason: Option<String>,
}

impl EvolutionStats {
    /// Create a new stats collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a generation's statistics
    pub fn record(&mut self, stats: GenerationStats) {
        self.generations.push(stats);
    }

    /// Get the number of generations recorded
    pub fn num_generations(&self) -> usize {
        self.generations.len()
    }

    /// Get the best fitness across all generations
    pub fn best_fitness(&self) -> Option<f32> {
        self.generations
            .iter()
            .map(|g| g.best_fitness)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Get the final generation's best fitness
    pub fn final_best_fitness(&self) -> Option<f32> {
        self.generations.last().map(|g| g.best_fitness)
    }

    /// Get the history of best fitness values
    pub fn best_fitness_history(&self) -> Vec<f32> {
        self.generations.iter().map(|g| g.best_fitness).collect()
    }

    /// Get the history of mean fitness values
    pub fn mean_fitness_history(&self) -> Vec<f32> {
        self.generations.iter().map(|g| g.mean_fitness).collect()
    }

    /// Get the history of mean node counts
    pub fn node_count_history(&self) -> Vec<f32> {
        self.generations.iter().map(|g| g.mean_node_count).collect()
    }

    /// Set the termination reason
    pub fn set_termination_reason(&mut self, reason: &str) {
        self.termination_reason = Some(reason.to_string());
    }

    /// Set the total runtime
    pub fn set_runtime(&mut self, duration: Duration) {
        self.total_runtime_ms = duration.as_secs_f64() * 1000.0;
    }

    /// Get a summary of the evolution run
    pub fn summary(&self) -> String {
        let best = self.best_fitness().unwrap_or(f32::NEG_INFINITY);
        let final_nodes = self.generations.last().map_or(0, |g| g.max_node_count);

        format!(
            "Evolution Summary:\n\
             - Generations: {}\n\
             - Best fitness: {:.6}\n\
             - Largest genome: {} nodes\n\
             - Runtime: {:.2}ms\n\
             - Termination: {}",
            self.num_generations(),
            best,
            final_nodes,
            self.total_runtime_ms,
            self.termination_reason.as_deref().unwrap_or("unknown")
        )
    }
}

/// Result of an evolution run
#[derive(Clone, Debug)]
pub struct EvolutionResult {
    /// The best genome seen in any generation
    pub best_genome: Genome,
    /// The score of `best_genome` when it was evaluated
    pub best_fitness: f32,
    /// Number of generations completed
    pub generations: usize,
    /// Total fitness evaluations
    pub evaluations: usize,
    /// Statistics for the run
    pub stats: EvolutionStats,
}

impl EvolutionResult {
    /// Create a new evolution result
    pub fn new(best_genome: Genome, generations: usize, evaluations: usize) -> Self {
        Self {
            best_fitness: best_genome.fitness(),
            best_genome,
            generations,
            evaluations,
            stats: EvolutionStats::new(),
        }
    }

    /// Add statistics to the result
    pub fn with_stats(mut self, stats: EvolutionStats) -> Self {
        self.stats = stats;
        self
    }
}

pub mod prelude {
    pub use super::{EvolutionResult, EvolutionStats, GenerationStats, TimingStats};
}
