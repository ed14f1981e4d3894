//! Checkpoint state structures
//!
//! Everything needed to resume a population where it stopped.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::NeatConfig;
use crate::diagnostics::GenerationStats;
use crate::error::{CheckpointError, NeatResult};
use crate::genome::genome::Genome;
use crate::genome::topology::Topology;
use crate::population::population::Population;

/// Current checkpoint format version
pub const CHECKPOINT_VERSION: u32 = 1;

/// Complete population state for checkpointing
///
/// The random generator is owned by the caller and is not part of the
/// checkpoint; resuming with a differently seeded generator continues the
/// run along a different path.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Schema version for forward compatibility
    pub version: u32,
    /// Completed generations
    pub generation: usize,
    /// Input/output layout
    pub topology: Topology,
    /// Engine configuration
    pub config: NeatConfig,
    /// Genomes in slot order, with their last scores
    pub genomes: Vec<Genome>,
    /// Average score of the last generation (the stagnation baseline)
    pub last_average: f32,
    /// Best genome found so far
    pub best: Option<Genome>,
    /// Statistics history
    pub statistics: Vec<GenerationStats>,
    /// Custom metadata
    pub metadata: HashMap<String, String>,
}

impl Checkpoint {
    /// Capture the state of a population
    pub fn new(population: &Population) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            generation: population.generation(),
            topology: population.topology(),
            config: population.config().clone(),
            genomes: population.genomes().to_vec(),
            last_average: population.last_average(),
            best: None,
            statistics: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    /// Set the best genome
    pub fn with_best(mut self, best: Genome) -> Self {
        self.best = Some(best);
        self
    }

    /// Add statistics history
    pub fn with_statistics(mut self, stats: Vec<GenerationStats>) -> Self {
        self.statistics = stats;
        self
    }

    /// Add custom metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Check if checkpoint is compatible with current version
    pub fn is_compatible(&self) -> bool {
        self.version <= CHECKPOINT_VERSION
    }
}

impl Population {
    /// Capture this population in a checkpoint
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(self)
    }

    /// Rebuild a population from a checkpoint
    pub fn from_checkpoint(checkpoint: Checkpoint) -> NeatResult<Self> {
        if !checkpoint.is_compatible() {
            return Err(CheckpointError::VersionMismatch {
                expected: CHECKPOINT_VERSION,
                found: checkpoint.version,
            }
            .into());
        }
        Population::from_parts(
            checkpoint.topology,
            checkpoint.config,
            checkpoint.genomes,
            Some(checkpoint.last_average),
            checkpoint.generation,
        )
        .map_err(|e| CheckpointError::Corrupted(e.to_string()).into())
    }
}
