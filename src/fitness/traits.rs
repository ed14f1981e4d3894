//! Fitness traits
//!
//! This module defines the fitness callback seam.

use crate::genome::genome::Genome;
use crate::genome::topology::Topology;

/// Fitness evaluation trait
///
/// Called once per genome per generation. Higher scores are better. The
/// engine treats the callback as pure; it receives the population topology
/// so it can run forward passes over the genome.
pub trait Fitness {
    /// Score a genome
    fn evaluate(&self, topology: &Topology, genome: &Genome) -> f32;
}

impl<F> Fitness for F
where
    F: Fn(&Topology, &Genome) -> f32,
{
    fn evaluate(&self, topology: &Topology, genome: &Genome) -> f32 {
        self(topology, genome)
    }
}

/// A wrapper to negate a fitness function (for error-minimizing callbacks)
pub struct MinimizeFitness<F> {
    inner: F,
}

impl<F> MinimizeFitness<F> {
    /// Create a minimization wrapper around a fitness function
    pub fn new(fitness: F) -> Self {
        Self { inner: fitness }
    }
}

impl<F: Fitness> Fitness for MinimizeFitness<F> {
    fn evaluate(&self, topology: &Topology, genome: &Genome) -> f32 {
        -self.inner.evaluate(topology, genome)
    }
}
