//! Population controller
//!
//! One call to [`Population::update`] is one generation:
//!
//! 1. every genome is scored by the fitness callback, tracking the average
//!    and the best genome (the earliest one wins ties);
//! 2. the generation is stale when the average barely moved since the
//!    previous generation;
//! 3. genomes are partitioned in place into fit (`score >= average`) and
//!    unfit;
//! 4. every slot from the breeding cut onward is overwritten by offspring of
//!    the slots before it, either a mutated copy of one random earlier slot
//!    or a crossover of two. Because earlier slots include offspring already
//!    produced this generation, later children can descend from earlier ones.

use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::NeatConfig;
use crate::error::{NeatError, NeatResult};
use crate::fitness::traits::Fitness;
use crate::genome::genome::Genome;
use crate::genome::topology::Topology;
use crate::model::Model;
use crate::operators::crossover::UniformCrossover;
use crate::operators::mutation::{MutationKind, StructuralMutation};
use crate::operators::selection::{breeding_cut, partition_by_average};
use crate::operators::traits::{CrossoverOperator, MutationOperator};
use crate::population::builder::PopulationBuilder;
use crate::random;

/// Summary of one generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateReport {
    /// Generation number (1 for the first update)
    pub generation: usize,
    /// Mean score of the generation
    pub average: f32,
    /// Highest score of the generation
    pub best_fitness: f32,
    /// Lowest score of the generation
    pub worst_fitness: f32,
    /// Whether the average stagnated
    pub stale: bool,
    /// Consecutive stale generations ending with this one
    #[serde(default)]
    pub stale_streak: usize,
    /// Number of genomes scoring at least the average
    pub fit_count: usize,
    /// First slot replaced by offspring
    pub cut: usize,
    /// Offspring produced by mutation
    pub mutated: usize,
    /// Offspring produced by crossover
    pub crossed: usize,
    /// Mutations that added a hidden node
    pub nodes_added: usize,
}

/// A population of genomes sharing one topology
#[derive(Clone, Debug)]
pub struct Population {
    topology: Topology,
    config: NeatConfig,
    genomes: Vec<Genome>,
    last_average: f32,
    generation: usize,
    mutation: StructuralMutation,
    crossover: UniformCrossover,
    last_report: Option<UpdateReport>,
}

impl Population {
    /// Create a population of minimal genomes with the default configuration
    pub fn new<R: Rng + ?Sized>(
        input_count: usize,
        output_count: usize,
        population_size: usize,
        rng: &mut R,
    ) -> NeatResult<Self> {
        Self::with_config(
            Topology::new(input_count, output_count),
            population_size,
            NeatConfig::default(),
            rng,
        )
    }

    /// Create a population of minimal genomes
    pub fn with_config<R: Rng + ?Sized>(
        topology: Topology,
        population_size: usize,
        config: NeatConfig,
        rng: &mut R,
    ) -> NeatResult<Self> {
        if population_size == 0 {
            return Err(NeatError::Configuration(
                "population size must be positive".to_string(),
            ));
        }
        let genomes = (0..population_size)
            .map(|_| Genome::minimal(topology, rng))
            .collect();
        Self::from_parts(topology, config, genomes, None, 0)
    }

    /// Create a builder for a population
    pub fn builder() -> PopulationBuilder {
        PopulationBuilder::new()
    }

    /// Assemble a population from existing genomes
    pub(crate) fn from_parts(
        topology: Topology,
        config: NeatConfig,
        genomes: Vec<Genome>,
        last_average: Option<f32>,
        generation: usize,
    ) -> NeatResult<Self> {
        if topology.input_count == 0 || topology.output_count == 0 {
            return Err(NeatError::Configuration(format!(
                "need at least one input and one output, got {} and {}",
                topology.input_count, topology.output_count
            )));
        }
        if genomes.is_empty() {
            return Err(NeatError::EmptyPopulation);
        }
        config.validate()?;
        for genome in &genomes {
            genome.validate(&topology)?;
        }

        Ok(Self {
            topology,
            last_average: last_average.unwrap_or(config.initial_last_average),
            mutation: StructuralMutation::new(config.mutation),
            crossover: UniformCrossover::new(),
            config,
            genomes,
            generation,
            last_report: None,
        })
    }

    /// Input/output layout shared by every genome
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Number of input nodes
    pub fn input_count(&self) -> usize {
        self.topology.input_count
    }

    /// Number of output nodes
    pub fn output_count(&self) -> usize {
        self.topology.output_count
    }

    /// Configuration in use
    pub fn config(&self) -> &NeatConfig {
        &self.config
    }

    /// Genomes in slot order
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    /// Population size
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    /// Always false for a constructed population
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    /// Number of completed generations
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Average score of the most recent generation (the stagnation baseline)
    pub fn last_average(&self) -> f32 {
        self.last_average
    }

    /// Summary of the most recent generation
    pub fn last_report(&self) -> Option<&UpdateReport> {
        self.last_report.as_ref()
    }

    /// Run one forward pass of `genome` under this population's topology
    pub fn evaluate(&self, genome: &Genome, inputs: &[f32]) -> NeatResult<Vec<f32>> {
        self.topology.evaluate(genome, inputs)
    }

    /// Snapshot `genome` as a serializable model
    pub fn extract_model(&self, genome: &Genome) -> NeatResult<Model> {
        Model::extract(&self.topology, genome)
    }

    /// Score, select and breed one generation.
    ///
    /// Returns a snapshot of the best genome as it was scored, before any
    /// slot was overwritten by offspring.
    pub fn update<F, R>(&mut self, fitness: &F, rng: &mut R) -> Genome
    where
        F: Fitness + ?Sized,
        R: Rng,
    {
        let topology = self.topology;
        for genome in &mut self.genomes {
            let score = fitness.evaluate(&topology, genome);
            genome.set_fitness(score);
        }
        self.select_and_breed(rng)
    }

    /// Like [`Population::update`], but genomes are scored on the rayon
    /// thread pool. Breeding stays sequential, so results match `update` for
    /// the same generator state.
    #[cfg(feature = "parallel")]
    pub fn update_parallel<F, R>(&mut self, fitness: &F, rng: &mut R) -> Genome
    where
        F: Fitness + Sync + ?Sized,
        R: Rng,
    {
        let topology = self.topology;
        self.genomes.par_iter_mut().for_each(|genome| {
            let score = fitness.evaluate(&topology, genome);
            genome.set_fitness(score);
        });
        self.select_and_breed(rng)
    }

    /// Sequential fallback for parallel scoring (when the `parallel` feature is disabled)
    #[cfg(not(feature = "parallel"))]
    pub fn update_parallel<F, R>(&mut self, fitness: &F, rng: &mut R) -> Genome
    where
        F: Fitness + ?Sized,
        R: Rng,
    {
        self.update(fitness, rng)
    }

    fn select_and_breed<R: Rng>(&mut self, rng: &mut R) -> Genome {
        let size = self.genomes.len();

        let mut best = 0;
        let mut worst_fitness = f32::INFINITY;
        let mut total = 0.0f32;
        for (i, genome) in self.genomes.iter().enumerate() {
            let score = genome.fitness();
            total += score;
            let current = self.genomes[best].fitness();
            if score > current || (current.is_nan() && !score.is_nan()) {
                best = i;
            }
            worst_fitness = worst_fitness.min(score);
        }
        let average = total / size as f32;
        let stale = (self.last_average - average).abs() < self.config.stale_threshold;
        self.last_average = average;
        let best_genome = self.genomes[best].clone();

        let fit_count = partition_by_average(&mut self.genomes, average);
        let cut = breeding_cut(fit_count, stale);
        if cut != fit_count {
            warn!(
                generation = self.generation + 1,
                fit_count, stale, "breeding cut forced to keep a single elite"
            );
        }

        let mut mutated = 0;
        let mut crossed = 0;
        let mut nodes_added = 0;
        for idx in cut..size {
            let (parents, rest) = self.genomes.split_at_mut(idx);
            let child = &mut rest[0];
            let donor = &parents[random::index(rng, idx)];
            if stale || random::uniform(rng) <= self.config.breed_mutation_chance {
                if self.mutation.mutate_into(donor, child, rng) == MutationKind::AddNode {
                    nodes_added += 1;
                }
                mutated += 1;
            } else {
                let second = &parents[random::index(rng, idx)];
                self.crossover.crossover_into(donor, second, child, rng);
                crossed += 1;
            }
        }

        self.generation += 1;
        let stale_streak = match (&self.last_report, stale) {
            (_, false) => 0,
            (Some(previous), true) => previous.stale_streak + 1,
            (None, true) => 1,
        };
        let report = UpdateReport {
            generation: self.generation,
            average,
            best_fitness: best_genome.fitness(),
            worst_fitness,
            stale,
            stale_streak,
            fit_count,
            cut,
            mutated,
            crossed,
            nodes_added,
        };
        debug!(
            generation = report.generation,
            average = report.average,
            best = report.best_fitness,
            stale = report.stale,
            cut = report.cut,
            mutated = report.mutated,
            crossed = report.crossed,
            nodes_added = report.nodes_added,
            "generation complete"
        );
        self.last_report = Some(report);

        best_genome
    }
}
