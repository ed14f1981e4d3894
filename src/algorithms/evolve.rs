//! Evolution driver
//!
//! Repeatedly updates a population until a termination criterion fires,
//! keeping the best genome of any generation. Callers that need finer
//! control can drive [`Population::update`] themselves.

use std::time::Instant;

use rand::Rng;
use tracing::info;

use crate::checkpoint::CheckpointManager;
use crate::diagnostics::{EvolutionResult, EvolutionStats, GenerationStats, TimingStats};
use crate::error::{NeatError, NeatResult};
use crate::fitness::traits::Fitness;
use crate::genome::genome::Genome;
use crate::population::population::Population;
use crate::termination::{EvolutionState, TerminationCriterion};

/// Evolve `population` until `termination` fires.
///
/// At least one generation always runs. Generation numbers are the
/// population's own counter, so a population restored from a checkpoint
/// continues toward the same [`MaxGenerations`](crate::termination::MaxGenerations)
/// limit instead of starting over.
pub fn evolve<F, T, R>(
    population: &mut Population,
    fitness: &F,
    termination: &T,
    rng: &mut R,
) -> NeatResult<EvolutionResult>
where
    F: Fitness + Sync + ?Sized,
    T: TerminationCriterion + ?Sized,
    R: Rng,
{
    run(population, fitness, termination, None, rng)
}

/// Like [`evolve`], saving a checkpoint whenever `manager` asks for one
pub fn evolve_with_checkpoints<F, T, R>(
    population: &mut Population,
    fitness: &F,
    termination: &T,
    manager: &mut CheckpointManager,
    rng: &mut R,
) -> NeatResult<EvolutionResult>
where
    F: Fitness + Sync + ?Sized,
    T: TerminationCriterion + ?Sized,
    R: Rng,
{
    run(population, fitness, termination, Some(manager), rng)
}

fn run<F, T, R>(
    population: &mut Population,
    fitness: &F,
    termination: &T,
    mut manager: Option<&mut CheckpointManager>,
    rng: &mut R,
) -> NeatResult<EvolutionResult>
where
    F: Fitness + Sync + ?Sized,
    T: TerminationCriterion + ?Sized,
    R: Rng,
{
    let start_time = Instant::now();
    let start_generation = population.generation();
    let mut stats = EvolutionStats::new();
    let mut evaluations = 0;
    let mut best: Option<Genome> = None;

    loop {
        let gen_start = Instant::now();
        let generation_best = population.update_parallel(fitness, rng);
        let update_time = gen_start.elapsed();
        evaluations += population.len();

        let current = match best.take() {
            Some(current) if !improves(&generation_best, &current) => current,
            _ => generation_best,
        };
        let best_so_far = best.insert(current);

        let gen_stats = GenerationStats::from_population(population, evaluations).with_timing(
            TimingStats::new()
                .with_update(update_time)
                .with_total(gen_start.elapsed()),
        );
        stats.record(gen_stats);

        if let Some(manager) = manager.as_deref_mut() {
            if manager.should_save(population.generation()) {
                let checkpoint = population
                    .checkpoint()
                    .with_statistics(stats.generations.clone())
                    .with_best(best_so_far.clone());
                manager.save(&checkpoint)?;
            }
        }

        let state = EvolutionState {
            population,
            best: best_so_far,
            evaluations,
        };
        if let Some(reason) = termination.check(&state) {
            stats.set_termination_reason(&reason);
            break;
        }
    }

    stats.set_runtime(start_time.elapsed());
    let best_genome = best.ok_or(NeatError::EmptyPopulation)?;
    let generations = population.generation() - start_generation;
    info!(
        generations,
        evaluations,
        best_fitness = best_genome.fitness(),
        nodes = best_genome.node_count(),
        reason = stats.termination_reason.as_deref().unwrap_or("unknown"),
        "evolution finished"
    );

    Ok(EvolutionResult::new(best_genome, generations, evaluations).with_stats(stats))
}

/// Whether `candidate` should replace `current` as the best genome. Any
/// number replaces NaN.
fn improves(candidate: &Genome, current: &Genome) -> bool {
    current.fitness().is_nan() || candidate.fitness() > current.fitness()
}
