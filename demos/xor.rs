//! XOR Evolution
//!
//! Evolves a network for two-input XOR, prints its truth table and writes the
//! winning network to a model file.
//!
//! Run with `RUST_LOG=fast_neat=debug` to see per-generation logs.

use fast_neat::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fast_neat=info")),
        )
        .init();

    println!("=== XOR Evolution ===\n");

    let mut rng = StdRng::seed_from_u64(42);
    let xor = TruthTable::xor();

    let mut population = Population::builder()
        .input_count(2)
        .output_count(1)
        .population_size(100)
        .config(NeatConfig::default())
        .build(&mut rng)?;

    let termination = AnyOf::new(vec![
        Box::new(TargetFitness::new(-0.05)),
        Box::new(MaxGenerations::new(1000)),
        Box::new(NodeBudget::new(32)),
    ]);
    let result = evolve(&mut population, &xor, &termination, &mut rng)?;

    println!("{}\n", result.stats.summary());
    let best = &result.best_genome;
    println!(
        "Best network: {} nodes, {} connections",
        best.node_count(),
        best.connection_count()
    );
    println!(
        "Forward consistent: {}\n",
        best.is_forward_consistent(&population.topology())
    );

    for (inputs, expected) in xor.cases() {
        let outputs = population.evaluate(best, inputs)?;
        println!("  {:?} -> {:.4} (expected {})", inputs, outputs[0], expected[0]);
    }

    let path = std::env::temp_dir().join("fast_neat_xor.model");
    let written = population.extract_model(best)?.save(&path)?;
    println!("\nWrote {} bytes to {}", written, path.display());

    Ok(())
}
