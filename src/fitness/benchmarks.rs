//! Benchmark fitness functions
//!
//! Truth-table tasks for exercising the engine, XOR being the classic
//! neuroevolution benchmark.

use crate::error::NeatResult;
use crate::fitness::traits::Fitness;
use crate::genome::genome::Genome;
use crate::genome::topology::Topology;
use crate::network::evaluator::Evaluator;

/// A fixed set of `(inputs, expected outputs)` cases
///
/// Fitness is the negated mean absolute error over every output of every
/// case, so a perfect network scores `0.0` and higher is better.
#[derive(Clone, Debug, PartialEq)]
pub struct TruthTable {
    cases: Vec<(Vec<f32>, Vec<f32>)>,
}

impl TruthTable {
    /// Create a truth table from explicit cases
    pub fn new(cases: Vec<(Vec<f32>, Vec<f32>)>) -> Self {
        Self { cases }
    }

    /// Two-input exclusive or
    pub fn xor() -> Self {
        Self::boolean(|a, b| a != b)
    }

    /// Two-input and
    pub fn and() -> Self {
        Self::boolean(|a, b| a && b)
    }

    /// Two-input or
    pub fn or() -> Self {
        Self::boolean(|a, b| a || b)
    }

    fn boolean(op: impl Fn(bool, bool) -> bool) -> Self {
        let bit = |b: bool| if b { 1.0 } else { 0.0 };
        let cases = [(false, false), (false, true), (true, false), (true, true)]
            .iter()
            .map(|&(a, b)| (vec![bit(a), bit(b)], vec![bit(op(a, b))]))
            .collect();
        Self { cases }
    }

    /// The cases of this table
    pub fn cases(&self) -> &[(Vec<f32>, Vec<f32>)] {
        &self.cases
    }

    /// Mean absolute error of a genome over every output of every case
    pub fn mean_absolute_error(&self, topology: &Topology, genome: &Genome) -> NeatResult<f32> {
        let mut evaluator = Evaluator::new();
        let mut total = 0.0;
        let mut count = 0usize;
        for (inputs, expected) in &self.cases {
            let outputs = evaluator.evaluate(topology, genome, inputs)?;
            for (out, target) in outputs.iter().zip(expected) {
                total += (out - target).abs();
                count += 1;
            }
        }
        Ok(if count == 0 { 0.0 } else { total / count as f32 })
    }
}

impl Fitness for TruthTable {
    fn evaluate(&self, topology: &Topology, genome: &Genome) -> f32 {
        match self.mean_absolute_error(topology, genome) {
            Ok(error) => -error,
            Err(_) => f32::NEG_INFINITY,
        }
    }
}
