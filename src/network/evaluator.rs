//! Single forward pass over a genome
//!
//! Inputs are copied into the first node values and everything else starts at
//! zero. Hidden nodes are then computed in ascending index order, followed by
//! the outputs in ascending index order. Each node sums `weight * value` over
//! every source node using whatever values exist at that moment, adds its
//! bias and squashes the result with the logistic function. There is no
//! recurrence and no settling loop, so an edge only contributes when its
//! source was computed before its destination.

use crate::error::{NeatError, NeatResult};
use crate::genome::genome::Genome;
use crate::genome::topology::Topology;

/// Logistic squashing function `1 / (1 + e^-x)`
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Reusable scratch space for forward passes
///
/// Node values are kept here rather than inside the genome, so genomes can be
/// evaluated through shared references. Each call starts from zeroed values;
/// nothing carries over between calls.
#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    values: Vec<f32>,
    outputs: Vec<f32>,
}

impl Evaluator {
    /// Create an evaluator with empty scratch space
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one forward pass and return the output node values
    pub fn evaluate(
        &mut self,
        topology: &Topology,
        genome: &Genome,
        inputs: &[f32],
    ) -> NeatResult<&[f32]> {
        if inputs.len() != topology.input_count {
            return Err(NeatError::InputLength {
                expected: topology.input_count,
                actual: inputs.len(),
            });
        }
        genome.validate(topology)?;

        let node_count = genome.node_count();
        self.values.clear();
        self.values.extend_from_slice(inputs);
        self.values.resize(node_count, 0.0);

        for node in topology.hidden_range(node_count) {
            self.values[node] = self.activate(genome, node);
        }

        self.outputs.clear();
        for node in topology.output_range() {
            let value = self.activate(genome, node);
            self.values[node] = value;
            self.outputs.push(value);
        }

        Ok(&self.outputs)
    }

    /// Node values left by the most recent pass
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    fn activate(&self, genome: &Genome, node: usize) -> f32 {
        let sum = genome
            .edges()
            .incoming(node)
            .zip(&self.values)
            .fold(genome.bias(node), |acc, (weight, value)| acc + weight * value);
        sigmoid(sum)
    }
}

impl Topology {
    /// Run one forward pass with a throwaway evaluator
    pub fn evaluate(&self, genome: &Genome, inputs: &[f32]) -> NeatResult<Vec<f32>> {
        Evaluator::new()
            .evaluate(self, genome, inputs)
            .map(|outputs| outputs.to_vec())
    }
}
