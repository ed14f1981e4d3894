//! Node layout shared by every genome of a population

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Input/output layout of a population
///
/// Node indices are partitioned as `[0, input_count)` for inputs,
/// `[input_count, input_count + output_count)` for outputs, and everything
/// above for hidden nodes. This is also the context handed to fitness
/// callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Topology {
    /// Number of input nodes
    pub input_count: usize,
    /// Number of output nodes
    pub output_count: usize,
}

impl Topology {
    /// Create a new topology
    pub fn new(input_count: usize, output_count: usize) -> Self {
        Self {
            input_count,
            output_count,
        }
    }

    /// Number of input plus output nodes (the minimal node count)
    pub fn io_count(&self) -> usize {
        self.input_count + self.output_count
    }

    /// Index range of the input nodes
    pub fn input_range(&self) -> Range<usize> {
        0..self.input_count
    }

    /// Index range of the output nodes
    pub fn output_range(&self) -> Range<usize> {
        self.input_count..self.io_count()
    }

    /// Index range of the hidden nodes of a genome with `node_count` nodes
    pub fn hidden_range(&self, node_count: usize) -> Range<usize> {
        self.io_count()..node_count.max(self.io_count())
    }

    /// Whether `index` is an input node
    pub fn is_input(&self, index: usize) -> bool {
        index < self.input_count
    }

    /// Position of `index` in the forward pass of a genome with `node_count`
    /// nodes. Inputs share position 0; hidden nodes come next in ascending
    /// order, then outputs in ascending order.
    pub fn evaluation_position(&self, index: usize, node_count: usize) -> usize {
        let io = self.io_count();
        if index < self.input_count {
            0
        } else if index >= io {
            1 + (index - io)
        } else {
            1 + (node_count - io) + (index - self.input_count)
        }
    }
}
