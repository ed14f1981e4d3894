//! Network genome
//!
//! A genome is a set of nodes with biases and a dense edge matrix between all
//! node pairs, plus the fitness score assigned in the current generation.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{NeatError, NeatResult};
use crate::genome::matrix::EdgeMatrix;
use crate::genome::topology::Topology;
use crate::random;

/// A computational unit of a genome
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Bias added before squashing (unused for input nodes)
    pub bias: f32,
}

/// One evolvable network encoding
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    nodes: Vec<Node>,
    edges: EdgeMatrix,
    fitness: f32,
}

impl Genome {
    /// Create the starting genome of a population: every input is wired to
    /// every non-input node with a uniform weight in `[-1, 1]`, all biases
    /// are zero and no hidden nodes exist.
    pub fn minimal<R: Rng + ?Sized>(topology: Topology, rng: &mut R) -> Self {
        let node_count = topology.io_count();
        let mut edges = EdgeMatrix::zeros(node_count);
        for src in topology.input_range() {
            for dst in topology.input_count..node_count {
                edges.set(src, dst, random::signed_unit(rng));
            }
        }
        Self {
            nodes: vec![Node::default(); node_count],
            edges,
            fitness: 0.0,
        }
    }

    /// Create a genome from explicit nodes and edges
    pub fn from_parts(nodes: Vec<Node>, edges: EdgeMatrix) -> NeatResult<Self> {
        if nodes.len() != edges.size() {
            return Err(NeatError::GenomeShape(format!(
                "{} nodes but edge matrix sized for {}",
                nodes.len(),
                edges.size()
            )));
        }
        Ok(Self {
            nodes,
            edges,
            fitness: 0.0,
        })
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of hidden nodes under the given topology
    pub fn hidden_count(&self, topology: &Topology) -> usize {
        self.node_count().saturating_sub(topology.io_count())
    }

    /// Nodes in index order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edge matrix
    pub fn edges(&self) -> &EdgeMatrix {
        &self.edges
    }

    /// Mutable edge matrix
    pub fn edges_mut(&mut self) -> &mut EdgeMatrix {
        &mut self.edges
    }

    /// Bias of node `index`
    pub fn bias(&self, index: usize) -> f32 {
        self.nodes[index].bias
    }

    /// Set the bias of node `index`
    pub fn set_bias(&mut self, index: usize, bias: f32) {
        self.nodes[index].bias = bias;
    }

    /// Weight of `src → dst`
    pub fn weight(&self, src: usize, dst: usize) -> f32 {
        self.edges.get(src, dst)
    }

    /// Set the weight of `src → dst`
    pub fn set_weight(&mut self, src: usize, dst: usize, weight: f32) {
        self.edges.set(src, dst, weight);
    }

    /// Number of connections (nonzero weights)
    pub fn connection_count(&self) -> usize {
        self.edges.nonzero_count()
    }

    /// Fitness score assigned in the most recent generation
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    /// Set the fitness score
    pub fn set_fitness(&mut self, fitness: f32) {
        self.fitness = fitness;
    }

    /// Make this genome `node_count` nodes large. When the size changes the
    /// storage is replaced with zeroed storage; otherwise it is left as is and
    /// the caller is expected to overwrite every cell.
    pub(crate) fn reshape(&mut self, node_count: usize) {
        if self.node_count() != node_count {
            self.nodes = vec![Node::default(); node_count];
            self.edges = EdgeMatrix::zeros(node_count);
        }
    }

    /// Overwrite this genome with `donor`'s nodes and edges, enlarged by
    /// `extra_nodes` zero-biased, unconnected nodes. The fitness score is
    /// left untouched.
    pub fn copy_from(&mut self, donor: &Genome, extra_nodes: usize) {
        let node_count = donor.node_count() + extra_nodes;
        if extra_nodes == 0 && self.node_count() == node_count {
            self.nodes.copy_from_slice(&donor.nodes);
            self.edges
                .as_mut_slice()
                .copy_from_slice(donor.edges.as_slice());
            return;
        }
        let mut nodes = Vec::with_capacity(node_count);
        nodes.extend_from_slice(&donor.nodes);
        nodes.resize(node_count, Node::default());
        self.nodes = nodes;
        self.edges = EdgeMatrix::grown_from(&donor.edges, node_count);
    }

    /// Connections that a single forward pass cannot see correctly: edges
    /// into input nodes and edges whose source is evaluated at or after their
    /// destination (hidden nodes ascending, then outputs ascending).
    pub fn backward_edges(&self, topology: &Topology) -> Vec<(usize, usize)> {
        let n = self.node_count();
        self.edges
            .iter_nonzero()
            .map(|(flat, _)| self.edges.cell(flat))
            .filter(|&(src, dst)| {
                topology.is_input(dst)
                    || topology.evaluation_position(src, n)
                        >= topology.evaluation_position(dst, n)
            })
            .collect()
    }

    /// Whether every connection feeds forward in evaluation order
    pub fn is_forward_consistent(&self, topology: &Topology) -> bool {
        self.backward_edges(topology).is_empty()
    }

    /// Check that this genome can be evaluated under `topology`
    pub fn validate(&self, topology: &Topology) -> NeatResult<()> {
        if self.node_count() < topology.io_count() {
            return Err(NeatError::GenomeShape(format!(
                "genome has {} nodes, topology needs at least {}",
                self.node_count(),
                topology.io_count()
            )));
        }
        if self.edges.size() != self.node_count() {
            return Err(NeatError::GenomeShape(format!(
                "{} nodes but edge matrix sized for {}",
                self.node_count(),
                self.edges.size()
            )));
        }
        let cells = self.node_count().checked_mul(self.node_count());
        if cells != Some(self.edges.len()) {
            return Err(NeatError::GenomeShape(format!(
                "edge matrix for {} nodes holds {} weights",
                self.node_count(),
                self.edges.len()
            )));
        }
        Ok(())
    }
}
