//! Dense edge weight matrix
//!
//! Cell `(src, dst)` holds the weight of the directed connection from node
//! `src` to node `dst`. A weight of exactly `0.0` means the connection is
//! absent. Cells are stored row-major, so the flat index of `(src, dst)` is
//! `src * size + dst`, which is also the index written to model files.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::{NeatError, NeatResult};

/// Square matrix of connection weights
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeMatrix {
    size: usize,
    weights: Vec<f32>,
}

impl EdgeMatrix {
    /// Create a `size × size` matrix with no connections
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            weights: vec![0.0; size * size],
        }
    }

    /// Create a matrix from row-major weights
    pub fn from_weights(size: usize, weights: Vec<f32>) -> NeatResult<Self> {
        if weights.len() != size * size {
            return Err(NeatError::GenomeShape(format!(
                "edge matrix of size {} needs {} weights, got {}",
                size,
                size * size,
                weights.len()
            )));
        }
        Ok(Self { size, weights })
    }

    /// Create a `new_size × new_size` matrix holding `source`'s cells at the
    /// same `(src, dst)` positions; the added rows and columns are zero.
    pub fn grown_from(source: &EdgeMatrix, new_size: usize) -> Self {
        assert!(
            new_size >= source.size,
            "cannot shrink an edge matrix from {} to {}",
            source.size,
            new_size
        );
        let mut grown = Self::zeros(new_size);
        for (src, row) in source.weights.chunks_exact(source.size.max(1)).enumerate() {
            let start = src * new_size;
            grown.weights[start..start + source.size].copy_from_slice(row);
        }
        grown
    }

    /// Number of nodes (rows and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of cells (`size²`)
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether the matrix has no cells
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Row-major flat index of `(src, dst)`
    #[inline]
    pub fn flat_index(&self, src: usize, dst: usize) -> usize {
        debug_assert!(
            src < self.size && dst < self.size,
            "edge ({}, {}) out of bounds for {} nodes",
            src,
            dst,
            self.size
        );
        src * self.size + dst
    }

    /// `(src, dst)` of a row-major flat index
    #[inline]
    pub fn cell(&self, flat_index: usize) -> (usize, usize) {
        debug_assert!(flat_index < self.weights.len());
        (flat_index / self.size, flat_index % self.size)
    }

    /// Weight of `src → dst`
    #[inline]
    pub fn get(&self, src: usize, dst: usize) -> f32 {
        self.weights[self.flat_index(src, dst)]
    }

    /// Set the weight of `src → dst`
    #[inline]
    pub fn set(&mut self, src: usize, dst: usize, weight: f32) {
        let idx = self.flat_index(src, dst);
        self.weights[idx] = weight;
    }

    /// Weights as a row-major slice
    pub fn as_slice(&self) -> &[f32] {
        &self.weights
    }

    /// Weights as a mutable row-major slice
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.weights
    }

    /// Column `dst`: the weights of every edge ending at `dst`, by source index
    pub fn incoming(&self, dst: usize) -> impl Iterator<Item = f32> + '_ {
        debug_assert!(dst < self.size);
        self.weights
            .iter()
            .skip(dst)
            .step_by(self.size.max(1))
            .copied()
    }

    /// Number of cells holding a connection
    pub fn nonzero_count(&self) -> usize {
        self.weights.iter().filter(|&&w| w != 0.0).count()
    }

    /// `(flat_index, weight)` of every connection, row-major ascending
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.weights
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, w)| w != 0.0)
    }
}

impl Index<(usize, usize)> for EdgeMatrix {
    type Output = f32;

    fn index(&self, (src, dst): (usize, usize)) -> &Self::Output {
        &self.weights[self.flat_index(src, dst)]
    }
}

impl IndexMut<(usize, usize)> for EdgeMatrix {
    fn index_mut(&mut self, (src, dst): (usize, usize)) -> &mut Self::Output {
        let idx = self.flat_index(src, dst);
        &mut self.weights[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let m = EdgeMatrix::zeros(3);
        assert_eq!(m.size(), 3);
        assert_eq!(m.len(), 9);
        assert_eq!(m.nonzero_count(), 0);
    }

    #[test]
    fn test_row_major_layout() {
        let mut m = EdgeMatrix::zeros(3);
        m.set(1, 2, 0.5);
        assert_eq!(m.flat_index(1, 2), 5);
        assert_eq!(m.as_slice()[5], 0.5);
        assert_eq!(m.cell(5), (1, 2));
        assert_eq!(m[(1, 2)], 0.5);
    }

    #[test]
    fn test_from_weights_rejects_wrong_length() {
        assert!(EdgeMatrix::from_weights(2, vec![0.0; 4]).is_ok());
        assert!(matches!(
            EdgeMatrix::from_weights(2, vec![0.0; 5]),
            Err(NeatError::GenomeShape(_))
        ));
    }

    #[test]
    fn test_grown_from_preserves_cells() {
        let m = EdgeMatrix::from_weights(2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let g = EdgeMatrix::grown_from(&m, 3);
        assert_eq!(g.size(), 3);
        assert_eq!(g.get(0, 0), 1.0);
        assert_eq!(g.get(0, 1), 2.0);
        assert_eq!(g.get(1, 0), 3.0);
        assert_eq!(g.get(1, 1), 4.0);
        for i in 0..3 {
            assert_eq!(g.get(i, 2), 0.0);
            assert_eq!(g.get(2, i), 0.0);
        }
    }

    #[test]
    fn test_incoming_column() {
        let m = EdgeMatrix::from_weights(3, (0..9).map(|v| v as f32).collect()).unwrap();
        let column: Vec<f32> = m.incoming(1).collect();
        assert_eq!(column, vec![1.0, 4.0, 7.0]);
    }

    #[test]
    fn test_iter_nonzero() {
        let mut m = EdgeMatrix::zeros(3);
        m.set(2, 0, -0.25);
        m.set(0, 1, 0.75);
        let edges: Vec<(usize, f32)> = m.iter_nonzero().collect();
        assert_eq!(edges, vec![(1, 0.75), (6, -0.25)]);
        assert_eq!(m.nonzero_count(), 2);
    }
}
