//! Model file parser
//!
//! Reads back the layout written by [`Model::write_to`]. It checks the
//! structure but does not run networks.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::error::{NeatError, NeatResult};
use crate::genome::matrix::EdgeMatrix;
use crate::model::model::{Model, MAX_NODE_COUNT};

/// Fixed header of a model file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelHeader {
    pub input_count: u32,
    pub output_count: u32,
    pub node_count: u32,
    pub edge_count: u32,
}

/// Parsed contents of a model file
#[derive(Clone, Debug, PartialEq)]
pub struct ModelFile {
    pub header: ModelHeader,
    /// Biases of the non-input nodes, ascending
    pub biases: Vec<f32>,
    /// `(flat_index, weight)` records in file order
    pub edges: Vec<(u32, f32)>,
}

impl ModelFile {
    /// Parse a model from `reader`, consuming exactly one model
    pub fn read_from<R: Read>(mut reader: R) -> NeatResult<Self> {
        let header = ModelHeader {
            input_count: read_u32(&mut reader, "header")?,
            output_count: read_u32(&mut reader, "header")?,
            node_count: read_u32(&mut reader, "header")?,
            edge_count: read_u32(&mut reader, "header")?,
        };

        if header.node_count as usize > MAX_NODE_COUNT {
            return Err(NeatError::ModelFormat(format!(
                "node count {} exceeds the limit of {}",
                header.node_count, MAX_NODE_COUNT
            )));
        }
        let io_count = u64::from(header.input_count) + u64::from(header.output_count);
        if u64::from(header.node_count) < io_count {
            return Err(NeatError::ModelFormat(format!(
                "node count {} is below input + output count {}",
                header.node_count, io_count
            )));
        }
        let cells = u64::from(header.node_count) * u64::from(header.node_count);
        if u64::from(header.edge_count) > cells {
            return Err(NeatError::ModelFormat(format!(
                "edge count {} exceeds the {} cells of the matrix",
                header.edge_count, cells
            )));
        }

        let mut biases = Vec::new();
        for _ in header.input_count..header.node_count {
            biases.push(read_f32(&mut reader, "biases")?);
        }

        let mut edges: Vec<(u32, f32)> = Vec::new();
        for _ in 0..header.edge_count {
            let index = read_u32(&mut reader, "edges")?;
            let weight = read_f32(&mut reader, "edges")?;
            if u64::from(index) >= cells {
                return Err(NeatError::ModelFormat(format!(
                    "edge index {} outside a {}x{} matrix",
                    index, header.node_count, header.node_count
                )));
            }
            if let Some(&(previous, _)) = edges.last() {
                if index <= previous {
                    return Err(NeatError::ModelFormat(format!(
                        "edge index {} follows {}; indices must ascend",
                        index, previous
                    )));
                }
            }
            edges.push((index, weight));
        }

        Ok(Self {
            header,
            biases,
            edges,
        })
    }

    /// Parse a model that occupies all of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> NeatResult<Self> {
        let mut rest = bytes;
        let file = Self::read_from(&mut rest)?;
        if !rest.is_empty() {
            return Err(NeatError::ModelFormat(format!(
                "{} trailing bytes after the last edge",
                rest.len()
            )));
        }
        Ok(file)
    }

    /// Parse the model file at `path`
    pub fn load(path: impl AsRef<Path>) -> NeatResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            NeatError::ModelFormat(format!("cannot open {}: {}", path.display(), e))
        })?;
        let mut bytes = Vec::new();
        BufReader::new(file)
            .read_to_end(&mut bytes)
            .map_err(|e| NeatError::ModelFormat(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_bytes(&bytes)
    }

    /// Rebuild the dense model. Input biases are not stored and come back as
    /// zero.
    pub fn into_model(self) -> NeatResult<Model> {
        let input_count = self.header.input_count as usize;
        let node_count = self.header.node_count as usize;

        let mut biases = vec![0.0; input_count];
        biases.extend(self.biases);

        let mut edges = EdgeMatrix::zeros(node_count);
        for (index, weight) in self.edges {
            edges.as_mut_slice()[index as usize] = weight;
        }
        let model = Model::from_raw(input_count, self.header.output_count as usize, biases, edges);
        if model.edge_count() != self.header.edge_count as usize {
            return Err(NeatError::ModelFormat(format!(
                "header declares {} edges but {} are nonzero",
                self.header.edge_count,
                model.edge_count()
            )));
        }
        Ok(model)
    }
}

fn read_word<R: Read>(reader: &mut R, section: &str) -> NeatResult<[u8; 4]> {
    let mut word = [0u8; 4];
    reader.read_exact(&mut word).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => {
            NeatError::ModelFormat(format!("model data truncated in {}", section))
        }
        _ => NeatError::ModelFormat(format!("cannot read {}: {}", section, e)),
    })?;
    Ok(word)
}

fn read_u32<R: Read>(reader: &mut R, section: &str) -> NeatResult<u32> {
    read_word(reader, section).map(u32::from_le_bytes)
}

fn read_f32<R: Read>(reader: &mut R, section: &str) -> NeatResult<f32> {
    read_word(reader, section).map(f32::from_le_bytes)
}
