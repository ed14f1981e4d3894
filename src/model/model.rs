//! Extracted network model and its binary writer
//!
//! File layout, all fields little-endian:
//!
//! ```text
//! header   input_count: u32, output_count: u32, node_count: u32, edge_count: u32
//! biases   f32 × (node_count - input_count), one per non-input node, ascending
//! edges    (index: u32, weight: f32) × edge_count, index = src * node_count + dst,
//!          ascending, nonzero weights only
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::error::{NeatError, NeatResult};
use crate::genome::genome::Genome;
use crate::genome::matrix::EdgeMatrix;
use crate::genome::topology::Topology;

/// Size of the fixed header in bytes
pub const HEADER_LEN: usize = 16;

/// Largest node count a model file may declare. Readers allocate the dense
/// `node_count²` matrix up front, so this bounds what a header can request.
pub const MAX_NODE_COUNT: usize = 4096;

/// Immutable snapshot of one genome, decoupled from evaluation
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    input_count: usize,
    output_count: usize,
    node_count: usize,
    edge_count: usize,
    biases: Vec<f32>,
    edges: EdgeMatrix,
}

impl Model {
    /// Deep-copy a genome's biases and edge matrix.
    ///
    /// Fails with [`NeatError::GenomeShape`] when the genome cannot belong to
    /// `topology`.
    pub fn extract(topology: &Topology, genome: &Genome) -> NeatResult<Self> {
        genome.validate(topology)?;
        let edges = genome.edges().clone();
        Ok(Self {
            input_count: topology.input_count,
            output_count: topology.output_count,
            node_count: genome.node_count(),
            edge_count: edges.nonzero_count(),
            biases: genome.nodes().iter().map(|node| node.bias).collect(),
            edges,
        })
    }

    pub(crate) fn from_raw(
        input_count: usize,
        output_count: usize,
        biases: Vec<f32>,
        edges: EdgeMatrix,
    ) -> Self {
        Self {
            input_count,
            output_count,
            node_count: edges.size(),
            edge_count: edges.nonzero_count(),
            biases,
            edges,
        }
    }

    pub fn input_count(&self) -> usize {
        self.input_count
    }

    pub fn output_count(&self) -> usize {
        self.output_count
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of nonzero edge cells
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Bias of every node, inputs included
    pub fn biases(&self) -> &[f32] {
        &self.biases
    }

    pub fn edges(&self) -> &EdgeMatrix {
        &self.edges
    }

    /// Exact size of the serialized form in bytes
    pub fn serialized_len(&self) -> usize {
        HEADER_LEN + 4 * self.node_count.saturating_sub(self.input_count) + 8 * self.edge_count
    }

    /// Serialize into a fresh buffer
    pub fn to_bytes(&self) -> NeatResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.serialized_len());
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    /// Serialize into `writer`, returning the number of bytes written.
    ///
    /// The first failing write aborts the rest and is reported as
    /// [`NeatError::SerializationIncomplete`] with the bytes that made it out.
    pub fn write_to<W: Write>(&self, writer: W) -> NeatResult<usize> {
        let header = self.header()?;
        let mut writer = CountingWriter::new(writer);
        let result = self
            .write_fields(&mut writer, &header)
            .and_then(|()| writer.flush());
        let written = writer.written();
        result
            .map(|()| written)
            .map_err(|source| NeatError::SerializationIncomplete { written, source })
    }

    /// Serialize to a file at `path`, returning the number of bytes written.
    ///
    /// The file is closed on every path; after a failure it may be truncated.
    pub fn save(&self, path: impl AsRef<Path>) -> NeatResult<usize> {
        let path = path.as_ref();
        let header = self.header()?;
        let file = File::create(path)
            .map_err(|source| NeatError::SerializationIncomplete { written: 0, source })?;

        let mut writer = BufWriter::new(CountingWriter::new(file));
        let result = self
            .write_fields(&mut writer, &header)
            .and_then(|()| writer.flush());
        // Drop any bytes still buffered after a failure instead of retrying them
        let (counter, _) = writer.into_parts();
        let written = counter.written();

        match result {
            Ok(()) => {
                info!(
                    path = %path.display(),
                    bytes = written,
                    nodes = self.node_count,
                    edges = self.edge_count,
                    "model saved"
                );
                Ok(written)
            }
            Err(source) => {
                warn!(path = %path.display(), written, error = %source, "model write aborted");
                Err(NeatError::SerializationIncomplete { written, source })
            }
        }
    }

    fn header(&self) -> NeatResult<[u32; 4]> {
        let narrow = |name: &str, value: usize| {
            u32::try_from(value).map_err(|_| {
                NeatError::ModelFormat(format!("{} {} does not fit in 32 bits", name, value))
            })
        };
        if self.input_count.saturating_add(self.output_count) > self.node_count
            || self.biases.len() != self.node_count
        {
            return Err(NeatError::ModelFormat(format!(
                "{} inputs and {} outputs do not fit {} nodes with {} biases",
                self.input_count,
                self.output_count,
                self.node_count,
                self.biases.len()
            )));
        }
        if self.node_count > MAX_NODE_COUNT {
            return Err(NeatError::ModelFormat(format!(
                "{} nodes exceed the model limit of {}",
                self.node_count, MAX_NODE_COUNT
            )));
        }
        Ok([
            narrow("input count", self.input_count)?,
            narrow("output count", self.output_count)?,
            narrow("node count", self.node_count)?,
            narrow("edge count", self.edge_count)?,
        ])
    }

    fn write_fields<W: Write>(&self, writer: &mut W, header: &[u32; 4]) -> io::Result<()> {
        for field in header {
            writer.write_all(&field.to_le_bytes())?;
        }
        for bias in &self.biases[self.input_count..] {
            writer.write_all(&bias.to_le_bytes())?;
        }
        for (index, weight) in self.edges.iter_nonzero() {
            writer.write_all(&(index as u32).to_le_bytes())?;
            writer.write_all(&weight.to_le_bytes())?;
        }
        Ok(())
    }
}

/// Writer adapter that counts the bytes accepted by the inner writer
struct CountingWriter<W> {
    inner: W,
    written: usize,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    fn written(&self) -> usize {
        self.written
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
