//! Checkpoint recovery and persistence
//!
//! Provides serialization to/from files with versioning.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::state::{Checkpoint, CHECKPOINT_VERSION};
use crate::error::CheckpointError;

/// Magic bytes following the version in binary checkpoints
const MAGIC: &[u8; 4] = b"NEAT";

/// Format for checkpoint serialization
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CheckpointFormat {
    /// JSON format (human-readable, larger). Every score must be finite:
    /// JSON has no representation for NaN or infinities.
    Json,
    /// Binary format (compact, exact)
    #[default]
    Binary,
}

impl CheckpointFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Binary => "ckpt",
        }
    }
}

/// Save a checkpoint to a file
pub fn save_checkpoint(
    checkpoint: &Checkpoint,
    path: impl AsRef<Path>,
    format: CheckpointFormat,
) -> Result<(), CheckpointError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    match format {
        CheckpointFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, checkpoint)
                .map_err(|e| CheckpointError::Serialization(e.to_string()))?;
        }
        CheckpointFormat::Binary => {
            writer.write_all(&CHECKPOINT_VERSION.to_le_bytes())?;
            writer.write_all(MAGIC)?;
            bincode::serialize_into(&mut writer, checkpoint)
                .map_err(|e| CheckpointError::Serialization(e.to_string()))?;
        }
    }

    writer.flush()?;
    info!(
        path = %path.display(),
        generation = checkpoint.generation,
        ?format,
        "checkpoint saved"
    );
    Ok(())
}

/// Load a checkpoint from a file, detecting its format
pub fn load_checkpoint(path: impl AsRef<Path>) -> Result<Checkpoint, CheckpointError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CheckpointError::NotFound(path.display().to_string()));
    }

    let mut bytes = Vec::new();
    BufReader::new(File::open(path)?).read_to_end(&mut bytes)?;

    let (checkpoint, format): (Checkpoint, _) = if bytes.len() >= 8 && &bytes[4..8] == MAGIC {
        let version = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if version > CHECKPOINT_VERSION {
            return Err(CheckpointError::VersionMismatch {
                expected: CHECKPOINT_VERSION,
                found: version,
            });
        }
        let checkpoint = bincode::deserialize(&bytes[8..])
            .map_err(|e| CheckpointError::Deserialization(e.to_string()))?;
        (checkpoint, CheckpointFormat::Binary)
    } else {
        let checkpoint = serde_json::from_slice(&bytes)
            .map_err(|e| CheckpointError::Deserialization(e.to_string()))?;
        (checkpoint, CheckpointFormat::Json)
    };

    info!(
        path = %path.display(),
        generation = checkpoint.generation,
        genomes = checkpoint.genomes.len(),
        ?format,
        "checkpoint loaded"
    );
    Ok(checkpoint)
}

/// Checkpoint manager for periodic saving
pub struct CheckpointManager {
    /// Directory for checkpoint files
    pub directory: PathBuf,
    /// Base filename for checkpoints
    pub base_name: String,
    /// Serialization format
    pub format: CheckpointFormat,
    /// How many checkpoints to keep
    pub keep_n: usize,
    /// Save interval (generations)
    pub interval: usize,
    current_index: usize,
}

impl CheckpointManager {
    /// Create a new checkpoint manager
    pub fn new(directory: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            base_name: base_name.into(),
            format: CheckpointFormat::Binary,
            keep_n: 3,
            interval: 100,
            current_index: 0,
        }
    }

    /// Set the serialization format
    pub fn with_format(mut self, format: CheckpointFormat) -> Self {
        self.format = format;
        self
    }

    /// Set how many checkpoints to keep
    pub fn keep(mut self, n: usize) -> Self {
        self.keep_n = n;
        self
    }

    /// Set the save interval
    pub fn every(mut self, generations: usize) -> Self {
        self.interval = generations;
        self
    }

    /// Check if a checkpoint should be saved at this generation
    pub fn should_save(&self, generation: usize) -> bool {
        self.interval > 0 && generation > 0 && generation % self.interval == 0
    }

    fn path_for(&self, index: usize) -> PathBuf {
        self.directory.join(format!(
            "{}_{:04}.{}",
            self.base_name,
            index,
            self.format.extension()
        ))
    }

    /// Path the next checkpoint will be written to
    pub fn current_path(&self) -> PathBuf {
        self.path_for(self.current_index)
    }

    /// Save a checkpoint and rotate old ones
    pub fn save(&mut self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        std::fs::create_dir_all(&self.directory)?;

        let path = self.current_path();
        save_checkpoint(checkpoint, &path, self.format)?;
        debug!(index = self.current_index, keep = self.keep_n, "checkpoint rotated in");

        self.current_index += 1;
        if self.current_index > self.keep_n {
            let old_path = self.path_for(self.current_index - self.keep_n - 1);
            if let Err(e) = std::fs::remove_file(&old_path) {
                warn!(path = %old_path.display(), error = %e, "could not remove old checkpoint");
            }
        }

        Ok(())
    }

    /// Load the checkpoint with the highest generation, skipping unreadable files
    pub fn load_latest(&self) -> Result<Option<Checkpoint>, CheckpointError> {
        if !self.directory.exists() {
            return Ok(None);
        }

        let prefix = format!("{}_", self.base_name);
        let suffix = format!(".{}", self.format.extension());
        let mut latest: Option<Checkpoint> = None;
        for entry in std::fs::read_dir(&self.directory)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(&prefix) || !name.ends_with(&suffix) {
                continue;
            }
            match load_checkpoint(entry.path()) {
                Ok(checkpoint) => {
                    if latest
                        .as_ref()
                        .map_or(true, |best| checkpoint.generation > best.generation)
                    {
                        latest = Some(checkpoint);
                    }
                }
                Err(e) => warn!(file = %name, error = %e, "skipping unreadable checkpoint"),
            }
        }

        Ok(latest)
    }
}
