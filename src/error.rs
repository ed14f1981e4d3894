//! Error types for fast-neat
//!
//! This module defines all error types used throughout the library.

use std::io;

use thiserror::Error;

/// Error type for population checkpoint persistence
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// IO error while reading or writing a checkpoint
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Checkpoint version mismatch
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    /// Checkpoint file not found
    #[error("Checkpoint not found: {0}")]
    NotFound(String),

    /// Checkpoint contents are inconsistent
    #[error("Corrupted checkpoint: {0}")]
    Corrupted(String),
}

/// Top-level error type
#[derive(Debug, Error)]
pub enum NeatError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Input vector length does not match the population's input count
    #[error("Input length mismatch: expected {expected}, got {actual}")]
    InputLength { expected: usize, actual: usize },

    /// Genome storage does not fit the population topology
    #[error("Invalid genome shape: {0}")]
    GenomeShape(String),

    /// Empty population
    #[error("Empty population")]
    EmptyPopulation,

    /// A model write stopped part-way; the destination may be truncated
    #[error("Serialization incomplete after {written} bytes: {source}")]
    SerializationIncomplete {
        /// Bytes that reached the destination before the failure
        written: usize,
        /// The underlying write failure
        #[source]
        source: io::Error,
    },

    /// Model byte stream could not be parsed
    #[error("Malformed model data: {0}")]
    ModelFormat(String),

    /// Checkpoint error
    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
}

/// Result type alias for fast-neat operations
pub type NeatResult<T> = Result<T, NeatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_length_display() {
        let err = NeatError::InputLength {
            expected: 2,
            actual: 3,
        };
        assert_eq!(err.to_string(), "Input length mismatch: expected 2, got 3");
    }

    #[test]
    fn test_serialization_incomplete_display() {
        let err = NeatError::SerializationIncomplete {
            written: 16,
            source: io::Error::new(io::ErrorKind::WriteZero, "disk full"),
        };
        assert_eq!(
            err.to_string(),
            "Serialization incomplete after 16 bytes: disk full"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_neat_error_from_checkpoint_error() {
        let err: NeatError = CheckpointError::NotFound("pop.ckpt".to_string()).into();
        assert!(matches!(err, NeatError::Checkpoint(_)));
        assert_eq!(
            err.to_string(),
            "Checkpoint error: Checkpoint not found: pop.ckpt"
        );
    }

    #[test]
    fn test_checkpoint_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: CheckpointError = io_err.into();
        assert!(matches!(err, CheckpointError::Io(_)));
    }
}
