//! Error types for the training pipeline.
//!
//! Every failure is fatal to a run. The variants classify failures so the
//! binary can report them and choose an exit code.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input file could not be opened or read.
    #[error("input unavailable: {path}")]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// The data does not have the expected shape or values.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Model fitting or evaluation could not produce a result.
    #[error("training failure: {0}")]
    TrainingFailure(String),

    /// An output artifact could not be written.
    #[error("failed to write output: {path}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// Run parameters are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A tabular operation failed inside a stage.
    #[error(transparent)]
    Data(#[from] PolarsError),
}

impl PipelineError {
    pub fn input_unavailable(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        PipelineError::InputUnavailable {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn output_write(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        PipelineError::OutputWrite {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Process exit code for this failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::InputUnavailable { .. } => 2,
            PipelineError::SchemaMismatch(_) | PipelineError::Data(_) => 3,
            PipelineError::TrainingFailure(_) => 4,
            PipelineError::OutputWrite { .. } => 5,
            PipelineError::InvalidConfig(_) => 1,
        }
    }
}

/// Result alias used throughout the pipeline.
pub type Result<T> = std::result::Result<T, PipelineError>;
