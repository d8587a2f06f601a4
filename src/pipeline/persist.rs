//! Model artifact and metric persistence
//!
//! Both outputs use overwrite semantics: whatever exists at the target path is
//! removed before writing. Concurrent runs against the same paths are not
//! coordinated here.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use ndarray::Array1;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::{PipelineError, Result};
use super::features::FittedFeaturePipeline;
use super::model::LogisticModel;
use super::tuning::GridResult;

/// Bumped when the artifact layout changes
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

const METADATA_FILE: &str = "metadata.json";
const PIPELINE_FILE: &str = "pipeline.json";
const CLASSIFIER_FILE: &str = "classifier.json";

/// Parameters and search results stored next to the fitted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub format_version: u32,
    /// Creation time (ISO 8601)
    pub created_at: String,
    pub crate_version: String,
    pub metric: String,
    pub train_fraction: f64,
    pub seed: u64,
    pub num_folds: usize,
    pub parallelism: usize,
    pub reg_params: Vec<f64>,
    pub results: Vec<GridResult>,
    pub best_reg_param: f64,
    pub feature_names: Vec<String>,
}

/// Fitted feature pipeline plus the selected classifier
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifact {
    pub metadata: ArtifactMetadata,
    pub pipeline: FittedFeaturePipeline,
    pub classifier: LogisticModel,
}

impl ModelArtifact {
    /// Positive-class probabilities for a cleaned frame.
    pub fn score(&self, df: &DataFrame) -> Result<Array1<f64>> {
        let encoded = self.pipeline.transform_features(df)?;
        self.classifier.predict_proba(&encoded.features)
    }
}

/// Write the artifact directory, replacing anything at `dir`.
pub fn save_model(dir: &Path, artifact: &ModelArtifact) -> Result<()> {
    clear_target(dir)?;
    fs::create_dir_all(dir).map_err(|e| PipelineError::output_write(dir, e))?;

    write_json(&dir.join(METADATA_FILE), &artifact.metadata)?;
    write_json(&dir.join(PIPELINE_FILE), &artifact.pipeline)?;
    write_json(&dir.join(CLASSIFIER_FILE), &artifact.classifier)?;

    info!(path = %dir.display(), "model artifact saved");
    Ok(())
}

/// Read an artifact directory written by [`save_model`].
pub fn load_model(dir: &Path) -> Result<ModelArtifact> {
    let metadata: ArtifactMetadata = read_json(&dir.join(METADATA_FILE))?;
    if metadata.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(PipelineError::SchemaMismatch(format!(
            "unsupported artifact format version {} (expected {})",
            metadata.format_version, ARTIFACT_FORMAT_VERSION
        )));
    }

    let pipeline: FittedFeaturePipeline = read_json(&dir.join(PIPELINE_FILE))?;
    let classifier: LogisticModel = read_json(&dir.join(CLASSIFIER_FILE))?;
    if classifier.num_features() != pipeline.width() {
        return Err(PipelineError::SchemaMismatch(format!(
            "classifier has {} coefficients but the pipeline produces {} features",
            classifier.num_features(),
            pipeline.width()
        )));
    }

    Ok(ModelArtifact {
        metadata,
        pipeline,
        classifier,
    })
}

/// Write a frame as headerless CSV, replacing anything at `path`.
pub fn save_metric(path: &Path, frame: &mut DataFrame) -> Result<()> {
    clear_target(path)?;
    let mut file = File::create(path).map_err(|e| PipelineError::output_write(path, e))?;
    CsvWriter::new(&mut file)
        .include_header(false)
        .finish(frame)
        .map_err(|e| PipelineError::output_write(path, e))?;

    info!(path = %path.display(), "metric saved");
    Ok(())
}

/// Write a frame as CSV with a header row, replacing anything at `path`.
pub fn save_frame(path: &Path, frame: &mut DataFrame) -> Result<()> {
    clear_target(path)?;
    let mut file = File::create(path).map_err(|e| PipelineError::output_write(path, e))?;
    CsvWriter::new(&mut file)
        .finish(frame)
        .map_err(|e| PipelineError::output_write(path, e))
}

/// Remove an existing file or directory at `path` and create its parent.
fn clear_target(path: &Path) -> Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path).map_err(|e| PipelineError::output_write(path, e))?;
    } else if path.exists() {
        fs::remove_file(path).map_err(|e| PipelineError::output_write(path, e))?;
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PipelineError::output_write(parent, e))?;
    }
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).map_err(|e| PipelineError::output_write(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| PipelineError::output_write(path, e))?;
    writer
        .flush()
        .map_err(|e| PipelineError::output_write(path, e))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| PipelineError::input_unavailable(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        PipelineError::SchemaMismatch(format!("invalid artifact file {}: {}", path.display(), e))
    })
}
