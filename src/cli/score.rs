//! Scoring a dataset with a saved model artifact

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use polars::prelude::*;
use tracing::debug;

use super::args::scored_output_path;
use crate::pipeline::{
    self, clean_dataset, load_dataset, load_model, roc_auc, save_frame, ModelArtifact,
};
use crate::utils::{create_spinner, finish_with_success, print_info};

/// Predictions for a cleaned frame
#[derive(Debug)]
pub struct ScoredFrame {
    /// `probability` and `prediction` columns, one row per input row
    pub predictions: DataFrame,
    /// ROC-AUC when every label in the input is known to the artifact
    pub auc: Option<f64>,
}

/// Score a cleaned frame with an artifact.
pub fn score_frame(artifact: &ModelArtifact, df: &DataFrame) -> pipeline::Result<ScoredFrame> {
    let probabilities = artifact.score(df)?;
    let labels = &artifact.pipeline.label_indexer;

    let predicted: Vec<&str> = probabilities
        .iter()
        .map(|&p| {
            let index = usize::from(p >= artifact.classifier.threshold);
            labels.label(index).unwrap_or_default()
        })
        .collect();

    let auc = match artifact.pipeline.index_labels(df) {
        Ok(truth) => roc_auc(&probabilities.to_vec(), &truth.to_vec()),
        Err(err) => {
            debug!(error = %err, "input labels unusable for ROC-AUC");
            None
        }
    };

    let predictions = DataFrame::new(vec![
        Column::new("probability".into(), probabilities.to_vec()),
        Column::new("prediction".into(), predicted),
    ])?;

    Ok(ScoredFrame { predictions, auc })
}

/// Run the `score` subcommand
pub fn run_score(model: &Path, input: &Path, output: Option<&Path>) -> Result<()> {
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| scored_output_path(input));

    println!("\n {} Scoring with saved model", style("◆").cyan().bold());
    println!("   Model:  {}", style(model.display()).dim());
    println!("   Input:  {}", style(input.display()).dim());
    println!("   Output: {}", style(output_path.display()).dim());
    println!();

    let spinner = create_spinner("Loading model artifact...");
    let artifact = load_model(model)
        .with_context(|| format!("Failed to load model from {}", model.display()))?;
    finish_with_success(
        &spinner,
        &format!(
            "Model loaded (reg_param {}, {} features)",
            artifact.classifier.reg_param,
            artifact.pipeline.width()
        ),
    );

    let spinner = create_spinner("Loading and cleaning input...");
    let raw = load_dataset(input)?;
    let (cleaned, report) = clean_dataset(&raw)?;
    finish_with_success(
        &spinner,
        &format!("{} rows ready ({} dropped)", cleaned.height(), report.dropped_rows),
    );

    let spinner = create_spinner("Scoring...");
    let mut scored = score_frame(&artifact, &cleaned)?;
    save_frame(&output_path, &mut scored.predictions)?;
    finish_with_success(&spinner, &format!("Saved to {}", output_path.display()));

    match scored.auc {
        Some(auc) => print_info(&format!("ROC-AUC on input labels: {:.4}", auc)),
        None => print_info("Input labels unavailable for ROC-AUC"),
    }

    println!();
    println!(" {} Scoring complete!", style("✓").green().bold());
    Ok(())
}
