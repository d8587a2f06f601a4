//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::{
    CrossValidator, TrainingConfig, DEFAULT_INPUT, DEFAULT_METRIC_OUTPUT, DEFAULT_MODEL_OUTPUT,
};

/// incomelr - Train and persist a census income classifier
#[derive(Parser, Debug)]
#[command(name = "incomelr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Headerless input CSV with the 15 census columns
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Directory for the model artifact (replaced if it exists)
    #[arg(short, long, default_value = DEFAULT_MODEL_OUTPUT)]
    pub model_output: PathBuf,

    /// CSV file for the held-out ROC-AUC (replaced if it exists)
    #[arg(long, default_value = DEFAULT_METRIC_OUTPUT)]
    pub metric_output: PathBuf,

    /// Fraction of cleaned rows used for training
    #[arg(long, default_value = "0.7", value_parser = validate_train_fraction)]
    pub train_fraction: f64,

    /// Seed for the train/test split and fold assignment
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Regularization strengths to search (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "0.1,0.01", value_parser = validate_reg_param)]
    pub reg_params: Vec<f64>,

    /// Number of cross-validation folds
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u64).range(2..))]
    pub num_folds: u64,

    /// Maximum number of folds evaluated at the same time
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u64).range(1..))]
    pub parallelism: u64,

    /// Optimizer iteration cap per fit
    #[arg(long, default_value = "100")]
    pub max_iterations: u64,

    /// Diagnostic log level (overridden by RUST_LOG)
    #[arg(long, default_value = "error")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a headerless CSV with a saved model artifact
    Score {
        /// Model artifact directory
        #[arg(short, long, default_value = DEFAULT_MODEL_OUTPUT)]
        model: PathBuf,

        /// Headerless input CSV with the 15 census columns
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV path (optional, defaults to input with '_scored' suffix)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Build the training configuration from the parsed flags.
    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            input: self.input.clone(),
            model_output: self.model_output.clone(),
            metric_output: self.metric_output.clone(),
            train_fraction: self.train_fraction,
            seed: self.seed,
            parallelism: self.parallelism as usize,
            cross_validator: CrossValidator {
                reg_params: self.reg_params.clone(),
                num_folds: self.num_folds as usize,
                seed: self.seed,
                max_iterations: self.max_iterations,
            },
        }
    }
}

/// Derive the scoring output path: same directory, '_scored' suffix.
pub fn scored_output_path(input: &std::path::Path) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| std::path::Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    parent.join(format!("{}_scored.csv", stem))
}

/// Validator for train_fraction parameter
fn validate_train_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!(
            "train_fraction must be between 0.0 and 1.0 (exclusive), got {}",
            value
        ))
    }
}

/// Validator for each regularization strength
fn validate_reg_param(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!(
            "reg_params must be finite and non-negative, got {}",
            value
        ))
    }
}
