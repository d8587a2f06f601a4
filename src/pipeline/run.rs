//! End-to-end training run: ingestion, cleaning, split, feature pipeline,
//! model selection, evaluation and persistence.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::info;

use super::cleaning::{clean_dataset, CleaningReport};
use super::error::{PipelineError, Result};
use super::evaluation::{evaluate_auc, metric_frame};
use super::features::FeaturePipeline;
use super::loader::load_dataset;
use super::persist::{save_metric, save_model, ArtifactMetadata, ModelArtifact, ARTIFACT_FORMAT_VERSION};
use super::session::Session;
use super::split::random_split;
use super::tuning::{CrossValidator, GridResult};

/// Default locations, relative to the working directory
pub const DEFAULT_INPUT: &str = "data/dataset.csv";
pub const DEFAULT_MODEL_OUTPUT: &str = "data/model";
pub const DEFAULT_METRIC_OUTPUT: &str = "data/auc.csv";

pub const DEFAULT_TRAIN_FRACTION: f64 = 0.7;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_PARALLELISM: usize = 3;

/// Metric name recorded in the artifact
pub const METRIC_NAME: &str = "areaUnderROC";

/// Parameters of one training run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub input: PathBuf,
    pub model_output: PathBuf,
    pub metric_output: PathBuf,
    pub train_fraction: f64,
    pub seed: u64,
    pub parallelism: usize,
    pub cross_validator: CrossValidator,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            model_output: PathBuf::from(DEFAULT_MODEL_OUTPUT),
            metric_output: PathBuf::from(DEFAULT_METRIC_OUTPUT),
            train_fraction: DEFAULT_TRAIN_FRACTION,
            seed: DEFAULT_SEED,
            parallelism: DEFAULT_PARALLELISM,
            cross_validator: CrossValidator {
                seed: DEFAULT_SEED,
                ..CrossValidator::default()
            },
        }
    }
}

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ingestion,
    Cleaning,
    Split,
    FeaturePipeline,
    ModelSelection,
    Evaluation,
    Persistence,
}

impl Stage {
    pub fn number(&self) -> u8 {
        *self as u8 + 1
    }

    pub fn title(&self) -> &'static str {
        match self {
            Stage::Ingestion => "Ingestion",
            Stage::Cleaning => "Cleaning",
            Stage::Split => "Train/Test Split",
            Stage::FeaturePipeline => "Feature Pipeline",
            Stage::ModelSelection => "Model Selection",
            Stage::Evaluation => "Evaluation",
            Stage::Persistence => "Persistence",
        }
    }
}

/// Receives stage boundaries during a run
pub trait RunObserver {
    fn stage_started(&mut self, _stage: Stage) {}
    fn stage_finished(&mut self, _stage: Stage, _elapsed: Duration, _detail: &str) {}
}

/// Observer that ignores every event
pub struct SilentObserver;

impl RunObserver for SilentObserver {}

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub loaded_rows: usize,
    pub cleaning: CleaningReport,
    pub train_rows: usize,
    pub test_rows: usize,
    pub feature_count: usize,
    pub unseen_test_values: Vec<(String, usize)>,
    pub results: Vec<GridResult>,
    pub best_reg_param: f64,
    pub test_auc: f64,
    pub stage_times: Vec<(Stage, Duration)>,
}

/// Run every stage once, in order. Any failure aborts the run.
pub fn run_training(
    config: &TrainingConfig,
    session: &Session,
    observer: &mut dyn RunObserver,
) -> Result<TrainingOutcome> {
    let mut stages = StageClock::new(observer);

    stages.begin(Stage::Ingestion);
    let raw = load_dataset(&config.input)?;
    let loaded_rows = raw.height();
    stages.end(format!("{} rows", loaded_rows));

    stages.begin(Stage::Cleaning);
    let (cleaned, cleaning) = clean_dataset(&raw)?;
    drop(raw);
    if cleaned.height() == 0 {
        return Err(PipelineError::SchemaMismatch(
            "no complete rows left after cleaning".to_string(),
        ));
    }
    stages.end(format!(
        "{} rows kept, {} dropped",
        cleaning.output_rows(),
        cleaning.dropped_rows
    ));

    stages.begin(Stage::Split);
    let (train, test) = random_split(&cleaned, config.train_fraction, config.seed)?;
    stages.end(format!("{} train / {} test", train.height(), test.height()));

    stages.begin(Stage::FeaturePipeline);
    let fitted = FeaturePipeline::default().fit(&train)?;
    let train_features = fitted.transform(&train)?;
    let test_features = fitted.transform(&test)?;
    stages.end(format!("{} features", fitted.width()));

    stages.begin(Stage::ModelSelection);
    let cv_model = config.cross_validator.fit(session, &train_features)?;
    stages.end(format!("best reg_param {}", cv_model.best_reg_param()));

    stages.begin(Stage::Evaluation);
    let scores = cv_model.best.predict_proba(&test_features.features)?;
    let test_auc = evaluate_auc(&scores.to_vec(), &test_features.labels.to_vec())?;
    info!(test_auc, "held-out split evaluated");
    stages.end(format!("ROC-AUC {:.4}", test_auc));

    stages.begin(Stage::Persistence);
    let artifact = ModelArtifact {
        metadata: ArtifactMetadata {
            format_version: ARTIFACT_FORMAT_VERSION,
            created_at: Utc::now().to_rfc3339(),
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            metric: METRIC_NAME.to_string(),
            train_fraction: config.train_fraction,
            seed: config.seed,
            num_folds: config.cross_validator.num_folds,
            parallelism: session.parallelism(),
            reg_params: config.cross_validator.reg_params.clone(),
            results: cv_model.results.clone(),
            best_reg_param: cv_model.best_reg_param(),
            feature_names: fitted.feature_names(),
        },
        pipeline: fitted,
        classifier: cv_model.best.clone(),
    };
    save_model(&config.model_output, &artifact)?;
    let mut metric = metric_frame(test_auc)?;
    save_metric(&config.metric_output, &mut metric)?;
    stages.end(format!("{} and {}", config.model_output.display(), config.metric_output.display()));

    Ok(TrainingOutcome {
        loaded_rows,
        cleaning,
        train_rows: train.height(),
        test_rows: test.height(),
        feature_count: artifact.pipeline.width(),
        unseen_test_values: test_features.unseen,
        best_reg_param: cv_model.best_reg_param(),
        results: cv_model.results,
        test_auc,
        stage_times: stages.finish(),
    })
}

/// Times stages and forwards their boundaries to the observer
struct StageClock<'a> {
    observer: &'a mut dyn RunObserver,
    current: Option<(Stage, Instant)>,
    times: Vec<(Stage, Duration)>,
}

impl<'a> StageClock<'a> {
    fn new(observer: &'a mut dyn RunObserver) -> Self {
        Self {
            observer,
            current: None,
            times: Vec::new(),
        }
    }

    fn begin(&mut self, stage: Stage) {
        self.observer.stage_started(stage);
        self.current = Some((stage, Instant::now()));
    }

    fn end(&mut self, detail: String) {
        if let Some((stage, started)) = self.current.take() {
            let elapsed = started.elapsed();
            self.observer.stage_finished(stage, elapsed, &detail);
            self.times.push((stage, elapsed));
        }
    }

    fn finish(self) -> Vec<(Stage, Duration)> {
        self.times
    }
}
