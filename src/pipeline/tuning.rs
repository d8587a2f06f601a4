//! Cross-validated selection of the regularization strength

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::{PipelineError, Result};
use super::evaluation::roc_auc;
use super::features::LabeledFeatures;
use super::model::{fit_logistic, LogisticModel};
use super::session::Session;
use crate::utils::create_progress_bar;

/// Default regularization grid
pub const DEFAULT_REG_PARAMS: [f64; 2] = [0.1, 0.01];

/// Default number of folds
pub const DEFAULT_NUM_FOLDS: usize = 5;

/// Default optimizer iteration cap
pub const DEFAULT_MAX_ITERATIONS: u64 = 100;

/// K-fold grid search over logistic regression regularization strengths,
/// scored by ROC-AUC.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossValidator {
    pub reg_params: Vec<f64>,
    pub num_folds: usize,
    pub seed: u64,
    pub max_iterations: u64,
}

impl Default for CrossValidator {
    fn default() -> Self {
        Self {
            reg_params: DEFAULT_REG_PARAMS.to_vec(),
            num_folds: DEFAULT_NUM_FOLDS,
            seed: 42,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Outcome of evaluating one grid point on one fold
#[derive(Debug, Clone, PartialEq)]
pub enum FoldOutcome {
    Scored(f64),
    /// Fold skipped because a side of it holds a single class
    Excluded(String),
}

/// Cross-validation results for one grid point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridResult {
    pub reg_param: f64,
    /// Mean ROC-AUC over scored folds
    pub avg_metric: f64,
    /// Per-fold ROC-AUC, `None` for excluded folds
    pub fold_metrics: Vec<Option<f64>>,
    pub excluded_folds: Vec<usize>,
}

/// Best model refit on the full training data, plus the search results
#[derive(Debug, Clone)]
pub struct CrossValidatorModel {
    pub best: LogisticModel,
    pub best_index: usize,
    pub results: Vec<GridResult>,
}

impl CrossValidatorModel {
    pub fn best_reg_param(&self) -> f64 {
        self.results[self.best_index].reg_param
    }

    pub fn best_avg_metric(&self) -> f64 {
        self.results[self.best_index].avg_metric
    }
}

/// Fold id for each row: a seeded shuffle dealt round-robin into `num_folds`.
pub fn fold_assignments(n_rows: usize, num_folds: usize, seed: u64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n_rows).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let mut folds = vec![0; n_rows];
    for (position, row) in order.into_iter().enumerate() {
        folds[row] = position % num_folds;
    }
    folds
}

impl CrossValidator {
    pub fn validate(&self) -> Result<()> {
        if self.reg_params.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "regularization grid is empty".to_string(),
            ));
        }
        if let Some(bad) = self
            .reg_params
            .iter()
            .find(|p| !p.is_finite() || **p < 0.0)
        {
            return Err(PipelineError::InvalidConfig(format!(
                "regularization strength must be finite and non-negative, got {}",
                bad
            )));
        }
        if self.num_folds < 2 {
            return Err(PipelineError::InvalidConfig(format!(
                "cross-validation needs at least 2 folds, got {}",
                self.num_folds
            )));
        }
        if self.max_iterations == 0 {
            return Err(PipelineError::InvalidConfig(
                "max iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Run the grid search on the session's pool and refit the best grid point
    /// on all of `data`.
    ///
    /// A fold whose training or validation part holds a single class is
    /// excluded from its grid point's average. The search fails when a grid
    /// point has no scored fold left.
    pub fn fit(&self, session: &Session, data: &LabeledFeatures) -> Result<CrossValidatorModel> {
        self.validate()?;

        let n_rows = data.n_rows();
        if n_rows < self.num_folds {
            return Err(PipelineError::TrainingFailure(format!(
                "{} training rows cannot be split into {} folds",
                n_rows, self.num_folds
            )));
        }

        let assignments = fold_assignments(n_rows, self.num_folds, self.seed);
        let splits: Vec<(Vec<usize>, Vec<usize>)> = (0..self.num_folds)
            .map(|fold| {
                (0..n_rows).partition(|&row| assignments[row] != fold)
            })
            .collect();

        let tasks: Vec<(usize, usize)> = (0..self.reg_params.len())
            .flat_map(|grid| (0..self.num_folds).map(move |fold| (grid, fold)))
            .collect();

        let pb = create_progress_bar(tasks.len() as u64, "   Cross-validating");
        let outcomes: Vec<Result<FoldOutcome>> = session.pool().install(|| {
            tasks
                .par_iter()
                .map(|&(grid, fold)| {
                    let (train_rows, valid_rows) = &splits[fold];
                    let outcome =
                        self.evaluate_fold(data, train_rows, valid_rows, self.reg_params[grid]);
                    pb.inc(1);
                    outcome
                })
                .collect()
        });
        pb.finish_and_clear();

        let outcomes = outcomes.into_iter().collect::<Result<Vec<_>>>()?;
        let results = self
            .reg_params
            .iter()
            .zip(outcomes.chunks(self.num_folds))
            .map(|(&reg_param, folds)| summarize_grid_point(reg_param, folds))
            .collect::<Result<Vec<_>>>()?;

        let best_index = select_best(&results);
        let best_reg_param = results[best_index].reg_param;
        info!(
            best_reg_param,
            avg_auc = results[best_index].avg_metric,
            "grid search finished"
        );

        let best = fit_logistic(&data.features, &data.labels, best_reg_param, self.max_iterations)?;

        Ok(CrossValidatorModel {
            best,
            best_index,
            results,
        })
    }

    fn evaluate_fold(
        &self,
        data: &LabeledFeatures,
        train_rows: &[usize],
        valid_rows: &[usize],
        reg_param: f64,
    ) -> Result<FoldOutcome> {
        let (train_x, train_y) = data.select(train_rows);
        let (valid_x, valid_y) = data.select(valid_rows);

        for (side, labels) in [("training", &train_y), ("validation", &valid_y)] {
            let positives = labels.iter().filter(|&&l| l == 1).count();
            if positives == 0 || positives == labels.len() {
                return Ok(FoldOutcome::Excluded(format!(
                    "{} part holds a single class",
                    side
                )));
            }
        }

        let model = fit_logistic(&train_x, &train_y, reg_param, self.max_iterations)?;
        let scores = model.predict_proba(&valid_x)?;

        Ok(match roc_auc(&scores.to_vec(), &valid_y.to_vec()) {
            Some(auc) => FoldOutcome::Scored(auc),
            None => FoldOutcome::Excluded("ROC-AUC undefined".to_string()),
        })
    }
}

fn summarize_grid_point(reg_param: f64, folds: &[FoldOutcome]) -> Result<GridResult> {
    let mut fold_metrics = Vec::with_capacity(folds.len());
    let mut excluded_folds = Vec::new();

    for (fold, outcome) in folds.iter().enumerate() {
        match outcome {
            FoldOutcome::Scored(auc) => fold_metrics.push(Some(*auc)),
            FoldOutcome::Excluded(reason) => {
                warn!(reg_param, fold, reason = %reason, "fold excluded from cross-validation");
                fold_metrics.push(None);
                excluded_folds.push(fold);
            }
        }
    }

    let scored: Vec<f64> = fold_metrics.iter().flatten().copied().collect();
    if scored.is_empty() {
        return Err(PipelineError::TrainingFailure(format!(
            "every fold was excluded for reg_param={}: each fold needs both classes",
            reg_param
        )));
    }

    Ok(GridResult {
        reg_param,
        avg_metric: scored.iter().sum::<f64>() / scored.len() as f64,
        fold_metrics,
        excluded_folds,
    })
}

/// Index of the highest average metric; ties keep the earlier grid entry.
fn select_best(results: &[GridResult]) -> usize {
    let mut best = 0;
    for (i, result) in results.iter().enumerate().skip(1) {
        if result.avg_metric > results[best].avg_metric {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_assignments_are_balanced() {
        let folds = fold_assignments(103, 5, 42);
        let mut sizes = [0usize; 5];
        for fold in &folds {
            sizes[*fold] += 1;
        }
        assert!(sizes.iter().all(|&s| s == 20 || s == 21), "sizes: {:?}", sizes);
        assert_eq!(folds, fold_assignments(103, 5, 42));
    }

    #[test]
    fn test_summarize_excludes_degenerate_folds() {
        let folds = vec![
            FoldOutcome::Scored(0.8),
            FoldOutcome::Excluded("validation part holds a single class".to_string()),
            FoldOutcome::Scored(0.6),
        ];
        let result = summarize_grid_point(0.1, &folds).unwrap();
        assert!((result.avg_metric - 0.7).abs() < 1e-12);
        assert_eq!(result.excluded_folds, vec![1]);
        assert_eq!(result.fold_metrics, vec![Some(0.8), None, Some(0.6)]);
    }

    #[test]
    fn test_summarize_fails_when_all_folds_excluded() {
        let folds = vec![FoldOutcome::Excluded("x".to_string()); 3];
        assert!(matches!(
            summarize_grid_point(0.1, &folds),
            Err(PipelineError::TrainingFailure(_))
        ));
    }

    #[test]
    fn test_select_best_prefers_earlier_on_tie() {
        let result = |reg_param, avg_metric| GridResult {
            reg_param,
            avg_metric,
            fold_metrics: vec![Some(avg_metric)],
            excluded_folds: vec![],
        };
        assert_eq!(select_best(&[result(0.1, 0.8), result(0.01, 0.8)]), 0);
        assert_eq!(select_best(&[result(0.1, 0.7), result(0.01, 0.8)]), 1);
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        let mut cv = CrossValidator::default();
        assert!(cv.validate().is_ok());

        cv.num_folds = 1;
        assert!(cv.validate().is_err());

        cv = CrossValidator {
            reg_params: vec![],
            ..CrossValidator::default()
        };
        assert!(cv.validate().is_err());

        cv = CrossValidator {
            reg_params: vec![0.1, f64::INFINITY],
            ..CrossValidator::default()
        };
        assert!(cv.validate().is_err());
    }
}
