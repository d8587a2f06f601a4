//! L2-regularized binary logistic regression

use linfa::prelude::*;
use linfa_logistic::LogisticRegression;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{PipelineError, Result};

/// Default decision threshold on the positive-class probability
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Below this standard deviation a feature is treated as constant
const MIN_STD: f64 = 1e-12;

/// Fitted logistic regression in raw feature space.
///
/// `predict_proba` returns the probability of label index 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    /// Regularization strength the model was fitted with
    pub reg_param: f64,
    pub threshold: f64,
}

impl LogisticModel {
    pub fn num_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Linear score `intercept + x . w` per row.
    pub fn decision_function(&self, features: &Array2<f64>) -> Result<Array1<f64>> {
        if features.ncols() != self.num_features() {
            return Err(PipelineError::SchemaMismatch(format!(
                "model expects {} features, got {}",
                self.num_features(),
                features.ncols()
            )));
        }
        let weights = ArrayView1::from(&self.coefficients[..]);
        Ok(features.dot(&weights) + self.intercept)
    }

    pub fn predict_proba(&self, features: &Array2<f64>) -> Result<Array1<f64>> {
        Ok(self.decision_function(features)?.mapv(sigmoid))
    }

    pub fn predict(&self, features: &Array2<f64>) -> Result<Array1<usize>> {
        Ok(self
            .predict_proba(features)?
            .mapv(|p| usize::from(p >= self.threshold)))
    }
}

/// Per-column centering and scaling learned from training rows
#[derive(Debug, Clone)]
struct Standardizer {
    mean: Array1<f64>,
    inv_std: Array1<f64>,
}

impl Standardizer {
    fn fit(features: &Array2<f64>) -> Self {
        let mean = features
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(features.ncols()));
        let std = features.std_axis(Axis(0), 0.0);
        let inv_std = std.mapv(|s| if s > MIN_STD { 1.0 / s } else { 0.0 });
        Self { mean, inv_std }
    }

    fn transform(&self, features: &Array2<f64>) -> Array2<f64> {
        (features - &self.mean) * &self.inv_std
    }

    /// Express a model fitted on standardized features in raw feature space.
    fn unscale(&self, intercept: f64, params: &Array1<f64>) -> (f64, Vec<f64>) {
        let coefficients = params * &self.inv_std;
        let shift = coefficients.dot(&self.mean);
        (intercept - shift, coefficients.to_vec())
    }
}

/// Fit a logistic regression with L2 strength `reg_param`.
///
/// Features are standardized internally; constant features get a zero
/// coefficient. `reg_param` is the penalty on the mean log-loss, matching the
/// usual `regParam` convention, and is scaled by the row count for linfa's
/// summed objective. Both label indices must be present.
pub fn fit_logistic(
    features: &Array2<f64>,
    labels: &Array1<usize>,
    reg_param: f64,
    max_iterations: u64,
) -> Result<LogisticModel> {
    let n_rows = features.nrows();
    if n_rows != labels.len() {
        return Err(PipelineError::TrainingFailure(format!(
            "{} feature rows but {} labels",
            n_rows,
            labels.len()
        )));
    }

    let positives = labels.iter().filter(|&&l| l == 1).count();
    if positives == 0 || positives == n_rows {
        return Err(PipelineError::TrainingFailure(format!(
            "training data holds a single class ({} rows, {} positive)",
            n_rows, positives
        )));
    }

    let scaler = Standardizer::fit(features);
    let dataset = Dataset::new(scaler.transform(features), labels.clone());

    let fitted = LogisticRegression::default()
        .alpha(reg_param * n_rows as f64)
        .max_iterations(max_iterations)
        .fit(&dataset)
        .map_err(|e| {
            PipelineError::TrainingFailure(format!(
                "logistic regression (reg_param={}) did not fit: {}",
                reg_param, e
            ))
        })?;

    // linfa's positive class is the more frequent label, not necessarily index 1
    let (intercept, params) = if fitted.labels().pos.class == 1 {
        (fitted.intercept(), fitted.params().to_owned())
    } else {
        (-fitted.intercept(), -fitted.params())
    };
    let (intercept, coefficients) = scaler.unscale(intercept, &params);
    debug!(reg_param, n_rows, "logistic regression fitted");

    Ok(LogisticModel {
        intercept,
        coefficients,
        reg_param,
        threshold: DEFAULT_THRESHOLD,
    })
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
