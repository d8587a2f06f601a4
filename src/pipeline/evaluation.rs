//! Binary classification metrics

use polars::prelude::*;

use super::error::{PipelineError, Result};

/// Name of the single column in the metric record
pub const METRIC_COLUMN: &str = "auc";

/// Area under the ROC curve.
///
/// Computed as the Mann-Whitney statistic: the probability that a random
/// positive scores higher than a random negative, counting ties as one half.
/// Returns `None` when either class is absent or the lengths differ.
pub fn roc_auc(scores: &[f64], labels: &[usize]) -> Option<f64> {
    if scores.len() != labels.len() || scores.iter().any(|s| s.is_nan()) {
        return None;
    }

    let positives = labels.iter().filter(|&&l| l == 1).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    // Sum of 1-based ranks of the positives, ties get their average rank
    let mut positive_rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        let average_rank = (start + 1 + end) as f64 / 2.0;
        let tied_positives = order[start..end].iter().filter(|&&i| labels[i] == 1).count();
        positive_rank_sum += average_rank * tied_positives as f64;
        start = end;
    }

    let p = positives as f64;
    let n = negatives as f64;
    Some((positive_rank_sum - p * (p + 1.0) / 2.0) / (p * n))
}

/// ROC-AUC that fails the run when it is undefined.
pub fn evaluate_auc(scores: &[f64], labels: &[usize]) -> Result<f64> {
    roc_auc(scores, labels).ok_or_else(|| {
        PipelineError::TrainingFailure(format!(
            "ROC-AUC is undefined for {} rows: both classes must be present",
            labels.len()
        ))
    })
}

/// One-row table holding the metric, for uniform persistence.
pub fn metric_frame(auc: f64) -> Result<DataFrame> {
    Ok(DataFrame::new(vec![Column::new(METRIC_COLUMN.into(), [auc])])?)
}
