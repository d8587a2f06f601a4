//! Seeded train/test partitioning

use polars::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::error::{PipelineError, Result};

/// Row indices assigned to each side of a split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<IdxSize>,
    pub test: Vec<IdxSize>,
}

/// Assign each of `n_rows` rows to training or test.
///
/// Each row draws one uniform value from a ChaCha8 stream seeded with `seed`;
/// values below `train_fraction` go to training. The assignment depends only on
/// row position, fraction and seed.
pub fn split_indices(n_rows: usize, train_fraction: f64, seed: u64) -> Result<SplitIndices> {
    validate_fraction(train_fraction)?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let expected_train = (n_rows as f64 * train_fraction) as usize;
    let mut train = Vec::with_capacity(expected_train);
    let mut test = Vec::with_capacity(n_rows - expected_train);

    for row in 0..n_rows {
        let draw: f64 = rng.gen();
        if draw < train_fraction {
            train.push(row as IdxSize);
        } else {
            test.push(row as IdxSize);
        }
    }

    Ok(SplitIndices { train, test })
}

/// Split a DataFrame into disjoint training and test sets.
pub fn random_split(
    df: &DataFrame,
    train_fraction: f64,
    seed: u64,
) -> Result<(DataFrame, DataFrame)> {
    let indices = split_indices(df.height(), train_fraction, seed)?;

    let train_idx = IdxCa::from_vec("train".into(), indices.train);
    let test_idx = IdxCa::from_vec("test".into(), indices.test);

    Ok((df.take(&train_idx)?, df.take(&test_idx)?))
}

fn validate_fraction(train_fraction: f64) -> Result<()> {
    if train_fraction.is_finite() && train_fraction > 0.0 && train_fraction < 1.0 {
        Ok(())
    } else {
        Err(PipelineError::InvalidConfig(format!(
            "train fraction must be between 0 and 1 (exclusive), got {}",
            train_fraction
        )))
    }
}
