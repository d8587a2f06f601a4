//! Feature pipeline: string indexing, one-hot encoding, vector assembly and
//! label indexing.
//!
//! The pipeline is fit on the training split only. The fitted pipeline is then
//! applied unchanged to any other split, so category codes and the label
//! mapping never see held-out data.
//!
//! Unseen categories encode as an all-zero one-hot block. Every category seen
//! during training keeps its own slot, so the zero block is reserved for values
//! the pipeline has never seen.

use std::collections::HashMap;

use ndarray::{Array1, Array2};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{PipelineError, Result};
use super::schema::{CATEGORICAL_COLUMNS, LABEL_COLUMN, NUMERIC_COLUMNS};

/// Category labels learned for one text column.
///
/// Labels are ordered by descending frequency with ties broken alphabetically;
/// a label's index is its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringIndexerModel {
    pub input_column: String,
    pub labels: Vec<String>,
}

impl StringIndexerModel {
    /// Learn the label ordering of `column` from `df`. Nulls are ignored.
    pub fn fit(df: &DataFrame, column: &str) -> Result<Self> {
        let values = string_column(df, column)?;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for value in values.into_iter().flatten() {
            *counts.entry(value).or_insert(0) += 1;
        }

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        Ok(Self {
            input_column: column.to_string(),
            labels: ranked.into_iter().map(|(label, _)| label.to_string()).collect(),
        })
    }

    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.labels.iter().position(|label| label == value)
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }
}

/// One-hot expansion of an indexed column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoderModel {
    pub input_column: String,
    /// Block width: one slot per training category
    pub size: usize,
}

impl OneHotEncoderModel {
    pub fn for_indexer(indexer: &StringIndexerModel) -> Self {
        Self {
            input_column: indexer.input_column.clone(),
            size: indexer.num_labels(),
        }
    }

    /// Slot set to 1.0 for a category index, `None` for an unseen value.
    pub fn slot(&self, index: Option<usize>) -> Option<usize> {
        index.filter(|&i| i < self.size)
    }

    /// Dense one-hot block for a category index.
    pub fn encode(&self, index: Option<usize>) -> Vec<f64> {
        let mut block = vec![0.0; self.size];
        if let Some(slot) = self.slot(index) {
            block[slot] = 1.0;
        }
        block
    }
}

/// Concatenates one-hot blocks and numeric columns into one feature row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorAssembler {
    pub numeric_columns: Vec<String>,
}

impl VectorAssembler {
    /// Names of the assembled features, in vector order.
    pub fn feature_names(&self, encoders: &[OneHotEncoderModel], indexers: &[StringIndexerModel]) -> Vec<String> {
        let mut names = Vec::with_capacity(self.width(encoders));
        for (encoder, indexer) in encoders.iter().zip(indexers) {
            names.extend(
                indexer
                    .labels
                    .iter()
                    .take(encoder.size)
                    .map(|label| format!("{}={}", encoder.input_column, label)),
            );
        }
        names.extend(self.numeric_columns.iter().cloned());
        names
    }

    pub fn width(&self, encoders: &[OneHotEncoderModel]) -> usize {
        encoders.iter().map(|e| e.size).sum::<usize>() + self.numeric_columns.len()
    }
}

/// Unfitted pipeline definition.
#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    pub categorical_columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    pub label_column: String,
}

impl Default for FeaturePipeline {
    fn default() -> Self {
        Self {
            categorical_columns: CATEGORICAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
            numeric_columns: NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect(),
            label_column: LABEL_COLUMN.to_string(),
        }
    }
}

impl FeaturePipeline {
    /// Fit every stage on `train`.
    ///
    /// The label column must hold exactly two distinct values.
    pub fn fit(&self, train: &DataFrame) -> Result<FittedFeaturePipeline> {
        if train.height() == 0 {
            return Err(PipelineError::TrainingFailure(
                "cannot fit the feature pipeline on an empty training split".to_string(),
            ));
        }

        let indexers = self
            .categorical_columns
            .iter()
            .map(|column| StringIndexerModel::fit(train, column))
            .collect::<Result<Vec<_>>>()?;
        let encoders = indexers.iter().map(OneHotEncoderModel::for_indexer).collect();

        for column in &self.numeric_columns {
            numeric_column(train, column)?;
        }
        let assembler = VectorAssembler {
            numeric_columns: self.numeric_columns.clone(),
        };

        let label_indexer = StringIndexerModel::fit(train, &self.label_column)?;
        if label_indexer.num_labels() != 2 {
            return Err(PipelineError::TrainingFailure(format!(
                "binary classification needs exactly 2 label values in '{}', found {}: {:?}",
                self.label_column,
                label_indexer.num_labels(),
                label_indexer.labels
            )));
        }

        let fitted = FittedFeaturePipeline {
            indexers,
            encoders,
            assembler,
            label_indexer,
        };
        debug!(width = fitted.width(), "feature pipeline fitted");
        Ok(fitted)
    }
}

/// Features produced for an unlabeled frame
#[derive(Debug, Clone)]
pub struct EncodedFeatures {
    pub features: Array2<f64>,
    /// Values per categorical column that were not seen during fitting
    pub unseen: Vec<(String, usize)>,
}

/// Features and labels produced for a labeled frame
#[derive(Debug, Clone)]
pub struct LabeledFeatures {
    pub features: Array2<f64>,
    pub labels: Array1<usize>,
    pub unseen: Vec<(String, usize)>,
}

impl LabeledFeatures {
    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    /// Rows at `indices`, in the given order.
    pub fn select(&self, indices: &[usize]) -> (Array2<f64>, Array1<usize>) {
        (
            self.features.select(ndarray::Axis(0), indices),
            self.labels.select(ndarray::Axis(0), indices),
        )
    }
}

/// Pipeline with every stage fitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedFeaturePipeline {
    pub indexers: Vec<StringIndexerModel>,
    pub encoders: Vec<OneHotEncoderModel>,
    pub assembler: VectorAssembler,
    pub label_indexer: StringIndexerModel,
}

impl FittedFeaturePipeline {
    pub fn width(&self) -> usize {
        self.assembler.width(&self.encoders)
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.assembler.feature_names(&self.encoders, &self.indexers)
    }

    pub fn label_column(&self) -> &str {
        &self.label_indexer.input_column
    }

    /// Encode features and labels.
    ///
    /// A label value that was not seen during fitting is a schema mismatch.
    pub fn transform(&self, df: &DataFrame) -> Result<LabeledFeatures> {
        let encoded = self.transform_features(df)?;
        let labels = self.index_labels(df)?;
        Ok(LabeledFeatures {
            features: encoded.features,
            labels,
            unseen: encoded.unseen,
        })
    }

    /// Encode features only. The label column is not read.
    pub fn transform_features(&self, df: &DataFrame) -> Result<EncodedFeatures> {
        let n_rows = df.height();
        let mut features = Array2::<f64>::zeros((n_rows, self.width()));
        let mut unseen = Vec::with_capacity(self.indexers.len());
        let mut offset = 0;

        for (indexer, encoder) in self.indexers.iter().zip(&self.encoders) {
            let values = string_column(df, &indexer.input_column)?;
            let mut unseen_count = 0usize;

            for (row, value) in values.into_iter().enumerate() {
                let value = value.ok_or_else(|| missing_value(&indexer.input_column, row))?;
                match encoder.slot(indexer.index_of(value)) {
                    Some(slot) => features[[row, offset + slot]] = 1.0,
                    None => unseen_count += 1,
                }
            }

            if unseen_count > 0 {
                warn!(
                    column = %indexer.input_column,
                    rows = unseen_count,
                    "categories not seen during fitting encoded as all-zero"
                );
            }
            unseen.push((indexer.input_column.clone(), unseen_count));
            offset += encoder.size;
        }

        for name in &self.assembler.numeric_columns {
            let column = numeric_column(df, name)?;
            for (row, value) in column.f64()?.into_iter().enumerate() {
                features[[row, offset]] = value.ok_or_else(|| missing_value(name, row))?;
            }
            offset += 1;
        }

        Ok(EncodedFeatures { features, unseen })
    }

    /// Map the label column to 0/1 indices.
    pub fn index_labels(&self, df: &DataFrame) -> Result<Array1<usize>> {
        let column = self.label_column();
        let values = string_column(df, column)?;

        values
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                let value = value.ok_or_else(|| missing_value(column, row))?;
                self.label_indexer.index_of(value).ok_or_else(|| {
                    PipelineError::SchemaMismatch(format!(
                        "label value '{}' in row {} was not seen during fitting (known: {:?})",
                        value, row, self.label_indexer.labels
                    ))
                })
            })
            .collect::<Result<Vec<usize>>>()
            .map(Array1::from)
    }
}

fn string_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    df.column(name)
        .map_err(|_| PipelineError::SchemaMismatch(format!("column '{}' not found", name)))?
        .str()
        .map_err(|_| PipelineError::SchemaMismatch(format!("column '{}' must be text", name)))
}

fn numeric_column(df: &DataFrame, name: &str) -> Result<Column> {
    let column = df
        .column(name)
        .map_err(|_| PipelineError::SchemaMismatch(format!("column '{}' not found", name)))?;
    if !column.dtype().is_primitive_numeric() {
        return Err(PipelineError::SchemaMismatch(format!(
            "column '{}' must be numeric, found {}",
            name,
            column.dtype()
        )));
    }
    Ok(column.cast(&DataType::Float64)?)
}

fn missing_value(column: &str, row: usize) -> PipelineError {
    PipelineError::SchemaMismatch(format!(
        "missing value in column '{}' at row {}; clean the dataset before transforming",
        column, row
    ))
}
