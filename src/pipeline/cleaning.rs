//! Missing value handling: sentinel fill and row-level drop

use polars::prelude::*;
use tracing::info;

use super::error::{PipelineError, Result};
use super::schema::{SENTINEL_COLUMNS, UNKNOWN_CATEGORY};

/// Counts collected while cleaning a dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleaningReport {
    /// Rows before cleaning
    pub input_rows: usize,
    /// Values replaced by the sentinel category, per column
    pub filled: Vec<(String, usize)>,
    /// Rows removed because a value was still missing after the fill
    pub dropped_rows: usize,
}

impl CleaningReport {
    pub fn output_rows(&self) -> usize {
        self.input_rows - self.dropped_rows
    }
}

/// Count missing values per column, in column order.
pub fn count_missing(df: &DataFrame) -> Vec<(String, usize)> {
    df.get_columns()
        .iter()
        .map(|column| (column.name().to_string(), column.null_count()))
        .collect()
}

/// Replace missing values in the sentinel columns with [`UNKNOWN_CATEGORY`].
pub fn fill_unknown(df: &DataFrame) -> Result<(DataFrame, Vec<(String, usize)>)> {
    let mut filled_df = df.clone();
    let mut filled = Vec::with_capacity(SENTINEL_COLUMNS.len());

    for name in SENTINEL_COLUMNS {
        let column = df.column(name).map_err(|_| {
            PipelineError::SchemaMismatch(format!("column '{}' not found", name))
        })?;
        let missing = column.null_count();

        let values: StringChunked = column
            .str()?
            .into_iter()
            .map(|v| Some(v.unwrap_or(UNKNOWN_CATEGORY)))
            .collect();
        filled_df.with_column(values.with_name(name.into()).into_series())?;
        filled.push((name.to_string(), missing));
    }

    Ok((filled_df, filled))
}

/// Drop every row that has a missing value in any column.
pub fn drop_incomplete_rows(df: &DataFrame) -> Result<DataFrame> {
    let mut mask = BooleanChunked::full("complete".into(), true, df.height());
    for column in df.get_columns() {
        if column.null_count() > 0 {
            mask = &mask & &column.is_not_null();
        }
    }
    Ok(df.filter(&mask)?)
}

/// Apply the sentinel fill followed by the row-level drop.
pub fn clean_dataset(df: &DataFrame) -> Result<(DataFrame, CleaningReport)> {
    let (filled_df, filled) = fill_unknown(df)?;
    let cleaned = drop_incomplete_rows(&filled_df)?;

    let report = CleaningReport {
        input_rows: df.height(),
        filled,
        dropped_rows: df.height() - cleaned.height(),
    };
    info!(
        input_rows = report.input_rows,
        dropped_rows = report.dropped_rows,
        "dataset cleaned"
    );

    Ok((cleaned, report))
}
