//! Dataset loader for the headerless census CSV

use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use tracing::{debug, info};

use super::error::{PipelineError, Result};
use super::schema::{is_numeric_column, COLUMN_NAMES, MISSING_MARKERS};

/// Load the headerless dataset and assign the known column names positionally.
///
/// Every field is read as text, trimmed, and mapped to null when it is one of
/// [`MISSING_MARKERS`]. Numeric columns are then cast to `Float64`; values that
/// do not parse become null and are removed later by cleaning.
pub fn load_dataset(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(|e| PipelineError::input_unavailable(path, e))?;

    let raw = CsvReadOptions::default()
        .with_has_header(false)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|e| {
            PipelineError::SchemaMismatch(format!(
                "failed to parse {}: {}",
                path.display(),
                e
            ))
        })?;

    if raw.width() != COLUMN_NAMES.len() {
        return Err(PipelineError::SchemaMismatch(format!(
            "expected {} columns in {}, found {}",
            COLUMN_NAMES.len(),
            path.display(),
            raw.width()
        )));
    }

    let columns = raw
        .get_columns()
        .iter()
        .zip(COLUMN_NAMES)
        .map(|(column, name)| normalize_column(column, name))
        .collect::<Result<Vec<Column>>>()?;

    let df = DataFrame::new(columns)?;
    info!(rows = df.height(), path = %path.display(), "dataset loaded");
    Ok(df)
}

/// Rename, trim and type a raw text column.
fn normalize_column(column: &Column, name: &str) -> Result<Column> {
    let text = column.cast(&DataType::String)?;
    let cleaned: StringChunked = text
        .str()?
        .into_iter()
        .map(|v| v.map(str::trim).filter(|s| !MISSING_MARKERS.contains(s)))
        .collect();
    let series = cleaned.with_name(name.into()).into_series();

    if is_numeric_column(name) {
        let before = series.null_count();
        let numeric = series.cast(&DataType::Float64)?;
        let coerced = numeric.null_count() - before;
        if coerced > 0 {
            debug!(column = name, coerced, "unparseable numeric values read as missing");
        }
        Ok(numeric.into_column())
    } else {
        Ok(series.into_column())
    }
}

/// Estimated in-memory size of a DataFrame in megabytes
pub fn estimated_size_mb(df: &DataFrame) -> f64 {
    df.estimated_size() as f64 / (1024.0 * 1024.0)
}
