//! Unit tests for dataset ingestion

use incomelr::pipeline::{load_dataset, PipelineError, COLUMN_NAMES, NUMERIC_COLUMNS};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_load_assigns_names_positionally() {
    let rows = census_rows(10, 1);
    let (_temp_dir, path) = write_temp_csv(&to_lines(&rows));

    let df = load_dataset(&path).unwrap();

    assert_eq!(df.height(), 10, "header-less file keeps every row");
    let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    assert_eq!(names, COLUMN_NAMES.to_vec());
}

#[test]
fn test_numeric_columns_parsed_as_float() {
    let rows = census_rows(5, 2);
    let (_temp_dir, path) = write_temp_csv(&to_lines(&rows));

    let df = load_dataset(&path).unwrap();

    for name in NUMERIC_COLUMNS {
        assert_eq!(
            df.column(name).unwrap().dtype(),
            &DataType::Float64,
            "column {} should be Float64",
            name
        );
    }
    assert_eq!(df.column("income").unwrap().dtype(), &DataType::String);
}

#[test]
fn test_values_are_trimmed() {
    let rows = census_rows(3, 3);
    let (_temp_dir, path) = write_temp_csv(&to_lines(&rows));

    let df = load_dataset(&path).unwrap();
    let income = df.column("income").unwrap().str().unwrap();
    for value in income.into_iter().flatten() {
        assert_eq!(value, value.trim());
    }
}

#[test]
fn test_missing_markers_become_null() {
    let mut rows = census_rows(4, 4);
    rows[0][1] = "?".to_string();
    rows[1][6] = "".to_string();
    rows[2][0] = "forty".to_string();
    let (_temp_dir, path) = write_temp_csv(&to_lines(&rows));

    let df = load_dataset(&path).unwrap();

    assert_eq!(df.column("workclass").unwrap().null_count(), 1);
    assert_eq!(df.column("occupation").unwrap().null_count(), 1);
    assert_eq!(df.column("age").unwrap().null_count(), 1, "unparseable number is missing");
}

#[test]
fn test_wrong_column_count_is_schema_mismatch() {
    let lines = vec!["1,2,3".to_string(), "4,5,6".to_string()];
    let (_temp_dir, path) = write_temp_csv(&lines);

    let result = load_dataset(&path);
    assert!(
        matches!(result, Err(PipelineError::SchemaMismatch(_))),
        "expected schema mismatch, got {:?}",
        result.map(|df| df.shape())
    );
}

#[test]
fn test_missing_file_is_input_unavailable() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let result = load_dataset(&temp_dir.path().join("absent.csv"));

    match result {
        Err(err @ PipelineError::InputUnavailable { .. }) => assert_eq!(err.exit_code(), 2),
        other => panic!("expected InputUnavailable, got {:?}", other.map(|df| df.shape())),
    }
}
