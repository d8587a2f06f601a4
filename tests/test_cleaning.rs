//! Tests for the sentinel fill and incomplete-row drop

use incomelr::pipeline::{
    clean_dataset, count_missing, load_dataset, SENTINEL_COLUMNS, UNKNOWN_CATEGORY,
};

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_sentinel_missing_values_become_unknown() {
    let mut rows = census_rows(6, 11);
    rows[0][1] = "?".to_string(); // workclass
    rows[2][6] = "?".to_string(); // occupation
    rows[4][13] = "".to_string(); // native_country
    let (_temp_dir, path) = write_temp_csv(&to_lines(&rows));

    let raw = load_dataset(&path).unwrap();
    let (cleaned, report) = clean_dataset(&raw).unwrap();

    assert_eq!(cleaned.height(), 6, "sentinel gaps never drop a row");
    assert_eq!(report.dropped_rows, 0);

    let workclass = cleaned.column("workclass").unwrap().str().unwrap();
    assert_eq!(workclass.get(0), Some(UNKNOWN_CATEGORY));
    let occupation = cleaned.column("occupation").unwrap().str().unwrap();
    assert_eq!(occupation.get(2), Some(UNKNOWN_CATEGORY));
    let country = cleaned.column("native_country").unwrap().str().unwrap();
    assert_eq!(country.get(4), Some(UNKNOWN_CATEGORY));

    for (column, filled) in &report.filled {
        assert!(SENTINEL_COLUMNS.contains(&column.as_str()));
        assert_eq!(*filled, 1, "one gap per sentinel column");
    }
}

#[test]
fn test_other_missing_values_drop_the_row() {
    let mut rows = census_rows(8, 12);
    rows[1][0] = "?".to_string(); // age
    rows[3][3] = "".to_string(); // education
    rows[5][14] = "?".to_string(); // income
    let (_temp_dir, path) = write_temp_csv(&to_lines(&rows));

    let raw = load_dataset(&path).unwrap();
    let (cleaned, report) = clean_dataset(&raw).unwrap();

    assert_eq!(report.input_rows, 8);
    assert_eq!(report.dropped_rows, 3);
    assert_eq!(cleaned.height(), 5);
    assert!(
        count_missing(&cleaned).iter().all(|(_, n)| *n == 0),
        "no missing value survives cleaning"
    );
}

#[test]
fn test_row_with_both_kinds_is_dropped() {
    let mut rows = census_rows(4, 13);
    rows[0][1] = "?".to_string(); // workclass, filled
    rows[0][12] = "?".to_string(); // hours_per_week, not fillable
    let (_temp_dir, path) = write_temp_csv(&to_lines(&rows));

    let raw = load_dataset(&path).unwrap();
    let (cleaned, report) = clean_dataset(&raw).unwrap();

    assert_eq!(cleaned.height(), 3);
    assert_eq!(report.dropped_rows, 1);
    let workclass = cleaned.column("workclass").unwrap().str().unwrap();
    assert!(workclass.into_iter().flatten().all(|v| v != UNKNOWN_CATEGORY));
}
