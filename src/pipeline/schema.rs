//! Fixed layout of the census income dataset

/// Column names, in file order. The input file has no header row.
pub const COLUMN_NAMES: [&str; 15] = [
    "age",
    "workclass",
    "fnlwgt",
    "education",
    "education_num",
    "marital_status",
    "occupation",
    "relationship",
    "race",
    "sex",
    "capital_gain",
    "capital_loss",
    "hours_per_week",
    "native_country",
    "income",
];

/// Numeric columns, in the order they are appended to the feature vector.
pub const NUMERIC_COLUMNS: [&str; 6] = [
    "age",
    "fnlwgt",
    "education_num",
    "capital_gain",
    "capital_loss",
    "hours_per_week",
];

/// Categorical columns, in the order their one-hot blocks appear.
pub const CATEGORICAL_COLUMNS: [&str; 8] = [
    "workclass",
    "education",
    "marital_status",
    "occupation",
    "relationship",
    "race",
    "sex",
    "native_country",
];

/// Columns whose missing values are replaced by [`UNKNOWN_CATEGORY`].
pub const SENTINEL_COLUMNS: [&str; 3] = ["workclass", "occupation", "native_country"];

/// Binary target column.
pub const LABEL_COLUMN: &str = "income";

/// Category substituted for missing values in [`SENTINEL_COLUMNS`].
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Trimmed field values read as missing.
pub const MISSING_MARKERS: [&str; 2] = ["", "?"];

pub fn is_numeric_column(name: &str) -> bool {
    NUMERIC_COLUMNS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_groups_partition_the_schema() {
        let mut grouped: Vec<&str> = NUMERIC_COLUMNS
            .iter()
            .chain(CATEGORICAL_COLUMNS.iter())
            .copied()
            .collect();
        grouped.push(LABEL_COLUMN);
        grouped.sort_unstable();

        let mut all = COLUMN_NAMES.to_vec();
        all.sort_unstable();

        assert_eq!(grouped, all);
    }

    #[test]
    fn test_sentinel_columns_are_categorical() {
        for name in SENTINEL_COLUMNS {
            assert!(CATEGORICAL_COLUMNS.contains(&name), "{} should be categorical", name);
            assert!(!is_numeric_column(name));
        }
    }
}
