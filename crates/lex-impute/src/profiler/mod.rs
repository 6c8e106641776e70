//! Missing-data profiling.
//!
//! Read-only diagnostics over a dataset: which columns contain missing values
//! and how many. The engine does not depend on these results; it decides per
//! configured column on its own.

use crate::error::Result;
use crate::types::ColumnMissingProfile;
use crate::utils::{missing_count, missing_mask};
use polars::prelude::*;

/// Data profiler for missing-value diagnostics.
pub struct DataProfiler;

impl DataProfiler {
    /// Names of the columns that contain at least one missing value.
    ///
    /// Missing means null, an empty string in a text column, or NaN in a
    /// float column. Columns are returned in dataset order.
    pub fn find_columns_with_missing_data(df: &DataFrame) -> Result<Vec<String>> {
        let mut columns = Vec::new();
        for column in df.get_columns() {
            let series = column.as_materialized_series();
            if missing_mask(series)?.into_iter().any(|m| m) {
                columns.push(column.name().to_string());
            }
        }
        Ok(columns)
    }

    /// Missing-value counts for every column, in dataset order.
    pub fn missing_profile(df: &DataFrame) -> Result<Vec<ColumnMissingProfile>> {
        let height = df.height();
        df.get_columns()
            .iter()
            .map(|column| -> Result<ColumnMissingProfile> {
                let series = column.as_materialized_series();
                let missing = missing_count(series)?;
                let missing_percentage = if height > 0 {
                    (missing as f64 / height as f64) * 100.0
                } else {
                    0.0
                };
                Ok(ColumnMissingProfile {
                    name: column.name().to_string(),
                    dtype: series.dtype().to_string(),
                    missing_count: missing,
                    missing_percentage,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_columns_with_missing_data() {
        let df = df![
            "A" => [Some(1.0), None, Some(3.0)],
            "B" => [Some("x"), Some("y"), Some("z")],
            "C" => [Some("x"), Some(""), Some("z")],
            "D" => [Some(1i64), Some(2), None],
        ]
        .unwrap();

        let columns = DataProfiler::find_columns_with_missing_data(&df).unwrap();
        assert_eq!(columns, vec!["A", "C", "D"]);
    }

    #[test]
    fn test_find_columns_no_missing() {
        let df = df![
            "A" => [1.0, 2.0],
            "B" => ["x", "y"],
        ]
        .unwrap();

        assert!(
            DataProfiler::find_columns_with_missing_data(&df)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_find_columns_counts_nan() {
        let df = df!["A" => [1.0, f64::NAN]].unwrap();
        assert_eq!(
            DataProfiler::find_columns_with_missing_data(&df).unwrap(),
            vec!["A"]
        );
    }

    #[test]
    fn test_missing_profile() {
        let df = df![
            "A" => [Some(1.0), None, None, Some(4.0)],
            "B" => [Some("x"), Some("y"), Some("z"), Some("w")],
        ]
        .unwrap();

        let profile = DataProfiler::missing_profile(&df).unwrap();
        assert_eq!(profile.len(), 2);
        assert_eq!(profile[0].name, "A");
        assert_eq!(profile[0].missing_count, 2);
        assert_eq!(profile[0].missing_percentage, 50.0);
        assert_eq!(profile[1].missing_count, 0);
    }

    #[test]
    fn test_missing_profile_empty_frame() {
        let df = DataFrame::empty();
        assert!(DataProfiler::missing_profile(&df).unwrap().is_empty());
    }
}
