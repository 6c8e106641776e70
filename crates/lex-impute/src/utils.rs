//! Shared utilities for the imputation pipeline.
//!
//! This module contains the dtype helpers and the missing-value conventions
//! used across the profiler, the imputers and the engine, so every component
//! agrees on what "missing" means.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for imputation purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Temporal,
    /// Boolean type
    Boolean,
    /// String/text type
    Text,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a floating point type.
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Check if a DataType is a temporal type.
#[inline]
pub fn is_temporal_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_temporal_dtype(dtype) {
        DtypeCategory::Temporal
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String) {
        DtypeCategory::Text
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// Missing Value Utilities
// =============================================================================

/// Per-row missing flags for a Series.
///
/// A value is missing when it is null, an empty string in a text column, or
/// NaN in a float column.
pub fn missing_mask(series: &Series) -> PolarsResult<Vec<bool>> {
    let dtype = series.dtype();
    let mask = if matches!(dtype, DataType::String) {
        series
            .str()?
            .into_iter()
            .map(|v| v.is_none_or(str::is_empty))
            .collect()
    } else if is_float_dtype(dtype) {
        series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.is_none_or(f64::is_nan))
            .collect()
    } else {
        series
            .is_null()
            .into_iter()
            .map(|v| v.unwrap_or(true))
            .collect()
    };
    Ok(mask)
}

/// Count missing values in a Series.
pub fn missing_count(series: &Series) -> PolarsResult<usize> {
    Ok(missing_mask(series)?.into_iter().filter(|m| *m).count())
}

/// Replace every missing marker with null.
///
/// Empty strings in text columns and NaN in float columns become null, so
/// null-based fills see them. Other columns are returned as-is.
pub fn normalize_missing(series: &Series) -> PolarsResult<Series> {
    let dtype = series.dtype();
    if matches!(dtype, DataType::String) {
        let values: Vec<Option<&str>> = series
            .str()?
            .into_iter()
            .map(|v| v.filter(|s| !s.is_empty()))
            .collect();
        Ok(Series::new(series.name().clone(), values))
    } else if is_float_dtype(dtype) {
        let values: Vec<Option<f64>> = series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Ok(Series::new(series.name().clone(), values))
    } else {
        Ok(series.clone())
    }
}

/// Extract a numeric Series as `f64` values, with missing values as `None`.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    Ok(series
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
        assert!(!is_numeric_dtype(&DataType::Date));
    }

    #[test]
    fn test_is_temporal_dtype() {
        assert!(is_temporal_dtype(&DataType::Date));
        assert!(is_temporal_dtype(&DataType::Datetime(
            TimeUnit::Milliseconds,
            None
        )));
        assert!(!is_temporal_dtype(&DataType::String));
    }

    #[test]
    fn test_dtype_category() {
        assert_eq!(get_dtype_category(&DataType::Int64), DtypeCategory::Numeric);
        assert_eq!(get_dtype_category(&DataType::Date), DtypeCategory::Temporal);
        assert_eq!(
            get_dtype_category(&DataType::Boolean),
            DtypeCategory::Boolean
        );
        assert_eq!(get_dtype_category(&DataType::String), DtypeCategory::Text);
    }

    #[test]
    fn test_missing_mask_text_counts_empty_strings() {
        let series = Series::new("t".into(), &[Some("x"), None, Some(""), Some(" ")]);
        assert_eq!(
            missing_mask(&series).unwrap(),
            vec![false, true, true, false]
        );
    }

    #[test]
    fn test_missing_mask_float_counts_nan() {
        let series = Series::new("f".into(), &[Some(1.0), None, Some(f64::NAN)]);
        assert_eq!(missing_mask(&series).unwrap(), vec![false, true, true]);
        assert_eq!(missing_count(&series).unwrap(), 2);
    }

    #[test]
    fn test_missing_mask_integer() {
        let series = Series::new("i".into(), &[Some(1i64), None, Some(0)]);
        assert_eq!(missing_mask(&series).unwrap(), vec![false, true, false]);
    }

    #[test]
    fn test_normalize_missing_text() {
        let series = Series::new("t".into(), &[Some("a"), Some(""), None]);
        let normalized = normalize_missing(&series).unwrap();
        assert_eq!(normalized.null_count(), 2);
        assert_eq!(normalized.name().as_str(), "t");
    }

    #[test]
    fn test_normalize_missing_keeps_integers() {
        let series = Series::new("i".into(), &[Some(1i64), None]);
        let normalized = normalize_missing(&series).unwrap();
        assert_eq!(normalized.dtype(), &DataType::Int64);
        assert_eq!(normalized.null_count(), 1);
    }

    #[test]
    fn test_numeric_values() {
        let series = Series::new("i".into(), &[Some(1i32), None, Some(3)]);
        assert_eq!(
            numeric_values(&series).unwrap(),
            vec![Some(1.0), None, Some(3.0)]
        );
    }
}
