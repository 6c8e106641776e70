//! Statistical imputation methods.
//!
//! Provides mean, median, mode and constant-zero fills. Each method takes a
//! normalized Series (every missing marker already null) and returns the
//! filled replacement; the caller swaps it into the DataFrame.

use crate::error::Result;
use crate::utils::{is_numeric_dtype, numeric_values};
use polars::prelude::*;
use std::cmp::Ordering;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill nulls in a numeric Series with its mean.
    ///
    /// Returns `None` when the column has no value to average.
    pub fn apply_mean(series: &Series) -> Result<Option<Series>> {
        match series.mean() {
            Some(fill) => Ok(Some(Self::fill_with_value(series, fill)?)),
            None => Ok(None),
        }
    }

    /// Fill nulls in a numeric Series with its median.
    ///
    /// Returns `None` when the column has no value to take the median of.
    pub fn apply_median(series: &Series) -> Result<Option<Series>> {
        match series.median() {
            Some(fill) => Ok(Some(Self::fill_with_value(series, fill)?)),
            None => Ok(None),
        }
    }

    /// Fill nulls with the most frequent value, keeping the column's dtype.
    ///
    /// Ties resolve to the smallest of the most frequent values. Returns
    /// `None` when every value is missing.
    pub fn apply_mode(series: &Series) -> Result<Option<Series>> {
        let source = if is_numeric_dtype(series.dtype()) {
            mode_index(&numeric_values(series)?)
        } else {
            let text = series.cast(&DataType::String)?;
            let keys: Vec<Option<&str>> = text.str()?.into_iter().collect();
            mode_index(&keys)
        };

        let Some(source) = source else {
            return Ok(None);
        };

        let source = source as IdxSize;
        let indices: Vec<IdxSize> = series
            .is_null()
            .into_iter()
            .enumerate()
            .map(|(row, is_null)| {
                if is_null.unwrap_or(true) {
                    source
                } else {
                    row as IdxSize
                }
            })
            .collect();

        let idx = IdxCa::from_vec(PlSmallStr::EMPTY, indices);
        Ok(Some(series.take(&idx)?))
    }

    /// Fill nulls in a numeric Series with zero.
    pub fn apply_zero(series: &Series) -> Result<Series> {
        Ok(series.fill_null(FillNullStrategy::Zero)?)
    }

    /// Helper to fill missing values with a numeric constant.
    ///
    /// Only null slots change. Integer columns stay integer when the fill
    /// value is integral; otherwise the column is widened to `Float64`.
    fn fill_with_value(series: &Series, fill: f64) -> Result<Series> {
        let target = if series.dtype().is_float() || fill.fract() == 0.0 {
            series.dtype().clone()
        } else {
            DataType::Float64
        };

        let base = series.cast(&target)?;
        let fill = Series::new(series.name().clone(), &[fill])
            .cast(&target)?
            .new_from_index(0, base.len());
        Ok(base.zip_with(&base.is_not_null(), &fill)?)
    }
}

/// Row of a most frequent present value, or `None` if nothing is present.
///
/// Among equally frequent values the smallest wins.
pub fn mode_index<T: PartialOrd>(values: &[Option<T>]) -> Option<usize> {
    let mut present: Vec<(&T, usize)> = values
        .iter()
        .enumerate()
        .filter_map(|(row, v)| v.as_ref().map(|v| (v, row)))
        .collect();
    present.sort_by(|a, b| a.0.partial_cmp(b.0).unwrap_or(Ordering::Equal));

    let mut best: Option<(usize, usize)> = None;
    let mut start = 0;
    while start < present.len() {
        let mut end = start + 1;
        while end < present.len() && present[end].0 == present[start].0 {
            end += 1;
        }
        let run = end - start;
        // Runs arrive in ascending order, so only a strictly longer run wins
        if best.is_none_or(|(_, count)| run > count) {
            best = Some((present[start].1, run));
        }
        start = end;
    }

    best.map(|(row, _)| row)
}
