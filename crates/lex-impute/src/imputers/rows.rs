//! Row removal.

use crate::error::Result;
use polars::prelude::*;

/// Drops dataset rows whose value in a given column is missing.
pub struct RowRemover;

impl RowRemover {
    /// Remove every row where `series` (a normalized column of `df`) is null.
    ///
    /// `labels` tracks the original position of each row and is filtered in
    /// step with the frame. Returns the number of rows removed.
    pub fn remove_missing(
        df: &mut DataFrame,
        series: &Series,
        labels: &mut Vec<f64>,
    ) -> Result<usize> {
        let keep: Vec<bool> = series
            .is_not_null()
            .into_iter()
            .map(|v| v.unwrap_or(false))
            .collect();
        let removed = keep.iter().filter(|k| !**k).count();
        if removed == 0 {
            return Ok(0);
        }

        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        *df = df.filter(&mask)?;

        let mut flags = keep.iter();
        labels.retain(|_| flags.next().copied().unwrap_or(false));

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_missing_rows() {
        let mut df = df![
            "A" => [Some(1.0), None, Some(3.0)],
            "B" => ["x", "y", "z"],
        ]
        .unwrap();
        let series = df.column("A").unwrap().as_materialized_series().clone();
        let mut labels = vec![0.0, 1.0, 2.0];

        let removed = RowRemover::remove_missing(&mut df, &series, &mut labels).unwrap();

        assert_eq!(removed, 1);
        assert_eq!(df.height(), 2);
        assert_eq!(labels, vec![0.0, 2.0]);
        let b: Vec<Option<&str>> = df.column("B").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(b, vec![Some("x"), Some("z")]);
    }

    #[test]
    fn test_remove_nothing_missing() {
        let mut df = df!["A" => [1i64, 2]].unwrap();
        let series = df.column("A").unwrap().as_materialized_series().clone();
        let mut labels = vec![0.0, 1.0];

        assert_eq!(
            RowRemover::remove_missing(&mut df, &series, &mut labels).unwrap(),
            0
        );
        assert_eq!(df.height(), 2);
    }
}
