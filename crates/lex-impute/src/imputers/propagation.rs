//! Forward and backward fill.

use crate::error::Result;
use polars::prelude::*;

/// Propagates neighbouring values into missing cells.
pub struct PropagationImputer;

impl PropagationImputer {
    /// Carry the last present value forward. Leading nulls stay null.
    pub fn forward_fill(series: &Series) -> Result<Series> {
        Ok(series.fill_null(FillNullStrategy::Forward(None))?)
    }

    /// Carry the next present value backward. Trailing nulls stay null.
    pub fn backward_fill(series: &Series) -> Result<Series> {
        Ok(series.fill_null(FillNullStrategy::Backward(None))?)
    }
}
