//! Imputation module for handling missing values.
//!
//! This module provides the per-column strategies:
//! - Statistical imputation (mean, median, mode, zero)
//! - Propagation (forward fill, backward fill)
//! - Interpolation (nearest, linear, slinear, quadratic, cubic)
//! - Row removal

mod interpolation;
mod propagation;
mod rows;
mod statistical;

pub use interpolation::{InterpolationError, interpolate};
pub use propagation::PropagationImputer;
pub use rows::RowRemover;
pub use statistical::{StatisticalImputer, mode_index};
