//! Interpolation of missing numeric values.
//!
//! `linear` treats rows as equally spaced and also carries the last known
//! value over trailing gaps. The other methods interpolate against row labels
//! (the original row positions, which survive row removal) and only fill
//! gaps that lie strictly between known points:
//!
//! - `nearest`: value of the closest known label, the lower one on a tie
//! - `slinear`: piecewise linear between the neighbouring known labels
//! - `quadratic`: interpolating B-spline of degree 2, knots at midpoints
//! - `cubic`: interpolating B-spline of degree 3, not-a-knot ends
//!
//! Leading gaps are never filled.

use crate::config::InterpolationMethod;
use thiserror::Error;

/// Interpolation failures, without column context.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpolationError {
    #[error("needs at least {required} known values, found {found}")]
    InsufficientData { required: usize, found: usize },

    #[error("spline system is singular")]
    SingularSystem,
}

/// Fill the interior gaps of `values` with the given method.
///
/// `labels` holds one strictly increasing position per value. A column with
/// no known value is returned unchanged.
pub fn interpolate(
    values: &[Option<f64>],
    labels: &[f64],
    method: InterpolationMethod,
) -> Result<Vec<Option<f64>>, InterpolationError> {
    debug_assert_eq!(values.len(), labels.len());

    let known: Vec<usize> = values
        .iter()
        .enumerate()
        .filter_map(|(row, v)| v.map(|_| row))
        .collect();

    if known.is_empty() {
        return Ok(values.to_vec());
    }
    if known.len() < method.min_points() {
        return Err(InterpolationError::InsufficientData {
            required: method.min_points(),
            found: known.len(),
        });
    }

    match method {
        InterpolationMethod::Linear => Ok(linear(values, &known)),
        InterpolationMethod::Nearest => Ok(fill_interior(values, &known, |row, prev, next| {
            let (x, x0, x1) = (labels[row], labels[prev], labels[next]);
            if x - x0 <= x1 - x { values[prev] } else { values[next] }
        })),
        InterpolationMethod::Slinear => Ok(fill_interior(values, &known, |row, prev, next| {
            let (x0, x1) = (labels[prev], labels[next]);
            let (y0, y1) = (values[prev]?, values[next]?);
            Some(y0 + (y1 - y0) * (labels[row] - x0) / (x1 - x0))
        })),
        InterpolationMethod::Quadratic | InterpolationMethod::Cubic => {
            let degree = method.spline_degree().unwrap_or(3);
            let xs: Vec<f64> = known.iter().map(|&row| labels[row]).collect();
            let ys: Vec<f64> = known.iter().filter_map(|&row| values[row]).collect();
            let spline = BSpline::interpolating(&xs, &ys, degree)?;
            Ok(fill_interior(values, &known, |row, _, _| {
                Some(spline.evaluate(labels[row]))
            }))
        }
    }
}

/// Position-based linear interpolation with trailing carry-forward.
fn linear(values: &[Option<f64>], known: &[usize]) -> Vec<Option<f64>> {
    let mut out = values.to_vec();
    for pair in known.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let (Some(y0), Some(y1)) = (values[start], values[end]) else {
            continue;
        };
        let span = (end - start) as f64;
        for row in start + 1..end {
            out[row] = Some(y0 + (y1 - y0) * (row - start) as f64 / span);
        }
    }
    if let Some(&last) = known.last() {
        for slot in out.iter_mut().skip(last + 1) {
            *slot = values[last];
        }
    }
    out
}

/// Apply `fill(row, prev_known, next_known)` to every missing row that has a
/// known neighbour on both sides.
fn fill_interior<F>(values: &[Option<f64>], known: &[usize], mut fill: F) -> Vec<Option<f64>>
where
    F: FnMut(usize, usize, usize) -> Option<f64>,
{
    let mut out = values.to_vec();
    for pair in known.windows(2) {
        for row in pair[0] + 1..pair[1] {
            out[row] = fill(row, pair[0], pair[1]);
        }
    }
    out
}

// =============================================================================
// B-spline interpolation
// =============================================================================

/// A B-spline curve defined by its knot vector and coefficients.
#[derive(Debug, Clone)]
struct BSpline {
    knots: Vec<f64>,
    coefs: Vec<f64>,
    degree: usize,
}

impl BSpline {
    /// Build the spline of `degree` passing through every `(x, y)` point.
    ///
    /// Even degrees place interior knots halfway between data points; odd
    /// degrees place them on data points, dropping the ones next to each end.
    fn interpolating(x: &[f64], y: &[f64], degree: usize) -> Result<Self, InterpolationError> {
        let n = x.len();
        if n <= degree {
            return Err(InterpolationError::InsufficientData {
                required: degree + 1,
                found: n,
            });
        }

        let mut knots = vec![x[0]; degree + 1];
        if degree % 2 == 0 {
            let half = degree / 2;
            knots.extend((half..n - half - 1).map(|i| (x[i] + x[i + 1]) / 2.0));
        } else {
            let half = (degree - 1) / 2;
            knots.extend_from_slice(&x[half + 1..n - half - 1]);
        }
        knots.extend(std::iter::repeat_n(x[n - 1], degree + 1));

        let mut spline = BSpline {
            knots,
            coefs: Vec::new(),
            degree,
        };

        // Collocation matrix in band storage: column j of row i lives at
        // j + degree - i.
        let width = 2 * degree + 1;
        let mut band = vec![vec![0.0; width]; n];
        for (row, &xi) in x.iter().enumerate() {
            let span = spline.find_span(xi);
            let basis = spline.basis(span, xi);
            for (offset, value) in basis.into_iter().enumerate() {
                let col = span - degree + offset;
                let slot = (col + degree)
                    .checked_sub(row)
                    .filter(|&slot| slot < width)
                    .ok_or(InterpolationError::SingularSystem)?;
                band[row][slot] = value;
            }
        }

        spline.coefs = solve_banded(band, y.to_vec(), degree)?;
        Ok(spline)
    }

    fn coef_count(&self) -> usize {
        self.knots.len() - self.degree - 1
    }

    /// Knot interval `s` with `knots[s] <= x < knots[s + 1]`, clamped to the
    /// valid range so the right end point belongs to the last interval.
    fn find_span(&self, x: f64) -> usize {
        let k = self.degree;
        let n = self.coef_count();
        let below = self.knots[k..=n].partition_point(|&t| t <= x);
        (k + below).saturating_sub(1).clamp(k, n - 1)
    }

    /// Values of the `degree + 1` basis functions that are non-zero on `span`.
    fn basis(&self, span: usize, x: f64) -> Vec<f64> {
        let k = self.degree;
        let t = &self.knots;
        let mut values = vec![0.0; k + 1];
        let mut left = vec![0.0; k + 1];
        let mut right = vec![0.0; k + 1];
        values[0] = 1.0;

        for j in 1..=k {
            left[j] = x - t[span + 1 - j];
            right[j] = t[span + j] - x;
            let mut saved = 0.0;
            for r in 0..j {
                let denom = right[r + 1] + left[j - r];
                let temp = if denom == 0.0 { 0.0 } else { values[r] / denom };
                values[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            values[j] = saved;
        }
        values
    }

    fn evaluate(&self, x: f64) -> f64 {
        let span = self.find_span(x);
        self.basis(span, x)
            .into_iter()
            .enumerate()
            .map(|(offset, b)| b * self.coefs[span - self.degree + offset])
            .sum()
    }
}

/// Solve a banded system by Gaussian elimination without pivoting.
///
/// B-spline collocation matrices are totally positive, so the diagonal stays
/// non-zero for distinct data sites.
fn solve_banded(
    mut band: Vec<Vec<f64>>,
    mut rhs: Vec<f64>,
    k: usize,
) -> Result<Vec<f64>, InterpolationError> {
    let n = rhs.len();
    let at = |row: usize, col: usize| col + k - row;

    for col in 0..n {
        let pivot = band[col][at(col, col)];
        if pivot.abs() < f64::EPSILON * 1e-3 {
            return Err(InterpolationError::SingularSystem);
        }
        for row in col + 1..n.min(col + k + 1) {
            let factor = band[row][at(row, col)] / pivot;
            if factor == 0.0 {
                continue;
            }
            for j in col..n.min(col + k + 1) {
                let value = band[col][at(col, j)];
                band[row][at(row, j)] -= factor * value;
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n.min(row + k + 1))
            .map(|j| band[row][at(row, j)] * solution[j])
            .sum();
        solution[row] = (rhs[row] - tail) / band[row][at(row, row)];
    }
    Ok(solution)
}
