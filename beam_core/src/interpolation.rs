//! # Curve Interpolation
//!
//! Resampling of a sparse force table onto a dense, evenly spaced grid.
//!
//! - [`InterpolationKind::Linear`] joins neighbouring samples with straight
//!   lines. Shear force is piecewise linear under distributed loads, so this
//!   is exact for the usual inputs.
//! - [`InterpolationKind::Quadratic`] fits an interpolating quadratic
//!   B-spline. Knots sit at the two ends (triple) and at the midpoints between
//!   interior samples, which makes the collocation system square and
//!   reproduces any parabola exactly, the shape a bending moment takes under
//!   a uniform load.
//!
//! Both kinds need strictly increasing, finite positions.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::errors::{ReportError, ReportResult};

/// How values between samples are estimated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationKind {
    Linear,
    Quadratic,
}

/// `count` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Reject non-finite values and positions that do not strictly increase.
pub fn check_positions(xs: &[f64]) -> ReportResult<()> {
    if let Some(i) = xs.iter().position(|x| !x.is_finite()) {
        return Err(ReportError::interpolation(i, format!("position {} is not finite", xs[i])));
    }
    for (i, pair) in xs.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(ReportError::interpolation(
                i + 1,
                format!(
                    "positions must be strictly increasing ({} follows {})",
                    pair[1], pair[0]
                ),
            ));
        }
    }
    Ok(())
}

/// A fitted curve that can be evaluated anywhere in its domain
#[derive(Debug, Clone)]
pub enum Interpolant {
    Linear { xs: Vec<f64>, ys: Vec<f64> },
    Quadratic(QuadraticSpline),
}

impl Interpolant {
    /// Fit a curve through `(xs[i], ys[i])`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use beam_core::interpolation::{Interpolant, InterpolationKind};
    ///
    /// let f = Interpolant::fit(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0], InterpolationKind::Quadratic)?;
    /// assert!((f.eval(1.5) - 2.25).abs() < 1e-9);
    /// # Ok::<(), beam_core::errors::ReportError>(())
    /// ```
    pub fn fit(xs: &[f64], ys: &[f64], kind: InterpolationKind) -> ReportResult<Self> {
        if xs.len() != ys.len() {
            return Err(ReportError::interpolation(
                xs.len().min(ys.len()),
                format!("{} positions but {} values", xs.len(), ys.len()),
            ));
        }
        if xs.len() < 2 {
            return Err(ReportError::interpolation(0, "at least two samples are required"));
        }
        check_positions(xs)?;
        if let Some(i) = ys.iter().position(|y| !y.is_finite()) {
            return Err(ReportError::interpolation(i, format!("value {} is not finite", ys[i])));
        }

        match kind {
            InterpolationKind::Linear => Ok(Interpolant::Linear {
                xs: xs.to_vec(),
                ys: ys.to_vec(),
            }),
            InterpolationKind::Quadratic if xs.len() < 3 => Err(ReportError::interpolation(
                0,
                "quadratic interpolation needs at least three samples",
            )),
            InterpolationKind::Quadratic => QuadraticSpline::fit(xs, ys).map(Interpolant::Quadratic),
        }
    }

    /// Evaluate at `x`. Points outside the data range are extrapolated from
    /// the nearest segment.
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Interpolant::Linear { xs, ys } => {
                let i = segment_index(xs, x);
                let t = (x - xs[i]) / (xs[i + 1] - xs[i]);
                ys[i] + t * (ys[i + 1] - ys[i])
            }
            Interpolant::Quadratic(spline) => spline.eval(x),
        }
    }
}

/// Resample `(xs, ys)` onto `count` evenly spaced positions spanning the data.
///
/// Returns the new positions and the interpolated values.
pub fn resample(
    xs: &[f64],
    ys: &[f64],
    kind: InterpolationKind,
    count: usize,
) -> ReportResult<(Vec<f64>, Vec<f64>)> {
    let curve = Interpolant::fit(xs, ys, kind)?;
    let grid = linspace(xs[0], xs[xs.len() - 1], count);
    let values = grid.iter().map(|&x| curve.eval(x)).collect();
    Ok((grid, values))
}

/// Index `i` of the interval `[xs[i], xs[i + 1]]` containing `x`, clamped to
/// the first and last interval.
fn segment_index(xs: &[f64], x: f64) -> usize {
    let last = xs.len() - 2;
    match xs.partition_point(|&k| k <= x) {
        0 => 0,
        p => (p - 1).min(last),
    }
}

/// Interpolating quadratic B-spline
#[derive(Debug, Clone)]
pub struct QuadraticSpline {
    knots: Vec<f64>,
    coefficients: Vec<f64>,
}

const DEGREE: usize = 2;

impl QuadraticSpline {
    /// Solve the collocation system for the spline through every sample.
    pub fn fit(xs: &[f64], ys: &[f64]) -> ReportResult<Self> {
        let n = xs.len();
        let first = xs[0];
        let last = xs[n - 1];

        let mut knots = Vec::with_capacity(n + DEGREE + 1);
        knots.extend([first; DEGREE + 1]);
        knots.extend((1..n - 2).map(|i| 0.5 * (xs[i] + xs[i + 1])));
        knots.extend([last; DEGREE + 1]);

        let mut matrix = DMatrix::<f64>::zeros(n, n);
        for (row, &x) in xs.iter().enumerate() {
            let span = knot_span(&knots, n, x);
            let basis = basis_functions(&knots, span, x);
            for (j, b) in basis.iter().enumerate() {
                matrix[(row, span - DEGREE + j)] = *b;
            }
        }

        let rhs = DVector::from_column_slice(ys);
        let solution = matrix.lu().solve(&rhs).ok_or_else(|| {
            ReportError::interpolation(0, "quadratic spline system is singular")
        })?;

        Ok(QuadraticSpline {
            knots,
            coefficients: solution.iter().copied().collect(),
        })
    }

    pub fn eval(&self, x: f64) -> f64 {
        let n = self.coefficients.len();
        let span = knot_span(&self.knots, n, x);
        basis_functions(&self.knots, span, x)
            .iter()
            .enumerate()
            .map(|(j, b)| b * self.coefficients[span - DEGREE + j])
            .sum()
    }
}

/// Knot interval `[t[span], t[span + 1])` holding `x`, restricted to the
/// spline's valid range so the right end point and extrapolation land in the
/// last non-empty interval.
fn knot_span(knots: &[f64], n_coefficients: usize, x: f64) -> usize {
    let low = DEGREE;
    let high = n_coefficients - 1;
    let p = knots.partition_point(|&k| k <= x);
    p.saturating_sub(1).clamp(low, high)
}

/// The `DEGREE + 1` basis functions that are non-zero on `span`, evaluated
/// at `x` (de Boor / Cox recurrence).
fn basis_functions(knots: &[f64], span: usize, x: f64) -> [f64; DEGREE + 1] {
    let mut n = [0.0; DEGREE + 1];
    let mut left = [0.0; DEGREE + 1];
    let mut right = [0.0; DEGREE + 1];
    n[0] = 1.0;
    for j in 1..=DEGREE {
        left[j] = x - knots[span + 1 - j];
        right[j] = knots[span + j] - x;
        let mut saved = 0.0;
        for r in 0..j {
            let temp = n[r] / (right[r + 1] + left[j - r]);
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        n[j] = saved;
    }
    n
}
