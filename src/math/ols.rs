//! Least squares solvers.
//!
//! Two flavours are used by the decay models:
//!
//! ```text
//! y ≈ b0 + b1·x                 (closed form, single exponential in log space)
//! y ≈ Σ a_j·f_j(x)               (SVD, multi-exponential with fixed time constants)
//! ```
//!
//! The multi-term problem is solved with SVD so tall design matrices (many more
//! samples than terms) work, and nearly collinear columns (two time constants
//! close together) degrade gracefully instead of failing outright.

use nalgebra::{DMatrix, DVector};

use crate::error::AppError;

/// Sums of a simple linear regression.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegressionSums {
    pub n: f64,
    pub sx: f64,
    pub sy: f64,
    pub sxx: f64,
    pub sxy: f64,
}

impl RegressionSums {
    pub fn collect(x: &[f64], y: &[f64]) -> Result<Self, AppError> {
        if x.len() != y.len() {
            return Err(AppError::argument_mismatch(format!(
                "Regression inputs differ in length: x={}, y={}.",
                x.len(),
                y.len()
            )));
        }
        let mut s = Self { n: x.len() as f64, ..Self::default() };
        for (&xi, &yi) in x.iter().zip(y) {
            s.sx += xi;
            s.sy += yi;
            s.sxx += xi * xi;
            s.sxy += xi * yi;
        }
        Ok(s)
    }

    /// `(Σx)² − n·Σx²`, the (negated) normal-equation determinant.
    pub fn determinant(&self) -> f64 {
        self.sx * self.sx - self.n * self.sxx
    }
}

/// Closed-form fit of `y = intercept + slope·x`.
///
/// Returns `(intercept, slope)`. A degenerate `x` (all equal, or fewer than two
/// samples) yields non-finite values rather than an error.
pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<(f64, f64), AppError> {
    let s = RegressionSums::collect(x, y)?;
    let d = s.determinant();
    let intercept = (s.sx * s.sxy - s.sxx * s.sy) / d;
    let slope = -(s.n * s.sxy - s.sx * s.sy) / d;
    Ok((intercept, slope))
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn closed_form_matches_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y: Vec<f64> = x.iter().map(|v| 1.5 - 0.25 * v).collect();
        let (b0, b1) = linear_regression(&x, &y).unwrap();
        assert!((b0 - 1.5).abs() < 1e-12);
        assert!((b1 + 0.25).abs() < 1e-12);
    }

    #[test]
    fn closed_form_rejects_length_mismatch() {
        assert!(linear_regression(&[1.0, 2.0], &[1.0]).is_err());
    }
}
