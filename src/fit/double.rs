//! Double-exponential decay, `y = a1·exp(−x/t1) + a2·exp(−x/t2)`.
//!
//! For fixed `(t1, t2)` the model is linear in the amplitudes, so we:
//! - build a log-spaced grid of ordered `(t1 < t2)` pairs over the sampled time
//!   scales
//! - solve the amplitudes by least squares for every pair (in parallel)
//! - keep the pair with the lowest SSE, ties broken by grid index
//!
//! This is deterministic for a given input, which keeps repeated fits of the
//! same decay stable.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::error::AppError;
use crate::fit::tau_grid::{bounds_for_samples, tau_pairs};
use crate::fit::{DecayFunction, DecayFunctionModel, ExponentialsDecay, FitRange};
use crate::math::solve_least_squares;

/// Minimum sample count: two amplitudes plus two time constants.
pub const MIN_SAMPLES: usize = 4;

const GRID_STEPS: usize = 48;
const MIN_RATIO: f64 = 1.5;

#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleExponential;

#[derive(Debug, Clone)]
struct Candidate {
    idx: usize,
    taus: [f64; 2],
    amplitudes: [f64; 2],
    sse: f64,
}

impl DecayFunctionModel for DoubleExponential {
    fn id(&self) -> &'static str {
        "2exp"
    }

    fn display_name(&self) -> &'static str {
        "Double exponential decay"
    }

    fn fit(&self, x: &[f64], y: &[f64], args: Option<&str>) -> Result<Box<dyn DecayFunction>, AppError> {
        let (x, y) = FitRange::parse(args)?.apply(x, y);
        let best = fit_double(&x, &y)?;
        Ok(Box::new(ExponentialsDecay::new(
            best.amplitudes.to_vec(),
            best.taus.to_vec(),
        )?))
    }
}

fn fit_double(x: &[f64], y: &[f64]) -> Result<Candidate, AppError> {
    if x.len() != y.len() {
        return Err(AppError::argument_mismatch(format!(
            "Fit inputs differ in length after range selection: x={}, y={}.",
            x.len(),
            y.len()
        )));
    }
    if x.len() < MIN_SAMPLES {
        return Err(AppError::insufficient_data(format!(
            "Double exponential fit needs at least {MIN_SAMPLES} samples, got {}.",
            x.len()
        )));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(AppError::numerical("Fit inputs contain non-finite values."));
    }

    let (lo, hi) = bounds_for_samples(x)
        .ok_or_else(|| AppError::insufficient_data("Samples do not span a positive time range."))?;
    let grid = tau_pairs(lo, hi, GRID_STEPS, MIN_RATIO)?;

    let candidates: Vec<Candidate> = grid
        .par_iter()
        .enumerate()
        .filter_map(|(idx, taus)| {
            evaluate_candidate(x, y, taus).map(|(amplitudes, sse)| Candidate {
                idx,
                taus: *taus,
                amplitudes,
                sse,
            })
        })
        .collect();

    // Deterministic selection: pick the minimum SSE; break ties by original grid index.
    let best = candidates
        .into_iter()
        .reduce(|best, c| {
            if c.sse < best.sse || (c.sse == best.sse && c.idx < best.idx) {
                c
            } else {
                best
            }
        })
        .ok_or_else(|| AppError::numerical("No valid double exponential candidates."))?;

    log::debug!(
        "2exp best t1={:e} t2={:e} sse={:e} (grid of {})",
        best.taus[0],
        best.taus[1],
        best.sse,
        grid.len()
    );
    Ok(best)
}

fn evaluate_candidate(x: &[f64], y: &[f64], taus: &[f64; 2]) -> Option<([f64; 2], f64)> {
    let n = x.len();
    let design = DMatrix::from_fn(n, 2, |i, j| (-x[i] / taus[j]).exp());
    let target = DVector::from_column_slice(y);

    let beta = solve_least_squares(&design, &target)?;
    let amplitudes = [beta[0], beta[1]];

    let sse: f64 = x
        .iter()
        .zip(y)
        .map(|(&xi, &yi)| {
            let fit = amplitudes[0] * (-xi / taus[0]).exp() + amplitudes[1] * (-xi / taus[1]).exp();
            (yi - fit).powi(2)
        })
        .sum();

    sse.is_finite().then_some((amplitudes, sse))
}
