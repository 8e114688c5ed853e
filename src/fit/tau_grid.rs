//! Time-constant grids for the multi-exponential search.
//!
//! The double-exponential model is linear in its amplitudes once both time
//! constants are fixed, so it is fitted by a deterministic grid search over
//! `(t1, t2)` pairs with a linear solve per pair.

use crate::error::AppError;

/// Generate `steps` log-spaced points between `min` and `max` (inclusive).
pub fn log_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > min) {
        return Err(AppError::invalid_range(format!(
            "Invalid time-constant range: min={min}, max={max} (must be finite, >0, and max>min)."
        )));
    }
    if steps < 2 {
        return Err(AppError::invalid_value("Time-constant grid needs at least 2 steps."));
    }

    let ln_min = min.ln();
    let step = (max.ln() - ln_min) / (steps as f64 - 1.0);
    Ok((0..steps).map(|i| (ln_min + step * i as f64).exp()).collect())
}

/// Ordered pairs `[t1, t2]` with `t2 >= t1 · min_ratio` (and `t1 < t2`).
pub fn tau_pairs(min: f64, max: f64, steps: usize, min_ratio: f64) -> Result<Vec<[f64; 2]>, AppError> {
    let values = log_space(min, max, steps)?;
    let min_ratio = min_ratio.max(1.0);
    let mut out = Vec::new();
    for i in 0..values.len() {
        for j in (i + 1)..values.len() {
            if values[j] >= values[i] * min_ratio {
                out.push([values[i], values[j]]);
            }
        }
    }
    Ok(out)
}

/// Grid bounds covering the time scales resolvable from `x`.
///
/// The shortest constant is the smallest positive sample spacing, the longest
/// is a few times the sampled span.
pub fn bounds_for_samples(x: &[f64]) -> Option<(f64, f64)> {
    let span = x.last()? - x.first()?;
    let min_step = x
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|d| *d > 0.0)
        .fold(f64::INFINITY, f64::min);
    if !(span > 0.0 && min_step.is_finite()) {
        return None;
    }
    Some((min_step, 4.0 * span))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_space_includes_endpoints() {
        let v = log_space(0.1, 10.0, 5).unwrap();
        assert!((v[0] - 0.1).abs() < 1e-12);
        assert!((v[v.len() - 1] - 10.0).abs() < 1e-12);
        assert!(log_space(1.0, 1.0, 5).is_err());
    }

    #[test]
    fn pairs_are_ordered() {
        let grid = tau_pairs(0.1, 10.0, 6, 1.5).unwrap();
        assert!(!grid.is_empty());
        for [a, b] in grid {
            assert!(a < b && b >= 1.5 * a);
        }
    }

    #[test]
    fn bounds_follow_sampling() {
        let (lo, hi) = bounds_for_samples(&[0.0, 0.5, 1.0, 2.0]).unwrap();
        assert!((lo - 0.5).abs() < 1e-12);
        assert!((hi - 8.0).abs() < 1e-12);
        assert!(bounds_for_samples(&[1.0]).is_none());
    }
}
