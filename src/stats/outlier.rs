//! Sample moments and Smirnov–Grubbs outlier rejection.

use log::{debug, warn};

use crate::error::AppError;
use crate::stats::StudentT;

/// Significance level used when none is configured.
pub const DEFAULT_ALPHA: f64 = 0.05;

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// `Σx²/n' − (Σx/n')²` with `n' = n − ddof`.
pub fn variance(values: &[f64], ddof: usize) -> f64 {
    let n = values.len().saturating_sub(ddof) as f64;
    let (s, s2) = values
        .iter()
        .fold((0.0, 0.0), |(s, s2), &x| (s + x, s2 + x * x));
    let avg = s / n;
    s2 / n - avg * avg
}

pub fn standard_deviation(values: &[f64], ddof: usize) -> f64 {
    variance(values, ddof).sqrt()
}

/// Remove outliers one at a time until the most extreme value passes the
/// Grubbs test at significance `alpha`.
///
/// Returns the surviving values in ascending order. Samples of two or fewer
/// values, and samples with zero spread, are returned unchanged (sorted).
pub fn smirnov_grubbs(values: &[f64], alpha: f64) -> Result<Vec<f64>, AppError> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(AppError::invalid_value(format!(
            "Grubbs significance level must be in (0, 1), got {alpha}."
        )));
    }
    if let Some(v) = values.iter().find(|v| !v.is_finite()) {
        return Err(AppError::invalid_value(format!(
            "Grubbs test needs finite values, got {v}."
        )));
    }

    let mut data = values.to_vec();
    data.sort_by(f64::total_cmp);

    while data.len() > 2 {
        let n = data.len();
        let avg = mean(&data);
        let std = standard_deviation(&data, 0);
        if !(std > 0.0) {
            break;
        }

        let nf = n as f64;
        let t = StudentT::new((n - 2) as u32).isf(alpha / (2.0 * nf));
        let tau = (nf - 1.0) * t / (nf * (nf - 2.0) + nf * t * t).sqrt();

        let (lo, hi) = (data[0], data[n - 1]);
        let (far_idx, far) = if (hi - avg).abs() > (avg - lo).abs() {
            (n - 1, hi)
        } else {
            (0, lo)
        };
        let tau_far = (far - avg).abs() / std;
        debug!("grubbs n={n} critical={tau:.4} candidate={far} score={tau_far:.4}");

        if tau_far < tau {
            break;
        }
        warn!("Rejected outlier {far} (score {tau_far:.3} >= {tau:.3}, n={n}).");
        data.remove(far_idx);
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variance_with_ddof() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!((variance(&v, 0) - 1.25).abs() < 1e-12);
        assert!((standard_deviation(&v, 0) - 1.25f64.sqrt()).abs() < 1e-12);
        assert!((mean(&v) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_single_outlier() {
        let kept = smirnov_grubbs(&[10.0, 11.0, 9.0, 10.0, 50.0], DEFAULT_ALPHA).unwrap();
        assert_eq!(kept, vec![9.0, 10.0, 10.0, 11.0]);
    }

    #[test]
    fn keeps_clean_samples() {
        let kept = smirnov_grubbs(&[3.0, 1.0, 2.0, 4.0, 5.0], DEFAULT_ALPHA).unwrap();
        assert_eq!(kept, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn zero_spread_and_tiny_samples() {
        assert_eq!(smirnov_grubbs(&[7.0; 6], DEFAULT_ALPHA).unwrap(), vec![7.0; 6]);
        assert_eq!(smirnov_grubbs(&[100.0, 1.0], DEFAULT_ALPHA).unwrap(), vec![1.0, 100.0]);
        assert!(smirnov_grubbs(&[], DEFAULT_ALPHA).unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_alpha() {
        assert!(smirnov_grubbs(&[1.0, 2.0, 3.0], 0.0).is_err());
        assert!(smirnov_grubbs(&[1.0, 2.0, 3.0], 1.5).is_err());
    }
}
