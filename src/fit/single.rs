//! Single-exponential decay, `y = a·exp(−x/t)`.
//!
//! Fitted as a straight line in log space, `ln y = ln a − x/t`, with the
//! closed-form normal equations. Non-positive `y` samples produce NaN
//! parameters; callers pass `|signal|` to avoid that for sign-flipped data.

use crate::error::AppError;
use crate::fit::{DecayFunction, DecayFunctionModel, ExponentialsDecay, FitRange};
use crate::math::linear_regression;

#[derive(Debug, Clone, Copy, Default)]
pub struct SingleExponential;

impl DecayFunctionModel for SingleExponential {
    fn id(&self) -> &'static str {
        "1exp"
    }

    fn display_name(&self) -> &'static str {
        "Single exponential decay"
    }

    fn fit(&self, x: &[f64], y: &[f64], args: Option<&str>) -> Result<Box<dyn DecayFunction>, AppError> {
        let (x, y) = FitRange::parse(args)?.apply(x, y);
        let (amplitude, time_constant) = fit_single(&x, &y)?;
        Ok(Box::new(ExponentialsDecay::new(vec![amplitude], vec![time_constant])?))
    }
}

/// `(a, t)` for `y = a·exp(−x/t)`.
pub fn fit_single(x: &[f64], y: &[f64]) -> Result<(f64, f64), AppError> {
    if x.len() != y.len() {
        return Err(AppError::argument_mismatch(format!(
            "Fit inputs differ in length after range selection: x={}, y={}.",
            x.len(),
            y.len()
        )));
    }

    let ln_y: Vec<f64> = y.iter().map(|v| v.ln()).collect();
    let (ln_a, slope) = linear_regression(x, &ln_y)?;
    Ok((ln_a.exp(), -1.0 / slope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Time;

    #[test]
    fn recovers_amplitude_and_time_constant() {
        let x: Vec<f64> = (0..=20).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * (-v / 3.0).exp()).collect();

        let f = SingleExponential.fit(&x, &y, None).unwrap();
        let terms = f.terms();
        assert_eq!(terms.len(), 1);
        assert!((terms[0].0.od() - 2.0).abs() < 1e-9);
        assert!((terms[0].1.seconds() - 3.0).abs() < 1e-9);
        assert!((f.time_constant().seconds() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn honours_fit_range() {
        // Samples before 5 s follow a different curve and must be ignored.
        let x: Vec<f64> = (0..=20).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .map(|&v| if v < 5.0 { 100.0 } else { 0.5 * (-v / 4.0).exp() })
            .collect();

        let f = SingleExponential.fit(&x, &y, Some("5 s-")).unwrap();
        assert!((f.time_constant().seconds() - 4.0).abs() < 1e-9);
        assert!((f.evaluate(Time::new(8.0)).od() - 0.5 * (-2.0f64).exp()).abs() < 1e-9);
    }

    #[test]
    fn length_mismatch() {
        let err = SingleExponential.fit(&[0.0, 1.0, 2.0], &[1.0, 0.5], None).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::ArgumentMismatch);
    }

    #[test]
    fn non_positive_signal_yields_nan() {
        let (a, _) = fit_single(&[0.0, 1.0, 2.0], &[1.0, -0.5, 0.25]).unwrap();
        assert!(a.is_nan());
    }
}
