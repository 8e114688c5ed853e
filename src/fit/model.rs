//! Decay functions and the models that produce them.
//!
//! A [`DecayFunctionModel`] turns `(x, y)` samples into a fitted
//! [`DecayFunction`]. Every built-in model yields an [`ExponentialsDecay`]:
//!
//! ```text
//! y(t) = Σ a_i · exp(−t / t_i)
//! ```

use std::fmt::Debug;

use crate::domain::{ScientificValue, Signal, Time};
use crate::error::AppError;

/// A fitted decay curve.
pub trait DecayFunction: Debug + Send + Sync {
    /// Amplitude-weighted mean time constant.
    fn time_constant(&self) -> Time;

    fn evaluate(&self, t: Time) -> Signal;

    /// `(amplitude, time constant)` per exponential term.
    fn terms(&self) -> Vec<(Signal, Time)>;
}

/// A fitting procedure, addressable by a stable id.
pub trait DecayFunctionModel: Send + Sync {
    fn id(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    /// Fit `y(x)` where `x` is in seconds and `y` in OD.
    ///
    /// `args` is a model-specific argument string; the built-in models take a
    /// fitting range such as `"1 us-10 us"`.
    fn fit(&self, x: &[f64], y: &[f64], args: Option<&str>) -> Result<Box<dyn DecayFunction>, AppError>;
}

/// Sum of exponentials.
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialsDecay {
    amplitudes: Vec<f64>,
    time_constants: Vec<f64>,
}

impl ExponentialsDecay {
    pub fn new(amplitudes: Vec<f64>, time_constants: Vec<f64>) -> Result<Self, AppError> {
        if amplitudes.len() != time_constants.len() {
            return Err(AppError::argument_mismatch(format!(
                "{} amplitudes but {} time constants.",
                amplitudes.len(),
                time_constants.len()
            )));
        }
        Ok(Self {
            amplitudes,
            time_constants,
        })
    }

    pub fn amplitudes(&self) -> &[f64] {
        &self.amplitudes
    }

    pub fn time_constants(&self) -> &[f64] {
        &self.time_constants
    }
}

impl DecayFunction for ExponentialsDecay {
    fn time_constant(&self) -> Time {
        let (weighted, total) = self
            .amplitudes
            .iter()
            .zip(&self.time_constants)
            .fold((0.0, 0.0), |(w, s), (a, t)| (w + a * t, s + a));
        Time::new(weighted / total)
    }

    fn evaluate(&self, t: Time) -> Signal {
        let x = t.seconds();
        Signal::new(
            self.amplitudes
                .iter()
                .zip(&self.time_constants)
                .map(|(a, tc)| a * (-x / tc).exp())
                .sum(),
        )
    }

    fn terms(&self) -> Vec<(Signal, Time)> {
        self.amplitudes
            .iter()
            .zip(&self.time_constants)
            .map(|(&a, &t)| (Signal::new(a), Time::new(t)))
            .collect()
    }
}

/// `"1.2 us"`-style text of the mean time constant, as shown next to a plot.
pub fn time_constant_text(function: &dyn DecayFunction) -> String {
    ScientificValue::new(function.time_constant()).text()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_time_constant() {
        let f = ExponentialsDecay::new(vec![1.0, 3.0], vec![1e-6, 5e-6]).unwrap();
        assert!((f.time_constant().seconds() - 4e-6).abs() < 1e-18);
        assert_eq!(time_constant_text(&f), "4 us");
    }

    #[test]
    fn evaluate_sums_terms() {
        let f = ExponentialsDecay::new(vec![2.0, 1.0], vec![1.0, 2.0]).unwrap();
        let expected = 2.0 * (-1.0f64).exp() + (-0.5f64).exp();
        assert!((f.evaluate(Time::new(1.0)).od() - expected).abs() < 1e-12);
        assert_eq!(f.terms().len(), 2);
    }

    #[test]
    fn mismatched_terms() {
        assert!(ExponentialsDecay::new(vec![1.0], vec![]).is_err());
    }
}
