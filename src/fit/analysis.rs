//! Fitting a kinetic trace.

use crate::domain::Time;
use crate::error::AppError;
use crate::fit::{DecayFunction, DecayFunctionModel};
use crate::spectra::Decay;

/// Fit the post-t0 part of `decay` (samples with `time >= 0`).
///
/// The model sees `x` in seconds and `y = |signal|` in OD, so bleach
/// (negative) signals decay the same way as induced absorption.
pub fn fit_decay(
    decay: &Decay,
    model: &dyn DecayFunctionModel,
    args: Option<&str>,
) -> Result<Box<dyn DecayFunction>, AppError> {
    let start = decay.first_index_from(Time::ZERO).ok_or_else(|| {
        AppError::empty_search("Decay has no samples at or after t = 0 to fit.")
    })?;

    let (x, y): (Vec<f64>, Vec<f64>) = decay
        .iter()
        .skip(start)
        .map(|(t, s)| (t.seconds(), s.od().abs()))
        .unzip();

    log::debug!("fitting {} with {} samples from index {start}", model.id(), x.len());
    model.fit(&x, &y, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Signal;
    use crate::fit::SingleExponential;

    #[test]
    fn fits_from_time_zero_on_absolute_signal() {
        let times: Vec<Time> = (-5..=20).map(|i| Time::new(i as f64 * 1e-6)).collect();
        let signals: Vec<Signal> = times
            .iter()
            .map(|t| {
                if *t < Time::ZERO {
                    Signal::new(0.3)
                } else {
                    Signal::new(-2e-3 * (-t.seconds() / 3e-6).exp())
                }
            })
            .collect();
        let decay = Decay::new(times, signals).unwrap();

        let f = fit_decay(&decay, &SingleExponential, None).unwrap();
        assert!((f.time_constant().seconds() - 3e-6).abs() < 1e-12);
        assert!((f.terms()[0].0.od() - 2e-3).abs() < 1e-9);
    }

    #[test]
    fn no_post_zero_samples() {
        let decay = Decay::new(vec![Time::new(-2.0), Time::new(-1.0)], vec![Signal::ZERO; 2]).unwrap();
        let err = fit_decay(&decay, &SingleExponential, None).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::EmptySearchResult);
    }
}
