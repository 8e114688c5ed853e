//! Synthetic µs-TAS measurements for demos and tests.
//!
//! Each wavelength channel gets the four files the acquisition software
//! writes. The transient is a single exponential starting at `t0` whose
//! amplitude follows a gaussian band over wavelength. The probe-only file
//! carries a pump artefact spike at `t0`, which is what t0 detection keys on.

use std::path::Path;

use log::info;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::{LoadConfig, RawData};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticParams {
    pub wavelengths_nm: Vec<f64>,
    /// Sampling interval (s).
    pub time_step: f64,
    pub time_count: usize,
    /// Pump arrival (s); snapped to the nearest sample.
    pub t0: f64,
    /// Decay time constant (s).
    pub tau: f64,
    /// Peak ΔOD at the band centre.
    pub amplitude: f64,
    pub band_center_nm: f64,
    pub band_width_nm: f64,
    /// Constant offset added to every difference signal.
    pub background: f64,
    /// Probe-only level before and after the artefact.
    pub probe_level: f64,
    /// Height of the pump artefact spike in the probe-only file.
    pub artefact: f64,
    pub noise_sigma: f64,
    pub seed: u64,
}

impl Default for SyntheticParams {
    fn default() -> Self {
        Self {
            wavelengths_nm: (0..11).map(|i| 450.0 + 25.0 * i as f64).collect(),
            time_step: 1e-7,
            time_count: 400,
            t0: 5e-6,
            tau: 8e-6,
            amplitude: 5e-3,
            band_center_nm: 575.0,
            band_width_nm: 60.0,
            background: 2e-4,
            probe_level: 0.5,
            artefact: 1.0,
            noise_sigma: 1e-5,
            seed: 42,
        }
    }
}

impl SyntheticParams {
    fn validate(&self) -> Result<(), AppError> {
        if self.wavelengths_nm.is_empty() {
            return Err(AppError::invalid_value("At least one wavelength is required."));
        }
        if self.wavelengths_nm.iter().any(|nm| !(nm.is_finite() && *nm >= 1.0)) {
            return Err(AppError::invalid_value("Wavelengths must be finite and at least 1 nm."));
        }
        if self.time_count < 4 {
            return Err(AppError::invalid_value("Time axis needs at least 4 samples."));
        }
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(AppError::invalid_value("Time step must be > 0."));
        }
        if !(self.tau.is_finite() && self.tau > 0.0) {
            return Err(AppError::invalid_value("Decay constant must be > 0."));
        }
        if !(self.band_width_nm.is_finite() && self.band_width_nm > 0.0) {
            return Err(AppError::invalid_value("Band width must be > 0."));
        }
        let t0_index = self.t0_index();
        if !(self.t0.is_finite() && self.t0 >= 0.0) || t0_index >= self.time_count / 2 {
            return Err(AppError::invalid_value(
                "t0 must lie within the first half of the time axis.",
            ));
        }
        Ok(())
    }

    fn t0_index(&self) -> usize {
        (self.t0 / self.time_step).round().max(0.0) as usize
    }

    fn band_amplitude(&self, nm: f64) -> f64 {
        let z = (nm - self.band_center_nm) / self.band_width_nm;
        self.amplitude * (-0.5 * z * z).exp()
    }
}

/// Build the channel directories in memory, in the order of
/// `params.wavelengths_nm`.
pub fn synthetic_channels(params: &SyntheticParams, config: &LoadConfig) -> Result<Vec<RawData>, AppError> {
    params.validate()?;

    let mut rng = StdRng::seed_from_u64(params.seed);
    let noise = Normal::new(0.0, params.noise_sigma)
        .map_err(|e| AppError::numerical(format!("Noise distribution error: {e}")))?;

    let t0_index = params.t0_index();
    let times: Vec<f64> = (0..params.time_count).map(|i| i as f64 * params.time_step).collect();

    let mut channels = Vec::with_capacity(params.wavelengths_nm.len());
    for &nm in &params.wavelengths_nm {
        let amp = params.band_amplitude(nm);
        let n = params.time_count;
        let (mut a, mut b, mut ab, mut smooth) =
            (Vec::with_capacity(n), Vec::with_capacity(n), Vec::with_capacity(n), Vec::with_capacity(n));

        for (i, &t) in times.iter().enumerate() {
            let transient = if i >= t0_index {
                amp * (-(t - times[t0_index]) / params.tau).exp()
            } else {
                0.0
            };
            let diff = params.background + transient;

            let mut probe = params.probe_level + noise.sample(&mut rng);
            if i == t0_index {
                probe += params.artefact;
            }
            let pump_probe = probe + diff + noise.sample(&mut rng);

            a.push(pump_probe);
            b.push(probe);
            ab.push(pump_probe - probe);
            smooth.push(diff + 0.25 * noise.sample(&mut rng));
        }

        let dir = format!("{}{}", format_nm(nm), config.wavelength_suffix);
        let file = |suffix: &str, values: &[f64]| RawData::File {
            name: format!("{dir}{suffix}"),
            bytes: render_rows(&times, values).into_bytes(),
        };
        let mut children = vec![
            file(&config.pump_probe_suffix, &a),
            file(&config.probe_suffix, &b),
            file(&config.difference_suffix, &ab),
            file(&config.smoothed_suffix, &smooth),
        ];
        crate::data::raw::sort_children(&mut children);
        channels.push(RawData::Directory { name: dir, children });
    }
    Ok(channels)
}

/// Write a synthetic measurement into `dir` (one sub-directory per
/// wavelength).
pub fn generate_raw_measurement(dir: &Path, params: &SyntheticParams, config: &LoadConfig) -> Result<(), AppError> {
    let channels = synthetic_channels(params, config)?;
    for channel in &channels {
        channel.save_to(dir)?;
    }
    info!(
        "Wrote {} synthetic channel(s) to '{}' (seed {}).",
        channels.len(),
        dir.display(),
        params.seed
    );
    Ok(())
}

fn format_nm(nm: f64) -> String {
    format!("{}", nm.round() as u64)
}

fn render_rows(times: &[f64], values: &[f64]) -> String {
    times
        .iter()
        .zip(values)
        .map(|(t, v)| format!("{t:e},{v:e}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MicroSecondTasData;
    use crate::domain::{Time, Wavelength};

    fn small() -> SyntheticParams {
        SyntheticParams {
            wavelengths_nm: vec![500.0, 550.0, 600.0],
            time_count: 100,
            t0: 1e-6,
            ..SyntheticParams::default()
        }
    }

    #[test]
    fn same_seed_same_files() {
        let config = LoadConfig::default();
        let a = synthetic_channels(&small(), &config).unwrap();
        let b = synthetic_channels(&small(), &config).unwrap();
        assert_eq!(a, b);

        let other = SyntheticParams { seed: 7, ..small() };
        assert_ne!(synthetic_channels(&other, &config).unwrap(), a);
    }

    #[test]
    fn channel_layout() {
        let channels = synthetic_channels(&small(), &LoadConfig::default()).unwrap();
        assert_eq!(channels.len(), 3);
        let names: Vec<&str> = channels[0].children().iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["500nm-a-b-tdm.csv", "500nm-a-b.csv", "500nm-a.csv", "500nm-b.csv"]
        );
    }

    #[test]
    fn rejects_t0_past_half() {
        let params = SyntheticParams { t0: 8e-6, ..small() };
        let err = synthetic_channels(&params, &LoadConfig::default()).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn assembles_back_to_its_parameters() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("demo");
        let params = small();
        let config = LoadConfig::default();
        generate_raw_measurement(&root, &params, &config).unwrap();

        let data = MicroSecondTasData::load_dir(&root, &config).unwrap();
        assert_eq!(data.sample_name(), "demo");
        assert!((data.t0().seconds() - 1e-6).abs() < 1e-12);
        assert_eq!(data.spectra.time_count(), 100);
        assert_eq!(data.spectra.wavelength_count(), 3);

        // Background removed: pre-t0 signal is close to zero.
        let decay = data.spectra.decay_at(Wavelength::new(550.0).unwrap()).unwrap();
        let before = decay.signal_at(Time::new(-5e-7)).unwrap();
        assert!(before.od().abs() < 1e-4, "{before:?}");
        let peak = decay.signal_at(Time::ZERO).unwrap();
        assert!((peak.od() - 5e-3 * (-0.5f64 * (25.0f64 / 60.0).powi(2)).exp()).abs() < 1e-4);
    }
}
