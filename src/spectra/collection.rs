//! Time-resolved spectra.

use std::fs;
use std::path::Path;

use crate::domain::{ScientificValue, Signal, Time, Wavelength};
use crate::error::AppError;
use crate::math::{SearchOption, average, find_nearest_index};
use crate::spectra::{Decay, Spectrum};

/// Spectra on a shared wavelength grid, one per delay time.
///
/// Times are strictly ascending and there is at least one of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectra {
    times: Vec<Time>,
    spectra: Vec<Spectrum>,
}

impl Spectra {
    pub fn new(times: Vec<Time>, spectra: Vec<Spectrum>) -> Result<Self, AppError> {
        if times.len() != spectra.len() {
            return Err(AppError::argument_mismatch(format!(
                "{} time points but {} spectra.",
                times.len(),
                spectra.len()
            )));
        }
        let Some(first) = spectra.first() else {
            return Err(AppError::insufficient_data("Spectra need at least one time point."));
        };
        if let Some(i) = times.windows(2).position(|w| w[0] >= w[1]) {
            return Err(AppError::invalid_value(format!(
                "Times must be strictly ascending: {} is followed by {}.",
                ScientificValue::new(times[i]),
                ScientificValue::new(times[i + 1])
            )));
        }
        if let Some(i) = spectra.iter().position(|s| s.wavelengths() != first.wavelengths()) {
            return Err(AppError::incompatible_range(format!(
                "Spectrum at {} has a different wavelength grid.",
                ScientificValue::new(times[i])
            )));
        }
        Ok(Self { times, spectra })
    }

    pub fn time_count(&self) -> usize {
        self.times.len()
    }

    pub fn wavelength_count(&self) -> usize {
        self.wavelengths().len()
    }

    pub fn times(&self) -> &[Time] {
        &self.times
    }

    pub fn spectra(&self) -> &[Spectrum] {
        &self.spectra
    }

    pub fn wavelengths(&self) -> &[Wavelength] {
        // Non-empty by construction.
        self.spectra[0].wavelengths()
    }

    pub fn time_min(&self) -> Time {
        self.times[0]
    }

    pub fn time_max(&self) -> Time {
        self.times[self.times.len() - 1]
    }

    /// `None` when the wavelength grid is empty.
    pub fn wavelength_min(&self) -> Option<Wavelength> {
        self.wavelengths().first().copied()
    }

    pub fn wavelength_max(&self) -> Option<Wavelength> {
        self.wavelengths().last().copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Time, &Spectrum)> + ExactSizeIterator + '_ {
        self.times.iter().copied().zip(self.spectra.iter())
    }

    /// Spectrum at the nearest time point.
    pub fn spectrum_at(&self, t: Time) -> Result<&Spectrum, AppError> {
        let i = find_nearest_index(&self.times, t, SearchOption::Nearest)?;
        Ok(&self.spectra[i])
    }

    /// Spectrum averaged over the time points inside `[from, until]`.
    pub fn spectrum_between(&self, from: Time, until: Time) -> Result<Spectrum, AppError> {
        if from > until {
            return Err(AppError::invalid_range(format!(
                "Time range start {} is after its end {}.",
                ScientificValue::new(from),
                ScientificValue::new(until)
            )));
        }
        if from == until {
            return self.spectrum_at(from).cloned();
        }

        let first = find_nearest_index(&self.times, from, SearchOption::EqualOrGreater)?;
        let last = find_nearest_index(&self.times, until, SearchOption::EqualOrLess)?.max(first);
        average(&self.spectra, first, last)
    }

    /// Kinetic trace at the nearest wavelength.
    pub fn decay_at(&self, wl: Wavelength) -> Result<Decay, AppError> {
        let signals = self
            .spectra
            .iter()
            .map(|s| s.signal_at(wl))
            .collect::<Result<Vec<Signal>, AppError>>()?;
        Decay::new(self.times.clone(), signals)
    }

    /// Kinetic trace averaged over the wavelength band `[min, max]`.
    pub fn decay_between(&self, min: Wavelength, max: Wavelength) -> Result<Decay, AppError> {
        if min > max {
            return Err(AppError::invalid_range(format!(
                "Wavelength range start {min} is above its end {max}."
            )));
        }
        if min == max {
            return self.decay_at(min);
        }
        let signals = self
            .spectra
            .iter()
            .map(|s| s.signal_between(min, max))
            .collect::<Result<Vec<Signal>, AppError>>()?;
        Decay::new(self.times.clone(), signals)
    }

    /// Every spectrum minus `background`.
    pub fn subtract(&self, background: &Spectrum) -> Result<Self, AppError> {
        let spectra = self
            .spectra
            .iter()
            .map(|s| s - background)
            .collect::<Result<Vec<_>, AppError>>()?;
        Ok(Self {
            times: self.times.clone(),
            spectra,
        })
    }

    /// Replace the time axis, keeping the spectra.
    pub fn with_times(&self, times: Vec<Time>) -> Result<Self, AppError> {
        Self::new(times, self.spectra.clone())
    }

    /// File name for the spectrum at `t`: `"{scientific time}.csv"`.
    pub fn file_name(t: Time) -> String {
        format!("{}.csv", ScientificValue::new(t))
    }

    /// Write one CSV per time point into `dir` (created if missing).
    pub fn save_dir(&self, dir: &Path) -> Result<(), AppError> {
        fs::create_dir_all(dir)
            .map_err(|e| AppError::io(format!("Failed to create '{}': {e}", dir.display())))?;
        for (t, spectrum) in self.iter() {
            let path = dir.join(Self::file_name(t));
            let file = fs::File::create(&path)
                .map_err(|e| AppError::io(format!("Failed to create '{}': {e}", path.display())))?;
            spectrum.write_csv(file)?;
        }
        Ok(())
    }

    /// Reload a directory written by [`Spectra::save_dir`].
    pub fn load_dir(dir: &Path) -> Result<Self, AppError> {
        let entries = fs::read_dir(dir)
            .map_err(|e| AppError::io(format!("Failed to read '{}': {e}", dir.display())))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AppError::io(format!("Failed to read '{}': {e}", dir.display())))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(stem) = name.strip_suffix(".csv") {
                files.push((stem.to_string(), fs::read(entry.path()).map_err(|e| {
                    AppError::io(format!("Failed to read '{}': {e}", entry.path().display()))
                })?));
            }
        }
        Self::from_named_csv(files)
    }

    /// Build from `(time text, csv bytes)` pairs in any order.
    pub fn from_named_csv(files: Vec<(String, Vec<u8>)>) -> Result<Self, AppError> {
        let mut entries = files
            .into_iter()
            .map(|(stem, bytes)| {
                let t = ScientificValue::<Time>::parse(&stem)?.value();
                Ok((t, Spectrum::read_csv(bytes.as_slice(), &stem)?))
            })
            .collect::<Result<Vec<_>, AppError>>()?;
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let (times, spectra) = entries.into_iter().unzip();
        Self::new(times, spectra)
    }
}
