//! Microsecond TAS dataset assembly.
//!
//! A measurement directory holds one sub-directory per probe wavelength
//! (`"532nm"`), each with a set of two-column `time,signal` CSV files:
//!
//! - `*-b.csv`: probe only; its pump artefact peak marks the pump arrival
//! - `*-a-b-tdm.csv`: smoothed difference signal, the source of the spectra
//!
//! Assembly:
//! 1) find wavelength channels and read the time axis
//! 2) estimate t0 from the probe-only peaks (Grubbs-filtered), unless a
//!    [`T0Strategy`] is supplied
//! 3) build the raw spectra and average `[0, t0/2]` into a background
//! 4) shift times by `-t0` and subtract the background

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use chrono::Utc;
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::data::{CommonAnalysis, CommonMetadata, LoadConfig, MicroSecondAnalysis, RawData, TasType};
use crate::domain::{ScientificValue, Signal, Time, Wavelength};
use crate::error::AppError;
use crate::io::read_timeseries;
use crate::spectra::{Spectra, Spectrum};
use crate::stats::smirnov_grubbs;

/// Custom t0 determination.
///
/// Receives every wavelength channel directory (ascending wavelength) and the
/// raw time axis.
pub trait T0Strategy: Send + Sync {
    fn determine(&self, channels: &[&RawData], time: &[Time]) -> Result<Time, AppError>;
}

impl<F> T0Strategy for F
where
    F: Fn(&[&RawData], &[Time]) -> Result<Time, AppError> + Send + Sync,
{
    fn determine(&self, channels: &[&RawData], time: &[Time]) -> Result<Time, AppError> {
        self(channels, time)
    }
}

/// A µs-TAS dataset: raw files, corrected spectra and the analysis state.
#[derive(Debug, Clone, PartialEq)]
pub struct MicroSecondTasData {
    pub metadata: CommonMetadata,
    pub analysis: CommonAnalysis,
    pub microsecond: MicroSecondAnalysis,
    /// Channel directories as loaded from disk.
    pub raw: Vec<RawData>,
    /// Background-subtracted spectra on the t0-corrected time axis.
    pub spectra: Spectra,
    pub background: Option<Spectrum>,
}

struct Channel<'a> {
    wavelength: Wavelength,
    dir: &'a RawData,
}

impl MicroSecondTasData {
    /// Assemble a dataset from a measurement directory.
    pub fn load_dir(path: &Path, config: &LoadConfig) -> Result<Self, AppError> {
        Self::load_dir_with(path, config, None)
    }

    pub fn load_dir_with(
        path: &Path,
        config: &LoadConfig,
        t0: Option<&dyn T0Strategy>,
    ) -> Result<Self, AppError> {
        let root = RawData::load(path)?;
        let RawData::Directory { name, children } = root else {
            return Err(AppError::io(format!("'{}' is not a directory.", path.display())));
        };
        let dirs = children.into_iter().filter(RawData::is_dir).collect();
        Self::assemble(&name, dirs, config, t0)
    }

    /// Assemble from already-loaded channel directories.
    pub fn assemble(
        sample_name: &str,
        raw: Vec<RawData>,
        config: &LoadConfig,
        t0_strategy: Option<&dyn T0Strategy>,
    ) -> Result<Self, AppError> {
        config.validate()?;

        let channels = find_channels(&raw, &config.wavelength_suffix)?;
        info!("Found {} wavelength channel(s) in '{sample_name}'.", channels.len());

        let time = read_time_axis(channels[0].dir)?;

        let (t0, t0_channels) = match t0_strategy {
            Some(strategy) => {
                let dirs: Vec<&RawData> = channels.iter().map(|c| c.dir).collect();
                (strategy.determine(&dirs, &time)?, None)
            }
            None => {
                let (t0, kept) = estimate_t0(&channels, &time, config)?;
                (t0, Some(kept))
            }
        };
        let t0 = as_stored(t0)?;
        info!("t0 = {}", ScientificValue::new(t0));

        let raw_spectra = build_raw_spectra(&channels, &time, &config.smoothed_suffix)?;
        let background = raw_spectra.spectrum_between(Time::ZERO, t0 / 2.0)?;

        let corrected_times = time
            .iter()
            .map(|&t| as_stored(t - t0))
            .collect::<Result<Vec<_>, AppError>>()?;
        let spectra = raw_spectra.subtract(&background)?.with_times(corrected_times)?;

        Ok(Self {
            metadata: CommonMetadata {
                tas_type: TasType::MicroSecond,
                sample_name: Some(sample_name.to_string()),
                comment: String::new(),
                created: Some(Utc::now()),
            },
            analysis: CommonAnalysis::default(),
            microsecond: MicroSecondAnalysis {
                t0: ScientificValue::new(t0),
                t0_channels,
            },
            raw,
            spectra,
            background: Some(background),
        })
    }

    pub fn t0(&self) -> Time {
        self.microsecond.t0.value()
    }

    pub fn sample_name(&self) -> &str {
        self.metadata.sample_name.as_deref().unwrap_or("")
    }
}

/// Assembly running on its own thread.
pub struct LoadHandle {
    handle: JoinHandle<Result<MicroSecondTasData, AppError>>,
}

impl LoadHandle {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the result.
    pub fn join(self) -> Result<MicroSecondTasData, AppError> {
        self.handle
            .join()
            .map_err(|_| AppError::io("Background dataset load panicked."))?
    }
}

/// Start [`MicroSecondTasData::load_dir`] on a background thread.
pub fn load_in_background(path: impl Into<PathBuf>, config: LoadConfig) -> LoadHandle {
    let path = path.into();
    LoadHandle {
        handle: std::thread::spawn(move || MicroSecondTasData::load_dir(&path, &config)),
    }
}

/// Parse `"<digits><suffix>"`, e.g. `"532nm"` → 532.
pub fn parse_channel_name(name: &str, suffix: &str) -> Option<f64> {
    let digits = name.strip_suffix(suffix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn find_channels<'a>(raw: &'a [RawData], suffix: &str) -> Result<Vec<Channel<'a>>, AppError> {
    let mut by_wavelength: BTreeMap<Wavelength, &RawData> = BTreeMap::new();
    for dir in raw.iter().filter(|d| d.is_dir()) {
        let Some(nm) = parse_channel_name(dir.name(), suffix) else {
            warn!("Ignoring directory '{}': not a wavelength channel.", dir.name());
            continue;
        };
        let Ok(wavelength) = Wavelength::new(nm) else {
            warn!("Ignoring directory '{}': invalid wavelength.", dir.name());
            continue;
        };
        if let Some(prev) = by_wavelength.insert(wavelength, dir) {
            return Err(AppError::invalid_value(format!(
                "Directories '{}' and '{}' both hold {wavelength}.",
                prev.name(),
                dir.name()
            )));
        }
    }

    if by_wavelength.is_empty() {
        return Err(AppError::insufficient_data(format!(
            "No wavelength channel directories ('<digits>{suffix}') found."
        )));
    }
    Ok(by_wavelength
        .into_iter()
        .map(|(wavelength, dir)| Channel { wavelength, dir })
        .collect())
}

fn read_time_axis(channel: &RawData) -> Result<Vec<Time>, AppError> {
    let file = channel
        .files()
        .next()
        .ok_or_else(|| AppError::missing_file(format!("Channel '{}' contains no files.", channel.name())))?;
    let (time, _) = read_timeseries(file.text()?, file.name())?;
    if time.is_empty() {
        return Err(AppError::insufficient_data(format!(
            "'{}' holds no samples for the time axis.",
            file.name()
        )));
    }
    Ok(time)
}

fn read_signal(channel: &RawData, suffix: &str) -> Result<Vec<Signal>, AppError> {
    let file = channel.file_with_suffix(suffix)?;
    Ok(read_timeseries(file.text()?, file.name())?.1)
}

/// Index of the largest `|signal|` in the first half of the samples.
fn peak_index(signals: &[Signal], time_len: usize) -> Option<usize> {
    let half = &signals[..(time_len / 2).min(signals.len())];
    let mut best: Option<(usize, f64)> = None;
    for (i, s) in half.iter().enumerate() {
        let v = s.od().abs();
        if best.is_none_or(|(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

/// Snap a time to the value its scientific text parses back to, so persisted
/// times reload unchanged.
fn as_stored(t: Time) -> Result<Time, AppError> {
    Ok(ScientificValue::<Time>::parse(&ScientificValue::new(t).text())?.value())
}

/// Returns t0 and the number of channels that survived outlier rejection.
fn estimate_t0(channels: &[Channel<'_>], time: &[Time], config: &LoadConfig) -> Result<(Time, usize), AppError> {
    let indices = channels
        .par_iter()
        .map(|c| {
            let signals = read_signal(c.dir, &config.probe_suffix)?;
            let idx = peak_index(&signals, time.len()).ok_or_else(|| {
                AppError::insufficient_data(format!("'{}' has too few samples to locate the pump peak.", c.dir.name()))
            })?;
            debug!("{}: probe peak at index {idx}", c.wavelength);
            Ok(idx as f64)
        })
        .collect::<Result<Vec<f64>, AppError>>()?;

    let kept = smirnov_grubbs(&indices, config.grubbs_alpha)?;
    if kept.len() < indices.len() {
        warn!(
            "t0 detection dropped {} of {} channel(s) as outliers.",
            indices.len() - kept.len(),
            indices.len()
        );
    }

    let sum = kept.iter().fold(Time::ZERO, |acc, &i| acc + time[i as usize]);
    Ok((sum / kept.len() as f64, kept.len()))
}

fn build_raw_spectra(channels: &[Channel<'_>], time: &[Time], suffix: &str) -> Result<Spectra, AppError> {
    let columns = channels
        .par_iter()
        .map(|c| {
            let signals = read_signal(c.dir, suffix)?;
            if signals.len() != time.len() {
                return Err(AppError::argument_mismatch(format!(
                    "{}: '*{suffix}' has {} samples but the time axis has {}.",
                    c.wavelength,
                    signals.len(),
                    time.len()
                )));
            }
            Ok(signals)
        })
        .collect::<Result<Vec<Vec<Signal>>, AppError>>()?;

    let wavelengths: Vec<Wavelength> = channels.iter().map(|c| c.wavelength).collect();
    let spectra = (0..time.len())
        .map(|ti| Spectrum::new(wavelengths.clone(), columns.iter().map(|col| col[ti]).collect()))
        .collect::<Result<Vec<_>, AppError>>()?;
    Spectra::new(time.to_vec(), spectra)
}
