//! Reporting: dataset and fit summaries for terminal output.
//!
//! Formatting lives here so the assembly and fitting code stay free of
//! presentation concerns.

pub mod format;

pub use format::*;

use crate::data::MicroSecondTasData;
use crate::domain::{Time, Wavelength};

/// Headline numbers of an assembled dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub sample_name: String,
    pub tas_type: &'static str,
    pub wavelength_count: usize,
    pub wavelength_range: Option<(Wavelength, Wavelength)>,
    pub time_count: usize,
    pub time_range: (Time, Time),
    pub t0: Time,
    /// Channels used for t0 detection, out of `channel_count`.
    pub t0_channels: Option<usize>,
    pub channel_count: usize,
    pub raw_file_count: usize,
    pub has_background: bool,
}

impl DatasetSummary {
    pub fn of(data: &MicroSecondTasData) -> Self {
        let spectra = &data.spectra;
        Self {
            sample_name: data.sample_name().to_string(),
            tas_type: data.metadata.tas_type.display_name(),
            wavelength_count: spectra.wavelength_count(),
            wavelength_range: spectra.wavelength_min().zip(spectra.wavelength_max()),
            time_count: spectra.time_count(),
            time_range: (spectra.time_min(), spectra.time_max()),
            t0: data.t0(),
            t0_channels: data.microsecond.t0_channels,
            channel_count: data.raw.iter().filter(|r| r.is_dir()).count(),
            raw_file_count: data.raw.iter().map(|r| r.file_count()).sum(),
            has_background: data.background.is_some(),
        }
    }
}
