//! Shared workflow steps behind the CLI commands.
//!
//! Each step takes already-parsed inputs and returns values, so the commands
//! (and the integration tests) can chain them without going through argv:
//! raw directory -> dataset -> archive -> export / fit.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::info;

use crate::data::{LoadConfig, MicroSecondTasData, load_in_background};
use crate::domain::{Time, ValueRange, Wavelength};
use crate::error::AppError;
use crate::fit::{DecayFunction, FitRange, ModelRegistry, fit_decay};
use crate::io::write_spectra_csv;

/// Assemble a dataset on a background thread and wait for it.
pub fn load_dataset(dir: &Path, config: LoadConfig) -> Result<MicroSecondTasData, AppError> {
    if !dir.is_dir() {
        return Err(AppError::io(format!("'{}' is not a directory.", dir.display())));
    }
    load_in_background(dir, config).join()
}

/// Parse `"<start>-<end>"` time windows.
pub fn parse_time_ranges(texts: &[String]) -> Result<Vec<ValueRange<Time>>, AppError> {
    texts.iter().map(|t| ValueRange::parse(t)).collect()
}

/// Write time-averaged spectra for `ranges`, or for the ranges stored with
/// the dataset when `ranges` is empty.
pub fn export_spectra(
    data: &MicroSecondTasData,
    ranges: &[ValueRange<Time>],
    out: &Path,
) -> Result<usize, AppError> {
    let ranges = if ranges.is_empty() {
        &data.analysis.spectra_ranges[..]
    } else {
        ranges
    };
    if ranges.is_empty() {
        return Err(AppError::invalid_value(
            "No time ranges given and none are stored in the dataset.",
        ));
    }

    let file = File::create(out)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", out.display())))?;
    write_spectra_csv(BufWriter::new(file), &data.spectra, ranges)?;
    info!("Exported {} spectra to '{}'.", ranges.len(), out.display());
    Ok(ranges.len())
}

/// Result of fitting one wavelength-averaged trace.
#[derive(Debug)]
pub struct TraceFit {
    pub wavelengths: ValueRange<Wavelength>,
    pub model_id: &'static str,
    pub range: FitRange,
    pub function: Box<dyn DecayFunction>,
}

/// Average the decays over `wavelengths` and fit `model_id` to the result.
pub fn fit_trace(
    data: &MicroSecondTasData,
    registry: &ModelRegistry,
    wavelengths: ValueRange<Wavelength>,
    model_id: &str,
    fit_range: Option<&str>,
) -> Result<TraceFit, AppError> {
    let model = registry.get(model_id)?;
    let range = FitRange::parse(fit_range)?;
    let decay = data.spectra.decay_between(wavelengths.start, wavelengths.end)?;
    let function = fit_decay(&decay, model, fit_range)?;
    info!(
        "{} fit over {}: time constant {}",
        model.id(),
        wavelengths.label(),
        crate::fit::time_constant_text(function.as_ref())
    );
    Ok(TraceFit {
        wavelengths,
        model_id: model.id(),
        range,
        function,
    })
}
