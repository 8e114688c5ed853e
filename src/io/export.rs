//! Export time-averaged spectra to CSV.
//!
//! One column per time window, one row per wavelength, so the file opens
//! directly as a set of spectra in a spreadsheet.

use std::io::Write;

use crate::domain::{Time, ValueRange};
use crate::error::AppError;
use crate::spectra::{Spectra, Spectrum};

/// Write `Wavelength [nm],<range labels>` followed by one row per wavelength.
pub fn write_spectra_csv<W: Write>(
    writer: W,
    spectra: &Spectra,
    ranges: &[ValueRange<Time>],
) -> Result<(), AppError> {
    if ranges.is_empty() {
        return Err(AppError::invalid_value("At least one time range is required for export."));
    }

    let averaged = ranges
        .iter()
        .map(|r| spectra.spectrum_between(r.start, r.end))
        .collect::<Result<Vec<Spectrum>, AppError>>()?;

    let mut out = csv::Writer::from_writer(writer);
    let write_err = |e: csv::Error| AppError::io(format!("Failed to write export CSV: {e}"));

    let mut header = vec!["Wavelength [nm]".to_string()];
    header.extend(ranges.iter().map(ValueRange::label));
    out.write_record(&header).map_err(write_err)?;

    for (row, wl) in spectra.wavelengths().iter().enumerate() {
        let mut record = vec![wl.nanometers().to_string()];
        record.extend(averaged.iter().map(|s| format!("{:e}", s.signals()[row].od())));
        out.write_record(&record).map_err(write_err)?;
    }

    out.flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV: {e}")))
}
