//! Two-column CSV ingest.
//!
//! Raw measurement files and persisted spectra share one row shape:
//!
//! ```text
//! <x>,<signal>
//! ```
//!
//! There is no header. Blank lines are skipped, cells are trimmed, and any
//! extra columns are ignored. A cell that is not a number is a hard error that
//! names the source and the 1-based line, since a half-read channel would
//! silently shift the time axis.

use std::io::Read;

use crate::domain::{Signal, Time};
use crate::error::AppError;

/// Parse `x,y` rows from any reader.
///
/// `source` is only used in error messages.
pub fn read_pairs<R: Read>(reader: R, source: &str) -> Result<Vec<(f64, f64)>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| AppError::format(format!("CSV parse error in '{source}': {e}")))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        if record.len() < 2 {
            return Err(AppError::format(format!(
                "'{source}' line {line}: expected two columns, found {}.",
                record.len()
            )));
        }

        let x = parse_cell(&record[0], source, line)?;
        let y = parse_cell(&record[1], source, line)?;
        out.push((x, y));
    }
    Ok(out)
}

/// Parse rows from decoded text.
pub fn read_pairs_str(text: &str, source: &str) -> Result<Vec<(f64, f64)>, AppError> {
    read_pairs(text.as_bytes(), source)
}

/// Split a raw timeseries file into its time and signal columns.
pub fn read_timeseries(text: &str, source: &str) -> Result<(Vec<Time>, Vec<Signal>), AppError> {
    Ok(read_pairs_str(text, source)?
        .into_iter()
        .map(|(t, s)| (Time::new(t), Signal::new(s)))
        .unzip())
}

fn parse_cell(cell: &str, source: &str, line: u64) -> Result<f64, AppError> {
    // Files exported by Windows tools may start with a UTF-8 BOM.
    let cell = cell.trim_start_matches('\u{feff}');
    let v: f64 = cell
        .parse()
        .map_err(|_| AppError::format(format!("'{source}' line {line}: '{cell}' is not a number.")))?;
    if !v.is_finite() {
        return Err(AppError::format(format!(
            "'{source}' line {line}: '{cell}' is not a finite number."
        )));
    }
    Ok(v)
}
