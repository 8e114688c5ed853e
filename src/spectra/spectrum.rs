//! Signal vs. wavelength.

use std::io::{Read, Write};

use crate::domain::{Signal, Wavelength};
use crate::error::AppError;
use crate::io::read_pairs;
use crate::spectra::Series;

/// One spectrum, ascending in wavelength.
pub type Spectrum = Series<Wavelength>;

impl Series<Wavelength> {
    pub fn wavelengths(&self) -> &[Wavelength] {
        self.axis()
    }

    /// Write `"{wavelength},{signal:e}"` lines.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), AppError> {
        let mut w = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
        for (wl, s) in self.iter() {
            w.write_record([wl.nanometers().to_string(), format!("{:e}", s.od())])
                .map_err(|e| AppError::io(format!("Failed to write spectrum row: {e}")))?;
        }
        w.flush()
            .map_err(|e| AppError::io(format!("Failed to flush spectrum CSV: {e}")))?;
        Ok(())
    }

    /// Read lines written by [`Spectrum::write_csv`]. Rows may be in any order.
    pub fn read_csv<R: Read>(reader: R, source: &str) -> Result<Self, AppError> {
        let pairs = read_pairs(reader, source)?
            .into_iter()
            .map(|(wl, s)| Ok((Wavelength::new(wl)?, Signal::new(s))))
            .collect::<Result<Vec<_>, AppError>>()?;
        Self::from_pairs(pairs)
    }

    pub fn to_csv_string(&self) -> Result<String, AppError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf).map_err(|e| AppError::format(format!("Spectrum CSV is not UTF-8: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum() -> Spectrum {
        Spectrum::new(
            vec![Wavelength::new(500.0).unwrap(), Wavelength::new(510.5).unwrap()],
            vec![Signal::new(1.5e-3), Signal::new(-2e-4)],
        )
        .unwrap()
    }

    #[test]
    fn csv_lines() {
        let text = spectrum().to_csv_string().unwrap();
        assert_eq!(text, "500,1.5e-3\n510.5,-2e-4\n");
    }

    #[test]
    fn csv_reload_sorts_rows() {
        let back = Spectrum::read_csv("510.5,-2e-4\n500,1.5e-3\n".as_bytes(), "s.csv").unwrap();
        assert_eq!(back, spectrum());
    }

    #[test]
    fn signal_at_nearest_wavelength() {
        let s = spectrum();
        let v = s.signal_at(Wavelength::new(508.0).unwrap()).unwrap();
        assert_eq!(v, Signal::new(-2e-4));
    }
}
