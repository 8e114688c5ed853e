//! Dataset loading configuration.
//!
//! Defaults match the file naming of the acquisition software. Each field can
//! be overridden from the environment (or a `.env` file):
//!
//! | variable                | field               |
//! |-------------------------|---------------------|
//! | `TAS_WAVELENGTH_SUFFIX` | `wavelength_suffix` |
//! | `TAS_PUMP_PROBE_SUFFIX` | `pump_probe_suffix` |
//! | `TAS_PROBE_SUFFIX`      | `probe_suffix`      |
//! | `TAS_DIFFERENCE_SUFFIX` | `difference_suffix` |
//! | `TAS_SMOOTHED_SUFFIX`   | `smoothed_suffix`   |
//! | `TAS_GRUBBS_ALPHA`      | `grubbs_alpha`      |

use crate::error::AppError;
use crate::stats::DEFAULT_ALPHA;

#[derive(Debug, Clone, PartialEq)]
pub struct LoadConfig {
    /// Channel directory suffix after the wavelength digits (`"532nm"`).
    pub wavelength_suffix: String,
    /// Pump-probe signal file.
    pub pump_probe_suffix: String,
    /// Probe-only signal file; its peak marks the pump arrival.
    pub probe_suffix: String,
    /// Difference signal file.
    pub difference_suffix: String,
    /// Smoothed difference signal file; the source of the spectra.
    pub smoothed_suffix: String,
    /// Significance level for rejecting channels in t0 detection.
    pub grubbs_alpha: f64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            wavelength_suffix: "nm".to_string(),
            pump_probe_suffix: "-a.csv".to_string(),
            probe_suffix: "-b.csv".to_string(),
            difference_suffix: "-a-b.csv".to_string(),
            smoothed_suffix: "-a-b-tdm.csv".to_string(),
            grubbs_alpha: DEFAULT_ALPHA,
        }
    }
}

impl LoadConfig {
    /// Defaults overridden by `TAS_*` variables (after loading `.env`).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `TAS_*` key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();
        let suffixes = [
            ("TAS_WAVELENGTH_SUFFIX", &mut config.wavelength_suffix),
            ("TAS_PUMP_PROBE_SUFFIX", &mut config.pump_probe_suffix),
            ("TAS_PROBE_SUFFIX", &mut config.probe_suffix),
            ("TAS_DIFFERENCE_SUFFIX", &mut config.difference_suffix),
            ("TAS_SMOOTHED_SUFFIX", &mut config.smoothed_suffix),
        ];
        for (key, field) in suffixes {
            if let Some(v) = lookup(key) {
                *field = v;
            }
        }
        if let Some(v) = lookup("TAS_GRUBBS_ALPHA") {
            config.grubbs_alpha = v
                .trim()
                .parse()
                .map_err(|_| AppError::config(format!("TAS_GRUBBS_ALPHA must be a number, got '{v}'.")))?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.grubbs_alpha > 0.0 && self.grubbs_alpha < 1.0) {
            return Err(AppError::config(format!(
                "Grubbs alpha must be in (0, 1), got {}.",
                self.grubbs_alpha
            )));
        }
        let suffixes = [
            &self.wavelength_suffix,
            &self.pump_probe_suffix,
            &self.probe_suffix,
            &self.difference_suffix,
            &self.smoothed_suffix,
        ];
        if suffixes.iter().any(|s| s.is_empty()) {
            return Err(AppError::config("File and directory suffixes must not be empty."));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = [("TAS_PROBE_SUFFIX", "_probe.csv"), ("TAS_GRUBBS_ALPHA", "0.01")]
            .into_iter()
            .collect();
        let config = LoadConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.probe_suffix, "_probe.csv");
        assert_eq!(config.smoothed_suffix, "-a-b-tdm.csv");
        assert!((config.grubbs_alpha - 0.01).abs() < 1e-15);
    }

    #[test]
    fn invalid_alpha_is_a_config_error() {
        let err = LoadConfig::from_lookup(|k| (k == "TAS_GRUBBS_ALPHA").then(|| "high".to_string())).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
        let err = LoadConfig::from_lookup(|k| (k == "TAS_GRUBBS_ALPHA").then(|| "2".to_string())).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
    }
}
