//! Command-line parsing for the `tas` tool.
//!
//! Argument parsing and command dispatch are kept apart from the assembly and
//! fitting code; handlers live in `app`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::LoadConfig;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "tas", version, about = "Transient absorption spectroscopy analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Assemble a µs-TAS dataset from a raw measurement directory.
    Load(LoadArgs),
    /// Summarize a saved `.tas` archive.
    Info(InfoArgs),
    /// Export time-averaged spectra to CSV.
    Export(ExportArgs),
    /// Fit a decay model to a wavelength-averaged trace.
    Fit(FitArgs),
    /// List the available decay models.
    Models,
    /// Write a synthetic raw measurement directory.
    Demo(DemoArgs),
}

#[derive(Debug, Args, Clone)]
pub struct LoadArgs {
    /// Measurement directory with one `<nm>nm` sub-directory per wavelength.
    pub dir: PathBuf,

    /// Save the assembled dataset as a `.tas` archive.
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Significance level for rejecting channels during t0 detection.
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Store archive entries without compression.
    #[arg(long)]
    pub store: bool,

    #[command(flatten)]
    pub suffixes: SuffixArgs,
}

/// Overrides for raw file naming. Unset flags keep the environment/default value.
#[derive(Debug, Args, Clone, Default)]
pub struct SuffixArgs {
    #[arg(long)]
    pub wavelength_suffix: Option<String>,
    #[arg(long)]
    pub pump_probe_suffix: Option<String>,
    #[arg(long)]
    pub probe_suffix: Option<String>,
    #[arg(long)]
    pub difference_suffix: Option<String>,
    #[arg(long)]
    pub smoothed_suffix: Option<String>,
}

impl SuffixArgs {
    pub fn apply(&self, config: &mut LoadConfig) {
        let overrides = [
            (&self.wavelength_suffix, &mut config.wavelength_suffix),
            (&self.pump_probe_suffix, &mut config.pump_probe_suffix),
            (&self.probe_suffix, &mut config.probe_suffix),
            (&self.difference_suffix, &mut config.difference_suffix),
            (&self.smoothed_suffix, &mut config.smoothed_suffix),
        ];
        for (arg, field) in overrides {
            if let Some(v) = arg {
                *field = v.clone();
            }
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct InfoArgs {
    /// `.tas` archive.
    pub file: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    /// `.tas` archive.
    pub file: PathBuf,

    /// Time window to average, e.g. `"1 us-5 us"`. Repeatable. Defaults to the
    /// ranges stored in the archive.
    #[arg(long = "range", value_name = "START-END", allow_hyphen_values = true)]
    pub ranges: Vec<String>,

    /// Output CSV path.
    #[arg(long, value_name = "FILE")]
    pub out: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// `.tas` archive.
    pub file: PathBuf,

    /// Wavelength window to average, e.g. `"500 nm-520 nm"`.
    #[arg(long, value_name = "MIN-MAX")]
    pub wavelength: String,

    /// Decay model id (see `tas models`).
    #[arg(long, default_value = "1exp")]
    pub model: String,

    /// Restrict the fit to a time window, e.g. `"1 us-"`.
    #[arg(long, value_name = "START-END", allow_hyphen_values = true)]
    pub fit_range: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct DemoArgs {
    /// Directory to create.
    pub dir: PathBuf,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Gaussian noise standard deviation (OD).
    #[arg(long)]
    pub noise: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fit_command() {
        let cli = Cli::try_parse_from([
            "tas",
            "fit",
            "film.tas",
            "--wavelength",
            "500 nm-520 nm",
            "--fit-range",
            "1 us-",
        ])
        .unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.model, "1exp");
        assert_eq!(args.fit_range.as_deref(), Some("1 us-"));
    }

    #[test]
    fn repeated_export_ranges() {
        let cli = Cli::try_parse_from([
            "tas", "export", "a.tas", "--range", "0 s-1 us", "--range", "1 us-5 us", "--out", "a.csv",
        ])
        .unwrap();
        let Command::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.ranges.len(), 2);
    }

    #[test]
    fn suffix_flags_override_config() {
        let cli = Cli::try_parse_from(["tas", "load", "m", "--probe-suffix", "_b.csv"]).unwrap();
        let Command::Load(args) = cli.command else {
            panic!("expected load");
        };
        let mut config = LoadConfig::default();
        args.suffixes.apply(&mut config);
        assert_eq!(config.probe_suffix, "_b.csv");
        assert_eq!(config.smoothed_suffix, "-a-b-tdm.csv");
    }
}
