//! Top-level application orchestration.
//!
//! `src/main.rs` only initialises logging and maps errors to exit codes; this
//! module is the real main:
//! - parses CLI arguments
//! - builds the load configuration (defaults, then `.env`/environment, then flags)
//! - runs the requested workflow from `pipeline`
//! - prints reports

use clap::Parser;

use crate::cli::{Command, DemoArgs, ExportArgs, FitArgs, InfoArgs, LoadArgs};
use crate::data::{LoadConfig, SyntheticParams, generate_raw_measurement};
use crate::domain::{ValueRange, Wavelength};
use crate::error::AppError;
use crate::fit::ModelRegistry;
use crate::io::{Compression, SaveConfig, load_archive, save_archive};
use crate::report::{format_dataset_summary, format_fit_summary, format_models};

pub mod pipeline;

/// Entry point for the `tas` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Load(args) => handle_load(args),
        Command::Info(args) => handle_info(args),
        Command::Export(args) => handle_export(args),
        Command::Fit(args) => handle_fit(args),
        Command::Models => {
            print!("{}", format_models(&ModelRegistry::default()));
            Ok(())
        }
        Command::Demo(args) => handle_demo(args),
    }
}

fn handle_load(args: LoadArgs) -> Result<(), AppError> {
    let config = load_config_from_args(&args)?;
    let data = pipeline::load_dataset(&args.dir, config)?;
    print!("{}", format_dataset_summary(&data));

    if let Some(out) = &args.out {
        let save = SaveConfig {
            compression: if args.store { Compression::Stored } else { Compression::Deflated },
        };
        save_archive(out, &data, &save)?;
        println!("Saved {}", out.display());
    }
    Ok(())
}

fn handle_info(args: InfoArgs) -> Result<(), AppError> {
    let data = load_archive(&args.file)?;
    print!("{}", format_dataset_summary(&data));
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let data = load_archive(&args.file)?;
    let ranges = pipeline::parse_time_ranges(&args.ranges)?;
    let n = pipeline::export_spectra(&data, &ranges, &args.out)?;
    println!("Wrote {n} spectra to {}", args.out.display());
    Ok(())
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let data = load_archive(&args.file)?;
    let registry = ModelRegistry::default();
    let wavelengths = ValueRange::<Wavelength>::parse(&args.wavelength)?;

    let fit = pipeline::fit_trace(&data, &registry, wavelengths, &args.model, args.fit_range.as_deref())?;
    let model = registry.get(fit.model_id)?;
    print!(
        "{}",
        format_fit_summary(&fit.wavelengths, model, &fit.range, fit.function.as_ref())
    );
    Ok(())
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = LoadConfig::from_env()?;
    let mut params = SyntheticParams {
        seed: args.seed,
        ..SyntheticParams::default()
    };
    if let Some(noise) = args.noise {
        params.noise_sigma = noise;
    }
    generate_raw_measurement(&args.dir, &params, &config)?;
    println!(
        "Wrote {} channels to {}",
        params.wavelengths_nm.len(),
        args.dir.display()
    );
    Ok(())
}

/// Defaults, overridden by the environment, overridden by flags.
pub fn load_config_from_args(args: &LoadArgs) -> Result<LoadConfig, AppError> {
    let mut config = LoadConfig::from_env()?;
    args.suffixes.apply(&mut config);
    if let Some(alpha) = args.alpha {
        config.grubbs_alpha = alpha;
    }
    config.validate()?;
    Ok(config)
}
