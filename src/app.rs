//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initialises logging (diagnostics are routed through `log`)
//! - parses CLI arguments
//! - resolves configuration (defaults < config file < flags)
//! - runs the GSE / Fischer pipelines
//! - prints reports and writes optional exports

use clap::Parser;

use crate::cli::{Command, GseArgs, SampleArgs, ViscosityArgs};
use crate::data::{MsdSampleSpec, generate_msd};
use crate::diagnostics::LogSink;
use crate::domain::{FischerInput, GseConfig};
use crate::error::AppError;

pub mod pipeline;

use pipeline::{DiffusivitySource, MsdSource};

/// Entry point for the `rheo` binary.
pub fn run() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = crate::cli::Cli::parse();
    match cli.command {
        Command::Gse(args) => handle_gse(args),
        Command::Viscosity(args) => handle_viscosity(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_gse(args: GseArgs) -> Result<(), AppError> {
    let config = gse_config_from_args(&args)?;
    let source = match (&args.msd, args.synthetic) {
        (Some(path), _) => MsdSource::Csv(path.clone()),
        (None, Some(kind)) => MsdSource::Synthetic(kind),
        (None, None) => return Err(AppError::new(2, "Either --msd or --synthetic is required.")),
    };

    let run = pipeline::run_gse(&source, args.radius, config, &LogSink)?;

    println!(
        "{}",
        crate::report::format_modulus_report(&run.msd, &run.modulus, run.radius, &run.config)
    );

    if let Some(path) = &args.export {
        crate::io::write_modulus_csv(path, &run.modulus)?;
    }
    if let Some(path) = &args.export_json {
        crate::io::write_modulus_json(path, &run.modulus, run.radius, &run.config)?;
    }

    Ok(())
}

fn handle_viscosity(args: ViscosityArgs) -> Result<(), AppError> {
    let source = match (&args.msd, args.diffusivity) {
        (Some(path), _) => DiffusivitySource::Msd {
            path: path.clone(),
            dimensions: args.dims,
        },
        (None, Some(d)) => DiffusivitySource::Value(d),
        (None, None) => {
            return Err(AppError::new(2, "Either --diffusivity or --msd is required."));
        }
    };
    let input = FischerInput::new(0.0, args.radius, args.contact_angle)
        .with_bulk_viscosity(args.bulk_viscosity)
        .with_temperature(args.temperature);

    let run = pipeline::run_viscosity(&source, input, &LogSink)?;
    println!(
        "{}",
        crate::report::format_viscosity_report(&run.input, &run.result, run.power_law.as_ref())
    );
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let spec = MsdSampleSpec {
        kind: args.kind,
        points: args.points,
        t_min: args.t_min,
        t_max: args.t_max,
        diffusivity: args.diffusivity,
        plateau: args.plateau,
        relaxation_time: args.relaxation_time,
        noise: args.noise,
        seed: args.seed,
        ..MsdSampleSpec::default()
    };
    let curve = generate_msd(&spec)?;

    match &args.out {
        Some(path) => crate::io::write_msd_csv(path, &curve)?,
        None => {
            println!("t,msd");
            for (t, r2) in curve.x().iter().zip(curve.f()) {
                println!("{t:e},{r2:e}");
            }
        }
    }
    Ok(())
}

/// Resolve GSE settings: built-in defaults, then `--config`, then explicit flags.
pub fn gse_config_from_args(args: &GseArgs) -> Result<GseConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => crate::io::read_gse_config(path)?,
        None => GseConfig::default(),
    };
    if let Some(t) = args.temperature {
        config.temperature = t;
    }
    if let Some(clip) = args.clip {
        config.clip_fraction = clip;
    }
    if let Some(width) = args.width {
        config.smoothing_width = width;
    }
    if let Some(threshold) = args.threshold {
        config.curvature_threshold = threshold;
    }
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn gse_args(argv: &[&str]) -> GseArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Gse(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn flags_override_defaults() {
        let args = gse_args(&["rheo", "gse", "--msd", "x.csv", "-a", "0.5", "--clip", "0.1"]);
        let config = gse_config_from_args(&args).unwrap();
        assert_eq!(config.clip_fraction, 0.1);
        assert_eq!(config.smoothing_width, GseConfig::default().smoothing_width);
    }

    #[test]
    fn config_file_sits_between_defaults_and_flags() {
        let path = std::env::temp_dir().join(format!("msd_rheology_{}_cfg.json", std::process::id()));
        std::fs::write(&path, r#"{ "smoothing_width": 0.5, "temperature": 310.0 }"#).unwrap();
        let path_str = path.to_string_lossy().to_string();

        let args = gse_args(&[
            "rheo", "gse", "--msd", "x.csv", "-a", "0.5", "--config", path_str.as_str(), "-T", "300",
        ]);
        let config = gse_config_from_args(&args).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.smoothing_width, 0.5);
        assert_eq!(config.temperature, 300.0);
    }

    #[test]
    fn invalid_flag_values_are_rejected() {
        let args = gse_args(&["rheo", "gse", "--msd", "x.csv", "-a", "0.5", "--width", "0"]);
        let err = gse_config_from_args(&args).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
