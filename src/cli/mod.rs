//! Command-line parsing for the `rheo` binary.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! numeric code. Every physical default comes from the named constants in
//! `domain`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::data::MsdKind;
use crate::domain::{DEFAULT_BULK_VISCOSITY_PA_S, DEFAULT_TEMPERATURE_K, TRACKED_DIMENSIONS};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "rheo", version, about = "Passive microrheology from mean-squared displacements")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute G*(ω), G'(ω) and G''(ω) from an MSD curve (Generalized Stokes–Einstein).
    Gse(GseArgs),
    /// Compute a thin-film viscosity with the Fischer model.
    Viscosity(ViscosityArgs),
    /// Write a synthetic MSD curve for a canonical medium.
    Sample(SampleArgs),
}

/// Options for `rheo gse`.
///
/// Tunables left unset fall back to `--config` (if given), then to the
/// built-in defaults.
#[derive(Debug, Parser, Clone)]
pub struct GseArgs {
    /// MSD CSV with a lag-time column (`t`) and an MSD column (`msd`, um^2).
    #[arg(long, value_name = "CSV", required_unless_present = "synthetic")]
    pub msd: Option<PathBuf>,

    /// Use a noise-free synthetic MSD instead of a CSV.
    #[arg(long, value_enum, conflicts_with = "msd")]
    pub synthetic: Option<MsdKind>,

    /// Probe radius (um).
    #[arg(short = 'a', long)]
    pub radius: f64,

    /// JSON file with GSE settings.
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Temperature (K).
    #[arg(short = 'T', long)]
    pub temperature: Option<f64>,

    /// Noise-floor fraction of |G*| below which G' / G'' are zeroed.
    #[arg(long)]
    pub clip: Option<f64>,

    /// Smoothing bandwidth in ln(t) units.
    #[arg(long)]
    pub width: Option<f64>,

    /// Curvature threshold for the power-law warning.
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Export omega, G, G', G'' to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the full result (with quality info) to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for `rheo viscosity`.
#[derive(Debug, Parser, Clone)]
pub struct ViscosityArgs {
    /// Diffusivity (um^2/s).
    #[arg(short = 'D', long, required_unless_present = "msd", conflicts_with = "msd")]
    pub diffusivity: Option<f64>,

    /// Estimate the diffusivity from a power-law fit of this MSD CSV.
    #[arg(long, value_name = "CSV")]
    pub msd: Option<PathBuf>,

    /// Sphere radius (um).
    #[arg(short = 'a', long)]
    pub radius: f64,

    /// Contact angle (degrees).
    #[arg(long)]
    pub contact_angle: f64,

    /// Bulk viscosity (Pa s).
    #[arg(long, default_value_t = DEFAULT_BULK_VISCOSITY_PA_S)]
    pub bulk_viscosity: f64,

    /// Temperature (K).
    #[arg(short = 'T', long, default_value_t = DEFAULT_TEMPERATURE_K)]
    pub temperature: f64,

    /// Tracked dimensions used to turn the MSD prefactor into a diffusivity.
    #[arg(long, default_value_t = TRACKED_DIMENSIONS)]
    pub dims: u32,
}

/// Options for `rheo sample`.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Medium to simulate.
    #[arg(long, value_enum, default_value_t = MsdKind::Viscous)]
    pub kind: MsdKind,

    /// Number of lag times.
    #[arg(short = 'n', long, default_value_t = 40)]
    pub points: usize,

    /// Shortest lag time (s).
    #[arg(long, default_value_t = 1e-2)]
    pub t_min: f64,

    /// Longest lag time (s).
    #[arg(long, default_value_t = 10.0)]
    pub t_max: f64,

    /// Diffusivity for `viscous` (um^2/s).
    #[arg(short = 'D', long, default_value_t = 0.5)]
    pub diffusivity: f64,

    /// MSD plateau for `elastic` / `kelvin-voigt` (um^2).
    #[arg(long, default_value_t = 0.01)]
    pub plateau: f64,

    /// Retardation time for `kelvin-voigt` (s).
    #[arg(long, default_value_t = 0.1)]
    pub relaxation_time: f64,

    /// Log-normal noise level (standard deviation of ln r2).
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed for the noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output CSV (stdout if omitted).
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn gse_requires_an_msd_source() {
        assert!(Cli::try_parse_from(["rheo", "gse", "--radius", "0.5"]).is_err());
        let cli = Cli::try_parse_from(["rheo", "gse", "-a", "0.5", "--synthetic", "kelvin-voigt"]).unwrap();
        match cli.command {
            Command::Gse(args) => {
                assert_eq!(args.synthetic, Some(MsdKind::KelvinVoigt));
                assert!(args.clip.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn viscosity_defaults_come_from_domain() {
        let cli = Cli::try_parse_from([
            "rheo", "viscosity", "-D", "0.5", "-a", "1", "--contact-angle", "90",
        ])
        .unwrap();
        let Command::Viscosity(args) = cli.command else {
            panic!("expected viscosity");
        };
        assert_eq!(args.bulk_viscosity, DEFAULT_BULK_VISCOSITY_PA_S);
        assert_eq!(args.temperature, DEFAULT_TEMPERATURE_K);
    }
}
