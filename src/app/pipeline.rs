//! Shared pipeline logic behind the CLI subcommands.
//!
//! Keeping this separate from `app` lets the workflows be tested without
//! parsing arguments or printing:
//! MSD source -> config resolution -> GSE / Fischer -> outputs

use std::path::PathBuf;

use crate::data::{MsdKind, MsdSampleSpec, generate_msd};
use crate::diagnostics::DiagnosticSink;
use crate::domain::{Curve, FilmViscosity, FischerInput, GseConfig, ModulusCurve};
use crate::error::AppError;
use crate::io::read_msd_csv;
use crate::rheology::{PowerLawFit, complex_modulus, film_viscosity, fit_power_law};

/// Where the MSD comes from.
#[derive(Debug, Clone)]
pub enum MsdSource {
    Csv(PathBuf),
    Synthetic(MsdKind),
}

/// All computed outputs of a single `rheo gse` run.
#[derive(Debug, Clone)]
pub struct GseRun {
    pub msd: Curve,
    pub modulus: ModulusCurve,
    pub config: GseConfig,
    pub radius: f64,
}

/// Load (or synthesize) the MSD curve.
pub fn load_msd(source: &MsdSource) -> Result<Curve, AppError> {
    match source {
        MsdSource::Csv(path) => {
            let ingest = read_msd_csv(path)?;
            for row in &ingest.row_errors {
                log::warn!("{}:{}: {}", path.display(), row.line, row.message);
            }
            log::info!(
                "Read {} of {} MSD rows from '{}'",
                ingest.rows_used,
                ingest.rows_read,
                path.display()
            );
            Ok(ingest.curve)
        }
        MsdSource::Synthetic(kind) => Ok(generate_msd(&MsdSampleSpec {
            kind: *kind,
            ..MsdSampleSpec::default()
        })?),
    }
}

/// Execute the GSE pipeline.
pub fn run_gse(
    source: &MsdSource,
    radius: f64,
    config: GseConfig,
    sink: &dyn DiagnosticSink,
) -> Result<GseRun, AppError> {
    let msd = load_msd(source)?;
    let modulus = complex_modulus(&msd, radius, &config, sink)?;
    Ok(GseRun {
        msd,
        modulus,
        config,
        radius,
    })
}

/// Diffusivity input for the Fischer model.
#[derive(Debug, Clone)]
pub enum DiffusivitySource {
    Value(f64),
    /// Power-law fit of an MSD CSV with the given number of tracked dimensions.
    Msd { path: PathBuf, dimensions: u32 },
}

#[derive(Debug, Clone)]
pub struct ViscosityRun {
    pub input: FischerInput,
    pub result: FilmViscosity,
    pub power_law: Option<PowerLawFit>,
}

/// Execute the Fischer pipeline.
///
/// `input.diffusivity` is replaced when the source is an MSD file.
pub fn run_viscosity(
    source: &DiffusivitySource,
    mut input: FischerInput,
    sink: &dyn DiagnosticSink,
) -> Result<ViscosityRun, AppError> {
    let power_law = match source {
        DiffusivitySource::Value(d) => {
            input.diffusivity = *d;
            None
        }
        DiffusivitySource::Msd { path, dimensions } => {
            if *dimensions == 0 {
                return Err(AppError::new(2, "Tracked dimensions must be >= 1."));
            }
            let msd = load_msd(&MsdSource::Csv(path.clone()))?;
            let fit = fit_power_law(&msd)?;
            if (fit.exponent - 1.0).abs() > 0.2 {
                log::warn!(
                    "MSD exponent is {:.2}; the diffusivity estimate assumes free diffusion (exponent 1).",
                    fit.exponent
                );
            }
            input.diffusivity = fit.diffusivity(*dimensions);
            Some(fit)
        }
    };

    let result = film_viscosity(&input, sink)?;
    Ok(ViscosityRun {
        input,
        result,
        power_law,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullSink;
    use crate::io::write_msd_csv;

    #[test]
    fn synthetic_gse_run_matches_direct_call() {
        let run = run_gse(
            &MsdSource::Synthetic(MsdKind::Viscous),
            0.5,
            GseConfig::default(),
            &NullSink,
        )
        .unwrap();
        let direct = complex_modulus(&run.msd, 0.5, &GseConfig::default(), &NullSink).unwrap();
        assert_eq!(run.modulus, direct);
    }

    #[test]
    fn viscosity_from_msd_uses_fitted_diffusivity() {
        let msd = generate_msd(&MsdSampleSpec {
            diffusivity: 0.25,
            ..MsdSampleSpec::default()
        })
        .unwrap();
        let path = std::env::temp_dir().join(format!("msd_rheology_{}_visc.csv", std::process::id()));
        write_msd_csv(&path, &msd).unwrap();

        let run = run_viscosity(
            &DiffusivitySource::Msd {
                path: path.clone(),
                dimensions: 2,
            },
            FischerInput::new(0.0, 1.0, 90.0),
            &NullSink,
        )
        .unwrap();
        std::fs::remove_file(&path).ok();

        assert!((run.input.diffusivity - 0.25).abs() < 1e-9);
        assert!(run.power_law.is_some());

        let direct = film_viscosity(&FischerInput::new(0.25, 1.0, 90.0), &NullSink).unwrap();
        assert!(((run.result.viscosity - direct.viscosity) / direct.viscosity).abs() < 1e-8);
    }
}
