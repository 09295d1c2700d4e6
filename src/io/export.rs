//! Export results to CSV/JSON.
//!
//! The CSV files are meant to be easy to consume in spreadsheets or plotting
//! scripts; JSON carries the full result including fit-quality bookkeeping.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::{Curve, GseConfig, ModulusCurve};
use crate::error::AppError;

/// Write an MSD curve as `t,msd` CSV (readable by `read_msd_csv`).
pub fn write_msd_csv(path: &Path, curve: &Curve) -> Result<(), AppError> {
    let mut file = create(path)?;

    writeln!(file, "t,msd").map_err(write_err)?;
    for (t, r2) in curve.x().iter().zip(curve.f()) {
        writeln!(file, "{t:e},{r2:e}").map_err(write_err)?;
    }
    file.flush().map_err(write_err)
}

/// Write G*(ω) as `omega,g,storage,loss` CSV.
pub fn write_modulus_csv(path: &Path, modulus: &ModulusCurve) -> Result<(), AppError> {
    let mut file = create(path)?;

    writeln!(file, "omega,g,storage,loss").map_err(write_err)?;
    for row in modulus.rows() {
        writeln!(
            file,
            "{:e},{:e},{:e},{:e}",
            row.omega, row.g, row.storage, row.loss
        )
        .map_err(write_err)?;
    }
    file.flush().map_err(write_err)
}

#[derive(serde::Serialize)]
struct ModulusFile<'a> {
    tool: &'static str,
    radius_um: f64,
    config: &'a GseConfig,
    modulus: &'a ModulusCurve,
}

/// Write G*(ω) and the settings that produced it as pretty JSON.
pub fn write_modulus_json(
    path: &Path,
    modulus: &ModulusCurve,
    radius: f64,
    config: &GseConfig,
) -> Result<(), AppError> {
    let file = create(path)?;
    let doc = ModulusFile {
        tool: "rheo",
        radius_um: radius,
        config,
        modulus,
    };
    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::new(2, format!("Failed to write modulus JSON: {e}")))
}

/// Load a [`GseConfig`] from JSON. Missing fields take their defaults.
pub fn read_gse_config(path: &Path) -> Result<GseConfig, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open config '{}': {e}", path.display())))?;
    let config: GseConfig = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid config JSON: {e}")))?;
    config.validate()?;
    Ok(config)
}

fn create(path: &Path) -> Result<BufWriter<File>, AppError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))
}

fn write_err(e: std::io::Error) -> AppError {
    AppError::new(2, format!("Failed to write export: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GseQuality;
    use crate::io::read_msd_csv;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("msd_rheology_{}_{name}", std::process::id()))
    }

    #[test]
    fn msd_csv_reads_back() {
        let curve = Curve::new(vec![0.01, 0.1, 1.0], vec![2e-3, 2e-2, 0.2]).unwrap();
        let path = temp_path("roundtrip.csv");
        write_msd_csv(&path, &curve).unwrap();
        let back = read_msd_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(back.curve.x(), curve.x());
        assert_eq!(back.curve.f(), curve.f());
    }

    #[test]
    fn modulus_json_contains_quality() {
        let modulus = ModulusCurve {
            omega: vec![1.0],
            g: vec![2.0],
            storage: vec![0.0],
            loss: vec![2.0],
            quality: GseQuality {
                storage_clipped: vec![0],
                ..GseQuality::default()
            },
        };
        let path = temp_path("modulus.json");
        write_modulus_json(&path, &modulus, 0.5, &GseConfig::default()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["radius_um"], 0.5);
        assert_eq!(value["modulus"]["quality"]["storage_clipped"][0], 0);
        assert_eq!(value["config"]["clip_fraction"], 0.03);
    }

    #[test]
    fn config_json_is_validated() {
        let path = temp_path("bad_config.json");
        std::fs::write(&path, r#"{ "smoothing_width": 0.0 }"#).unwrap();
        let err = read_gse_config(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(err.exit_code(), 2);
    }
}
