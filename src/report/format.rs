//! Plain-text summaries for the `rheo` binary.

use crate::domain::{Curve, FilmViscosity, FischerInput, GseConfig, ModulusCurve};
use crate::rheology::PowerLawFit;

/// Summary of a GSE run followed by the G*(ω) table.
pub fn format_modulus_report(
    msd: &Curve,
    modulus: &ModulusCurve,
    radius: f64,
    config: &GseConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== rheo - GSE complex modulus ===\n");
    out.push_str(&format!(
        "MSD ({}): n={} | {}=[{:.4e}, {:.4e}] s\n",
        msd.f_label(),
        msd.len(),
        msd.x_label(),
        fold_min(msd.x()),
        fold_max(msd.x()),
    ));
    out.push_str(&format!(
        "Probe radius: {radius:.3} um | T={:.1} K | dims={}\n",
        config.temperature, config.dimensions
    ));
    out.push_str(&format!(
        "Smoothing width={:.2} | clip={:.3} | curvature threshold={:.2}\n",
        config.smoothing_width, config.clip_fraction, config.curvature_threshold
    ));

    let q = &modulus.quality;
    out.push_str("\nQuality:\n");
    out.push_str(&format!(
        "- max |ddf| (MSD)  = {:.3}{}\n",
        q.max_abs_msd_curvature,
        flag(q.max_abs_msd_curvature > q.curvature_threshold)
    ));
    out.push_str(&format!(
        "- max |ddg| (G(s)) = {:.3}{}\n",
        q.max_abs_modulus_curvature,
        flag(q.max_abs_modulus_curvature > q.curvature_threshold)
    ));
    out.push_str(&format!(
        "- clipped: G' {} / {}, G'' {} / {}\n\n",
        q.storage_clipped.len(),
        modulus.len(),
        q.loss_clipped.len(),
        modulus.len()
    ));

    out.push_str(&format_modulus_table(modulus));
    out
}

/// Column-aligned `omega | G | G' | G''` table.
pub fn format_modulus_table(modulus: &ModulusCurve) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:>12} {:>12} {:>12} {:>12}\n",
            "omega", "G", "G'", "G''"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<12} {:-<12} {:-<12} {:-<12}", "", "", "", "").trim_end());
    out.push('\n');

    for row in modulus.rows() {
        out.push_str(&format!(
            "{:>12.4e} {:>12.4e} {:>12.4e} {:>12.4e}\n",
            row.omega, row.g, row.storage, row.loss
        ));
    }
    out
}

/// Summary of a Fischer film-viscosity computation.
pub fn format_viscosity_report(
    input: &FischerInput,
    result: &FilmViscosity,
    power_law: Option<&PowerLawFit>,
) -> String {
    let mut out = String::new();
    out.push_str("=== rheo - Fischer film viscosity ===\n");
    if let Some(fit) = power_law {
        out.push_str(&format!(
            "MSD power law: r2 = {:.4e} * t^{:.3}\n",
            fit.prefactor, fit.exponent
        ));
    }
    out.push_str(&format!("D = {:.4} um^2/s\n", input.diffusivity));
    out.push_str(&format!("radius = {:.3} um\n", input.radius));
    out.push_str(&format!(
        "contact angle = {:.1} deg = {:.3} rad\n",
        input.contact_angle_deg,
        input.contact_angle_deg.to_radians()
    ));
    out.push_str(&format!("bulk viscosity = {} Pa s\n", input.bulk_viscosity));
    out.push_str(&format!("T = {:.1} K\n", input.temperature));
    out.push_str(&format!(
        "d = {:.4} um | c0 = {:.5} | c1 = {:.5}\n",
        result.immersion_depth, result.c0, result.c1
    ));
    out.push_str(&format!("film viscosity = {:.6e} Pa m s\n", result.viscosity));
    out
}

fn flag(exceeded: bool) -> &'static str {
    if exceeded { "  (not power-law like)" } else { "" }
}

fn fold_min(v: &[f64]) -> f64 {
    v.iter().copied().fold(f64::INFINITY, f64::min)
}

fn fold_max(v: &[f64]) -> f64 {
    v.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GseQuality;

    fn tiny_modulus() -> ModulusCurve {
        ModulusCurve {
            omega: vec![10.0, 1.0],
            g: vec![5.0, 0.5],
            storage: vec![0.0, 0.0],
            loss: vec![5.0, 0.5],
            quality: GseQuality {
                curvature_threshold: 0.15,
                storage_clipped: vec![0, 1],
                ..GseQuality::default()
            },
        }
    }

    #[test]
    fn table_has_header_rule_and_rows() {
        let table = format_modulus_table(&tiny_modulus());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].trim_start().starts_with("omega"));
        assert!(lines[1].starts_with("----"));
        assert!(lines[2].contains("1.0000e1"));
    }

    #[test]
    fn report_lists_clipping() {
        let msd = Curve::labeled(vec![0.1, 1.0, 10.0], vec![1.0, 1.0, 1.0], "t", "msd").unwrap();
        let text = format_modulus_report(&msd, &tiny_modulus(), 0.5, &GseConfig::default());
        assert!(text.contains("MSD (msd): n=3 | t=[1.0000e-1, 1.0000e1] s"));
        assert!(text.contains("clipped: G' 2 / 2, G'' 0 / 2"));
        assert!(!text.contains("not power-law like"));
    }

    #[test]
    fn viscosity_report_includes_result() {
        let input = FischerInput::new(0.5, 1.0, 90.0);
        let result = FilmViscosity {
            viscosity: -4.5e-10,
            immersion_depth: -1.0,
            c0: 11.0786,
            c1: 6.3422,
        };
        let text = format_viscosity_report(&input, &result, None);
        assert!(text.contains("film viscosity = -4.500000e-10 Pa m s"));
        assert!(text.contains("contact angle = 90.0 deg"));
    }
}
