//! Complex shear modulus from an MSD via the Generalized Stokes–Einstein
//! relation (T. G. Mason et al., PRL 79, 3282, 1997).
//!
//! Pipeline:
//!
//! 1. smooth ln r²(t) and take its log-derivatives (df, ddf)
//! 2. `G(s) = (D/3) kT / (π a f Γ(1+df) (1 + ddf/2))` with `s = ω = 1/t`
//! 3. smooth ln G(s) and take its log-derivatives (dg, ddg)
//! 4. project onto G'(ω) and G''(ω) with the second-order corrections
//! 5. zero G', G'' wherever they fall below `clip · G(s)`
//!
//! Steps 1 and 3 assume the curves are locally power laws; a large second
//! log-derivative is reported as a warning but does not stop the computation.

use std::f64::consts::{FRAC_PI_2, PI};

use rayon::prelude::*;
use statrs::function::gamma::gamma;

use crate::diagnostics::{CurvatureStage, Diagnostic, DiagnosticSink};
use crate::domain::{
    Curve, GseConfig, GseQuality, ModulusComponent, ModulusCurve, SmoothedCurve, thermal_energy,
};
use crate::error::{RheologyError, RheologyResult, require_positive};
use crate::math::LogLogSmoother;

/// Factors closer to zero than this are treated as division by zero.
const SINGULAR_TOLERANCE: f64 = 1e-9;

/// G*(ω) from lag times `t` and MSD values `r2` (same length, all > 0).
pub fn gse(
    t: &[f64],
    r2: &[f64],
    radius: f64,
    config: &GseConfig,
    sink: &dyn DiagnosticSink,
) -> RheologyResult<ModulusCurve> {
    let msd = Curve::labeled(t.to_vec(), r2.to_vec(), "t", "r2")?;
    complex_modulus(&msd, radius, config, sink)
}

/// G*(ω) from an MSD curve (`x` = lag time in s, `f` = r² in µm²).
///
/// `radius` is the probe radius in µm. The moduli come out in Kg/(µm·s²).
pub fn complex_modulus(
    msd: &Curve,
    radius: f64,
    config: &GseConfig,
    sink: &dyn DiagnosticSink,
) -> RheologyResult<ModulusCurve> {
    config.validate()?;
    let radius = require_positive("radius", radius)?;
    let smoother = LogLogSmoother::new(config.smoothing_width)?;

    let omega: Vec<f64> = msd.x().iter().map(|t| 1.0 / t).collect();

    let r2 = smoother.smooth(msd)?;
    let max_ddf = r2.max_abs_curvature();
    check_curvature(CurvatureStage::Msd, max_ddf, config.curvature_threshold, sink);

    let kt = thermal_energy(config.temperature);
    let prefactor = (f64::from(config.dimensions) / 3.0) * kt / (PI * radius);

    let mut g_s = Vec::with_capacity(msd.len());
    for i in 0..msd.len() {
        let (f, df, ddf) = (r2.value[i], r2.slope[i], r2.curvature[i]);

        let gamma_term = gamma(1.0 + df);
        if !gamma_term.is_finite() || gamma_term.abs() < SINGULAR_TOLERANCE {
            return Err(singular("Γ(1 + df)", i, gamma_term));
        }
        let curvature_term = 1.0 + ddf / 2.0;
        if curvature_term.abs() < SINGULAR_TOLERANCE {
            return Err(singular("1 + ddf/2", i, curvature_term));
        }

        let value = prefactor / (f * gamma_term * curvature_term);
        if !value.is_finite() {
            return Err(singular("G(s)", i, value));
        }
        g_s.push(value);
    }

    let modulus = Curve::labeled(omega.clone(), g_s.clone(), "omega", "G")?;
    let g = smoother.smooth(&modulus)?;
    let max_ddg = g.max_abs_curvature();
    check_curvature(CurvatureStage::Modulus, max_ddg, config.curvature_threshold, sink);

    let (mut storage, mut loss) = project_modulus(&g)?;

    let storage_clipped = clip_noise_floor(&mut storage, &g_s, config.clip_fraction);
    report_clipped(ModulusComponent::Storage, &storage_clipped, sink);
    let loss_clipped = clip_noise_floor(&mut loss, &g_s, config.clip_fraction);
    report_clipped(ModulusComponent::Loss, &loss_clipped, sink);

    Ok(ModulusCurve {
        omega,
        g: g_s,
        storage,
        loss,
        quality: GseQuality {
            max_abs_msd_curvature: max_ddf,
            max_abs_modulus_curvature: max_ddg,
            curvature_threshold: config.curvature_threshold,
            storage_clipped,
            loss_clipped,
        },
    })
}

/// [`complex_modulus`] over many independent MSD curves (e.g. one per probe).
///
/// Curves are processed in parallel; results keep the input order and a
/// failure on one curve does not affect the others.
pub fn complex_modulus_batch(
    curves: &[Curve],
    radius: f64,
    config: &GseConfig,
    sink: &dyn DiagnosticSink,
) -> Vec<RheologyResult<ModulusCurve>> {
    curves
        .par_iter()
        .map(|curve| complex_modulus(curve, radius, config, sink))
        .collect()
}

/// Zero every `values[i] < fraction * g[i]` and return the affected indices.
///
/// The comparison is strict: a value exactly on the noise floor is kept.
pub fn clip_noise_floor(values: &mut [f64], g: &[f64], fraction: f64) -> Vec<usize> {
    let mut clipped = Vec::new();
    for (i, (v, &gi)) in values.iter_mut().zip(g).enumerate() {
        if *v < fraction * gi {
            *v = 0.0;
            clipped.push(i);
        }
    }
    clipped
}

/// Split smoothed G(s) into G'(ω) and G''(ω) with the second-order corrections.
fn project_modulus(g: &SmoothedCurve) -> RheologyResult<(Vec<f64>, Vec<f64>)> {
    let mut storage = Vec::with_capacity(g.len());
    let mut loss = Vec::with_capacity(g.len());
    for i in 0..g.len() {
        let (gi, dg, ddg) = (g.value[i], g.slope[i], g.curvature[i]);

        let denom = 1.0 + ddg;
        if denom.abs() < SINGULAR_TOLERANCE {
            return Err(singular("1 + ddg", i, denom));
        }
        let scale = gi / denom;
        storage.push(scale * ((FRAC_PI_2 * dg).cos() - (FRAC_PI_2 - 1.0) * dg * ddg));
        loss.push(scale * ((FRAC_PI_2 * dg).sin() - (FRAC_PI_2 - 1.0) * (1.0 - dg) * ddg));
    }
    Ok((storage, loss))
}

fn check_curvature(
    stage: CurvatureStage,
    max_abs: f64,
    threshold: f64,
    sink: &dyn DiagnosticSink,
) {
    if max_abs > threshold {
        sink.report(Diagnostic::CurvatureExceeded {
            stage,
            max_abs,
            threshold,
        });
    }
}

fn report_clipped(component: ModulusComponent, clipped: &[usize], sink: &dyn DiagnosticSink) {
    if !clipped.is_empty() {
        sink.report(Diagnostic::Clipped {
            component,
            count: clipped.len(),
        });
    }
}

fn singular(quantity: &'static str, index: usize, value: f64) -> RheologyError {
    RheologyError::Singular {
        quantity,
        index: Some(index),
        value,
    }
}
