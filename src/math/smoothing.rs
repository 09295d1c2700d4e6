//! Local parabolic smoothing in log-log space.
//!
//! For every sample `x0` we fit
//!
//! ```text
//! ln f ≈ α v² + β v + γ,   v = ln x − ln x0
//! ```
//!
//! by weighted least squares over the *whole* curve, with Gaussian weights
//! `exp(−v² / (2 width²))`. Evaluating the parabola at `v = 0` gives:
//!
//! - smoothed value `f̂ = exp(γ)`
//! - first log-derivative `β`
//! - second log-derivative `2α`
//!
//! Fitting in `v` rather than `ln x` describes the same parabola in a shifted
//! basis; it only keeps the design matrix well conditioned when `ln x0` is
//! far from zero.
//!
//! Each output index is an independent O(n) fit, so the fits run in parallel.
//! Results are collected in index order and do not depend on scheduling.

use rayon::prelude::*;

use crate::domain::{Curve, DEFAULT_SMOOTHING_WIDTH, SmoothedCurve};
use crate::error::{RheologyError, RheologyResult, require_positive};
use crate::math::weighted_polyfit;

/// Gaussian-weighted local parabola smoother for log-log curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogLogSmoother {
    width: f64,
}

impl Default for LogLogSmoother {
    fn default() -> Self {
        Self {
            width: DEFAULT_SMOOTHING_WIDTH,
        }
    }
}

impl LogLogSmoother {
    /// `width` is the Gaussian bandwidth in units of `ln(x)`.
    pub fn new(width: f64) -> RheologyResult<Self> {
        let width = require_positive("smoothing_width", width)?;
        Ok(Self { width })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Smooth `curve` and return its first two log-derivatives.
    pub fn smooth(&self, curve: &Curve) -> RheologyResult<SmoothedCurve> {
        let log_x: Vec<f64> = curve.x().iter().map(|v| v.ln()).collect();
        let log_f: Vec<f64> = curve.f().iter().map(|v| v.ln()).collect();

        let fits: Vec<(f64, f64, f64)> = (0..log_x.len())
            .into_par_iter()
            .map(|index| fit_at(&log_x, &log_f, index, self.width))
            .collect::<RheologyResult<_>>()?;

        let mut out = SmoothedCurve {
            value: Vec::with_capacity(fits.len()),
            slope: Vec::with_capacity(fits.len()),
            curvature: Vec::with_capacity(fits.len()),
        };
        for (value, slope, curvature) in fits {
            out.value.push(value);
            out.slope.push(slope);
            out.curvature.push(curvature);
        }
        Ok(out)
    }
}

/// Convenience wrapper: smooth `curve` with bandwidth `width`.
pub fn log_derivatives(curve: &Curve, width: f64) -> RheologyResult<SmoothedCurve> {
    LogLogSmoother::new(width)?.smooth(curve)
}

fn fit_at(
    log_x: &[f64],
    log_f: &[f64],
    index: usize,
    width: f64,
) -> RheologyResult<(f64, f64, f64)> {
    let (u0, y0) = (log_x[index], log_f[index]);
    let two_var = 2.0 * width * width;

    // Shifting ln f by its own value leaves the centre row with a zero
    // target, so rounding scales with the (possibly tiny) tail weights.
    let v: Vec<f64> = log_x.iter().map(|u| u - u0).collect();
    let y: Vec<f64> = log_f.iter().map(|g| g - y0).collect();
    let w: Vec<f64> = v.iter().map(|d| (-(d * d) / two_var).exp()).collect();

    let coeffs = weighted_polyfit(&v, &y, &w, 2)
        .ok_or(RheologyError::IllConditionedFit { index: Some(index) })?;
    let (gamma, beta, alpha) = (y0 + coeffs[0], coeffs[1], coeffs[2]);

    let value = gamma.exp();
    if !(value.is_finite() && value > 0.0) {
        return Err(RheologyError::IllConditionedFit { index: Some(index) });
    }
    Ok((value, beta, 2.0 * alpha))
}
