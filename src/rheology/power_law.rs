//! Global power-law fit of an MSD curve.
//!
//! `r²(t) = A tⁿ` is fitted by ordinary least squares on `ln r² = ln A + n ln t`.
//! For a freely diffusing probe `n ≈ 1` and `A = 2 · dims · D`, which is how
//! callers obtain the diffusivity fed to the Fischer model.

use serde::Serialize;

use crate::domain::Curve;
use crate::error::{RheologyError, RheologyResult};
use crate::math::weighted_polyfit;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerLawFit {
    /// Exponent `n`.
    pub exponent: f64,
    /// Prefactor `A`, in the units of `f` at `x = 1`.
    pub prefactor: f64,
}

impl PowerLawFit {
    pub fn evaluate(&self, x: f64) -> f64 {
        self.prefactor * x.powf(self.exponent)
    }

    /// Diffusivity implied by the prefactor for `dimensions` tracked axes.
    ///
    /// Only meaningful when the exponent is close to 1.
    pub fn diffusivity(&self, dimensions: u32) -> f64 {
        self.prefactor / (2.0 * f64::from(dimensions))
    }
}

pub fn fit_power_law(curve: &Curve) -> RheologyResult<PowerLawFit> {
    let log_x: Vec<f64> = curve.x().iter().map(|v| v.ln()).collect();
    let log_f: Vec<f64> = curve.f().iter().map(|v| v.ln()).collect();
    let ones = vec![1.0; log_x.len()];

    let coeffs = weighted_polyfit(&log_x, &log_f, &ones, 1)
        .ok_or(RheologyError::IllConditionedFit { index: None })?;

    Ok(PowerLawFit {
        exponent: coeffs[1],
        prefactor: coeffs[0].exp(),
    })
}
