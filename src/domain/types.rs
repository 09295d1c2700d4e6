//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during smoothing and modulus computation
//! - exported to JSON/CSV
//! - loaded from a JSON configuration file
//!
//! Units follow the microrheology convention used throughout the crate:
//! lengths in µm, times in s, energies in Kg·µm²/s². Moduli are therefore
//! reported in Kg/(µm·s²).

use serde::{Deserialize, Serialize};

use crate::error::{RheologyError, RheologyResult, require_positive};

/// Gaussian bandwidth of the local parabola fits, in units of `ln(x)`.
pub const DEFAULT_SMOOTHING_WIDTH: f64 = 0.7;

/// Fraction of |G*| below which G' or G'' is considered buried in noise.
pub const DEFAULT_CLIP_FRACTION: f64 = 0.03;

/// Largest tolerated |d²ln f / d(ln x)²| before the local power-law
/// approximation behind GSE is flagged as unreliable.
pub const DEFAULT_CURVATURE_THRESHOLD: f64 = 0.15;

/// Room temperature (K).
pub const DEFAULT_TEMPERATURE_K: f64 = 298.0;

/// Water at room temperature (Pa·s).
pub const DEFAULT_BULK_VISCOSITY_PA_S: f64 = 1e-3;

/// Video microscopy tracks probes in the focal plane.
pub const TRACKED_DIMENSIONS: u32 = 2;

/// kT at [`DEFAULT_TEMPERATURE_K`], in Kg·µm²/s².
pub const REFERENCE_KT: f64 = 4.1e-9;

/// A parabola has three coefficients.
pub const MIN_CURVE_POINTS: usize = 3;

/// Thermal energy kT (Kg·µm²/s²) at temperature `t_kelvin`.
pub fn thermal_energy(t_kelvin: f64) -> f64 {
    REFERENCE_KT * t_kelvin / DEFAULT_TEMPERATURE_K
}

/// Sampled positive function `f(x)`, ready for log-log analysis.
///
/// Construction validates every value, so downstream code can take
/// logarithms without further checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    x: Vec<f64>,
    f: Vec<f64>,
    #[serde(skip)]
    labels: (&'static str, &'static str),
}

impl Curve {
    pub fn new(x: Vec<f64>, f: Vec<f64>) -> RheologyResult<Self> {
        Self::labeled(x, f, "x", "f")
    }

    /// Like [`Curve::new`], but errors name the series `x_label` / `f_label`.
    pub fn labeled(
        x: Vec<f64>,
        f: Vec<f64>,
        x_label: &'static str,
        f_label: &'static str,
    ) -> RheologyResult<Self> {
        if x.len() != f.len() {
            return Err(RheologyError::LengthMismatch {
                left: x_label,
                left_len: x.len(),
                right: f_label,
                right_len: f.len(),
            });
        }
        if x.len() < MIN_CURVE_POINTS {
            return Err(RheologyError::TooFewPoints {
                len: x.len(),
                min: MIN_CURVE_POINTS,
            });
        }
        check_log_domain(x_label, &x)?;
        check_log_domain(f_label, &f)?;

        Ok(Self {
            x,
            f,
            labels: (x_label, f_label),
        })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn f(&self) -> &[f64] {
        &self.f
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Always `false`: a valid curve has at least [`MIN_CURVE_POINTS`] samples.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x_label(&self) -> &'static str {
        self.labels.0
    }

    pub fn f_label(&self) -> &'static str {
        self.labels.1
    }
}

fn check_log_domain(series: &'static str, values: &[f64]) -> RheologyResult<()> {
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(RheologyError::NonFinite {
                series,
                index,
                value,
            });
        }
        if value <= 0.0 {
            return Err(RheologyError::NonPositive {
                series,
                index,
                value,
            });
        }
    }
    Ok(())
}

/// Output of the log-log smoother, index-aligned with its input curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmoothedCurve {
    /// Smoothed function value f̂.
    pub value: Vec<f64>,
    /// d(ln f)/d(ln x), the local power-law exponent.
    pub slope: Vec<f64>,
    /// d²(ln f)/d(ln x)².
    pub curvature: Vec<f64>,
}

impl SmoothedCurve {
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn max_abs_curvature(&self) -> f64 {
        self.curvature.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }
}

/// Which modulus component a diagnostic or clip refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModulusComponent {
    /// G'(ω).
    Storage,
    /// G''(ω).
    Loss,
}

impl ModulusComponent {
    pub fn symbol(self) -> &'static str {
        match self {
            ModulusComponent::Storage => "G'",
            ModulusComponent::Loss => "G''",
        }
    }
}

/// Fit-quality bookkeeping for a GSE run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GseQuality {
    /// max |ddf| of the smoothed MSD.
    pub max_abs_msd_curvature: f64,
    /// max |ddg| of the smoothed modulus magnitude.
    pub max_abs_modulus_curvature: f64,
    /// Threshold the two maxima were compared against.
    pub curvature_threshold: f64,
    /// Indices where G' fell below the noise floor and was zeroed.
    pub storage_clipped: Vec<usize>,
    /// Indices where G'' fell below the noise floor and was zeroed.
    pub loss_clipped: Vec<usize>,
}

impl GseQuality {
    /// True when both smoothing passes stayed within the curvature threshold.
    pub fn is_power_law_like(&self) -> bool {
        self.max_abs_msd_curvature <= self.curvature_threshold
            && self.max_abs_modulus_curvature <= self.curvature_threshold
    }
}

/// G*(ω) derived from one MSD curve.
///
/// Index `i` corresponds to input lag time `t[i]`, with `omega[i] = 1 / t[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModulusCurve {
    pub omega: Vec<f64>,
    /// |G*(ω)| as given by the GSE relation, before the second smoothing pass.
    pub g: Vec<f64>,
    pub storage: Vec<f64>,
    pub loss: Vec<f64>,
    pub quality: GseQuality,
}

/// One aligned sample of a [`ModulusCurve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModulusRow {
    pub omega: f64,
    pub g: f64,
    pub storage: f64,
    pub loss: f64,
}

impl ModulusCurve {
    pub fn len(&self) -> usize {
        self.omega.len()
    }

    pub fn is_empty(&self) -> bool {
        self.omega.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = ModulusRow> + '_ {
        (0..self.len()).map(|i| ModulusRow {
            omega: self.omega[i],
            g: self.g[i],
            storage: self.storage[i],
            loss: self.loss[i],
        })
    }

    /// Loss tangent G''/G'; `None` where G' was clipped to zero.
    pub fn tan_delta(&self) -> Vec<Option<f64>> {
        self.storage
            .iter()
            .zip(&self.loss)
            .map(|(&gp, &gpp)| if gp > 0.0 { Some(gpp / gp) } else { None })
            .collect()
    }
}

/// Inputs of the Fischer thin-film model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FischerInput {
    /// Measured diffusivity (µm²/s).
    pub diffusivity: f64,
    /// Sphere radius (µm).
    pub radius: f64,
    /// Contact angle (degrees).
    pub contact_angle_deg: f64,
    /// Viscosity of the bulk subphase (Pa·s).
    pub bulk_viscosity: f64,
    /// Temperature (K).
    pub temperature: f64,
}

impl FischerInput {
    /// Inputs with the default bulk viscosity and temperature.
    pub fn new(diffusivity: f64, radius: f64, contact_angle_deg: f64) -> Self {
        Self {
            diffusivity,
            radius,
            contact_angle_deg,
            bulk_viscosity: DEFAULT_BULK_VISCOSITY_PA_S,
            temperature: DEFAULT_TEMPERATURE_K,
        }
    }

    pub fn with_bulk_viscosity(mut self, bulk_viscosity: f64) -> Self {
        self.bulk_viscosity = bulk_viscosity;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Result of the Fischer model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilmViscosity {
    /// Film viscosity in Pa·m·s (= Kg·s).
    pub viscosity: f64,
    /// `d = a (cos θ − 1)`, the signed immersion depth (µm).
    pub immersion_depth: f64,
    pub c0: f64,
    pub c1: f64,
}

/// Tunables for the GSE computation.
///
/// Defaults are the literature values; override per experiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GseConfig {
    /// Temperature (K).
    pub temperature: f64,
    /// Noise-floor fraction of |G*| (0 disables clipping).
    pub clip_fraction: f64,
    /// Gaussian bandwidth in `ln(x)` units.
    pub smoothing_width: f64,
    pub curvature_threshold: f64,
    /// Number of tracked spatial dimensions.
    pub dimensions: u32,
}

impl Default for GseConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE_K,
            clip_fraction: DEFAULT_CLIP_FRACTION,
            smoothing_width: DEFAULT_SMOOTHING_WIDTH,
            curvature_threshold: DEFAULT_CURVATURE_THRESHOLD,
            dimensions: TRACKED_DIMENSIONS,
        }
    }
}

impl GseConfig {
    pub fn validate(&self) -> RheologyResult<()> {
        require_positive("temperature", self.temperature)?;
        require_positive("smoothing_width", self.smoothing_width)?;
        if !(self.clip_fraction.is_finite() && self.clip_fraction >= 0.0) {
            return Err(RheologyError::InvalidParameter {
                name: "clip_fraction",
                value: self.clip_fraction,
                reason: "must be finite and >= 0",
            });
        }
        if !(self.curvature_threshold.is_finite() && self.curvature_threshold >= 0.0) {
            return Err(RheologyError::InvalidParameter {
                name: "curvature_threshold",
                value: self.curvature_threshold,
                reason: "must be finite and >= 0",
            });
        }
        if !(1..=3).contains(&self.dimensions) {
            return Err(RheologyError::InvalidParameter {
                name: "dimensions",
                value: f64::from(self.dimensions),
                reason: "must be 1, 2 or 3",
            });
        }
        Ok(())
    }
}
