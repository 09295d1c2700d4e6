//! Synthetic MSD generation for canonical media.
//!
//! Curves are sampled on a log-spaced lag grid (the way video microscopy lag
//! times are usually binned) and optionally perturbed with multiplicative
//! log-normal noise, which keeps every value strictly positive.

use clap::ValueEnum;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::domain::{Curve, TRACKED_DIMENSIONS};
use crate::error::{RheologyError, RheologyResult, require_positive};

/// Medium whose MSD is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MsdKind {
    /// Newtonian fluid: `r² = 2 · dims · D · t`.
    Viscous,
    /// Pure elastic solid: `r² = plateau`.
    Elastic,
    /// Kelvin–Voigt solid: `r² = plateau · (1 − exp(−t/τ))`.
    KelvinVoigt,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MsdSampleSpec {
    pub kind: MsdKind,
    pub points: usize,
    /// Shortest lag time (s).
    pub t_min: f64,
    /// Longest lag time (s).
    pub t_max: f64,
    /// µm²/s, used by `Viscous`.
    pub diffusivity: f64,
    /// µm², used by `Elastic` and `KelvinVoigt`.
    pub plateau: f64,
    /// Retardation time τ (s), used by `KelvinVoigt`.
    pub relaxation_time: f64,
    pub dimensions: u32,
    /// Standard deviation of the log-normal noise (0 = noise-free).
    pub noise: f64,
    pub seed: u64,
}

impl Default for MsdSampleSpec {
    fn default() -> Self {
        Self {
            kind: MsdKind::Viscous,
            points: 40,
            t_min: 1e-2,
            t_max: 10.0,
            diffusivity: 0.5,
            plateau: 0.01,
            relaxation_time: 0.1,
            dimensions: TRACKED_DIMENSIONS,
            noise: 0.0,
            seed: 42,
        }
    }
}

/// Generate `steps` log-spaced points between `min` and `max` (inclusive).
pub fn log_space(min: f64, max: f64, steps: usize) -> RheologyResult<Vec<f64>> {
    require_positive("t_min", min)?;
    require_positive("t_max", max)?;
    if max <= min {
        return Err(RheologyError::InvalidParameter {
            name: "t_max",
            value: max,
            reason: "must be greater than t_min",
        });
    }
    if steps < 2 {
        return Err(RheologyError::TooFewPoints { len: steps, min: 2 });
    }

    let ln_min = min.ln();
    let ln_max = max.ln();
    let step = (ln_max - ln_min) / (steps as f64 - 1.0);

    Ok((0..steps).map(|i| (ln_min + step * i as f64).exp()).collect())
}

/// Noise-free MSD of the medium at lag time `t`.
pub fn ideal_msd(spec: &MsdSampleSpec, t: f64) -> f64 {
    match spec.kind {
        MsdKind::Viscous => 2.0 * f64::from(spec.dimensions) * spec.diffusivity * t,
        MsdKind::Elastic => spec.plateau,
        MsdKind::KelvinVoigt => spec.plateau * -(-t / spec.relaxation_time).exp_m1(),
    }
}

/// Generate a synthetic MSD curve (`x` = lag time, `f` = r²).
pub fn generate_msd(spec: &MsdSampleSpec) -> RheologyResult<Curve> {
    match spec.kind {
        MsdKind::Viscous => {
            require_positive("diffusivity", spec.diffusivity)?;
        }
        MsdKind::Elastic => {
            require_positive("plateau", spec.plateau)?;
        }
        MsdKind::KelvinVoigt => {
            require_positive("plateau", spec.plateau)?;
            require_positive("relaxation_time", spec.relaxation_time)?;
        }
    }
    if spec.dimensions == 0 {
        return Err(RheologyError::InvalidParameter {
            name: "dimensions",
            value: 0.0,
            reason: "must be >= 1",
        });
    }

    if !(spec.noise.is_finite() && spec.noise >= 0.0) {
        return Err(RheologyError::InvalidParameter {
            name: "noise",
            value: spec.noise,
            reason: "must be finite and >= 0",
        });
    }

    let t = log_space(spec.t_min, spec.t_max, spec.points)?;
    let normal = Normal::new(0.0, spec.noise).map_err(|_| RheologyError::InvalidParameter {
        name: "noise",
        value: spec.noise,
        reason: "must be finite and >= 0",
    })?;
    let mut rng = StdRng::seed_from_u64(spec.seed);

    let r2: Vec<f64> = t
        .iter()
        .map(|&ti| {
            let z: f64 = normal.sample(&mut rng);
            ideal_msd(spec, ti) * z.exp()
        })
        .collect();

    Curve::labeled(t, r2, "t", "r2")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_space_includes_endpoints() {
        let v = log_space(0.01, 10.0, 7).unwrap();
        assert_eq!(v.len(), 7);
        assert!((v[0] - 0.01).abs() < 1e-15);
        assert!((v[6] - 10.0).abs() < 1e-12);
        assert!(log_space(1.0, 1.0, 5).is_err());
        assert!(log_space(0.1, 1.0, 1).is_err());
    }

    #[test]
    fn noise_free_viscous_sample_is_exact() {
        let spec = MsdSampleSpec::default();
        let curve = generate_msd(&spec).unwrap();
        assert_eq!(curve.len(), spec.points);
        for (t, r2) in curve.x().iter().zip(curve.f()) {
            assert!((r2 - 4.0 * spec.diffusivity * t).abs() < 1e-12);
        }
    }

    #[test]
    fn kelvin_voigt_saturates_at_plateau() {
        let spec = MsdSampleSpec {
            kind: MsdKind::KelvinVoigt,
            t_max: 100.0,
            ..MsdSampleSpec::default()
        };
        let curve = generate_msd(&spec).unwrap();
        let last = *curve.f().last().unwrap();
        assert!((last - spec.plateau).abs() < 1e-12);
        assert!(curve.f().windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn noisy_samples_are_seeded_and_positive() {
        let spec = MsdSampleSpec {
            noise: 0.2,
            seed: 7,
            ..MsdSampleSpec::default()
        };
        let a = generate_msd(&spec).unwrap();
        let b = generate_msd(&spec).unwrap();
        assert_eq!(a, b);
        assert!(a.f().iter().all(|v| *v > 0.0));

        let c = generate_msd(&MsdSampleSpec { seed: 8, ..spec }).unwrap();
        assert_ne!(a.f(), c.f());
    }

    #[test]
    fn rejects_invalid_sample_settings() {
        for noise in [-1.0, -1e-12, f64::NAN, f64::INFINITY] {
            let spec = MsdSampleSpec {
                noise,
                ..MsdSampleSpec::default()
            };
            assert!(
                matches!(
                    generate_msd(&spec),
                    Err(RheologyError::InvalidParameter { name: "noise", .. })
                ),
                "noise={noise}"
            );
        }

        let spec = MsdSampleSpec {
            kind: MsdKind::Elastic,
            plateau: 0.0,
            ..MsdSampleSpec::default()
        };
        assert!(generate_msd(&spec).is_err());
    }
}
