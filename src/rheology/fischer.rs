//! Fischer thin-film viscosity.
//!
//! Corrects the Stokes–Einstein drag of a sphere sitting in an interface for
//! the film geometry set by its contact angle (T. M. Fischer et al.,
//! J. Fluid Mech. 558, 2006). Units:
//!
//! - diffusivity in µm²/s, radius in µm
//! - bulk viscosity in Pa·s, converted internally to Kg/(µm·s)
//! - result in Pa·m·s (= Kg·s)

use std::f64::consts::PI;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::domain::{FilmViscosity, FischerInput, thermal_energy};
use crate::error::{RheologyError, RheologyResult, require_positive};

/// Pa·s → Kg/(µm·s).
const PA_S_TO_KG_PER_UM_S: f64 = 1e-6;

/// Film viscosity from the Fischer model.
pub fn film_viscosity(
    input: &FischerInput,
    sink: &dyn DiagnosticSink,
) -> RheologyResult<FilmViscosity> {
    validate(input)?;
    let a = input.radius;

    let d = a * ((input.contact_angle_deg * PI / 180.0).cos() - 1.0);
    let c0 = 6.0 * PI * (32.0 * (d / a + 2.0) / (9.0 * PI * PI)).tanh().sqrt();
    let c1 = -4.0 * ((2.0 / PI) * (d + 2.0 * a).atan2(3.0 * a)).ln();

    sink.report(Diagnostic::FischerCoefficients { c0, c1 });
    sink.report(Diagnostic::UnitAssumptions {
        diffusivity: input.diffusivity,
        radius: a,
        contact_angle_deg: input.contact_angle_deg,
        bulk_viscosity: input.bulk_viscosity,
    });

    if !c0.is_finite() {
        return Err(RheologyError::Singular {
            quantity: "c0",
            index: None,
            value: c0,
        });
    }
    // c1 diverges for a fully immersed sphere (contact angle 180°).
    if !c1.is_finite() || c1.abs() < f64::EPSILON {
        return Err(RheologyError::Singular {
            quantity: "c1",
            index: None,
            value: c1,
        });
    }

    let kt = thermal_energy(input.temperature);
    let bulk = input.bulk_viscosity * PA_S_TO_KG_PER_UM_S;
    let viscosity = (kt / input.diffusivity - bulk * a * c0) / c1;

    Ok(FilmViscosity {
        viscosity,
        immersion_depth: d,
        c0,
        c1,
    })
}

fn validate(input: &FischerInput) -> RheologyResult<()> {
    require_positive("diffusivity", input.diffusivity)?;
    require_positive("radius", input.radius)?;
    require_positive("temperature", input.temperature)?;
    if !input.contact_angle_deg.is_finite() {
        return Err(RheologyError::InvalidParameter {
            name: "contact_angle_deg",
            value: input.contact_angle_deg,
            reason: "must be finite",
        });
    }
    if !(input.bulk_viscosity.is_finite() && input.bulk_viscosity >= 0.0) {
        return Err(RheologyError::InvalidParameter {
            name: "bulk_viscosity",
            value: input.bulk_viscosity,
            reason: "must be finite and >= 0",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingSink, NullSink};
    use crate::error::ErrorKind;

    fn assert_rel(actual: f64, expected: f64, tol: f64) {
        assert!(
            ((actual - expected) / expected).abs() < tol,
            "expected {expected:e}, got {actual:e}"
        );
    }

    #[test]
    fn regression_at_ninety_degrees() {
        let out = film_viscosity(&FischerInput::new(0.5, 1.0, 90.0), &NullSink).unwrap();
        assert!((out.immersion_depth + 1.0).abs() < 1e-12);
        assert_rel(out.c0, 11.078616223196818, 1e-12);
        assert_rel(out.c1, 6.342245658921414, 1e-12);
        assert_rel(out.viscosity, -4.5387964736868406e-10, 1e-9);
    }

    #[test]
    fn regression_with_zero_contact_angle() {
        let out = film_viscosity(&FischerInput::new(0.5, 1.0, 0.0), &NullSink).unwrap();
        assert_eq!(out.immersion_depth, 0.0);
        assert_rel(out.c0, 14.808875669683816, 1e-12);
        assert_rel(out.c1, 3.9304264343231283, 1e-12);
        assert_rel(out.viscosity, -1.6814653015689769e-09, 1e-9);
    }

    #[test]
    fn regression_with_custom_bulk_and_temperature() {
        let input = FischerInput::new(2.0, 0.5, 45.0)
            .with_bulk_viscosity(1e-3)
            .with_temperature(310.0);
        let out = film_viscosity(&input, &NullSink).unwrap();
        assert_rel(out.c0, 13.949059848945394, 1e-12);
        assert_rel(out.c1, 4.442548286169567, 1e-12);
        assert_rel(out.viscosity, -1.0899104020942577e-09, 1e-9);
    }

    #[test]
    fn fully_immersed_sphere_is_singular() {
        let err = film_viscosity(&FischerInput::new(0.5, 1.0, 180.0), &NullSink).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Singularity);
        assert!(matches!(err, RheologyError::Singular { quantity: "c1", .. }));
    }

    #[test]
    fn rejects_non_physical_inputs() {
        for input in [
            FischerInput::new(0.0, 1.0, 90.0),
            FischerInput::new(0.5, -1.0, 90.0),
            FischerInput::new(0.5, 1.0, f64::NAN),
            FischerInput::new(0.5, 1.0, 90.0).with_bulk_viscosity(-1.0),
            FischerInput::new(0.5, 1.0, 90.0).with_temperature(0.0),
        ] {
            let err = film_viscosity(&input, &NullSink).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Domain, "{input:?}");
        }
    }

    #[test]
    fn reports_coefficients_and_units() {
        let sink = CollectingSink::new();
        film_viscosity(&FischerInput::new(0.5, 1.0, 90.0), &sink).unwrap();
        let seen = sink.diagnostics();
        assert_eq!(seen.len(), 2);
        assert!(matches!(seen[0], Diagnostic::FischerCoefficients { .. }));
        assert!(sink.warnings().is_empty());
    }
}
