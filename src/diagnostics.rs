//! Advisory diagnostics emitted by the numeric core.
//!
//! The computations never log directly. They report [`Diagnostic`]s to a
//! caller-supplied [`DiagnosticSink`], which keeps the math pure and lets tests
//! assert on warnings without capturing log output.

use std::sync::Mutex;

use crate::domain::ModulusComponent;

/// Which smoothing pass a curvature check refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurvatureStage {
    /// First pass, on the mean-squared displacement.
    Msd,
    /// Second pass, on |G*(s)|.
    Modulus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// The curve is not well approximated by a local power law.
    CurvatureExceeded {
        stage: CurvatureStage,
        max_abs: f64,
        threshold: f64,
    },
    /// Some values of a modulus component fell below the noise floor and were
    /// set to zero.
    Clipped {
        component: ModulusComponent,
        count: usize,
    },
    FischerCoefficients { c0: f64, c1: f64 },
    /// Echo of the Fischer inputs with the units they are assumed to carry.
    UnitAssumptions {
        diffusivity: f64,
        radius: f64,
        contact_angle_deg: f64,
        bulk_viscosity: f64,
    },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::CurvatureExceeded { .. } => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::CurvatureExceeded {
                stage,
                max_abs,
                threshold,
            } => {
                let what = match stage {
                    CurvatureStage::Msd => "Second logarithmic derivative of the MSD",
                    CurvatureStage::Modulus => "Second logarithmic derivative of G(s)",
                };
                write!(
                    f,
                    "{what} reaches {max_abs:.2} (threshold {threshold:.2}). \
                     Data is not very power-law like; results may be poor."
                )
            }
            Diagnostic::Clipped { component, count } => write!(
                f,
                "{count} value(s) of {} << G were below the noise floor and set to zero.",
                component.symbol()
            ),
            Diagnostic::FischerCoefficients { c0, c1 } => write!(f, "c0={c0:.5}, c1={c1:.5}"),
            Diagnostic::UnitAssumptions {
                diffusivity,
                radius,
                contact_angle_deg,
                bulk_viscosity,
            } => write!(
                f,
                "units: D = {diffusivity:.3} um^2/s, radius = {radius:.3} um, \
                 contact angle = {contact_angle_deg:.0} deg = {:.3} rad, \
                 bulk viscosity = {bulk_viscosity} Pa s",
                contact_angle_deg.to_radians()
            ),
        }
    }
}

/// Receiver for advisory diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Warning => log::warn!("{diagnostic}"),
            Severity::Info => log::info!("{diagnostic}"),
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: Diagnostic) {}
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    seen: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self.seen.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn warnings(&self) -> Vec<Diagnostic> {
        self.diagnostics()
            .into_iter()
            .filter(|d| d.severity() == Severity::Warning)
            .collect()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match self.seen.lock() {
            Ok(mut guard) => guard.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_separates_warnings() {
        let sink = CollectingSink::new();
        sink.report(Diagnostic::FischerCoefficients { c0: 1.0, c1: 2.0 });
        sink.report(Diagnostic::CurvatureExceeded {
            stage: CurvatureStage::Msd,
            max_abs: 0.4,
            threshold: 0.15,
        });
        assert_eq!(sink.diagnostics().len(), 2);
        assert_eq!(sink.warnings().len(), 1);
    }

    #[test]
    fn messages_name_the_quantity() {
        let msg = Diagnostic::CurvatureExceeded {
            stage: CurvatureStage::Modulus,
            max_abs: 0.31,
            threshold: 0.15,
        }
        .to_string();
        assert!(msg.contains("G(s)"));
        assert!(msg.contains("0.31"));

        let msg = Diagnostic::Clipped {
            component: ModulusComponent::Loss,
            count: 3,
        }
        .to_string();
        assert!(msg.starts_with("3 value(s) of G''"));
    }
}
