//! Error types.
//!
//! The numeric core returns [`RheologyError`]; the `rheo` binary converts
//! everything into an [`AppError`] carrying a process exit code.

use thiserror::Error;

/// Result alias for the numeric core.
pub type RheologyResult<T> = Result<T, RheologyError>;

/// Broad error classes, used by callers that only care about the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value lies outside the domain of the operation (e.g. `log(x <= 0)`).
    Domain,
    /// Paired sequences disagree in length, or are too short.
    Shape,
    /// A physical formula divides by zero or diverges.
    Singularity,
    /// The local least-squares problem could not be solved.
    Numerical,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RheologyError {
    #[error("{series}[{index}] = {value} must be > 0 (its logarithm is required)")]
    NonPositive {
        series: &'static str,
        index: usize,
        value: f64,
    },

    #[error("{series}[{index}] is not finite ({value})")]
    NonFinite {
        series: &'static str,
        index: usize,
        value: f64,
    },

    #[error("length mismatch: {left} has {left_len} values but {right} has {right_len}")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    #[error("curve has {len} points; at least {min} are required")]
    TooFewPoints { len: usize, min: usize },

    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// `index` is `None` for scalar computations.
    #[error("singular computation: {quantity} = {value}{}", fmt_index(.index))]
    Singular {
        quantity: &'static str,
        index: Option<usize>,
        value: f64,
    },

    /// `index` is `None` for a fit over the whole curve.
    #[error("least-squares fit failed{}", fmt_index(.index))]
    IllConditionedFit { index: Option<usize> },
}

fn fmt_index(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" at index {i}"),
        None => String::new(),
    }
}

impl RheologyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NonPositive { .. } | Self::NonFinite { .. } | Self::InvalidParameter { .. } => {
                ErrorKind::Domain
            }
            Self::LengthMismatch { .. } | Self::TooFewPoints { .. } => ErrorKind::Shape,
            Self::Singular { .. } => ErrorKind::Singularity,
            Self::IllConditionedFit { .. } => ErrorKind::Numerical,
        }
    }
}

/// Check that a scalar parameter is finite and strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> RheologyResult<f64> {
    if !value.is_finite() {
        return Err(RheologyError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        });
    }
    if value <= 0.0 {
        return Err(RheologyError::InvalidParameter {
            name,
            value,
            reason: "must be > 0",
        });
    }
    Ok(value)
}

/// Error surfaced by the `rheo` binary.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<RheologyError> for AppError {
    fn from(err: RheologyError) -> Self {
        let exit_code = match err.kind() {
            ErrorKind::Domain | ErrorKind::Shape => 2,
            ErrorKind::Singularity | ErrorKind::Numerical => 3,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        let e = RheologyError::NonPositive {
            series: "r2",
            index: 4,
            value: 0.0,
        };
        assert_eq!(e.kind(), ErrorKind::Domain);
        assert!(e.to_string().contains("r2[4]"));

        let e = RheologyError::LengthMismatch {
            left: "t",
            left_len: 3,
            right: "r2",
            right_len: 4,
        };
        assert_eq!(e.kind(), ErrorKind::Shape);

        let e = RheologyError::Singular {
            quantity: "1 + ddg",
            index: Some(7),
            value: 0.0,
        };
        assert_eq!(e.kind(), ErrorKind::Singularity);
        assert!(e.to_string().ends_with("at index 7"));

        let e = RheologyError::IllConditionedFit { index: Some(3) };
        assert_eq!(e.kind(), ErrorKind::Numerical);
        assert_eq!(e.to_string(), "least-squares fit failed at index 3");

        let e = RheologyError::IllConditionedFit { index: None };
        assert_eq!(e.to_string(), "least-squares fit failed");
    }

    #[test]
    fn app_error_exit_codes() {
        let shape: AppError = RheologyError::TooFewPoints { len: 2, min: 3 }.into();
        assert_eq!(shape.exit_code(), 2);

        let singular: AppError = RheologyError::Singular {
            quantity: "c1",
            index: None,
            value: f64::INFINITY,
        }
        .into();
        assert_eq!(singular.exit_code(), 3);
        assert!(!singular.to_string().contains("index"));
    }

    #[test]
    fn require_positive_rejects_zero_and_nan() {
        assert!(require_positive("radius", 0.0).is_err());
        assert!(require_positive("radius", f64::NAN).is_err());
        assert_eq!(require_positive("radius", 0.5), Ok(0.5));
    }
}
