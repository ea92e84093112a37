//! # Error Types
//!
//! Structured error types for girder_core. Each variant carries enough
//! context for a caller (human or program) to see which input was rejected
//! and why.
//!
//! Several conditions are deliberately *not* errors: cut heights outside a
//! section contribute nothing, wheels that have left the span carry no load,
//! and a constraint that rejects a search candidate simply skips it.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::errors::{CalcError, CalcResult};
//!
//! fn validate_span(span_mm: f64) -> CalcResult<()> {
//!     if span_mm <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "span_mm",
//!             span_mm.to_string(),
//!             "Span must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_span(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for girder_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, non-positive dimension, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The train cannot be placed anywhere on the span
    #[error("Infeasible train: wheelbase {wheelbase_mm} mm does not fit on span {span_mm} mm")]
    InfeasibleTrain { wheelbase_mm: f64, span_mm: f64 },

    /// An iterative search failed to bracket or converge
    #[error("No convergence in {search}: {reason}")]
    NonConvergence { search: String, reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a NonConvergence error
    pub fn non_convergence(search: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::NonConvergence {
            search: search.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::InfeasibleTrain { .. } => "INFEASIBLE_TRAIN",
            CalcError::NonConvergence { .. } => "NON_CONVERGENCE",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

/// Reject a dimension that is not strictly positive and finite.
pub(crate) fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Must be positive",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("span_mm", "-5.0", "Span must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CalcError::non_convergence("maximum load", "flat").error_code(),
            "NON_CONVERGENCE"
        );
        let train = CalcError::InfeasibleTrain {
            wheelbase_mm: 1300.0,
            span_mm: 1200.0,
        };
        assert_eq!(train.error_code(), "INFEASIBLE_TRAIN");
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive("width_mm", 1.0).is_ok());
        assert!(require_positive("width_mm", 0.0).is_err());
        assert!(require_positive("width_mm", f64::NAN).is_err());
    }
}
