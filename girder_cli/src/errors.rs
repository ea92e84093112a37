//! # CLI Errors
//!
//! Calculation errors from girder_core plus the file errors only the CLI
//! can produce.

use girder_core::errors::CalcError;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum CliError {
    /// Error from the calculation engine
    #[error(transparent)]
    Calc(#[from] CalcError),

    /// File system error
    #[error("File error during {operation} on '{path}': {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },
}

impl CliError {
    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CliError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Stable error code for scripts
    pub fn error_code(&self) -> &'static str {
        match self {
            CliError::Calc(err) => err.error_code(),
            CliError::FileError { .. } => "FILE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_errors_pass_through() {
        let err: CliError = CalcError::invalid_input("span_mm", "-1", "Span must be positive").into();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.to_string().contains("span_mm"));
    }

    #[test]
    fn test_file_error_json() {
        let err = CliError::file_error("open", "bridge.girder", "not found");
        assert_eq!(err.error_code(), "FILE_ERROR");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"type\":\"FileError\""));
        assert!(json.contains("bridge.girder"));
    }
}
