//! Error types for preset construction, persistence and hashing.

use thiserror::Error;

/// Top-level error type for preset operations.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A control point or parameter was NaN or infinite.
    #[error("non-finite value for '{field}': {value}")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A curve range was empty or inverted.
    #[error("invalid range for '{field}': min {min} is greater than max {max}")]
    InvalidRange {
        /// Name of the curve or parameter.
        field: &'static str,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// A control point index was out of bounds.
    #[error("control point index {index} out of bounds (curve has {len} points)")]
    PointIndex {
        /// Requested index.
        index: usize,
        /// Number of points in the curve.
        len: usize,
    },

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpecError {
    /// Creates a non-finite value error.
    pub fn non_finite(field: &'static str, value: f64) -> Self {
        Self::NonFinite { field, value }
    }
}

/// Common trait for errors that carry a stable reporting code.
///
/// Implemented by every error enum in the workspace so that the command-line
/// front end can print `[CODE] message` uniformly.
pub trait CodedError: std::error::Error {
    /// Stable code like `"SPEC_001"` or `"AUDIO_003"`.
    fn code(&self) -> &'static str;

    /// Error category for grouping ("spec", "audio", ...).
    fn category(&self) -> &'static str;

    /// Human-readable message.
    fn message(&self) -> String {
        self.to_string()
    }
}

impl CodedError for SpecError {
    fn code(&self) -> &'static str {
        match self {
            SpecError::NonFinite { .. } => "SPEC_001",
            SpecError::InvalidRange { .. } => "SPEC_002",
            SpecError::PointIndex { .. } => "SPEC_003",
            SpecError::JsonParse(_) => "SPEC_004",
            SpecError::Io(_) => "SPEC_005",
        }
    }

    fn category(&self) -> &'static str {
        "spec"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_helper() {
        let err = SpecError::non_finite("time", f64::NAN);
        assert!(err.to_string().contains("time"));
        assert_eq!(err.code(), "SPEC_001");
    }

    #[test]
    fn test_json_error_code() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = SpecError::from(parse_err);
        assert_eq!(err.code(), "SPEC_004");
        assert_eq!(err.category(), "spec");
    }
}
