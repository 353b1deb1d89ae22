//! Error types for the synthesis engine.

use isotone_spec::{CodedError, SpecError};
use thiserror::Error;

/// Result type for engine operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur while rendering audio.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Invalid sample rate.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate.
        rate: u32,
    },

    /// Invalid duration.
    #[error("invalid duration: {duration} seconds")]
    InvalidDuration {
        /// The invalid duration.
        duration: f64,
    },

    /// Invalid frequency.
    #[error("invalid frequency: {freq} Hz")]
    InvalidFrequency {
        /// The invalid frequency.
        freq: f64,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Preset model error.
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AudioError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl CodedError for AudioError {
    fn code(&self) -> &'static str {
        match self {
            AudioError::InvalidSampleRate { .. } => "AUDIO_001",
            AudioError::InvalidDuration { .. } => "AUDIO_002",
            AudioError::InvalidFrequency { .. } => "AUDIO_003",
            AudioError::InvalidParameter { .. } => "AUDIO_004",
            AudioError::Spec(inner) => inner.code(),
            AudioError::Io(_) => "AUDIO_005",
        }
    }

    fn category(&self) -> &'static str {
        match self {
            AudioError::Spec(inner) => inner.category(),
            _ => "audio",
        }
    }
}

/// Rejects frequencies that are zero, negative or non-finite.
pub(crate) fn check_frequency(freq: f64) -> AudioResult<f64> {
    if freq.is_finite() && freq > 0.0 {
        Ok(freq)
    } else {
        Err(AudioError::InvalidFrequency { freq })
    }
}

/// Rejects a zero sample rate.
pub(crate) fn check_sample_rate(rate: u32) -> AudioResult<u32> {
    if rate == 0 {
        Err(AudioError::InvalidSampleRate { rate })
    } else {
        Ok(rate)
    }
}

/// Rejects NaN and infinite durations. Non-positive durations are valid and
/// produce empty buffers.
pub(crate) fn check_duration(duration: f64) -> AudioResult<f64> {
    if duration.is_finite() {
        Ok(duration)
    } else {
        Err(AudioError::InvalidDuration { duration })
    }
}

/// Rejects a fraction outside `[0, 1]`.
pub(crate) fn check_unit(name: &str, value: f64) -> AudioResult<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(AudioError::invalid_param(
            name,
            format!("must be between 0 and 1, got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_param_helper() {
        let err = AudioError::invalid_param("duty_cycle", "must be between 0 and 1");
        assert!(err.to_string().contains("duty_cycle"));
        assert_eq!(err.code(), "AUDIO_004");
    }

    #[test]
    fn test_spec_error_keeps_its_code() {
        let err = AudioError::from(SpecError::non_finite("time", f64::NAN));
        assert_eq!(err.code(), "SPEC_001");
        assert_eq!(err.category(), "spec");
    }

    #[test]
    fn test_guards() {
        assert!(check_frequency(10.0).is_ok());
        assert!(check_frequency(0.0).is_err());
        assert!(check_frequency(-3.0).is_err());
        assert!(check_frequency(f64::NAN).is_err());
        assert!(check_sample_rate(0).is_err());
        assert!(check_duration(-1.0).is_ok());
        assert!(check_duration(f64::INFINITY).is_err());
        assert!(check_unit("duty", 1.0).is_ok());
        assert!(check_unit("duty", 1.5).is_err());
        assert!(check_unit("duty", f64::NAN).is_err());
    }
}
