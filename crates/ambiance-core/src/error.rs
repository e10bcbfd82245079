//! Error types shared by sources, effects, and processors.

use thiserror::Error;

/// Errors raised while validating render inputs or constructing DSP components.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DspError {
    /// Render duration was zero, negative, or not finite.
    #[error("invalid duration {0}: must be a positive number of seconds")]
    InvalidDuration(f64),

    /// Sample rate was zero.
    #[error("invalid sample rate {0}: must be positive")]
    InvalidSampleRate(u32),

    /// A required constructor parameter was not supplied.
    #[error("missing required parameter '{param}' for '{owner}'")]
    MissingParameter {
        /// Component being constructed.
        owner: String,
        /// Name of the missing parameter.
        param: String,
    },

    /// A parameter was supplied that the component does not understand.
    #[error("unknown parameter '{param}' for '{owner}'")]
    UnknownParameter {
        /// Component being constructed.
        owner: String,
        /// Name of the unrecognized parameter.
        param: String,
    },

    /// A parameter was supplied with an unusable value.
    #[error("invalid parameter '{param}' for '{owner}': {reason}")]
    InvalidParameter {
        /// Component being constructed.
        owner: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of why the value was rejected.
        reason: String,
    },
}

impl DspError {
    /// Create an invalid parameter error.
    pub fn invalid(owner: impl Into<String>, param: impl Into<String>, reason: impl Into<String>) -> Self {
        DspError::InvalidParameter {
            owner: owner.into(),
            param: param.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for DSP operations.
pub type DspResult<T> = Result<T, DspError>;

/// Reject non-positive or non-finite durations.
pub fn validate_duration(duration: f64) -> DspResult<f64> {
    if duration.is_finite() && duration > 0.0 {
        Ok(duration)
    } else {
        Err(DspError::InvalidDuration(duration))
    }
}

/// Reject a zero sample rate.
pub fn validate_sample_rate(sample_rate: u32) -> DspResult<u32> {
    if sample_rate == 0 {
        Err(DspError::InvalidSampleRate(sample_rate))
    } else {
        Ok(sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_validation() {
        assert_eq!(validate_duration(1.5), Ok(1.5));
        assert_eq!(validate_duration(0.0), Err(DspError::InvalidDuration(0.0)));
        assert!(validate_duration(-2.0).is_err());
        assert!(validate_duration(f64::NAN).is_err());
        assert!(validate_duration(f64::INFINITY).is_err());
    }

    #[test]
    fn sample_rate_validation() {
        assert_eq!(validate_sample_rate(48000), Ok(48000));
        assert_eq!(validate_sample_rate(0), Err(DspError::InvalidSampleRate(0)));
    }

    #[test]
    fn invalid_parameter_display() {
        let err = DspError::invalid("gain", "gain_db", "not a number");
        assert_eq!(
            err.to_string(),
            "invalid parameter 'gain_db' for 'gain': not a number"
        );
    }

    #[test]
    fn unknown_parameter_display() {
        let err = DspError::UnknownParameter {
            owner: "sine".to_string(),
            param: "colour".to_string(),
        };
        assert_eq!(err.to_string(), "unknown parameter 'colour' for 'sine'");
    }
}
