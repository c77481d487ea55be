use thiserror::Error;

/// Errors raised by the numeric stages of the pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    /// A rate needs at least one interval, i.e. two peaks.
    #[error("insufficient peaks: found {found}, need at least 2 to estimate a rate")]
    InsufficientPeaks { found: usize },
    #[error("length mismatch: expected {expected} values, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("spectral transform failed: {0}")]
    Transform(String),
}

impl SignalError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SignalError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SignalError>;

/// Reject non-finite or non-positive values.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SignalError::invalid(
            name,
            format!("must be a finite value > 0, got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_check_rejects_zero_nan_and_negative() {
        assert!(ensure_positive("fs", 250.0).is_ok());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                ensure_positive("fs", bad),
                Err(SignalError::InvalidParameter { name: "fs", .. })
            ));
        }
    }

    #[test]
    fn insufficient_peaks_message_names_count() {
        let err = SignalError::InsufficientPeaks { found: 1 };
        assert!(err.to_string().contains("found 1"));
    }
}
