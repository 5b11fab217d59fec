//! Error types for ring weight estimation.
//!
//! Every check runs before the first filter pass, so a call that returns
//! an error has not written to its output.

use thiserror::Error;

/// Errors that can occur while estimating ring weights
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RingError {
    /// A grid extent is zero, or a weights buffer does not match the residual shape
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    /// Invalid scalar parameter
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for ring weight operations
pub type RingResult<T> = Result<T, RingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = RingError::InvalidDimension("angles extent must be at least 1".into());
        assert_eq!(err.to_string(), "invalid dimension: angles extent must be at least 1");
        let err = RingError::InvalidParameter("threshold".into());
        assert!(err.to_string().starts_with("invalid parameter"));
    }
}
