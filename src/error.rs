//! Error types for trajectory assembly, signatures, and clustering.
//!
//! Only configuration mistakes and malformed hand-built trajectories are
//! reported as errors. Degenerate inputs (empty clustering input, trajectories
//! too short for a signature, empty index queries) resolve to empty or
//! zero-filled results instead.

use thiserror::Error;

/// Main error type for trajectory operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrajectoryError {
    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input validation errors.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A fixed-size output did not match the configured dimension.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A point was added to a trajectory belonging to another object.
    #[error("Object id mismatch: trajectory is '{expected}', point is '{actual}'")]
    ObjectIdMismatch { expected: String, actual: String },

    /// Timestamps decrease somewhere in a trajectory.
    #[error("Timestamps must be non-decreasing at index {index}")]
    NonMonotonicTimestamps { index: usize },
}

/// Result type alias for trajectory operations.
pub type Result<T> = std::result::Result<T, TrajectoryError>;

impl TrajectoryError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a dimension mismatch error.
    #[must_use]
    pub const fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create an object id mismatch error.
    #[must_use]
    pub fn object_id_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::ObjectIdMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a non-monotonic timestamp error.
    #[must_use]
    pub const fn non_monotonic(index: usize) -> Self {
        Self::NonMonotonicTimestamps { index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrajectoryError::dimension_mismatch(10, 6);
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains('6'));

        let err = TrajectoryError::object_id_mismatch("A", "B");
        assert!(err.to_string().contains("'A'"));
        assert!(err.to_string().contains("'B'"));
    }

    #[test]
    fn test_error_constructors() {
        assert_eq!(
            TrajectoryError::invalid_config("depth"),
            TrajectoryError::InvalidConfig("depth".to_string())
        );
        assert_eq!(
            TrajectoryError::non_monotonic(3),
            TrajectoryError::NonMonotonicTimestamps { index: 3 }
        );
        let _ = TrajectoryError::invalid_input("empty");
    }
}
