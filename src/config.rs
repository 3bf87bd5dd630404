//! Configuration for assembly, signatures, and clustering.
//!
//! Every tunable parameter lives in one of three plain value types:
//!
//! - [`AssemblerConfig`]: separation thresholds and cleanup cadence
//! - [`SignatureConfig`]: distance-geometry depth and sampling mode
//! - [`DbscanConfig`]: epsilon box and minimum neighborhood size
//!
//! Each has a `validate()` that the consuming constructor calls, so bad
//! values are rejected before any points are processed.
//!
//! # Example
//!
//! ```
//! use chrono::Duration;
//! use trajectory_kit::AssemblerConfig;
//!
//! let config = AssemblerConfig::default()
//!     .with_separation_distance(1.0)
//!     .with_separation_time(Duration::minutes(20))
//!     .with_minimum_trajectory_length(5);
//! assert!(config.validate().is_ok());
//! ```

use chrono::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrajectoryError};

/// Parameters for the trajectory assembler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblerConfig {
    /// Consecutive points at least this far apart (domain distance units)
    /// start a new trajectory.
    pub separation_distance: f64,

    /// Consecutive points at least this far apart in time start a new
    /// trajectory.
    pub separation_time: Duration,

    /// Finished trajectories with fewer points are discarded.
    pub minimum_trajectory_length: usize,

    /// Number of points between sweeps for stale in-progress trajectories.
    pub cleanup_interval: usize,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            separation_distance: 100.0,
            separation_time: Duration::minutes(20),
            minimum_trajectory_length: 2,
            cleanup_interval: 10_000,
        }
    }
}

impl AssemblerConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if !self.separation_distance.is_finite() || self.separation_distance <= 0.0 {
            return Err(TrajectoryError::invalid_config(
                "separation_distance must be finite and positive",
            ));
        }
        if self.separation_time <= Duration::zero() {
            return Err(TrajectoryError::invalid_config(
                "separation_time must be positive",
            ));
        }
        if self.cleanup_interval == 0 {
            return Err(TrajectoryError::invalid_config(
                "cleanup_interval must be at least 1",
            ));
        }
        Ok(())
    }

    /// Set the separation distance.
    #[must_use]
    pub const fn with_separation_distance(mut self, distance: f64) -> Self {
        self.separation_distance = distance;
        self
    }

    /// Set the separation time.
    #[must_use]
    pub const fn with_separation_time(mut self, time: Duration) -> Self {
        self.separation_time = time;
        self
    }

    /// Set the minimum trajectory length in points.
    #[must_use]
    pub const fn with_minimum_trajectory_length(mut self, points: usize) -> Self {
        self.minimum_trajectory_length = points;
        self
    }

    /// Set the cleanup interval in points.
    #[must_use]
    pub const fn with_cleanup_interval(mut self, points: usize) -> Self {
        self.cleanup_interval = points;
        self
    }
}

/// How distance-geometry boundary points are placed along a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SignatureMode {
    /// Equal fractions of cumulative path length.
    #[default]
    ByDistance,
    /// Equal fractions of elapsed time.
    /// Sensitive to speed changes along the path, unlike `ByDistance`.
    ByTime,
}

/// Largest accepted signature depth (2080 values).
pub const MAX_SIGNATURE_DEPTH: usize = 64;

/// Parameters for the distance-geometry signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SignatureConfig {
    /// Number of scale levels. The signature has `depth * (depth + 1) / 2` values.
    pub depth: usize,

    /// Boundary point placement.
    pub mode: SignatureMode,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            depth: 4,
            mode: SignatureMode::ByDistance,
        }
    }
}

impl SignatureConfig {
    /// Configuration with the given depth and length-fraction sampling.
    #[must_use]
    pub const fn new(depth: usize) -> Self {
        Self {
            depth,
            mode: SignatureMode::ByDistance,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `depth` is zero or above [`MAX_SIGNATURE_DEPTH`].
    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 {
            return Err(TrajectoryError::invalid_config("depth must be at least 1"));
        }
        if self.depth > MAX_SIGNATURE_DEPTH {
            return Err(TrajectoryError::invalid_config(format!(
                "depth must be at most {MAX_SIGNATURE_DEPTH}, got {}",
                self.depth
            )));
        }
        Ok(())
    }

    /// Set the sampling mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: SignatureMode) -> Self {
        self.mode = mode;
        self
    }

    /// Length of the signature this configuration produces.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        crate::signature::signature_dimension(self.depth)
    }
}

/// Parameters for density clustering over `N`-dimensional feature vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DbscanConfig<const N: usize> {
    /// Per-dimension half-extent of the neighborhood box.
    pub epsilon: [f64; N],

    /// Neighbors (including the point itself) required for a core point.
    pub min_points: usize,
}

impl<const N: usize> DbscanConfig<N> {
    /// Configuration with an explicit epsilon box.
    #[must_use]
    pub const fn new(epsilon: [f64; N], min_points: usize) -> Self {
        Self {
            epsilon,
            min_points,
        }
    }

    /// Configuration with the same half-extent in every dimension.
    #[must_use]
    pub const fn uniform(epsilon: f64, min_points: usize) -> Self {
        Self::new([epsilon; N], min_points)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero-dimensional box, a non-positive or
    /// non-finite half-extent, or `min_points == 0`.
    pub fn validate(&self) -> Result<()> {
        if N == 0 {
            return Err(TrajectoryError::invalid_config(
                "feature vectors must have at least one dimension",
            ));
        }
        if let Some(axis) = self
            .epsilon
            .iter()
            .position(|e| !e.is_finite() || *e <= 0.0)
        {
            return Err(TrajectoryError::invalid_config(format!(
                "epsilon half-extent on axis {axis} must be finite and positive"
            )));
        }
        if self.min_points == 0 {
            return Err(TrajectoryError::invalid_config(
                "min_points must be at least 1",
            ));
        }
        Ok(())
    }

    /// Set the minimum neighborhood size.
    #[must_use]
    pub const fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }
}
