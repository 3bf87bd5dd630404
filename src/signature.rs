//! Distance-geometry shape signatures.
//!
//! A signature of depth `D` samples a trajectory at `D` scale levels. At
//! level `k` the path is cut into `k` equal pieces (by length, or by time in
//! [`SignatureMode::ByTime`]), the `k + 1` boundary points are interpolated,
//! and the distance between each consecutive pair is divided by
//! `total_length / k`. Concatenating the levels gives
//! `D * (D + 1) / 2` values.
//!
//! Because every distance is normalized by the path length, two trajectories
//! with the same shape but different size or speed produce near-identical
//! signatures. A straight line yields all ones.
//!
//! Trajectories with fewer than two points, or whose points all coincide,
//! have no defined shape and yield an all-zero signature.
//!
//! # Example
//!
//! ```
//! use chrono::DateTime;
//! use trajectory_kit::{Cartesian2D, DistanceGeometry, Trajectory, TrajectoryPoint};
//!
//! let t = |s| DateTime::from_timestamp(s, 0).unwrap();
//! let line = Trajectory::from_points(vec![
//!     TrajectoryPoint::<Cartesian2D>::new("A", t(0), [0.0, 0.0]),
//!     TrajectoryPoint::new("A", t(10), [10.0, 0.0]),
//! ])?;
//!
//! let signature = DistanceGeometry::with_depth(3)?.compute(&line);
//! assert_eq!(signature.len(), 6);
//! assert!(signature.iter().all(|v| (v - 1.0).abs() < 1e-12));
//! # Ok::<(), trajectory_kit::TrajectoryError>(())
//! ```

use crate::config::{SignatureConfig, SignatureMode};
use crate::error::{Result, TrajectoryError};
use crate::feature::FeatureVector;
use crate::math::{lerp_timestamp, measure, Domain};
use crate::point::TrajectoryPoint;
use crate::trajectory::Trajectory;

/// Length of a signature of the given depth.
///
/// Saturates at `usize::MAX / 2` for depths no configuration accepts.
#[must_use]
pub const fn signature_dimension(depth: usize) -> usize {
    depth.saturating_mul(depth.saturating_add(1)) / 2
}

/// Computes distance-geometry signatures with a fixed configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceGeometry {
    config: SignatureConfig,
}

impl DistanceGeometry {
    /// Create a signature computer.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid (depth 0).
    pub fn new(config: SignatureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a length-fraction signature computer of the given depth.
    ///
    /// # Errors
    ///
    /// Returns an error if `depth` is 0.
    pub fn with_depth(depth: usize) -> Result<Self> {
        Self::new(SignatureConfig::new(depth))
    }

    /// Number of scale levels.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.config.depth
    }

    /// Boundary point placement.
    #[must_use]
    pub const fn mode(&self) -> SignatureMode {
        self.config.mode
    }

    /// Length of the produced signature.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        signature_dimension(self.config.depth)
    }

    /// Compute the signature of `trajectory`.
    ///
    /// Values are ordered by level, then by segment within the level.
    #[must_use]
    pub fn compute<D: Domain>(&self, trajectory: &Trajectory<D>) -> Vec<f64> {
        let mut signature = vec![0.0; self.dimension()];
        if trajectory.len() < 2 {
            return signature;
        }

        let cumulative = trajectory.cumulative_lengths();
        let total = cumulative.last().copied().unwrap_or(0.0);
        if !total.is_finite() || total <= 0.0 {
            return signature;
        }

        let mut slot = 0;
        for level in 1..=self.config.depth {
            let boundaries: Vec<TrajectoryPoint<D>> = (0..=level)
                .filter_map(|j| {
                    let fraction = j as f64 / level as f64;
                    self.boundary_point(trajectory, &cumulative, total, fraction)
                })
                .collect();

            let scale = total / level as f64;
            for pair in boundaries.windows(2) {
                signature[slot] = measure::distance(&pair[0], &pair[1]) / scale;
                slot += 1;
            }
        }

        signature
    }

    /// Compute the signature as a fixed-size feature vector.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::DimensionMismatch`] if `N` is not the
    /// configured signature length.
    pub fn compute_fixed<D: Domain, const N: usize>(
        &self,
        trajectory: &Trajectory<D>,
    ) -> Result<FeatureVector<N>> {
        if N != self.dimension() {
            return Err(TrajectoryError::dimension_mismatch(self.dimension(), N));
        }
        FeatureVector::try_from(self.compute(trajectory).as_slice())
    }

    fn boundary_point<D: Domain>(
        &self,
        trajectory: &Trajectory<D>,
        cumulative: &[f64],
        total: f64,
        fraction: f64,
    ) -> Option<TrajectoryPoint<D>> {
        match self.config.mode {
            SignatureMode::ByDistance => trajectory.point_at_length(cumulative, fraction * total),
            SignatureMode::ByTime => {
                let start = trajectory.start_time()?;
                let end = trajectory.end_time()?;
                trajectory.point_at_time(lerp_timestamp(start, end, fraction))
            }
        }
    }
}
