//! Trajectory invariant checks.
//!
//! The assembler only ever produces trajectories that satisfy these checks.
//! They are exposed for trajectories built by hand or received from elsewhere.

use crate::config::AssemblerConfig;
use crate::error::{Result, TrajectoryError};
use crate::math::{measure, Domain};
use crate::point::TrajectoryPoint;
use crate::trajectory::Trajectory;

/// Check that every point belongs to `object_id` and timestamps never decrease.
///
/// # Errors
///
/// Returns the first [`TrajectoryError::ObjectIdMismatch`] or
/// [`TrajectoryError::NonMonotonicTimestamps`] found.
pub fn check_points<D: Domain>(object_id: &str, points: &[TrajectoryPoint<D>]) -> Result<()> {
    for (index, point) in points.iter().enumerate() {
        if point.object_id() != object_id {
            return Err(TrajectoryError::object_id_mismatch(
                object_id,
                point.object_id(),
            ));
        }
        if index > 0 && point.timestamp() < points[index - 1].timestamp() {
            return Err(TrajectoryError::non_monotonic(index));
        }
    }
    Ok(())
}

/// Check a trajectory against the invariants assembly guarantees.
///
/// Beyond [`check_points`], every adjacent pair must be closer than
/// `separation_distance` and `separation_time`.
///
/// # Errors
///
/// Returns an error describing the first violated invariant.
pub fn validate_trajectory<D: Domain>(
    trajectory: &Trajectory<D>,
    config: &AssemblerConfig,
) -> Result<()> {
    check_points(trajectory.object_id(), trajectory.points())?;

    for (index, pair) in trajectory.points().windows(2).enumerate() {
        let gap = measure::distance(&pair[0], &pair[1]);
        if gap >= config.separation_distance {
            return Err(TrajectoryError::invalid_input(format!(
                "points {index} and {} are {gap} apart, separation distance is {}",
                index + 1,
                config.separation_distance
            )));
        }
        let elapsed = pair[1].timestamp() - pair[0].timestamp();
        if elapsed >= config.separation_time {
            return Err(TrajectoryError::invalid_input(format!(
                "points {index} and {} are {}s apart, separation time is {}s",
                index + 1,
                elapsed.num_seconds(),
                config.separation_time.num_seconds()
            )));
        }
    }
    Ok(())
}
