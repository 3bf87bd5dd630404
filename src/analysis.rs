//! End-to-end analysis over a trajectory arena.
//!
//! These functions connect the pieces: every trajectory in a
//! [`TrajectoryArena`] is reduced to its distance-geometry signature, and the
//! signatures are indexed or clustered under the trajectory's
//! [`TrajectoryHandle`]. Callers resolve handles back through the arena.

use log::debug;

use crate::clustering::{ClusterResult, Dbscan};
use crate::error::Result;
use crate::feature::FeatureVector;
use crate::index::SpatialIndex;
use crate::math::Domain;
use crate::signature::DistanceGeometry;
use crate::trajectory::{TrajectoryArena, TrajectoryHandle};

/// Signature of every trajectory in the arena, in handle order.
///
/// # Errors
///
/// Returns [`TrajectoryError::DimensionMismatch`](crate::TrajectoryError::DimensionMismatch)
/// if `N` is not the signature length for the configured depth.
pub fn signatures<D: Domain, const N: usize>(
    arena: &TrajectoryArena<D>,
    signature: &DistanceGeometry,
) -> Result<Vec<(TrajectoryHandle, FeatureVector<N>)>> {
    arena
        .iter()
        .map(|(handle, trajectory)| Ok((handle, signature.compute_fixed(trajectory)?)))
        .collect()
}

/// Index every trajectory in the arena by its signature.
///
/// Useful for "find trajectories shaped like this one" queries via
/// [`SpatialIndex::k_nearest`].
///
/// # Errors
///
/// Returns an error if `N` does not match the signature length.
pub fn build_signature_index<D: Domain, const N: usize>(
    arena: &TrajectoryArena<D>,
    signature: &DistanceGeometry,
) -> Result<SpatialIndex<N, TrajectoryHandle>> {
    let entries = signatures::<D, N>(arena, signature)?;
    debug!("indexing {} trajectory signatures", entries.len());
    Ok(SpatialIndex::from_entries(
        entries.into_iter().map(|(handle, vector)| (vector, handle)),
    ))
}

/// Cluster the arena's trajectories by shape.
///
/// Trajectories are visited in handle order, so labels are deterministic for
/// a given arena.
///
/// # Errors
///
/// Returns an error if `N` does not match the signature length.
pub fn cluster_trajectories<D: Domain, const N: usize>(
    arena: &TrajectoryArena<D>,
    signature: &DistanceGeometry,
    dbscan: &Dbscan<N>,
) -> Result<ClusterResult<TrajectoryHandle>> {
    let entries = signatures::<D, N>(arena, signature)?;
    Ok(dbscan.cluster_with_ids(&entries))
}
