//! Density-based clustering (DBSCAN) over an epsilon box.
//!
//! Neighborhoods are axis-aligned boxes (`center ± epsilon` per dimension)
//! found through [`SpatialIndex`] range queries. A neighborhood includes the
//! point itself.
//!
//! Entries are visited in ascending input order and neighbors are expanded
//! breadth-first in ascending order, so the same input always produces the
//! same labels. A border point reachable from two clusters joins whichever
//! cluster's expansion reaches it first.
//!
//! # Example
//!
//! ```
//! use trajectory_kit::{Dbscan, DbscanConfig, FeatureVector};
//!
//! let vectors = [
//!     FeatureVector::new([0.0, 0.0]),
//!     FeatureVector::new([0.0, 1.0]),
//!     FeatureVector::new([1.0, 0.0]),
//!     FeatureVector::new([5.0, 5.0]),
//! ];
//! let result = Dbscan::new(DbscanConfig::new([1.5, 1.5], 3))?.cluster(&vectors);
//!
//! assert_eq!(result.cluster_count(), 1);
//! assert_eq!(result.membership()[&1], vec![0, 1, 2]);
//! assert_eq!(result.noise(), vec![3]);
//! # Ok::<(), trajectory_kit::TrajectoryError>(())
//! ```

use std::collections::{BTreeMap, VecDeque};

use log::{info, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::DbscanConfig;
use crate::error::Result;
use crate::feature::FeatureVector;
use crate::index::SpatialIndex;

/// Cluster id given to entries that belong to no cluster.
pub const NOISE: usize = 0;

/// Cluster assignment of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusterLabel<H> {
    /// Caller identity of the entry.
    pub id: H,
    /// Cluster id, or [`NOISE`].
    pub cluster: usize,
}

/// Labels for every clustered entry, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusterResult<H> {
    labels: Vec<ClusterLabel<H>>,
    cluster_count: usize,
}

impl<H: Clone + PartialEq> ClusterResult<H> {
    /// Labels in input order.
    #[must_use]
    pub fn labels(&self) -> &[ClusterLabel<H>] {
        &self.labels
    }

    /// Take the labels.
    #[must_use]
    pub fn into_labels(self) -> Vec<ClusterLabel<H>> {
        self.labels
    }

    /// Number of clusters found; ids run from 1 to this value.
    #[must_use]
    pub const fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Number of labelled entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether nothing was clustered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Cluster id of the entry with identity `id`.
    #[must_use]
    pub fn label_of(&self, id: &H) -> Option<usize> {
        self.labels
            .iter()
            .find(|label| &label.id == id)
            .map(|label| label.cluster)
    }

    /// Cluster id to member identities, noise excluded.
    ///
    /// Members keep input order.
    #[must_use]
    pub fn membership(&self) -> BTreeMap<usize, Vec<H>> {
        let mut members: BTreeMap<usize, Vec<H>> = BTreeMap::new();
        for label in self.labels.iter().filter(|l| l.cluster != NOISE) {
            members.entry(label.cluster).or_default().push(label.id.clone());
        }
        members
    }

    /// Identities of noise entries, in input order.
    #[must_use]
    pub fn noise(&self) -> Vec<H> {
        self.labels
            .iter()
            .filter(|l| l.cluster == NOISE)
            .map(|l| l.id.clone())
            .collect()
    }
}

/// Per-entry state for one clustering run.
#[derive(Debug, Clone, Copy, Default)]
struct EntryState {
    visited: bool,
    /// Pushed onto a frontier at some point; each entry is pushed at most once.
    queued: bool,
    label: usize,
}

/// DBSCAN clusterer for `N`-dimensional feature vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dbscan<const N: usize> {
    config: DbscanConfig<N>,
}

impl<const N: usize> Dbscan<N> {
    /// Create a clusterer.
    ///
    /// # Errors
    ///
    /// Returns an error if the epsilon box or `min_points` is invalid.
    pub fn new(config: DbscanConfig<N>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    #[must_use]
    pub const fn config(&self) -> &DbscanConfig<N> {
        &self.config
    }

    /// Cluster vectors; identities are input positions.
    #[must_use]
    pub fn cluster(&self, vectors: &[FeatureVector<N>]) -> ClusterResult<usize> {
        let (labels, cluster_count) = self.assign_labels(vectors);
        ClusterResult {
            labels: labels
                .into_iter()
                .enumerate()
                .map(|(id, cluster)| ClusterLabel { id, cluster })
                .collect(),
            cluster_count,
        }
    }

    /// Cluster `(identity, vector)` pairs, labelling results by identity.
    ///
    /// Visitation order is the slice order.
    #[must_use]
    pub fn cluster_with_ids<H: Clone>(&self, items: &[(H, FeatureVector<N>)]) -> ClusterResult<H> {
        let vectors: Vec<FeatureVector<N>> = items.iter().map(|(_, v)| *v).collect();
        let (labels, cluster_count) = self.assign_labels(&vectors);
        ClusterResult {
            labels: items
                .iter()
                .zip(labels)
                .map(|((id, _), cluster)| ClusterLabel {
                    id: id.clone(),
                    cluster,
                })
                .collect(),
            cluster_count,
        }
    }

    fn assign_labels(&self, vectors: &[FeatureVector<N>]) -> (Vec<usize>, usize) {
        if vectors.is_empty() {
            return (Vec::new(), 0);
        }

        let index: SpatialIndex<N, usize> =
            SpatialIndex::from_entries(vectors.iter().copied().enumerate().map(|(i, v)| (v, i)));
        let half_extent = FeatureVector::new(self.config.epsilon);
        let min_points = self.config.min_points;

        let neighbors = |i: usize| -> Vec<usize> {
            let mut found: Vec<usize> = index
                .range_query(&vectors[i], &half_extent)
                .into_iter()
                .map(|entry| entry.handle())
                .collect();
            found.sort_unstable();
            found
        };

        let mut state = vec![EntryState::default(); vectors.len()];
        let mut cluster_id = NOISE;

        for seed in 0..vectors.len() {
            if state[seed].visited {
                continue;
            }
            state[seed].visited = true;

            let seed_neighbors = neighbors(seed);
            if seed_neighbors.len() < min_points {
                trace!(
                    "entry {seed} has {} neighbors, below {min_points}",
                    seed_neighbors.len()
                );
                continue;
            }

            cluster_id += 1;
            state[seed].label = cluster_id;
            let mut frontier = VecDeque::with_capacity(seed_neighbors.len());
            for n in seed_neighbors {
                if !state[n].queued {
                    state[n].queued = true;
                    frontier.push_back(n);
                }
            }

            while let Some(current) = frontier.pop_front() {
                if !state[current].visited {
                    state[current].visited = true;
                    let reachable = neighbors(current);
                    if reachable.len() >= min_points {
                        for n in reachable {
                            let entry = &mut state[n];
                            if !entry.queued && (!entry.visited || entry.label == NOISE) {
                                entry.queued = true;
                                frontier.push_back(n);
                            }
                        }
                    }
                }
                if state[current].label == NOISE {
                    state[current].label = cluster_id;
                }
            }
            trace!("cluster {cluster_id} expanded from entry {seed}");
        }

        let noise = state.iter().filter(|s| s.label == NOISE).count();
        info!(
            "DBSCAN labelled {} entries: {cluster_id} clusters, {noise} noise",
            vectors.len()
        );

        (state.into_iter().map(|s| s.label).collect(), cluster_id)
    }
}
