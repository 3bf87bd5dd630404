//! R-tree spatial index over fixed-dimension feature vectors.
//!
//! [`SpatialIndex`] owns copies of the vectors it indexes. Each entry also
//! carries a caller-chosen handle (an arena index, a row number, a
//! [`TrajectoryHandle`](crate::TrajectoryHandle)) that the caller resolves
//! back to its own data. The index never borrows caller storage, so the
//! caller's collections may grow or move freely.
//!
//! Range queries are exact. Nearest-neighbor results are ordered by
//! ascending distance, with ties broken by ascending handle.
//!
//! # Example
//!
//! ```
//! use trajectory_kit::{FeatureVector, SpatialIndex};
//!
//! let mut index = SpatialIndex::<2>::new();
//! index.bulk_insert([
//!     (FeatureVector::new([0.0, 0.0]), 0),
//!     (FeatureVector::new([1.0, 0.0]), 1),
//!     (FeatureVector::new([5.0, 5.0]), 2),
//! ]);
//!
//! let nearest = index.k_nearest(&FeatureVector::new([0.9, 0.1]), 2, None);
//! assert_eq!(nearest.iter().map(|n| n.handle).collect::<Vec<_>>(), vec![1, 0]);
//!
//! let in_box = index.range_query(&FeatureVector::new([0.0, 0.0]), &FeatureVector::new([1.0, 1.0]));
//! assert_eq!(in_box.len(), 2);
//! ```

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::feature::FeatureVector;

/// A feature vector stored in the index with its caller handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexEntry<const N: usize, H> {
    vector: FeatureVector<N>,
    handle: H,
}

impl<const N: usize, H: Copy> IndexEntry<N, H> {
    /// The indexed vector.
    #[must_use]
    pub const fn vector(&self) -> &FeatureVector<N> {
        &self.vector
    }

    /// The caller handle.
    #[must_use]
    pub const fn handle(&self) -> H {
        self.handle
    }
}

impl<const N: usize, H> RTreeObject for IndexEntry<N, H> {
    type Envelope = AABB<[f64; N]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(*self.vector.as_array())
    }
}

impl<const N: usize, H> PointDistance for IndexEntry<N, H> {
    fn distance_2(&self, point: &[f64; N]) -> f64 {
        self.vector.distance_squared(&FeatureVector::new(*point))
    }
}

/// One nearest-neighbor result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<H> {
    /// Caller handle of the matching entry.
    pub handle: H,
    /// Euclidean distance from the query.
    pub distance: f64,
}

/// Nearest-neighbor and range index over `N`-dimensional feature vectors.
#[derive(Debug, Clone)]
pub struct SpatialIndex<const N: usize, H = usize> {
    tree: RTree<IndexEntry<N, H>>,
}

impl<const N: usize, H: Copy + Ord> Default for SpatialIndex<N, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize, H: Copy + Ord> SpatialIndex<N, H> {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Build an index from a complete set of entries in one pass.
    ///
    /// Bulk loading produces a better-balanced tree than repeated inserts.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (FeatureVector<N>, H)>,
    {
        let entries: Vec<IndexEntry<N, H>> = entries
            .into_iter()
            .map(|(vector, handle)| IndexEntry { vector, handle })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Add one entry.
    pub fn insert(&mut self, vector: FeatureVector<N>, handle: H) {
        self.tree.insert(IndexEntry { vector, handle });
    }

    /// Add many entries at once.
    ///
    /// The tree is rebuilt by bulk loading the existing and new entries
    /// together, which keeps query performance close to a fresh bulk load.
    pub fn bulk_insert<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (FeatureVector<N>, H)>,
    {
        let mut all: Vec<IndexEntry<N, H>> = self.tree.iter().copied().collect();
        all.extend(
            entries
                .into_iter()
                .map(|(vector, handle)| IndexEntry { vector, handle }),
        );
        self.tree = RTree::bulk_load(all);
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    /// Iterate over all entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry<N, H>> {
        self.tree.iter()
    }

    /// All entries inside the box `center ± half_extent`, bounds inclusive.
    ///
    /// Order is unspecified.
    #[must_use]
    pub fn range_query(
        &self,
        center: &FeatureVector<N>,
        half_extent: &FeatureVector<N>,
    ) -> Vec<&IndexEntry<N, H>> {
        let mut lower = *center.as_array();
        let mut upper = *center.as_array();
        for axis in 0..N {
            lower[axis] -= half_extent[axis];
            upper[axis] += half_extent[axis];
        }
        self.range_query_box(&FeatureVector::new(lower), &FeatureVector::new(upper))
    }

    /// All entries inside the box with the given corners, bounds inclusive.
    #[must_use]
    pub fn range_query_box(
        &self,
        lower: &FeatureVector<N>,
        upper: &FeatureVector<N>,
    ) -> Vec<&IndexEntry<N, H>> {
        let envelope = AABB::from_corners(*lower.as_array(), *upper.as_array());
        self.tree.locate_in_envelope(&envelope).collect()
    }

    /// All entries within Euclidean distance `radius` of `query`.
    #[must_use]
    pub fn within_distance(&self, query: &FeatureVector<N>, radius: f64) -> Vec<&IndexEntry<N, H>> {
        self.tree
            .locate_within_distance(*query.as_array(), radius * radius)
            .collect()
    }

    /// The `k` entries closest to `query`, nearest first.
    ///
    /// Entries at equal distance are ordered by ascending handle. When
    /// `exclude` is given, the entry with that handle is skipped, which lets
    /// an indexed vector query its neighbors without finding itself.
    #[must_use]
    pub fn k_nearest(
        &self,
        query: &FeatureVector<N>,
        k: usize,
        exclude: Option<H>,
    ) -> Vec<Neighbor<H>> {
        if k == 0 {
            return Vec::new();
        }

        // Collect the first k candidates plus every later entry tied with
        // the k-th, so the handle tie-break sees the whole tie group.
        let mut candidates: Vec<(f64, H)> = Vec::with_capacity(k + 1);
        let mut cutoff: Option<f64> = None;
        for (entry, distance_2) in self
            .tree
            .nearest_neighbor_iter_with_distance_2(query.as_array())
        {
            if exclude == Some(entry.handle) {
                continue;
            }
            if cutoff.is_some_and(|c| distance_2 > c) {
                break;
            }
            candidates.push((distance_2, entry.handle));
            if cutoff.is_none() && candidates.len() == k {
                cutoff = Some(distance_2);
            }
        }

        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        candidates.truncate(k);
        candidates
            .into_iter()
            .map(|(distance_2, handle)| Neighbor {
                handle,
                distance: distance_2.sqrt(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid_index() -> SpatialIndex<2> {
        // 5x5 grid, handle = row * 5 + col
        SpatialIndex::from_entries((0..25).map(|i| {
            let (row, col) = (i / 5, i % 5);
            (FeatureVector::new([col as f64, row as f64]), i)
        }))
    }

    fn handles<H: Copy>(entries: &[&IndexEntry<2, H>]) -> Vec<H> {
        entries.iter().map(|e| e.handle()).collect()
    }

    #[test]
    fn test_empty_index_queries() {
        let index = SpatialIndex::<3>::new();
        let q = FeatureVector::new([0.0, 0.0, 0.0]);
        assert!(index.is_empty());
        assert!(index.k_nearest(&q, 5, None).is_empty());
        assert!(index.range_query(&q, &FeatureVector::new([1.0, 1.0, 1.0])).is_empty());
        assert!(index.within_distance(&q, 10.0).is_empty());
    }

    #[test]
    fn test_range_query_inclusive() {
        let index = grid_index();
        let mut found = handles(&index.range_query(
            &FeatureVector::new([2.0, 2.0]),
            &FeatureVector::new([1.0, 1.0]),
        ));
        found.sort_unstable();
        assert_eq!(found, vec![6, 7, 8, 11, 12, 13, 16, 17, 18]);
    }

    #[test]
    fn test_range_query_box() {
        let index = grid_index();
        let mut found = handles(&index.range_query_box(
            &FeatureVector::new([0.0, 0.0]),
            &FeatureVector::new([1.0, 0.0]),
        ));
        found.sort_unstable();
        assert_eq!(found, vec![0, 1]);
    }

    #[test]
    fn test_k_nearest_ordering_and_ties() {
        let index = grid_index();
        // Query at the center of cell (2,2): its 4 axis neighbors tie at distance 1.
        let nearest = index.k_nearest(&FeatureVector::new([2.0, 2.0]), 3, None);
        assert_eq!(nearest.len(), 3);
        assert_eq!(nearest[0].handle, 12);
        assert_relative_eq!(nearest[0].distance, 0.0);
        // Tie group {7, 11, 13, 17}: lowest handles win.
        assert_eq!(nearest[1].handle, 7);
        assert_eq!(nearest[2].handle, 11);
        assert_relative_eq!(nearest[2].distance, 1.0);
    }

    #[test]
    fn test_k_nearest_excludes_self() {
        let index = grid_index();
        let nearest = index.k_nearest(&FeatureVector::new([0.0, 0.0]), 2, Some(0));
        assert_eq!(
            nearest.iter().map(|n| n.handle).collect::<Vec<_>>(),
            vec![1, 5]
        );
    }

    #[test]
    fn test_k_larger_than_index() {
        let index = grid_index();
        let all = index.k_nearest(&FeatureVector::new([10.0, 10.0]), 100, None);
        assert_eq!(all.len(), 25);
        assert_eq!(all[0].handle, 24);
        for pair in all.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn test_insert_then_bulk_insert() {
        let mut index = SpatialIndex::<2, u32>::new();
        index.insert(FeatureVector::new([0.0, 0.0]), 7);
        index.bulk_insert([
            (FeatureVector::new([1.0, 1.0]), 3),
            (FeatureVector::new([2.0, 2.0]), 9),
        ]);
        assert_eq!(index.len(), 3);

        let nearest = index.k_nearest(&FeatureVector::new([0.1, 0.1]), 1, None);
        assert_eq!(nearest[0].handle, 7);

        index.clear();
        assert!(index.is_empty());
    }

    #[test]
    fn test_within_distance() {
        let index = grid_index();
        let mut found = handles(&index.within_distance(&FeatureVector::new([0.0, 0.0]), 1.0));
        found.sort_unstable();
        assert_eq!(found, vec![0, 1, 5]);
    }
}
