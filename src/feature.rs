//! Fixed-dimension feature vectors and distances between them.
//!
//! [`FeatureVector`] is the unit handled by the spatial index and by density
//! clustering. Its dimension is a const generic, so vectors of different
//! lengths cannot be mixed in one index.

use std::ops::{Index, IndexMut};

use crate::error::{Result, TrajectoryError};

/// A fixed-length numeric tuple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector<const N: usize>([f64; N]);

impl<const N: usize> FeatureVector<N> {
    /// Wrap an array.
    #[must_use]
    pub const fn new(values: [f64; N]) -> Self {
        Self(values)
    }

    /// The all-zero vector.
    #[must_use]
    pub const fn zeros() -> Self {
        Self([0.0; N])
    }

    /// Number of components.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        N
    }

    /// Borrow the components.
    #[must_use]
    pub const fn as_array(&self) -> &[f64; N] {
        &self.0
    }

    /// Take the components.
    #[must_use]
    pub const fn into_array(self) -> [f64; N] {
        self.0
    }

    /// Iterate over components.
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    /// Squared Euclidean distance.
    #[must_use]
    pub fn distance_squared(&self, other: &Self) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum()
    }

    /// Euclidean distance.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Whether this vector lies in the box `center ± half_extent` (inclusive).
    #[must_use]
    pub fn within_box(&self, center: &Self, half_extent: &Self) -> bool {
        self.0
            .iter()
            .zip(center.0.iter().zip(half_extent.0.iter()))
            .all(|(v, (c, h))| *v >= c - h && *v <= c + h)
    }
}

impl<const N: usize> Default for FeatureVector<N> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const N: usize> From<[f64; N]> for FeatureVector<N> {
    fn from(values: [f64; N]) -> Self {
        Self(values)
    }
}

impl<const N: usize> From<FeatureVector<N>> for [f64; N] {
    fn from(vector: FeatureVector<N>) -> Self {
        vector.0
    }
}

impl<const N: usize> TryFrom<&[f64]> for FeatureVector<N> {
    type Error = TrajectoryError;

    fn try_from(values: &[f64]) -> Result<Self> {
        let array: [f64; N] = values
            .try_into()
            .map_err(|_| TrajectoryError::dimension_mismatch(N, values.len()))?;
        Ok(Self(array))
    }
}

impl<const N: usize> Index<usize> for FeatureVector<N> {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl<const N: usize> IndexMut<usize> for FeatureVector<N> {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.0[index]
    }
}

/// Batch compute pairwise distances for a set of feature vectors.
///
/// Returns a flattened upper triangular distance matrix: the distance
/// between `i` and `j` (`i < j`) sits at `i * n - i * (i + 1) / 2 + (j - i - 1)`.
#[must_use]
pub fn pairwise_distances<const N: usize>(vectors: &[FeatureVector<N>]) -> Vec<f64> {
    let n = vectors.len();
    let mut distances = Vec::with_capacity(n * n.saturating_sub(1) / 2);

    for i in 0..n {
        for j in (i + 1)..n {
            distances.push(vectors[i].distance(&vectors[j]));
        }
    }

    distances
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_self_distance_zero() {
        let v = FeatureVector::new([0.3, -1.2, 4.0]);
        assert_relative_eq!(v.distance(&v), 0.0);
    }

    #[test]
    fn test_distance_symmetry() {
        let a = FeatureVector::new([0.0, 0.0]);
        let b = FeatureVector::new([3.0, 4.0]);
        assert_relative_eq!(a.distance(&b), 5.0);
        assert_relative_eq!(b.distance(&a), 5.0);
        assert_relative_eq!(a.distance_squared(&b), 25.0);
    }

    #[test]
    fn test_within_box_inclusive() {
        let center = FeatureVector::new([0.0, 0.0]);
        let half = FeatureVector::new([1.5, 1.5]);
        assert!(FeatureVector::new([1.5, -1.5]).within_box(&center, &half));
        assert!(FeatureVector::new([1.0, 0.0]).within_box(&center, &half));
        assert!(!FeatureVector::new([1.6, 0.0]).within_box(&center, &half));
    }

    #[test]
    fn test_slice_conversion() {
        let ok: FeatureVector<3> = FeatureVector::try_from(&[1.0, 2.0, 3.0][..]).unwrap();
        assert_eq!(ok[2], 3.0);

        let err = FeatureVector::<3>::try_from(&[1.0, 2.0][..]).unwrap_err();
        assert_eq!(err, TrajectoryError::dimension_mismatch(3, 2));
    }

    #[test]
    fn test_pairwise_distances() {
        let vectors = vec![
            FeatureVector::new([0.0, 0.0]),
            FeatureVector::new([3.0, 4.0]),
            FeatureVector::new([0.0, 1.0]),
        ];

        let distances = pairwise_distances(&vectors);

        // 3 vectors -> 3 pairs
        assert_eq!(distances.len(), 3);
        assert_relative_eq!(distances[0], 5.0);
        assert_relative_eq!(distances[1], 1.0);
        assert_relative_eq!(distances[2], 18f64.sqrt());

        assert!(pairwise_distances::<2>(&[]).is_empty());
    }
}
