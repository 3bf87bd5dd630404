//! Trajectories and the arena that hands out stable handles to them.
//!
//! A [`Trajectory`] is an object id plus its points in non-decreasing time
//! order. The assembler builds them incrementally; once handed to a consumer
//! they are not mutated again.
//!
//! [`TrajectoryArena`] owns a collection of trajectories and addresses them
//! by [`TrajectoryHandle`]. Indexes, cluster results, and other auxiliary
//! structures store handles and look trajectories up in the arena.

use std::fmt;
use std::ops::Index;

use chrono::{DateTime, Duration, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrajectoryError};
use crate::math::{elapsed_seconds, measure, Domain};
use crate::point::{PropertyMap, PropertyValue, TrajectoryPoint};
use crate::validation::check_points;

/// Ordered, timestamped positions of one moving object.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory<D: Domain> {
    object_id: String,
    points: Vec<TrajectoryPoint<D>>,
    properties: PropertyMap,
}

impl<D: Domain> Trajectory<D> {
    /// Create an empty trajectory for `object_id`.
    pub fn new(object_id: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            points: Vec::new(),
            properties: PropertyMap::new(),
        }
    }

    /// Build a trajectory from points, taking the object id from the first.
    ///
    /// # Errors
    ///
    /// Returns an error if `points` is empty, mixes object ids, or has
    /// decreasing timestamps.
    pub fn from_points(points: Vec<TrajectoryPoint<D>>) -> Result<Self> {
        let object_id = points
            .first()
            .map(|p| p.object_id().to_string())
            .ok_or_else(|| {
                TrajectoryError::invalid_input("cannot infer an object id from no points")
            })?;
        check_points(&object_id, &points)?;
        Ok(Self {
            object_id,
            points,
            properties: PropertyMap::new(),
        })
    }

    /// Start a trajectory from its first point.
    pub(crate) fn starting_with(point: TrajectoryPoint<D>) -> Self {
        Self {
            object_id: point.object_id().to_string(),
            points: vec![point],
            properties: PropertyMap::new(),
        }
    }

    /// Append a point.
    ///
    /// # Errors
    ///
    /// Returns an error if the point belongs to another object or is older
    /// than the current last point.
    pub fn push(&mut self, point: TrajectoryPoint<D>) -> Result<()> {
        if point.object_id() != self.object_id {
            return Err(TrajectoryError::object_id_mismatch(
                &self.object_id,
                point.object_id(),
            ));
        }
        if let Some(last) = self.points.last() {
            if point.timestamp() < last.timestamp() {
                return Err(TrajectoryError::non_monotonic(self.points.len()));
            }
        }
        self.points.push(point);
        Ok(())
    }

    /// Append a point the caller has already checked.
    pub(crate) fn push_unchecked(&mut self, point: TrajectoryPoint<D>) {
        debug_assert_eq!(point.object_id(), self.object_id);
        debug_assert!(self
            .points
            .last()
            .map_or(true, |last| last.timestamp() <= point.timestamp()));
        self.points.push(point);
    }

    /// Identifier of the moving object.
    #[must_use]
    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    /// Points in time order.
    #[must_use]
    pub fn points(&self) -> &[TrajectoryPoint<D>] {
        &self.points
    }

    /// Iterate over the points.
    pub fn iter(&self) -> std::slice::Iter<'_, TrajectoryPoint<D>> {
        self.points.iter()
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the trajectory has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point.
    #[must_use]
    pub fn first(&self) -> Option<&TrajectoryPoint<D>> {
        self.points.first()
    }

    /// Most recent point.
    #[must_use]
    pub fn last(&self) -> Option<&TrajectoryPoint<D>> {
        self.points.last()
    }

    /// Timestamp of the first point.
    #[must_use]
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.first().map(TrajectoryPoint::timestamp)
    }

    /// Timestamp of the last point.
    #[must_use]
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.last().map(TrajectoryPoint::timestamp)
    }

    /// Time between first and last point (zero when empty).
    #[must_use]
    pub fn duration(&self) -> Duration {
        match (self.start_time(), self.end_time()) {
            (Some(start), Some(end)) => end - start,
            _ => Duration::zero(),
        }
    }

    /// Trajectory-level properties.
    #[must_use]
    pub const fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// A trajectory-level property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Set a trajectory-level property.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Cumulative path length at each point; the first entry is zero.
    #[must_use]
    pub fn cumulative_lengths(&self) -> Vec<f64> {
        let mut cumulative = Vec::with_capacity(self.points.len());
        let mut total = 0.0;
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                total += measure::distance(&self.points[i - 1], point);
            }
            cumulative.push(total);
        }
        cumulative
    }

    /// Total path length in domain distance units.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| measure::distance(&pair[0], &pair[1]))
            .sum()
    }

    /// Distance from the first to the last point.
    #[must_use]
    pub fn end_to_end_distance(&self) -> f64 {
        match (self.first(), self.last()) {
            (Some(a), Some(b)) => measure::distance(a, b),
            _ => 0.0,
        }
    }

    /// The point a given fraction of the way along the path.
    ///
    /// `fraction` is clamped to `[0, 1]`. Returns `None` for an empty trajectory.
    #[must_use]
    pub fn point_at_length_fraction(&self, fraction: f64) -> Option<TrajectoryPoint<D>> {
        let cumulative = self.cumulative_lengths();
        let total = cumulative.last().copied()?;
        self.point_at_length(&cumulative, fraction.clamp(0.0, 1.0) * total)
    }

    /// The point at `target` distance along the path, given precomputed
    /// [`cumulative_lengths`](Self::cumulative_lengths).
    pub(crate) fn point_at_length(
        &self,
        cumulative: &[f64],
        target: f64,
    ) -> Option<TrajectoryPoint<D>> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        let total = cumulative.last().copied().unwrap_or(0.0);

        if self.points.len() == 1 || total <= 0.0 || target <= 0.0 {
            return Some(first.clone());
        }
        if target >= total {
            return Some(last.clone());
        }

        let idx = cumulative.partition_point(|&c| c <= target);
        let (a, b) = (&self.points[idx - 1], &self.points[idx]);
        let segment = cumulative[idx] - cumulative[idx - 1];
        Some(measure::interpolate(
            a,
            b,
            (target - cumulative[idx - 1]) / segment,
        ))
    }

    /// The interpolated position at `when`, clamped to the trajectory's time span.
    ///
    /// Returns `None` for an empty trajectory.
    #[must_use]
    pub fn point_at_time(&self, when: DateTime<Utc>) -> Option<TrajectoryPoint<D>> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        if when <= first.timestamp() {
            return Some(first.clone());
        }
        if when >= last.timestamp() {
            return Some(last.clone());
        }

        let idx = self.points.partition_point(|p| p.timestamp() <= when);
        let (a, b) = (&self.points[idx - 1], &self.points[idx]);
        let span = elapsed_seconds(a.timestamp(), b.timestamp());
        if span <= 0.0 {
            return Some(a.clone());
        }
        Some(measure::interpolate(
            a,
            b,
            elapsed_seconds(a.timestamp(), when) / span,
        ))
    }

    /// The part of the trajectory between `start` and `end` inclusive.
    ///
    /// Boundaries falling between two points are filled with interpolated
    /// points. A window outside the trajectory yields an empty trajectory
    /// with the same object id and properties.
    #[must_use]
    pub fn subset_in_window(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let mut subset = Self {
            object_id: self.object_id.clone(),
            points: Vec::new(),
            properties: self.properties.clone(),
        };
        let (Some(first_time), Some(last_time)) = (self.start_time(), self.end_time()) else {
            return subset;
        };

        let lo = start.max(first_time);
        let hi = end.min(last_time);
        if lo > hi {
            return subset;
        }

        subset.points.extend(self.point_at_time(lo));
        subset.points.extend(
            self.points
                .iter()
                .filter(|p| p.timestamp() > lo && p.timestamp() < hi)
                .cloned(),
        );
        if hi > lo {
            subset.points.extend(self.point_at_time(hi));
        }
        subset
    }
}

impl<'a, D: Domain> IntoIterator for &'a Trajectory<D> {
    type Item = &'a TrajectoryPoint<D>;
    type IntoIter = std::slice::Iter<'a, TrajectoryPoint<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl<D: Domain> Index<usize> for Trajectory<D> {
    type Output = TrajectoryPoint<D>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

/// Stable reference to a trajectory stored in a [`TrajectoryArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrajectoryHandle(usize);

impl TrajectoryHandle {
    /// Position of the trajectory in its arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TrajectoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trajectory#{}", self.0)
    }
}

/// Append-only owner of trajectories addressed by [`TrajectoryHandle`].
#[derive(Debug, Clone, Default)]
pub struct TrajectoryArena<D: Domain> {
    trajectories: Vec<Trajectory<D>>,
}

impl<D: Domain> TrajectoryArena<D> {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            trajectories: Vec::new(),
        }
    }

    /// Store a trajectory and return its handle.
    pub fn insert(&mut self, trajectory: Trajectory<D>) -> TrajectoryHandle {
        self.trajectories.push(trajectory);
        TrajectoryHandle(self.trajectories.len() - 1)
    }

    /// Look up a trajectory.
    #[must_use]
    pub fn get(&self, handle: TrajectoryHandle) -> Option<&Trajectory<D>> {
        self.trajectories.get(handle.0)
    }

    /// Number of stored trajectories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    /// Whether the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    /// Iterate over handles and trajectories in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (TrajectoryHandle, &Trajectory<D>)> {
        self.trajectories
            .iter()
            .enumerate()
            .map(|(i, t)| (TrajectoryHandle(i), t))
    }
}

impl<D: Domain> Index<TrajectoryHandle> for TrajectoryArena<D> {
    type Output = Trajectory<D>;

    fn index(&self, handle: TrajectoryHandle) -> &Self::Output {
        &self.trajectories[handle.0]
    }
}

impl<D: Domain> FromIterator<Trajectory<D>> for TrajectoryArena<D> {
    fn from_iter<T: IntoIterator<Item = Trajectory<D>>>(iter: T) -> Self {
        Self {
            trajectories: iter.into_iter().collect(),
        }
    }
}

impl<D: Domain> Extend<Trajectory<D>> for TrajectoryArena<D> {
    fn extend<T: IntoIterator<Item = Trajectory<D>>>(&mut self, iter: T) {
        self.trajectories.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Cartesian2D, Terrestrial};
    use approx::assert_relative_eq;

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn l_shape() -> Trajectory<Cartesian2D> {
        Trajectory::from_points(vec![
            TrajectoryPoint::new("A", ts(0), [0.0, 0.0]),
            TrajectoryPoint::new("A", ts(10), [3.0, 0.0]),
            TrajectoryPoint::new("A", ts(30), [3.0, 4.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_points_rejects_bad_input() {
        assert!(Trajectory::<Cartesian2D>::from_points(Vec::new()).is_err());

        let mixed = vec![
            TrajectoryPoint::<Cartesian2D>::new("A", ts(0), [0.0, 0.0]),
            TrajectoryPoint::new("B", ts(1), [0.0, 0.0]),
        ];
        assert!(Trajectory::from_points(mixed).is_err());
    }

    #[test]
    fn test_push_validates() {
        let mut t = Trajectory::<Cartesian2D>::new("A");
        t.push(TrajectoryPoint::new("A", ts(5), [0.0, 0.0])).unwrap();
        assert!(t.push(TrajectoryPoint::new("A", ts(4), [0.0, 0.0])).is_err());
        assert!(t.push(TrajectoryPoint::new("B", ts(6), [0.0, 0.0])).is_err());
        t.push(TrajectoryPoint::new("A", ts(5), [1.0, 0.0])).unwrap();
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_time_accessors() {
        let t = l_shape();
        assert_eq!(t.start_time(), Some(ts(0)));
        assert_eq!(t.end_time(), Some(ts(30)));
        assert_eq!(t.duration(), Duration::seconds(30));
        assert_eq!(Trajectory::<Cartesian2D>::new("X").duration(), Duration::zero());
    }

    #[test]
    fn test_lengths() {
        let t = l_shape();
        assert_relative_eq!(t.length(), 7.0);
        assert_relative_eq!(t.end_to_end_distance(), 5.0);
        assert_eq!(t.cumulative_lengths(), vec![0.0, 3.0, 7.0]);
    }

    #[test]
    fn test_point_at_length_fraction() {
        let t = l_shape();
        let start = t.point_at_length_fraction(0.0).unwrap();
        assert_eq!(start.coords(), &[0.0, 0.0]);

        let corner = t.point_at_length_fraction(3.0 / 7.0).unwrap();
        assert_relative_eq!(corner.coords()[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(corner.coords()[1], 0.0, epsilon = 1e-12);

        let up = t.point_at_length_fraction(5.0 / 7.0).unwrap();
        assert_relative_eq!(up.coords()[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(up.coords()[1], 2.0, epsilon = 1e-12);
        assert_eq!(up.timestamp(), ts(20));

        let end = t.point_at_length_fraction(2.0).unwrap();
        assert_eq!(end.coords(), &[3.0, 4.0]);

        assert!(Trajectory::<Cartesian2D>::new("X")
            .point_at_length_fraction(0.5)
            .is_none());
    }

    #[test]
    fn test_point_at_time() {
        let t = l_shape();
        assert_eq!(t.point_at_time(ts(-5)).unwrap().coords(), &[0.0, 0.0]);
        assert_eq!(t.point_at_time(ts(5)).unwrap().coords(), &[1.5, 0.0]);
        assert_eq!(t.point_at_time(ts(10)).unwrap().coords(), &[3.0, 0.0]);
        assert_eq!(t.point_at_time(ts(20)).unwrap().coords(), &[3.0, 2.0]);
        assert_eq!(t.point_at_time(ts(99)).unwrap().coords(), &[3.0, 4.0]);
    }

    #[test]
    fn test_subset_in_window() {
        let mut t = l_shape();
        t.set_property("source", "radar");

        let sub = t.subset_in_window(ts(5), ts(20));
        assert_eq!(sub.object_id(), "A");
        assert_eq!(sub.len(), 3);
        assert_eq!(sub[0].coords(), &[1.5, 0.0]);
        assert_eq!(sub[1].coords(), &[3.0, 0.0]);
        assert_eq!(sub[2].coords(), &[3.0, 2.0]);
        assert_eq!(sub.property("source"), t.property("source"));

        let exact = t.subset_in_window(ts(10), ts(10));
        assert_eq!(exact.len(), 1);

        assert!(t.subset_in_window(ts(100), ts(200)).is_empty());
        assert_eq!(t.subset_in_window(ts(-100), ts(200)).points(), t.points());
    }

    #[test]
    fn test_terrestrial_length() {
        let t = Trajectory::from_points(vec![
            TrajectoryPoint::<Terrestrial>::new("A", ts(0), [0.0, 0.0]),
            TrajectoryPoint::new("A", ts(60), [0.0, 1.0]),
            TrajectoryPoint::new("A", ts(120), [0.0, 2.0]),
        ])
        .unwrap();
        assert_relative_eq!(t.length(), t.end_to_end_distance(), epsilon = 1e-9);
    }

    #[test]
    fn test_arena_handles() {
        let mut arena = TrajectoryArena::new();
        let a = arena.insert(l_shape());
        let b = arena.insert(Trajectory::new("B"));

        assert_eq!(arena.len(), 2);
        assert_eq!(a.index(), 0);
        assert_eq!(arena[b].object_id(), "B");
        assert_eq!(arena.get(a).map(Trajectory::len), Some(3));
        assert!(arena.get(TrajectoryHandle(7)).is_none());
        assert_eq!(b.to_string(), "trajectory#1");

        let handles: Vec<_> = arena.iter().map(|(h, _)| h).collect();
        assert_eq!(handles, vec![a, b]);
    }
}
