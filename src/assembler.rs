//! Streaming assembly of point streams into trajectories.
//!
//! [`TrajectoryAssembler`] consumes points one at a time and yields finished
//! trajectories as an [`Iterator`]. Points for different objects may be
//! interleaved; points for the same object must arrive in time order.
//!
//! A point extends its object's in-progress trajectory when it is closer
//! than `separation_distance` and `separation_time` to the previous point.
//! Otherwise the in-progress trajectory is finalized and the point starts a
//! new one. A point older than its predecessor also starts a new trajectory.
//!
//! Finalized trajectories with at least `minimum_trajectory_length` points
//! are emitted; shorter ones are discarded and counted. Every
//! `cleanup_interval` points, trajectories whose last point is more than
//! `separation_time` behind the newest timestamp seen are finalized, so
//! objects that stop reporting do not hold memory. At end of input (or on
//! [`stop`](TrajectoryAssembler::stop)) everything still open is finalized.
//!
//! # Example
//!
//! ```
//! use chrono::{DateTime, Duration};
//! use trajectory_kit::{AssemblerConfig, Terrestrial, TrajectoryAssembler, TrajectoryPoint};
//!
//! let t = |s| DateTime::from_timestamp(s, 0).unwrap();
//! let points = (0..5).map(|i| {
//!     TrajectoryPoint::<Terrestrial>::new("A", t(i * 60), [0.0, i as f64 * 0.0001])
//! });
//!
//! let config = AssemblerConfig::default()
//!     .with_separation_distance(1.0)
//!     .with_separation_time(Duration::seconds(1200))
//!     .with_minimum_trajectory_length(1);
//!
//! let mut assembler = TrajectoryAssembler::new(points, config)?;
//! let trajectories: Vec<_> = assembler.by_ref().collect();
//! assert_eq!(trajectories.len(), 1);
//! assert_eq!(trajectories[0].len(), 5);
//! assert_eq!(assembler.valid_trajectory_count(), 1);
//! # Ok::<(), trajectory_kit::TrajectoryError>(())
//! ```

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};
use log::{debug, info, trace};

use crate::config::AssemblerConfig;
use crate::error::Result;
use crate::math::{measure, Domain};
use crate::point::TrajectoryPoint;
use crate::trajectory::Trajectory;

/// Pull-based state machine turning a point stream into trajectories.
#[derive(Debug)]
pub struct TrajectoryAssembler<D, I>
where
    D: Domain,
    I: Iterator<Item = TrajectoryPoint<D>>,
{
    /// Validated configuration.
    config: AssemblerConfig,

    /// Upstream point source.
    source: I,

    /// Open trajectories by object id.
    in_progress: HashMap<String, Trajectory<D>>,

    /// Finalized trajectories waiting to be yielded.
    finished: VecDeque<Trajectory<D>>,

    /// Newest timestamp ingested so far.
    latest_timestamp: Option<DateTime<Utc>>,

    points_processed: usize,
    points_since_cleanup: usize,
    valid_count: usize,
    invalid_count: usize,

    /// Set once the source is drained or `stop` was called.
    exhausted: bool,
}

impl<D, I> TrajectoryAssembler<D, I>
where
    D: Domain,
    I: Iterator<Item = TrajectoryPoint<D>>,
{
    /// Create an assembler over `source`.
    ///
    /// Nothing is read from the source until the first call to `next`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new<S>(source: S, config: AssemblerConfig) -> Result<Self>
    where
        S: IntoIterator<IntoIter = I, Item = TrajectoryPoint<D>>,
    {
        config.validate()?;
        Ok(Self {
            config,
            source: source.into_iter(),
            in_progress: HashMap::new(),
            finished: VecDeque::new(),
            latest_timestamp: None,
            points_processed: 0,
            points_since_cleanup: 0,
            valid_count: 0,
            invalid_count: 0,
            exhausted: false,
        })
    }

    /// Get reference to configuration.
    #[must_use]
    pub const fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Trajectories emitted (or queued for emission) so far.
    #[must_use]
    pub const fn valid_trajectory_count(&self) -> usize {
        self.valid_count
    }

    /// Trajectories discarded for being shorter than the minimum length.
    #[must_use]
    pub const fn invalid_trajectory_count(&self) -> usize {
        self.invalid_count
    }

    /// Points pulled from the source so far.
    #[must_use]
    pub const fn points_processed(&self) -> usize {
        self.points_processed
    }

    /// Trajectories currently open.
    #[must_use]
    pub fn in_progress_count(&self) -> usize {
        self.in_progress.len()
    }

    /// Stop reading the source and finalize every open trajectory.
    ///
    /// Trajectories long enough to emit are still yielded by subsequent
    /// calls to `next`; no further points are pulled. Calling `stop` again
    /// has no effect.
    pub fn stop(&mut self) {
        if self.exhausted {
            return;
        }
        self.exhausted = true;
        self.finalize_all();
        self.log_summary("stopped");
    }

    fn ingest(&mut self, point: TrajectoryPoint<D>) {
        self.points_processed += 1;
        self.points_since_cleanup += 1;
        if self.latest_timestamp.map_or(true, |t| point.timestamp() > t) {
            self.latest_timestamp = Some(point.timestamp());
        }

        if let Some(current) = self.in_progress.get_mut(point.object_id()) {
            if continues(&self.config, current, &point) {
                current.push_unchecked(point);
            } else {
                trace!(
                    "separation for '{}' at {}",
                    point.object_id(),
                    point.timestamp()
                );
                let done = std::mem::replace(current, Trajectory::starting_with(point));
                self.finalize(done);
            }
        } else {
            let key = point.object_id().to_string();
            self.in_progress.insert(key, Trajectory::starting_with(point));
        }

        if self.points_since_cleanup >= self.config.cleanup_interval {
            self.points_since_cleanup = 0;
            self.close_stale();
        }
    }

    /// Finalize trajectories idle for longer than the separation time.
    fn close_stale(&mut self) {
        let Some(latest) = self.latest_timestamp else {
            return;
        };
        let cutoff = latest
            .checked_sub_signed(self.config.separation_time)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let stale: Vec<String> = self
            .in_progress
            .iter()
            .filter(|(_, t)| t.end_time().map_or(true, |end| end < cutoff))
            .map(|(id, _)| id.clone())
            .collect();

        let closed: Vec<Trajectory<D>> = stale
            .iter()
            .filter_map(|id| self.in_progress.remove(id))
            .collect();
        debug!(
            "cleanup after {} points closed {} of {} open trajectories",
            self.points_processed,
            closed.len(),
            closed.len() + self.in_progress.len()
        );
        self.finalize_batch(closed);
    }

    fn finalize_all(&mut self) {
        let open: Vec<Trajectory<D>> = self.in_progress.drain().map(|(_, t)| t).collect();
        self.finalize_batch(open);
    }

    /// Finalize several trajectories in end-time, then object-id order.
    fn finalize_batch(&mut self, mut trajectories: Vec<Trajectory<D>>) {
        trajectories.sort_by(|a, b| {
            a.end_time()
                .cmp(&b.end_time())
                .then_with(|| a.object_id().cmp(b.object_id()))
        });
        for trajectory in trajectories {
            self.finalize(trajectory);
        }
    }

    fn finalize(&mut self, trajectory: Trajectory<D>) {
        if trajectory.len() >= self.config.minimum_trajectory_length {
            debug!(
                "emitting trajectory for '{}' with {} points",
                trajectory.object_id(),
                trajectory.len()
            );
            self.valid_count += 1;
            self.finished.push_back(trajectory);
        } else {
            debug!(
                "discarding trajectory for '{}' with {} points (minimum {})",
                trajectory.object_id(),
                trajectory.len(),
                self.config.minimum_trajectory_length
            );
            self.invalid_count += 1;
        }
    }

    fn log_summary(&self, reason: &str) {
        info!(
            "assembly {reason}: {} points, {} trajectories emitted, {} discarded",
            self.points_processed, self.valid_count, self.invalid_count
        );
    }
}

/// Whether `point` extends `current` under the separation thresholds.
fn continues<D: Domain>(
    config: &AssemblerConfig,
    current: &Trajectory<D>,
    point: &TrajectoryPoint<D>,
) -> bool {
    let Some(last) = current.last() else {
        return false;
    };
    let elapsed = point.timestamp() - last.timestamp();
    if elapsed < Duration::zero() {
        return false;
    }
    elapsed < config.separation_time && measure::distance(last, point) < config.separation_distance
}

impl<D, I> Iterator for TrajectoryAssembler<D, I>
where
    D: Domain,
    I: Iterator<Item = TrajectoryPoint<D>>,
{
    type Item = Trajectory<D>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(trajectory) = self.finished.pop_front() {
                return Some(trajectory);
            }
            if self.exhausted {
                return None;
            }
            match self.source.next() {
                Some(point) => self.ingest(point),
                None => {
                    self.exhausted = true;
                    self.finalize_all();
                    self.log_summary("complete");
                }
            }
        }
    }
}
