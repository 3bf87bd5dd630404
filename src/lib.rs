//! Trajectory Kit
//!
//! Streaming trajectory assembly, shape signatures and density clustering.
//!
//! Points arrive as a stream of timestamped positions tagged with an object
//! id. The [`TrajectoryAssembler`] splits each object's points into
//! trajectories wherever consecutive points are too far apart in space or
//! time. Each trajectory can be reduced to a [`DistanceGeometry`] signature,
//! a fixed-size shape descriptor that ignores absolute size and speed, and
//! signatures can be indexed ([`SpatialIndex`]) or grouped ([`Dbscan`]).
//!
//! # Features
//!
//! - **Domain-correct math**: great-circle distances on the sphere for
//!   longitude/latitude data, Euclidean distances for planar data
//! - **Type-level capabilities**: bearings and turn angles exist only for
//!   two-dimensional domains
//! - **Lazy assembly**: trajectories are produced on demand, pulling only as
//!   many points as needed
//! - **Deterministic clustering**: DBSCAN over an R-tree with an epsilon box
//!
//! # Quick Start
//!
//! ```
//! use chrono::{DateTime, Duration};
//! use trajectory_kit::{
//!     cluster_trajectories, AssemblerConfig, Cartesian2D, Dbscan, DbscanConfig,
//!     DistanceGeometry, TrajectoryArena, TrajectoryAssembler, TrajectoryPoint,
//! };
//!
//! let t = |s| DateTime::from_timestamp(s, 0).unwrap();
//!
//! // Two objects drive straight lines; a third turns a corner.
//! let mut points = Vec::new();
//! for i in 0..6 {
//!     let s = i as f64;
//!     points.push(TrajectoryPoint::<Cartesian2D>::new("north", t(i * 10), [0.0, s]));
//!     points.push(TrajectoryPoint::new("east", t(i * 10), [2.0 * s, 0.0]));
//!     let corner = if i < 3 { [s, 5.0] } else { [2.0, 3.0 + s] };
//!     points.push(TrajectoryPoint::new("corner", t(i * 10), corner));
//! }
//!
//! let config = AssemblerConfig::default()
//!     .with_separation_distance(5.0)
//!     .with_separation_time(Duration::seconds(60));
//! let arena: TrajectoryArena<_> = TrajectoryAssembler::new(points, config)?.collect();
//! assert_eq!(arena.len(), 3);
//!
//! let signature = DistanceGeometry::with_depth(2)?;
//! let dbscan = Dbscan::new(DbscanConfig::<3>::uniform(0.01, 2))?;
//! let clusters = cluster_trajectories(&arena, &signature, &dbscan)?;
//!
//! assert_eq!(clusters.cluster_count(), 1);
//! assert_eq!(clusters.noise().len(), 1);
//! # Ok::<(), trajectory_kit::TrajectoryError>(())
//! ```
//!
//! # Domains
//!
//! | Tag | Coordinates | Distance | Heading |
//! |-----|-------------|----------|---------|
//! | [`Terrestrial`] | `[lon, lat]` degrees | great-circle km | yes |
//! | [`Cartesian2D`] | `[x, y]` | Euclidean | yes |
//! | [`Cartesian3D`] | `[x, y, z]` | Euclidean | no |

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod analysis;
pub mod assembler;
pub mod clustering;
pub mod config;
pub mod error;
pub mod feature;
pub mod index;
pub mod math;
pub mod point;
pub mod signature;
pub mod trajectory;
pub mod validation;

// Re-exports for convenient access
pub use analysis::{build_signature_index, cluster_trajectories, signatures};
pub use assembler::TrajectoryAssembler;
pub use clustering::{ClusterLabel, ClusterResult, Dbscan, NOISE};
pub use config::{
    AssemblerConfig, DbscanConfig, SignatureConfig, SignatureMode, MAX_SIGNATURE_DEPTH,
};
pub use error::{Result, TrajectoryError};
pub use feature::{pairwise_distances, FeatureVector};
pub use index::{IndexEntry, Neighbor, SpatialIndex};
pub use math::{Cartesian2D, Cartesian3D, Domain, Heading, Terrestrial};
pub use point::{
    Cartesian2DPoint, Cartesian3DPoint, PropertyMap, PropertyValue, TerrestrialPoint,
    TrajectoryPoint,
};
pub use signature::{signature_dimension, DistanceGeometry};
pub use trajectory::{Trajectory, TrajectoryArena, TrajectoryHandle};
pub use validation::validate_trajectory;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
