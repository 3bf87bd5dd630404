//! Domain-correct geometry for trajectory points.
//!
//! This module provides:
//! - [`domain`]: the [`Domain`] and [`Heading`] traits plus the three domain tags
//! - [`geodesic`]: great-circle distance, bearing, and slerp on a spherical earth
//! - [`planar`]: Euclidean distance and linear blending in 2D/3D
//! - [`time`]: elapsed-time and timestamp blending helpers
//! - [`measure`]: point-level distance, speed, bearing, turn angle, and interpolation

pub mod domain;
pub mod geodesic;
pub mod measure;
pub mod planar;
pub mod time;

pub use domain::{wrap_degrees, Cartesian2D, Cartesian3D, Domain, Heading, Terrestrial};
pub use measure::{
    bearing, distance, extrapolate, interpolate, signed_turn_angle, speed, MIN_ELAPSED_SECONDS,
};
pub use time::{elapsed_seconds, lerp_timestamp};
